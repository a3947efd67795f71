//=========================================================================
// History Ring
//=========================================================================
//
// Fixed-depth circular log of input snapshots.
//
// Architecture:
//   push(snapshot) → slots[cursor] → cursor = (cursor + 1) % N
//
// Slots start out holding the default (empty) snapshot, so backward
// comparison never needs to know how many entries are valid. Once more
// than N snapshots are written the oldest are overwritten; losing them
// is expected behavior, not an error.
//
//=========================================================================

//=== Constants ===========================================================

/// Depth of every device history.
pub const HISTORY_DEPTH: usize = 64;

//=== HistoryRing =========================================================

/// Circular buffer of `N` snapshots with a wrapping write cursor.
#[derive(Debug, Clone)]
pub struct HistoryRing<T, const N: usize = HISTORY_DEPTH> {
    slots: [T; N],
    cursor: usize,
    written: u64,
}

impl<T: Copy + Default + PartialEq, const N: usize> HistoryRing<T, N> {
    pub fn new() -> Self {
        Self {
            slots: [T::default(); N],
            cursor: 0,
            written: 0,
        }
    }

    /// Appends a snapshot, overwriting the oldest once full.
    pub fn push(&mut self, snapshot: T) {
        self.slots[self.cursor] = snapshot;
        self.cursor = (self.cursor + 1) % N;
        self.written += 1;
    }

    /// Snapshot `back` entries before the most recent one (0 = newest).
    ///
    /// Offsets wrap modulo `N`: offset `N` reads the same slot as 0.
    pub fn back(&self, back: usize) -> T {
        let index = (self.cursor + N - 1 - (back % N)) % N;
        self.slots[index]
    }

    /// Compares `expected` (oldest first, most recent last) against the
    /// newest entries of the ring.
    ///
    /// An empty expectation always matches. Expectations longer than `N`
    /// wrap around and re-read the newest slots, so they only match when
    /// the sequence is periodic with period `N`.
    pub fn check(&self, expected: &[T]) -> bool {
        expected
            .iter()
            .rev()
            .enumerate()
            .all(|(back, snapshot)| self.back(back) == *snapshot)
    }

    /// Up to `count` newest snapshots, oldest first.
    pub fn recent(&self, count: usize) -> Vec<T> {
        let count = count.min(N);
        (0..count).rev().map(|back| self.back(back)).collect()
    }

    /// Total snapshots ever written (not capped at `N`).
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Forgets every snapshot.
    pub fn clear(&mut self) {
        self.slots = [T::default(); N];
        self.cursor = 0;
        self.written = 0;
    }
}

impl<T: Copy + Default + PartialEq, const N: usize> Default for HistoryRing<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(count: u32) -> HistoryRing<u32> {
        let mut ring = HistoryRing::new();
        for value in 1..=count {
            ring.push(value);
        }
        ring
    }

    #[test]
    fn empty_ring_matches_empty_and_defaults() {
        let ring: HistoryRing<u32> = HistoryRing::new();
        assert!(ring.check(&[]));
        assert!(ring.check(&[0, 0, 0]));
        assert!(!ring.check(&[1]));
    }

    #[test]
    fn newest_is_compared_last() {
        let ring = filled(3);
        assert!(ring.check(&[3]));
        assert!(ring.check(&[2, 3]));
        assert!(ring.check(&[1, 2, 3]));
        assert!(!ring.check(&[3, 2]));
    }

    #[test]
    fn cursor_wraps() {
        let ring = filled(HISTORY_DEPTH as u32 + 6);
        assert_eq!(ring.cursor(), 6);
        assert_eq!(ring.written(), 70);
        assert_eq!(ring.back(0), 70);
    }

    /// After overflow, the most recent 64 snapshots are reproduced exactly.
    #[test]
    fn last_full_window_survives_overflow() {
        let ring = filled(70);
        let expected: Vec<u32> = (7..=70).collect();
        assert_eq!(expected.len(), HISTORY_DEPTH);
        assert!(ring.check(&expected));
        assert_eq!(ring.recent(HISTORY_DEPTH), expected);
    }

    /// Spanning beyond the depth wraps instead of reading out of bounds.
    #[test]
    fn overlong_check_wraps_without_panicking() {
        let ring = filled(70);
        let expected: Vec<u32> = (6..=70).collect();
        assert_eq!(expected.len(), HISTORY_DEPTH + 1);
        assert!(!ring.check(&expected));

        let huge = vec![0u32; 10 * HISTORY_DEPTH];
        assert!(!ring.check(&huge));
    }

    #[test]
    fn periodic_sequences_match_across_the_wrap() {
        let mut ring: HistoryRing<u32, 4> = HistoryRing::new();
        for value in [1, 2, 3, 4] {
            ring.push(value);
        }
        assert!(ring.check(&[4, 1, 2, 3, 4]));
    }

    #[test]
    fn back_offsets_wrap() {
        let ring = filled(10);
        assert_eq!(ring.back(0), 10);
        assert_eq!(ring.back(9), 1);
        assert_eq!(ring.back(HISTORY_DEPTH), ring.back(0));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut ring = filled(10);
        ring.clear();
        assert_eq!(ring.written(), 0);
        assert_eq!(ring.cursor(), 0);
        assert!(!ring.check(&[10]));
        assert_eq!(ring.capacity(), HISTORY_DEPTH);
    }
}
