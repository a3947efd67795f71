//=========================================================================
// State Tracker
//=========================================================================
//
// Per-device press/release bookkeeping shared by keyboards, mice and
// controllers.
//
// Architecture:
//   press(b, t)   → down-set ∪ {b} → last_press[b] = t → history.push(down)
//   release(b, t) → down-set \ {b} → last_release[b] = t
//
// Only presses append to the history ring; a release changes the
// down-set that the next press will snapshot.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::marker::PhantomData;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::Button;
use super::history::HistoryRing;

//=== ButtonSet ===========================================================

/// Bitmask snapshot of which buttons of one family are held.
pub struct ButtonSet<B: Button> {
    bits: u128,
    _family: PhantomData<B>,
}

impl<B: Button> ButtonSet<B> {
    pub const EMPTY: Self = Self {
        bits: 0,
        _family: PhantomData,
    };

    /// Set containing exactly `buttons`.
    pub fn from_buttons(buttons: &[B]) -> Self {
        let mut set = Self::EMPTY;
        for &button in buttons {
            set.insert(button);
        }
        set
    }

    /// Returns `true` if the button was not already present.
    pub fn insert(&mut self, button: B) -> bool {
        let mask = Self::mask(button);
        let added = self.bits & mask == 0;
        self.bits |= mask;
        added
    }

    /// Returns `true` if the button was present.
    pub fn remove(&mut self, button: B) -> bool {
        let mask = Self::mask(button);
        let removed = self.bits & mask != 0;
        self.bits &= !mask;
        removed
    }

    pub fn contains(&self, button: B) -> bool {
        self.bits & Self::mask(button) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    /// Held buttons in index order.
    pub fn iter(&self) -> impl Iterator<Item = B> + '_ {
        (0..B::COUNT)
            .filter(move |&i| self.bits & (1u128 << i) != 0)
            .filter_map(B::from_index)
    }

    fn mask(button: B) -> u128 {
        1u128 << button.index()
    }
}

// Manual impls: deriving would put bounds on `B` itself.

impl<B: Button> Clone for ButtonSet<B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: Button> Copy for ButtonSet<B> {}

impl<B: Button> PartialEq for ButtonSet<B> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<B: Button> Eq for ButtonSet<B> {}

impl<B: Button> Default for ButtonSet<B> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<B: Button> fmt::Debug for ButtonSet<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

//=== ButtonTracker =======================================================

/// Down-state, per-button timestamps and press history for one device.
#[derive(Debug, Clone)]
pub struct ButtonTracker<B: Button> {
    down: ButtonSet<B>,
    last_press: Vec<Option<f64>>,
    last_release: Vec<Option<f64>>,
    last_pressed: Option<B>,
    last_released: Option<B>,
    history: HistoryRing<ButtonSet<B>>,
}

impl<B: Button> ButtonTracker<B> {
    pub fn new() -> Self {
        Self {
            down: ButtonSet::EMPTY,
            last_press: vec![None; B::COUNT],
            last_release: vec![None; B::COUNT],
            last_pressed: None,
            last_released: None,
            history: HistoryRing::new(),
        }
    }

    //--- Mutation ---------------------------------------------------------

    /// Records a press at `timestamp`.
    ///
    /// A press of a button that is already held is ignored and returns
    /// `false` (no timestamp, no history entry).
    pub fn press(&mut self, button: B, timestamp: f64) -> bool {
        if !self.down.insert(button) {
            trace!(target: "input", "Ignoring press of held {:?}", button);
            return false;
        }
        self.last_press[button.index()] = Some(timestamp);
        self.last_pressed = Some(button);
        self.history.push(self.down);
        true
    }

    /// Records a release at `timestamp`.
    ///
    /// Releasing a button that is not held is ignored and returns `false`.
    pub fn release(&mut self, button: B, timestamp: f64) -> bool {
        if !self.down.remove(button) {
            trace!(target: "input", "Ignoring release of idle {:?}", button);
            return false;
        }
        self.last_release[button.index()] = Some(timestamp);
        self.last_released = Some(button);
        true
    }

    /// Releases everything without recording timestamps (device lost).
    pub fn reset(&mut self) {
        self.down = ButtonSet::EMPTY;
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_down(&self, button: B) -> bool {
        self.down.contains(button)
    }

    pub fn down(&self) -> ButtonSet<B> {
        self.down
    }

    pub fn last_press_time(&self, button: B) -> Option<f64> {
        self.last_press[button.index()]
    }

    pub fn last_release_time(&self, button: B) -> Option<f64> {
        self.last_release[button.index()]
    }

    /// Most recently pressed button.
    pub fn last_pressed(&self) -> Option<B> {
        self.last_pressed
    }

    /// Most recently released button.
    pub fn last_released(&self) -> Option<B> {
        self.last_released
    }

    /// Matches `expected` (oldest first) against the newest press
    /// snapshots.
    pub fn check_history(&self, expected: &[ButtonSet<B>]) -> bool {
        self.history.check(expected)
    }

    /// Convenience over [`check_history`](Self::check_history) taking each
    /// snapshot as a slice of held buttons.
    pub fn check_history_of(&self, expected: &[&[B]]) -> bool {
        let sets: Vec<_> = expected.iter().map(|s| ButtonSet::from_buttons(s)).collect();
        self.check_history(&sets)
    }

    pub fn history(&self) -> &HistoryRing<ButtonSet<B>> {
        &self.history
    }
}

impl<B: Button> Default for ButtonTracker<B> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
