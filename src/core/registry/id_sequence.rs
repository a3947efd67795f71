//=========================================================================
// Identity Sequence
//=========================================================================
//
// Non-repeating 32-bit pseudo-random identity generator.
//
// A xorshift32 generator walks every non-zero 32-bit value exactly once
// before repeating (period 2^32 - 1), so identities are collision-free
// for the lifetime of a session until the sequence wraps. Zero is never
// produced and is reserved for null handles.
//
//=========================================================================

//=== IdSequence ==========================================================

/// Full-period xorshift32 identity source.
#[derive(Debug, Clone)]
pub struct IdSequence {
    state: u32,
    issued: u64,
}

impl IdSequence {
    /// Period of the sequence; identities repeat after this many draws.
    pub const PERIOD: u64 = u32::MAX as u64;

    /// Seeds the sequence. A zero seed is remapped, since zero is the
    /// single fixed point of xorshift.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
            issued: 0,
        }
    }

    /// Seeds the sequence from the thread-local RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Returns the next identity (never zero).
    pub fn next_id(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;

        self.issued += 1;
        if self.issued == Self::PERIOD {
            log::warn!(target: "registry", "Identity sequence wrapped; ids may now collide");
        }
        x
    }

    /// Number of identities issued so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
