//! Pseudo-random source for procedural effects.

/// Source of pseudo-random numbers for effects and wheel starting hues.
pub trait RandomSource {
    /// Returns the next 16-bit value.
    fn next_u16(&mut self) -> u16;

    /// Returns a value in `0..bound`; a zero bound yields 0.
    fn below(&mut self, bound: u16) -> u16 {
        if bound == 0 {
            return 0;
        }
        self.next_u16() % bound
    }
}

/// Marsaglia xorshift generator with 32 bits of state.
///
/// Good enough for visual noise and small enough for the target MCUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Seeds the generator; a zero seed is replaced since xorshift would stay at 0.
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x2545_F491 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for XorShift32 {
    fn next_u16(&mut self) -> u16 {
        (self.next_u32() >> 16) as u16
    }
}
