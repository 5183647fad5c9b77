/// Small deterministic generator for one-time placement (scatter origins,
/// silhouette depth and jitter). Never used per frame.
pub(crate) struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    pub(crate) fn new(seed: u32) -> Self {
        // Zero is a fixed point of xorshift.
        let state = if seed == 0 { 0xDEAD_BEEF } else { seed };
        Self { state }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    pub(crate) fn next_f32(&mut self) -> f32 {
        (self.next_u32() & 0x7F_FFFF) as f32 / 0x80_0000 as f32
    }

    pub(crate) fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Uniform in [-half, half).
    pub(crate) fn centered(&mut self, half: f32) -> f32 {
        self.range(-half, half)
    }
}
