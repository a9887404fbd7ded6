/// Repeating dash pattern for outlines.
///
/// Bit `i` of `pattern` (LSB first) is one pattern step; each step spans
/// `factor` texels. The mask is sampled by the fragment stage at
/// `s = arc_length / 10000`, so one pattern cycle covers 10000 length units.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct StipplePattern {
    pub factor: u32,
    pub pattern: u16,
}

impl StipplePattern {
    pub const SOLID: Self = Self { factor: 1, pattern: 0xFFFF };

    /// Largest accepted repeat factor.
    pub const MAX_FACTOR: u32 = 256;

    /// Creates a pattern; `factor` is clamped to `1..=MAX_FACTOR`.
    pub fn new(factor: u32, pattern: u16) -> Self {
        Self {
            factor: factor.clamp(1, Self::MAX_FACTOR),
            pattern,
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.pattern == 0xFFFF
    }

    /// Width of the mask texture.
    #[inline]
    pub fn texel_count(&self) -> u32 {
        16 * self.factor.clamp(1, Self::MAX_FACTOR)
    }

    /// One coverage byte per texel: `255` for dash, `0` for gap.
    pub fn mask(&self) -> Vec<u8> {
        let factor = self.factor.clamp(1, Self::MAX_FACTOR) as usize;
        (0..16)
            .flat_map(|bit| {
                let on = self.pattern & (1 << bit) != 0;
                std::iter::repeat_n(if on { u8::MAX } else { 0 }, factor)
            })
            .collect()
    }

    /// RGBA8 texels with coverage in every channel.
    ///
    /// Multiplying a premultiplied color by these texels keeps it premultiplied.
    pub fn rgba_texels(&self) -> Vec<[u8; 4]> {
        self.mask().into_iter().map(|c| [c; 4]).collect()
    }
}

impl Default for StipplePattern {
    fn default() -> Self {
        Self::SOLID
    }
}
