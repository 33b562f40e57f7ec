/// Texture dimensions in texels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TexSize {
    pub width: u32,
    pub height: u32,
}

impl TexSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Smallest power-of-two size that contains `self`, per axis.
    ///
    /// Returns `None` if either axis would overflow `u32`.
    #[inline]
    pub fn next_power_of_two(self) -> Option<Self> {
        Some(Self {
            width: self.width.checked_next_power_of_two()?,
            height: self.height.checked_next_power_of_two()?,
        })
    }

    /// True if either axis of `self` is larger than the same axis of `other`.
    #[inline]
    pub const fn exceeds(self, other: TexSize) -> bool {
        self.width > other.width || self.height > other.height
    }

    /// Byte length of a tightly packed RGBA8 image of this size.
    #[inline]
    pub fn rgba8_len(self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(4)
    }
}
