use std::fmt;

/// One of the 32 texture unit slots (`GL_TEXTURE0` .. `GL_TEXTURE31`).
///
/// The slot index is validated on construction, so a `TexUnit` is always
/// in range.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TexUnit(u8);

impl TexUnit {
    /// Number of addressable units.
    pub const COUNT: usize = 32;

    /// `GL_TEXTURE0`.
    pub const UNIT0: TexUnit = TexUnit(0);

    const GL_TEXTURE0: u32 = 0x84C0;

    #[inline]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn gl_enum(self) -> u32 {
        Self::GL_TEXTURE0 + self.0 as u32
    }

    #[inline]
    pub const fn from_gl(value: u32) -> Option<Self> {
        if value < Self::GL_TEXTURE0 {
            return None;
        }
        let offset = value - Self::GL_TEXTURE0;
        if offset < Self::COUNT as u32 {
            Some(Self(offset as u8))
        } else {
            None
        }
    }

    /// Iterates every unit in slot order.
    pub fn all() -> impl Iterator<Item = TexUnit> {
        (0..Self::COUNT as u8).map(TexUnit)
    }
}

impl fmt::Debug for TexUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TEXTURE{}", self.0)
    }
}
