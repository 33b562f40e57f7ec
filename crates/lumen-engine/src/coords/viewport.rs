/// Viewport rectangle in framebuffer pixels (bottom-left origin, GL convention).
///
/// Stored by value on each texture and re-applied whenever the texture is
/// bound, since the GPU keeps only one viewport per context.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport anchored at the origin covering `size`.
    ///
    /// `None` if either extent does not fit an `i32`.
    #[inline]
    pub fn covering(size: super::TexSize) -> Option<Self> {
        let width = i32::try_from(size.width).ok()?;
        let height = i32::try_from(size.height).ok()?;
        Some(Self::new(0, 0, width, height))
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::TexSize;

    #[test]
    fn covering_starts_at_origin() {
        let vp = Viewport::covering(TexSize::new(100, 60)).unwrap();
        assert_eq!(vp, Viewport::new(0, 0, 100, 60));
        assert!(vp.is_valid());
    }

    #[test]
    fn covering_refuses_extents_past_i32() {
        assert_eq!(Viewport::covering(TexSize::new(3_000_000_000, 1)), None);
        assert_eq!(Viewport::covering(TexSize::new(1, u32::MAX)), None);

        let edge = i32::MAX as u32;
        let vp = Viewport::covering(TexSize::new(edge, edge)).unwrap();
        assert_eq!((vp.width, vp.height), (i32::MAX, i32::MAX));
        assert!(vp.is_valid());
    }

    #[test]
    fn zero_or_negative_extent_is_invalid() {
        assert!(!Viewport::new(0, 0, 0, 10).is_valid());
        assert!(!Viewport::new(0, 0, 10, -1).is_valid());
        assert!(Viewport::new(-5, -5, 1, 1).is_valid());
    }
}
