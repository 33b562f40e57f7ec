/// Minification/magnification filter.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MinMagFilter {
    /// `GL_NEAREST`.
    Nearest,
    /// `GL_LINEAR`.
    #[default]
    Linear,
}

impl MinMagFilter {
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Nearest => 0x2600,
            Self::Linear => 0x2601,
        }
    }

    #[inline]
    pub const fn from_gl(value: u32) -> Option<Self> {
        match value {
            0x2600 => Some(Self::Nearest),
            0x2601 => Some(Self::Linear),
            _ => None,
        }
    }
}

/// Edge wrap/clamp mode, applied to both S and T axes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Wrap {
    /// `GL_REPEAT`.
    Repeat,
    /// `GL_MIRRORED_REPEAT`.
    MirroredRepeat,
    /// `GL_CLAMP_TO_EDGE`.
    #[default]
    ClampToEdge,
}

impl Wrap {
    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Repeat => 0x2901,
            Self::MirroredRepeat => 0x8370,
            Self::ClampToEdge => 0x812F,
        }
    }

    #[inline]
    pub const fn from_gl(value: u32) -> Option<Self> {
        match value {
            0x2901 => Some(Self::Repeat),
            0x8370 => Some(Self::MirroredRepeat),
            0x812F => Some(Self::ClampToEdge),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_round_trips_through_gl() {
        for f in [MinMagFilter::Nearest, MinMagFilter::Linear] {
            assert_eq!(MinMagFilter::from_gl(f.gl_enum()), Some(f));
        }
    }

    #[test]
    fn filter_rejects_mipmap_variants() {
        // GL_LINEAR_MIPMAP_LINEAR is a valid GL filter but outside this set.
        assert_eq!(MinMagFilter::from_gl(0x2703), None);
    }

    #[test]
    fn wrap_round_trips_through_gl() {
        for w in [Wrap::Repeat, Wrap::MirroredRepeat, Wrap::ClampToEdge] {
            assert_eq!(Wrap::from_gl(w.gl_enum()), Some(w));
        }
    }

    #[test]
    fn wrap_rejects_filter_values() {
        assert_eq!(Wrap::from_gl(MinMagFilter::Linear.gl_enum()), None);
    }

    #[test]
    fn defaults() {
        assert_eq!(MinMagFilter::default(), MinMagFilter::Linear);
        assert_eq!(Wrap::default(), Wrap::ClampToEdge);
    }
}
