/// Binding target of a texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TexTarget {
    /// `GL_TEXTURE_2D`.
    #[default]
    Texture2D,
    /// `GL_TEXTURE_EXTERNAL_OES`.
    ///
    /// Only valid for wrapped identities; storage for external textures is
    /// produced by the image source, never by this crate.
    ExternalOes,
}

impl TexTarget {
    pub const GL_TEXTURE_2D: u32 = 0x0DE1;
    pub const GL_TEXTURE_EXTERNAL_OES: u32 = 0x8D65;

    #[inline]
    pub const fn gl_enum(self) -> u32 {
        match self {
            Self::Texture2D => Self::GL_TEXTURE_2D,
            Self::ExternalOes => Self::GL_TEXTURE_EXTERNAL_OES,
        }
    }

    #[inline]
    pub const fn from_gl(value: u32) -> Option<Self> {
        match value {
            Self::GL_TEXTURE_2D => Some(Self::Texture2D),
            Self::GL_TEXTURE_EXTERNAL_OES => Some(Self::ExternalOes),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::ExternalOes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_values_match_headers() {
        assert_eq!(TexTarget::Texture2D.gl_enum(), 0x0DE1);
        assert_eq!(TexTarget::ExternalOes.gl_enum(), 0x8D65);
    }

    #[test]
    fn from_gl_accepts_known_targets() {
        assert_eq!(TexTarget::from_gl(0x0DE1), Some(TexTarget::Texture2D));
        assert_eq!(TexTarget::from_gl(0x8D65), Some(TexTarget::ExternalOes));
    }

    #[test]
    fn from_gl_rejects_other_targets() {
        // GL_TEXTURE_CUBE_MAP is a real target but not part of this set.
        assert_eq!(TexTarget::from_gl(0x8513), None);
        assert_eq!(TexTarget::from_gl(0), None);
    }

    #[test]
    fn only_oes_is_external() {
        assert!(TexTarget::ExternalOes.is_external());
        assert!(!TexTarget::Texture2D.is_external());
    }
}
