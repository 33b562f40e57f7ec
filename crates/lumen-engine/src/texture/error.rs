use std::fmt;

use crate::caps::TexTarget;
use crate::coords::TexSize;
use crate::device::ContextError;

/// Failure of a [`super::Texture`] operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Zero-sized (or unrepresentably large) dimensions.
    InvalidSize { width: u32, height: u32 },
    /// Storage cannot be self-allocated for this target.
    UnsupportedTarget(TexTarget),
    /// The context refused to create the texture or reserve its storage.
    ///
    /// The texture is left unallocated; a later load retries.
    Allocation(ContextError),
    /// The context refused a pixel write.
    Upload(ContextError),
    /// Pixel buffer length does not match `width * height * 4`.
    PixelDataSize { expected: usize, actual: usize },
    /// Content does not fit a wrapped texture, which is never reallocated.
    ContentTooLarge { content: TexSize, backing: TexSize },
    /// The texture was released.
    Released,
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(f, "invalid texture size {width}x{height}")
            }
            Self::UnsupportedTarget(target) => {
                write!(f, "cannot allocate storage for {target:?} textures")
            }
            Self::Allocation(err) => write!(f, "texture allocation failed: {err}"),
            Self::Upload(err) => write!(f, "texture upload failed: {err}"),
            Self::PixelDataSize { expected, actual } => {
                write!(f, "pixel buffer is {actual} bytes, expected {expected}")
            }
            Self::ContentTooLarge { content, backing } => write!(
                f,
                "{}x{} content does not fit wrapped {}x{} texture",
                content.width, content.height, backing.width, backing.height
            ),
            Self::Released => write!(f, "texture already released"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Allocation(err) | Self::Upload(err) => Some(err),
            _ => None,
        }
    }
}
