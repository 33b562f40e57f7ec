use std::fmt;
use std::num::NonZeroU32;

use crate::caps::{MinMagFilter, TexTarget, TexUnit, Wrap};
use crate::coords::{TexSize, Viewport};

use super::ContextError;

/// Driver-side name of one texture.
///
/// GL reserves `0` for "no texture", so a live identity is always non-zero.
/// The unallocated state is represented by the absence of a `TextureId`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    #[inline]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureId({})", self.0)
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sampling parameters applied once, right after a texture is created.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TexParams {
    /// Used for both minification and magnification.
    pub filter: MinMagFilter,
    /// Used for both the S and T axes.
    pub wrap: Wrap,
}

/// Graphics-context call surface used by [`crate::texture::Texture`].
///
/// The model is GL's: one active texture unit, one bound texture per
/// (unit, target) pair, one viewport per context. Calls that act on "the
/// bound texture" operate on whatever is bound to `target` on the active
/// unit.
///
/// Implementations are driven from the thread that owns the context. They
/// are not expected to validate caller state beyond what the driver itself
/// would refuse.
pub trait GraphicsContext {
    /// Generates a new texture name and binds it to `target` on `unit`.
    ///
    /// Leaves `unit` active.
    fn create_texture(&mut self, target: TexTarget, unit: TexUnit)
        -> Result<TextureId, ContextError>;

    /// Applies filter and wrap parameters to the bound texture.
    fn set_parameters(&mut self, target: TexTarget, params: TexParams);

    /// Reserves RGBA8 storage of `size` for the bound texture, without data.
    fn allocate_storage(&mut self, target: TexTarget, size: TexSize) -> Result<(), ContextError>;

    /// Writes tightly packed RGBA8 `pixels` of `size` into the bound texture at (0, 0).
    fn write_pixels(
        &mut self,
        target: TexTarget,
        size: TexSize,
        pixels: &[u8],
    ) -> Result<(), ContextError>;

    /// Selects the active texture unit.
    fn active_texture(&mut self, unit: TexUnit);

    /// Binds `id` (or nothing) to `target` on the active unit.
    fn bind_texture(&mut self, target: TexTarget, id: Option<TextureId>);

    /// Sets the context viewport.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Frees a texture name and its storage.
    fn delete_texture(&mut self, id: TextureId);
}
