use crate::caps::{MinMagFilter, TexTarget, TexUnit, Wrap};
use crate::coords::{TexSize, Viewport};
use crate::device::{GraphicsContext, TexParams, TextureId};

use super::{TexMatrix, TextureDesc, TextureError};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    /// No name held. Owned textures pass through here while reallocating,
    /// and stay here if that allocation fails.
    Unallocated,
    Allocated(TextureId),
    /// Terminal.
    Released,
}

/// One GPU texture, owned or wrapped.
///
/// Owned textures allocate their own storage, optionally padded to powers of
/// two, and must be [`release`](Self::release)d while the context is current.
/// Dropping an owned texture that is still allocated only logs a leak: GPU
/// calls are not safe from an arbitrary drop site.
///
/// Wrapped textures reference a name created elsewhere. They never allocate,
/// reallocate or delete; the creator keeps the name alive for as long as the
/// wrapper is used.
#[derive(Debug)]
pub struct Texture {
    target: TexTarget,
    unit: TexUnit,
    params: TexParams,
    power_of_two: bool,
    wrapped: bool,

    state: State,

    /// Logical size: the content most recently requested or loaded.
    size: TexSize,
    /// Backing size: what is actually allocated.
    tex_size: TexSize,

    matrix: TexMatrix,
    viewport: Viewport,
}

impl Texture {
    /// Allocates a new texture described by `desc`.
    ///
    /// Leaves nothing bound on `desc.unit` and applies the default viewport
    /// `(0, 0, width, height)`.
    pub fn create<G>(gl: &mut G, desc: TextureDesc) -> Result<Self, TextureError>
    where
        G: GraphicsContext + ?Sized,
    {
        let TextureDesc {
            target,
            unit,
            size,
            power_of_two,
            ..
        } = desc;

        check_size(size)?;
        if target.is_external() {
            return Err(TextureError::UnsupportedTarget(target));
        }

        let mut tex = Self {
            target,
            unit,
            params: desc.params(),
            power_of_two,
            wrapped: false,
            state: State::Unallocated,
            size,
            tex_size: TexSize::default(),
            matrix: TexMatrix::IDENTITY,
            viewport: Viewport::default(),
        };
        tex.allocate(gl, size)?;
        Ok(tex)
    }

    /// Wraps a texture name created outside this type.
    ///
    /// Backing size is taken to equal `width x height`; power-of-two padding
    /// never applies. Applies the default viewport `(0, 0, width, height)`.
    pub fn wrap<G>(
        gl: &mut G,
        target: TexTarget,
        unit: TexUnit,
        id: TextureId,
        width: u32,
        height: u32,
    ) -> Result<Self, TextureError>
    where
        G: GraphicsContext + ?Sized,
    {
        let size = TexSize::new(width, height);
        let viewport = check_size(size)?;

        let mut tex = Self {
            target,
            unit,
            params: TexParams::default(),
            power_of_two: false,
            wrapped: true,
            state: State::Allocated(id),
            size,
            tex_size: size,
            matrix: TexMatrix::IDENTITY,
            viewport: Viewport::default(),
        };
        tex.set_viewport(gl, viewport);
        log::debug!("wrapped texture {id} ({target:?}, {width}x{height})");
        Ok(tex)
    }

    /// Frees the texture name if this instance owns it.
    ///
    /// Idempotent. A no-op for wrapped textures.
    pub fn release<G>(&mut self, gl: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        if self.wrapped {
            return;
        }
        if let State::Allocated(id) = self.state {
            gl.delete_texture(id);
            log::debug!("released texture {id}");
        }
        self.state = State::Released;
    }

    /// Binds this texture on its unit and re-applies its viewport.
    pub fn bind<G>(&self, gl: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        self.bind_only(gl);
        gl.set_viewport(self.viewport);
    }

    /// Binds this texture on its unit without touching the viewport.
    pub fn bind_only<G>(&self, gl: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        debug_assert!(self.is_valid(), "bind of a texture with no name: {:?}", self.state);
        gl.active_texture(self.unit);
        gl.bind_texture(self.target, self.id());
    }

    /// Binds nothing to this texture's target on its unit.
    pub fn unbind<G>(&self, gl: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        gl.active_texture(self.unit);
        gl.bind_texture(self.target, None);
    }

    /// Stores `viewport` for later binds and applies it now.
    pub fn set_viewport<G>(&mut self, gl: &mut G, viewport: Viewport)
    where
        G: GraphicsContext + ?Sized,
    {
        self.viewport = viewport;
        gl.set_viewport(viewport);
        log::trace!("viewport {viewport:?}");
    }

    /// Uploads tightly packed RGBA8 content of `width x height`.
    ///
    /// Owned textures whose backing is too small on either axis are
    /// reallocated (once) at the content size; otherwise the content is
    /// written at (0, 0) into the existing storage. Wrapped textures never
    /// reallocate and reject content larger than their backing.
    ///
    /// On success the logical size becomes `width x height` and the matrix
    /// crops to it.
    pub fn load_pixels<G>(
        &mut self,
        gl: &mut G,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), TextureError>
    where
        G: GraphicsContext + ?Sized,
    {
        let size = TexSize::new(width, height);
        check_size(size)?;
        let expected = size
            .rgba8_len()
            .ok_or(TextureError::InvalidSize { width, height })?;
        if pixels.len() != expected {
            return Err(TextureError::PixelDataSize {
                expected,
                actual: pixels.len(),
            });
        }

        let id = match self.state {
            State::Released => return Err(TextureError::Released),
            State::Unallocated => {
                log::debug!("retrying allocation at {width}x{height}");
                self.allocate(gl, size)?
            }
            State::Allocated(_) if self.wrapped && size.exceeds(self.tex_size) => {
                log::warn!(
                    "rejected {width}x{height} content for wrapped {}x{} texture",
                    self.tex_size.width,
                    self.tex_size.height
                );
                return Err(TextureError::ContentTooLarge {
                    content: size,
                    backing: self.tex_size,
                });
            }
            State::Allocated(old) if !self.wrapped && size.exceeds(self.tex_size) => {
                log::debug!(
                    "texture {old}: {width}x{height} exceeds {}x{}, reallocating",
                    self.tex_size.width,
                    self.tex_size.height
                );
                gl.delete_texture(old);
                self.state = State::Unallocated;
                self.allocate(gl, size)?
            }
            State::Allocated(id) => id,
        };

        gl.active_texture(self.unit);
        gl.bind_texture(self.target, Some(id));
        let written = gl.write_pixels(self.target, size, pixels);
        gl.bind_texture(self.target, None);
        written.map_err(TextureError::Upload)?;

        self.size = size;
        self.update_matrix();
        Ok(())
    }

    /// Like [`load_pixels`](Self::load_pixels), taking one `[r, g, b, a]` per texel.
    pub fn load_rgba<G>(
        &mut self,
        gl: &mut G,
        width: u32,
        height: u32,
        texels: &[[u8; 4]],
    ) -> Result<(), TextureError>
    where
        G: GraphicsContext + ?Sized,
    {
        self.load_pixels(gl, width, height, bytemuck::cast_slice(texels))
    }

    /// Copy of the coordinate transform matrix.
    #[inline]
    pub fn tex_matrix(&self) -> TexMatrix {
        self.matrix
    }

    /// Read-only view of the coordinate transform matrix.
    #[inline]
    pub fn tex_matrix_ref(&self) -> &TexMatrix {
        &self.matrix
    }

    /// Copies the matrix into `out[offset..offset + 16]`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than 16 elements remain in `out` from `offset`.
    pub fn copy_tex_matrix_into(&self, out: &mut [f32], offset: usize) {
        out[offset..offset + 16].copy_from_slice(self.matrix.as_array());
    }

    /// Current name, or `None` once released (or while unallocated).
    #[inline]
    pub fn id(&self) -> Option<TextureId> {
        match self.state {
            State::Allocated(id) => Some(id),
            State::Unallocated | State::Released => None,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self.state, State::Allocated(_))
    }

    #[inline]
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }

    #[inline]
    pub fn is_oes(&self) -> bool {
        self.target.is_external()
    }

    #[inline]
    pub fn target(&self) -> TexTarget {
        self.target
    }

    #[inline]
    pub fn unit(&self) -> TexUnit {
        self.unit
    }

    #[inline]
    pub fn filter(&self) -> MinMagFilter {
        self.params.filter
    }

    #[inline]
    pub fn wrap_mode(&self) -> Wrap {
        self.params.wrap
    }

    #[inline]
    pub fn is_power_of_two(&self) -> bool {
        self.power_of_two
    }

    /// Logical width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Logical height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    #[inline]
    pub fn size(&self) -> TexSize {
        self.size
    }

    /// Backing width.
    #[inline]
    pub fn tex_width(&self) -> u32 {
        self.tex_size.width
    }

    /// Backing height.
    #[inline]
    pub fn tex_height(&self) -> u32 {
        self.tex_size.height
    }

    #[inline]
    pub fn tex_size(&self) -> TexSize {
        self.tex_size
    }

    /// Viewport re-applied by [`bind`](Self::bind).
    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Creates a name with storage for `size`; owned textures only.
    ///
    /// On failure nothing is left allocated and the state stays `Unallocated`.
    fn allocate<G>(&mut self, gl: &mut G, size: TexSize) -> Result<TextureId, TextureError>
    where
        G: GraphicsContext + ?Sized,
    {
        debug_assert!(!self.wrapped);
        debug_assert_eq!(self.state, State::Unallocated);

        let viewport = check_size(size)?;
        let tex_size = if self.power_of_two {
            size.next_power_of_two().ok_or_else(|| invalid_size(size))?
        } else {
            size
        };

        let id = gl
            .create_texture(self.target, self.unit)
            .map_err(TextureError::Allocation)?;
        gl.set_parameters(self.target, self.params);
        let reserved = gl.allocate_storage(self.target, tex_size);
        gl.bind_texture(self.target, None);
        if let Err(err) = reserved {
            gl.delete_texture(id);
            log::warn!(
                "storage for {}x{} refused: {err}",
                tex_size.width,
                tex_size.height
            );
            return Err(TextureError::Allocation(err));
        }

        self.state = State::Allocated(id);
        self.size = size;
        self.tex_size = tex_size;
        self.update_matrix();
        log::debug!(
            "texture {id}: image {}x{}, storage {}x{}",
            size.width,
            size.height,
            tex_size.width,
            tex_size.height
        );
        self.set_viewport(gl, viewport);
        Ok(id)
    }

    fn update_matrix(&mut self) {
        self.matrix = TexMatrix::cropping(self.size, self.tex_size);
        let (sx, sy) = self.matrix.scale_factors();
        log::trace!("scale ({sx:.5}, {sy:.5})");
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if let (false, State::Allocated(id)) = (self.wrapped, self.state) {
            log::warn!("texture {id} dropped without release; its GPU storage is leaked");
        }
    }
}

/// Accepts non-empty sizes whose extents fit a viewport, returning that
/// default viewport.
fn check_size(size: TexSize) -> Result<Viewport, TextureError> {
    if size.is_empty() {
        return Err(invalid_size(size));
    }
    Viewport::covering(size).ok_or_else(|| invalid_size(size))
}

fn invalid_size(size: TexSize) -> TextureError {
    TextureError::InvalidSize {
        width: size.width,
        height: size.height,
    }
}
