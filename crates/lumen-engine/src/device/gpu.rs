use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::caps::{MinMagFilter, TexTarget, TexUnit, Wrap};
use crate::coords::{TexSize, Viewport};

use super::{ContextError, GraphicsContext, HeadlessInit, TexParams, TextureId};

/// Storage format reserved for every texture allocated through this backend.
pub const STORAGE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A texture name and whatever the backend has attached to it so far.
struct Slot {
    target: TexTarget,
    storage: Option<Storage>,
    sampler: Option<wgpu::Sampler>,
    /// Imported textures are owned by the caller; `delete_texture` only forgets them.
    imported: bool,
}

struct Storage {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: TexSize,
}

/// [`GraphicsContext`] backed by a wgpu device.
///
/// wgpu has no global binding state, so this type keeps GL-style state on
/// the CPU side:
/// - the active unit
/// - the texture bound to each (unit, target) pair
/// - the current viewport
///
/// Renderers read that state back (`bound_texture`, `view`, `sampler`,
/// `viewport`) when they build bind groups and render passes.
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,

    slots: HashMap<TextureId, Slot>,
    next_name: u32,

    active_unit: TexUnit,
    bindings: HashMap<(TexUnit, TexTarget), TextureId>,
    viewport: Option<Viewport>,
}

impl WgpuContext {
    /// Wraps an existing device/queue pair.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            slots: HashMap::new(),
            next_name: 1,
            active_unit: TexUnit::UNIT0,
            bindings: HashMap::new(),
            viewport: None,
        }
    }

    /// Creates a context on a freshly requested device with no surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn headless(init: HeadlessInit) -> Result<Self> {
        let HeadlessInit {
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lumen-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        log::debug!("headless context on adapter {:?}", adapter.get_info().name);
        Ok(Self::new(device, queue))
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Registers a texture created elsewhere so it can be wrapped by name.
    ///
    /// The texture stays owned by the caller; deleting the name never destroys it.
    /// Only single-layer, single-sample 2D textures in [`STORAGE_FORMAT`] with
    /// `COPY_DST` usage are accepted, since uploads write RGBA8 rows into them.
    pub fn import_texture(&mut self, texture: wgpu::Texture) -> Result<TextureId, ContextError> {
        check_importable(&texture)?;
        let id = self.next_name()?;
        let size = TexSize::new(texture.width(), texture.height());
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.slots.insert(
            id,
            Slot {
                target: TexTarget::Texture2D,
                storage: Some(Storage { texture, view, size }),
                sampler: None,
                imported: true,
            },
        );
        Ok(id)
    }

    /// Pushes pending pixel writes to the GPU.
    pub fn flush(&self) {
        self.queue.submit(std::iter::empty());
    }

    pub fn bound_texture(&self, unit: TexUnit, target: TexTarget) -> Option<TextureId> {
        self.bindings.get(&(unit, target)).copied()
    }

    pub fn texture(&self, id: TextureId) -> Option<&wgpu::Texture> {
        self.storage(id).map(|s| &s.texture)
    }

    pub fn view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.storage(id).map(|s| &s.view)
    }

    pub fn sampler(&self, id: TextureId) -> Option<&wgpu::Sampler> {
        self.slots.get(&id).and_then(|s| s.sampler.as_ref())
    }

    /// Viewport most recently set on this context.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Number of names currently alive.
    pub fn live_textures(&self) -> usize {
        self.slots.len()
    }

    fn storage(&self, id: TextureId) -> Option<&Storage> {
        self.slots.get(&id).and_then(|s| s.storage.as_ref())
    }

    fn next_name(&mut self) -> Result<TextureId, ContextError> {
        let id = TextureId::new(self.next_name)
            .ok_or_else(|| ContextError::InvalidOperation("texture names exhausted".into()))?;
        self.next_name = self
            .next_name
            .checked_add(1)
            .ok_or_else(|| ContextError::InvalidOperation("texture names exhausted".into()))?;
        Ok(id)
    }

    fn bound_id(&self, target: TexTarget) -> Result<TextureId, ContextError> {
        let unit = self.active_unit;
        let id = self.bound_texture(unit, target).ok_or_else(|| {
            ContextError::InvalidOperation(format!("no texture bound to {target:?} on {unit:?}"))
        })?;
        if !self.slots.contains_key(&id) {
            return Err(ContextError::InvalidOperation(format!("texture {id} is not live")));
        }
        Ok(id)
    }
}

impl GraphicsContext for WgpuContext {
    fn create_texture(
        &mut self,
        target: TexTarget,
        unit: TexUnit,
    ) -> Result<TextureId, ContextError> {
        if target.is_external() {
            return Err(ContextError::Unsupported("external OES textures"));
        }
        let id = self.next_name()?;
        self.slots.insert(
            id,
            Slot {
                target,
                storage: None,
                sampler: None,
                imported: false,
            },
        );
        self.active_unit = unit;
        self.bindings.insert((unit, target), id);
        Ok(id)
    }

    fn set_parameters(&mut self, target: TexTarget, params: TexParams) {
        let id = match self.bound_id(target) {
            Ok(id) => id,
            Err(err) => {
                log::warn!("set_parameters ignored: {err}");
                return;
            }
        };
        let sampler = self.device.create_sampler(&sampler_descriptor(params));
        if let Some(slot) = self.slots.get_mut(&id) {
            slot.sampler = Some(sampler);
        }
    }

    fn allocate_storage(&mut self, target: TexTarget, size: TexSize) -> Result<(), ContextError> {
        let max = self.device.limits().max_texture_dimension_2d;
        if size.is_empty() || size.width > max || size.height > max {
            return Err(ContextError::InvalidOperation(format!(
                "{}x{} outside supported range 1..={max}",
                size.width, size.height
            )));
        }
        let id = self.bound_id(target)?;

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen texture"),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: STORAGE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let Some(slot) = self.slots.get_mut(&id) else {
            return Err(ContextError::InvalidOperation(format!("texture {id} is not live")));
        };
        if let Some(old) = slot.storage.replace(Storage { texture, view, size }) {
            // Respecifying storage drops the previous image, as in GL.
            if !slot.imported {
                old.texture.destroy();
            }
        }
        log::trace!("texture {id}: reserved {}x{}", size.width, size.height);
        Ok(())
    }

    fn write_pixels(
        &mut self,
        target: TexTarget,
        size: TexSize,
        pixels: &[u8],
    ) -> Result<(), ContextError> {
        if size.rgba8_len() != Some(pixels.len()) {
            return Err(ContextError::InvalidOperation(format!(
                "pixel buffer of {} bytes does not match {}x{}",
                pixels.len(),
                size.width,
                size.height
            )));
        }

        let id = self.bound_id(target)?;
        let storage = self
            .storage(id)
            .ok_or_else(|| ContextError::InvalidOperation(format!("texture {id} has no storage")))?;
        if size.exceeds(storage.size) {
            return Err(ContextError::InvalidOperation(format!(
                "{}x{} write does not fit {}x{} storage",
                size.width, size.height, storage.size.width, storage.size.height
            )));
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &storage.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * 4),
                rows_per_image: Some(size.height),
            },
            extent(size),
        );
        Ok(())
    }

    fn active_texture(&mut self, unit: TexUnit) {
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, target: TexTarget, id: Option<TextureId>) {
        let key = (self.active_unit, target);
        match id {
            Some(id) => {
                if let Some(slot) = self.slots.get(&id) {
                    if slot.target != target {
                        log::warn!("texture {id} is a {:?}, bound as {target:?}", slot.target);
                    }
                }
                self.bindings.insert(key, id);
            }
            None => {
                self.bindings.remove(&key);
            }
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn delete_texture(&mut self, id: TextureId) {
        let Some(slot) = self.slots.remove(&id) else {
            log::warn!("delete of unknown texture {id}");
            return;
        };
        if let Some(storage) = slot.storage {
            if !slot.imported {
                storage.texture.destroy();
            }
        }
        self.bindings.retain(|_, bound| *bound != id);
    }
}

fn check_importable(texture: &wgpu::Texture) -> Result<(), ContextError> {
    if texture.format() != STORAGE_FORMAT {
        return Err(ContextError::Unsupported("imported texture format other than Rgba8Unorm"));
    }
    if !texture.usage().contains(wgpu::TextureUsages::COPY_DST) {
        return Err(ContextError::Unsupported("imported texture without COPY_DST usage"));
    }
    if texture.dimension() != wgpu::TextureDimension::D2 || texture.depth_or_array_layers() != 1 {
        return Err(ContextError::Unsupported("imported texture that is not a single 2D layer"));
    }
    if texture.sample_count() != 1 {
        return Err(ContextError::Unsupported("multisampled imported texture"));
    }
    Ok(())
}

fn extent(size: TexSize) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}

fn sampler_descriptor(params: TexParams) -> wgpu::SamplerDescriptor<'static> {
    let filter = filter_mode(params.filter);
    let address = address_mode(params.wrap);
    wgpu::SamplerDescriptor {
        label: Some("lumen sampler"),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: filter,
        min_filter: filter,
        ..Default::default()
    }
}

pub(crate) fn filter_mode(filter: MinMagFilter) -> wgpu::FilterMode {
    match filter {
        MinMagFilter::Nearest => wgpu::FilterMode::Nearest,
        MinMagFilter::Linear => wgpu::FilterMode::Linear,
    }
}

pub(crate) fn address_mode(wrap: Wrap) -> wgpu::AddressMode {
    match wrap {
        Wrap::Repeat => wgpu::AddressMode::Repeat,
        Wrap::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{Texture, TextureDesc, TextureError};

    /// Headless context, or `None` on machines with no usable adapter.
    fn headless() -> Option<WgpuContext> {
        match pollster::block_on(WgpuContext::headless(HeadlessInit::default())) {
            Ok(ctx) => Some(ctx),
            Err(err) => {
                eprintln!("no wgpu adapter, skipping: {err:#}");
                None
            }
        }
    }

    fn foreign(
        ctx: &WgpuContext,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        layers: u32,
    ) -> wgpu::Texture {
        ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("foreign texture"),
            size: wgpu::Extent3d {
                width: 8,
                height: 8,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        })
    }

    const UPLOADABLE: wgpu::TextureUsages =
        wgpu::TextureUsages::TEXTURE_BINDING.union(wgpu::TextureUsages::COPY_DST);

    // ── mapping helpers ───────────────────────────────────────────────────

    #[test]
    fn filters_map_one_to_one() {
        assert_eq!(filter_mode(MinMagFilter::Nearest), wgpu::FilterMode::Nearest);
        assert_eq!(filter_mode(MinMagFilter::Linear), wgpu::FilterMode::Linear);
    }

    #[test]
    fn wraps_map_one_to_one() {
        assert_eq!(address_mode(Wrap::Repeat), wgpu::AddressMode::Repeat);
        assert_eq!(address_mode(Wrap::MirroredRepeat), wgpu::AddressMode::MirrorRepeat);
        assert_eq!(address_mode(Wrap::ClampToEdge), wgpu::AddressMode::ClampToEdge);
    }

    #[test]
    fn sampler_uses_same_mode_on_every_axis() {
        let desc = sampler_descriptor(TexParams {
            filter: MinMagFilter::Nearest,
            wrap: Wrap::Repeat,
        });
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Nearest);
    }

    #[test]
    fn extent_is_single_layer() {
        let e = extent(TexSize::new(128, 64));
        assert_eq!((e.width, e.height, e.depth_or_array_layers), (128, 64, 1));
    }

    // ── backend ───────────────────────────────────────────────────────────

    #[test]
    fn import_refuses_textures_uploads_cannot_write() {
        let Some(mut ctx) = headless() else { return };

        let r8 = foreign(
            &ctx,
            wgpu::TextureFormat::R8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING,
            1,
        );
        assert!(matches!(ctx.import_texture(r8), Err(ContextError::Unsupported(_))));

        let read_only = foreign(&ctx, STORAGE_FORMAT, wgpu::TextureUsages::TEXTURE_BINDING, 1);
        assert!(matches!(ctx.import_texture(read_only), Err(ContextError::Unsupported(_))));

        let layered = foreign(&ctx, STORAGE_FORMAT, UPLOADABLE, 2);
        assert!(matches!(ctx.import_texture(layered), Err(ContextError::Unsupported(_))));

        assert_eq!(ctx.live_textures(), 0);
    }

    #[test]
    fn wrapped_import_accepts_uploads() {
        let Some(mut ctx) = headless() else { return };
        let id = ctx.import_texture(foreign(&ctx, STORAGE_FORMAT, UPLOADABLE, 1)).unwrap();

        let mut tex =
            Texture::wrap(&mut ctx, TexTarget::Texture2D, TexUnit::UNIT0, id, 8, 8).unwrap();
        tex.load_pixels(&mut ctx, 4, 8, &[0xff; 4 * 8 * 4]).unwrap();
        assert_eq!(tex.tex_matrix().scale_factors(), (0.5, 1.0));
        assert_eq!(ctx.bound_texture(TexUnit::UNIT0, TexTarget::Texture2D), None);
        ctx.flush();
    }

    #[test]
    fn storage_past_device_limit_is_refused() {
        let Some(mut ctx) = headless() else { return };
        let max = ctx.device().limits().max_texture_dimension_2d;

        let id = ctx.create_texture(TexTarget::Texture2D, TexUnit::UNIT0).unwrap();
        let err = ctx.allocate_storage(TexTarget::Texture2D, TexSize::new(max + 1, 1));
        assert!(matches!(err, Err(ContextError::InvalidOperation(_))));
        assert!(ctx.texture(id).is_none());
        ctx.delete_texture(id);

        let err = Texture::create(&mut ctx, TextureDesc::new(1, max + 1)).unwrap_err();
        assert!(matches!(err, TextureError::Allocation(ContextError::InvalidOperation(_))));
        assert_eq!(ctx.live_textures(), 0);
    }

    #[test]
    fn nothing_bound_creates_nothing() {
        let Some(mut ctx) = headless() else { return };
        let err = ctx.allocate_storage(TexTarget::Texture2D, TexSize::new(8, 8));
        assert!(matches!(err, Err(ContextError::InvalidOperation(_))));
        ctx.set_parameters(TexTarget::Texture2D, TexParams::default());
        assert_eq!(ctx.live_textures(), 0);

        let id = ctx.create_texture(TexTarget::Texture2D, TexUnit::UNIT0).unwrap();
        ctx.bind_texture(TexTarget::Texture2D, None);
        ctx.set_parameters(TexTarget::Texture2D, TexParams::default());
        assert!(ctx.allocate_storage(TexTarget::Texture2D, TexSize::new(8, 8)).is_err());
        assert!(ctx.sampler(id).is_none());
        assert!(ctx.texture(id).is_none());
        ctx.delete_texture(id);
    }

    #[test]
    fn write_must_fit_storage() {
        let Some(mut ctx) = headless() else { return };
        let id = ctx.create_texture(TexTarget::Texture2D, TexUnit::UNIT0).unwrap();
        ctx.allocate_storage(TexTarget::Texture2D, TexSize::new(8, 8)).unwrap();

        let err = ctx.write_pixels(TexTarget::Texture2D, TexSize::new(16, 4), &[0; 16 * 4 * 4]);
        assert!(matches!(err, Err(ContextError::InvalidOperation(_))));
        let err = ctx.write_pixels(TexTarget::Texture2D, TexSize::new(4, 4), &[0; 10]);
        assert!(matches!(err, Err(ContextError::InvalidOperation(_))));

        ctx.write_pixels(TexTarget::Texture2D, TexSize::new(8, 8), &[0; 8 * 8 * 4]).unwrap();
        ctx.flush();
        ctx.delete_texture(id);
    }

    #[test]
    fn delete_forgets_imports_without_destroying_them() {
        let Some(mut ctx) = headless() else { return };
        let texture = foreign(&ctx, STORAGE_FORMAT, UPLOADABLE, 1);

        let first = ctx.import_texture(texture.clone()).unwrap();
        ctx.delete_texture(first);
        assert!(ctx.texture(first).is_none());

        // Writing into a destroyed texture would raise a validation error.
        let second = ctx.import_texture(texture).unwrap();
        assert_ne!(first, second);
        ctx.bind_texture(TexTarget::Texture2D, Some(second));
        ctx.write_pixels(TexTarget::Texture2D, TexSize::new(8, 8), &[0x40; 8 * 8 * 4]).unwrap();
        ctx.flush();
        assert_eq!(ctx.texture(second).map(|t| t.width()), Some(8));
    }

    #[test]
    fn binding_state_follows_bind_unbind_and_delete() {
        let Some(mut ctx) = headless() else { return };
        let unit = TexUnit::new(2).unwrap();

        let id = ctx.create_texture(TexTarget::Texture2D, unit).unwrap();
        assert_eq!(ctx.bound_texture(unit, TexTarget::Texture2D), Some(id));
        assert_eq!(ctx.bound_texture(TexUnit::UNIT0, TexTarget::Texture2D), None);

        ctx.bind_texture(TexTarget::Texture2D, None);
        assert_eq!(ctx.bound_texture(unit, TexTarget::Texture2D), None);

        ctx.active_texture(TexUnit::UNIT0);
        ctx.bind_texture(TexTarget::Texture2D, Some(id));
        ctx.active_texture(unit);
        ctx.bind_texture(TexTarget::Texture2D, Some(id));
        ctx.delete_texture(id);
        assert_eq!(ctx.bound_texture(unit, TexTarget::Texture2D), None);
        assert_eq!(ctx.bound_texture(TexUnit::UNIT0, TexTarget::Texture2D), None);
        assert_eq!(ctx.live_textures(), 0);
    }

    #[test]
    fn texture_lifecycle_on_device() {
        let Some(mut ctx) = headless() else { return };
        let desc = TextureDesc::new(100, 60)
            .power_of_two(true)
            .filter(MinMagFilter::Nearest);
        let mut tex = Texture::create(&mut ctx, desc).unwrap();
        let first = tex.id().unwrap();

        let backing = ctx.texture(first).unwrap();
        assert_eq!((backing.width(), backing.height()), (128, 64));
        assert_eq!(backing.format(), STORAGE_FORMAT);
        assert!(ctx.sampler(first).is_some());
        assert_eq!(ctx.viewport(), Some(Viewport::new(0, 0, 100, 60)));

        tex.load_pixels(&mut ctx, 200, 70, &vec![0x80; 200 * 70 * 4]).unwrap();
        let second = tex.id().unwrap();
        assert!(ctx.texture(first).is_none());
        let backing = ctx.texture(second).unwrap();
        assert_eq!((backing.width(), backing.height()), (256, 128));

        tex.bind(&mut ctx);
        assert_eq!(ctx.bound_texture(TexUnit::UNIT0, TexTarget::Texture2D), Some(second));
        assert_eq!(ctx.viewport(), Some(Viewport::new(0, 0, 200, 70)));

        ctx.flush();
        tex.release(&mut ctx);
        assert_eq!(ctx.live_textures(), 0);
        assert_eq!(ctx.bound_texture(TexUnit::UNIT0, TexTarget::Texture2D), None);
    }
}
