//! In-memory [`GraphicsContext`] that records every call.
//!
//! Mirrors the GL binding model closely enough to check texture behavior
//! without a driver: names are handed out sequentially, deletes of names that
//! are not live panic, and storage/bind state is tracked per unit.

use std::collections::{BTreeSet, HashMap};

use crate::caps::{TexTarget, TexUnit};
use crate::coords::{TexSize, Viewport};

use super::{ContextError, GraphicsContext, TexParams, TextureId};

/// One recorded context call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlCall {
    CreateTexture { target: TexTarget, unit: TexUnit, id: TextureId },
    SetParameters { target: TexTarget, params: TexParams },
    AllocateStorage { target: TexTarget, size: TexSize },
    WritePixels { target: TexTarget, size: TexSize, len: usize },
    ActiveTexture(TexUnit),
    BindTexture { target: TexTarget, id: Option<TextureId> },
    SetViewport(Viewport),
    DeleteTexture(TextureId),
}

#[derive(Debug)]
pub struct RecordingContext {
    calls: Vec<GlCall>,
    next_name: u32,
    live: BTreeSet<TextureId>,
    storage: HashMap<TextureId, TexSize>,
    active_unit: TexUnit,
    bindings: HashMap<(TexUnit, TexTarget), TextureId>,
    viewport: Option<Viewport>,
    fail_next_create: bool,
    fail_next_storage: bool,
    max_dimension: u32,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_name: 1,
            live: BTreeSet::new(),
            storage: HashMap::new(),
            active_unit: TexUnit::UNIT0,
            bindings: HashMap::new(),
            viewport: None,
            fail_next_create: false,
            fail_next_storage: false,
            max_dimension: 16384,
        }
    }

    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    /// Returns the recorded calls and starts a fresh log.
    pub fn take_calls(&mut self) -> Vec<GlCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn live(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.live.iter().copied()
    }

    pub fn is_live(&self, id: TextureId) -> bool {
        self.live.contains(&id)
    }

    /// Storage size reserved for `id`, if any.
    pub fn storage_size(&self, id: TextureId) -> Option<TexSize> {
        self.storage.get(&id).copied()
    }

    /// Viewport most recently applied to the context.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn bound(&self, unit: TexUnit, target: TexTarget) -> Option<TextureId> {
        self.bindings.get(&(unit, target)).copied()
    }

    pub fn active_unit(&self) -> TexUnit {
        self.active_unit
    }

    /// Makes the next `create_texture` fail with `OutOfMemory`.
    pub fn fail_next_create(&mut self) {
        self.fail_next_create = true;
    }

    /// Makes the next `allocate_storage` fail with `OutOfMemory`.
    pub fn fail_next_storage(&mut self) {
        self.fail_next_storage = true;
    }

    /// Storage requests above `max` on either axis are rejected.
    pub fn set_max_dimension(&mut self, max: u32) {
        self.max_dimension = max;
    }

    /// Registers a name created outside this context (e.g. by a video decoder).
    ///
    /// No call is recorded. The name becomes live so it can be bound, and
    /// later names never collide with it.
    pub fn register_external(&mut self, id: TextureId, size: TexSize) {
        self.live.insert(id);
        self.storage.insert(id, size);
        self.next_name = self.next_name.max(id.get().saturating_add(1));
    }

    fn bound_on_active(&self, target: TexTarget) -> Result<TextureId, ContextError> {
        self.bound(self.active_unit, target).ok_or_else(|| {
            ContextError::InvalidOperation(format!(
                "no texture bound to {target:?} on {:?}",
                self.active_unit
            ))
        })
    }
}

impl Default for RecordingContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext for RecordingContext {
    fn create_texture(
        &mut self,
        target: TexTarget,
        unit: TexUnit,
    ) -> Result<TextureId, ContextError> {
        if std::mem::take(&mut self.fail_next_create) {
            return Err(ContextError::OutOfMemory);
        }
        let id = TextureId::new(self.next_name)
            .ok_or_else(|| ContextError::InvalidOperation("texture names exhausted".into()))?;
        self.next_name = self.next_name.saturating_add(1);

        self.live.insert(id);
        self.active_unit = unit;
        self.bindings.insert((unit, target), id);
        self.calls.push(GlCall::CreateTexture { target, unit, id });
        Ok(id)
    }

    fn set_parameters(&mut self, target: TexTarget, params: TexParams) {
        self.calls.push(GlCall::SetParameters { target, params });
    }

    fn allocate_storage(&mut self, target: TexTarget, size: TexSize) -> Result<(), ContextError> {
        if std::mem::take(&mut self.fail_next_storage) {
            return Err(ContextError::OutOfMemory);
        }
        if size.width > self.max_dimension || size.height > self.max_dimension {
            return Err(ContextError::InvalidOperation(format!(
                "{}x{} exceeds max dimension {}",
                size.width, size.height, self.max_dimension
            )));
        }
        let id = self.bound_on_active(target)?;
        self.storage.insert(id, size);
        self.calls.push(GlCall::AllocateStorage { target, size });
        Ok(())
    }

    fn write_pixels(
        &mut self,
        target: TexTarget,
        size: TexSize,
        pixels: &[u8],
    ) -> Result<(), ContextError> {
        let id = self.bound_on_active(target)?;
        let Some(storage) = self.storage.get(&id).copied() else {
            return Err(ContextError::InvalidOperation(format!("texture {id} has no storage")));
        };
        if size.exceeds(storage) {
            return Err(ContextError::InvalidOperation(format!(
                "{}x{} write does not fit {}x{} storage",
                size.width, size.height, storage.width, storage.height
            )));
        }
        if size.rgba8_len() != Some(pixels.len()) {
            return Err(ContextError::InvalidOperation(format!(
                "pixel buffer of {} bytes does not match {}x{}",
                pixels.len(),
                size.width,
                size.height
            )));
        }
        self.calls.push(GlCall::WritePixels { target, size, len: pixels.len() });
        Ok(())
    }

    fn active_texture(&mut self, unit: TexUnit) {
        self.active_unit = unit;
        self.calls.push(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&mut self, target: TexTarget, id: Option<TextureId>) {
        match id {
            Some(id) => {
                self.bindings.insert((self.active_unit, target), id);
            }
            None => {
                self.bindings.remove(&(self.active_unit, target));
            }
        }
        self.calls.push(GlCall::BindTexture { target, id });
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.calls.push(GlCall::SetViewport(viewport));
    }

    fn delete_texture(&mut self, id: TextureId) {
        assert!(self.live.remove(&id), "texture {id} deleted while not live");
        self.storage.remove(&id);
        // Deleting a bound texture reverts those bindings to zero.
        self.bindings.retain(|_, bound| *bound != id);
        self.calls.push(GlCall::DeleteTexture(id));
    }
}
