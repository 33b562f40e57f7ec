//! Graphics-context seam and its backends.
//!
//! This module is responsible for:
//! - the [`GraphicsContext`] call surface textures are driven through
//! - a wgpu-backed implementation ([`WgpuContext`])
//! - a recording implementation for tests and tooling ([`RecordingContext`])

mod context;
mod error;
mod gpu;
mod init;
pub mod recording;

pub use context::{GraphicsContext, TexParams, TextureId};
pub use error::ContextError;
pub use gpu::{WgpuContext, STORAGE_FORMAT};
pub use init::HeadlessInit;
pub use recording::{GlCall, RecordingContext};
