//! Texture resource management.
//!
//! A [`Texture`] owns (or wraps) one GPU texture name and keeps the
//! bookkeeping GL does not: logical vs backing size, the coordinate matrix
//! that crops power-of-two padding, and a per-texture viewport that is
//! re-applied on every bind.
//!
//! Every operation takes the [`crate::device::GraphicsContext`] to issue
//! calls against. Callers must hold that context current on their thread.

mod desc;
mod error;
mod matrix;
mod resource;

pub use desc::TextureDesc;
pub use error::TextureError;
pub use matrix::TexMatrix;
pub use resource::Texture;
