//! Capability set for texture bindings.
//!
//! Every value accepted by [`crate::texture::Texture`] comes from one of these
//! closed sets. Raw GL enum values enter through `from_gl`, which rejects
//! anything outside the category instead of passing it on to the driver.

mod sampling;
mod target;
mod unit;

pub use sampling::{MinMagFilter, Wrap};
pub use target::TexTarget;
pub use unit::TexUnit;
