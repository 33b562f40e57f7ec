//! Lumen engine crate.
//!
//! GPU texture resources with explicit ownership: allocation, optional
//! power-of-two padding, the coordinate matrix that crops padding, per-texture
//! viewports and release, driven through an injected graphics context.
//!
//! ```rust
//! use lumen_engine::device::RecordingContext;
//! use lumen_engine::texture::{Texture, TextureDesc};
//!
//! let mut gl = RecordingContext::new();
//! let mut tex = Texture::create(&mut gl, TextureDesc::new(100, 60).power_of_two(true)).unwrap();
//! assert_eq!((tex.tex_width(), tex.tex_height()), (128, 64));
//! assert_eq!(tex.tex_matrix().scale_factors(), (0.78125, 0.9375));
//! tex.release(&mut gl);
//! ```

pub mod caps;
pub mod coords;
pub mod device;
pub mod logging;
pub mod texture;
