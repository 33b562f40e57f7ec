//! Size and viewport types shared by textures and backends.
//!
//! Texture sizes are texel counts (`u32`); viewports are signed framebuffer
//! pixels with GL's bottom-left origin.

mod size;
mod viewport;

pub use size::TexSize;
pub use viewport::Viewport;
