use crate::caps::{MinMagFilter, TexTarget, TexUnit, Wrap};
use crate::coords::TexSize;
use crate::device::TexParams;

/// Parameters for a self-allocated [`super::Texture`].
///
/// Defaults: `TEXTURE_2D` on unit 0, linear filtering, clamp-to-edge, no
/// power-of-two padding.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub target: TexTarget,
    pub unit: TexUnit,
    pub size: TexSize,
    /// Round backing storage up to powers of two.
    pub power_of_two: bool,
    pub filter: MinMagFilter,
    pub wrap: Wrap,
}

impl TextureDesc {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: TexTarget::default(),
            unit: TexUnit::UNIT0,
            size: TexSize::new(width, height),
            power_of_two: false,
            filter: MinMagFilter::default(),
            wrap: Wrap::default(),
        }
    }

    pub fn target(mut self, target: TexTarget) -> Self {
        self.target = target;
        self
    }

    pub fn unit(mut self, unit: TexUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn power_of_two(mut self, enabled: bool) -> Self {
        self.power_of_two = enabled;
        self
    }

    pub fn filter(mut self, filter: MinMagFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    #[inline]
    pub(crate) fn params(&self) -> TexParams {
        TexParams {
            filter: self.filter,
            wrap: self.wrap,
        }
    }
}
