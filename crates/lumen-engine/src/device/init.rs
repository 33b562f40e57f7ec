/// Initialization parameters for a headless [`super::WgpuContext`].
///
/// Keep this structure minimal. Texture work needs no surface, so only the
/// adapter/device knobs are exposed.
#[derive(Debug, Clone)]
pub struct HeadlessInit {
    /// Adapter preference.
    pub power_preference: wgpu::PowerPreference,

    /// Use the software fallback adapter (useful on CI machines).
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// `max_texture_dimension_2d` bounds every allocation made through the context.
    pub required_limits: wgpu::Limits,
}

impl Default for HeadlessInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}
