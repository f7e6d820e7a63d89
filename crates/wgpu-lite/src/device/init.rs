/// How device limits are chosen when the device is requested.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DeviceLimits {
    /// Request `wgpu::Limits::default()`. No negotiation with the adapter.
    #[default]
    Default,
    /// Request everything the adapter reports (e.g. larger storage buffers).
    Adapter,
}

impl DeviceLimits {
    /// Limits to request given what the adapter reports.
    pub(crate) fn resolve(self, adapter_limits: wgpu::Limits) -> wgpu::Limits {
        match self {
            DeviceLimits::Default => wgpu::Limits::default(),
            DeviceLimits::Adapter => adapter_limits,
        }
    }
}

/// Shader entry point names used by the fixed pipelines.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EntryPoints {
    pub vertex: String,
    pub fragment: String,
    pub compute: String,
}

impl Default for EntryPoints {
    fn default() -> Self {
        Self {
            vertex: "vtxMain".to_string(),
            fragment: "fragMain".to_string(),
            compute: "main".to_string(),
        }
    }
}

/// Initialization parameters for a session.
///
/// Defaults mirror what a browser hands out for a bare `requestDevice()` and a
/// canvas configured with the preferred format and premultiplied alpha.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Adapter selection hint.
    pub power_preference: wgpu::PowerPreference,

    /// Limits requested from the adapter/device.
    pub limits: DeviceLimits,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    pub present_mode: wgpu::PresentMode,

    /// Alpha mode preference for the surface.
    ///
    /// If unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Desired maximum frame latency for the surface. A hint only.
    pub desired_maximum_frame_latency: u32,

    /// Color target format for raster sessions that have no surface.
    pub target_format: wgpu::TextureFormat,

    pub entry_points: EntryPoints,

    /// Prefix for GPU object labels.
    pub label: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            limits: DeviceLimits::Default,
            required_features: wgpu::Features::empty(),
            prefer_srgb: false,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: Some(wgpu::CompositeAlphaMode::PreMultiplied),
            desired_maximum_frame_latency: 2,
            target_format: wgpu::TextureFormat::Bgra8Unorm,
            entry_points: EntryPoints::default(),
            label: "wgpu-lite".to_string(),
        }
    }
}

impl SessionConfig {
    pub(crate) fn label(&self, what: &str) -> String {
        format!("{} {what}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_browser_behaviour() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.limits, DeviceLimits::Default);
        assert!(!cfg.prefer_srgb);
        assert_eq!(cfg.alpha_mode, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert_eq!(cfg.present_mode, wgpu::PresentMode::Fifo);
        assert!(cfg.required_features.is_empty());
    }

    #[test]
    fn default_limits_ignore_adapter() {
        let adapter = wgpu::Limits {
            max_storage_buffer_binding_size: 1 << 30,
            ..wgpu::Limits::default()
        };
        let resolved = DeviceLimits::Default.resolve(adapter.clone());
        assert_eq!(
            resolved.max_storage_buffer_binding_size,
            wgpu::Limits::default().max_storage_buffer_binding_size
        );
        assert_eq!(
            DeviceLimits::Adapter.resolve(adapter).max_storage_buffer_binding_size,
            1 << 30
        );
    }

    #[test]
    fn default_entry_points() {
        let ep = EntryPoints::default();
        assert_eq!(ep.vertex, "vtxMain");
        assert_eq!(ep.fragment, "fragMain");
        assert_eq!(ep.compute, "main");
    }

    #[test]
    fn labels_carry_prefix() {
        let cfg = SessionConfig {
            label: "demo".into(),
            ..Default::default()
        };
        assert_eq!(cfg.label("vertex buffer"), "demo vertex buffer");
    }
}
