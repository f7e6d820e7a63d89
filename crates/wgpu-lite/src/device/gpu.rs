use anyhow::Result;
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::{surface, InitError, SessionConfig, SurfaceErrorAction};

/// Presentation surface bound to a window, plus its active configuration.
pub(crate) struct Presentation<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

/// Owns wgpu core objects and the optional presentation surface.
///
/// Compute-only users create this without a window; raster users usually pass
/// the window they draw into.
pub struct GpuDevice<'w> {
    /// Kept alive for the lifetime of the surface.
    _instance: wgpu::Instance,

    adapter: wgpu::Adapter,

    device: wgpu::Device,

    queue: wgpu::Queue,

    presentation: Option<Presentation<'w>>,
}

impl<'w> GpuDevice<'w> {
    /// Acquires an adapter and device, and configures a surface when a window
    /// is supplied.
    ///
    /// Missing GPU support surfaces as [`InitError::NoAdapter`].
    pub async fn new(window: Option<&'w Window>, config: &SessionConfig) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = match window {
            Some(w) => Some(
                instance
                    .create_surface(w)
                    .map_err(|e| InitError::Surface(e.to_string()))?,
            ),
            None => None,
        };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: surface.as_ref(),
                force_fallback_adapter: false,
            })
            .await
            .map_err(InitError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "selected GPU adapter: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let required_limits = config.limits.resolve(adapter.limits());
        log::debug!(
            "requesting device with {:?} limits (max storage binding {} bytes)",
            config.limits,
            required_limits.max_storage_buffer_binding_size
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some(config.label("device").as_str()),
                required_features: config.required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(InitError::Device)?;

        let presentation = match (surface, window) {
            (Some(surface), Some(window)) => Some(configure_surface(
                surface,
                window.inner_size(),
                &adapter,
                &device,
                config,
            )?),
            _ => None,
        };

        Ok(Self {
            _instance: instance,
            adapter,
            device,
            queue,
            presentation,
        })
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> wgpu::AdapterInfo {
        self.adapter.get_info()
    }

    /// Limits the adapter reports, which may exceed what the device was given.
    pub fn adapter_limits(&self) -> wgpu::Limits {
        self.adapter.limits()
    }

    /// Returns the active surface format, if a surface is bound.
    pub fn surface_format(&self) -> Option<wgpu::TextureFormat> {
        self.presentation.as_ref().map(|p| p.config.format)
    }

    /// Reconfigures the surface after a resize. No-op without a surface.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if let Some(p) = self.presentation.as_mut() {
            surface::apply_resize(&p.surface, &self.device, &mut p.config, &mut p.size, new_size);
        }
    }

    /// Acquires the next surface texture.
    ///
    /// Returns `None` when no surface is bound.
    pub(crate) fn current_texture(&self) -> Option<Result<wgpu::SurfaceTexture, SurfaceError>> {
        self.presentation
            .as_ref()
            .map(|p| p.surface.get_current_texture())
    }

    /// Converts a `SurfaceError` into a higher-level action, reconfiguring the
    /// surface when it was lost or outdated.
    pub fn handle_surface_error(&self, err: &SurfaceError) -> SurfaceErrorAction {
        match self.presentation.as_ref() {
            Some(p) => surface::map_surface_error(&p.surface, &self.device, &p.config, p.size, err),
            None => SurfaceErrorAction::Fatal,
        }
    }
}

fn configure_surface<'w>(
    surface: wgpu::Surface<'w>,
    size: PhysicalSize<u32>,
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    config: &SessionConfig,
) -> Result<Presentation<'w>> {
    let caps = surface.get_capabilities(adapter);
    let format = surface::choose_surface_format(&caps, config.prefer_srgb)
        .ok_or_else(|| InitError::Surface("no supported surface formats".into()))?;
    let alpha_mode = surface::choose_alpha_mode(&caps, config.alpha_mode);

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: config.present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: config.desired_maximum_frame_latency,
    };

    surface.configure(device, &surface_config);
    log::debug!(
        "configured surface {}x{} as {format:?} ({alpha_mode:?})",
        surface_config.width,
        surface_config.height
    );

    Ok(Presentation {
        surface,
        config: surface_config,
        size,
    })
}
