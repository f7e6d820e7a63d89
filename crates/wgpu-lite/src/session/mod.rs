//! Render and compute sessions.
//!
//! A [`Session`] bundles the device, the compiled shader module, the fixed
//! bind group layouts and exactly one pipeline. Submissions allocate their
//! buffers per call and release them before returning:
//! - `render` / `render_to`: vertex buffer + optional auxiliary buffer, one draw.
//! - `compute`: size + output + readback buffers, optional auxiliary buffer,
//!   one dispatch followed by a blocking readback.

mod compute;
mod error;
mod pipeline;
mod render;
mod transient;

use anyhow::Result;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::binding;
use crate::device::{GpuDevice, SessionConfig};

pub use error::SubmitError;
pub use pipeline::{workgroup_count, WORKGROUP_SIZE};

use pipeline::ActivePipeline;
use transient::TransientBuffer;

/// Which fixed pipeline a session builds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineMode {
    Raster,
    Compute,
}

/// What a session is created from.
#[derive(Debug, Clone, Copy)]
pub struct SessionDesc<'a, 'w> {
    /// WGSL source for every entry point the pipeline uses.
    pub shader_source: &'a str,
    /// Window to present into; its current inner size sizes the surface.
    pub window: Option<&'w Window>,
    /// Reserve the auxiliary read-only buffer slot (bind group 0).
    pub auxiliary: bool,
}

impl<'a, 'w> SessionDesc<'a, 'w> {
    pub fn new(shader_source: &'a str) -> Self {
        Self {
            shader_source,
            window: None,
            auxiliary: false,
        }
    }

    pub fn window(mut self, window: &'w Window) -> Self {
        self.window = Some(window);
        self
    }

    pub fn auxiliary(mut self, enabled: bool) -> Self {
        self.auxiliary = enabled;
        self
    }
}

pub struct Session<'w> {
    gpu: GpuDevice<'w>,
    _shader: wgpu::ShaderModule,
    layouts: Vec<wgpu::BindGroupLayout>,
    pipeline: ActivePipeline,
    auxiliary: bool,
    config: SessionConfig,
}

impl<'w> Session<'w> {
    /// Acquires a device, compiles the shader and builds the pipeline for `mode`.
    pub async fn new(
        desc: SessionDesc<'_, 'w>,
        mode: PipelineMode,
        config: SessionConfig,
    ) -> Result<Self> {
        let gpu = GpuDevice::new(desc.window, &config).await?;
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(config.label("shader").as_str()),
            source: wgpu::ShaderSource::Wgsl(desc.shader_source.into()),
        });

        let layouts = pipeline::create_layouts(device, &config, mode, desc.auxiliary)?;

        let pipeline = match mode {
            PipelineMode::Raster => {
                let target_format = gpu.surface_format().unwrap_or(config.target_format);
                pipeline::create_raster(device, &config, &shader, &layouts, target_format)
            }
            PipelineMode::Compute => pipeline::create_compute(device, &config, &shader, &layouts),
        };

        log::debug!(
            "{mode:?} session ready (auxiliary slot {})",
            if desc.auxiliary { "enabled" } else { "disabled" }
        );

        Ok(Self {
            gpu,
            _shader: shader,
            layouts,
            pipeline,
            auxiliary: desc.auxiliary,
            config,
        })
    }

    /// Blocking variant of [`Session::new`].
    pub fn new_blocking(
        desc: SessionDesc<'_, 'w>,
        mode: PipelineMode,
        config: SessionConfig,
    ) -> Result<Self> {
        pollster::block_on(Self::new(desc, mode, config))
    }

    /// Creates a raster session, presenting into `window` when given.
    pub async fn init_render(
        shader_source: &str,
        window: Option<&'w Window>,
        auxiliary: bool,
        config: SessionConfig,
    ) -> Result<Self> {
        let desc = SessionDesc {
            shader_source,
            window,
            auxiliary,
        };
        Self::new(desc, PipelineMode::Raster, config).await
    }

    /// Creates a headless compute session.
    pub async fn init_compute(
        shader_source: &str,
        auxiliary: bool,
        config: SessionConfig,
    ) -> Result<Self> {
        let desc = SessionDesc::new(shader_source).auxiliary(auxiliary);
        Self::new(desc, PipelineMode::Compute, config).await
    }

    pub fn mode(&self) -> PipelineMode {
        self.pipeline.mode()
    }

    pub fn auxiliary_enabled(&self) -> bool {
        self.auxiliary
    }

    pub fn gpu(&self) -> &GpuDevice<'w> {
        &self.gpu
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Color target format of a raster session.
    pub fn target_format(&self) -> Option<wgpu::TextureFormat> {
        match &self.pipeline {
            ActivePipeline::Raster { target_format, .. } => Some(*target_format),
            ActivePipeline::Compute(_) => None,
        }
    }

    /// Reconfigures the presentation surface. No-op without a surface.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    fn raster_pipeline(&self) -> Result<&wgpu::RenderPipeline, SubmitError> {
        match &self.pipeline {
            ActivePipeline::Raster { pipeline, .. } => Ok(pipeline),
            other => Err(SubmitError::WrongMode {
                expected: PipelineMode::Raster,
                actual: other.mode(),
            }),
        }
    }

    fn compute_pipeline(&self) -> Result<&wgpu::ComputePipeline, SubmitError> {
        match &self.pipeline {
            ActivePipeline::Compute(pipeline) => Ok(pipeline),
            other => Err(SubmitError::WrongMode {
                expected: PipelineMode::Compute,
                actual: other.mode(),
            }),
        }
    }

    /// Rejects non-empty auxiliary data when the session has no slot for it.
    fn check_auxiliary(&self, data: Option<&[f32]>) -> Result<(), SubmitError> {
        match data {
            Some(d) if !d.is_empty() && !self.auxiliary => Err(SubmitError::AuxiliaryDisabled),
            _ => Ok(()),
        }
    }

    /// Uploads auxiliary data and binds it against group 0's layout.
    ///
    /// Empty data counts as absent. With the slot enabled and nothing supplied a
    /// single zeroed float is bound so the pipeline layout stays satisfied.
    fn auxiliary_group(
        &self,
        data: Option<&[f32]>,
    ) -> Result<Option<(TransientBuffer, wgpu::BindGroup)>, SubmitError> {
        self.check_auxiliary(data)?;
        if !self.auxiliary {
            return Ok(None);
        }
        let data = data.filter(|d| !d.is_empty());

        let placeholder = [0.0f32];
        let contents = data.unwrap_or_else(|| {
            log::trace!("auxiliary slot enabled without data; binding placeholder");
            &placeholder[..]
        });

        let device = self.gpu.device();
        let buffer = TransientBuffer::with_contents(
            device,
            self.gpu.queue(),
            &self.config.label("auxiliary buffer"),
            bytemuck::cast_slice(contents),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        );
        let group = binding::create_bind_group(
            device,
            Some(self.config.label("auxiliary bind group").as_str()),
            &self.layouts[0],
            &[buffer.buffer()],
        );
        Ok(Some((buffer, group)))
    }
}
