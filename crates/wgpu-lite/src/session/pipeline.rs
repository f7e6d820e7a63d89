//! Fixed layouts and pipelines for the two session modes.

use anyhow::{Context, Result};

use crate::binding;
use crate::device::SessionConfig;
use crate::geometry::Vertex;

use super::PipelineMode;

/// Threads per compute workgroup the shader is expected to declare.
pub const WORKGROUP_SIZE: u32 = 64;

pub(super) enum ActivePipeline {
    Raster {
        pipeline: wgpu::RenderPipeline,
        target_format: wgpu::TextureFormat,
    },
    Compute(wgpu::ComputePipeline),
}

impl ActivePipeline {
    pub(super) fn mode(&self) -> PipelineMode {
        match self {
            ActivePipeline::Raster { .. } => PipelineMode::Raster,
            ActivePipeline::Compute(_) => PipelineMode::Compute,
        }
    }
}

/// Bind group layouts as (type codes, visibility), in group order.
///
/// Raster: auxiliary data at group 0 when enabled.
/// Compute: auxiliary data at group 0 when enabled, then the size/output group.
pub(super) fn layout_plan(
    mode: PipelineMode,
    auxiliary: bool,
) -> Vec<(&'static str, wgpu::ShaderStages)> {
    let mut plan = Vec::with_capacity(2);
    match mode {
        PipelineMode::Raster => {
            if auxiliary {
                plan.push(("r", wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT));
            }
        }
        PipelineMode::Compute => {
            if auxiliary {
                plan.push(("r", wgpu::ShaderStages::COMPUTE));
            }
            plan.push(("rb", wgpu::ShaderStages::COMPUTE));
        }
    }
    plan
}

pub(super) fn create_layouts(
    device: &wgpu::Device,
    config: &SessionConfig,
    mode: PipelineMode,
    auxiliary: bool,
) -> Result<Vec<wgpu::BindGroupLayout>> {
    layout_plan(mode, auxiliary)
        .into_iter()
        .enumerate()
        .map(|(group, (codes, visibility))| {
            let label = config.label(&format!("bgl {group}"));
            binding::create_bind_group_layout(device, Some(label.as_str()), codes, visibility)
                .with_context(|| format!("invalid layout for bind group {group}"))
        })
        .collect()
}

fn pipeline_layout(
    device: &wgpu::Device,
    config: &SessionConfig,
    layouts: &[wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    let refs: Vec<&wgpu::BindGroupLayout> = layouts.iter().collect();
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(config.label("pipeline layout").as_str()),
        bind_group_layouts: &refs,
        immediate_size: 0,
    })
}

pub(super) fn create_raster(
    device: &wgpu::Device,
    config: &SessionConfig,
    shader: &wgpu::ShaderModule,
    layouts: &[wgpu::BindGroupLayout],
    target_format: wgpu::TextureFormat,
) -> ActivePipeline {
    let layout = pipeline_layout(device, config, layouts);

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(config.label("render pipeline").as_str()),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(config.entry_points.vertex.as_str()),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(config.entry_points.fragment.as_str()),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    log::debug!(
        "created render pipeline for {target_format:?} with {} bind group(s)",
        layouts.len()
    );

    ActivePipeline::Raster {
        pipeline,
        target_format,
    }
}

pub(super) fn create_compute(
    device: &wgpu::Device,
    config: &SessionConfig,
    shader: &wgpu::ShaderModule,
    layouts: &[wgpu::BindGroupLayout],
) -> ActivePipeline {
    let layout = pipeline_layout(device, config, layouts);

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(config.label("compute pipeline").as_str()),
        layout: Some(&layout),
        module: shader,
        entry_point: Some(config.entry_points.compute.as_str()),
        compilation_options: Default::default(),
        cache: None,
    });

    log::debug!(
        "created compute pipeline '{}' with {} bind group(s)",
        config.entry_points.compute,
        layouts.len()
    );

    ActivePipeline::Compute(pipeline)
}

/// Workgroups needed to cover `count` invocations.
#[inline]
pub fn workgroup_count(count: u32) -> u32 {
    count.div_ceil(WORKGROUP_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_plan() {
        assert!(layout_plan(PipelineMode::Raster, false).is_empty());
        assert_eq!(
            layout_plan(PipelineMode::Raster, true),
            vec![("r", wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT)]
        );
    }

    #[test]
    fn compute_plan_keeps_output_group_last() {
        assert_eq!(
            layout_plan(PipelineMode::Compute, false),
            vec![("rb", wgpu::ShaderStages::COMPUTE)]
        );
        assert_eq!(
            layout_plan(PipelineMode::Compute, true),
            vec![
                ("r", wgpu::ShaderStages::COMPUTE),
                ("rb", wgpu::ShaderStages::COMPUTE),
            ]
        );
    }

    #[test]
    fn workgroups_round_up() {
        assert_eq!(workgroup_count(0), 0);
        assert_eq!(workgroup_count(1), 1);
        assert_eq!(workgroup_count(64), 1);
        assert_eq!(workgroup_count(65), 2);
        assert_eq!(workgroup_count(1000), 16);
    }
}
