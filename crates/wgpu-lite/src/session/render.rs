use anyhow::Result;

use crate::color::ColorRgba;
use crate::geometry::Vertex;

use super::{Session, SubmitError, TransientBuffer};

impl Session<'_> {
    /// Draws one frame to the presentation surface and presents it.
    ///
    /// `vertices` is a flat triangle list, 8 floats per vertex. Lost or outdated
    /// surfaces are reconfigured before the error is returned; callers can
    /// retry on the next frame.
    pub fn render(
        &self,
        vertices: &[f32],
        clear_color: ColorRgba,
        auxiliary: Option<&[f32]>,
    ) -> Result<()> {
        self.raster_pipeline()?;

        let frame = match self.gpu.current_texture() {
            None => return Err(SubmitError::NoSurface.into()),
            Some(Ok(frame)) => frame,
            Some(Err(error)) => {
                let action = self.gpu.handle_surface_error(&error);
                log::debug!("surface acquisition failed: {error} -> {action:?}");
                return Err(SubmitError::Surface { error, action }.into());
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.render_to(&view, vertices, clear_color, auxiliary)?;

        drop(view);
        frame.present();
        Ok(())
    }

    /// Draws one frame into `view`, which must have the session's target format.
    pub fn render_to(
        &self,
        view: &wgpu::TextureView,
        vertices: &[f32],
        clear_color: ColorRgba,
        auxiliary: Option<&[f32]>,
    ) -> Result<()> {
        let pipeline = self.raster_pipeline()?;
        if !clear_color.is_finite() {
            return Err(SubmitError::InvalidClearColor(clear_color).into());
        }

        let device = self.gpu.device();
        let queue = self.gpu.queue();

        let aux = self.auxiliary_group(auxiliary)?;

        let vertex_count = Vertex::count_in(vertices);
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            TransientBuffer::with_contents(
                device,
                queue,
                &self.config.label("vertex buffer"),
                bytemuck::cast_slice(vertices),
                wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            )
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(self.config.label("render encoder").as_str()),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(self.config.label("render pass").as_str()),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(pipeline);
            if let Some((_, group)) = aux.as_ref() {
                rpass.set_bind_group(0, group, &[]);
            }

            if let Some(vbo) = vertex_buffer.as_ref().filter(|_| vertex_count > 0) {
                rpass.set_vertex_buffer(0, vbo.slice(..));
                rpass.draw(0..vertex_count, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        log::trace!("render submitted: {vertex_count} vertices");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::quad_to_triangles;
    use crate::session::PipelineMode;
    use crate::session::testing::headless;

    const SIZE: u32 = 4;

    const PLAIN: &str = r#"
struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vtxMain(@location(0) position: vec4<f32>, @location(1) color: vec4<f32>) -> VertexOut {
    var out: VertexOut;
    out.position = position;
    out.color = color;
    return out;
}

@fragment
fn fragMain(in: VertexOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

    const TINTED: &str = r#"
@group(0) @binding(0) var<storage, read> tint: array<f32>;

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vtxMain(@location(0) position: vec4<f32>, @location(1) color: vec4<f32>) -> VertexOut {
    var out: VertexOut;
    out.position = position;
    out.color = color;
    return out;
}

@fragment
fn fragMain(in: VertexOut) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color.rgb * tint[0], in.color.a);
}
"#;

    /// Full-viewport quad in one solid color.
    fn full_quad(color: [f32; 4]) -> Vec<f32> {
        let corners = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];
        let flat: Vec<f32> = corners
            .iter()
            .flat_map(|[x, y]| [*x, *y, 0.0, 1.0].into_iter().chain(color))
            .collect();
        quad_to_triangles(&flat).unwrap()
    }

    fn target(session: &Session<'_>) -> wgpu::Texture {
        session
            .gpu()
            .device()
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("test target"),
                size: wgpu::Extent3d {
                    width: SIZE,
                    height: SIZE,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
    }

    /// Reads back the top-left pixel of a `SIZE`x`SIZE` RGBA8 texture.
    fn first_pixel(session: &Session<'_>, texture: &wgpu::Texture) -> [u8; 4] {
        let device = session.gpu().device();
        let padded_bpr = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("test readback"),
            size: u64::from(padded_bpr * SIZE),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&Default::default());
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bpr),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        session.gpu().queue().submit([encoder.finish()]);

        let slice = readback.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| drop(sender.send(res)));
        device.poll(wgpu::PollType::wait_indefinitely()).unwrap();
        receiver.recv().unwrap().unwrap();

        let mapped = slice.get_mapped_range();
        [mapped[0], mapped[1], mapped[2], mapped[3]]
    }

    #[test]
    fn empty_vertices_only_clear() {
        let Some(session) = headless(PLAIN, PipelineMode::Raster, false) else { return };
        let texture = target(&session);
        let view = texture.create_view(&Default::default());

        session
            .render_to(&view, &[], ColorRgba::new(0.0, 1.0, 0.0, 1.0), None)
            .unwrap();

        assert_eq!(first_pixel(&session, &texture), [0, 255, 0, 255]);
    }

    #[test]
    fn quad_covers_target() {
        let Some(session) = headless(PLAIN, PipelineMode::Raster, false) else { return };
        let texture = target(&session);
        let view = texture.create_view(&Default::default());

        let vertices = full_quad([1.0, 0.0, 0.0, 1.0]);
        session
            .render_to(&view, &vertices, ColorRgba::new(0.0, 0.0, 1.0, 1.0), None)
            .unwrap();

        assert_eq!(first_pixel(&session, &texture), [255, 0, 0, 255]);
    }

    #[test]
    fn auxiliary_data_reaches_fragment_stage() {
        let Some(session) = headless(TINTED, PipelineMode::Raster, true) else { return };
        let texture = target(&session);
        let view = texture.create_view(&Default::default());

        let vertices = full_quad([1.0, 1.0, 1.0, 1.0]);
        session
            .render_to(&view, &vertices, ColorRgba::black(), Some(&[0.0]))
            .unwrap();

        assert_eq!(first_pixel(&session, &texture), [0, 0, 0, 255]);
    }

    #[test]
    fn enabled_slot_without_data_binds_placeholder() {
        let Some(session) = headless(TINTED, PipelineMode::Raster, true) else { return };
        let texture = target(&session);
        let view = texture.create_view(&Default::default());

        let vertices = full_quad([1.0, 1.0, 1.0, 1.0]);
        session
            .render_to(&view, &vertices, ColorRgba::white(), None)
            .unwrap();

        // Placeholder tint is zero.
        assert_eq!(first_pixel(&session, &texture), [0, 0, 0, 255]);
    }

    #[test]
    fn auxiliary_without_slot_is_rejected() {
        let Some(session) = headless(PLAIN, PipelineMode::Raster, false) else { return };
        let texture = target(&session);
        let view = texture.create_view(&Default::default());

        let err = session
            .render_to(&view, &[], ColorRgba::black(), Some(&[1.0]))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SubmitError>(),
            Some(SubmitError::AuxiliaryDisabled)
        ));
    }

    #[test]
    fn non_finite_clear_color_is_rejected() {
        let Some(session) = headless(PLAIN, PipelineMode::Raster, false) else { return };
        let texture = target(&session);
        let view = texture.create_view(&Default::default());

        let clear = ColorRgba::new(0.0, f32::INFINITY, 0.0, 1.0);
        let err = session.render_to(&view, &[], clear, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SubmitError>(),
            Some(SubmitError::InvalidClearColor(_))
        ));
    }

    #[test]
    fn render_without_surface_is_rejected() {
        let Some(session) = headless(PLAIN, PipelineMode::Raster, false) else { return };
        let err = session.render(&[], ColorRgba::black(), None).unwrap_err();
        assert!(matches!(err.downcast_ref::<SubmitError>(), Some(SubmitError::NoSurface)));
    }
}
