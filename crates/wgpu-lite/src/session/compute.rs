use std::sync::mpsc;

use anyhow::{Context, Result};

use crate::binding;

use super::{workgroup_count, Session, SubmitError, TransientBuffer};

const F32_SIZE: u64 = std::mem::size_of::<f32>() as u64;

impl Session<'_> {
    /// Runs one dispatch over `count` output elements and reads the output back.
    ///
    /// The shader sees the element count (`u32`, read-only) at binding 0 and the
    /// output array (`f32`, read-write) at binding 1 of the last bind group.
    /// Blocks until the readback buffer is mapped. The returned vector always
    /// holds exactly `count` values.
    pub fn compute(&self, count: u32, auxiliary: Option<&[f32]>) -> Result<Vec<f32>> {
        let pipeline = self.compute_pipeline()?;

        if count == 0 {
            self.check_auxiliary(auxiliary)?;
            log::trace!("compute with zero outputs; nothing to dispatch");
            return Ok(Vec::new());
        }

        let device = self.gpu.device();
        let queue = self.gpu.queue();

        let workgroups = workgroup_count(count);
        let byte_len = u64::from(count) * F32_SIZE;
        check_limits(&device.limits(), workgroups, byte_len)?;

        let aux = self.auxiliary_group(auxiliary)?;

        let size_buffer = TransientBuffer::with_contents(
            device,
            queue,
            &self.config.label("output size buffer"),
            bytemuck::bytes_of(&count),
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        );
        let output = TransientBuffer::new(
            device,
            &self.config.label("output buffer"),
            byte_len,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        );
        let readback = TransientBuffer::new(
            device,
            &self.config.label("readback buffer"),
            byte_len,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        );

        let output_layout = self
            .layouts
            .last()
            .context("compute session has no output bind group layout")?;
        let output_group = binding::create_bind_group(
            device,
            Some(self.config.label("output bind group").as_str()),
            output_layout,
            &[size_buffer.buffer(), output.buffer()],
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some(self.config.label("compute encoder").as_str()),
        });

        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(self.config.label("compute pass").as_str()),
                timestamp_writes: None,
            });

            cpass.set_pipeline(pipeline);
            let mut output_slot = 0;
            if let Some((_, group)) = aux.as_ref() {
                cpass.set_bind_group(0, group, &[]);
                output_slot = 1;
            }
            cpass.set_bind_group(output_slot, &output_group, &[]);
            cpass.dispatch_workgroups(workgroups, 1, 1);
        }

        encoder.copy_buffer_to_buffer(&output, 0, &readback, 0, byte_len);
        queue.submit(std::iter::once(encoder.finish()));
        log::trace!("compute submitted: {count} outputs in {workgroups} workgroup(s)");

        drop(aux);
        drop(size_buffer);
        drop(output);

        read_back(device, &readback)
    }
}

fn check_limits(limits: &wgpu::Limits, workgroups: u32, byte_len: u64) -> Result<(), SubmitError> {
    if workgroups > limits.max_compute_workgroups_per_dimension {
        return Err(SubmitError::TooLarge {
            what: "workgroup count",
            requested: u64::from(workgroups),
            limit: u64::from(limits.max_compute_workgroups_per_dimension),
        });
    }

    let max_binding = u64::from(limits.max_storage_buffer_binding_size);
    if byte_len > max_binding {
        return Err(SubmitError::TooLarge {
            what: "output buffer size",
            requested: byte_len,
            limit: max_binding,
        });
    }

    Ok(())
}

/// Maps `buffer` for reading, waits for the map to complete and copies it out.
fn read_back(device: &wgpu::Device, buffer: &wgpu::Buffer) -> Result<Vec<f32>> {
    let slice = buffer.slice(..);
    let (sender, receiver) = mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |res| {
        drop(sender.send(res));
    });

    device
        .poll(wgpu::PollType::wait_indefinitely())
        .context("device poll failed while waiting for readback")?;
    receiver
        .recv()
        .context("readback map callback was dropped")?
        .context("failed to map readback buffer")?;

    let values = {
        let mapped = slice.get_mapped_range();
        decode_f32s(&mapped)
    };
    buffer.unmap();
    Ok(values)
}

/// Copies native-endian `f32`s out of a byte slice of any alignment.
fn decode_f32s(bytes: &[u8]) -> Vec<f32> {
    bytemuck::pod_collect_to_vec(bytes)
}
