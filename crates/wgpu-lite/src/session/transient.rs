use std::ops::Deref;

/// A GPU buffer that lives for one submission.
///
/// The buffer is destroyed when the guard drops, including on early returns.
/// wgpu defers the actual release until queued work using it has finished.
pub(crate) struct TransientBuffer {
    buffer: wgpu::Buffer,
}

impl TransientBuffer {
    pub(crate) fn new(
        device: &wgpu::Device,
        label: &str,
        size: u64,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        });
        Self { buffer }
    }

    /// Creates a buffer sized to `contents` and queues the upload.
    ///
    /// `usage` must include `COPY_DST`.
    pub(crate) fn with_contents(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Self {
        debug_assert!(usage.contains(wgpu::BufferUsages::COPY_DST));
        let this = Self::new(device, label, contents.len() as u64, usage);
        queue.write_buffer(&this.buffer, 0, contents);
        this
    }

    pub(crate) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl Deref for TransientBuffer {
    type Target = wgpu::Buffer;

    fn deref(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

impl Drop for TransientBuffer {
    fn drop(&mut self) {
        self.buffer.destroy();
    }
}
