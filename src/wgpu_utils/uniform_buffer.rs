// src/wgpu_utils/uniform_buffer.rs - Per-draw uniform storage with dynamic offsets
use std::marker::PhantomData;

/// Uniform buffer holding one `Content` per draw call, addressed by dynamic
/// offset. Each entry starts on the device's uniform offset alignment.
pub struct DynamicUniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    stride: u64,
    capacity: usize,
    len: usize,
}

impl<Content: bytemuck::Pod> DynamicUniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        let pos = type_name.rfind(':').unwrap_or(0);
        if pos > 0 {
            &type_name[(pos + 1)..]
        } else {
            type_name
        }
    }

    fn create_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("DynamicUniformBuffer: {}", Self::name())),
            size: stride * capacity.max(1) as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Create a buffer with room for `capacity` entries
    pub fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<Content>() as u64, alignment);

        DynamicUniformBuffer {
            buffer: Self::create_buffer(device, stride, capacity),
            content_type: PhantomData,
            stride,
            capacity: capacity.max(1),
            len: 0,
        }
    }

    /// Writes `contents` starting at entry 0, growing the buffer if needed
    ///
    /// # Returns
    /// True if the buffer was recreated, in which case bind groups that
    /// reference it must be rebuilt
    pub fn write_all(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, contents: &[Content]) -> bool {
        let grown = contents.len() > self.capacity;
        if grown {
            self.capacity = contents.len().next_power_of_two();
            self.buffer = Self::create_buffer(device, self.stride, self.capacity);
        }

        if !contents.is_empty() {
            let mut staging = vec![0u8; self.stride as usize * contents.len()];
            for (chunk, content) in staging.chunks_mut(self.stride as usize).zip(contents) {
                let bytes = bytemuck::bytes_of(content);
                chunk[..bytes.len()].copy_from_slice(bytes);
            }
            queue.write_buffer(&self.buffer, 0, &staging);
        }
        self.len = contents.len();
        grown
    }

    /// Dynamic offset of entry `index`
    pub fn offset(&self, index: usize) -> wgpu::DynamicOffset {
        (index as u64 * self.stride) as wgpu::DynamicOffset
    }

    /// Binding covering a single entry; the draw selects which via its offset
    pub fn binding_resource(&self) -> wgpu::BindingResource {
        wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer: &self.buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<Content>() as u64),
        })
    }

    /// Get the underlying buffer
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of entries written by the last `write_all`
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Rounds `size` up to the next multiple of `alignment`
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_stride() {
        assert_eq!(aligned_stride(544, 256), 768);
        assert_eq!(aligned_stride(512, 256), 512);
        assert_eq!(aligned_stride(1, 256), 256);
        assert_eq!(aligned_stride(544, 0), 544);
    }
}
