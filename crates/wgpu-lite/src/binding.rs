//! Bind-group layout and bind-group construction from short type codes.
//!
//! A type code string has one character per binding slot: `r` for a
//! read-only storage buffer, `b` for a read-write ("both") storage buffer.

use std::fmt;

/// Storage buffer access for one binding slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferAccess {
    ReadOnly,
    ReadWrite,
}

impl BufferAccess {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(BufferAccess::ReadOnly),
            'b' => Some(BufferAccess::ReadWrite),
            _ => None,
        }
    }

    fn binding_type(self) -> wgpu::BindingType {
        wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage {
                read_only: self == BufferAccess::ReadOnly,
            },
            has_dynamic_offset: false,
            min_binding_size: None,
        }
    }
}

/// Unknown character in a type code string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCodeError {
    pub code: char,
    pub position: usize,
}

impl fmt::Display for TypeCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown buffer type code {:?} at position {} (expected 'r' or 'b')",
            self.code, self.position
        )
    }
}

impl std::error::Error for TypeCodeError {}

pub fn parse_type_codes(codes: &str) -> Result<Vec<BufferAccess>, TypeCodeError> {
    codes
        .chars()
        .enumerate()
        .map(|(position, code)| {
            BufferAccess::from_code(code).ok_or(TypeCodeError { code, position })
        })
        .collect()
}

/// Layout entries for `codes`; binding `i` follows the `i`-th code.
pub fn layout_entries(
    codes: &str,
    visibility: wgpu::ShaderStages,
) -> Result<Vec<wgpu::BindGroupLayoutEntry>, TypeCodeError> {
    Ok(parse_type_codes(codes)?
        .into_iter()
        .enumerate()
        .map(|(i, access)| wgpu::BindGroupLayoutEntry {
            binding: i as u32,
            visibility,
            ty: access.binding_type(),
            count: None,
        })
        .collect())
}

pub fn create_bind_group_layout(
    device: &wgpu::Device,
    label: Option<&str>,
    codes: &str,
    visibility: wgpu::ShaderStages,
) -> Result<wgpu::BindGroupLayout, TypeCodeError> {
    let entries = layout_entries(codes, visibility)?;
    Ok(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label,
        entries: &entries,
    }))
}

/// Binds each buffer whole, binding `i` = `buffers[i]`.
pub fn create_bind_group(
    device: &wgpu::Device,
    label: Option<&str>,
    layout: &wgpu::BindGroupLayout,
    buffers: &[&wgpu::Buffer],
) -> wgpu::BindGroup {
    let entries: Vec<wgpu::BindGroupEntry<'_>> = buffers
        .iter()
        .enumerate()
        .map(|(i, buffer)| wgpu::BindGroupEntry {
            binding: i as u32,
            resource: buffer.as_entire_binding(),
        })
        .collect();

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label,
        layout,
        entries: &entries,
    })
}
