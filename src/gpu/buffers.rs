use wgpu::{Buffer, BufferUsages, Device, Queue};

use ripple_net::config::palette_rgba;
use ripple_net::render::LineSegment;

/// Vertex capacity of a freshly created line buffer
const INITIAL_VERTEX_CAPACITY: usize = 4096;

/// One end of a line segment, in canvas coordinates (24 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Canvas-to-clip mapping passed to the line shader (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    pub canvas_size: [f32; 2],
    pub _padding: [f32; 2],
}

/// Expand recorded segments into a line-list vertex stream
pub fn build_vertices(segments: &[LineSegment], out: &mut Vec<LineVertex>) {
    out.clear();
    out.reserve(segments.len() * 2);
    for segment in segments {
        let color = palette_rgba(segment.color);
        out.push(LineVertex {
            position: [segment.from.x, segment.from.y],
            color,
        });
        out.push(LineVertex {
            position: [segment.to.x, segment.to.y],
            color,
        });
    }
}

/// Growable vertex buffer for connector lines plus the view uniform
pub struct LineBuffers {
    pub vertex_buffer: Buffer,
    pub view_params_buffer: Buffer,
    /// Capacity of `vertex_buffer` in vertices
    capacity: usize,
    /// Vertices uploaded for the current frame
    vertex_count: u32,
}

impl LineBuffers {
    pub fn new(device: &Device, queue: &Queue, canvas_width: u32, canvas_height: u32) -> Self {
        let vertex_buffer = create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY);

        let view_params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let buffers = Self {
            vertex_buffer,
            view_params_buffer,
            capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
        };
        buffers.update_view(queue, canvas_width, canvas_height);
        buffers
    }

    /// Upload this frame's vertices, doubling the buffer when they don't fit
    pub fn upload(&mut self, device: &Device, queue: &Queue, vertices: &[LineVertex]) {
        if vertices.len() > self.capacity {
            let mut capacity = self.capacity;
            while capacity < vertices.len() {
                capacity *= 2;
            }
            log::debug!("Growing line buffer to {} vertices", capacity);
            self.vertex_buffer = create_vertex_buffer(device, capacity);
            self.capacity = capacity;
        }

        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.vertex_count = vertices.len() as u32;
    }

    pub fn update_view(&self, queue: &Queue, canvas_width: u32, canvas_height: u32) {
        let params = ViewParams {
            canvas_size: [canvas_width as f32, canvas_height as f32],
            _padding: [0.0, 0.0],
        };
        queue.write_buffer(&self.view_params_buffer, 0, bytemuck::bytes_of(&params));
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

fn create_vertex_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("line-vertex-buffer"),
        size: (capacity * std::mem::size_of::<LineVertex>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
