mod buffers;
mod context;
mod render;

pub use buffers::{build_vertices, LineBuffers, LineVertex};
pub use context::GpuContext;
pub use render::LinePipeline;
