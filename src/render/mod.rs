mod connections;
mod surface;

pub use connections::ConnectionRenderer;
pub use surface::{LineBatch, LineSegment, LineSurface};
