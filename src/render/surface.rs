use crate::simulation::Point;

/// Anything that can draw a solid line in a palette color
pub trait LineSurface {
    fn draw_line(&mut self, from: Point, to: Point, color: u8);
}

impl<S: LineSurface + ?Sized> LineSurface for &mut S {
    fn draw_line(&mut self, from: Point, to: Point, color: u8) {
        (**self).draw_line(from, to, color);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
    pub color: u8,
}

/// Records segments for later presentation. Cleared by the host each frame.
#[derive(Debug, Default)]
pub struct LineBatch {
    segments: Vec<LineSegment>,
}

impl LineBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[LineSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl LineSurface for LineBatch {
    fn draw_line(&mut self, from: Point, to: Point, color: u8) {
        self.segments.push(LineSegment { from, to, color });
    }
}
