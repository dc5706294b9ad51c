use crate::units::*;
use serde::{Deserialize, Serialize};

/// A rectangle, specified by two opposite corners. Columns and page media boxes
/// are both described by rectangles, in PDF coordinates (origin bottom-left,
/// y increasing upwards).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// The x-coordinate of the lower-left corner.
    pub x1: Pt,
    /// The y-coordinate of the lower-left corner.
    pub y1: Pt,
    /// The x-coordinate of the upper-right corner.
    pub x2: Pt,
    /// The y-coordinate of the upper-right corner.
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from its lower-left corner and its size
    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    /// Split the rectangle into `count` side-by-side columns of equal width,
    /// separated by `gutter`
    pub fn columns(&self, count: usize, gutter: Pt) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let gutters = gutter * (count - 1) as f32;
        let width = (self.width() - gutters) / count as f32;
        (0..count)
            .map(|i| {
                let x = self.x1 + (width + gutter) * i as f32;
                Rect::new(x, self.y1, width, self.height())
            })
            .collect()
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

impl From<pdf_writer::Rect> for Rect {
    fn from(r: pdf_writer::Rect) -> Self {
        Rect {
            x1: Pt(r.x1),
            y1: Pt(r.y1),
            x2: Pt(r.x2),
            y2: Pt(r.y2),
        }
    }
}
