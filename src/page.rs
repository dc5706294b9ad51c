use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// Margins around the content area of a page
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins::trbl(value, value, value, value)
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// Add a binding gutter on the inside edge of the page: on the left of
    /// even-indexed pages and on the right of odd-indexed ones
    pub fn with_gutter(&self, gutter: Pt, page_index: usize) -> Margins {
        if page_index % 2 == 0 {
            Margins {
                left: self.left + gutter,
                ..*self
            }
        } else {
            Margins {
                right: self.right + gutter,
                ..*self
            }
        }
    }
}

/// A page template: the size of the page and the columns that content flows
/// through, in reading order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub media_box: Rect,
    pub columns: Vec<Rect>,
}

impl Page {
    /// A page with a single column filling the area inside the margins
    pub fn new(size: PageSize, margins: Margins) -> Page {
        Page::with_columns(size, margins, 1, Pt(0.0))
    }

    /// A page with `count` equal columns inside the margins, `gutter` apart
    pub fn with_columns(size: PageSize, margins: Margins, count: usize, gutter: Pt) -> Page {
        let media_box = Rect::new(Pt(0.0), Pt(0.0), size.0, size.1);
        Page {
            media_box,
            columns: content_box(&media_box, &margins).columns(count, gutter),
        }
    }
}

fn content_box(media_box: &Rect, margins: &Margins) -> Rect {
    Rect {
        x1: media_box.x1 + margins.left,
        y1: media_box.y1 + margins.bottom,
        x2: media_box.x2 - margins.right,
        y2: media_box.y2 - margins.top,
    }
}

/// A laid out page, ready to be written into a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Zero-based index of the page in the document
    pub index: usize,
    pub media_box: Rect,
    /// The page's content stream
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagesize;

    #[test]
    fn single_column_fills_the_margins() {
        let page = Page::new(pagesize::LETTER, Margins::all(Pt(72.0)));
        assert_eq!(page.columns.len(), 1);
        assert_eq!(page.columns[0], Rect::new(Pt(72.0), Pt(72.0), Pt(468.0), Pt(648.0)));
    }

    #[test]
    fn columns_split_the_content_box() {
        let size = (Pt(300.0), Pt(400.0));
        let page = Page::with_columns(size, Margins::all(Pt(20.0)), 2, Pt(20.0));
        assert_eq!(page.columns.len(), 2);
        assert_eq!(page.columns[0].width(), Pt(120.0));
        assert_eq!(page.columns[1].x1, Pt(160.0));
    }

    #[test]
    fn gutter_alternates() {
        let margins = Margins::all(Pt(10.0));
        assert_eq!(margins.with_gutter(Pt(5.0), 0).left, Pt(15.0));
        assert_eq!(margins.with_gutter(Pt(5.0), 1).right, Pt(15.0));
    }
}
