//! Content stream assembly for laid out columns.

use crate::layout::ColumnFill;
use crate::units::Pt;
use std::io::Write;

/// Anything that can be placed in a column and drawn onto a page.
///
/// Items are positioned by their top-left corner; they extend downwards by
/// [Renderable::height].
pub trait Renderable {
    /// The vertical space the item occupies in a column
    fn height(&self) -> Pt;

    /// The PDF drawing operators for the item, with its top-left corner at
    /// `origin` and `width` available horizontally
    fn render(&self, origin: (Pt, Pt), width: Pt) -> Vec<u8>;
}

/// Renders filled columns to a single PDF content stream, wrapping each
/// placed item in its own graphics state so that no item's state can leak
/// into the next.
#[allow(clippy::write_with_newline)]
pub(crate) fn render_columns(columns: &[ColumnFill]) -> Result<Vec<u8>, std::io::Error> {
    let mut content: Vec<u8> = Vec::default();

    for column in columns.iter() {
        let width = column.column().width();
        for (origin, item) in column.placed() {
            let operators = item.render(*origin, width);
            if operators.is_empty() {
                continue;
            }
            write!(&mut content, "q\n")?;
            content.write_all(operators.as_slice())?;
            write!(&mut content, "\nQ\n")?;
        }
    }

    Ok(content)
}
