mod colour;
pub use colour::*;

mod content;
pub use content::Renderable;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod hyphenate;
pub use hyphenate::*;

/// Breaking text into lines and flowing it through columns and pages
pub mod layout;

mod page;
pub use page::*;

pub mod pagesize;

mod rect;
pub use rect::*;

mod style;
pub use style::*;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
