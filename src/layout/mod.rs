//! Laying out styled text in columns across pages.
//!
//! Text flows through these stages:
//!
//! - [`text`] splits styled text into [`Word`]s
//! - [`greedy`] or [`knuth_plass`] breaks words into [`Line`]s
//! - [`columns`] assigns lines to columns, fixing orphans and widows
//! - [`flow`] places content blocks into columns and emits finished pages
//!
//! # Example
//!
//! ```
//! use pdf_flow::{Document, Margins, Page, Pt, State, SyntheticFont};
//! use pdf_flow::layout::Paragraph;
//! use pdf_flow::pagesize;
//! use std::rc::Rc;
//!
//! let state = State::new(Rc::new(SyntheticFont::new("F0", 0.5)), Pt(12.0));
//! let mut doc = Document::new(state);
//! doc.push(Paragraph::plain("Beautiful is better than ugly."));
//!
//! let pages = doc.pages(|_| {
//!     Some(Page::with_columns(pagesize::LETTER, Margins::all(Pt(72.0)), 2, Pt(18.0)))
//! });
//! for page in pages {
//!     let page = page.expect("page lays out");
//!     assert!(!page.content.is_empty());
//! }
//! ```

pub mod columns;
pub mod flow;
pub mod greedy;
pub mod knuth_plass;
mod line;
mod paragraph;
pub mod tee;
pub mod text;

pub use columns::ColumnQueue;
pub use flow::{ColumnFill, Columns, Filled, Flowable, PageFill, Pages, Spacer, Template};
pub use greedy::Wrapper;
pub use knuth_plass::{Align, Break, BreakParams, KnuthPlass};
pub use line::*;
pub use paragraph::*;
pub use text::{words, Slug, Stretch, TrailingSpace, Word, WordKind};
