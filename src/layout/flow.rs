//! Flowing content through columns and pages.
//!
//! Content blocks are placed one after the other into a single stream of
//! columns, taken in order from an endless sequence of pages. Pages are
//! emitted as soon as content has moved past all their columns, so only the
//! page being filled is ever held in memory.

use super::tee::{fork, Fork};
use crate::content::{render_columns, Renderable};
use crate::error::LayoutError;
use crate::page::{Page, RenderedPage};
use crate::rect::Rect;
use crate::style::State;
use crate::units::Pt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Rounding slack when working out how many lines fit a column
const CAPACITY_EPSILON: f32 = 1e-4;

/// A column and the items placed in it so far, top to bottom
#[derive(Clone)]
pub struct ColumnFill {
    column: Rect,
    placed: Vec<((Pt, Pt), Rc<dyn Renderable>)>,
    height_free: Pt,
}

impl fmt::Debug for ColumnFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnFill")
            .field("column", &self.column)
            .field("placed", &self.placed.len())
            .field("height_free", &self.height_free)
            .finish()
    }
}

impl ColumnFill {
    pub fn new(column: Rect) -> ColumnFill {
        ColumnFill {
            column,
            placed: Vec::new(),
            height_free: column.height(),
        }
    }

    pub fn column(&self) -> &Rect {
        &self.column
    }

    /// The items placed so far, with the top-left corner of each
    pub fn placed(&self) -> &[((Pt, Pt), Rc<dyn Renderable>)] {
        &self.placed
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// Vertical space left below the items placed so far
    pub fn height_free(&self) -> Pt {
        self.height_free
    }

    /// Where the next item goes: the top-left corner of the free space
    pub fn cursor(&self) -> (Pt, Pt) {
        (self.column.x1, self.column.y1 + self.height_free)
    }

    pub fn fits(&self, height: Pt) -> bool {
        *height <= *self.height_free + CAPACITY_EPSILON
    }

    /// How many lines `lead` apart fit in the free space. A column that
    /// holds nothing yet always takes at least one line.
    pub fn capacity(&self, lead: Pt) -> usize {
        assert!(*lead > 0.0, "line lead must be positive");
        let lines = (*self.height_free / *lead + CAPACITY_EPSILON).floor().max(0.0) as usize;
        if lines == 0 && self.placed.is_empty() {
            1
        } else {
            lines
        }
    }

    /// Place `item` at the cursor. Items taller than the free space are
    /// placed anyway and use up the rest of the column.
    pub fn place(mut self, item: Rc<dyn Renderable>) -> ColumnFill {
        let height = item.height();
        self.placed.push((self.cursor(), item));
        self.height_free = (self.height_free - height).max(Pt(0.0));
        self
    }
}

/// The stream of columns content is placed into.
///
/// Clones share the same stream. Columns that were taken but not used can be
/// put back with [Columns::unread] so that the next reader gets them first.
#[derive(Clone)]
pub struct Columns {
    inner: Rc<RefCell<ColumnsInner>>,
}

struct ColumnsInner {
    unread: VecDeque<ColumnFill>,
    source: Box<dyn Iterator<Item = ColumnFill>>,
}

impl Columns {
    pub fn new<I>(source: I) -> Columns
    where
        I: Iterator<Item = ColumnFill> + 'static,
    {
        Columns {
            inner: Rc::new(RefCell::new(ColumnsInner {
                unread: VecDeque::new(),
                source: Box::new(source),
            })),
        }
    }

    /// Put columns back at the front of the stream, in order
    pub fn unread(&self, columns: Vec<ColumnFill>) {
        let mut inner = self.inner.borrow_mut();
        for column in columns.into_iter().rev() {
            inner.unread.push_front(column);
        }
    }

    /// Take the first column that was put back, without pulling a new one
    fn take_unread(&self) -> Option<ColumnFill> {
        self.inner.borrow_mut().unread.pop_front()
    }
}

impl Iterator for Columns {
    type Item = ColumnFill;

    fn next(&mut self) -> Option<Self::Item> {
        let mut inner = self.inner.borrow_mut();
        match inner.unread.pop_front() {
            Some(column) => Some(column),
            None => inner.source.next(),
        }
    }
}

/// The columns a content block completed, in order
pub type Filled = Box<dyn Iterator<Item = Result<ColumnFill, LayoutError>>>;

/// A block of content that can be flowed through columns.
///
/// Placing takes columns from `columns` only as they are needed and yields
/// every column it took, filled or not, except columns it puts back with
/// [Columns::unread]. The last column yielded may be continued by the next
/// block.
pub trait Flowable {
    fn place(self: Rc<Self>, state: State, columns: Columns) -> Filled;
}

/// A page being filled: the columns already filled and the ones still to come
#[derive(Clone, Debug)]
pub struct PageFill {
    index: usize,
    page: Rc<Page>,
    todo: VecDeque<ColumnFill>,
    done: Vec<ColumnFill>,
}

impl PageFill {
    pub fn new(index: usize, page: Page) -> PageFill {
        let todo = page.columns.iter().copied().map(ColumnFill::new).collect();
        PageFill {
            index,
            page: Rc::new(page),
            todo,
            done: Vec::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn todo(&self) -> &VecDeque<ColumnFill> {
        &self.todo
    }

    pub fn done(&self) -> &[ColumnFill] {
        &self.done
    }

    pub fn is_complete(&self) -> bool {
        self.todo.is_empty()
    }

    fn has_content(&self) -> bool {
        self.done.iter().any(|c| !c.is_empty())
    }

    /// Record the final state of the next column of this page
    fn receive(&mut self, column: ColumnFill) {
        self.todo.pop_front();
        self.done.push(column);
        debug_assert_eq!(self.done.len() + self.todo.len(), self.page.columns.len());
    }

    fn render(&self) -> Result<RenderedPage, LayoutError> {
        log::trace!("rendering page {}", self.index);
        Ok(RenderedPage {
            index: self.index,
            media_box: self.page.media_box,
            content: render_columns(&self.done)?,
        })
    }
}

/// The caller's page template: gives the page at each index
pub type Template = Box<dyn FnMut(usize) -> Option<Page>>;

/// Consecutive pages without columns tolerated before layout gives up
const MAX_BLANK_PAGES: usize = 64;

/// Why the page stream ended early
#[derive(Copy, Clone, Debug)]
enum Exhausted {
    Template(usize),
    Blank(usize),
}

struct PageSource {
    template: Template,
    index: usize,
    blank: usize,
    exhausted: Rc<Cell<Option<Exhausted>>>,
}

impl Iterator for PageSource {
    type Item = PageFill;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted.get().is_some() {
            return None;
        }
        match (self.template)(self.index) {
            Some(page) => {
                log::trace!("pulled page {}", self.index);
                if page.columns.is_empty() {
                    self.blank += 1;
                    if self.blank > MAX_BLANK_PAGES {
                        log::error!("{} pages in a row without columns", self.blank);
                        self.exhausted.set(Some(Exhausted::Blank(self.index)));
                        return None;
                    }
                } else {
                    self.blank = 0;
                }
                let fill = PageFill::new(self.index, page);
                self.index += 1;
                Some(fill)
            }
            None => {
                log::error!("page template produced no page for index {}", self.index);
                self.exhausted.set(Some(Exhausted::Template(self.index)));
                None
            }
        }
    }
}

/// Lays out content blocks across pages, yielding each page once it is
/// complete. See [crate::Document::pages].
pub struct Pages {
    state: State,
    blocks: VecDeque<Rc<dyn Flowable>>,
    /// The placement side of the page stream, flattened into columns
    columns: Columns,
    /// The emission side of the page stream
    pages: Fork<PageSource>,
    exhausted: Rc<Cell<Option<Exhausted>>>,
    filling: Option<Filled>,
    /// The page receiving finished columns
    current: Option<PageFill>,
    /// The last column a block yielded, which may still change
    held: Option<ColumnFill>,
    /// Whether a column was handed back when the last block finished
    reopened: bool,
    ready: VecDeque<RenderedPage>,
    finished: bool,
}

impl Pages {
    pub fn new(state: State, blocks: Vec<Rc<dyn Flowable>>, template: Template) -> Pages {
        let exhausted = Rc::new(Cell::new(None));
        let source = PageSource {
            template,
            index: 0,
            blank: 0,
            exhausted: exhausted.clone(),
        };
        let (placement, emission) = fork(source);
        let columns = Columns::new(placement.flat_map(|page| page.todo.into_iter()));
        Pages {
            state,
            blocks: blocks.into(),
            columns,
            pages: emission,
            exhausted,
            filling: None,
            current: None,
            held: None,
            reopened: false,
            ready: VecDeque::new(),
            finished: false,
        }
    }

    fn exhaustion(&self) -> LayoutError {
        match self.exhausted.get() {
            Some(Exhausted::Template(index)) => LayoutError::TemplateExhausted(index),
            Some(Exhausted::Blank(index)) => LayoutError::NoColumns {
                index,
                count: MAX_BLANK_PAGES + 1,
            },
            None => LayoutError::ColumnsExhausted,
        }
    }

    /// Advance the layout by one column or one block
    fn step(&mut self) -> Result<(), LayoutError> {
        if let Some(filling) = self.filling.as_mut() {
            match filling.next() {
                Some(Ok(column)) => {
                    self.reopened = false;
                    if let Some(previous) = self.held.replace(column) {
                        self.complete(previous)?;
                    }
                }
                Some(Err(LayoutError::ColumnsExhausted)) => return Err(self.exhaustion()),
                Some(Err(e)) => return Err(e),
                None => {
                    self.filling = None;
                    if let Some(held) = self.held.take() {
                        self.columns.unread(vec![held]);
                        self.reopened = true;
                    }
                }
            }
            return Ok(());
        }

        if let Some(block) = self.blocks.pop_front() {
            self.filling = Some(block.place(self.state.clone(), self.columns.clone()));
            return Ok(());
        }

        self.finish()?;
        self.finished = true;
        Ok(())
    }

    /// The page receiving columns, pulling the next one if needed. Pages
    /// without columns are emitted blank as they go by.
    fn current_page(&mut self) -> Result<&mut PageFill, LayoutError> {
        while self.current.is_none() {
            let page = self.pages.next().ok_or_else(|| self.exhaustion())?;
            if page.is_complete() {
                self.ready.push_back(page.render()?);
            } else {
                self.current = Some(page);
            }
        }
        self.current.as_mut().ok_or(LayoutError::ColumnsExhausted)
    }

    /// Accept the final state of the next column in the stream
    fn complete(&mut self, column: ColumnFill) -> Result<(), LayoutError> {
        let page = self.current_page()?;
        page.receive(column);
        if page.is_complete() {
            let rendered = page.render()?;
            log::debug!("page {} complete", rendered.index);
            self.ready.push_back(rendered);
            self.current = None;
        }
        Ok(())
    }

    /// Close the page still open after the last block, if it has content
    fn finish(&mut self) -> Result<(), LayoutError> {
        if self.reopened {
            if let Some(column) = self.columns.take_unread() {
                self.complete(column)?;
            }
        }
        if let Some(page) = self.current.take() {
            if page.has_content() {
                self.ready.push_back(page.render()?);
            }
        }
        Ok(())
    }
}

impl Iterator for Pages {
    type Item = Result<RenderedPage, LayoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(page) = self.ready.pop_front() {
                return Some(Ok(page));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.step() {
                self.finished = true;
                self.ready.clear();
                return Some(Err(e));
            }
        }
    }
}

/// Vertical space between blocks. A spacer that doesn't fit ends the column,
/// and one at the top of a column is dropped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spacer {
    pub height: Pt,
}

impl Spacer {
    pub fn new(height: Pt) -> Spacer {
        Spacer { height }
    }
}

impl Renderable for Spacer {
    fn height(&self) -> Pt {
        self.height
    }

    fn render(&self, _origin: (Pt, Pt), _width: Pt) -> Vec<u8> {
        Vec::new()
    }
}

impl Flowable for Spacer {
    fn place(self: Rc<Self>, _state: State, mut columns: Columns) -> Filled {
        let Some(column) = columns.next() else {
            return Box::new(std::iter::once(Err(LayoutError::ColumnsExhausted)));
        };
        if column.is_empty() {
            return Box::new(std::iter::once(Ok(column)));
        }
        // a spacer taller than the free space uses up the column, so the next
        // block starts in a fresh one
        Box::new(std::iter::once(Ok(column.place(self))))
    }
}
