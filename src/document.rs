use crate::layout::{Flowable, Pages, Paragraph};
use crate::page::Page;
use crate::style::State;
use std::fmt;
use std::rc::Rc;

/// A document is an ordered list of content blocks, laid out into pages on
/// demand with [Document::pages]
pub struct Document {
    pub state: State,
    pub blocks: Vec<Rc<dyn Flowable>>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("state", &self.state)
            .field("blocks", &self.blocks.len())
            .finish()
    }
}

impl Document {
    /// An empty document whose blocks start out in `state`
    pub fn new(state: State) -> Document {
        Document {
            state,
            blocks: Vec::new(),
        }
    }

    /// Add a content block to the end of the document
    pub fn push<F: Flowable + 'static>(&mut self, block: F) {
        self.blocks.push(Rc::new(block));
    }

    /// Add a paragraph of unstyled text to the end of the document
    pub fn add_paragraph<S: ToString>(&mut self, text: S) {
        self.push(Paragraph::plain(text));
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Lay the document out. `template` gives the page at each index and is
    /// expected to keep producing pages for as long as it is asked; if it
    /// stops early, layout ends with
    /// [TemplateExhausted](crate::LayoutError::TemplateExhausted).
    ///
    /// Pages are laid out lazily and yielded as soon as they are complete.
    pub fn pages<T>(&self, template: T) -> Pages
    where
        T: FnMut(usize) -> Option<Page> + 'static,
    {
        Pages::new(self.state.clone(), self.blocks.clone(), Box::new(template))
    }
}
