use crate::colour::Colour;
use crate::font::Typeface;
use crate::hyphenate::{Hyphenator, NoHyphenation};
use crate::units::Pt;
use std::fmt;
use std::rc::Rc;

/// The line spacing used by [State::new], as a multiple of the font size
pub const DEFAULT_LINE_SPACING: f32 = 1.2;

/// The complete style text is set in. States are immutable: every `with_*`
/// method returns a new state and leaves the original untouched, so a state
/// can be shared freely between words, lines, and retried layouts.
#[derive(Clone)]
pub struct State {
    font: Rc<dyn Typeface>,
    size: Pt,
    colour: Colour,
    line_spacing: f32,
    hyphenator: Rc<dyn Hyphenator>,
    lead: Pt,
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("font", &self.font.resource_name())
            .field("size", &self.size)
            .field("colour", &self.colour)
            .field("line_spacing", &self.line_spacing)
            .field("lead", &self.lead)
            .finish()
    }
}

impl State {
    /// Black text in `font` at `size`, with the default line spacing and no
    /// hyphenation
    pub fn new(font: Rc<dyn Typeface>, size: Pt) -> State {
        State {
            font,
            size,
            colour: Colour::default(),
            line_spacing: DEFAULT_LINE_SPACING,
            hyphenator: Rc::new(NoHyphenation),
            lead: size * DEFAULT_LINE_SPACING,
        }
    }

    pub fn with_font(&self, font: Rc<dyn Typeface>) -> State {
        State {
            font,
            ..self.clone()
        }
    }

    pub fn with_size(&self, size: Pt) -> State {
        State {
            size,
            lead: size * self.line_spacing,
            ..self.clone()
        }
    }

    pub fn with_colour(&self, colour: Colour) -> State {
        State {
            colour,
            ..self.clone()
        }
    }

    pub fn with_line_spacing(&self, line_spacing: f32) -> State {
        State {
            line_spacing,
            lead: self.size * line_spacing,
            ..self.clone()
        }
    }

    pub fn with_hyphenator(&self, hyphenator: Rc<dyn Hyphenator>) -> State {
        State {
            hyphenator,
            ..self.clone()
        }
    }

    pub fn font(&self) -> &dyn Typeface {
        self.font.as_ref()
    }

    pub fn size(&self) -> Pt {
        self.size
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    pub fn hyphenator(&self) -> &dyn Hyphenator {
        self.hyphenator.as_ref()
    }

    /// The distance between consecutive baselines: `size × line_spacing`
    pub fn lead(&self) -> Pt {
        self.lead
    }

    /// Width of `text` in this state, without kerning
    pub fn measure(&self, text: &str) -> Pt {
        self.font.measure(text, self.size)
    }

    /// Width of a single inter-word space
    pub fn space_width(&self) -> Pt {
        self.measure(" ")
    }

    /// Whether text in `other` can be shown without switching font or size
    pub fn same_font(&self, other: &State) -> bool {
        self.size == other.size && self.font.resource_name() == other.font.resource_name()
    }
}

/// A partial change of style: every field that is set overrides the
/// corresponding field of the state it is applied to.
#[derive(Clone, Default)]
pub struct StyleChange {
    font: Option<Rc<dyn Typeface>>,
    size: Option<Pt>,
    colour: Option<Colour>,
    line_spacing: Option<f32>,
    hyphenator: Option<Rc<dyn Hyphenator>>,
}

impl fmt::Debug for StyleChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleChange")
            .field("font", &self.font.as_ref().map(|font| font.resource_name()))
            .field("size", &self.size)
            .field("colour", &self.colour)
            .field("line_spacing", &self.line_spacing)
            .field("hyphenator", &self.hyphenator.is_some())
            .finish()
    }
}

impl StyleChange {
    pub fn new() -> StyleChange {
        StyleChange::default()
    }

    pub fn font(mut self, font: Rc<dyn Typeface>) -> StyleChange {
        self.font = Some(font);
        self
    }

    pub fn size(mut self, size: Pt) -> StyleChange {
        self.size = Some(size);
        self
    }

    pub fn colour(mut self, colour: Colour) -> StyleChange {
        self.colour = Some(colour);
        self
    }

    pub fn line_spacing(mut self, line_spacing: f32) -> StyleChange {
        self.line_spacing = Some(line_spacing);
        self
    }

    pub fn hyphenator(mut self, hyphenator: Rc<dyn Hyphenator>) -> StyleChange {
        self.hyphenator = Some(hyphenator);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.size.is_none()
            && self.colour.is_none()
            && self.line_spacing.is_none()
            && self.hyphenator.is_none()
    }

    /// The state that results from applying this change to `state`
    pub fn apply(&self, state: &State) -> State {
        let mut next = state.clone();
        if let Some(font) = &self.font {
            next = next.with_font(font.clone());
        }
        if let Some(size) = self.size {
            next = next.with_size(size);
        }
        if let Some(colour) = self.colour {
            next = next.with_colour(colour);
        }
        if let Some(line_spacing) = self.line_spacing {
            next = next.with_line_spacing(line_spacing);
        }
        if let Some(hyphenator) = &self.hyphenator {
            next = next.with_hyphenator(hyphenator.clone());
        }
        next
    }

    /// A single change equivalent to applying `self` and then `later`
    pub fn then(&self, later: &StyleChange) -> StyleChange {
        StyleChange {
            font: later.font.clone().or_else(|| self.font.clone()),
            size: later.size.or(self.size),
            colour: later.colour.or(self.colour),
            line_spacing: later.line_spacing.or(self.line_spacing),
            hyphenator: later.hyphenator.clone().or_else(|| self.hyphenator.clone()),
        }
    }
}
