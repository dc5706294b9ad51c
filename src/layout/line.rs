use super::text::Word;
use crate::colour::Colour;
use crate::content::Renderable;
use crate::style::State;
use crate::units::Pt;
use pdf_writer::{Content, Name, Str};

/// A line of words, as produced by a line breaker
#[derive(Clone, Debug, Default)]
pub struct Line {
    words: Vec<Word>,
    width: Pt,
    extra: Pt,
}

impl Line {
    pub fn new(words: Vec<Word>) -> Line {
        let width = natural_width(&words);
        Line {
            words,
            width,
            extra: Pt(0.0),
        }
    }

    pub fn empty() -> Line {
        Line::default()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Width of the line as it will be rendered: the words, the spaces
    /// between them and any spacing added by justification. The trailing
    /// space of the last word is never counted.
    pub fn width(&self) -> Pt {
        self.width + self.extra * self.gaps() as f32
    }

    /// Number of inter-word spaces
    pub fn gaps(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    /// The same line with its inter-word spaces widened or narrowed evenly so
    /// that it fills `width`. Lines with a single word are left alone.
    pub fn justify(&self, width: Pt) -> Line {
        let gaps = self.gaps();
        if gaps == 0 {
            return self.clone();
        }
        Line {
            extra: (width - self.width) / gaps as f32,
            ..self.clone()
        }
    }

    /// The text as shown, with single spaces between words
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(Word::text)
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// Draw the line with its baseline starting at `origin`
    pub fn render(&self, content: &mut Content, origin: (Pt, Pt)) {
        if self.words.is_empty() {
            return;
        }

        content.begin_text();
        let mut x = origin.0;
        let mut font: Option<&State> = None;
        let mut colour: Option<Colour> = None;
        for (i, word) in self.words.iter().enumerate() {
            for slug in word.slugs() {
                let state = slug.state();
                if !font.is_some_and(|f| f.same_font(state)) {
                    content.set_font(Name(state.font().resource_name().as_bytes()), *state.size());
                    font = Some(state);
                }
                if colour != Some(state.colour()) {
                    state.colour().fill(content);
                    colour = Some(state.colour());
                }

                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *origin.1]);
                {
                    let mut shown = content.show_positioned();
                    let mut items = shown.items();
                    for (adjustment, bytes) in slug.pieces() {
                        if *adjustment != Pt(0.0) {
                            // TJ adjustments are in thousandths of text space, positive moves left
                            items.adjust(-**adjustment * 1000.0 / *state.size());
                        }
                        items.show(Str(bytes));
                    }
                }

                x += slug.width();
            }
            if i + 1 < self.words.len() {
                x += word.space_width() + self.extra;
            }
        }
        content.end_text();
    }
}

fn natural_width(words: &[Word]) -> Pt {
    let count = words.len();
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i + 1 < count {
                word.width() + word.space_width()
            } else {
                word.width()
            }
        })
        .sum()
}

/// A line placed in a column, occupying one lead of vertical space
#[derive(Clone, Debug)]
pub struct LineBox {
    pub line: Line,
    pub lead: Pt,
    /// Distance from the top of the box down to the baseline
    pub ascent: Pt,
}

impl LineBox {
    /// Place `line` in boxes `lead` high, with the baseline one font size
    /// below the top of the box
    pub fn new(line: Line, lead: Pt, size: Pt) -> LineBox {
        LineBox {
            line,
            lead,
            ascent: size,
        }
    }
}

impl Renderable for LineBox {
    fn height(&self) -> Pt {
        self.lead
    }

    fn render(&self, origin: (Pt, Pt), _width: Pt) -> Vec<u8> {
        if self.line.is_empty() {
            return Vec::new();
        }
        let mut content = Content::new();
        self.line
            .render(&mut content, (origin.0, origin.1 - self.ascent));
        content.finish()
    }
}
