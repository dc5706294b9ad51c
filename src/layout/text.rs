//! Turning styled text into words.
//!
//! Text arrives as a sequence of [Stretch]es: runs of text, each optionally
//! preceded by a [StyleChange]. The text is tokenised on whitespace into
//! [Word]s, each made of one or more [Slug]s of uniformly styled text.

use crate::style::{State, StyleChange};
use crate::units::Pt;
use std::cell::OnceCell;

/// A run of text, preceded by an optional change of style that applies to it
/// and everything after it
#[derive(Clone, Debug)]
pub struct Stretch {
    pub change: Option<StyleChange>,
    pub text: String,
}

impl Stretch {
    /// Text in whatever style is current
    pub fn new<S: ToString>(text: S) -> Stretch {
        Stretch {
            change: None,
            text: text.to_string(),
        }
    }

    /// Text preceded by a change of style
    pub fn styled<S: ToString>(change: StyleChange, text: S) -> Stretch {
        Stretch {
            change: Some(change),
            text: text.to_string(),
        }
    }
}

/// A fragment of text in a single style, measured and encoded once.
///
/// The text is stored as encoded pieces, each preceded by the kerning
/// adjustment that applies before it, ready to be shown with a positioned
/// text operator.
#[derive(Clone, Debug)]
pub struct Slug {
    text: String,
    state: State,
    width: Pt,
    pieces: Vec<(Pt, Vec<u8>)>,
    last: Option<char>,
}

impl Slug {
    /// Measure and encode `text` in `state`. `prev` is the character that
    /// precedes the text in the same word, if any, and is kerned against.
    pub fn new(text: &str, state: &State, prev: Option<char>) -> Slug {
        let font = state.font();
        let kerning = font.kern(text, prev, state.size());

        let mut pieces = Vec::with_capacity(kerning.len() + 1);
        let mut adjustment = Pt(0.0);
        let mut start = 0usize;
        let mut chars = text.char_indices().map(|(i, _)| i).collect::<Vec<usize>>();
        chars.push(text.len());
        for &(offset, amount) in kerning.iter() {
            let split = chars[offset.min(chars.len() - 1)];
            if split > start {
                pieces.push((adjustment, font.encode(&text[start..split])));
                adjustment = Pt(0.0);
                start = split;
            }
            adjustment += amount;
        }
        if start < text.len() || pieces.is_empty() {
            pieces.push((adjustment, font.encode(&text[start..])));
        }

        let kerned: Pt = kerning.iter().map(|&(_, amount)| amount).sum();
        Slug {
            text: text.to_string(),
            state: state.clone(),
            width: state.measure(text) + kerned,
            pieces,
            last: text.chars().last(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Width of the text, including kerning
    pub fn width(&self) -> Pt {
        self.width
    }

    /// Encoded text, split wherever a kerning adjustment applies
    pub fn pieces(&self) -> &[(Pt, Vec<u8>)] {
        &self.pieces
    }

    /// The last character of the slug, for kerning against whatever follows
    pub fn last(&self) -> Option<char> {
        self.last
    }
}

/// The space that separates a word from the next one. Only present when more
/// content follows the word; it is never rendered at the end of a line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrailingSpace {
    pub width: Pt,
}

/// The two shapes a word can take
#[derive(Clone, Debug)]
pub enum WordKind {
    /// A word entirely in one style. It may be split at hyphenation points,
    /// which are looked up the first time they are needed.
    Simple {
        slug: Slug,
        hyphenated: bool,
        points: OnceCell<Vec<usize>>,
    },
    /// A word whose style changes part-way through. Each slug is paired with
    /// the change that takes effect after it. Compound words are never split.
    Compound {
        parts: Vec<(Slug, Option<StyleChange>)>,
        end: State,
    },
}

/// One whitespace-delimited token of text
#[derive(Clone, Debug)]
pub struct Word {
    kind: WordKind,
    leading: Option<StyleChange>,
    space: Option<TrailingSpace>,
}

impl Word {
    /// A single-style word
    pub fn simple(text: &str, state: &State) -> Word {
        assert!(!text.is_empty(), "words can't be empty");
        Word {
            kind: WordKind::Simple {
                slug: Slug::new(text, state, None),
                hyphenated: false,
                points: OnceCell::new(),
            },
            leading: None,
            space: None,
        }
    }

    /// A word made of several differently-styled slugs
    pub fn compound(parts: Vec<(Slug, Option<StyleChange>)>) -> Word {
        let end = match parts.last() {
            Some((slug, _)) => slug.state().clone(),
            None => panic!("words can't be empty"),
        };
        Word {
            kind: WordKind::Compound { parts, end },
            leading: None,
            space: None,
        }
    }

    /// The same word followed by a space
    pub fn with_space(self, space: TrailingSpace) -> Word {
        Word {
            space: Some(space),
            ..self
        }
    }

    /// The same word, preceded by a change of style that applies before it
    pub fn with_leading(self, leading: Option<StyleChange>) -> Word {
        Word { leading, ..self }
    }

    pub fn kind(&self) -> &WordKind {
        &self.kind
    }

    /// The style change hoisted in front of this word, if any
    pub fn leading(&self) -> Option<&StyleChange> {
        self.leading.as_ref()
    }

    pub fn space(&self) -> Option<TrailingSpace> {
        self.space
    }

    pub fn is_compound(&self) -> bool {
        matches!(self.kind, WordKind::Compound { .. })
    }

    /// Whether the word ends in a hyphen that was inserted by splitting it
    pub fn is_hyphenated(&self) -> bool {
        matches!(
            self.kind,
            WordKind::Simple {
                hyphenated: true,
                ..
            }
        )
    }

    /// All the slugs of the word, in order
    pub fn slugs(&self) -> Box<dyn Iterator<Item = &Slug> + '_> {
        match &self.kind {
            WordKind::Simple { slug, .. } => Box::new(std::iter::once(slug)),
            WordKind::Compound { parts, .. } => Box::new(parts.iter().map(|(slug, _)| slug)),
        }
    }

    /// The state in effect at the end of the word
    pub fn end_state(&self) -> &State {
        match &self.kind {
            WordKind::Simple { slug, .. } => slug.state(),
            WordKind::Compound { end, .. } => end,
        }
    }

    /// Width of the word itself, excluding any trailing space
    pub fn width(&self) -> Pt {
        self.slugs().map(Slug::width).sum()
    }

    /// Width of the trailing space, or zero if there is none
    pub fn space_width(&self) -> Pt {
        self.space.map(|s| s.width).unwrap_or_default()
    }

    /// The text as shown, including any inserted hyphen
    pub fn text(&self) -> String {
        self.slugs().map(Slug::text).collect()
    }

    /// The text of the source, without any inserted hyphen
    pub fn plain_text(&self) -> String {
        let mut text = self.text();
        if self.is_hyphenated() {
            text.pop();
        }
        text
    }

    /// Character offsets at which this word may be split. Computed by the
    /// word's hyphenator on first use and cached.
    pub fn hyphen_points(&self) -> &[usize] {
        match &self.kind {
            WordKind::Simple {
                slug,
                hyphenated,
                points,
            } => points.get_or_init(|| {
                if *hyphenated {
                    return Vec::new();
                }
                let len = slug.text().chars().count();
                let mut found = slug.state().hyphenator().hyphenate(slug.text());
                found.retain(|&p| p > 0 && p < len);
                found.sort_unstable();
                found.dedup();
                found
            }),
            WordKind::Compound { .. } => &[],
        }
    }

    /// Number of segments the hyphenation points divide the word into
    pub fn segments(&self) -> usize {
        self.hyphen_points().len() + 1
    }

    /// Width of the first `count` segments, without a hyphen
    pub fn prefix_width(&self, count: usize) -> Pt {
        if count == 0 {
            return Pt(0.0);
        }
        match &self.kind {
            WordKind::Simple { slug, .. } if count < self.segments() => {
                let end = self.hyphen_points()[count - 1];
                let text: String = slug.text().chars().take(end).collect();
                Slug::new(&text, slug.state(), None).width()
            }
            _ => self.width(),
        }
    }

    /// The segments `from..to` of this word as a new word. The result ends
    /// in an inserted hyphen when it stops short of the end of the word, and
    /// keeps the trailing space only when it reaches the end.
    pub fn fragment(&self, from: usize, to: usize) -> Word {
        let segments = self.segments();
        assert!(from < to && to <= segments, "invalid word fragment");
        if from == 0 && to == segments {
            return self.clone();
        }

        let WordKind::Simple { slug, .. } = &self.kind else {
            unreachable!("compound words have a single segment");
        };
        let points = self.hyphen_points();
        let len = slug.text().chars().count();
        let bound = |i: usize| match i {
            0 => 0,
            i if i == segments => len,
            i => points[i - 1],
        };
        let (start, end) = (bound(from), bound(to));

        let mut text: String = slug.text().chars().skip(start).take(end - start).collect();
        let hyphenated = to < segments;
        if hyphenated {
            text.push('-');
        }
        let remaining: Vec<usize> = points
            .iter()
            .filter(|&&p| p > start && p < end)
            .map(|&p| p - start)
            .collect();

        Word {
            kind: WordKind::Simple {
                slug: Slug::new(&text, slug.state(), None),
                hyphenated,
                points: OnceCell::from(if hyphenated { Vec::new() } else { remaining }),
            },
            leading: if from == 0 { self.leading.clone() } else { None },
            space: if to == segments { self.space } else { None },
        }
    }

    /// Split the word at its `index`th hyphenation point, returning the
    /// hyphenated head and the remaining tail
    pub fn split(&self, index: usize) -> (Word, Word) {
        let segments = self.segments();
        (self.fragment(0, index + 1), self.fragment(index + 1, segments))
    }
}

/// A run of text in a single state, inside a token being built
struct Run {
    state: State,
    text: String,
    change: Option<StyleChange>,
}

/// Accumulates characters into words, one token at a time
struct Tokenizer {
    state: State,
    pending: Option<StyleChange>,
    leading: Option<StyleChange>,
    runs: Vec<Run>,
    finished: Option<Word>,
    words: Vec<Word>,
}

impl Tokenizer {
    fn change(&mut self, change: &StyleChange) {
        self.state = change.apply(&self.state);
        self.pending = Some(match self.pending.take() {
            Some(pending) => pending.then(change),
            None => change.clone(),
        });
    }

    fn push(&mut self, ch: char) {
        if ch.is_whitespace() {
            self.end_token();
            return;
        }

        // more content follows the previous word, so it keeps its space
        if let Some(word) = self.finished.take() {
            let space = TrailingSpace {
                width: word.end_state().space_width(),
            };
            self.words.push(word.with_space(space));
        }

        let change = self.pending.take();
        match self.runs.last_mut() {
            None => self.leading = change,
            Some(run) => {
                if change.is_some() {
                    run.change = change;
                }
            }
        }
        if self.runs.last().map_or(true, |run| run.change.is_some()) {
            self.runs.push(Run {
                state: self.state.clone(),
                text: String::new(),
                change: None,
            });
        }
        if let Some(run) = self.runs.last_mut() {
            run.text.push(ch);
        }
    }

    fn end_token(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        let runs = std::mem::take(&mut self.runs);
        let leading = self.leading.take();

        let word = if runs.len() == 1 {
            Word::simple(&runs[0].text, &runs[0].state)
        } else {
            let mut prev: Option<(char, State)> = None;
            let parts = runs
                .into_iter()
                .map(|run| {
                    let kern_against = prev
                        .as_ref()
                        .filter(|(_, state)| state.same_font(&run.state))
                        .map(|(ch, _)| *ch);
                    let slug = Slug::new(&run.text, &run.state, kern_against);
                    prev = slug.last().map(|ch| (ch, run.state.clone()));
                    (slug, run.change)
                })
                .collect();
            Word::compound(parts)
        };
        self.finished = Some(word.with_leading(leading));
    }

    fn finish(mut self) -> Vec<Word> {
        self.end_token();
        if let Some(word) = self.finished.take() {
            self.words.push(word);
        }
        self.words
    }
}

/// Break styled text into words, starting in `state`.
///
/// Style changes that arrive before the first character of a word are hoisted
/// in front of it (see [Word::leading]); changes in the middle of a word make
/// it a compound word. Every word but the last carries a trailing space.
/// Empty or all-whitespace input gives no words.
pub fn words(stretches: &[Stretch], state: &State) -> Vec<Word> {
    let mut tokenizer = Tokenizer {
        state: state.clone(),
        pending: None,
        leading: None,
        runs: Vec::new(),
        finished: None,
        words: Vec::new(),
    };
    for stretch in stretches.iter() {
        if let Some(change) = &stretch.change {
            tokenizer.change(change);
        }
        for ch in stretch.text.chars() {
            tokenizer.push(ch);
        }
    }
    tokenizer.finish()
}
