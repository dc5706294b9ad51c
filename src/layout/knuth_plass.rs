//! Optimal line breaking, after Knuth and Plass.
//!
//! The whole paragraph is considered at once: every hyphenation segment of
//! every word becomes a box, and the breaker searches for the sequence of
//! breaks with the least total demerits. Line widths come from a callback
//! indexed by line number, so the paragraph can flow through columns of
//! different widths.

use super::line::Line;
use super::text::Word;
use crate::error::LayoutError;
use crate::style::State;
use crate::units::Pt;
use id_arena::{Arena, Id};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How the lines of a paragraph are aligned
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Flush left, with a ragged right edge
    #[default]
    Ragged,
    /// Flush on both sides, except for the last line
    Justified,
}

/// Tuning for the optimal line breaker. The defaults are the traditional
/// constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakParams {
    /// The largest adjustment ratio a line may have on the first pass
    pub tolerance: f32,
    pub line_penalty: f64,
    /// Penalty for ending a line in a hyphen, squared into demerits
    pub hyphen_penalty: f64,
    /// Added when two consecutive lines end in a hyphen
    pub double_hyphen_demerits: f64,
    /// Added when adjacent lines differ by more than one fitness class
    pub fitness_demerits: f64,
    /// Synthetic stretch of a ragged line, in spaces
    pub ragged_stretch: f32,
    /// How far an inter-word space may grow in justified text, as a fraction
    /// of its width
    pub justified_stretch: f32,
    /// How far an inter-word space may shrink in justified text, as a
    /// fraction of its width
    pub justified_shrink: f32,
    /// Multipliers of `tolerance` tried in turn until breaks are found. A
    /// final pass with unbounded tolerance always follows.
    pub escalation: Vec<f32>,
    /// Whether words may be broken at hyphenation points
    pub hyphenate: bool,
}

impl Default for BreakParams {
    fn default() -> Self {
        BreakParams {
            tolerance: 1.0,
            line_penalty: 10.0,
            hyphen_penalty: 50.0,
            double_hyphen_demerits: 10_000.0,
            fitness_demerits: 10_000.0,
            ragged_stretch: 3.0,
            justified_stretch: 0.5,
            justified_shrink: 1.0 / 3.0,
            escalation: vec![1.0, 2.0, 3.0, 5.0, 8.0],
            hyphenate: true,
        }
    }
}

/// A chosen line break
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Break {
    /// Number of boxes before the break
    pub position: usize,
    /// Adjustment ratio of the line ending here
    pub ratio: f32,
    /// Demerits of the line ending here alone
    pub demerits: f64,
    /// Whether the line ends in an inserted hyphen
    pub hyphen: bool,
}

#[derive(Copy, Clone, Debug, Default)]
struct Totals {
    width: Pt,
    stretch: Pt,
    shrink: Pt,
}

/// One hyphenation segment of a word. Totals are cumulative from the start
/// of the paragraph.
#[derive(Copy, Clone, Debug)]
struct Segment {
    word: usize,
    index: usize,
    before: Totals,
    after: Totals,
    hyphen_width: Pt,
    hyphen: bool,
    no_break: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Fitness {
    VeryTight,
    Tight,
    Loose,
    VeryLoose,
}

impl Fitness {
    fn from_ratio(ratio: f32) -> Fitness {
        if ratio < -0.5 {
            Fitness::VeryTight
        } else if ratio < 0.5 {
            Fitness::Tight
        } else if ratio < 1.0 {
            Fitness::Loose
        } else {
            Fitness::VeryLoose
        }
    }

    fn jumps(self, other: Fitness) -> bool {
        (self as i32 - other as i32).abs() > 1
    }
}

#[derive(Copy, Clone, Debug)]
struct Node {
    position: usize,
    line: usize,
    fitness: Fitness,
    total: f64,
    demerits: f64,
    ratio: f32,
    hyphen: bool,
    parent: Option<Id<Node>>,
}

type Active = BTreeMap<(usize, usize, Fitness), Id<Node>>;

/// Line widths by line index. Fallible, as widths may come from columns that
/// are produced on demand.
pub type WidthFn<'a> = dyn FnMut(usize) -> Result<Pt, LayoutError> + 'a;

/// A paragraph prepared for optimal breaking. Preparing is done once; breaks
/// can then be computed against any number of width functions.
#[derive(Clone, Debug)]
pub struct KnuthPlass {
    words: Vec<Word>,
    segments: Vec<Segment>,
    align: Align,
    params: BreakParams,
    ragged_stretch: Pt,
}

impl KnuthPlass {
    pub fn new(words: Vec<Word>, state: &State, align: Align, params: &BreakParams) -> KnuthPlass {
        let mut segments = Vec::new();
        let mut totals = Totals::default();
        for (w, word) in words.iter().enumerate() {
            assert!(!word.text().is_empty(), "words can't be empty");
            let count = word.segments();
            let hyphen_width = word.end_state().measure("-");
            for index in 0..count {
                let end = index + 1 == count;
                segments.push(Segment {
                    word: w,
                    index,
                    before: Totals {
                        width: totals.width + word.prefix_width(index),
                        ..totals
                    },
                    after: Totals {
                        width: totals.width + word.prefix_width(index + 1),
                        ..totals
                    },
                    hyphen_width: if end { Pt(0.0) } else { hyphen_width },
                    hyphen: !end,
                    no_break: !end && !params.hyphenate,
                });
            }

            let space = word.space_width();
            let (stretch, shrink) = match align {
                Align::Ragged => (Pt(0.0), Pt(0.0)),
                Align::Justified => (
                    space * params.justified_stretch,
                    space * params.justified_shrink,
                ),
            };
            totals = Totals {
                width: totals.width + word.width() + space,
                stretch: totals.stretch + stretch,
                shrink: totals.shrink + shrink,
            };
        }

        KnuthPlass {
            words,
            segments,
            align,
            params: params.clone(),
            ragged_stretch: state.space_width() * params.ragged_stretch,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn align(&self) -> Align {
        self.align
    }

    /// The adjustment ratio of a line from box `from` up to (not including)
    /// box `to`, set in `target`
    fn ratio(&self, from: usize, to: usize, target: Pt) -> f32 {
        let first = &self.segments[from];
        let last = &self.segments[to - 1];
        let mut length = last.after.width - first.before.width;
        if last.hyphen {
            length += last.hyphen_width;
        }

        match self.align {
            Align::Ragged => {
                let slack = *target - *length;
                if slack < 0.0 {
                    f32::NEG_INFINITY
                } else if *self.ragged_stretch > 0.0 {
                    (slack / *self.ragged_stretch).sqrt()
                } else if slack == 0.0 {
                    0.0
                } else {
                    f32::INFINITY
                }
            }
            Align::Justified => {
                let slack = *target - *length;
                let stretch = *last.after.stretch - *first.before.stretch;
                let shrink = *last.after.shrink - *first.before.shrink;
                if slack > 0.0 {
                    if stretch > 0.0 {
                        slack / stretch
                    } else {
                        f32::INFINITY
                    }
                } else if slack < 0.0 {
                    if shrink > 0.0 {
                        slack / shrink
                    } else {
                        f32::NEG_INFINITY
                    }
                } else {
                    0.0
                }
            }
        }
    }

    fn demerits(&self, ratio: f32, hyphen: bool, parent: &Node, fitness: Fitness) -> f64 {
        let badness = (100.0 * (ratio.abs() as f64).powi(3)).min(10_000.0);
        let mut demerits = (self.params.line_penalty + badness).powi(2);
        if hyphen {
            demerits += self.params.hyphen_penalty.powi(2);
            if parent.hyphen {
                demerits += self.params.double_hyphen_demerits;
            }
        }
        if fitness.jumps(parent.fitness) {
            demerits += self.params.fitness_demerits;
        }
        demerits
    }

    /// Find the optimal breaks, widening the tolerance until some are found.
    /// An empty paragraph has no breaks.
    pub fn breaks(&self, width: &mut WidthFn<'_>) -> Result<Vec<Break>, LayoutError> {
        if self.segments.is_empty() {
            return Ok(Vec::new());
        }

        let mut widths: Vec<Pt> = Vec::new();
        for &factor in self.params.escalation.iter() {
            let tolerance = self.params.tolerance * factor;
            if let Some(breaks) = self.pass(tolerance, &mut widths, width)? {
                return Ok(breaks);
            }
            log::debug!("no feasible breaks at tolerance {tolerance}, widening");
        }
        self.pass(f32::INFINITY, &mut widths, width)?
            .ok_or(LayoutError::Infeasible)
    }

    fn line_width(
        &self,
        line: usize,
        widths: &mut Vec<Pt>,
        width: &mut WidthFn<'_>,
    ) -> Result<Pt, LayoutError> {
        while widths.len() <= line {
            widths.push(width(widths.len())?);
        }
        Ok(widths[line])
    }

    fn pass(
        &self,
        tolerance: f32,
        widths: &mut Vec<Pt>,
        width: &mut WidthFn<'_>,
    ) -> Result<Option<Vec<Break>>, LayoutError> {
        let count = self.segments.len();
        let mut arena: Arena<Node> = Arena::new();
        let mut active: Active = BTreeMap::new();
        let root = arena.alloc(Node {
            position: 0,
            line: 0,
            fitness: Fitness::Tight,
            total: 0.0,
            demerits: 0.0,
            ratio: 0.0,
            hyphen: false,
            parent: None,
        });
        active.insert((0, 0, Fitness::Tight), root);

        for position in 1..=count {
            let last = position == count;
            if !last && self.segments[position - 1].no_break {
                continue;
            }
            let hyphen = !last && self.segments[position - 1].hyphen;

            let mut found: Active = BTreeMap::new();
            let mut dropped: Option<Id<Node>> = None;
            let keys: Vec<(usize, usize, Fitness)> = active.keys().copied().collect();
            for key in keys {
                let Some(&id) = active.get(&key) else {
                    continue;
                };
                let node = arena[id];
                let target = self.line_width(node.line, widths, width)?;
                let mut ratio = self.ratio(node.position, position, target);

                if ratio < -1.0 {
                    active.remove(&key);
                    let closer = dropped.map_or(true, |d| {
                        let d = &arena[d];
                        (node.position, -node.total) > (d.position, -d.total)
                    });
                    if closer {
                        dropped = Some(id);
                    }
                    continue;
                }
                if last {
                    ratio = ratio.min(0.0);
                }
                if ratio > tolerance {
                    continue;
                }

                let fitness = Fitness::from_ratio(ratio);
                let demerits = self.demerits(ratio, hyphen, &node, fitness);
                let total = node.total + demerits;
                let key = (node.line + 1, position, fitness);
                if found.get(&key).map_or(true, |&best| arena[best].total > total) {
                    let next = arena.alloc(Node {
                        position,
                        line: node.line + 1,
                        fitness,
                        total,
                        demerits,
                        ratio,
                        hyphen,
                        parent: Some(id),
                    });
                    found.insert(key, next);
                }
            }

            if found.is_empty() && active.is_empty() {
                match dropped {
                    Some(parent) if tolerance.is_infinite() => {
                        let node = arena[parent];
                        log::warn!(
                            "overfull line from box {} to box {}",
                            node.position,
                            position
                        );
                        let demerits = self.demerits(-1.0, hyphen, &node, Fitness::VeryTight);
                        let next = arena.alloc(Node {
                            position,
                            line: node.line + 1,
                            fitness: Fitness::VeryTight,
                            total: node.total + demerits,
                            demerits,
                            ratio: -1.0,
                            hyphen,
                            parent: Some(parent),
                        });
                        found.insert((node.line + 1, position, Fitness::VeryTight), next);
                    }
                    _ => return Ok(None),
                }
            }
            active.extend(found);
        }

        let best = active
            .iter()
            .filter(|((_, position, _), _)| *position == count)
            .map(|(_, &id)| id)
            .min_by(|&a, &b| arena[a].total.total_cmp(&arena[b].total));
        let Some(mut id) = best else {
            return Ok(None);
        };

        let mut breaks = Vec::new();
        while let Some(parent) = arena[id].parent {
            let node = &arena[id];
            breaks.push(Break {
                position: node.position,
                ratio: node.ratio,
                demerits: node.demerits,
                hyphen: node.hyphen,
            });
            id = parent;
        }
        breaks.reverse();
        Ok(Some(breaks))
    }

    /// Build the lines between consecutive breaks. Words cut by a break are
    /// split into hyphenated fragments.
    pub fn lines(&self, breaks: &[Break]) -> Vec<Line> {
        let mut lines = Vec::with_capacity(breaks.len());
        let mut start = 0usize;
        for b in breaks.iter() {
            let mut words: Vec<Word> = Vec::new();
            let mut position = start;
            while position < b.position {
                let segment = &self.segments[position];
                let word = &self.words[segment.word];
                let from = segment.index;
                let remaining = word.segments() - from;
                let to = from + remaining.min(b.position - position);
                words.push(word.fragment(from, to));
                position += to - from;
            }
            lines.push(Line::new(words));
            start = b.position;
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::SyntheticFont;
    use crate::hyphenate::Dictionary;
    use crate::layout::text::{words, Stretch};
    use std::rc::Rc;

    fn state() -> State {
        State::new(Rc::new(SyntheticFont::new("F0", 0.5)), Pt(10.0))
    }

    fn breaker(text: &str, state: &State, align: Align) -> KnuthPlass {
        KnuthPlass::new(
            words(&[Stretch::new(text)], state),
            state,
            align,
            &BreakParams::default(),
        )
    }

    fn texts(breaker: &KnuthPlass, width: Pt) -> Vec<String> {
        let breaks = breaker
            .breaks(&mut |_| Ok(width))
            .expect("can break");
        breaker.lines(&breaks).iter().map(Line::text).collect()
    }

    #[test]
    fn empty_paragraphs_have_no_breaks() {
        let breaker = breaker("", &state(), Align::Ragged);
        assert!(breaker.breaks(&mut |_| Ok(Pt(100.0))).expect("can break").is_empty());
    }

    #[test]
    fn short_paragraph_is_one_line() {
        let breaker = breaker("aa bb cc", &state(), Align::Ragged);
        assert_eq!(texts(&breaker, Pt(100.0)), vec!["aa bb cc"]);
    }

    #[test]
    fn balances_ragged_lines() {
        // first-fit would give "aaaa bb cc" / "dddddd"
        let breaker = breaker("aaaa bb cc dddddd", &state(), Align::Ragged);
        let lines = texts(&breaker, Pt(55.0));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.join(" "), "aaaa bb cc dddddd");
    }

    #[test]
    fn uses_per_line_widths() {
        let breaker = breaker("aa bb cc dd", &state(), Align::Ragged);
        let breaks = breaker
            .breaks(&mut |line| Ok(if line == 0 { Pt(10.0) } else { Pt(100.0) }))
            .expect("can break");
        let lines: Vec<String> = breaker.lines(&breaks).iter().map(Line::text).collect();
        assert_eq!(lines, vec!["aa", "bb cc dd"]);
    }

    #[test]
    fn width_errors_propagate() {
        let breaker = breaker("aa bb cc dd", &state(), Align::Ragged);
        let result = breaker.breaks(&mut |line| {
            if line == 0 {
                Ok(Pt(10.0))
            } else {
                Err(LayoutError::ColumnsExhausted)
            }
        });
        assert!(matches!(result, Err(LayoutError::ColumnsExhausted)));
    }

    #[test]
    fn overfull_words_still_break() {
        let breaker = breaker("aa extraordinary bb", &state(), Align::Ragged);
        let lines = texts(&breaker, Pt(20.0));
        assert_eq!(lines, vec!["aa", "extraordinary", "bb"]);
    }

    #[test]
    fn hyphenates_when_it_helps() {
        let dict = Dictionary::new().with_pattern("beau-ti-ful");
        let state = state().with_hyphenator(Rc::new(dict));
        let breaker = breaker("beautiful", &state, Align::Ragged);
        let breaks = breaker.breaks(&mut |_| Ok(Pt(35.0))).expect("can break");
        assert!(breaks[0].hyphen);
        let lines: Vec<String> = breaker.lines(&breaks).iter().map(Line::text).collect();
        assert_eq!(lines.concat().replace('-', ""), "beautiful");
        assert!(lines[0].ends_with('-'));
    }

    #[test]
    fn hyphenation_can_be_disabled() {
        let dict = Dictionary::new().with_pattern("beau-ti-ful");
        let state = state().with_hyphenator(Rc::new(dict));
        let params = BreakParams {
            hyphenate: false,
            ..BreakParams::default()
        };
        let breaker = KnuthPlass::new(
            words(&[Stretch::new("beautiful")], &state),
            &state,
            Align::Ragged,
            &params,
        );
        let breaks = breaker.breaks(&mut |_| Ok(Pt(35.0))).expect("can break");
        assert_eq!(breaks.len(), 1);
        assert!(!breaks[0].hyphen);
    }

    #[test]
    fn last_line_never_stretches() {
        let breaker = breaker("aa bb cc dd ee", &state(), Align::Justified);
        let breaks = breaker.breaks(&mut |_| Ok(Pt(40.0))).expect("can break");
        let last = breaks.last().expect("at least one line");
        assert!(last.ratio <= 0.0);
    }

    #[test]
    fn justified_lines_fill_the_width() {
        let breaker = breaker("aa bb cc dd ee ff gg hh", &state(), Align::Justified);
        let breaks = breaker.breaks(&mut |_| Ok(Pt(42.0))).expect("can break");
        let lines = breaker.lines(&breaks);
        for line in lines.iter().take(lines.len() - 1) {
            let justified = line.justify(Pt(42.0));
            assert!((*justified.width() - 42.0).abs() < 1e-3);
        }
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let params: BreakParams =
            serde_json::from_str(r#"{"tolerance": 2.0, "hyphenate": false}"#).expect("valid json");
        assert_eq!(params.tolerance, 2.0);
        assert!(!params.hyphenate);
        assert_eq!(params.line_penalty, 10.0);
        assert_eq!(params.escalation, vec![1.0, 2.0, 3.0, 5.0, 8.0]);
        let align: Align = serde_json::from_str(r#""justified""#).expect("valid json");
        assert_eq!(align, Align::Justified);
    }

    #[test]
    fn fitness_classes() {
        assert_eq!(Fitness::from_ratio(-0.8), Fitness::VeryTight);
        assert_eq!(Fitness::from_ratio(0.0), Fitness::Tight);
        assert_eq!(Fitness::from_ratio(0.7), Fitness::Loose);
        assert_eq!(Fitness::from_ratio(1.5), Fitness::VeryLoose);
        assert!(Fitness::VeryTight.jumps(Fitness::Loose));
        assert!(!Fitness::Tight.jumps(Fitness::Loose));
    }
}
