//! First-fit line breaking, one line at a time.
//!
//! A [Wrapper] is an immutable cursor into a sequence of words. Taking a line
//! returns the line and the cursor for the rest of the text, so the caller
//! can back up simply by keeping an earlier wrapper around.

use super::line::Line;
use super::text::Word;
use crate::style::State;
use crate::units::Pt;
use std::rc::Rc;

/// Slack allowed when checking whether a word fits, to absorb rounding
const FIT_EPSILON: f32 = 1e-3;

#[derive(Clone, Debug)]
pub struct Wrapper {
    words: Rc<[Word]>,
    next: usize,
    /// The tail of a word split on a previous line, which comes before
    /// `words[next]`
    pending: Option<Word>,
    state: State,
    allow_empty: bool,
}

impl Wrapper {
    pub fn new(words: Vec<Word>, state: &State) -> Wrapper {
        assert!(
            words.iter().all(|w| !w.text().is_empty()),
            "words can't be empty"
        );
        Wrapper {
            words: words.into(),
            next: 0,
            pending: None,
            state: state.clone(),
            allow_empty: false,
        }
    }

    /// Allow the next line to come back empty when its first word doesn't
    /// fit, instead of forcing it in. Only applies to the next line taken.
    pub fn allow_empty(self, allow_empty: bool) -> Wrapper {
        Wrapper {
            allow_empty,
            ..self
        }
    }

    /// The state in effect at the cursor
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn is_done(&self) -> bool {
        self.peek().is_none()
    }

    fn peek(&self) -> Option<&Word> {
        self.pending.as_ref().or_else(|| self.words.get(self.next))
    }

    /// Step past the next word, leaving `remainder` to be taken first
    fn advance(&self, remainder: Option<Word>) -> Wrapper {
        let state = self
            .peek()
            .map(|w| w.end_state().clone())
            .unwrap_or_else(|| self.state.clone());
        let next = if self.pending.is_some() {
            self.next
        } else {
            self.next + 1
        };
        Wrapper {
            words: self.words.clone(),
            next,
            pending: remainder,
            state,
            allow_empty: false,
        }
    }

    /// Fill a line of `width`, returning it along with a wrapper for the rest
    /// of the text, or `None` when the text is exhausted.
    ///
    /// Words are added while they fit, ignoring their trailing space. A word
    /// wider than the whole line is hyphenated at the last point that fits
    /// the room left. When nothing fits on an empty line the smallest
    /// fragment available is placed anyway, overflowing the line, unless
    /// empty lines are allowed.
    pub fn take_line(&self, width: Pt) -> (Line, Option<Wrapper>) {
        let mut cursor = self.clone();
        let mut taken: Vec<Word> = Vec::new();
        let mut used = Pt(0.0);

        while let Some(word) = cursor.peek() {
            let needed = used + word.width();
            if *needed <= *width + FIT_EPSILON {
                used = needed + word.space_width();
                taken.push(word.clone());
                cursor = cursor.advance(None);
                continue;
            }

            if *word.width() > *width + FIT_EPSILON {
                let room = width - used;
                let fitted = (0..word.hyphen_points().len())
                    .rev()
                    .map(|i| word.split(i))
                    .find(|(head, _)| *head.width() <= *room + FIT_EPSILON);
                if let Some((head, tail)) = fitted {
                    taken.push(head);
                    cursor = cursor.advance(Some(tail));
                    break;
                }
            }

            if taken.is_empty() {
                if self.allow_empty {
                    return (Line::empty(), Some(self.clone().allow_empty(false)));
                }
                log::warn!(
                    "overfull line: {:?} is wider than {}",
                    word.plain_text(),
                    width
                );
                if word.hyphen_points().is_empty() {
                    taken.push(word.clone());
                    cursor = cursor.advance(None);
                } else {
                    let (head, tail) = word.split(0);
                    taken.push(head);
                    cursor = cursor.advance(Some(tail));
                }
            }
            break;
        }

        let rest = if cursor.is_done() { None } else { Some(cursor) };
        (Line::new(taken), rest)
    }
}

/// An iterator over the lines of a wrapper, for lines of the same width
pub struct Lines {
    wrapper: Option<Wrapper>,
    width: Pt,
}

impl Lines {
    pub fn new(wrapper: Wrapper, width: Pt) -> Lines {
        Lines {
            wrapper: Some(wrapper),
            width,
        }
    }
}

impl Iterator for Lines {
    type Item = Line;

    fn next(&mut self) -> Option<Self::Item> {
        let wrapper = self.wrapper.take()?;
        if wrapper.is_done() {
            return None;
        }
        let (line, rest) = wrapper.take_line(self.width);
        self.wrapper = rest;
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::SyntheticFont;
    use crate::hyphenate::Dictionary;
    use crate::layout::text::{words, Stretch};

    fn state() -> State {
        State::new(Rc::new(SyntheticFont::new("F0", 0.5)), Pt(10.0))
    }

    fn wrapper(text: &str, state: &State) -> Wrapper {
        Wrapper::new(words(&[Stretch::new(text)], state), state)
    }

    fn texts(wrapper: Wrapper, width: Pt) -> Vec<String> {
        Lines::new(wrapper, width).map(|l| l.text()).collect()
    }

    #[test]
    fn fills_lines_first_fit() {
        // every character is 5pt wide
        let lines = texts(wrapper("aa bb cc dd", &state()), Pt(40.0));
        assert_eq!(lines, vec!["aa bb cc", "dd"]);
    }

    #[test]
    fn trailing_space_does_not_count() {
        let lines = texts(wrapper("aa bb cc", &state()), Pt(25.0));
        assert_eq!(lines, vec!["aa bb", "cc"]);
    }

    #[test]
    fn empty_text_gives_no_lines() {
        let wrapper = wrapper("   ", &state());
        assert!(wrapper.is_done());
        let (line, rest) = wrapper.take_line(Pt(100.0));
        assert!(line.is_empty());
        assert!(rest.is_none());
    }

    #[test]
    fn wrappers_can_be_reused() {
        let start = wrapper("aa bb cc dd", &state());
        let (first, rest) = start.take_line(Pt(25.0));
        let (again, _) = start.take_line(Pt(25.0));
        assert_eq!(first.text(), again.text());
        let (second, _) = rest.expect("more text").take_line(Pt(100.0));
        assert_eq!(second.text(), "cc dd");
    }

    #[test]
    fn overlong_words_are_hyphenated() {
        let dict = Dictionary::new().with_pattern("beau-ti-ful");
        let state = state().with_hyphenator(Rc::new(dict));
        // "beauti-" is 35pt, "beautiful" is 45pt
        let lines = texts(wrapper("beautiful day", &state), Pt(40.0));
        assert_eq!(lines, vec!["beauti-", "ful day"]);
    }

    #[test]
    fn unbreakable_words_are_forced() {
        let lines = texts(wrapper("extraordinary is", &state()), Pt(20.0));
        assert_eq!(lines, vec!["extraordinary", "is"]);
    }

    #[test]
    fn minimal_fragment_is_forced_when_nothing_fits() {
        let dict = Dictionary::new().with_pattern("beau-ti-ful");
        let state = state().with_hyphenator(Rc::new(dict));
        let lines = texts(wrapper("beautiful", &state), Pt(10.0));
        assert_eq!(lines, vec!["beau-", "ti-", "ful"]);
    }

    #[test]
    fn empty_line_when_allowed() {
        let start = wrapper("extraordinary", &state()).allow_empty(true);
        let (line, rest) = start.take_line(Pt(20.0));
        assert!(line.is_empty());
        let rest = rest.expect("nothing consumed");
        let (line, rest) = rest.take_line(Pt(20.0));
        assert_eq!(line.text(), "extraordinary");
        assert!(rest.is_none());
    }

    #[test]
    fn state_follows_the_cursor() {
        use crate::style::StyleChange;
        let big = StyleChange::new().size(Pt(20.0));
        let state = state();
        let wrapper = Wrapper::new(
            words(&[Stretch::new("aa "), Stretch::styled(big, "bb")], &state),
            &state,
        );
        let (_, rest) = wrapper.take_line(Pt(10.0));
        assert_eq!(rest.expect("more").state().size(), Pt(10.0));
    }
}
