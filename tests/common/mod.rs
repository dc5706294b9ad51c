#![allow(dead_code)]

use pdf_flow::layout::{words, KnuthPlass, Line, Stretch, Word};
use pdf_flow::layout::{Align, BreakParams};
use pdf_flow::{Page, Pt, Rect, State, SyntheticFont};
use std::rc::Rc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Text at 10pt where every character is 5pt wide and lines are 12pt apart
pub fn state() -> State {
    State::new(Rc::new(SyntheticFont::new("F0", 0.5)), Pt(10.0))
}

/// Allows a break after every second character
pub fn every_two(word: &str) -> Vec<usize> {
    (2..word.chars().count()).step_by(2).collect()
}

/// [state], splitting words with [every_two]
pub fn hyphenating_state() -> State {
    state().with_hyphenator(Rc::new(every_two))
}

pub fn words_of(text: &str, state: &State) -> Vec<Word> {
    words(&[Stretch::new(text)], state)
}

pub fn texts(lines: &[Line]) -> Vec<String> {
    lines.iter().map(Line::text).collect()
}

/// Break `text` optimally at a single width
pub fn optimal_lines(text: &str, state: &State, width: Pt, align: Align) -> Vec<Line> {
    let breaker = KnuthPlass::new(words_of(text, state), state, align, &BreakParams::default());
    let breaks = breaker
        .breaks(&mut |_| Ok(width))
        .expect("can break");
    breaker.lines(&breaks)
}

/// Text without whitespace or inserted hyphens, for comparing content
pub fn squashed(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn lines_text(lines: &[Line]) -> String {
    lines
        .iter()
        .flat_map(|line| line.words().iter().map(Word::plain_text))
        .collect()
}

/// A page `width` × `height` with `count` columns and 10pt margins
pub fn page(width: f32, height: f32, count: usize) -> Page {
    let media_box = Rect::new(Pt(0.0), Pt(0.0), Pt(width), Pt(height));
    let content = Rect::new(Pt(10.0), Pt(10.0), Pt(width - 20.0), Pt(height - 20.0));
    Page {
        media_box,
        columns: content.columns(count, Pt(10.0)),
    }
}
