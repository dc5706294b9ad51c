mod common;

use common::*;
use pdf_flow::layout::{greedy::Lines, Align, BreakParams, KnuthPlass, Wrapper};
use pdf_flow::{Pt, State};
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
    "a", "at", "sed", "quis", "lorem", "ipsum", "dolor", "tempor", "aliqua", "veniam",
    "laboris", "commodo", "consequat", "adipiscing", "incididunt", "exercitation",
];

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(VOCABULARY), 1..60).prop_map(|w| w.join(" "))
}

fn align() -> impl Strategy<Value = Align> {
    prop_oneof![Just(Align::Ragged), Just(Align::Justified)]
}

fn break_text(text: &str, width: Pt, align: Align, params: &BreakParams) -> Vec<String> {
    let state = state();
    let breaker = KnuthPlass::new(words_of(text, &state), &state, align, params);
    let breaks = breaker.breaks(&mut |_| Ok(width)).expect("can break");
    texts(&breaker.lines(&breaks))
}

proptest! {
    #[test]
    fn breaking_is_deterministic(text in text(), width in 60.0f32..300.0, align in align()) {
        let params = BreakParams::default();
        let first = break_text(&text, Pt(width), align, &params);
        let second = break_text(&text, Pt(width), align, &params);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn optimal_breaking_keeps_every_word(
        text in text(),
        width in 60.0f32..300.0,
        align in align(),
        tolerance in 1.0f32..10.0,
    ) {
        let state = state();
        let params = BreakParams { tolerance, ..BreakParams::default() };
        let breaker = KnuthPlass::new(words_of(&text, &state), &state, align, &params);
        let breaks = breaker.breaks(&mut |_| Ok(Pt(width))).expect("can break");
        let lines = breaker.lines(&breaks);
        prop_assert_eq!(lines_text(&lines), squashed(&text));
    }

    #[test]
    fn greedy_wrapping_keeps_every_word(text in text(), width in 60.0f32..300.0) {
        let state = state();
        let lines: Vec<_> = Lines::new(Wrapper::new(words_of(&text, &state), &state), Pt(width)).collect();
        prop_assert_eq!(lines_text(&lines), squashed(&text));
    }

    #[test]
    fn justified_lines_fill_the_measure(text in text(), width in 60.0f32..300.0) {
        let state = state();
        let breaker = KnuthPlass::new(
            words_of(&text, &state),
            &state,
            Align::Justified,
            &BreakParams::default(),
        );
        let breaks = breaker.breaks(&mut |_| Ok(Pt(width))).expect("can break");
        let lines = breaker.lines(&breaks);
        if let Some((_, body)) = lines.split_last() {
            for line in body.iter().filter(|l| l.gaps() > 0) {
                let justified = line.justify(Pt(width));
                prop_assert!((*justified.width() - width).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn ragged_lines_stay_within_the_measure(text in text(), width in 60.0f32..300.0) {
        // the longest word is 12 characters, 60pt
        let state = state();
        for line in break_text(&text, Pt(width), Align::Ragged, &BreakParams::default()) {
            prop_assert!(*state.measure(&line) <= width + 1e-3, "{:?} at {}", line, width);
        }
    }

    #[test]
    fn hyphenated_breaking_keeps_every_word(
        text in text(),
        width in 30.0f32..300.0,
        align in align(),
        greedy in any::<bool>(),
    ) {
        let state = hyphenating_state();
        let lines = wrap(&state, &text, Pt(width), align, greedy);
        prop_assert_eq!(lines_text(&lines), squashed(&text));
    }

    #[test]
    fn hyphenated_lines_stay_within_the_measure(
        text in text(),
        width in 30.0f32..300.0,
        greedy in any::<bool>(),
    ) {
        // every fragment is at most two characters and a hyphen, 15pt
        let state = hyphenating_state();
        for line in wrap(&state, &text, Pt(width), Align::Ragged, greedy) {
            prop_assert!(*line.width() <= width + 1e-3, "{:?} at {}", line.text(), width);
        }
    }

    #[test]
    fn greedy_lines_stay_within_the_measure(text in text(), width in 60.0f32..300.0) {
        let state = state();
        for line in wrap(&state, &text, Pt(width), Align::Ragged, true) {
            prop_assert!(*line.width() <= width + 1e-3, "{:?} at {}", line.text(), width);
        }
    }
}

fn wrap(state: &State, text: &str, width: Pt, align: Align, greedy: bool) -> Vec<pdf_flow::layout::Line> {
    if greedy {
        return Lines::new(Wrapper::new(words_of(text, state), state), width).collect();
    }
    let breaker = KnuthPlass::new(words_of(text, state), state, align, &BreakParams::default());
    let breaks = breaker.breaks(&mut |_| Ok(width)).expect("can break");
    breaker.lines(&breaks)
}
