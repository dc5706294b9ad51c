use super::columns::{break_across_columns, ColumnQueue};
use super::flow::{ColumnFill, Columns, Filled, Flowable};
use super::greedy::Wrapper;
use super::knuth_plass::{Align, BreakParams, KnuthPlass};
use super::line::{Line, LineBox};
use super::text::{words, Stretch, Word};
use crate::error::LayoutError;
use crate::style::{State, StyleChange};
use crate::units::Pt;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Which line breaker a paragraph uses
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breaking {
    /// First-fit, one line at a time. Columns are pulled one by one as lines
    /// fill them.
    Greedy,
    /// Knuth-Plass, over the whole paragraph at once
    #[default]
    Optimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphOptions {
    pub breaking: Breaking,
    pub align: Align,
    /// Avoid leaving a paragraph's first or last line alone in a column.
    /// Only applies to optimal breaking.
    pub orphan_control: bool,
    pub params: BreakParams,
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        ParagraphOptions {
            breaking: Breaking::Optimal,
            align: Align::Ragged,
            orphan_control: true,
            params: BreakParams::default(),
        }
    }
}

impl ParagraphOptions {
    pub fn with_breaking(self, breaking: Breaking) -> Self {
        ParagraphOptions { breaking, ..self }
    }

    pub fn with_align(self, align: Align) -> Self {
        ParagraphOptions { align, ..self }
    }

    pub fn with_orphan_control(self, orphan_control: bool) -> Self {
        ParagraphOptions {
            orphan_control,
            ..self
        }
    }

    pub fn with_params(self, params: BreakParams) -> Self {
        ParagraphOptions { params, ..self }
    }
}

/// A paragraph of styled text
#[derive(Clone, Debug, Default)]
pub struct Paragraph {
    change: Option<StyleChange>,
    stretches: Vec<Stretch>,
    options: ParagraphOptions,
}

impl Paragraph {
    pub fn new(stretches: Vec<Stretch>) -> Paragraph {
        Paragraph {
            stretches,
            ..Paragraph::default()
        }
    }

    /// A paragraph of unstyled text
    pub fn plain<S: ToString>(text: S) -> Paragraph {
        Paragraph::new(vec![Stretch::new(text)])
    }

    /// Set the paragraph in the document's style with `change` applied
    pub fn with_style(self, change: StyleChange) -> Paragraph {
        Paragraph {
            change: Some(change),
            ..self
        }
    }

    pub fn with_options(self, options: ParagraphOptions) -> Paragraph {
        Paragraph { options, ..self }
    }

    pub fn push(&mut self, stretch: Stretch) {
        self.stretches.push(stretch);
    }

    pub fn stretches(&self) -> &[Stretch] {
        &self.stretches
    }

    pub fn options(&self) -> &ParagraphOptions {
        &self.options
    }

    /// The state the paragraph starts in, given the document's
    pub fn state(&self, base: &State) -> State {
        match &self.change {
            Some(change) => change.apply(base),
            None => base.clone(),
        }
    }

    fn line_box(&self, line: Line, width: Pt, last: bool, state: &State) -> Rc<LineBox> {
        let line = match self.options.align {
            Align::Justified if !last => line.justify(width),
            _ => line,
        };
        Rc::new(LineBox::new(line, state.lead(), state.size()))
    }

    /// Break the whole paragraph, then fill the columns its lines landed in
    fn place_optimal(
        &self,
        words: Vec<Word>,
        state: &State,
        columns: Columns,
    ) -> Result<Vec<ColumnFill>, LayoutError> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let breaker = KnuthPlass::new(words, state, self.options.align, &self.options.params);
        let queue = ColumnQueue::new(columns.clone(), state.lead());
        let (queue, breaks) = break_across_columns(&breaker, queue, self.options.orphan_control)?;
        let lines = breaker.lines(&breaks);
        let counts = queue.counts(lines.len())?;

        let last_column = counts.len().saturating_sub(1);
        let pulled = queue.pulled_through(last_column);
        columns.unread(queue.pulled_after(last_column));

        let total = lines.len();
        let mut lines = lines.into_iter().enumerate();
        let mut filled = Vec::with_capacity(pulled.len());
        for (index, mut column) in pulled.into_iter().enumerate() {
            let count = index
                .checked_sub(queue.first())
                .and_then(|k| counts.get(k))
                .copied()
                .unwrap_or_default();
            let width = column.column().width();
            for (i, line) in lines.by_ref().take(count) {
                column = column.place(self.line_box(line, width, i + 1 == total, state));
            }
            filled.push(column);
        }
        Ok(filled)
    }
}

/// Greedy placement, one column per step
struct GreedyFill {
    paragraph: Rc<Paragraph>,
    state: State,
    wrapper: Option<Wrapper>,
    columns: Columns,
    first: bool,
}

impl Iterator for GreedyFill {
    type Item = Result<ColumnFill, LayoutError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut wrapper = self.wrapper.take()?;
        if wrapper.is_done() {
            return None;
        }
        let Some(mut column) = self.columns.next() else {
            return Some(Err(LayoutError::ColumnsExhausted));
        };
        if self.first {
            self.first = false;
            wrapper = wrapper.allow_empty(!column.is_empty());
        }

        let width = column.column().width();
        assert!(*width > 0.0, "columns must have a positive width");
        for _ in 0..column.capacity(self.state.lead()) {
            let (line, rest) = wrapper.take_line(width);
            if line.is_empty() {
                // the first word didn't fit what was left of this column
                if let Some(rest) = rest {
                    wrapper = rest;
                }
                break;
            }
            let last = rest.is_none();
            column = column.place(self.paragraph.line_box(line, width, last, &self.state));
            match rest {
                Some(rest) => wrapper = rest,
                None => return Some(Ok(column)),
            }
        }
        // only the first column may be left without lines
        self.wrapper = Some(wrapper.allow_empty(false));
        Some(Ok(column))
    }
}

impl Flowable for Paragraph {
    fn place(self: Rc<Self>, state: State, columns: Columns) -> Filled {
        let state = self.state(&state);
        let words = words(&self.stretches, &state);
        let breaking = self.options.breaking;
        match breaking {
            Breaking::Greedy => Box::new(GreedyFill {
                wrapper: Some(Wrapper::new(words, &state)),
                paragraph: self,
                state,
                columns,
                first: true,
            }),
            Breaking::Optimal => match self.place_optimal(words, &state, columns) {
                Ok(filled) => Box::new(filled.into_iter().map(Ok)),
                Err(e) => Box::new(std::iter::once(Err(e))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::SyntheticFont;
    use crate::layout::flow::Spacer;
    use crate::rect::Rect;
    use std::cell::Cell;

    /// 5pt per character at 10pt, with 10pt lines
    fn state() -> State {
        State::new(Rc::new(SyntheticFont::new("F0", 0.5)), Pt(10.0)).with_line_spacing(1.0)
    }

    fn column(x: f32, lines: usize) -> ColumnFill {
        ColumnFill::new(Rect::new(Pt(x), Pt(0.0), Pt(40.0), Pt(10.0 * lines as f32)))
    }

    /// Counts the columns pulled through it
    fn counted(capacities: &[usize]) -> (Columns, Rc<Cell<usize>>) {
        let pulled = Rc::new(Cell::new(0));
        let counter = pulled.clone();
        let columns: Vec<ColumnFill> = capacities
            .iter()
            .enumerate()
            .map(|(i, &lines)| column(50.0 * i as f32, lines))
            .collect();
        let source = columns.into_iter().inspect(move |_| counter.set(counter.get() + 1));
        (Columns::new(source), pulled)
    }

    fn lines_per_column(filled: &[ColumnFill]) -> Vec<usize> {
        filled.iter().map(|c| c.placed().len()).collect()
    }

    fn six_words() -> Paragraph {
        // each word is 30pt, too wide to share a 40pt line
        Paragraph::plain(vec!["aaaaaa"; 6].join(" "))
    }

    #[test]
    fn greedy_pulls_one_column_at_a_time() {
        let paragraph = Rc::new(
            six_words().with_options(ParagraphOptions::default().with_breaking(Breaking::Greedy)),
        );
        let (columns, pulled) = counted(&[2, 2, 2, 2]);
        let mut filled = paragraph.place(state(), columns);
        let first = filled.next().expect("a column").expect("no error");
        assert_eq!(first.placed().len(), 2);
        assert_eq!(pulled.get(), 1);
        let rest: Vec<ColumnFill> = filled.map(|c| c.expect("no error")).collect();
        assert_eq!(lines_per_column(&rest), vec![2, 2]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn greedy_only_skips_the_first_column() {
        let paragraph = Rc::new(
            Paragraph::plain("extraordinary aa")
                .with_options(ParagraphOptions::default().with_breaking(Breaking::Greedy)),
        );
        let full = column(0.0, 1).place(Rc::new(Spacer::new(Pt(10.0))));
        assert_eq!(full.capacity(Pt(10.0)), 0);
        let columns = Columns::new(vec![full, column(50.0, 2), column(100.0, 2)].into_iter());
        let filled: Vec<ColumnFill> = paragraph
            .place(state(), columns)
            .map(|c| c.expect("no error"))
            .collect();
        assert_eq!(lines_per_column(&filled), vec![1, 2]);
    }

    #[test]
    fn optimal_fills_columns_in_order() {
        let paragraph = Rc::new(six_words());
        let (columns, _) = counted(&[4, 4]);
        let filled: Vec<ColumnFill> = paragraph
            .place(state(), columns)
            .map(|c| c.expect("no error"))
            .collect();
        assert_eq!(lines_per_column(&filled), vec![4, 2]);
        let origins: Vec<(Pt, Pt)> = filled[0].placed().iter().map(|(o, _)| *o).collect();
        assert_eq!(origins[0], (Pt(0.0), Pt(40.0)));
        assert_eq!(origins[1], (Pt(0.0), Pt(30.0)));
    }

    #[test]
    fn leading_orphan_leaves_the_first_column_empty() {
        let paragraph = Rc::new(six_words());
        let (columns, _) = counted(&[1, 3, 12]);
        let filled: Vec<ColumnFill> = paragraph
            .place(state(), columns)
            .map(|c| c.expect("no error"))
            .collect();
        assert_eq!(lines_per_column(&filled), vec![0, 3, 3]);
    }

    #[test]
    fn unused_columns_are_put_back() {
        let paragraph = Rc::new(Paragraph::plain("aa bb"));
        let (columns, _) = counted(&[2, 2, 2]);
        let filled: Vec<ColumnFill> = paragraph
            .place(state(), columns.clone())
            .map(|c| c.expect("no error"))
            .collect();
        assert_eq!(filled.len(), 1);
        let next: Vec<f32> = columns.map(|c| *c.column().x1).collect();
        assert_eq!(next, vec![50.0, 100.0]);
    }

    #[test]
    fn empty_paragraphs_take_no_columns() {
        for breaking in [Breaking::Greedy, Breaking::Optimal] {
            let options = ParagraphOptions::default().with_breaking(breaking);
            let paragraph = Rc::new(Paragraph::plain("   ").with_options(options));
            let (columns, pulled) = counted(&[2]);
            assert_eq!(paragraph.place(state(), columns).count(), 0);
            assert_eq!(pulled.get(), 0);
        }
    }

    #[test]
    fn running_out_of_columns_is_an_error() {
        for breaking in [Breaking::Greedy, Breaking::Optimal] {
            let options = ParagraphOptions::default().with_breaking(breaking);
            let paragraph = Rc::new(six_words().with_options(options));
            let (columns, _) = counted(&[2, 2]);
            let results: Vec<Result<ColumnFill, LayoutError>> =
                paragraph.place(state(), columns).collect();
            assert!(matches!(results.last(), Some(Err(LayoutError::ColumnsExhausted))));
        }
    }

    #[test]
    fn continues_in_a_partly_filled_column() {
        for breaking in [Breaking::Greedy, Breaking::Optimal] {
            let options = ParagraphOptions::default().with_breaking(breaking);
            let paragraph = Rc::new(six_words().with_options(options));
            let partly = column(0.0, 4).place(Rc::new(Spacer::new(Pt(20.0))));
            let columns = Columns::new(vec![partly, column(50.0, 8)].into_iter());
            let filled: Vec<ColumnFill> = paragraph
                .place(state(), columns)
                .map(|c| c.expect("no error"))
                .collect();
            // the spacer plus two lines, then the other four
            assert_eq!(lines_per_column(&filled), vec![3, 4]);
        }
    }

    #[test]
    fn justified_paragraphs_leave_the_last_line_ragged() {
        let options = ParagraphOptions::default().with_align(Align::Justified);
        let paragraph = Rc::new(Paragraph::plain("aa bb cc dd ee ff gg").with_options(options));
        let (columns, _) = counted(&[10]);
        let filled: Vec<ColumnFill> = paragraph
            .place(state(), columns)
            .map(|c| c.expect("no error"))
            .collect();
        let rendered: Vec<String> = filled[0]
            .placed()
            .iter()
            .map(|(origin, item)| String::from_utf8_lossy(&item.render(*origin, Pt(40.0))).to_string())
            .collect();
        assert!(rendered.len() >= 2);
        assert!(rendered.iter().all(|r| r.contains("TJ")));
    }

    #[test]
    fn options_deserialize() {
        let options: ParagraphOptions =
            serde_json::from_str(r#"{"breaking": "greedy", "align": "justified"}"#)
                .expect("valid json");
        assert_eq!(options.breaking, Breaking::Greedy);
        assert_eq!(options.align, Align::Justified);
        assert!(options.orphan_control);
        assert_eq!(options.params, BreakParams::default());
    }
}
