//! Line widths by line index, for paragraphs that span columns.
//!
//! The optimal line breaker needs to know the width of each line before it
//! has decided which column the line ends up in. A [ColumnQueue] answers that
//! by assigning lines to columns in order, as many as each column can hold,
//! pulling columns from the stream only when a line index reaches them.

use super::flow::{ColumnFill, Columns};
use super::knuth_plass::{Break, KnuthPlass};
use crate::error::LayoutError;
use crate::units::Pt;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Columns pulled from the stream so far, shared between a queue and all the
/// queues derived from it
struct Memo {
    source: Columns,
    columns: Vec<ColumnFill>,
}

impl Memo {
    fn get(&mut self, index: usize) -> Result<&ColumnFill, LayoutError> {
        while self.columns.len() <= index {
            let column = self.source.next().ok_or(LayoutError::ColumnsExhausted)?;
            log::trace!("pulled column {} for line widths", self.columns.len());
            self.columns.push(column);
        }
        Ok(&self.columns[index])
    }
}

/// Assigns lines `lead` apart to a sequence of columns.
///
/// Queues are values: [ColumnQueue::without_first] and
/// [ColumnQueue::shortened] return new queues, leaving the original intact.
/// All of them share the columns pulled so far.
#[derive(Clone)]
pub struct ColumnQueue {
    memo: Rc<RefCell<Memo>>,
    lead: Pt,
    /// Index in the memo of this queue's first column
    first: usize,
    /// Lines taken away from columns, by memo index
    trims: BTreeMap<usize, usize>,
    /// Cumulative line counts of the columns resolved so far
    ends: RefCell<Vec<usize>>,
}

impl ColumnQueue {
    pub fn new(source: Columns, lead: Pt) -> ColumnQueue {
        assert!(*lead > 0.0, "line lead must be positive");
        ColumnQueue {
            memo: Rc::new(RefCell::new(Memo {
                source,
                columns: Vec::new(),
            })),
            lead,
            first: 0,
            trims: BTreeMap::new(),
            ends: RefCell::new(Vec::new()),
        }
    }

    pub fn lead(&self) -> Pt {
        self.lead
    }

    /// Number of columns skipped at the front of the stream
    pub fn first(&self) -> usize {
        self.first
    }

    /// The `index`th column of this queue, as it was pulled
    pub fn column(&self, index: usize) -> Result<ColumnFill, LayoutError> {
        let mut memo = self.memo.borrow_mut();
        memo.get(self.first + index).cloned()
    }

    /// How many lines the `index`th column of this queue holds
    pub fn capacity(&self, index: usize) -> Result<usize, LayoutError> {
        let position = self.first + index;
        let mut memo = self.memo.borrow_mut();
        let column = memo.get(position)?;
        let trim = self.trims.get(&position).copied().unwrap_or_default();
        let minimum = if column.is_empty() { 1 } else { 0 };
        Ok(column.capacity(self.lead).saturating_sub(trim).max(minimum))
    }

    /// Resolve one more column's line count
    fn extend(&self) -> Result<(), LayoutError> {
        let index = self.ends.borrow().len();
        let capacity = self.capacity(index)?;
        let mut ends = self.ends.borrow_mut();
        let start = ends.last().copied().unwrap_or_default();
        ends.push(start + capacity);
        Ok(())
    }

    /// The index in this queue of the column that holds line `line`
    fn column_of(&self, line: usize) -> Result<usize, LayoutError> {
        loop {
            {
                let ends = self.ends.borrow();
                let index = ends.partition_point(|&end| end <= line);
                if index < ends.len() {
                    return Ok(index);
                }
            }
            self.extend()?;
        }
    }

    /// The width of line `line`, pulling columns as needed
    pub fn width(&self, line: usize) -> Result<Pt, LayoutError> {
        let index = self.column_of(line)?;
        let width = self
            .memo
            .borrow_mut()
            .get(self.first + index)?
            .column()
            .width();
        assert!(*width > 0.0, "columns must have a positive width");
        Ok(width)
    }

    /// How many of `lines` lines each column gets, up to the column holding
    /// the last line
    pub fn counts(&self, lines: usize) -> Result<Vec<usize>, LayoutError> {
        if lines == 0 {
            return Ok(Vec::new());
        }
        let last = self.column_of(lines - 1)?;
        let ends = self.ends.borrow();
        let mut start = 0;
        Ok(ends[..=last]
            .iter()
            .map(|&end| {
                let count = end.min(lines) - start;
                start = end;
                count
            })
            .collect())
    }

    /// The same queue without its first column
    pub fn without_first(&self) -> ColumnQueue {
        ColumnQueue {
            memo: self.memo.clone(),
            lead: self.lead,
            first: self.first + 1,
            trims: self.trims.clone(),
            ends: RefCell::new(Vec::new()),
        }
    }

    /// The same queue with the `index`th column holding one line less
    pub fn shortened(&self, index: usize) -> ColumnQueue {
        let mut trims = self.trims.clone();
        *trims.entry(self.first + index).or_default() += 1;
        ColumnQueue {
            memo: self.memo.clone(),
            lead: self.lead,
            first: self.first,
            trims,
            ends: RefCell::new(Vec::new()),
        }
    }

    /// Every column pulled from the stream, from the very first up to and
    /// including this queue's `index`th column
    pub fn pulled_through(&self, index: usize) -> Vec<ColumnFill> {
        let memo = self.memo.borrow();
        let end = (self.first + index + 1).min(memo.columns.len());
        memo.columns[..end].to_vec()
    }

    /// Columns pulled from the stream beyond this queue's `index`th column
    pub fn pulled_after(&self, index: usize) -> Vec<ColumnFill> {
        let memo = self.memo.borrow();
        let start = (self.first + index + 1).min(memo.columns.len());
        memo.columns[start..].to_vec()
    }
}

fn break_in(breaker: &KnuthPlass, queue: &ColumnQueue) -> Result<Vec<Break>, LayoutError> {
    breaker.breaks(&mut |line| queue.width(line))
}

/// Break a paragraph across the columns of `queue`, avoiding orphans and
/// widows when `orphan_control` is on. Returns the breaks along with the
/// queue they were computed against.
///
/// A paragraph whose first column would get only its first line starts in
/// the next column instead, when that column can take at least two lines. A
/// last line left alone in the last column is joined by one from the column
/// before, provided that column keeps at least two. Either way the paragraph
/// is broken again from scratch; a retry that changes the number of columns
/// or doesn't get rid of the orphan is thrown away.
pub fn break_across_columns(
    breaker: &KnuthPlass,
    queue: ColumnQueue,
    orphan_control: bool,
) -> Result<(ColumnQueue, Vec<Break>), LayoutError> {
    let mut queue = queue;
    let mut breaks = break_in(breaker, &queue)?;
    if !orphan_control || breaks.len() < 2 {
        return Ok((queue, breaks));
    }

    let counts = queue.counts(breaks.len())?;
    if counts.len() > 1 && counts[0] == 1 && queue.capacity(1)? >= 2 {
        log::debug!("first line would be alone in its column, moving to the next");
        queue = queue.without_first();
        breaks = break_in(breaker, &queue)?;
    }

    let mut attempts = 0;
    loop {
        let counts = queue.counts(breaks.len())?;
        let columns = counts.len();
        if columns < 2 || attempts >= columns {
            break;
        }
        let (last, previous) = (counts[columns - 1], counts[columns - 2]);
        if last != 1 || previous < 3 || queue.capacity(columns - 1)? < 2 {
            break;
        }

        attempts += 1;
        let candidate = queue.shortened(columns - 2);
        let retry = break_in(breaker, &candidate)?;
        let retry_counts = candidate.counts(retry.len())?;
        if retry_counts.len() != columns || retry_counts[columns - 1] < 2 {
            log::trace!("moving a line to the last column didn't help, keeping the orphan");
            break;
        }
        log::debug!("moved a line into the last column to avoid an orphan");
        queue = candidate;
        breaks = retry;
    }

    Ok((queue, breaks))
}
