//! Splitting one iterator into two that advance independently.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

struct Shared<I: Iterator> {
    source: I,
    /// Items pulled from the source that at least one side hasn't read yet
    buffer: VecDeque<I::Item>,
    /// Source index of the front of the buffer
    offset: usize,
    cursors: [usize; 2],
}

/// One side of a forked iterator. See [fork].
pub struct Fork<I: Iterator> {
    shared: Rc<RefCell<Shared<I>>>,
    side: usize,
}

/// Fork `iter` into two iterators that each yield every item of `iter`, in
/// order. Items are pulled from `iter` once, when the side that is ahead asks
/// for them, and buffered until the side that is behind has read them too.
pub fn fork<I>(iter: I) -> (Fork<I>, Fork<I>)
where
    I: Iterator,
    I::Item: Clone,
{
    let shared = Rc::new(RefCell::new(Shared {
        source: iter,
        buffer: VecDeque::new(),
        offset: 0,
        cursors: [0, 0],
    }));
    (
        Fork {
            shared: shared.clone(),
            side: 0,
        },
        Fork { shared, side: 1 },
    )
}

impl<I: Iterator> Fork<I> {
    /// Number of items held for the side that is behind
    pub fn buffered(&self) -> usize {
        self.shared.borrow().buffer.len()
    }
}

impl<I> Iterator for Fork<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let mut shared = self.shared.borrow_mut();
        let position = shared.cursors[self.side];
        while position >= shared.offset + shared.buffer.len() {
            let item = shared.source.next()?;
            shared.buffer.push_back(item);
        }

        shared.cursors[self.side] += 1;
        let other = shared.cursors[1 - self.side];
        if position == shared.offset && other > position {
            // both sides are done with it
            shared.offset += 1;
            return shared.buffer.pop_front();
        }
        let index = position - shared.offset;
        Some(shared.buffer[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn both_sides_see_everything() {
        let (a, b) = fork(1..=4);
        assert_eq!(a.collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert_eq!(b.collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn source_is_pulled_lazily_and_once() {
        let pulled = Rc::new(Cell::new(0));
        let counter = pulled.clone();
        let source = (0..).map(move |i| {
            counter.set(counter.get() + 1);
            i
        });
        let (mut a, mut b) = fork(source);
        assert_eq!(pulled.get(), 0);
        assert_eq!(a.next(), Some(0));
        assert_eq!(a.next(), Some(1));
        assert_eq!(pulled.get(), 2);
        assert_eq!(b.next(), Some(0));
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn items_are_released_once_both_sides_pass() {
        let (mut a, mut b) = fork(0..10);
        for _ in 0..3 {
            a.next();
        }
        assert_eq!(a.buffered(), 3);
        b.next();
        b.next();
        assert_eq!(b.buffered(), 1);
        for _ in 0..3 {
            b.next();
        }
        // b is now ahead by two
        assert_eq!(a.buffered(), 2);
        assert_eq!(a.next(), Some(3));
        assert_eq!(a.buffered(), 1);
    }

    #[test]
    fn sides_interleave_freely() {
        let (mut a, mut b) = fork("abc".chars());
        assert_eq!(b.next(), Some('a'));
        assert_eq!(a.next(), Some('a'));
        assert_eq!(a.next(), Some('b'));
        assert_eq!(a.next(), Some('c'));
        assert_eq!(a.next(), None);
        assert_eq!(b.next(), Some('b'));
        assert_eq!(b.next(), Some('c'));
        assert_eq!(b.next(), None);
    }
}
