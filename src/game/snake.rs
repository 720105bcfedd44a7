use super::board::Cell;
use super::direction::Direction;
use std::collections::VecDeque;
use std::iter;

/// A snake on the board.
///
/// The head is kept apart from the rest of the body so that a snake can never
/// be empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    /// The position of the snake's head
    head: Cell,

    /// The positions of the remaining cells, from the one just behind the head
    /// to the tail
    body: VecDeque<Cell>,
}

impl Snake {
    /// Create a straight snake of `len` cells (at least one) with its head at
    /// `head` and its body trailing away from `facing`
    pub(crate) fn new(head: Cell, facing: Direction, len: usize) -> Snake {
        let behind = facing.reverse();
        let body = iter::successors(Some(head), |&c| Some(behind.advance(c)))
            .skip(1)
            .take(len.saturating_sub(1))
            .collect();
        Snake { head, body }
    }

    /// Create a snake from its cells listed head first.  Returns `None` if
    /// `cells` is empty.
    #[cfg(test)]
    pub(crate) fn from_cells<I: IntoIterator<Item = Cell>>(cells: I) -> Option<Snake> {
        let mut cells = cells.into_iter();
        let head = cells.next()?;
        Some(Snake {
            head,
            body: cells.collect(),
        })
    }

    pub(crate) fn head(&self) -> Cell {
        self.head
    }

    /// Return the last cell of the snake; for a one-cell snake, this is the
    /// head
    #[cfg(test)]
    pub(crate) fn tail(&self) -> Cell {
        self.body.back().copied().unwrap_or(self.head)
    }

    pub(crate) fn len(&self) -> usize {
        self.body.len() + 1
    }

    /// Iterate over the snake's cells from head to tail
    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        iter::once(self.head).chain(self.body.iter().copied())
    }

    pub(crate) fn contains(&self, cell: Cell) -> bool {
        self.head == cell || self.body.contains(&cell)
    }

    /// Move the head to `head`.  Unless `grow` is true, the tail cell is
    /// dropped so that the length stays the same.
    pub(crate) fn advance(&mut self, head: Cell, grow: bool) {
        self.body.push_front(self.head);
        self.head = head;
        if !grow {
            let _ = self.body.pop_back();
        }
    }
}
