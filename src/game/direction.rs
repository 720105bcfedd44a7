use super::board::Cell;
use crate::consts;

/// The direction in which the snake's head moves on each step
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one grid unit away from `cell` in this direction.  The
    /// result may lie outside of any board; bounds are the caller's concern.
    pub(crate) fn advance(self, cell: Cell) -> Cell {
        let Cell { x, y } = cell;
        match self {
            Direction::Up => Cell::new(x, y - 1),
            Direction::Down => Cell::new(x, y + 1),
            Direction::Left => Cell::new(x - 1, y),
            Direction::Right => Cell::new(x + 1, y),
        }
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Glyph for a snake head moving in this direction
    pub(crate) fn head_symbol(self) -> char {
        match self {
            Direction::Up => consts::SNAKE_HEAD_UP_SYMBOL,
            Direction::Down => consts::SNAKE_HEAD_DOWN_SYMBOL,
            Direction::Left => consts::SNAKE_HEAD_LEFT_SYMBOL,
            Direction::Right => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}
