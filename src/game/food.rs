use super::board::{Board, Cell};
use super::snake::Snake;
use rand::{seq::IteratorRandom, Rng};
use std::collections::HashSet;

/// Choose a cell for the food uniformly at random from the cells of `board`
/// not occupied by `snake`.  Returns `None` if the snake covers the whole
/// board.
pub(crate) fn place_food<R: Rng + ?Sized>(rng: &mut R, board: Board, snake: &Snake) -> Option<Cell> {
    let occupied = snake.cells().collect::<HashSet<_>>();
    board
        .cells()
        .filter(|c| !occupied.contains(c))
        .choose(rng)
}
