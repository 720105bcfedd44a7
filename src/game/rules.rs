//! Movement, eating, and collision rules
use super::board::{Board, Cell};
use super::direction::Direction;
use super::food::place_food;
use super::snake::Snake;
use rand::Rng;
use serde::Deserialize;

/// Which snake cells a moving head is checked against
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum TailRule {
    /// The whole snake as it stood before the move, including the tail cell
    /// that the move is about to vacate
    #[default]
    Strict,

    /// The snake minus its tail whenever the move doesn't make the snake grow,
    /// so the head may follow the tail into the cell it is leaving
    Vacate,
}

/// Per-game scoring & collision settings
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Rules {
    /// Points awarded for each food eaten
    pub(crate) score_increment: u32,

    pub(crate) tail_rule: TailRule,
}

impl Default for Rules {
    fn default() -> Rules {
        Rules {
            score_increment: crate::consts::DEFAULT_SCORE_INCREMENT,
            tail_rule: TailRule::default(),
        }
    }
}

/// Everything on the board that changes from one step to the next
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Playfield {
    pub(crate) snake: Snake,

    /// The food's position, or `None` if the snake has filled the board
    pub(crate) food: Option<Cell>,

    /// The direction in which the snake made its last move
    pub(crate) heading: Direction,

    /// The direction in which the snake will make its next move
    pub(crate) pending_heading: Direction,

    pub(crate) score: u32,
}

impl Playfield {
    /// Queue `direction` as the heading for the next step, unless it would
    /// reverse the snake onto itself.  Returns whether the turn was accepted.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        if direction == self.heading.reverse() {
            false
        } else {
            self.pending_heading = direction;
            true
        }
    }
}

/// The result of [`step()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    /// The snake moved one cell
    Moved { ate: bool },

    /// The move would have put the head at `at`, which is off the board or on
    /// the snake.  The playfield was left untouched.
    Collided { at: Cell },

    /// The snake ate the last food and now covers every cell of the board
    BoardFull,
}

/// Return true if a snake head at `head` would be off `board` or on any of the
/// cells in `body`
pub(crate) fn collides<I: IntoIterator<Item = Cell>>(head: Cell, board: Board, body: I) -> bool {
    !board.contains(head) || body.into_iter().any(|c| c == head)
}

/// Advance the snake in `field` one cell in its pending heading
pub(crate) fn step<R: Rng + ?Sized>(
    field: &mut Playfield,
    board: Board,
    rules: Rules,
    rng: &mut R,
) -> Step {
    let heading = field.pending_heading;
    let head = heading.advance(field.snake.head());
    let ate = field.food == Some(head);
    let checked = if ate || rules.tail_rule == TailRule::Strict {
        field.snake.len()
    } else {
        field.snake.len().saturating_sub(1)
    };
    if collides(head, board, field.snake.cells().take(checked)) {
        return Step::Collided { at: head };
    }
    field.snake.advance(head, ate);
    field.heading = heading;
    if ate {
        field.score = field.score.saturating_add(rules.score_increment);
        field.food = place_food(rng, board, &field.snake);
        if field.food.is_none() {
            return Step::BoardFull;
        }
    }
    Step::Moved { ate }
}
