use super::board::{Board, Cell};
use super::direction::Direction;
use super::food::place_food;
use super::rules::{step, Playfield, Step};
use super::snake::Snake;
use super::ticker::Ticker;
use crate::config::GameConfig;
use rand::{rngs::ThreadRng, Rng};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// One game of Snake, from the first move to the final score, plus everything
/// needed to start the next one
#[derive(Clone, Debug)]
pub(crate) struct Session<R = ThreadRng> {
    rng: R,
    settings: GameConfig,
    board: Board,
    field: Playfield,
    phase: Phase,
    ticker: Ticker,
}

impl Session<ThreadRng> {
    pub(crate) fn new(board: Board, settings: GameConfig) -> Self {
        Session::new_with_rng(board, settings, rand::rng())
    }
}

impl<R: Rng> Session<R> {
    /// Create an idle session on `board` (enlarged if it can't hold the
    /// starting snake)
    pub(crate) fn new_with_rng(board: Board, settings: GameConfig, mut rng: R) -> Session<R> {
        let board = board.fit_snake(settings.initial_length);
        let field = new_playfield(&mut rng, board, settings.initial_length);
        Session {
            rng,
            settings,
            board,
            field,
            phase: Phase::Idle,
            ticker: Ticker::new(settings.tick_interval),
        }
    }

    /// Start play.  An idle game begins, a paused game resumes, and a finished
    /// game is replaced by a fresh one.  Does nothing if the game is already
    /// running.
    pub(crate) fn start(&mut self, now: Instant) {
        match self.phase {
            Phase::Running => return,
            Phase::Idle => info!("Game started"),
            Phase::Paused => info!("Game resumed"),
            Phase::Terminal(_) => {
                self.reset();
                info!("New game started");
            }
        }
        self.phase = Phase::Running;
        self.ticker.start(now);
    }

    /// Pause a running game or resume a paused one
    pub(crate) fn toggle_pause(&mut self, now: Instant) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.start(now),
            Phase::Idle | Phase::Terminal(_) => (),
        }
    }

    /// Pause the game if it's running
    pub(crate) fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            self.ticker.stop();
            info!(score = self.field.score, "Game paused");
        }
    }

    /// Throw away the current game, whatever its state, and start a new one
    pub(crate) fn restart(&mut self, now: Instant) {
        self.reset();
        self.phase = Phase::Running;
        self.ticker.restart(now);
        info!("Game restarted");
    }

    /// Replace the board with a new one, abandoning the current game.  The
    /// new game waits to be started.
    pub(crate) fn resize(&mut self, board: Board) {
        self.board = board.fit_snake(self.settings.initial_length);
        self.reset();
        self.phase = Phase::Idle;
        self.ticker.stop();
        info!(
            width = self.board.width(),
            height = self.board.height(),
            "Board resized"
        );
    }

    /// Ask the snake to turn.  Returns whether the turn was accepted; turns
    /// are refused once the game is over and when they would reverse the
    /// snake.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        if matches!(self.phase, Phase::Terminal(_)) {
            return false;
        }
        let accepted = self.field.turn(direction);
        if !accepted {
            debug!(direction = direction.as_str(), "Ignoring reversing turn");
        }
        accepted
    }

    /// If the game is running and a tick is due at `now`, advance the snake
    /// one step.  Returns whether a step was taken.
    pub(crate) fn poll(&mut self, now: Instant) -> bool {
        if self.phase != Phase::Running || !self.ticker.poll(now) {
            return false;
        }
        self.tick();
        true
    }

    fn tick(&mut self) {
        match step(
            &mut self.field,
            self.board,
            self.settings.rules,
            &mut self.rng,
        ) {
            Step::Moved { ate: true } => debug!(score = self.field.score, "Food eaten"),
            Step::Moved { ate: false } => (),
            Step::Collided { at } => {
                self.finish(Ending::Collision(at));
                info!(
                    score = self.field.score,
                    x = at.x,
                    y = at.y,
                    "Game over: collision"
                );
            }
            Step::BoardFull => {
                self.finish(Ending::BoardFull);
                info!(score = self.field.score, "Game over: board full");
            }
        }
    }

    fn finish(&mut self, ending: Ending) {
        self.phase = Phase::Terminal(ending);
        self.ticker.stop();
    }

    fn reset(&mut self) {
        self.field = new_playfield(&mut self.rng, self.board, self.settings.initial_length);
    }
}

impl<R> Session<R> {
    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn board(&self) -> Board {
        self.board
    }

    pub(crate) fn field(&self) -> &Playfield {
        &self.field
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut Playfield {
        &mut self.field
    }

    pub(crate) fn settings(&self) -> &GameConfig {
        &self.settings
    }

    /// Return how long after `now` the next tick is due, or `None` if the
    /// game isn't ticking
    pub(crate) fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_due(now)
    }
}

/// Lay out a straight snake heading right, with its head a quarter of the way
/// across and halfway down the board, and place the first food
fn new_playfield<R: Rng + ?Sized>(rng: &mut R, board: Board, len: usize) -> Playfield {
    let min_x = i32::try_from(len.saturating_sub(1)).unwrap_or(i32::MAX);
    let head = Cell::new(
        i32::from(board.width() / 4).max(min_x),
        i32::from(board.height() / 2),
    );
    let snake = Snake::new(head, Direction::Right, len);
    let food = place_food(rng, board, &snake);
    Playfield {
        snake,
        food,
        heading: Direction::Right,
        pending_heading: Direction::Right,
        score: 0,
    }
}

/// Where a session is in its lifecycle
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Phase {
    /// Set up and waiting for the player to start
    Idle,
    Running,
    Paused,
    /// The game is over
    Terminal(Ending),
}

/// How a game ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ending {
    /// The snake ran into a wall or itself when moving its head to the given
    /// cell
    Collision(Cell),

    /// The snake filled the whole board
    BoardFull,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    const PERIOD: Duration = Duration::from_millis(300);

    fn session(board: Board) -> Session<ChaCha12Rng> {
        session_with(board, GameConfig::default())
    }

    fn session_with(board: Board, settings: GameConfig) -> Session<ChaCha12Rng> {
        Session::new_with_rng(board, settings, ChaCha12Rng::seed_from_u64(RNG_SEED))
    }

    fn assert_fresh(session: &Session<ChaCha12Rng>) {
        let field = session.field();
        assert_eq!(field.snake.len(), 3);
        assert_eq!(field.score, 0);
        assert_eq!(field.heading, Direction::Right);
        assert_eq!(field.pending_heading, Direction::Right);
        let food = field.food.expect("fresh game should have food");
        assert!(session.board().contains(food));
        assert!(!field.snake.contains(food));
    }

    /// Start a game on a 6×3 board and steer the snake up through the top
    /// wall
    fn crashed() -> (Session<ChaCha12Rng>, Instant) {
        let t0 = Instant::now();
        let mut session = session(Board::new(6, 3));
        session.start(t0);
        assert!(session.turn(Direction::Up));
        assert!(session.poll(t0 + PERIOD));
        assert!(session.poll(t0 + PERIOD * 2));
        (session, t0 + PERIOD * 2)
    }

    #[test]
    fn new_session() {
        let session = session(Board::new(20, 20));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(
            session.field().snake.cells().collect::<Vec<_>>(),
            [Cell::new(5, 10), Cell::new(4, 10), Cell::new(3, 10)]
        );
        assert_fresh(&session);
        assert_eq!(session.time_until_tick(Instant::now()), None);
    }

    #[test]
    fn new_session_on_tiny_board() {
        let session = session(Board::new(1, 0));
        assert_eq!(session.board(), Board::new(4, 1));
        assert_eq!(session.field().snake.head(), Cell::new(2, 0));
        assert_eq!(session.field().food, Some(Cell::new(3, 0)));
    }

    #[rstest]
    #[case(40)]
    #[case(usize::from(consts::MAX_INITIAL_LENGTH))]
    fn long_snake_starts_on_board(#[case] initial_length: usize) {
        let settings = GameConfig {
            initial_length,
            ..GameConfig::default()
        };
        let session = session_with(Board::new(4, 1), settings);
        let board = session.board();
        let snake = &session.field().snake;
        assert_eq!(snake.len(), initial_length);
        assert!(
            snake.cells().all(|c| board.contains(c)),
            "snake of length {initial_length} hangs off a {board:?}"
        );
        let food = session.field().food.expect("board has a spare cell");
        assert!(board.contains(food));
        assert!(!snake.contains(food));
    }

    #[test]
    fn idle_session_does_not_tick() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        assert!(!session.poll(t0 + PERIOD * 10));
        assert_eq!(session.field().snake.head(), Cell::new(5, 10));
    }

    #[test]
    fn start_and_tick() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.time_until_tick(t0), Some(PERIOD));
        assert!(!session.poll(t0 + PERIOD / 2));
        assert!(session.poll(t0 + PERIOD));
        assert_eq!(session.field().snake.head(), Cell::new(6, 10));
    }

    #[test]
    fn start_while_running_keeps_schedule() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        session.start(t0 + PERIOD / 2);
        assert!(session.poll(t0 + PERIOD));
    }

    #[test]
    fn pause_and_resume() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        session.toggle_pause(t0 + PERIOD / 2);
        assert_eq!(session.phase(), Phase::Paused);
        assert_eq!(session.time_until_tick(t0 + PERIOD / 2), None);
        assert!(!session.poll(t0 + PERIOD * 5));
        assert_eq!(session.field().snake.head(), Cell::new(5, 10));

        session.toggle_pause(t0 + PERIOD * 5);
        assert_eq!(session.phase(), Phase::Running);
        assert!(!session.poll(t0 + PERIOD * 5));
        assert!(session.poll(t0 + PERIOD * 6));
        assert_eq!(session.field().snake.head(), Cell::new(6, 10));
    }

    #[test]
    fn start_resumes_paused_game() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        assert!(session.poll(t0 + PERIOD));
        session.pause();
        session.start(t0 + PERIOD * 2);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.field().snake.head(), Cell::new(6, 10));
    }

    #[test]
    fn toggle_pause_ignored_when_idle() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.toggle_pause(t0);
        assert_eq!(session.phase(), Phase::Idle);
        session.pause();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn turns_accepted_before_start() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        assert!(session.turn(Direction::Down));
        assert!(!session.turn(Direction::Left));
        session.start(t0);
        assert!(session.poll(t0 + PERIOD));
        assert_eq!(session.field().snake.head(), Cell::new(5, 11));
    }

    #[test]
    fn turns_accepted_while_paused() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        session.pause();
        assert!(session.turn(Direction::Up));
        session.start(t0);
        assert!(session.poll(t0 + PERIOD));
        assert_eq!(session.field().snake.head(), Cell::new(5, 9));
    }

    #[test]
    fn wall_collision_ends_game() {
        let (mut session, now) = crashed();
        assert_eq!(
            session.phase(),
            Phase::Terminal(Ending::Collision(Cell::new(2, -1)))
        );
        assert_eq!(session.field().snake.head(), Cell::new(2, 0));
        assert_eq!(session.time_until_tick(now), None);
        assert!(!session.poll(now + PERIOD * 10));
        assert!(!session.turn(Direction::Right));
        session.toggle_pause(now);
        assert!(matches!(session.phase(), Phase::Terminal(_)));
    }

    #[test]
    fn start_after_game_over_begins_fresh_game() {
        let (mut session, now) = crashed();
        session.start(now);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.field().snake.head(), Cell::new(2, 1));
        assert_fresh(&session);
        assert!(session.poll(now + PERIOD));
    }

    #[test]
    fn restart_after_game_over() {
        let (mut session, now) = crashed();
        session.restart(now);
        assert_eq!(session.phase(), Phase::Running);
        assert_fresh(&session);
    }

    #[test]
    fn restart_while_running() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        assert!(session.turn(Direction::Up));
        assert!(session.poll(t0 + PERIOD));
        session.restart(t0 + PERIOD + PERIOD / 2);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.field().snake.head(), Cell::new(5, 10));
        assert_fresh(&session);
        assert!(!session.poll(t0 + PERIOD * 2));
        assert!(session.poll(t0 + PERIOD * 2 + PERIOD / 2));
    }

    #[test]
    fn filling_the_board_wins() {
        let t0 = Instant::now();
        let settings = GameConfig {
            initial_length: 2,
            ..GameConfig::default()
        };
        let mut session = session_with(Board::new(3, 1), settings);
        assert_eq!(session.field().food, Some(Cell::new(2, 0)));
        session.start(t0);
        assert!(session.poll(t0 + PERIOD));
        assert_eq!(session.phase(), Phase::Terminal(Ending::BoardFull));
        assert_eq!(session.field().score, 10);
        assert_eq!(session.field().snake.len(), 3);
        assert_eq!(session.time_until_tick(t0 + PERIOD), None);
    }

    #[test]
    fn resize_resets_to_idle() {
        let t0 = Instant::now();
        let mut session = session(Board::new(20, 20));
        session.start(t0);
        assert!(session.poll(t0 + PERIOD));
        session.resize(Board::new(40, 12));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.board(), Board::new(40, 12));
        assert_eq!(session.field().snake.head(), Cell::new(10, 6));
        assert_fresh(&session);
        assert_eq!(session.time_until_tick(t0 + PERIOD), None);
        assert!(!session.poll(t0 + PERIOD * 2));
    }

    #[test]
    fn resize_after_game_over() {
        let (mut session, _) = crashed();
        session.resize(Board::new(2, 2));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.board(), Board::new(4, 2));
        assert_fresh(&session);
    }
}
