mod board;
mod direction;
mod food;
mod paused;
mod rules;
mod session;
mod snake;
mod ticker;
pub(crate) use self::board::GridUnit;
use self::board::{Board, Cell};
use self::direction::Direction;
use self::paused::{PauseMenu, PauseOpt, PausePopup};
pub(crate) use self::rules::{Rules, TailRule};
use self::session::{Ending, Phase, Session};
use crate::app::Screen;
use crate::command::Command;
use crate::config::GameConfig;
use crate::consts;
use crate::util::{board_surface, center_rect};
use crossterm::event::{poll, read, Event};
use rand::{rngs::ThreadRng, Rng};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
    Frame,
};
use std::io;
use std::time::Instant;

/// The game screen: a [`Session`] plus the pause menu, drawn to fill the
/// terminal
#[derive(Clone, Debug)]
pub(crate) struct Game<R = ThreadRng> {
    session: Session<R>,
    menu: PauseMenu,
}

impl Game<ThreadRng> {
    pub(crate) fn new(settings: GameConfig, terminal: Size) -> Self {
        Game::new_with_rng(settings, terminal, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(settings: GameConfig, terminal: Size, rng: R) -> Game<R> {
        let board = Board::from_surface(board_surface(terminal), settings.grid_unit);
        Game {
            session: Session::new_with_rng(board, settings, rng),
            menu: PauseMenu::default(),
        }
    }

    /// Wait for either the next input event or the next tick, whichever comes
    /// first, and handle it
    pub(crate) fn process_input(&mut self) -> io::Result<Option<Screen>> {
        if let Some(wait) = self.session.time_until_tick(Instant::now()) {
            if wait.is_zero() || !poll(wait)? {
                self.session.poll(Instant::now());
                return Ok(None);
            }
        }
        Ok(self.handle_event(&read()?, Instant::now()))
    }

    fn handle_event(&mut self, event: &Event, now: Instant) -> Option<Screen> {
        match *event {
            Event::Resize(width, height) => {
                self.resize(Size { width, height });
                return None;
            }
            Event::FocusLost => {
                self.pause();
                return None;
            }
            _ => (),
        }
        if self.session.phase() == Phase::Paused {
            match self.menu.handle_event(event)? {
                PauseOpt::Resume => self.session.start(now),
                PauseOpt::Restart => self.session.restart(now),
                PauseOpt::Quit => return Some(Screen::Quit),
            }
            return None;
        }
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Quit | Command::Q => return Some(Screen::Quit),
            Command::Up => self.turn(Direction::Up),
            Command::Down => self.turn(Direction::Down),
            Command::Left => self.turn(Direction::Left),
            Command::Right => self.turn(Direction::Right),
            Command::Enter => self.session.start(now),
            Command::R => self.session.restart(now),
            Command::Esc | Command::Pause => self.pause(),
            _ => (),
        }
        None
    }

    fn turn(&mut self, direction: Direction) {
        self.session.turn(direction);
    }

    fn pause(&mut self) {
        if self.session.phase() == Phase::Running {
            self.menu = PauseMenu::default();
            self.session.pause();
        }
    }

    /// Fit a new board to a terminal of the given size
    fn resize(&mut self, terminal: Size) {
        let board = Board::from_surface(board_surface(terminal), self.session.settings().grid_unit);
        self.session.resize(board);
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [score_area, block_area, msg_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let field = self.session.field();
        Line::styled(format!(" Score: {}", field.score), consts::SCORE_BAR_STYLE)
            .render(score_area, buf);

        let unit = self.session.settings().grid_unit;
        let mut block_size = self.session.board().surface_size(unit);
        block_size.width = block_size.width.saturating_add(2);
        block_size.height = block_size.height.saturating_add(2);
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);

        let mut board = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            unit,
            buf,
        };
        for cell in field.snake.cells().skip(1) {
            board.draw_cell(cell, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        if let Some(food) = field.food {
            board.draw_cell(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        let phase = self.session.phase();
        match phase {
            // A wall crash happens off the board, so it's marked on the head.
            Phase::Terminal(Ending::Collision(at)) if !self.session.board().contains(at) => {
                board.draw_cell(
                    field.snake.head(),
                    consts::COLLISION_SYMBOL,
                    consts::COLLISION_STYLE,
                );
            }
            Phase::Terminal(Ending::Collision(at)) => {
                board.draw_cell(
                    field.snake.head(),
                    field.heading.head_symbol(),
                    consts::SNAKE_STYLE,
                );
                board.draw_cell(at, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
            }
            _ => board.draw_cell(
                field.snake.head(),
                field.heading.head_symbol(),
                consts::SNAKE_STYLE,
            ),
        }

        match phase {
            Phase::Idle => key_hints("", &[("Start", "Enter"), ("Quit", "q")]).render(msg_area, buf),
            Phase::Running => key_hints("", &[("Pause", "p"), ("Quit", "q")]).render(msg_area, buf),
            Phase::Paused => {
                let pause_area = center_rect(area, PausePopup::SIZE);
                Clear.render(pause_area, buf);
                self.menu.popup(field.score).render(pause_area, buf);
            }
            Phase::Terminal(ending) => {
                let lead = match ending {
                    Ending::Collision(_) => "GAME OVER: ",
                    Ending::BoardFull => "YOU WIN! ",
                };
                key_hints(lead, &[("Restart", "r"), ("Quit", "q")]).render(msg_area, buf);
            }
        }
    }
}

/// Build a message line of the form " {lead}Label1 (key1) · Label2 (key2)"
fn key_hints(lead: &'static str, hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut line = Line::from(" ");
    line.push_span(lead);
    for (i, &(label, key)) in hints.iter().enumerate() {
        if i > 0 {
            line.push_span(" · ");
        }
        line.push_span(label);
        line.push_span(" (");
        line.push_span(Span::styled(key, consts::KEY_STYLE));
        line.push_span(")");
    }
    line
}

/// Draws board cells into a region of a buffer, scaling each one up to a
/// block of terminal cells the size of a grid unit
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    unit: GridUnit,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(cell.x), u16::try_from(cell.y)) else {
            return;
        };
        let columns = self.unit.columns();
        let rows = self.unit.rows();
        let left = self.area.x.saturating_add(x.saturating_mul(columns));
        let top = self.area.y.saturating_add(y.saturating_mul(rows));
        let region = Rect::new(left, top, columns, rows).intersection(self.area);
        for pos in region.positions() {
            if let Some(c) = self.buf.cell_mut(pos) {
                c.set_char(symbol);
                c.set_style(Style::reset().patch(style));
            }
        }
    }
}
