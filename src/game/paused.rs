use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{block::Padding, Block, Widget},
};

/// Selection state of the menu shown while a game is paused.  Up/Down and
/// Tab/Shift-Tab cycle through the options.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct PauseMenu {
    selection: PauseOpt,
}

impl PauseMenu {
    /// Handle an input event.  Returns `Some` once the player picks an option,
    /// either with Enter or with the option's own key.
    pub(super) fn handle_event(&mut self, event: &Event) -> Option<PauseOpt> {
        let cmd = Command::from_key_event(event.as_key_press_event()?)?;
        if let Some(opt) = PauseOpt::for_shortcut(cmd) {
            return Some(opt);
        }
        match cmd {
            Command::Enter => return Some(self.selection),
            Command::Up | Command::Prev => {
                self.selection = self.selection.prev().unwrap_or_else(PauseOpt::max);
            }
            Command::Down | Command::Next => {
                self.selection = self.selection.next().unwrap_or_else(PauseOpt::min);
            }
            Command::Home => self.selection = PauseOpt::min(),
            Command::End => self.selection = PauseOpt::max(),
            _ => (),
        }
        None
    }

    /// Build the pop-up for this menu, showing `score` along its bottom edge
    pub(super) fn popup(self, score: u32) -> PausePopup {
        PausePopup { menu: self, score }
    }
}

/// The choices in the pause menu
#[derive(Clone, Copy, Debug, Default, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    #[default]
    Resume,
    Restart,
    Quit,
}

impl PauseOpt {
    /// The option a key picks directly, bypassing the selection
    fn for_shortcut(cmd: Command) -> Option<PauseOpt> {
        match cmd {
            Command::Esc | Command::Pause => Some(PauseOpt::Resume),
            Command::R => Some(PauseOpt::Restart),
            Command::Q | Command::Quit => Some(PauseOpt::Quit),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Resume",
            PauseOpt::Restart => "Restart",
            PauseOpt::Quit => "Quit",
        }
    }

    /// The key advertised next to the label
    fn key(self) -> &'static str {
        match self {
            PauseOpt::Resume => "p",
            PauseOpt::Restart => "r",
            PauseOpt::Quit => "q",
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let marker = if selected { "» " } else { "  " };
        let line = Line::from_iter([
            Span::raw(marker),
            Span::raw(self.label()),
            Span::raw(" ("),
            Span::styled(self.key(), consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

/// The pause menu drawn as a bordered pop-up
///
/// ```text
/// ┌──── PAUSED ────┐
/// │ » Resume (p)   │
/// │   Restart (r)  │
/// │   Quit (q)     │
/// └── Score: 120 ──┘
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct PausePopup {
    menu: PauseMenu,
    score: u32,
}

impl PausePopup {
    /// The size of the `Rect` the pop-up should be rendered into
    pub(super) const SIZE: Size = Size {
        width: 18,
        height: 5,
    };
}

impl Widget for PausePopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(Line::from(" PAUSED ").centered())
            .title_bottom(Line::from(format!(" Score: {} ", self.score)).centered())
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.menu.selection == opt).render(row, buf);
        }
    }
}
