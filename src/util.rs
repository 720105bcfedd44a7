use enum_map::Enum;
use ratatui::layout::{Flex, Layout, Rect, Size};

/// Number of terminal rows on the game screen not taken up by the board: the
/// score bar, the message line, and the board's top & bottom borders
const CHROME_HEIGHT: u16 = 4;

/// Number of terminal columns on the game screen not taken up by the board:
/// the board's left & right borders
const CHROME_WIDTH: u16 = 2;

/// Navigation over the variants of a fieldless enum in declaration order
pub(crate) trait EnumExt: Enum {
    fn min() -> Self {
        Self::from_usize(0)
    }

    fn max() -> Self {
        Self::from_usize(Self::LENGTH.saturating_sub(1))
    }

    fn next(self) -> Option<Self> {
        let i = self.into_usize().saturating_add(1);
        (i < Self::LENGTH).then(|| Self::from_usize(i))
    }

    fn prev(self) -> Option<Self> {
        self.into_usize().checked_sub(1).map(Self::from_usize)
    }

    fn iter() -> impl Iterator<Item = Self> {
        (0..Self::LENGTH).map(Self::from_usize)
    }
}

impl<T: Enum> EnumExt for T {}

/// Return a `Rect` of the given size centered within `area`, shrunk to fit if
/// `area` is too small
pub(crate) fn center_rect(area: Rect, size: Size) -> Rect {
    let [area] = Layout::horizontal([size.width])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([size.height])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Return the size of the region of a terminal of the given size that is
/// available for drawing the board's cells
pub(crate) fn board_surface(terminal: Size) -> Size {
    Size {
        width: terminal.width.saturating_sub(CHROME_WIDTH),
        height: terminal.height.saturating_sub(CHROME_HEIGHT),
    }
}
