use ratatui::layout::Size;
use std::num::NonZeroU16;

/// A position on the board, measured in grid units from the top-left corner.
///
/// Coordinates are signed so that a step off the edge of the board produces a
/// representable (but out-of-bounds) cell.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Cell {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl Cell {
    pub(crate) const fn new(x: i32, y: i32) -> Cell {
        Cell { x, y }
    }
}

/// The size of one board cell on the rendering surface.
///
/// A cell is `columns()` terminal columns wide and `rows()` terminal rows
/// tall; a terminal row is roughly twice as tall as a column is wide, so the
/// row count is half the column count, rounded up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct GridUnit(NonZeroU16);

impl GridUnit {
    pub(crate) fn new(columns: u16) -> Option<GridUnit> {
        NonZeroU16::new(columns).map(GridUnit)
    }

    pub(crate) fn columns(self) -> u16 {
        self.0.get()
    }

    pub(crate) fn rows(self) -> u16 {
        self.0.get().div_ceil(2)
    }
}

impl Default for GridUnit {
    fn default() -> GridUnit {
        GridUnit(NonZeroU16::MIN.saturating_add(1))
    }
}

/// The playing field: `width` × `height` grid units
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Board {
    width: u16,
    height: u16,
}

impl Board {
    pub(crate) const fn new(width: u16, height: u16) -> Board {
        Board { width, height }
    }

    /// Compute the largest board whose cells fit inside a rendering surface of
    /// the given size
    pub(crate) fn from_surface(surface: Size, unit: GridUnit) -> Board {
        Board::new(surface.width / unit.columns(), surface.height / unit.rows())
    }

    /// Grow the board, if necessary, so that a horizontal snake of length
    /// `snake_len` fits on it with at least one cell to spare
    pub(crate) fn fit_snake(self, snake_len: usize) -> Board {
        let min_width = u16::try_from(snake_len.saturating_add(1)).unwrap_or(u16::MAX);
        Board::new(self.width.max(min_width), self.height.max(1))
    }

    pub(crate) fn width(self) -> u16 {
        self.width
    }

    pub(crate) fn height(self) -> u16 {
        self.height
    }

    pub(crate) fn contains(self, cell: Cell) -> bool {
        (0..i32::from(self.width)).contains(&cell.x)
            && (0..i32::from(self.height)).contains(&cell.y)
    }

    /// Iterate over every cell on the board in row-major order
    pub(crate) fn cells(self) -> Cells {
        Cells {
            board: self,
            next: Cell::new(0, 0),
        }
    }

    /// The size of the board in terminal cells when drawn with `unit`
    pub(crate) fn surface_size(self, unit: GridUnit) -> Size {
        Size {
            width: self.width.saturating_mul(unit.columns()),
            height: self.height.saturating_mul(unit.rows()),
        }
    }
}

/// Iterator returned by [`Board::cells()`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Cells {
    board: Board,
    next: Cell,
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if !self.board.contains(self.next) {
            return None;
        }
        let cell = self.next;
        self.next.x += 1;
        if self.next.x >= i32::from(self.board.width) {
            self.next.x = 0;
            self.next.y += 1;
        }
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_grid_unit() {
        let unit = GridUnit::default();
        assert_eq!(unit.columns(), 2);
        assert_eq!(unit.rows(), 1);
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 2)]
    #[case(4, 2)]
    fn grid_unit_rows(#[case] columns: u16, #[case] rows: u16) {
        let unit = GridUnit::new(columns).expect("nonzero unit");
        assert_eq!(unit.rows(), rows);
    }

    #[test]
    fn zero_grid_unit() {
        assert_eq!(GridUnit::new(0), None);
    }

    #[rstest]
    #[case(Size::new(80, 20), 2, Board::new(40, 20))]
    #[case(Size::new(81, 21), 2, Board::new(40, 21))]
    #[case(Size::new(80, 20), 4, Board::new(20, 10))]
    #[case(Size::new(80, 20), 1, Board::new(80, 20))]
    #[case(Size::new(1, 0), 2, Board::new(0, 0))]
    fn test_from_surface(#[case] surface: Size, #[case] unit: u16, #[case] board: Board) {
        let unit = GridUnit::new(unit).expect("nonzero unit");
        assert_eq!(Board::from_surface(surface, unit), board);
    }

    #[rstest]
    #[case(Board::new(40, 20), 3, Board::new(40, 20))]
    #[case(Board::new(2, 0), 3, Board::new(4, 1))]
    #[case(Board::new(0, 5), 1, Board::new(2, 5))]
    fn test_fit_snake(#[case] board: Board, #[case] len: usize, #[case] fitted: Board) {
        assert_eq!(board.fit_snake(len), fitted);
    }

    #[rstest]
    #[case(Cell::new(0, 0), true)]
    #[case(Cell::new(9, 4), true)]
    #[case(Cell::new(10, 4), false)]
    #[case(Cell::new(9, 5), false)]
    #[case(Cell::new(-1, 0), false)]
    #[case(Cell::new(0, -1), false)]
    fn test_contains(#[case] cell: Cell, #[case] inside: bool) {
        assert_eq!(Board::new(10, 5).contains(cell), inside);
    }

    #[test]
    fn cells_cover_board() {
        let board = Board::new(3, 2);
        assert_eq!(
            board.cells().collect::<Vec<_>>(),
            [
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(2, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(2, 1),
            ]
        );
    }

    #[test]
    fn empty_board_has_no_cells() {
        assert_eq!(Board::new(0, 3).cells().next(), None);
        assert_eq!(Board::new(3, 0).cells().next(), None);
    }

    #[test]
    fn test_surface_size() {
        let unit = GridUnit::new(4).expect("nonzero unit");
        assert_eq!(Board::new(10, 5).surface_size(unit), Size::new(40, 10));
    }
}
