//! Pixel layout of the board, used to hit-test clicks and to place pieces.
//!
//! The board is a 15x15 grid of square cells. Quadrant 0 is the left arm,
//! quadrant 1 the top, 2 the right and 3 the bottom arm, so pieces travel
//! clockwise.

use serde::{Deserialize, Serialize};

use crate::{Cell, Lane, PlayerId, Position, Quadrant, NUM_PLAYERS};

/// Width and height of a single cell in pixels.
pub const CELL_SIZE: i32 = 60;
/// Number of cells along each side of the board.
pub const GRID_CELLS: usize = 15;
/// Width and height of the board in pixels.
pub const BOARD_SIZE: i32 = CELL_SIZE * GRID_CELLS as i32;
/// Clicking inside this area rolls the dice.
pub const DICE_BOX: Rect = Rect {
    x: 990,
    y: 500,
    width: 108,
    height: 108,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned area. The right and bottom edges are exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Where offset 0 of a lane lies on the grid and which way the offsets grow.
#[derive(Clone, Copy, Debug)]
struct LaneLayout {
    col: i32,
    row: i32,
    step: (i32, i32),
}

const fn lane(col: i32, row: i32, step: (i32, i32)) -> LaneLayout {
    LaneLayout { col, row, step }
}

/// Indexed by quadrant, then by lane (entry, stretch, exit).
const LANE_LAYOUT: [[LaneLayout; 3]; 4] = [
    [lane(5, 8, (-1, 0)), lane(0, 7, (1, 0)), lane(0, 6, (1, 0))],
    [lane(6, 5, (0, -1)), lane(7, 0, (0, 1)), lane(8, 0, (0, 1))],
    [lane(9, 6, (1, 0)), lane(14, 7, (-1, 0)), lane(14, 8, (-1, 0))],
    [lane(8, 9, (0, 1)), lane(7, 14, (0, -1)), lane(6, 14, (0, -1))],
];

/// Top-left pixel of each piece slot in a player's home yard.
const YARD_SLOTS: [[(i32, i32); 4]; NUM_PLAYERS] = [
    [(90, 90), (200, 90), (90, 200), (200, 200)],
    [(630, 90), (740, 90), (630, 200), (740, 200)],
    [(630, 630), (740, 740), (630, 740), (740, 630)],
    [(90, 630), (200, 630), (90, 740), (200, 740)],
];

/// Grid column and row of a cell.
pub fn cell_coordinates(cell: Cell) -> (usize, usize) {
    let layout = LANE_LAYOUT[cell.quadrant().index()][cell.lane() as usize];
    let offset = cell.offset() as i32;
    let col = layout.col + layout.step.0 * offset;
    let row = layout.row + layout.step.1 * offset;
    (col as usize, row as usize)
}

/// Top-left pixel of a cell.
pub fn cell_pixel(cell: Cell) -> Point {
    let (col, row) = cell_coordinates(cell);
    Point::new(col as i32 * CELL_SIZE, row as i32 * CELL_SIZE)
}

/// Top-left pixel of a yard slot. Slots beyond the fourth wrap around.
pub fn yard_pixel(player: PlayerId, slot: u8) -> Point {
    let (x, y) = YARD_SLOTS[player.index()][slot as usize % 4];
    Point::new(x, y)
}

/// Top-left pixel at which a piece is drawn.
///
/// Captured pieces are already drawn in their yard.
pub fn piece_pixel(player: PlayerId, slot: u8, position: Position) -> Point {
    match position {
        Position::OnTrack { cell } => cell_pixel(cell),
        Position::AtHome | Position::CapturedPendingReset => yard_pixel(player, slot),
    }
}

/// The area in which a click selects a piece.
pub fn piece_hit_box(player: PlayerId, slot: u8, position: Position) -> Rect {
    let Point { x, y } = piece_pixel(player, slot, position);
    Rect {
        x,
        y,
        width: CELL_SIZE,
        height: CELL_SIZE,
    }
}

/// What a grid cell of the board shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Blank,
    Yard(PlayerId),
    Track,
    Safe,
    HomeStretch(PlayerId),
    Centre,
}

/// The static layout of the board, indexed by row and then column.
pub fn board_layout() -> [[CellKind; GRID_CELLS]; GRID_CELLS] {
    let mut layout = [[CellKind::Blank; GRID_CELLS]; GRID_CELLS];
    for (row, cells) in layout.iter_mut().enumerate() {
        for (col, kind) in cells.iter_mut().enumerate() {
            *kind = match (col, row) {
                (0..=5, 0..=5) => CellKind::Yard(PlayerId::ALL[0]),
                (9..=14, 0..=5) => CellKind::Yard(PlayerId::ALL[1]),
                (9..=14, 9..=14) => CellKind::Yard(PlayerId::ALL[2]),
                (0..=5, 9..=14) => CellKind::Yard(PlayerId::ALL[3]),
                (6..=8, 6..=8) => CellKind::Centre,
                _ => CellKind::Blank,
            };
        }
    }
    for cell in all_cells() {
        let (col, row) = cell_coordinates(cell);
        let owner = cell.quadrant().owner();
        if cell == Cell::finish(owner) {
            continue;
        }
        layout[row][col] = if cell.is_home_stretch() {
            CellKind::HomeStretch(owner)
        } else if cell.is_safe() {
            CellKind::Safe
        } else {
            CellKind::Track
        };
    }
    layout
}

fn all_cells() -> impl Iterator<Item = Cell> {
    Quadrant::ALL.into_iter().flat_map(|quadrant| {
        Lane::ALL.into_iter().flat_map(move |lane| {
            (0..=lane.max_offset()).filter_map(move |offset| Cell::at(quadrant, lane, offset).ok())
        })
    })
}
