use crate::{Cell, ConfigError, GridError, PlayerId, Position, NUM_PLAYERS};

pub const MAX_PIECES: u8 = 4;

/// The authoritative table of where every piece is.
///
/// There is one row per player and one entry per piece slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardGrid {
    piece_count: u8,
    rows: Vec<Vec<Position>>,
}

impl BoardGrid {
    /// Allocates a grid with every piece at home.
    ///
    /// The piece count is validated before anything is allocated. If a row
    /// cannot be allocated, the rows allocated so far are dropped.
    pub fn new(piece_count: u8) -> Result<Self, GridError> {
        if !(1..=MAX_PIECES).contains(&piece_count) {
            return Err(ConfigError::InvalidPieceCount(piece_count).into());
        }
        let mut rows = Vec::new();
        rows.try_reserve_exact(NUM_PLAYERS)?;
        for _ in 0..NUM_PLAYERS {
            let mut row = Vec::new();
            row.try_reserve_exact(piece_count as usize)?;
            row.resize(piece_count as usize, Position::AtHome);
            rows.push(row);
        }
        Ok(Self { piece_count, rows })
    }

    pub fn piece_count(&self) -> u8 {
        self.piece_count
    }

    pub fn get(&self, player: PlayerId, slot: u8) -> Option<Position> {
        self.rows[player.index()].get(slot as usize).copied()
    }

    pub(crate) fn set(&mut self, player: PlayerId, slot: u8, position: Position) {
        if let Some(entry) = self.rows[player.index()].get_mut(slot as usize) {
            *entry = position;
        }
    }

    pub fn row(&self, player: PlayerId) -> &[Position] {
        &self.rows[player.index()]
    }

    /// All pieces standing on `cell`, as `(player, slot)` pairs.
    pub fn occupants(&self, cell: Cell) -> impl Iterator<Item = (PlayerId, u8)> + '_ {
        PlayerId::ALL.into_iter().flat_map(move |player| {
            self.rows[player.index()]
                .iter()
                .enumerate()
                .filter(move |(_, pos)| **pos == Position::from(cell))
                .map(move |(slot, _)| (player, slot as u8))
        })
    }
}
