mod error;
mod grid;
mod track;

pub use error::*;
pub use grid::*;
pub use track::*;

use crate::{Piece, Player, PlayerId, Position};

/// Everything guarded by the match's state lock: the grid plus per-player data.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) grid: BoardGrid,
    pub(crate) players: Vec<Player>,
}

impl Board {
    /// Creates a board with every piece at home.
    ///
    /// Fails without allocating anything if `piece_count` is not between 1 and 4.
    pub fn new(piece_count: u8) -> Result<Self, GridError> {
        let grid = BoardGrid::new(piece_count)?;
        let mut players = Vec::new();
        players.try_reserve_exact(PlayerId::ALL.len())?;
        for id in PlayerId::ALL {
            players.push(Player::new(id, piece_count)?);
        }
        Ok(Self { grid, players })
    }

    pub fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    pub fn piece_count(&self) -> u8 {
        self.grid.piece_count()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    pub fn piece(&self, player: PlayerId, slot: u8) -> Option<(Position, &Piece)> {
        let position = self.grid.get(player, slot)?;
        let piece = self.player(player).piece(slot)?;
        Some((position, piece))
    }

    /// Returns captured pieces of `player` to their home yard.
    ///
    /// Returns how many pieces were reset.
    pub fn reset_captured(&mut self, player: PlayerId) -> usize {
        let mut count = 0;
        for slot in 0..self.piece_count() {
            if self.grid.get(player, slot) == Some(Position::CapturedPendingReset) {
                self.grid.set(player, slot, Position::AtHome);
                count += 1;
            }
        }
        count
    }
}
