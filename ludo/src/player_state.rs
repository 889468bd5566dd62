use serde::{Deserialize, Serialize};

use crate::{GridError, PlayerId};

/// Per-piece flags. The piece's position lives in the [`BoardGrid`](crate::BoardGrid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Has left home and not been captured since.
    pub released: bool,
    /// May turn into the home stretch when passing its owner's arm.
    pub home_eligible: bool,
    pub finished: bool,
}

impl Piece {
    /// Released and still on its way, i.e. can use any dice value.
    pub fn is_active(&self) -> bool {
        self.released && !self.finished
    }
}

/// The state for a single player during one match.
#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pieces: Vec<Piece>,
    pub score: u32,
    /// All pieces finished.
    pub completed: bool,
}

impl Player {
    pub fn new(id: PlayerId, piece_count: u8) -> Result<Self, GridError> {
        let mut pieces = Vec::new();
        pieces.try_reserve_exact(piece_count as usize)?;
        pieces.resize(piece_count as usize, Piece::default());
        Ok(Self {
            id,
            pieces,
            score: 0,
            completed: false,
        })
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, slot: u8) -> Option<&Piece> {
        self.pieces.get(slot as usize)
    }

    pub fn piece_mut(&mut self, slot: u8) -> Option<&mut Piece> {
        self.pieces.get_mut(slot as usize)
    }

    pub fn has_active_piece(&self) -> bool {
        self.pieces.iter().any(Piece::is_active)
    }

    pub fn has_piece_at_home(&self) -> bool {
        self.pieces.iter().any(|p| !p.released && !p.finished)
    }

    pub fn all_finished(&self) -> bool {
        self.pieces.iter().all(|p| p.finished)
    }

    /// Lets every piece of this player turn into the home stretch.
    pub fn unlock_home_stretch(&mut self) {
        for piece in &mut self.pieces {
            piece.home_eligible = true;
        }
    }

    /// Whether any piece could be moved with this dice value.
    pub fn can_use_roll(&self, value: u8) -> bool {
        self.has_active_piece() || (value == 6 && self.has_piece_at_home())
    }
}
