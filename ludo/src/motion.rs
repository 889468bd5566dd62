use tracing::{debug, trace};

use crate::{
    ring_link, Board, Cell, IllegalAction, InvalidPosition, Lane, MoveError, PlayerId, Position,
    FINISH_OFFSET,
};

/// Where a piece ends up after walking a number of steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Traversal {
    pub to: Cell,
    /// The piece crossed from the previous quadrant into its owner's quadrant,
    /// which unlocks the home stretch for all of the owner's pieces.
    pub entered_home_quadrant: bool,
    pub finished: bool,
}

/// Summarizes the effect of moving a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Released {
        slot: u8,
        cell: Cell,
    },
    Moved {
        slot: u8,
        from: Cell,
        to: Cell,
        finished: bool,
        /// Opposing pieces sent home by this move.
        captured: Vec<(PlayerId, u8)>,
        unlocked_home: bool,
    },
}

/// Walks `steps` cells from `from` for a piece of `owner`.
///
/// Follows the ring table lane by lane. A piece that is home-stretch eligible
/// turns into its owner's stretch lane at the tip of the owner's arm and
/// stops at the finishing offset at the latest.
///
/// A piece that is inside a home stretch it may not use is an invariant
/// violation and yields an error instead of a position.
pub fn traverse(
    from: Cell,
    steps: u8,
    owner: PlayerId,
    home_eligible: bool,
) -> Result<Traversal, InvalidPosition> {
    let home = owner.home_quadrant();
    if from.is_home_stretch() && !(home_eligible && from.quadrant() == home) {
        let (quadrant, lane, offset) = Position::from(from).to_raw();
        return Err(InvalidPosition {
            quadrant,
            lane,
            offset,
        });
    }

    let mut cell = from;
    let mut remaining = steps;
    let mut eligible = home_eligible;
    let mut entered_home_quadrant = false;
    loop {
        if eligible && cell.quadrant() == home && cell.lane() == Lane::Stretch {
            let offset = (cell.offset() + remaining).min(FINISH_OFFSET);
            return Ok(Traversal {
                to: cell.with_offset(offset)?,
                entered_home_quadrant,
                finished: offset == FINISH_OFFSET,
            });
        }

        let link = ring_link(cell.quadrant(), cell.lane());
        let overflow = (cell.offset() + remaining).saturating_sub(link.last_offset);
        let in_lane = remaining - overflow;
        cell = cell.with_offset(cell.offset() + in_lane)?;
        if overflow == 0 {
            break;
        }

        // Stepping onto the next lane costs one step
        if link.next_lane == Lane::Entry && link.next_quadrant == home {
            eligible = true;
            entered_home_quadrant = true;
        }
        cell = Cell::at(link.next_quadrant, link.next_lane, 0)?;
        remaining = overflow - 1;
    }

    Ok(Traversal {
        to: cell,
        entered_home_quadrant,
        finished: false,
    })
}

impl Board {
    /// Moves a piece by a dice value.
    ///
    /// A piece at home can only be released, and only with a 6. A piece on
    /// the track walks `steps` cells, captures any opposing pieces on the cell
    /// it lands on, and may unlock the home stretch for its owner.
    ///
    /// On error, the board is unchanged.
    pub fn move_piece(
        &mut self,
        player: PlayerId,
        slot: u8,
        steps: u8,
    ) -> Result<MoveOutcome, MoveError> {
        if steps == 0 {
            return Err(IllegalAction::ZeroSteps.into());
        }
        if steps > 6 {
            return Err(IllegalAction::RollOutOfRange { value: steps }.into());
        }
        let (position, piece) = self
            .piece(player, slot)
            .ok_or(IllegalAction::NoSuchPiece { slot })?;
        let piece = *piece;
        if piece.finished {
            return Err(IllegalAction::PieceFinished { slot }.into());
        }

        let from = match position {
            Position::CapturedPendingReset => {
                return Err(IllegalAction::PieceNotOnBoard { slot }.into())
            }
            Position::AtHome if steps != 6 => {
                return Err(IllegalAction::NeedSixToRelease { rolled: steps }.into())
            }
            Position::AtHome => return Ok(self.release(player, slot)),
            Position::OnTrack { cell } => cell,
        };

        let traversal = traverse(from, steps, player, piece.home_eligible)?;
        let to = traversal.to;
        trace!(%player, slot, steps, %from, %to, "Moving piece");

        self.grid.set(player, slot, to.into());
        if let Some(piece) = self.player_mut(player).piece_mut(slot) {
            piece.finished = traversal.finished;
            if traversal.entered_home_quadrant {
                piece.home_eligible = true;
            }
        }

        let captured = if traversal.finished {
            Vec::new()
        } else {
            self.resolve_capture(player, to)
        };
        if traversal.entered_home_quadrant {
            debug!(%player, slot, "Piece completed a circuit, home stretch unlocked");
            self.player_mut(player).unlock_home_stretch();
        }

        Ok(MoveOutcome::Moved {
            slot,
            from,
            to,
            finished: traversal.finished,
            captured,
            unlocked_home: traversal.entered_home_quadrant,
        })
    }

    fn release(&mut self, player: PlayerId, slot: u8) -> MoveOutcome {
        let cell = Cell::release(player);
        self.grid.set(player, slot, cell.into());
        if let Some(piece) = self.player_mut(player).piece_mut(slot) {
            piece.released = true;
        }
        trace!(%player, slot, %cell, "Released piece");
        MoveOutcome::Released { slot, cell }
    }

    /// Captures every opposing, unfinished piece on `cell`.
    ///
    /// Each capture sends the piece home (pending reset), gives `mover` one
    /// point, and unlocks the home stretch for all of `mover`'s pieces.
    /// Nothing is captured on safe cells.
    pub fn resolve_capture(&mut self, mover: PlayerId, cell: Cell) -> Vec<(PlayerId, u8)> {
        if cell.is_safe() || cell.is_home_stretch() {
            return Vec::new();
        }
        let victims: Vec<(PlayerId, u8)> = self
            .grid
            .occupants(cell)
            .filter(|&(owner, slot)| {
                owner != mover
                    && self
                        .player(owner)
                        .piece(slot)
                        .is_some_and(|piece| !piece.finished)
            })
            .collect();

        for &(owner, slot) in &victims {
            self.grid.set(owner, slot, Position::CapturedPendingReset);
            if let Some(piece) = self.player_mut(owner).piece_mut(slot) {
                piece.released = false;
            }
            let capturer = self.player_mut(mover);
            capturer.score += 1;
            capturer.unlock_home_stretch();
            debug!(%mover, victim = %owner, slot, %cell, "Captured piece");
        }
        victims
    }
}
