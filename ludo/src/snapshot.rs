use serde::{Deserialize, Serialize};

use crate::{piece_pixel, Board, DiceExchange, PlayerId, Point, Position, TurnControl, TurnState};

/// How a single piece should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    pub player: PlayerId,
    pub slot: u8,
    pub position: Position,
    /// Top-left pixel of the piece.
    pub pixel: Point,
    pub finished: bool,
}

/// A copy of everything a frontend needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub pieces: Vec<PieceView>,
    /// Values rolled this turn and not used yet.
    pub dice: Vec<u8>,
    pub last_roll: Option<u8>,
    pub turn: TurnState,
    pub scores: [u32; 4],
    pub winners: Vec<PlayerId>,
    pub finished: bool,
}

impl Snapshot {
    /// Takes a snapshot while the caller holds all three locks.
    pub fn capture(board: &Board, dice: &DiceExchange, turns: &TurnControl) -> Self {
        let mut pieces = Vec::with_capacity(board.players().len() * board.piece_count() as usize);
        let mut scores = [0; 4];
        for player in board.players() {
            scores[player.id.index()] = player.score;
            let positions = board.grid().row(player.id);
            for ((slot, &position), piece) in (0u8..).zip(positions).zip(player.pieces()) {
                pieces.push(PieceView {
                    player: player.id,
                    slot,
                    position,
                    pixel: piece_pixel(player.id, slot, position),
                    finished: piece.finished,
                });
            }
        }
        Self {
            pieces,
            dice: dice.buffer().iter().collect(),
            last_roll: dice.last_roll(),
            turn: dice.state(),
            scores,
            winners: turns.standings.winners().to_vec(),
            finished: dice.is_halted() || turns.standings.is_decided(),
        }
    }

    pub fn pieces_of(&self, player: PlayerId) -> impl Iterator<Item = &PieceView> {
        self.pieces.iter().filter(move |p| p.player == player)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::{Cell, ScriptedDice, TurnPhase, TurnScheduler};

    fn setup() -> (Board, DiceExchange, TurnControl) {
        let board = Board::new(2).unwrap();
        let mut turns = TurnControl::new(TurnScheduler::with_queue(
            vec![PlayerId::ALL[2]],
            StdRng::seed_from_u64(3),
        ));
        let dice = DiceExchange::new(Box::new(ScriptedDice::new(vec![6]).unwrap()), &mut turns);
        (board, dice, turns)
    }

    #[test]
    fn captures_every_piece() {
        let (mut board, dice, turns) = setup();
        let p1 = PlayerId::ALL[1];
        board.move_piece(p1, 1, 6).unwrap();

        let snapshot = Snapshot::capture(&board, &dice, &turns);
        assert_eq!(snapshot.pieces.len(), 8);
        assert_eq!(snapshot.turn.turn, PlayerId::ALL[2]);
        assert_eq!(snapshot.turn.phase, TurnPhase::AwaitingRoll);
        assert!(!snapshot.finished);

        let released = snapshot.pieces_of(p1).find(|p| p.slot == 1).unwrap();
        assert_eq!(released.position, Position::from(Cell::release(p1)));
        assert_eq!(released.pixel, crate::cell_pixel(Cell::release(p1)));
    }

    #[test]
    fn serializes_to_json() {
        let (board, dice, turns) = setup();
        let snapshot = Snapshot::capture(&board, &dice, &turns);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["turn"]["phase"], "awaiting_roll");
        assert_eq!(json["turn"]["turn"], 2);
        assert_eq!(json["pieces"][0]["position"], serde_json::json!([-1, -1, -1]));
        let back: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
