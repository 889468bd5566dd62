use std::sync::{Mutex, MutexGuard, PoisonError};

use ludo::{
    piece_hit_box, Board, DiceExchange, DiceSource, GridError, IllegalAction, MoveError,
    MoveOutcome, PlayerId, Point, RandomDice, RollOutcome, Snapshot, TurnControl, TurnScheduler,
    DICE_BOX,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::MatchConfig;

/// What a click ended up doing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Rolled(RollOutcome),
    Moved(MoveOutcome),
}

/// All mutable state of one match, shared by the agents and the orchestrator.
///
/// The three locks are always taken in the order board, dice, turns, and
/// never held while waiting for input.
#[derive(Debug)]
pub struct MatchState {
    board: Mutex<Board>,
    dice: Mutex<DiceExchange>,
    turns: Mutex<TurnControl>,
}

/// Ignores lock poisoning. Critical sections leave the state consistent before they can panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MatchState {
    /// Sets up the board and hands out the first turn.
    pub fn new(
        piece_count: u8,
        dice: Box<dyn DiceSource>,
        scheduler: TurnScheduler,
    ) -> Result<Self, GridError> {
        let board = Board::new(piece_count)?;
        let mut turns = TurnControl::new(scheduler);
        let dice = DiceExchange::new(dice, &mut turns);
        Ok(Self {
            board: Mutex::new(board),
            dice: Mutex::new(dice),
            turns: Mutex::new(turns),
        })
    }

    /// Sets up a match with random turn order and dice.
    pub fn from_config(config: &MatchConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(seed, piece_count = config.piece_count, "New match");
        let mut rng = StdRng::seed_from_u64(seed);
        let scheduler = TurnScheduler::new(StdRng::seed_from_u64(rng.gen()));
        let dice = RandomDice::new(StdRng::seed_from_u64(rng.gen()));
        Ok(Self::new(config.piece_count, Box::new(dice), scheduler)?)
    }

    pub fn roll(&self, player: PlayerId) -> Result<RollOutcome, IllegalAction> {
        let board = lock(&self.board);
        let mut dice = lock(&self.dice);
        let mut turns = lock(&self.turns);
        let has_active_piece = board.player(player).has_active_piece();
        dice.roll(player, has_active_piece, &mut turns)
    }

    /// Moves a piece by the oldest buffered dice value.
    pub fn move_piece(&self, player: PlayerId, slot: u8) -> Result<MoveOutcome, MoveError> {
        let mut board = lock(&self.board);
        let mut dice = lock(&self.dice);
        self.move_locked(&mut board, &mut dice, player, slot)
    }

    fn move_locked(
        &self,
        board: &mut Board,
        dice: &mut DiceExchange,
        player: PlayerId,
        slot: u8,
    ) -> Result<MoveOutcome, MoveError> {
        let value = dice.move_value_for(player)?;
        let outcome = board.move_piece(player, slot, value)?;
        dice.consume_front();

        // A value no piece can use would stall the match
        let remaining = dice.buffer().front();
        if !remaining.is_some_and(|value| board.player(player).can_use_roll(value)) {
            if let Some(value) = remaining {
                debug!(%player, value, "Remaining dice values are unusable");
            }
            let mut turns = lock(&self.turns);
            dice.advance_turn(&mut turns);
        }
        Ok(outcome)
    }

    /// Rolls if `point` hits the dice, or moves the piece of `player` under `point`.
    pub fn handle_click(&self, player: PlayerId, point: Point) -> Result<ClickOutcome, MoveError> {
        if DICE_BOX.contains(point) {
            return Ok(ClickOutcome::Rolled(self.roll(player)?));
        }
        let mut board = lock(&self.board);
        let slot = (0..board.piece_count())
            .find(|&slot| {
                board.piece(player, slot).is_some_and(|(position, piece)| {
                    !piece.finished && piece_hit_box(player, slot, position).contains(point)
                })
            })
            .ok_or(IllegalAction::NothingClicked)?;
        let mut dice = lock(&self.dice);
        Ok(ClickOutcome::Moved(
            self.move_locked(&mut board, &mut dice, player, slot)?,
        ))
    }

    /// The player that a click should be handed to right now.
    pub fn click_target(&self) -> Option<PlayerId> {
        lock(&self.dice).state().permitted_player()
    }

    /// Returns captured pieces of `player` to their yard.
    pub fn reset_captured(&self, player: PlayerId) -> usize {
        lock(&self.board).reset_captured(player)
    }

    /// Records players whose pieces have all finished, and ends the match
    /// once only one player is left.
    ///
    /// Every player is recorded once. Returns the players recorded by this call.
    pub fn update_standings(&self) -> Vec<PlayerId> {
        let mut board = lock(&self.board);
        let mut dice = lock(&self.dice);
        let mut turns = lock(&self.turns);

        let mut newly_completed = Vec::new();
        for id in PlayerId::ALL {
            let player = board.player_mut(id);
            if player.completed || !player.all_finished() {
                continue;
            }
            player.completed = true;
            player.score += 1;
            turns.standings.record(id);
            newly_completed.push(id);
            info!(player = %id, place = turns.standings.winners().len(), "Player finished");
            if dice.holds_permission(id) {
                dice.advance_turn(&mut turns);
            }
        }

        if let Some(last) = turns.standings.last_remaining() {
            turns.standings.record(last);
            dice.halt();
            info!(last = %last, "Match over");
        }
        newly_completed
    }

    pub fn snapshot(&self) -> Snapshot {
        let board = lock(&self.board);
        let dice = lock(&self.dice);
        let turns = lock(&self.turns);
        Snapshot::capture(&board, &dice, &turns)
    }

    pub fn is_over(&self) -> bool {
        lock(&self.dice).is_halted()
    }

    /// Moves every piece of `player` straight to the finish.
    #[cfg(test)]
    pub(crate) fn finish_pieces(&self, player: PlayerId) {
        let mut board = lock(&self.board);
        let slots = board.piece_count();
        let player = board.player_mut(player);
        for slot in 0..slots {
            if let Some(piece) = player.piece_mut(slot) {
                piece.released = true;
                piece.finished = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ludo::{yard_pixel, Cell, ForfeitReason, Position, ScriptedDice, TurnPhase};

    use super::*;

    const P: [PlayerId; 4] = PlayerId::ALL;

    /// `queue` is handed out from the back.
    fn scripted_state(piece_count: u8, dice: &[u8], queue: Vec<PlayerId>) -> MatchState {
        let dice = ScriptedDice::new(dice.to_vec()).unwrap();
        let scheduler = TurnScheduler::with_queue(queue, StdRng::seed_from_u64(11));
        MatchState::new(piece_count, Box::new(dice), scheduler).unwrap()
    }

    fn position(state: &MatchState, player: PlayerId, slot: u8) -> Position {
        lock(&state.board).grid().get(player, slot).unwrap()
    }

    fn cell(quadrant: u8, lane: u8, offset: u8) -> Position {
        Cell::new(quadrant, lane, offset).unwrap().into()
    }

    #[test]
    fn release_and_advance_then_pass_turn() {
        let state = scripted_state(1, &[6, 4], vec![P[2], P[3], P[1], P[0]]);
        assert!(matches!(state.roll(P[0]), Ok(RollOutcome::BonusRoll { value: 6 })));
        assert!(matches!(state.roll(P[0]), Ok(RollOutcome::MustMove { value: 4 })));
        assert_eq!(state.click_target(), Some(P[0]));

        state.move_piece(P[0], 0).unwrap();
        assert_eq!(position(&state, P[0], 0), Cell::release(P[0]).into());
        // The 4 can be used by the released piece, so the turn stays
        assert_eq!(state.click_target(), Some(P[0]));

        state.move_piece(P[0], 0).unwrap();
        assert_eq!(position(&state, P[0], 0), cell(0, 2, 5));
        let snapshot = state.snapshot();
        assert_eq!(snapshot.turn.turn, P[1]);
        assert_eq!(snapshot.turn.phase, TurnPhase::AwaitingRoll);
        assert!(snapshot.dice.is_empty());
    }

    #[test]
    fn illegal_actions_change_nothing() {
        let state = scripted_state(2, &[3], vec![P[1], P[0]]);
        let before = state.snapshot();
        assert_eq!(
            state.roll(P[2]),
            Err(IllegalAction::NotYourTurn {
                player: P[2],
                turn: P[0]
            })
        );
        assert_eq!(
            state.move_piece(P[0], 0),
            Err(MoveError::Illegal(IllegalAction::MoveNotPermitted {
                player: P[0]
            }))
        );
        assert_eq!(
            state.handle_click(P[0], Point::new(5, 5)),
            Err(MoveError::Illegal(IllegalAction::NothingClicked))
        );
        assert_eq!(state.snapshot(), before);

        // Nothing on the track and no 6, so the roll is wasted
        assert!(matches!(
            state.roll(P[0]),
            Ok(RollOutcome::Forfeited {
                reason: ForfeitReason::NoActivePiece,
                ..
            })
        ));
        assert_eq!(state.click_target(), Some(P[1]));
    }

    #[test]
    fn capture_sends_piece_home_and_unlocks_capturer() {
        // Red walks one cell past its release cell, then blue needs two turns to land on it
        let state = scripted_state(1, &[6, 1, 6, 4, 6, 4], vec![P[1], P[3], P[3], P[0]]);
        let click_dice = |player| state.handle_click(player, DICE_BOX.center()).unwrap();

        click_dice(P[0]);
        click_dice(P[0]);
        state.move_piece(P[0], 0).unwrap();
        state.move_piece(P[0], 0).unwrap();
        assert_eq!(position(&state, P[0], 0), cell(0, 2, 2));

        for _ in 0..2 {
            click_dice(P[3]);
            click_dice(P[3]);
            state.move_piece(P[3], 0).unwrap();
            state.move_piece(P[3], 0).unwrap();
        }
        assert_eq!(position(&state, P[3], 0), cell(0, 2, 2));
        assert_eq!(position(&state, P[0], 0), Position::CapturedPendingReset);
        {
            let board = lock(&state.board);
            assert_eq!(board.player(P[3]).score, 1);
            assert!(board.player(P[3]).pieces().iter().all(|p| p.home_eligible));
            assert!(!board.player(P[0]).piece(0).unwrap().released);
        }

        assert_eq!(state.reset_captured(P[0]), 1);
        assert_eq!(position(&state, P[0], 0), Position::AtHome);
        assert_eq!(state.click_target(), Some(P[1]));
    }

    #[test]
    fn clicking_a_yard_piece_releases_it() {
        let state = scripted_state(2, &[6, 2], vec![P[0], P[1]]);
        state.handle_click(P[1], DICE_BOX.center()).unwrap();
        state.handle_click(P[1], DICE_BOX.center()).unwrap();
        let yard = yard_pixel(P[1], 1);
        let outcome = state
            .handle_click(P[1], Point::new(yard.x + 10, yard.y + 50))
            .unwrap();
        assert_eq!(
            outcome,
            ClickOutcome::Moved(MoveOutcome::Released {
                slot: 1,
                cell: Cell::release(P[1])
            })
        );
    }

    #[test]
    fn standings_are_recorded_once_and_end_the_match() {
        let state = scripted_state(1, &[6], vec![P[3], P[2], P[1], P[0]]);

        state.finish_pieces(P[0]);
        assert_eq!(state.update_standings(), vec![P[0]]);
        assert_eq!(state.update_standings(), vec![]);
        // Red held the turn, so it moved on
        assert_eq!(state.click_target(), Some(P[1]));
        assert_eq!(lock(&state.board).player(P[0]).score, 1);

        state.finish_pieces(P[2]);
        state.finish_pieces(P[1]);
        assert_eq!(state.update_standings(), vec![P[1], P[2]]);
        assert!(state.is_over());
        assert_eq!(state.click_target(), None);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.winners, vec![P[0], P[1], P[2], P[3]]);
        assert!(snapshot.finished);
        assert_eq!(state.roll(P[3]), Err(IllegalAction::MatchOver));
    }

    #[test]
    fn from_config_rejects_bad_piece_count() {
        let config = MatchConfig {
            piece_count: 0,
            ..MatchConfig::default()
        };
        let err = MatchState::from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "Each player needs between 1 and 4 pieces, got 0");
    }
}
