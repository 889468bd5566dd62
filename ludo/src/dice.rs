use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{ConfigError, IllegalAction, PlayerId, TurnControl};

/// Rolling a 6 this many times in one turn forfeits the turn.
pub const MAX_ROLLS_PER_TURN: u8 = 3;

/// Where dice values come from.
pub trait DiceSource: Send + std::fmt::Debug {
    /// A value between 1 and 6.
    fn roll(&mut self) -> u8;
}

#[derive(Clone, Debug)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Replays a fixed sequence of values, starting over when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    values: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    pub fn new(values: Vec<u8>) -> Result<Self, ConfigError> {
        if values.is_empty() || values.iter().any(|v| !(1..=6).contains(v)) {
            return Err(ConfigError::InvalidDiceScript);
        }
        Ok(Self { values, next: 0 })
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let value = self.values[self.next];
        self.next = (self.next + 1) % self.values.len();
        value
    }
}

/// Which action the turn holder may take next.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    AwaitingRoll,
    AwaitingMove,
    /// Nobody may act anymore.
    Halted,
}

/// Whose turn it is and what they may do.
///
/// Because the phase is a single value, rolling and moving can never be
/// permitted at the same time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// The player that may roll.
    pub turn: PlayerId,
    /// The player that rolled last, and so may move.
    pub last_turn: PlayerId,
    pub phase: TurnPhase,
}

impl TurnState {
    pub fn roll_permitted_for(&self, player: PlayerId) -> Result<(), IllegalAction> {
        match self.phase {
            TurnPhase::Halted => Err(IllegalAction::MatchOver),
            _ if player != self.turn => Err(IllegalAction::NotYourTurn {
                player,
                turn: self.turn,
            }),
            TurnPhase::AwaitingMove => Err(IllegalAction::RollNotPermitted),
            TurnPhase::AwaitingRoll => Ok(()),
        }
    }

    pub fn move_permitted_for(&self, player: PlayerId) -> Result<(), IllegalAction> {
        match self.phase {
            TurnPhase::Halted => Err(IllegalAction::MatchOver),
            TurnPhase::AwaitingMove if player == self.last_turn => Ok(()),
            _ => Err(IllegalAction::MoveNotPermitted { player }),
        }
    }

    /// The player whose click would currently be meaningful.
    pub fn permitted_player(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::AwaitingRoll => Some(self.turn),
            TurnPhase::AwaitingMove => Some(self.last_turn),
            TurnPhase::Halted => None,
        }
    }
}

/// Pending roll values of the current turn, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceBuffer {
    values: VecDeque<u8>,
}

impl DiceBuffer {
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }

    pub fn front(&self) -> Option<u8> {
        self.values.front().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, value: u8) {
        self.values.push_back(value);
    }

    fn pop_front(&mut self) -> Option<u8> {
        self.values.pop_front()
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Why a turn ended without a move.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForfeitReason {
    ThreeSixes,
    /// Nothing on the track and no 6 to release a piece with.
    NoActivePiece,
}

/// Summarizes the effect of a roll.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RollOutcome {
    /// A 6: the same player rolls again.
    BonusRoll { value: u8 },
    /// The player now has to move pieces using the buffered values.
    MustMove { value: u8 },
    /// The buffer was discarded and the turn went to `next`.
    Forfeited {
        value: u8,
        reason: ForfeitReason,
        next: Option<PlayerId>,
    },
}

/// Everything guarded by the dice lock: the turn state, the buffered values
/// and the dice themselves.
#[derive(Debug)]
pub struct DiceExchange {
    state: TurnState,
    buffer: DiceBuffer,
    roll_count: u8,
    last_roll: Option<u8>,
    source: Box<dyn DiceSource>,
}

impl DiceExchange {
    /// Creates the exchange and hands the first turn out.
    pub fn new(source: Box<dyn DiceSource>, turns: &mut TurnControl) -> Self {
        let mut exchange = Self {
            state: TurnState {
                turn: PlayerId::ALL[0],
                last_turn: PlayerId::ALL[0],
                phase: TurnPhase::Halted,
            },
            buffer: DiceBuffer::default(),
            roll_count: 0,
            last_roll: None,
            source,
        };
        exchange.advance_turn(turns);
        exchange
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn buffer(&self) -> &DiceBuffer {
        &self.buffer
    }

    pub fn last_roll(&self) -> Option<u8> {
        self.last_roll
    }

    pub fn roll_count(&self) -> u8 {
        self.roll_count
    }

    /// Rolls the dice for `player`.
    ///
    /// `has_active_piece` tells whether the player has a piece on the track
    /// that could use a value other than 6.
    pub fn roll(
        &mut self,
        player: PlayerId,
        has_active_piece: bool,
        turns: &mut TurnControl,
    ) -> Result<RollOutcome, IllegalAction> {
        self.state.roll_permitted_for(player)?;
        let value = self.source.roll();
        self.apply_roll(value, has_active_piece, turns)
    }

    fn apply_roll(
        &mut self,
        value: u8,
        has_active_piece: bool,
        turns: &mut TurnControl,
    ) -> Result<RollOutcome, IllegalAction> {
        if !(1..=6).contains(&value) {
            return Err(IllegalAction::RollOutOfRange { value });
        }
        let player = self.state.turn;
        self.roll_count += 1;
        self.last_roll = Some(value);
        self.buffer.push(value);
        trace!(%player, value, count = self.roll_count, "Rolled");

        if value == 6 && self.roll_count >= MAX_ROLLS_PER_TURN {
            let next = self.advance_turn(turns);
            debug!(%player, "Three sixes, turn forfeited");
            return Ok(RollOutcome::Forfeited {
                value,
                reason: ForfeitReason::ThreeSixes,
                next,
            });
        }
        if value == 6 {
            return Ok(RollOutcome::BonusRoll { value });
        }
        if has_active_piece || self.buffer.front() == Some(6) {
            self.state.last_turn = player;
            self.state.phase = TurnPhase::AwaitingMove;
            return Ok(RollOutcome::MustMove { value });
        }

        let next = self.advance_turn(turns);
        debug!(%player, value, "No piece can move, roll wasted");
        Ok(RollOutcome::Forfeited {
            value,
            reason: ForfeitReason::NoActivePiece,
            next,
        })
    }

    /// The value `player` would move with, if they may move.
    pub fn move_value_for(&self, player: PlayerId) -> Result<u8, IllegalAction> {
        self.state.move_permitted_for(player)?;
        self.buffer
            .front()
            .ok_or(IllegalAction::MoveNotPermitted { player })
    }

    /// Drops the value that was just used for a move.
    pub fn consume_front(&mut self) -> Option<u8> {
        self.buffer.pop_front()
    }

    /// Whether `player` currently holds the roll or move permission.
    pub fn holds_permission(&self, player: PlayerId) -> bool {
        self.state.permitted_player() == Some(player)
    }

    /// Discards the buffer and gives the turn to the next scheduled player.
    ///
    /// Halts the exchange when nobody is left to play.
    pub fn advance_turn(&mut self, turns: &mut TurnControl) -> Option<PlayerId> {
        self.buffer.clear();
        self.roll_count = 0;
        let next = turns.next_turn();
        match next {
            Some(player) => {
                self.state = TurnState {
                    turn: player,
                    last_turn: player,
                    phase: TurnPhase::AwaitingRoll,
                };
                debug!(%player, "Turn passes");
            }
            None => self.halt(),
        }
        next
    }

    pub fn halt(&mut self) {
        self.buffer.clear();
        self.state.phase = TurnPhase::Halted;
    }

    pub fn is_halted(&self) -> bool {
        self.state.phase == TurnPhase::Halted
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;
    use rand::SeedableRng;

    use super::*;
    use crate::arbitrary::RollSequence;
    use crate::{TurnScheduler, NUM_PLAYERS};

    fn fixed_turns(queue: Vec<PlayerId>) -> TurnControl {
        TurnControl::new(TurnScheduler::with_queue(queue, StdRng::seed_from_u64(0)))
    }

    fn scripted(values: &[u8], turns: &mut TurnControl) -> DiceExchange {
        let dice = ScriptedDice::new(values.to_vec()).unwrap();
        DiceExchange::new(Box::new(dice), turns)
    }

    quickcheck! {
        fn three_sixes_always_forfeit(prefix: RollSequence, has_active: bool) -> bool {
            let mut turns = TurnControl::new(TurnScheduler::new(StdRng::seed_from_u64(1)));
            let mut exchange = scripted(&[1], &mut turns);
            // Play arbitrary turns first so the buffer and counters are in any reachable state
            for value in prefix.0 {
                if exchange.state.phase == TurnPhase::AwaitingMove {
                    exchange.advance_turn(&mut turns);
                }
                exchange.apply_roll(value, has_active, &mut turns).unwrap();
            }
            if exchange.state.phase == TurnPhase::AwaitingMove {
                exchange.advance_turn(&mut turns);
            }
            // Finish the current run of sixes with fresh sixes
            let queued = turns.scheduler.queue().to_vec();
            while exchange.roll_count < MAX_ROLLS_PER_TURN - 1 {
                exchange.apply_roll(6, has_active, &mut turns).unwrap();
            }
            let outcome = exchange.apply_roll(6, has_active, &mut turns).unwrap();
            matches!(
                outcome,
                RollOutcome::Forfeited { reason: ForfeitReason::ThreeSixes, .. }
            ) && exchange.buffer.is_empty()
                && exchange.roll_count == 0
                && exchange.state.phase == TurnPhase::AwaitingRoll
                && match queued.split_last() {
                    // The next queued player takes over
                    Some((&next, rest)) => {
                        exchange.state.turn == next && turns.scheduler.queue() == rest
                    }
                    // A fresh round was drawn and its first player popped
                    None => turns.scheduler.queue().len() == NUM_PLAYERS - 1,
                }
        }

        fn buffer_holds_at_most_three(rolls: RollSequence, has_active: bool) -> bool {
            let mut turns = TurnControl::new(TurnScheduler::new(StdRng::seed_from_u64(2)));
            let mut exchange = scripted(&[1], &mut turns);
            rolls.0.into_iter().all(|value| {
                if exchange.state.phase == TurnPhase::AwaitingMove {
                    exchange.advance_turn(&mut turns);
                }
                exchange.apply_roll(value, has_active, &mut turns).is_ok()
                    && exchange.buffer.len() <= MAX_ROLLS_PER_TURN as usize
            })
        }
    }

    #[test]
    fn six_grants_bonus_roll() {
        let [p0, p1, ..] = PlayerId::ALL;
        let mut turns = fixed_turns(vec![p1, p0]);
        let mut exchange = scripted(&[6, 2], &mut turns);
        assert_eq!(exchange.state().turn, p0);
        assert_eq!(
            exchange.roll(p0, false, &mut turns),
            Ok(RollOutcome::BonusRoll { value: 6 })
        );
        assert_eq!(exchange.state().phase, TurnPhase::AwaitingRoll);
        // The first value was a 6, so a piece can be released
        assert_eq!(
            exchange.roll(p0, false, &mut turns),
            Ok(RollOutcome::MustMove { value: 2 })
        );
        assert_eq!(exchange.buffer().iter().collect::<Vec<_>>(), [6, 2]);
        assert_eq!(exchange.move_value_for(p0), Ok(6));
        assert_eq!(
            exchange.move_value_for(p1),
            Err(IllegalAction::MoveNotPermitted { player: p1 })
        );
        assert_eq!(
            exchange.roll(p0, false, &mut turns),
            Err(IllegalAction::RollNotPermitted)
        );
    }

    #[test]
    fn moves_use_the_oldest_value_first() {
        let [p0, p1, ..] = PlayerId::ALL;
        let mut turns = fixed_turns(vec![p1, p0]);
        let mut exchange = scripted(&[6, 5, 3], &mut turns);
        assert_eq!(
            exchange.roll(p0, true, &mut turns),
            Ok(RollOutcome::BonusRoll { value: 6 })
        );
        assert_eq!(
            exchange.roll(p0, true, &mut turns),
            Ok(RollOutcome::MustMove { value: 5 })
        );

        assert_eq!(exchange.move_value_for(p0), Ok(6));
        assert_eq!(exchange.consume_front(), Some(6));
        assert_eq!(exchange.move_value_for(p0), Ok(5));
        assert_eq!(exchange.consume_front(), Some(5));
        assert_eq!(exchange.consume_front(), None);
        assert!(exchange.buffer().is_empty());
    }

    #[test]
    fn roll_without_active_piece_is_wasted() {
        let [p0, p1, ..] = PlayerId::ALL;
        let mut turns = fixed_turns(vec![p1, p0]);
        let mut exchange = scripted(&[3], &mut turns);
        assert_eq!(
            exchange.roll(p0, false, &mut turns),
            Ok(RollOutcome::Forfeited {
                value: 3,
                reason: ForfeitReason::NoActivePiece,
                next: Some(p1)
            })
        );
        assert!(exchange.buffer().is_empty());
        assert_eq!(exchange.state().turn, p1);
        assert_eq!(exchange.last_roll(), Some(3));
    }

    #[test]
    fn rolling_out_of_turn_changes_nothing() {
        let [p0, p1, p2, _] = PlayerId::ALL;
        let mut turns = fixed_turns(vec![p1, p0]);
        let mut exchange = scripted(&[4], &mut turns);
        let before = exchange.state();
        assert_eq!(
            exchange.roll(p2, true, &mut turns),
            Err(IllegalAction::NotYourTurn { player: p2, turn: p0 })
        );
        assert_eq!(exchange.state(), before);
        assert!(exchange.buffer().is_empty());
        assert_eq!(exchange.roll_count(), 0);
        assert_eq!(turns.scheduler.queue(), &[p1]);
    }

    #[test]
    fn halts_when_everyone_finished() {
        let mut turns = fixed_turns(Vec::new());
        for p in PlayerId::ALL {
            turns.standings.record(p);
        }
        let mut exchange = scripted(&[6], &mut turns);
        assert!(exchange.is_halted());
        assert_eq!(
            exchange.roll(PlayerId::ALL[0], true, &mut turns),
            Err(IllegalAction::MatchOver)
        );
    }

    #[test]
    fn scripted_dice_validate_values() {
        assert_eq!(
            ScriptedDice::new(vec![]).unwrap_err(),
            ConfigError::InvalidDiceScript
        );
        assert!(ScriptedDice::new(vec![1, 7]).is_err());
        let mut dice = ScriptedDice::new(vec![2, 5]).unwrap();
        assert_eq!([dice.roll(), dice.roll(), dice.roll()], [2, 5, 2]);
    }
}
