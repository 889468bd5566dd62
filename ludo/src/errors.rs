use crate::PlayerId;

/// The error type for setting up a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPieceCount(u8),
    InvalidPlayerId(u8),
    /// A scripted dice sequence must be non-empty and only contain values from 1 to 6.
    InvalidDiceScript,
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPieceCount(count) => {
                write!(f, "Each player needs between 1 and 4 pieces, got {}", count)
            }
            ConfigError::InvalidPlayerId(id) => {
                write!(f, "Player ids range from 0 to 3, got {}", id)
            }
            ConfigError::InvalidDiceScript => {
                write!(f, "Dice scripts need at least one value, all between 1 and 6")
            }
        }
    }
}

/// A position that is neither a sentinel nor a cell of the board.
///
/// Running into one of these is a bug, not something a player can cause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidPosition {
    pub quadrant: i8,
    pub lane: i8,
    pub offset: i8,
}

impl std::error::Error for InvalidPosition {}

impl std::fmt::Display for InvalidPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}) is not a position on the board",
            self.quadrant, self.lane, self.offset
        )
    }
}

/// An action that is not allowed right now.
///
/// These are expected whenever a player clicks at the wrong time, and
/// are ignored by the match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IllegalAction {
    NotYourTurn { player: PlayerId, turn: PlayerId },
    RollNotPermitted,
    MoveNotPermitted { player: PlayerId },
    RollOutOfRange { value: u8 },
    ZeroSteps,
    NeedSixToRelease { rolled: u8 },
    PieceFinished { slot: u8 },
    PieceNotOnBoard { slot: u8 },
    NoSuchPiece { slot: u8 },
    NothingClicked,
    MatchOver,
}

impl std::error::Error for IllegalAction {}

impl std::fmt::Display for IllegalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalAction::NotYourTurn { player, turn } => {
                write!(f, "{} tried to act, but it is {}'s turn", player, turn)
            }
            IllegalAction::RollNotPermitted => write!(f, "Rolling is not permitted right now"),
            IllegalAction::MoveNotPermitted { player } => {
                write!(f, "{} is not permitted to move a piece", player)
            }
            IllegalAction::RollOutOfRange { value } => {
                write!(f, "Dice value {} is outside of 1 to 6", value)
            }
            IllegalAction::ZeroSteps => write!(f, "Tried to move a piece zero steps"),
            IllegalAction::NeedSixToRelease { rolled } => {
                write!(f, "Releasing a piece needs a 6, the buffered value is {}", rolled)
            }
            IllegalAction::PieceFinished { slot } => {
                write!(f, "Piece {} has already finished", slot)
            }
            IllegalAction::PieceNotOnBoard { slot } => {
                write!(f, "Piece {} was captured and has not been reset yet", slot)
            }
            IllegalAction::NoSuchPiece { slot } => write!(f, "There is no piece {}", slot),
            IllegalAction::NothingClicked => {
                write!(f, "The click did not hit the dice or one of the player's pieces")
            }
            IllegalAction::MatchOver => write!(f, "The match is already over"),
        }
    }
}

/// The error type for moving a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    Illegal(IllegalAction),
    Invariant(InvalidPosition),
}

impl std::error::Error for MoveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveError::Illegal(err) => Some(err),
            MoveError::Invariant(err) => Some(err),
        }
    }
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::Illegal(_) => write!(f, "Illegal action"),
            MoveError::Invariant(_) => write!(f, "Board invariant violated, move aborted"),
        }
    }
}

impl From<IllegalAction> for MoveError {
    fn from(err: IllegalAction) -> Self {
        MoveError::Illegal(err)
    }
}

impl From<InvalidPosition> for MoveError {
    fn from(err: InvalidPosition) -> Self {
        MoveError::Invariant(err)
    }
}
