use serde::{Deserialize, Serialize};

use crate::{ConfigError, InvalidPosition};

pub const NUM_PLAYERS: usize = 4;

/// The last offset of the entry and exit lanes.
pub const LANE_LAST_OFFSET: u8 = 5;

/// The offset on a player's own stretch lane at which a piece is finished.
pub const FINISH_OFFSET: u8 = 6;

/// One of the four players. The id doubles as the quadrant the player starts in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    pub const ALL: [PlayerId; NUM_PLAYERS] = [PlayerId(0), PlayerId(1), PlayerId(2), PlayerId(3)];

    pub fn new(id: u8) -> Result<Self, ConfigError> {
        if (id as usize) < NUM_PLAYERS {
            Ok(Self(id))
        } else {
            Err(ConfigError::InvalidPlayerId(id))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The quadrant where this player's pieces are released and where they finish.
    pub fn home_quadrant(self) -> Quadrant {
        Quadrant(self.0)
    }

    pub fn color_name(self) -> &'static str {
        match self.0 {
            0 => "RED",
            1 => "GREEN",
            2 => "YELLOW",
            _ => "BLUE",
        }
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = ConfigError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> u8 {
        id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color_name())
    }
}

/// One of the four arms of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quadrant(u8);

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [Quadrant(0), Quadrant(1), Quadrant(2), Quadrant(3)];

    pub(crate) const fn from_raw(quadrant: u8) -> Quadrant {
        Quadrant(quadrant % 4)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The quadrant that follows this one in travel direction.
    pub fn next(self) -> Quadrant {
        Quadrant((self.0 + 1) % 4)
    }

    /// The player who starts in this quadrant.
    pub fn owner(self) -> PlayerId {
        PlayerId(self.0)
    }
}

/// The three row-like paths making up a quadrant, in traversal order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Lane {
    /// Leads from the previous quadrant towards the tip of the arm.
    Entry = 0,
    /// The middle row. Offset 0 is the ring cell at the tip of the arm, the
    /// offsets after it are the owner's private home stretch.
    Stretch = 1,
    /// Leads from the tip of the arm back towards the next quadrant.
    Exit = 2,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Entry, Lane::Stretch, Lane::Exit];

    pub fn from_index(idx: u8) -> Option<Lane> {
        match idx {
            0 => Some(Lane::Entry),
            1 => Some(Lane::Stretch),
            2 => Some(Lane::Exit),
            _ => None,
        }
    }

    /// The largest offset a cell in this lane can have.
    pub fn max_offset(self) -> u8 {
        match self {
            Lane::Stretch => FINISH_OFFSET,
            Lane::Entry | Lane::Exit => LANE_LAST_OFFSET,
        }
    }
}

/// A single cell of the track, in quadrant-relative coordinates.
///
/// Cells can only be created with an offset that exists in their lane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    quadrant: Quadrant,
    lane: Lane,
    offset: u8,
}

impl Cell {
    pub fn new(quadrant: u8, lane: u8, offset: u8) -> Result<Self, InvalidPosition> {
        let invalid = InvalidPosition {
            quadrant: quadrant as i8,
            lane: lane as i8,
            offset: offset as i8,
        };
        if quadrant >= 4 {
            return Err(invalid);
        }
        let lane = Lane::from_index(lane).ok_or(invalid)?;
        Self::at(Quadrant(quadrant), lane, offset)
    }

    pub(crate) fn at(quadrant: Quadrant, lane: Lane, offset: u8) -> Result<Self, InvalidPosition> {
        if offset > lane.max_offset() {
            return Err(InvalidPosition {
                quadrant: quadrant.0 as i8,
                lane: lane as i8,
                offset: offset as i8,
            });
        }
        Ok(Self {
            quadrant,
            lane,
            offset,
        })
    }

    /// Where a piece of `player` enters the track when it leaves home.
    pub fn release(player: PlayerId) -> Self {
        Self {
            quadrant: player.home_quadrant(),
            lane: Lane::Exit,
            offset: 1,
        }
    }

    /// The safe cell on the entry lane of a quadrant.
    pub fn junction(quadrant: Quadrant) -> Self {
        Self {
            quadrant,
            lane: Lane::Entry,
            offset: 3,
        }
    }

    /// The last cell of a player's home stretch.
    pub fn finish(player: PlayerId) -> Self {
        Self {
            quadrant: player.home_quadrant(),
            lane: Lane::Stretch,
            offset: FINISH_OFFSET,
        }
    }

    pub fn quadrant(self) -> Quadrant {
        self.quadrant
    }

    pub fn lane(self) -> Lane {
        self.lane
    }

    pub fn offset(self) -> u8 {
        self.offset
    }

    /// Pieces on a safe cell cannot be captured.
    pub fn is_safe(self) -> bool {
        self == Self::release(self.quadrant.owner()) || self == Self::junction(self.quadrant)
    }

    /// Whether this cell belongs to the private part of a home stretch.
    pub fn is_home_stretch(self) -> bool {
        self.lane == Lane::Stretch && self.offset > 0
    }

    pub(crate) fn with_offset(self, offset: u8) -> Result<Self, InvalidPosition> {
        Self::at(self.quadrant, self.lane, offset)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.quadrant.0, self.lane as u8, self.offset
        )
    }
}

/// Where a piece currently is.
///
/// Serialized as its raw triple, which is validated again when read back.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(i8, i8, i8)", into = "(i8, i8, i8)")]
pub enum Position {
    /// Not yet released, or returned home after a capture.
    AtHome,
    /// Just captured. The owner's loop turns this back into `AtHome`.
    CapturedPendingReset,
    OnTrack { cell: Cell },
}

impl Position {
    pub fn cell(self) -> Option<Cell> {
        match self {
            Position::OnTrack { cell } => Some(cell),
            _ => None,
        }
    }

    /// The `(quadrant, lane, offset)` triple, with `(-1, -1, -1)` for a piece at home
    /// and `(-2, -2, -2)` for a captured piece.
    pub fn to_raw(self) -> (i8, i8, i8) {
        match self {
            Position::AtHome => (-1, -1, -1),
            Position::CapturedPendingReset => (-2, -2, -2),
            Position::OnTrack { cell } => (
                cell.quadrant.0 as i8,
                cell.lane as i8,
                cell.offset as i8,
            ),
        }
    }
}

impl From<Cell> for Position {
    fn from(cell: Cell) -> Self {
        Position::OnTrack { cell }
    }
}

impl From<Position> for (i8, i8, i8) {
    fn from(pos: Position) -> Self {
        pos.to_raw()
    }
}

impl TryFrom<(i8, i8, i8)> for Position {
    type Error = InvalidPosition;

    fn try_from(raw: (i8, i8, i8)) -> Result<Self, Self::Error> {
        let (quadrant, lane, offset) = raw;
        match raw {
            (-1, -1, -1) => Ok(Position::AtHome),
            (-2, -2, -2) => Ok(Position::CapturedPendingReset),
            _ if quadrant < 0 || lane < 0 || offset < 0 => Err(InvalidPosition {
                quadrant,
                lane,
                offset,
            }),
            _ => Ok(Cell::new(quadrant as u8, lane as u8, offset as u8)?.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn raw_triple_is_lossless(cell: Cell) -> bool {
            let pos = Position::from(cell);
            Position::try_from(pos.to_raw()) == Ok(pos)
        }
    }

    #[test]
    fn sentinels_parse() {
        assert_eq!(Position::try_from((-1, -1, -1)), Ok(Position::AtHome));
        assert_eq!(
            Position::try_from((-2, -2, -2)),
            Ok(Position::CapturedPendingReset)
        );
    }

    #[test]
    fn malformed_triples_are_rejected() {
        for raw in [(4, 0, 0), (0, 3, 0), (0, 0, 6), (0, 2, 7), (-1, 0, 0), (0, -2, -2)] {
            assert!(Position::try_from(raw).is_err(), "{:?} was accepted", raw);
        }
        // The stretch lane is the only one reaching the finishing offset
        assert!(Position::try_from((2, 1, 6)).is_ok());
    }

    #[test]
    fn positions_are_validated_when_read_back() {
        let pos = Position::from(Cell::new(2, 1, 6).unwrap());
        assert_eq!(serde_json::to_string(&pos).unwrap(), "[2,1,6]");
        assert_eq!(serde_json::from_str::<Position>("[2,1,6]").unwrap(), pos);
        assert_eq!(
            serde_json::from_str::<Position>("[-2,-2,-2]").unwrap(),
            Position::CapturedPendingReset
        );
        for raw in ["[0,0,6]", "[4,0,0]", "[-1,0,0]"] {
            assert!(serde_json::from_str::<Position>(raw).is_err(), "{} was accepted", raw);
        }
    }

    #[test]
    fn safe_cells() {
        for q in Quadrant::ALL {
            assert!(Cell::release(q.owner()).is_safe());
            assert!(Cell::junction(q).is_safe());
        }
        assert!(!Cell::new(0, 2, 2).unwrap().is_safe());
        assert!(!Cell::new(3, 1, 0).unwrap().is_safe());
        assert!(!Cell::new(1, 0, 1).unwrap().is_safe());
    }

    #[test]
    fn player_ids_are_validated() {
        assert!(PlayerId::new(3).is_ok());
        assert_eq!(PlayerId::new(4), Err(ConfigError::InvalidPlayerId(4)));
        let json = serde_json::to_string(&PlayerId::ALL[2]).unwrap();
        assert_eq!(json, "2");
        assert!(serde_json::from_str::<PlayerId>("7").is_err());
    }
}
