use quickcheck::{Arbitrary, Gen};

use crate::{Cell, PlayerId, Position};

/// A dice value between 1 and 6.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Roll(pub u8);

impl Arbitrary for Roll {
    fn arbitrary(g: &mut Gen) -> Self {
        Roll(u8::arbitrary(g) % 6 + 1)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new((1..self.0).rev().map(Roll))
    }
}

impl Arbitrary for PlayerId {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&PlayerId::ALL).unwrap()
    }
}

/// Any cell of the board, including home stretches.
impl Arbitrary for Cell {
    fn arbitrary(g: &mut Gen) -> Self {
        let quadrant = u8::arbitrary(g) % 4;
        let lane = u8::arbitrary(g) % 3;
        let offset = if lane == 1 {
            u8::arbitrary(g) % 7
        } else {
            u8::arbitrary(g) % 6
        };
        Cell::new(quadrant, lane, offset).unwrap()
    }
}

impl Arbitrary for Position {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 8 {
            0 => Position::AtHome,
            1 => Position::CapturedPendingReset,
            _ => Cell::arbitrary(g).into(),
        }
    }
}

/// A sequence of dice values as rolled within one turn.
#[derive(Clone, Debug)]
pub struct RollSequence(pub Vec<u8>);

impl Arbitrary for RollSequence {
    fn arbitrary(g: &mut Gen) -> Self {
        // Bias towards sixes, which are the interesting case
        let len = usize::arbitrary(g) % 12 + 1;
        let values = (0..len)
            .map(|_| {
                if bool::arbitrary(g) {
                    6
                } else {
                    Roll::arbitrary(g).0
                }
            })
            .collect();
        RollSequence(values)
    }
}
