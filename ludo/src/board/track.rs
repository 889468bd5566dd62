use crate::{Lane, Quadrant, LANE_LAST_OFFSET};

/// How a lane connects to the rest of the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneLink {
    /// The last offset of this lane that is part of the shared ring.
    pub last_offset: u8,
    /// The quadrant and lane a piece continues on, starting at offset 0.
    pub next_quadrant: Quadrant,
    pub next_lane: Lane,
}

const fn link(last_offset: u8, next_quadrant: u8, next_lane: Lane) -> LaneLink {
    LaneLink {
        last_offset,
        next_quadrant: Quadrant::from_raw(next_quadrant),
        next_lane,
    }
}

/// The shared ring, indexed by `[quadrant][lane]`.
///
/// Only the tip cell (offset 0) of a stretch lane belongs to the ring. Pieces
/// turning into their own home stretch leave the ring there instead of
/// following this table.
const RING: [[LaneLink; 3]; 4] = [
    [
        link(LANE_LAST_OFFSET, 0, Lane::Stretch),
        link(0, 0, Lane::Exit),
        link(LANE_LAST_OFFSET, 1, Lane::Entry),
    ],
    [
        link(LANE_LAST_OFFSET, 1, Lane::Stretch),
        link(0, 1, Lane::Exit),
        link(LANE_LAST_OFFSET, 2, Lane::Entry),
    ],
    [
        link(LANE_LAST_OFFSET, 2, Lane::Stretch),
        link(0, 2, Lane::Exit),
        link(LANE_LAST_OFFSET, 3, Lane::Entry),
    ],
    [
        link(LANE_LAST_OFFSET, 3, Lane::Stretch),
        link(0, 3, Lane::Exit),
        link(LANE_LAST_OFFSET, 0, Lane::Entry),
    ],
];

pub fn ring_link(quadrant: Quadrant, lane: Lane) -> LaneLink {
    RING[quadrant.index()][lane as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_len() -> usize {
        RING.iter()
            .flatten()
            .map(|link| link.last_offset as usize + 1)
            .sum()
    }

    #[test]
    fn ring_is_closed() {
        // Following the links from any lane visits all twelve lanes and comes back
        let (mut q, mut lane) = (Quadrant::ALL[2], Lane::Exit);
        for _ in 0..12 {
            let link = ring_link(q, lane);
            q = link.next_quadrant;
            lane = link.next_lane;
        }
        assert_eq!((q, lane), (Quadrant::ALL[2], Lane::Exit));
        assert_eq!(ring_len(), 52);
    }

    #[test]
    fn quadrants_hand_over_at_exit_lanes() {
        for q in Quadrant::ALL {
            let link = ring_link(q, Lane::Exit);
            assert_eq!(link.next_quadrant, q.next());
            assert_eq!(link.next_lane, Lane::Entry);
        }
    }
}
