use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::trace;

use crate::{PlayerId, PlayerSet, NUM_PLAYERS};

/// Hands out turns in shuffled rounds, skipping players that have finished.
///
/// The queue is consumed from the back. Within one generated round, every
/// player still in the match gets exactly one turn.
#[derive(Clone, Debug)]
pub struct TurnScheduler {
    queue: Vec<PlayerId>,
    rng: StdRng,
}

impl TurnScheduler {
    pub fn new(rng: StdRng) -> Self {
        Self {
            queue: Vec::with_capacity(NUM_PLAYERS),
            rng,
        }
    }

    /// Starts with a fixed queue. Later rounds are shuffled as usual.
    ///
    /// The last element is handed out first.
    pub fn with_queue(queue: Vec<PlayerId>, rng: StdRng) -> Self {
        Self { queue, rng }
    }

    /// Replaces the queue with a fresh random permutation of all players.
    pub fn generate_order(&mut self) {
        self.queue.clear();
        self.queue.extend(PlayerId::ALL);
        self.queue.shuffle(&mut self.rng);
        trace!(queue = ?self.queue, "New turn order");
    }

    /// The next player that has not finished yet.
    ///
    /// Returns `None` only if every player has finished.
    pub fn next_turn(&mut self, finished: PlayerSet) -> Option<PlayerId> {
        if finished.len() >= NUM_PLAYERS {
            return None;
        }
        loop {
            let candidate = match self.queue.pop() {
                Some(candidate) => candidate,
                None => {
                    self.generate_order();
                    continue;
                }
            };
            if !finished.contains(candidate) {
                return Some(candidate);
            }
        }
    }

    /// The remaining queue, last element next.
    pub fn queue(&self) -> &[PlayerId] {
        &self.queue
    }
}

/// Finishing order of the match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Standings {
    winners: Vec<PlayerId>,
    completed: PlayerSet,
}

impl Standings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a player to the finishing order.
    ///
    /// Returns `false` if the player was already recorded.
    pub fn record(&mut self, player: PlayerId) -> bool {
        if self.completed.contains(player) {
            return false;
        }
        self.completed = self.completed.insert(player);
        self.winners.push(player);
        true
    }

    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }

    pub fn completed(&self) -> PlayerSet {
        self.completed
    }

    pub fn is_completed(&self, player: PlayerId) -> bool {
        self.completed.contains(player)
    }

    /// The only player still in the match, once all others have finished.
    pub fn last_remaining(&self) -> Option<PlayerId> {
        let mut remaining = PlayerId::ALL
            .into_iter()
            .filter(|&p| !self.completed.contains(p));
        let last = remaining.next()?;
        remaining.next().is_none().then_some(last)
    }

    pub fn is_decided(&self) -> bool {
        self.winners.len() == NUM_PLAYERS
    }
}

/// Everything guarded by the turn-control lock.
#[derive(Clone, Debug)]
pub struct TurnControl {
    pub scheduler: TurnScheduler,
    pub standings: Standings,
}

impl TurnControl {
    pub fn new(scheduler: TurnScheduler) -> Self {
        Self {
            scheduler,
            standings: Standings::new(),
        }
    }

    pub fn next_turn(&mut self) -> Option<PlayerId> {
        self.scheduler.next_turn(self.standings.completed())
    }
}
