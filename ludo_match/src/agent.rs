use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use ludo::{MoveError, PlayerId};
use tracing::{debug, error, trace};

use crate::{ClickMailbox, MatchState};

/// The decision loop of one player.
///
/// Waits for clicks in its mailbox and applies them to the match. Checks
/// its cancel flag before every wait and after every click it takes, and
/// never waits while holding one of the match's locks.
pub struct PlayerAgent<'a> {
    pub player: PlayerId,
    state: &'a MatchState,
    mailbox: &'a ClickMailbox,
    cancel: &'a AtomicBool,
    poll_interval: Duration,
}

impl<'a> PlayerAgent<'a> {
    pub fn new(
        player: PlayerId,
        state: &'a MatchState,
        mailbox: &'a ClickMailbox,
        cancel: &'a AtomicBool,
        poll_interval: Duration,
    ) -> Self {
        Self {
            player,
            state,
            mailbox,
            cancel,
            poll_interval,
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    pub fn run(self) {
        let player = self.player;
        debug!(%player, "Agent started");
        while !self.cancelled() {
            let reset = self.state.reset_captured(player);
            if reset > 0 {
                debug!(%player, reset, "Captured pieces are back home");
            }

            let Some(point) = self.mailbox.take(self.poll_interval) else {
                continue;
            };
            if self.cancelled() {
                self.mailbox.finish();
                break;
            }
            match self.state.handle_click(player, point) {
                Ok(outcome) => trace!(%player, ?outcome, "Click handled"),
                Err(MoveError::Illegal(err)) => debug!(%player, %err, "Ignoring click"),
                Err(MoveError::Invariant(err)) => error!(%player, %err, "Move aborted"),
            }
            self.mailbox.finish();
        }
        debug!(%player, "Agent stopped");
    }
}
