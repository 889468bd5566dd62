use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use ludo::{PlayerId, Snapshot, NUM_PLAYERS};
use tracing::{debug, error, info, trace};

use crate::{ClickMailbox, Frontend, MatchConfig, MatchState, PlayerAgent};

/// How a match ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Finishing order. Complete unless the match was aborted.
    pub winners: Vec<PlayerId>,
    pub scores: [u32; NUM_PLAYERS],
    /// The frontend asked to close before the match was decided.
    pub aborted: bool,
}

impl MatchResult {
    fn from_snapshot(snapshot: Snapshot, aborted: bool) -> Self {
        Self {
            winners: snapshot.winners,
            scores: snapshot.scores,
            aborted,
        }
    }
}

/// Runs one agent thread per player and drives the render/update tick.
pub struct MatchOrchestrator {
    state: MatchState,
    config: MatchConfig,
}

impl MatchOrchestrator {
    pub fn new(state: MatchState, config: MatchConfig) -> Self {
        Self { state, config }
    }

    pub fn from_config(config: MatchConfig) -> anyhow::Result<Self> {
        let state = MatchState::from_config(&config)?;
        Ok(Self::new(state, config))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Plays the match until it is decided or the frontend closes.
    ///
    /// Returns an error only if an agent thread could not be started or the
    /// frontend failed to render.
    pub fn run<F: Frontend>(&self, frontend: &mut F) -> anyhow::Result<MatchResult> {
        let mailboxes: [ClickMailbox; NUM_PLAYERS] = std::array::from_fn(|_| ClickMailbox::new());
        let cancel: [AtomicBool; NUM_PLAYERS] = std::array::from_fn(|_| AtomicBool::new(false));
        let poll_interval = Duration::from_millis(self.config.agent_poll_ms);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(NUM_PLAYERS);
            let mut spawned = Ok(());
            for player in PlayerId::ALL {
                let agent = PlayerAgent::new(
                    player,
                    &self.state,
                    &mailboxes[player.index()],
                    &cancel[player.index()],
                    poll_interval,
                );
                match thread::Builder::new()
                    .name(format!("agent-{}", player))
                    .spawn_scoped(scope, move || agent.run())
                {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        spawned = Err(err);
                        break;
                    }
                }
            }

            let result = match spawned {
                Ok(()) => self.tick_loop(frontend, &mailboxes, &cancel),
                Err(err) => Err(err.into()),
            };

            for (flag, mailbox) in cancel.iter().zip(&mailboxes) {
                flag.store(true, Ordering::Release);
                mailbox.wake();
            }
            for handle in handles {
                if handle.join().is_err() {
                    error!("An agent thread panicked");
                }
            }
            result
        })
    }

    fn tick_loop<F: Frontend>(
        &self,
        frontend: &mut F,
        mailboxes: &[ClickMailbox; NUM_PLAYERS],
        cancel: &[AtomicBool; NUM_PLAYERS],
    ) -> anyhow::Result<MatchResult> {
        let tick = Duration::from_millis(self.config.tick_interval_ms);
        loop {
            for player in self.state.update_standings() {
                cancel[player.index()].store(true, Ordering::Release);
                mailboxes[player.index()].wake();
            }

            let snapshot = self.state.snapshot();
            frontend.render(&snapshot)?;
            if snapshot.finished {
                info!(winners = ?snapshot.winners, "Match decided");
                return Ok(MatchResult::from_snapshot(snapshot, false));
            }

            // Only read new input once the previous click has been applied
            if mailboxes.iter().all(ClickMailbox::is_idle) {
                if frontend.should_close() {
                    info!("Match aborted");
                    return Ok(MatchResult::from_snapshot(self.state.snapshot(), true));
                }
                if frontend.was_clicked() {
                    let point = frontend.pointer_position();
                    match self.state.click_target() {
                        Some(player) if !cancel[player.index()].load(Ordering::Acquire) => {
                            debug!(%player, x = point.x, y = point.y, "Routing click");
                            mailboxes[player.index()].deliver(point);
                        }
                        _ => trace!("Nobody can act on this click"),
                    }
                }
            }
            thread::sleep(tick);
        }
    }
}
