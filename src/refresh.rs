//! Scheduled loader: fetches on startup and every refresh interval, and applies
//! TUI commands to the shared state while a fetch is outstanding.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::config::{Config, ValueBetConfig};
use crate::feed::MatchFeed;
use crate::tui::state::AppState;
use crate::tui::TuiCommand;

const PLACE_BET_NOTICE: &str = "This would open a betting slip with the selected value bets. \
    No betting account is connected.";

/// Why the controller woke up.
enum Trigger {
    Tick,
    Command(Option<TuiCommand>),
}

/// Sole writer of the match cache. Fetches run one at a time on this task,
/// so a slow response can never overlap the next tick's request.
pub struct RefreshController<F> {
    feed: F,
    value_bets: ValueBetConfig,
    interval: Duration,
    leagues_loaded: bool,
}

impl<F: MatchFeed> RefreshController<F> {
    pub fn new(feed: F, config: &Config) -> Self {
        Self {
            feed,
            value_bets: config.value_bets.clone(),
            interval: Duration::from_secs(config.refresh.interval_s),
            leagues_loaded: false,
        }
    }

    /// Run until `Quit` arrives or the command channel closes. Either one drops
    /// any fetch that is still in flight.
    pub async fn run(
        mut self,
        state_tx: watch::Sender<AppState>,
        mut cmd_rx: mpsc::Receiver<TuiCommand>,
    ) {
        // First tick completes immediately: load on startup.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let trigger = tokio::select! {
                _ = ticker.tick() => Trigger::Tick,
                cmd = cmd_rx.recv() => Trigger::Command(cmd),
            };

            match trigger {
                Trigger::Tick => {}
                Trigger::Command(None) | Trigger::Command(Some(TuiCommand::Quit)) => break,
                Trigger::Command(Some(TuiCommand::Refresh)) => {
                    tracing::info!("manual refresh requested");
                    ticker.reset();
                }
                Trigger::Command(Some(cmd)) => {
                    apply_command(cmd, &state_tx);
                    continue;
                }
            }

            if !self.refresh(&state_tx, &mut cmd_rx).await {
                break;
            }
        }

        tracing::info!("refresh controller stopped");
    }

    /// One load cycle. Returns false if the controller was asked to stop.
    pub async fn refresh(
        &mut self,
        state_tx: &watch::Sender<AppState>,
        cmd_rx: &mut mpsc::Receiver<TuiCommand>,
    ) -> bool {
        state_tx.send_modify(|s| s.begin_loading());
        let started = Instant::now();

        let Some(result) = drive(self.feed.fetch_matches(), state_tx, cmd_rx).await else {
            tracing::info!("in-flight fetch cancelled");
            return false;
        };

        match result {
            Ok(matches) => {
                let count = matches.len();
                let value_bets = &self.value_bets;
                state_tx.send_modify(|s| {
                    s.apply_matches(matches, value_bets);
                    s.push_log(
                        "INFO",
                        format!("Loaded {} matches, {} value bets", count, s.value_bets.len()),
                    );
                });
                tracing::info!(
                    matches = count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "matches loaded"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load matches");
                state_tx.send_modify(|s| s.apply_failure(&e));
            }
        }

        if !self.leagues_loaded {
            let Some(result) = drive(self.feed.fetch_leagues(), state_tx, cmd_rx).await else {
                return false;
            };
            match result {
                Ok(leagues) => {
                    tracing::debug!(count = leagues.len(), "supported leagues loaded");
                    self.leagues_loaded = true;
                    state_tx.send_modify(|s| s.supported_leagues = leagues);
                }
                // Selector still offers leagues seen in match data.
                Err(e) => tracing::warn!(error = %e, "failed to load supported leagues"),
            }
        }

        true
    }
}

/// Await `fut` while still serving UI commands. `None` means stop was requested.
async fn drive<T>(
    fut: impl Future<Output = T>,
    state_tx: &watch::Sender<AppState>,
    cmd_rx: &mut mpsc::Receiver<TuiCommand>,
) -> Option<T> {
    tokio::pin!(fut);
    loop {
        tokio::select! {
            out = &mut fut => return Some(out),
            cmd = cmd_rx.recv() => match cmd {
                None | Some(TuiCommand::Quit) => return None,
                Some(TuiCommand::Refresh) => {
                    tracing::debug!("fetch already in flight, ignoring refresh");
                }
                Some(cmd) => apply_command(cmd, state_tx),
            },
        }
    }
}

/// Commands that only touch cached state; none of these fetch.
fn apply_command(cmd: TuiCommand, state_tx: &watch::Sender<AppState>) {
    match cmd {
        TuiCommand::SetFilter(filter) => state_tx.send_modify(|s| s.set_filter(filter)),
        TuiCommand::CycleFilter { forward } => state_tx.send_modify(|s| s.cycle_filter(forward)),
        TuiCommand::ScrollMatches(delta) => state_tx.send_modify(|s| s.scroll_matches(delta)),
        TuiCommand::PlaceBet => {
            tracing::info!("place bet requested (no betting backend)");
            state_tx.send_modify(|s| s.push_log("BET", PLACE_BET_NOTICE.to_string()));
        }
        TuiCommand::Quit | TuiCommand::Refresh => {}
    }
}
