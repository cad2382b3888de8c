//! Poll cycle driver tying the snapshot, exemptions, tracker and kicks together
//!
//! `run_cycle` performs exactly one Polling -> Evaluating pass and reports
//! what happened; `run` wraps it in the endless poll/sleep loop used in
//! production. Players are processed strictly one after another, and no
//! failure inside a cycle escapes it.

use crate::config::Config;
use crate::exemption::{is_exempt, ExemptionCache, ExemptionRules};
use crate::kick::{KickEnforcer, RetryPolicy};
use crate::notifier::Notifier;
use crate::rcon::{KickApi, PlayerSource};
use crate::tracker::{Action, ActivityTracker};
use log::{error, info, warn};
use shared::PlayerSnapshot;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Summary of one poll cycle
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Players in the fetched snapshot
    pub connected: usize,
    /// True when the population was too small for per-player checks
    pub skipped: bool,
    /// Tracking entries removed because the player left
    pub pruned: usize,
    pub exempt: Vec<String>,
    pub started: Vec<String>,
    pub reset: Vec<String>,
    pub kicked: Vec<String>,
    pub kick_failures: Vec<String>,
}

/// Owns the tracking state and the external collaborators
pub struct Monitor {
    source: Arc<dyn PlayerSource>,
    kicker: KickEnforcer,
    notifier: Box<dyn Notifier>,
    rules: ExemptionRules,
    min_players: usize,
    poll_interval: Duration,
    tracker: ActivityTracker,
    exemptions: ExemptionCache,
}

impl Monitor {
    pub fn new(
        config: &Config,
        source: Arc<dyn PlayerSource>,
        kick_api: Arc<dyn KickApi>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let policy = RetryPolicy::new(config.kick_attempts, config.kick_retry_delay);
        Self {
            source,
            kicker: KickEnforcer::new(kick_api, policy, &config.kick_message, &config.kicked_by),
            notifier,
            rules: ExemptionRules::from_config(config),
            min_players: config.min_players,
            poll_interval: config.poll_interval,
            tracker: ActivityTracker::new(config.afk_time),
            exemptions: ExemptionCache::new(),
        }
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.tracker
    }

    pub fn exemptions(&self) -> &ExemptionCache {
        &self.exemptions
    }

    /// Runs poll cycles forever, sleeping the poll interval after each one
    pub async fn run(&mut self) {
        info!("Starting AFK monitor...");
        loop {
            self.run_cycle(Instant::now()).await;

            info!("Sleeping for {} seconds...", self.poll_interval.as_secs());
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Performs one full poll cycle using `now` as the cycle time
    pub async fn run_cycle(&mut self, now: Instant) -> CycleReport {
        info!("Polling for players...");

        let players = match self.source.fetch_players().await {
            Ok(players) => players,
            Err(e) => {
                error!("Error fetching detailed players: {}", e);
                Vec::new()
            }
        };

        let mut report = CycleReport {
            connected: players.len(),
            ..CycleReport::default()
        };

        let connected: HashSet<&str> = players.iter().map(|p| p.player_id.as_str()).collect();
        report.pruned = self.tracker.prune(&connected);
        self.exemptions.prune(&connected);

        if players.len() <= self.min_players {
            info!(
                "Player count ({}) is not above {}, skipping AFK checks.",
                players.len(),
                self.min_players
            );
            report.skipped = true;
            return report;
        }

        for player in &players {
            self.evaluate_player(player, now, &mut report).await;
        }

        report
    }

    async fn evaluate_player(
        &mut self,
        player: &PlayerSnapshot,
        now: Instant,
        report: &mut CycleReport,
    ) {
        let id = player.player_id.as_str();

        let exempt = is_exempt(player, &self.rules);
        self.exemptions.refresh(player, exempt);
        if exempt {
            self.tracker.remove(id);
            report.exempt.push(id.to_string());
            return;
        }

        match self.tracker.evaluate(id, player.stats, now) {
            Action::StartTracking => report.started.push(id.to_string()),
            Action::ResetTracking => report.reset.push(id.to_string()),
            Action::ContinueTracking { .. } => {}
            Action::ThresholdReached { idle_for } => {
                self.tracker.remove(id);

                let message = format!("Kicking AFK player: {} ({})", player.name, id);
                info!("{} after {}s without activity", message, idle_for.as_secs());
                if let Err(e) = self.notifier.notify(&message).await {
                    warn!("Error sending to Discord: {}", e);
                }

                match self.kicker.kick(id, &player.name).await {
                    Ok(_) => report.kicked.push(id.to_string()),
                    Err(_) => report.kick_failures.push(id.to_string()),
                }
            }
        }
    }
}
