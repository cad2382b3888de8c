//! Per-player activity tracking and AFK threshold detection
//!
//! The tracker remembers, for every connected non-exempt player, the last
//! statistics sample it saw and the moment that sample was first observed.
//! A player whose counters stay identical for at least the AFK time reaches
//! the threshold. Any change to any counter restarts the timer.
//!
//! The tracker is pure state: callers supply the current time, so cycles
//! can be replayed in tests without real delays.

use log::debug;
use shared::ActivityStats;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Outcome of evaluating one player sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// First observation; a baseline was recorded
    StartTracking,
    /// Counters changed; the baseline and timer were reset
    ResetTracking,
    /// Counters unchanged but the AFK time has not elapsed yet
    ContinueTracking { idle_for: Duration },
    /// Counters unchanged for at least the AFK time
    ThresholdReached { idle_for: Duration },
}

/// Last sample seen for a player and when it was first observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedEntry {
    pub last_stats: ActivityStats,
    pub since: Instant,
}

#[derive(Debug)]
pub struct ActivityTracker {
    entries: HashMap<String, TrackedEntry>,
    afk_time: Duration,
}

impl ActivityTracker {
    pub fn new(afk_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            afk_time,
        }
    }

    pub fn afk_time(&self) -> Duration {
        self.afk_time
    }

    /// Advances the tracking state for one player sample
    ///
    /// On `ThresholdReached` the entry is left in place; the caller is
    /// expected to `remove` it before acting on the kick.
    pub fn evaluate(&mut self, player_id: &str, stats: ActivityStats, now: Instant) -> Action {
        let Some(entry) = self.entries.get_mut(player_id) else {
            self.entries.insert(
                player_id.to_string(),
                TrackedEntry {
                    last_stats: stats,
                    since: now,
                },
            );
            debug!("Started tracking player {}", player_id);
            return Action::StartTracking;
        };

        if entry.last_stats != stats {
            entry.last_stats = stats;
            entry.since = now;
            debug!("Activity detected for player {}, timer reset", player_id);
            return Action::ResetTracking;
        }

        let idle_for = now.saturating_duration_since(entry.since);
        if idle_for >= self.afk_time {
            Action::ThresholdReached { idle_for }
        } else {
            Action::ContinueTracking { idle_for }
        }
    }

    /// Forgets a player; returns true if they were being tracked
    pub fn remove(&mut self, player_id: &str) -> bool {
        self.entries.remove(player_id).is_some()
    }

    /// Drops entries for every player that is no longer connected
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self, connected: &HashSet<&str>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| connected.contains(id.as_str()));
        before - self.entries.len()
    }

    pub fn get(&self, player_id: &str) -> Option<&TrackedEntry> {
        self.entries.get(player_id)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.entries.contains_key(player_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
