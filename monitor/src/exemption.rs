//! Exemption rules deciding which players are never tracked for AFK
//!
//! A player is exempt when VIP whitelisting is enabled and they are a VIP,
//! or when their profile carries the configured whitelist flag. Flags are
//! compared after normalization so that emoji sent with or without a
//! presentation selector still match.

use crate::config::Config;
use log::debug;
use shared::PlayerSnapshot;
use std::collections::HashSet;

/// The subset of configuration the exemption rules depend on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptionRules {
    pub vip_whitelist: bool,
    pub whitelist_flag: Option<String>,
}

impl ExemptionRules {
    pub fn new(vip_whitelist: bool, whitelist_flag: Option<&str>) -> Self {
        Self {
            vip_whitelist,
            whitelist_flag: whitelist_flag
                .map(normalize_flag)
                .filter(|flag| !flag.is_empty()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            vip_whitelist: config.vip_whitelist,
            whitelist_flag: config.whitelist_flag.clone(),
        }
    }
}

/// Returns true if the player must be excluded from AFK tracking
pub fn is_exempt(player: &PlayerSnapshot, rules: &ExemptionRules) -> bool {
    if rules.vip_whitelist && player.is_vip {
        return true;
    }

    match rules.whitelist_flag.as_deref() {
        Some(wanted) => player.flags().any(|flag| normalize_flag(flag) == wanted),
        None => false,
    }
}

/// Trims whitespace and drops Unicode variation selectors
pub fn normalize_flag(flag: &str) -> String {
    flag.trim()
        .chars()
        .filter(|c| !is_variation_selector(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_variation_selector(c: char) -> bool {
    matches!(c, '\u{FE00}'..='\u{FE0F}' | '\u{E0100}'..='\u{E01EF}')
}

/// Connected players known to be exempt as of their latest evaluation
///
/// Holds no authoritative state: it only records transitions so exemption
/// is logged once per player rather than every cycle.
#[derive(Debug, Default)]
pub struct ExemptionCache {
    exempt: HashSet<String>,
}

impl ExemptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest exemption result for a player
    ///
    /// Returns true when the player has just become exempt.
    pub fn refresh(&mut self, player: &PlayerSnapshot, exempt: bool) -> bool {
        if !exempt {
            if self.exempt.remove(&player.player_id) {
                debug!(
                    "Player {} ({}) is no longer exempt",
                    player.name, player.player_id
                );
            }
            return false;
        }

        let inserted = self.exempt.insert(player.player_id.clone());
        if inserted {
            debug!(
                "Player {} ({}) is exempt from AFK checks",
                player.name, player.player_id
            );
        }
        inserted
    }

    /// Drops every id that is not currently connected
    pub fn prune(&mut self, connected: &HashSet<&str>) {
        self.exempt.retain(|id| connected.contains(id.as_str()));
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.exempt.contains(player_id)
    }

    pub fn len(&self) -> usize {
        self.exempt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exempt.is_empty()
    }
}
