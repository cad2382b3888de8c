use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_KICKED_BY: &str = "AFK Bot";

/// Cumulative in-session counters reported for one player.
///
/// Two samples are "unchanged" only when all six counters match exactly.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct ActivityStats {
    pub kills: u64,
    pub deaths: u64,
    pub combat: u64,
    pub offense: u64,
    pub defense: u64,
    pub support: u64,
}

impl ActivityStats {
    pub fn new(kills: u64, deaths: u64, combat: u64, offense: u64, defense: u64, support: u64) -> Self {
        Self {
            kills,
            deaths,
            combat,
            offense,
            defense,
            support,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerFlag {
    pub flag: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PlayerProfile {
    #[serde(default)]
    pub flags: Option<Vec<PlayerFlag>>,
}

/// One connected player as reported by `get_detailed_players`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    #[serde(default)]
    pub player_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_vip: bool,
    #[serde(default)]
    pub profile: Option<PlayerProfile>,
    #[serde(flatten)]
    pub stats: ActivityStats,
}

impl PlayerSnapshot {
    pub fn new(player_id: &str, name: &str, stats: ActivityStats) -> Self {
        Self {
            player_id: player_id.to_string(),
            name: name.to_string(),
            is_vip: false,
            profile: None,
            stats,
        }
    }

    pub fn with_vip(mut self, is_vip: bool) -> Self {
        self.is_vip = is_vip;
        self
    }

    pub fn with_flags(mut self, flags: &[&str]) -> Self {
        let flags = flags
            .iter()
            .map(|flag| PlayerFlag {
                flag: flag.to_string(),
            })
            .collect();
        self.profile = Some(PlayerProfile { flags: Some(flags) });
        self
    }

    /// Flag strings from the player's profile; empty when there is no profile or flag list.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.profile
            .iter()
            .filter_map(|profile| profile.flags.as_ref())
            .flatten()
            .map(|flag| flag.flag.as_str())
    }
}

/// Envelope of the `get_detailed_players` endpoint.
///
/// `players` is kept as a raw JSON object so that one bad record does not
/// discard the whole snapshot.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DetailedPlayersResponse {
    pub result: DetailedPlayersResult,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DetailedPlayersResult {
    pub players: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct KickRequest {
    pub player_id: String,
    pub player_name: String,
    pub reason: String,
    pub by: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WebhookMessage {
    pub content: String,
}
