//! # AFK Monitor Library
//!
//! Moderation agent for a multiplayer game server. It polls the server's
//! remote administration API once per minute, works out which connected
//! players have stopped participating, and kicks them.
//!
//! ## Detection Model
//!
//! ### Activity Sampling
//! Every poll returns cumulative per-player counters (kills, deaths,
//! combat, offense, defense, support). A player whose counters are exactly
//! the same as the previous sample is considered idle; the idle timer starts
//! at the moment that sample was first seen. Any change to any counter
//! restarts the timer. This is a heuristic: a player can be idle while still
//! accruing support points, or active without moving any counter.
//!
//! ### Exemptions
//! VIP players (when VIP whitelisting is enabled) and players carrying the
//! configured whitelist flag are never tracked. Becoming exempt discards
//! any tracking history immediately.
//!
//! ### Population Floor
//! When the number of connected players is at or below the configured
//! minimum, no player is evaluated that cycle, so a nearly empty server is
//! never emptied further.
//!
//! ## Module Organization
//!
//! ### Configuration (`config`)
//! Environment-variable parsing and validation.
//!
//! ### Exemption Evaluator (`exemption`)
//! Pure VIP/whitelist-flag rules and the per-cycle exemption cache.
//!
//! ### Activity Tracker (`tracker`)
//! Per-player baseline and idle timer; decides when the threshold is met.
//!
//! ### Administration API (`rcon`)
//! Snapshot fetching, response parsing and the kick endpoint.
//!
//! ### Kick Enforcer (`kick`)
//! Argument validation and bounded retries around the kick endpoint.
//!
//! ### Notifier (`notifier`)
//! Fire-and-forget webhook messages.
//!
//! ### Monitor Loop (`monitor`)
//! One-cycle driver plus the endless poll/sleep harness.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use monitor::config::Config;
//! use monitor::monitor::Monitor;
//! use monitor::notifier;
//! use monitor::rcon::RconClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let rcon = Arc::new(RconClient::new(&config.server_url, &config.api_key)?);
//!     let notifier = notifier::from_url(config.webhook_url.as_deref())?;
//!
//!     let mut monitor = Monitor::new(&config, rcon.clone(), rcon, notifier);
//!     monitor.run().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod exemption;
pub mod kick;
pub mod monitor;
pub mod notifier;
pub mod rcon;
pub mod tracker;
