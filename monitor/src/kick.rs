//! Kick enforcement with a bounded retry policy

use crate::rcon::{KickApi, RconError};
use log::{error, info, warn};
use shared::KickRequest;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KickError {
    #[error("invalid {field}: {value:?}")]
    InvalidArgument { field: &'static str, value: String },
    #[error("failed to kick player after {attempts} attempts: {last_error}")]
    Failed {
        attempts: u32,
        last_error: RconError,
    },
}

/// How many times a kick is attempted and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(crate::config::KICK_ATTEMPTS, crate::config::KICK_RETRY_DELAY)
    }
}

/// Issues kick requests against a `KickApi`
pub struct KickEnforcer {
    api: Arc<dyn KickApi>,
    policy: RetryPolicy,
    reason: String,
    kicked_by: String,
}

impl KickEnforcer {
    pub fn new(api: Arc<dyn KickApi>, policy: RetryPolicy, reason: &str, kicked_by: &str) -> Self {
        Self {
            api,
            policy,
            reason: reason.to_string(),
            kicked_by: kicked_by.to_string(),
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Kicks a player, retrying transport and server failures
    ///
    /// Empty arguments are rejected before any request is made. Returns the
    /// number of attempts used on success.
    pub async fn kick(&self, player_id: &str, player_name: &str) -> Result<u32, KickError> {
        if player_id.trim().is_empty() {
            error!("Invalid player_id: {:?}", player_id);
            return Err(KickError::InvalidArgument {
                field: "player_id",
                value: player_id.to_string(),
            });
        }
        if player_name.trim().is_empty() {
            error!("Invalid player_name: {:?}", player_name);
            return Err(KickError::InvalidArgument {
                field: "player_name",
                value: player_name.to_string(),
            });
        }

        let request = KickRequest {
            player_id: player_id.to_string(),
            player_name: player_name.to_string(),
            reason: self.reason.clone(),
            by: self.kicked_by.clone(),
        };

        let max_attempts = self.policy.max_attempts;
        let mut attempt = 1;
        loop {
            match self.api.kick(&request).await {
                Ok(()) => {
                    info!("Successfully kicked player: {} ({})", player_name, player_id);
                    return Ok(attempt);
                }
                Err(e) if attempt < max_attempts => {
                    warn!(
                        "Error kicking player {} ({}) (Attempt {}/{}): {}",
                        player_name, player_id, attempt, max_attempts, e
                    );
                    info!("Retrying in {} seconds...", self.policy.delay.as_secs());
                    tokio::time::sleep(self.policy.delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        "Failed to kick player {} ({}) after {} attempts: {}",
                        player_name, player_id, max_attempts, e
                    );
                    return Err(KickError::Failed {
                        attempts: attempt,
                        last_error: e,
                    });
                }
            }
        }
    }
}
