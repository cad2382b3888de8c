//! Environment-driven configuration for the AFK monitor
//!
//! Every setting comes from the process environment. Parsing is written
//! against a lookup function so it can be exercised without mutating the
//! real environment in tests.

use crate::exemption::normalize_flag;
use shared::DEFAULT_KICKED_BY;
use std::time::Duration;
use thiserror::Error;

/// Time between the start of one poll cycle's sleep and the next poll.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);
/// Total kick attempts, including the first.
pub const KICK_ATTEMPTS: u32 = 3;
/// Pause between failed kick attempts.
pub const KICK_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} environment variable not set")]
    Missing { name: &'static str },
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Validated runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Administration API base URL without a trailing slash
    pub server_url: String,
    pub api_key: String,
    pub afk_time: Duration,
    pub vip_whitelist: bool,
    /// Normalized whitelist flag; `None` disables flag exemption
    pub whitelist_flag: Option<String>,
    /// Kicks only happen when more than this many players are connected
    pub min_players: usize,
    pub kick_message: String,
    pub kicked_by: String,
    pub webhook_url: Option<String>,
    pub poll_interval: Duration,
    pub kick_attempts: u32,
    pub kick_retry_delay: Duration,
}

impl Config {
    /// Reads the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    ///
    /// Blank values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| -> Option<String> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing { name });

        let server_url = require("RCON_SERVER")?.trim_end_matches('/').to_string();
        let api_key = require("RCON_API_KEY")?;

        let afk_minutes: u64 = parse_integer("AFK_TIME", require("AFK_TIME")?)?;
        if afk_minutes == 0 {
            return Err(ConfigError::Invalid {
                name: "AFK_TIME",
                value: afk_minutes.to_string(),
                reason: "must be at least one minute",
            });
        }

        let vip_whitelist = require("VIP_WHITELIST")? == "YES";
        let min_players: usize = parse_integer("NO_KICK_BELOW", require("NO_KICK_BELOW")?)?;
        let kick_message = require("KICK_MESSAGE")?;

        let whitelist_flag = get("WHITELIST_FLAG")
            .map(|flag| normalize_flag(&flag))
            .filter(|flag| !flag.is_empty());

        Ok(Self {
            server_url,
            api_key,
            afk_time: Duration::from_secs(afk_minutes.saturating_mul(60)),
            vip_whitelist,
            whitelist_flag,
            min_players,
            kick_message,
            kicked_by: get("KICK_BY").unwrap_or_else(|| DEFAULT_KICKED_BY.to_string()),
            webhook_url: get("DISCORD_WEBHOOK"),
            poll_interval: POLL_INTERVAL,
            kick_attempts: KICK_ATTEMPTS,
            kick_retry_delay: KICK_RETRY_DELAY,
        })
    }
}

fn parse_integer<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid {
        name,
        value,
        reason: "expected a non-negative integer",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("RCON_SERVER", "http://rcon.example:8010/"),
            ("RCON_API_KEY", "secret"),
            ("AFK_TIME", "10"),
            ("VIP_WHITELIST", "YES"),
            ("NO_KICK_BELOW", "40"),
            ("KICK_MESSAGE", "afk please rejoin"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| vars.get(name).map(|value| value.to_string()))
    }

    #[test]
    fn test_minimal_config() {
        let config = load(&base_vars()).unwrap();

        assert_eq!(config.server_url, "http://rcon.example:8010");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.afk_time, Duration::from_secs(600));
        assert!(config.vip_whitelist);
        assert_eq!(config.whitelist_flag, None);
        assert_eq!(config.min_players, 40);
        assert_eq!(config.kick_message, "afk please rejoin");
        assert_eq!(config.kicked_by, "AFK Bot");
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.poll_interval, POLL_INTERVAL);
        assert_eq!(config.kick_attempts, 3);
        assert_eq!(config.kick_retry_delay, Duration::from_secs(5));
    }

    #[test]
    fn test_optional_values() {
        let mut vars = base_vars();
        vars.insert("WHITELIST_FLAG", " 🐷\u{FE0F} ");
        vars.insert("DISCORD_WEBHOOK", "https://discord.example/hook");
        vars.insert("KICK_BY", "Seeder Bot");

        let config = load(&vars).unwrap();

        assert_eq!(config.whitelist_flag.as_deref(), Some("🐷"));
        assert_eq!(config.webhook_url.as_deref(), Some("https://discord.example/hook"));
        assert_eq!(config.kicked_by, "Seeder Bot");
    }

    #[test]
    fn test_vip_whitelist_requires_exact_yes() {
        for value in ["yes", "NO", "true", "1"] {
            let mut vars = base_vars();
            vars.insert("VIP_WHITELIST", value);
            assert!(!load(&vars).unwrap().vip_whitelist, "{} enabled VIP", value);
        }
    }

    #[test]
    fn test_each_required_variable() {
        for name in [
            "RCON_SERVER",
            "RCON_API_KEY",
            "AFK_TIME",
            "VIP_WHITELIST",
            "NO_KICK_BELOW",
            "KICK_MESSAGE",
        ] {
            let mut vars = base_vars();
            vars.remove(name);
            assert_eq!(load(&vars), Err(ConfigError::Missing { name }));
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("RCON_API_KEY", "   ");

        assert_eq!(
            load(&vars),
            Err(ConfigError::Missing {
                name: "RCON_API_KEY"
            })
        );
    }

    #[test]
    fn test_blank_whitelist_flag_disables_flag_exemption() {
        let mut vars = base_vars();
        vars.insert("WHITELIST_FLAG", " \u{FE0F} ");

        assert_eq!(load(&vars).unwrap().whitelist_flag, None);
    }

    #[test]
    fn test_invalid_integers() {
        let mut vars = base_vars();
        vars.insert("AFK_TIME", "ten");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "AFK_TIME", .. })
        ));

        let mut vars = base_vars();
        vars.insert("AFK_TIME", "0");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid { name: "AFK_TIME", .. })
        ));

        let mut vars = base_vars();
        vars.insert("NO_KICK_BELOW", "-1");
        assert!(matches!(
            load(&vars),
            Err(ConfigError::Invalid {
                name: "NO_KICK_BELOW",
                ..
            })
        ));
    }

    #[test]
    fn test_error_messages() {
        let missing = ConfigError::Missing { name: "AFK_TIME" };
        assert_eq!(missing.to_string(), "AFK_TIME environment variable not set");

        let invalid = ConfigError::Invalid {
            name: "AFK_TIME",
            value: "ten".to_string(),
            reason: "expected a non-negative integer",
        };
        assert_eq!(
            invalid.to_string(),
            "AFK_TIME has invalid value \"ten\": expected a non-negative integer"
        );
    }
}
