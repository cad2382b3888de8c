//! Client for the game server's remote administration API
//!
//! Two endpoints are used: `get_detailed_players` for the connected player
//! snapshot and `kick` for removing a player. Both authenticate with a
//! bearer token.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Response};
use serde_json::Value;
use shared::{DetailedPlayersResponse, KickRequest, PlayerSnapshot};
use std::time::Duration;
use thiserror::Error;

/// Upper bound for any single API request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum RconError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response structure: {0}")]
    Malformed(String),
}

/// Supplies the set of currently connected players
#[async_trait]
pub trait PlayerSource: Send + Sync {
    async fn fetch_players(&self) -> Result<Vec<PlayerSnapshot>, RconError>;
}

/// Backing API for removing a player from the server
#[async_trait]
pub trait KickApi: Send + Sync {
    async fn kick(&self, request: &KickRequest) -> Result<(), RconError>;
}

/// HTTP client bound to one administration API
#[derive(Debug, Clone)]
pub struct RconClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl RconClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RconError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}", self.base_url, name)
    }

    async fn check_status(response: Response) -> Result<Response, RconError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RconError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl PlayerSource for RconClient {
    async fn fetch_players(&self) -> Result<Vec<PlayerSnapshot>, RconError> {
        let response = self
            .http
            .get(self.endpoint("get_detailed_players"))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let body: Value = Self::check_status(response).await?.json().await?;

        let players = parse_players(body)?;
        info!("Fetched {} players", players.len());
        Ok(players)
    }
}

#[async_trait]
impl KickApi for RconClient {
    async fn kick(&self, request: &KickRequest) -> Result<(), RconError> {
        let response = self
            .http
            .post(self.endpoint("kick"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

/// Extracts the player list from a `get_detailed_players` response body
///
/// The body must contain a `result.players` object. Records that fail to
/// decode are skipped with a warning. A record without a `player_id`
/// takes the id from its map key.
pub fn parse_players(body: Value) -> Result<Vec<PlayerSnapshot>, RconError> {
    let response: DetailedPlayersResponse = match serde_json::from_value(body.clone()) {
        Ok(response) => response,
        Err(e) => {
            debug!("Unexpected API response body: {}", body);
            return Err(RconError::Malformed(e.to_string()));
        }
    };

    let mut players = Vec::with_capacity(response.result.players.len());
    for (key, record) in response.result.players {
        match serde_json::from_value::<PlayerSnapshot>(record) {
            Ok(mut player) => {
                if player.player_id.is_empty() {
                    player.player_id = key;
                }
                players.push(player);
            }
            Err(e) => warn!("Skipping malformed player record {}: {}", key, e),
        }
    }

    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::ActivityStats;

    #[test]
    fn test_parse_players() {
        let body = json!({
            "result": {
                "players": {
                    "111": {
                        "player_id": "111",
                        "name": "Alpha",
                        "is_vip": false,
                        "kills": 1, "deaths": 0, "combat": 5,
                        "offense": 0, "defense": 0, "support": 2,
                        "profile": { "flags": [] }
                    },
                    "222": {
                        "player_id": "222",
                        "name": "Bravo",
                        "is_vip": true
                    }
                }
            }
        });

        let players = parse_players(body).unwrap();

        assert_eq!(players.len(), 2);
        assert_eq!(players[0].player_id, "111");
        assert_eq!(players[0].stats, ActivityStats::new(1, 0, 5, 0, 0, 2));
        assert_eq!(players[1].name, "Bravo");
        assert!(players[1].is_vip);
        assert!(players[1].stats.is_zero());
    }

    #[test]
    fn test_parse_keeps_api_order() {
        let body = json!({
            "result": { "players": {
                "c": { "player_id": "c" },
                "a": { "player_id": "a" },
                "b": { "player_id": "b" }
            } }
        });

        let ids: Vec<String> = parse_players(body)
            .unwrap()
            .into_iter()
            .map(|p| p.player_id)
            .collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_parse_uses_key_when_id_missing() {
        let body = json!({ "result": { "players": { "333": { "name": "Charlie" } } } });

        let players = parse_players(body).unwrap();

        assert_eq!(players[0].player_id, "333");
    }

    #[test]
    fn test_parse_skips_bad_records() {
        let body = json!({
            "result": { "players": {
                "1": { "player_id": "1", "kills": -4 },
                "2": "not a record",
                "3": { "player_id": "3", "name": "Fine" }
            } }
        });

        let players = parse_players(body).unwrap();

        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player_id, "3");
    }

    #[test]
    fn test_parse_empty_players() {
        let body = json!({ "result": { "players": {} } });
        assert!(parse_players(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_shapes() {
        let shapes = vec![
            json!(null),
            json!([]),
            json!({}),
            json!({ "result": null }),
            json!({ "result": {} }),
            json!({ "result": { "players": [] } }),
            json!({ "result": { "players": null } }),
        ];

        for body in shapes {
            let result = parse_players(body.clone());
            assert!(
                matches!(result, Err(RconError::Malformed(_))),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = RconClient::new("http://rcon.example:8010/", "key").unwrap();

        assert_eq!(
            client.endpoint("kick"),
            "http://rcon.example:8010/api/kick"
        );
    }

    #[test]
    fn test_status_error_message() {
        let error = RconError::Status {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(error.to_string(), "server responded with status 503: busy");
    }
}
