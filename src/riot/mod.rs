//! Riot API collaborators.
//!
//! The engine only talks to the match history service through the
//! [`MatchApi`] trait; account resolution sits behind [`AccountApi`].
//! [`RiotClient`] implements both over HTTP.

mod client;
#[cfg(test)]
pub mod mock;

pub use client::RiotClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ExternalId, MatchDetail, MatchId};

/// Errors returned by the Riot API collaborators.
#[derive(Debug, Error)]
pub enum RiotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by Riot API")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid API key header value")]
    InvalidApiKey,
}

impl RiotError {
    /// Whether this is the 429 signal that warrants backoff and retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, RiotError::RateLimited { .. })
    }
}

/// Optional refinements passed through to the match-list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFilter {
    /// Match type, e.g. `ranked` or `normal`
    pub match_type: Option<String>,

    /// Numeric queue id, e.g. `420`
    pub queue: Option<String>,
}

impl MatchFilter {
    /// Build a filter, treating blank values as absent.
    pub fn new(match_type: Option<String>, queue: Option<String>) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            match_type: clean(match_type),
            queue: clean(queue),
        }
    }
}

/// Account record from the account-v1 endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub puuid: ExternalId,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tag_line: Option<String>,
}

/// Match history operations used by the engine.
#[async_trait]
pub trait MatchApi: Send + Sync {
    /// List the most recent match ids for a participant.
    async fn list_match_ids(
        &self,
        puuid: &ExternalId,
        count: u32,
        filter: &MatchFilter,
    ) -> Result<Vec<MatchId>, RiotError>;

    /// Fetch one match's detail.
    async fn get_match_detail(&self, match_id: &MatchId) -> Result<MatchDetail, RiotError>;
}

/// Account lookups used to resolve a player's external id.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn account_by_riot_id(
        &self,
        gamer_name: &str,
        tag_line: &str,
    ) -> Result<Account, RiotError>;
}
