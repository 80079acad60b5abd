//! reqwest-backed Riot API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{Account, AccountApi, MatchApi, MatchFilter, RiotError};
use crate::config::RiotConfig;
use crate::models::{queue_name, ExternalId, MatchDetail, MatchId, Participant};

const TOKEN_HEADER: &str = "x-riot-token";

/// HTTP client for account-v1 and match-v5.
pub struct RiotClient {
    client: Client,
    base_url: Url,
}

impl RiotClient {
    /// Create a client for the configured regional host.
    pub fn new(config: &RiotConfig, api_key: &str) -> Result<Self, RiotError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| RiotError::InvalidUrl(e.to_string()))?;

        let mut token = HeaderValue::from_str(api_key).map_err(|_| RiotError::InvalidApiKey)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, token);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("winrate-tracker")),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build a URL under the base host from raw path segments.
    /// Segments are percent-encoded, so Riot IDs with spaces are safe.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RiotError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RiotError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn account_url(&self, gamer_name: &str, tag_line: &str) -> Result<Url, RiotError> {
        self.endpoint(&[
            "riot",
            "account",
            "v1",
            "accounts",
            "by-riot-id",
            gamer_name,
            tag_line,
        ])
    }

    fn match_ids_url(
        &self,
        puuid: &ExternalId,
        count: u32,
        filter: &MatchFilter,
    ) -> Result<Url, RiotError> {
        let mut url = self.endpoint(&[
            "lol",
            "match",
            "v5",
            "matches",
            "by-puuid",
            puuid.as_str(),
            "ids",
        ])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("count", &count.to_string());
            if let Some(match_type) = &filter.match_type {
                query.append_pair("type", match_type);
            }
            if let Some(queue) = &filter.queue {
                query.append_pair("queue", queue);
            }
        }
        Ok(url)
    }

    fn match_url(&self, match_id: &MatchId) -> Result<Url, RiotError> {
        self.endpoint(&["lol", "match", "v5", "matches", match_id.as_str()])
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RiotError> {
        debug!(path = url.path(), "Riot API request");

        let response = self.client.get(url.clone()).send().await?;

        if let Some(err) = classify_status(response.status(), response.headers(), &url) {
            return Err(err);
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Map a non-success status to an error. 429 is kept distinct from everything else.
fn classify_status(status: StatusCode, headers: &HeaderMap, url: &Url) -> Option<RiotError> {
    if status.is_success() {
        return None;
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        return Some(RiotError::RateLimited { retry_after_secs });
    }

    if status == StatusCode::NOT_FOUND {
        return Some(RiotError::NotFound(url.path().to_string()));
    }

    Some(RiotError::HttpStatus {
        status: status.as_u16(),
        message: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

// match-v5 payload, reduced to the fields the engine needs

#[derive(Debug, Deserialize)]
struct MatchDto {
    info: MatchInfoDto,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchInfoDto {
    #[serde(default)]
    queue_id: u32,
    participants: Vec<ParticipantDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantDto {
    puuid: String,
    win: bool,
    #[serde(default)]
    champion_name: String,
    #[serde(default)]
    riot_id_game_name: String,
}

impl MatchDto {
    fn into_detail(self, match_id: &MatchId) -> MatchDetail {
        let queue_id = self.info.queue_id;
        MatchDetail {
            match_id: match_id.clone(),
            queue_id,
            queue_name: queue_name(queue_id),
            participants: self
                .info
                .participants
                .into_iter()
                .map(|p| Participant::new(p.puuid, p.win, p.champion_name, p.riot_id_game_name))
                .collect(),
        }
    }
}

#[async_trait]
impl MatchApi for RiotClient {
    async fn list_match_ids(
        &self,
        puuid: &ExternalId,
        count: u32,
        filter: &MatchFilter,
    ) -> Result<Vec<MatchId>, RiotError> {
        let url = self.match_ids_url(puuid, count, filter)?;
        self.get_json(url).await
    }

    async fn get_match_detail(&self, match_id: &MatchId) -> Result<MatchDetail, RiotError> {
        let url = self.match_url(match_id)?;
        let dto: MatchDto = self.get_json(url).await?;
        Ok(dto.into_detail(match_id))
    }
}

#[async_trait]
impl AccountApi for RiotClient {
    async fn account_by_riot_id(
        &self,
        gamer_name: &str,
        tag_line: &str,
    ) -> Result<Account, RiotError> {
        let url = self.account_url(gamer_name, tag_line)?;
        self.get_json(url).await
    }
}
