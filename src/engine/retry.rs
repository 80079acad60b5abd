//! Retry policy for single match-detail fetches.
//!
//! Only the rate-limit signal is retried. Every other failure is returned
//! on the spot so the collector can drop the match.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::EngineObserver;
use crate::models::{MatchDetail, MatchId};
use crate::riot::{MatchApi, RiotError};

/// Growth of the backoff delay across attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// `base` every time
    Constant,
    /// `attempt * base`: 2s, 4s, 6s, ... for a 2s base
    #[default]
    Linear,
    /// `2^(attempt - 1) * base`: 2s, 4s, 8s, ... for a 2s base
    Exponential,
}

/// Bounded retry on rate limiting.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            backoff: Backoff::Linear,
        }
    }
}

impl RetryPolicy {
    /// Sleep before the attempt that follows failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff {
            Backoff::Constant => self.base_delay,
            Backoff::Linear => self.base_delay.saturating_mul(attempt),
            Backoff::Exponential => {
                let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
                self.base_delay.saturating_mul(factor)
            }
        }
    }
}

/// Fetch one match, backing off and retrying while the API reports rate limiting.
///
/// Returns the last error once `max_attempts` is reached. No sleep follows
/// the final attempt.
pub async fn fetch_with_retry(
    api: &dyn MatchApi,
    match_id: &MatchId,
    policy: &RetryPolicy,
    observer: &dyn EngineObserver,
) -> Result<MatchDetail, RiotError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match api.get_match_detail(match_id).await {
            Ok(detail) => return Ok(detail),
            Err(err) if err.is_rate_limited() && attempt < max_attempts => {
                let delay = policy.delay_for(attempt);
                observer.retry_scheduled(match_id, attempt, delay, &err);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
