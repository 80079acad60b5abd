//! Win-rate engine.
//!
//! Turns a list of match ids plus a target player into a win rate:
//! - bounded concurrent retrieval ([`MatchCollector`])
//! - per-match retry on rate limiting ([`fetch_with_retry`])
//! - order-independent aggregation ([`win_rate`], [`team_win_rate`])
//!
//! Events are reported through an [`EngineObserver`]; the default observer
//! writes `tracing` records.

mod aggregate;
mod collector;
mod observer;
mod retry;

pub use aggregate::{tally, team_win_rate, win_rate, win_rate_observed};
pub use collector::MatchCollector;
pub use observer::{EngineObserver, NoopObserver, TracingObserver};
pub use retry::{fetch_with_retry, Backoff, RetryPolicy};

#[cfg(test)]
pub use observer::{Observed, RecordingObserver};

use std::num::NonZeroUsize;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::models::{ExternalId, MatchId, WinRate};
use crate::riot::MatchApi;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No valid matches found ({fetched} fetched)")]
    NoValidMatches { fetched: usize },

    #[error("Team has no players")]
    EmptyTeam,

    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Collector plus aggregation for one player at a time.
pub struct WinRateEngine {
    collector: MatchCollector,
    observer: Arc<dyn EngineObserver>,
}

impl WinRateEngine {
    pub fn new(collector: MatchCollector, observer: Arc<dyn EngineObserver>) -> Self {
        Self { collector, observer }
    }

    /// Build an engine from configuration with the tracing observer.
    pub fn from_config(api: Arc<dyn MatchApi>, config: &EngineConfig) -> Result<Self, EngineError> {
        Self::from_config_with_observer(api, config, Arc::new(TracingObserver))
    }

    pub fn from_config_with_observer(
        api: Arc<dyn MatchApi>,
        config: &EngineConfig,
        observer: Arc<dyn EngineObserver>,
    ) -> Result<Self, EngineError> {
        let limit = NonZeroUsize::new(config.concurrency_limit).ok_or_else(|| {
            EngineError::InvalidConfig("concurrency_limit must be at least 1".to_string())
        })?;
        if config.max_attempts == 0 {
            return Err(EngineError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        let collector = MatchCollector::new(api, config.retry_policy(), limit)
            .with_observer(Arc::clone(&observer));
        Ok(Self::new(collector, observer))
    }

    pub fn concurrency_limit(&self) -> usize {
        self.collector.concurrency_limit()
    }

    /// Fetch `match_ids` and compute the win rate of `target` over the ones retrieved.
    #[instrument(skip(self, match_ids), fields(player = %target.short(), requested = match_ids.len()))]
    pub async fn player_win_rate(
        &self,
        match_ids: &[MatchId],
        target: &ExternalId,
    ) -> Result<WinRate, EngineError> {
        let matches = self.collector.collect(match_ids).await;
        let rate = win_rate_observed(&matches, target, self.observer.as_ref())?;
        debug!(
            percentage = rate.percentage,
            sample_size = rate.sample_size,
            "Computed player win rate"
        );
        Ok(rate)
    }
}
