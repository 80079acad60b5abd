//! Bounded concurrent collection of match details.
//!
//! One task is spawned per match id; a semaphore admits at most
//! `concurrency_limit` of them into the fetch-with-retry section at a time.
//! Results funnel back through the `JoinSet`, so only the joining loop ever
//! touches the output vector.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::{fetch_with_retry, EngineObserver, RetryPolicy, TracingObserver};
use crate::models::{MatchDetail, MatchId};
use crate::riot::MatchApi;

/// Fetches batches of match details under a concurrency ceiling.
pub struct MatchCollector {
    api: Arc<dyn MatchApi>,
    policy: RetryPolicy,
    concurrency_limit: NonZeroUsize,
    observer: Arc<dyn EngineObserver>,
}

impl MatchCollector {
    pub fn new(api: Arc<dyn MatchApi>, policy: RetryPolicy, concurrency_limit: NonZeroUsize) -> Self {
        Self {
            api,
            policy,
            concurrency_limit,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn EngineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit.get()
    }

    /// Fetch every id and return the details that could be retrieved.
    ///
    /// Waits for all tasks. Failed fetches are reported to the observer and
    /// left out, so the result may be shorter than `match_ids`. Order of the
    /// result is completion order.
    pub async fn collect(&self, match_ids: &[MatchId]) -> Vec<MatchDetail> {
        let started = Instant::now();
        let permits = Arc::new(Semaphore::new(self.concurrency_limit.get()));
        let mut tasks = JoinSet::new();

        for match_id in match_ids.iter().cloned() {
            let api = Arc::clone(&self.api);
            let observer = Arc::clone(&self.observer);
            let permits = Arc::clone(&permits);
            let policy = self.policy.clone();

            tasks.spawn(async move {
                // Held across backoff sleeps as well as the call itself.
                let Ok(_permit) = permits.acquire_owned().await else {
                    error!(%match_id, "Admission gate closed");
                    return None;
                };

                match fetch_with_retry(api.as_ref(), &match_id, &policy, observer.as_ref()).await {
                    Ok(detail) => Some(detail),
                    Err(err) => {
                        observer.match_dropped(&match_id, &err);
                        None
                    }
                }
            });
        }

        let mut matches = Vec::with_capacity(match_ids.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(detail)) => matches.push(detail),
                Ok(None) => {}
                Err(e) => warn!("Match fetch task failed: {}", e),
            }
        }

        debug!(
            limit = self.concurrency_limit.get(),
            "Collected {}/{} matches",
            matches.len(),
            match_ids.len()
        );
        self.observer
            .batch_collected(match_ids.len(), matches.len(), started.elapsed());

        matches
    }
}
