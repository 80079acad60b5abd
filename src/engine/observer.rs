//! Observability hook for the engine.
//!
//! The engine reports retries, dropped matches and sample progress through
//! [`EngineObserver`] instead of writing to any sink itself.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{MatchDetail, MatchId, Participant};
use crate::riot::RiotError;

/// Receives engine events. All methods default to no-ops.
pub trait EngineObserver: Send + Sync {
    /// A rate-limited fetch will be retried after `delay`.
    fn retry_scheduled(&self, _match_id: &MatchId, _attempt: u32, _delay: Duration, _error: &RiotError) {}

    /// A fetch failed for good and the match was left out of the batch.
    fn match_dropped(&self, _match_id: &MatchId, _error: &RiotError) {}

    /// The target player was found in a match and counted.
    fn match_counted(&self, _detail: &MatchDetail, _participant: &Participant) {}

    /// A collection finished.
    fn batch_collected(&self, _requested: usize, _fetched: usize, _elapsed: Duration) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn retry_scheduled(&self, match_id: &MatchId, attempt: u32, delay: Duration, error: &RiotError) {
        // Server hint is reported only; the policy delay is what gets slept.
        let retry_after_secs = match error {
            RiotError::RateLimited { retry_after_secs } => *retry_after_secs,
            _ => None,
        };
        warn!(
            %match_id,
            attempt,
            delay_ms = delay.as_millis() as u64,
            ?retry_after_secs,
            %error,
            "Rate limited, backing off"
        );
    }

    fn match_dropped(&self, match_id: &MatchId, error: &RiotError) {
        warn!(%match_id, %error, "Dropping match from batch");
    }

    fn match_counted(&self, detail: &MatchDetail, participant: &Participant) {
        debug!(
            match_id = %detail.match_id,
            player = %participant.display_name,
            champion = %participant.champion,
            won = participant.won,
            queue = %detail.queue_name,
            "Counted match"
        );
    }

    fn batch_collected(&self, requested: usize, fetched: usize, elapsed: Duration) {
        info!(
            requested,
            fetched,
            elapsed_ms = elapsed.as_millis() as u64,
            "Match batch collected"
        );
    }
}

#[cfg(test)]
pub use recording::{Observed, RecordingObserver};

#[cfg(test)]
mod recording {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Observed {
        Retry {
            match_id: MatchId,
            attempt: u32,
            delay: Duration,
        },
        Dropped {
            match_id: MatchId,
        },
        Counted {
            match_id: MatchId,
            won: bool,
        },
        Batch {
            requested: usize,
            fetched: usize,
        },
    }

    /// Keeps every event in memory for assertions.
    #[derive(Debug, Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<Observed>>,
    }

    impl RecordingObserver {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<Observed> {
            self.events.lock().unwrap().clone()
        }

        pub fn retry_delays(&self) -> Vec<Duration> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Observed::Retry { delay, .. } => Some(delay),
                    _ => None,
                })
                .collect()
        }

        pub fn dropped(&self) -> Vec<MatchId> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Observed::Dropped { match_id } => Some(match_id),
                    _ => None,
                })
                .collect()
        }

        fn push(&self, event: Observed) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl EngineObserver for RecordingObserver {
        fn retry_scheduled(&self, match_id: &MatchId, attempt: u32, delay: Duration, _error: &RiotError) {
            self.push(Observed::Retry {
                match_id: match_id.clone(),
                attempt,
                delay,
            });
        }

        fn match_dropped(&self, match_id: &MatchId, _error: &RiotError) {
            self.push(Observed::Dropped {
                match_id: match_id.clone(),
            });
        }

        fn match_counted(&self, detail: &MatchDetail, participant: &Participant) {
            self.push(Observed::Counted {
                match_id: detail.match_id.clone(),
                won: participant.won,
            });
        }

        fn batch_collected(&self, requested: usize, fetched: usize, _elapsed: Duration) {
            self.push(Observed::Batch { requested, fetched });
        }
    }
}
