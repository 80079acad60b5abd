pub mod players;
pub mod teams;

use serde::Deserialize;

use crate::riot::MatchFilter;
use crate::service::{MatchCount, DEFAULT_MATCH_COUNT};

use super::ApiError;

/// Query parameters shared by the win-rate endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct WinRateParams {
    pub count: Option<String>,
    #[serde(rename = "type")]
    pub match_type: Option<String>,
    pub queue: Option<String>,
}

impl WinRateParams {
    pub fn match_count(&self) -> Result<MatchCount, ApiError> {
        Ok(MatchCount::parse(self.count.as_deref().unwrap_or(DEFAULT_MATCH_COUNT))?)
    }

    pub fn filter(&self) -> MatchFilter {
        MatchFilter::new(self.match_type.clone(), self.queue.clone())
    }
}
