//! Match detail as consumed by the win-rate engine.

use serde::{Deserialize, Serialize};

use super::{ExternalId, MatchId};

/// Number of participants in a standard match.
pub const GAME_SIZE: usize = 10;

/// One player's record within a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub puuid: ExternalId,
    pub won: bool,
    /// Champion played in this match.
    pub champion: String,
    /// In-game name at the time of the match.
    pub display_name: String,
}

impl Participant {
    pub fn new(
        puuid: impl Into<ExternalId>,
        won: bool,
        champion: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            puuid: puuid.into(),
            won,
            champion: champion.into(),
            display_name: display_name.into(),
        }
    }
}

/// Detail of one completed match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub match_id: MatchId,
    pub queue_id: u32,
    pub queue_name: String,
    pub participants: Vec<Participant>,
}

impl MatchDetail {
    /// First participant carrying the given external id.
    pub fn participant(&self, puuid: &ExternalId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.puuid == puuid)
    }
}
