//! Team and player records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ExternalId, PlayerId, TeamId};

/// A stored team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A stored player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    /// Riot ID game name (the part before `#`)
    pub gamer_name: String,

    /// Riot ID tag line (the part after `#`)
    pub tag_line: String,

    pub team_id: TeamId,

    /// Resolved external id; `None` until the account lookup succeeds
    #[serde(default)]
    pub puuid: Option<ExternalId>,

    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn riot_id(&self) -> RiotId {
        RiotId {
            gamer_name: self.gamer_name.clone(),
            tag_line: self.tag_line.clone(),
        }
    }
}

/// A Riot ID (`GameName#TAG`). Also the request body for adding a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiotId {
    pub gamer_name: String,
    pub tag_line: String,
}

impl RiotId {
    pub fn new(gamer_name: impl Into<String>, tag_line: impl Into<String>) -> Self {
        Self {
            gamer_name: gamer_name.into(),
            tag_line: tag_line.into(),
        }
    }

    /// Parse `Name#TAG`. Both halves must be non-empty after trimming.
    pub fn parse(s: &str) -> Option<Self> {
        let (name, tag) = s.rsplit_once('#')?;
        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() {
            return None;
        }
        Some(Self::new(name, tag))
    }

    /// Case-insensitive comparison, matching how the account service treats Riot IDs.
    pub fn matches(&self, gamer_name: &str, tag_line: &str) -> bool {
        self.gamer_name.eq_ignore_ascii_case(gamer_name) && self.tag_line.eq_ignore_ascii_case(tag_line)
    }
}

impl std::fmt::Display for RiotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.gamer_name, self.tag_line)
    }
}

/// Request to create a team with an initial roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
    pub name: String,
    #[serde(default)]
    pub players: Vec<RiotId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_riot_id_parse() {
        let id = RiotId::parse("Faker#KR1").unwrap();
        assert_eq!(id.gamer_name, "Faker");
        assert_eq!(id.tag_line, "KR1");
        assert_eq!(id.to_string(), "Faker#KR1");
    }

    #[test]
    fn test_riot_id_parse_keeps_hash_in_name() {
        let id = RiotId::parse("We#Are#BR1").unwrap();
        assert_eq!(id.gamer_name, "We#Are");
        assert_eq!(id.tag_line, "BR1");
    }

    #[test]
    fn test_riot_id_parse_rejects_missing_parts() {
        assert!(RiotId::parse("NoTag").is_none());
        assert!(RiotId::parse("#TAG").is_none());
        assert!(RiotId::parse("Name# ").is_none());
    }

    #[test]
    fn test_riot_id_matches_case_insensitive() {
        let id = RiotId::new("Faker", "KR1");
        assert!(id.matches("faker", "kr1"));
        assert!(!id.matches("faker", "kr2"));
    }

    #[test]
    fn test_new_team_players_default_empty() {
        let team: NewTeam = serde_json::from_str(r#"{"name": "Red"}"#).unwrap();
        assert_eq!(team.name, "Red");
        assert!(team.players.is_empty());
    }
}
