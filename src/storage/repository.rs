//! Team and player repository.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use super::{EntityType, JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{ExternalId, Player, PlayerId, RiotId, Team, TeamId};

/// Persistence seam for teams and players.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Store a new team and return it with its assigned id.
    async fn save_team(&self, name: &str) -> Result<Team, StorageError>;

    /// Store a new player on `team_id` and return it with its assigned id.
    async fn save_player(
        &self,
        team_id: TeamId,
        riot_id: &RiotId,
        puuid: Option<ExternalId>,
    ) -> Result<Player, StorageError>;

    /// Replace the stored player with the same id.
    async fn update_player(&self, player: &Player) -> Result<(), StorageError>;

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StorageError>;

    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError>;

    async fn find_players_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, StorageError>;

    /// Case-insensitive substring match on the game name.
    async fn find_players_by_gamer_name(&self, fragment: &str) -> Result<Vec<Player>, StorageError>;

    /// Case-insensitive exact match on name and tag.
    async fn find_player_by_riot_id(&self, riot_id: &RiotId) -> Result<Option<Player>, StorageError>;
}

/// [`TeamRepository`] over `teams.jsonl` and `players.jsonl`.
pub struct JsonlTeamRepository {
    config: StorageConfig,
    // Serialises id assignment and file rewrites.
    lock: Mutex<()>,
}

impl JsonlTeamRepository {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    fn teams(&self) -> Result<Vec<Team>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Team).read_all()
    }

    fn players(&self) -> Result<Vec<Player>, StorageError> {
        JsonlReader::for_entity(&self.config, EntityType::Player).read_all()
    }
}

#[async_trait]
impl TeamRepository for JsonlTeamRepository {
    async fn save_team(&self, name: &str) -> Result<Team, StorageError> {
        let _guard = self.lock.lock().await;

        let next = self.teams()?.iter().map(|t| t.id.0).max().unwrap_or(0) + 1;
        let team = Team {
            id: TeamId(next),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        JsonlWriter::for_entity(&self.config, EntityType::Team).append(&team)?;

        info!(team_id = %team.id, name = %team.name, "Saved team");
        Ok(team)
    }

    async fn save_player(
        &self,
        team_id: TeamId,
        riot_id: &RiotId,
        puuid: Option<ExternalId>,
    ) -> Result<Player, StorageError> {
        let _guard = self.lock.lock().await;

        let next = self.players()?.iter().map(|p| p.id.0).max().unwrap_or(0) + 1;
        let player = Player {
            id: PlayerId(next),
            gamer_name: riot_id.gamer_name.clone(),
            tag_line: riot_id.tag_line.clone(),
            team_id,
            puuid,
            created_at: Utc::now(),
        };
        JsonlWriter::for_entity(&self.config, EntityType::Player).append(&player)?;

        info!(player_id = %player.id, %team_id, riot_id = %riot_id, "Saved player");
        Ok(player)
    }

    async fn update_player(&self, player: &Player) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;

        let mut players = self.players()?;
        let slot = players
            .iter_mut()
            .find(|p| p.id == player.id)
            .ok_or_else(|| StorageError::NotFound(format!("player {}", player.id)))?;
        *slot = player.clone();

        JsonlWriter::for_entity(&self.config, EntityType::Player).write_all(&players)?;
        Ok(())
    }

    async fn find_team(&self, id: TeamId) -> Result<Option<Team>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.teams()?.into_iter().find(|t| t.id == id))
    }

    async fn find_player(&self, id: PlayerId) -> Result<Option<Player>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self.players()?.into_iter().find(|p| p.id == id))
    }

    async fn find_players_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, StorageError> {
        let _guard = self.lock.lock().await;
        JsonlReader::for_entity(&self.config, EntityType::Player).read_where(|p: &Player| p.team_id == team_id)
    }

    async fn find_players_by_gamer_name(&self, fragment: &str) -> Result<Vec<Player>, StorageError> {
        let _guard = self.lock.lock().await;
        let needle = fragment.to_lowercase();
        JsonlReader::for_entity(&self.config, EntityType::Player)
            .read_where(|p: &Player| p.gamer_name.to_lowercase().contains(&needle))
    }

    async fn find_player_by_riot_id(&self, riot_id: &RiotId) -> Result<Option<Player>, StorageError> {
        let _guard = self.lock.lock().await;
        Ok(self
            .players()?
            .into_iter()
            .find(|p| riot_id.matches(&p.gamer_name, &p.tag_line)))
    }
}
