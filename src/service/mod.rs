//! Application service: team management plus win-rate computation.
//!
//! Ties the repository, the Riot API traits and the engine together. The
//! HTTP routes and the CLI are thin wrappers over [`WinRateService`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::engine::{team_win_rate, EngineError, WinRateEngine};
use crate::models::{
    ExternalId, NewTeam, Player, PlayerId, PlayerWinRate, RiotId, Team, TeamId, TeamWinRate, WinRate,
};
use crate::riot::{AccountApi, MatchApi, MatchFilter, RiotError};
use crate::storage::{StorageError, TeamRepository};

/// Largest page the match-list endpoint serves.
pub const MAX_MATCH_COUNT: u32 = 100;

/// Default number of recent matches when the caller gives none.
pub const DEFAULT_MATCH_COUNT: &str = "10";

/// Service-level errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid match count: {0}")]
    InvalidMatchCount(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Team not found: {0}")]
    TeamNotFound(TeamId),

    #[error("Failed to resolve account for {riot_id}: {source}")]
    Resolution {
        riot_id: String,
        #[source]
        source: RiotError,
    },

    #[error("Failed to list matches: {0}")]
    MatchIds(#[source] RiotError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// True when the caller sent something unusable.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::Validation(_) | ServiceError::InvalidMatchCount(_))
    }
}

/// Validated number of recent matches to analyse (`1..=100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchCount(u32);

impl MatchCount {
    pub fn new(count: u32) -> Result<Self, ServiceError> {
        if (1..=MAX_MATCH_COUNT).contains(&count) {
            Ok(Self(count))
        } else {
            Err(ServiceError::InvalidMatchCount(format!(
                "{} is outside 1..={}",
                count, MAX_MATCH_COUNT
            )))
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let count: u32 = raw
            .trim()
            .parse()
            .map_err(|_| ServiceError::InvalidMatchCount(format!("{:?} is not a positive integer", raw)))?;
        Self::new(count)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for MatchCount {
    fn default() -> Self {
        Self(10)
    }
}

/// Team management and win-rate computation.
pub struct WinRateService {
    repo: Arc<dyn TeamRepository>,
    matches: Arc<dyn MatchApi>,
    accounts: Arc<dyn AccountApi>,
    engine: WinRateEngine,
}

impl WinRateService {
    pub fn new(
        repo: Arc<dyn TeamRepository>,
        matches: Arc<dyn MatchApi>,
        accounts: Arc<dyn AccountApi>,
        config: &EngineConfig,
    ) -> Result<Self, ServiceError> {
        let engine = WinRateEngine::from_config(Arc::clone(&matches), config)?;
        Ok(Self::with_engine(repo, matches, accounts, engine))
    }

    pub fn with_engine(
        repo: Arc<dyn TeamRepository>,
        matches: Arc<dyn MatchApi>,
        accounts: Arc<dyn AccountApi>,
        engine: WinRateEngine,
    ) -> Self {
        Self {
            repo,
            matches,
            accounts,
            engine,
        }
    }

    // ---- Teams and players ----

    /// Create a team and add its initial roster.
    ///
    /// Stops at the first player that cannot be added; players added before
    /// that stay stored.
    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_team(&self, request: NewTeam) -> Result<(Team, Vec<Player>), ServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("team name must not be empty".to_string()));
        }
        for riot_id in &request.players {
            validate_riot_id(riot_id)?;
        }

        let team = self.repo.save_team(name).await?;
        let mut players = Vec::with_capacity(request.players.len());
        for riot_id in &request.players {
            players.push(self.add_player_to_team(team.id, riot_id.clone()).await?);
        }

        info!(team_id = %team.id, players = players.len(), "Created team");
        Ok((team, players))
    }

    /// Put the player with this Riot ID on `team_id`, creating it if needed.
    ///
    /// An existing player (same Riot ID, any case) is moved and its PUUID
    /// refreshed. A new player is only stored once its PUUID resolves.
    #[instrument(skip(self, riot_id), fields(riot_id = %riot_id))]
    pub async fn add_player_to_team(&self, team_id: TeamId, riot_id: RiotId) -> Result<Player, ServiceError> {
        validate_riot_id(&riot_id)?;
        let riot_id = RiotId::new(riot_id.gamer_name.trim(), riot_id.tag_line.trim());

        if self.repo.find_team(team_id).await?.is_none() {
            return Err(ServiceError::TeamNotFound(team_id));
        }

        let puuid = self.lookup_account(&riot_id).await?;

        match self.repo.find_player_by_riot_id(&riot_id).await? {
            Some(mut existing) => {
                existing.team_id = team_id;
                existing.puuid = Some(puuid);
                self.repo.update_player(&existing).await?;
                info!(player_id = %existing.id, %team_id, "Moved existing player");
                Ok(existing)
            }
            None => Ok(self.repo.save_player(team_id, &riot_id, Some(puuid)).await?),
        }
    }

    pub async fn players_by_gamer_name(&self, fragment: &str) -> Result<Vec<Player>, ServiceError> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return Err(ServiceError::Validation("gamer_name must not be empty".to_string()));
        }
        Ok(self.repo.find_players_by_gamer_name(fragment).await?)
    }

    pub async fn player(&self, player_id: PlayerId) -> Result<Player, ServiceError> {
        self.repo
            .find_player(player_id)
            .await?
            .ok_or(ServiceError::PlayerNotFound(player_id))
    }

    pub async fn team(&self, team_id: TeamId) -> Result<Team, ServiceError> {
        self.repo
            .find_team(team_id)
            .await?
            .ok_or(ServiceError::TeamNotFound(team_id))
    }

    pub async fn team_players(&self, team_id: TeamId) -> Result<Vec<Player>, ServiceError> {
        self.team(team_id).await?;
        Ok(self.repo.find_players_by_team(team_id).await?)
    }

    /// The stored PUUID, or an account lookup when none is stored yet.
    pub async fn resolve_external_id(&self, player: &Player) -> Result<ExternalId, ServiceError> {
        match &player.puuid {
            Some(puuid) => Ok(puuid.clone()),
            None => self.lookup_account(&player.riot_id()).await,
        }
    }

    async fn lookup_account(&self, riot_id: &RiotId) -> Result<ExternalId, ServiceError> {
        self.accounts
            .account_by_riot_id(&riot_id.gamer_name, &riot_id.tag_line)
            .await
            .map(|account| account.puuid)
            .map_err(|source| ServiceError::Resolution {
                riot_id: riot_id.to_string(),
                source,
            })
    }

    // ---- Win rates ----

    /// Win rate of one player over their `count` most recent matches.
    pub async fn compute_player_win_rate(
        &self,
        player_id: PlayerId,
        count: MatchCount,
        filter: &MatchFilter,
    ) -> Result<WinRate, ServiceError> {
        let player = self.player(player_id).await?;
        self.win_rate_for(&player, count, filter).await
    }

    /// Unweighted mean of every player's win rate.
    ///
    /// Players are computed one after another; the first failure aborts.
    #[instrument(skip(self, count, filter), fields(count = count.get()))]
    pub async fn compute_team_win_rate(
        &self,
        team_id: TeamId,
        count: MatchCount,
        filter: &MatchFilter,
    ) -> Result<TeamWinRate, ServiceError> {
        let players = self.team_players(team_id).await?;

        let mut per_player = Vec::with_capacity(players.len());
        for player in &players {
            let win_rate = self.win_rate_for(player, count, filter).await.map_err(|e| {
                warn!(player_id = %player.id, error = %e, "Aborting team computation");
                e
            })?;
            per_player.push(PlayerWinRate {
                player_id: player.id,
                gamer_name: player.gamer_name.clone(),
                win_rate,
            });
        }

        let rates: Vec<WinRate> = per_player.iter().map(|p| p.win_rate).collect();
        let percentage = team_win_rate(&rates)?;

        info!(%team_id, percentage, players = per_player.len(), "Computed team win rate");
        Ok(TeamWinRate {
            team_id,
            percentage,
            players: per_player,
        })
    }

    #[instrument(skip(self, player, filter), fields(player_id = %player.id))]
    async fn win_rate_for(
        &self,
        player: &Player,
        count: MatchCount,
        filter: &MatchFilter,
    ) -> Result<WinRate, ServiceError> {
        let puuid = self.resolve_external_id(player).await?;
        let match_ids = self
            .matches
            .list_match_ids(&puuid, count.get(), filter)
            .await
            .map_err(ServiceError::MatchIds)?;

        Ok(self.engine.player_win_rate(&match_ids, &puuid).await?)
    }
}

fn validate_riot_id(riot_id: &RiotId) -> Result<(), ServiceError> {
    if riot_id.gamer_name.trim().is_empty() || riot_id.tag_line.trim().is_empty() {
        return Err(ServiceError::Validation(
            "gamer_name and tag_line are required".to_string(),
        ));
    }
    Ok(())
}
