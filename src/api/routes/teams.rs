use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use super::WinRateParams;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{NewTeam, Player, PlayerWinRate, RiotId, Team, TeamId};

#[derive(Debug, Serialize)]
pub struct CreateTeamResponse {
    pub team: Team,
    pub players: Vec<Player>,
}

#[derive(Debug, Serialize)]
pub struct TeamWinRateResponse {
    pub team_id: TeamId,
    pub winrate: f64,
    pub players: Vec<PlayerWinRate>,
}

pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<NewTeam>,
) -> Result<(StatusCode, Json<CreateTeamResponse>), ApiError> {
    let (team, players) = state.service.create_team(request).await?;
    Ok((StatusCode::CREATED, Json(CreateTeamResponse { team, players })))
}

pub async fn add_player(
    State(state): State<AppState>,
    Path(team_id): Path<u64>,
    Json(riot_id): Json<RiotId>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let player = state
        .service
        .add_player_to_team(TeamId(team_id), riot_id)
        .await?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn team_winrate(
    State(state): State<AppState>,
    Path(team_id): Path<u64>,
    Query(params): Query<WinRateParams>,
) -> Result<Json<TeamWinRateResponse>, ApiError> {
    let count = params.match_count()?;
    let result = state
        .service
        .compute_team_win_rate(TeamId(team_id), count, &params.filter())
        .await?;

    Ok(Json(TeamWinRateResponse {
        team_id: result.team_id,
        winrate: result.percentage,
        players: result.players,
    }))
}
