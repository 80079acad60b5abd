use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::WinRateParams;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{Player, PlayerId};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub gamer_name: String,
}

#[derive(Debug, Serialize)]
pub struct PlayerWinRateResponse {
    pub player_id: PlayerId,
    pub winrate: f64,
    pub sample_size: u32,
}

pub async fn search_players(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let players = state.service.players_by_gamer_name(&params.gamer_name).await?;
    Ok(Json(players))
}

pub async fn player_winrate(
    State(state): State<AppState>,
    Path(player_id): Path<u64>,
    Query(params): Query<WinRateParams>,
) -> Result<Json<PlayerWinRateResponse>, ApiError> {
    let count = params.match_count()?;
    let rate = state
        .service
        .compute_player_win_rate(PlayerId(player_id), count, &params.filter())
        .await?;

    Ok(Json(PlayerWinRateResponse {
        player_id: PlayerId(player_id),
        winrate: rate.percentage,
        sample_size: rate.sample_size,
    }))
}
