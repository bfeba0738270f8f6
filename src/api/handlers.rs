use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::error::ApiError;
use super::types::*;
use crate::server::AppState;
use crate::util::QueryParams;

fn requested_count(state: &AppState, params: &QueryParams) -> Result<i64, ApiError> {
    let requested = params
        .get_i64("count")
        .map_err(|raw| ApiError::InvalidParameter("count", raw))?;
    Ok(state.config.recommendations.effective_count(requested))
}

/// `GET /recommendations?user_id=...`: a JSON array of track ids.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<String>>, ApiError> {
    let user_id = params
        .get("user_id")
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingParameter("user_id"))?;
    let count = requested_count(&state, &params)?;

    let recommendations = state.recommender.recommend(user_id, count)?;

    Ok(Json(recommendations))
}

pub async fn get_user_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<RecommendationInfo>>, ApiError> {
    let count = requested_count(&state, &params)?;

    let infos = state
        .recommender
        .recommend_scored(&user_id, count)?
        .into_iter()
        .map(|scored| RecommendationInfo {
            track: state.catalog.track(&scored.id).map(TrackInfo::from),
            id: scored.id,
            score: scored.score,
        })
        .collect();

    Ok(Json(infos))
}

pub async fn get_similar_users(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<SimilarUserInfo>>, ApiError> {
    let count = requested_count(&state, &params)?;

    let infos = state
        .recommender
        .similar_users(&user_id, count)?
        .into_iter()
        .map(|scored| SimilarUserInfo {
            id: scored.id,
            similarity: scored.score,
        })
        .collect();

    Ok(Json(infos))
}

pub async fn list_tracks(State(state): State<AppState>) -> Json<Vec<TrackInfo>> {
    Json(state.catalog.tracks().iter().map(TrackInfo::from).collect())
}

pub async fn get_track(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> Result<Json<TrackInfo>, ApiError> {
    state
        .catalog
        .track(&track_id)
        .map(|t| Json(TrackInfo::from(t)))
        .ok_or(ApiError::TrackNotFound(track_id))
}

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserInfo>> {
    let users = state
        .catalog
        .users()
        .iter()
        .map(|u| UserInfo {
            id: u.id.clone(),
            name: u.name.clone(),
            history: u.history.clone(),
        })
        .collect();

    Json(users)
}

pub async fn health() -> &'static str {
    "OK"
}
