use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};

use ledgerly_core::trackables::{NewTrackable, TrackableKind, TrackableQuery, TrackableUpdate};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{CompleteGoalRequest, Goal, GoalDetail, GoalList, Message};

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<GoalList>> {
    let query = TrackableQuery::from_params(&params)?;
    let page = state
        .trackable_service
        .list(&current.id, TrackableKind::Goal, &query)?;
    Ok(Json(GoalList::from(page)))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<NewTrackable>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let created = state
        .trackable_service
        .create(&current.id, TrackableKind::Goal, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(Goal::from(created))))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<GoalDetail>> {
    let detail = state
        .trackable_service
        .get(&current.id, TrackableKind::Goal, &id)?;
    Ok(Json(GoalDetail::from(detail)))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<TrackableUpdate>, JsonRejection>,
) -> ApiResult<Json<Goal>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let updated = state
        .trackable_service
        .update(&current.id, TrackableKind::Goal, &id, payload)
        .await?;
    Ok(Json(Goal::from(updated)))
}

/// Toggles completion; the explicit flag allows reopening a goal.
async fn complete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<CompleteGoalRequest>, JsonRejection>,
) -> ApiResult<Json<Goal>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let updated = state
        .trackable_service
        .set_completed(&current.id, TrackableKind::Goal, &id, payload.is_completed)
        .await?;
    Ok(Json(Goal::from(updated)))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Message>> {
    state
        .trackable_service
        .delete(&current.id, TrackableKind::Goal, &id)
        .await?;
    Ok(Json(Message::new("Goal deleted successfully")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/complete", post(complete_goal))
}
