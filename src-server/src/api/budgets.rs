use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use ledgerly_core::trackables::{NewTrackable, TrackableKind, TrackableQuery, TrackableUpdate};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{Budget, BudgetDetail, BudgetList, Message};

async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<BudgetList>> {
    let query = TrackableQuery::from_params(&params)?;
    let page = state
        .trackable_service
        .list(&current.id, TrackableKind::Budget, &query)?;
    Ok(Json(BudgetList::from(page)))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<NewTrackable>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let created = state
        .trackable_service
        .create(&current.id, TrackableKind::Budget, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(Budget::from(created))))
}

async fn get_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<BudgetDetail>> {
    let detail = state
        .trackable_service
        .get(&current.id, TrackableKind::Budget, &id)?;
    Ok(Json(BudgetDetail::from(detail)))
}

async fn update_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<TrackableUpdate>, JsonRejection>,
) -> ApiResult<Json<Budget>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let updated = state
        .trackable_service
        .update(&current.id, TrackableKind::Budget, &id, payload)
        .await?;
    Ok(Json(Budget::from(updated)))
}

async fn delete_budget(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Message>> {
    state
        .trackable_service
        .delete(&current.id, TrackableKind::Budget, &id)
        .await?;
    Ok(Json(Message::new("Budget deleted successfully")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}
