use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use ledgerly_core::stats::DashboardStats;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<DashboardStats>> {
    let stats = state.stats_service.dashboard(&current.id)?;
    Ok(Json(stats))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}
