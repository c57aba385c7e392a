use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use ledgerly_core::constants::SUGGESTED_CATEGORIES;
use ledgerly_core::expenses::{Expense, ExpenseQuery, ExpenseUpdate, NewExpense};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{CategoryList, ExpenseList, Message};

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Json<ExpenseList>> {
    let query = ExpenseQuery::from_params(&params)?;
    let page = state.expense_service.list(&current.id, &query)?;
    Ok(Json(ExpenseList::from(page)))
}

async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let created = state.expense_service.create(&current.id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Expense>> {
    let expense = state.expense_service.get(&current.id, &id)?;
    Ok(Json(expense))
}

async fn update_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> ApiResult<Json<Expense>> {
    let Json(payload) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let updated = state
        .expense_service
        .update(&current.id, &id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_expense(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Message>> {
    state.expense_service.delete(&current.id, &id).await?;
    Ok(Json(Message::new("Expense deleted successfully")))
}

async fn suggested_categories() -> Json<CategoryList> {
    Json(CategoryList {
        categories: SUGGESTED_CATEGORIES.to_vec(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route("/expenses/categories", get(suggested_categories))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}
