use async_trait::async_trait;

use crate::errors::Result;
use crate::expenses::expenses_model::{
    Expense, ExpenseChangeset, ExpenseDB, ExpenseQuery, ExpenseUpdate, NewExpense,
};
use crate::pagination::CursorPage;
use crate::trackables::TrackableKind;

/// Trait for expense repository operations
pub trait ExpenseRepositoryTrait: Send + Sync {
    /// Returns up to `limit + 1` rows after the cursor (the sentinel row
    /// signals a next page) together with the filter-wide total.
    fn search(
        &self,
        user_id: &str,
        query: &ExpenseQuery,
    ) -> Result<(Vec<(ExpenseDB, Option<String>)>, i64)>;
    fn find_by_id(&self, user_id: &str, id: &str)
        -> Result<Option<(ExpenseDB, Option<String>)>>;
    fn insert(
        &self,
        user_id: &str,
        new_expense: NewExpense,
        trackable_id: Option<String>,
    ) -> Result<ExpenseDB>;
    fn update(&self, id: &str, changeset: ExpenseChangeset) -> Result<ExpenseDB>;
    fn delete(&self, user_id: &str, id: &str) -> Result<usize>;
    fn trackable_kind(&self, user_id: &str, trackable_id: &str)
        -> Result<Option<TrackableKind>>;
}

/// Trait for expense service operations
#[async_trait]
pub trait ExpenseServiceTrait: Send + Sync {
    fn list(&self, user_id: &str, query: &ExpenseQuery) -> Result<CursorPage<Expense>>;
    fn get(&self, user_id: &str, id: &str) -> Result<Expense>;
    async fn create(&self, user_id: &str, new_expense: NewExpense) -> Result<Expense>;
    async fn update(&self, user_id: &str, id: &str, update: ExpenseUpdate) -> Result<Expense>;
    async fn delete(&self, user_id: &str, id: &str) -> Result<()>;
}
