use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::trackables::trackables_model::{
    LinkedExpense, NewTrackable, TrackableChangeset, TrackableDB, TrackableKind, TrackablePage,
    TrackableQuery, TrackableUpdate, TrackableWithExpenses, TrackableWithMetrics,
};

/// Trait for trackable repository operations
pub trait TrackableRepositoryTrait: Send + Sync {
    fn search(
        &self,
        user_id: &str,
        kind: TrackableKind,
        query: &TrackableQuery,
    ) -> Result<(Vec<TrackableDB>, i64)>;
    fn find_by_id(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
    ) -> Result<Option<TrackableDB>>;
    fn insert(
        &self,
        user_id: &str,
        kind: TrackableKind,
        new_trackable: NewTrackable,
    ) -> Result<TrackableDB>;
    fn update(&self, id: &str, changeset: TrackableChangeset) -> Result<TrackableDB>;
    fn delete(&self, user_id: &str, kind: TrackableKind, id: &str) -> Result<usize>;
    fn expense_sums(&self, trackable_ids: &[String]) -> Result<HashMap<String, Decimal>>;
    fn linked_expenses(&self, trackable_id: &str) -> Result<Vec<LinkedExpense>>;
}

/// Trait for trackable service operations
#[async_trait]
pub trait TrackableServiceTrait: Send + Sync {
    fn list(
        &self,
        user_id: &str,
        kind: TrackableKind,
        query: &TrackableQuery,
    ) -> Result<TrackablePage>;
    fn get(&self, user_id: &str, kind: TrackableKind, id: &str)
        -> Result<TrackableWithExpenses>;
    async fn create(
        &self,
        user_id: &str,
        kind: TrackableKind,
        new_trackable: NewTrackable,
    ) -> Result<TrackableWithMetrics>;
    async fn update(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
        update: TrackableUpdate,
    ) -> Result<TrackableWithMetrics>;
    async fn delete(&self, user_id: &str, kind: TrackableKind, id: &str) -> Result<()>;
    async fn set_completed(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
        is_completed: bool,
    ) -> Result<TrackableWithMetrics>;
}
