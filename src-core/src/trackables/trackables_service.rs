use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::dates;
use crate::errors::{Error, Result};
use crate::metrics;
use crate::pagination::OffsetMeta;
use crate::trackables::trackables_model::{
    NewTrackable, Trackable, TrackableChangeset, TrackableDB, TrackableKind, TrackablePage,
    TrackableQuery, TrackableUpdate, TrackableWithExpenses, TrackableWithMetrics,
};
use crate::trackables::trackables_traits::{TrackableRepositoryTrait, TrackableServiceTrait};

pub struct TrackableService {
    repository: Arc<dyn TrackableRepositoryTrait>,
}

impl TrackableService {
    pub fn new(repository: Arc<dyn TrackableRepositoryTrait>) -> Self {
        TrackableService { repository }
    }

    /// Attaches derived metrics to a freshly loaded row. Every read and
    /// mutation path funnels through here so the computed fields cannot
    /// drift between endpoints.
    fn with_metrics(&self, db: TrackableDB, current_amount: Decimal) -> TrackableWithMetrics {
        let trackable = Trackable::from(db);
        let metrics = metrics::calculate(
            trackable.target_amount,
            current_amount,
            trackable.deadline,
            Utc::now(),
        );
        TrackableWithMetrics {
            trackable,
            current_amount,
            metrics,
        }
    }

    fn load_with_metrics(&self, db: TrackableDB) -> Result<TrackableWithMetrics> {
        let sums = self.repository.expense_sums(&[db.id.clone()])?;
        let current = sums.get(&db.id).copied().unwrap_or(Decimal::ZERO);
        Ok(self.with_metrics(db, current))
    }

    fn require(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
    ) -> Result<TrackableDB> {
        self.repository
            .find_by_id(user_id, kind, id)?
            .ok_or_else(|| Error::NotFound(kind.display_name().to_string()))
    }
}

#[async_trait]
impl TrackableServiceTrait for TrackableService {
    fn list(
        &self,
        user_id: &str,
        kind: TrackableKind,
        query: &TrackableQuery,
    ) -> Result<TrackablePage> {
        let (rows, total) = self.repository.search(user_id, kind, query)?;

        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let sums = self.repository.expense_sums(&ids)?;

        let items = rows
            .into_iter()
            .map(|db| {
                let current = sums.get(&db.id).copied().unwrap_or(Decimal::ZERO);
                self.with_metrics(db, current)
            })
            .collect();

        Ok(TrackablePage {
            items,
            pagination: OffsetMeta::new(query.params, total),
        })
    }

    fn get(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
    ) -> Result<TrackableWithExpenses> {
        let db = self.require(user_id, kind, id)?;
        let expenses = self.repository.linked_expenses(&db.id)?;
        let current = expenses.iter().map(|e| e.amount).sum();
        Ok(TrackableWithExpenses {
            record: self.with_metrics(db, current),
            expenses,
        })
    }

    async fn create(
        &self,
        user_id: &str,
        kind: TrackableKind,
        new_trackable: NewTrackable,
    ) -> Result<TrackableWithMetrics> {
        new_trackable.validate()?;
        let db = self.repository.insert(user_id, kind, new_trackable)?;
        // A new record has no linked expenses yet.
        Ok(self.with_metrics(db, Decimal::ZERO))
    }

    async fn update(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
        update: TrackableUpdate,
    ) -> Result<TrackableWithMetrics> {
        let existing = self.require(user_id, kind, id)?;
        update.validate()?;

        if update.is_empty() {
            return self.load_with_metrics(existing);
        }

        let deadline = update.deadline_utc()?.map(dates::to_storage);
        let changeset = TrackableChangeset {
            name: update.name,
            description: update.description,
            target_amount: update.target_amount.map(|amount| amount.to_string()),
            deadline,
            is_completed: None,
            updated_at: dates::to_storage(Utc::now()),
        };

        let db = self.repository.update(&existing.id, changeset)?;
        self.load_with_metrics(db)
    }

    async fn delete(&self, user_id: &str, kind: TrackableKind, id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, kind, id)?;
        if deleted == 0 {
            return Err(Error::NotFound(kind.display_name().to_string()));
        }
        Ok(())
    }

    async fn set_completed(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
        is_completed: bool,
    ) -> Result<TrackableWithMetrics> {
        let existing = self.require(user_id, kind, id)?;

        let changeset = TrackableChangeset {
            name: None,
            description: None,
            target_amount: None,
            deadline: None,
            is_completed: Some(is_completed),
            updated_at: dates::to_storage(Utc::now()),
        };

        let db = self.repository.update(&existing.id, changeset)?;
        self.load_with_metrics(db)
    }
}
