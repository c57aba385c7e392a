use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::dates;
use crate::errors::{Error, Result};
use crate::expenses::expenses_model::{
    Expense, ExpenseChangeset, ExpenseQuery, ExpenseUpdate, NewExpense,
};
use crate::expenses::expenses_traits::{ExpenseRepositoryTrait, ExpenseServiceTrait};
use crate::pagination::{self, CursorPage};
use crate::trackables::TrackableKind;

pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepositoryTrait>,
}

impl ExpenseService {
    pub fn new(repository: Arc<dyn ExpenseRepositoryTrait>) -> Self {
        ExpenseService { repository }
    }

    /// Confirms the referenced trackable exists, belongs to the user and
    /// has the kind the caller implied with `goalId`/`budgetId`.
    fn check_link(
        &self,
        user_id: &str,
        link: Option<(TrackableKind, &str)>,
    ) -> Result<Option<String>> {
        let Some((expected, id)) = link else {
            return Ok(None);
        };
        match self.repository.trackable_kind(user_id, id)? {
            Some(kind) if kind == expected => Ok(Some(id.to_string())),
            _ => Err(Error::Validation(format!(
                "Linked {} not found",
                expected.display_name().to_lowercase()
            ))),
        }
    }

    fn require(&self, user_id: &str, id: &str) -> Result<Expense> {
        self.repository
            .find_by_id(user_id, id)?
            .map(|(db, kind)| Expense::from_db(db, kind.and_then(|k| k.parse().ok())))
            .ok_or_else(|| Error::NotFound("Expense".to_string()))
    }
}

#[async_trait]
impl ExpenseServiceTrait for ExpenseService {
    fn list(&self, user_id: &str, query: &ExpenseQuery) -> Result<CursorPage<Expense>> {
        let (rows, total) = self.repository.search(user_id, query)?;

        let items: Vec<Expense> = rows
            .into_iter()
            .map(|(db, kind)| Expense::from_db(db, kind.and_then(|k| k.parse().ok())))
            .collect();

        Ok(pagination::cursor_page(items, query.limit, total, |e| {
            e.id.clone()
        }))
    }

    fn get(&self, user_id: &str, id: &str) -> Result<Expense> {
        self.require(user_id, id)
    }

    async fn create(&self, user_id: &str, new_expense: NewExpense) -> Result<Expense> {
        new_expense.validate()?;
        let trackable_id = self.check_link(user_id, new_expense.link())?;

        let db = self.repository.insert(user_id, new_expense, trackable_id)?;
        // Re-read through the join so the link kind is resolved.
        self.require(user_id, &db.id)
    }

    async fn update(&self, user_id: &str, id: &str, update: ExpenseUpdate) -> Result<Expense> {
        let existing = self.require(user_id, id)?;
        update.validate()?;

        let trackable_id = match update.link() {
            None => None,
            Some(None) => Some(None),
            Some(link) => Some(self.check_link(user_id, link)?),
        };

        let date = update
            .date
            .as_deref()
            .map(|raw| dates::parse_input("date", raw))
            .transpose()?
            .map(dates::to_storage);

        let changeset = ExpenseChangeset {
            description: update.description,
            amount: update.amount.map(|amount| amount.to_string()),
            category: update.category,
            is_recurring: update.is_recurring,
            recurrence_type: update.recurrence_type.map(|r| r.as_str().to_string()),
            date,
            trackable_id,
            updated_at: dates::to_storage(Utc::now()),
        };

        self.repository.update(&existing.id, changeset)?;
        self.require(user_id, id)
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id, id)?;
        if deleted == 0 {
            return Err(Error::NotFound("Expense".to_string()));
        }
        Ok(())
    }
}
