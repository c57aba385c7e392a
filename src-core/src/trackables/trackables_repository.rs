use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::dates;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::{expenses, trackables};
use crate::trackables::trackables_model::{
    LinkedExpense, NewTrackable, TrackableChangeset, TrackableDB, TrackableKind, TrackableQuery,
};
use crate::trackables::trackables_traits::TrackableRepositoryTrait;

pub struct TrackableRepository {
    pool: Arc<DbPool>,
}

impl TrackableRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        TrackableRepository { pool }
    }
}

impl TrackableRepositoryTrait for TrackableRepository {
    /// Runs the filtered count and page queries with identical predicates,
    /// newest-created first.
    fn search(
        &self,
        user_id: &str,
        kind: TrackableKind,
        query: &TrackableQuery,
    ) -> Result<(Vec<TrackableDB>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let build = || {
            let mut q = trackables::table
                .filter(trackables::user_id.eq(user_id))
                .filter(trackables::kind.eq(kind.as_str()))
                .into_boxed();

            if let Some(flag) = query.is_completed {
                q = q.filter(trackables::is_completed.eq(flag));
            }
            if let Some(flag) = query.has_deadline {
                q = if flag {
                    q.filter(trackables::deadline.is_not_null())
                } else {
                    q.filter(trackables::deadline.is_null())
                };
            }
            q
        };

        let total = build().count().get_result::<i64>(&mut conn)?;

        let rows = build()
            .order(trackables::created_at.desc())
            .limit(query.params.limit)
            .offset(query.params.offset())
            .load::<TrackableDB>(&mut conn)?;

        Ok((rows, total))
    }

    fn find_by_id(
        &self,
        user_id: &str,
        kind: TrackableKind,
        id: &str,
    ) -> Result<Option<TrackableDB>> {
        let mut conn = get_connection(&self.pool)?;
        let row = trackables::table
            .filter(trackables::id.eq(id))
            .filter(trackables::user_id.eq(user_id))
            .filter(trackables::kind.eq(kind.as_str()))
            .first::<TrackableDB>(&mut conn)
            .optional()?;
        Ok(row)
    }

    fn insert(
        &self,
        user_id: &str,
        kind: TrackableKind,
        new_trackable: NewTrackable,
    ) -> Result<TrackableDB> {
        let mut conn = get_connection(&self.pool)?;

        let now = dates::to_storage(Utc::now());
        let deadline = new_trackable
            .deadline_utc()?
            .map(dates::to_storage);

        let row = TrackableDB {
            id: Uuid::new_v4().to_string(),
            kind: kind.as_str().to_string(),
            name: new_trackable.name,
            description: new_trackable.description,
            target_amount: new_trackable.target_amount.to_string(),
            deadline,
            is_completed: false,
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        Ok(diesel::insert_into(trackables::table)
            .values(&row)
            .returning(trackables::all_columns)
            .get_result(&mut conn)?)
    }

    fn update(&self, id: &str, changeset: TrackableChangeset) -> Result<TrackableDB> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(trackables::table.find(id))
            .set(&changeset)
            .execute(&mut conn)?;

        Ok(trackables::table.find(id).first(&mut conn)?)
    }

    /// Deletes the row; linked expenses are unlinked (not deleted) by the
    /// `ON DELETE SET NULL` constraint.
    fn delete(&self, user_id: &str, kind: TrackableKind, id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::delete(
            trackables::table
                .filter(trackables::id.eq(id))
                .filter(trackables::user_id.eq(user_id))
                .filter(trackables::kind.eq(kind.as_str())),
        )
        .execute(&mut conn)?)
    }

    /// Live per-trackable expense sums; never cached, never stored.
    fn expense_sums(&self, trackable_ids: &[String]) -> Result<HashMap<String, Decimal>> {
        if trackable_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = get_connection(&self.pool)?;

        let rows = expenses::table
            .filter(expenses::trackable_id.eq_any(trackable_ids))
            .select((expenses::trackable_id, expenses::amount))
            .load::<(Option<String>, String)>(&mut conn)?;

        let mut sums: HashMap<String, Decimal> = HashMap::new();
        for (trackable_id, amount) in rows {
            if let Some(trackable_id) = trackable_id {
                let amount = amount.parse().unwrap_or(Decimal::ZERO);
                *sums.entry(trackable_id).or_insert(Decimal::ZERO) += amount;
            }
        }
        Ok(sums)
    }

    fn linked_expenses(&self, trackable_id: &str) -> Result<Vec<LinkedExpense>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = expenses::table
            .filter(expenses::trackable_id.eq(trackable_id))
            .order(expenses::date.desc())
            .select((
                expenses::id,
                expenses::description,
                expenses::amount,
                expenses::category,
                expenses::date,
            ))
            .load::<(String, String, String, String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(id, description, amount, category, date)| LinkedExpense {
                id,
                description,
                amount: amount.parse().unwrap_or(Decimal::ZERO),
                category,
                date: dates::from_storage(&date),
            })
            .collect())
    }
}
