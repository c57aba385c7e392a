use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::dates;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::expenses::expenses_model::{ExpenseChangeset, ExpenseDB, ExpenseQuery, NewExpense};
use crate::expenses::expenses_traits::ExpenseRepositoryTrait;
use crate::schema::{expenses, trackables};
use crate::trackables::TrackableKind;

pub struct ExpenseRepository {
    pool: Arc<DbPool>,
}

impl ExpenseRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ExpenseRepository { pool }
    }
}

impl ExpenseRepositoryTrait for ExpenseRepository {
    /// Keyset pagination over (date desc, id desc). The stored timestamps
    /// are fixed width, so the text comparison matches chronological order.
    fn search(
        &self,
        user_id: &str,
        query: &ExpenseQuery,
    ) -> Result<(Vec<(ExpenseDB, Option<String>)>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let build = || {
            let mut q = expenses::table
                .left_join(trackables::table)
                .filter(expenses::user_id.eq(user_id))
                .into_boxed();

            if let Some(ref category) = query.category {
                // `%` and `_` in the filter are literal characters, not
                // LIKE wildcards.
                let escaped = category
                    .replace('\\', "\\\\")
                    .replace('%', "\\%")
                    .replace('_', "\\_");
                q = q.filter(
                    expenses::category
                        .like(format!("%{}%", escaped))
                        .escape('\\'),
                );
            }
            if let Some(flag) = query.is_recurring {
                q = q.filter(expenses::is_recurring.eq(flag));
            }
            if let Some(ref trackable_id) = query.trackable_id {
                q = q.filter(expenses::trackable_id.eq(trackable_id));
            }
            if let Some(start) = query.start_date {
                q = q.filter(expenses::date.ge(dates::to_storage(start)));
            }
            if let Some(end) = query.end_date {
                q = q.filter(expenses::date.le(dates::to_storage(end)));
            }
            q
        };

        // The total ignores the cursor so it stays stable while paging.
        let total = build().count().get_result::<i64>(&mut conn)?;

        let mut page_query = build();
        if let Some(ref cursor) = query.cursor {
            let anchor = expenses::table
                .filter(expenses::id.eq(cursor))
                .filter(expenses::user_id.eq(user_id))
                .select((expenses::date, expenses::id))
                .first::<(String, String)>(&mut conn)
                .optional()?;
            let (anchor_date, anchor_id) =
                anchor.ok_or_else(|| Error::Validation("Unknown cursor".to_string()))?;

            page_query = page_query.filter(
                expenses::date.lt(anchor_date.clone()).or(expenses::date
                    .eq(anchor_date)
                    .and(expenses::id.lt(anchor_id))),
            );
        }

        let rows = page_query
            .select((ExpenseDB::as_select(), trackables::kind.nullable()))
            .order((expenses::date.desc(), expenses::id.desc()))
            .limit(query.limit + 1)
            .load::<(ExpenseDB, Option<String>)>(&mut conn)?;

        Ok((rows, total))
    }

    fn find_by_id(
        &self,
        user_id: &str,
        id: &str,
    ) -> Result<Option<(ExpenseDB, Option<String>)>> {
        let mut conn = get_connection(&self.pool)?;
        let row = expenses::table
            .left_join(trackables::table)
            .filter(expenses::id.eq(id))
            .filter(expenses::user_id.eq(user_id))
            .select((ExpenseDB::as_select(), trackables::kind.nullable()))
            .first::<(ExpenseDB, Option<String>)>(&mut conn)
            .optional()?;
        Ok(row)
    }

    fn insert(
        &self,
        user_id: &str,
        new_expense: NewExpense,
        trackable_id: Option<String>,
    ) -> Result<ExpenseDB> {
        let mut conn = get_connection(&self.pool)?;

        let now = dates::to_storage(Utc::now());
        let date = dates::parse_input("date", &new_expense.date)?;

        let row = ExpenseDB {
            id: Uuid::new_v4().to_string(),
            description: new_expense.description,
            amount: new_expense.amount.to_string(),
            category: new_expense.category,
            is_recurring: new_expense.is_recurring,
            recurrence_type: new_expense.recurrence_type.as_str().to_string(),
            date: dates::to_storage(date),
            trackable_id,
            user_id: user_id.to_string(),
            created_at: now.clone(),
            updated_at: now,
        };

        Ok(diesel::insert_into(expenses::table)
            .values(&row)
            .returning(expenses::all_columns)
            .get_result(&mut conn)?)
    }

    fn update(&self, id: &str, changeset: ExpenseChangeset) -> Result<ExpenseDB> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(expenses::table.find(id))
            .set(&changeset)
            .execute(&mut conn)?;

        Ok(expenses::table.find(id).first(&mut conn)?)
    }

    fn delete(&self, user_id: &str, id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::delete(
            expenses::table
                .filter(expenses::id.eq(id))
                .filter(expenses::user_id.eq(user_id)),
        )
        .execute(&mut conn)?)
    }

    fn trackable_kind(
        &self,
        user_id: &str,
        trackable_id: &str,
    ) -> Result<Option<TrackableKind>> {
        let mut conn = get_connection(&self.pool)?;
        let kind = trackables::table
            .filter(trackables::id.eq(trackable_id))
            .filter(trackables::user_id.eq(user_id))
            .select(trackables::kind)
            .first::<String>(&mut conn)
            .optional()?;
        Ok(kind.and_then(|k| k.parse().ok()))
    }
}
