use std::collections::HashMap;
use std::sync::Arc;

use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::dates;
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::schema::{expenses, trackables};
use crate::stats::stats_model::{ExpenseFact, GoalFact};
use crate::stats::stats_traits::StatsRepositoryTrait;
use crate::trackables::TrackableKind;

pub struct StatsRepository {
    pool: Arc<DbPool>,
}

impl StatsRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        StatsRepository { pool }
    }
}

impl StatsRepositoryTrait for StatsRepository {
    fn expense_facts(&self, user_id: &str) -> Result<Vec<ExpenseFact>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = expenses::table
            .filter(expenses::user_id.eq(user_id))
            .select((expenses::amount, expenses::category, expenses::date))
            .load::<(String, String, String)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(amount, category, date)| ExpenseFact {
                amount: amount.parse().unwrap_or(Decimal::ZERO),
                category,
                date: dates::from_storage(&date),
            })
            .collect())
    }

    fn goal_facts(&self, user_id: &str) -> Result<Vec<GoalFact>> {
        let mut conn = get_connection(&self.pool)?;

        let goals = trackables::table
            .filter(trackables::user_id.eq(user_id))
            .filter(trackables::kind.eq(TrackableKind::Goal.as_str()))
            .select((
                trackables::id,
                trackables::target_amount,
                trackables::is_completed,
            ))
            .load::<(String, String, bool)>(&mut conn)?;

        if goals.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = goals.iter().map(|(id, _, _)| id.clone()).collect();
        let linked = expenses::table
            .filter(expenses::trackable_id.eq_any(&ids))
            .select((expenses::trackable_id, expenses::amount))
            .load::<(Option<String>, String)>(&mut conn)?;

        let mut sums: HashMap<String, Decimal> = HashMap::new();
        for (trackable_id, amount) in linked {
            if let Some(trackable_id) = trackable_id {
                let amount = amount.parse().unwrap_or(Decimal::ZERO);
                *sums.entry(trackable_id).or_insert(Decimal::ZERO) += amount;
            }
        }

        Ok(goals
            .into_iter()
            .map(|(id, target_amount, is_completed)| GoalFact {
                target_amount: target_amount.parse().unwrap_or(Decimal::ZERO),
                current_amount: sums.get(&id).copied().unwrap_or(Decimal::ZERO),
                is_completed,
            })
            .collect())
    }
}
