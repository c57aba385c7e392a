use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::Result;
use crate::stats::stats_model::{
    CategoryStat, DashboardStats, ExpenseFact, ExpenseStats, GoalFact, GoalStats,
};
use crate::stats::stats_traits::{StatsRepositoryTrait, StatsServiceTrait};

/// How many category rollups the dashboard shows.
const TOP_CATEGORIES: usize = 10;

pub struct StatsService {
    repository: Arc<dyn StatsRepositoryTrait>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn StatsRepositoryTrait>) -> Self {
        StatsService { repository }
    }
}

impl StatsServiceTrait for StatsService {
    fn dashboard(&self, user_id: &str) -> Result<DashboardStats> {
        let expenses = self.repository.expense_facts(user_id)?;
        let goals = self.repository.goal_facts(user_id)?;
        Ok(compute(&expenses, &goals, Utc::now()))
    }
}

fn month_start(of: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(of.year(), of.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn previous_month_start(this_month: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if this_month.month() == 1 {
        (this_month.year() - 1, 12)
    } else {
        (this_month.year(), this_month.month() - 1)
    };
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

fn compute(expenses: &[ExpenseFact], goals: &[GoalFact], now: DateTime<Utc>) -> DashboardStats {
    let this_month_start = month_start(now);
    let last_month_start = previous_month_start(this_month_start);

    let mut total_amount = Decimal::ZERO;
    let mut this_month = Decimal::ZERO;
    let mut last_month = Decimal::ZERO;
    let mut by_category: HashMap<&str, (Decimal, i64)> = HashMap::new();

    for fact in expenses {
        total_amount += fact.amount;
        // Months are half open: the first instant belongs to the new month.
        if fact.date >= this_month_start {
            this_month += fact.amount;
        } else if fact.date >= last_month_start {
            last_month += fact.amount;
        }
        let entry = by_category
            .entry(fact.category.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += fact.amount;
        entry.1 += 1;
    }

    let mut categories: Vec<CategoryStat> = by_category
        .into_iter()
        .map(|(category, (amount, count))| CategoryStat {
            category: category.to_string(),
            amount,
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
    categories.truncate(TOP_CATEGORIES);

    let mut completed = 0;
    let mut total_target = Decimal::ZERO;
    let mut total_current = Decimal::ZERO;
    let mut total_progress = Decimal::ZERO;

    for goal in goals {
        if goal.is_completed {
            completed += 1;
        }
        total_target += goal.target_amount;
        total_current += goal.current_amount;
        if goal.target_amount > Decimal::ZERO {
            total_progress +=
                ((goal.current_amount / goal.target_amount) * dec!(100)).min(dec!(100));
        }
    }

    let average_progress = if goals.is_empty() {
        Decimal::ZERO
    } else {
        (total_progress / Decimal::from(goals.len() as i64))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    DashboardStats {
        expenses: ExpenseStats {
            total: expenses.len() as i64,
            total_amount,
            this_month,
            last_month,
            by_category: categories,
        },
        goals: GoalStats {
            total: goals.len() as i64,
            completed,
            total_target_amount: total_target,
            total_current_amount: total_current,
            average_progress,
        },
    }
}
