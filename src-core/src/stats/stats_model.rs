use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Per-category spending rollup, largest amounts first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    pub amount: Decimal,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStats {
    pub total: i64,
    pub total_amount: Decimal,
    pub this_month: Decimal,
    pub last_month: Decimal,
    pub by_category: Vec<CategoryStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total: i64,
    pub completed: i64,
    pub total_target_amount: Decimal,
    pub total_current_amount: Decimal,
    /// Mean of the per-goal progress percentages, capped at 100 each.
    pub average_progress: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub expenses: ExpenseStats,
    pub goals: GoalStats,
}

/// One expense, reduced to the fields the dashboard aggregates over.
#[derive(Debug, Clone)]
pub struct ExpenseFact {
    pub amount: Decimal,
    pub category: String,
    pub date: DateTime<Utc>,
}

/// One goal with its live linked-expense total.
#[derive(Debug, Clone)]
pub struct GoalFact {
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub is_completed: bool,
}
