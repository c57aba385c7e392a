use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerly_core::dates::{optional_timestamp_format, timestamp_format};
use ledgerly_core::expenses::Expense;
use ledgerly_core::pagination::{CursorMeta, CursorPage, OffsetMeta};
use ledgerly_core::trackables::{
    LinkedExpense, TrackablePage, TrackableWithExpenses, TrackableWithMetrics,
};

/// Budget as the API presents it. Budgets and goals share one core
/// representation; the wire formats differ only in the name of the
/// progress field, which this pair of DTOs restores.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    #[serde(with = "optional_timestamp_format")]
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub user_id: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
    pub current_amount: Decimal,
    pub spent_percentage: Decimal,
    pub remaining_amount: Decimal,
    pub days_remaining: Option<i64>,
    pub is_overdue: bool,
}

impl From<TrackableWithMetrics> for Budget {
    fn from(record: TrackableWithMetrics) -> Self {
        Self {
            id: record.trackable.id,
            name: record.trackable.name,
            description: record.trackable.description,
            target_amount: record.trackable.target_amount,
            deadline: record.trackable.deadline,
            is_completed: record.trackable.is_completed,
            user_id: record.trackable.user_id,
            created_at: record.trackable.created_at,
            updated_at: record.trackable.updated_at,
            current_amount: record.current_amount,
            spent_percentage: record.metrics.percentage,
            remaining_amount: record.metrics.remaining_amount,
            days_remaining: record.metrics.days_remaining,
            is_overdue: record.metrics.is_overdue,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    #[serde(with = "optional_timestamp_format")]
    pub deadline: Option<DateTime<Utc>>,
    pub is_completed: bool,
    pub user_id: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
    pub current_amount: Decimal,
    pub progress_percentage: Decimal,
    pub remaining_amount: Decimal,
    pub days_remaining: Option<i64>,
    pub is_overdue: bool,
}

impl From<TrackableWithMetrics> for Goal {
    fn from(record: TrackableWithMetrics) -> Self {
        Self {
            id: record.trackable.id,
            name: record.trackable.name,
            description: record.trackable.description,
            target_amount: record.trackable.target_amount,
            deadline: record.trackable.deadline,
            is_completed: record.trackable.is_completed,
            user_id: record.trackable.user_id,
            created_at: record.trackable.created_at,
            updated_at: record.trackable.updated_at,
            current_amount: record.current_amount,
            progress_percentage: record.metrics.percentage,
            remaining_amount: record.metrics.remaining_amount,
            days_remaining: record.metrics.days_remaining,
            is_overdue: record.metrics.is_overdue,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BudgetDetail {
    #[serde(flatten)]
    pub budget: Budget,
    pub expenses: Vec<LinkedExpense>,
}

impl From<TrackableWithExpenses> for BudgetDetail {
    fn from(detail: TrackableWithExpenses) -> Self {
        Self {
            budget: Budget::from(detail.record),
            expenses: detail.expenses,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GoalDetail {
    #[serde(flatten)]
    pub goal: Goal,
    pub expenses: Vec<LinkedExpense>,
}

impl From<TrackableWithExpenses> for GoalDetail {
    fn from(detail: TrackableWithExpenses) -> Self {
        Self {
            goal: Goal::from(detail.record),
            expenses: detail.expenses,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BudgetList {
    pub budgets: Vec<Budget>,
    pub pagination: OffsetMeta,
}

impl From<TrackablePage> for BudgetList {
    fn from(page: TrackablePage) -> Self {
        Self {
            budgets: page.items.into_iter().map(Budget::from).collect(),
            pagination: page.pagination,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GoalList {
    pub goals: Vec<Goal>,
    pub pagination: OffsetMeta,
}

impl From<TrackablePage> for GoalList {
    fn from(page: TrackablePage) -> Self {
        Self {
            goals: page.items.into_iter().map(Goal::from).collect(),
            pagination: page.pagination,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ExpenseList {
    pub expenses: Vec<Expense>,
    pub pagination: CursorMeta,
}

impl From<CursorPage<Expense>> for ExpenseList {
    fn from(page: CursorPage<Expense>) -> Self {
        Self {
            expenses: page.items,
            pagination: page.meta,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CategoryList {
    pub categories: Vec<&'static str>,
}

#[derive(Serialize, Debug, Clone)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CompleteGoalRequest {
    pub is_completed: bool,
}
