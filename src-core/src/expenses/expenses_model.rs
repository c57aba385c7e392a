use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_CATEGORY_LENGTH, MAX_EXPENSE_AMOUNT, MAX_EXPENSE_DESCRIPTION_LENGTH,
};
use crate::dates::{self, timestamp_format};
use crate::errors::{Error, Result};
use crate::pagination::{parse_bool_param, parse_int_param, DEFAULT_LIMIT, MAX_LIMIT};
use crate::trackables::TrackableKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurrenceType {
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceType::None => "NONE",
            RecurrenceType::Daily => "DAILY",
            RecurrenceType::Weekly => "WEEKLY",
            RecurrenceType::Monthly => "MONTHLY",
            RecurrenceType::Yearly => "YEARLY",
        }
    }
}

impl FromStr for RecurrenceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NONE" => Ok(RecurrenceType::None),
            "DAILY" => Ok(RecurrenceType::Daily),
            "WEEKLY" => Ok(RecurrenceType::Weekly),
            "MONTHLY" => Ok(RecurrenceType::Monthly),
            "YEARLY" => Ok(RecurrenceType::Yearly),
            other => Err(Error::Validation(format!(
                "Unknown recurrence type: {}",
                other
            ))),
        }
    }
}

/// Database model for expenses
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExpenseDB {
    pub id: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub is_recurring: bool,
    pub recurrence_type: String,
    pub date: String,
    pub trackable_id: Option<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain model for an expense. The internal trackable link is split back
/// into `goalId`/`budgetId` at this boundary so clients keep the familiar
/// field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub is_recurring: bool,
    pub recurrence_type: RecurrenceType,
    #[serde(with = "timestamp_format")]
    pub date: DateTime<Utc>,
    pub goal_id: Option<String>,
    pub budget_id: Option<String>,
    pub user_id: String,
    #[serde(with = "timestamp_format")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// `link_kind` is the kind of the linked trackable, when any.
    pub fn from_db(db: ExpenseDB, link_kind: Option<TrackableKind>) -> Self {
        let (goal_id, budget_id) = match (&db.trackable_id, link_kind) {
            (Some(id), Some(TrackableKind::Goal)) => (Some(id.clone()), None),
            (Some(id), Some(TrackableKind::Budget)) => (None, Some(id.clone())),
            _ => (None, None),
        };
        Expense {
            id: db.id,
            description: db.description,
            amount: db.amount.parse().unwrap_or(Decimal::ZERO),
            category: db.category,
            is_recurring: db.is_recurring,
            recurrence_type: db.recurrence_type.parse().unwrap_or(RecurrenceType::None),
            date: dates::from_storage(&db.date),
            goal_id,
            budget_id,
            user_id: db.user_id,
            created_at: dates::from_storage(&db.created_at),
            updated_at: dates::from_storage(&db.updated_at),
        }
    }
}

/// Input model for creating an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub is_recurring: bool,
    pub recurrence_type: RecurrenceType,
    /// RFC3339 timestamp or YYYY-MM-DD date.
    pub date: String,
    pub goal_id: Option<String>,
    pub budget_id: Option<String>,
}

impl NewExpense {
    pub fn validate(&self) -> Result<()> {
        validate_description(&self.description)?;
        validate_amount(self.amount)?;
        validate_category(&self.category)?;
        dates::parse_input("date", &self.date)?;
        validate_link(self.goal_id.as_deref(), self.budget_id.as_deref())?;
        Ok(())
    }

    /// The linked trackable, when any, with the kind the caller implied.
    pub fn link(&self) -> Option<(TrackableKind, &str)> {
        link_of(self.goal_id.as_deref(), self.budget_id.as_deref())
    }
}

/// Partial update: only provided fields change. The link fields are
/// double optionals so an explicit `"goalId": null` (or `budgetId`)
/// clears the link, while an absent field leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_type: Option<RecurrenceType>,
    pub date: Option<String>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub goal_id: Option<Option<String>>,
    #[serde(default, with = "serde_with::rust::double_option")]
    pub budget_id: Option<Option<String>>,
}

impl ExpenseUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(date) = &self.date {
            dates::parse_input("date", date)?;
        }
        validate_link(
            self.goal_id.as_ref().and_then(Option::as_deref),
            self.budget_id.as_ref().and_then(Option::as_deref),
        )?;
        Ok(())
    }

    /// Requested link change: `None` means untouched, `Some(None)` means
    /// unlink, an id re-links with the kind the field name implies.
    pub fn link(&self) -> Option<Option<(TrackableKind, &str)>> {
        match (&self.goal_id, &self.budget_id) {
            (None, None) => None,
            (Some(Some(id)), _) => Some(Some((TrackableKind::Goal, id))),
            (_, Some(Some(id))) => Some(Some((TrackableKind::Budget, id))),
            _ => Some(None),
        }
    }
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::Validation("Description is required".to_string()));
    }
    if description.chars().count() > MAX_EXPENSE_DESCRIPTION_LENGTH {
        return Err(Error::Validation("Description is too long".to_string()));
    }
    Ok(())
}

fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation("Amount must be positive".to_string()));
    }
    if amount > MAX_EXPENSE_AMOUNT {
        return Err(Error::Validation("Amount is too large".to_string()));
    }
    Ok(())
}

fn validate_category(category: &str) -> Result<()> {
    if category.trim().is_empty() {
        return Err(Error::Validation("Category is required".to_string()));
    }
    if category.chars().count() > MAX_CATEGORY_LENGTH {
        return Err(Error::Validation("Category is too long".to_string()));
    }
    Ok(())
}

fn validate_link(goal_id: Option<&str>, budget_id: Option<&str>) -> Result<()> {
    if goal_id.is_some() && budget_id.is_some() {
        return Err(Error::Validation(
            "An expense can link to a goal or a budget, not both".to_string(),
        ));
    }
    Ok(())
}

fn link_of<'a>(
    goal_id: Option<&'a str>,
    budget_id: Option<&'a str>,
) -> Option<(TrackableKind, &'a str)> {
    if let Some(id) = goal_id {
        return Some((TrackableKind::Goal, id));
    }
    budget_id.map(|id| (TrackableKind::Budget, id))
}

/// Changeset applied on update; `None` fields are left untouched.
/// `trackable_id` is double optional: `Some(None)` writes NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::expenses)]
pub struct ExpenseChangeset {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_type: Option<String>,
    pub date: Option<String>,
    pub trackable_id: Option<Option<String>>,
    pub updated_at: String,
}

/// Normalized cursor-list query for expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseQuery {
    pub limit: i64,
    /// Opaque anchor: the id of the last row of the previous page.
    pub cursor: Option<String>,
    /// Case-insensitive substring match.
    pub category: Option<String>,
    pub is_recurring: Option<bool>,
    /// Exact match against the internal link column; fed by either the
    /// `goalId` or `budgetId` parameter.
    pub trackable_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ExpenseQuery {
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let limit = match params.get("limit") {
            Some(raw) => parse_int_param("limit", raw, 1, MAX_LIMIT)?,
            None => DEFAULT_LIMIT,
        };
        let is_recurring = params
            .get("isRecurring")
            .map(|raw| parse_bool_param("isRecurring", raw))
            .transpose()?;

        let goal_id = params.get("goalId");
        let budget_id = params.get("budgetId");
        if goal_id.is_some() && budget_id.is_some() {
            return Err(Error::Validation(
                "Provide either goalId or budgetId, not both".to_string(),
            ));
        }
        let trackable_id = goal_id.or(budget_id).cloned();

        let start_date = params
            .get("startDate")
            .map(|raw| dates::parse_input("startDate", raw))
            .transpose()?;
        let end_date = params
            .get("endDate")
            .map(|raw| dates::parse_input_end("endDate", raw))
            .transpose()?;

        Ok(ExpenseQuery {
            limit,
            cursor: params.get("cursor").cloned(),
            category: params.get("category").cloned(),
            is_recurring,
            trackable_id,
            start_date,
            end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn query_defaults() {
        let q = ExpenseQuery::from_params(&raw(&[])).unwrap();
        assert_eq!(q.limit, 10);
        assert_eq!(q.cursor, None);
        assert_eq!(q.trackable_id, None);
    }

    #[test]
    fn query_rejects_both_link_filters() {
        let q = ExpenseQuery::from_params(&raw(&[("goalId", "g1"), ("budgetId", "b1")]));
        assert!(q.is_err());
    }

    #[test]
    fn query_rejects_out_of_range_limit() {
        assert!(ExpenseQuery::from_params(&raw(&[("limit", "0")])).is_err());
        assert!(ExpenseQuery::from_params(&raw(&[("limit", "51")])).is_err());
    }

    #[test]
    fn update_distinguishes_null_from_absent_link() {
        let absent: ExpenseUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.link(), None);

        let cleared: ExpenseUpdate = serde_json::from_str(r#"{"goalId": null}"#).unwrap();
        assert_eq!(cleared.link(), Some(None));

        let relinked: ExpenseUpdate =
            serde_json::from_str(r#"{"budgetId": "b1"}"#).unwrap();
        assert_eq!(relinked.link(), Some(Some((TrackableKind::Budget, "b1"))));

        let both: ExpenseUpdate =
            serde_json::from_str(r#"{"goalId": "g1", "budgetId": "b1"}"#).unwrap();
        assert!(both.validate().is_err());
    }

    #[test]
    fn new_expense_validation() {
        let mut input = NewExpense {
            description: "Groceries".to_string(),
            amount: dec!(42.50),
            category: "Food & Dining".to_string(),
            is_recurring: false,
            recurrence_type: RecurrenceType::None,
            date: "2026-08-01T10:00:00Z".to_string(),
            goal_id: None,
            budget_id: None,
        };
        assert!(input.validate().is_ok());

        input.amount = dec!(1_000_001);
        assert!(input.validate().is_err());

        input.amount = dec!(10);
        input.goal_id = Some("g1".to_string());
        input.budget_id = Some("b1".to_string());
        assert!(input.validate().is_err());
    }

    #[test]
    fn link_prefers_explicit_kind() {
        let input = NewExpense {
            description: "d".to_string(),
            amount: dec!(1),
            category: "Other".to_string(),
            is_recurring: false,
            recurrence_type: RecurrenceType::None,
            date: "2026-01-01".to_string(),
            goal_id: None,
            budget_id: Some("b1".to_string()),
        };
        assert_eq!(input.link(), Some((TrackableKind::Budget, "b1")));
    }
}
