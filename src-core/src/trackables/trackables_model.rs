use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, MAX_TARGET_AMOUNT};
use crate::dates::{self, optional_timestamp_format, timestamp_format};
use crate::errors::{Error, Result};
use crate::metrics::TrackableMetrics;
use crate::pagination::{parse_bool_param, OffsetMeta, OffsetParams};

/// Discriminator for the two target-tracking variants. Budgets and goals
/// share one table and one code path; the distinction only surfaces in
/// API field naming and in which routes are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackableKind {
    Budget,
    Goal,
}

impl TrackableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackableKind::Budget => "BUDGET",
            TrackableKind::Goal => "GOAL",
        }
    }

    /// Human-readable name used in error messages ("Budget not found").
    pub fn display_name(&self) -> &'static str {
        match self {
            TrackableKind::Budget => "Budget",
            TrackableKind::Goal => "Goal",
        }
    }
}

impl FromStr for TrackableKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BUDGET" => Ok(TrackableKind::Budget),
            "GOAL" => Ok(TrackableKind::Goal),
            other => Err(Error::Validation(format!(
                "Unknown trackable kind: {}",
                other
            ))),
        }
    }
}

/// Database model for trackables
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::trackables)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TrackableDB {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub target_amount: String,
    pub deadline: Option<String>,
    pub is_completed: bool,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Domain model for a budget or goal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trackable {
    pub id: String,
    pub kind: TrackableKind,
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
}

impl From<TrackableDB> for Trackable {
    fn from(db: TrackableDB) -> Self {
        Trackable {
            kind: db.kind.parse().unwrap_or(TrackableKind::Goal),
            name: db.name,
            description: db.description,
            target_amount: db.target_amount.parse().unwrap_or(Decimal::ZERO),
            deadline: db.deadline.as_deref().map(dates::from_storage),
            is_completed: db.is_completed,
            user_id: db.user_id,
            created_at: dates::from_storage(&db.created_at),
            updated_at: dates::from_storage(&db.updated_at),
            id: db.id,
        }
    }
}

/// Input model for creating a budget or goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrackable {
    pub name: String,
    pub description: Option<String>,
    pub target_amount: Decimal,
    /// RFC3339 timestamp or YYYY-MM-DD date.
    pub deadline: Option<String>,
}

impl NewTrackable {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("Name is required".to_string()));
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::Validation("Name is too long".to_string()));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(Error::Validation("Description is too long".to_string()));
            }
        }
        if self.target_amount <= Decimal::ZERO {
            return Err(Error::Validation(
                "Target amount must be positive".to_string(),
            ));
        }
        if self.target_amount > MAX_TARGET_AMOUNT {
            return Err(Error::Validation(
                "Target amount is too large".to_string(),
            ));
        }
        self.deadline_utc()?;
        Ok(())
    }

    pub fn deadline_utc(&self) -> Result<Option<DateTime<Utc>>> {
        self.deadline
            .as_deref()
            .map(|raw| dates::parse_input("deadline", raw))
            .transpose()
    }
}

/// Partial update: only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackableUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<Decimal>,
    pub deadline: Option<String>,
}

impl TrackableUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation("Name is required".to_string()));
            }
            if name.chars().count() > MAX_NAME_LENGTH {
                return Err(Error::Validation("Name is too long".to_string()));
            }
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(Error::Validation("Description is too long".to_string()));
            }
        }
        if let Some(target_amount) = self.target_amount {
            if target_amount <= Decimal::ZERO {
                return Err(Error::Validation(
                    "Target amount must be positive".to_string(),
                ));
            }
            if target_amount > MAX_TARGET_AMOUNT {
                return Err(Error::Validation(
                    "Target amount is too large".to_string(),
                ));
            }
        }
        self.deadline_utc()?;
        Ok(())
    }

    pub fn deadline_utc(&self) -> Result<Option<DateTime<Utc>>> {
        self.deadline
            .as_deref()
            .map(|raw| dates::parse_input("deadline", raw))
            .transpose()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.target_amount.is_none()
            && self.deadline.is_none()
    }
}

/// Changeset applied on update; `None` fields are left untouched.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::trackables)]
pub struct TrackableChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<String>,
    pub deadline: Option<String>,
    pub is_completed: Option<bool>,
    pub updated_at: String,
}

/// Normalized list-query filters for budgets/goals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackableQuery {
    pub params: OffsetParams,
    pub is_completed: Option<bool>,
    pub has_deadline: Option<bool>,
}

impl TrackableQuery {
    /// Coerces raw query-string parameters. Fails atomically: no filter is
    /// applied unless every recognized parameter parses.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let pagination = OffsetParams::from_raw(
            params.get("page").map(String::as_str),
            params.get("limit").map(String::as_str),
        )?;
        let is_completed = params
            .get("isCompleted")
            .map(|raw| parse_bool_param("isCompleted", raw))
            .transpose()?;
        let has_deadline = params
            .get("hasDeadline")
            .map(|raw| parse_bool_param("hasDeadline", raw))
            .transpose()?;
        Ok(TrackableQuery {
            params: pagination,
            is_completed,
            has_deadline,
        })
    }
}

/// A trackable together with its derived fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackableWithMetrics {
    #[serde(flatten)]
    pub trackable: Trackable,
    pub current_amount: Decimal,
    #[serde(flatten)]
    pub metrics: TrackableMetrics,
}

/// Linked expense summary embedded in detail responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedExpense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    #[serde(with = "timestamp_format")]
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackableWithExpenses {
    #[serde(flatten)]
    pub record: TrackableWithMetrics,
    pub expenses: Vec<LinkedExpense>,
}

/// One page of an offset-paginated trackable listing.
#[derive(Debug, Clone, Serialize)]
pub struct TrackablePage {
    pub items: Vec<TrackableWithMetrics>,
    pub pagination: OffsetMeta,
}
