//! Pagination envelopes and raw query-parameter normalization.
//!
//! List endpoints receive untyped string parameters; the `from_raw`
//! constructors coerce and bound-check them, rejecting the whole request
//! on the first malformed value so filters are never partially applied.

use serde::Serialize;

use crate::errors::{Error, Result};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Normalized page/limit pair for offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetParams {
    pub page: i64,
    pub limit: i64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        OffsetParams {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl OffsetParams {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Result<Self> {
        let page = match page {
            Some(raw) => parse_int_param("page", raw, 1, i64::MAX)?,
            None => DEFAULT_PAGE,
        };
        let limit = match limit {
            Some(raw) => parse_int_param("limit", raw, 1, MAX_LIMIT)?,
            None => DEFAULT_LIMIT,
        };
        Ok(OffsetParams { page, limit })
    }

    /// Saturates on overflow, so an absurdly large page number reads as
    /// an empty page past the end of the data.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Pagination block of an offset-paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl OffsetMeta {
    pub fn new(params: OffsetParams, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.limit - 1) / params.limit
        };
        OffsetMeta {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
            has_next: params.page < total_pages,
            has_prev: params.page > 1,
        }
    }
}

/// Pagination block of a cursor-paginated response. `total` is the full
/// filtered count, independent of the cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorMeta {
    pub limit: i64,
    pub total: i64,
    pub has_next: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    pub meta: CursorMeta,
}

/// Shapes an over-fetched result set (`limit + 1` rows) into a cursor
/// page: the sentinel row only signals that another page exists and is
/// dropped from the output.
pub fn cursor_page<T>(
    mut rows: Vec<T>,
    limit: i64,
    total: i64,
    id_of: impl Fn(&T) -> String,
) -> CursorPage<T> {
    let has_next = rows.len() as i64 > limit;
    if has_next {
        rows.truncate(limit as usize);
    }
    let next_cursor = if has_next { rows.last().map(&id_of) } else { None };
    CursorPage {
        items: rows,
        meta: CursorMeta {
            limit,
            total,
            has_next,
            next_cursor,
        },
    }
}

pub fn parse_int_param(name: &str, raw: &str, min: i64, max: i64) -> Result<i64> {
    let value: i64 = raw
        .parse()
        .map_err(|_| Error::Validation(format!("{} must be an integer", name)))?;
    if value < min || value > max {
        return Err(Error::Validation(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(value)
}

/// Strict boolean coercion: only the literals `true` and `false` are
/// accepted, so `?isCompleted=yes` fails instead of silently matching.
pub fn parse_bool_param(name: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::Validation(format!(
            "{} must be 'true' or 'false'",
            name
        ))),
    }
}
