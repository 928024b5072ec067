// ABOUTME: List query parameters for tags: filtering, sorting and pagination
// ABOUTME: Resolves untrusted query strings against fixed allow-lists

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagQueryError {
    #[error("Unknown sort '{0}'")]
    UnknownSort(String),
    #[error("Unknown direction '{0}'")]
    UnknownDirection(String),
    #[error("Invalid since '{0}': expected an ISO-8601 timestamp")]
    InvalidSince(String),
    #[error("Unknown page '{0}'")]
    UnknownPage(String),
    #[error("Unknown pagesize '{0}'")]
    UnknownPageSize(String),
}

/// Tag attributes a listing may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Column name. Always a literal, never derived from input.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

impl FromStr for SortField {
    type Err = TagQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "created_at" => Ok(SortField::CreatedAt),
            "updated_at" => Ok(SortField::UpdatedAt),
            _ => Err(TagQueryError::UnknownSort(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = TagQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(TagQueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// 1-indexed page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub page_size: i64,
}

impl Page {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// SQL OFFSET, clamped so pages below 1 start at the first row
    pub fn offset(&self) -> i64 {
        page_offset(self.page, self.page_size)
    }

    /// SQL LIMIT
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

fn page_offset(page: i64, page_size: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(page_size).max(0)
}

/// Raw query string of `GET /tags/`
#[derive(Debug, Clone, Default)]
pub struct TagListParams {
    pub name: Option<String>,
    pub since: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<String>,
    pub pagesize: Option<String>,
}

impl TagListParams {
    /// Collect known keys from decoded query pairs. The first occurrence of a key wins.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut params.name,
                "since" => &mut params.since,
                "sort" => &mut params.sort,
                "direction" => &mut params.direction,
                "page" => &mut params.page,
                "pagesize" => &mut params.pagesize,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Resolved tag listing request
#[derive(Debug, Clone, PartialEq)]
pub struct TagQuery {
    /// Case-sensitive substring of the name
    pub name_contains: Option<String>,
    /// Inclusive lower bound on `updated_at`
    pub since: Option<DateTime<Utc>>,
    pub sort: SortField,
    pub direction: SortDirection,
    pub page: Option<Page>,
}

impl Default for TagQuery {
    fn default() -> Self {
        Self {
            name_contains: None,
            since: None,
            sort: SortField::UpdatedAt,
            direction: SortDirection::Desc,
            page: None,
        }
    }
}

impl TagQuery {
    pub fn from_params(params: &TagListParams) -> Result<Self, TagQueryError> {
        let since = match params.since.as_deref() {
            Some(raw) => Some(
                parse_iso8601(raw).ok_or_else(|| TagQueryError::InvalidSince(raw.to_string()))?,
            ),
            None => None,
        };

        let sort = match params.sort.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortField::UpdatedAt,
        };

        let direction = match params.direction.as_deref() {
            Some(raw) => raw.parse()?,
            None => SortDirection::Desc,
        };

        // Pagination only applies when both values are given
        let page = match (non_empty(&params.page), non_empty(&params.pagesize)) {
            (Some(page), Some(page_size)) => {
                let page = page
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| TagQueryError::UnknownPage(page.to_string()))?;
                let page_size = page_size
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| TagQueryError::UnknownPageSize(page_size.to_string()))?;
                Some(Page::new(page, page_size))
            }
            _ => None,
        };

        Ok(Self {
            name_contains: params.name.clone(),
            since,
            sort,
            direction,
            page,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
