//! Query options for reads.

use modelkit_store::{FindOptions, SortOrder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl From<SortDir> for SortOrder {
    fn from(dir: SortDir) -> Self {
        match dir {
            SortDir::Asc => SortOrder::Ascending,
            SortDir::Desc => SortOrder::Descending,
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        })
    }
}

/// Error parsing a [`SortDir`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid sort direction {0:?}, expected \"asc\" or \"desc\"")]
pub struct ParseSortDirError(String);

impl FromStr for SortDir {
    type Err = ParseSortDirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDir::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDir::Desc)
        } else {
            Err(ParseSortDirError(s.to_string()))
        }
    }
}

/// Sorting and pagination for `read` and `read_all_by`.
///
/// - `sort_by` absent: insertion order.
/// - `limit` zero: no pagination at all; `offset` is ignored.
/// - `limit` positive: skip `offset` of the sorted sequence, then take `limit`.
///
/// Deserializes from `{ "sortBy", "sortDir", "limit", "offset" }` with every
/// key optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// Field to sort by.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_dir: SortDir,
    /// Page size, 0 for unlimited.
    pub limit: u64,
    /// Documents to skip when `limit` is positive.
    pub offset: u64,
}

impl QueryOptions {
    /// Options that return everything in insertion order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts by `field`.
    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    /// Sets the sort direction.
    #[must_use]
    pub const fn sort_dir(mut self, dir: SortDir) -> Self {
        self.sort_dir = dir;
        self
    }

    /// Sorts descending.
    #[must_use]
    pub const fn desc(self) -> Self {
        self.sort_dir(SortDir::Desc)
    }

    /// Sets the page size.
    #[must_use]
    pub const fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the page offset.
    #[must_use]
    pub const fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Translates to store cursor options.
    pub fn to_find_options(&self) -> FindOptions {
        let mut options = FindOptions::new();
        if let Some(field) = &self.sort_by {
            options = options.sort(field.clone(), self.sort_dir.into());
        }
        if self.limit > 0 {
            options = options.skip(self.offset).limit(self.limit);
        }
        options
    }
}
