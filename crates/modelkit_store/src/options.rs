//! Cursor options: sort, skip and limit.

use modelkit_codec::{RawDocument, Value};

/// Sort order for a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Chainable description of how a `find` cursor is shaped.
///
/// Regardless of the order the builder methods are called in, the store
/// applies them as sort, then skip, then limit, so pagination always
/// walks the sorted sequence.
///
/// ```
/// use modelkit_store::{FindOptions, SortOrder};
///
/// let options = FindOptions::new()
///     .limit(1)
///     .skip(2)
///     .sort("name", SortOrder::Ascending);
/// assert_eq!(options.skip, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Field and order to sort by.
    pub sort: Option<(String, SortOrder)>,
    /// Number of documents to skip.
    pub skip: u64,
    /// Maximum number of documents to return (0 = unlimited).
    pub limit: u64,
}

impl FindOptions {
    /// Options that return every document in insertion order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts by `field`.
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Skips the first `n` documents.
    #[must_use]
    pub const fn skip(mut self, n: u64) -> Self {
        self.skip = n;
        self
    }

    /// Returns at most `n` documents. Zero means unlimited.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = n;
        self
    }

    /// Shapes an insertion-ordered result set.
    ///
    /// The sort is stable: documents with equal keys keep insertion order
    /// in both directions. Missing fields sort as null.
    pub fn apply(&self, mut docs: Vec<RawDocument>) -> Vec<RawDocument> {
        if let Some((field, order)) = &self.sort {
            docs.sort_by(|a, b| {
                let ord = sort_key(a, field).cmp_sort(&sort_key(b, field));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let iter = docs.into_iter().skip(skip);
        match usize::try_from(self.limit) {
            Ok(0) | Err(_) => iter.collect(),
            Ok(limit) => iter.take(limit).collect(),
        }
    }
}

fn sort_key(doc: &RawDocument, field: &str) -> Value {
    doc.field(field).map_or(Value::Null, |v| v.into_owned())
}
