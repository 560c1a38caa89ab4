//! Typed filter predicates.

use modelkit_codec::{DocumentId, Fields, RawDocument, Value, ID_FIELD};
use std::cmp::Ordering;

/// A filter over documents in one collection.
///
/// Filters are a closed set of predicates instead of an untyped map, so a
/// caller holding a schema can check every referenced field before the
/// filter reaches the store.
///
/// # Semantics
///
/// - `Eq` with a null value also matches documents missing the field.
/// - Comparison predicates only match values of the same ordering class
///   (numbers with numbers, text with text).
/// - `Exists` treats an explicit null as present.
/// - An empty `And` matches everything, an empty `Or` matches nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    /// Field equals value.
    Eq(String, Value),
    /// Field does not equal value.
    Ne(String, Value),
    /// Field is greater than value.
    Gt(String, Value),
    /// Field is greater than or equal to value.
    Gte(String, Value),
    /// Field is less than value.
    Lt(String, Value),
    /// Field is less than or equal to value.
    Lte(String, Value),
    /// Field equals one of the values.
    In(String, Vec<Value>),
    /// Field presence.
    Exists(String, bool),
    /// All sub-filters match.
    And(Vec<Filter>),
    /// At least one sub-filter matches.
    Or(Vec<Filter>),
}

impl Filter {
    /// Field equals value.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// Field does not equal value.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne(field.into(), value.into())
    }

    /// Field is greater than value.
    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt(field.into(), value.into())
    }

    /// Field is greater than or equal to value.
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte(field.into(), value.into())
    }

    /// Field is less than value.
    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt(field.into(), value.into())
    }

    /// Field is less than or equal to value.
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte(field.into(), value.into())
    }

    /// Field equals one of the values.
    pub fn is_in<V: Into<Value>>(
        field: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// Field is present (`true`) or absent (`false`).
    pub fn exists(field: impl Into<String>, present: bool) -> Self {
        Self::Exists(field.into(), present)
    }

    /// Matches the document with the given identifier.
    pub fn id(id: DocumentId) -> Self {
        Self::Eq(ID_FIELD.to_string(), Value::Text(id.to_string()))
    }

    /// Builds the equality conjunction of every field in the map.
    ///
    /// An empty map yields [`Filter::All`].
    pub fn from_fields(fields: Fields) -> Self {
        let mut clauses: Vec<Filter> = fields
            .into_iter()
            .map(|(field, value)| Self::Eq(field, value))
            .collect();

        match clauses.len() {
            0 => Self::All,
            1 => clauses.remove(0),
            _ => Self::And(clauses),
        }
    }

    /// Conjunction with another filter, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Self::All, f) | (f, Self::All) => f,
            (Self::And(mut a), Self::And(b)) => {
                a.extend(b);
                Self::And(a)
            }
            (Self::And(mut a), f) => {
                a.push(f);
                Self::And(a)
            }
            (f, Self::And(mut b)) => {
                b.insert(0, f);
                Self::And(b)
            }
            (a, b) => Self::And(vec![a, b]),
        }
    }

    /// Disjunction with another filter.
    #[must_use]
    pub fn or(self, other: Filter) -> Self {
        match (self, other) {
            (Self::Or(mut a), f) => {
                a.push(f);
                Self::Or(a)
            }
            (a, b) => Self::Or(vec![a, b]),
        }
    }

    /// Returns true if this filter matches every document.
    pub fn is_all(&self) -> bool {
        match self {
            Self::All => true,
            Self::And(clauses) => clauses.iter().all(Filter::is_all),
            _ => false,
        }
    }

    /// Every `(field, operand values)` pair referenced by the filter.
    ///
    /// `Exists` contributes its field with no operands.
    pub fn field_operands(&self) -> Vec<(&str, Vec<&Value>)> {
        let mut out = Vec::new();
        self.collect_operands(&mut out);
        out
    }

    fn collect_operands<'a>(&'a self, out: &mut Vec<(&'a str, Vec<&'a Value>)>) {
        match self {
            Self::All => {}
            Self::Eq(f, v)
            | Self::Ne(f, v)
            | Self::Gt(f, v)
            | Self::Gte(f, v)
            | Self::Lt(f, v)
            | Self::Lte(f, v) => out.push((f.as_str(), vec![v])),
            Self::In(f, values) => out.push((f.as_str(), values.iter().collect())),
            Self::Exists(f, _) => out.push((f.as_str(), Vec::new())),
            Self::And(clauses) | Self::Or(clauses) => {
                for clause in clauses {
                    clause.collect_operands(out);
                }
            }
        }
    }

    /// Evaluates the filter against a document.
    pub fn matches(&self, doc: &RawDocument) -> bool {
        match self {
            Self::All => true,
            Self::Eq(field, value) => field_equals(doc, field, value),
            Self::Ne(field, value) => !field_equals(doc, field, value),
            Self::Gt(field, value) => compare(doc, field, value, |o| o == Ordering::Greater),
            Self::Gte(field, value) => compare(doc, field, value, |o| o != Ordering::Less),
            Self::Lt(field, value) => compare(doc, field, value, |o| o == Ordering::Less),
            Self::Lte(field, value) => compare(doc, field, value, |o| o != Ordering::Greater),
            Self::In(field, values) => values.iter().any(|v| field_equals(doc, field, v)),
            Self::Exists(field, present) => doc.field(field).is_some() == *present,
            Self::And(clauses) => clauses.iter().all(|c| c.matches(doc)),
            Self::Or(clauses) => clauses.iter().any(|c| c.matches(doc)),
        }
    }
}

fn field_equals(doc: &RawDocument, field: &str, value: &Value) -> bool {
    match doc.field(field) {
        Some(actual) => actual.loosely_equals(value),
        None => value.is_null(),
    }
}

fn compare(doc: &RawDocument, field: &str, value: &Value, accept: fn(Ordering) -> bool) -> bool {
    match doc.field(field) {
        Some(actual) if actual.same_class(value) && !value.is_null() => {
            accept(actual.cmp_sort(value))
        }
        _ => false,
    }
}

impl From<Fields> for Filter {
    fn from(fields: Fields) -> Self {
        Self::from_fields(fields)
    }
}
