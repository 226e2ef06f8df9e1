//! Query construction and field operators.
//!
//! A [`Query`] either pairs field names with query-values, or is a predicate over a
//! whole document. Field queries keep their fields in the order they were declared;
//! the evaluator narrows candidates field by field in that order.
//!
//! # Query Building
//!
//! ```ignore
//! use jotdb_core::query::{Filter, Query};
//! use regex::Regex;
//!
//! let query = Query::builder()
//!     .field("station", Regex::new("^north")?)
//!     .field("temperature", Filter::gt(22))
//!     .field("archived", Filter::absent())
//!     .build();
//!
//! let hot = Query::predicate(|doc| {
//!     doc.get("temperature").and_then(|t| t.as_f64()).is_some_and(|t| t > 30.0)
//! });
//! ```
//!
//! # Field Operators
//!
//! The [`Filter`] struct collects the operators. They are all plain predicates over a
//! single field value, so they compose freely with each other and with literal values:
//!
//! - Comparison: `gt`, `gte`, `lt`, `lte`, `between`, `between_inclusive`
//! - Existence and type: `exists`, `absent`, `of_type`
//! - String: `starts_with`, `ends_with`, `contains`
//! - Array: `includes`, `length`, `some_element_match`, `every_element_match`
//! - Logical: `and`, `or`, `not`

use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use regex::Regex;

use crate::{
    compare::deep_equal,
    evaluator::matches,
    value::{Map, Value, ValueType},
};

/// Predicate over a single field value. Missing fields are passed as [`Value::Absent`].
pub type FieldPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Predicate over a whole document.
pub type DocumentPredicate = Arc<dyn Fn(&Map) -> bool + Send + Sync>;

/// What a single query field is matched against.
#[derive(Clone)]
pub enum QueryValue {
    /// A literal value. Primitives match by strict equality, objects and arrays by deep
    /// equality, and [`Value::Absent`] matches only a missing field.
    Value(Value),
    /// Matches string fields the pattern matches.
    Regex(Regex),
    /// Matches when the predicate returns `true`.
    Predicate(FieldPredicate),
}

impl QueryValue {
    /// Wraps a closure as a field predicate.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        QueryValue::Predicate(Arc::new(predicate))
    }
}

impl fmt::Debug for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            QueryValue::Regex(regex) => f.debug_tuple("Regex").field(&regex.as_str()).finish(),
            QueryValue::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

macro_rules! impl_query_value_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_query_value_from!(
    bool, f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize,
    &str, String, Vec<Value>, Map, ()
);

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        QueryValue::Value(value)
    }
}

impl From<Regex> for QueryValue {
    fn from(regex: Regex) -> Self {
        QueryValue::Regex(regex)
    }
}

impl From<FieldPredicate> for QueryValue {
    fn from(predicate: FieldPredicate) -> Self {
        QueryValue::Predicate(predicate)
    }
}

/// Document selection criteria.
#[derive(Clone)]
pub enum Query {
    /// Field name to query-value pairs, evaluated in declaration order. An empty map
    /// selects every document.
    Fields(IndexMap<String, QueryValue>),
    /// A predicate over the whole document.
    Predicate(DocumentPredicate),
}

impl Query {
    /// Creates a query that selects every document.
    pub fn new() -> Self {
        Query::Fields(IndexMap::new())
    }

    /// Alias of [`Query::new`].
    pub fn all() -> Self {
        Query::new()
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Creates a query from a predicate over whole documents.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Map) -> bool + Send + Sync + 'static,
    {
        Query::Predicate(Arc::new(predicate))
    }

    /// Returns `true` if this query selects every document without looking at them.
    pub fn is_empty(&self) -> bool {
        matches!(self, Query::Fields(fields) if fields.is_empty())
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::new()
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Fields(fields) => f.debug_map().entries(fields.iter()).finish(),
            Query::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Every entry becomes a literal query-value, so a document can be used as an
/// "equal to" query.
impl From<Map> for Query {
    fn from(map: Map) -> Self {
        Query::Fields(
            map
                .into_iter()
                .map(|(key, value)| (key, QueryValue::Value(value)))
                .collect()
        )
    }
}

impl From<QueryBuilder> for Query {
    fn from(builder: QueryBuilder) -> Self {
        builder.build()
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    fields: IndexMap<String, QueryValue>,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { fields: IndexMap::new() }
    }

    /// Adds a field condition. Declaring the same field twice replaces the earlier
    /// condition but keeps its position.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        Query::Fields(self.fields)
    }
}

/// Helper struct for constructing field operators.
///
/// Every operator returns a [`QueryValue::Predicate`]. Numeric operators only match
/// finite numbers; array operators only match arrays.
///
/// # Example
///
/// ```ignore
/// use jotdb_core::query::{Filter, Query};
///
/// let query = Query::builder()
///     .field("temperature", Filter::between(10, 30))
///     .field("tags", Filter::includes("outdoor"))
///     .build();
/// ```
pub struct Filter;

impl Filter {
    /// Matches numbers greater than `value`.
    pub fn gt(value: impl Into<f64>) -> QueryValue {
        let value = value.into();
        QueryValue::predicate(move |target| target.as_f64().is_some_and(|n| n > value))
    }

    /// Matches numbers greater than or equal to `value`.
    pub fn gte(value: impl Into<f64>) -> QueryValue {
        let value = value.into();
        QueryValue::predicate(move |target| target.as_f64().is_some_and(|n| n >= value))
    }

    /// Matches numbers less than `value`.
    pub fn lt(value: impl Into<f64>) -> QueryValue {
        let value = value.into();
        QueryValue::predicate(move |target| target.as_f64().is_some_and(|n| n < value))
    }

    /// Matches numbers less than or equal to `value`.
    pub fn lte(value: impl Into<f64>) -> QueryValue {
        let value = value.into();
        QueryValue::predicate(move |target| target.as_f64().is_some_and(|n| n <= value))
    }

    /// Matches numbers strictly between `min` and `max`.
    pub fn between(min: impl Into<f64>, max: impl Into<f64>) -> QueryValue {
        let (min, max) = (min.into(), max.into());
        QueryValue::predicate(move |target| target.as_f64().is_some_and(|n| n > min && n < max))
    }

    /// Matches numbers between `min` and `max`, bounds included.
    pub fn between_inclusive(min: impl Into<f64>, max: impl Into<f64>) -> QueryValue {
        let (min, max) = (min.into(), max.into());
        QueryValue::predicate(move |target| target.as_f64().is_some_and(|n| n >= min && n <= max))
    }

    /// Matches fields that exist, including fields holding `null`.
    pub fn exists() -> QueryValue {
        QueryValue::predicate(|target| !target.is_absent())
    }

    /// Matches fields that do not exist.
    pub fn absent() -> QueryValue {
        QueryValue::Value(Value::Absent)
    }

    /// Matches values of the given type.
    pub fn of_type(value_type: ValueType) -> QueryValue {
        QueryValue::predicate(move |target| target.value_type() == Some(value_type))
    }

    /// Matches strings starting with `prefix`.
    pub fn starts_with(prefix: impl Into<String>) -> QueryValue {
        let prefix = prefix.into();
        QueryValue::predicate(move |target| target.as_str().is_some_and(|s| s.starts_with(&prefix)))
    }

    /// Matches strings ending with `suffix`.
    pub fn ends_with(suffix: impl Into<String>) -> QueryValue {
        let suffix = suffix.into();
        QueryValue::predicate(move |target| target.as_str().is_some_and(|s| s.ends_with(&suffix)))
    }

    /// Matches strings containing `needle`.
    pub fn contains(needle: impl Into<String>) -> QueryValue {
        let needle = needle.into();
        QueryValue::predicate(move |target| target.as_str().is_some_and(|s| s.contains(&needle)))
    }

    /// Matches arrays holding an element deep-equal to `value`.
    pub fn includes(value: impl Into<Value>) -> QueryValue {
        let value = value.into();
        QueryValue::predicate(move |target| {
            target
                .as_array()
                .is_some_and(|items| items.iter().any(|item| deep_equal(item, &value)))
        })
    }

    /// Matches arrays of exactly `length` elements.
    pub fn length(length: usize) -> QueryValue {
        QueryValue::predicate(move |target| target.as_array().is_some_and(|items| items.len() == length))
    }

    /// Matches arrays where at least one element matches every given query-value.
    pub fn some_element_match(values: impl IntoIterator<Item = QueryValue>) -> QueryValue {
        let values = values.into_iter().collect::<Vec<_>>();
        QueryValue::predicate(move |target| {
            target.as_array().is_some_and(|items| {
                items
                    .iter()
                    .any(|item| values.iter().all(|value| matches(value, item)))
            })
        })
    }

    /// Matches arrays where every element matches every given query-value.
    pub fn every_element_match(values: impl IntoIterator<Item = QueryValue>) -> QueryValue {
        let values = values.into_iter().collect::<Vec<_>>();
        QueryValue::predicate(move |target| {
            target.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| values.iter().all(|value| matches(value, item)))
            })
        })
    }

    /// Logical AND: the field must match all query-values.
    pub fn and(values: impl IntoIterator<Item = QueryValue>) -> QueryValue {
        let values = values.into_iter().collect::<Vec<_>>();
        QueryValue::predicate(move |target| values.iter().all(|value| matches(value, target)))
    }

    /// Logical OR: the field must match at least one query-value.
    pub fn or(values: impl IntoIterator<Item = QueryValue>) -> QueryValue {
        let values = values.into_iter().collect::<Vec<_>>();
        QueryValue::predicate(move |target| values.iter().any(|value| matches(value, target)))
    }

    /// Logical NOT: the field must not match the query-value.
    pub fn not(value: impl Into<QueryValue>) -> QueryValue {
        let value = value.into();
        QueryValue::predicate(move |target| !matches(&value, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(query_value: &QueryValue, target: serde_json::Value) -> bool {
        matches(query_value, &Value::from(target))
    }

    #[test]
    fn numeric_operators_only_match_numbers() {
        assert!(check(&Filter::gt(22), json!(25)));
        assert!(!check(&Filter::gt(22), json!(22)));
        assert!(check(&Filter::gte(22), json!(22)));
        assert!(check(&Filter::lt(0), json!(-0.5)));
        assert!(check(&Filter::lte(1), json!(1)));
        assert!(!check(&Filter::gt(0), json!("5")));
        assert!(!matches(&Filter::lt(100), &Value::Absent));
    }

    #[test]
    fn ranges() {
        assert!(check(&Filter::between(1, 3), json!(2)));
        assert!(!check(&Filter::between(1, 3), json!(3)));
        assert!(check(&Filter::between_inclusive(1, 3), json!(3)));
        assert!(!check(&Filter::between_inclusive(1, 3), json!(3.5)));
    }

    #[test]
    fn existence_and_type() {
        assert!(check(&Filter::exists(), json!(null)));
        assert!(!matches(&Filter::exists(), &Value::Absent));
        assert!(matches(&Filter::absent(), &Value::Absent));
        assert!(!check(&Filter::absent(), json!(null)));

        assert!(check(&Filter::of_type(ValueType::Array), json!([])));
        assert!(check(&Filter::of_type(ValueType::Null), json!(null)));
        assert!(!check(&Filter::of_type(ValueType::Object), json!([])));
        assert!(!matches(&Filter::of_type(ValueType::Null), &Value::Absent));
    }

    #[test]
    fn string_operators() {
        assert!(check(&Filter::starts_with("nor"), json!("north")));
        assert!(check(&Filter::ends_with("th"), json!("north")));
        assert!(check(&Filter::contains("ort"), json!("north")));
        assert!(!check(&Filter::contains("x"), json!(["x"])));
    }

    #[test]
    fn array_operators() {
        assert!(check(&Filter::includes(2), json!([1, 2, 3])));
        assert!(check(&Filter::includes(Value::from(json!({ "a": 1 }))), json!([{ "a": 1 }])));
        assert!(!check(&Filter::includes(2), json!("2")));
        assert!(check(&Filter::length(2), json!([null, null])));
        assert!(!check(&Filter::length(2), json!({ "a": 1, "b": 2 })));

        let some = Filter::some_element_match([Filter::gt(5), Filter::lt(10)]);
        assert!(check(&some, json!([1, 7, 20])));
        assert!(!check(&some, json!([1, 20])));

        let every = Filter::every_element_match([Filter::of_type(ValueType::String)]);
        assert!(check(&every, json!(["a", "b"])));
        assert!(check(&every, json!([])));
        assert!(!check(&every, json!(["a", 1])));
    }

    #[test]
    fn logical_operators() {
        let either = Filter::or([QueryValue::from("a"), QueryValue::from("b")]);
        assert!(check(&either, json!("b")));
        assert!(!check(&either, json!("c")));

        let both = Filter::and([Filter::gt(1), Filter::lt(3)]);
        assert!(check(&both, json!(2)));
        assert!(!check(&both, json!(3)));

        let neither = Filter::not(Filter::or([QueryValue::from(1), QueryValue::from(2)]));
        assert!(check(&neither, json!(3)));
        assert!(!check(&neither, json!(1)));
        assert!(matches(&Filter::not(5), &Value::Absent));
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let query = Query::builder()
            .field("b", 1)
            .field("a", 2)
            .field("b", 3)
            .build();

        match query {
            Query::Fields(fields) => {
                let keys = fields.keys().cloned().collect::<Vec<_>>();
                assert_eq!(keys, vec!["b", "a"]);
                assert!(matches(&fields["b"], &Value::from(3)));
            },
            Query::Predicate(_) => panic!("expected a field query"),
        }
    }

    #[test]
    fn empty_queries() {
        assert!(Query::new().is_empty());
        assert!(Query::builder().build().is_empty());
        assert!(!Query::predicate(|_| true).is_empty());
        assert!(!Query::builder().field("a", 1).build().is_empty());
    }
}
