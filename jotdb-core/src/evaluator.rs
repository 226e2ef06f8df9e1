//! Query evaluation against the in-memory document sequence.
//!
//! [`matches`] compares one query-value with one field value. [`search`] runs a whole
//! [`Query`] over a slice of documents and returns the positions of the matches in
//! ascending order. Positions are only meaningful for the slice they were computed
//! against and must not be kept across calls.

use std::borrow::Borrow;

use crate::{
    compare::{deep_equal, strict_equal},
    query::{Query, QueryValue},
    value::{Map, Value, field},
};

/// Decides whether a single value satisfies a single query-value.
///
/// | query-value          | rule                                               |
/// |----------------------|----------------------------------------------------|
/// | primitive            | strict equality                                    |
/// | predicate            | the predicate returns `true`                       |
/// | regular expression   | the value is a string the pattern matches          |
/// | object or array      | deep equality                                      |
/// | [`Value::Absent`]    | the value is absent                                |
pub fn matches(query_value: &QueryValue, value: &Value) -> bool {
    match query_value {
        QueryValue::Predicate(predicate) => predicate(value),
        QueryValue::Regex(regex) => value.as_str().is_some_and(|s| regex.is_match(s)),
        QueryValue::Value(expected) => match expected {
            Value::Absent => value.is_absent(),
            Value::Object(_) | Value::Array(_) => deep_equal(expected, value),
            primitive => strict_equal(primitive, value),
        },
    }
}

/// Finds the positions of the documents matching `query`.
///
/// Field queries narrow candidates field by field, in declaration order: the first
/// field scans every document to build the candidate list, each following field only
/// filters the remaining candidates. An empty candidate list ends the search early.
pub fn search<D: Borrow<Map>>(query: &Query, documents: &[D]) -> Vec<usize> {
    match query {
        Query::Predicate(predicate) => documents
            .iter()
            .enumerate()
            .filter(|(_, document)| predicate(as_map(*document)))
            .map(|(position, _)| position)
            .collect(),
        Query::Fields(fields) if fields.is_empty() => (0..documents.len()).collect(),
        Query::Fields(fields) => {
            let mut fields = fields.iter();
            let Some((first_key, first_value)) = fields.next() else {
                return Vec::new();
            };

            let mut candidates = documents
                .iter()
                .enumerate()
                .filter(|(_, document)| matches(first_value, field(as_map(*document), first_key)))
                .map(|(position, _)| position)
                .collect::<Vec<_>>();

            for (key, query_value) in fields {
                if candidates.is_empty() {
                    break;
                }

                candidates.retain(|&position| {
                    matches(query_value, field(as_map(&documents[position]), key))
                });
            }

            candidates
        },
    }
}

fn as_map<D: Borrow<Map>>(document: &D) -> &Map {
    document.borrow()
}
