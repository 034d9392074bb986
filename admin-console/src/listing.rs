//! Search and sort over fetched rows
//!
//! List screens fetch every row and narrow them here: a case-insensitive
//! substring match on one or two text fields, then an optional sort on
//! any column.

use std::cmp::Ordering;

use baas_client::compare_json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// `?search=&status=&sort=&dir=` on list endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct ListParams<S = String> {
    pub search: Option<String>,
    pub status: Option<S>,
    pub sort: Option<String>,
    #[serde(default)]
    pub dir: SortDir,
}

impl<S> Default for ListParams<S> {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            sort: None,
            dir: SortDir::Asc,
        }
    }
}

impl<S> ListParams<S> {
    /// Search term exactly as typed; empty or whitespace-only means no search
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Does any of `fields` contain `term`, ignoring case?
pub fn matches_term(term: &str, fields: &[Option<&str>]) -> bool {
    let needle = term.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|f| f.to_lowercase().contains(&needle))
}

/// Keep the rows whose `fields` contain `term`; every row when there is no term
pub fn search<T, F>(rows: Vec<T>, term: Option<&str>, fields: F) -> Vec<T>
where
    F: for<'a> Fn(&'a T) -> Vec<Option<&'a str>>,
{
    match term {
        Some(term) => rows
            .into_iter()
            .filter(|row| matches_term(term, &fields(row)))
            .collect(),
        None => rows,
    }
}

/// Stable sort on a serialized column; unknown columns leave the order alone
pub fn sort_rows<T: Serialize>(rows: Vec<T>, column: Option<&str>, dir: SortDir) -> Vec<T> {
    let Some(column) = column.filter(|c| !c.is_empty()) else {
        return rows;
    };

    let mut keyed: Vec<(Value, T)> = rows
        .into_iter()
        .map(|row| {
            let key = serde_json::to_value(&row)
                .ok()
                .and_then(|v| v.get(column).cloned())
                .unwrap_or(Value::Null);
            (key, row)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_json(a, b);
        match dir {
            SortDir::Asc => ord,
            // Nulls stay last either way
            SortDir::Desc => match (a.is_null(), b.is_null()) {
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                _ => ord.reverse(),
            },
        }
    });
    keyed.into_iter().map(|(_, row)| row).collect()
}

/// Search then sort
pub fn narrow<T, S, F>(rows: Vec<T>, params: &ListParams<S>, fields: F) -> Vec<T>
where
    T: Serialize,
    F: for<'a> Fn(&'a T) -> Vec<Option<&'a str>>,
{
    let rows = search(rows, params.term(), fields);
    sort_rows(rows, params.sort.as_deref(), params.dir)
}
