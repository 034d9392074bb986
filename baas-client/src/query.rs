//! Row filter builder
//!
//! Renders to PostgREST query pairs for [`RestBackend`](crate::RestBackend)
//! and evaluates against JSON rows for [`MemoryBackend`](crate::MemoryBackend).

use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Neq(String, Value),
    /// Case-insensitive pattern, `*` or `%` match any run of characters
    ILike(String, String),
    In(String, Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

/// Filter / order / limit applied to a table read, update or delete
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    columns: Option<String>,
    filters: Vec<Filter>,
    order: Vec<OrderBy>,
    limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `Query::new().eq("id", id)`
    pub fn by_id(id: impl ToString) -> Self {
        Self::new().eq("id", id.to_string())
    }

    /// Column list, e.g. `"id,title"`; defaults to `*`
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column.into(), value.into()));
        self
    }

    pub fn neq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Neq(column.into(), value.into()));
        self
    }

    pub fn ilike(mut self, column: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.filters.push(Filter::ILike(column.into(), pattern.into()));
        self
    }

    pub fn in_list<V: Into<Value>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.filters.push(Filter::In(
            column.into(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// PostgREST query pairs
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if let Some(columns) = &self.columns {
            pairs.push(("select".to_string(), columns.clone()));
        }
        for filter in &self.filters {
            let pair = match filter {
                Filter::Eq(col, Value::Null) => (col.clone(), "is.null".to_string()),
                Filter::Eq(col, v) => (col.clone(), format!("eq.{}", render(v))),
                Filter::Neq(col, Value::Null) => (col.clone(), "not.is.null".to_string()),
                Filter::Neq(col, v) => (col.clone(), format!("neq.{}", render(v))),
                Filter::ILike(col, pattern) => (col.clone(), format!("ilike.{}", pattern)),
                Filter::In(col, values) => {
                    let list: Vec<String> = values.iter().map(render).collect();
                    (col.clone(), format!("in.({})", list.join(",")))
                }
            };
            pairs.push(pair);
        }
        if !self.order.is_empty() {
            let order: Vec<String> = self
                .order
                .iter()
                .map(|o| {
                    format!("{}.{}", o.column, if o.ascending { "asc" } else { "desc" })
                })
                .collect();
            pairs.push(("order".to_string(), order.join(",")));
        }
        if let Some(n) = self.limit {
            pairs.push(("limit".to_string(), n.to_string()));
        }
        pairs
    }

    /// Whether a row passes every filter
    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| match f {
            Filter::Eq(col, v) => loosely_equal(field(row, col), v),
            Filter::Neq(col, v) => !loosely_equal(field(row, col), v),
            Filter::ILike(col, pattern) => match field(row, col) {
                Value::Null => false,
                value => ilike(&render(value), pattern),
            },
            Filter::In(col, values) => {
                let value = field(row, col);
                values.iter().any(|v| loosely_equal(value, v))
            }
        })
    }

    /// Filter, order, project and limit rows in memory
    pub fn apply(&self, rows: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut out: Vec<Value> = rows.into_iter().filter(|r| self.matches(r)).collect();
        if !self.order.is_empty() {
            out.sort_by(|a, b| {
                for o in &self.order {
                    let ord = compare_json(field(a, &o.column), field(b, &o.column));
                    let ord = if o.ascending { ord } else { ord.reverse() };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                Ordering::Equal
            });
        }
        if let Some(n) = self.limit {
            out.truncate(n);
        }
        if let Some(columns) = self.columns.as_deref().filter(|c| c.trim() != "*") {
            let keep: Vec<&str> = columns.split(',').map(str::trim).collect();
            for row in &mut out {
                if let Value::Object(map) = row {
                    map.retain(|k, _| keep.contains(&k.as_str()));
                }
            }
        }
        out
    }
}

fn field<'a>(row: &'a Value, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&Value::Null)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality that tolerates `1` vs `1.0` and string-encoded numbers
fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        _ => a == b,
    }
}

/// Total order over JSON scalars: nulls last, numbers numerically,
/// strings case-insensitively, everything else by its JSON text.
pub fn compare_json(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

/// SQL `ILIKE` with `*` / `%` wildcards
fn ilike(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.to_lowercase().chars().collect();
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();

    // Greedy wildcard matching with backtracking to the last star
    let (mut t, mut p) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '*' || pattern[p] == '%') {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((sp, st)) = star {
            p = sp + 1;
            t = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '*' || *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_pairs() {
        let q = Query::new()
            .select("id,title")
            .eq("vendor_id", "v-1")
            .ilike("title", "*arch*")
            .in_list("approval_status", ["pending", "rejected"])
            .eq("category_id", Value::Null)
            .order("created_at", false)
            .limit(10);
        assert_eq!(
            q.to_pairs(),
            vec![
                ("select".into(), "id,title".into()),
                ("vendor_id".into(), "eq.v-1".into()),
                ("title".into(), "ilike.*arch*".into()),
                ("approval_status".into(), "in.(pending,rejected)".into()),
                ("category_id".into(), "is.null".into()),
                ("order".into(), "created_at.desc".into()),
                ("limit".into(), "10".into()),
            ]
        );
    }

    #[test]
    fn test_ilike_wildcards() {
        assert!(ilike("Starlight Decor", "*DECOR*"));
        assert!(ilike("Starlight Decor", "star%"));
        assert!(!ilike("Starlight Decor", "decor"));
        assert!(ilike("aab", "*ab"));
        assert!(ilike("", "*"));
    }

    #[test]
    fn test_matches_numbers_loosely() {
        let row = json!({"id": "x", "version": 2, "price": "10.0"});
        assert!(Query::new().eq("version", 2.0).matches(&row));
        assert!(Query::new().eq("price", 10).matches(&row));
        assert!(!Query::new().eq("version", 3).matches(&row));
        assert!(Query::new().neq("version", 3).matches(&row));
        assert!(!Query::new().eq("missing", 0).matches(&row));
    }

    #[test]
    fn test_apply_orders_limits_projects() {
        let rows = vec![
            json!({"id": 1, "name": "beta", "rank": null}),
            json!({"id": 2, "name": "Alpha", "rank": 3}),
            json!({"id": 3, "name": "gamma", "rank": 1}),
        ];
        let out = Query::new().order("name", true).select("id").apply(rows.clone());
        assert_eq!(out, vec![json!({"id": 2}), json!({"id": 1}), json!({"id": 3})]);

        let out = Query::new().order("rank", true).limit(2).apply(rows);
        assert_eq!(out[0]["id"], 3);
        assert_eq!(out[1]["id"], 2);
    }
}
