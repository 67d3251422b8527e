use serde_json::Value;
use std::cmp::Ordering;

use super::compare::{compare_for_sort, lookup};
use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        match order {
            Value::Null => Ok(vec![]),
            Value::String(s) => Self::parse_order_string(s),
            Value::Array(arr) => {
                // Expect array of strings like ["created_at desc", "name asc"]
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        other => return Err(FilterError::InvalidOrder(format!("expected string, got {}", other))),
                    }
                }
                Ok(out)
            }
            Value::Object(obj) => {
                // { "created_at": "desc", "name": "asc" }
                let mut out = Vec::new();
                for (k, v) in obj {
                    let sort = SortDirection::parse(v.as_str().unwrap_or("asc"));
                    out.push(FilterOrderInfo { column: k.clone(), sort });
                }
                Ok(out)
            }
            other => Err(FilterError::InvalidOrder(format!("unsupported order value: {}", other))),
        }
    }

    pub fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        // split on commas, then each token into column and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let dir = it.next().unwrap_or("asc");
                if !dir.eq_ignore_ascii_case("asc") && !dir.eq_ignore_ascii_case("desc") {
                    return Err(FilterError::InvalidOrder(format!("unknown direction '{}' for {}", dir, col)));
                }
                out.push(FilterOrderInfo { column: col.to_string(), sort: SortDirection::parse(dir) });
            }
        }
        Ok(out)
    }

    /// Compare two records by each order key in turn
    pub fn compare(infos: &[FilterOrderInfo], a: &Value, b: &Value) -> Ordering {
        for info in infos {
            let ordering = compare_for_sort(lookup(a, &info.column), lookup(b, &info.column));
            let ordering = match info.sort {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}
