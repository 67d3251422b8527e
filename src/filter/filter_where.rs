use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use super::compare::{compare_ordered, lookup, scalar_text, values_equal};
use super::error::FilterError;
use super::types::FilterOp;

/// A single predicate inside a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Field { column: String, operator: FilterOp, data: Value },
    And(Vec<Where>),
    Or(Vec<Where>),
    Not(Box<Where>),
}

/// Conjunction of conditions evaluated against a JSON record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Where {
    conditions: Vec<Condition>,
}

impl Where {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn field(mut self, column: impl Into<String>, operator: FilterOp, data: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Field { column: column.into(), operator, data: data.into() });
        self
    }

    pub fn eq(self, column: impl Into<String>, data: impl Into<Value>) -> Self {
        self.field(column, FilterOp::Eq, data)
    }

    pub fn ne(self, column: impl Into<String>, data: impl Into<Value>) -> Self {
        self.field(column, FilterOp::Ne, data)
    }

    pub fn gte(self, column: impl Into<String>, data: impl Into<Value>) -> Self {
        self.field(column, FilterOp::Gte, data)
    }

    pub fn lte(self, column: impl Into<String>, data: impl Into<Value>) -> Self {
        self.field(column, FilterOp::Lte, data)
    }

    pub fn gt(self, column: impl Into<String>, data: impl Into<Value>) -> Self {
        self.field(column, FilterOp::Gt, data)
    }

    pub fn lt(self, column: impl Into<String>, data: impl Into<Value>) -> Self {
        self.field(column, FilterOp::Lt, data)
    }

    pub fn is_in(self, column: impl Into<String>, values: Vec<Value>) -> Self {
        self.field(column, FilterOp::In, Value::Array(values))
    }

    /// Field is missing or null; the soft-delete check
    pub fn is_null(self, column: impl Into<String>) -> Self {
        self.field(column, FilterOp::Eq, Value::Null)
    }

    pub fn and(mut self, clauses: Vec<Where>) -> Self {
        self.conditions.push(Condition::And(clauses));
        self
    }

    pub fn or(mut self, clauses: Vec<Where>) -> Self {
        self.conditions.push(Condition::Or(clauses));
        self
    }

    pub fn not(mut self, clause: Where) -> Self {
        self.conditions.push(Condition::Not(Box::new(clause)));
        self
    }

    /// Parse a JSON WHERE object such as `{"status": {"eq": "Active"}, "$or": [...]}`
    pub fn from_json(where_data: &Value, max_depth: u32) -> Result<Self, FilterError> {
        Self::parse(where_data, 0, max_depth)
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    fn parse(where_data: &Value, depth: u32, max_depth: u32) -> Result<Self, FilterError> {
        if depth > max_depth {
            return Err(FilterError::MaxDepthExceeded { depth, max_depth });
        }
        Self::validate(where_data)?;

        let mut clause = Where::new();
        let Value::Object(obj) = where_data else {
            return Ok(clause);
        };

        for (key, value) in obj {
            if key.starts_with('$') {
                clause.conditions.push(Self::parse_logical_operator(key, value, depth, max_depth)?);
            } else {
                Self::parse_field_condition(&mut clause, key, value)?;
            }
        }
        Ok(clause)
    }

    fn parse_logical_operator(op: &str, value: &Value, depth: u32, max_depth: u32) -> Result<Condition, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let clauses = arr
                    .iter()
                    .map(|v| Self::parse(v, depth + 1, max_depth))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(if op == "$and" { Condition::And(clauses) } else { Condition::Or(clauses) })
            }
            "$not" => Ok(Condition::Not(Box::new(Self::parse(value, depth + 1, max_depth)?))),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(clause: &mut Where, field: &str, value: &Value) -> Result<(), FilterError> {
        if let Value::Object(obj) = value {
            for (op_key, op_val) in obj {
                let operator = FilterOp::parse(op_key)
                    .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                Self::validate_operator_data(operator, op_val)?;
                clause.conditions.push(Condition::Field {
                    column: field.to_string(),
                    operator,
                    data: op_val.clone(),
                });
            }
        } else {
            // Implicit equality: { field: value }
            clause.conditions.push(Condition::Field {
                column: field.to_string(),
                operator: FilterOp::Eq,
                data: value.clone(),
            });
        }
        Ok(())
    }

    fn validate_operator_data(operator: FilterOp, data: &Value) -> Result<(), FilterError> {
        match operator {
            FilterOp::Between => match data.as_array() {
                Some(values) if values.len() == 2 => Ok(()),
                _ => Err(FilterError::InvalidOperatorData("$between requires array with 2 values".to_string())),
            },
            FilterOp::Exists if !data.is_boolean() => {
                Err(FilterError::InvalidOperatorData("$exists requires a boolean".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Evaluate every condition against `item`
    pub fn matches(&self, item: &Value) -> bool {
        self.conditions.iter().all(|condition| Self::evaluate(condition, item))
    }

    fn evaluate(condition: &Condition, item: &Value) -> bool {
        match condition {
            Condition::And(clauses) => clauses.iter().all(|c| c.matches(item)),
            Condition::Or(clauses) => clauses.iter().any(|c| c.matches(item)),
            Condition::Not(clause) => !clause.matches(item),
            Condition::Field { column, operator, data } => {
                Self::evaluate_field(lookup(item, column), *operator, data)
            }
        }
    }

    fn evaluate_field(value: Option<&Value>, operator: FilterOp, data: &Value) -> bool {
        let present = value.filter(|v| !v.is_null());

        match operator {
            FilterOp::Eq => match present {
                None => data.is_null(),
                Some(v) => values_equal(v, data),
            },
            FilterOp::Ne => !Self::evaluate_field(value, FilterOp::Eq, data),
            FilterOp::Gt => Self::ordered(present, data, |o| o.is_gt()),
            FilterOp::Gte => Self::ordered(present, data, |o| o.is_ge()),
            FilterOp::Lt => Self::ordered(present, data, |o| o.is_lt()),
            FilterOp::Lte => Self::ordered(present, data, |o| o.is_le()),
            FilterOp::In => match data {
                Value::Array(values) => {
                    let v = present.unwrap_or(&Value::Null);
                    values.iter().any(|candidate| values_equal(v, candidate))
                }
                _ => false,
            },
            FilterOp::NIn => match data {
                Value::Array(values) => {
                    let v = present.unwrap_or(&Value::Null);
                    !values.iter().any(|candidate| values_equal(v, candidate))
                }
                _ => true,
            },
            FilterOp::Contains => match (present, data) {
                (Some(Value::String(s)), Value::String(needle)) => s.contains(needle.as_str()),
                (Some(Value::Array(values)), needle) => values.iter().any(|v| values_equal(v, needle)),
                _ => false,
            },
            FilterOp::StartsWith => Self::text_test(present, data, |s, needle| s.starts_with(needle)),
            FilterOp::EndsWith => Self::text_test(present, data, |s, needle| s.ends_with(needle)),
            FilterOp::Between => match data.as_array().map(Vec::as_slice) {
                Some([low, high]) => {
                    Self::ordered(present, low, |o| o.is_ge()) && Self::ordered(present, high, |o| o.is_le())
                }
                _ => false,
            },
            FilterOp::Exists => data.as_bool().map_or(false, |expected| present.is_some() == expected),
        }
    }

    fn ordered(value: Option<&Value>, data: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> bool {
        value.and_then(|v| compare_ordered(v, data)).map_or(false, test)
    }

    fn text_test(value: Option<&Value>, data: &Value, test: impl Fn(&str, &str) -> bool) -> bool {
        match (value.and_then(scalar_text), scalar_text(data)) {
            (Some(s), Some(needle)) => test(&s, &needle),
            _ => false,
        }
    }

    /// Render back to the JSON form accepted by `from_json`
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        let mut overflow: Vec<Value> = Vec::new();

        for condition in &self.conditions {
            let (key, value) = Self::condition_json(condition);
            if !map.contains_key(&key) {
                map.insert(key, value);
                continue;
            }
            match map.get_mut(&key) {
                Some(Value::Object(existing)) if !key.starts_with('$') => {
                    // Same column, different operator: merge into one operator object
                    let Value::Object(ops) = value else { continue };
                    for (op, data) in ops {
                        if existing.contains_key(&op) {
                            overflow.push(json!({ key.clone(): { op: data } }));
                        } else {
                            existing.insert(op, data);
                        }
                    }
                }
                _ => overflow.push(json!({ key: value })),
            }
        }

        if !overflow.is_empty() {
            match map.get_mut("$and") {
                Some(Value::Array(existing)) => existing.extend(overflow),
                _ => {
                    map.insert("$and".to_string(), Value::Array(overflow));
                }
            }
        }

        Value::Object(map)
    }

    fn condition_json(condition: &Condition) -> (String, Value) {
        match condition {
            Condition::Field { column, operator, data } => {
                (column.clone(), json!({ operator.as_str(): data.clone() }))
            }
            Condition::And(clauses) => {
                ("$and".to_string(), Value::Array(clauses.iter().map(Where::to_json).collect()))
            }
            Condition::Or(clauses) => {
                ("$or".to_string(), Value::Array(clauses.iter().map(Where::to_json).collect()))
            }
            Condition::Not(clause) => ("$not".to_string(), clause.to_json()),
        }
    }
}

impl Serialize for Where {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Where {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let max_depth = crate::config::config().filter.max_nested_depth;
        Where::from_json(&value, max_depth).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel() -> Value {
        json!({
            "id": "h1",
            "name": "Harbour View",
            "status": "Active",
            "stars": 4,
            "price": 120.5,
            "amenities": ["pool", "wifi"],
            "opened_at": "2019-06-01T00:00:00Z",
            "deleted_at": null,
            "location": { "city": "Porto" }
        })
    }

    #[test]
    fn operators_without_prefix_are_accepted() {
        let clause = Where::from_json(&json!({"status": {"eq": "Active"}, "stars": {"gte": 4}}), 5).unwrap();
        assert!(clause.matches(&hotel()));
    }

    #[test]
    fn implicit_equality_and_null_match() {
        let clause = Where::from_json(&json!({"status": "Active", "deleted_at": null}), 5).unwrap();
        assert!(clause.matches(&hotel()));

        let missing = Where::new().is_null("archived_at");
        assert!(missing.matches(&hotel()));
    }

    #[test]
    fn range_operators_reject_non_numeric_values() {
        assert!(!Where::new().gte("name", 3).matches(&hotel()));
        assert!(Where::new().lt("price", 121).matches(&hotel()));
        assert!(Where::new().gt("opened_at", "2019-01-01").matches(&hotel()));
    }

    #[test]
    fn membership_and_text_operators() {
        let item = hotel();
        assert!(Where::new().is_in("status", vec![json!("Active"), json!("Pending")]).matches(&item));
        assert!(Where::new().field("status", FilterOp::NIn, json!("Active")).matches(&item));
        assert!(Where::new().field("amenities", FilterOp::Contains, "pool").matches(&item));
        assert!(Where::new().field("name", FilterOp::StartsWith, "Harb").matches(&item));
        assert!(Where::new().field("stars", FilterOp::EndsWith, "4").matches(&item));
        assert!(!Where::new().field("deleted_at", FilterOp::StartsWith, "n").matches(&item));
    }

    #[test]
    fn logical_groups_and_nested_paths() {
        let clause = Where::from_json(
            &json!({
                "$or": [{"stars": {"$gt": 4}}, {"location.city": "Porto"}],
                "$not": {"status": "Inactive"}
            }),
            5,
        )
        .unwrap();
        assert!(clause.matches(&hotel()));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let nested = json!({"$and": [{"$and": [{"$and": [{"status": "Active"}]}]}]});
        assert!(matches!(
            Where::from_json(&nested, 2),
            Err(FilterError::MaxDepthExceeded { depth: 3, max_depth: 2 })
        ));
    }

    #[test]
    fn invalid_operators_are_rejected() {
        assert!(matches!(
            Where::from_json(&json!({"status": {"like": "A%"}}), 5),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            Where::from_json(&json!({"price": {"between": [1]}}), 5),
            Err(FilterError::InvalidOperatorData(_))
        ));
        assert!(Where::from_json(&json!(["status"]), 5).is_err());
    }

    #[test]
    fn json_form_parses_back_to_same_clause() {
        let clause = Where::new()
            .eq("status", "Active")
            .gte("stars", 3)
            .lte("stars", 5)
            .or(vec![Where::new().eq("featured", true)]);
        let parsed = Where::from_json(&clause.to_json(), 5).unwrap();
        assert_eq!(parsed.conditions().len(), 4);
        assert!(parsed.matches(&json!({"status": "Active", "stars": 4, "featured": true})));
        assert!(!parsed.matches(&json!({"status": "Active", "stars": 6, "featured": true})));
    }
}
