use serde::{Deserialize, Serialize};

use super::filter_where::Where;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "$eq")] Eq,
    #[serde(rename = "$ne")] Ne,
    #[serde(rename = "$gt")] Gt,
    #[serde(rename = "$gte")] Gte,
    #[serde(rename = "$lt")] Lt,
    #[serde(rename = "$lte")] Lte,

    #[serde(rename = "$in")] In,
    #[serde(rename = "$nin")] NIn,

    #[serde(rename = "$contains")] Contains,
    #[serde(rename = "$startsWith")] StartsWith,
    #[serde(rename = "$endsWith")] EndsWith,

    #[serde(rename = "$between")] Between,
    #[serde(rename = "$exists")] Exists,
}

impl FilterOp {
    /// Parse an operator key; the `$` prefix is optional
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.strip_prefix('$').unwrap_or(key);
        Some(match key {
            "eq" => FilterOp::Eq,
            "ne" | "neq" => FilterOp::Ne,
            "gt" => FilterOp::Gt,
            "gte" => FilterOp::Gte,
            "lt" => FilterOp::Lt,
            "lte" => FilterOp::Lte,
            "in" => FilterOp::In,
            "nin" => FilterOp::NIn,
            "contains" => FilterOp::Contains,
            "startsWith" => FilterOp::StartsWith,
            "endsWith" => FilterOp::EndsWith,
            "between" => FilterOp::Between,
            "exists" => FilterOp::Exists,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::Ne => "$ne",
            FilterOp::Gt => "$gt",
            FilterOp::Gte => "$gte",
            FilterOp::Lt => "$lt",
            FilterOp::Lte => "$lte",
            FilterOp::In => "$in",
            FilterOp::NIn => "$nin",
            FilterOp::Contains => "$contains",
            FilterOp::StartsWith => "$startsWith",
            FilterOp::EndsWith => "$endsWith",
            FilterOp::Between => "$between",
            FilterOp::Exists => "$exists",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Query options held by a store and accepted by `advanced_filter`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<Vec<String>>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<Where>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_where(mut self, where_clause: Where) -> Self {
        self.where_clause = Some(where_clause);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sorted_by(mut self, field: impl Into<String>, order: SortDirection) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = Some(order);
        self
    }

    pub fn with_search(mut self, query: impl Into<String>, fields: Option<Vec<String>>) -> Self {
        self.search = Some(query.into());
        self.search_fields = fields;
        self
    }

    /// Overlay every field that is set in `other`
    pub fn merge(&mut self, other: FilterOptions) {
        if other.page.is_some() { self.page = other.page; }
        if other.limit.is_some() { self.limit = other.limit; }
        if other.sort_by.is_some() { self.sort_by = other.sort_by; }
        if other.sort_order.is_some() { self.sort_order = other.sort_order; }
        if other.search.is_some() { self.search = other.search; }
        if other.search_fields.is_some() { self.search_fields = other.search_fields; }
        if other.where_clause.is_some() { self.where_clause = other.where_clause; }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_keys_accept_both_spellings() {
        assert_eq!(FilterOp::parse("eq"), Some(FilterOp::Eq));
        assert_eq!(FilterOp::parse("$gte"), Some(FilterOp::Gte));
        assert_eq!(FilterOp::parse("startsWith"), Some(FilterOp::StartsWith));
        assert_eq!(FilterOp::parse("$neq"), Some(FilterOp::Ne));
        assert_eq!(FilterOp::parse("like"), None);
    }

    #[test]
    fn merge_only_overrides_set_fields() {
        let mut base = FilterOptions::new().with_page(2).with_limit(10);
        base.merge(FilterOptions::new().with_limit(25));
        assert_eq!(base.page, Some(2));
        assert_eq!(base.limit, Some(25));
    }
}
