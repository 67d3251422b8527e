use serde::Serialize;
use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::Where;
use super::search::matches_search;
use super::types::{FilterOptions, FilterOrderInfo};

/// Compiled query: WHERE, then search, then order, then page
#[derive(Debug, Clone, Default)]
pub struct Filter {
    where_data: Where,
    search: Option<String>,
    search_fields: Option<Vec<String>>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<usize>,
    page: usize,
    max_limit: Option<usize>,
}

impl Filter {
    pub fn new() -> Self {
        Self { page: 1, ..Self::default() }
    }

    pub fn with_max_limit(max_limit: Option<usize>) -> Self {
        Self { max_limit, ..Self::new() }
    }

    pub fn assign(&mut self, options: &FilterOptions) -> Result<&mut Self, FilterError> {
        self.assign_query(options);
        if let Some(limit) = options.limit { self.limit(limit, options.page)?; }
        Ok(self)
    }

    /// WHERE, search and order from `options`; page and limit are ignored
    pub fn assign_query(&mut self, options: &FilterOptions) -> &mut Self {
        if let Some(where_clause) = &options.where_clause { self.where_clause(where_clause.clone()); }
        if let Some(query) = &options.search { self.search(query.clone(), options.search_fields.clone()); }
        if let Some(sort_by) = &options.sort_by {
            self.order(vec![FilterOrderInfo {
                column: sort_by.clone(),
                sort: options.sort_order.unwrap_or_default(),
            }]);
        }
        self
    }

    pub fn where_clause(&mut self, conditions: Where) -> &mut Self {
        self.where_data = conditions;
        self
    }

    pub fn search(&mut self, query: String, fields: Option<Vec<String>>) -> &mut Self {
        self.search = Some(query);
        self.search_fields = fields;
        self
    }

    pub fn order(&mut self, order: Vec<FilterOrderInfo>) -> &mut Self {
        self.order_data = order;
        self
    }

    pub fn limit(&mut self, limit: usize, page: Option<usize>) -> Result<&mut Self, FilterError> {
        if limit == 0 { return Err(FilterError::InvalidLimit("Limit must be positive".to_string())); }

        let applied_limit = match self.max_limit {
            Some(max_limit) if limit > max_limit => {
                if crate::config::CONFIG.filter.debug_logging {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max_limit);
                }
                max_limit
            }
            _ => limit,
        };

        self.limit = Some(applied_limit);
        self.page = page.unwrap_or(1).max(1);
        Ok(self)
    }

    /// Run the full pipeline over `items`, returning matches in result order
    pub fn apply<'a, T: Serialize>(&self, items: &'a [T]) -> Vec<&'a T> {
        let mut matched = self.matching(items);

        if !self.order_data.is_empty() {
            // stable: ties keep collection order
            matched.sort_by(|(a, _), (b, _)| FilterOrder::compare(&self.order_data, a, b));
        }

        let matched = matched.into_iter().map(|(_, item)| item);
        match self.limit {
            Some(limit) => match (self.page - 1).checked_mul(limit) {
                Some(offset) => matched.skip(offset).take(limit).collect(),
                // offset past any addressable item
                None => Vec::new(),
            },
            None => matched.collect(),
        }
    }

    /// Number of items passing WHERE and search, ignoring pagination
    pub fn count<T: Serialize>(&self, items: &[T]) -> usize {
        self.matching(items).len()
    }

    fn matching<'a, T: Serialize>(&self, items: &'a [T]) -> Vec<(Value, &'a T)> {
        items
            .iter()
            .filter_map(|item| match serde_json::to_value(item) {
                Ok(value) => Some((value, item)),
                Err(e) => {
                    tracing::warn!("Skipping item that failed to serialize for filtering: {}", e);
                    None
                }
            })
            .filter(|(value, _)| self.where_data.matches(value))
            .filter(|(value, _)| match &self.search {
                Some(query) => matches_search(value, query, self.search_fields.as_deref()),
                None => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SortDirection;
    use serde_json::json;

    fn rows() -> Vec<Value> {
        (1..=7)
            .map(|i| json!({"id": format!("r{}", i), "rank": i, "even": i % 2 == 0}))
            .collect()
    }

    #[test]
    fn pipeline_filters_sorts_and_pages() {
        let options = FilterOptions::new()
            .with_where(Where::new().eq("even", false))
            .sorted_by("rank", SortDirection::Desc)
            .with_limit(2)
            .with_page(2);
        let mut filter = Filter::new();
        filter.assign(&options).unwrap();

        let items = rows();
        let page: Vec<_> = filter.apply(&items).into_iter().map(|v| v["rank"].clone()).collect();
        assert_eq!(page, vec![json!(3), json!(1)]);
        assert_eq!(filter.count(&items), 4);
    }

    #[test]
    fn limit_is_capped_and_zero_rejected() {
        let mut filter = Filter::with_max_limit(Some(3));
        filter.limit(50, None).unwrap();
        assert_eq!(filter.apply(&rows()).len(), 3);

        assert!(matches!(Filter::new().limit(0, None), Err(FilterError::InvalidLimit(_))));
    }

    #[test]
    fn page_past_end_is_empty() {
        let mut filter = Filter::new();
        filter.limit(5, Some(3)).unwrap();
        assert!(filter.apply(&rows()).is_empty());
    }

    #[test]
    fn huge_page_number_is_empty() {
        let mut filter = Filter::new();
        filter.limit(10, Some(usize::MAX)).unwrap();
        assert!(filter.apply(&rows()).is_empty());
    }
}
