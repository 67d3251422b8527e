use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::filter::FilterOptions;

/// Pagination metadata, usually mirrored from a server response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreMeta {
    pub total: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl Default for StoreMeta {
    fn default() -> Self {
        Self { total: 0, total_pages: 0, current_page: 1 }
    }
}

/// Partial update for `Store::set_meta`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreMetaPatch {
    pub total: Option<usize>,
    pub total_pages: Option<usize>,
    pub current_page: Option<usize>,
}

#[derive(Debug)]
pub struct StoreState<T> {
    pub data: Option<T>,
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<StoreError>,
    pub last_updated: Option<DateTime<Utc>>,
    pub filters: FilterOptions,
    pub selected_ids: Vec<String>,
    pub meta: StoreMeta,
}

impl<T> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            data: None,
            items: Vec::new(),
            is_loading: false,
            error: None,
            last_updated: None,
            filters: FilterOptions::default(),
            selected_ids: Vec::new(),
            meta: StoreMeta::default(),
        }
    }
}
