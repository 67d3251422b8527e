// Generic in-memory entity store

pub mod cache;
pub mod observer;
pub mod options;
pub mod persist;
pub mod state;
pub mod subscription;
pub mod transform;

pub use cache::TtlCache;
pub use observer::{ChangeEvent, StoreObserver, TracingObserver};
pub use options::{CacheConfig, LogLevel, LoggingOptions, StoreOptions};
pub use persist::{storage_key, FileStorage, MemoryStorage, PersistedBody, PersistedState, Storage};
pub use state::{StoreMeta, StoreMetaPatch, StoreState};
pub use subscription::Subscription;
pub use transform::{JsonTransformer, Transformer};

use chrono::Utc;
use serde_json::{Map, Value};
use std::future::Future;

use crate::error::StoreError;
use crate::filter::{Filter, FilterOptions, SortDirection, Where};
use crate::models::Entity;
use crate::types::Operation;
use subscription::Subscriptions;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

// Store events are gated by the store's own LoggingOptions
macro_rules! store_log {
    ($store:expr, error, $($arg:tt)+) => {
        if $store.options.logging.allows(LogLevel::Error) {
            tracing::error!(store = %$store.options.name, $($arg)+);
        }
    };
    ($store:expr, warn, $($arg:tt)+) => {
        if $store.options.logging.allows(LogLevel::Warn) {
            tracing::warn!(store = %$store.options.name, $($arg)+);
        }
    };
    ($store:expr, info, $($arg:tt)+) => {
        if $store.options.logging.allows(LogLevel::Info) {
            tracing::info!(store = %$store.options.name, $($arg)+);
        }
    };
    ($store:expr, debug, $($arg:tt)+) => {
        if $store.options.logging.allows(LogLevel::Debug) {
            tracing::debug!(store = %$store.options.name, $($arg)+);
        }
    };
}

/// Typed in-memory store for one entity kind
///
/// Holds the collection, a "current" item, selection, filters, pagination
/// metadata and a TTL cache. Mutations notify subscribers and observers.
/// The store never rejects an entity; the server stays the source of truth.
pub struct Store<T: Entity> {
    options: StoreOptions<T>,
    state: StoreState<T>,
    cache: TtlCache<T>,
    subscriptions: Subscriptions<T>,
    dirty: bool,
}

impl<T: Entity> Store<T> {
    /// Debug-level store logging also registers a `TracingObserver` ahead of any others
    pub fn new(mut options: StoreOptions<T>) -> Self {
        if options.logging.allows(LogLevel::Debug) {
            options.observers.insert(0, Box::new(TracingObserver));
        }
        let cache = TtlCache::new(&options.cache);
        Self {
            options,
            state: StoreState::default(),
            cache,
            subscriptions: Subscriptions::new(),
            dirty: false,
        }
    }

    /// Store with configured defaults, named after the entity
    pub fn for_entity() -> Self {
        Self::new(StoreOptions::for_entity())
    }

    // ---- accessors ----

    pub fn name(&self) -> &str {
        &self.options.name
    }

    pub fn options(&self) -> &StoreOptions<T> {
        &self.options
    }

    pub fn state(&self) -> &StoreState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn error(&self) -> Option<&StoreError> {
        self.state.error.as_ref()
    }

    pub fn last_updated(&self) -> Option<chrono::DateTime<Utc>> {
        self.state.last_updated
    }

    pub fn filters(&self) -> &FilterOptions {
        &self.state.filters
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.state.selected_ids
    }

    pub fn meta(&self) -> StoreMeta {
        self.state.meta
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Whether anything changed since the last save or load
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ---- single item ----

    pub fn set_item(&mut self, item: T) {
        store_log!(self, debug, id = item.id(), "Setting item");
        let id = item.id().to_string();
        self.state.data = Some(item);
        self.touch();
        self.changed(Operation::SetItem, vec![id]);
    }

    /// Apply `update` to the collection item and the current item with this id.
    /// Returns false when neither holds the id.
    pub fn update_item(&mut self, id: &str, mut update: impl FnMut(&mut T)) -> bool {
        store_log!(self, debug, id, "Updating item");
        let now = Utc::now();
        let mut found = false;

        if let Some(item) = self.state.items.iter_mut().find(|item| item.id() == id) {
            update(item);
            item.set_updated_at(now);
            found = true;
        }
        if let Some(data) = self.state.data.as_mut().filter(|data| data.id() == id) {
            update(data);
            data.set_updated_at(now);
            found = true;
        }

        self.cache.remove(id);
        if found {
            self.touch();
            self.changed(Operation::UpdateItem, vec![id.to_string()]);
        }
        found
    }

    /// Shallow JSON merge of `patch` into the item with this id
    pub fn patch_item(&mut self, id: &str, patch: &Value) -> Result<bool, StoreError> {
        let fields = patch_fields(id, patch)?;
        let now = Utc::now();

        let patched_item = match self.state.items.iter().position(|item| item.id() == id) {
            Some(index) => Some((index, apply_patch(id, &self.state.items[index], fields)?)),
            None => None,
        };
        let patched_data = match self.state.data.as_ref().filter(|data| data.id() == id) {
            Some(data) => Some(apply_patch(id, data, fields)?),
            None => None,
        };

        let found = patched_item.is_some() || patched_data.is_some();
        if let Some((index, mut item)) = patched_item {
            item.set_updated_at(now);
            self.state.items[index] = item;
        }
        if let Some(mut data) = patched_data {
            data.set_updated_at(now);
            self.state.data = Some(data);
        }

        self.cache.remove(id);
        if found {
            store_log!(self, debug, id, "Patched item");
            self.touch();
            self.changed(Operation::UpdateItem, vec![id.to_string()]);
        }
        Ok(found)
    }

    pub fn clear_item(&mut self) {
        store_log!(self, debug, "Clearing current item");
        self.state.data = None;
        self.changed(Operation::ClearItem, Vec::new());
    }

    // ---- bulk ----

    /// Replace the collection and recompute pagination metadata
    pub fn set_items(&mut self, items: Vec<T>) {
        store_log!(self, debug, count = items.len(), "Setting items");
        let ids = collect_ids(&items);
        let limit = self.state.filters.limit.unwrap_or(1).max(1);

        self.state.meta = StoreMeta {
            total: items.len(),
            total_pages: items.len().div_ceil(limit),
            current_page: self.state.filters.page.unwrap_or(1),
        };
        self.state.items = items;
        self.touch();
        self.changed(Operation::SetItems, ids);
    }

    pub fn add_item(&mut self, item: T) {
        self.add_items(vec![item]);
    }

    /// Append items, stamping `created_at` on those without one
    pub fn add_items(&mut self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        store_log!(self, debug, count = items.len(), "Adding items");
        let now = Utc::now();
        let ids = collect_ids(&items);

        self.state.items.extend(items.into_iter().map(|mut item| {
            if item.created_at().is_none() {
                item.set_created_at(now);
            }
            item
        }));
        self.touch();
        self.changed(Operation::AddItems, ids);
    }

    pub fn remove_item(&mut self, id: &str) {
        self.remove_items(&[id]);
    }

    /// Drop items from the collection, the current item, the selection and the cache
    pub fn remove_items<S: AsRef<str>>(&mut self, ids: &[S]) {
        let ids: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
        store_log!(self, debug, count = ids.len(), "Removing items");

        self.state.items.retain(|item| !ids.iter().any(|id| id == item.id()));
        if self.state.data.as_ref().is_some_and(|data| ids.iter().any(|id| id == data.id())) {
            self.state.data = None;
        }
        self.state.selected_ids.retain(|selected| !ids.contains(selected));
        for id in &ids {
            self.cache.remove(id);
        }

        self.touch();
        self.changed(Operation::RemoveItems, ids);
    }

    /// Apply many `(id, update)` pairs in one notification; returns how many matched
    pub fn batch_update<I, F>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = (String, F)>,
        F: FnOnce(&mut T),
    {
        let now = Utc::now();
        let mut ids = Vec::new();

        for (id, update) in updates {
            if let Some(item) = self.state.items.iter_mut().find(|item| item.id() == id) {
                update(item);
                item.set_updated_at(now);
                self.cache.remove(&id);
                ids.push(id);
            }
        }

        store_log!(self, debug, count = ids.len(), "Batch update");
        if !ids.is_empty() {
            self.touch();
            self.changed(Operation::BatchUpdate, ids.clone());
        }
        ids.len()
    }

    /// JSON form of `batch_update`; nothing is applied if any patch fails
    pub fn batch_patch(&mut self, patches: Vec<(String, Value)>) -> Result<usize, StoreError> {
        let mut staged = Vec::with_capacity(patches.len());
        for (id, patch) in &patches {
            let fields = patch_fields(id, patch)?;
            if let Some(index) = self.state.items.iter().position(|item| item.id() == id.as_str()) {
                staged.push((index, apply_patch(id, &self.state.items[index], fields)?));
            }
        }

        let now = Utc::now();
        let mut ids = Vec::with_capacity(staged.len());
        for (index, mut item) in staged {
            item.set_updated_at(now);
            self.cache.remove(item.id());
            ids.push(item.id().to_string());
            self.state.items[index] = item;
        }

        if !ids.is_empty() {
            self.touch();
            self.changed(Operation::BatchUpdate, ids.clone());
        }
        Ok(ids.len())
    }

    // ---- selection ----

    pub fn select_item(&mut self, id: &str) {
        if !self.state.selected_ids.iter().any(|selected| selected == id) {
            self.state.selected_ids.push(id.to_string());
        }
    }

    pub fn deselect_item(&mut self, id: &str) {
        self.state.selected_ids.retain(|selected| selected != id);
    }

    pub fn select_all(&mut self) {
        self.state.selected_ids = collect_ids(&self.state.items);
    }

    pub fn deselect_all(&mut self) {
        self.state.selected_ids.clear();
    }

    /// Selected items present in the collection, in collection order
    pub fn get_selected(&self) -> Vec<&T> {
        self.state
            .items
            .iter()
            .filter(|item| self.state.selected_ids.iter().any(|id| id == item.id()))
            .collect()
    }

    // ---- status ----

    pub fn set_loading(&mut self, is_loading: bool) {
        self.state.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<StoreError>) {
        if let Some(error) = &error {
            store_log!(self, error, code = error.error_code(), "Store error: {}", error);
            self.report(error);
        }
        self.state.error = error;
    }

    /// Back to the initial state; subscriptions and observers stay attached
    pub fn reset_state(&mut self) {
        store_log!(self, info, "Resetting state");
        self.state = StoreState::default();
        self.cache.clear();
        self.changed(Operation::Reset, Vec::new());
        self.subscriptions.publish_filters(&self.state.filters);
    }

    // ---- filters ----

    pub fn set_filters(&mut self, filters: FilterOptions) {
        store_log!(self, debug, "Setting filters");
        self.state.filters.merge(filters);
        self.dirty = true;
        self.subscriptions.publish_filters(&self.state.filters);
    }

    pub fn clear_filters(&mut self) {
        self.state.filters = FilterOptions::default();
        self.dirty = true;
        self.subscriptions.publish_filters(&self.state.filters);
    }

    // ---- cache ----

    pub fn set_cached(&mut self, id: &str, item: T) {
        if let Some(evicted) = self.cache.insert(id, item) {
            store_log!(self, debug, id = %evicted, "Evicted oldest cache entry");
        }
    }

    pub fn get_cached(&mut self, id: &str) -> Option<T> {
        self.cache.get(id)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    // ---- pagination ----

    /// Move to `page` (0 counts as 1). The page also lands in the store's
    /// filters so `get_page` and filter subscribers follow it.
    pub fn set_page(&mut self, page: usize) {
        let page = page.max(1);
        self.state.filters.page = Some(page);
        self.state.meta.current_page = page;
        self.subscriptions.publish_filters(&self.state.filters);
    }

    /// Change the page size; the current page resets to 1
    pub fn set_limit(&mut self, limit: usize) -> Result<(), StoreError> {
        if limit == 0 {
            return Err(StoreError::InvalidLimit("Limit must be positive".to_string()));
        }
        self.state.filters.limit = Some(limit);
        self.state.filters.page = Some(1);
        self.state.meta.current_page = 1;
        self.state.meta.total_pages = self.state.meta.total.div_ceil(limit);
        self.subscriptions.publish_filters(&self.state.filters);
        Ok(())
    }

    pub fn set_meta(&mut self, patch: StoreMetaPatch) {
        if let Some(total) = patch.total { self.state.meta.total = total; }
        if let Some(total_pages) = patch.total_pages { self.state.meta.total_pages = total_pages; }
        if let Some(current_page) = patch.current_page { self.state.meta.current_page = current_page; }
    }

    // ---- advanced ----

    /// Apply `apply` right away, then await `operation`. On failure the
    /// previous collection is restored and the error reported. An unknown
    /// id notifies nobody; `operation` still runs.
    pub async fn optimistic_update<F, R, E>(
        &mut self,
        id: &str,
        mut apply: impl FnMut(&mut T),
        operation: F,
    ) -> Result<R, StoreError>
    where
        F: Future<Output = Result<R, E>>,
        E: Into<BoxError>,
    {
        let previous = self.state.items.clone();
        let applied = match self.state.items.iter_mut().find(|item| item.id() == id) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        };
        if applied {
            self.changed(Operation::UpdateItem, vec![id.to_string()]);
        }

        match operation.await {
            Ok(result) => {
                if applied {
                    self.touch();
                }
                Ok(result)
            }
            Err(e) => {
                let error = StoreError::operation(e);
                store_log!(self, error, id, "Optimistic update failed, rolling back: {}", error);
                if applied {
                    self.state.items = previous;
                    self.changed(Operation::Rollback, vec![id.to_string()]);
                }
                self.report(&error);
                Err(error)
            }
        }
    }

    /// Run `operations` against the store; the collection is restored if it fails
    pub fn transaction<E>(
        &mut self,
        operations: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), StoreError>
    where
        E: Into<BoxError>,
    {
        let snapshot = self.state.items.clone();
        match operations(self) {
            Ok(()) => {
                self.touch();
                Ok(())
            }
            Err(e) => {
                let error = StoreError::operation(e);
                store_log!(self, error, "Transaction failed, rolling back: {}", error);
                self.state.items = snapshot;
                self.changed(Operation::Rollback, Vec::new());
                self.report(&error);
                Err(error)
            }
        }
    }

    // ---- queries ----

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.state.items.iter().find(|item| item.id() == id)
    }

    pub fn get_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<&T> {
        self.state
            .items
            .iter()
            .filter(|item| ids.iter().any(|id| id.as_ref() == item.id()))
            .collect()
    }

    /// Items without a `deleted_at` marker
    pub fn active_items(&self) -> Vec<&T> {
        self.state.items.iter().filter(|item| item.is_active()).collect()
    }

    /// Items matching `where_clause`, in collection order
    pub fn find(&self, where_clause: Where) -> Vec<&T> {
        let mut filter = Filter::new();
        filter.where_clause(where_clause);
        filter.apply(&self.state.items)
    }

    /// The store's own filters, ignoring pagination
    pub fn get_filtered(&self) -> Vec<&T> {
        let mut filter = Filter::with_max_limit(self.options.max_limit);
        filter.assign_query(&self.state.filters);
        filter.apply(&self.state.items)
    }

    /// The store's own filters, including page and limit
    pub fn get_page(&self) -> Result<Vec<&T>, StoreError> {
        self.advanced_filter(&self.state.filters)
    }

    pub fn get_sorted(&self, field: &str, direction: SortDirection) -> Vec<&T> {
        let mut filter = Filter::new();
        filter.assign_query(&FilterOptions::new().sorted_by(field, direction));
        filter.apply(&self.state.items)
    }

    /// Case-insensitive search over `fields`, or every top-level field
    pub fn search(&self, query: &str, fields: Option<&[&str]>) -> Vec<&T> {
        let fields = fields.map(|fields| fields.iter().map(|f| f.to_string()).collect());
        let mut filter = Filter::new();
        filter.search(query.to_string(), fields);
        filter.apply(&self.state.items)
    }

    /// where, then search, then sort, then paginate
    pub fn advanced_filter(&self, options: &FilterOptions) -> Result<Vec<&T>, StoreError> {
        let mut filter = Filter::with_max_limit(self.options.max_limit);
        filter.assign(options)?;
        Ok(filter.apply(&self.state.items))
    }

    /// Matches for `options`, ignoring pagination
    pub fn count(&self, options: &FilterOptions) -> usize {
        let mut filter = Filter::new();
        filter.assign_query(options);
        filter.count(&self.state.items)
    }

    // ---- subscriptions ----

    pub fn on_item_change(&mut self, id: &str) -> Subscription<Option<T>> {
        let current = self.get_by_id(id).cloned();
        self.subscriptions.item(id, current)
    }

    pub fn on_items_change(&mut self) -> Subscription<Vec<T>> {
        self.subscriptions.items(&self.state.items)
    }

    pub fn on_filter_change(&mut self) -> Subscription<FilterOptions> {
        self.subscriptions.filters(&self.state.filters)
    }

    // ---- persistence ----

    /// Write items and filters to `storage`; a no-op unless persistence is on
    pub async fn save(&mut self, storage: &dyn Storage) -> Result<(), StoreError> {
        if !self.options.persist {
            return Ok(());
        }

        let items = self
            .state
            .items
            .iter()
            .map(|item| self.options.transformer.serialize(item))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::serialization(&self.options.name, e))?;

        let envelope = PersistedState {
            version: self.options.version,
            state: PersistedBody { items, filters: self.state.filters.clone() },
        };
        let key = storage_key(&self.options.name);
        storage.set_item(&key, &serde_json::to_value(&envelope)?).await?;

        store_log!(self, debug, key = %key, count = self.state.items.len(), "Saved state");
        self.dirty = false;
        Ok(())
    }

    pub async fn save_if_dirty(&mut self, storage: &dyn Storage) -> Result<bool, StoreError> {
        if !self.dirty || !self.options.persist {
            return Ok(false);
        }
        self.save(storage).await?;
        Ok(true)
    }

    /// Hydrate items and filters from `storage`. Returns false when persistence
    /// is off, nothing is stored, or the stored version differs.
    pub async fn load(&mut self, storage: &dyn Storage) -> Result<bool, StoreError> {
        if !self.options.persist {
            return Ok(false);
        }

        let key = storage_key(&self.options.name);
        let Some(raw) = storage.get_item(&key).await? else {
            return Ok(false);
        };

        let persisted: PersistedState = serde_json::from_value(raw)
            .map_err(|e| StoreError::serialization(&self.options.name, e))?;
        if persisted.version != self.options.version {
            store_log!(
                self,
                warn,
                stored = persisted.version,
                expected = self.options.version,
                "Discarding persisted state with mismatched version"
            );
            return Ok(false);
        }

        let mut items = Vec::with_capacity(persisted.state.items.len());
        for (index, raw_item) in persisted.state.items.into_iter().enumerate() {
            let item = self.options.transformer.deserialize(raw_item).map_err(|e| {
                StoreError::serialization(&self.options.name, format!("item {}: {}", index, e))
            })?;
            items.push(item);
        }

        store_log!(self, info, key = %key, count = items.len(), "Loaded state");
        let ids = collect_ids(&items);
        self.state.items = items;
        self.state.filters = persisted.state.filters;
        self.changed(Operation::Hydrate, ids);
        self.subscriptions.publish_filters(&self.state.filters);
        self.dirty = false;
        Ok(true)
    }

    /// Delete the persisted snapshot
    pub async fn purge(&mut self, storage: &dyn Storage) -> Result<(), StoreError> {
        if !self.options.persist {
            return Ok(());
        }
        storage.remove_item(&storage_key(&self.options.name)).await
    }

    // ---- internals ----

    fn touch(&mut self) {
        self.state.last_updated = Some(Utc::now());
    }

    fn report(&self, error: &StoreError) {
        if let Some(on_error) = &self.options.on_error {
            on_error(error);
        }
    }

    fn changed(&mut self, operation: Operation, ids: Vec<String>) {
        self.dirty = true;
        self.subscriptions.publish_items(&self.state.items);

        let event = ChangeEvent { store: &self.options.name, operation, ids: &ids };
        for observer in &self.options.observers {
            if observer.applies_to_operation(operation) {
                observer.on_change(&event, &self.state.items);
            }
        }
    }
}

impl<T: Entity> Default for Store<T> {
    fn default() -> Self {
        Self::for_entity()
    }
}

fn collect_ids<T: Entity>(items: &[T]) -> Vec<String> {
    items.iter().map(|item| item.id().to_string()).collect()
}

fn patch_fields<'a>(id: &str, patch: &'a Value) -> Result<&'a Map<String, Value>, StoreError> {
    patch.as_object().ok_or_else(|| StoreError::InvalidPatch {
        id: id.to_string(),
        message: "patch must be a JSON object".to_string(),
    })
}

fn apply_patch<T: Entity>(id: &str, item: &T, fields: &Map<String, Value>) -> Result<T, StoreError> {
    let invalid = |e: serde_json::Error| StoreError::InvalidPatch { id: id.to_string(), message: e.to_string() };

    let mut value = serde_json::to_value(item).map_err(invalid)?;
    if let Value::Object(object) = &mut value {
        for (key, field) in fields {
            object.insert(key.clone(), field.clone());
        }
    }
    serde_json::from_value(value).map_err(invalid)
}
