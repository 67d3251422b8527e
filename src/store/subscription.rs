use std::collections::HashMap;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::filter::FilterOptions;
use crate::models::Entity;

/// Receiver side of a store subscription; always holds the latest value
#[derive(Debug)]
pub struct Subscription<V> {
    receiver: watch::Receiver<V>,
}

impl<V: Clone> Subscription<V> {
    pub fn current(&self) -> V {
        self.receiver.borrow().clone()
    }

    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next change and return the new value
    pub async fn changed(&mut self) -> Result<V, StoreError> {
        self.receiver
            .changed()
            .await
            .map_err(|_| StoreError::message("store was dropped"))?;
        Ok(self.receiver.borrow_and_update().clone())
    }

    pub fn unsubscribe(self) {}
}

pub(crate) struct Subscriptions<T> {
    items: watch::Sender<Vec<T>>,
    filters: watch::Sender<FilterOptions>,
    per_item: HashMap<String, watch::Sender<Option<T>>>,
}

impl<T: Entity> Subscriptions<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: watch::channel(Vec::new()).0,
            filters: watch::channel(FilterOptions::default()).0,
            per_item: HashMap::new(),
        }
    }

    pub(crate) fn items(&self, current: &[T]) -> Subscription<Vec<T>> {
        self.items.send_replace(current.to_vec());
        Subscription { receiver: self.items.subscribe() }
    }

    pub(crate) fn item(&mut self, id: &str, current: Option<T>) -> Subscription<Option<T>> {
        let sender = self
            .per_item
            .entry(id.to_string())
            .or_insert_with(|| watch::channel(None).0);
        sender.send_replace(current);
        Subscription { receiver: sender.subscribe() }
    }

    pub(crate) fn filters(&self, current: &FilterOptions) -> Subscription<FilterOptions> {
        self.filters.send_replace(current.clone());
        Subscription { receiver: self.filters.subscribe() }
    }

    /// Push the collection to item subscribers, notifying only on real changes
    pub(crate) fn publish_items(&mut self, items: &[T]) {
        if self.items.receiver_count() > 0 {
            self.items.send_if_modified(|current| {
                if current.as_slice() == items {
                    return false;
                }
                *current = items.to_vec();
                true
            });
        }

        self.per_item.retain(|_, sender| sender.receiver_count() > 0);
        for (id, sender) in &self.per_item {
            let next = items.iter().find(|item| item.id() == id).cloned();
            sender.send_if_modified(|current| {
                if *current == next {
                    return false;
                }
                *current = next;
                true
            });
        }
    }

    pub(crate) fn publish_filters(&self, filters: &FilterOptions) {
        if self.filters.receiver_count() == 0 {
            return;
        }
        self.filters.send_if_modified(|current| {
            if current == filters {
                return false;
            }
            *current = filters.clone();
            true
        });
    }
}
