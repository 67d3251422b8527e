// Domain records held by the entity stores

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that can live in a `Store`
///
/// Ids come from the server (UUID or CUID) and are never generated here.
/// `deleted_at` is a soft-delete marker: such records stay in the collection
/// but are not active.
pub trait Entity: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Store name used for persistence keys and log events
    const STORE_NAME: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn updated_at(&self) -> Option<DateTime<Utc>>;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_created_at(&mut self, at: DateTime<Utc>);
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    fn is_active(&self) -> bool {
        self.deleted_at().is_none()
    }
}

// Implements Entity for structs with `id` and the three audit timestamp fields
macro_rules! impl_entity {
    ($ty:ty, $store:literal) => {
        impl $crate::models::Entity for $ty {
            const STORE_NAME: &'static str = $store;

            fn id(&self) -> &str {
                &self.id
            }

            fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.created_at
            }

            fn updated_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.updated_at
            }

            fn deleted_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.deleted_at
            }

            fn set_created_at(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.created_at = Some(at);
            }

            fn set_updated_at(&mut self, at: chrono::DateTime<chrono::Utc>) {
                self.updated_at = Some(at);
            }
        }
    };
}

pub mod account;
pub mod calendar;
pub mod expense;
pub mod hotel;
pub mod listing;
pub mod location;
pub mod notification;
pub mod reservation;
pub mod task;

pub use account::*;
pub use calendar::*;
pub use expense::*;
pub use hotel::*;
pub use listing::*;
pub use location::*;
pub use notification::*;
pub use reservation::*;
pub use task::*;
