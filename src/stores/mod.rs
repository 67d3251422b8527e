// Per-entity stores layered over the generic `Store`

// Newtype over Store<$entity> with Deref access and persisted defaults
macro_rules! entity_store {
    ($name:ident, $entity:ty) => {
        pub struct $name {
            store: $crate::store::Store<$entity>,
        }

        impl $name {
            pub fn new(options: $crate::store::StoreOptions<$entity>) -> Self {
                Self { store: $crate::store::Store::new(options) }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new($crate::store::StoreOptions::for_entity().persist(true))
            }
        }

        impl std::ops::Deref for $name {
            type Target = $crate::store::Store<$entity>;

            fn deref(&self) -> &Self::Target {
                &self.store
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.store
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

pub use account::AccountStore;
pub use calendar::CalendarStore;
pub use expense::ExpenseStore;
pub use hotel::HotelStore;
pub use listing::ListingStore;
pub use location::{calculate_distance, LocationStore};
pub use notification::NotificationStore;
pub use reservation::{ReservationFilters, ReservationStats, ReservationStore};
pub use task::TaskStore;
