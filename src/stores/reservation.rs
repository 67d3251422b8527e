use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::models::{Entity, Payment, PaymentStatus, Reservation, ReservationStatus, Review};
use crate::store::{Store, StoreOptions};

/// Typed reservation filters, kept beside the generic `FilterOptions`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationFilters {
    pub status: Option<ReservationStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub property_id: Option<String>,
    pub user_id: Option<String>,
    pub guest_id: Option<String>,
}

impl ReservationFilters {
    pub fn merge(&mut self, other: ReservationFilters) {
        if other.status.is_some() { self.status = other.status; }
        if other.payment_status.is_some() { self.payment_status = other.payment_status; }
        if other.date_range.is_some() { self.date_range = other.date_range; }
        if other.property_id.is_some() { self.property_id = other.property_id; }
        if other.user_id.is_some() { self.user_id = other.user_id; }
        if other.guest_id.is_some() { self.guest_id = other.guest_id; }
    }

    pub fn matches(&self, r: &Reservation) -> bool {
        if self.status.is_some_and(|status| r.status != status) {
            return false;
        }
        if self.payment_status.is_some_and(|status| r.payment_status != status) {
            return false;
        }
        if self.property_id.as_ref().is_some_and(|id| r.property_id.as_ref() != Some(id)) {
            return false;
        }
        if self.user_id.as_ref().is_some_and(|id| &r.user_id != id) {
            return false;
        }
        if self.guest_id.as_ref().is_some_and(|id| r.guest_id.as_ref() != Some(id)) {
            return false;
        }
        match self.date_range {
            Some((start, end)) => r.check_in_date >= start && r.check_out_date <= end,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub cancelled: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub average_rating: f64,
}

pub struct ReservationStore {
    store: Store<Reservation>,
    filters: ReservationFilters,
}

impl ReservationStore {
    pub fn new(options: StoreOptions<Reservation>) -> Self {
        Self { store: Store::new(options), filters: ReservationFilters::default() }
    }

    pub fn reservation_filters(&self) -> &ReservationFilters {
        &self.filters
    }

    pub fn set_reservation_filters(&mut self, filters: ReservationFilters) {
        self.filters.merge(filters);
    }

    pub fn clear_reservation_filters(&mut self) {
        self.filters = ReservationFilters::default();
    }

    pub fn filtered_reservations(&self) -> Vec<&Reservation> {
        self.items().iter().filter(|r| self.filters.matches(r)).collect()
    }

    /// Live, not yet checked out and not cancelled at `now`
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Reservation> {
        self.items()
            .iter()
            .filter(|r| r.is_active() && r.check_out_date > now && r.status != ReservationStatus::Cancelled)
            .collect()
    }

    pub fn completed(&self, now: DateTime<Utc>) -> Vec<&Reservation> {
        self.items()
            .iter()
            .filter(|r| r.check_out_date <= now && r.status == ReservationStatus::Completed)
            .collect()
    }

    pub fn cancelled(&self) -> Vec<&Reservation> {
        self.items().iter().filter(|r| r.status == ReservationStatus::Cancelled).collect()
    }

    pub fn by_user(&self, user_id: &str) -> Vec<&Reservation> {
        self.items().iter().filter(|r| r.user_id == user_id).collect()
    }

    pub fn by_property(&self, property_id: &str) -> Vec<&Reservation> {
        self.items()
            .iter()
            .filter(|r| r.property_id.as_deref() == Some(property_id))
            .collect()
    }

    /// Stays lying entirely inside `[start, end]`
    pub fn by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<&Reservation> {
        self.items()
            .iter()
            .filter(|r| r.check_in_date >= start && r.check_out_date <= end)
            .collect()
    }

    pub fn stats(&self, now: DateTime<Utc>) -> ReservationStats {
        let items = self.items();
        let ratings: Vec<f64> = items.iter().filter_map(|r| r.average_rating).collect();

        ReservationStats {
            total: items.len(),
            active: self.active(now).len(),
            completed: self.completed(now).len(),
            cancelled: self.cancelled().len(),
            total_revenue: items.iter().map(|r| r.amount).sum(),
            average_rating: if ratings.is_empty() {
                0.0
            } else {
                ratings.iter().sum::<f64>() / ratings.len() as f64
            },
        }
    }

    pub fn update_status(&mut self, id: &str, status: ReservationStatus) -> bool {
        self.update_item(id, |r| r.status = status)
    }

    pub fn update_payment_status(&mut self, id: &str, status: PaymentStatus) -> bool {
        self.update_item(id, |r| r.payment_status = status)
    }

    pub fn add_payment(&mut self, id: &str, payment: Payment) -> bool {
        self.update_item(id, |r| r.payments.push(payment.clone()))
    }

    /// Append a review and recompute the review count and average rating
    pub fn add_review(&mut self, id: &str, review: Review) -> bool {
        self.update_item(id, |r| {
            r.reviews.push(review.clone());
            r.review_count = r.reviews.len() as u32;
            let total: f64 = r.reviews.iter().map(|review| review.rating).sum();
            r.average_rating = Some(total / r.reviews.len() as f64);
        })
    }

    /// Apply JSON patches to many reservations; nothing changes if one is invalid
    pub fn batch_update_reservations(&mut self, updates: Vec<(String, Value)>) -> Result<usize, StoreError> {
        self.batch_patch(updates)
    }
}

impl Default for ReservationStore {
    fn default() -> Self {
        Self::new(StoreOptions::for_entity().persist(true))
    }
}

impl std::ops::Deref for ReservationStore {
    type Target = Store<Reservation>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for ReservationStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}
