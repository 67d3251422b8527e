use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bookable day of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub listing_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub min_nights: Option<u32>,
    #[serde(default)]
    pub max_nights: Option<u32>,
    #[serde(default)]
    pub max_guests: Option<u32>,

    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub weekend_rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub weekday_rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub seasonal_multiplier: Option<Decimal>,

    #[serde(default = "one")]
    pub available_units: u32,
    #[serde(default = "one")]
    pub minimum_stay: u32,
    #[serde(default)]
    pub maximum_stay: Option<u32>,

    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub hotel_id: Option<String>,
    #[serde(default)]
    pub reservation_id: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

fn one() -> u32 {
    1
}

impl Calendar {
    pub fn is_open(&self) -> bool {
        !self.is_blocked && !self.is_booked
    }
}

impl_entity!(Calendar, "calendar-store");
