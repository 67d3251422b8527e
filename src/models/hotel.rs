use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HotelType {
    Hotel,
    Resort,
    Motel,
    Hostel,
    BoutiqueHotel,
    Apartment,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HotelStatus {
    Active,
    Inactive,
    #[default]
    Pending,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub hotel_type: HotelType,
    #[serde(default)]
    pub status: HotelStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub star_rating: Option<u8>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub availability_date: Option<NaiveDate>,
    #[serde(default)]
    pub check_in_time: Option<NaiveTime>,
    #[serde(default)]
    pub check_out_time: Option<NaiveTime>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_entity!(Hotel, "hotel-store");
