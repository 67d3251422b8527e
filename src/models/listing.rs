use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishedStatus {
    #[default]
    Draft,
    Active,
    Inactive,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub provider_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub published_status: PublishedStatus,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub featured_image: Option<String>,
    // `is_active` on the wire
    #[serde(rename = "is_active", default = "enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

fn enabled() -> bool {
    true
}

impl_entity!(Listing, "listing-store");
