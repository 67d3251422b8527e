use chrono::NaiveDate;
use serde_json::Value;

use crate::error::StoreError;
use crate::filter::{FilterOp, Where};
use crate::models::{Hotel, HotelStatus, HotelType};

entity_store!(HotelStore, Hotel);

impl HotelStore {
    /// Merge a partial hotel into the stored one; the patch must carry its `id`
    pub fn update_hotel(&mut self, patch: &Value) -> Result<bool, StoreError> {
        let id = patch
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::InvalidPatch {
                id: String::new(),
                message: "Hotel ID is missing for update".to_string(),
            })?
            .to_string();
        self.patch_item(&id, patch)
    }

    pub fn by_type(&self, hotel_type: HotelType) -> Vec<&Hotel> {
        self.items().iter().filter(|h| h.hotel_type == hotel_type).collect()
    }

    pub fn active_hotels(&self) -> Vec<&Hotel> {
        self.find(Where::new().eq("status", "Active").is_null("deleted_at"))
    }

    pub fn featured_hotels(&self) -> Vec<&Hotel> {
        self.find(Where::new().eq("featured", true))
    }

    pub fn search_hotels(&self, query: &str) -> Vec<&Hotel> {
        self.search(query, Some(&["name", "description", "location_id"]))
    }

    pub fn by_location(&self, location_id: &str) -> Vec<&Hotel> {
        self.find(Where::new().eq("location_id", location_id))
    }

    pub fn by_status(&self, status: HotelStatus) -> Vec<&Hotel> {
        self.items().iter().filter(|h| h.status == status).collect()
    }

    /// Hotels offering every one of `amenities`
    pub fn by_amenities(&self, amenities: &[&str]) -> Vec<&Hotel> {
        let clause = amenities
            .iter()
            .fold(Where::new(), |clause, amenity| clause.field("amenities", FilterOp::Contains, *amenity));
        self.find(clause)
    }

    /// Active hotels available on `date`
    pub fn available_on(&self, date: NaiveDate) -> Vec<&Hotel> {
        self.active_hotels()
            .into_iter()
            .filter(|h| h.availability_date == Some(date))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LoggingOptions, StoreOptions};
    use crate::testing::hotel;
    use serde_json::json;

    fn store() -> HotelStore {
        let mut store = HotelStore::new(StoreOptions::for_entity().logging(LoggingOptions::disabled()));
        let mut spa = hotel("h1", "Sea Breeze Resort", HotelType::Resort);
        spa.amenities = vec!["pool".to_string(), "spa".to_string()];
        spa.featured = true;
        let mut archived = hotel("h2", "Old Inn", HotelType::Motel);
        archived.status = HotelStatus::Archived;
        archived.amenities = vec!["pool".to_string()];
        store.set_items(vec![spa, archived, hotel("h3", "City Hostel", HotelType::Hostel)]);
        store
    }

    #[test]
    fn amenity_filter_requires_all_requested() {
        let store = store();
        assert_eq!(store.by_amenities(&["pool"]).len(), 2);
        let both: Vec<_> = store.by_amenities(&["pool", "spa"]).iter().map(|h| h.id.clone()).collect();
        assert_eq!(both, vec!["h1"]);
    }

    #[test]
    fn active_and_featured_helpers() {
        let store = store();
        assert_eq!(store.active_hotels().len(), 2);
        assert_eq!(store.featured_hotels().len(), 1);
        assert_eq!(store.search_hotels("hostel").len(), 1);
    }

    #[test]
    fn update_hotel_requires_an_id() {
        let mut store = store();
        assert!(store.update_hotel(&json!({"name": "Nameless"})).is_err());
        assert!(store.update_hotel(&json!({"id": "h3", "featured": true})).unwrap());
        assert_eq!(store.featured_hotels().len(), 2);
    }
}
