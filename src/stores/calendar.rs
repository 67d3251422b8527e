use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::filter::Where;
use crate::models::Calendar;

entity_store!(CalendarStore, Calendar);

impl CalendarStore {
    /// Replace the stored day with the same id, including the current item
    pub fn update_calendar(&mut self, calendar: Calendar) -> bool {
        self.update_item(&calendar.id.clone(), |day| *day = calendar.clone())
    }

    /// Base rate for `nights`, scaled by the day's seasonal multiplier
    pub fn calculate_price(&self, id: &str, nights: u32) -> Option<Decimal> {
        let day = self.get_by_id(id)?;
        let price = day.base_rate * Decimal::from(nights);
        Some(match day.seasonal_multiplier {
            Some(multiplier) => price * multiplier,
            None => price,
        })
    }

    /// Mark every stored day falling on one of `dates` as blocked
    pub fn block_dates(&mut self, dates: &[NaiveDate]) -> usize {
        let updates: Vec<_> = self
            .items()
            .iter()
            .filter(|day| dates.contains(&day.date) && !day.is_blocked)
            .map(|day| (day.id.clone(), |day: &mut Calendar| day.is_blocked = true))
            .collect();
        self.batch_update(updates)
    }

    pub fn by_listing(&self, listing_id: &str) -> Vec<&Calendar> {
        self.find(Where::new().eq("listing_id", listing_id))
    }

    pub fn by_reservation(&self, reservation_id: &str) -> Vec<&Calendar> {
        self.find(Where::new().eq("reservation_id", reservation_id))
    }

    pub fn by_property(&self, property_id: &str) -> Vec<&Calendar> {
        self.find(Where::new().eq("property_id", property_id))
    }

    pub fn by_hotel(&self, hotel_id: &str) -> Vec<&Calendar> {
        self.find(Where::new().eq("hotel_id", hotel_id))
    }

    pub fn booked(&self, listing_id: &str) -> Vec<&Calendar> {
        self.find(Where::new().eq("listing_id", listing_id).eq("is_booked", true))
    }

    pub fn blocked(&self, listing_id: &str) -> Vec<&Calendar> {
        self.find(Where::new().eq("listing_id", listing_id).eq("is_blocked", true))
    }

    /// Open days of a listing between `start` and `end`, both inclusive
    pub fn available_between(&self, listing_id: &str, start: NaiveDate, end: NaiveDate) -> Vec<&Calendar> {
        self.find(
            Where::new()
                .eq("listing_id", listing_id)
                .eq("is_blocked", false)
                .eq("is_booked", false),
        )
        .into_iter()
        .filter(|day| day.date >= start && day.date <= end)
        .collect()
    }

    /// Whether every night from `start` up to `end` is open for `guests`
    pub fn check_availability(&self, listing_id: &str, start: NaiveDate, end: NaiveDate, guests: u32) -> bool {
        let nights = (end - start).num_days();
        if nights <= 0 {
            return false;
        }

        let open = self
            .available_between(listing_id, start, end)
            .into_iter()
            .filter(|day| day.date < end && day.max_guests.map_or(true, |max| max >= guests))
            .count();
        open as i64 == nights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LoggingOptions, StoreOptions};
    use crate::testing::calendar_day;

    fn store() -> CalendarStore {
        CalendarStore::new(StoreOptions::for_entity().logging(LoggingOptions::disabled()))
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn price_applies_seasonal_multiplier() {
        let mut store = store();
        let mut peak = calendar_day("c1", "l1", date("2024-08-01"));
        peak.base_rate = Decimal::new(10000, 2);
        peak.seasonal_multiplier = Some(Decimal::new(15, 1));
        let plain = calendar_day("c2", "l1", date("2024-08-02"));
        store.set_items(vec![peak, plain]);

        assert_eq!(store.calculate_price("c1", 3), Some(Decimal::from(450)));
        assert_eq!(store.calculate_price("c2", 2), Some(Decimal::from(200)));
        assert_eq!(store.calculate_price("missing", 2), None);
    }

    #[test]
    fn blocked_dates_drop_out_of_availability() {
        let mut store = store();
        store.set_items(vec![
            calendar_day("c1", "l1", date("2024-08-01")),
            calendar_day("c2", "l1", date("2024-08-02")),
            calendar_day("c3", "l1", date("2024-08-03")),
            calendar_day("c4", "l2", date("2024-08-02")),
        ]);

        assert!(store.check_availability("l1", date("2024-08-01"), date("2024-08-04"), 2));
        assert_eq!(store.block_dates(&[date("2024-08-02")]), 2);

        let open: Vec<_> = store
            .available_between("l1", date("2024-08-01"), date("2024-08-03"))
            .iter()
            .map(|d| d.id.clone())
            .collect();
        assert_eq!(open, vec!["c1", "c3"]);
        assert_eq!(store.blocked("l1").len(), 1);
        assert!(!store.check_availability("l1", date("2024-08-01"), date("2024-08-04"), 2));
    }

    #[test]
    fn update_calendar_replaces_the_day() {
        let mut store = store();
        store.add_item(calendar_day("c1", "l1", date("2024-08-01")));

        let mut booked = calendar_day("c1", "l1", date("2024-08-01"));
        booked.is_booked = true;
        booked.reservation_id = Some("r1".to_string());
        assert!(store.update_calendar(booked));

        assert_eq!(store.booked("l1").len(), 1);
        assert_eq!(store.by_reservation("r1").len(), 1);
    }
}
