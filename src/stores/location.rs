use crate::filter::Where;
use crate::models::Location;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (haversine)
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

entity_store!(LocationStore, Location);

impl LocationStore {
    pub fn by_city(&self, city: &str) -> Vec<&Location> {
        self.items()
            .iter()
            .filter(|l| l.city.eq_ignore_ascii_case(city))
            .collect()
    }

    pub fn by_country(&self, country: &str) -> Vec<&Location> {
        self.find(Where::new().eq("country", country))
    }

    /// Locations with coordinates within `radius_km` of the point, nearest first
    pub fn within_radius(&self, latitude: f64, longitude: f64, radius_km: f64) -> Vec<&Location> {
        let mut nearby: Vec<(f64, &Location)> = self
            .items()
            .iter()
            .filter_map(|l| {
                let (lat, lon) = l.coordinates()?;
                let distance = calculate_distance(latitude, longitude, lat, lon);
                (distance <= radius_km).then_some((distance, l))
            })
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        nearby.into_iter().map(|(_, l)| l).collect()
    }
}
