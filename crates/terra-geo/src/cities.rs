//! Compile-time list of the cities marked on the globe.

use crate::coords::GeoPoint;

/// A named geographic location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub location: GeoPoint,
}

impl City {
    pub const fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            location: GeoPoint::new(latitude, longitude),
        }
    }
}

/// Cities pinned on the globe, in placement order.
pub const CITIES: [City; 9] = [
    City::new("Berlin", 52.31, 13.24),
    City::new("Amsterdam", 52.12, 5.16),
    City::new("Brussels", 50.84656, 4.35170),
    City::new("Vienna", 48.2084, 16.3720),
    City::new("Stockholm", 59.32512, 18.07109),
    City::new("Helsinki", 60.16749, 24.94275),
    City::new("Oslo", 59.91333, 10.73897),
    City::new("Copenhagen", 55.68672, 12.57007),
    City::new("London", 51.50745, -0.12777),
];

/// Look up a city by name, ignoring ASCII case.
pub fn city_by_name(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order() {
        let names: Vec<&str> = CITIES.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            [
                "Berlin",
                "Amsterdam",
                "Brussels",
                "Vienna",
                "Stockholm",
                "Helsinki",
                "Oslo",
                "Copenhagen",
                "London"
            ]
        );
    }

    #[test]
    fn test_coordinates_are_in_range() {
        for city in &CITIES {
            let p = city.location;
            assert!((-90.0..=90.0).contains(&p.latitude), "{}", city.name);
            assert!((-180.0..=180.0).contains(&p.longitude), "{}", city.name);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let oslo = city_by_name("OSLO").expect("oslo is registered");
        assert_eq!(oslo.location, GeoPoint::new(59.91333, 10.73897));
        assert!(city_by_name("Paris").is_none());
    }

    #[test]
    fn test_london_is_west_of_greenwich() {
        let london = city_by_name("london").unwrap();
        assert!(london.location.longitude < 0.0);
    }
}
