//! Geographic coordinates for the globe: latitude/longitude to unit-sphere
//! positions, the built-in city list, and pin records placed from it.

pub mod cities;
pub mod coords;
pub mod pins;

pub use cities::{CITIES, City, city_by_name};
pub use coords::{CartesianPosition, GeoPoint, geo_to_cartesian};
pub use pins::{Pin, PinGroup, PinStyle, place_pins};
