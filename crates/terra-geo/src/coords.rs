//! Latitude/longitude points and their positions on the unit sphere.
//!
//! The axis convention is Y-up with longitude measured from the -X axis
//! (`theta = longitude + 180°`), which is the same parameterization the
//! globe's UV sphere uses. A point converted here therefore lands exactly on
//! the texel of an equirectangular map that shows that location.

use std::fmt;

use glam::{DVec3, Vec3};

/// A geographic location in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees. Range: \[-90, 90\]. Positive = north.
    pub latitude: f64,
    /// Longitude in degrees. Range: \[-180, 180\]. Positive = east.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Position of this point on the unit sphere.
    pub fn to_cartesian(&self) -> CartesianPosition {
        geo_to_cartesian(self.longitude, self.latitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.longitude >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}",
            self.latitude.abs(),
            lat_dir,
            self.longitude.abs(),
            lon_dir
        )
    }
}

/// A point on the unit sphere, Y-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPosition {
    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Single-precision copy for vertex and instance buffers.
    pub fn as_vec3(&self) -> Vec3 {
        self.as_dvec3().as_vec3()
    }

    pub fn length(&self) -> f64 {
        self.as_dvec3().length()
    }
}

impl From<CartesianPosition> for DVec3 {
    fn from(position: CartesianPosition) -> Self {
        position.as_dvec3()
    }
}

/// Convert a longitude/latitude pair in degrees to a unit-sphere position.
///
/// ```text
/// phi   = (90 - latitude)   in radians   (polar angle from +Y)
/// theta = (longitude + 180) in radians
/// x = -sin(phi) * cos(theta)
/// y =  cos(phi)
/// z =  sin(phi) * sin(theta)
/// ```
///
/// Total over all real inputs; out-of-range values simply wrap around the
/// sphere through the trigonometric functions.
pub fn geo_to_cartesian(longitude: f64, latitude: f64) -> CartesianPosition {
    let phi = (90.0 - latitude).to_radians();
    let theta = (longitude + 180.0).to_radians();

    CartesianPosition {
        x: -(phi.sin() * theta.cos()),
        y: phi.cos(),
        z: phi.sin() * theta.sin(),
    }
}
