//! Marker pins placed on the globe surface.
//!
//! Pins are plain value records. Rendering code consumes a [`PinGroup`] and
//! owns whatever GPU state it needs; nothing here knows about the renderer.

use crate::cities::City;
use crate::coords::{CartesianPosition, GeoPoint};

/// Shape and color shared by every pin in a group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinStyle {
    /// Radius of the marker sphere, in globe radii.
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    /// Linear RGB.
    pub color: [f32; 3],
}

impl Default for PinStyle {
    fn default() -> Self {
        Self {
            radius: 0.01,
            width_segments: 20,
            height_segments: 20,
            color: [0.0, 0.0, 1.0],
        }
    }
}

/// One marker, fixed to the location it was created from.
#[derive(Clone, Debug, PartialEq)]
pub struct Pin {
    pub label: Option<&'static str>,
    pub location: GeoPoint,
    pub position: CartesianPosition,
}

impl Pin {
    pub fn at(location: GeoPoint) -> Self {
        Self {
            label: None,
            location,
            position: location.to_cartesian(),
        }
    }
}

/// Ordered pins that rotate together as one unit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PinGroup {
    pub pins: Vec<Pin>,
    pub style: PinStyle,
}

impl PinGroup {
    /// Place one pin per city, keeping registry order.
    pub fn from_cities(cities: &[City], style: PinStyle) -> Self {
        let pins = cities
            .iter()
            .map(|city| Pin {
                label: Some(city.name),
                ..Pin::at(city.location)
            })
            .collect();
        Self { pins, style }
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pin centers in single precision, in group order.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.pins
            .iter()
            .map(|pin| pin.position.as_vec3().to_array())
            .collect()
    }
}

/// Place one pin per point, in input order. Duplicates are kept.
pub fn place_pins(points: &[GeoPoint], style: PinStyle) -> PinGroup {
    PinGroup {
        pins: points.iter().copied().map(Pin::at).collect(),
        style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::CITIES;
    use crate::coords::geo_to_cartesian;

    #[test]
    fn test_registry_produces_nine_pins_in_order() {
        let group = PinGroup::from_cities(&CITIES, PinStyle::default());
        assert_eq!(group.len(), 9);

        for (pin, city) in group.pins.iter().zip(CITIES.iter()) {
            assert_eq!(pin.label, Some(city.name));
            let expected = geo_to_cartesian(city.location.longitude, city.location.latitude);
            let delta = (pin.position.as_dvec3() - expected.as_dvec3()).length();
            assert!(delta < 1e-9, "{} off by {delta:e}", city.name);
        }
    }

    #[test]
    fn test_place_pins_keeps_order_and_duplicates() {
        let a = GeoPoint::new(10.0, 20.0);
        let b = GeoPoint::new(-5.0, 100.0);
        let group = place_pins(&[a, b, a], PinStyle::default());

        assert_eq!(group.len(), 3);
        assert_eq!(group.pins[0].location, a);
        assert_eq!(group.pins[1].location, b);
        assert_eq!(group.pins[2].position, group.pins[0].position);
    }

    #[test]
    fn test_empty_input_gives_empty_group() {
        let group = place_pins(&[], PinStyle::default());
        assert!(group.is_empty());
        assert!(group.positions().is_empty());
    }

    #[test]
    fn test_all_pins_share_the_style() {
        let style = PinStyle {
            radius: 0.02,
            color: [1.0, 0.0, 0.0],
            ..PinStyle::default()
        };
        let group = PinGroup::from_cities(&CITIES, style);
        assert_eq!(group.style, style);
    }

    #[test]
    fn test_default_style_is_small_blue_sphere() {
        let style = PinStyle::default();
        assert_eq!(style.radius, 0.01);
        assert_eq!((style.width_segments, style.height_segments), (20, 20));
        assert_eq!(style.color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_positions_lie_on_unit_sphere() {
        let group = PinGroup::from_cities(&CITIES, PinStyle::default());
        for p in group.positions() {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }
}
