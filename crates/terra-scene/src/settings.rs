//! Immutable scene settings, built once from the loaded config.
//!
//! Both the earth and the atmosphere materials read their sun direction and
//! tint colors from the same [`GlobeSettings`] value.

use glam::Vec3;
use terra_config::Config;
use terra_geo::PinStyle;
use tracing::warn;

/// Atmosphere tints in linear RGB.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AtmospherePalette {
    /// Color on the sun-facing side.
    pub day: Vec3,
    /// Color around the terminator.
    pub twilight: Vec3,
}

impl Default for AtmospherePalette {
    fn default() -> Self {
        let globe = terra_config::GlobeConfig::default();
        Self {
            day: Vec3::from_array(globe.atmosphere_day_color.to_linear()),
            twilight: Vec3::from_array(globe.atmosphere_twilight_color.to_linear()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobeSettings {
    /// Unit vector pointing towards the sun.
    pub sun_direction: Vec3,
    pub palette: AtmospherePalette,
    /// Atmosphere shell radius relative to the globe.
    pub atmosphere_scale: f32,
    /// Segment count used for both longitude and latitude of the globe mesh.
    pub sphere_segments: u32,
    pub pin_style: PinStyle,
    /// Radians per second.
    pub rotation_rate: f64,
    pub anisotropy: u16,
    /// Linear RGB.
    pub clear_color: [f32; 3],
}

impl GlobeSettings {
    pub fn from_config(config: &Config) -> Self {
        let globe = &config.globe;

        let requested = Vec3::from_array(globe.sun_direction);
        let sun_direction = requested.try_normalize().unwrap_or_else(|| {
            warn!("sun_direction {requested} cannot be normalized, using +Z");
            Vec3::Z
        });

        Self {
            sun_direction,
            palette: AtmospherePalette {
                day: Vec3::from_array(globe.atmosphere_day_color.to_linear()),
                twilight: Vec3::from_array(globe.atmosphere_twilight_color.to_linear()),
            },
            atmosphere_scale: globe.atmosphere_scale,
            sphere_segments: config.render.sphere_segments.max(3),
            pin_style: PinStyle {
                radius: globe.pin_radius,
                width_segments: globe.pin_segments.max(3),
                height_segments: globe.pin_segments.max(2),
                color: globe.pin_color.to_linear(),
            },
            rotation_rate: globe.rotation_rate,
            anisotropy: config.render.anisotropy,
            clear_color: config.render.clear_color.to_linear(),
        }
    }
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
