//! CPU reference for the globe fragment shaders.
//!
//! `earth.wgsl` and `atmosphere.wgsl` evaluate exactly these expressions per
//! fragment. Keeping a Rust copy lets the lighting rules be tested without a
//! GPU.

use glam::Vec3;

use crate::settings::AtmospherePalette;

/// Hermite step, matching WGSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Cosine between the sun direction and the surface normal.
pub fn sun_orientation(sun_direction: Vec3, normal: Vec3) -> f32 {
    sun_direction.dot(normal)
}

/// Blend weight of the day texture over the night texture.
pub fn day_mix(sun_orientation: f32) -> f32 {
    smoothstep(-0.25, 0.5, sun_orientation)
}

/// Blend weight of the day tint over the twilight tint.
pub fn atmosphere_day_mix(sun_orientation: f32) -> f32 {
    smoothstep(-0.5, 1.0, sun_orientation)
}

pub fn atmosphere_color(palette: &AtmospherePalette, sun_orientation: f32) -> Vec3 {
    palette
        .twilight
        .lerp(palette.day, atmosphere_day_mix(sun_orientation))
}

/// Rim factor in `[0, 1]`; zero where the surface faces the viewer, one at
/// grazing angles. `view_direction` points from the eye to the fragment.
pub fn fresnel(view_direction: Vec3, normal: Vec3) -> f32 {
    (view_direction.dot(normal) + 1.0).powi(2)
}

/// Opacity of the atmosphere shell's back faces.
pub fn atmosphere_alpha(view_direction: Vec3, normal: Vec3, sun_orientation: f32) -> f32 {
    let edge = smoothstep(0.0, 0.5, view_direction.dot(normal));
    let day = smoothstep(-0.5, 0.0, sun_orientation);
    edge * day
}

/// Texture samples feeding one earth fragment.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceSample {
    pub day: Vec3,
    pub night: Vec3,
    /// Red channel of the specular/clouds map.
    pub specular: f32,
    /// Green channel of the specular/clouds map.
    pub clouds: f32,
}

/// Full earth surface color for one fragment.
pub fn shade_surface(
    sample: &SurfaceSample,
    normal: Vec3,
    view_direction: Vec3,
    sun_direction: Vec3,
    palette: &AtmospherePalette,
) -> Vec3 {
    let orientation = sun_orientation(sun_direction, normal);

    let surface_mix = day_mix(orientation);
    let mut color = sample.night.lerp(sample.day, surface_mix);

    let clouds = smoothstep(0.5, 1.0, sample.clouds) * surface_mix;
    color = color.lerp(Vec3::ONE, clouds);

    let rim = fresnel(view_direction, normal);
    let atmosphere = atmosphere_color(palette, orientation);
    color = color.lerp(atmosphere, rim * atmosphere_day_mix(orientation));

    let reflection = reflect(-sun_direction, normal);
    let specular = (-reflection.dot(view_direction)).max(0.0).powf(32.0) * sample.specular;
    color + specular * Vec3::ONE.lerp(atmosphere, rim)
}

/// WGSL `reflect`.
fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn sample() -> SurfaceSample {
        SurfaceSample {
            day: Vec3::new(0.2, 0.4, 0.1),
            night: Vec3::new(0.05, 0.04, 0.01),
            specular: 0.0,
            clouds: 0.0,
        }
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(-0.25, 0.5, -1.0), 0.0);
        assert_eq!(smoothstep(-0.25, 0.5, 0.5), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < EPSILON);
        assert!(smoothstep(0.0, 1.0, 0.25) < 0.25);
    }

    #[test]
    fn test_day_mix_thresholds() {
        assert_eq!(day_mix(-0.25), 0.0);
        assert_eq!(day_mix(-1.0), 0.0);
        assert_eq!(day_mix(0.5), 1.0);
        assert!(day_mix(0.0) > 0.0 && day_mix(0.0) < 1.0);
    }

    #[test]
    fn test_atmosphere_color_at_extremes() {
        let palette = AtmospherePalette::default();
        assert!((atmosphere_color(&palette, 1.0) - palette.day).length() < EPSILON);
        assert!((atmosphere_color(&palette, -0.5) - palette.twilight).length() < EPSILON);
        assert!((atmosphere_color(&palette, -1.0) - palette.twilight).length() < EPSILON);
    }

    #[test]
    fn test_fresnel_head_on_and_grazing() {
        // Looking straight down at the surface: view is the negated normal.
        assert!(fresnel(Vec3::NEG_Z, Vec3::Z).abs() < EPSILON);
        assert!((fresnel(Vec3::X, Vec3::Z) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_atmosphere_alpha_fades_on_night_side() {
        let normal = Vec3::Z;
        let view = Vec3::Z;
        assert!((atmosphere_alpha(view, normal, 0.5) - 1.0).abs() < EPSILON);
        assert_eq!(atmosphere_alpha(view, normal, -0.5), 0.0);
        assert_eq!(atmosphere_alpha(Vec3::NEG_Z, normal, 1.0), 0.0);
    }

    #[test]
    fn test_night_side_shows_night_texture() {
        let palette = AtmospherePalette::default();
        let normal = Vec3::NEG_Z;
        let color = shade_surface(&sample(), normal, Vec3::Z, Vec3::Z, &palette);
        assert!((color - sample().night).length() < EPSILON);
    }

    #[test]
    fn test_sub_solar_point_shows_day_texture() {
        let palette = AtmospherePalette::default();
        let normal = Vec3::Z;
        // Viewer at the sun; no specular contribution without a specular mask.
        let color = shade_surface(&sample(), normal, Vec3::NEG_Z, Vec3::Z, &palette);
        assert!((color - sample().day).length() < EPSILON);
    }

    #[test]
    fn test_dense_clouds_whiten_day_side() {
        let palette = AtmospherePalette::default();
        let cloudy = SurfaceSample {
            clouds: 1.0,
            ..sample()
        };
        let color = shade_surface(&cloudy, Vec3::Z, Vec3::NEG_Z, Vec3::Z, &palette);
        assert!((color - Vec3::ONE).length() < EPSILON);
    }

    #[test]
    fn test_specular_highlight_adds_light() {
        let palette = AtmospherePalette::default();
        let shiny = SurfaceSample {
            specular: 1.0,
            ..sample()
        };
        let color = shade_surface(&shiny, Vec3::Z, Vec3::NEG_Z, Vec3::Z, &palette);
        assert!((color - (sample().day + Vec3::ONE)).length() < EPSILON);
    }
}
