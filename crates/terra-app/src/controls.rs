//! Orbit camera controls with inertial damping.
//!
//! The camera sits on a sphere around `target`, described by
//! `(radius, phi, theta)` with phi measured from +Y and theta around +Y
//! starting at +Z.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use terra_config::ControlsConfig;
use terra_render::Camera;

/// Keeps phi off the poles so the view never flips.
const POLE_EPSILON: f32 = 1e-6;

/// Per-line zoom factor, raised to the zoom speed.
const ZOOM_BASE: f32 = 0.95;

/// Spherical camera offset from the orbit target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Drag-to-orbit and wheel-to-zoom camera controller.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    target: Vec3,
    spherical: Spherical,
    pending_theta: f32,
    pending_phi: f32,
    scale: f32,
    enable_damping: bool,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    pub fn new(position: Vec3, target: Vec3, config: &ControlsConfig) -> Self {
        let min_distance = config.min_distance.max(0.0);
        Self {
            target,
            spherical: Spherical::from_offset(position - target),
            pending_theta: 0.0,
            pending_phi: 0.0,
            scale: 1.0,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor.clamp(0.0, 1.0),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance,
            max_distance: config.max_distance.max(min_distance),
        }
    }

    /// Queue a rotation for a pointer drag of `(dx, dy)` pixels in a viewport
    /// `viewport_height` pixels tall. A full-height drag is one full turn.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_theta -= TAU * dx / viewport_height * self.rotate_speed;
        self.pending_phi -= TAU * dy / viewport_height * self.rotate_speed;
    }

    /// Positive `lines` (wheel up) moves the camera closer.
    pub fn zoom(&mut self, lines: f32) {
        self.scale *= ZOOM_BASE.powf(self.zoom_speed * lines);
    }

    /// Advance one frame and return the new camera position.
    pub fn update(&mut self) -> Vec3 {
        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        self.spherical.theta += self.pending_theta * step;
        self.spherical.phi += self.pending_phi * step;
        self.spherical.phi = self.spherical.phi.clamp(POLE_EPSILON, PI - POLE_EPSILON);

        self.spherical.radius =
            (self.spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.scale = 1.0;

        if self.enable_damping {
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }

        self.position()
    }

    /// Move `camera` to the controller's position, facing the target.
    pub fn apply_to(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.look_at(self.target);
    }

    pub fn position(&self) -> Vec3 {
        self.target + self.spherical.to_offset()
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// No rotation left to apply.
    pub fn is_settled(&self) -> bool {
        self.pending_theta.abs() < 1e-6 && self.pending_phi.abs() < 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Vec3 {
        Vec3::new(12.0, 5.0, 4.0)
    }

    fn controls() -> OrbitControls {
        OrbitControls::new(start(), Vec3::ZERO, &ControlsConfig::default())
    }

    #[test]
    fn test_spherical_round_trip_preserves_position() {
        let offset = start();
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-4);
    }

    #[test]
    fn test_no_input_no_drift() {
        let mut controls = controls();
        for _ in 0..500 {
            controls.update();
        }
        assert!((controls.position() - start()).length() < 1e-4);
        assert!(controls.is_settled());
    }

    #[test]
    fn test_damping_converges_to_full_drag() {
        let mut controls = controls();
        let theta_before = controls.spherical().theta;
        // A quarter of the viewport height is a quarter turn.
        controls.rotate(180.0, 0.0, 720.0);
        controls.update();
        let first_step = theta_before - controls.spherical().theta;
        assert!((first_step - 0.05 * PI / 2.0).abs() < 1e-5);

        for _ in 0..1000 {
            controls.update();
        }
        let total = theta_before - controls.spherical().theta;
        assert!((total - PI / 2.0).abs() < 1e-3, "total rotation {total}");
        assert!(controls.is_settled());
    }

    #[test]
    fn test_without_damping_applies_immediately() {
        let config = ControlsConfig {
            enable_damping: false,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(start(), Vec3::ZERO, &config);
        let theta_before = controls.spherical().theta;
        controls.rotate(-360.0, 0.0, 720.0);
        controls.update();
        assert!((controls.spherical().theta - theta_before - PI).abs() < 1e-5);
        assert!(controls.is_settled());
    }

    #[test]
    fn test_phi_clamped_away_from_poles() {
        let mut controls = controls();
        controls.rotate(0.0, 10_000.0, 720.0);
        for _ in 0..2000 {
            controls.update();
        }
        let phi = controls.spherical().phi;
        assert!(phi > 0.0 && phi < PI);
        assert!(controls.position().is_finite());
    }

    #[test]
    fn test_zoom_in_and_clamp() {
        let mut controls = controls();
        let radius = controls.spherical().radius;
        controls.zoom(1.0);
        controls.update();
        assert!((controls.spherical().radius - radius * 0.95).abs() < 1e-4);

        controls.zoom(1000.0);
        controls.update();
        assert_eq!(controls.spherical().radius, 1.5);

        controls.zoom(-1000.0);
        controls.update();
        assert_eq!(controls.spherical().radius, 50.0);
    }

    #[test]
    fn test_apply_to_camera_faces_target() {
        let mut controls = controls();
        controls.rotate(100.0, 40.0, 720.0);
        controls.update();

        let mut camera = Camera::looking_at(start(), Vec3::ZERO, 25.0, 1.5, 0.1, 100.0);
        controls.apply_to(&mut camera);
        assert_eq!(camera.position, controls.position());
        let to_target = (Vec3::ZERO - camera.position).normalize();
        assert!((camera.forward() - to_target).length() < 1e-4);
    }

    #[test]
    fn test_zero_height_viewport_is_ignored() {
        let mut controls = controls();
        controls.rotate(100.0, 100.0, 0.0);
        assert!(controls.is_settled());
    }
}
