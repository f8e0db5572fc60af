//! Time-driven animation of the globe.
//!
//! The rotation angle is recomputed from absolute elapsed time every frame,
//! never accumulated, so a dropped or late frame cannot make the earth and
//! its pins drift apart.

use glam::Mat4;

/// Default spin, in radians per second.
pub const DEFAULT_ROTATION_RATE: f64 = 0.1;

/// Everything the renderers need to draw one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCommand {
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Earth yaw about +Y, in radians.
    pub earth_rotation: f64,
    /// Pin group yaw about +Y, in radians.
    pub pin_group_rotation: f64,
}

impl RenderCommand {
    pub fn earth_model(&self) -> Mat4 {
        yaw_matrix(self.earth_rotation)
    }

    pub fn pin_group_model(&self) -> Mat4 {
        yaw_matrix(self.pin_group_rotation)
    }
}

fn yaw_matrix(angle: f64) -> Mat4 {
    // Reduce in f64 so long sessions keep full precision in the f32 matrix.
    let wrapped = angle.rem_euclid(std::f64::consts::TAU);
    Mat4::from_rotation_y(wrapped as f32)
}

/// Maps elapsed time to per-frame transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Animator {
    rotation_rate: f64,
}

impl Animator {
    pub fn new(rotation_rate: f64) -> Self {
        Self { rotation_rate }
    }

    pub fn rotation_rate(&self) -> f64 {
        self.rotation_rate
    }

    /// `angle = elapsed * rotation_rate`, applied to the earth and the pin
    /// group alike.
    pub fn tick(&self, elapsed: f64) -> RenderCommand {
        let angle = elapsed * self.rotation_rate;
        RenderCommand {
            elapsed,
            earth_rotation: angle,
            pin_group_rotation: angle,
        }
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATION_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_tick_at_zero_is_identity() {
        let command = Animator::default().tick(0.0);
        assert_eq!(command.earth_rotation, 0.0);
        assert_eq!(command.pin_group_rotation, 0.0);
        assert!(command.earth_model().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_rotation_is_rate_times_elapsed() {
        let command = Animator::default().tick(10.0);
        assert!((command.earth_rotation - 1.0).abs() < 1e-12);
        assert_eq!(command.earth_rotation, command.pin_group_rotation);
        assert_eq!(command.elapsed, 10.0);
    }

    #[test]
    fn test_tick_is_independent_of_history() {
        let animator = Animator::new(0.25);
        let direct = animator.tick(42.0);
        for frame in 0..4200 {
            animator.tick(frame as f64 * 0.01);
        }
        assert_eq!(animator.tick(42.0), direct);
    }

    #[test]
    fn test_earth_and_pins_share_transform() {
        let command = Animator::default().tick(123.4);
        assert_eq!(command.earth_model(), command.pin_group_model());
    }

    #[test]
    fn test_model_rotates_about_y() {
        // A quarter turn moves +X to -Z.
        let command = Animator::new(1.0).tick(std::f64::consts::FRAC_PI_2);
        let moved = command.earth_model().transform_point3(Vec3::X);
        assert!((moved - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_long_sessions_wrap_cleanly() {
        let animator = Animator::default();
        let turns = 1_000_000.0;
        let command = animator.tick(turns * std::f64::consts::TAU / 0.1);
        assert!(command.earth_model().abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn test_zero_rate_stays_still() {
        let command = Animator::new(0.0).tick(1e6);
        assert_eq!(command.earth_rotation, 0.0);
    }
}
