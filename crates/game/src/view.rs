//! First-person view angles.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Pitch stops just short of straight up or down so the horizontal movement
/// basis never vanishes.
pub const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Mouse-look angles in radians.
///
/// Yaw 0 looks along +X and increases toward +Z. Positive pitch looks down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FirstPersonView {
    pub yaw: f32,
    pub pitch: f32,
}

impl FirstPersonView {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut view = Self { yaw, pitch };
        view.normalize();
        view
    }

    /// View whose yaw faces from `from` toward `to`, level pitch.
    pub fn looking_at(from: Vec3, to: Vec3) -> Self {
        let delta = to - from;
        Self::new(delta.z.atan2(delta.x), 0.0)
    }

    /// Apply a mouse movement in pixels.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        let radians_per_pixel = sensitivity * 0.001;
        self.yaw += dx * radians_per_pixel;
        self.pitch += dy * radians_per_pixel;
        self.normalize();
    }

    /// Unit vector the camera looks along.
    pub fn look_direction(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();

        Vec3::new(cos_pitch * cos_yaw, -sin_pitch, cos_pitch * sin_yaw)
    }

    fn normalize(&mut self) {
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw = (self.yaw + PI).rem_euclid(TAU) - PI;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_look_direction() {
        let view = FirstPersonView::new(0.0, 0.0);
        assert_abs_diff_eq!(view.look_direction(), Vec3::X, epsilon = 1e-6);

        let view = FirstPersonView::new(FRAC_PI_2, 0.0);
        assert_abs_diff_eq!(view.look_direction(), Vec3::Z, epsilon = 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut view = FirstPersonView::default();
        view.apply_mouse_delta(0.0, 100_000.0, 2.0);
        assert_eq!(view.pitch, PITCH_LIMIT);

        view.apply_mouse_delta(0.0, -1_000_000.0, 2.0);
        assert_eq!(view.pitch, -PITCH_LIMIT);

        // Still has a horizontal component to walk along
        let look = view.look_direction();
        assert!(Vec3::new(look.x, 0.0, look.z).length() > 1e-3);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut view = FirstPersonView::default();
        view.apply_mouse_delta(1000.0 * 4.0, 0.0, 1.0);
        assert!(view.yaw >= -PI && view.yaw < PI);
        assert_abs_diff_eq!(view.yaw, 4.0 - TAU, epsilon = 1e-5);
    }

    #[test]
    fn test_looking_at() {
        let view = FirstPersonView::looking_at(Vec3::ZERO, Vec3::new(0.0, 5.0, -3.0));
        assert_abs_diff_eq!(view.look_direction(), Vec3::NEG_Z, epsilon = 1e-6);
    }
}
