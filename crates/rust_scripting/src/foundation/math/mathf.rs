//! Free math functions available to scripts

use std::ops::{Add, Mul, Sub};

use super::constants::{DEG_TO_RAD, RAD_TO_DEG};
use super::{Color3, Quat, Vector2, Vector3, Vector4};

pub use super::constants::PI;

/// Types that can be clamped component-wise to a scalar range
pub trait Clampable: Copy {
    /// Clamp every component to `[min, max]`
    fn clamp_components(self, min: f32, max: f32) -> Self;
}

impl Clampable for f32 {
    fn clamp_components(self, min: f32, max: f32) -> Self {
        // Not f32::clamp: min > max must not panic
        if self < min {
            min
        } else if self > max {
            max
        } else {
            self
        }
    }
}

impl Clampable for Vector2 {
    fn clamp_components(self, min: f32, max: f32) -> Self {
        Self::new(self.x.clamp_components(min, max), self.y.clamp_components(min, max))
    }
}

impl Clampable for Vector3 {
    fn clamp_components(self, min: f32, max: f32) -> Self {
        Self::new(
            self.x.clamp_components(min, max),
            self.y.clamp_components(min, max),
            self.z.clamp_components(min, max),
        )
    }
}

impl Clampable for Vector4 {
    fn clamp_components(self, min: f32, max: f32) -> Self {
        Self::new(
            self.x.clamp_components(min, max),
            self.y.clamp_components(min, max),
            self.z.clamp_components(min, max),
            self.w.clamp_components(min, max),
        )
    }
}

/// Clamp a scalar or each component of a vector to `[min, max]`
pub fn clamp<T: Clampable>(value: T, min: f32, max: f32) -> T {
    value.clamp_components(min, max)
}

/// Linear interpolation, `t = 0` yields `a`, `t = 1` yields `b`
pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    a + (b - a) * t
}

/// Unit-length copy of `v`; zero stays zero
pub fn normalize(v: Vector3) -> Vector3 {
    v.normalized()
}

/// Dot product
pub fn dot(a: Vector3, b: Vector3) -> f32 {
    a.dot(b)
}

/// Reflect `v` about the plane with normal `n` (`n` should be unit length)
pub fn reflect(v: Vector3, n: Vector3) -> Vector3 {
    v - n * (2.0 * v.dot(n))
}

/// Quaternion rotating `angle` radians around `axis`
pub fn angle_axis(angle: f32, axis: Vector3) -> Quat {
    let axis = axis.normalized();
    let (sin, cos) = (angle * 0.5).sin_cos();
    Quat::new(cos, axis.x * sin, axis.y * sin, axis.z * sin)
}

/// Convert RGB to HSV; every output channel lies in [0, 1]
pub fn rgb_to_hsv(rgb: Color3) -> Vector3 {
    let max = rgb.r.max(rgb.g).max(rgb.b);
    let min = rgb.r.min(rgb.g).min(rgb.b);
    let delta = max - min;

    let hue = if delta <= 0.0 {
        0.0
    } else if max == rgb.r {
        ((rgb.g - rgb.b) / delta).rem_euclid(6.0) / 6.0
    } else if max == rgb.g {
        ((rgb.b - rgb.r) / delta + 2.0) / 6.0
    } else {
        ((rgb.r - rgb.g) / delta + 4.0) / 6.0
    };
    let saturation = if max > 0.0 { delta / max } else { 0.0 };

    Vector3::new(hue, saturation, max)
}

/// Convert HSV (hue in [0, 1]) back to RGB
pub fn hsv_to_rgb(hsv: Vector3) -> Color3 {
    let (h, s, v) = (hsv.x.rem_euclid(1.0) * 6.0, hsv.y, hsv.z);
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as i32 % 6 {
        0 => Color3::new(v, t, p),
        1 => Color3::new(q, v, p),
        2 => Color3::new(p, v, t),
        3 => Color3::new(p, q, v),
        4 => Color3::new(t, p, v),
        _ => Color3::new(v, p, q),
    }
}

/// Remap `value` from `[in_min, in_max]` to `[out_min, out_max]`
///
/// A degenerate input range maps everything to `out_min`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

/// Degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Radians to degrees
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_clamp_is_idempotent() {
        let samples = [-10.0_f32, -0.5, 0.0, 0.3, 1.0, 7.5];
        for &value in &samples {
            let once = clamp(value, -1.0, 1.0);
            assert_eq!(clamp(once, -1.0, 1.0), once);
        }

        let v = Vector3::new(-5.0, 0.5, 5.0);
        let once = clamp(v, 0.0, 1.0);
        assert_eq!(once, Vector3::new(0.0, 0.5, 1.0));
        assert_eq!(clamp(once, 0.0, 1.0), once);
    }

    #[test]
    fn test_clamp_with_inverted_bounds_does_not_panic() {
        assert_eq!(clamp(0.5_f32, 1.0, 0.0), 1.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Vector2::new(0.0, 10.0);
        let b = Vector2::new(10.0, 20.0);

        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(2.0_f32, 4.0, 0.5), 3.0);
    }

    #[test]
    fn test_normalize_has_unit_length() {
        let inputs = [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-0.001, 0.0, 0.0),
            Vector3::new(1e4, -1e4, 3.0),
        ];
        for v in inputs {
            assert_relative_eq!(normalize(v).length(), 1.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_reflect_off_floor() {
        let reflected = reflect(Vector3::new(1.0, -1.0, 0.0), Vector3::Y);
        assert_relative_eq!(reflected, Vector3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_angle_axis_quarter_turn() {
        let q = angle_axis(PI / 2.0, Vector3::Y);
        assert_relative_eq!(q * Vector3::X, Vector3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_red_hsv_round_trip() {
        let red = Color3::new(1.0, 0.0, 0.0);
        let hsv = rgb_to_hsv(red);

        assert_relative_eq!(hsv, Vector3::new(0.0, 1.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(hsv_to_rgb(hsv), red, epsilon = EPSILON);
    }

    #[test]
    fn test_hsv_round_trip_grid() {
        let steps = [0.0_f32, 0.2, 0.45, 0.7, 1.0];
        for &r in &steps {
            for &g in &steps {
                for &b in &steps {
                    let c = Color3::new(r, g, b);
                    assert_relative_eq!(hsv_to_rgb(rgb_to_hsv(c)), c, epsilon = 1e-4);
                }
            }
        }
    }

    #[test]
    fn test_map_range() {
        assert_relative_eq!(map_range(5.0, 0.0, 10.0, 100.0, 200.0), 150.0);
        assert_relative_eq!(map_range(-1.0, -1.0, 1.0, 0.0, 1.0), 0.0);
        assert_eq!(map_range(3.0, 2.0, 2.0, 7.0, 9.0), 7.0);
    }
}
