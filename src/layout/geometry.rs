// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Angle/radius helpers and quadratic-curve math.
//!
//! Angles are degrees in screen space (y grows downwards), so 270° points up.

use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `distance` away along `angle_deg`.
    pub fn offset_polar(self, angle_deg: f64, distance: f64) -> Self {
        let rad = deg_to_rad(angle_deg);
        Self { x: self.x + distance * rad.cos(), y: self.y + distance * rad.sin() }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Symmetric fan-out offset for sibling `index` of `count` (`(index - (count-1)/2) * gap`).
pub fn fan_offset(index: usize, count: usize, gap: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (index as f64 - (count as f64 - 1.0) / 2.0) * gap
}

/// Control point for a quadratic curve from `start` to `end` that bows by `bow` pixels.
///
/// The displacement is the segment direction rotated by +90° (`(-dy, dx)`), so every curve
/// bends in the same rotational sense. A zero-length segment yields the midpoint itself.
pub fn quadratic_control_point(start: Point, end: Point, bow: f64) -> Point {
    let delta = end - start;
    let len = match delta.length() {
        len if len > 0.0 => len,
        _ => 1.0,
    };
    let normal = Point::new(-delta.y / len * bow, delta.x / len * bow);
    start.midpoint(end) + normal
}

/// Point on a quadratic Bézier at parameter `t` in `[0, 1]`.
pub fn quadratic_point(start: Point, control: Point, end: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
        u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
    )
}

#[cfg(test)]
mod tests {
    use super::{fan_offset, quadratic_control_point, quadratic_point, Point};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn offset_polar_follows_screen_space_angles() {
        let origin = Point::new(100.0, 100.0);
        let up = origin.offset_polar(270.0, 10.0);
        let right = origin.offset_polar(0.0, 10.0);

        assert!(approx(up.x, 100.0) && approx(up.y, 90.0));
        assert!(approx(right.x, 110.0) && approx(right.y, 100.0));
    }

    #[test]
    fn fan_offset_is_symmetric_about_zero() {
        assert_eq!(fan_offset(0, 1, 100.0), 0.0);
        assert_eq!(fan_offset(0, 3, 100.0), -100.0);
        assert_eq!(fan_offset(2, 3, 100.0), 100.0);
        assert_eq!(fan_offset(1, 2, 100.0), 50.0);
    }

    #[test]
    fn control_point_bows_in_a_fixed_rotational_sense() {
        // Rightwards segment bows downwards (+y); leftwards bows upwards.
        let right = quadratic_control_point(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 80.0);
        let left = quadratic_control_point(Point::new(100.0, 0.0), Point::new(0.0, 0.0), 80.0);

        assert!(approx(right.x, 50.0) && approx(right.y, 80.0));
        assert!(approx(left.x, 50.0) && approx(left.y, -80.0));
    }

    #[test]
    fn control_point_survives_degenerate_segment() {
        let p = Point::new(5.0, 5.0);
        let control = quadratic_control_point(p, p, 80.0);
        assert!(control.is_finite());
    }

    #[test]
    fn quadratic_point_hits_endpoints() {
        let (a, c, b) = (Point::new(0.0, 0.0), Point::new(5.0, 9.0), Point::new(10.0, 0.0));
        assert_eq!(quadratic_point(a, c, b, 0.0), a);
        assert_eq!(quadratic_point(a, c, b, 1.0), b);
    }
}
