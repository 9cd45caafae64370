//! Motion primitives
//!
//! Everything here is pure: no entity knowledge, just vectors and boxes.

use glam::Vec2;

/// Apply one tick of gravity, then move
#[inline]
pub fn integrate(pos: &mut Vec2, vel: &mut Vec2, gravity: f32) {
    vel.y += gravity;
    *pos += *vel;
}

/// Bounce off a vertical wall
#[inline]
pub fn reflect_horizontal(vel: &mut Vec2) {
    vel.x = -vel.x;
}

/// Bounce off the ceiling
#[inline]
pub fn reflect_vertical(vel: &mut Vec2) {
    vel.y = -vel.y;
}

/// Axis-aligned rectangle (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Bounding square of a circle
#[inline]
pub fn circle_bounds(center: Vec2, radius: f32) -> Rect {
    Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
}

/// Strict overlap test (touching edges do not count)
#[inline]
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    a.right() > b.x && a.x < b.right() && a.bottom() > b.y && a.y < b.bottom()
}

/// Clamp a velocity's magnitude (direction kept)
pub fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    if vel.length() > max_speed {
        vel.normalize_or_zero() * max_speed
    } else {
        vel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_applies_gravity_before_moving() {
        let mut pos = Vec2::new(10.0, 10.0);
        let mut vel = Vec2::new(2.0, -5.0);
        integrate(&mut pos, &mut vel, 0.5);
        assert_eq!(vel, Vec2::new(2.0, -4.5));
        assert_eq!(pos, Vec2::new(12.0, 5.5));
    }

    #[test]
    fn test_reflections_keep_magnitude() {
        let mut vel = Vec2::new(3.0, -4.0);
        reflect_horizontal(&mut vel);
        assert_eq!(vel, Vec2::new(-3.0, -4.0));
        reflect_vertical(&mut vel);
        assert_eq!(vel, Vec2::new(-3.0, 4.0));
        assert!((vel.length() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(9.0, 9.0, 10.0, 10.0);
        assert!(!rect_overlap(&a, &touching));
        assert!(rect_overlap(&a, &inside));
        assert!(rect_overlap(&inside, &a));
    }

    #[test]
    fn test_circle_bounds() {
        let r = circle_bounds(Vec2::new(50.0, 40.0), 5.0);
        assert_eq!(r, Rect::new(45.0, 35.0, 10.0, 10.0));
        assert_eq!(r.center(), Vec2::new(50.0, 40.0));
    }

    #[test]
    fn test_clamp_speed() {
        let v = clamp_speed(Vec2::new(30.0, 40.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
        assert_eq!(clamp_speed(Vec2::new(3.0, 4.0), 10.0), Vec2::new(3.0, 4.0));
    }
}
