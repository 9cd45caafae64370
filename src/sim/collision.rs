//! Collision detection and response
//!
//! Everything is axis-aligned: balls and power-ups are tested by their
//! bounding squares against the paddle and obstacle rectangles.

use std::f32::consts::FRAC_PI_3;

use glam::Vec2;

use super::physics::{self, Rect};
use super::state::{Ball, Obstacle, Paddle, PowerUp};

/// Steepest deflection off the paddle edge (60 degrees)
pub const MAX_BOUNCE_ANGLE: f32 = FRAC_PI_3;

/// Which velocity component an obstacle hit reverses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Outgoing paddle velocity for a hit at `offset` (-1 right edge .. 1 left edge)
///
/// Speed magnitude is kept; the ball always leaves upward.
pub fn paddle_bounce_velocity(vel: Vec2, offset: f32) -> Vec2 {
    let angle = offset.clamp(-1.0, 1.0) * MAX_BOUNCE_ANGLE;
    let speed = vel.length();
    Vec2::new(-speed * angle.sin(), -speed * angle.cos())
}

/// Pick the axis of least penetration between a ball box and an obstacle
pub fn resolve_axis(ball: &Rect, obstacle: &Rect) -> Axis {
    let overlap_left = ball.right() - obstacle.x;
    let overlap_right = obstacle.right() - ball.x;
    let overlap_top = ball.bottom() - obstacle.y;
    let overlap_bottom = obstacle.bottom() - ball.y;

    let min_horizontal = overlap_left.min(overlap_right);
    let min_vertical = overlap_top.min(overlap_bottom);

    // Ties go horizontal
    if min_horizontal <= min_vertical {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

impl Ball {
    /// Bounce off the paddle top. Returns true on a hit.
    pub fn check_paddle_collision(&mut self, paddle: &Paddle) -> bool {
        let vertical_hit =
            self.pos.y + self.radius >= paddle.pos.y && self.pos.y - self.radius <= paddle.pos.y + paddle.height;
        let horizontal_hit = self.pos.x >= paddle.pos.x && self.pos.x <= paddle.pos.x + paddle.width;
        if !(vertical_hit && horizontal_hit) {
            return false;
        }

        let offset = (paddle.center_x() - self.pos.x) / (paddle.width / 2.0);
        self.vel = paddle_bounce_velocity(self.vel, offset);

        // Sit on top of the paddle so the next tick doesn't re-hit from inside
        self.pos.y = paddle.pos.y - self.radius;
        true
    }
}

impl Obstacle {
    /// Reverse and boost the ball along the shallower overlap axis.
    /// Returns true on a hit.
    pub fn check_ball_collision(&self, ball: &mut Ball, boost: f32) -> bool {
        let ball_box = ball.bounds();
        let rect = self.rect();
        if !physics::rect_overlap(&ball_box, &rect) {
            return false;
        }

        match resolve_axis(&ball_box, &rect) {
            Axis::Horizontal => ball.vel.x *= -boost,
            Axis::Vertical => ball.vel.y *= -boost,
        }
        true
    }
}

impl PowerUp {
    /// Caught when its bounding square touches the paddle
    pub fn check_paddle_collision(&self, paddle: &Paddle) -> bool {
        physics::rect_overlap(&self.bounds(), &paddle.rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PowerUpKind;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn wide_paddle() -> Paddle {
        let tuning = Tuning {
            paddle_width: 200.0,
            ..Default::default()
        };
        Paddle::new(&tuning)
    }

    fn obstacle_at(x: f32, y: f32, w: f32, h: f32) -> Obstacle {
        Obstacle {
            id: 1,
            pos: Vec2::new(x, y),
            width: w,
            height: h,
            speed: 3.0,
            direction: 1.0,
        }
    }

    #[test]
    fn test_dead_center_hit_goes_straight_up() {
        let paddle = wide_paddle();
        let mut ball = Ball::new(1, Vec2::new(paddle.center_x(), 540.0), Vec2::new(0.0, 5.0), 15.0, 0.2);
        assert!(ball.check_paddle_collision(&paddle));
        assert_eq!(ball.vel.x, 0.0);
        assert_eq!(ball.vel.y, -5.0);
        assert_eq!(ball.pos.y, paddle.pos.y - 15.0);
    }

    #[test]
    fn test_left_edge_hit_deflects_left() {
        let paddle = wide_paddle();
        let mut ball = Ball::new(1, Vec2::new(paddle.pos.x, 545.0), Vec2::new(3.0, 4.0), 15.0, 0.2);
        assert!(ball.check_paddle_collision(&paddle));
        // Offset +1 -> 60 degrees to the left
        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.y < 0.0);
        assert!((ball.vel.x + 5.0 * MAX_BOUNCE_ANGLE.sin()).abs() < 1e-4);
        assert!((ball.vel.y + 5.0 * MAX_BOUNCE_ANGLE.cos()).abs() < 1e-4);
    }

    #[test]
    fn test_paddle_miss_outside_span_or_band() {
        let paddle = wide_paddle();
        let mut beside = Ball::new(1, Vec2::new(paddle.pos.x - 1.0, 545.0), Vec2::new(0.0, 5.0), 15.0, 0.2);
        assert!(!beside.check_paddle_collision(&paddle));
        assert_eq!(beside.vel, Vec2::new(0.0, 5.0));

        let mut above = Ball::new(2, Vec2::new(paddle.center_x(), 534.0), Vec2::new(0.0, 5.0), 15.0, 0.2);
        assert!(!above.check_paddle_collision(&paddle));
    }

    #[test]
    fn test_resolve_axis_picks_shallow_side() {
        // Ball box barely poking into the left side
        let ball = Rect::new(95.0, 110.0, 10.0, 10.0);
        let obstacle = Rect::new(100.0, 100.0, 50.0, 30.0);
        assert_eq!(resolve_axis(&ball, &obstacle), Axis::Horizontal);

        // Ball box barely poking into the top
        let ball = Rect::new(120.0, 92.0, 10.0, 10.0);
        assert_eq!(resolve_axis(&ball, &obstacle), Axis::Vertical);
    }

    #[test]
    fn test_obstacle_side_hit_reverses_vx_with_boost() {
        let obstacle = obstacle_at(100.0, 100.0, 50.0, 30.0);
        let mut ball = Ball::new(1, Vec2::new(88.0, 115.0), Vec2::new(4.0, 1.0), 15.0, 0.2);
        assert!(obstacle.check_ball_collision(&mut ball, 1.1));
        assert!((ball.vel.x + 4.4).abs() < 1e-5);
        assert_eq!(ball.vel.y, 1.0);
    }

    #[test]
    fn test_obstacle_top_hit_reverses_vy_with_boost() {
        let obstacle = obstacle_at(100.0, 100.0, 80.0, 30.0);
        let mut ball = Ball::new(1, Vec2::new(140.0, 88.0), Vec2::new(1.0, 5.0), 15.0, 0.2);
        assert!(obstacle.check_ball_collision(&mut ball, 1.1));
        assert_eq!(ball.vel.x, 1.0);
        assert!((ball.vel.y + 5.5).abs() < 1e-5);
    }

    #[test]
    fn test_repeated_obstacle_hits_compound_speed() {
        let obstacle = obstacle_at(100.0, 100.0, 80.0, 30.0);
        let mut ball = Ball::new(1, Vec2::new(140.0, 88.0), Vec2::new(0.0, 5.0), 15.0, 0.2);
        for _ in 0..10 {
            assert!(obstacle.check_ball_collision(&mut ball, 1.1));
        }
        assert!(ball.speed() > 5.0 * 2.5);
    }

    #[test]
    fn test_power_up_caught_by_paddle() {
        let paddle = wide_paddle();
        let mut power_up = PowerUp {
            id: 1,
            pos: Vec2::new(paddle.center_x(), paddle.pos.y - 20.0),
            speed: 3.0,
            radius: 15.0,
            kind: PowerUpKind::Size,
        };
        assert!(!power_up.check_paddle_collision(&paddle));
        power_up.update();
        power_up.update();
        assert!(power_up.check_paddle_collision(&paddle));
    }

    proptest! {
        #[test]
        fn prop_paddle_bounce_preserves_speed(
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            offset in -1.0f32..=1.0,
        ) {
            let before = Vec2::new(vx, vy).length();
            let after = paddle_bounce_velocity(Vec2::new(vx, vy), offset);
            prop_assert!((after.length() - before).abs() <= 1e-3 * before.max(1.0));
            prop_assert!(after.y <= 0.0);
        }

        #[test]
        fn prop_obstacle_hit_iff_boxes_overlap(
            bx in 0.0f32..300.0,
            by in 0.0f32..300.0,
            ox in 50.0f32..250.0,
            oy in 50.0f32..250.0,
            w in 30.0f32..80.0,
            h in 10.0f32..30.0,
        ) {
            let obstacle = obstacle_at(ox, oy, w, h);
            let mut ball = Ball::new(1, Vec2::new(bx, by), Vec2::new(3.0, 4.0), 15.0, 0.2);
            let overlapping = physics::rect_overlap(&ball.bounds(), &obstacle.rect());

            let hit = obstacle.check_ball_collision(&mut ball, 1.1);
            prop_assert_eq!(hit, overlapping);

            // Exactly one component flips on a hit, none otherwise
            let flipped_x = ball.vel.x < 0.0;
            let flipped_y = ball.vel.y < 0.0;
            if hit {
                prop_assert!(flipped_x != flipped_y);
            } else {
                prop_assert!(!flipped_x && !flipped_y);
            }
        }
    }
}
