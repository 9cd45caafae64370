//! Power-up effects
//!
//! Paddle and ball effects share one countdown per entity. Applying any
//! effect restarts it; when it hits zero every effect on that entity reverts
//! to the base values at once.

use super::state::{BALL_COLOR, Ball, GameEvent, GameState, PADDLE_COLOR, Paddle, PowerUpKind, ScoreReason};
use crate::consts::{MAX_BALLS, POWER_UP_DURATION_TICKS};
use crate::tuning::Tuning;

impl Paddle {
    /// Apply a paddle power-up. Returns false for kinds the paddle ignores.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, tuning: &Tuning) -> bool {
        match kind {
            PowerUpKind::Speed => {
                self.speed = self.base_speed * tuning.speed_multiplier;
            }
            PowerUpKind::Size => {
                self.width = self.base_width * tuning.size_multiplier;
                // Grew to the right; pull back on screen
                self.clamp_to(tuning.screen);
            }
            PowerUpKind::Slow | PowerUpKind::Multiball | PowerUpKind::Antigravity => return false,
        }
        self.active.insert(kind);
        self.color = kind.color();
        self.power_up_ticks = POWER_UP_DURATION_TICKS;
        true
    }

    /// Count down active power-ups, reverting everything at zero
    pub fn tick_power_up(&mut self) {
        if self.power_up_ticks == 0 {
            return;
        }
        self.power_up_ticks -= 1;
        if self.power_up_ticks == 0 {
            self.width = self.base_width;
            self.speed = self.base_speed;
            self.color = PADDLE_COLOR;
            self.active.clear();
        }
    }
}

impl Ball {
    /// Apply a ball power-up. Returns false for kinds the ball ignores.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, tuning: &Tuning) -> bool {
        match kind {
            // One-time scale, not restored on expiry
            PowerUpKind::Slow => self.vel *= tuning.slow_factor,
            PowerUpKind::Antigravity => self.gravity = tuning.antigravity,
            PowerUpKind::Speed | PowerUpKind::Size | PowerUpKind::Multiball => return false,
        }
        self.active.insert(kind);
        self.color = kind.color();
        self.power_up_ticks = POWER_UP_DURATION_TICKS;
        true
    }

    /// Count down active power-ups, restoring gravity and color at zero
    pub fn tick_power_up(&mut self) {
        if self.power_up_ticks == 0 {
            return;
        }
        self.power_up_ticks -= 1;
        if self.power_up_ticks == 0 {
            self.gravity = self.base_gravity;
            self.color = BALL_COLOR;
            self.active.clear();
        }
    }
}

/// Dispatch a caught power-up to its targets and award the pickup bonus
pub fn collect_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Speed | PowerUpKind::Size => {
            state.paddle.apply_power_up(kind, &state.tuning);
        }
        PowerUpKind::Slow | PowerUpKind::Antigravity => {
            for ball in state.balls.iter_mut() {
                ball.apply_power_up(kind, &state.tuning);
            }
        }
        PowerUpKind::Multiball => {
            if state.balls.len() < MAX_BALLS {
                let pos = state.random_ball_position();
                state.spawn_ball(pos);
            } else {
                log::debug!("Multiball ignored, {} balls already in play", state.balls.len());
            }
        }
    }

    log::debug!("Collected {} power-up", kind.label());
    state.emit(GameEvent::PowerUpCollected { kind });
    state.award(state.tuning.power_up_points, ScoreReason::PowerUp);
}
