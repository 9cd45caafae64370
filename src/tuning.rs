//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON file can rebalance the game
//! without touching the simulation. Missing fields fall back to the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Screen;
use crate::error::ConfigError;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield bounds
    pub screen: Screen,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    /// Distance from the paddle top to the bottom of the screen
    pub paddle_floor_offset: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Horizontal launch speeds, one is picked at random
    pub ball_launch_vx: Vec<f32>,
    pub ball_launch_vy: f32,
    pub ball_gravity: f32,
    /// Gravity while antigravity is active (negative = upward drift)
    pub antigravity: f32,
    /// Optional speed cap for the obstacle ramp (None keeps it uncapped)
    pub max_ball_speed: Option<f32>,

    // === Obstacles ===
    pub obstacle_width: (u32, u32),
    pub obstacle_height: (u32, u32),
    pub obstacle_speed: (u32, u32),
    /// Vertical band is [top_margin, screen.height - bottom_margin]
    pub obstacle_top_margin: u32,
    pub obstacle_bottom_margin: u32,
    pub obstacle_bounce_boost: f32,
    /// Initial and minimum spawn delay in ticks
    pub obstacle_spawn_delay: u32,
    pub obstacle_min_spawn_delay: u32,
    /// Score points that shave one tick off the spawn delay
    pub obstacle_score_per_tick: u64,

    // === Power-ups ===
    pub power_up_radius: f32,
    pub power_up_speed: f32,
    pub power_up_spawn_interval: u32,
    pub speed_multiplier: f32,
    pub size_multiplier: f32,
    pub slow_factor: f32,

    // === Scoring ===
    pub paddle_hit_points: u64,
    pub obstacle_hit_points: u64,
    pub power_up_points: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen: Screen::default(),

            paddle_width: 100.0,
            paddle_height: 20.0,
            paddle_speed: 8.0,
            paddle_floor_offset: 50.0,

            ball_radius: 15.0,
            ball_launch_vx: vec![-4.0, -3.0, 3.0, 4.0],
            ball_launch_vy: -5.0,
            ball_gravity: 0.2,
            antigravity: -0.1,
            max_ball_speed: None,

            obstacle_width: (30, 80),
            obstacle_height: (10, 30),
            obstacle_speed: (3, 7),
            obstacle_top_margin: 100,
            obstacle_bottom_margin: 200,
            obstacle_bounce_boost: 1.1,
            obstacle_spawn_delay: 120,
            obstacle_min_spawn_delay: 60,
            obstacle_score_per_tick: 100,

            power_up_radius: 15.0,
            power_up_speed: 3.0,
            power_up_spawn_interval: 600,
            speed_multiplier: 1.5,
            size_multiplier: 1.5,
            slow_factor: 0.6,

            paddle_hit_points: 10,
            obstacle_hit_points: 5,
            power_up_points: 20,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let tuning: Tuning = serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tuning.validate().map_err(|reason| ConfigError::Invalid {
            path: path.display().to_string(),
            reason,
        })?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject geometry the simulation can't spawn entities into
    pub fn validate(&self) -> Result<(), String> {
        let Screen { width, height } = self.screen;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(format!("screen must be positive and finite, got {}x{}", width, height));
        }
        for (name, radius) in [("ball_radius", self.ball_radius), ("power_up_radius", self.power_up_radius)] {
            if !(radius.is_finite() && radius >= 0.0) {
                return Err(format!("{} must be finite and non-negative, got {}", name, radius));
            }
        }
        Ok(())
    }

    /// Obstacle spawn delay for the current score (shrinks toward the floor)
    pub fn obstacle_delay_for_score(&self, score: u64) -> u32 {
        let shaved = score / self.obstacle_score_per_tick.max(1);
        let delay = u64::from(self.obstacle_spawn_delay).saturating_sub(shaved);
        delay.max(u64::from(self.obstacle_min_spawn_delay)) as u32
    }

    /// Vertical line the paddle's top edge rests on
    pub fn paddle_y(&self) -> f32 {
        self.screen.height - self.paddle_floor_offset
    }
}
