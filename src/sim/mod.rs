//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` = one frame at 60 Hz)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, input or leaderboard dependencies

pub mod collision;
pub mod effects;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Axis, paddle_bounce_velocity, resolve_axis};
pub use effects::collect_power_up;
pub use physics::{Rect, integrate, reflect_horizontal, reflect_vertical};
pub use state::{
    Ball, GameEvent, GamePhase, GameState, Obstacle, Paddle, PowerUp, PowerUpKind, ScoreReason,
    BALL_COLOR, OBSTACLE_COLOR, PADDLE_COLOR,
};
pub use tick::{TickInput, tick};
