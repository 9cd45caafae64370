//! Bounce Master - a single-screen arcade bounce game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, entities, collisions, power-ups)
//! - `session`: Phase state machine around the simulation (game over, name entry, leaderboard)
//! - `leaderboard`: Ranked score storage collaborators (memory, file, REST proxy)
//! - `tuning`: Data-driven game balance
//! - `settings`: Runtime configuration from the environment

pub mod error;
pub mod leaderboard;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, LeaderboardError};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardLink};
pub use session::{Frame, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second, matches the original frame cap)
    pub const TICK_RATE: u32 = 60;

    /// Power-up effect duration (5 seconds at 60 Hz)
    pub const POWER_UP_DURATION_TICKS: u32 = 5 * TICK_RATE;

    /// Hard cap on simultaneously active balls
    pub const MAX_BALLS: usize = 3;

    /// Longest accepted player name
    pub const MAX_NAME_LEN: usize = 15;
    /// Name submitted when the player confirms an empty buffer
    pub const DEFAULT_PLAYER_NAME: &str = "Anonymous";

    /// Number of entries kept/fetched for the leaderboard
    pub const LEADERBOARD_SIZE: usize = 10;
}

/// An RGB color, as handed to the front-end
pub type Rgb = [u8; 3];

/// Palette shared by the entities
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = [255, 255, 255];
    pub const RED: Rgb = [255, 0, 0];
    pub const GREEN: Rgb = [0, 255, 0];
    pub const BLUE: Rgb = [0, 0, 255];
    pub const YELLOW: Rgb = [255, 255, 0];
    pub const PURPLE: Rgb = [128, 0, 128];
    pub const ORANGE: Rgb = [255, 165, 0];
    pub const CYAN: Rgb = [0, 255, 255];
}

/// Screen bounds the simulation plays inside (pixels, origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}
