//! Session state machine
//!
//! Wraps the simulation with the out-of-game phases:
//! `Playing → GameOver → EnterName → ShowLeaderboard → Playing`.
//! Name entry is skipped when no leaderboard is connected or the score is
//! zero. Leaderboard round trips are requested once and polled every tick,
//! so a slow backend never blocks the frame loop.

use glam::Vec2;

use crate::consts::{DEFAULT_PLAYER_NAME, MAX_NAME_LEN};
use crate::leaderboard::{LeaderboardEntry, LeaderboardEvent, LeaderboardLink};
use crate::sim::{
    Ball, GameEvent, GamePhase, GameState, OBSTACLE_COLOR, Obstacle, Paddle, PowerUp, PowerUpKind, TickInput, tick,
};
use crate::tuning::Tuning;
use crate::Rgb;

/// Derive the next session seed from the previous one
fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407)
}

/// One game session plus everything around it
pub struct Session {
    state: GameState,
    leaderboard: Option<LeaderboardLink>,
    /// Name typed so far
    name: String,
    /// Standings from the last successful submit
    standings: Vec<LeaderboardEntry>,
    /// A submit is in flight
    submitting: bool,
    /// Games started, including the current one
    games: u32,
}

impl Session {
    /// Start playing. Pass `None` for leaderboard-disabled mode.
    pub fn new(seed: u64, tuning: Tuning, leaderboard: Option<LeaderboardLink>) -> Self {
        log::info!(
            "Session started (seed {}, leaderboard {})",
            seed,
            if leaderboard.is_some() { "on" } else { "off" }
        );
        Self {
            state: GameState::new(seed, tuning),
            leaderboard,
            name: String::new(),
            standings: Vec::new(),
            submitting: false,
            games: 1,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn leaderboard_enabled(&self) -> bool {
        self.leaderboard.is_some()
    }

    pub fn player_name(&self) -> &str {
        &self.name
    }

    pub fn standings(&self) -> &[LeaderboardEntry] {
        &self.standings
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn games_played(&self) -> u32 {
        self.games
    }

    /// Events emitted by the simulation since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &TickInput) {
        match self.state.phase {
            GamePhase::Playing => tick(&mut self.state, input),
            GamePhase::GameOver => {
                if input.confirm {
                    self.leave_game_over();
                }
            }
            GamePhase::EnterName => self.enter_name(input),
            GamePhase::ShowLeaderboard => {
                if input.confirm {
                    self.restart();
                }
            }
        }

        self.poll_leaderboard();
    }

    /// Throw the current game away and start a fresh one
    pub fn restart(&mut self) {
        let seed = next_seed(self.state.seed);
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning);
        self.name.clear();
        self.standings.clear();
        self.submitting = false;
        if let Some(link) = self.leaderboard.as_mut() {
            link.discard_pending();
        }
        self.games += 1;
        log::info!("New game #{} (seed {})", self.games, seed);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        log::info!("{:?} -> {:?}", self.state.phase, phase);
        self.state.phase = phase;
    }

    fn leave_game_over(&mut self) {
        if self.leaderboard.is_some() && self.state.score > 0 {
            self.name.clear();
            self.set_phase(GamePhase::EnterName);
        } else {
            self.restart();
        }
    }

    fn enter_name(&mut self, input: &TickInput) {
        // Typing is frozen while the submit is in flight
        if self.submitting {
            return;
        }

        if input.cancel {
            log::info!("Name entry cancelled, score {} not submitted", self.state.score);
            self.restart();
            return;
        }

        if input.backspace {
            self.name.pop();
        }

        if let Some(c) = input.text_char {
            if (c.is_alphanumeric() || c == ' ') && self.name.chars().count() < MAX_NAME_LEN {
                self.name.push(c);
            }
        }

        if input.confirm {
            let name = match self.name.trim() {
                "" => DEFAULT_PLAYER_NAME.to_string(),
                trimmed => trimmed.to_string(),
            };
            let score = self.state.score;
            if let Some(link) = self.leaderboard.as_mut() {
                log::info!("Submitting {} for {}", score, name);
                self.submitting = true;
                link.request(&name, score);
            } else {
                self.restart();
            }
        }
    }

    fn poll_leaderboard(&mut self) {
        if !self.submitting {
            return;
        }
        let Some(event) = self.leaderboard.as_mut().and_then(|link| link.poll()) else {
            return;
        };
        self.submitting = false;

        match event {
            LeaderboardEvent::Ranked(entries) => {
                self.standings = entries;
                self.set_phase(GamePhase::ShowLeaderboard);
            }
            LeaderboardEvent::Failed(reason) => {
                // Score is dropped, not retried
                log::warn!("Leaderboard unavailable ({}); score {} discarded", reason, self.state.score);
                self.restart();
            }
        }
    }

    /// Everything the front-end needs to draw this frame
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            phase: self.state.phase,
            score: self.state.score,
            paddle: &self.state.paddle,
            balls: &self.state.balls,
            obstacles: &self.state.obstacles,
            power_ups: &self.state.power_ups,
            player_name: &self.name,
            submitting: self.submitting,
            standings: &self.standings,
            leaderboard_enabled: self.leaderboard.is_some(),
        }
    }
}

/// Read-only view of a session for presentation
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub obstacles: &'a [Obstacle],
    pub power_ups: &'a [PowerUp],
    pub player_name: &'a str,
    pub submitting: bool,
    pub standings: &'a [LeaderboardEntry],
    pub leaderboard_enabled: bool,
}

/// Drawable shape, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Rect { pos: Vec2, size: Vec2 },
    Circle { center: Vec2, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub shape: Shape,
    pub color: Rgb,
}

impl Frame<'_> {
    /// Power-ups currently boosting the paddle
    pub fn paddle_power_ups(&self) -> Vec<PowerUpKind> {
        self.paddle.active.iter().copied().collect()
    }

    /// Every live entity as a colored shape (paddle, obstacles, power-ups, balls)
    pub fn sprites(&self) -> Vec<Sprite> {
        let mut sprites =
            Vec::with_capacity(1 + self.obstacles.len() + self.power_ups.len() + self.balls.len());

        sprites.push(Sprite {
            shape: Shape::Rect {
                pos: self.paddle.pos,
                size: Vec2::new(self.paddle.width, self.paddle.height),
            },
            color: self.paddle.color,
        });
        sprites.extend(self.obstacles.iter().map(|o| Sprite {
            shape: Shape::Rect {
                pos: o.pos,
                size: Vec2::new(o.width, o.height),
            },
            color: OBSTACLE_COLOR,
        }));
        sprites.extend(self.power_ups.iter().map(|p| Sprite {
            shape: Shape::Circle {
                center: p.pos,
                radius: p.radius,
            },
            color: p.kind.color(),
        }));
        sprites.extend(self.balls.iter().map(|b| Sprite {
            shape: Shape::Circle {
                center: b.pos,
                radius: b.radius,
            },
            color: b.color,
        }));

        sprites
    }
}
