//! Game state and core simulation types
//!
//! Every entity is owned by [`GameState`] for the lifetime of one session and
//! addressed by a stable id. Nothing outlives a reset.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::{self, Rect};
use super::tick::TickInput;
use crate::tuning::Tuning;
use crate::{Rgb, Screen, palette};

/// Top-level phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Last ball lost, waiting for confirm
    GameOver,
    /// Typing a name for the leaderboard
    EnterName,
    /// Showing the fetched standings
    ShowLeaderboard,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Faster paddle
    Speed,
    /// Wider paddle
    Size,
    /// One-time slowdown of every ball
    Slow,
    /// Extra ball (up to the cap)
    Multiball,
    /// Balls drift upward for a while
    Antigravity,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Speed,
        PowerUpKind::Size,
        PowerUpKind::Slow,
        PowerUpKind::Multiball,
        PowerUpKind::Antigravity,
    ];

    /// Pick a kind uniformly at random
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn color(&self) -> Rgb {
        match self {
            PowerUpKind::Speed => palette::YELLOW,
            PowerUpKind::Size => palette::ORANGE,
            PowerUpKind::Slow => palette::CYAN,
            PowerUpKind::Multiball => palette::WHITE,
            PowerUpKind::Antigravity => palette::PURPLE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "Speed",
            PowerUpKind::Size => "Size",
            PowerUpKind::Slow => "Slow",
            PowerUpKind::Multiball => "Multiball",
            PowerUpKind::Antigravity => "Antigravity",
        }
    }
}

/// Why points were awarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreReason {
    PaddleHit,
    ObstacleHit,
    PowerUp,
}

/// Events emitted by the simulation for the host to drain each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score changed by `points`
    Scored { points: u64, reason: ScoreReason },
    /// A ball fell past the bottom edge
    BallLost { id: u32 },
    /// The paddle caught a power-up
    PowerUpCollected { kind: PowerUpKind },
    /// The last ball was lost
    GameOver { score: u64 },
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub base_width: f32,
    pub base_speed: f32,
    /// Power-ups currently modifying the paddle
    pub active: BTreeSet<PowerUpKind>,
    /// Ticks until active power-ups wear off
    pub power_up_ticks: u32,
    pub color: Rgb,
}

/// Paddle color with no power-up active
pub const PADDLE_COLOR: Rgb = palette::BLUE;

impl Paddle {
    /// Paddle centered horizontally on its resting line
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                tuning.screen.width / 2.0 - tuning.paddle_width / 2.0,
                tuning.paddle_y(),
            ),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            speed: tuning.paddle_speed,
            base_width: tuning.paddle_width,
            base_speed: tuning.paddle_speed,
            active: BTreeSet::new(),
            power_up_ticks: 0,
            color: PADDLE_COLOR,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Keep the paddle fully on screen
    pub fn clamp_to(&mut self, screen: Screen) {
        let max_x = (screen.width - self.width).max(0.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
    }

    /// Move by the held direction, then age power-ups
    pub fn update(&mut self, input: &TickInput, screen: Screen) {
        if input.move_left {
            self.pos.x -= self.speed;
        }
        if input.move_right {
            self.pos.x += self.speed;
        }
        self.clamp_to(screen);
        self.tick_power_up();
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Per-tick downward acceleration (negative under antigravity)
    pub gravity: f32,
    pub base_gravity: f32,
    pub active: BTreeSet<PowerUpKind>,
    pub power_up_ticks: u32,
    pub color: Rgb,
}

/// Ball color with no power-up active
pub const BALL_COLOR: Rgb = palette::RED;

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, gravity: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
            gravity,
            base_gravity: gravity,
            active: BTreeSet::new(),
            power_up_ticks: 0,
            color: BALL_COLOR,
        }
    }

    /// Ball at `pos` heading up with a random horizontal launch speed
    pub fn launch(id: u32, pos: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let vx = match tuning.ball_launch_vx.len() {
            0 => 0.0,
            n => tuning.ball_launch_vx[rng.random_range(0..n)],
        };
        Self::new(
            id,
            pos,
            Vec2::new(vx, tuning.ball_launch_vy),
            tuning.ball_radius,
            tuning.ball_gravity,
        )
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn bounds(&self) -> Rect {
        physics::circle_bounds(self.pos, self.radius)
    }

    /// Age power-ups, fall, and bounce off the walls and ceiling
    pub fn update(&mut self, screen: Screen) {
        self.tick_power_up();

        physics::integrate(&mut self.pos, &mut self.vel, self.gravity);

        // Side walls
        if self.pos.x <= self.radius || self.pos.x >= screen.width - self.radius {
            physics::reflect_horizontal(&mut self.vel);
            self.pos.x = self
                .pos
                .x
                .clamp(self.radius, (screen.width - self.radius).max(self.radius));
        }

        // Ceiling
        if self.pos.y <= self.radius {
            physics::reflect_vertical(&mut self.vel);
            self.pos.y = self.radius;
        }
    }

    /// Fell below the bottom edge by more than its radius
    pub fn is_out_of_bounds(&self, screen: Screen) -> bool {
        self.pos.y > screen.height + self.radius
    }
}

/// Obstacle color
pub const OBSTACLE_COLOR: Rgb = palette::GREEN;

/// A rectangle sliding across the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
}

impl Obstacle {
    /// New obstacle just off a random side edge, heading inward
    pub fn spawn(id: u32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let width = pick(rng, tuning.obstacle_width);
        let height = pick(rng, tuning.obstacle_height);
        let speed = pick(rng, tuning.obstacle_speed);

        let top = tuning.obstacle_top_margin;
        let bottom = (tuning.screen.height as u32).saturating_sub(tuning.obstacle_bottom_margin);
        let y = pick(rng, (top, bottom.max(top)));

        let from_left = rng.random_bool(0.5);
        let (x, direction) = if from_left {
            (-width, 1.0)
        } else {
            (tuning.screen.width, -1.0)
        };

        Self {
            id,
            pos: Vec2::new(x, y),
            width,
            height,
            speed,
            direction,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn update(&mut self) {
        self.pos.x += self.speed * self.direction;
    }

    /// Fully past the far edge in its direction of travel
    pub fn is_off_screen(&self, screen: Screen) -> bool {
        (self.direction > 0.0 && self.pos.x > screen.width)
            || (self.direction < 0.0 && self.pos.x + self.width < 0.0)
    }
}

/// A falling collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    /// Constant downward speed
    pub speed: f32,
    pub radius: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    /// New power-up of random kind just above the top edge
    pub fn spawn(id: u32, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let radius = tuning.power_up_radius;
        let max_x = (tuning.screen.width - radius).max(radius);
        Self {
            id,
            pos: Vec2::new(rng.random_range(radius..=max_x), -radius),
            speed: tuning.power_up_speed,
            radius,
            kind: PowerUpKind::random(rng),
        }
    }

    pub fn bounds(&self) -> Rect {
        physics::circle_bounds(self.pos, self.radius)
    }

    pub fn update(&mut self) {
        self.pos.y += self.speed;
    }

    pub fn is_out_of_bounds(&self, screen: Screen) -> bool {
        self.pos.y > screen.height + self.radius
    }
}

/// Uniform integer pick from an inclusive range, tolerant of swapped bounds
fn pick(rng: &mut impl Rng, (a, b): (u32, u32)) -> f32 {
    rng.random_range(a.min(b)..=a.max(b)) as f32
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    /// Active obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Falling power-ups (sorted by id)
    pub power_ups: Vec<PowerUp>,
    /// Ticks since the last obstacle spawn
    pub obstacle_timer: u32,
    /// Current obstacle spawn delay (shrinks with score)
    pub obstacle_delay: u32,
    /// Ticks since the last power-up spawn
    pub power_up_timer: u32,
    /// Events not yet drained by the host
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh session: centered paddle, one ball at screen center
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            paddle: Paddle::new(&tuning),
            balls: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            obstacle_timer: 0,
            obstacle_delay: tuning.obstacle_spawn_delay,
            power_up_timer: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        let center = Vec2::new(state.tuning.screen.width / 2.0, state.tuning.screen.height / 2.0);
        state.spawn_ball(center);

        state
    }

    pub fn screen(&self) -> Screen {
        self.tuning.screen
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Launch a new ball from `pos`
    pub fn spawn_ball(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let ball = Ball::launch(id, pos, &self.tuning, &mut self.rng);
        log::debug!("Spawned ball {} at ({:.0}, {:.0})", id, pos.x, pos.y);
        self.balls.push(ball);
        id
    }

    /// Random spawn point for an extra ball, in the upper-middle of the field
    pub fn random_ball_position(&mut self) -> Vec2 {
        let screen = self.tuning.screen;
        Vec2::new(
            self.rng.random_range(screen.width * 0.25..=screen.width * 0.75),
            self.rng.random_range(screen.height * 0.25..=screen.height * 0.5),
        )
    }

    pub fn spawn_obstacle(&mut self) {
        let id = self.next_entity_id();
        let obstacle = Obstacle::spawn(id, &self.tuning, &mut self.rng);
        log::debug!(
            "Spawned obstacle {} ({}x{} at y={}, dir {})",
            id,
            obstacle.width,
            obstacle.height,
            obstacle.pos.y,
            obstacle.direction
        );
        self.obstacles.push(obstacle);
    }

    pub fn spawn_power_up(&mut self) {
        let id = self.next_entity_id();
        let power_up = PowerUp::spawn(id, &self.tuning, &mut self.rng);
        log::debug!("Spawned {} power-up {}", power_up.kind.label(), id);
        self.power_ups.push(power_up);
    }

    /// Add points and record why
    pub fn award(&mut self, points: u64, reason: ScoreReason) {
        self.score += points;
        self.emit(GameEvent::Scored { points, reason });
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.obstacles.sort_by_key(|o| o.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
