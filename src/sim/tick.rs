//! Fixed timestep simulation tick
//!
//! One call advances the `Playing` phase by exactly one frame: an update pass
//! over every entity, one collision pass, then a mark-and-compact removal
//! pass. Collections are never mutated while they are being traversed.

use super::effects::collect_power_up;
use super::physics;
use super::state::{GameEvent, GamePhase, GameState, PowerUpKind, ScoreReason};

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held left
    pub move_left: bool,
    /// Held right
    pub move_right: bool,
    /// Confirm pressed this tick (space/enter)
    pub confirm: bool,
    /// Cancel pressed this tick (escape)
    pub cancel: bool,
    /// Character typed this tick
    pub text_char: Option<char>,
    /// Backspace pressed this tick
    pub backspace: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;
    let screen = state.screen();

    // --- UPDATE PASS ---
    state.paddle.update(input, screen);
    for ball in state.balls.iter_mut() {
        ball.update(screen);
    }
    for obstacle in state.obstacles.iter_mut() {
        obstacle.update();
    }
    for power_up in state.power_ups.iter_mut() {
        power_up.update();
    }

    // --- COLLISION PASS ---
    let mut paddle_hits = 0u64;
    let mut obstacle_hits = 0u64;
    let boost = state.tuning.obstacle_bounce_boost;
    let speed_cap = state.tuning.max_ball_speed;

    // Obstacles already past the far edge are gone this tick and can't be hit
    let expired: Vec<u32> = state
        .obstacles
        .iter()
        .filter(|o| o.is_off_screen(screen))
        .map(|o| o.id)
        .collect();

    for ball in state.balls.iter_mut() {
        if ball.check_paddle_collision(&state.paddle) {
            paddle_hits += 1;
        }
        for obstacle in state.obstacles.iter().filter(|o| !expired.contains(&o.id)) {
            if obstacle.check_ball_collision(ball, boost) {
                obstacle_hits += 1;
            }
        }
        if let Some(max_speed) = speed_cap {
            ball.vel = physics::clamp_speed(ball.vel, max_speed);
        }
    }

    let caught: Vec<(u32, PowerUpKind)> = state
        .power_ups
        .iter()
        .filter(|p| p.check_paddle_collision(&state.paddle))
        .map(|p| (p.id, p.kind))
        .collect();

    // --- REMOVAL PASS ---
    let lost: Vec<u32> = state
        .balls
        .iter()
        .filter(|b| b.is_out_of_bounds(screen))
        .map(|b| b.id)
        .collect();
    state.balls.retain(|b| !lost.contains(&b.id));

    state.obstacles.retain(|o| !expired.contains(&o.id));
    state
        .power_ups
        .retain(|p| !caught.iter().any(|(id, _)| *id == p.id) && !p.is_out_of_bounds(screen));

    // --- SCORING & EFFECTS ---
    for _ in 0..paddle_hits {
        state.award(state.tuning.paddle_hit_points, ScoreReason::PaddleHit);
    }
    for _ in 0..obstacle_hits {
        state.award(state.tuning.obstacle_hit_points, ScoreReason::ObstacleHit);
    }
    for id in &lost {
        log::debug!("Ball {} lost", id);
        state.emit(GameEvent::BallLost { id: *id });
    }
    // Effects land after compaction so the multiball cap counts live balls only
    for (_, kind) in caught {
        collect_power_up(state, kind);
    }

    // --- SPAWNING ---
    state.obstacle_timer += 1;
    if state.obstacle_timer >= state.obstacle_delay {
        state.spawn_obstacle();
        state.obstacle_timer = 0;
        // Obstacles come faster as the score climbs
        state.obstacle_delay = state.tuning.obstacle_delay_for_score(state.score);
    }

    state.power_up_timer += 1;
    if state.power_up_timer >= state.tuning.power_up_spawn_interval {
        state.spawn_power_up();
        state.power_up_timer = 0;
    }

    if state.balls.is_empty() {
        log::info!("Game over with score {} after {} ticks", state.score, state.time_ticks);
        state.phase = GamePhase::GameOver;
        state.emit(GameEvent::GameOver { score: state.score });
    }

    // Ensure deterministic ordering
    state.normalize_order();
}
