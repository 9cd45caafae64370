//! Bounce Master entry point
//!
//! Headless runner: plays the game with a simple autopilot at the fixed tick
//! rate, logs what happens and submits the final score to the configured
//! leaderboard. Windowed front-ends drive `Session` the same way.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bounce_master::consts::TICK_RATE;
use bounce_master::sim::{GameEvent, GamePhase, TickInput};
use bounce_master::{Session, Settings};

/// Name the autopilot signs its scores with
const AUTOPILOT_NAME: &str = "Autopilot";

/// Longest wait for a leaderboard round trip (submit and fetch may each
/// take a full request timeout)
const LEADERBOARD_WAIT: Duration = Duration::from_secs(25);

fn main() {
    env_logger::init();
    log::info!("Bounce Master (headless) starting...");

    let settings = Settings::load_or_default();
    let tuning = settings.load_tuning();
    let leaderboard = settings.connect_leaderboard();

    let seed = settings.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let mut session = Session::new(seed, tuning, leaderboard);
    let mut best = 0;

    for tick in 0..settings.demo_ticks {
        let input = autopilot(&session);
        session.tick(&input);

        for event in session.drain_events() {
            match event {
                GameEvent::PowerUpCollected { kind } => log::info!("Tick {}: {} collected", tick, kind.label()),
                GameEvent::BallLost { id } => log::debug!("Tick {}: ball {} lost", tick, id),
                GameEvent::GameOver { score } => log::info!("Tick {}: game over, score {}", tick, score),
                GameEvent::Scored { .. } => {}
            }
        }

        if session.phase() == GamePhase::GameOver {
            best = best.max(session.score());
            finish(&mut session);
        }

        if tick > 0 && tick % (10 * TICK_RATE as u64) == 0 && session.phase() == GamePhase::Playing {
            log::info!(
                "Tick {}: score {}, {} ball(s), {} obstacle(s)",
                tick,
                session.score(),
                session.state().balls.len(),
                session.state().obstacles.len()
            );
        }
    }

    best = best.max(session.score());
    println!(
        "Played {} game(s) over {} ticks, best score {}",
        session.games_played(),
        settings.demo_ticks,
        best
    );
}

/// Steer the paddle under the lowest falling ball
fn autopilot(session: &Session) -> TickInput {
    let state = session.state();
    let paddle_x = state.paddle.center_x();
    let target = state
        .balls
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|ball| ball.pos.x);

    let Some(target) = target else {
        return TickInput::default();
    };

    // Dead zone keeps the paddle from jittering
    let dead_zone = state.paddle.width / 4.0;
    TickInput {
        move_left: target < paddle_x - dead_zone,
        move_right: target > paddle_x + dead_zone,
        ..Default::default()
    }
}

/// Walk the session from game over back to playing, submitting if possible
fn finish(session: &mut Session) {
    let confirm = TickInput {
        confirm: true,
        ..Default::default()
    };
    session.tick(&confirm);

    if session.phase() != GamePhase::EnterName {
        return;
    }

    for c in AUTOPILOT_NAME.chars() {
        session.tick(&TickInput {
            text_char: Some(c),
            ..Default::default()
        });
    }
    session.tick(&confirm);

    let started = std::time::Instant::now();
    while session.is_submitting() {
        if started.elapsed() > LEADERBOARD_WAIT {
            log::warn!("Leaderboard did not answer in {:?}, moving on", LEADERBOARD_WAIT);
            session.restart();
            return;
        }
        std::thread::sleep(Duration::from_millis(1000 / TICK_RATE as u64));
        session.tick(&TickInput::default());
    }

    if session.phase() == GamePhase::ShowLeaderboard {
        println!("Top scores:");
        for (rank, entry) in session.standings().iter().enumerate() {
            println!("{:>2}. {:<15} {}", rank + 1, entry.player_name, entry.score);
        }
        session.tick(&confirm);
    }
}
