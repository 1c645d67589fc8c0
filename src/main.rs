/// Entry point and game loop.
///
/// The loop is the external scheduler the simulation expects: it drives
/// the frame tick (`tick_rate_ms`), the 1 Hz countdown tick, and the AI
/// engine's own decision cadence, all serialized on this single thread.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use config::AppConfig;
use domain::ai::{AiEngine, Difficulty};
use domain::item::{Lane, RewardModifier};
use sim::event::GameEvent;
use sim::session::{GameSession, StartConfig};
use sim::tick;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

fn main() {
    let config = AppConfig::load();

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(&mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    match result {
        Ok(final_score) => {
            println!();
            println!("Thanks for playing FruitFall!");
            println!("Final Score: {final_score}");
        }
        Err(e) => eprintln!("Game error: {e}"),
    }
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_CENTER: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_FIRE: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

fn game_loop(
    renderer: &mut Renderer,
    config: &AppConfig,
) -> Result<u32, Box<dyn std::error::Error>> {
    let rules = config.timing.session_rules();
    let reward = parse_reward(&config.versus.reward);
    let difficulty = Difficulty::from_name(&config.versus.difficulty).unwrap_or_else(|| {
        eprintln!(
            "Warning: unknown difficulty '{}', using medium.",
            config.versus.difficulty
        );
        Difficulty::Medium
    });

    let mut player = GameSession::new(rules);
    let mut rival = if config.versus.opponent {
        Some(GameSession::new(rules))
    } else {
        None
    };
    let mut ai = AiEngine::new(difficulty);
    let mut rng: StdRng = StdRng::seed_from_u64(rand::thread_rng().gen());

    let epoch = Instant::now();
    let tick_rate = Duration::from_millis(config.timing.tick_rate_ms);
    let mut last_frame = Instant::now();
    let mut last_second = Instant::now();

    start_match(&mut player, rival.as_mut(), &mut ai, config, reward, &epoch);

    let mut kb = InputState::new();

    loop {
        kb.drain_events();
        if kb.ctrl_c_pressed() || kb.any_pressed(KEYS_QUIT) {
            break;
        }

        let now = epoch.elapsed().as_millis() as u64;

        // Player input: lane selection + weapon, same port the AI uses.
        if kb.any_pressed(KEYS_LEFT) {
            player.set_input(Lane::Left);
        } else if kb.any_pressed(KEYS_CENTER) {
            player.set_input(Lane::Center);
        } else if kb.any_pressed(KEYS_RIGHT) {
            player.set_input(Lane::Right);
        }
        if kb.any_pressed(KEYS_FIRE) {
            player.activate_weapon(now);
        }
        if kb.any_pressed(KEYS_RESTART) && !player.is_active() {
            start_match(&mut player, rival.as_mut(), &mut ai, config, reward, &epoch);
        }

        if last_frame.elapsed() >= tick_rate {
            let now = epoch.elapsed().as_millis() as u64;
            tick::tick(&mut player, now, &mut rng);
            if let Some(rival) = rival.as_mut() {
                let events = tick::tick(rival, now, &mut rng);
                handle_rival_events(&events, &mut ai);
                ai.poll(rival, now, &mut rng);
            }
            last_frame = Instant::now();
        }

        if last_second.elapsed() >= Duration::from_secs(1) {
            tick::tick_1hz(&mut player);
            if let Some(rival) = rival.as_mut() {
                let events = tick::tick_1hz(rival);
                handle_rival_events(&events, &mut ai);
            }
            last_second = Instant::now();
        }

        renderer.render(&player, rival.as_ref())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(player.score)
}

fn start_match(
    player: &mut GameSession,
    rival: Option<&mut GameSession>,
    ai: &mut AiEngine,
    config: &AppConfig,
    reward: RewardModifier,
    epoch: &Instant,
) {
    let now = epoch.elapsed().as_millis() as u64;
    player.start(
        StartConfig {
            reward,
            start_level: config.versus.start_level,
            input_enabled: true,
        },
        now,
    );
    if let Some(rival) = rival {
        // The rival plays the same ruleset without the player's reward.
        rival.start(
            StartConfig {
                reward: RewardModifier::None,
                start_level: config.versus.start_level,
                input_enabled: true,
            },
            now,
        );
        ai.start(now);
    }
}

/// The AI's decision deadline must die with its session — a stale timer
/// firing into a restarted session is exactly the bug the session-side
/// cancellation guards against, so the driver honors it too.
fn handle_rival_events(events: &[GameEvent], ai: &mut AiEngine) {
    for event in events {
        if let GameEvent::SessionEnded { .. } = event {
            ai.stop();
        }
    }
}

fn parse_reward(name: &str) -> RewardModifier {
    match name {
        "extra_life" => RewardModifier::ExtraLife,
        "gun" => RewardModifier::Gun,
        "none" => RewardModifier::None,
        other => {
            eprintln!("Warning: unknown reward '{other}', using none.");
            RewardModifier::None
        }
    }
}
