use anyhow::Result;
use glam::Vec2;
use log::{debug, info};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use rusted_action::engine::game_loop::{ticks_for, GameLoop, FIXED_TIMESTEP_DURATION};
use rusted_action::engine::input::{HeldInput, InputSampler};
use rusted_action::engine::physics::Stage;
use rusted_action::game::characters::{CharacterId, CharacterManager, CharacterStats};
use rusted_action::game::combat::presets;

/// Length of the scripted exchange
const DEMO_LENGTH: Duration = Duration::from_millis(2500);

/// Held inputs for a scripted exchange between two characters
fn script(id: CharacterId, tick: u64) -> HeldInput {
    let at = |ms: u64| ticks_for(Duration::from_millis(ms));
    let between = |from: u64, to: u64| tick >= at(from) && tick < at(to);
    let mut held = HeldInput::default();

    match id {
        // Walks in and throws a jab
        0 => {
            if between(0, 300) {
                held.movement = Vec2::X;
            }
            held.attack = between(450, 500);
        }
        // Turns to face left, jumps and airdashes in, then attacks
        _ => {
            if between(0, 100) || between(400, 450) || between(500, 550) {
                held.movement = Vec2::NEG_X;
            }
            held.jump = between(300, 500);
            held.attack = between(1200, 1250);
        }
    }

    held
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Action demo...");

    let stage = Stage::flat(0.0).with_walls(-12.0, 12.0);
    let stats = CharacterStats::default();
    let jab = Arc::new(presets::jab()?);
    let strike = Arc::new(presets::double_strike()?);

    let mut manager = CharacterManager::new();
    let ryn = manager.spawn_character(
        "Ryn",
        stats.clone(),
        Box::new(stage.spawn_body(-2.0, stats.size())),
        jab,
    )?;
    let kai = manager.spawn_character(
        "Kai",
        stats.clone(),
        Box::new(stage.spawn_body(2.0, stats.size())),
        strike,
    )?;

    let mut samplers: BTreeMap<CharacterId, InputSampler> =
        [(ryn, InputSampler::new()), (kai, InputSampler::new())]
            .into_iter()
            .collect();

    let total_ticks = ticks_for(DEMO_LENGTH);
    let mut game_loop = GameLoop::new();

    while manager.current_tick() < total_ticks {
        for _ in 0..game_loop.begin_frame() {
            let tick = manager.current_tick();
            let inputs: BTreeMap<_, _> = samplers
                .iter_mut()
                .map(|(&id, sampler)| (id, sampler.sample(script(id, tick))))
                .collect();

            let report = manager.tick(&inputs);
            for event in &report.events {
                let subject = manager
                    .get(event.subject())
                    .map_or("?", |c| c.name.as_str());
                info!("[{:>4}] {}: {:?}", report.tick, subject, event);
            }
            for character in manager.all() {
                let hitboxes = character.hitbox_bounds();
                if !hitboxes.is_empty() {
                    debug!("[{:>4}] {} hitboxes {:?}", report.tick, character.name, hitboxes);
                }
            }
        }

        std::thread::sleep(FIXED_TIMESTEP_DURATION / 4);
    }

    for character in manager.all() {
        info!(
            "{}: {:?} at ({:.2}, {:.2}), health {}",
            character.name,
            character.state(),
            character.position().x,
            character.position().y,
            character.health()
        );
    }
    info!(
        "Ran {} ticks over {} frames",
        game_loop.tick_count(),
        game_loop.frame_count()
    );

    Ok(())
}
