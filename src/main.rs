//! Demo driver: plays one wild battle with fixed parties, answering every
//! command with the first usable move, and prints the battle log.
//!
//! Usage: `battle-core [config.ron]`

use battle_core::{
    AbilityId, BattleConfig, BattleScene, BattleType, HeldItem, Move, RunState, Species,
    TurnCommand,
};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match BattleConfig::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                error!(%path, "failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => BattleConfig::default(),
    };

    let mut scene = BattleScene::new(config);

    // Example 1: Build the player's party
    let pikachu = scene
        .create_pokemon(Species::Pikachu, 25, true)
        .with_ability(AbilityId::Static)
        .with_moves(&[Move::Thunderbolt, Move::QuickAttack, Move::ThunderWave]);
    let machop = scene
        .create_pokemon(Species::Machop, 24, true)
        .with_ability(AbilityId::Guts)
        .with_moves(&[Move::KarateChop, Move::Growl]);
    let lead = scene.add_to_party(pikachu, true);
    scene.add_to_party(machop, true);
    scene.add_held_item(lead, HeldItem::Leftovers, 1);

    // Example 2: Start a wild battle
    let enemies = vec![
        scene
            .create_pokemon(Species::Geodude, 20, false)
            .with_ability(AbilityId::Sturdy)
            .with_moves(&[Move::RockThrow, Move::Tackle]),
        scene
            .create_pokemon(Species::Gyarados, 20, false)
            .with_ability(AbilityId::Intimidate)
            .with_moves(&[Move::Bite, Move::WaterGun]),
    ];
    let wave = scene.config.starting_wave;
    if let Err(e) = scene.new_battle(wave, BattleType::Wild, enemies) {
        error!("failed to start battle: {}", e);
        return ExitCode::FAILURE;
    }

    // Example 3: Drive the loop until the battle is decided
    loop {
        match scene.run() {
            RunState::AwaitingCommand(pokemon_id) => {
                let Some(move_index) = scene.first_usable_move(pokemon_id) else {
                    error!(pokemon = %pokemon_id, "no usable move left");
                    return ExitCode::FAILURE;
                };
                let command = TurnCommand::Fight {
                    move_index,
                    target: None,
                };
                if let Err(e) = scene.submit_command(pokemon_id, command) {
                    error!(pokemon = %pokemon_id, "command refused: {}", e);
                    return ExitCode::FAILURE;
                }
            }
            RunState::BattleOver => break,
            RunState::StepLimit => {
                error!("battle did not finish within the step limit");
                return ExitCode::FAILURE;
            }
        }
    }

    for event in scene.events.drain() {
        if let Some(line) = event.format(&scene) {
            println!("{}", line);
        }
    }
    info!(turns = scene.battle.turn, money = scene.money, "battle finished");

    match serde_json::to_string_pretty(&scene.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("failed to serialize snapshot: {}", e);
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
