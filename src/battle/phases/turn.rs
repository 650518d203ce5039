//! Encounter setup and the turn cycle: commands, ordering, weather and
//! end-of-turn upkeep.

use crate::abilities::{
    apply_ab_attrs, apply_post_battle_init_ab_attrs, apply_post_turn_ab_attrs,
    apply_post_weather_lapse_ab_attrs, apply_pre_weather_effect_ab_attrs, GenericAttr,
};
use crate::battle::encounter::{BattleType, TurnCommand};
use crate::battle::phase::{BattleAnim, Phase, PhaseStatus};
use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::battle::stats::effective_speed;
use crate::modifiers::{ModifierArgs, ModifierClass};
use crate::pokemon::CombatantId;
use schema::{get_move_data, MoveTarget, PokemonType, StatusEffect, WeatherType};
use std::cmp::Reverse;
use tracing::{debug, info};

/// Order combatants fastest first. Ties keep field order.
pub(super) fn speed_order(scene: &mut BattleScene, ids: Vec<CombatantId>) -> Vec<CombatantId> {
    let mut keyed: Vec<(u32, CombatantId)> = ids
        .into_iter()
        .map(|id| (effective_speed(scene, id), id))
        .collect();
    keyed.sort_by_key(|(speed, _)| Reverse(*speed));
    keyed.into_iter().map(|(_, id)| id).collect()
}

pub(super) fn encounter(scene: &mut BattleScene) {
    let field_size = scene.battle.field_size();
    for player in [true, false] {
        let leads: Vec<CombatantId> = scene
            .party_of(player)
            .iter()
            .filter(|pokemon| !pokemon.is_fainted())
            .take(field_size)
            .map(|pokemon| pokemon.id)
            .collect();
        for (field_index, pokemon_id) in leads.into_iter().enumerate() {
            scene.enter_field(pokemon_id, field_index);
            let name = scene.pokemon_name(pokemon_id);
            let text = match (player, scene.battle.battle_type) {
                (true, _) => format!("Go! {}!", name),
                (false, BattleType::Wild) => format!("A wild {} appeared!", name),
                (false, BattleType::Trainer) => format!("The opponent sent out {}!", name),
            };
            scene.queue_message(text, true);
        }
    }

    let everyone: Vec<CombatantId> = scene
        .party
        .iter()
        .chain(scene.enemy_party.iter())
        .map(|pokemon| pokemon.id)
        .collect();
    for pokemon_id in everyone {
        apply_post_battle_init_ab_attrs(scene, pokemon_id, false);
    }

    let field = scene.all_field();
    for pokemon_id in speed_order(scene, field) {
        scene.phases.push_phase(Phase::PostSummon { pokemon_id }, false);
    }
    info!(
        wave_index = scene.battle.wave_index,
        double = scene.battle.double,
        "encounter started"
    );
}

pub(super) fn turn_init(scene: &mut BattleScene) {
    if scene.get_field(true).is_empty() || scene.get_field(false).is_empty() {
        return;
    }
    scene.battle.increment_turn();
    let turn_number = scene.battle.turn;
    for pokemon in scene.party.iter_mut().chain(scene.enemy_party.iter_mut()) {
        pokemon.reset_turn_data();
    }
    scene.events.push(BattleEvent::TurnStarted { turn_number });
    debug!(turn = turn_number, "turn started");

    for pokemon_id in scene.get_field(true) {
        scene.phases.push_phase(Phase::Command { pokemon_id }, false);
    }
    for pokemon_id in scene.get_field(false) {
        scene.phases.push_phase(Phase::EnemyCommand { pokemon_id }, false);
    }
    scene.phases.push_phase(Phase::TurnStart, false);
}

pub(super) fn command(scene: &mut BattleScene, pokemon_id: CombatantId) -> PhaseStatus {
    let active = scene
        .get_pokemon_by_id(pokemon_id)
        .is_some_and(|pokemon| pokemon.is_active());
    if !active {
        return PhaseStatus::Ended;
    }
    scene.awaiting_command = Some(pokemon_id);
    PhaseStatus::AwaitingInput
}

pub(super) fn enemy_command(scene: &mut BattleScene, pokemon_id: CombatantId) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if !pokemon.is_active() {
        return;
    }
    let usable: Vec<usize> = pokemon
        .get_moveset()
        .iter()
        .enumerate()
        .filter(|(_, move_instance)| move_instance.pp > 0)
        .map(|(index, _)| index)
        .collect();
    let opponents = scene.get_opponents(pokemon_id);
    let Some(move_index) = scene.rng.rand_seed_item(&usable).copied() else {
        return;
    };
    let target = scene.rng.rand_seed_item(&opponents).copied();
    scene
        .battle
        .turn_commands
        .insert(pokemon_id, TurnCommand::Fight { move_index, target });
}

/// Targets of a move used by `pokemon_id` against `chosen`.
pub(super) fn resolve_targets(
    scene: &BattleScene,
    pokemon_id: CombatantId,
    target: MoveTarget,
    chosen: Option<CombatantId>,
) -> Vec<CombatantId> {
    let opponents = scene.get_opponents(pokemon_id);
    match target {
        MoveTarget::User => vec![pokemon_id],
        MoveTarget::Target => chosen
            .filter(|id| opponents.contains(id))
            .or_else(|| opponents.first().copied())
            .into_iter()
            .collect(),
        MoveTarget::AllOpponents => opponents,
        MoveTarget::BothSides | MoveTarget::EnemySide | MoveTarget::UserSide => Vec::new(),
    }
}

/// Build the turn's action order: runs, then switches, then moves by
/// priority and speed. Speed ties are broken by the battle-local stream.
pub(super) fn turn_start(scene: &mut BattleScene) {
    let commands: Vec<(CombatantId, TurnCommand)> = scene
        .battle
        .turn_commands
        .iter()
        .map(|(id, command)| (*id, *command))
        .collect();

    let mut ordered = Vec::new();
    for (pokemon_id, command) in commands {
        let active = scene
            .get_pokemon_by_id(pokemon_id)
            .is_some_and(|pokemon| pokemon.is_active());
        if !active {
            continue;
        }
        let bracket = match command {
            TurnCommand::Run => 0,
            TurnCommand::Switch { .. } => 1,
            TurnCommand::Fight { .. } => 2,
        };
        let priority = scene.command_priority(pokemon_id, &command);
        let speed = effective_speed(scene, pokemon_id);
        let tiebreak = scene.rand_battle_seed_int(u32::MAX >> 1, 0);
        ordered.push((bracket, Reverse(priority), Reverse(speed), tiebreak, pokemon_id, command));
    }
    ordered.sort_by_key(|(bracket, priority, speed, tiebreak, _, _)| {
        (*bracket, *priority, *speed, *tiebreak)
    });

    for (_, _, _, _, pokemon_id, command) in ordered {
        match command {
            TurnCommand::Run => scene.phases.push_phase(Phase::AttemptRun { pokemon_id }, false),
            TurnCommand::Switch { party_index } => {
                let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
                    continue;
                };
                let Some(switch_in_id) = scene
                    .party_of(pokemon.is_player)
                    .get(party_index)
                    .map(|pokemon| pokemon.id)
                else {
                    continue;
                };
                scene.phases.push_phase(
                    Phase::SwitchSummon {
                        switch_out_id: pokemon_id,
                        switch_in_id,
                    },
                    false,
                );
            }
            TurnCommand::Fight { move_index, target } => {
                let Some(move_id) = scene
                    .get_pokemon_by_id(pokemon_id)
                    .and_then(|pokemon| pokemon.get_moveset().get(move_index))
                    .map(|move_instance| move_instance.move_)
                else {
                    continue;
                };
                let targets = resolve_targets(scene, pokemon_id, get_move_data(move_id).target, target);
                scene.phases.push_phase(
                    Phase::Move {
                        pokemon_id,
                        move_id,
                        move_index: Some(move_index),
                        targets,
                    },
                    false,
                );
            }
        }
    }

    scene.phases.push_phase(Phase::WeatherEffect, false);
    scene.phases.push_phase(Phase::TurnEnd, false);
}

pub(super) fn attempt_run(scene: &mut BattleScene, pokemon_id: CombatantId) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if !pokemon.is_active() {
        return;
    }

    let mut escaped = false;
    apply_ab_attrs(scene, pokemon_id, GenericAttr::RunSuccess, &mut escaped, false);
    if !escaped {
        let player_speed = effective_speed(scene, pokemon_id);
        let enemy_speed = scene
            .get_field(false)
            .into_iter()
            .map(|id| effective_speed(scene, id))
            .max()
            .unwrap_or(1)
            .max(1);
        let attempts = scene.battle.escape_attempts;
        scene.battle.escape_attempts += 1;
        let chance = (player_speed * 128 / enemy_speed + 30 * attempts) % 256;
        escaped = (scene.rand_battle_seed_int(256, 0) as u32) < chance;
    }

    if escaped {
        info!(pokemon = %pokemon_id, "player fled");
        scene.battle.player_fled = true;
        scene.phases.clear_phase_queue();
        scene.queue_message("You got away safely!", false);
        scene.phases.push_phase(Phase::BattleEnd { player_won: false }, false);
    } else {
        if let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) {
            pokemon.turn_data.failed_run_away = true;
        }
        scene.queue_message("You can't escape!", false);
    }
}

fn weather_damage_immune(weather: WeatherType, types: &[PokemonType]) -> bool {
    let immune: &[PokemonType] = match weather {
        WeatherType::Sandstorm => &[PokemonType::Rock, PokemonType::Ground, PokemonType::Steel],
        WeatherType::Hail => &[PokemonType::Ice],
        _ => &[],
    };
    types.iter().any(|pokemon_type| immune.contains(pokemon_type))
}

pub(super) fn weather_effect(scene: &mut BattleScene) {
    let Some(mut weather) = scene.arena.weather else {
        return;
    };
    if !weather.lapse() {
        scene.try_set_weather(None);
        return;
    }
    scene.arena.weather = Some(weather);
    let weather_type = weather.weather_type;
    if scene.is_weather_suppressed() {
        return;
    }
    scene.queue_message(weather_type.lapse_message(), false);

    let field = scene.all_field();
    let field = speed_order(scene, field);
    if weather_type.is_damaging() {
        for pokemon_id in field.iter().copied() {
            let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
                continue;
            };
            if pokemon.is_fainted() || weather_damage_immune(weather_type, &pokemon.get_types()) {
                continue;
            }
            let damage = u32::from(pokemon.max_hp() / 16).max(1);
            let name = pokemon.name.clone();
            let mut cancelled = false;
            apply_pre_weather_effect_ab_attrs(scene, pokemon_id, weather_type, &mut cancelled, false);
            if cancelled || scene.has_generic_attr(pokemon_id, GenericAttr::BlockNonDirectDamage) {
                continue;
            }
            let text = match weather_type {
                WeatherType::Hail => format!("{} is pelted by the hail!", name),
                _ => format!("{} is buffeted by the sandstorm!", name),
            };
            scene.queue_message(text, false);
            scene.trigger_pokemon_battle_anim(pokemon_id, BattleAnim::WeatherDamage, false);
            scene.damage_and_update(pokemon_id, damage, None);
        }
    }

    for pokemon_id in field {
        apply_post_weather_lapse_ab_attrs(scene, pokemon_id, weather_type, false);
    }
}

fn status_damage(scene: &mut BattleScene, pokemon_id: CombatantId) {
    let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
        return;
    };
    let max_hp = u32::from(pokemon.max_hp());
    let Some(status) = pokemon.status.as_mut() else {
        return;
    };
    let (damage, text) = match status.effect {
        StatusEffect::Poison => (max_hp / 8, format!("{} is hurt\nby poison!", pokemon.name)),
        StatusEffect::Toxic => {
            status.toxic_turn_count = status.toxic_turn_count.saturating_add(1).min(15);
            (
                max_hp * u32::from(status.toxic_turn_count) / 16,
                format!("{} is hurt\nby poison!", pokemon.name),
            )
        }
        StatusEffect::Burn => (max_hp / 16, format!("{} is hurt\nby its burn!", pokemon.name)),
        StatusEffect::Sleep | StatusEffect::Paralysis | StatusEffect::Freeze => return,
    };
    if scene.has_generic_attr(pokemon_id, GenericAttr::BlockNonDirectDamage) {
        return;
    }
    scene.queue_message(text, false);
    scene.trigger_pokemon_battle_anim(pokemon_id, BattleAnim::StatusDamage, false);
    scene.damage_and_update(pokemon_id, damage.max(1), None);
}

pub(super) fn turn_end(scene: &mut BattleScene) {
    for pokemon_id in scene.all_field() {
        let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
            continue;
        };
        if pokemon.is_fainted() {
            continue;
        }
        let player = pokemon.is_player;

        apply_post_turn_ab_attrs(scene, pokemon_id, false);
        scene.apply_modifiers(
            ModifierClass::TurnHeal,
            player,
            &mut ModifierArgs::TurnEnd { pokemon_id },
        );
        scene.apply_shuffled_modifiers(
            ModifierClass::Berry,
            player,
            &mut ModifierArgs::BerryCheck { pokemon_id },
        );
        status_damage(scene, pokemon_id);

        let expired = scene
            .get_pokemon_by_id_mut(pokemon_id)
            .map(|pokemon| pokemon.lapse_tags())
            .unwrap_or_default();
        for tag in expired {
            scene.events.push(BattleEvent::TagRemoved { pokemon_id, tag });
        }
    }

    for tag in scene.arena.lapse_tags() {
        scene.events.push(BattleEvent::ArenaTagRemoved {
            tag: tag.tag_type,
            side: tag.side,
        });
    }
    if let Some(mut terrain) = scene.arena.terrain {
        if terrain.lapse() {
            scene.arena.terrain = Some(terrain);
        } else {
            scene.try_set_terrain(None);
        }
    }

    let turn_number = scene.battle.turn;
    scene.events.push(BattleEvent::TurnEnded { turn_number });
}
