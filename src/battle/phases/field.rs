//! Entering and leaving the field, fainting, and the end of a battle.

use crate::abilities::{
    apply_post_battle_ab_attrs, apply_post_faint_ab_attrs, apply_post_knock_out_ab_attrs,
    apply_post_summon_ab_attrs, apply_post_victory_ab_attrs, apply_pre_switch_out_ab_attrs,
    GenericAttr,
};
use crate::battle::phase::Phase;
use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::modifiers::{ModifierArgs, ModifierClass};
use crate::pokemon::CombatantId;
use schema::{ArenaTagSide, ArenaTagType, Move};
use tracing::info;

fn send_out_text(scene: &BattleScene, pokemon_id: CombatantId) -> String {
    let name = scene.pokemon_name(pokemon_id);
    match scene.get_pokemon_by_id(pokemon_id) {
        Some(pokemon) if pokemon.is_player => format!("Go! {}!", name),
        _ => format!("The opponent sent out {}!", name),
    }
}

/// First field slot of a side not held by an active combatant.
fn free_field_slot(scene: &BattleScene, player: bool) -> Option<usize> {
    let taken: Vec<usize> = scene
        .party_of(player)
        .iter()
        .filter(|pokemon| pokemon.is_active())
        .map(|pokemon| pokemon.field_index)
        .collect();
    (0..scene.battle.field_size()).find(|slot| !taken.contains(slot))
}

pub(super) fn summon(scene: &mut BattleScene, pokemon_id: CombatantId) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if pokemon.is_fainted() || pokemon.on_field {
        return;
    }
    let Some(field_index) = free_field_slot(scene, pokemon.is_player) else {
        return;
    };
    let text = send_out_text(scene, pokemon_id);
    scene.queue_message(text, false);
    scene.enter_field(pokemon_id, field_index);
    scene.phases.unshift_phase(Phase::PostSummon { pokemon_id });
}

/// Spikes damage by layer count.
fn spikes_damage(max_hp: u16, layers: u8) -> u32 {
    let denominator = match layers {
        1 => 8,
        2 => 6,
        _ => 4,
    };
    (u32::from(max_hp) / denominator).max(1)
}

pub(super) fn post_summon(scene: &mut BattleScene, pokemon_id: CombatantId) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if !pokemon.is_active() {
        return;
    }
    let side = if pokemon.is_player {
        ArenaTagSide::Player
    } else {
        ArenaTagSide::Enemy
    };
    let spikes = scene
        .arena
        .get_tag(ArenaTagType::Spikes, side)
        .map(|tag| tag.layers);
    if let Some(layers) = spikes.filter(|_| pokemon.is_grounded()) {
        let damage = spikes_damage(pokemon.max_hp(), layers);
        let text = format!("{} is hurt\nby the spikes!", pokemon.name);
        if !scene.has_generic_attr(pokemon_id, GenericAttr::BlockNonDirectDamage) {
            scene.queue_message(text, false);
            scene.damage_and_update(pokemon_id, damage, None);
        }
    }
    apply_post_summon_ab_attrs(scene, pokemon_id, false);
}

pub(super) fn switch_summon(scene: &mut BattleScene, switch_out_id: CombatantId, switch_in_id: CombatantId) {
    let Some(outgoing) = scene.get_pokemon_by_id(switch_out_id) else {
        return;
    };
    if !outgoing.is_active() {
        return;
    }
    let field_index = outgoing.field_index;
    let player = outgoing.is_player;
    let ready = scene
        .get_pokemon_by_id(switch_in_id)
        .is_some_and(|pokemon| !pokemon.is_fainted() && !pokemon.on_field && pokemon.is_player == player);
    if !ready {
        return;
    }

    apply_pre_switch_out_ab_attrs(scene, switch_out_id, false);
    let name = scene.pokemon_name(switch_out_id);
    let recall = if player {
        format!("Come back, {}!", name)
    } else {
        format!("The opponent withdrew {}!", name)
    };
    scene.queue_message(recall, false);
    scene.leave_field(switch_out_id);

    let text = send_out_text(scene, switch_in_id);
    scene.queue_message(text, false);
    scene.enter_field(switch_in_id, field_index);
    scene.phases.unshift_phase(Phase::PostSummon {
        pokemon_id: switch_in_id,
    });
}

/// First healthy reserve of a side that is not already on its way in.
fn next_reserve(scene: &BattleScene, player: bool) -> Option<CombatantId> {
    let incoming: Vec<CombatantId> = scene
        .phases
        .pending_phases()
        .into_iter()
        .filter_map(|phase| match phase {
            Phase::Summon { pokemon_id } => Some(*pokemon_id),
            _ => None,
        })
        .collect();
    scene
        .party_of(player)
        .iter()
        .find(|pokemon| !pokemon.is_fainted() && !pokemon.on_field && !incoming.contains(&pokemon.id))
        .map(|pokemon| pokemon.id)
}

pub(super) fn faint(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    source_id: Option<CombatantId>,
    move_id: Option<Move>,
) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if !pokemon.is_fainted() || !pokemon.on_field {
        return;
    }
    let player = pokemon.is_player;
    let name = pokemon.name.clone();
    info!(pokemon = %pokemon_id, player, "fainted");
    scene.queue_message(format!("{} fainted!", name), false);
    scene.events.push(BattleEvent::PokemonFainted { pokemon_id });

    apply_post_faint_ab_attrs(scene, pokemon_id, source_id, move_id, false);
    if let Some(source_id) = source_id.filter(|source| *source != pokemon_id) {
        let source_active = scene
            .get_pokemon_by_id(source_id)
            .is_some_and(|source| source.is_active() && source.is_player != player);
        if source_active {
            apply_post_victory_ab_attrs(scene, source_id, false);
        }
    }
    for other_id in scene.all_field() {
        if other_id != pokemon_id {
            apply_post_knock_out_ab_attrs(scene, other_id, pokemon_id, false);
        }
    }

    if player {
        scene.battle.player_faints += 1;
    } else {
        scene.battle.enemy_faints += 1;
        let dropped: Vec<_> = scene
            .held_items_of(pokemon_id)
            .into_iter()
            .filter_map(|modifier| modifier.held_item().map(|item| (item, modifier.stack_count)))
            .collect();
        for (item, count) in dropped {
            scene
                .battle
                .post_battle_loot
                .extend(std::iter::repeat(item).take(count as usize));
        }
        scene.clear_enemy_held_item_modifiers(Some(pokemon_id));
    }
    scene.leave_field(pokemon_id);

    let side_down = |scene: &BattleScene, player: bool| scene.party_of(player).iter().all(|p| p.is_fainted());
    if side_down(scene, false) {
        scene.phases.clear_phase_queue();
        scene.phases.push_phase(Phase::Victory, false);
    } else if side_down(scene, true) {
        scene.phases.clear_phase_queue();
        scene.phases.push_phase(Phase::GameOver, false);
    } else if let Some(reserve) = next_reserve(scene, player) {
        scene.phases.push_phase(Phase::Summon { pokemon_id: reserve }, false);
    }
}

pub(super) fn victory(scene: &mut BattleScene) {
    if scene.battle_over {
        return;
    }
    let mut amount = scene.wave_money_amount(1.0) as f64;
    scene.apply_modifiers(
        ModifierClass::MoneyMultiplier,
        true,
        &mut ModifierArgs::Money { amount: &mut amount },
    );
    let reward = amount.floor() as i64;
    scene.add_money(reward);
    scene.queue_message(format!("You got ₽{} for winning!", reward * 10), true);
    let scooped = scene.battle.money_scooped;
    if scooped > 0 {
        scene.add_money(scooped as i64);
        scene.queue_message(format!("You picked up ₽{}!", scooped * 10), true);
    }

    for pokemon_id in scene.get_field(true) {
        apply_post_battle_ab_attrs(scene, pokemon_id, false);
    }
    scene.lapse_battle_modifiers();
    scene.clear_enemy_held_item_modifiers(None);
    scene.phases.push_phase(Phase::BattleEnd { player_won: true }, false);
}

pub(super) fn game_over(scene: &mut BattleScene) {
    scene.queue_message("You were overwhelmed...", true);
    scene.phases.push_phase(Phase::BattleEnd { player_won: false }, false);
}

pub(super) fn battle_end(scene: &mut BattleScene, player_won: bool) {
    if scene.battle_over {
        return;
    }
    info!(
        wave_index = scene.battle.wave_index,
        turns = scene.battle.turn,
        player_won,
        "battle ended"
    );
    scene.events.push(BattleEvent::BattleEnded { player_won });
    scene.battle_over = true;
}
