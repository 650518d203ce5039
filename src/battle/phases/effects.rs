use crate::abilities::{
    apply_post_set_status_ab_attrs, apply_post_stat_stage_change_ab_attrs,
    apply_pre_stat_stage_change_ab_attrs,
};
use crate::battle::phase::BattleAnim;
use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::modifiers::{ModifierArgs, ModifierClass};
use crate::pokemon::CombatantId;
use schema::{ArenaTagSide, ArenaTagType, StatType, StatusEffect};
use tracing::trace;

pub(super) fn message(scene: &mut BattleScene, text: &str) {
    scene.events.push(BattleEvent::Message {
        text: text.to_string(),
    });
}

fn stat_change_text(name: &str, stat: StatType, delta: i8) -> String {
    let verb = match delta {
        1 => "rose!",
        2 => "sharply rose!",
        d if d >= 3 => "rose drastically!",
        -1 => "fell!",
        -2 => "harshly fell!",
        _ => "severely fell!",
    };
    format!("{}'s {} {}", name, stat, verb)
}

pub(super) fn stat_stage_change(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    self_induced: bool,
    stats: &[StatType],
    stages: i8,
) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if !pokemon.is_active() || stages == 0 {
        return;
    }
    let name = pokemon.name.clone();
    let player = pokemon.is_player;
    let lowered_by_other = !self_induced && stages < 0;

    let side = if player {
        ArenaTagSide::Player
    } else {
        ArenaTagSide::Enemy
    };
    if lowered_by_other && scene.arena.get_tag(ArenaTagType::Mist, side).is_some() {
        scene.queue_message(format!("{} is protected\nby the mist!", name), false);
        return;
    }

    let mut changed = Vec::new();
    for stat in stats.iter().copied() {
        if lowered_by_other {
            let mut cancelled = false;
            apply_pre_stat_stage_change_ab_attrs(scene, pokemon_id, stat, &mut cancelled, false);
            if cancelled {
                scene.events.push(BattleEvent::StatChangeBlocked { pokemon_id, stat });
                continue;
            }
        }
        let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
            return;
        };
        let old_stage = pokemon.get_stat_stage(stat);
        let new_stage = pokemon.modify_stat_stage(stat, stages);
        if old_stage == new_stage {
            let direction = if stages > 0 { "higher" } else { "lower" };
            scene.queue_message(format!("{}'s {} won't go any {}!", name, stat, direction), false);
            continue;
        }
        trace!(pokemon = %pokemon_id, %stat, old_stage, new_stage, "stat stage changed");
        scene.events.push(BattleEvent::StatStageChanged {
            pokemon_id,
            stat,
            old_stage,
            new_stage,
        });
        scene.queue_message(stat_change_text(&name, stat, new_stage - old_stage), false);
        changed.push(stat);
    }

    if changed.is_empty() {
        return;
    }
    let anim = if stages > 0 {
        BattleAnim::StatUp
    } else {
        BattleAnim::StatDown
    };
    scene.trigger_pokemon_battle_anim(pokemon_id, anim, false);
    apply_post_stat_stage_change_ab_attrs(scene, pokemon_id, &changed, stages, self_induced, false);
    if stages < 0 {
        scene.apply_modifiers(
            ModifierClass::ResetNegativeStatStage,
            player,
            &mut ModifierArgs::StatStagesLowered { pokemon_id },
        );
    }
}

pub(super) fn pokemon_heal(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    amount: u16,
    message: Option<&str>,
    show_full_hp_message: bool,
) {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return;
    };
    if pokemon.is_fainted() {
        return;
    }
    if pokemon.is_full_hp() {
        if show_full_hp_message {
            let text = format!("{}'s\nHP is full!", pokemon.name);
            scene.queue_message(text, false);
        }
        return;
    }
    let player = pokemon.is_player;

    let mut boosted = f64::from(amount);
    if player {
        scene.apply_modifiers(
            ModifierClass::HealingBooster,
            true,
            &mut ModifierArgs::HealingBoost {
                amount: &mut boosted,
            },
        );
    }
    let amount = boosted.floor().min(f64::from(u16::MAX)) as u16;
    if scene.heal(pokemon_id, amount) > 0 {
        scene.trigger_pokemon_battle_anim(pokemon_id, BattleAnim::Heal, false);
        if let Some(text) = message {
            scene.queue_message(text, false);
        }
    }
}

pub(super) fn obtain_status_effect(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    effect: StatusEffect,
    source_id: Option<CombatantId>,
) {
    let has_status = scene
        .get_pokemon_by_id(pokemon_id)
        .and_then(|pokemon| pokemon.status)
        .is_some_and(|status| status.effect == effect);
    if !has_status {
        return;
    }
    let name = scene.pokemon_name(pokemon_id);
    scene.queue_message(effect.obtain_text(&name), false);
    scene.events.push(BattleEvent::StatusApplied {
        pokemon_id,
        status: effect,
    });
    apply_post_set_status_ab_attrs(scene, pokemon_id, effect, source_id, false);
}

pub(super) fn form_change(scene: &mut BattleScene, pokemon_id: CombatantId, form_index: u8) {
    let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
        return;
    };
    if pokemon.form_index == form_index {
        return;
    }
    pokemon.form_index = form_index;
    pokemon.summon_data.types = None;
    let text = format!("{} transformed!", pokemon.name);
    scene.events.push(BattleEvent::FormChanged {
        pokemon_id,
        form_index,
    });
    scene.queue_message(text, false);
}
