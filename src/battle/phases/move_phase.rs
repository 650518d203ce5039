//! Using a move: pre-move checks, hit resolution, damage and effects.

use crate::abilities::{
    apply_ab_attrs, apply_post_attack_ab_attrs, apply_post_defend_ab_attrs,
    apply_post_move_used_ab_attrs, apply_pre_attack_ab_attrs, apply_pre_defend_ab_attrs,
    GenericAttr, PreDefendArgs,
};
use crate::battle::phase::Phase;
use crate::battle::phases::turn::resolve_targets;
use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::battle::stats::{calculate_damage, effective_stat, DamageRoll};
use crate::modifiers::{ModifierArgs, ModifierClass};
use crate::pokemon::{AttackRecord, CombatantId};
use schema::{
    get_move_data, ArenaTagSide, ArenaTagType, BattlerTagType, Move, MoveData, MoveEffect,
    MoveTarget, PokemonType, StatType, StatusEffect,
};
use tracing::debug;

/// One in this many hits is critical.
const CRIT_ODDS: u32 = 24;

/// Checks that can stop a combatant from acting this turn. Returns false
/// when the move is not used.
fn can_act(scene: &mut BattleScene, pokemon_id: CombatantId) -> bool {
    let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
        return false;
    };
    pokemon.turn_data.acted = true;
    let name = pokemon.name.clone();

    if pokemon.has_tag(BattlerTagType::Flinched) {
        scene.remove_tag(pokemon_id, BattlerTagType::Flinched);
        scene.queue_message(format!("{} flinched!", name), false);
        return false;
    }

    let loafing = pokemon.has_tag(BattlerTagType::Truant) && pokemon.summon_data.moves_used % 2 == 1;
    pokemon.summon_data.moves_used += 1;
    if loafing {
        scene.queue_message(format!("{} is loafing around!", name), false);
        return false;
    }

    let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
        return false;
    };
    if let Some(status) = pokemon.status.as_mut() {
        match status.effect {
            StatusEffect::Sleep => {
                if status.sleep_turns_remaining > 0 {
                    status.sleep_turns_remaining -= 1;
                    scene.queue_message(format!("{} is fast asleep.", name), false);
                    return false;
                }
                scene.reset_status(pokemon_id);
                scene.queue_message(format!("{} woke up!", name), false);
            }
            StatusEffect::Freeze => {
                if scene.rng.rand_seed_int(5, 0) != 0 {
                    scene.queue_message(format!("{} is\nfrozen solid!", name), false);
                    return false;
                }
                scene.reset_status(pokemon_id);
                scene.queue_message(format!("{} thawed out!", name), false);
            }
            StatusEffect::Paralysis => {
                if scene.rng.rand_seed_int(4, 0) == 0 {
                    scene.queue_message(format!("{} is paralyzed!\nIt can't move!", name), false);
                    return false;
                }
            }
            StatusEffect::Poison | StatusEffect::Toxic | StatusEffect::Burn => {}
        }
    }

    let confused = scene
        .get_pokemon_by_id(pokemon_id)
        .is_some_and(|pokemon| pokemon.has_tag(BattlerTagType::Confused));
    if confused {
        scene.queue_message(format!("{} is confused!", name), false);
        if scene.rng.rand_seed_int(3, 0) == 0 {
            let roll = DamageRoll {
                power: 40.0,
                move_type: PokemonType::Typeless,
                is_crit: false,
                random_percent: 100,
                defender_multiplier: 1.0,
            };
            let result = calculate_damage(scene, pokemon_id, pokemon_id, Move::Tackle, roll);
            scene.queue_message("It hurt itself in its\nconfusion!", false);
            scene.damage_and_update(pokemon_id, result.damage, None);
            return false;
        }
    }
    true
}

pub(super) fn use_move(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    move_id: Move,
    move_index: Option<usize>,
    targets: &[CombatantId],
) {
    let active = scene
        .get_pokemon_by_id(pokemon_id)
        .is_some_and(|pokemon| pokemon.is_active());
    if !active {
        return;
    }

    if let Some(move_index) = move_index {
        if !can_act(scene, pokemon_id) {
            return;
        }
        let has_pp = scene
            .get_pokemon_by_id_mut(pokemon_id)
            .and_then(|pokemon| pokemon.get_moveset_mut().get_mut(move_index))
            .is_some_and(|move_instance| move_instance.use_move());
        if !has_pp {
            scene.queue_message("But there is no PP left\nfor this move!", false);
            return;
        }
    }

    let name = scene.pokemon_name(pokemon_id);
    debug!(pokemon = %pokemon_id, %move_id, follow_up = move_index.is_none(), "move used");
    scene.queue_message(format!("{} used\n{}!", name, move_id), false);
    scene.events.push(BattleEvent::MoveUsed {
        pokemon_id,
        move_used: move_id,
    });

    let move_data = get_move_data(move_id);
    let mut targets: Vec<CombatantId> = targets
        .iter()
        .copied()
        .filter(|id| scene.get_pokemon_by_id(*id).is_some_and(|p| p.is_active()))
        .collect();
    if targets.is_empty() && move_data.target == MoveTarget::Target {
        targets = resolve_targets(scene, pokemon_id, move_data.target, None);
    }

    scene.phases.unshift_phase(Phase::MoveEffect {
        pokemon_id,
        move_id,
        targets: targets.clone(),
    });
    scene.phases.unshift_phase(Phase::MoveEnd {
        pokemon_id,
        move_id,
        targets,
        follow_up: move_index.is_none(),
    });
}

/// Accuracy check against one target.
fn hits(scene: &mut BattleScene, user_id: CombatantId, target_id: CombatantId, move_data: &MoveData) -> bool {
    if user_id == target_id {
        return true;
    }
    if move_data.flags.one_hit_ko {
        let (Some(user), Some(target)) = (
            scene.get_pokemon_by_id(user_id),
            scene.get_pokemon_by_id(target_id),
        ) else {
            return false;
        };
        if target.level > user.level {
            return false;
        }
        let chance = 30 + u32::from(user.level - target.level);
        return (scene.rng.rand_seed_int(100, 0) as u32) < chance;
    }
    let Some(accuracy) = move_data.accuracy else {
        return true;
    };
    let user_accuracy = effective_stat(scene, user_id, StatType::Acc, None, false, false);
    let target_evasion = effective_stat(scene, target_id, StatType::Eva, None, false, false).max(0.01);
    let threshold = f64::from(accuracy) * user_accuracy / target_evasion;
    f64::from(scene.rng.rand_seed_int(100, 0)) < threshold
}

fn field_move(scene: &mut BattleScene, user_id: CombatantId, move_id: Move, move_data: &MoveData) {
    let Some(user) = scene.get_pokemon_by_id(user_id) else {
        return;
    };
    let (own_side, other_side) = if user.is_player {
        (ArenaTagSide::Player, ArenaTagSide::Enemy)
    } else {
        (ArenaTagSide::Enemy, ArenaTagSide::Player)
    };
    let side = match move_data.target {
        MoveTarget::EnemySide => other_side,
        MoveTarget::UserSide => own_side,
        _ => ArenaTagSide::Both,
    };
    let tag = match move_id {
        Move::Spikes => ArenaTagType::Spikes,
        _ => {
            scene.queue_message("But nothing happened!", false);
            return;
        }
    };
    if scene.arena.add_tag(tag, 0, Some(user_id), side) {
        scene.events.push(BattleEvent::ArenaTagAdded { tag, side });
        let team = if side == ArenaTagSide::Player {
            "your team"
        } else {
            "the opposing team"
        };
        scene.queue_message(
            format!("Spikes were scattered around the feet of {}!", team),
            false,
        );
    } else {
        scene.queue_message("But it failed!", false);
    }
}

fn rolls(scene: &mut BattleScene, chance: u8) -> bool {
    chance >= 100 || scene.rng.rand_seed_int(100, 0) < i32::from(chance)
}

/// Apply the non-recoil effects of a move to one target.
fn apply_move_effects(
    scene: &mut BattleScene,
    user_id: CombatantId,
    target_id: CombatantId,
    move_data: &MoveData,
    self_effects_done: &mut bool,
) {
    for effect in &move_data.effects {
        match effect {
            MoveEffect::StatChange {
                self_target,
                stats,
                stages,
                chance,
            } => {
                if *self_target && *self_effects_done {
                    continue;
                }
                if !rolls(scene, *chance) {
                    continue;
                }
                let (pokemon_id, self_induced) = if *self_target {
                    *self_effects_done = true;
                    (user_id, true)
                } else {
                    (target_id, user_id == target_id)
                };
                scene.queue_stat_stage_change(pokemon_id, self_induced, stats.clone(), *stages);
            }
            MoveEffect::Status { effect, chance } => {
                if !rolls(scene, *chance) {
                    continue;
                }
                let applied = scene.try_set_status(target_id, *effect, Some(user_id));
                if !applied && !move_data.is_damaging() {
                    scene.queue_message("But it failed!", false);
                }
            }
            MoveEffect::Tag { tag, chance } => {
                if !rolls(scene, *chance) {
                    continue;
                }
                scene.add_tag(target_id, *tag, tag.default_turns(), Some(user_id));
            }
            MoveEffect::Recoil { .. } => {}
        }
    }
}

pub(super) fn move_effect(
    scene: &mut BattleScene,
    user_id: CombatantId,
    move_id: Move,
    targets: &[CombatantId],
) {
    let Some(user) = scene.get_pokemon_by_id(user_id) else {
        return;
    };
    if !user.is_active() {
        return;
    }
    let user_is_player = user.is_player;
    let move_data = get_move_data(move_id);

    if move_data.target.is_field_target() {
        field_move(scene, user_id, move_id, &move_data);
        return;
    }
    if !move_data.is_damaging() && move_data.effects.is_empty() {
        scene.queue_message("But nothing happened!", false);
        return;
    }
    if targets.is_empty() {
        scene.queue_message("But it failed!", false);
        return;
    }

    let mut move_type = move_data.move_type;
    let mut power = f64::from(move_data.power);
    if move_data.is_damaging() {
        apply_pre_attack_ab_attrs(scene, user_id, move_id, &mut move_type, &mut power, false);
        scene.apply_modifiers(
            ModifierClass::AttackTypeBooster,
            user_is_player,
            &mut ModifierArgs::AttackTypeBoost {
                pokemon_id: user_id,
                move_type,
                power: &mut power,
            },
        );
    }

    let mut total_damage = 0u32;
    let mut self_effects_done = false;
    for target_id in targets.iter().copied() {
        let Some(target) = scene.get_pokemon_by_id(target_id) else {
            continue;
        };
        if !target.is_active() {
            continue;
        }
        let target_name = target.name.clone();
        let target_is_player = target.is_player;
        let target_types = target.get_types();

        if move_data.flags.one_hit_ko {
            let mut blocked = false;
            apply_ab_attrs(scene, target_id, GenericAttr::BlockOneHitKo, &mut blocked, false);
            if blocked {
                scene.queue_message(format!("{} is unaffected!", target_name), false);
                continue;
            }
        }

        if !hits(scene, user_id, target_id, &move_data) {
            scene.events.push(BattleEvent::MoveMissed {
                attacker_id: user_id,
                defender_id: target_id,
            });
            scene.queue_message(format!("{} avoided\nthe attack!", target_name), false);
            continue;
        }

        let mut defend = PreDefendArgs::default();
        if target_id != user_id {
            apply_pre_defend_ab_attrs(scene, target_id, user_id, move_id, move_type, &mut defend, false);
        }
        if defend.cancelled {
            continue;
        }
        let effectiveness = f64::from(PokemonType::effectiveness_against(move_type, &target_types));
        if defend.damage_multiplier == 0.0 || (move_data.is_damaging() && effectiveness == 0.0) {
            scene.queue_message(format!("It doesn't affect {}!", target_name), false);
            continue;
        }

        if move_data.is_damaging() {
            let target_hp = scene.get_pokemon_by_id(target_id).map(|p| p.hp).unwrap_or(0);
            let (mut damage, is_crit) = if move_data.flags.one_hit_ko {
                (u32::from(target_hp), false)
            } else {
                let crit_blocked = scene.has_generic_attr(target_id, GenericAttr::BlockCrit);
                let is_crit = scene.rng.rand_seed_int(CRIT_ODDS, 0) == 0 && !crit_blocked;
                let random_percent = scene.rng.rand_seed_int(16, 85) as u32;
                let result = calculate_damage(
                    scene,
                    user_id,
                    target_id,
                    move_id,
                    DamageRoll {
                        power,
                        move_type,
                        is_crit,
                        random_percent,
                        defender_multiplier: defend.damage_multiplier,
                    },
                );
                (result.damage, is_crit)
            };

            if damage >= u32::from(target_hp) {
                let mut endure = PreDefendArgs {
                    incoming_damage: Some(damage),
                    ..PreDefendArgs::default()
                };
                apply_pre_defend_ab_attrs(scene, target_id, user_id, move_id, move_type, &mut endure, false);
                damage = endure.incoming_damage.unwrap_or(damage);
            }
            if damage >= u32::from(target_hp) {
                let mut survived = false;
                scene.apply_modifier(
                    ModifierClass::SurviveDamage,
                    target_is_player,
                    &mut ModifierArgs::Survive {
                        pokemon_id: target_id,
                        survived: &mut survived,
                    },
                );
                if survived {
                    damage = u32::from(target_hp.saturating_sub(1));
                }
            }

            let dealt = u32::from(scene.damage_and_update(target_id, damage, Some(user_id)));
            if let Some(target) = scene.get_pokemon_by_id_mut(target_id) {
                target.turn_data.attacks_received.push(AttackRecord {
                    move_id,
                    source_id: user_id,
                    damage: dealt,
                    critical: is_crit,
                });
                target.battle_data.hit_count += 1;
            }
            if let Some(user) = scene.get_pokemon_by_id_mut(user_id) {
                user.turn_data.damage_dealt += dealt;
            }
            total_damage += dealt;

            if move_data.flags.one_hit_ko {
                scene.queue_message("It's a one-hit KO!", false);
            } else {
                if is_crit {
                    scene.queue_message("A critical hit!", false);
                }
                if effectiveness > 1.0 {
                    scene.queue_message("It's super effective!", false);
                } else if effectiveness < 1.0 {
                    scene.queue_message("It's not very effective…", false);
                }
            }

            apply_post_defend_ab_attrs(scene, target_id, user_id, move_id, false);
            apply_post_attack_ab_attrs(scene, user_id, target_id, move_id, dealt, false);

            let target_standing = scene
                .get_pokemon_by_id(target_id)
                .is_some_and(|target| !target.is_fainted());
            if dealt > 0 && target_standing {
                scene.apply_modifiers(
                    ModifierClass::FlinchChance,
                    user_is_player,
                    &mut ModifierArgs::Flinch {
                        pokemon_id: user_id,
                        target_id,
                    },
                );
            }
            if !target_standing {
                continue;
            }
        }

        apply_move_effects(scene, user_id, target_id, &move_data, &mut self_effects_done);
    }

    if total_damage > 0 {
        if let Some(denominator) = move_data.recoil_denominator() {
            let blocked = scene.has_generic_attr(user_id, GenericAttr::BlockRecoil)
                || scene.has_generic_attr(user_id, GenericAttr::BlockNonDirectDamage);
            if !blocked {
                let recoil = (total_damage / u32::from(denominator)).max(1);
                let name = scene.pokemon_name(user_id);
                scene.queue_message(format!("{} is damaged by recoil!", name), false);
                scene.damage_and_update(user_id, recoil, None);
            }
        }
        scene.apply_modifiers(
            ModifierClass::HitHeal,
            user_is_player,
            &mut ModifierArgs::DamageDealt {
                pokemon_id: user_id,
                damage: total_damage,
            },
        );
    }
}

/// After a non-follow-up move, let the rest of the field react to it.
pub(super) fn move_end(
    scene: &mut BattleScene,
    user_id: CombatantId,
    move_id: Move,
    targets: &[CombatantId],
    follow_up: bool,
) {
    if follow_up {
        return;
    }
    for pokemon_id in scene.all_field() {
        if pokemon_id != user_id {
            apply_post_move_used_ab_attrs(scene, pokemon_id, user_id, move_id, targets, false);
        }
    }
}
