//! Typed entry points for every ability hook.
//!
//! All of them funnel into one loop that walks the combatant's primary and
//! passive abilities, checks conditions, applies each attribute of the hook
//! and does the bookkeeping (applied lists, ability banner, trigger message).
//! With `simulated` set the same verdict is computed but no phase, message
//! or persistent state change is made.

use crate::abilities::attrs::{
    AbAttr, ApplyOutcome, GenericAttr, HookKind, TriggerArgs, VisualCue,
};
use crate::abilities::{get_ability, Ability};
use crate::battle::phase::{BattleAnim, Phase};
use crate::battle::scene::BattleScene;
use crate::pokemon::CombatantId;
use schema::{
    BattlerTagType, Move, PokemonType, StatType, StatusEffect, TerrainType, WeatherType,
};
use tracing::debug;

/// What a dispatch did: whether any attribute applied, and the trigger
/// messages of those that did (collected in simulated mode too).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    pub applied: bool,
    pub messages: Vec<String>,
}

/// The ability an attribute belongs to, as seen by its apply function.
#[derive(Debug, Clone, Copy)]
pub struct AttrContext {
    pub holder_id: CombatantId,
    pub ability: &'static Ability,
    pub passive: bool,
    pub simulated: bool,
}

/// Out-values of the pre-defend hook. Immunities and damage multipliers run
/// with `incoming_damage` unset; endure effects run once damage is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreDefendArgs {
    pub cancelled: bool,
    pub damage_multiplier: f64,
    pub incoming_damage: Option<u32>,
}

impl Default for PreDefendArgs {
    fn default() -> Self {
        Self {
            cancelled: false,
            damage_multiplier: 1.0,
            incoming_damage: None,
        }
    }
}

struct DispatchPlan {
    hook: HookKind,
    simulated: bool,
    show_instant: bool,
    trigger_args: TriggerArgs,
}

fn apply_ab_attrs_internal(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    plan: DispatchPlan,
    accepts: impl Fn(&AbAttr) -> bool,
    mut apply: impl FnMut(&mut BattleScene, &AbAttr, AttrContext) -> ApplyOutcome,
) -> DispatchReport {
    let mut report = DispatchReport::default();

    for passive in [false, true] {
        let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
            return report;
        };
        if !pokemon.can_apply_ability(passive) {
            continue;
        }
        let ability_id = if passive {
            match pokemon.passive_ability_id() {
                Some(id) if id != pokemon.ability_id() => id,
                _ => continue,
            }
        } else {
            pokemon.ability_id()
        };
        let holder_name = pokemon.name.clone();
        let ability = get_ability(ability_id);

        for entry in ability.attrs_for(plan.hook) {
            if !accepts(&entry.attr) {
                continue;
            }
            if let Some(condition) = &entry.extra_condition {
                if !condition.evaluate(scene, pokemon_id, ability_id) {
                    continue;
                }
            }
            if !ability
                .conditions
                .iter()
                .all(|condition| condition.evaluate(scene, pokemon_id, ability_id))
            {
                continue;
            }

            let context = AttrContext {
                holder_id: pokemon_id,
                ability,
                passive,
                simulated: plan.simulated,
            };

            scene.phases.set_phase_queue_splice();
            let outcome = apply(scene, &entry.attr, context);

            if outcome.applied() {
                report.applied = true;
                debug!(
                    pokemon = %pokemon_id,
                    ability = ability.name,
                    hook = %plan.hook,
                    simulated = plan.simulated,
                    "ability attribute applied"
                );
                if let Some(holder) = scene.get_pokemon_by_id_mut(pokemon_id) {
                    if !holder.summon_data.abilities_applied.contains(&ability_id) {
                        holder.summon_data.abilities_applied.push(ability_id);
                    }
                    if !plan.simulated && !holder.battle_data.abilities_applied.contains(&ability_id) {
                        holder.battle_data.abilities_applied.push(ability_id);
                    }
                }

                if entry.show_ability && !plan.simulated {
                    if plan.show_instant {
                        scene.show_ability_instant(pokemon_id, passive);
                    } else {
                        scene.queue_show_ability(pokemon_id, passive);
                    }
                }

                if let ApplyOutcome::AppliedAwaitingCue(cue) = outcome {
                    if !plan.simulated {
                        let anim = match cue {
                            VisualCue::FormChange => BattleAnim::FormChange,
                            VisualCue::AbilityActivation => BattleAnim::AbilityActivation,
                        };
                        scene.phases.unshift_phase(Phase::PokemonAnim { pokemon_id, anim });
                    }
                }
            }
            scene.phases.clear_phase_queue_splice();

            if outcome.applied() {
                if let Some(message) =
                    entry
                        .attr
                        .trigger_message(&holder_name, ability.name, &plan.trigger_args)
                {
                    if !plan.simulated {
                        scene.queue_message(message.clone(), false);
                    }
                    report.messages.push(message);
                }
            }
        }
    }

    report
}

fn plan(hook: HookKind, simulated: bool) -> DispatchPlan {
    DispatchPlan {
        hook,
        simulated,
        show_instant: false,
        trigger_args: TriggerArgs::default(),
    }
}

fn any_attr(_: &AbAttr) -> bool {
    true
}

/// Dispatch one kind of generic attribute. Sets `cancelled` when it applies.
pub fn apply_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    kind: GenericAttr,
    cancelled: &mut bool,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::Generic, simulated),
        |attr| *attr == AbAttr::Generic(kind),
        |_, _, _| {
            *cancelled = true;
            ApplyOutcome::Applied
        },
    )
}

/// Lowers the one-in-`chance` odds of the next battle being a double battle.
pub fn apply_double_battle_chance_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    chance: &mut u32,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::Generic, simulated),
        |attr| *attr == AbAttr::Generic(GenericAttr::DoubleBattleChance),
        |_, _, _| {
            *chance = (*chance / 2).max(1);
            ApplyOutcome::Applied
        },
    )
}

pub fn apply_post_battle_init_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostBattleInit, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostBattleInit(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_pre_defend_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    attacker_id: CombatantId,
    move_id: Move,
    move_type: PokemonType,
    args: &mut PreDefendArgs,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PreDefend, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PreDefend(a) => a.apply(scene, ctx, attacker_id, move_id, move_type, args),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_defend_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    attacker_id: CombatantId,
    move_id: Move,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostDefend, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostDefend(a) => a.apply(scene, ctx, attacker_id, move_id),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_pre_attack_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    move_id: Move,
    move_type: &mut PokemonType,
    power: &mut f64,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PreAttack, simulated),
        any_attr,
        |_, attr, _| match attr {
            AbAttr::PreAttack(a) => a.apply(move_id, move_type, power),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_attack_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    defender_id: CombatantId,
    move_id: Move,
    damage: u32,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostAttack, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostAttack(a) => a.apply(scene, ctx, defender_id, move_id, damage),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_pre_stat_stage_change_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    stat: StatType,
    cancelled: &mut bool,
    simulated: bool,
) -> DispatchReport {
    let plan = DispatchPlan {
        trigger_args: TriggerArgs {
            stat: Some(stat),
            ..TriggerArgs::default()
        },
        ..plan(HookKind::PreStatStageChange, simulated)
    };
    apply_ab_attrs_internal(scene, pokemon_id, plan, any_attr, |_, attr, _| match attr {
        AbAttr::PreStatStageChange(a) => a.apply(stat, cancelled),
        _ => ApplyOutcome::NotApplied,
    })
}

pub fn apply_post_stat_stage_change_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    stats: &[StatType],
    stages: i8,
    self_induced: bool,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostStatStageChange, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostStatStageChange(a) => a.apply(scene, ctx, stats, stages, self_induced),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_summon_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostSummon, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostSummon(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

/// Shows the ability banner immediately, since the holder is about to leave.
pub fn apply_pre_switch_out_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    let plan = DispatchPlan {
        show_instant: true,
        ..plan(HookKind::PreSwitchOut, simulated)
    };
    apply_ab_attrs_internal(scene, pokemon_id, plan, any_attr, |scene, attr, ctx| {
        match attr {
            AbAttr::PreSwitchOut(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        }
    })
}

pub fn apply_post_victory_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostVictory, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostVictory(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_knock_out_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    knocked_out_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostKnockOut, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostKnockOut(a) => a.apply(scene, ctx, knocked_out_id),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_faint_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    attacker_id: Option<CombatantId>,
    move_id: Option<Move>,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostFaint, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostFaint(a) => a.apply(scene, ctx, attacker_id, move_id),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_turn_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostTurn, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostTurn(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_weather_change_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    weather: Option<WeatherType>,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostWeatherChange, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostWeatherChange(a) => a.apply(scene, ctx, weather),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_weather_lapse_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    weather: WeatherType,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostWeatherLapse, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostWeatherLapse(a) => a.apply(scene, ctx, weather),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_terrain_change_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    terrain: Option<TerrainType>,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostTerrainChange, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostTerrainChange(a) => a.apply(scene, ctx, terrain),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_pre_set_status_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    effect: StatusEffect,
    cancelled: &mut bool,
    simulated: bool,
) -> DispatchReport {
    let plan = DispatchPlan {
        trigger_args: TriggerArgs {
            status: Some(effect),
            ..TriggerArgs::default()
        },
        ..plan(HookKind::PreSetStatus, simulated)
    };
    apply_ab_attrs_internal(scene, pokemon_id, plan, any_attr, |_, attr, _| match attr {
        AbAttr::PreSetStatus(a) => a.apply(effect, cancelled),
        _ => ApplyOutcome::NotApplied,
    })
}

pub fn apply_post_set_status_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    effect: StatusEffect,
    source_id: Option<CombatantId>,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostSetStatus, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostSetStatus(a) => a.apply(scene, ctx, effect, source_id),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_pre_apply_battler_tag_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    tag: BattlerTagType,
    cancelled: &mut bool,
    simulated: bool,
) -> DispatchReport {
    let plan = DispatchPlan {
        trigger_args: TriggerArgs {
            tag: Some(tag),
            ..TriggerArgs::default()
        },
        ..plan(HookKind::PreApplyBattlerTag, simulated)
    };
    apply_ab_attrs_internal(scene, pokemon_id, plan, any_attr, |_, attr, _| match attr {
        AbAttr::PreApplyBattlerTag(a) => a.apply(tag, cancelled),
        _ => ApplyOutcome::NotApplied,
    })
}

/// Asks `pokemon_id`'s abilities whether they keep `other_id` from leaving.
pub fn apply_check_trapped_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    other_id: CombatantId,
    trapped: &mut bool,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::CheckTrapped, simulated),
        any_attr,
        |scene, attr, _| match attr {
            AbAttr::CheckTrapped(a) => a.apply(scene, other_id, trapped),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_battle_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostBattle, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostBattle(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_move_used_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    user_id: CombatantId,
    move_id: Move,
    targets: &[CombatantId],
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostMoveUsed, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostMoveUsed(a) => a.apply(scene, ctx, user_id, move_id, targets),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_item_lost_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostItemLost, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostItemLost(a) => a.apply(scene, ctx),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

/// Lets `pokemon_id`'s abilities scale a stat of `checked_id`, another
/// combatant on the field.
pub fn apply_field_stat_multiplier_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    stat: StatType,
    value: &mut f64,
    checked_id: CombatantId,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::FieldStatMultiplier, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::FieldStatMultiplier(a) => a.apply(scene, ctx, stat, value, checked_id),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_stat_multiplier_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    stat: StatType,
    value: &mut f64,
    move_id: Option<Move>,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::StatMultiplier, simulated),
        any_attr,
        |_, attr, _| match attr {
            AbAttr::StatMultiplier(a) => a.apply(stat, value, move_id),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

pub fn apply_post_damage_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    damage: u32,
    simulated: bool,
) -> DispatchReport {
    apply_ab_attrs_internal(
        scene,
        pokemon_id,
        plan(HookKind::PostDamage, simulated),
        any_attr,
        |scene, attr, ctx| match attr {
            AbAttr::PostDamage(a) => a.apply(scene, ctx, damage),
            _ => ApplyOutcome::NotApplied,
        },
    )
}

/// Shows the ability banner immediately, ahead of the weather's own text.
pub fn apply_pre_weather_effect_ab_attrs(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    weather: WeatherType,
    cancelled: &mut bool,
    simulated: bool,
) -> DispatchReport {
    let plan = DispatchPlan {
        show_instant: true,
        ..plan(HookKind::PreWeatherEffect, simulated)
    };
    apply_ab_attrs_internal(scene, pokemon_id, plan, any_attr, |_, attr, _| match attr {
        AbAttr::PreWeatherEffect(a) => a.apply(weather, cancelled),
        _ => ApplyOutcome::NotApplied,
    })
}
