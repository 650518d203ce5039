//! Behavior of each attribute family.
//!
//! Every `apply` returns the verdict a real application would produce. When
//! `ctx.simulated` is set, random draws are still made (so a simulated and a real
//! call stay in step) but nothing is queued and no combatant is mutated.

use crate::abilities::attrs::*;
use crate::abilities::dispatch::{apply_ab_attrs, AttrContext, PreDefendArgs};
use crate::abilities::get_ability;
use crate::battle::phase::Phase;
use crate::battle::scene::BattleScene;
use crate::pokemon::CombatantId;
use schema::{
    get_move_data, BattlerTagType, Move, MoveData, MoveEffect, MoveTarget, PokemonType, StatType,
    StatusEffect, TerrainType, WeatherType,
};

use ApplyOutcome::{Applied, NotApplied};

fn max_hp_fraction(max_hp: u16, denominator: u16) -> u16 {
    (max_hp / denominator.max(1)).max(1)
}

impl PostBattleInitAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        match self {
            PostBattleInitAttr::StatStageChange { stats, stages } => {
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, stats.clone(), *stages);
                }
                Applied
            }
        }
    }
}

/// Shared gate of the type-immunity family.
fn type_immunity_applies(
    ctx: AttrContext,
    attacker_id: CombatantId,
    move_data: &MoveData,
    move_type: PokemonType,
    immune_type: PokemonType,
    damaging_only: bool,
) -> bool {
    if move_data.target.is_field_target() || attacker_id == ctx.holder_id {
        return false;
    }
    if damaging_only && !move_data.is_damaging() {
        return false;
    }
    move_type == immune_type
}

impl PreDefendAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        attacker_id: CombatantId,
        move_id: Move,
        move_type: PokemonType,
        args: &mut PreDefendArgs,
    ) -> ApplyOutcome {
        let move_data = get_move_data(move_id);

        // Once damage is known only endure effects are consulted.
        if args.incoming_damage.is_some() && !matches!(self, PreDefendAttr::FullHpEndure) {
            return NotApplied;
        }

        match self {
            PreDefendAttr::TypeImmunity {
                immune_type,
                damaging_only,
            } => {
                if !type_immunity_applies(
                    ctx,
                    attacker_id,
                    &move_data,
                    move_type,
                    *immune_type,
                    *damaging_only,
                ) {
                    return NotApplied;
                }
                args.damage_multiplier = 0.0;
                Applied
            }
            PreDefendAttr::TypeImmunityHeal { immune_type } => {
                if !type_immunity_applies(ctx, attacker_id, &move_data, move_type, *immune_type, false)
                {
                    return NotApplied;
                }
                args.damage_multiplier = 0.0;
                args.cancelled = true;
                let Some(holder) = scene.get_pokemon_by_id(ctx.holder_id) else {
                    return NotApplied;
                };
                if !holder.is_full_hp() && !ctx.simulated {
                    let amount = max_hp_fraction(holder.max_hp(), 4);
                    let message = format!(
                        "{}'s {}\nrestored its HP a little!",
                        holder.name, ctx.ability.name
                    );
                    scene.queue_heal(ctx.holder_id, amount, Some(message));
                }
                Applied
            }
            PreDefendAttr::TypeImmunityAddBattlerTag { immune_type, tag } => {
                if !type_immunity_applies(ctx, attacker_id, &move_data, move_type, *immune_type, false)
                {
                    return NotApplied;
                }
                args.damage_multiplier = 0.0;
                args.cancelled = true;
                if !ctx.simulated {
                    scene.add_tag(ctx.holder_id, *tag, tag.default_turns(), Some(ctx.holder_id));
                }
                Applied
            }
            PreDefendAttr::TypeImmunityStatStageChange {
                immune_type,
                stat,
                stages,
            } => {
                if !type_immunity_applies(ctx, attacker_id, &move_data, move_type, *immune_type, false)
                {
                    return NotApplied;
                }
                args.damage_multiplier = 0.0;
                args.cancelled = true;
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, vec![*stat], *stages);
                }
                Applied
            }
            PreDefendAttr::ReceivedTypeDamageMultiplier {
                move_type: boosted_type,
                multiplier,
            } => {
                if move_type != *boosted_type {
                    return NotApplied;
                }
                args.damage_multiplier *= multiplier;
                Applied
            }
            PreDefendAttr::FullHpEndure => {
                let Some(damage) = args.incoming_damage else {
                    return NotApplied;
                };
                let Some(holder) = scene.get_pokemon_by_id(ctx.holder_id) else {
                    return NotApplied;
                };
                if holder.is_full_hp() && holder.max_hp() > 1 && damage >= u32::from(holder.hp) {
                    args.incoming_damage = Some(u32::from(holder.hp) - 1);
                    Applied
                } else {
                    NotApplied
                }
            }
        }
    }
}

impl PostDefendAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        attacker_id: CombatantId,
        move_id: Move,
    ) -> ApplyOutcome {
        let move_data = get_move_data(move_id);
        if !move_data.flags.makes_contact || attacker_id == ctx.holder_id {
            return NotApplied;
        }
        let Some(attacker) = scene.get_pokemon_by_id(attacker_id) else {
            return NotApplied;
        };

        match self {
            PostDefendAttr::ContactApplyStatusEffect { chance, effects } => {
                if attacker.status.is_some() || effects.is_empty() {
                    return NotApplied;
                }
                if scene.rng.rand_seed_int(100, 0) >= i32::from(*chance) {
                    return NotApplied;
                }
                let effect = if effects.len() == 1 {
                    effects[0]
                } else {
                    effects[scene.rng.rand_seed_int(effects.len() as u32, 0) as usize]
                };
                let applied = if ctx.simulated {
                    scene.can_set_status(attacker_id, effect, Some(ctx.holder_id), true)
                } else {
                    scene.try_set_status(attacker_id, effect, Some(ctx.holder_id))
                };
                ApplyOutcome::from_applied(applied)
            }
            PostDefendAttr::ContactDamage { ratio } => {
                let amount = u32::from(max_hp_fraction(attacker.max_hp(), *ratio));
                if scene.has_generic_attr(attacker_id, GenericAttr::BlockNonDirectDamage) {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.damage_and_update(attacker_id, amount, Some(ctx.holder_id));
                }
                Applied
            }
        }
    }
}

impl PreAttackAttr {
    pub fn apply(&self, move_id: Move, move_type: &mut PokemonType, power: &mut f64) -> ApplyOutcome {
        match self {
            PreAttackAttr::MoveTypeChange {
                from,
                to,
                power_multiplier,
            } => {
                if !get_move_data(move_id).is_damaging() || *move_type != *from {
                    return NotApplied;
                }
                *move_type = *to;
                *power *= power_multiplier;
                Applied
            }
        }
    }
}

impl PostAttackAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        defender_id: CombatantId,
        move_id: Move,
        damage: u32,
    ) -> ApplyOutcome {
        if damage == 0 || defender_id == ctx.holder_id {
            return NotApplied;
        }
        match self {
            PostAttackAttr::ApplyBattlerTag { chance, tag } => {
                let defender_active = scene
                    .get_pokemon_by_id(defender_id)
                    .is_some_and(|defender| defender.is_active());
                let move_applies_tag = get_move_data(move_id)
                    .effects
                    .iter()
                    .any(|effect| matches!(effect, MoveEffect::Tag { tag: t, .. } if t == tag));
                if !defender_active || move_applies_tag {
                    return NotApplied;
                }
                if scene.rng.rand_seed_int(100, 0) >= i32::from(*chance) {
                    return NotApplied;
                }
                let applied = if ctx.simulated {
                    scene.can_add_tag(defender_id, *tag)
                } else {
                    scene.add_tag(defender_id, *tag, tag.default_turns(), Some(ctx.holder_id))
                };
                ApplyOutcome::from_applied(applied)
            }
            PostAttackAttr::StealHeldItem => {
                let candidates: Vec<_> = scene
                    .held_items_of(defender_id)
                    .into_iter()
                    .filter(|modifier| modifier.is_transferable)
                    .map(|modifier| modifier.id)
                    .collect();
                let Some(&stolen) = scene.rng.rand_seed_item(&candidates) else {
                    return NotApplied;
                };
                if ctx.simulated {
                    return ApplyOutcome::from_applied(
                        scene.can_transfer_held_item_modifier(stolen, ctx.holder_id),
                    );
                }
                let item_name = scene
                    .find_modifier_by_id(stolen)
                    .map(|modifier| modifier.name())
                    .unwrap_or_default();
                if !scene.try_transfer_held_item_modifier(stolen, ctx.holder_id, 1, true) {
                    return NotApplied;
                }
                let message = format!(
                    "{} stole\n{}'s {}!",
                    scene.pokemon_name(ctx.holder_id),
                    scene.pokemon_name(defender_id),
                    item_name
                );
                scene.queue_message(message, false);
                Applied
            }
        }
    }
}

impl PreStatStageChangeAttr {
    pub fn apply(&self, stat: StatType, cancelled: &mut bool) -> ApplyOutcome {
        match self {
            PreStatStageChangeAttr::ProtectStat { stat: protected } => {
                if protected.is_some_and(|protected| protected != stat) {
                    return NotApplied;
                }
                *cancelled = true;
                Applied
            }
        }
    }
}

impl PostStatStageChangeAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        _changed: &[StatType],
        stages_changed: i8,
        self_induced: bool,
    ) -> ApplyOutcome {
        match self {
            PostStatStageChangeAttr::StatStageChangeOnDrop { stats, stages } => {
                if self_induced || stages_changed >= 0 {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, stats.clone(), *stages);
                }
                Applied
            }
        }
    }
}

impl PostSummonAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        match self {
            PostSummonAttr::WeatherChange(weather) => {
                let current = scene.arena.weather_type();
                if current.is_some_and(|current| current.is_immutable()) && !weather.is_immutable() {
                    return NotApplied;
                }
                if ctx.simulated {
                    ApplyOutcome::from_applied(current != Some(*weather))
                } else {
                    ApplyOutcome::from_applied(scene.try_set_weather(Some(*weather)))
                }
            }
            PostSummonAttr::TerrainChange(terrain) => {
                if ctx.simulated {
                    ApplyOutcome::from_applied(scene.arena.terrain_type() != Some(*terrain))
                } else {
                    ApplyOutcome::from_applied(scene.try_set_terrain(Some(*terrain)))
                }
            }
            PostSummonAttr::StatStageChange {
                stats,
                stages,
                self_target,
                intimidate,
            } => {
                if ctx.simulated {
                    return Applied;
                }
                scene.queue_show_ability(ctx.holder_id, ctx.passive);
                if *self_target {
                    scene.queue_stat_stage_change(ctx.holder_id, true, stats.clone(), *stages);
                    return Applied;
                }
                for opponent_id in scene.get_opponents(ctx.holder_id) {
                    let mut cancelled = false;
                    if *intimidate {
                        apply_ab_attrs(
                            scene,
                            opponent_id,
                            GenericAttr::IntimidateImmunity,
                            &mut cancelled,
                            false,
                        );
                    }
                    cancelled |= scene
                        .get_pokemon_by_id(opponent_id)
                        .is_some_and(|opponent| opponent.has_tag(BattlerTagType::Substitute));
                    if !cancelled {
                        scene.queue_stat_stage_change(opponent_id, false, stats.clone(), *stages);
                    }
                }
                Applied
            }
            PostSummonAttr::AddBattlerTag { tag, turns } => {
                let applied = if ctx.simulated {
                    scene.can_add_tag(ctx.holder_id, *tag)
                } else {
                    scene.add_tag(ctx.holder_id, *tag, *turns, Some(ctx.holder_id))
                };
                ApplyOutcome::from_applied(applied)
            }
            PostSummonAttr::Message(_) => Applied,
        }
    }
}

impl PreSwitchOutAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        let Some(holder) = scene.get_pokemon_by_id(ctx.holder_id) else {
            return NotApplied;
        };
        match self {
            PreSwitchOutAttr::ResetStatus => {
                if holder.status.is_none() {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.reset_status(ctx.holder_id);
                }
                Applied
            }
            PreSwitchOutAttr::Heal { denominator } => {
                if holder.is_full_hp() {
                    return NotApplied;
                }
                let amount = max_hp_fraction(holder.max_hp(), *denominator);
                if !ctx.simulated {
                    scene.heal(ctx.holder_id, amount);
                }
                Applied
            }
        }
    }
}

impl PostVictoryAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        match self {
            PostVictoryAttr::StatStageChange { stat, stages } => {
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, vec![*stat], *stages);
                }
                Applied
            }
        }
    }
}

impl PostKnockOutAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        _knocked_out_id: CombatantId,
    ) -> ApplyOutcome {
        match self {
            PostKnockOutAttr::StatStageChange { stat, stages } => {
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, vec![*stat], *stages);
                }
                Applied
            }
        }
    }
}

impl PostFaintAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        attacker_id: Option<CombatantId>,
        move_id: Option<Move>,
    ) -> ApplyOutcome {
        let (Some(attacker_id), Some(move_id)) = (attacker_id, move_id) else {
            return NotApplied;
        };
        match self {
            PostFaintAttr::ContactDamage { ratio } => {
                if attacker_id == ctx.holder_id || !get_move_data(move_id).flags.makes_contact {
                    return NotApplied;
                }
                let Some(attacker) = scene.get_pokemon_by_id(attacker_id) else {
                    return NotApplied;
                };
                if attacker.is_fainted() {
                    return NotApplied;
                }
                let amount = u32::from(max_hp_fraction(attacker.max_hp(), *ratio));
                if scene.has_generic_attr(attacker_id, GenericAttr::BlockNonDirectDamage) {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.damage_and_update(attacker_id, amount, Some(ctx.holder_id));
                }
                Applied
            }
        }
    }
}

impl PostTurnAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        let Some(holder) = scene.get_pokemon_by_id(ctx.holder_id) else {
            return NotApplied;
        };
        match self {
            PostTurnAttr::SpeedBoost => {
                if holder.turn_data.switched_in_this_turn || holder.turn_data.failed_run_away {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, vec![StatType::Spe], 1);
                }
                Applied
            }
            PostTurnAttr::ResetStatus { ally_target } => {
                let target_id = if *ally_target {
                    match scene.get_ally(ctx.holder_id) {
                        Some(ally) => ally,
                        None => return NotApplied,
                    }
                } else {
                    ctx.holder_id
                };
                let Some(status) = scene
                    .get_pokemon_by_id(target_id)
                    .and_then(|target| target.status)
                else {
                    return NotApplied;
                };
                if !ctx.simulated {
                    let text = status.effect.heal_text(&scene.pokemon_name(target_id));
                    scene.queue_message(text, false);
                    scene.reset_status(target_id);
                }
                Applied
            }
        }
    }
}

impl PostWeatherChangeAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        weather: Option<WeatherType>,
    ) -> ApplyOutcome {
        match self {
            PostWeatherChangeAttr::FormChange {
                forms,
                default_form,
            } => {
                let Some(current_form) = scene
                    .get_pokemon_by_id(ctx.holder_id)
                    .map(|holder| holder.form_index)
                else {
                    return NotApplied;
                };
                let weather = weather.filter(|_| !scene.is_weather_suppressed());
                let desired = weather
                    .and_then(|weather| {
                        forms
                            .iter()
                            .find(|(form_weather, _)| *form_weather == weather)
                            .map(|(_, form)| *form)
                    })
                    .unwrap_or(*default_form);
                if desired == current_form {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.trigger_pokemon_form_change(ctx.holder_id, desired, false);
                }
                ApplyOutcome::AppliedAwaitingCue(VisualCue::FormChange)
            }
        }
    }
}

impl PostWeatherLapseAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        weather: WeatherType,
    ) -> ApplyOutcome {
        match self {
            PostWeatherLapseAttr::Heal { weathers, factor } => {
                if !weathers.contains(&weather) {
                    return NotApplied;
                }
                let Some(holder) = scene.get_pokemon_by_id(ctx.holder_id) else {
                    return NotApplied;
                };
                if holder.is_full_hp() {
                    return NotApplied;
                }
                if !ctx.simulated {
                    let amount = max_hp_fraction(holder.max_hp(), 16 / (*factor).max(1));
                    let message = format!(
                        "{}'s {}\nrestored its HP a little!",
                        holder.name, ctx.ability.name
                    );
                    scene.queue_heal(ctx.holder_id, amount, Some(message));
                }
                Applied
            }
        }
    }
}

impl PostTerrainChangeAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        terrain: Option<TerrainType>,
    ) -> ApplyOutcome {
        match self {
            PostTerrainChangeAttr::AddBattlerTag { tag, terrains } => {
                if !terrain.is_some_and(|terrain| terrains.contains(&terrain)) {
                    return NotApplied;
                }
                let applied = if ctx.simulated {
                    scene.can_add_tag(ctx.holder_id, *tag)
                } else {
                    scene.add_tag(ctx.holder_id, *tag, 0, Some(ctx.holder_id))
                };
                ApplyOutcome::from_applied(applied)
            }
        }
    }
}

impl PreSetStatusAttr {
    pub fn apply(&self, effect: StatusEffect, cancelled: &mut bool) -> ApplyOutcome {
        match self {
            PreSetStatusAttr::StatusEffectImmunity { effects } => {
                if !effects.is_empty() && !effects.contains(&effect) {
                    return NotApplied;
                }
                *cancelled = true;
                Applied
            }
        }
    }
}

impl PostSetStatusAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        effect: StatusEffect,
        source_id: Option<CombatantId>,
    ) -> ApplyOutcome {
        match self {
            PostSetStatusAttr::SyncStatus => {
                let Some(source_id) = source_id.filter(|source| *source != ctx.holder_id) else {
                    return NotApplied;
                };
                let syncable = matches!(
                    effect,
                    StatusEffect::Burn
                        | StatusEffect::Paralysis
                        | StatusEffect::Poison
                        | StatusEffect::Toxic
                );
                if !syncable {
                    return NotApplied;
                }
                let applied = if ctx.simulated {
                    scene.can_set_status(source_id, effect, Some(ctx.holder_id), true)
                } else {
                    scene.try_set_status(source_id, effect, Some(ctx.holder_id))
                };
                ApplyOutcome::from_applied(applied)
            }
        }
    }
}

impl PreApplyBattlerTagAttr {
    pub fn apply(&self, tag: BattlerTagType, cancelled: &mut bool) -> ApplyOutcome {
        match self {
            PreApplyBattlerTagAttr::BattlerTagImmunity { tags } => {
                if !tags.contains(&tag) {
                    return NotApplied;
                }
                *cancelled = true;
                Applied
            }
        }
    }
}

impl TrapCondition {
    fn holds(&self, scene: &BattleScene, other_id: CombatantId) -> bool {
        let Some(other) = scene.get_pokemon_by_id(other_id) else {
            return false;
        };
        match self {
            TrapCondition::TargetWithoutAbility(ability) => !other.has_ability(*ability),
            TrapCondition::TargetOfType(pokemon_type) => other.is_of_type(*pokemon_type),
            TrapCondition::TargetGrounded => other.is_grounded(),
        }
    }
}

impl CheckTrappedAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        other_id: CombatantId,
        trapped: &mut bool,
    ) -> ApplyOutcome {
        match self {
            CheckTrappedAttr::ArenaTrap { condition } => {
                if !condition.holds(scene, other_id) {
                    *trapped = false;
                    return NotApplied;
                }
                let escapes = scene.get_pokemon_by_id(other_id).is_some_and(|other| {
                    other.is_of_type(PokemonType::Ghost)
                        || other.has_ability(schema::AbilityId::RunAway)
                });
                *trapped = !escapes;
                ApplyOutcome::from_applied(!escapes)
            }
        }
    }
}

impl PostBattleAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        match self {
            PostBattleAttr::Loot => {
                let loot = scene.battle.post_battle_loot.clone();
                let Some(index) = (!loot.is_empty())
                    .then(|| scene.rng.rand_seed_int(loot.len() as u32, 0) as usize)
                else {
                    return NotApplied;
                };
                let item = loot[index];
                if ctx.simulated {
                    return ApplyOutcome::from_applied(scene.can_hold_item(ctx.holder_id, item));
                }
                if !scene.add_held_item(ctx.holder_id, item, 1) {
                    return NotApplied;
                }
                scene.battle.post_battle_loot.remove(index);
                let message = format!("{} found\none {}!", scene.pokemon_name(ctx.holder_id), item);
                scene.queue_message(message, false);
                Applied
            }
        }
    }
}

impl PostMoveUsedAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        user_id: CombatantId,
        move_id: Move,
        targets: &[CombatantId],
    ) -> ApplyOutcome {
        match self {
            PostMoveUsedAttr::Dancer => {
                let move_data = get_move_data(move_id);
                if !move_data.flags.dance || user_id == ctx.holder_id {
                    return NotApplied;
                }
                let (Some(holder), Some(user)) = (
                    scene.get_pokemon_by_id(ctx.holder_id),
                    scene.get_pokemon_by_id(user_id),
                ) else {
                    return NotApplied;
                };
                if !holder.is_active() {
                    return NotApplied;
                }
                if !ctx.simulated {
                    let new_targets = if move_data.target == MoveTarget::User {
                        vec![ctx.holder_id]
                    } else if holder.is_player == user.is_player {
                        targets.to_vec()
                    } else {
                        vec![user_id]
                    };
                    scene.phases.unshift_phase(Phase::Move {
                        pokemon_id: ctx.holder_id,
                        move_id,
                        move_index: None,
                        targets: new_targets,
                    });
                }
                Applied
            }
        }
    }
}

impl PostItemLostAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext) -> ApplyOutcome {
        match self {
            PostItemLostAttr::ApplyBattlerTag(tag) => {
                let has_tag = scene
                    .get_pokemon_by_id(ctx.holder_id)
                    .is_some_and(|holder| holder.has_tag(*tag));
                if has_tag {
                    return NotApplied;
                }
                let applied = if ctx.simulated {
                    scene.can_add_tag(ctx.holder_id, *tag)
                } else {
                    scene.add_tag(ctx.holder_id, *tag, 0, Some(ctx.holder_id))
                };
                ApplyOutcome::from_applied(applied)
            }
        }
    }
}

impl FieldStatMultiplierAttr {
    pub fn apply(
        &self,
        scene: &mut BattleScene,
        ctx: AttrContext,
        stat: StatType,
        value: &mut f64,
        checked_id: CombatantId,
    ) -> ApplyOutcome {
        match self {
            FieldStatMultiplierAttr::MultiplyOthers {
                stat: lowered,
                multiplier,
            } => {
                if *lowered != stat || checked_id == ctx.holder_id {
                    return NotApplied;
                }
                let Some(checked) = scene.get_pokemon_by_id(checked_id) else {
                    return NotApplied;
                };
                // Holders of the same effect are not affected by each other.
                let shares_effect = [Some(checked.ability_id()), checked.passive_ability_id()]
                    .into_iter()
                    .flatten()
                    .any(|ability| {
                        get_ability(ability).has_attr(|attr| {
                            matches!(
                                attr,
                                AbAttr::FieldStatMultiplier(FieldStatMultiplierAttr::MultiplyOthers { stat: s, .. })
                                    if *s == stat
                            )
                        })
                    });
                if shares_effect {
                    return NotApplied;
                }
                *value *= multiplier;
                Applied
            }
        }
    }
}

impl StatMultiplierAttr {
    pub fn apply(&self, stat: StatType, value: &mut f64, move_id: Option<Move>) -> ApplyOutcome {
        match self {
            StatMultiplierAttr::Multiply {
                stat: boosted,
                multiplier,
                category,
            } => {
                if *boosted != stat {
                    return NotApplied;
                }
                if let Some(category) = category {
                    let matches_category = move_id
                        .is_some_and(|move_id| get_move_data(move_id).category == *category);
                    if !matches_category {
                        return NotApplied;
                    }
                }
                *value *= multiplier;
                Applied
            }
        }
    }
}

impl PostDamageAttr {
    pub fn apply(&self, scene: &mut BattleScene, ctx: AttrContext, damage: u32) -> ApplyOutcome {
        match self {
            PostDamageAttr::StatStageChangeBelowHalf { stat, stages } => {
                let Some(holder) = scene.get_pokemon_by_id(ctx.holder_id) else {
                    return NotApplied;
                };
                let half = u32::from(holder.max_hp()) / 2;
                let hp = u32::from(holder.hp);
                if holder.is_fainted() || hp > half || hp + damage <= half {
                    return NotApplied;
                }
                if !ctx.simulated {
                    scene.queue_stat_stage_change(ctx.holder_id, true, vec![*stat], *stages);
                }
                Applied
            }
        }
    }
}

impl PreWeatherEffectAttr {
    pub fn apply(&self, weather: WeatherType, cancelled: &mut bool) -> ApplyOutcome {
        match self {
            PreWeatherEffectAttr::BlockWeatherDamage { weathers } => {
                if !weathers.is_empty() && !weathers.contains(&weather) {
                    return NotApplied;
                }
                *cancelled = true;
                Applied
            }
            PreWeatherEffectAttr::SuppressWeatherEffect { affects_immutable } => {
                if weather.is_immutable() && !affects_immutable {
                    return NotApplied;
                }
                *cancelled = true;
                Applied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protect_stat_only_guards_its_stat() {
        let attr = PreStatStageChangeAttr::ProtectStat {
            stat: Some(StatType::Atk),
        };
        let mut cancelled = false;
        assert_eq!(attr.apply(StatType::Def, &mut cancelled), NotApplied);
        assert!(!cancelled);
        assert_eq!(attr.apply(StatType::Atk, &mut cancelled), Applied);
        assert!(cancelled);
    }

    #[test]
    fn test_move_type_change_boosts_matching_damaging_moves() {
        let attr = PreAttackAttr::MoveTypeChange {
            from: PokemonType::Normal,
            to: PokemonType::Fairy,
            power_multiplier: 1.2,
        };
        let mut move_type = PokemonType::Normal;
        let mut power = 90.0;
        assert_eq!(attr.apply(Move::HyperVoice, &mut move_type, &mut power), Applied);
        assert_eq!(move_type, PokemonType::Fairy);
        assert!((power - 108.0).abs() < 1e-9);

        let mut move_type = PokemonType::Normal;
        let mut power = 0.0;
        assert_eq!(attr.apply(Move::Growl, &mut move_type, &mut power), NotApplied);
        assert_eq!(move_type, PokemonType::Normal);
    }

    #[test]
    fn test_weather_suppression_respects_immutable_weather() {
        let cloud_nine = PreWeatherEffectAttr::SuppressWeatherEffect {
            affects_immutable: false,
        };
        let mut cancelled = false;
        assert_eq!(cloud_nine.apply(WeatherType::HarshSun, &mut cancelled), NotApplied);
        assert_eq!(cloud_nine.apply(WeatherType::Sandstorm, &mut cancelled), Applied);
        assert!(cancelled);
    }
}
