//! What each persistent modifier does when its event fires.

use crate::battle::scene::BattleScene;
use crate::modifiers::persistent::PersistentModifier;
use crate::modifiers::types::{BerryType, GlobalItem, HeldItem, ModifierClass, ModifierKind};
use crate::pokemon::CombatantId;
use schema::{BattlerTagType, PokemonType, StatType};

/// Event payload handed to persistent modifiers. Out-values are borrowed so
/// several stacked items can adjust them in turn.
#[derive(Debug)]
pub enum ModifierArgs<'a> {
    TurnEnd {
        pokemon_id: CombatantId,
    },
    DamageDealt {
        pokemon_id: CombatantId,
        damage: u32,
    },
    Survive {
        pokemon_id: CombatantId,
        survived: &'a mut bool,
    },
    Flinch {
        pokemon_id: CombatantId,
        target_id: CombatantId,
    },
    AttackTypeBoost {
        pokemon_id: CombatantId,
        move_type: PokemonType,
        power: &'a mut f64,
    },
    BerryCheck {
        pokemon_id: CombatantId,
    },
    StatStagesLowered {
        pokemon_id: CombatantId,
    },
    Money {
        amount: &'a mut f64,
    },
    HealingBoost {
        amount: &'a mut f64,
    },
    DoubleBattleChance {
        chance: &'a mut u32,
    },
}

impl ModifierArgs<'_> {
    fn pokemon_id(&self) -> Option<CombatantId> {
        match self {
            ModifierArgs::TurnEnd { pokemon_id }
            | ModifierArgs::DamageDealt { pokemon_id, .. }
            | ModifierArgs::Survive { pokemon_id, .. }
            | ModifierArgs::Flinch { pokemon_id, .. }
            | ModifierArgs::AttackTypeBoost { pokemon_id, .. }
            | ModifierArgs::BerryCheck { pokemon_id }
            | ModifierArgs::StatStagesLowered { pokemon_id } => Some(*pokemon_id),
            ModifierArgs::Money { .. }
            | ModifierArgs::HealingBoost { .. }
            | ModifierArgs::DoubleBattleChance { .. } => None,
        }
    }

    fn class(&self) -> &'static [ModifierClass] {
        match self {
            ModifierArgs::TurnEnd { .. } => &[ModifierClass::TurnHeal],
            ModifierArgs::DamageDealt { .. } => &[ModifierClass::HitHeal],
            ModifierArgs::Survive { .. } => &[ModifierClass::SurviveDamage],
            ModifierArgs::Flinch { .. } => &[ModifierClass::FlinchChance],
            ModifierArgs::AttackTypeBoost { .. } => &[ModifierClass::AttackTypeBooster],
            ModifierArgs::BerryCheck { .. } => &[ModifierClass::Berry],
            ModifierArgs::StatStagesLowered { .. } => &[ModifierClass::ResetNegativeStatStage],
            ModifierArgs::Money { .. } => &[ModifierClass::MoneyMultiplier],
            ModifierArgs::HealingBoost { .. } => &[ModifierClass::HealingBooster],
            ModifierArgs::DoubleBattleChance { .. } => &[ModifierClass::DoubleBattleChanceBooster],
        }
    }
}

/// Whether a berry would trigger for the holder right now.
fn berry_wanted(scene: &BattleScene, berry: BerryType, pokemon_id: CombatantId) -> bool {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return false;
    };
    if pokemon.is_fainted() {
        return false;
    }
    match berry {
        BerryType::Sitrus => pokemon.hp <= pokemon.max_hp() / 2,
        BerryType::Lum => pokemon.status.is_some() || pokemon.has_tag(BattlerTagType::Confused),
    }
}

impl PersistentModifier {
    /// Whether this modifier answers `args`: right class, right holder, and
    /// any item-specific precondition.
    pub fn should_apply(&self, scene: &BattleScene, args: &ModifierArgs<'_>) -> bool {
        if !args.class().contains(&self.class()) || self.stack_count == 0 {
            return false;
        }
        if let (Some(holder), Some(pokemon_id)) = (self.pokemon_id(), args.pokemon_id()) {
            if holder != pokemon_id {
                return false;
            }
        }
        match (self.kind, args) {
            (
                ModifierKind::Held {
                    item: HeldItem::AttackTypeBooster(boosted),
                    ..
                },
                ModifierArgs::AttackTypeBoost { move_type, .. },
            ) => boosted == *move_type,
            (
                ModifierKind::Held {
                    item: HeldItem::Berry(berry),
                    pokemon_id,
                },
                _,
            ) => berry_wanted(scene, berry, pokemon_id),
            _ => true,
        }
    }

    /// Run the effect. Returns whether it did anything.
    pub fn apply(&self, scene: &mut BattleScene, args: &mut ModifierArgs<'_>) -> bool {
        let stacks = self.stack_count;
        match (self.kind, args) {
            (
                ModifierKind::Held {
                    item: HeldItem::Leftovers,
                    pokemon_id,
                },
                ModifierArgs::TurnEnd { .. },
            ) => {
                let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
                    return false;
                };
                if pokemon.is_full_hp() || pokemon.is_fainted() {
                    return false;
                }
                let amount = ((u32::from(pokemon.max_hp()) / 16).max(1) * stacks) as u16;
                let message = format!(
                    "{} restored a little HP using\nits {}!",
                    pokemon.name,
                    HeldItem::Leftovers
                );
                scene.queue_heal(pokemon_id, amount, Some(message));
                true
            }
            (
                ModifierKind::Held {
                    item: HeldItem::ShellBell,
                    pokemon_id,
                },
                ModifierArgs::DamageDealt { damage, .. },
            ) => {
                let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
                    return false;
                };
                if *damage == 0 || pokemon.is_full_hp() || pokemon.is_fainted() {
                    return false;
                }
                let amount = ((*damage / 8).max(1) * stacks).min(u32::from(u16::MAX)) as u16;
                let message = format!(
                    "{} restored a little HP using\nits {}!",
                    pokemon.name,
                    HeldItem::ShellBell
                );
                scene.queue_heal(pokemon_id, amount, Some(message));
                true
            }
            (
                ModifierKind::Held {
                    item: HeldItem::FocusBand,
                    pokemon_id,
                },
                ModifierArgs::Survive { survived, .. },
            ) => {
                if **survived || scene.rng.rand_seed_int(10, 0) >= stacks as i32 {
                    return false;
                }
                **survived = true;
                let message = format!(
                    "{} hung on\nusing its {}!",
                    scene.pokemon_name(pokemon_id),
                    HeldItem::FocusBand
                );
                scene.queue_message(message, false);
                true
            }
            (
                ModifierKind::Held {
                    item: HeldItem::KingsRock,
                    pokemon_id,
                },
                ModifierArgs::Flinch { target_id, .. },
            ) => {
                if scene.rng.rand_seed_int(10, 0) >= stacks as i32 {
                    return false;
                }
                scene.add_tag(
                    *target_id,
                    BattlerTagType::Flinched,
                    BattlerTagType::Flinched.default_turns(),
                    Some(pokemon_id),
                )
            }
            (
                ModifierKind::Held {
                    item: HeldItem::AttackTypeBooster(_),
                    ..
                },
                ModifierArgs::AttackTypeBoost { power, .. },
            ) => {
                **power *= 1.0 + 0.2 * f64::from(stacks);
                true
            }
            (
                ModifierKind::Held {
                    item: HeldItem::Berry(berry),
                    pokemon_id,
                },
                ModifierArgs::BerryCheck { .. },
            ) => eat_berry(scene, berry, pokemon_id),
            (
                ModifierKind::Held {
                    item: HeldItem::WhiteHerb,
                    pokemon_id,
                },
                ModifierArgs::StatStagesLowered { .. },
            ) => {
                let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
                    return false;
                };
                let lowered: Vec<StatType> = pokemon
                    .summon_data
                    .stat_stages
                    .iter()
                    .filter(|(_, stage)| **stage < 0)
                    .map(|(stat, _)| *stat)
                    .collect();
                if lowered.is_empty() {
                    return false;
                }
                for stat in lowered {
                    pokemon.set_stat_stage(stat, 0);
                }
                let message = format!(
                    "{} returned its status to normal\nusing its {}!",
                    pokemon.name,
                    HeldItem::WhiteHerb
                );
                scene.queue_message(message, false);
                true
            }
            (ModifierKind::Global(GlobalItem::AmuletCoin), ModifierArgs::Money { amount }) => {
                **amount *= 1.0 + 0.2 * f64::from(stacks);
                true
            }
            (ModifierKind::Global(GlobalItem::HealingCharm), ModifierArgs::HealingBoost { amount }) => {
                **amount *= 1.0 + 0.1 * f64::from(stacks);
                true
            }
            (ModifierKind::Global(GlobalItem::Lure), ModifierArgs::DoubleBattleChance { chance }) => {
                **chance = (**chance / 2).max(1);
                true
            }
            _ => false,
        }
    }
}

fn eat_berry(scene: &mut BattleScene, berry: BerryType, pokemon_id: CombatantId) -> bool {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return false;
    };
    let name = pokemon.name.clone();
    let max_hp = pokemon.max_hp();
    match berry {
        BerryType::Sitrus => {
            let message = format!("{}'s {}\nrestored its health!", name, berry);
            scene.queue_heal(pokemon_id, (max_hp / 4).max(1), Some(message));
        }
        BerryType::Lum => {
            if let Some(status) = scene.reset_status(pokemon_id) {
                scene.queue_message(status.heal_text(&name), false);
            }
            scene.remove_tag(pokemon_id, BattlerTagType::Confused);
        }
    }
    if let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) {
        pokemon.battle_data.berries_eaten.push(berry);
    }
    true
}
