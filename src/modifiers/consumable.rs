use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::modifiers::effects::ModifierArgs;
use crate::modifiers::types::ModifierClass;
use crate::pokemon::{CombatantId, Pokemon};
use schema::PokeballType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a single-use item does when it is used.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ConsumableEffect {
    /// Restores the larger of `points` and `percent` of max HP. With `revive`
    /// only fainted combatants are targeted.
    HpRestore { points: u16, percent: u8, revive: bool },
    StatusHeal,
    PpRestore { amount: u8 },
    AddPokeball { ball: PokeballType, count: u32 },
    /// Money worth `multiplier` times the wave reward.
    MoneyReward { multiplier: f64 },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumableTarget {
    Single(CombatantId),
    Party,
    Global,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ConsumableModifier {
    pub effect: ConsumableEffect,
    pub target: ConsumableTarget,
}

impl ConsumableModifier {
    pub fn new(effect: ConsumableEffect, target: ConsumableTarget) -> Self {
        Self { effect, target }
    }

    pub fn pokeballs(ball: PokeballType, count: u32) -> Self {
        Self::new(
            ConsumableEffect::AddPokeball { ball, count },
            ConsumableTarget::Global,
        )
    }

    pub fn name(&self) -> String {
        match self.effect {
            ConsumableEffect::HpRestore { revive: true, .. } => "Revive".to_string(),
            ConsumableEffect::HpRestore { .. } => "Potion".to_string(),
            ConsumableEffect::StatusHeal => "Full Heal".to_string(),
            ConsumableEffect::PpRestore { .. } => "Ether".to_string(),
            ConsumableEffect::AddPokeball { ball, count } => format!("{}x {}", count, ball),
            ConsumableEffect::MoneyReward { .. } => "Relic Gold".to_string(),
        }
    }

    /// Whether the item would do anything for `pokemon`.
    pub fn should_apply(&self, pokemon: &Pokemon) -> bool {
        match self.effect {
            ConsumableEffect::HpRestore { revive, .. } => {
                if revive {
                    pokemon.is_fainted()
                } else {
                    !pokemon.is_fainted() && !pokemon.is_full_hp()
                }
            }
            ConsumableEffect::StatusHeal => !pokemon.is_fainted() && pokemon.status.is_some(),
            ConsumableEffect::PpRestore { .. } => pokemon
                .get_moveset()
                .iter()
                .any(|move_instance| move_instance.pp < move_instance.max_pp()),
            ConsumableEffect::AddPokeball { .. } | ConsumableEffect::MoneyReward { .. } => true,
        }
    }

    fn apply_to(&self, scene: &mut BattleScene, pokemon_id: CombatantId) -> bool {
        match self.effect {
            ConsumableEffect::HpRestore {
                points, percent, ..
            } => {
                let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
                    return false;
                };
                let by_percent = (u32::from(pokemon.max_hp()) * u32::from(percent) / 100) as u16;
                let amount = points.max(by_percent).max(1);
                scene.heal(pokemon_id, amount) > 0
            }
            ConsumableEffect::StatusHeal => scene.reset_status(pokemon_id).is_some(),
            ConsumableEffect::PpRestore { amount } => {
                let Some(pokemon) = scene.get_pokemon_by_id_mut(pokemon_id) else {
                    return false;
                };
                for move_instance in pokemon.get_moveset_mut().iter_mut() {
                    move_instance.restore_pp(amount);
                }
                true
            }
            ConsumableEffect::AddPokeball { .. } | ConsumableEffect::MoneyReward { .. } => false,
        }
    }

    /// Use the item. Each target is checked with `should_apply` first; a
    /// target that cannot benefit is skipped without stopping the rest.
    /// Succeeds if any target benefited.
    pub fn apply(&self, scene: &mut BattleScene) -> bool {
        let targets: Vec<CombatantId> = match self.target {
            ConsumableTarget::Single(pokemon_id) => vec![pokemon_id],
            ConsumableTarget::Party => scene.party.iter().map(|pokemon| pokemon.id).collect(),
            ConsumableTarget::Global => {
                return self.apply_global(scene);
            }
        };

        let mut success = false;
        for pokemon_id in targets {
            let eligible = scene
                .get_pokemon_by_id(pokemon_id)
                .is_some_and(|pokemon| self.should_apply(pokemon));
            if eligible && self.apply_to(scene, pokemon_id) {
                success = true;
            }
        }
        debug!(item = %self.name(), success, "consumable applied");
        success
    }

    fn apply_global(&self, scene: &mut BattleScene) -> bool {
        match self.effect {
            ConsumableEffect::AddPokeball { ball, count } => {
                *scene.pokeball_counts.entry(ball).or_insert(0) += count;
                scene.events.push(BattleEvent::PokeballsAdded { ball, count });
                true
            }
            ConsumableEffect::MoneyReward { multiplier } => {
                let mut amount = scene.wave_money_amount(multiplier) as f64;
                scene.apply_modifiers(
                    ModifierClass::MoneyMultiplier,
                    true,
                    &mut ModifierArgs::Money { amount: &mut amount },
                );
                scene.add_money(amount.floor() as i64);
                true
            }
            _ => false,
        }
    }
}
