//! Modifier bookkeeping on the scene: adding, stacking, transferring,
//! pruning and applying the items of both sides.

use crate::abilities::{apply_ab_attrs, apply_post_item_lost_ab_attrs, GenericAttr};
use crate::battle::achievements::AchvKind;
use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::errors::{BattleResult, ModifierError};
use crate::modifiers::consumable::ConsumableModifier;
use crate::modifiers::effects::ModifierArgs;
use crate::modifiers::persistent::PersistentModifier;
use crate::modifiers::types::{HeldItem, ModifierClass, ModifierId, ModifierKind};
use crate::pokemon::CombatantId;
use tracing::{debug, info};

/// A modifier as handed out by rewards, shops or loot.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    Persistent(PersistentModifier),
    Consumable(ConsumableModifier),
}

/// Number of balls handed out when a full stack is replaced.
const FALLBACK_POKEBALL_COUNT: u32 = 5;

impl BattleScene {
    pub fn next_modifier_id(&mut self) -> ModifierId {
        self.last_modifier_id += 1;
        ModifierId(self.last_modifier_id)
    }

    fn modifier_list(&self, player: bool) -> &Vec<PersistentModifier> {
        if player {
            &self.modifiers
        } else {
            &self.enemy_modifiers
        }
    }

    fn modifier_list_mut(&mut self, player: bool) -> &mut Vec<PersistentModifier> {
        if player {
            &mut self.modifiers
        } else {
            &mut self.enemy_modifiers
        }
    }

    /// Give the player a modifier. Consumables are used on the spot.
    ///
    /// A persistent modifier whose stack is already full is not added; the
    /// player is told so and gets poke balls of the item's tier instead.
    pub fn add_modifier(&mut self, modifier: Modifier) -> bool {
        self.validate_achvs(AchvKind::Modifier, Some(&modifier));
        match modifier {
            Modifier::Consumable(consumable) => consumable.apply(self),
            Modifier::Persistent(persistent) => {
                let id = persistent.id;
                let name = persistent.name();
                let tier = persistent.tier();
                if persistent.add(&mut self.modifiers) {
                    debug!(modifier = %id, item = %name, "modifier added");
                    self.events.push(BattleEvent::ModifierAdded {
                        modifier_id: id,
                        player: true,
                    });
                    self.update_modifiers(true);
                    return true;
                }

                let fallback = tier.default_pokeball();
                info!(item = %name, fallback = %fallback, "stack full, substituting");
                self.queue_message(
                    format!(
                        "The stack for this {} is full.\nYou will receive {} instead.",
                        name, fallback
                    ),
                    false,
                );
                let count = if fallback == schema::PokeballType::MasterBall {
                    1
                } else {
                    FALLBACK_POKEBALL_COUNT
                };
                self.add_modifier(Modifier::Consumable(ConsumableModifier::pokeballs(
                    fallback, count,
                )));
                false
            }
        }
    }

    /// Give the enemy side a modifier. A full stack refuses silently.
    pub fn add_enemy_modifier(&mut self, modifier: PersistentModifier) -> bool {
        let id = modifier.id;
        if !modifier.add(&mut self.enemy_modifiers) {
            debug!(modifier = %id, "enemy stack full, refused");
            return false;
        }
        self.events.push(BattleEvent::ModifierAdded {
            modifier_id: id,
            player: false,
        });
        self.update_modifiers(false);
        true
    }

    /// Put `count` of `item` on a combatant, on its own side's list. All or
    /// nothing, like every stack increment.
    pub fn add_held_item(&mut self, pokemon_id: CombatantId, item: HeldItem, count: u32) -> bool {
        let Some(player) = self.get_pokemon_by_id(pokemon_id).map(|pokemon| pokemon.is_player)
        else {
            return false;
        };
        let id = self.next_modifier_id();
        let modifier = PersistentModifier::held(id, item, pokemon_id, count);
        if player {
            if !modifier.add(&mut self.modifiers) {
                return false;
            }
            self.events.push(BattleEvent::ModifierAdded {
                modifier_id: id,
                player,
            });
            self.update_modifiers(true);
            true
        } else {
            self.add_enemy_modifier(modifier)
        }
    }

    /// Whether `pokemon_id` has room for one more `item`.
    pub fn can_hold_item(&self, pokemon_id: CombatantId, item: HeldItem) -> bool {
        match self.find_held_item(pokemon_id, item) {
            Some(existing) => existing.headroom() > 0,
            None => self.get_pokemon_by_id(pokemon_id).is_some(),
        }
    }

    pub fn find_held_item(&self, pokemon_id: CombatantId, item: HeldItem) -> Option<&PersistentModifier> {
        let kind = ModifierKind::Held { item, pokemon_id };
        self.modifiers
            .iter()
            .chain(self.enemy_modifiers.iter())
            .find(|modifier| modifier.kind == kind)
    }

    /// Every held item of one combatant, on either side.
    pub fn held_items_of(&self, pokemon_id: CombatantId) -> Vec<&PersistentModifier> {
        self.modifiers
            .iter()
            .chain(self.enemy_modifiers.iter())
            .filter(|modifier| modifier.pokemon_id() == Some(pokemon_id))
            .collect()
    }

    pub fn find_modifier_by_id(&self, id: ModifierId) -> Option<&PersistentModifier> {
        self.modifiers
            .iter()
            .chain(self.enemy_modifiers.iter())
            .find(|modifier| modifier.id == id)
    }

    /// Like [`find_modifier_by_id`](BattleScene::find_modifier_by_id), for
    /// callers at the public boundary.
    pub fn get_modifier(&self, id: ModifierId) -> BattleResult<&PersistentModifier> {
        self.find_modifier_by_id(id)
            .ok_or_else(|| ModifierError::UnknownModifier(id).into())
    }

    pub fn get_modifiers(&self, class: ModifierClass, player: bool) -> Vec<&PersistentModifier> {
        self.modifier_list(player)
            .iter()
            .filter(|modifier| modifier.class() == class)
            .collect()
    }

    pub fn find_modifiers(
        &self,
        predicate: impl Fn(&PersistentModifier) -> bool,
        player: bool,
    ) -> Vec<&PersistentModifier> {
        self.modifier_list(player)
            .iter()
            .filter(|modifier| predicate(modifier))
            .collect()
    }

    pub fn find_modifier(
        &self,
        predicate: impl Fn(&PersistentModifier) -> bool,
        player: bool,
    ) -> Option<&PersistentModifier> {
        self.modifier_list(player)
            .iter()
            .find(|modifier| predicate(modifier))
    }

    /// How many of `available` could move from `source` onto `target_id`.
    fn transferable_amount(&self, source: &PersistentModifier, target_id: CombatantId, available: u32) -> u32 {
        let Some(item) = source.held_item() else {
            return 0;
        };
        let headroom = match self.find_held_item(target_id, item) {
            Some(existing) => existing.headroom(),
            None => item.max_stack_count(),
        };
        available.min(source.stack_count).min(headroom)
    }

    /// Whether a transfer would succeed, without making it. Consults the
    /// source holder's abilities in simulated mode.
    pub fn can_transfer_held_item_modifier(&mut self, id: ModifierId, target_id: CombatantId) -> bool {
        let Some(source) = self.find_modifier_by_id(id).cloned() else {
            return false;
        };
        let Some(source_holder) = source.pokemon_id() else {
            return false;
        };
        if source_holder == target_id || !source.is_transferable {
            return false;
        }
        let (Some(source_side), Some(target_side)) = (
            self.get_pokemon_by_id(source_holder).map(|p| p.is_player),
            self.get_pokemon_by_id(target_id).map(|p| p.is_player),
        ) else {
            return false;
        };
        if source_side != target_side {
            let mut cancelled = false;
            apply_ab_attrs(self, source_holder, GenericAttr::BlockItemTheft, &mut cancelled, true);
            if cancelled {
                return false;
            }
        }
        self.transferable_amount(&source, target_id, 1) > 0
    }

    /// Move up to `quantity` of a held item onto `target_id`.
    ///
    /// Across sides the holder's abilities may block the theft. The amount
    /// moved is capped by the source stack and the target's headroom; the
    /// source loses exactly what the target gains. Returns false, changing
    /// nothing, when nothing can move. With `item_lost` set the source
    /// holder's item-lost abilities run afterwards.
    pub fn try_transfer_held_item_modifier(
        &mut self,
        id: ModifierId,
        target_id: CombatantId,
        quantity: u32,
        item_lost: bool,
    ) -> bool {
        let Some(source) = self.find_modifier_by_id(id).cloned() else {
            return false;
        };
        let (Some(source_holder), Some(item)) = (source.pokemon_id(), source.held_item()) else {
            return false;
        };
        if source_holder == target_id || !source.is_transferable {
            return false;
        }
        let (Some(source_side), Some(target_side)) = (
            self.get_pokemon_by_id(source_holder).map(|p| p.is_player),
            self.get_pokemon_by_id(target_id).map(|p| p.is_player),
        ) else {
            return false;
        };

        if source_side != target_side {
            let mut cancelled = false;
            apply_ab_attrs(self, source_holder, GenericAttr::BlockItemTheft, &mut cancelled, false);
            if cancelled {
                return false;
            }
        }

        let moved = self.transferable_amount(&source, target_id, quantity);
        if moved == 0 {
            return false;
        }

        let source_list = self.modifier_list_mut(source_side);
        if let Some(index) = source_list.iter().position(|modifier| modifier.id == id) {
            source_list[index].stack_count -= moved;
            if source_list[index].stack_count == 0 {
                source_list.remove(index);
                self.events.push(BattleEvent::ModifierRemoved {
                    modifier_id: id,
                    player: source_side,
                });
            }
        }

        let new_id = self.next_modifier_id();
        let received = PersistentModifier::held(new_id, item, target_id, moved);
        // Headroom was checked above, so the merge cannot be refused.
        received.add(self.modifier_list_mut(target_side));
        debug!(item = %item, from = %source_holder, to = %target_id, moved, "held item transferred");

        self.update_modifiers(source_side);
        if target_side != source_side {
            self.update_modifiers(target_side);
        }

        if item_lost {
            apply_post_item_lost_ab_attrs(self, source_holder, false);
        }
        true
    }

    /// Drop every held item of the party member at `party_index`.
    pub fn remove_party_member_modifiers(&mut self, party_index: usize) -> bool {
        let Some(pokemon_id) = self.party.get(party_index).map(|pokemon| pokemon.id) else {
            return false;
        };
        let before = self.modifiers.len();
        self.modifiers
            .retain(|modifier| modifier.pokemon_id() != Some(pokemon_id));
        let removed = before != self.modifiers.len();
        if removed {
            self.update_modifiers(true);
        }
        removed
    }

    pub fn clear_enemy_modifiers(&mut self) {
        self.enemy_modifiers.clear();
        self.update_modifiers(false);
    }

    /// Drop enemy held items, for one combatant or for all of them.
    pub fn clear_enemy_held_item_modifiers(&mut self, pokemon_id: Option<CombatantId>) {
        self.enemy_modifiers.retain(|modifier| match modifier.pokemon_id() {
            None => true,
            Some(holder) => pokemon_id.is_some_and(|target| target != holder),
        });
        self.update_modifiers(false);
    }

    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        for player in [true, false] {
            let list = self.modifier_list_mut(player);
            if let Some(index) = list.iter().position(|modifier| modifier.id == id) {
                list.remove(index);
                self.events.push(BattleEvent::ModifierRemoved {
                    modifier_id: id,
                    player,
                });
                self.update_modifiers(player);
                return true;
            }
        }
        false
    }

    /// Prune one side's list and refresh what depends on it.
    ///
    /// Held items whose holder is no longer in that side's party go, as does
    /// anything with an empty stack. Party stats are then recomputed with the
    /// remaining stat boosters.
    pub fn update_modifiers(&mut self, player: bool) {
        let party_ids: Vec<CombatantId> = if player {
            self.party.iter().map(|pokemon| pokemon.id).collect()
        } else {
            self.enemy_party.iter().map(|pokemon| pokemon.id).collect()
        };

        let mut removed = Vec::new();
        self.modifier_list_mut(player).retain(|modifier| {
            let holder_gone = modifier
                .pokemon_id()
                .is_some_and(|holder| !party_ids.contains(&holder));
            let keep = modifier.stack_count > 0 && !holder_gone;
            if !keep {
                removed.push(modifier.id);
            }
            keep
        });
        for modifier_id in removed {
            self.events.push(BattleEvent::ModifierRemoved {
                modifier_id,
                player,
            });
        }

        for pokemon_id in party_ids {
            let boosts = self.modifier_stats_for(pokemon_id);
            if let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) {
                pokemon.calculate_stats(&boosts);
            }
        }

        let modifier_count = self.modifier_list(player).len();
        self.events.push(BattleEvent::ModifierBarUpdated {
            player,
            modifier_count,
        });
    }

    /// Per-stat multipliers from held base-stat boosters, in stat-array order.
    pub fn modifier_stats_for(&self, pokemon_id: CombatantId) -> [f64; 6] {
        let mut boosts = [1.0; 6];
        for modifier in self.held_items_of(pokemon_id) {
            if let Some(HeldItem::BaseStatBooster(stat)) = modifier.held_item() {
                if let Some(index) = stat.permanent_index() {
                    boosts[index] += 0.1 * f64::from(modifier.stack_count);
                }
            }
        }
        boosts
    }

    fn apply_modifiers_internal(
        &mut self,
        candidates: Vec<PersistentModifier>,
        args: &mut ModifierArgs<'_>,
        first_only: bool,
    ) -> Vec<ModifierId> {
        let mut applied = Vec::new();
        for modifier in candidates {
            if !modifier.should_apply(self, args) {
                continue;
            }
            if !modifier.apply(self, args) {
                continue;
            }
            debug!(modifier = %modifier.id, item = %modifier.name(), "modifier applied");
            applied.push(modifier.id);
            if modifier
                .held_item()
                .is_some_and(|item| item.is_consumed_on_use())
            {
                // The stack is spent before the holder's item-lost abilities look at it.
                self.consume_modifier(modifier.id);
                if let Some(holder) = modifier.pokemon_id() {
                    apply_post_item_lost_ab_attrs(self, holder, false);
                }
            }
            if first_only {
                break;
            }
        }
        applied
    }

    fn consume_modifier(&mut self, id: ModifierId) {
        for player in [true, false] {
            let list = self.modifier_list_mut(player);
            if let Some(modifier) = list.iter_mut().find(|modifier| modifier.id == id) {
                modifier.stack_count = modifier.stack_count.saturating_sub(1);
                self.update_modifiers(player);
                return;
            }
        }
    }

    fn modifiers_of_class(&self, class: ModifierClass, player: bool) -> Vec<PersistentModifier> {
        self.get_modifiers(class, player).into_iter().cloned().collect()
    }

    /// Apply every modifier of `class` on one side. Returns the ids of those
    /// that took effect.
    pub fn apply_modifiers(
        &mut self,
        class: ModifierClass,
        player: bool,
        args: &mut ModifierArgs<'_>,
    ) -> Vec<ModifierId> {
        let candidates = self.modifiers_of_class(class, player);
        self.apply_modifiers_internal(candidates, args, false)
    }

    /// Apply modifiers of `class` until the first one takes effect.
    pub fn apply_modifier(
        &mut self,
        class: ModifierClass,
        player: bool,
        args: &mut ModifierArgs<'_>,
    ) -> Option<ModifierId> {
        let candidates = self.modifiers_of_class(class, player);
        self.apply_modifiers_internal(candidates, args, true)
            .into_iter()
            .next()
    }

    /// Apply in a shuffled order. The shuffle draws from the wave seed offset
    /// by the turn, leaving the run's main stream where it was.
    pub fn apply_shuffled_modifiers(
        &mut self,
        class: ModifierClass,
        player: bool,
        args: &mut ModifierArgs<'_>,
    ) -> Vec<ModifierId> {
        let candidates: Vec<PersistentModifier> = self
            .modifiers_of_class(class, player)
            .into_iter()
            .filter(|modifier| modifier.should_apply(self, args))
            .collect();
        let offset = self.battle.turn << 4;
        let wave_seed = self.rng.wave_seed().to_string();
        let shuffled = self
            .rng
            .execute_with_seed_offset(offset, Some(&wave_seed), |rng| rng.shuffle(candidates));
        self.apply_modifiers_internal(shuffled, args, false)
    }

    /// Count every Lure down by one battle.
    pub fn lapse_battle_modifiers(&mut self) {
        for modifier in self.modifiers.iter_mut() {
            if modifier.class() == ModifierClass::DoubleBattleChanceBooster {
                modifier.stack_count = modifier.stack_count.saturating_sub(1);
            }
        }
        self.update_modifiers(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_scene, TestPokemonBuilder};
    use crate::modifiers::types::{BerryType, GlobalItem};
    use pretty_assertions::assert_eq;
    use schema::{AbilityId, PokeballType, Species};

    #[test]
    fn test_enemy_stack_overflow_is_refused_silently() {
        // Arrange
        let mut scene = create_test_scene();
        let foe = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).build(), false);

        // Act
        let results: Vec<bool> = (0..4)
            .map(|_| {
                let id = scene.next_modifier_id();
                scene.add_enemy_modifier(PersistentModifier::held(
                    id,
                    HeldItem::Berry(BerryType::Sitrus),
                    foe,
                    1,
                ))
            })
            .collect();

        // Assert
        assert_eq!(results, vec![true, true, true, false]);
        assert_eq!(scene.enemy_modifiers[0].stack_count, 3);
        assert!(scene.phases.is_empty());
    }

    #[test]
    fn test_player_stack_overflow_substitutes_pokeballs() {
        let mut scene = create_test_scene();
        let ally = scene.add_to_party(TestPokemonBuilder::new(Species::Pikachu, 50).build(), true);
        for _ in 0..3 {
            let id = scene.next_modifier_id();
            assert!(scene.add_modifier(Modifier::Persistent(PersistentModifier::held(
                id,
                HeldItem::KingsRock,
                ally,
                1
            ))));
        }

        let id = scene.next_modifier_id();
        let added = scene.add_modifier(Modifier::Persistent(PersistentModifier::held(
            id,
            HeldItem::KingsRock,
            ally,
            1,
        )));

        assert!(!added);
        assert_eq!(scene.find_held_item(ally, HeldItem::KingsRock).map(|m| m.stack_count), Some(3));
        assert_eq!(scene.pokeball_counts.get(&PokeballType::UltraBall), Some(&5));
        let pending: Vec<_> = scene.phases.pending_phases().into_iter().cloned().collect();
        assert_eq!(
            pending,
            vec![crate::battle::phase::Phase::message(
                "The stack for this King's Rock is full.\nYou will receive Ultra Ball instead."
            )]
        );
    }

    #[test]
    fn test_transfer_moves_only_what_fits() {
        // Arrange: the target already holds 3 of 4 Leftovers.
        let mut scene = create_test_scene();
        let giver = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).build(), true);
        let taker = scene.add_to_party(TestPokemonBuilder::new(Species::Lapras, 50).build(), true);
        assert!(scene.add_held_item(giver, HeldItem::Leftovers, 4));
        assert!(scene.add_held_item(taker, HeldItem::Leftovers, 3));
        let source_id = scene.find_held_item(giver, HeldItem::Leftovers).map(|m| m.id).unwrap();

        // Act
        let transferred = scene.try_transfer_held_item_modifier(source_id, taker, 4, false);

        // Assert
        assert!(transferred);
        assert_eq!(scene.find_held_item(giver, HeldItem::Leftovers).map(|m| m.stack_count), Some(3));
        assert_eq!(scene.find_held_item(taker, HeldItem::Leftovers).map(|m| m.stack_count), Some(4));

        // A full target takes nothing and nothing changes.
        assert!(!scene.try_transfer_held_item_modifier(source_id, taker, 1, false));
        assert_eq!(scene.find_held_item(giver, HeldItem::Leftovers).map(|m| m.stack_count), Some(3));
    }

    #[test]
    fn test_sticky_hold_blocks_theft_across_sides() {
        let mut scene = create_test_scene();
        let thief = scene.add_to_party(TestPokemonBuilder::new(Species::Gastly, 50).build(), true);
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Snorlax, 50)
                .with_ability(AbilityId::StickyHold)
                .on_field()
                .build(),
            false,
        );
        assert!(scene.add_held_item(holder, HeldItem::Leftovers, 1));
        let item_id = scene.find_held_item(holder, HeldItem::Leftovers).map(|m| m.id).unwrap();

        assert!(!scene.can_transfer_held_item_modifier(item_id, thief));
        assert!(!scene.try_transfer_held_item_modifier(item_id, thief, 1, true));
        assert!(scene.find_held_item(holder, HeldItem::Leftovers).is_some());
        assert!(scene.phases.pending_phases().iter().any(|phase| matches!(
            phase,
            crate::battle::phase::Phase::ShowAbility { pokemon_id, .. } if *pokemon_id == holder
        )));
    }

    #[test]
    fn test_update_modifiers_prunes_items_of_removed_combatants() {
        let mut scene = create_test_scene();
        let first = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).build(), true);
        let second = scene.add_to_party(TestPokemonBuilder::new(Species::Lapras, 50).build(), true);
        assert!(scene.add_held_item(first, HeldItem::Leftovers, 1));
        assert!(scene.add_held_item(second, HeldItem::Leftovers, 1));
        scene.add_modifier(Modifier::Persistent(PersistentModifier::global(
            ModifierId(999),
            GlobalItem::AmuletCoin,
        )));

        scene.party.retain(|pokemon| pokemon.id != first);
        scene.update_modifiers(true);

        assert!(scene.find_held_item(first, HeldItem::Leftovers).is_none());
        assert!(scene.find_held_item(second, HeldItem::Leftovers).is_some());
        assert_eq!(scene.get_modifiers(ModifierClass::MoneyMultiplier, true).len(), 1);
    }

    #[test]
    fn test_base_stat_booster_raises_the_stat() {
        let mut scene = create_test_scene();
        let pokemon_id = scene.add_to_party(TestPokemonBuilder::new(Species::Machop, 50).build(), true);
        let attack_before = scene.get_pokemon_by_id(pokemon_id).map(|p| p.stats[1]).unwrap();

        assert!(scene.add_held_item(pokemon_id, HeldItem::BaseStatBooster(schema::StatType::Atk), 2));

        let attack_after = scene.get_pokemon_by_id(pokemon_id).map(|p| p.stats[1]).unwrap();
        assert_eq!(attack_after, (f64::from(attack_before) * 1.2).floor() as u16);
    }

    #[test]
    fn test_lookup_and_removal_by_id() {
        // Arrange
        let mut scene = create_test_scene();
        let first = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).build(), true);
        let second = scene.add_to_party(TestPokemonBuilder::new(Species::Lapras, 50).build(), true);
        assert!(scene.add_held_item(first, HeldItem::Leftovers, 1));
        assert!(scene.add_held_item(first, HeldItem::KingsRock, 1));
        assert!(scene.add_held_item(second, HeldItem::ShellBell, 1));
        let kings_rock = scene.find_held_item(first, HeldItem::KingsRock).map(|m| m.id).unwrap();

        // Act / Assert: predicates see one side's list only.
        let held_by_first = scene.find_modifiers(|m| m.pokemon_id() == Some(first), true);
        assert_eq!(held_by_first.len(), 2);
        assert!(scene.find_modifier(|m| m.pokemon_id() == Some(first), false).is_none());
        assert_eq!(scene.get_modifier(kings_rock).map(|m| m.id).ok(), Some(kings_rock));

        assert!(scene.remove_modifier(kings_rock));
        assert!(!scene.remove_modifier(kings_rock));
        assert!(matches!(
            scene.get_modifier(kings_rock),
            Err(crate::errors::BattleEngineError::Modifier(ModifierError::UnknownModifier(id))) if id == kings_rock
        ));

        // Dropping the first party member's items leaves the second's alone.
        assert!(scene.remove_party_member_modifiers(0));
        assert!(!scene.remove_party_member_modifiers(0));
        assert!(!scene.remove_party_member_modifiers(9));
        assert!(scene.find_held_item(first, HeldItem::Leftovers).is_none());
        assert!(scene.find_held_item(second, HeldItem::ShellBell).is_some());
    }

    #[test]
    fn test_apply_modifier_stops_after_the_first_success() {
        // Arrange: low on HP and paralyzed, so both berries want to trigger.
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Snorlax, 50)
                .with_hp(10)
                .with_status(schema::StatusEffect::Paralysis)
                .on_field()
                .build(),
            true,
        );
        assert!(scene.add_held_item(holder, HeldItem::Berry(BerryType::Sitrus), 1));
        assert!(scene.add_held_item(holder, HeldItem::Berry(BerryType::Lum), 1));
        let sitrus = scene.find_held_item(holder, HeldItem::Berry(BerryType::Sitrus)).map(|m| m.id);

        // Act
        let applied = scene.apply_modifier(
            ModifierClass::Berry,
            true,
            &mut ModifierArgs::BerryCheck { pokemon_id: holder },
        );

        // Assert
        assert_eq!(applied, sitrus);
        assert!(scene.find_held_item(holder, HeldItem::Berry(BerryType::Sitrus)).is_none());
        assert!(scene.find_held_item(holder, HeldItem::Berry(BerryType::Lum)).is_some());
    }

    #[test]
    fn test_shuffled_application_leaves_the_main_stream_alone() {
        let build = || {
            let mut scene = create_test_scene();
            let holder = scene.add_to_party(
                TestPokemonBuilder::new(Species::Snorlax, 50)
                    .with_hp(10)
                    .with_status(schema::StatusEffect::Paralysis)
                    .on_field()
                    .build(),
                true,
            );
            scene.add_held_item(holder, HeldItem::Berry(BerryType::Sitrus), 1);
            scene.add_held_item(holder, HeldItem::Berry(BerryType::Lum), 1);
            (scene, holder)
        };
        let (mut first, holder) = build();
        let (mut second, _) = build();
        let counter = first.rng.counter();

        let first_order = first.apply_shuffled_modifiers(
            ModifierClass::Berry,
            true,
            &mut ModifierArgs::BerryCheck { pokemon_id: holder },
        );
        let second_order = second.apply_shuffled_modifiers(
            ModifierClass::Berry,
            true,
            &mut ModifierArgs::BerryCheck { pokemon_id: holder },
        );

        assert_eq!(first_order.len(), 2);
        assert_eq!(first_order, second_order);
        assert_eq!(first.rng.counter(), counter);
        assert!(first.held_items_of(holder).is_empty());
    }

    #[test]
    fn test_eaten_berry_is_gone_before_item_lost_abilities_run() {
        // Arrange
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Snorlax, 50)
                .with_ability(AbilityId::Unburden)
                .with_hp(10)
                .on_field()
                .build(),
            true,
        );
        assert!(scene.add_held_item(holder, HeldItem::Berry(BerryType::Sitrus), 1));
        let sitrus = scene
            .find_held_item(holder, HeldItem::Berry(BerryType::Sitrus))
            .map(|m| m.id)
            .unwrap();

        // Act
        let applied = scene.apply_modifiers(
            ModifierClass::Berry,
            true,
            &mut ModifierArgs::BerryCheck { pokemon_id: holder },
        );

        // Assert: the stack was removed before Unburden reacted.
        assert_eq!(applied, vec![sitrus]);
        let position = |wanted: &BattleEvent| scene.events.events().iter().position(|e| e == wanted);
        let removed = position(&BattleEvent::ModifierRemoved {
            modifier_id: sitrus,
            player: true,
        });
        let unburdened = position(&BattleEvent::TagAdded {
            pokemon_id: holder,
            tag: schema::BattlerTagType::Unburden,
        });
        assert!(removed.is_some());
        assert!(unburdened.is_some());
        assert!(removed < unburdened);
    }
}
