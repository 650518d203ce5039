//! Combatant and field mutations shared by phases, abilities and items:
//! status, tags, HP, weather, terrain and field presence.

use crate::abilities::{
    apply_post_damage_ab_attrs, apply_post_terrain_change_ab_attrs,
    apply_post_weather_change_ab_attrs, apply_pre_apply_battler_tag_ab_attrs,
    apply_pre_set_status_ab_attrs,
};
use crate::battle::phase::{BattleAnim, Phase};
use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::pokemon::{BattlerTag, CombatantId, Status};
use schema::{
    BattlerTagType, PokemonType, StatType, StatusEffect, TerrainType, WeatherType,
};
use tracing::{debug, trace};

fn tag_added_message(tag: BattlerTagType, name: &str) -> Option<String> {
    match tag {
        BattlerTagType::Confused => Some(format!("{} became confused!", name)),
        BattlerTagType::Infatuated => Some(format!("{} fell in love!", name)),
        BattlerTagType::Taunt => Some(format!("{} fell for the taunt!", name)),
        BattlerTagType::Trapped => Some(format!("{} can no longer escape!", name)),
        BattlerTagType::Substitute => Some(format!("{} put in a substitute!", name)),
        _ => None,
    }
}

fn terrain_start_message(terrain: TerrainType) -> &'static str {
    match terrain {
        TerrainType::Misty => "Mist swirled around the battlefield!",
        TerrainType::Electric => "An electric current ran across the battlefield!",
        TerrainType::Grassy => "Grass grew to cover the battlefield!",
        TerrainType::Psychic => "The battlefield got weird!",
    }
}

fn terrain_clear_message(terrain: TerrainType) -> &'static str {
    match terrain {
        TerrainType::Misty => "The mist disappeared from the battlefield.",
        TerrainType::Electric => "The electricity disappeared from the battlefield.",
        TerrainType::Grassy => "The grass disappeared from the battlefield.",
        TerrainType::Psychic => "The weirdness disappeared from the battlefield!",
    }
}

/// Types that can never receive a status.
fn status_immune_types(effect: StatusEffect) -> &'static [PokemonType] {
    match effect {
        StatusEffect::Poison | StatusEffect::Toxic => &[PokemonType::Poison, PokemonType::Steel],
        StatusEffect::Paralysis => &[PokemonType::Electric],
        StatusEffect::Burn => &[PokemonType::Fire],
        StatusEffect::Freeze => &[PokemonType::Ice],
        StatusEffect::Sleep => &[],
    }
}

impl BattleScene {
    // === Status ===

    /// Whether `effect` could be applied to `pokemon_id` right now. With
    /// `quiet` the ability check is simulated and shows nothing.
    pub fn can_set_status(
        &mut self,
        pokemon_id: CombatantId,
        effect: StatusEffect,
        source_id: Option<CombatantId>,
        quiet: bool,
    ) -> bool {
        let Some(pokemon) = self.get_pokemon_by_id(pokemon_id) else {
            return false;
        };
        if pokemon.is_fainted() || pokemon.status.is_some() {
            return false;
        }
        let types = pokemon.get_types();
        if status_immune_types(effect)
            .iter()
            .any(|immune| types.contains(immune))
        {
            return false;
        }
        if effect == StatusEffect::Freeze
            && matches!(
                self.arena.weather_type(),
                Some(WeatherType::Sunny | WeatherType::HarshSun)
            )
            && !self.is_weather_suppressed()
        {
            return false;
        }
        let grounded = pokemon.is_grounded();
        if grounded
            && source_id != Some(pokemon_id)
            && self.arena.terrain_type() == Some(TerrainType::Misty)
        {
            return false;
        }
        if grounded
            && effect == StatusEffect::Sleep
            && self.arena.terrain_type() == Some(TerrainType::Electric)
        {
            return false;
        }

        let mut cancelled = false;
        apply_pre_set_status_ab_attrs(self, pokemon_id, effect, &mut cancelled, quiet);
        !cancelled
    }

    /// Apply `effect` now and queue its announcement. Returns false when the
    /// combatant cannot receive it.
    pub fn try_set_status(
        &mut self,
        pokemon_id: CombatantId,
        effect: StatusEffect,
        source_id: Option<CombatantId>,
    ) -> bool {
        if !self.can_set_status(pokemon_id, effect, source_id, false) {
            return false;
        }
        let sleep_turns = if effect == StatusEffect::Sleep {
            self.rng.rand_seed_int(3, 2) as u8
        } else {
            0
        };
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return false;
        };
        pokemon.status = Some(Status::new(effect, sleep_turns));
        debug!(pokemon = %pokemon_id, ?effect, "status set");
        self.phases.unshift_phase(Phase::ObtainStatusEffect {
            pokemon_id,
            effect,
            source_id,
        });
        true
    }

    /// Clear the status. Returns the effect that was removed.
    pub fn reset_status(&mut self, pokemon_id: CombatantId) -> Option<StatusEffect> {
        let status = self.get_pokemon_by_id_mut(pokemon_id)?.status.take()?;
        self.events.push(BattleEvent::StatusCured {
            pokemon_id,
            status: status.effect,
        });
        Some(status.effect)
    }

    // === Battler tags ===

    /// Whether `tag` could be added. Never shows or changes anything.
    pub fn can_add_tag(&mut self, pokemon_id: CombatantId, tag: BattlerTagType) -> bool {
        let Some(pokemon) = self.get_pokemon_by_id(pokemon_id) else {
            return false;
        };
        if pokemon.is_fainted() || pokemon.has_tag(tag) {
            return false;
        }
        let mut cancelled = false;
        apply_pre_apply_battler_tag_ab_attrs(self, pokemon_id, tag, &mut cancelled, true);
        !cancelled
    }

    /// Add `tag` for `turns` turns (zero lasts until the holder leaves).
    pub fn add_tag(
        &mut self,
        pokemon_id: CombatantId,
        tag: BattlerTagType,
        turns: u8,
        source_id: Option<CombatantId>,
    ) -> bool {
        let Some(pokemon) = self.get_pokemon_by_id(pokemon_id) else {
            return false;
        };
        if pokemon.is_fainted() || pokemon.has_tag(tag) {
            return false;
        }
        let mut cancelled = false;
        apply_pre_apply_battler_tag_ab_attrs(self, pokemon_id, tag, &mut cancelled, false);
        if cancelled {
            return false;
        }
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return false;
        };
        pokemon
            .summon_data
            .tags
            .push(BattlerTag::new(tag, turns, source_id));
        let message = tag_added_message(tag, &pokemon.name);
        trace!(pokemon = %pokemon_id, %tag, turns, "tag added");
        self.events.push(BattleEvent::TagAdded { pokemon_id, tag });
        if let Some(message) = message {
            self.queue_message(message, false);
        }
        true
    }

    pub fn remove_tag(&mut self, pokemon_id: CombatantId, tag: BattlerTagType) -> bool {
        let removed = self
            .get_pokemon_by_id_mut(pokemon_id)
            .is_some_and(|pokemon| pokemon.remove_tag(tag));
        if removed {
            self.events.push(BattleEvent::TagRemoved { pokemon_id, tag });
        }
        removed
    }

    // === HP ===

    /// Deal `damage` to `pokemon_id`, record it, and queue a faint when HP
    /// hits zero. Returns the HP actually lost.
    pub fn damage_and_update(
        &mut self,
        pokemon_id: CombatantId,
        damage: u32,
        source_id: Option<CombatantId>,
    ) -> u16 {
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return 0;
        };
        if pokemon.is_fainted() {
            return 0;
        }
        let dealt = damage.min(u32::from(pokemon.hp)) as u16;
        pokemon.hp -= dealt;
        pokemon.turn_data.damage_taken += u32::from(dealt);
        let remaining_hp = pokemon.hp;
        let fainted = pokemon.is_fainted();
        self.events.push(BattleEvent::DamageDealt {
            pokemon_id,
            damage: dealt,
            remaining_hp,
        });
        if dealt > 0 && !fainted {
            apply_post_damage_ab_attrs(self, pokemon_id, u32::from(dealt), false);
        }
        if fainted {
            self.queue_faint(pokemon_id, source_id, None);
        }
        dealt
    }

    /// Queue a faint phase unless one is already pending for the combatant.
    pub fn queue_faint(
        &mut self,
        pokemon_id: CombatantId,
        source_id: Option<CombatantId>,
        move_id: Option<schema::Move>,
    ) {
        let pending = self.phases.pending_phases().into_iter().any(|phase| {
            matches!(phase, Phase::Faint { pokemon_id: id, .. } if *id == pokemon_id)
        });
        if !pending {
            self.phases.unshift_phase(Phase::Faint {
                pokemon_id,
                source_id,
                move_id,
            });
        }
    }

    /// Restore up to `amount` HP. Returns the HP actually gained.
    pub fn heal(&mut self, pokemon_id: CombatantId, amount: u16) -> u16 {
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return 0;
        };
        let healed = amount.min(pokemon.max_hp().saturating_sub(pokemon.hp));
        if healed == 0 {
            return 0;
        }
        pokemon.hp += healed;
        let new_hp = pokemon.hp;
        self.events.push(BattleEvent::PokemonHealed {
            pokemon_id,
            amount: healed,
            new_hp,
        });
        healed
    }

    pub fn queue_heal(&mut self, pokemon_id: CombatantId, amount: u16, message: Option<String>) {
        self.phases.unshift_phase(Phase::PokemonHeal {
            pokemon_id,
            amount,
            message,
            show_full_hp_message: false,
        });
    }

    pub fn queue_stat_stage_change(
        &mut self,
        pokemon_id: CombatantId,
        self_induced: bool,
        stats: Vec<StatType>,
        stages: i8,
    ) {
        self.phases.unshift_phase(Phase::StatStageChange {
            pokemon_id,
            self_induced,
            stats,
            stages,
        });
    }

    // === Weather and terrain ===

    /// Replace the weather. Ordinary weather cannot displace a primal one;
    /// the attempt is announced and refused.
    pub fn try_set_weather(&mut self, weather: Option<WeatherType>) -> bool {
        let old_weather = self.arena.weather_type();
        if old_weather == weather {
            return false;
        }
        if let Some(old) = old_weather.filter(WeatherType::is_immutable) {
            if weather.is_some_and(|new| !new.is_immutable()) {
                self.queue_message(old.lapse_message(), false);
                return false;
            }
        }

        let turns = self.config.weather_turns;
        self.arena.weather = weather.map(|weather_type| crate::battle::arena::Weather::new(weather_type, turns));
        debug!(?old_weather, ?weather, "weather changed");
        self.events.push(BattleEvent::WeatherChanged {
            old_weather,
            new_weather: weather,
        });
        match (weather, old_weather) {
            (Some(new), _) => self.queue_message(new.start_message(), false),
            (None, Some(old)) => self.queue_message(old.clear_message(), false),
            (None, None) => {}
        }
        for pokemon_id in self.all_field() {
            apply_post_weather_change_ab_attrs(self, pokemon_id, weather, false);
        }
        true
    }

    pub fn try_set_terrain(&mut self, terrain: Option<TerrainType>) -> bool {
        let old_terrain = self.arena.terrain_type();
        if old_terrain == terrain {
            return false;
        }
        let turns = self.config.terrain_turns;
        self.arena.terrain = terrain.map(|terrain_type| crate::battle::arena::Terrain {
            terrain_type,
            turns_left: turns,
        });
        debug!(?old_terrain, ?terrain, "terrain changed");
        self.events.push(BattleEvent::TerrainChanged {
            old_terrain,
            new_terrain: terrain,
        });
        match (terrain, old_terrain) {
            (Some(new), _) => self.queue_message(terrain_start_message(new), false),
            (None, Some(old)) => self.queue_message(terrain_clear_message(old), false),
            (None, None) => {}
        }
        for pokemon_id in self.all_field() {
            apply_post_terrain_change_ab_attrs(self, pokemon_id, terrain, false);
        }
        true
    }

    // === Presentation ===

    /// Change form. A modal change takes over immediately; otherwise it runs
    /// right after the current phase.
    pub fn trigger_pokemon_form_change(&mut self, pokemon_id: CombatantId, form_index: u8, modal: bool) {
        let phase = Phase::FormChange {
            pokemon_id,
            form_index,
            modal,
        };
        if !modal || !self.override_phase(phase.clone()) {
            self.phases.unshift_phase(phase);
        }
    }

    pub fn trigger_pokemon_battle_anim(&mut self, pokemon_id: CombatantId, anim: BattleAnim, delayed: bool) {
        let phase = Phase::PokemonAnim { pokemon_id, anim };
        if delayed {
            self.phases.push_phase(phase, false);
        } else {
            self.phases.unshift_phase(phase);
        }
    }

    // === Field presence ===

    /// Put a combatant into a field slot with fresh summon state.
    pub fn enter_field(&mut self, pokemon_id: CombatantId, field_index: usize) -> bool {
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return false;
        };
        if pokemon.is_fainted() {
            return false;
        }
        pokemon.on_field = true;
        pokemon.field_index = field_index;
        pokemon.reset_summon_data();
        pokemon.turn_data.switched_in_this_turn = true;
        self.events.push(BattleEvent::PokemonSummoned { pokemon_id });
        true
    }

    /// Take a combatant off the field. Summon state does not survive.
    pub fn leave_field(&mut self, pokemon_id: CombatantId) {
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return;
        };
        if !pokemon.on_field {
            return;
        }
        pokemon.on_field = false;
        pokemon.reset_summon_data();
        self.events.push(BattleEvent::PokemonWithdrawn { pokemon_id });
    }
}

#[cfg(test)]
mod tests {
    use crate::battle::tests::common::{create_test_scene, TestPokemonBuilder};
    use pretty_assertions::assert_eq;
    use schema::{AbilityId, BattlerTagType, Species, StatusEffect, WeatherType};

    #[test]
    fn test_electric_types_cannot_be_paralyzed() {
        let mut scene = create_test_scene();
        let pikachu = scene.add_to_party(TestPokemonBuilder::new(Species::Pikachu, 50).on_field().build(), true);

        assert!(!scene.can_set_status(pikachu, StatusEffect::Paralysis, None, true));
        assert!(scene.can_set_status(pikachu, StatusEffect::Burn, None, true));
    }

    #[test]
    fn test_second_status_is_refused() {
        let mut scene = create_test_scene();
        let snorlax = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), true);

        assert!(scene.try_set_status(snorlax, StatusEffect::Burn, None));
        assert!(!scene.try_set_status(snorlax, StatusEffect::Poison, None));
        let status = scene.get_pokemon_by_id(snorlax).and_then(|p| p.status).map(|s| s.effect);
        assert_eq!(status, Some(StatusEffect::Burn));
    }

    #[test]
    fn test_own_tempo_blocks_confusion() {
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Lapras, 50)
                .with_ability(AbilityId::OwnTempo)
                .on_field()
                .build(),
            true,
        );

        assert!(!scene.can_add_tag(holder, BattlerTagType::Confused));
        assert!(!scene.add_tag(holder, BattlerTagType::Confused, 3, None));
        assert!(scene.add_tag(holder, BattlerTagType::Taunt, 3, None));
    }

    #[test]
    fn test_damage_to_zero_queues_a_single_faint() {
        let mut scene = create_test_scene();
        let target = scene.add_to_party(TestPokemonBuilder::new(Species::Geodude, 10).on_field().build(), false);

        scene.damage_and_update(target, 10_000, None);
        scene.damage_and_update(target, 10, None);

        let faints = scene
            .phases
            .pending_phases()
            .into_iter()
            .filter(|phase| matches!(phase, crate::battle::phase::Phase::Faint { .. }))
            .count();
        assert_eq!(faints, 1);
        assert_eq!(scene.get_pokemon_by_id(target).map(|p| p.hp), Some(0));
    }

    #[test]
    fn test_primal_weather_resists_ordinary_weather() {
        let mut scene = create_test_scene();
        assert!(scene.try_set_weather(Some(WeatherType::HarshSun)));

        assert!(!scene.try_set_weather(Some(WeatherType::Rain)));
        assert_eq!(scene.arena.weather_type(), Some(WeatherType::HarshSun));
        assert!(scene.try_set_weather(Some(WeatherType::HeavyRain)));
        assert_eq!(scene.arena.weather_type(), Some(WeatherType::HeavyRain));
    }
}
