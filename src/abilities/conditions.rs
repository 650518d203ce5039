use crate::battle::scene::BattleScene;
use crate::pokemon::CombatantId;
use schema::{AbilityId, TerrainType, WeatherType};

/// Predicate gating an ability (or a single attribute) on battle state.
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityCondition {
    /// One of the weathers is active and not suppressed.
    Weather(Vec<WeatherType>),
    Terrain(TerrainType),
    HasStatus,
    /// Current HP at or below this fraction of max HP.
    HpAtOrBelow(f64),
    /// The ability has not fired yet this battle.
    OncePerBattle,
    /// Holds with probability 1 / `one_in`, drawn from the run's stream.
    Chance { one_in: u32 },
    Not(Box<AbilityCondition>),
    AllOf(Vec<AbilityCondition>),
}

impl AbilityCondition {
    pub fn weather(weathers: &[WeatherType]) -> Self {
        AbilityCondition::Weather(weathers.to_vec())
    }

    pub fn evaluate(
        &self,
        scene: &mut BattleScene,
        pokemon_id: CombatantId,
        ability: AbilityId,
    ) -> bool {
        match self {
            AbilityCondition::Weather(weathers) => match scene.arena.weather_type() {
                Some(weather) => !scene.is_weather_suppressed() && weathers.contains(&weather),
                None => false,
            },
            AbilityCondition::Terrain(terrain) => scene.arena.terrain_type() == Some(*terrain),
            AbilityCondition::HasStatus => scene
                .get_pokemon_by_id(pokemon_id)
                .is_some_and(|pokemon| pokemon.status.is_some()),
            AbilityCondition::HpAtOrBelow(ratio) => scene
                .get_pokemon_by_id(pokemon_id)
                .is_some_and(|pokemon| pokemon.hp_ratio() <= *ratio),
            AbilityCondition::OncePerBattle => scene
                .get_pokemon_by_id(pokemon_id)
                .is_some_and(|pokemon| !pokemon.battle_data.abilities_applied.contains(&ability)),
            AbilityCondition::Chance { one_in } => scene.rng.rand_seed_int(*one_in, 0) == 0,
            AbilityCondition::Not(inner) => !inner.evaluate(scene, pokemon_id, ability),
            AbilityCondition::AllOf(conditions) => conditions
                .iter()
                .all(|condition| condition.evaluate(scene, pokemon_id, ability)),
        }
    }
}
