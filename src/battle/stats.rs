use crate::abilities::{
    apply_field_stat_multiplier_ab_attrs, apply_stat_multiplier_ab_attrs,
};
use crate::battle::scene::BattleScene;
use crate::pokemon::CombatantId;
use schema::{
    get_move_data, AbilityId, BattlerTagType, MoveCategory, PokemonType, StatType, StatusEffect,
    WeatherType,
};

/// Multiplier for a battle stat stage (Atk through Spe).
pub fn stat_stage_multiplier(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(-6, 6));
    if stage >= 0.0 {
        (2.0 + stage) / 2.0
    } else {
        2.0 / (2.0 - stage)
    }
}

/// Multiplier for an accuracy or evasion stage.
pub fn accuracy_stage_multiplier(stage: i8) -> f64 {
    let stage = f64::from(stage.clamp(-6, 6));
    if stage >= 0.0 {
        (3.0 + stage) / 3.0
    } else {
        3.0 / (3.0 - stage)
    }
}

/// The stat a Quark Drive boost applies to: the highest of the five.
fn highest_stat(stats: &[u16; 6]) -> StatType {
    let mut best = StatType::Atk;
    let mut best_value = 0;
    for stat in StatType::EFFECTIVE {
        if let Some(index) = stat.permanent_index() {
            if stats[index] > best_value {
                best = stat;
                best_value = stats[index];
            }
        }
    }
    best
}

/// Calculate a combatant's effective stat: stored stat, stage multiplier,
/// ability multipliers from itself and the field, tags and status.
///
/// A critical hit ignores the attacker's drops and the defender's boosts.
/// Accuracy and evasion return the multiplier itself.
pub fn effective_stat(
    scene: &mut BattleScene,
    pokemon_id: CombatantId,
    stat: StatType,
    move_id: Option<schema::Move>,
    is_crit: bool,
    simulated: bool,
) -> f64 {
    let Some(pokemon) = scene.get_pokemon_by_id(pokemon_id) else {
        return 0.0;
    };
    let mut stage = pokemon.get_stat_stage(stat);
    if is_crit {
        stage = match stat {
            StatType::Atk | StatType::SpAtk => stage.max(0),
            StatType::Def | StatType::SpDef => stage.min(0),
            _ => stage,
        };
    }
    let stats = pokemon.stats;
    let paralyzed = pokemon
        .status
        .is_some_and(|status| status.effect == StatusEffect::Paralysis);
    let unburdened = pokemon.has_tag(BattlerTagType::Unburden);
    let quark_drive = pokemon.has_tag(BattlerTagType::QuarkDrive);

    let mut value = match stat.permanent_index() {
        Some(index) => f64::from(stats[index]) * stat_stage_multiplier(stage),
        None => accuracy_stage_multiplier(stage),
    };

    apply_stat_multiplier_ab_attrs(scene, pokemon_id, stat, &mut value, move_id, simulated);

    // Field multipliers of the same ability do not stack.
    let mut seen = Vec::new();
    for other_id in scene.all_field() {
        if other_id == pokemon_id {
            continue;
        }
        let Some(ability) = scene.get_pokemon_by_id(other_id).map(|other| other.ability_id()) else {
            continue;
        };
        if seen.contains(&ability) {
            continue;
        }
        let report = apply_field_stat_multiplier_ab_attrs(
            scene,
            other_id,
            stat,
            &mut value,
            pokemon_id,
            simulated,
        );
        if report.applied {
            seen.push(ability);
        }
    }

    if stat == StatType::Spe {
        if paralyzed {
            value *= 0.5;
        }
        if unburdened {
            value *= 2.0;
        }
    }
    if quark_drive && highest_stat(&stats) == stat {
        value *= if stat == StatType::Spe { 1.5 } else { 1.3 };
    }
    value
}

pub fn effective_speed(scene: &mut BattleScene, pokemon_id: CombatantId) -> u32 {
    effective_stat(scene, pokemon_id, StatType::Spe, None, false, true).floor() as u32
}

/// Inputs of one damage roll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    pub power: f64,
    pub move_type: PokemonType,
    pub is_crit: bool,
    /// Percentage in 85..=100.
    pub random_percent: u32,
    /// Ability multipliers on the defending side.
    pub defender_multiplier: f64,
}

/// Result of a damage calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageResult {
    pub damage: u32,
    pub effectiveness: f64,
}

/// Calculate the damage of a move from `attacker_id` on `defender_id`.
///
/// Standard formula: ((2L/5 + 2) * P * A / D) / 50 + 2, then critical hit,
/// random roll, same-type bonus, type chart, weather, burn and ability
/// multipliers. Damaging hits deal at least 1 unless fully resisted.
pub fn calculate_damage(
    scene: &mut BattleScene,
    attacker_id: CombatantId,
    defender_id: CombatantId,
    move_id: schema::Move,
    roll: DamageRoll,
) -> DamageResult {
    let move_data = get_move_data(move_id);
    let (attack_stat, defense_stat) = match move_data.category {
        MoveCategory::Physical => (StatType::Atk, StatType::Def),
        MoveCategory::Special => (StatType::SpAtk, StatType::SpDef),
        MoveCategory::Status => {
            return DamageResult {
                damage: 0,
                effectiveness: 1.0,
            }
        }
    };

    let (Some(attacker), Some(defender)) = (
        scene.get_pokemon_by_id(attacker_id),
        scene.get_pokemon_by_id(defender_id),
    ) else {
        return DamageResult {
            damage: 0,
            effectiveness: 1.0,
        };
    };
    let level = f64::from(attacker.level);
    let attacker_types = attacker.get_types();
    let defender_types = defender.get_types();
    let burned = attacker
        .status
        .is_some_and(|status| status.effect == StatusEffect::Burn)
        && !attacker.has_ability(AbilityId::Guts);
    let fire_boosted = attacker.has_tag(BattlerTagType::FireBoost);

    let attack = effective_stat(scene, attacker_id, attack_stat, Some(move_id), roll.is_crit, false).max(1.0);
    let defense = effective_stat(scene, defender_id, defense_stat, Some(move_id), roll.is_crit, false).max(1.0);

    let effectiveness = f64::from(PokemonType::effectiveness_against(
        roll.move_type,
        &defender_types,
    ));
    if effectiveness == 0.0 {
        return DamageResult {
            damage: 0,
            effectiveness,
        };
    }

    let base = ((2.0 * level / 5.0 + 2.0) * roll.power * attack / defense).floor() / 50.0 + 2.0;
    let mut damage = base.floor();
    if roll.is_crit {
        damage = (damage * 1.5).floor();
    }
    damage = (damage * f64::from(roll.random_percent) / 100.0).floor();
    if attacker_types.contains(&roll.move_type) {
        damage = (damage * 1.5).floor();
    }
    damage = (damage * effectiveness).floor();

    if !scene.is_weather_suppressed() {
        let weather_multiplier = match (scene.arena.weather_type(), roll.move_type) {
            (Some(WeatherType::Sunny | WeatherType::HarshSun), PokemonType::Fire) => 1.5,
            (Some(WeatherType::Sunny), PokemonType::Water) => 0.5,
            (Some(WeatherType::Rain | WeatherType::HeavyRain), PokemonType::Water) => 1.5,
            (Some(WeatherType::Rain), PokemonType::Fire) => 0.5,
            (Some(WeatherType::HarshSun), PokemonType::Water) => 0.0,
            (Some(WeatherType::HeavyRain), PokemonType::Fire) => 0.0,
            _ => 1.0,
        };
        damage = (damage * weather_multiplier).floor();
    }
    if burned && move_data.category == MoveCategory::Physical {
        damage = (damage * 0.5).floor();
    }
    if fire_boosted && roll.move_type == PokemonType::Fire {
        damage = (damage * 1.5).floor();
    }
    damage = (damage * roll.defender_multiplier).floor();

    let damage = if damage <= 0.0 && roll.defender_multiplier > 0.0 && effectiveness > 0.0 {
        1
    } else {
        damage.max(0.0) as u32
    };
    DamageResult {
        damage,
        effectiveness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::{create_test_scene, TestPokemonBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{Move, Species};

    #[rstest]
    #[case(0, 1.0)]
    #[case(1, 1.5)]
    #[case(2, 2.0)]
    #[case(6, 4.0)]
    #[case(-1, 2.0 / 3.0)]
    #[case(-6, 0.25)]
    fn test_stat_stage_multiplier(#[case] stage: i8, #[case] expected: f64) {
        assert!((stat_stage_multiplier(stage) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_huge_power_doubles_attack() {
        let mut scene = create_test_scene();
        let plain = scene.add_to_party(TestPokemonBuilder::new(Species::Machop, 50).on_field().build(), true);
        let strong = scene.add_to_party(
            TestPokemonBuilder::new(Species::Machop, 50)
                .with_ability(AbilityId::HugePower)
                .on_field()
                .build(),
            true,
        );

        let plain_attack = effective_stat(&mut scene, plain, StatType::Atk, None, false, true);
        let strong_attack = effective_stat(&mut scene, strong, StatType::Atk, None, false, true);

        assert_eq!(strong_attack, plain_attack * 2.0);
    }

    #[test]
    fn test_critical_hit_ignores_attack_drops() {
        let mut scene = create_test_scene();
        let attacker = scene.add_to_party(TestPokemonBuilder::new(Species::Machop, 50).on_field().build(), true);
        if let Some(pokemon) = scene.get_pokemon_by_id_mut(attacker) {
            pokemon.set_stat_stage(StatType::Atk, -2);
        }

        let normal = effective_stat(&mut scene, attacker, StatType::Atk, None, false, true);
        let crit = effective_stat(&mut scene, attacker, StatType::Atk, None, true, true);

        assert!(crit > normal);
    }

    #[test]
    fn test_paralysis_halves_speed() {
        let mut scene = create_test_scene();
        let pokemon_id = scene.add_to_party(
            TestPokemonBuilder::new(Species::Ninjask, 50)
                .with_status(StatusEffect::Paralysis)
                .on_field()
                .build(),
            true,
        );
        let base = scene.get_pokemon_by_id(pokemon_id).map(|p| p.stats[5]).unwrap_or(0);

        assert_eq!(effective_speed(&mut scene, pokemon_id), u32::from(base) / 2);
    }

    #[test]
    fn test_type_immunity_deals_no_damage() {
        let mut scene = create_test_scene();
        let attacker = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), true);
        let ghost = scene.add_to_party(TestPokemonBuilder::new(Species::Gastly, 50).on_field().build(), false);

        let result = calculate_damage(
            &mut scene,
            attacker,
            ghost,
            Move::Tackle,
            DamageRoll {
                power: 40.0,
                move_type: PokemonType::Normal,
                is_crit: false,
                random_percent: 100,
                defender_multiplier: 1.0,
            },
        );

        assert_eq!(result.damage, 0);
        assert_eq!(result.effectiveness, 0.0);
    }

    #[test]
    fn test_same_type_bonus_raises_damage() {
        let mut scene = create_test_scene();
        let fire = scene.add_to_party(TestPokemonBuilder::new(Species::Charmander, 50).on_field().build(), true);
        let target = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), false);
        let roll = |move_type| DamageRoll {
            power: 90.0,
            move_type,
            is_crit: false,
            random_percent: 100,
            defender_multiplier: 1.0,
        };

        let stab = calculate_damage(&mut scene, fire, target, Move::Flamethrower, roll(PokemonType::Fire));
        let plain = calculate_damage(&mut scene, fire, target, Move::Flamethrower, roll(PokemonType::Typeless));

        assert!(stab.damage > plain.damage);
    }
}
