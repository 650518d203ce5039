use crate::abilities::attrs::*;
use crate::abilities::conditions::AbilityCondition;
use crate::abilities::Ability;
use schema::{
    AbilityId, BattlerTagType, PokemonType, StatType, StatusEffect, TerrainType, WeatherType,
};

fn status_immunity(effects: &[StatusEffect]) -> AbAttr {
    AbAttr::PreSetStatus(PreSetStatusAttr::StatusEffectImmunity {
        effects: effects.to_vec(),
    })
}

fn tag_immunity(tags: &[BattlerTagType]) -> AbAttr {
    AbAttr::PreApplyBattlerTag(PreApplyBattlerTagAttr::BattlerTagImmunity {
        tags: tags.to_vec(),
    })
}

fn contact_status(chance: u8, effect: StatusEffect) -> AbAttr {
    AbAttr::PostDefend(PostDefendAttr::ContactApplyStatusEffect {
        chance,
        effects: vec![effect],
    })
}

fn stat_multiplier(stat: StatType, multiplier: f64) -> AbAttr {
    AbAttr::StatMultiplier(StatMultiplierAttr::Multiply {
        stat,
        multiplier,
        category: None,
    })
}

fn protect_stat(stat: Option<StatType>) -> AbAttr {
    AbAttr::PreStatStageChange(PreStatStageChangeAttr::ProtectStat { stat })
}

fn arena_trap(condition: TrapCondition) -> AbAttr {
    AbAttr::CheckTrapped(CheckTrappedAttr::ArenaTrap { condition })
}

fn summon_weather(weather: WeatherType) -> AbAttr {
    AbAttr::PostSummon(PostSummonAttr::WeatherChange(weather))
}

fn immunity_heal(immune_type: PokemonType) -> AbAttr {
    AbAttr::PreDefend(PreDefendAttr::TypeImmunityHeal { immune_type })
}

/// Every ability the engine knows, in id order.
pub fn build_catalog() -> Vec<Ability> {
    use AbilityId as Id;

    vec![
        Ability::new(Id::None, "None", 3),
        Ability::new(Id::Stench, "Stench", 3).attr(AbAttr::PostAttack(
            PostAttackAttr::ApplyBattlerTag {
                chance: 10,
                tag: BattlerTagType::Flinched,
            },
        )),
        Ability::new(Id::Drizzle, "Drizzle", 3).attr(summon_weather(WeatherType::Rain)),
        Ability::new(Id::SpeedBoost, "Speed Boost", 3)
            .attr(AbAttr::PostTurn(PostTurnAttr::SpeedBoost)),
        Ability::new(Id::BattleArmor, "Battle Armor", 3)
            .attr(AbAttr::Generic(GenericAttr::BlockCrit))
            .ignorable(),
        Ability::new(Id::Sturdy, "Sturdy", 3)
            .attr(AbAttr::PreDefend(PreDefendAttr::FullHpEndure))
            .attr(AbAttr::Generic(GenericAttr::BlockOneHitKo))
            .ignorable(),
        Ability::new(Id::Limber, "Limber", 3)
            .attr(status_immunity(&[StatusEffect::Paralysis]))
            .ignorable(),
        Ability::new(Id::SandVeil, "Sand Veil", 3)
            .conditional_attr(
                AbilityCondition::weather(&[WeatherType::Sandstorm]),
                stat_multiplier(StatType::Eva, 1.2),
            )
            .attr(AbAttr::PreWeatherEffect(
                PreWeatherEffectAttr::BlockWeatherDamage {
                    weathers: vec![WeatherType::Sandstorm],
                },
            ))
            .ignorable(),
        Ability::new(Id::Static, "Static", 3).attr(contact_status(30, StatusEffect::Paralysis)),
        Ability::new(Id::VoltAbsorb, "Volt Absorb", 3)
            .attr(immunity_heal(PokemonType::Electric))
            .ignorable(),
        Ability::new(Id::WaterAbsorb, "Water Absorb", 3)
            .attr(immunity_heal(PokemonType::Water))
            .ignorable(),
        Ability::new(Id::Oblivious, "Oblivious", 3)
            .attr(tag_immunity(&[
                BattlerTagType::Infatuated,
                BattlerTagType::Taunt,
            ]))
            .attr(AbAttr::Generic(GenericAttr::IntimidateImmunity))
            .ignorable(),
        Ability::new(Id::CompoundEyes, "Compound Eyes", 3)
            .attr(stat_multiplier(StatType::Acc, 1.3)),
        Ability::new(Id::Insomnia, "Insomnia", 3)
            .attr(status_immunity(&[StatusEffect::Sleep]))
            .ignorable(),
        Ability::new(Id::Immunity, "Immunity", 3)
            .attr(status_immunity(&[StatusEffect::Poison, StatusEffect::Toxic]))
            .ignorable(),
        Ability::new(Id::FlashFire, "Flash Fire", 3)
            .attr(AbAttr::PreDefend(PreDefendAttr::TypeImmunityAddBattlerTag {
                immune_type: PokemonType::Fire,
                tag: BattlerTagType::FireBoost,
            }))
            .ignorable(),
        Ability::new(Id::OwnTempo, "Own Tempo", 3)
            .attr(tag_immunity(&[BattlerTagType::Confused]))
            .attr(AbAttr::Generic(GenericAttr::IntimidateImmunity))
            .ignorable(),
        Ability::new(Id::Intimidate, "Intimidate", 3).attr(AbAttr::PostSummon(
            PostSummonAttr::StatStageChange {
                stats: vec![StatType::Atk],
                stages: -1,
                self_target: false,
                intimidate: true,
            },
        )),
        Ability::new(Id::ShadowTag, "Shadow Tag", 3)
            .attr(arena_trap(TrapCondition::TargetWithoutAbility(Id::ShadowTag))),
        Ability::new(Id::MagnetPull, "Magnet Pull", 3)
            .attr(arena_trap(TrapCondition::TargetOfType(PokemonType::Steel))),
        Ability::new(Id::ArenaTrap, "Arena Trap", 3)
            .attr(arena_trap(TrapCondition::TargetGrounded))
            .attr(AbAttr::Generic(GenericAttr::DoubleBattleChance)),
        Ability::new(Id::RoughSkin, "Rough Skin", 3)
            .attr(AbAttr::PostDefend(PostDefendAttr::ContactDamage { ratio: 8 }))
            .bypass_faint(),
        Ability::new(Id::Levitate, "Levitate", 3)
            .attr(AbAttr::PreDefend(PreDefendAttr::TypeImmunity {
                immune_type: PokemonType::Ground,
                damaging_only: true,
            }))
            .ignorable(),
        Ability::new(Id::ClearBody, "Clear Body", 3)
            .attr(protect_stat(None))
            .ignorable(),
        Ability::new(Id::NaturalCure, "Natural Cure", 3)
            .attr(AbAttr::PreSwitchOut(PreSwitchOutAttr::ResetStatus)),
        Ability::new(Id::SwiftSwim, "Swift Swim", 3).conditional_attr(
            AbilityCondition::weather(&[WeatherType::Rain, WeatherType::HeavyRain]),
            stat_multiplier(StatType::Spe, 2.0),
        ),
        Ability::new(Id::Chlorophyll, "Chlorophyll", 3).conditional_attr(
            AbilityCondition::weather(&[WeatherType::Sunny, WeatherType::HarshSun]),
            stat_multiplier(StatType::Spe, 2.0),
        ),
        Ability::new(Id::HugePower, "Huge Power", 3).attr(stat_multiplier(StatType::Atk, 2.0)),
        Ability::new(Id::PoisonPoint, "Poison Point", 3)
            .attr(contact_status(30, StatusEffect::Poison)),
        Ability::new(Id::FlameBody, "Flame Body", 3).attr(contact_status(30, StatusEffect::Burn)),
        Ability::new(Id::RainDish, "Rain Dish", 3).attr(AbAttr::PostWeatherLapse(
            PostWeatherLapseAttr::Heal {
                weathers: vec![WeatherType::Rain, WeatherType::HeavyRain],
                factor: 1,
            },
        )),
        Ability::new(Id::SandStream, "Sand Stream", 3)
            .attr(summon_weather(WeatherType::Sandstorm))
            .attr(AbAttr::PreWeatherEffect(
                PreWeatherEffectAttr::BlockWeatherDamage {
                    weathers: vec![WeatherType::Sandstorm],
                },
            )),
        Ability::new(Id::Drought, "Drought", 3).attr(summon_weather(WeatherType::Sunny)),
        // Only the announcement; the extra PP drain is not modelled.
        Ability::new(Id::Pressure, "Pressure", 3)
            .attr(AbAttr::PostSummon(PostSummonAttr::Message(
                "{pokemon} is exerting its Pressure!",
            )))
            .partial(),
        Ability::new(Id::ThickFat, "Thick Fat", 3)
            .attr(AbAttr::PreDefend(
                PreDefendAttr::ReceivedTypeDamageMultiplier {
                    move_type: PokemonType::Fire,
                    multiplier: 0.5,
                },
            ))
            .attr(AbAttr::PreDefend(
                PreDefendAttr::ReceivedTypeDamageMultiplier {
                    move_type: PokemonType::Ice,
                    multiplier: 0.5,
                },
            ))
            .ignorable(),
        Ability::new(Id::KeenEye, "Keen Eye", 3)
            .attr(protect_stat(Some(StatType::Acc)))
            .ignorable(),
        Ability::new(Id::HyperCutter, "Hyper Cutter", 3)
            .attr(protect_stat(Some(StatType::Atk)))
            .ignorable(),
        Ability::new(Id::Truant, "Truant", 3).quiet_attr(AbAttr::PostSummon(
            PostSummonAttr::AddBattlerTag {
                tag: BattlerTagType::Truant,
                turns: 0,
            },
        )),
        Ability::new(Id::StickyHold, "Sticky Hold", 3)
            .attr(AbAttr::Generic(GenericAttr::BlockItemTheft))
            .bypass_faint()
            .ignorable(),
        Ability::new(Id::ShedSkin, "Shed Skin", 3).conditional_attr(
            AbilityCondition::Chance { one_in: 3 },
            AbAttr::PostTurn(PostTurnAttr::ResetStatus { ally_target: false }),
        ),
        // Burned holders still have their attack halved.
        Ability::new(Id::Guts, "Guts", 3)
            .conditional_attr(
                AbilityCondition::HasStatus,
                stat_multiplier(StatType::Atk, 1.5),
            )
            .edge_case(),
        Ability::new(Id::RockHead, "Rock Head", 3)
            .attr(AbAttr::Generic(GenericAttr::BlockRecoil)),
        Ability::new(Id::Synchronize, "Synchronize", 3)
            .attr(AbAttr::PostSetStatus(PostSetStatusAttr::SyncStatus)),
        Ability::new(Id::MagicGuard, "Magic Guard", 4)
            .attr(AbAttr::Generic(GenericAttr::BlockNonDirectDamage)),
        Ability::new(Id::RunAway, "Run Away", 3)
            .attr(AbAttr::Generic(GenericAttr::RunSuccess)),
        Ability::new(Id::Moxie, "Moxie", 5).attr(AbAttr::PostVictory(
            PostVictoryAttr::StatStageChange {
                stat: StatType::Atk,
                stages: 1,
            },
        )),
        Ability::new(Id::Aftermath, "Aftermath", 4)
            .attr(AbAttr::PostFaint(PostFaintAttr::ContactDamage { ratio: 4 }))
            .bypass_faint(),
        Ability::new(Id::Unburden, "Unburden", 4).attr(AbAttr::PostItemLost(
            PostItemLostAttr::ApplyBattlerTag(BattlerTagType::Unburden),
        )),
        Ability::new(Id::Defiant, "Defiant", 5).attr(AbAttr::PostStatStageChange(
            PostStatStageChangeAttr::StatStageChangeOnDrop {
                stats: vec![StatType::Atk],
                stages: 2,
            },
        )),
        Ability::new(Id::Regenerator, "Regenerator", 5)
            .attr(AbAttr::PreSwitchOut(PreSwitchOutAttr::Heal { denominator: 3 })),
        Ability::new(Id::MotorDrive, "Motor Drive", 4)
            .attr(AbAttr::PreDefend(PreDefendAttr::TypeImmunityStatStageChange {
                immune_type: PokemonType::Electric,
                stat: StatType::Spe,
                stages: 1,
            }))
            .ignorable(),
        Ability::new(Id::Dancer, "Dancer", 7)
            .attr(AbAttr::PostMoveUsed(PostMoveUsedAttr::Dancer)),
        Ability::new(Id::Magician, "Magician", 6)
            .attr(AbAttr::PostAttack(PostAttackAttr::StealHeldItem)),
        Ability::new(Id::Pickup, "Pickup", 3).attr(AbAttr::PostBattle(PostBattleAttr::Loot)),
        Ability::new(Id::Berserk, "Berserk", 7).attr(AbAttr::PostDamage(
            PostDamageAttr::StatStageChangeBelowHalf {
                stat: StatType::SpAtk,
                stages: 1,
            },
        )),
        // Only rechecked when the weather changes, not when Cloud Nine comes or goes.
        Ability::new(Id::Forecast, "Forecast", 3)
            .attr(AbAttr::PostWeatherChange(PostWeatherChangeAttr::FormChange {
                forms: vec![
                    (WeatherType::Sunny, 1),
                    (WeatherType::HarshSun, 1),
                    (WeatherType::Rain, 2),
                    (WeatherType::HeavyRain, 2),
                    (WeatherType::Hail, 3),
                ],
                default_form: 0,
            }))
            .edge_case(),
        Ability::new(Id::CloudNine, "Cloud Nine", 3)
            .attr(AbAttr::PreWeatherEffect(
                PreWeatherEffectAttr::SuppressWeatherEffect {
                    affects_immutable: false,
                },
            ))
            .attr(AbAttr::PostSummon(PostSummonAttr::Message(
                "The effects of the weather disappeared.",
            ))),
        Ability::new(Id::TabletsOfRuin, "Tablets of Ruin", 9)
            .attr(AbAttr::FieldStatMultiplier(
                FieldStatMultiplierAttr::MultiplyOthers {
                    stat: StatType::Atk,
                    multiplier: 0.75,
                },
            ))
            .attr(AbAttr::PostSummon(PostSummonAttr::Message(
                "{pokemon}'s Tablets of Ruin weakened\nthe Attack of all surrounding Pokémon!",
            ))),
        Ability::new(Id::ElectricSurge, "Electric Surge", 7).attr(AbAttr::PostSummon(
            PostSummonAttr::TerrainChange(TerrainType::Electric),
        )),
        // The boost ends only when the holder leaves, not when the terrain fades.
        Ability::new(Id::QuarkDrive, "Quark Drive", 9)
            .attr(AbAttr::PostTerrainChange(
                PostTerrainChangeAttr::AddBattlerTag {
                    tag: BattlerTagType::QuarkDrive,
                    terrains: vec![TerrainType::Electric],
                },
            ))
            .partial(),
        Ability::new(Id::IntrepidSword, "Intrepid Sword", 8)
            .attr(AbAttr::PostBattleInit(PostBattleInitAttr::StatStageChange {
                stats: vec![StatType::Atk],
                stages: 1,
            }))
            .condition(AbilityCondition::OncePerBattle),
        Ability::new(Id::ChillingNeigh, "Chilling Neigh", 8).attr(AbAttr::PostVictory(
            PostVictoryAttr::StatStageChange {
                stat: StatType::Atk,
                stages: 1,
            },
        )),
        Ability::new(Id::SoulHeart, "Soul-Heart", 7).attr(AbAttr::PostKnockOut(
            PostKnockOutAttr::StatStageChange {
                stat: StatType::SpAtk,
                stages: 1,
            },
        )),
        Ability::new(Id::Pixilate, "Pixilate", 6).attr(AbAttr::PreAttack(
            PreAttackAttr::MoveTypeChange {
                from: PokemonType::Normal,
                to: PokemonType::Fairy,
                power_multiplier: 1.2,
            },
        )),
        Ability::new(Id::Illuminate, "Illuminate", 3)
            .attr(protect_stat(Some(StatType::Acc)))
            .attr(AbAttr::Generic(GenericAttr::DoubleBattleChance))
            .ignorable(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::get_ability;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_ability_id_has_exactly_one_entry() {
        let catalog = build_catalog();
        let ids: HashSet<AbilityId> = catalog.iter().map(|ability| ability.id).collect();
        assert_eq!(ids.len(), catalog.len(), "duplicate catalog entries");
        for id in AbilityId::iter() {
            assert!(ids.contains(&id), "{:?} has no catalog entry", id);
            assert_eq!(get_ability(id).id, id);
        }
    }

    #[test]
    fn test_multipliers_do_not_show_the_ability_banner() {
        let huge_power = get_ability(AbilityId::HugePower);
        assert!(huge_power.attrs.iter().all(|entry| !entry.show_ability));

        let static_ability = get_ability(AbilityId::Static);
        assert!(static_ability.attrs.iter().all(|entry| entry.show_ability));
    }

    #[test]
    fn test_attrs_for_filters_by_hook() {
        let sturdy = get_ability(AbilityId::Sturdy);
        assert_eq!(sturdy.attrs_for(HookKind::PreDefend).count(), 1);
        assert_eq!(sturdy.attrs_for(HookKind::Generic).count(), 1);
        assert_eq!(sturdy.attrs_for(HookKind::PostTurn).count(), 0);
    }
}
