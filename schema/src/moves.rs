use crate::{
    BattlerTagType, MoveCategory, MoveData, MoveEffect, MoveFlags, MoveTarget, PokemonType,
    StatType, StatusEffect,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum Move {
    Tackle,
    Scratch,
    QuickAttack,
    BodySlam,
    DoubleEdge,
    TakeDown,
    HyperVoice,
    ThunderShock,
    Thunderbolt,
    ThunderWave,
    Ember,
    Flamethrower,
    WaterGun,
    Surf,
    VineWhip,
    RockThrow,
    Earthquake,
    ShadowBall,
    IceBeam,
    Bite,
    FlashCannon,
    KarateChop,
    SwordsDance,
    QuiverDance,
    Growl,
    Fissure,
    Splash,
    Spikes,
    Toxic,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", get_move_data(*self).name)
    }
}

const CONTACT: MoveFlags = MoveFlags {
    makes_contact: true,
    dance: false,
    sound: false,
    one_hit_ko: false,
};

const NO_FLAGS: MoveFlags = MoveFlags {
    makes_contact: false,
    dance: false,
    sound: false,
    one_hit_ko: false,
};

#[allow(clippy::too_many_arguments)]
fn damaging(
    name: &'static str,
    move_type: PokemonType,
    category: MoveCategory,
    power: u16,
    accuracy: u8,
    pp: u8,
    flags: MoveFlags,
    effects: Vec<MoveEffect>,
) -> MoveData {
    MoveData {
        name,
        move_type,
        category,
        power,
        accuracy: Some(accuracy),
        pp,
        priority: 0,
        target: MoveTarget::Target,
        flags,
        effects,
    }
}

fn status_move(
    name: &'static str,
    move_type: PokemonType,
    accuracy: Option<u8>,
    pp: u8,
    target: MoveTarget,
    flags: MoveFlags,
    effects: Vec<MoveEffect>,
) -> MoveData {
    MoveData {
        name,
        move_type,
        category: MoveCategory::Status,
        power: 0,
        accuracy,
        pp,
        priority: 0,
        target,
        flags,
        effects,
    }
}

/// Static move catalog lookup.
pub fn get_move_data(move_: Move) -> MoveData {
    use MoveCategory::*;
    use PokemonType::*;

    match move_ {
        Move::Tackle => damaging("Tackle", Normal, Physical, 40, 100, 35, CONTACT, vec![]),
        Move::Scratch => damaging("Scratch", Normal, Physical, 40, 100, 35, CONTACT, vec![]),
        Move::QuickAttack => MoveData {
            priority: 1,
            ..damaging("Quick Attack", Normal, Physical, 40, 100, 30, CONTACT, vec![])
        },
        Move::BodySlam => damaging(
            "Body Slam",
            Normal,
            Physical,
            85,
            100,
            15,
            CONTACT,
            vec![MoveEffect::Status {
                effect: StatusEffect::Paralysis,
                chance: 30,
            }],
        ),
        Move::DoubleEdge => damaging(
            "Double-Edge",
            Normal,
            Physical,
            120,
            100,
            15,
            CONTACT,
            vec![MoveEffect::Recoil { denominator: 3 }],
        ),
        Move::TakeDown => damaging(
            "Take Down",
            Normal,
            Physical,
            90,
            85,
            20,
            CONTACT,
            vec![MoveEffect::Recoil { denominator: 4 }],
        ),
        Move::HyperVoice => damaging(
            "Hyper Voice",
            Normal,
            Special,
            90,
            100,
            10,
            MoveFlags {
                sound: true,
                ..NO_FLAGS
            },
            vec![],
        ),
        Move::ThunderShock => damaging(
            "Thunder Shock",
            Electric,
            Special,
            40,
            100,
            30,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Paralysis,
                chance: 10,
            }],
        ),
        Move::Thunderbolt => damaging(
            "Thunderbolt",
            Electric,
            Special,
            90,
            100,
            15,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Paralysis,
                chance: 10,
            }],
        ),
        Move::ThunderWave => status_move(
            "Thunder Wave",
            Electric,
            Some(90),
            20,
            MoveTarget::Target,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Paralysis,
                chance: 100,
            }],
        ),
        Move::Ember => damaging(
            "Ember",
            Fire,
            Special,
            40,
            100,
            25,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Burn,
                chance: 10,
            }],
        ),
        Move::Flamethrower => damaging(
            "Flamethrower",
            Fire,
            Special,
            90,
            100,
            15,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Burn,
                chance: 10,
            }],
        ),
        Move::WaterGun => damaging("Water Gun", Water, Special, 40, 100, 25, NO_FLAGS, vec![]),
        Move::Surf => MoveData {
            target: MoveTarget::AllOpponents,
            ..damaging("Surf", Water, Special, 90, 100, 15, NO_FLAGS, vec![])
        },
        Move::VineWhip => damaging("Vine Whip", Grass, Physical, 45, 100, 25, CONTACT, vec![]),
        Move::RockThrow => damaging("Rock Throw", Rock, Physical, 50, 90, 15, NO_FLAGS, vec![]),
        Move::Earthquake => MoveData {
            target: MoveTarget::AllOpponents,
            ..damaging("Earthquake", Ground, Physical, 100, 100, 10, NO_FLAGS, vec![])
        },
        Move::ShadowBall => damaging(
            "Shadow Ball",
            Ghost,
            Special,
            80,
            100,
            15,
            NO_FLAGS,
            vec![MoveEffect::StatChange {
                self_target: false,
                stats: vec![StatType::SpDef],
                stages: -1,
                chance: 20,
            }],
        ),
        Move::IceBeam => damaging(
            "Ice Beam",
            Ice,
            Special,
            90,
            100,
            10,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Freeze,
                chance: 10,
            }],
        ),
        Move::Bite => damaging(
            "Bite",
            Dark,
            Physical,
            60,
            100,
            25,
            CONTACT,
            vec![MoveEffect::Tag {
                tag: BattlerTagType::Flinched,
                chance: 30,
            }],
        ),
        Move::FlashCannon => damaging(
            "Flash Cannon",
            Steel,
            Special,
            80,
            100,
            10,
            NO_FLAGS,
            vec![MoveEffect::StatChange {
                self_target: false,
                stats: vec![StatType::SpDef],
                stages: -1,
                chance: 10,
            }],
        ),
        Move::KarateChop => {
            damaging("Karate Chop", Fighting, Physical, 50, 100, 25, CONTACT, vec![])
        }
        Move::SwordsDance => status_move(
            "Swords Dance",
            Normal,
            None,
            20,
            MoveTarget::User,
            MoveFlags {
                dance: true,
                ..NO_FLAGS
            },
            vec![MoveEffect::StatChange {
                self_target: true,
                stats: vec![StatType::Atk],
                stages: 2,
                chance: 100,
            }],
        ),
        Move::QuiverDance => status_move(
            "Quiver Dance",
            Bug,
            None,
            20,
            MoveTarget::User,
            MoveFlags {
                dance: true,
                ..NO_FLAGS
            },
            vec![MoveEffect::StatChange {
                self_target: true,
                stats: vec![StatType::SpAtk, StatType::SpDef, StatType::Spe],
                stages: 1,
                chance: 100,
            }],
        ),
        Move::Growl => status_move(
            "Growl",
            Normal,
            Some(100),
            40,
            MoveTarget::AllOpponents,
            MoveFlags {
                sound: true,
                ..NO_FLAGS
            },
            vec![MoveEffect::StatChange {
                self_target: false,
                stats: vec![StatType::Atk],
                stages: -1,
                chance: 100,
            }],
        ),
        Move::Fissure => MoveData {
            flags: MoveFlags {
                one_hit_ko: true,
                ..NO_FLAGS
            },
            ..damaging("Fissure", Ground, Physical, 0, 30, 5, NO_FLAGS, vec![])
        },
        Move::Splash => status_move(
            "Splash",
            Normal,
            None,
            40,
            MoveTarget::User,
            NO_FLAGS,
            vec![],
        ),
        Move::Spikes => status_move(
            "Spikes",
            Ground,
            None,
            20,
            MoveTarget::EnemySide,
            NO_FLAGS,
            vec![],
        ),
        Move::Toxic => status_move(
            "Toxic",
            Poison,
            Some(90),
            10,
            MoveTarget::Target,
            NO_FLAGS,
            vec![MoveEffect::Status {
                effect: StatusEffect::Toxic,
                chance: 100,
            }],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_move_has_pp_and_a_name() {
        for move_ in Move::iter() {
            let data = get_move_data(move_);
            assert!(data.pp > 0, "{:?} has no PP", move_);
            assert!(!data.name.is_empty());
        }
    }

    #[test]
    fn test_status_moves_have_no_power() {
        for move_ in Move::iter() {
            let data = get_move_data(move_);
            if data.category == MoveCategory::Status {
                assert_eq!(data.power, 0, "{:?}", move_);
            }
        }
    }
}
