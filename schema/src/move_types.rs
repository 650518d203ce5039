use crate::{BattlerTagType, PokemonType, StatType, StatusEffect};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

impl fmt::Display for MoveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveCategory::Physical => write!(f, "Physical"),
            MoveCategory::Special => write!(f, "Special"),
            MoveCategory::Status => write!(f, "Status"),
        }
    }
}

/// Who a move is aimed at. Field-wide moves skip type immunities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTarget {
    User,
    Target,
    AllOpponents,
    BothSides,
    EnemySide,
    UserSide,
}

impl MoveTarget {
    pub fn is_field_target(&self) -> bool {
        matches!(
            self,
            MoveTarget::BothSides | MoveTarget::EnemySide | MoveTarget::UserSide
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFlags {
    pub makes_contact: bool,
    pub dance: bool,
    pub sound: bool,
    pub one_hit_ko: bool,
}

/// Secondary behavior attached to a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MoveEffect {
    /// Stage change applied to the user or the target.
    StatChange {
        self_target: bool,
        stats: Vec<StatType>,
        stages: i8,
        chance: u8,
    },
    Status {
        effect: StatusEffect,
        chance: u8,
    },
    Tag {
        tag: BattlerTagType,
        chance: u8,
    },
    /// User takes 1/denominator of the damage dealt.
    Recoil {
        denominator: u16,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveData {
    pub name: &'static str,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    pub power: u16,
    /// None means the move never misses.
    pub accuracy: Option<u8>,
    pub pp: u8,
    pub priority: i8,
    pub target: MoveTarget,
    pub flags: MoveFlags,
    pub effects: Vec<MoveEffect>,
}

impl MoveData {
    pub fn is_damaging(&self) -> bool {
        self.category != MoveCategory::Status
    }

    pub fn recoil_denominator(&self) -> Option<u16> {
        self.effects.iter().find_map(|effect| match effect {
            MoveEffect::Recoil { denominator } => Some(*denominator),
            _ => None,
        })
    }
}
