use crate::pokemon::CombatantId;
use schema::{ModifierTier, PokemonType, StatType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a persistent modifier for the lifetime of a run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierId(pub u32);

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mod#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerryType {
    Sitrus,
    Lum,
}

impl fmt::Display for BerryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BerryType::Sitrus => write!(f, "Sitrus Berry"),
            BerryType::Lum => write!(f, "Lum Berry"),
        }
    }
}

/// Items held by one combatant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeldItem {
    Leftovers,
    ShellBell,
    FocusBand,
    KingsRock,
    AttackTypeBooster(PokemonType),
    BaseStatBooster(StatType),
    Berry(BerryType),
    WhiteHerb,
}

impl HeldItem {
    pub fn max_stack_count(&self) -> u32 {
        match self {
            HeldItem::Leftovers => 4,
            HeldItem::ShellBell => 4,
            HeldItem::FocusBand => 5,
            HeldItem::KingsRock => 3,
            HeldItem::AttackTypeBooster(_) => 99,
            HeldItem::BaseStatBooster(_) => 10,
            HeldItem::Berry(_) => 3,
            HeldItem::WhiteHerb => 2,
        }
    }

    pub fn tier(&self) -> ModifierTier {
        match self {
            HeldItem::Leftovers
            | HeldItem::ShellBell
            | HeldItem::FocusBand
            | HeldItem::KingsRock
            | HeldItem::AttackTypeBooster(_) => ModifierTier::Ultra,
            HeldItem::BaseStatBooster(_) | HeldItem::Berry(_) | HeldItem::WhiteHerb => {
                ModifierTier::Great
            }
        }
    }

    /// Used up when its effect triggers.
    pub fn is_consumed_on_use(&self) -> bool {
        matches!(self, HeldItem::Berry(_) | HeldItem::WhiteHerb)
    }

    pub fn class(&self) -> ModifierClass {
        match self {
            HeldItem::Leftovers => ModifierClass::TurnHeal,
            HeldItem::ShellBell => ModifierClass::HitHeal,
            HeldItem::FocusBand => ModifierClass::SurviveDamage,
            HeldItem::KingsRock => ModifierClass::FlinchChance,
            HeldItem::AttackTypeBooster(_) => ModifierClass::AttackTypeBooster,
            HeldItem::BaseStatBooster(_) => ModifierClass::BaseStatBooster,
            HeldItem::Berry(_) => ModifierClass::Berry,
            HeldItem::WhiteHerb => ModifierClass::ResetNegativeStatStage,
        }
    }
}

impl fmt::Display for HeldItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeldItem::Leftovers => write!(f, "Leftovers"),
            HeldItem::ShellBell => write!(f, "Shell Bell"),
            HeldItem::FocusBand => write!(f, "Focus Band"),
            HeldItem::KingsRock => write!(f, "King's Rock"),
            HeldItem::AttackTypeBooster(pokemon_type) => {
                let name = match pokemon_type {
                    PokemonType::Normal => "Silk Scarf",
                    PokemonType::Fighting => "Black Belt",
                    PokemonType::Flying => "Sharp Beak",
                    PokemonType::Poison => "Poison Barb",
                    PokemonType::Ground => "Soft Sand",
                    PokemonType::Rock => "Hard Stone",
                    PokemonType::Bug => "Silver Powder",
                    PokemonType::Ghost => "Spell Tag",
                    PokemonType::Steel => "Metal Coat",
                    PokemonType::Fire => "Charcoal",
                    PokemonType::Water => "Mystic Water",
                    PokemonType::Grass => "Miracle Seed",
                    PokemonType::Electric => "Magnet",
                    PokemonType::Psychic => "Twisted Spoon",
                    PokemonType::Ice => "Never-Melt Ice",
                    PokemonType::Dragon => "Dragon Fang",
                    PokemonType::Dark => "Black Glasses",
                    PokemonType::Fairy => "Fairy Feather",
                    PokemonType::Typeless => "Plain Charm",
                };
                write!(f, "{}", name)
            }
            HeldItem::BaseStatBooster(stat) => {
                let name = match stat {
                    StatType::Atk => "Protein",
                    StatType::Def => "Iron",
                    StatType::SpAtk => "Calcium",
                    StatType::SpDef => "Zinc",
                    StatType::Spe => "Carbos",
                    StatType::Acc | StatType::Eva => "Vitamin",
                };
                write!(f, "{}", name)
            }
            HeldItem::Berry(berry) => write!(f, "{}", berry),
            HeldItem::WhiteHerb => write!(f, "White Herb"),
        }
    }
}

/// Items that belong to a whole side rather than one combatant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalItem {
    AmuletCoin,
    HealingCharm,
    /// Stack count is the number of battles left.
    Lure,
}

/// Battles granted by one Lure.
pub const LURE_BATTLES: u32 = 10;

impl GlobalItem {
    pub fn max_stack_count(&self) -> u32 {
        match self {
            GlobalItem::AmuletCoin => 5,
            GlobalItem::HealingCharm => 5,
            GlobalItem::Lure => LURE_BATTLES * 3,
        }
    }

    pub fn tier(&self) -> ModifierTier {
        match self {
            GlobalItem::AmuletCoin => ModifierTier::Ultra,
            GlobalItem::HealingCharm => ModifierTier::Master,
            GlobalItem::Lure => ModifierTier::Common,
        }
    }

    pub fn class(&self) -> ModifierClass {
        match self {
            GlobalItem::AmuletCoin => ModifierClass::MoneyMultiplier,
            GlobalItem::HealingCharm => ModifierClass::HealingBooster,
            GlobalItem::Lure => ModifierClass::DoubleBattleChanceBooster,
        }
    }
}

impl fmt::Display for GlobalItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlobalItem::AmuletCoin => write!(f, "Amulet Coin"),
            GlobalItem::HealingCharm => write!(f, "Healing Charm"),
            GlobalItem::Lure => write!(f, "Lure"),
        }
    }
}

/// The event family a persistent modifier answers. Engine code asks for all
/// modifiers of one class at the matching battle moment.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierClass {
    TurnHeal,
    HitHeal,
    SurviveDamage,
    FlinchChance,
    AttackTypeBooster,
    BaseStatBooster,
    Berry,
    ResetNegativeStatStage,
    MoneyMultiplier,
    HealingBooster,
    DoubleBattleChanceBooster,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Held {
        item: HeldItem,
        pokemon_id: CombatantId,
    },
    Global(GlobalItem),
}

impl ModifierKind {
    pub fn max_stack_count(&self) -> u32 {
        match self {
            ModifierKind::Held { item, .. } => item.max_stack_count(),
            ModifierKind::Global(item) => item.max_stack_count(),
        }
    }

    pub fn tier(&self) -> ModifierTier {
        match self {
            ModifierKind::Held { item, .. } => item.tier(),
            ModifierKind::Global(item) => item.tier(),
        }
    }

    pub fn class(&self) -> ModifierClass {
        match self {
            ModifierKind::Held { item, .. } => item.class(),
            ModifierKind::Global(item) => item.class(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ModifierKind::Held { item, .. } => item.to_string(),
            ModifierKind::Global(item) => item.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_names() {
        assert_eq!(HeldItem::AttackTypeBooster(PokemonType::Fire).to_string(), "Charcoal");
        assert_eq!(HeldItem::Berry(BerryType::Sitrus).to_string(), "Sitrus Berry");
        assert_eq!(HeldItem::KingsRock.to_string(), "King's Rock");
    }

    #[test]
    fn test_only_berries_and_herbs_are_consumed() {
        assert!(HeldItem::Berry(BerryType::Lum).is_consumed_on_use());
        assert!(HeldItem::WhiteHerb.is_consumed_on_use());
        assert!(!HeldItem::Leftovers.is_consumed_on_use());
    }
}
