//! Achievements and vouchers unlocked during a run.

use crate::battle::scene::BattleScene;
use crate::battle::state::BattleEvent;
use crate::modifiers::{GlobalItem, Modifier, ModifierKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Family of achievements checked together at one moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchvKind {
    Money,
    Modifier,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AchvRequirement {
    /// Run money at or above this amount.
    Money(u64),
    /// The modifier being added is this global item.
    GlobalItem(GlobalItem),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Achv {
    pub id: &'static str,
    pub name: &'static str,
    requirement: AchvRequirement,
    /// Voucher granted alongside the achievement.
    pub voucher: Option<VoucherType>,
}

impl Achv {
    pub fn kind(&self) -> AchvKind {
        match self.requirement {
            AchvRequirement::Money(_) => AchvKind::Money,
            AchvRequirement::GlobalItem(_) => AchvKind::Modifier,
        }
    }

    fn validate(&self, scene: &BattleScene, modifier: Option<&Modifier>) -> bool {
        match self.requirement {
            AchvRequirement::Money(amount) => scene.money >= amount,
            AchvRequirement::GlobalItem(item) => matches!(
                modifier,
                Some(Modifier::Persistent(persistent))
                    if persistent.kind == ModifierKind::Global(item)
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VoucherType {
    Regular,
    Plus,
    Premium,
    Golden,
}

pub const ACHIEVEMENTS: &[Achv] = &[
    Achv {
        id: "10K_MONEY",
        name: "Money Haver",
        requirement: AchvRequirement::Money(10_000),
        voucher: None,
    },
    Achv {
        id: "100K_MONEY",
        name: "Rich",
        requirement: AchvRequirement::Money(100_000),
        voucher: Some(VoucherType::Regular),
    },
    Achv {
        id: "1M_MONEY",
        name: "Millionaire",
        requirement: AchvRequirement::Money(1_000_000),
        voucher: Some(VoucherType::Plus),
    },
    Achv {
        id: "10M_MONEY",
        name: "One Percenter",
        requirement: AchvRequirement::Money(10_000_000),
        voucher: Some(VoucherType::Premium),
    },
    Achv {
        id: "LURE",
        name: "Lure Them In",
        requirement: AchvRequirement::GlobalItem(GlobalItem::Lure),
        voucher: None,
    },
    Achv {
        id: "AMULET_COIN",
        name: "Lucky Charm",
        requirement: AchvRequirement::GlobalItem(GlobalItem::AmuletCoin),
        voucher: None,
    },
    Achv {
        id: "HEALING_CHARM",
        name: "Healing Touch",
        requirement: AchvRequirement::GlobalItem(GlobalItem::HealingCharm),
        voucher: Some(VoucherType::Regular),
    },
];

/// Unlock records kept across battles. Unlocks store the wave they happened
/// on.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GameData {
    pub achv_unlocks: BTreeMap<String, u32>,
    pub voucher_unlocks: BTreeMap<String, u32>,
    pub voucher_counts: BTreeMap<VoucherType, u32>,
}

impl BattleScene {
    /// Check every achievement of `kind`.
    pub fn validate_achvs(&mut self, kind: AchvKind, modifier: Option<&Modifier>) {
        for achv in ACHIEVEMENTS.iter().filter(|achv| achv.kind() == kind) {
            self.validate_achv(achv, modifier);
        }
    }

    /// Unlock `achv` if its requirement holds and it is not unlocked yet
    /// (unless re-unlocking is configured). Returns whether it unlocked.
    pub fn validate_achv(&mut self, achv: &Achv, modifier: Option<&Modifier>) -> bool {
        let unlocked = self.game_data.achv_unlocks.contains_key(achv.id);
        if unlocked && !self.config.achievement_reunlock {
            return false;
        }
        if !achv.validate(self, modifier) {
            return false;
        }
        let wave_index = self.battle.wave_index;
        self.game_data
            .achv_unlocks
            .insert(achv.id.to_string(), wave_index);
        info!(achievement = achv.id, "achievement unlocked");
        self.events.push(BattleEvent::AchievementUnlocked {
            achievement: achv.name.to_string(),
        });
        if let Some(voucher) = achv.voucher {
            self.validate_voucher(achv.id, voucher);
        }
        true
    }

    /// Grant the voucher tied to achievement `id` once.
    pub fn validate_voucher(&mut self, id: &str, voucher: VoucherType) -> bool {
        if self.game_data.voucher_unlocks.contains_key(id) {
            return false;
        }
        let wave_index = self.battle.wave_index;
        self.game_data
            .voucher_unlocks
            .insert(id.to_string(), wave_index);
        *self.game_data.voucher_counts.entry(voucher).or_insert(0) += 1;
        self.events.push(BattleEvent::VoucherUnlocked {
            voucher: format!("{:?} voucher", voucher),
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::create_test_scene;
    use crate::modifiers::{ModifierId, PersistentModifier};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_money_achievements_unlock_once() {
        // Arrange
        let mut scene = create_test_scene();

        // Act
        scene.add_money(1_000);
        scene.add_money(1_000);

        // Assert
        assert!(scene.game_data.achv_unlocks.contains_key("10K_MONEY"));
        let unlock_events = scene
            .events
            .events()
            .iter()
            .filter(|event| {
                matches!(event, BattleEvent::AchievementUnlocked { achievement } if achievement == "Money Haver")
            })
            .count();
        assert_eq!(unlock_events, 1);
    }

    #[test]
    fn test_achievement_grants_its_voucher() {
        let mut scene = create_test_scene();
        let charm = Modifier::Persistent(PersistentModifier::global(
            ModifierId(1),
            GlobalItem::HealingCharm,
        ));

        scene.validate_achvs(AchvKind::Modifier, Some(&charm));

        assert!(scene.game_data.achv_unlocks.contains_key("HEALING_CHARM"));
        assert_eq!(scene.game_data.voucher_counts.get(&VoucherType::Regular), Some(&1));
        assert!(!scene.game_data.achv_unlocks.contains_key("LURE"));
    }

    #[test]
    fn test_reunlock_is_configurable() {
        let mut scene = create_test_scene();
        scene.config.achievement_reunlock = true;
        let achv = ACHIEVEMENTS[0];
        scene.money = 20_000;

        assert!(scene.validate_achv(&achv, None));
        assert!(scene.validate_achv(&achv, None));
    }
}
