use crate::modifiers::types::{GlobalItem, HeldItem, ModifierClass, ModifierId, ModifierKind, LURE_BATTLES};
use crate::pokemon::CombatantId;
use schema::ModifierTier;
use serde::{Deserialize, Serialize};

/// A stacking item kept in one side's modifier list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PersistentModifier {
    pub id: ModifierId,
    pub kind: ModifierKind,
    pub stack_count: u32,
    pub is_transferable: bool,
}

impl PersistentModifier {
    pub fn new(id: ModifierId, kind: ModifierKind, stack_count: u32) -> Self {
        let stack_count = stack_count.min(kind.max_stack_count());
        Self {
            id,
            kind,
            stack_count,
            is_transferable: matches!(kind, ModifierKind::Held { .. }),
        }
    }

    pub fn held(id: ModifierId, item: HeldItem, pokemon_id: CombatantId, stack_count: u32) -> Self {
        Self::new(id, ModifierKind::Held { item, pokemon_id }, stack_count)
    }

    /// A freshly obtained global item. A new Lure starts with its full count
    /// of battles.
    pub fn global(id: ModifierId, item: GlobalItem) -> Self {
        let stack_count = match item {
            GlobalItem::Lure => LURE_BATTLES,
            _ => 1,
        };
        Self::new(id, ModifierKind::Global(item), stack_count)
    }

    pub fn max_stack_count(&self) -> u32 {
        self.kind.max_stack_count()
    }

    pub fn tier(&self) -> ModifierTier {
        self.kind.tier()
    }

    pub fn class(&self) -> ModifierClass {
        self.kind.class()
    }

    pub fn name(&self) -> String {
        self.kind.name()
    }

    pub fn pokemon_id(&self) -> Option<CombatantId> {
        match self.kind {
            ModifierKind::Held { pokemon_id, .. } => Some(pokemon_id),
            ModifierKind::Global(_) => None,
        }
    }

    pub fn held_item(&self) -> Option<HeldItem> {
        match self.kind {
            ModifierKind::Held { item, .. } => Some(item),
            ModifierKind::Global(_) => None,
        }
    }

    /// Same item type on the same holder.
    pub fn matches(&self, other: &PersistentModifier) -> bool {
        self.kind == other.kind
    }

    pub fn headroom(&self) -> u32 {
        self.max_stack_count().saturating_sub(self.stack_count)
    }

    /// Grow the stack by `amount`. All or nothing: refused when the result
    /// would exceed the maximum.
    pub fn increment_stack(&mut self, amount: u32) -> bool {
        if self.stack_count + amount > self.max_stack_count() {
            return false;
        }
        self.stack_count += amount;
        true
    }

    /// Merge into `modifiers`: grow a matching stack, or append as new.
    /// Returns false, leaving `modifiers` untouched, when the matching stack
    /// has no room.
    pub fn add(self, modifiers: &mut Vec<PersistentModifier>) -> bool {
        if let Some(existing) = modifiers.iter_mut().find(|m| m.matches(&self)) {
            return existing.increment_stack(self.stack_count);
        }
        if self.stack_count == 0 {
            return false;
        }
        modifiers.push(self);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::types::BerryType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_stacks_up_to_the_maximum() {
        // Arrange
        let holder = CombatantId(1);
        let mut modifiers = Vec::new();

        // Act
        let results: Vec<bool> = (0..4)
            .map(|i| {
                PersistentModifier::held(ModifierId(i), HeldItem::Berry(BerryType::Sitrus), holder, 1)
                    .add(&mut modifiers)
            })
            .collect();

        // Assert
        assert_eq!(results, vec![true, true, true, false]);
        assert_eq!(modifiers.len(), 1);
        assert_eq!(modifiers[0].stack_count, 3);
    }

    #[test]
    fn test_same_item_on_different_holders_does_not_stack() {
        let mut modifiers = Vec::new();
        assert!(PersistentModifier::held(ModifierId(1), HeldItem::Leftovers, CombatantId(1), 1)
            .add(&mut modifiers));
        assert!(PersistentModifier::held(ModifierId(2), HeldItem::Leftovers, CombatantId(2), 1)
            .add(&mut modifiers));
        assert_eq!(modifiers.len(), 2);
    }

    #[test]
    fn test_new_modifier_is_clamped_to_its_maximum() {
        let modifier =
            PersistentModifier::held(ModifierId(1), HeldItem::WhiteHerb, CombatantId(1), 9);
        assert_eq!(modifier.stack_count, 2);
        assert_eq!(modifier.headroom(), 0);
    }

    #[test]
    fn test_lures_extend_the_battle_count() {
        let mut modifiers = Vec::new();
        assert!(PersistentModifier::global(ModifierId(1), GlobalItem::Lure).add(&mut modifiers));
        assert!(PersistentModifier::global(ModifierId(2), GlobalItem::Lure).add(&mut modifiers));
        assert_eq!(modifiers[0].stack_count, 2 * LURE_BATTLES);
    }
}
