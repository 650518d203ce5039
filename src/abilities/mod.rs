//! Ability catalog and attribute dispatch.
//!
//! An ability is a list of attributes. Each attribute belongs to one hook;
//! the engine calls the hook's dispatch function at the matching battle
//! moment and every attribute of that hook on the combatant's abilities gets
//! a chance to act.

pub mod apply;
pub mod attrs;
pub mod catalog;
pub mod conditions;
pub mod dispatch;

pub use attrs::{
    AbAttr, ApplyOutcome, AttrEntry, GenericAttr, HookKind, TriggerArgs, VisualCue,
};
pub use conditions::AbilityCondition;
pub use dispatch::*;

use schema::AbilityId;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Ability {
    pub id: AbilityId,
    pub name: &'static str,
    pub generation: u8,
    pub attrs: Vec<AttrEntry>,
    /// Conditions every attribute of this ability must pass.
    pub conditions: Vec<AbilityCondition>,
    /// May fire while the holder is fainted.
    pub bypass_faint: bool,
    /// Can be ignored by mold-breaking effects.
    pub ignorable: bool,
    /// Only part of the ability's behavior is implemented.
    pub partial: bool,
    /// Known to misbehave in rare interactions.
    pub edge_case: bool,
}

impl Ability {
    pub fn new(id: AbilityId, name: &'static str, generation: u8) -> Self {
        Self {
            id,
            name,
            generation,
            attrs: Vec::new(),
            conditions: Vec::new(),
            bypass_faint: false,
            ignorable: false,
            partial: false,
            edge_case: false,
        }
    }

    pub fn attr(mut self, attr: AbAttr) -> Self {
        let show_ability = attr.default_show_ability();
        self.attrs.push(AttrEntry {
            attr,
            show_ability,
            extra_condition: None,
        });
        self
    }

    /// Attach an attribute without the ability banner.
    pub fn quiet_attr(mut self, attr: AbAttr) -> Self {
        self.attrs.push(AttrEntry {
            attr,
            show_ability: false,
            extra_condition: None,
        });
        self
    }

    /// Attach an attribute that only fires while `condition` holds.
    pub fn conditional_attr(mut self, condition: AbilityCondition, attr: AbAttr) -> Self {
        let show_ability = attr.default_show_ability();
        self.attrs.push(AttrEntry {
            attr,
            show_ability,
            extra_condition: Some(condition),
        });
        self
    }

    pub fn condition(mut self, condition: AbilityCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn bypass_faint(mut self) -> Self {
        self.bypass_faint = true;
        self
    }

    pub fn ignorable(mut self) -> Self {
        self.ignorable = true;
        self
    }

    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    pub fn edge_case(mut self) -> Self {
        self.edge_case = true;
        self
    }

    pub fn attrs_for(&self, hook: HookKind) -> impl Iterator<Item = &AttrEntry> {
        self.attrs.iter().filter(move |entry| entry.attr.hook() == hook)
    }

    pub fn has_attr(&self, predicate: impl Fn(&AbAttr) -> bool) -> bool {
        self.attrs.iter().any(|entry| predicate(&entry.attr))
    }
}

static ABILITIES: OnceLock<HashMap<AbilityId, Ability>> = OnceLock::new();

fn registry() -> &'static HashMap<AbilityId, Ability> {
    ABILITIES.get_or_init(|| {
        catalog::build_catalog()
            .into_iter()
            .map(|ability| (ability.id, ability))
            .collect()
    })
}

/// Catalog lookup. Ids without an entry resolve to the empty ability.
pub fn get_ability(id: AbilityId) -> &'static Ability {
    let abilities = registry();
    abilities
        .get(&id)
        .or_else(|| abilities.get(&AbilityId::None))
        .unwrap_or_else(empty_ability)
}

fn empty_ability() -> &'static Ability {
    static EMPTY: OnceLock<Ability> = OnceLock::new();
    EMPTY.get_or_init(|| Ability::new(AbilityId::None, "None", 3))
}
