//! Items and other modifiers carried by each side.
//!
//! Persistent modifiers stack in a per-side list and answer battle events of
//! their class; consumables act once when obtained.

pub mod consumable;
pub mod effects;
pub mod engine;
pub mod persistent;
pub mod types;

pub use consumable::{ConsumableEffect, ConsumableModifier, ConsumableTarget};
pub use effects::ModifierArgs;
pub use engine::Modifier;
pub use persistent::PersistentModifier;
pub use types::{
    BerryType, GlobalItem, HeldItem, ModifierClass, ModifierId, ModifierKind, LURE_BATTLES,
};
