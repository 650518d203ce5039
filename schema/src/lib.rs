// Battle Schema - Shared type definitions
// This crate holds the static enums and catalog data shared between the
// battle-core engine and any tooling built around it.

// Re-export the main types
pub use abilities::*;
pub use battle_data::*;
pub use move_types::*;
pub use moves::*;
pub use pokemon_types::*;
pub use species::*;

pub mod abilities;
pub mod battle_data;
pub mod move_types;
pub mod moves;
pub mod pokemon_types;
pub mod species;
