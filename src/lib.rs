//! Battle Core
//!
//! A deterministic, phase-driven battle engine for a monster-collecting
//! roguelike: a phase scheduler, ability attribute dispatch, stacking items,
//! and a seeded random stream that reproduces a run from its seed.

// --- MODULE DECLARATIONS ---
pub mod abilities;
pub mod battle;
pub mod config;
pub mod errors;
pub mod modifiers;
pub mod pokemon;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Static data: species, moves, types and the ability id list.
pub use schema::{
    get_move_data, AbilityId, ArenaTagSide, ArenaTagType, BattlerTagType, Move, MoveCategory,
    MoveData, MoveTarget, PokeballType, PokemonType, Species, StatType, StatusEffect, TerrainType,
    WeatherType,
};

// --- From this crate's modules (`src/`) ---

// The scene and its driver.
pub use battle::encounter::{BattleType, TurnCommand};
pub use battle::phase::{Phase, PhaseKind, PhaseStatus};
pub use battle::phase_queue::PhaseQueue;
pub use battle::rng::BattleRng;
pub use battle::scene::{BattleScene, RunState};
pub use battle::state::{BattleEvent, BattleSnapshot, EventBus};

// Runtime types.
pub use abilities::{get_ability, Ability, DispatchReport};
pub use modifiers::{GlobalItem, HeldItem, Modifier, ModifierId, PersistentModifier};
pub use pokemon::{CombatantId, Pokemon};

// Configuration, errors and result types.
pub use config::BattleConfig;
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, ConfigError, ModifierError,
};
