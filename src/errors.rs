use crate::modifiers::ModifierId;
use crate::pokemon::CombatantId;
use thiserror::Error;

/// Main error type for the battle engine.
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// Error raised while loading or validating configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// Error related to invalid battle state
    #[error("Battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Error related to an invalid command from the embedding layer
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Error related to modifier bookkeeping
    #[error("Modifier error: {0}")]
    Modifier(#[from] ModifierError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Errors related to battle state validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("no combatant with id {0}")]
    UnknownCombatant(CombatantId),
    #[error("invalid party index: {0}")]
    InvalidPartyIndex(usize),
    #[error("no command is being awaited")]
    NotAwaitingCommand,
    #[error("the battle is already over")]
    BattleOver,
}

/// Errors related to commands submitted for a combatant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("move index {0} is out of bounds")]
    InvalidMoveIndex(usize),
    #[error("move in slot {0} has no PP left")]
    NoPpLeft(usize),
    #[error("party slot {0} cannot be switched in")]
    InvalidSwitchTarget(usize),
    #[error("{0} is trapped and cannot leave the field")]
    Trapped(CombatantId),
    #[error("cannot run from a trainer battle")]
    CannotRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModifierError {
    #[error("no modifier with id {0}")]
    UnknownModifier(ModifierId),
}

pub type BattleResult<T> = Result<T, BattleEngineError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
