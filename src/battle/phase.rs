use crate::pokemon::CombatantId;
use schema::{Move, StatType, StatusEffect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumDiscriminants};

/// Named battle animations the presentation layer may play.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BattleAnim {
    StatUp,
    StatDown,
    Heal,
    BerryEat,
    WeatherDamage,
    StatusDamage,
    FormChange,
    AbilityActivation,
}

/// A unit of battle work. Phases are queued on the [`PhaseQueue`] and started
/// one at a time by the scene.
///
/// [`PhaseQueue`]: crate::battle::phase_queue::PhaseQueue
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(PhaseKind), derive(Hash, Display, Serialize, Deserialize))]
pub enum Phase {
    Encounter,
    TurnInit,
    Command {
        pokemon_id: CombatantId,
    },
    EnemyCommand {
        pokemon_id: CombatantId,
    },
    TurnStart,
    AttemptRun {
        pokemon_id: CombatantId,
    },
    /// `move_index` is None for follow-up moves, which cost no PP and skip
    /// the pre-move checks.
    Move {
        pokemon_id: CombatantId,
        move_id: Move,
        move_index: Option<usize>,
        targets: Vec<CombatantId>,
    },
    MoveEffect {
        pokemon_id: CombatantId,
        move_id: Move,
        targets: Vec<CombatantId>,
    },
    MoveEnd {
        pokemon_id: CombatantId,
        move_id: Move,
        targets: Vec<CombatantId>,
        follow_up: bool,
    },
    Message {
        text: String,
    },
    ShowAbility {
        pokemon_id: CombatantId,
        passive: bool,
    },
    StatStageChange {
        pokemon_id: CombatantId,
        self_induced: bool,
        stats: Vec<StatType>,
        stages: i8,
    },
    PokemonHeal {
        pokemon_id: CombatantId,
        amount: u16,
        message: Option<String>,
        show_full_hp_message: bool,
    },
    ObtainStatusEffect {
        pokemon_id: CombatantId,
        effect: StatusEffect,
        source_id: Option<CombatantId>,
    },
    Summon {
        pokemon_id: CombatantId,
    },
    PostSummon {
        pokemon_id: CombatantId,
    },
    SwitchSummon {
        switch_out_id: CombatantId,
        switch_in_id: CombatantId,
    },
    WeatherEffect,
    TurnEnd,
    Faint {
        pokemon_id: CombatantId,
        source_id: Option<CombatantId>,
        move_id: Option<Move>,
    },
    FormChange {
        pokemon_id: CombatantId,
        form_index: u8,
        modal: bool,
    },
    PokemonAnim {
        pokemon_id: CombatantId,
        anim: BattleAnim,
    },
    Victory,
    GameOver,
    BattleEnd {
        player_won: bool,
    },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        PhaseKind::from(self)
    }

    pub fn message(text: impl Into<String>) -> Self {
        Phase::Message { text: text.into() }
    }

    /// The combatant this phase acts on, if any.
    pub fn pokemon_id(&self) -> Option<CombatantId> {
        match self {
            Phase::Command { pokemon_id }
            | Phase::EnemyCommand { pokemon_id }
            | Phase::AttemptRun { pokemon_id }
            | Phase::Move { pokemon_id, .. }
            | Phase::MoveEffect { pokemon_id, .. }
            | Phase::MoveEnd { pokemon_id, .. }
            | Phase::ShowAbility { pokemon_id, .. }
            | Phase::StatStageChange { pokemon_id, .. }
            | Phase::PokemonHeal { pokemon_id, .. }
            | Phase::ObtainStatusEffect { pokemon_id, .. }
            | Phase::Summon { pokemon_id }
            | Phase::PostSummon { pokemon_id }
            | Phase::Faint { pokemon_id, .. }
            | Phase::FormChange { pokemon_id, .. }
            | Phase::PokemonAnim { pokemon_id, .. } => Some(*pokemon_id),
            Phase::SwitchSummon { switch_out_id, .. } => Some(*switch_out_id),
            Phase::Encounter
            | Phase::TurnInit
            | Phase::TurnStart
            | Phase::Message { .. }
            | Phase::WeatherEffect
            | Phase::TurnEnd
            | Phase::Victory
            | Phase::GameOver
            | Phase::BattleEnd { .. } => None,
        }
    }
}

/// What happened when a phase was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    /// The phase finished its work; the scheduler may shift to the next one.
    Ended,
    /// The phase is waiting on the embedding layer (a player command).
    AwaitingInput,
}
