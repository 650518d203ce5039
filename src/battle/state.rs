use crate::battle::phase::{BattleAnim, PhaseKind};
use crate::battle::scene::BattleScene;
use crate::modifiers::ModifierId;
use crate::pokemon::{CombatantId, Status};
use schema::{
    AbilityId, ArenaTagSide, ArenaTagType, BattlerTagType, Move, PokeballType, StatType,
    StatusEffect, TerrainType, WeatherType,
};
use serde::{Deserialize, Serialize};

/// Everything the engine reports outward. The presentation layer renders
/// these; the engine never waits on them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn Management
    TurnStarted {
        turn_number: u32,
    },
    TurnEnded {
        turn_number: u32,
    },

    /// A line of battle text.
    Message {
        text: String,
    },
    /// The ability banner for a combatant.
    AbilityShown {
        pokemon_id: CombatantId,
        ability: AbilityId,
        passive: bool,
    },
    AnimationRequested {
        pokemon_id: CombatantId,
        anim: BattleAnim,
    },

    // Pokemon Actions
    PokemonSummoned {
        pokemon_id: CombatantId,
    },
    PokemonWithdrawn {
        pokemon_id: CombatantId,
    },
    MoveUsed {
        pokemon_id: CombatantId,
        move_used: Move,
    },
    MoveMissed {
        attacker_id: CombatantId,
        defender_id: CombatantId,
    },

    // Damage and Healing
    DamageDealt {
        pokemon_id: CombatantId,
        damage: u16,
        remaining_hp: u16,
    },
    PokemonHealed {
        pokemon_id: CombatantId,
        amount: u16,
        new_hp: u16,
    },
    PokemonFainted {
        pokemon_id: CombatantId,
    },
    FormChanged {
        pokemon_id: CombatantId,
        form_index: u8,
    },

    // Status and Tags
    StatusApplied {
        pokemon_id: CombatantId,
        status: StatusEffect,
    },
    StatusCured {
        pokemon_id: CombatantId,
        status: StatusEffect,
    },
    TagAdded {
        pokemon_id: CombatantId,
        tag: BattlerTagType,
    },
    TagRemoved {
        pokemon_id: CombatantId,
        tag: BattlerTagType,
    },

    // Stat Changes
    StatStageChanged {
        pokemon_id: CombatantId,
        stat: StatType,
        old_stage: i8,
        new_stage: i8,
    },
    StatChangeBlocked {
        pokemon_id: CombatantId,
        stat: StatType,
    },

    // Field
    WeatherChanged {
        old_weather: Option<WeatherType>,
        new_weather: Option<WeatherType>,
    },
    TerrainChanged {
        old_terrain: Option<TerrainType>,
        new_terrain: Option<TerrainType>,
    },
    ArenaTagAdded {
        tag: ArenaTagType,
        side: ArenaTagSide,
    },
    ArenaTagRemoved {
        tag: ArenaTagType,
        side: ArenaTagSide,
    },

    // Items and Economy
    ModifierAdded {
        modifier_id: ModifierId,
        player: bool,
    },
    ModifierRemoved {
        modifier_id: ModifierId,
        player: bool,
    },
    ModifierBarUpdated {
        player: bool,
        modifier_count: usize,
    },
    PokeballsAdded {
        ball: PokeballType,
        count: u32,
    },
    MoneyChanged {
        money: u64,
    },
    AchievementUnlocked {
        achievement: String,
    },
    VoucherUnlocked {
        voucher: String,
    },

    // Battle End
    BattleEnded {
        player_won: bool,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, scene: &BattleScene) -> Option<String> {
        let name = |id: &CombatantId| {
            scene
                .get_pokemon_by_id(*id)
                .map(|pokemon| pokemon.name.clone())
                .unwrap_or_else(|| format!("Pokemon {}", id))
        };

        match self {
            BattleEvent::TurnStarted { turn_number } => Some(format!("=== Turn {} ===", turn_number)),
            BattleEvent::Message { text } => Some(text.clone()),
            BattleEvent::AbilityShown {
                pokemon_id,
                ability,
                ..
            } => Some(format!(
                "[{}'s {}]",
                name(pokemon_id),
                crate::abilities::get_ability(*ability).name
            )),
            BattleEvent::DamageDealt {
                pokemon_id, damage, ..
            } => Some(format!("{} took {} damage!", name(pokemon_id), damage)),
            BattleEvent::AchievementUnlocked { achievement } => {
                Some(format!("Achievement unlocked: {}!", achievement))
            }
            BattleEvent::VoucherUnlocked { voucher } => {
                Some(format!("Voucher unlocked: {}!", voucher))
            }
            BattleEvent::BattleEnded { player_won } => Some(if *player_won {
                "You won the battle!".to_string()
            } else {
                "The battle is over.".to_string()
            }),
            // Everything else already reaches the player as a queued message.
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Hand every collected event to the caller and start over.
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Text of every `Message` event, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::Message { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Serializable view of one combatant, for determinism checks and debugging.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub hp: u16,
    pub status: Option<Status>,
    pub on_field: bool,
    pub form_index: u8,
    pub stat_stages: Vec<(StatType, i8)>,
    pub tags: Vec<BattlerTagType>,
}

/// Serializable view of the whole battle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleSnapshot {
    pub wave_index: u32,
    pub turn: u32,
    pub money: u64,
    pub weather: Option<WeatherType>,
    pub terrain: Option<TerrainType>,
    pub party: Vec<CombatantSnapshot>,
    pub enemy_party: Vec<CombatantSnapshot>,
    pub modifiers: Vec<(ModifierId, u32)>,
    pub enemy_modifiers: Vec<(ModifierId, u32)>,
    pub pending_phases: Vec<PhaseKind>,
    pub rng_counter: u64,
}
