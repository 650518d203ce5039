//! The battle scene: owner of every piece of battle state and driver of the
//! phase loop.

use crate::abilities::{
    apply_ab_attrs, apply_double_battle_chance_ab_attrs, get_ability, AbAttr, GenericAttr,
};
use crate::abilities::attrs::PreWeatherEffectAttr;
use crate::battle::achievements::{AchvKind, GameData};
use crate::battle::arena::Arena;
use crate::battle::encounter::{Battle, BattleType, TurnCommand};
use crate::battle::phase::{Phase, PhaseStatus};
use crate::battle::phase_queue::{Advance, PhaseQueue};
use crate::battle::rng::BattleRng;
use crate::battle::state::{BattleEvent, BattleSnapshot, CombatantSnapshot, EventBus};
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::modifiers::{ModifierArgs, ModifierClass, PersistentModifier};
use crate::pokemon::{CombatantId, Pokemon};
use schema::{get_move_data, BattlerTagType, PokeballType, Species};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Why [`BattleScene::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// A command must be submitted for this combatant before the loop can go on.
    AwaitingCommand(CombatantId),
    BattleOver,
    /// The configured step cap was reached.
    StepLimit,
}

/// Base odds (one in N) of a wild encounter being a double battle.
const DOUBLE_BATTLE_CHANCE: u32 = 8;

const BATTLE_SEED_LENGTH: usize = 24;

pub struct BattleScene {
    pub config: BattleConfig,
    pub rng: BattleRng,
    pub phases: PhaseQueue<BattleScene>,
    pub arena: Arena,
    pub battle: Battle,
    pub party: Vec<Pokemon>,
    pub enemy_party: Vec<Pokemon>,
    pub modifiers: Vec<PersistentModifier>,
    pub enemy_modifiers: Vec<PersistentModifier>,
    pub money: u64,
    pub pokeball_counts: HashMap<PokeballType, u32>,
    pub game_data: GameData,
    pub events: EventBus,
    pub(crate) last_combatant_id: u32,
    pub(crate) last_modifier_id: u32,
    pub(crate) awaiting_command: Option<CombatantId>,
    pub(crate) battle_over: bool,
}

impl BattleScene {
    pub fn new(config: BattleConfig) -> Self {
        let rng = BattleRng::new(&config.seed);
        let battle = Battle::new(
            config.starting_wave,
            BattleType::Wild,
            config.double_battle,
            String::new(),
        );
        let mut pokeball_counts = HashMap::new();
        pokeball_counts.insert(PokeballType::PokeBall, 5);
        Self {
            money: config.starting_money,
            config,
            rng,
            phases: PhaseQueue::new(),
            arena: Arena::default(),
            battle,
            party: Vec::new(),
            enemy_party: Vec::new(),
            modifiers: Vec::new(),
            enemy_modifiers: Vec::new(),
            pokeball_counts,
            game_data: GameData::default(),
            events: EventBus::new(),
            last_combatant_id: 0,
            last_modifier_id: 0,
            awaiting_command: None,
            battle_over: false,
        }
    }

    // === Party and field lookups ===

    fn next_combatant_id(&mut self) -> CombatantId {
        self.last_combatant_id += 1;
        CombatantId(self.last_combatant_id)
    }

    /// A fresh combatant with a run-unique id. It is not added to any party.
    pub fn create_pokemon(&mut self, species: Species, level: u8, player: bool) -> Pokemon {
        let id = self.next_combatant_id();
        Pokemon::new(id, species, level, player)
    }

    /// Add `pokemon` to a side's party under a fresh id and return that id.
    /// A combatant that arrives already on the field takes the next free slot.
    pub fn add_to_party(&mut self, mut pokemon: Pokemon, player: bool) -> CombatantId {
        let id = self.next_combatant_id();
        pokemon.id = id;
        pokemon.is_player = player;
        if pokemon.on_field {
            pokemon.field_index = self.get_field(player).len();
        }
        let boosts = self.modifier_stats_for(id);
        pokemon.calculate_stats(&boosts);
        if player {
            self.party.push(pokemon);
        } else {
            self.enemy_party.push(pokemon);
        }
        id
    }

    pub fn get_pokemon_by_id(&self, id: CombatantId) -> Option<&Pokemon> {
        self.party
            .iter()
            .chain(self.enemy_party.iter())
            .find(|pokemon| pokemon.id == id)
    }

    pub fn get_pokemon_by_id_mut(&mut self, id: CombatantId) -> Option<&mut Pokemon> {
        self.party
            .iter_mut()
            .chain(self.enemy_party.iter_mut())
            .find(|pokemon| pokemon.id == id)
    }

    pub fn get_pokemon(&self, id: CombatantId) -> BattleResult<&Pokemon> {
        self.get_pokemon_by_id(id)
            .ok_or_else(|| BattleStateError::UnknownCombatant(id).into())
    }

    pub fn pokemon_name(&self, id: CombatantId) -> String {
        self.get_pokemon_by_id(id)
            .map(|pokemon| pokemon.name.clone())
            .unwrap_or_else(|| format!("Pokemon {}", id))
    }

    pub fn party_of(&self, player: bool) -> &[Pokemon] {
        if player {
            &self.party
        } else {
            &self.enemy_party
        }
    }

    /// Ids of one side's active combatants in field-slot order.
    pub fn get_field(&self, player: bool) -> Vec<CombatantId> {
        let mut field: Vec<&Pokemon> = self
            .party_of(player)
            .iter()
            .filter(|pokemon| pokemon.is_active())
            .collect();
        field.sort_by_key(|pokemon| pokemon.field_index);
        field.into_iter().map(|pokemon| pokemon.id).collect()
    }

    /// Every active combatant, player side first.
    pub fn all_field(&self) -> Vec<CombatantId> {
        let mut field = self.get_field(true);
        field.extend(self.get_field(false));
        field
    }

    pub fn get_opponents(&self, id: CombatantId) -> Vec<CombatantId> {
        match self.get_pokemon_by_id(id) {
            Some(pokemon) => self.get_field(!pokemon.is_player),
            None => Vec::new(),
        }
    }

    pub fn get_ally(&self, id: CombatantId) -> Option<CombatantId> {
        let pokemon = self.get_pokemon_by_id(id)?;
        self.get_field(pokemon.is_player)
            .into_iter()
            .find(|other| *other != id)
    }

    // === Messages and display ===

    /// Queue a line of battle text: right after the current phase, or at the
    /// end of the current queue when `defer` is set.
    pub fn queue_message(&mut self, text: impl Into<String>, defer: bool) {
        let phase = Phase::message(text);
        if defer {
            self.phases.push_phase(phase, false);
        } else {
            self.phases.unshift_phase(phase);
        }
    }

    /// Queue the ability banner ahead of whatever the ability is queueing.
    pub fn queue_show_ability(&mut self, pokemon_id: CombatantId, passive: bool) {
        self.phases
            .unshift_at_splice_anchor(Phase::ShowAbility { pokemon_id, passive });
    }

    pub fn show_ability_instant(&mut self, pokemon_id: CombatantId, passive: bool) {
        self.reveal_ability(pokemon_id, passive);
    }

    pub(crate) fn reveal_ability(&mut self, pokemon_id: CombatantId, passive: bool) {
        let Some(pokemon) = self.get_pokemon_by_id_mut(pokemon_id) else {
            return;
        };
        pokemon.battle_data.ability_revealed = true;
        let ability = if passive {
            pokemon.passive_ability_id().unwrap_or(pokemon.ability_id())
        } else {
            pokemon.ability_id()
        };
        self.events.push(BattleEvent::AbilityShown {
            pokemon_id,
            ability,
            passive,
        });
    }

    // === Scheduler ===

    /// Make `phase` current and start it now, setting the current phase
    /// aside until the next shift. Refused while an override is standing by.
    pub fn override_phase(&mut self, phase: Phase) -> bool {
        if !self.phases.override_phase(phase.clone()) {
            return false;
        }
        debug!(kind = %phase.kind(), "start override phase");
        phase.start(self);
        true
    }

    /// Advance the queue one step: restore a standby phase, or take the next
    /// phase and promote at most one ready conditional phase.
    pub fn shift_phase(&mut self) -> Advance {
        let advance = self.phases.advance();
        if advance == Advance::Next {
            if let Some(entry) = self.phases.take_conditional() {
                if entry.is_ready(self) {
                    self.phases.push_phase(entry.phase, false);
                } else {
                    self.phases.requeue_conditional(entry);
                }
            }
        }
        advance
    }

    /// Drive the loop until a command is needed, the battle ends or the step
    /// cap is reached.
    pub fn run(&mut self) -> RunState {
        for _ in 0..self.config.max_phase_steps {
            if self.battle_over {
                return RunState::BattleOver;
            }
            if let Some(pokemon_id) = self.awaiting_command {
                return RunState::AwaitingCommand(pokemon_id);
            }
            if self.shift_phase() == Advance::RestoredStandby {
                continue;
            }
            let Some(phase) = self.phases.current_phase().cloned() else {
                continue;
            };
            debug!(kind = %phase.kind(), turn = self.battle.turn, "start phase");
            if phase.start(self) == PhaseStatus::AwaitingInput {
                if let Some(pokemon_id) = self.awaiting_command {
                    return RunState::AwaitingCommand(pokemon_id);
                }
            }
        }
        warn!(steps = self.config.max_phase_steps, "phase step limit reached");
        RunState::StepLimit
    }

    pub fn is_battle_over(&self) -> bool {
        self.battle_over
    }

    pub fn awaiting_command(&self) -> Option<CombatantId> {
        self.awaiting_command
    }

    // === Battle lifecycle ===

    /// Start a new wave against `enemies`.
    ///
    /// Reseeds the run stream for the wave, draws the battle seed, replaces
    /// the enemy side and its items, and queues the encounter.
    pub fn new_battle(
        &mut self,
        wave_index: u32,
        battle_type: BattleType,
        enemies: Vec<Pokemon>,
    ) -> BattleResult<()> {
        if self.party.iter().all(Pokemon::is_fainted) {
            return Err(BattleStateError::BattleOver.into());
        }
        self.rng.reset_seed(wave_index);
        let battle_seed = self.rng.random_string(BATTLE_SEED_LENGTH);

        self.enemy_party.clear();
        self.clear_enemy_modifiers();
        for enemy in enemies {
            self.add_to_party(enemy, false);
        }
        for pokemon in self.party.iter_mut() {
            pokemon.on_field = false;
            pokemon.reset_summon_data();
            pokemon.reset_turn_data();
            pokemon.reset_battle_data();
        }

        let double = self.roll_double_battle(battle_type);
        self.battle = Battle::new(wave_index, battle_type, double, battle_seed);
        self.arena.reset();
        self.phases.reset();
        self.awaiting_command = None;
        self.battle_over = false;
        self.phases.push_phase(Phase::Encounter, false);
        info!(wave_index, ?battle_type, double, "new battle");
        Ok(())
    }

    /// Double battles need two able combatants per side. Wild encounters roll
    /// for it; Lures and some abilities improve the odds.
    fn roll_double_battle(&mut self, battle_type: BattleType) -> bool {
        let able = |party: &[Pokemon]| party.iter().filter(|p| !p.is_fainted()).count() >= 2;
        if !able(&self.party) || !able(&self.enemy_party) {
            return false;
        }
        if self.config.double_battle || battle_type == BattleType::Trainer {
            return self.config.double_battle;
        }
        let mut chance = DOUBLE_BATTLE_CHANCE;
        self.apply_modifiers(
            ModifierClass::DoubleBattleChanceBooster,
            true,
            &mut ModifierArgs::DoubleBattleChance {
                chance: &mut chance,
            },
        );
        if let Some(lead) = self.party.iter().find(|p| !p.is_fainted()).map(|p| p.id) {
            apply_double_battle_chance_ab_attrs(self, lead, &mut chance, false);
        }
        self.rng.rand_seed_int(chance, 0) == 0
    }

    /// Record the command for a combatant whose command phase is waiting.
    pub fn submit_command(&mut self, pokemon_id: CombatantId, command: TurnCommand) -> BattleResult<()> {
        if self.battle_over {
            return Err(BattleStateError::BattleOver.into());
        }
        if self.awaiting_command != Some(pokemon_id) {
            return Err(BattleStateError::NotAwaitingCommand.into());
        }
        let pokemon = self.get_pokemon(pokemon_id)?;
        match command {
            TurnCommand::Fight { move_index, .. } => {
                let move_instance = pokemon
                    .get_moveset()
                    .get(move_index)
                    .ok_or(ActionError::InvalidMoveIndex(move_index))?;
                if move_instance.pp == 0 {
                    return Err(ActionError::NoPpLeft(move_index).into());
                }
            }
            TurnCommand::Switch { party_index } => {
                let target = self
                    .party_of(pokemon.is_player)
                    .get(party_index)
                    .ok_or(BattleStateError::InvalidPartyIndex(party_index))?;
                if target.is_fainted() || target.on_field || self.is_switch_claimed(target.id) {
                    return Err(ActionError::InvalidSwitchTarget(party_index).into());
                }
                if self.is_trapped(pokemon_id) {
                    return Err(ActionError::Trapped(pokemon_id).into());
                }
            }
            TurnCommand::Run => {
                if self.battle.battle_type == BattleType::Trainer {
                    return Err(ActionError::CannotRun.into());
                }
                if self.is_trapped(pokemon_id) {
                    return Err(ActionError::Trapped(pokemon_id).into());
                }
            }
        }
        debug!(pokemon = %pokemon_id, ?command, "command submitted");
        self.battle.turn_commands.insert(pokemon_id, command);
        self.awaiting_command = None;
        Ok(())
    }

    /// Whether another combatant already chose to switch to `target_id`.
    fn is_switch_claimed(&self, target_id: CombatantId) -> bool {
        self.battle.turn_commands.iter().any(|(id, command)| match command {
            TurnCommand::Switch { party_index } => self
                .get_pokemon_by_id(*id)
                .and_then(|pokemon| self.party_of(pokemon.is_player).get(*party_index))
                .is_some_and(|pokemon| pokemon.id == target_id),
            _ => false,
        })
    }

    /// Whether `pokemon_id` cannot leave the field: held in place by a tag,
    /// or by an opponent's trapping ability.
    pub fn is_trapped(&mut self, pokemon_id: CombatantId) -> bool {
        let Some(pokemon) = self.get_pokemon_by_id(pokemon_id) else {
            return false;
        };
        if pokemon.has_tag(BattlerTagType::Trapped) {
            return true;
        }
        let mut trapped = false;
        for opponent_id in self.get_opponents(pokemon_id) {
            crate::abilities::apply_check_trapped_ab_attrs(
                self,
                opponent_id,
                pokemon_id,
                &mut trapped,
                true,
            );
            if trapped {
                return true;
            }
        }
        false
    }

    // === Randomness ===

    /// Draw from the battle-local stream, which does not disturb the run's
    /// main stream.
    pub fn rand_battle_seed_int(&mut self, range: u32, min: i32) -> i32 {
        self.battle.rand_seed_int(range, min)
    }

    pub fn execute_with_seed_offset<R>(
        &mut self,
        offset: u32,
        seed_override: Option<&str>,
        f: impl FnOnce(&mut BattleRng) -> R,
    ) -> R {
        self.rng.execute_with_seed_offset(offset, seed_override, f)
    }

    // === Ability queries ===

    /// Whether a generic attribute would apply, without showing anything.
    pub fn has_generic_attr(&mut self, pokemon_id: CombatantId, kind: GenericAttr) -> bool {
        let mut cancelled = false;
        apply_ab_attrs(self, pokemon_id, kind, &mut cancelled, true);
        cancelled
    }

    /// Whether an ability on the field currently suppresses the weather.
    /// Reads the catalog directly so weather checks inside dispatch do not
    /// recurse into it.
    pub fn is_weather_suppressed(&self) -> bool {
        let Some(weather) = self.arena.weather_type() else {
            return false;
        };
        self.party
            .iter()
            .chain(self.enemy_party.iter())
            .filter(|pokemon| pokemon.is_active())
            .flat_map(|pokemon| {
                let mut ids = vec![pokemon.ability_id()];
                ids.extend(pokemon.passive_ability_id());
                ids.into_iter().filter(move |_| !pokemon.summon_data.ability_suppressed)
            })
            .any(|ability_id| {
                get_ability(ability_id).has_attr(|attr| {
                    matches!(
                        attr,
                        AbAttr::PreWeatherEffect(PreWeatherEffectAttr::SuppressWeatherEffect {
                            affects_immutable
                        }) if *affects_immutable || !weather.is_immutable()
                    )
                })
            })
    }

    // === Money ===

    /// Reward for the current wave. Grows with the wave set (blocks of ten
    /// waves) and the position inside it; rounded down to a multiple of 10.
    pub fn wave_money_amount(&self, multiplier: f64) -> u64 {
        let wave_index = self.battle.wave_index.max(1);
        let wave_set = wave_index.div_ceil(10) - 1;
        let position = f64::from((wave_index - 1) % 10 + 1) / 10.0;
        let base = (f64::from(wave_set) + 1.0 + 0.75 + position) * 100.0;
        let value = base.powf(1.0 + 0.005 * f64::from(wave_set)) * multiplier;
        ((value / 10.0).floor() * 10.0) as u64
    }

    /// Add money. Negative amounts count as positive; the total is capped.
    pub fn add_money(&mut self, amount: i64) {
        let gained = amount.unsigned_abs().saturating_mul(10);
        self.money = self.money.saturating_add(gained).min(self.config.max_money);
        self.events.push(BattleEvent::MoneyChanged { money: self.money });
        self.validate_achvs(AchvKind::Money, None);
    }

    // === Snapshots ===

    pub fn snapshot(&self) -> BattleSnapshot {
        let combatant = |pokemon: &Pokemon| {
            let mut stat_stages: Vec<_> = pokemon
                .summon_data
                .stat_stages
                .iter()
                .map(|(stat, stage)| (*stat, *stage))
                .collect();
            stat_stages.sort_by_key(|(stat, _)| *stat as u8);
            CombatantSnapshot {
                id: pokemon.id,
                hp: pokemon.hp,
                status: pokemon.status,
                on_field: pokemon.on_field,
                form_index: pokemon.form_index,
                stat_stages,
                tags: pokemon.summon_data.tags.iter().map(|tag| tag.tag_type).collect(),
            }
        };
        let stacks = |modifiers: &[PersistentModifier]| {
            modifiers
                .iter()
                .map(|modifier| (modifier.id, modifier.stack_count))
                .collect()
        };
        BattleSnapshot {
            wave_index: self.battle.wave_index,
            turn: self.battle.turn,
            money: self.money,
            weather: self.arena.weather_type(),
            terrain: self.arena.terrain_type(),
            party: self.party.iter().map(combatant).collect(),
            enemy_party: self.enemy_party.iter().map(combatant).collect(),
            modifiers: stacks(&self.modifiers),
            enemy_modifiers: stacks(&self.enemy_modifiers),
            pending_phases: self
                .phases
                .pending_phases()
                .into_iter()
                .map(Phase::kind)
                .collect(),
            rng_counter: self.rng.counter(),
        }
    }

    /// Index of the first usable move of `pokemon_id`, if any.
    pub fn first_usable_move(&self, pokemon_id: CombatantId) -> Option<usize> {
        self.get_pokemon_by_id(pokemon_id)?
            .get_moveset()
            .iter()
            .position(|move_instance| move_instance.pp > 0)
    }

    /// Priority of the move a command would use.
    pub(crate) fn command_priority(&self, pokemon_id: CombatantId, command: &TurnCommand) -> i8 {
        match command {
            TurnCommand::Fight { move_index, .. } => self
                .get_pokemon_by_id(pokemon_id)
                .and_then(|pokemon| pokemon.get_moveset().get(*move_index))
                .map(|move_instance| get_move_data(move_instance.move_).priority)
                .unwrap_or(0),
            _ => 0,
        }
    }
}
