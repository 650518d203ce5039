use crate::abilities::get_ability;
use crate::modifiers::BerryType;
use schema::{
    get_move_data, AbilityId, BattlerTagType, Gender, Move, Nature, PokemonType, Species,
    StatType, StatusEffect,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identity of a combatant for the lifetime of a run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub effect: StatusEffect,
    /// Turns of sleep left; only meaningful for sleep.
    pub sleep_turns_remaining: u8,
    /// Escalating toxic counter; only meaningful for toxic.
    pub toxic_turn_count: u8,
}

impl Status {
    pub fn new(effect: StatusEffect, sleep_turns_remaining: u8) -> Self {
        Self {
            effect,
            sleep_turns_remaining,
            toxic_turn_count: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattlerTag {
    pub tag_type: BattlerTagType,
    /// Zero lasts until the holder leaves the field.
    pub turns_left: u8,
    pub source_id: Option<CombatantId>,
    pub source_move: Option<Move>,
}

impl BattlerTag {
    pub fn new(tag_type: BattlerTagType, turns_left: u8, source_id: Option<CombatantId>) -> Self {
        Self {
            tag_type,
            turns_left,
            source_id,
            source_move: None,
        }
    }

    /// Count one turn down. Returns false once the tag has expired.
    pub fn lapse(&mut self) -> bool {
        if self.turns_left == 0 {
            return true;
        }
        self.turns_left -= 1;
        self.turns_left > 0
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MoveInstance {
    pub move_: Move,
    pub pp: u8,
}

impl MoveInstance {
    /// A fresh slot at full PP.
    pub fn new(move_: Move) -> Self {
        MoveInstance {
            move_,
            pp: get_move_data(move_).pp,
        }
    }

    pub fn max_pp(&self) -> u8 {
        get_move_data(self.move_).pp
    }

    /// Spend one PP. Returns false when none is left.
    pub fn use_move(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_pp(&mut self, amount: u8) {
        self.pp = self.pp.saturating_add(amount).min(self.max_pp());
    }
}

/// State that lives only while the combatant stays on the field.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SummonData {
    pub stat_stages: HashMap<StatType, i8>,
    pub tags: Vec<BattlerTag>,
    pub types: Option<Vec<PokemonType>>,
    pub ability: Option<AbilityId>,
    pub moveset: Option<Vec<MoveInstance>>,
    /// Abilities that have fired since the combatant was sent out.
    pub abilities_applied: Vec<AbilityId>,
    pub ability_suppressed: bool,
    pub moves_used: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttackRecord {
    pub move_id: Move,
    pub source_id: CombatantId,
    pub damage: u32,
    pub critical: bool,
}

/// State reset at the start of every turn.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TurnData {
    pub attacks_received: Vec<AttackRecord>,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub switched_in_this_turn: bool,
    pub failed_run_away: bool,
    pub acted: bool,
}

/// State that lives for one battle.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BattleData {
    pub abilities_applied: Vec<AbilityId>,
    pub berries_eaten: Vec<BerryType>,
    pub ability_revealed: bool,
    pub hit_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pokemon {
    pub id: CombatantId,
    pub species: Species,
    pub name: String,
    pub form_index: u8,
    pub level: u8,
    pub gender: Gender,
    pub shiny: bool,
    pub variant: u8,
    pub nature: Nature,
    pub ivs: [u8; 6],
    /// HP, ATK, DEF, SP.ATK, SP.DEF, SPD after nature and held-item boosts.
    pub stats: [u16; 6],
    pub hp: u16,
    pub status: Option<Status>,
    pub ability: AbilityId,
    pub passive: Option<AbilityId>,
    pub moveset: Vec<MoveInstance>,
    pub is_player: bool,
    pub on_field: bool,
    pub field_index: usize,
    pub summon_data: SummonData,
    pub turn_data: TurnData,
    pub battle_data: BattleData,
}

impl Pokemon {
    pub fn new(id: CombatantId, species: Species, level: u8, is_player: bool) -> Self {
        let mut pokemon = Pokemon {
            id,
            species,
            name: species.to_string(),
            form_index: 0,
            level,
            gender: Gender::Genderless,
            shiny: false,
            variant: 0,
            nature: Nature::Hardy,
            ivs: [15; 6],
            stats: [0; 6],
            hp: 0,
            status: None,
            ability: AbilityId::None,
            passive: None,
            moveset: Vec::new(),
            is_player,
            on_field: false,
            field_index: 0,
            summon_data: SummonData::default(),
            turn_data: TurnData::default(),
            battle_data: BattleData::default(),
        };
        pokemon.calculate_stats(&[1.0; 6]);
        pokemon.hp = pokemon.max_hp();
        pokemon
    }

    /// Recompute the stat array from base stats, IVs, nature and per-stat
    /// multipliers from held items. A raised max HP raises current HP by the
    /// same amount; current HP never exceeds max HP.
    pub fn calculate_stats(&mut self, boosts: &[f64; 6]) {
        let base = self.species.data().base_stats.as_array();
        let level = u32::from(self.level);
        let previous_max_hp = self.stats[0];

        for i in 0..6 {
            let scaled = (2 * u32::from(base[i]) + u32::from(self.ivs[i])) * level / 100;
            let value = if i == 0 {
                scaled + level + 10
            } else {
                let stat = StatType::EFFECTIVE[i - 1];
                ((scaled + 5) as f64 * self.nature.stat_multiplier(stat)).floor() as u32
            };
            let boosted = (f64::from(value) * boosts[i]).floor() as u32;
            self.stats[i] = boosted.min(u32::from(u16::MAX)) as u16;
        }

        let max_hp = self.stats[0];
        if self.hp > 0 && max_hp > previous_max_hp && previous_max_hp > 0 {
            self.hp = self.hp.saturating_add(max_hp - previous_max_hp);
        }
        self.hp = self.hp.min(max_hp);
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = ability;
        self
    }

    pub fn with_moves(mut self, moves: &[Move]) -> Self {
        self.moveset = moves.iter().take(4).copied().map(MoveInstance::new).collect();
        self
    }

    pub fn max_hp(&self) -> u16 {
        self.stats[0]
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.hp >= self.max_hp()
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp() == 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp())
    }

    /// On the field and still standing.
    pub fn is_active(&self) -> bool {
        self.on_field && !self.is_fainted()
    }

    pub fn get_types(&self) -> Vec<PokemonType> {
        match &self.summon_data.types {
            Some(types) => types.clone(),
            None => self.species.types_for_form(self.form_index),
        }
    }

    pub fn is_of_type(&self, pokemon_type: PokemonType) -> bool {
        self.get_types().contains(&pokemon_type)
    }

    pub fn ability_id(&self) -> AbilityId {
        self.summon_data.ability.unwrap_or(self.ability)
    }

    pub fn passive_ability_id(&self) -> Option<AbilityId> {
        self.passive
    }

    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.ability_id() == ability || self.passive == Some(ability)
    }

    /// Whether the primary (or passive) ability may fire right now.
    pub fn can_apply_ability(&self, passive: bool) -> bool {
        let ability_id = if passive {
            match self.passive {
                Some(id) => id,
                None => return false,
            }
        } else {
            self.ability_id()
        };
        if ability_id == AbilityId::None || self.summon_data.ability_suppressed {
            return false;
        }
        if !self.on_field {
            return false;
        }
        !self.is_fainted() || get_ability(ability_id).bypass_faint
    }

    pub fn is_grounded(&self) -> bool {
        !self.is_of_type(PokemonType::Flying) && !self.has_ability(AbilityId::Levitate)
    }

    pub fn get_moveset(&self) -> &[MoveInstance] {
        self.summon_data.moveset.as_deref().unwrap_or(self.moveset.as_slice())
    }

    pub fn get_moveset_mut(&mut self) -> &mut Vec<MoveInstance> {
        match self.summon_data.moveset.as_mut() {
            Some(moveset) => moveset,
            None => &mut self.moveset,
        }
    }

    // === Stat Stage Management ===

    /// Stage of `stat`; unset stages read as 0.
    pub fn get_stat_stage(&self, stat: StatType) -> i8 {
        self.summon_data.stat_stages.get(&stat).copied().unwrap_or(0)
    }

    /// Store `stage` clamped to [-6, 6].
    pub fn set_stat_stage(&mut self, stat: StatType, stage: i8) {
        let clamped_stage = stage.clamp(-6, 6);
        if clamped_stage == 0 {
            self.summon_data.stat_stages.remove(&stat);
        } else {
            self.summon_data.stat_stages.insert(stat, clamped_stage);
        }
    }

    /// Modify a stage by `delta`, returning the stage actually reached.
    pub fn modify_stat_stage(&mut self, stat: StatType, delta: i8) -> i8 {
        let current = self.get_stat_stage(stat);
        self.set_stat_stage(stat, current.saturating_add(delta));
        self.get_stat_stage(stat)
    }

    // === Battler Tags ===

    pub fn get_tag(&self, tag_type: BattlerTagType) -> Option<&BattlerTag> {
        self.summon_data
            .tags
            .iter()
            .find(|tag| tag.tag_type == tag_type)
    }

    pub fn has_tag(&self, tag_type: BattlerTagType) -> bool {
        self.get_tag(tag_type).is_some()
    }

    pub fn remove_tag(&mut self, tag_type: BattlerTagType) -> bool {
        let before = self.summon_data.tags.len();
        self.summon_data.tags.retain(|tag| tag.tag_type != tag_type);
        before != self.summon_data.tags.len()
    }

    /// Count every tag down one turn and return the ones that expired.
    pub fn lapse_tags(&mut self) -> Vec<BattlerTagType> {
        let mut expired = Vec::new();
        self.summon_data.tags.retain_mut(|tag| {
            let keep = tag.lapse();
            if !keep {
                expired.push(tag.tag_type);
            }
            keep
        });
        expired
    }

    pub fn reset_summon_data(&mut self) {
        self.summon_data = SummonData::default();
    }

    pub fn reset_turn_data(&mut self) {
        self.turn_data = TurnData::default();
    }

    pub fn reset_battle_data(&mut self) {
        self.battle_data = BattleData::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_stage_clamping() {
        let mut pokemon = Pokemon::new(CombatantId(1), Species::Pikachu, 50, true);
        assert_eq!(pokemon.modify_stat_stage(StatType::Atk, 4), 4);
        assert_eq!(pokemon.modify_stat_stage(StatType::Atk, 4), 6);
        assert_eq!(pokemon.modify_stat_stage(StatType::Def, -9), -6);
        pokemon.set_stat_stage(StatType::Atk, 0);
        assert!(!pokemon.summon_data.stat_stages.contains_key(&StatType::Atk));
    }

    #[test]
    fn test_calculate_stats_keeps_hp_within_max() {
        let mut pokemon = Pokemon::new(CombatantId(1), Species::Snorlax, 50, true);
        let max_hp = pokemon.max_hp();
        assert_eq!(pokemon.hp, max_hp);

        pokemon.hp = max_hp - 10;
        pokemon.calculate_stats(&[1.1, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert!(pokemon.max_hp() > max_hp);
        assert_eq!(pokemon.hp, pokemon.max_hp() - 10);

        pokemon.calculate_stats(&[1.0; 6]);
        assert!(pokemon.hp <= pokemon.max_hp());
    }

    #[test]
    fn test_tag_lapse() {
        let mut pokemon = Pokemon::new(CombatantId(1), Species::Pikachu, 50, true);
        pokemon
            .summon_data
            .tags
            .push(BattlerTag::new(BattlerTagType::Flinched, 1, None));
        pokemon
            .summon_data
            .tags
            .push(BattlerTag::new(BattlerTagType::Unburden, 0, None));

        let expired = pokemon.lapse_tags();
        assert_eq!(expired, vec![BattlerTagType::Flinched]);
        assert!(pokemon.has_tag(BattlerTagType::Unburden));
    }

    #[test]
    fn test_fainted_pokemon_cannot_apply_ordinary_ability() {
        let mut pokemon =
            Pokemon::new(CombatantId(1), Species::Pikachu, 50, true).with_ability(AbilityId::Static);
        pokemon.on_field = true;
        assert!(pokemon.can_apply_ability(false));
        assert!(!pokemon.can_apply_ability(true));
        pokemon.hp = 0;
        assert!(!pokemon.can_apply_ability(false));
    }
}
