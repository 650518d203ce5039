use crate::battle::rng::{shift_char_codes, BattleRng};
use crate::modifiers::HeldItem;
use crate::pokemon::CombatantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleType {
    Wild,
    Trainer,
}

/// A choice submitted for one combatant for the coming turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnCommand {
    Fight {
        move_index: usize,
        target: Option<CombatantId>,
    },
    Switch {
        party_index: usize,
    },
    Run,
}

/// Per-battle bookkeeping for the current wave.
#[derive(Debug, Clone)]
pub struct Battle {
    pub wave_index: u32,
    pub battle_type: BattleType,
    pub double: bool,
    pub turn: u32,
    /// Seed of the battle-local random stream, fixed when the battle starts.
    pub battle_seed: String,
    /// Commands collected for the current turn, keyed by combatant.
    pub turn_commands: BTreeMap<CombatantId, TurnCommand>,
    pub money_scooped: u64,
    pub player_fled: bool,
    pub escape_attempts: u32,
    pub enemy_faints: u32,
    pub player_faints: u32,
    /// Items left behind by the wave, picked up by loot abilities.
    pub post_battle_loot: Vec<HeldItem>,
    /// Battle-local stream; rebuilt at the first draw of every turn.
    seed_state: Option<BattleRng>,
}

impl Battle {
    pub fn new(wave_index: u32, battle_type: BattleType, double: bool, battle_seed: String) -> Self {
        Self {
            wave_index,
            battle_type,
            double,
            turn: 0,
            battle_seed,
            turn_commands: BTreeMap::new(),
            money_scooped: 0,
            player_fled: false,
            escape_attempts: 0,
            enemy_faints: 0,
            player_faints: 0,
            post_battle_loot: Vec::new(),
            seed_state: None,
        }
    }

    pub fn field_size(&self) -> usize {
        if self.double {
            2
        } else {
            1
        }
    }

    pub fn increment_turn(&mut self) {
        self.turn += 1;
        self.turn_commands.clear();
        self.seed_state = None;
    }

    /// Draw from the battle-local stream. It is seeded from the battle seed and
    /// the turn number, so draws here never disturb the run's main stream.
    pub fn rand_seed_int(&mut self, range: u32, min: i32) -> i32 {
        if range <= 1 {
            return min;
        }
        let turn = self.turn;
        let seed = &self.battle_seed;
        self.seed_state
            .get_or_insert_with(|| BattleRng::new(&shift_char_codes(seed, turn << 6)))
            .rand_seed_int(range, min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_stream_is_reproducible_per_turn() {
        let mut a = Battle::new(1, BattleType::Wild, false, "abcdef".to_string());
        let mut b = Battle::new(1, BattleType::Wild, false, "abcdef".to_string());
        a.increment_turn();
        b.increment_turn();
        let draws_a: Vec<i32> = (0..5).map(|_| a.rand_seed_int(100, 0)).collect();
        let draws_b: Vec<i32> = (0..5).map(|_| b.rand_seed_int(100, 0)).collect();
        assert_eq!(draws_a, draws_b);

        a.increment_turn();
        b.increment_turn();
        assert_eq!(a.rand_seed_int(1000, 0), b.rand_seed_int(1000, 0));
    }
}
