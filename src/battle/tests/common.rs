use crate::battle::encounter::BattleType;
use crate::battle::scene::BattleScene;
use crate::config::BattleConfig;
use crate::pokemon::{CombatantId, Pokemon, Status};
use schema::{AbilityId, Move, Species, StatusEffect};

/// A builder for creating test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let pokemon = TestPokemonBuilder::new(Species::Pikachu, 25)
///     .with_moves(vec![Move::Tackle])
///     .with_status(StatusEffect::Paralysis)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: Species,
    level: u8,
    ability: AbilityId,
    moves: Option<Vec<Move>>,
    status: Option<StatusEffect>,
    current_hp: Option<u16>,
    on_field: bool,
}

impl TestPokemonBuilder {
    /// Creates a new builder for a given species and level.
    pub fn new(species: Species, level: u8) -> Self {
        Self {
            species,
            level,
            ability: AbilityId::None,
            moves: None,
            status: None,
            current_hp: None,
            on_field: false,
        }
    }

    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = ability;
        self
    }

    /// Sets the moves for the test combatant. Defaults to Tackle.
    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moves = Some(moves);
        self
    }

    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    /// Puts the combatant on the field when it is added to a party.
    pub fn on_field(mut self) -> Self {
        self.on_field = true;
        self
    }

    /// Builds the `Pokemon`. The id is replaced when it joins a party.
    pub fn build(self) -> Pokemon {
        let moves = self.moves.unwrap_or_else(|| vec![Move::Tackle]);
        let mut pokemon =
            Pokemon::new(CombatantId(0), self.species, self.level, true).with_ability(self.ability).with_moves(&moves);

        let sleep_turns = if self.status == Some(StatusEffect::Sleep) { 3 } else { 0 };
        pokemon.status = self.status.map(|effect| Status::new(effect, sleep_turns));
        if let Some(hp) = self.current_hp {
            pokemon.hp = hp.min(pokemon.max_hp());
        }
        pokemon.on_field = self.on_field;
        pokemon
    }
}

/// Scene with the default config and a fixed seed.
pub fn create_test_scene() -> BattleScene {
    BattleScene::new(BattleConfig::default().with_seed("test-seed"))
}

/// Scene with `player` in the party and a wild battle against `enemies`
/// queued at wave 1.
pub fn create_test_battle(player: Vec<Pokemon>, enemies: Vec<Pokemon>) -> BattleScene {
    create_test_battle_with_config(BattleConfig::default().with_seed("test-seed"), player, enemies)
}

pub fn create_test_battle_with_config(
    config: BattleConfig,
    player: Vec<Pokemon>,
    enemies: Vec<Pokemon>,
) -> BattleScene {
    let mut scene = BattleScene::new(config);
    for pokemon in player {
        scene.add_to_party(pokemon, true);
    }
    if let Err(err) = scene.new_battle(1, BattleType::Wild, enemies) {
        panic!("Failed to start test battle: {}", err);
    }
    scene
}

/// Drive the scene, answering every command request with the combatant's
/// first usable move, until the battle ends or `max_turns` turns pass.
pub fn run_with_first_moves(scene: &mut BattleScene, max_turns: u32) {
    use crate::battle::encounter::TurnCommand;
    use crate::battle::scene::RunState;

    loop {
        match scene.run() {
            RunState::AwaitingCommand(pokemon_id) => {
                if scene.battle.turn > max_turns {
                    return;
                }
                let move_index = scene.first_usable_move(pokemon_id).unwrap_or(0);
                let command = TurnCommand::Fight {
                    move_index,
                    target: None,
                };
                if let Err(err) = scene.submit_command(pokemon_id, command) {
                    panic!("Command for {} was refused: {}", pokemon_id, err);
                }
            }
            RunState::BattleOver | RunState::StepLimit => return,
        }
    }
}
