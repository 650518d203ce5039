#[cfg(test)]
mod tests {
    use crate::battle::encounter::{BattleType, TurnCommand};
    use crate::battle::scene::{BattleScene, RunState};
    use crate::battle::state::BattleEvent;
    use crate::battle::tests::common::{
        create_test_battle, create_test_battle_with_config, create_test_scene, run_with_first_moves,
        TestPokemonBuilder,
    };
    use crate::config::BattleConfig;
    use crate::errors::{ActionError, BattleEngineError, BattleStateError};
    use pretty_assertions::assert_eq;
    use schema::{AbilityId, ArenaTagSide, ArenaTagType, Move, Species, StatusEffect, WeatherType};

    fn expect_command(scene: &mut BattleScene) -> crate::pokemon::CombatantId {
        match scene.run() {
            RunState::AwaitingCommand(pokemon_id) => pokemon_id,
            other => panic!("expected a command request, got {:?}", other),
        }
    }

    fn fight(move_index: usize) -> TurnCommand {
        TurnCommand::Fight {
            move_index,
            target: None,
        }
    }

    #[test]
    fn test_one_sided_battle_ends_in_victory() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50).with_moves(vec![Move::Tackle]).build();
        let enemy = TestPokemonBuilder::new(Species::Pikachu, 5).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);

        // Act
        run_with_first_moves(&mut scene, 10);

        // Assert
        assert!(scene.is_battle_over());
        assert_eq!(scene.battle.turn, 1);
        assert_eq!(scene.battle.enemy_faints, 1);
        let messages = scene.events.messages();
        assert!(messages.contains(&"Go! Snorlax!"));
        assert!(messages.contains(&"A wild Pikachu appeared!"));
        assert!(messages.contains(&"Snorlax used\nTackle!"));
        assert!(messages.contains(&"Pikachu fainted!"));
        assert!(scene
            .events
            .events()
            .contains(&BattleEvent::BattleEnded { player_won: true }));
        // Wave 1 pays 180, credited at ten times its value.
        assert_eq!(scene.money, 1_000 + 1_800);
    }

    #[test]
    fn test_fainted_enemy_is_replaced_from_its_party() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50).build();
        let first = TestPokemonBuilder::new(Species::Pikachu, 5).with_moves(vec![Move::Splash]).build();
        let second = TestPokemonBuilder::new(Species::Squirtle, 5).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![first, second]);

        // Act: one turn
        let player_id = expect_command(&mut scene);
        scene.submit_command(player_id, fight(0)).unwrap();
        expect_command(&mut scene);

        // Assert: Squirtle took the slot
        let field: Vec<Species> = scene
            .get_field(false)
            .into_iter()
            .filter_map(|id| scene.get_pokemon_by_id(id).map(|p| p.species))
            .collect();
        assert_eq!(field, vec![Species::Squirtle]);
        assert!(scene.events.messages().contains(&"The opponent sent out Squirtle!"));

        run_with_first_moves(&mut scene, 10);
        assert_eq!(scene.battle.enemy_faints, 2);
        assert!(scene
            .events
            .events()
            .contains(&BattleEvent::BattleEnded { player_won: true }));
    }

    #[test]
    fn test_same_seed_and_commands_reproduce_the_battle() {
        let build = || {
            let players = vec![
                TestPokemonBuilder::new(Species::Machop, 30)
                    .with_moves(vec![Move::KarateChop, Move::Tackle])
                    .build(),
                TestPokemonBuilder::new(Species::Pikachu, 30)
                    .with_ability(AbilityId::Static)
                    .with_moves(vec![Move::Thunderbolt, Move::QuickAttack])
                    .build(),
            ];
            let enemies = vec![
                TestPokemonBuilder::new(Species::Geodude, 30)
                    .with_moves(vec![Move::RockThrow, Move::Tackle])
                    .build(),
                TestPokemonBuilder::new(Species::Sandshrew, 30)
                    .with_moves(vec![Move::Scratch, Move::Earthquake])
                    .build(),
            ];
            let config = BattleConfig::default().with_seed("replay");
            let mut scene = create_test_battle_with_config(config, players, enemies);
            run_with_first_moves(&mut scene, 30);
            scene
        };

        let first = build();
        let second = build();

        assert_eq!(first.events.events(), second.events.events());
        assert_eq!(first.snapshot(), second.snapshot());
        assert_eq!(first.rng.counter(), second.rng.counter());
    }

    #[test]
    fn test_run_away_ends_the_battle() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Ninjask, 20)
            .with_ability(AbilityId::RunAway)
            .build();
        let enemy = TestPokemonBuilder::new(Species::Snorlax, 50).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let player_id = expect_command(&mut scene);

        // Act
        scene.submit_command(player_id, TurnCommand::Run).unwrap();
        let state = scene.run();

        // Assert
        assert_eq!(state, RunState::BattleOver);
        assert!(scene.battle.player_fled);
        assert!(scene.events.messages().contains(&"You got away safely!"));
        assert!(scene
            .events
            .events()
            .contains(&BattleEvent::BattleEnded { player_won: false }));
    }

    #[test]
    fn test_trainer_battles_refuse_running() {
        let mut scene = create_test_scene();
        scene.add_to_party(TestPokemonBuilder::new(Species::Pikachu, 20).build(), true);
        let enemy = TestPokemonBuilder::new(Species::Geodude, 20).build();
        scene.new_battle(3, BattleType::Trainer, vec![enemy]).unwrap();
        let player_id = expect_command(&mut scene);

        let result = scene.submit_command(player_id, TurnCommand::Run);

        assert!(matches!(
            result,
            Err(BattleEngineError::Action(ActionError::CannotRun))
        ));
        assert_eq!(scene.awaiting_command(), Some(player_id));
        assert!(scene.events.messages().contains(&"The opponent sent out Geodude!"));
    }

    #[test]
    fn test_invalid_commands_are_rejected() {
        let player = TestPokemonBuilder::new(Species::Pikachu, 20).build();
        let enemy = TestPokemonBuilder::new(Species::Geodude, 20).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let player_id = expect_command(&mut scene);
        let enemy_id = scene.enemy_party[0].id;

        assert!(matches!(
            scene.submit_command(player_id, fight(3)),
            Err(BattleEngineError::Action(ActionError::InvalidMoveIndex(3)))
        ));
        assert!(matches!(
            scene.submit_command(enemy_id, fight(0)),
            Err(BattleEngineError::BattleState(BattleStateError::NotAwaitingCommand))
        ));
        assert!(matches!(
            scene.submit_command(player_id, TurnCommand::Switch { party_index: 0 }),
            Err(BattleEngineError::Action(ActionError::InvalidSwitchTarget(0)))
        ));
        assert!(scene.submit_command(player_id, fight(0)).is_ok());
    }

    #[test]
    fn test_switching_brings_in_the_reserve() {
        // Arrange
        let lead = TestPokemonBuilder::new(Species::Pikachu, 20).build();
        let reserve = TestPokemonBuilder::new(Species::Lapras, 20).build();
        let enemy = TestPokemonBuilder::new(Species::Snorlax, 20).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![lead, reserve], vec![enemy]);
        let lead_id = expect_command(&mut scene);
        let reserve_id = scene.party[1].id;

        // Act
        scene.submit_command(lead_id, TurnCommand::Switch { party_index: 1 }).unwrap();
        let next = expect_command(&mut scene);

        // Assert
        assert_eq!(next, reserve_id);
        assert_eq!(scene.get_field(true), vec![reserve_id]);
        let messages = scene.events.messages();
        assert!(messages.contains(&"Come back, Pikachu!"));
        assert!(messages.contains(&"Go! Lapras!"));
    }

    #[test]
    fn test_new_battle_needs_an_able_party() {
        let mut scene = create_test_scene();
        scene.add_to_party(TestPokemonBuilder::new(Species::Pikachu, 20).with_hp(0).build(), true);

        let result = scene.new_battle(1, BattleType::Wild, vec![TestPokemonBuilder::new(Species::Geodude, 5).build()]);

        assert!(matches!(
            result,
            Err(BattleEngineError::BattleState(BattleStateError::BattleOver))
        ));
    }

    #[test]
    fn test_step_limit_stops_the_loop() {
        let config = BattleConfig {
            max_phase_steps: 3,
            ..BattleConfig::default()
        };
        let player = TestPokemonBuilder::new(Species::Pikachu, 20).build();
        let enemy = TestPokemonBuilder::new(Species::Geodude, 20).build();
        let mut scene = create_test_battle_with_config(config, vec![player], vec![enemy]);

        assert_eq!(scene.run(), RunState::StepLimit);
        assert!(!scene.is_battle_over());
    }

    #[test]
    fn test_spikes_hurt_grounded_arrivals() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Pikachu, 20).build();
        let grounded = TestPokemonBuilder::new(Species::Snorlax, 50).build();
        let mut scene = create_test_battle(vec![player], vec![grounded]);
        assert!(scene.arena.add_tag(ArenaTagType::Spikes, 0, None, ArenaTagSide::Enemy));
        let enemy_id = scene.enemy_party[0].id;
        let max_hp = scene.enemy_party[0].max_hp();

        // Act
        expect_command(&mut scene);

        // Assert
        assert_eq!(scene.get_pokemon_by_id(enemy_id).map(|p| p.hp), Some(max_hp - max_hp / 8));
        assert!(scene.events.messages().contains(&"Snorlax is hurt\nby the spikes!"));
    }

    #[test]
    fn test_sandstorm_spares_rock_types() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50).with_moves(vec![Move::Splash]).build();
        let enemy = TestPokemonBuilder::new(Species::Geodude, 50).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let player_id = expect_command(&mut scene);
        assert!(scene.try_set_weather(Some(WeatherType::Sandstorm)));
        let player_max = scene.party[0].max_hp();
        let enemy_max = scene.enemy_party[0].max_hp();

        // Act
        scene.submit_command(player_id, fight(0)).unwrap();
        expect_command(&mut scene);

        // Assert
        assert_eq!(scene.party[0].hp, player_max - player_max / 16);
        assert_eq!(scene.enemy_party[0].hp, enemy_max);
        assert!(scene.events.messages().contains(&"Snorlax is buffeted by the sandstorm!"));
    }

    #[test]
    fn test_poison_hurts_an_eighth_at_turn_end() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50)
            .with_moves(vec![Move::Splash])
            .with_status(StatusEffect::Poison)
            .build();
        let enemy = TestPokemonBuilder::new(Species::Geodude, 50).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let player_id = expect_command(&mut scene);
        let max_hp = scene.party[0].max_hp();

        // Act
        scene.submit_command(player_id, fight(0)).unwrap();
        expect_command(&mut scene);

        // Assert
        assert_eq!(scene.party[0].hp, max_hp - max_hp / 8);
        assert!(scene.events.messages().contains(&"Snorlax is hurt\nby poison!"));
    }
}
