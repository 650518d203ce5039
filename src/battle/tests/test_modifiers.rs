#[cfg(test)]
mod tests {
    use crate::battle::encounter::TurnCommand;
    use crate::battle::scene::{BattleScene, RunState};
    use crate::battle::tests::common::{create_test_battle, create_test_scene, run_with_first_moves, TestPokemonBuilder};
    use crate::modifiers::{
        BerryType, GlobalItem, HeldItem, Modifier, PersistentModifier, LURE_BATTLES,
    };
    use pretty_assertions::assert_eq;
    use schema::{Move, Species};

    fn next_turn(scene: &mut BattleScene) {
        let RunState::AwaitingCommand(pokemon_id) = scene.run() else {
            panic!("expected a command request");
        };
        scene
            .submit_command(
                pokemon_id,
                TurnCommand::Fight {
                    move_index: 0,
                    target: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn test_held_item_stack_caps_at_three() {
        // Arrange
        let mut scene = create_test_scene();
        let ally = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).build(), true);
        let foe = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).build(), false);

        // Act
        let ally_adds: Vec<bool> = (0..4).map(|_| scene.add_held_item(ally, HeldItem::KingsRock, 1)).collect();
        let foe_adds: Vec<bool> = (0..4).map(|_| scene.add_held_item(foe, HeldItem::KingsRock, 1)).collect();

        // Assert
        assert_eq!(ally_adds, vec![true, true, true, false]);
        assert_eq!(foe_adds, vec![true, true, true, false]);
        assert_eq!(scene.find_held_item(ally, HeldItem::KingsRock).map(|m| m.stack_count), Some(3));
        assert_eq!(scene.find_held_item(foe, HeldItem::KingsRock).map(|m| m.stack_count), Some(3));
    }

    #[test]
    fn test_leftovers_heal_at_turn_end() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50)
            .with_moves(vec![Move::Splash])
            .with_hp(100)
            .build();
        let enemy = TestPokemonBuilder::new(Species::Geodude, 50).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let player_id = scene.party[0].id;
        assert!(scene.add_held_item(player_id, HeldItem::Leftovers, 1));
        let max_hp = scene.party[0].max_hp();

        // Act
        next_turn(&mut scene);
        scene.run();

        // Assert
        assert_eq!(scene.party[0].hp, 100 + max_hp / 16);
        assert!(scene
            .events
            .messages()
            .contains(&"Snorlax restored a little HP using\nits Leftovers!"));
    }

    #[test]
    fn test_amulet_coin_raises_the_reward() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50).build();
        let enemy = TestPokemonBuilder::new(Species::Pikachu, 5).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let id = scene.next_modifier_id();
        assert!(scene.add_modifier(Modifier::Persistent(PersistentModifier::global(
            id,
            GlobalItem::AmuletCoin
        ))));

        // Act
        run_with_first_moves(&mut scene, 5);

        // Assert: 180 * 1.2, credited at ten times its value.
        assert_eq!(scene.money, 1_000 + 2_160);
        assert!(scene.game_data.achv_unlocks.contains_key("AMULET_COIN"));
    }

    #[test]
    fn test_enemy_items_become_loot_and_are_cleared() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Snorlax, 50).build();
        let enemy = TestPokemonBuilder::new(Species::Pikachu, 5).with_moves(vec![Move::Splash]).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let enemy_id = scene.enemy_party[0].id;
        assert!(scene.add_held_item(enemy_id, HeldItem::Berry(BerryType::Sitrus), 2));

        // Act
        run_with_first_moves(&mut scene, 5);

        // Assert
        assert!(scene.enemy_modifiers.is_empty());
        assert_eq!(
            scene.battle.post_battle_loot,
            vec![HeldItem::Berry(BerryType::Sitrus), HeldItem::Berry(BerryType::Sitrus)]
        );
    }

    #[test]
    fn test_lure_wears_off_after_its_battles() {
        let mut scene = create_test_scene();
        let id = scene.next_modifier_id();
        assert!(scene.add_modifier(Modifier::Persistent(PersistentModifier::global(id, GlobalItem::Lure))));
        let initial = scene.modifiers[0].stack_count;
        assert_eq!(initial, LURE_BATTLES);

        for _ in 0..initial {
            scene.lapse_battle_modifiers();
        }

        assert!(scene.modifiers.is_empty());
    }
}
