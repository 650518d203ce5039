#[cfg(test)]
mod tests {
    use crate::abilities::{
        apply_post_attack_ab_attrs, apply_post_defend_ab_attrs, apply_pre_defend_ab_attrs,
        apply_pre_set_status_ab_attrs, PreDefendArgs,
    };
    use crate::battle::phase::{Phase, PhaseKind};
    use crate::battle::scene::{BattleScene, RunState};
    use crate::battle::tests::common::{create_test_battle, create_test_scene, TestPokemonBuilder};
    use crate::config::BattleConfig;
    use crate::battle::state::BattleSnapshot;
    use crate::modifiers::{HeldItem, PersistentModifier};
    use crate::pokemon::CombatantId;
    use schema::{
        AbilityId, BattlerTagType, Move, PokemonType, Species, StatType, StatusEffect,
        WeatherType,
    };
    use pretty_assertions::assert_eq;

    /// Hit a Static holder `hits` times with a contact move and count how
    /// often the attacker ends up paralyzed.
    fn static_paralysis_count(seed: &str, hits: usize) -> usize {
        let mut scene = BattleScene::new(BattleConfig::default().with_seed(seed));
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Pikachu, 50)
                .with_ability(AbilityId::Static)
                .on_field()
                .build(),
            true,
        );
        let attacker = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), false);

        let mut paralyzed = 0;
        for _ in 0..hits {
            apply_post_defend_ab_attrs(&mut scene, holder, attacker, Move::Tackle, false);
            if let Some(pokemon) = scene.get_pokemon_by_id_mut(attacker) {
                if pokemon.status.is_some_and(|s| s.effect == StatusEffect::Paralysis) {
                    paralyzed += 1;
                }
                pokemon.status = None;
            }
            scene.phases.reset();
        }
        paralyzed
    }

    #[test]
    fn test_static_paralyzes_about_thirty_percent_of_contact_hits() {
        // Act
        let first = static_paralysis_count("static-scenario", 1_000);
        let second = static_paralysis_count("static-scenario", 1_000);

        // Assert: the count is pinned by the seed and near 300.
        assert_eq!(first, second);
        assert_eq!(first, 308);
        assert!((240..=360).contains(&first), "paralyzed {} of 1000", first);
    }

    #[test]
    fn test_static_ignores_non_contact_moves() {
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Pikachu, 50)
                .with_ability(AbilityId::Static)
                .on_field()
                .build(),
            true,
        );
        let attacker = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), false);
        let counter = scene.rng.counter();

        for _ in 0..50 {
            let report = apply_post_defend_ab_attrs(&mut scene, holder, attacker, Move::HyperVoice, false);
            assert!(!report.applied);
        }

        assert_eq!(scene.rng.counter(), counter);
        assert!(scene.get_pokemon_by_id(attacker).is_some_and(|p| p.status.is_none()));
    }

    #[test]
    fn test_simulated_dispatch_changes_nothing() {
        // Arrange
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Lapras, 50)
                .with_ability(AbilityId::OwnTempo)
                .on_field()
                .build(),
            true,
        );
        let before = scene.snapshot();
        let events_before = scene.events.len();

        // Act
        let allowed = scene.can_add_tag(holder, BattlerTagType::Confused);

        // Assert
        assert!(!allowed);
        assert_eq!(scene.snapshot(), before);
        assert_eq!(scene.events.len(), events_before);
        assert!(scene
            .get_pokemon_by_id(holder)
            .is_some_and(|p| p.battle_data.abilities_applied.is_empty()));

        // The real dispatch reaches the same verdict and shows the banner.
        assert!(!scene.add_tag(holder, BattlerTagType::Confused, 3, None));
        let pending: Vec<PhaseKind> = scene.phases.pending_phases().into_iter().map(Phase::kind).collect();
        assert!(pending.contains(&PhaseKind::ShowAbility));
        assert!(scene
            .get_pokemon_by_id(holder)
            .is_some_and(|p| p.battle_data.abilities_applied.contains(&AbilityId::OwnTempo)));
    }

    /// Everything a dispatch is allowed to touch.
    #[derive(Debug, PartialEq)]
    struct DispatchState {
        snapshot: BattleSnapshot,
        modifiers: Vec<PersistentModifier>,
        enemy_modifiers: Vec<PersistentModifier>,
        pending: usize,
        abilities_applied: Vec<AbilityId>,
    }

    fn dispatch_state(scene: &BattleScene, holder: CombatantId) -> DispatchState {
        DispatchState {
            snapshot: scene.snapshot(),
            modifiers: scene.modifiers.clone(),
            enemy_modifiers: scene.enemy_modifiers.clone(),
            pending: scene.phases.len(),
            abilities_applied: scene
                .get_pokemon_by_id(holder)
                .map(|p| p.battle_data.abilities_applied.clone())
                .unwrap_or_default(),
        }
    }

    #[test]
    fn test_simulated_volt_absorb_matches_real_verdict_without_healing() {
        // Arrange
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Pikachu, 50)
                .with_ability(AbilityId::VoltAbsorb)
                .with_hp(10)
                .on_field()
                .build(),
            true,
        );
        let attacker = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), false);
        let before = dispatch_state(&scene, holder);

        // Act
        let mut simulated_args = PreDefendArgs::default();
        let simulated = apply_pre_defend_ab_attrs(
            &mut scene,
            holder,
            attacker,
            Move::Thunderbolt,
            PokemonType::Electric,
            &mut simulated_args,
            true,
        );

        // Assert
        assert_eq!(dispatch_state(&scene, holder), before);

        let mut real_args = PreDefendArgs::default();
        let real = apply_pre_defend_ab_attrs(
            &mut scene,
            holder,
            attacker,
            Move::Thunderbolt,
            PokemonType::Electric,
            &mut real_args,
            false,
        );
        assert!(simulated.applied);
        assert_eq!(simulated.applied, real.applied);
        assert!(simulated_args.cancelled);
        assert_eq!(simulated_args.cancelled, real_args.cancelled);
        let after = dispatch_state(&scene, holder);
        assert!(after.pending > before.pending);
        assert!(after.abilities_applied.contains(&AbilityId::VoltAbsorb));
    }

    #[test]
    fn test_simulated_rough_skin_leaves_the_attacker_unhurt() {
        // Arrange
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Snorlax, 50)
                .with_ability(AbilityId::RoughSkin)
                .on_field()
                .build(),
            true,
        );
        let attacker = scene.add_to_party(TestPokemonBuilder::new(Species::Machop, 50).on_field().build(), false);
        let attacker_hp = scene.get_pokemon_by_id(attacker).map(|p| p.hp);
        let before = dispatch_state(&scene, holder);

        // Act
        let simulated = apply_post_defend_ab_attrs(&mut scene, holder, attacker, Move::Tackle, true);

        // Assert
        assert_eq!(dispatch_state(&scene, holder), before);
        assert_eq!(scene.get_pokemon_by_id(attacker).map(|p| p.hp), attacker_hp);

        let real = apply_post_defend_ab_attrs(&mut scene, holder, attacker, Move::Tackle, false);
        assert!(simulated.applied);
        assert_eq!(simulated.applied, real.applied);
        assert_ne!(dispatch_state(&scene, holder), before);
        assert!(scene
            .get_pokemon_by_id(holder)
            .is_some_and(|p| p.battle_data.abilities_applied.contains(&AbilityId::RoughSkin)));
    }

    #[test]
    fn test_simulated_magician_keeps_the_item_where_it_is() {
        // Arrange
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Pikachu, 50)
                .with_ability(AbilityId::Magician)
                .on_field()
                .build(),
            true,
        );
        let defender = scene.add_to_party(TestPokemonBuilder::new(Species::Snorlax, 50).on_field().build(), false);
        assert!(scene.add_held_item(defender, HeldItem::Leftovers, 1));
        let before = dispatch_state(&scene, holder);

        // Act
        let simulated = apply_post_attack_ab_attrs(&mut scene, holder, defender, Move::Tackle, 30, true);

        // Assert
        assert_eq!(dispatch_state(&scene, holder), before);
        assert!(scene.find_held_item(defender, HeldItem::Leftovers).is_some());
        assert!(scene.find_held_item(holder, HeldItem::Leftovers).is_none());

        let real = apply_post_attack_ab_attrs(&mut scene, holder, defender, Move::Tackle, 30, false);
        assert!(simulated.applied);
        assert_eq!(simulated.applied, real.applied);
        assert!(scene.find_held_item(holder, HeldItem::Leftovers).is_some());
        assert!(scene.find_held_item(defender, HeldItem::Leftovers).is_none());
        assert_ne!(scene.modifiers, before.modifiers);
        assert_ne!(scene.enemy_modifiers, before.enemy_modifiers);
    }

    #[test]
    fn test_simulated_report_carries_trigger_message() {
        let mut scene = create_test_scene();
        let holder = scene.add_to_party(
            TestPokemonBuilder::new(Species::Machop, 50)
                .with_ability(AbilityId::Limber)
                .on_field()
                .build(),
            true,
        );

        let mut cancelled = false;
        let report =
            apply_pre_set_status_ab_attrs(&mut scene, holder, StatusEffect::Paralysis, &mut cancelled, true);

        assert!(report.applied);
        assert!(cancelled);
        assert_eq!(report.messages.len(), 1);
        assert!(scene.phases.is_empty());
    }

    #[test]
    fn test_drizzle_sets_rain_on_entry() {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Gyarados, 50)
            .with_ability(AbilityId::Drizzle)
            .build();
        let enemy = TestPokemonBuilder::new(Species::Snorlax, 50).build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);

        // Act
        let state = scene.run();

        // Assert
        assert!(matches!(state, RunState::AwaitingCommand(_)));
        assert_eq!(scene.arena.weather_type(), Some(WeatherType::Rain));
    }

    #[rstest::rstest]
    #[case(AbilityId::None, -1)]
    #[case(AbilityId::OwnTempo, 0)]
    #[case(AbilityId::HyperCutter, 0)]
    fn test_intimidate_on_entry(#[case] defender_ability: AbilityId, #[case] expected_stage: i8) {
        // Arrange
        let player = TestPokemonBuilder::new(Species::Machop, 50)
            .with_ability(defender_ability)
            .build();
        let enemy = TestPokemonBuilder::new(Species::Gyarados, 50)
            .with_ability(AbilityId::Intimidate)
            .build();
        let mut scene = create_test_battle(vec![player], vec![enemy]);
        let player_id = scene.party[0].id;

        // Act
        scene.run();

        // Assert
        let stage = scene
            .get_pokemon_by_id(player_id)
            .map(|p| p.get_stat_stage(StatType::Atk))
            .unwrap_or(99);
        assert_eq!(stage, expected_stage);
    }
}
