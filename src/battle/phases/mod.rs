//! What each phase does when the scheduler starts it.

mod effects;
mod field;
mod move_phase;
mod turn;

use crate::battle::phase::{Phase, PhaseStatus};
use crate::battle::scene::BattleScene;

impl Phase {
    /// Run this phase against the scene. Most phases finish synchronously;
    /// a player command phase waits for input.
    pub fn start(&self, scene: &mut BattleScene) -> PhaseStatus {
        match self {
            Phase::Encounter => turn::encounter(scene),
            Phase::TurnInit => turn::turn_init(scene),
            Phase::Command { pokemon_id } => return turn::command(scene, *pokemon_id),
            Phase::EnemyCommand { pokemon_id } => turn::enemy_command(scene, *pokemon_id),
            Phase::TurnStart => turn::turn_start(scene),
            Phase::AttemptRun { pokemon_id } => turn::attempt_run(scene, *pokemon_id),
            Phase::Move {
                pokemon_id,
                move_id,
                move_index,
                targets,
            } => move_phase::use_move(scene, *pokemon_id, *move_id, *move_index, targets),
            Phase::MoveEffect {
                pokemon_id,
                move_id,
                targets,
            } => move_phase::move_effect(scene, *pokemon_id, *move_id, targets),
            Phase::MoveEnd {
                pokemon_id,
                move_id,
                targets,
                follow_up,
            } => move_phase::move_end(scene, *pokemon_id, *move_id, targets, *follow_up),
            Phase::Message { text } => effects::message(scene, text),
            Phase::ShowAbility {
                pokemon_id,
                passive,
            } => scene.reveal_ability(*pokemon_id, *passive),
            Phase::StatStageChange {
                pokemon_id,
                self_induced,
                stats,
                stages,
            } => effects::stat_stage_change(scene, *pokemon_id, *self_induced, stats, *stages),
            Phase::PokemonHeal {
                pokemon_id,
                amount,
                message,
                show_full_hp_message,
            } => effects::pokemon_heal(
                scene,
                *pokemon_id,
                *amount,
                message.as_deref(),
                *show_full_hp_message,
            ),
            Phase::ObtainStatusEffect {
                pokemon_id,
                effect,
                source_id,
            } => effects::obtain_status_effect(scene, *pokemon_id, *effect, *source_id),
            Phase::Summon { pokemon_id } => field::summon(scene, *pokemon_id),
            Phase::PostSummon { pokemon_id } => field::post_summon(scene, *pokemon_id),
            Phase::SwitchSummon {
                switch_out_id,
                switch_in_id,
            } => field::switch_summon(scene, *switch_out_id, *switch_in_id),
            Phase::WeatherEffect => turn::weather_effect(scene),
            Phase::TurnEnd => turn::turn_end(scene),
            Phase::Faint {
                pokemon_id,
                source_id,
                move_id,
            } => field::faint(scene, *pokemon_id, *source_id, *move_id),
            Phase::FormChange {
                pokemon_id,
                form_index,
                ..
            } => effects::form_change(scene, *pokemon_id, *form_index),
            Phase::PokemonAnim { pokemon_id, anim } => {
                scene.events.push(crate::battle::state::BattleEvent::AnimationRequested {
                    pokemon_id: *pokemon_id,
                    anim: *anim,
                })
            }
            Phase::Victory => field::victory(scene),
            Phase::GameOver => field::game_over(scene),
            Phase::BattleEnd { player_won } => field::battle_end(scene, *player_won),
        }
        PhaseStatus::Ended
    }
}
