#[cfg(test)]
mod tests {
    use crate::battle::phase::{Phase, PhaseKind};
    use crate::battle::phase_queue::{Advance, PhaseQueue};
    use pretty_assertions::assert_eq;

    /// Advance `count` times and return what became current each time.
    fn take(queue: &mut PhaseQueue<u32>, count: usize) -> Vec<String> {
        (0..count)
            .map(|_| {
                queue.advance();
                describe(queue.current_phase())
            })
            .collect()
    }

    fn describe(phase: Option<&Phase>) -> String {
        match phase {
            Some(Phase::Message { text }) => text.clone(),
            Some(other) => other.kind().to_string(),
            None => "none".to_string(),
        }
    }

    #[test]
    fn test_unshift_runs_before_pushed_phases() {
        // Arrange
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("A"), false);
        queue.push_phase(Phase::message("B"), false);

        // Act
        queue.unshift_phase(Phase::message("C"));

        // Assert
        assert_eq!(take(&mut queue, 3), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_successive_unshifts_keep_call_order() {
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("queued"), false);

        queue.unshift_phase(Phase::message("first"));
        queue.unshift_phase(Phase::message("second"));
        queue.unshift_phase(Phase::message("third"));

        assert_eq!(take(&mut queue, 4), vec!["first", "second", "third", "queued"]);
    }

    #[test]
    fn test_empty_queue_refills_with_deferred_then_turn_init() {
        // Arrange
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("next turn"), true);
        queue.push_phase(Phase::message("now"), false);

        // Act
        let order = take(&mut queue, 3);

        // Assert
        assert_eq!(order, vec!["now", "next turn", "TurnInit"]);
        assert_eq!(queue.deferred_phases().count(), 0);
    }

    #[test]
    fn test_override_sets_current_aside_until_next_shift() {
        // Arrange
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("A"), false);
        queue.push_phase(Phase::message("B"), false);
        queue.advance();

        // Act
        assert!(queue.override_phase(Phase::message("urgent")));

        // Assert
        assert_eq!(describe(queue.current_phase()), "urgent");
        assert_eq!(describe(queue.standby_phase()), "A");
        assert!(!queue.override_phase(Phase::message("refused")));

        assert_eq!(queue.advance(), Advance::RestoredStandby);
        assert_eq!(describe(queue.current_phase()), "A");
        assert!(queue.standby_phase().is_none());
        assert_eq!(queue.advance(), Advance::Next);
        assert_eq!(describe(queue.current_phase()), "B");
    }

    #[test]
    fn test_clear_keeps_unshifted_phases() {
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("A"), false);
        queue.push_phase(Phase::message("B"), false);
        queue.unshift_phase(Phase::message("C"));

        queue.clear_phase_queue();

        assert_eq!(take(&mut queue, 2), vec!["C", "TurnInit"]);
    }

    #[test]
    fn test_conditional_phase_waits_for_its_predicate() {
        // Arrange
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        for text in ["A", "B", "C"] {
            queue.push_phase(Phase::message(text), false);
        }
        queue.push_conditional_phase(Phase::message("late"), |ready: &u32| *ready > 0);

        // Act: not ready on the first shift, ready on the second.
        queue.shift_phase(&0);
        assert_eq!(queue.conditional_len(), 1);
        queue.shift_phase(&1);

        // Assert
        assert_eq!(queue.conditional_len(), 0);
        assert_eq!(describe(queue.current_phase()), "B");
        assert_eq!(take(&mut queue, 2), vec!["C", "late"]);
    }

    #[test]
    fn test_splice_anchor_puts_banner_ahead_of_the_effect() {
        // Arrange: something is already unshifted before the ability runs.
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("queued"), false);
        queue.unshift_phase(Phase::message("earlier"));

        // Act
        queue.set_phase_queue_splice();
        queue.unshift_phase(Phase::message("effect 1"));
        queue.unshift_phase(Phase::message("effect 2"));
        queue.unshift_at_splice_anchor(Phase::message("banner"));
        queue.clear_phase_queue_splice();
        queue.unshift_phase(Phase::message("after"));

        // Assert
        assert_eq!(
            take(&mut queue, 6),
            vec!["earlier", "banner", "effect 1", "effect 2", "after", "queued"]
        );
    }

    #[test]
    fn test_find_phase_only_sees_the_main_queue() {
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::TurnEnd, false);
        queue.unshift_phase(Phase::WeatherEffect);

        assert!(queue.find_phase(|p| p.kind() == PhaseKind::TurnEnd).is_some());
        assert!(queue.find_phase(|p| p.kind() == PhaseKind::WeatherEffect).is_none());
        let pending: Vec<PhaseKind> = queue.pending_phases().into_iter().map(Phase::kind).collect();
        assert_eq!(pending, vec![PhaseKind::WeatherEffect, PhaseKind::TurnEnd]);
    }

    #[test]
    fn test_prepend_and_append_to_phase() {
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("A"), false);
        queue.push_phase(Phase::TurnEnd, false);

        assert!(queue.prepend_to_phase(Phase::message("before end"), PhaseKind::TurnEnd));
        assert!(queue.append_to_phase(Phase::message("after end"), PhaseKind::TurnEnd));
        assert!(!queue.prepend_to_phase(Phase::message("fallback"), PhaseKind::Victory));

        assert_eq!(
            take(&mut queue, 5),
            vec!["fallback", "A", "before end", "TurnEnd", "after end"]
        );
    }

    #[test]
    fn test_replace_and_remove_touch_only_the_first_match() {
        // Arrange
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        for text in ["A", "B", "A"] {
            queue.push_phase(Phase::message(text), false);
        }
        let is_a = |p: &Phase| matches!(p, Phase::Message { text } if text == "A");

        // Act
        assert!(queue.try_replace_phase(is_a, Phase::message("replaced")));
        assert!(queue.try_remove_phase(is_a));
        assert!(!queue.try_remove_phase(is_a));
        assert!(!queue.try_replace_phase(is_a, Phase::message("nothing")));

        // Assert
        assert_eq!(take(&mut queue, 3), vec!["replaced", "B", "TurnInit"]);
    }

    #[test]
    fn test_remove_unshifted_keeps_the_splice_cursor_in_place() {
        // Arrange
        let mut queue: PhaseQueue<u32> = PhaseQueue::new();
        queue.push_phase(Phase::message("queued"), false);
        queue.set_phase_queue_splice();
        queue.unshift_phase(Phase::message("x"));
        queue.unshift_phase(Phase::message("y"));

        // Act
        let is_x = |p: &Phase| matches!(p, Phase::Message { text } if text == "x");
        assert!(queue.try_remove_unshifted_phase(is_x));
        assert!(!queue.try_remove_unshifted_phase(is_x));
        queue.unshift_phase(Phase::message("z"));
        queue.clear_phase_queue_splice();

        // Assert
        assert_eq!(take(&mut queue, 3), vec!["y", "z", "queued"]);
    }
}
