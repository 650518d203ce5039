use crate::battle::phase::{Phase, PhaseKind};
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Predicate gating a conditional phase, evaluated against the context `C`.
pub type PhaseCondition<C> = Box<dyn Fn(&C) -> bool>;

pub struct ConditionalPhase<C> {
    pub phase: Phase,
    condition: PhaseCondition<C>,
}

impl<C> ConditionalPhase<C> {
    pub fn is_ready(&self, context: &C) -> bool {
        (self.condition)(context)
    }
}

impl<C> fmt::Debug for ConditionalPhase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalPhase")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Result of advancing the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A phase that had been set aside by an override is current again.
    RestoredStandby,
    /// A new phase was taken from the queue and is now current.
    Next,
}

/// Insertion window opened around an ability effect. Unshifts made while the
/// window is open land at `cursor` in call order; an ability banner lands at
/// `anchor`, ahead of everything the effect queued.
#[derive(Debug, Clone, Copy)]
struct SpliceScope {
    anchor: usize,
    cursor: usize,
}

/// The battle's phase scheduler.
///
/// Holds the main queue, a prepend list for phases that must run before
/// anything already queued, a deferred queue that seeds the next turn,
/// conditional phases, and the current and standby phases.
pub struct PhaseQueue<C> {
    phase_queue: VecDeque<Phase>,
    prepend: Vec<Phase>,
    splice: Vec<SpliceScope>,
    next_command_queue: VecDeque<Phase>,
    conditional_queue: VecDeque<ConditionalPhase<C>>,
    current: Option<Phase>,
    standby: Option<Phase>,
}

impl<C> Default for PhaseQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for PhaseQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseQueue")
            .field("current", &self.current)
            .field("standby", &self.standby)
            .field("prepend", &self.prepend)
            .field("phase_queue", &self.phase_queue)
            .field("next_command_queue", &self.next_command_queue)
            .field("conditional_queue", &self.conditional_queue)
            .finish()
    }
}

impl<C> PhaseQueue<C> {
    pub fn new() -> Self {
        Self {
            phase_queue: VecDeque::new(),
            prepend: Vec::new(),
            splice: Vec::new(),
            next_command_queue: VecDeque::new(),
            conditional_queue: VecDeque::new(),
            current: None,
            standby: None,
        }
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.current.as_ref()
    }

    pub fn standby_phase(&self) -> Option<&Phase> {
        self.standby.as_ref()
    }

    /// Phases waiting to run, in the order they will run this turn.
    pub fn pending_phases(&self) -> Vec<&Phase> {
        self.prepend.iter().chain(self.phase_queue.iter()).collect()
    }

    pub fn deferred_phases(&self) -> impl Iterator<Item = &Phase> {
        self.next_command_queue.iter()
    }

    pub fn len(&self) -> usize {
        self.prepend.len() + self.phase_queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prepend.is_empty() && self.phase_queue.is_empty()
    }

    /// Append to the main queue, or to the next-turn queue when `defer` is set.
    pub fn push_phase(&mut self, phase: Phase, defer: bool) {
        trace!(kind = %phase.kind(), defer, "push phase");
        if defer {
            self.next_command_queue.push_back(phase);
        } else {
            self.phase_queue.push_back(phase);
        }
    }

    /// Schedule `phase` ahead of everything in the main queue. Successive
    /// unshifts run in the order they were made.
    pub fn unshift_phase(&mut self, phase: Phase) {
        trace!(kind = %phase.kind(), "unshift phase");
        match self.splice.last() {
            Some(scope) => {
                let at = scope.cursor.min(self.prepend.len());
                self.insert_prepend(at, phase);
            }
            None => self.prepend.push(phase),
        }
    }

    /// Insert at the anchor of the innermost splice window. Without an open
    /// window this is a plain unshift.
    pub fn unshift_at_splice_anchor(&mut self, phase: Phase) {
        match self.splice.last() {
            Some(scope) => {
                let at = scope.anchor.min(self.prepend.len());
                self.insert_prepend(at, phase);
            }
            None => self.prepend.push(phase),
        }
    }

    fn insert_prepend(&mut self, at: usize, phase: Phase) {
        self.prepend.insert(at, phase);
        for scope in self.splice.iter_mut() {
            if scope.cursor >= at {
                scope.cursor += 1;
            }
            if scope.anchor > at {
                scope.anchor += 1;
            }
        }
    }

    /// Open a splice window at the current insertion point. Windows nest;
    /// each one must be closed with [`clear_phase_queue_splice`].
    ///
    /// [`clear_phase_queue_splice`]: PhaseQueue::clear_phase_queue_splice
    pub fn set_phase_queue_splice(&mut self) {
        let at = self
            .splice
            .last()
            .map(|scope| scope.cursor)
            .unwrap_or(self.prepend.len());
        self.splice.push(SpliceScope {
            anchor: at,
            cursor: at,
        });
    }

    pub fn clear_phase_queue_splice(&mut self) {
        self.splice.pop();
    }

    pub fn push_conditional_phase(
        &mut self,
        phase: Phase,
        condition: impl Fn(&C) -> bool + 'static,
    ) {
        self.conditional_queue.push_back(ConditionalPhase {
            phase,
            condition: Box::new(condition),
        });
    }

    pub fn conditional_len(&self) -> usize {
        self.conditional_queue.len()
    }

    /// Empty the main queue. Prepended and deferred phases are kept.
    pub fn clear_phase_queue(&mut self) {
        self.phase_queue.clear();
    }

    /// Drop every queued phase of every kind, including current and standby.
    pub fn reset(&mut self) {
        self.phase_queue.clear();
        self.prepend.clear();
        self.splice.clear();
        self.next_command_queue.clear();
        self.conditional_queue.clear();
        self.current = None;
        self.standby = None;
    }

    /// Make `phase` current immediately, setting the current phase aside.
    /// Refused while another override is already standing by.
    pub fn override_phase(&mut self, phase: Phase) -> bool {
        if self.standby.is_some() {
            return false;
        }
        trace!(kind = %phase.kind(), "override phase");
        self.standby = self.current.take();
        self.current = Some(phase);
        true
    }

    /// Move to the next phase without evaluating conditionals.
    ///
    /// A standby phase is restored first. Otherwise prepended phases move to
    /// the front of the main queue, an empty main queue is refilled with the
    /// deferred phases followed by a turn-init phase, and the front is popped.
    pub fn advance(&mut self) -> Advance {
        if let Some(standby) = self.standby.take() {
            self.current = Some(standby);
            return Advance::RestoredStandby;
        }

        self.splice.clear();
        while let Some(phase) = self.prepend.pop() {
            self.phase_queue.push_front(phase);
        }

        if self.phase_queue.is_empty() {
            self.populate_phase_queue();
        }

        self.current = self.phase_queue.pop_front();
        Advance::Next
    }

    fn populate_phase_queue(&mut self) {
        self.phase_queue.extend(self.next_command_queue.drain(..));
        self.phase_queue.push_back(Phase::TurnInit);
        self.conditional_queue.clear();
    }

    pub fn take_conditional(&mut self) -> Option<ConditionalPhase<C>> {
        self.conditional_queue.pop_front()
    }

    pub fn requeue_conditional(&mut self, entry: ConditionalPhase<C>) {
        self.conditional_queue.push_front(entry);
    }

    /// Promote the front conditional phase to the main queue if its predicate
    /// holds against `context`; otherwise it stays at the front.
    pub fn check_conditional(&mut self, context: &C) {
        if let Some(entry) = self.take_conditional() {
            if entry.is_ready(context) {
                self.push_phase(entry.phase, false);
            } else {
                self.requeue_conditional(entry);
            }
        }
    }

    /// [`advance`](PhaseQueue::advance) followed by one conditional check.
    pub fn shift_phase(&mut self, context: &C) -> Advance {
        let advance = self.advance();
        if advance == Advance::Next {
            self.check_conditional(context);
        }
        advance
    }

    pub fn find_phase(&self, predicate: impl Fn(&Phase) -> bool) -> Option<&Phase> {
        self.phase_queue.iter().find(|phase| predicate(phase))
    }

    pub fn try_replace_phase(&mut self, predicate: impl Fn(&Phase) -> bool, phase: Phase) -> bool {
        match self.phase_queue.iter().position(|p| predicate(p)) {
            Some(index) => {
                self.phase_queue[index] = phase;
                true
            }
            None => false,
        }
    }

    pub fn try_remove_phase(&mut self, predicate: impl Fn(&Phase) -> bool) -> bool {
        match self.phase_queue.iter().position(|p| predicate(p)) {
            Some(index) => self.phase_queue.remove(index).is_some(),
            None => false,
        }
    }

    pub fn try_remove_unshifted_phase(&mut self, predicate: impl Fn(&Phase) -> bool) -> bool {
        match self.prepend.iter().position(|p| predicate(p)) {
            Some(index) => {
                self.prepend.remove(index);
                for scope in self.splice.iter_mut() {
                    if scope.cursor > index {
                        scope.cursor -= 1;
                    }
                    if scope.anchor > index {
                        scope.anchor -= 1;
                    }
                }
                true
            }
            None => false,
        }
    }

    /// Insert `phase` just before the first queued phase of kind `target`.
    /// Falls back to an unshift and returns false when there is none.
    pub fn prepend_to_phase(&mut self, phase: Phase, target: PhaseKind) -> bool {
        match self.phase_queue.iter().position(|p| p.kind() == target) {
            Some(index) => {
                self.phase_queue.insert(index, phase);
                true
            }
            None => {
                self.unshift_phase(phase);
                false
            }
        }
    }

    /// Insert `phase` just after the first queued phase of kind `target`.
    /// Falls back to an unshift and returns false when there is none.
    pub fn append_to_phase(&mut self, phase: Phase, target: PhaseKind) -> bool {
        match self.phase_queue.iter().position(|p| p.kind() == target) {
            Some(index) => {
                self.phase_queue.insert(index + 1, phase);
                true
            }
            None => {
                self.unshift_phase(phase);
                false
            }
        }
    }
}
