use std::collections::HashMap;

use crate::JobKey;

/// A user action with its own busy guard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionTarget {
    Discovery(JobKey),
    Renovate { job: JobKey, project: String },
}

/// How a mutating request resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Accepted,
    /// Non-2xx response; `message` is whatever the server explained.
    Rejected { message: String },
    /// The request never produced a response.
    TransportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Succeeded,
    Failed,
    Errored,
}

impl From<&ActionOutcome> for Settlement {
    fn from(outcome: &ActionOutcome) -> Self {
        match outcome {
            ActionOutcome::Accepted => Settlement::Succeeded,
            ActionOutcome::Rejected { .. } => Settlement::Failed,
            ActionOutcome::TransportError { .. } => Settlement::Errored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionPhase {
    #[default]
    Idle,
    Busy,
    /// Result flash shown until the reset timer fires.
    Settled(Settlement),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    phase: ActionPhase,
    generation: u64,
}

/// Busy guards and result flashes for every in-progress action.
///
/// Idle targets have no slot. Each `begin` bumps the slot's generation so a
/// reset scheduled by an earlier settle cannot clear a newer attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionController {
    slots: HashMap<ActionTarget, Slot>,
    next_generation: u64,
}

impl ActionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self, target: &ActionTarget) -> ActionPhase {
        self.slots
            .get(target)
            .map(|slot| slot.phase)
            .unwrap_or_default()
    }

    pub fn is_busy(&self, target: &ActionTarget) -> bool {
        self.phase(target) == ActionPhase::Busy
    }

    /// Moves the target to `Busy`. Returns false, changing nothing, when a
    /// request for it is already in flight.
    pub fn begin(&mut self, target: ActionTarget) -> bool {
        if self.is_busy(&target) {
            return false;
        }
        self.next_generation += 1;
        self.slots.insert(
            target,
            Slot {
                phase: ActionPhase::Busy,
                generation: self.next_generation,
            },
        );
        true
    }

    /// Records the outcome of the in-flight request and returns the
    /// generation the reset timer must carry. `None` if nothing was in flight.
    pub fn settle(&mut self, target: &ActionTarget, outcome: &ActionOutcome) -> Option<u64> {
        let slot = self.slots.get_mut(target)?;
        if slot.phase != ActionPhase::Busy {
            return None;
        }
        slot.phase = ActionPhase::Settled(Settlement::from(outcome));
        Some(slot.generation)
    }

    /// Returns the target to idle if `generation` still names its latest
    /// attempt and that attempt has settled.
    pub fn reset(&mut self, target: &ActionTarget, generation: u64) -> bool {
        match self.slots.get(target) {
            Some(slot)
                if slot.generation == generation
                    && matches!(slot.phase, ActionPhase::Settled(_)) =>
            {
                self.slots.remove(target);
                true
            }
            _ => false,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| slot.phase == ActionPhase::Busy)
            .count()
    }
}
