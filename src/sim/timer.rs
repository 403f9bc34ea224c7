//! Fire-once deferred events on the simulation clock
//!
//! Each timer carries the session generation it was scheduled in. A timer that comes due
//! after the session was restarted or abandoned is dropped instead of fired.

use serde::{Deserialize, Serialize};

/// Work deferred by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Next card after a decision popup closed
    SpawnCard,
    /// One bill of a monthly revenue wave
    RevenueBill { index: u32, value: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Timer {
    due_ms: f64,
    generation: u64,
    event: ScheduledEvent,
}

/// Timers ordered by due time; ties fire in scheduling order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, generation: u64, event: ScheduledEvent) {
        let due_ms = now_ms + delay_ms.max(0.0);
        let at = self.timers.partition_point(|t| t.due_ms <= due_ms);
        self.timers.insert(
            at,
            Timer {
                due_ms,
                generation,
                event,
            },
        );
    }

    /// Remove every timer due at `now_ms`, returning those of the current generation
    pub fn take_due(&mut self, now_ms: f64, generation: u64) -> Vec<ScheduledEvent> {
        let due = self.timers.partition_point(|t| t.due_ms <= now_ms);
        if due == 0 {
            return Vec::new();
        }
        self.timers
            .drain(..due)
            .filter_map(|t| {
                if t.generation == generation {
                    Some(t.event)
                } else {
                    log::debug!(
                        "Dropping stale {:?} from session generation {} (now {})",
                        t.event,
                        t.generation,
                        generation
                    );
                    None
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Pending timers belonging to `generation`
    pub fn pending_for(&self, generation: u64) -> usize {
        self.timers.iter().filter(|t| t.generation == generation).count()
    }
}
