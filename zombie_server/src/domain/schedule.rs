// Tick-keyed queue of deferred world actions.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledAction {
    ReviveZombie { zombie_id: u64 },
}

#[derive(Debug, Clone)]
struct ScheduledEntry {
    due_tick: u64,
    // Insertion order breaks ties so equal-tick actions fire FIFO.
    seq: u64,
    action: ScheduledAction,
}

impl PartialEq for ScheduledEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due_tick == other.due_tick && self.seq == other.seq
    }
}

impl Eq for ScheduledEntry {}

impl PartialOrd for ScheduledEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_tick, self.seq).cmp(&(other.due_tick, other.seq))
    }
}

#[derive(Debug, Default)]
pub struct Schedule {
    entries: BinaryHeap<Reverse<ScheduledEntry>>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, due_tick: u64, action: ScheduledAction) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.entries.push(Reverse(ScheduledEntry {
            due_tick,
            seq,
            action,
        }));
    }

    /// Pops the earliest action due at or before `now`.
    pub fn pop_due(&mut self, now: u64) -> Option<ScheduledAction> {
        let Reverse(head) = self.entries.peek()?;
        if head.due_tick > now {
            return None;
        }
        self.entries.pop().map(|Reverse(entry)| entry.action)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_actions_are_not_due_then_nothing_pops() {
        let mut schedule = Schedule::new();
        schedule.push(10, ScheduledAction::ReviveZombie { zombie_id: 1 });
        assert_eq!(schedule.pop_due(9), None);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn when_several_actions_are_due_then_they_pop_in_due_then_insertion_order() {
        let mut schedule = Schedule::new();
        schedule.push(12, ScheduledAction::ReviveZombie { zombie_id: 3 });
        schedule.push(10, ScheduledAction::ReviveZombie { zombie_id: 1 });
        schedule.push(10, ScheduledAction::ReviveZombie { zombie_id: 2 });

        let mut fired = Vec::new();
        while let Some(ScheduledAction::ReviveZombie { zombie_id }) = schedule.pop_due(12) {
            fired.push(zombie_id);
        }
        assert_eq!(fired, vec![1, 2, 3]);
        assert!(schedule.is_empty());
    }
}
