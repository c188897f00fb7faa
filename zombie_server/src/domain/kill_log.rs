// Bounded log of recent kills, shown in the client UI.

use super::state::{Combatant, Fatality};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillKind {
    PlayerKillsPlayer,
    PlayerKillsZombie,
    ZombieKillsPlayer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillLogEntry {
    pub killer: Combatant,
    pub victim: Combatant,
    pub kind: KillKind,
}

impl From<&Fatality> for KillLogEntry {
    fn from(fatality: &Fatality) -> Self {
        match fatality {
            Fatality::ZombieSlain { by, .. } => Self {
                killer: Combatant::Player(by.clone()),
                victim: Combatant::Zombie,
                kind: KillKind::PlayerKillsZombie,
            },
            Fatality::PlayerShot { victim, by } => Self {
                killer: Combatant::Player(by.clone()),
                victim: Combatant::Player(victim.clone()),
                kind: KillKind::PlayerKillsPlayer,
            },
            Fatality::PlayerEaten { victim, .. } => Self {
                killer: Combatant::Zombie,
                victim: Combatant::Player(victim.clone()),
                kind: KillKind::ZombieKillsPlayer,
            },
        }
    }
}

/// Ring of the most recent entries; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct KillLog {
    entries: VecDeque<KillLogEntry>,
    capacity: usize,
}

impl KillLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: KillLogEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in chronological order, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &KillLogEntry> {
        self.entries.iter()
    }
}
