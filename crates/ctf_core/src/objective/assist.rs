//! Assist ledger: held time per holder since the objective last left home

use crate::types::{HolderId, TimeMs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistEntry {
    pub holder: HolderId,
    pub total_held_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistLedger {
    entries: Vec<AssistEntry>,
}

impl AssistLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, holder: HolderId) -> Option<usize> {
        self.entries.iter().position(|e| e.holder == holder)
    }

    /// Index of the holder's entry, creating an empty one on first pickup
    pub fn find_or_create(&mut self, holder: HolderId) -> usize {
        match self.find(holder) {
            Some(index) => index,
            None => {
                self.entries.push(AssistEntry { holder, total_held_ms: 0 });
                self.entries.len() - 1
            }
        }
    }

    /// Out-of-range indices are ignored
    pub fn add_held_time(&mut self, index: usize, duration: TimeMs) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.total_held_ms = entry.total_held_ms.saturating_add(duration);
        }
    }

    /// Accumulated time for `holder`, excluding any live hold
    pub fn held_time(&self, holder: HolderId) -> u64 {
        self.find(holder).map(|i| self.entries[i].total_held_ms).unwrap_or(0)
    }

    pub fn total_held(&self) -> u64 {
        self.entries.iter().map(|e| e.total_held_ms).sum()
    }

    /// In first-pickup order
    pub fn entries(&self) -> &[AssistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_or_create_reuses_entry() {
        let mut ledger = AssistLedger::new();
        let a = ledger.find_or_create(HolderId(1));
        let b = ledger.find_or_create(HolderId(2));
        assert_ne!(a, b);
        assert_eq!(ledger.find_or_create(HolderId(1)), a);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_held_time_accumulates_across_cycles() {
        let mut ledger = AssistLedger::new();
        let i = ledger.find_or_create(HolderId(3));
        ledger.add_held_time(i, 1200);
        ledger.add_held_time(i, 800);
        assert_eq!(ledger.held_time(HolderId(3)), 2000);
        assert_eq!(ledger.held_time(HolderId(4)), 0);
    }

    #[test]
    fn test_total_and_clear() {
        let mut ledger = AssistLedger::new();
        let a = ledger.find_or_create(HolderId(1));
        let b = ledger.find_or_create(HolderId(2));
        ledger.add_held_time(a, 500);
        ledger.add_held_time(b, 250);
        ledger.add_held_time(99, 10_000);
        assert_eq!(ledger.total_held(), 750);

        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_held(), 0);
    }
}
