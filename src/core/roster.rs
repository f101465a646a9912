//! In-memory roster of shifts that have not yet reached the ledger.
//!
//! Entries keep insertion order. Callers address them by [`ShiftId`], which
//! is resolved through an id → position index rebuilt after every removal,
//! so a held id either resolves to the same entry or fails with `NotFound`.

use crate::errors::{AppError, AppResult};
use crate::models::shift_entry::{ShiftEntry, ShiftId};
use std::collections::HashMap;

#[derive(Debug)]
pub struct Roster {
    entries: Vec<ShiftEntry>,
    index: HashMap<ShiftId, usize>,
    next_id: u64,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_id: 1,
        }
    }

    /// Rebuild a roster from persisted entries, keeping their order.
    ///
    /// Entries without an id (id 0), with a duplicate id, or with `u64::MAX`
    /// (no successor to continue from) get a fresh one. Returns the roster
    /// and the entries dropped for violating the model invariants (blank
    /// name, clock-out before clock-in) or because no id was left to give.
    pub fn from_entries(entries: Vec<ShiftEntry>) -> (Self, Vec<ShiftEntry>) {
        let (kept, mut rejected): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(ShiftEntry::is_well_formed);

        let max_id = kept
            .iter()
            .map(|e| e.id.0)
            .filter(|&id| id != u64::MAX)
            .max()
            .unwrap_or(0);
        let mut roster = Roster {
            entries: Vec::with_capacity(kept.len()),
            index: HashMap::new(),
            next_id: max_id + 1,
        };

        for mut entry in kept {
            if entry.id.0 == 0 || entry.id.0 == u64::MAX || roster.index.contains_key(&entry.id) {
                match roster.allocate_id() {
                    Some(id) => entry.id = id,
                    None => {
                        rejected.push(entry);
                        continue;
                    }
                }
            }
            roster.index.insert(entry.id, roster.entries.len());
            roster.entries.push(entry);
        }

        (roster, rejected)
    }

    /// Next unused id. `u64::MAX` is never handed out so `next_id` cannot overflow.
    fn allocate_id(&mut self) -> Option<ShiftId> {
        if self.next_id == u64::MAX {
            return None;
        }
        let id = ShiftId(self.next_id);
        self.next_id += 1;
        Some(id)
    }

    fn position(&self, id: ShiftId) -> AppResult<usize> {
        self.index.get(&id).copied().ok_or(AppError::NotFound(id))
    }

    fn remove_at(&mut self, pos: usize) -> ShiftEntry {
        let removed = self.entries.remove(pos);
        self.index.remove(&removed.id);
        for (i, e) in self.entries.iter().enumerate().skip(pos) {
            self.index.insert(e.id, i);
        }
        removed
    }

    /// Start a shift for `name` at `now`. The trimmed name is stored.
    pub fn clock_in(&mut self, name: &str, now: i64) -> AppResult<ShiftId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation);
        }

        let id = self
            .allocate_id()
            .ok_or_else(|| AppError::Other("no shift ids left on this roster".into()))?;
        self.index.insert(id, self.entries.len());
        self.entries.push(ShiftEntry::new(id, name, now));
        Ok(id)
    }

    /// Remove an entry whatever its state.
    pub fn cancel(&mut self, id: ShiftId) -> AppResult<ShiftEntry> {
        let pos = self.position(id)?;
        Ok(self.remove_at(pos))
    }

    /// Stamp the clock-out time once. The entry stays on the roster.
    ///
    /// `now` earlier than the clock-in (clock skew) is raised to the clock-in
    /// time so `clock_out_at >= clock_in_at` always holds.
    pub fn record_clock_out(&mut self, id: ShiftId, now: i64) -> AppResult<ShiftEntry> {
        let pos = self.position(id)?;
        let entry = &mut self.entries[pos];
        if entry.clock_out_at.is_some() {
            return Err(AppError::AlreadyClockedOut(id));
        }
        entry.clock_out_at = Some(now.max(entry.clock_in_at));
        Ok(entry.clone())
    }

    /// Drop a clocked-out entry once the ledger has it.
    pub fn acknowledge(&mut self, id: ShiftId) -> AppResult<ShiftEntry> {
        let pos = self.position(id)?;
        if self.entries[pos].clock_out_at.is_none() {
            return Err(AppError::InvalidState(id));
        }
        Ok(self.remove_at(pos))
    }

    pub fn get(&self, id: ShiftId) -> Option<&ShiftEntry> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    pub fn contains(&self, id: ShiftId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn entries(&self) -> &[ShiftEntry] {
        &self.entries
    }

    pub fn pending_ids(&self) -> Vec<ShiftId> {
        self.entries
            .iter()
            .filter(|e| e.is_clocked_out())
            .map(|e| e.id)
            .collect()
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
    use crate::models::shift_entry::ShiftState;

    #[test]
    fn clock_in_appends_an_active_entry() {
        let mut r = Roster::new();
        let a = r.clock_in("Ada", 100).expect("clock in");
        let b = r.clock_in("  Bob ", 200).expect("clock in");

        assert_eq!(r.len(), 2);
        assert_ne!(a, b);
        let bob = r.get(b).expect("bob");
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.clock_in_at, 200);
        assert_eq!(bob.clock_out_at, None);
        assert_eq!(r.entries()[0].id, a);
    }

    #[test]
    fn blank_names_are_rejected_without_mutation() {
        let mut r = Roster::new();
        assert!(matches!(r.clock_in("", 1), Err(AppError::Validation)));
        assert!(matches!(r.clock_in(" \t ", 1), Err(AppError::Validation)));
        assert!(r.is_empty());
    }

    #[test]
    fn second_clock_out_fails_and_keeps_first_stamp() {
        let mut r = Roster::new();
        let id = r.clock_in("Ada", 1_000).expect("clock in");

        let first = r.record_clock_out(id, 5_000).expect("clock out");
        assert_eq!(first.clock_out_at, Some(5_000));

        let err = r.record_clock_out(id, 9_000).unwrap_err();
        assert!(matches!(err, AppError::AlreadyClockedOut(x) if x == id));
        assert_eq!(r.get(id).and_then(|e| e.clock_out_at), Some(5_000));
    }

    #[test]
    fn clock_out_never_precedes_clock_in() {
        let mut r = Roster::new();
        let id = r.clock_in("Ada", 10_000).expect("clock in");
        let e = r.record_clock_out(id, 9_000).expect("clock out");
        assert_eq!(e.clock_out_at, Some(10_000));
    }

    #[test]
    fn acknowledge_requires_clock_out() {
        let mut r = Roster::new();
        let id = r.clock_in("Ada", 0).expect("clock in");

        assert!(matches!(r.acknowledge(id), Err(AppError::InvalidState(_))));
        assert!(r.contains(id));

        r.record_clock_out(id, 10).expect("clock out");
        assert_eq!(r.get(id).map(|e| e.state()), Some(ShiftState::PendingSync));
        r.acknowledge(id).expect("acknowledge");
        assert!(!r.contains(id));
    }

    #[test]
    fn ids_survive_removal_of_earlier_entries() {
        let mut r = Roster::new();
        let a = r.clock_in("Ada", 0).expect("a");
        let b = r.clock_in("Bob", 0).expect("b");
        let c = r.clock_in("Cy", 0).expect("c");

        r.cancel(a).expect("cancel a");
        assert_eq!(r.get(c).map(|e| e.name.as_str()), Some("Cy"));
        assert_eq!(r.get(b).map(|e| e.name.as_str()), Some("Bob"));

        assert!(matches!(r.cancel(a), Err(AppError::NotFound(_))));
        assert!(matches!(r.record_clock_out(a, 1), Err(AppError::NotFound(_))));

        // ids are not reused after removal
        let d = r.clock_in("Di", 0).expect("d");
        assert!(d > c);
    }

    #[test]
    fn cancel_removes_pending_entries_too() {
        let mut r = Roster::new();
        let id = r.clock_in("Ada", 0).expect("clock in");
        r.record_clock_out(id, 50).expect("clock out");
        let removed = r.cancel(id).expect("cancel");
        assert_eq!(removed.clock_out_at, Some(50));
        assert!(r.is_empty());
    }

    #[test]
    fn from_entries_assigns_missing_ids_and_drops_bad_rows() {
        let mut bad = ShiftEntry::new(ShiftId(0), "Bad", 100);
        bad.clock_out_at = Some(50);
        let entries = vec![
            ShiftEntry::new(ShiftId(0), "Ada", 1),
            ShiftEntry::new(ShiftId(7), "Bob", 2),
            bad,
            ShiftEntry::new(ShiftId(7), "Dup", 3),
        ];

        let (mut r, rejected) = Roster::from_entries(entries);
        assert_eq!(rejected.len(), 1);
        assert_eq!(r.len(), 3);

        let ids: Vec<u64> = r.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![8, 7, 9]);
        assert_eq!(r.entries()[2].name, "Dup");

        let next = r.clock_in("New", 4).expect("clock in");
        assert_eq!(next, ShiftId(10));
    }

    #[test]
    fn largest_id_is_reassigned_instead_of_overflowing() {
        let (mut r, rejected) =
            Roster::from_entries(vec![ShiftEntry::new(ShiftId(u64::MAX), "Ada", 1)]);
        assert!(rejected.is_empty());
        assert_eq!(r.entries()[0].id, ShiftId(1));
        assert_eq!(r.clock_in("Bob", 2).expect("clock in"), ShiftId(2));
    }

    #[test]
    fn exhausted_ids_fail_without_panicking() {
        let (mut r, rejected) = Roster::from_entries(vec![
            ShiftEntry::new(ShiftId(u64::MAX - 1), "Ada", 1),
            ShiftEntry::new(ShiftId(0), "Bob", 2),
        ]);
        assert_eq!(r.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].name, "Bob");

        assert!(matches!(r.clock_in("Cy", 3), Err(AppError::Other(_))));
        assert_eq!(r.len(), 1);
    }
}
