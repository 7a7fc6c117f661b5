use bevy::prelude::*;
use std::collections::BTreeMap;

/// Monotonic update counter. Advanced once per `Update`.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchClock {
    pub tick: u64,
}

/// Items waiting for a future tick.
///
/// Items come out in ascending due tick; items due on the same tick come out in
/// the order they were scheduled.
#[derive(Debug, Clone)]
pub struct DelayQueue<T> {
    pending: BTreeMap<u64, Vec<T>>,
    len: usize,
}

impl<T> Default for DelayQueue<T> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<T> DelayQueue<T> {
    pub fn schedule(&mut self, due_tick: u64, item: T) {
        self.pending.entry(due_tick).or_default().push(item);
        self.len += 1;
    }

    /// Removes and returns everything due at or before `now`.
    pub fn drain_due(&mut self, now: u64) -> Vec<T> {
        let later = match now.checked_add(1) {
            Some(next) => self.pending.split_off(&next),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.pending, later);
        let items: Vec<T> = due.into_values().flatten().collect();
        self.len -= items.len();
        items
    }

    /// Keeps only the items for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        for items in self.pending.values_mut() {
            items.retain(&mut keep);
        }
        self.pending.retain(|_, items| !items.is_empty());
        self.len = self.pending.values().map(Vec::len).sum();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
