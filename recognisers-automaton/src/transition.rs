use fnv::{FnvHashMap, FnvHashSet};
use std::collections::hash_map::Entry;
use std::fmt::Debug;
use std::slice;

use crate::registry::{Letter, State};

/// The value stored for one `(state, letter)` key of a transition table.
pub trait Successors: Clone + Debug + Sized {
    fn from_target(target: State) -> Self;

    /// Records `target` as a successor. A single successor is replaced,
    /// a list of successors grows (duplicates included).
    fn add_target(&mut self, target: State);

    fn targets(&self) -> &[State];

    /// Removes one stored occurrence of `target`. Returns whether one was
    /// found and what remains, `None` if nothing does.
    fn remove_target(self, target: State) -> (bool, Option<Self>);

    /// Drops every successor for which `keep` is false.
    fn retain_targets<F: FnMut(&State) -> bool>(self, keep: F) -> Option<Self>;
}

impl Successors for State {
    fn from_target(target: State) -> Self {
        target
    }

    fn add_target(&mut self, target: State) {
        *self = target;
    }

    fn targets(&self) -> &[State] {
        slice::from_ref(self)
    }

    fn remove_target(self, target: State) -> (bool, Option<Self>) {
        if self == target {
            (true, None)
        } else {
            (false, Some(self))
        }
    }

    fn retain_targets<F: FnMut(&State) -> bool>(self, mut keep: F) -> Option<Self> {
        if keep(&self) {
            Some(self)
        } else {
            None
        }
    }
}

impl Successors for Vec<State> {
    fn from_target(target: State) -> Self {
        vec![target]
    }

    fn add_target(&mut self, target: State) {
        self.push(target);
    }

    fn targets(&self) -> &[State] {
        self.as_slice()
    }

    fn remove_target(mut self, target: State) -> (bool, Option<Self>) {
        let found = match self.iter().position(|&t| t == target) {
            Some(i) => {
                self.remove(i);
                true
            }
            None => false,
        };
        (found, if self.is_empty() { None } else { Some(self) })
    }

    fn retain_targets<F: FnMut(&State) -> bool>(mut self, keep: F) -> Option<Self> {
        self.retain(keep);
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Maps `(source state, letter)` to its successors.
///
/// Next to the rows of outgoing transitions, the table keeps for every state
/// the keys pointing into it, so that removing a state only touches the
/// transitions adjacent to it.
///
/// The table does not know which states and letters exist; the owning
/// automaton validates both before it inserts anything.
#[derive(Debug)]
pub struct TransitionTable<V> {
    rows: FnvHashMap<State, FnvHashMap<Letter, V>>,
    incoming: FnvHashMap<State, FnvHashSet<(State, Letter)>>,
}

impl<V> Default for TransitionTable<V> {
    fn default() -> Self {
        TransitionTable {
            rows: FnvHashMap::default(),
            incoming: FnvHashMap::default(),
        }
    }
}

fn unlink(
    incoming: &mut FnvHashMap<State, FnvHashSet<(State, Letter)>>,
    target: State,
    key: (State, Letter),
) {
    if let Entry::Occupied(mut e) = incoming.entry(target) {
        e.get_mut().remove(&key);
        if e.get().is_empty() {
            e.remove();
        }
    }
}

impl<V: Successors> TransitionTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, from: State, letter: Letter) -> Option<&V> {
        self.rows.get(&from)?.get(&letter)
    }

    /// All successors of `from` on `letter`, empty if there is no transition.
    pub fn targets(&self, from: State, letter: Letter) -> &[State] {
        match self.get(from, letter) {
            Some(v) => v.targets(),
            None => &[],
        }
    }

    pub fn contains(&self, from: State, letter: Letter) -> bool {
        self.get(from, letter).is_some()
    }

    /// Adds `to` to the successors of `(from, letter)` and returns what was
    /// stored before.
    pub fn insert(&mut self, from: State, letter: Letter, to: State) -> Option<V> {
        let key = (from, letter);
        let row = self.rows.entry(from).or_default();
        let previous = row.get(&letter).cloned();
        let stale: Vec<State> = match row.entry(letter) {
            Entry::Occupied(mut e) => {
                e.get_mut().add_target(to);
                let current = e.get().targets();
                previous
                    .iter()
                    .flat_map(|p| p.targets())
                    .filter(|t| !current.contains(t))
                    .cloned()
                    .collect()
            }
            Entry::Vacant(e) => {
                e.insert(V::from_target(to));
                Vec::new()
            }
        };
        for target in stale {
            unlink(&mut self.incoming, target, key);
        }
        self.incoming.entry(to).or_default().insert(key);
        previous
    }

    /// Removes every successor of `(from, letter)`.
    pub fn remove(&mut self, from: State, letter: Letter) -> Option<V> {
        let removed = self.rows.get_mut(&from)?.remove(&letter)?;
        for &target in removed.targets() {
            unlink(&mut self.incoming, target, (from, letter));
        }
        Some(removed)
    }

    /// Removes one occurrence of `to` from the successors of `(from, letter)`.
    pub fn remove_target(&mut self, from: State, letter: Letter, to: State) -> bool {
        let row = match self.rows.get_mut(&from) {
            Some(row) => row,
            None => return false,
        };
        let stored = match row.remove(&letter) {
            Some(stored) => stored,
            None => return false,
        };
        let (found, rest) = stored.remove_target(to);
        let still_linked = match rest {
            Some(rest) => {
                let linked = rest.targets().contains(&to);
                row.insert(letter, rest);
                linked
            }
            None => false,
        };
        if !still_linked {
            unlink(&mut self.incoming, to, (from, letter));
        }
        found
    }

    /// Drops the row of `state` and every transition leading into it.
    pub fn remove_state(&mut self, state: State) {
        if let Some(row) = self.rows.remove(&state) {
            for (letter, successors) in row {
                for &target in successors.targets() {
                    unlink(&mut self.incoming, target, (state, letter));
                }
            }
        }
        for (source, letter) in self.incoming.remove(&state).unwrap_or_default() {
            if let Some(row) = self.rows.get_mut(&source) {
                if let Some(stored) = row.remove(&letter) {
                    if let Some(rest) = stored.retain_targets(|&t| t != state) {
                        row.insert(letter, rest);
                    }
                }
            }
        }
    }

    /// Drops every transition keyed by `letter`.
    pub fn remove_letter(&mut self, letter: Letter) {
        let incoming = &mut self.incoming;
        for (&source, row) in self.rows.iter_mut() {
            if let Some(removed) = row.remove(&letter) {
                for &target in removed.targets() {
                    unlink(incoming, target, (source, letter));
                }
            }
        }
    }

    /// Keys of all transitions with `state` among their successors.
    pub fn incoming<'a>(&'a self, state: State) -> impl Iterator<Item = (State, Letter)> + 'a
    where
        V: 'a,
    {
        self.incoming
            .get(&state)
            .into_iter()
            .flat_map(|keys| keys.iter().cloned())
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (State, Letter, &'a V)> + 'a
    where
        V: 'a,
    {
        self.rows
            .iter()
            .flat_map(|(&from, row)| row.iter().map(move |(&letter, v)| (from, letter, v)))
    }

    /// Number of `(state, letter)` keys with at least one successor.
    pub fn len(&self) -> usize {
        self.rows.values().map(|row| row.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AutomatonId, Handle};

    fn states(n: usize) -> (Vec<State>, Vec<Letter>) {
        let owner = AutomatonId::fresh();
        (
            (0..n).map(|i| State::from_parts(owner, i)).collect(),
            (0..n).map(|i| Letter::from_parts(owner, i)).collect(),
        )
    }

    #[test]
    fn single_successor_is_overwritten() {
        let (s, l) = states(3);
        let mut table: TransitionTable<State> = TransitionTable::new();

        assert_eq!(table.insert(s[0], l[0], s[1]), None);
        assert_eq!(table.insert(s[0], l[0], s[2]), Some(s[1]));
        assert_eq!(table.targets(s[0], l[0]), &[s[2]]);
        assert_eq!(table.incoming(s[1]).count(), 0);
        assert_eq!(table.incoming(s[2]).collect::<Vec<_>>(), vec![(s[0], l[0])]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn successor_lists_accumulate() {
        let (s, l) = states(3);
        let mut table: TransitionTable<Vec<State>> = TransitionTable::new();

        table.insert(s[0], l[0], s[1]);
        table.insert(s[0], l[0], s[2]);
        table.insert(s[0], l[0], s[1]);
        assert_eq!(table.targets(s[0], l[0]), &[s[1], s[2], s[1]]);

        assert!(table.remove_target(s[0], l[0], s[1]));
        assert_eq!(table.targets(s[0], l[0]), &[s[2], s[1]]);
        // one occurrence of s1 is still there
        assert_eq!(table.incoming(s[1]).count(), 1);

        assert!(table.remove_target(s[0], l[0], s[1]));
        assert!(!table.remove_target(s[0], l[0], s[1]));
        assert_eq!(table.incoming(s[1]).count(), 0);

        assert!(table.remove_target(s[0], l[0], s[2]));
        assert!(!table.contains(s[0], l[0]));
        assert!(table.is_empty());
    }

    #[test]
    fn removing_a_state_cascades() {
        let (s, l) = states(3);
        let mut table: TransitionTable<Vec<State>> = TransitionTable::new();

        table.insert(s[0], l[0], s[1]);
        table.insert(s[0], l[0], s[2]);
        table.insert(s[1], l[1], s[1]);
        table.insert(s[1], l[0], s[2]);
        table.insert(s[2], l[1], s[1]);

        table.remove_state(s[1]);

        assert_eq!(table.targets(s[0], l[0]), &[s[2]]);
        assert!(!table.contains(s[1], l[1]));
        assert!(!table.contains(s[1], l[0]));
        assert!(!table.contains(s[2], l[1]));
        assert_eq!(table.incoming(s[2]).collect::<Vec<_>>(), vec![(s[0], l[0])]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn removing_a_letter_cascades() {
        let (s, l) = states(2);
        let mut table: TransitionTable<State> = TransitionTable::new();

        table.insert(s[0], l[0], s[1]);
        table.insert(s[1], l[0], s[0]);
        table.insert(s[1], l[1], s[1]);

        table.remove_letter(l[0]);

        assert_eq!(table.len(), 1);
        assert_eq!(table.targets(s[1], l[1]), &[s[1]]);
        assert_eq!(table.incoming(s[0]).count(), 0);
    }

    #[test]
    fn iterating_over_keys() {
        let (s, l) = states(2);
        let mut table: TransitionTable<Vec<State>> = TransitionTable::new();

        table.insert(s[0], l[0], s[1]);
        table.insert(s[0], l[0], s[0]);
        table.insert(s[1], l[1], s[0]);

        let mut entries: Vec<(State, Letter, Vec<State>)> = table
            .iter()
            .map(|(from, letter, targets)| (from, letter, targets.clone()))
            .collect();
        entries.sort();
        assert_eq!(
            entries,
            vec![(s[0], l[0], vec![s[1], s[0]]), (s[1], l[1], vec![s[0]])]
        );
    }

    #[test]
    fn removing_a_key() {
        let (s, l) = states(2);
        let mut table: TransitionTable<State> = TransitionTable::new();

        table.insert(s[0], l[0], s[1]);
        assert_eq!(table.remove(s[0], l[0]), Some(s[1]));
        assert_eq!(table.remove(s[0], l[0]), None);
        assert_eq!(table.incoming(s[1]).count(), 0);
    }
}
