use fnv::FnvHashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AutomatonError, Result};

/// Identifies one automaton instance. Every automaton draws a fresh id, so
/// handles of two automata never compare equal, even if the names match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AutomatonId(usize);

impl AutomatonId {
    pub fn fresh() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        AutomatonId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// An index into a `Registry` tagged with the automaton that owns it.
pub trait Handle: Copy + Eq + Hash + fmt::Debug {
    fn from_parts(owner: AutomatonId, index: usize) -> Self;
    fn owner(self) -> AutomatonId;
    fn index(self) -> usize;
}

macro_rules! handle {
    ( $( #[$attr:meta] )* $name:ident ) => {
        $( #[$attr] )*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name {
            owner: AutomatonId,
            index: usize,
        }

        impl Handle for $name {
            fn from_parts(owner: AutomatonId, index: usize) -> Self {
                $name { owner, index }
            }

            fn owner(self) -> AutomatonId {
                self.owner
            }

            fn index(self) -> usize {
                self.index
            }
        }
    };
}

handle!(
    /// A state of an automaton.
    State
);
handle!(
    /// A letter of an automaton's alphabet.
    Letter
);

/// Payloads that are looked up by name.
pub trait Named {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateData {
    name: String,
    terminal: bool,
}

impl StateData {
    pub fn new(name: String, terminal: bool) -> Self {
        StateData { name, terminal }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn mark_terminal(&mut self) {
        self.terminal = true;
    }
}

impl Named for StateData {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterData {
    name: String,
}

impl LetterData {
    pub fn new(name: String) -> Self {
        LetterData { name }
    }
}

impl Named for LetterData {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An index-addressed arena of named entries.
///
/// Slots are never reused: after `remove`, every handle to the removed
/// entry stays dead, and re-inserting the same name yields a new handle.
#[derive(Debug)]
pub struct Registry<H, D> {
    owner: AutomatonId,
    slots: Vec<Option<D>>,
    names: FnvHashMap<String, usize>,
    _handle: PhantomData<H>,
}

pub type States = Registry<State, StateData>;
pub type Alphabet = Registry<Letter, LetterData>;

impl<H: Handle, D: Named> Registry<H, D> {
    pub fn new(owner: AutomatonId) -> Self {
        Registry {
            owner,
            slots: Vec::new(),
            names: FnvHashMap::default(),
            _handle: PhantomData,
        }
    }

    pub fn owner(&self) -> AutomatonId {
        self.owner
    }

    pub fn insert(&mut self, data: D) -> Result<H> {
        if self.names.contains_key(data.name()) {
            return Err(AutomatonError::DuplicateName(data.name().to_string()));
        }
        let index = self.slots.len();
        self.names.insert(data.name().to_string(), index);
        self.slots.push(Some(data));
        Ok(H::from_parts(self.owner, index))
    }

    pub fn remove(&mut self, handle: H) -> Option<D> {
        if handle.owner() != self.owner {
            return None;
        }
        let data = self.slots.get_mut(handle.index())?.take()?;
        self.names.remove(data.name());
        Some(data)
    }

    pub fn contains(&self, handle: H) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: H) -> Option<&D> {
        if handle.owner() != self.owner {
            return None;
        }
        self.slots.get(handle.index())?.as_ref()
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut D> {
        if handle.owner() != self.owner {
            return None;
        }
        self.slots.get_mut(handle.index())?.as_mut()
    }

    pub fn find(&self, name: &str) -> Option<H> {
        self.names
            .get(name)
            .map(|&index| H::from_parts(self.owner, index))
    }

    /// Iterates over the live entries in insertion order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item = (H, &'a D)> + 'a
    where
        H: 'a,
        D: 'a,
    {
        let owner = self.owner;
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| slot.as_ref().map(|d| (H::from_parts(owner, index), d)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Anything that designates a state of an automaton: a `State` handle or a
/// state name.
pub trait AsState {
    fn resolve_state(self, states: &States) -> Result<State>;
}

impl AsState for State {
    fn resolve_state(self, states: &States) -> Result<State> {
        if states.contains(self) {
            Ok(self)
        } else {
            Err(AutomatonError::ForeignState)
        }
    }
}

impl<'a> AsState for &'a str {
    fn resolve_state(self, states: &States) -> Result<State> {
        states
            .find(self)
            .ok_or_else(|| AutomatonError::UnknownState(self.to_string()))
    }
}

impl<'a> AsState for &'a String {
    fn resolve_state(self, states: &States) -> Result<State> {
        self.as_str().resolve_state(states)
    }
}

impl AsState for String {
    fn resolve_state(self, states: &States) -> Result<State> {
        self.as_str().resolve_state(states)
    }
}

/// Anything that designates a letter of an alphabet: a `Letter` handle, a
/// letter name or a single character.
pub trait AsLetter {
    fn resolve_letter(self, alphabet: &Alphabet) -> Result<Letter>;
}

impl AsLetter for Letter {
    fn resolve_letter(self, alphabet: &Alphabet) -> Result<Letter> {
        if alphabet.contains(self) {
            Ok(self)
        } else {
            Err(AutomatonError::ForeignLetter)
        }
    }
}

impl<'a> AsLetter for &'a str {
    fn resolve_letter(self, alphabet: &Alphabet) -> Result<Letter> {
        alphabet
            .find(self)
            .ok_or_else(|| AutomatonError::UnknownLetter(self.to_string()))
    }
}

impl<'a> AsLetter for &'a String {
    fn resolve_letter(self, alphabet: &Alphabet) -> Result<Letter> {
        self.as_str().resolve_letter(alphabet)
    }
}

impl AsLetter for String {
    fn resolve_letter(self, alphabet: &Alphabet) -> Result<Letter> {
        self.as_str().resolve_letter(alphabet)
    }
}

impl AsLetter for char {
    fn resolve_letter(self, alphabet: &Alphabet) -> Result<Letter> {
        let mut buffer = [0; 4];
        alphabet
            .find(self.encode_utf8(&mut buffer))
            .ok_or(AutomatonError::UnknownSymbol(self))
    }
}
