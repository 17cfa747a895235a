use std::collections::BTreeSet;

use crate::error::{AutomatonError, Result};
use crate::registry::{
    Alphabet, AsLetter, AsState, AutomatonId, Letter, LetterData, Named, Registry, State,
    StateData, States,
};
use crate::transition::{Successors, TransitionTable};

/// States, alphabet, transition relation and start state of an automaton.
///
/// `V` is what a `(state, letter)` key maps to: a single `State` for
/// deterministic automata, a `Vec<State>` for nondeterministic ones.
/// Every instance exclusively owns its states and letters; handles of one
/// automaton are foreign to every other.
#[derive(Debug)]
pub struct Automaton<V> {
    id: AutomatonId,
    states: States,
    alphabet: Alphabet,
    transitions: TransitionTable<V>,
    start: Option<State>,
}

impl<V: Successors> Default for Automaton<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Successors> Automaton<V> {
    pub fn new() -> Self {
        let id = AutomatonId::fresh();
        Automaton {
            id,
            states: Registry::new(id),
            alphabet: Registry::new(id),
            transitions: TransitionTable::new(),
            start: None,
        }
    }

    /// Creates an automaton with the non-terminal states `s0`, …, `s{count-1}`.
    pub fn with_states(count: usize) -> Self {
        let mut automaton = Self::new();
        for i in 0..count {
            let inserted = automaton
                .states
                .insert(StateData::new(format!("s{}", i), false));
            debug_assert!(inserted.is_ok());
        }
        automaton
    }

    pub fn id(&self) -> AutomatonId {
        self.id
    }

    pub fn add_state<S: Into<String>>(&mut self, name: S, terminal: bool) -> Result<State> {
        let state = self.states.insert(StateData::new(name.into(), terminal))?;
        debug!("added state {:?} (terminal: {})", self.state_name(state), terminal);
        Ok(state)
    }

    /// Removes a state together with its outgoing transitions and every
    /// transition leading into it. Clears the start state if it is removed.
    pub fn remove_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = state.resolve_state(&self.states)?;
        self.transitions.remove_state(state);
        if self.start == Some(state) {
            self.start = None;
        }
        if let Some(data) = self.states.remove(state) {
            debug!("removed state {:?}", data.name());
        }
        Ok(state)
    }

    pub fn add_letter<S: Into<String>>(&mut self, name: S) -> Result<Letter> {
        let letter = self.alphabet.insert(LetterData::new(name.into()))?;
        trace!("added letter {:?}", self.letter_name(letter));
        Ok(letter)
    }

    /// Removes a letter and every transition on it.
    pub fn remove_letter<L: AsLetter>(&mut self, letter: L) -> Result<Letter> {
        let letter = letter.resolve_letter(&self.alphabet)?;
        self.transitions.remove_letter(letter);
        if let Some(data) = self.alphabet.remove(letter) {
            debug!("removed letter {:?}", data.name());
        }
        Ok(letter)
    }

    pub fn state<S: AsState>(&self, state: S) -> Result<State> {
        state.resolve_state(&self.states)
    }

    pub fn letter<L: AsLetter>(&self, letter: L) -> Result<Letter> {
        letter.resolve_letter(&self.alphabet)
    }

    pub fn find_state(&self, name: &str) -> Option<State> {
        self.states.find(name)
    }

    pub fn find_letter(&self, name: &str) -> Option<Letter> {
        self.alphabet.find(name)
    }

    pub fn state_name(&self, state: State) -> Option<&str> {
        self.states.get(state).map(Named::name)
    }

    pub fn letter_name(&self, letter: Letter) -> Option<&str> {
        self.alphabet.get(letter).map(Named::name)
    }

    /// Whether `state` belongs to this automaton and is terminal.
    pub fn is_terminal(&self, state: State) -> bool {
        self.states.get(state).map_or(false, StateData::is_terminal)
    }

    /// Designates the start state, replacing the previous one.
    pub fn set_start_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = state.resolve_state(&self.states)?;
        self.start = Some(state);
        Ok(state)
    }

    pub fn start_state(&self) -> Option<State> {
        self.start
    }

    /// Marks an existing state as terminal.
    pub fn set_end_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = state.resolve_state(&self.states)?;
        if let Some(data) = self.states.get_mut(state) {
            data.mark_terminal();
        }
        Ok(state)
    }

    pub fn states<'a>(&'a self) -> impl Iterator<Item = State> + 'a
    where
        V: 'a,
    {
        self.states.iter().map(|(state, _)| state)
    }

    pub fn letters<'a>(&'a self) -> impl Iterator<Item = Letter> + 'a
    where
        V: 'a,
    {
        self.alphabet.iter().map(|(letter, _)| letter)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn letter_count(&self) -> usize {
        self.alphabet.len()
    }

    pub fn transitions(&self) -> &TransitionTable<V> {
        &self.transitions
    }

    /// Adds `to` as a successor of `(from, letter)` and returns what was
    /// stored for that key before. Nothing changes unless all three belong
    /// to this automaton.
    pub fn insert_transition<F, T, L>(&mut self, from: F, to: T, letter: L) -> Result<Option<V>>
    where
        F: AsState,
        T: AsState,
        L: AsLetter,
    {
        let from = from.resolve_state(&self.states)?;
        let to = to.resolve_state(&self.states)?;
        let letter = letter.resolve_letter(&self.alphabet)?;
        trace!(
            "transition {:?} -{:?}-> {:?}",
            self.state_name(from),
            self.letter_name(letter),
            self.state_name(to)
        );
        Ok(self.transitions.insert(from, letter, to))
    }

    /// Removes all successors of `(from, letter)`.
    pub fn remove_transition<F, L>(&mut self, from: F, letter: L) -> Result<V>
    where
        F: AsState,
        L: AsLetter,
    {
        let from = from.resolve_state(&self.states)?;
        let letter = letter.resolve_letter(&self.alphabet)?;
        match self.transitions.remove(from, letter) {
            Some(removed) => Ok(removed),
            None => Err(self.missing_transition(letter)),
        }
    }

    /// Removes one occurrence of `to` from the successors of `(from, letter)`.
    pub fn remove_target<F, T, L>(&mut self, from: F, to: T, letter: L) -> Result<()>
    where
        F: AsState,
        T: AsState,
        L: AsLetter,
    {
        let from = from.resolve_state(&self.states)?;
        let to = to.resolve_state(&self.states)?;
        let letter = letter.resolve_letter(&self.alphabet)?;
        if self.transitions.remove_target(from, letter, to) {
            Ok(())
        } else {
            Err(self.missing_transition(letter))
        }
    }

    /// Looks up the letter whose name is exactly the character `symbol`.
    pub fn symbol(&self, symbol: char) -> Result<Letter> {
        symbol.resolve_letter(&self.alphabet)
    }

    pub(crate) fn missing_transition(&self, letter: Letter) -> AutomatonError {
        AutomatonError::MissingTransition(self.letter_name(letter).unwrap_or_default().to_string())
    }
}

impl Automaton<State> {
    /// The state reached from `current` on `letter`.
    pub fn next_state<L: AsLetter>(&self, current: Option<State>, letter: L) -> Result<State> {
        let current = current.ok_or(AutomatonError::NoCurrentState)?;
        let letter = letter.resolve_letter(&self.alphabet)?;
        match self.transitions.get(current, letter) {
            Some(&next) => Ok(next),
            None => Err(self.missing_transition(letter)),
        }
    }
}

impl Automaton<Vec<State>> {
    /// The union of the successors of every state in `active` on `letter`.
    pub fn next_states<L: AsLetter>(
        &self,
        active: &BTreeSet<State>,
        letter: L,
    ) -> Result<BTreeSet<State>> {
        let letter = letter.resolve_letter(&self.alphabet)?;
        Ok(active
            .iter()
            .flat_map(|&state| self.transitions.targets(state, letter))
            .cloned()
            .collect())
    }
}

/// Generates the structural operations that every engine forwards to its
/// `definition: Automaton<_>` field unchanged.
macro_rules! structural_surface {
    ($successors:ty) => {
        pub fn definition(&self) -> &$crate::automaton::Automaton<$successors> {
            &self.definition
        }

        /// Adds a state; fails if the name is taken.
        pub fn add_state<S: Into<String>>(
            &mut self,
            name: S,
            terminal: bool,
        ) -> $crate::error::Result<$crate::registry::State> {
            self.definition.add_state(name, terminal)
        }

        /// Adds a letter; fails if the name is taken.
        pub fn add_letter<S: Into<String>>(
            &mut self,
            name: S,
        ) -> $crate::error::Result<$crate::registry::Letter> {
            self.definition.add_letter(name)
        }

        /// Removes a letter and every transition on it.
        pub fn remove_letter<L: $crate::registry::AsLetter>(
            &mut self,
            letter: L,
        ) -> $crate::error::Result<$crate::registry::Letter> {
            self.definition.remove_letter(letter)
        }

        /// Marks an existing state as terminal.
        pub fn set_end_state<S: $crate::registry::AsState>(
            &mut self,
            state: S,
        ) -> $crate::error::Result<$crate::registry::State> {
            self.definition.set_end_state(state)
        }

        pub fn state<S: $crate::registry::AsState>(
            &self,
            state: S,
        ) -> $crate::error::Result<$crate::registry::State> {
            self.definition.state(state)
        }

        pub fn letter<L: $crate::registry::AsLetter>(
            &self,
            letter: L,
        ) -> $crate::error::Result<$crate::registry::Letter> {
            self.definition.letter(letter)
        }

        pub fn state_name(&self, state: $crate::registry::State) -> Option<&str> {
            self.definition.state_name(state)
        }

        pub fn letter_name(&self, letter: $crate::registry::Letter) -> Option<&str> {
            self.definition.letter_name(letter)
        }

        pub fn is_terminal(&self, state: $crate::registry::State) -> bool {
            self.definition.is_terminal(state)
        }

        pub fn start_state(&self) -> Option<$crate::registry::State> {
            self.definition.start_state()
        }
    };
}
