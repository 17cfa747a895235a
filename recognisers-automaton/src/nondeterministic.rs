use std::collections::BTreeSet;

use crate::automaton::Automaton;
use crate::error::{AutomatonError, Result};
use crate::recognisable::Recognisable;
use crate::registry::{AsLetter, AsState, Letter, State};

/// A nondeterministic finite state automaton.
///
/// A `(state, letter)` pair may lead to any number of states. Runs keep
/// track of the set of states they could be in (the active set) instead of
/// building the equivalent deterministic automaton up front.
///
/// ```
/// use recognisers_automaton::{Nfa, Recognisable};
///
/// let mut nfa = Nfa::new();
/// nfa.add_state("q0", false).unwrap();
/// nfa.add_state("q1", true).unwrap();
/// for l in &["a", "b"] {
///     nfa.add_letter(*l).unwrap();
///     nfa.add_transition("q0", "q0", *l).unwrap();
/// }
/// nfa.add_transition("q0", "q1", "b").unwrap();
/// nfa.set_start_state("q0").unwrap();
///
/// // words ending with `b`
/// assert!(nfa.accepts("aab"));
/// assert!(!nfa.accepts("aba"));
/// ```
#[derive(Debug, Default)]
pub struct Nfa {
    definition: Automaton<Vec<State>>,
    current: BTreeSet<State>,
}

impl Nfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an automaton with the non-terminal states `s0`, …, `s{count-1}`.
    pub fn with_states(count: usize) -> Self {
        Nfa {
            definition: Automaton::with_states(count),
            current: BTreeSet::new(),
        }
    }

    structural_surface!(Vec<State>);

    /// Removes a state and every transition adjacent to it. The state also
    /// leaves the active set.
    pub fn remove_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = self.definition.remove_state(state)?;
        self.current.remove(&state);
        Ok(state)
    }

    /// Adds `to` to the successors of `(from, letter)`.
    pub fn add_transition<F, T, L>(&mut self, from: F, to: T, letter: L) -> Result<()>
    where
        F: AsState,
        T: AsState,
        L: AsLetter,
    {
        self.definition.insert_transition(from, to, letter).map(|_| ())
    }

    /// Removes one occurrence of `to` from the successors of `(from, letter)`.
    pub fn remove_transition<F, T, L>(&mut self, from: F, to: T, letter: L) -> Result<()>
    where
        F: AsState,
        T: AsState,
        L: AsLetter,
    {
        self.definition.remove_target(from, to, letter)
    }

    /// Designates the start state and resets the active set to it.
    pub fn set_start_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = self.definition.set_start_state(state)?;
        self.current = Some(state).into_iter().collect();
        Ok(state)
    }

    pub fn current_states(&self) -> &BTreeSet<State> {
        &self.current
    }

    /// Resets the active set to `{start}`, or to the empty set without a
    /// start state.
    pub fn reset_current(&mut self) {
        self.current = self.definition.start_state().into_iter().collect();
    }

    /// Replaces the active set with the union of the successors of all active
    /// states on `letter`. An empty active set stays empty.
    pub fn try_step<L: AsLetter>(&mut self, letter: L) -> Result<&BTreeSet<State>> {
        self.current = self.definition.next_states(&self.current, letter)?;
        Ok(&self.current)
    }

    /// Like `try_step`, but `None` if `letter` is not in the alphabet.
    pub fn step<L: AsLetter>(&mut self, letter: L) -> Option<&BTreeSet<State>> {
        self.try_step(letter).ok()
    }

    /// Whether any active state is terminal.
    pub fn is_in_terminal(&self) -> bool {
        self.current.iter().any(|&s| self.definition.is_terminal(s))
    }
}

impl Recognisable for Nfa {
    fn symbol(&self, symbol: char) -> Result<Letter> {
        self.definition.symbol(symbol)
    }

    fn run<I>(&self, input: I) -> Result<bool>
    where
        I: IntoIterator<Item = Result<Letter>>,
    {
        let mut active: BTreeSet<State> = match self.definition.start_state() {
            Some(start) => Some(start).into_iter().collect(),
            None => return Err(AutomatonError::NoStartState),
        };
        for letter in input {
            let letter = letter?;
            active = self.definition.next_states(&active, letter)?;
            trace!("{} active states", active.len());
            // nothing leads out of the empty set
            if active.is_empty() {
                return Err(self.definition.missing_transition(letter));
            }
        }
        Ok(active.iter().any(|&s| self.definition.is_terminal(s)))
    }
}
