use crate::automaton::Automaton;
use crate::error::{AutomatonError, Result};
use crate::recognisable::Recognisable;
use crate::registry::{AsLetter, AsState, Letter, State};

/// A deterministic finite state automaton.
///
/// Every `(state, letter)` pair has at most one successor; setting a
/// transition again replaces the old successor. Missing transitions are
/// dead ends.
///
/// ```
/// use recognisers_automaton::{Dfa, Recognisable};
///
/// let mut dfa = Dfa::with_states(3);
/// dfa.add_letter("a").unwrap();
/// dfa.set_transition("s0", "s1", "a").unwrap();
/// dfa.set_transition("s1", "s2", "a").unwrap();
/// dfa.set_start_state("s0").unwrap();
/// dfa.set_end_state("s2").unwrap();
///
/// assert!(dfa.accepts("aa"));
/// assert!(!dfa.accepts("a"));
/// assert!(!dfa.accepts("aaa"));
/// ```
#[derive(Debug, Default)]
pub struct Dfa {
    definition: Automaton<State>,
    current: Option<State>,
}

impl Dfa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an automaton with the non-terminal states `s0`, …, `s{count-1}`.
    pub fn with_states(count: usize) -> Self {
        Dfa {
            definition: Automaton::with_states(count),
            current: None,
        }
    }

    structural_surface!(State);

    /// Removes a state and every transition adjacent to it. The start and
    /// current state are cleared if they are the removed one.
    pub fn remove_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = self.definition.remove_state(state)?;
        if self.current == Some(state) {
            self.current = None;
        }
        Ok(state)
    }

    /// Sets the successor of `(from, letter)` to `to`. Returns the successor
    /// it replaced, if any.
    pub fn set_transition<F, T, L>(&mut self, from: F, to: T, letter: L) -> Result<Option<State>>
    where
        F: AsState,
        T: AsState,
        L: AsLetter,
    {
        self.definition.insert_transition(from, to, letter)
    }

    /// Removes the transition of `(from, letter)` and returns its successor.
    pub fn remove_transition<F, L>(&mut self, from: F, letter: L) -> Result<State>
    where
        F: AsState,
        L: AsLetter,
    {
        self.definition.remove_transition(from, letter)
    }

    /// Designates the start state and moves the current state there.
    pub fn set_start_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = self.definition.set_start_state(state)?;
        self.current = Some(state);
        Ok(state)
    }

    pub fn current_state(&self) -> Option<State> {
        self.current
    }

    pub fn reset_current(&mut self) {
        self.current = self.definition.start_state();
    }

    /// Moves along the transition of the current state on `letter`. On a
    /// dead end the current state does not move.
    pub fn try_step<L: AsLetter>(&mut self, letter: L) -> Result<State> {
        let next = self.definition.next_state(self.current, letter)?;
        self.current = Some(next);
        Ok(next)
    }

    /// Like `try_step`, but `None` for every kind of dead end.
    pub fn step<L: AsLetter>(&mut self, letter: L) -> Option<State> {
        self.try_step(letter).ok()
    }

    /// Whether the current state is terminal; `false` without one.
    pub fn is_in_terminal(&self) -> bool {
        self.current.map_or(false, |s| self.definition.is_terminal(s))
    }
}

impl Recognisable for Dfa {
    fn symbol(&self, symbol: char) -> Result<Letter> {
        self.definition.symbol(symbol)
    }

    fn run<I>(&self, input: I) -> Result<bool>
    where
        I: IntoIterator<Item = Result<Letter>>,
    {
        let mut current = self.definition.start_state();
        if current.is_none() {
            return Err(AutomatonError::NoStartState);
        }
        for letter in input {
            let next = self.definition.next_state(current, letter?)?;
            trace!(
                "{:?} -> {:?}",
                current.and_then(|s| self.definition.state_name(s)),
                self.definition.state_name(next)
            );
            current = Some(next);
        }
        Ok(current.map_or(false, |s| self.definition.is_terminal(s)))
    }
}
