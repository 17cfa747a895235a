use crate::automaton::Automaton;
use crate::error::{AutomatonError, Result};
use crate::push_down::PushDown;
use crate::recognisable::Recognisable;
use crate::registry::{AsLetter, AsState, Letter, State};

/// What a push-down run looks like once the input is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Acceptance {
    pub in_terminal: bool,
    pub stack_empty: bool,
}

/// Decides how a `Pda` uses its stack and when a finished run is accepted.
pub trait StackPolicy {
    /// Called with the name of every letter read, before the letter's
    /// transition fires. An error ends the run.
    fn consume(&self, symbol: &str, stack: &mut PushDown<String>) -> Result<()>;

    /// Accepts runs that end in a terminal state with an empty stack.
    fn accepts(&self, acceptance: Acceptance) -> bool {
        acceptance.in_terminal && acceptance.stack_empty
    }
}

/// Balanced nesting of bracket pairs.
///
/// An opening bracket pushes its closer. A closing bracket pops and must
/// find itself on top of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketMatching {
    pairs: Vec<(String, String)>,
}

impl BracketMatching {
    pub fn new<I, O, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, C)>,
        O: Into<String>,
        C: Into<String>,
    {
        BracketMatching {
            pairs: pairs
                .into_iter()
                .map(|(open, close)| (open.into(), close.into()))
                .collect(),
        }
    }

    fn closer(&self, symbol: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(open, _)| open == symbol)
            .map(|(_, close)| close.as_str())
    }

    fn is_closer(&self, symbol: &str) -> bool {
        self.pairs.iter().any(|(_, close)| close == symbol)
    }
}

impl Default for BracketMatching {
    /// `()`, `{}` and `[]`.
    fn default() -> Self {
        BracketMatching::new(vec![("(", ")"), ("{", "}"), ("[", "]")])
    }
}

impl StackPolicy for BracketMatching {
    fn consume(&self, symbol: &str, stack: &mut PushDown<String>) -> Result<()> {
        if let Some(close) = self.closer(symbol) {
            stack.push(close.to_string());
        } else if self.is_closer(symbol) {
            match stack.pop() {
                None => return Err(AutomatonError::EmptyStack),
                Some(ref popped) if popped == symbol => (),
                Some(popped) => {
                    let error = AutomatonError::StackMismatch {
                        read: symbol.to_string(),
                        popped: popped.clone(),
                    };
                    stack.push(popped);
                    return Err(error);
                }
            }
        }
        Ok(())
    }
}

/// Leaves the stack to the caller; runs are accepted like in a `Dfa`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unrestricted;

impl StackPolicy for Unrestricted {
    fn consume(&self, _: &str, _: &mut PushDown<String>) -> Result<()> {
        Ok(())
    }

    fn accepts(&self, acceptance: Acceptance) -> bool {
        acceptance.in_terminal
    }
}

/// Reads `letter` in the configuration `(current, stack)`. The configuration
/// only moves if both the policy and the transition agree.
fn advance<P: StackPolicy>(
    definition: &Automaton<State>,
    policy: &P,
    current: &mut Option<State>,
    stack: &mut PushDown<String>,
    letter: Letter,
) -> Result<State> {
    let next = definition.next_state(*current, letter)?;
    let symbol = definition.letter_name(letter).unwrap_or_default();
    policy.consume(symbol, stack)?;
    *current = Some(next);
    Ok(next)
}

/// A deterministic automaton with a stack of strings.
///
/// The transition table has a single successor per `(state, letter)` pair,
/// like a `Dfa`. What the stack does while reading and which runs are
/// accepted is up to the `StackPolicy`.
///
/// ```
/// use recognisers_automaton::{Pda, Recognisable};
///
/// let mut pda = Pda::with_states(1);
/// for c in "()[]{}x".chars() {
///     pda.add_letter(c.to_string()).unwrap();
///     pda.set_transition("s0", "s0", c).unwrap();
/// }
/// pda.set_start_state("s0").unwrap();
/// pda.set_end_state("s0").unwrap();
///
/// assert!(pda.accepts("(x[x]{})"));
/// assert!(!pda.accepts("(x[x)]"));
/// assert!(!pda.accepts("(("));
/// ```
#[derive(Debug, Default)]
pub struct Pda<P = BracketMatching> {
    definition: Automaton<State>,
    policy: P,
    current: Option<State>,
    stack: PushDown<String>,
}

impl Pda {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an automaton with the non-terminal states `s0`, …, `s{count-1}`.
    pub fn with_states(count: usize) -> Self {
        Pda::with_states_and_policy(count, BracketMatching::default())
    }
}

impl<P: StackPolicy> Pda<P> {
    pub fn with_policy(policy: P) -> Self {
        Self::with_states_and_policy(0, policy)
    }

    pub fn with_states_and_policy(count: usize, policy: P) -> Self {
        Pda {
            definition: Automaton::with_states(count),
            policy,
            current: None,
            stack: PushDown::new(),
        }
    }

    structural_surface!(State);

    pub fn policy(&self) -> &P {
        &self.policy
    }

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

    pub fn remove_transition<F, L>(&mut self, from: F, letter: L) -> Result<State>
    where
        F: AsState,
        L: AsLetter,
    {
        self.definition.remove_transition(from, letter)
    }

    /// Designates the start state and moves the current state there. The
    /// stack is left alone.
    pub fn set_start_state<S: AsState>(&mut self, state: S) -> Result<State> {
        let state = self.definition.set_start_state(state)?;
        self.current = Some(state);
        Ok(state)
    }

    pub fn current_state(&self) -> Option<State> {
        self.current
    }

    pub fn stack(&self) -> &PushDown<String> {
        &self.stack
    }

    pub fn push_stack<S: Into<String>>(&mut self, value: S) {
        self.stack.push(value.into());
    }

    /// Pops the top of the stack; the empty string if there is nothing to pop.
    pub fn pop_stack(&mut self) -> String {
        self.stack.pop().unwrap_or_default()
    }

    pub fn try_pop_stack(&mut self) -> Result<String> {
        self.stack.pop().ok_or(AutomatonError::EmptyStack)
    }

    pub fn is_stack_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Empties the stack and moves back to the start state.
    pub fn reset_current(&mut self) {
        self.stack.clear();
        self.current = self.definition.start_state();
    }

    /// Moves along the transition of the current state on `letter` without
    /// touching the stack. On a dead end the current state does not move.
    pub fn try_step<L: AsLetter>(&mut self, letter: L) -> Result<State> {
        let next = self.definition.next_state(self.current, letter)?;
        self.current = Some(next);
        Ok(next)
    }

    pub fn step<L: AsLetter>(&mut self, letter: L) -> Option<State> {
        self.try_step(letter).ok()
    }

    /// Reads `letter` like a recognition run does: the policy works on the
    /// stack, then the transition fires. On an error neither moves.
    pub fn feed<L: AsLetter>(&mut self, letter: L) -> Result<State> {
        let letter = self.definition.letter(letter)?;
        advance(
            &self.definition,
            &self.policy,
            &mut self.current,
            &mut self.stack,
            letter,
        )
    }

    pub fn is_in_terminal(&self) -> bool {
        self.current.map_or(false, |s| self.definition.is_terminal(s))
    }

    /// Both parts of the verdict for the current configuration.
    pub fn current_acceptance(&self) -> Acceptance {
        Acceptance {
            in_terminal: self.is_in_terminal(),
            stack_empty: self.stack.is_empty(),
        }
    }

    /// Reads `text` in a fresh run and reports both parts of the verdict.
    pub fn acceptance(&self, text: &str) -> Result<Acceptance> {
        self.drive(text.chars().map(|c| self.symbol(c)))
    }

    fn drive<I>(&self, input: I) -> Result<Acceptance>
    where
        I: IntoIterator<Item = Result<Letter>>,
    {
        let mut current = self.definition.start_state();
        if current.is_none() {
            return Err(AutomatonError::NoStartState);
        }
        let mut stack = PushDown::new();
        for letter in input {
            advance(&self.definition, &self.policy, &mut current, &mut stack, letter?)?;
            trace!("stack {}", stack);
        }
        Ok(Acceptance {
            in_terminal: current.map_or(false, |s| self.definition.is_terminal(s)),
            stack_empty: stack.is_empty(),
        })
    }
}

impl<P: StackPolicy> Recognisable for Pda<P> {
    fn symbol(&self, symbol: char) -> Result<Letter> {
        self.definition.symbol(symbol)
    }

    fn run<I>(&self, input: I) -> Result<bool>
    where
        I: IntoIterator<Item = Result<Letter>>,
    {
        let acceptance = self.drive(input)?;
        Ok(self.policy.accepts(acceptance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn brackets() -> Pda {
        let mut pda = Pda::with_states(1);
        for c in "()[]{}".chars() {
            pda.add_letter(c.to_string()).unwrap();
            pda.set_transition("s0", "s0", c).unwrap();
        }
        pda.set_start_state("s0").unwrap();
        pda.set_end_state("s0").unwrap();
        pda
    }

    #[test]
    fn balance() {
        let pda = brackets();
        assert!(pda.accepts("(())"));
        assert!(pda.accepts("{[()()]}"));
        assert!(pda.accepts(""));
        assert!(!pda.accepts("(()"));
        assert!(!pda.accepts(")("));
        assert!(!pda.accepts("([)]"));
    }

    #[test]
    fn rejection_reasons() {
        let pda = brackets();
        assert_eq!(
            pda.acceptance("(()"),
            Ok(Acceptance { in_terminal: true, stack_empty: false })
        );
        assert_eq!(pda.try_accepts(")("), Err(AutomatonError::EmptyStack));
        assert_eq!(
            pda.try_accepts("([)]"),
            Err(AutomatonError::StackMismatch { read: ")".into(), popped: "]".into() })
        );
        assert_eq!(pda.try_accepts("(a)").unwrap_err().kind(), ErrorKind::UnknownSymbol);
    }

    #[test]
    fn balanced_but_not_terminal() {
        let mut pda = Pda::with_states(1);
        for c in "()".chars() {
            pda.add_letter(c.to_string()).unwrap();
            pda.set_transition("s0", "s0", c).unwrap();
        }
        pda.set_start_state("s0").unwrap();

        assert_eq!(
            pda.acceptance("()"),
            Ok(Acceptance { in_terminal: false, stack_empty: true })
        );
        assert!(!pda.accepts("()"));
    }

    #[test]
    fn brackets_need_transitions_too() {
        let mut pda = brackets();
        pda.remove_transition("s0", "]").unwrap();
        assert!(pda.accepts("()"));
        assert_eq!(
            pda.try_accepts("[]"),
            Err(AutomatonError::MissingTransition("]".into()))
        );
    }

    #[test]
    fn cyrillic_text() {
        let mut pda = Pda::with_states(1);
        for c in ('А'..='я').chain("()[]{}".chars()) {
            pda.add_letter(c.to_string()).unwrap();
            pda.set_transition("s0", "s0", c).unwrap();
        }
        pda.set_start_state("s0").unwrap();
        pda.set_end_state("s0").unwrap();

        assert!(pda.accepts("((({Евреи})))"));
        assert!(pda.accepts("Мир[(дом)]"));
        assert!(!pda.accepts("((({Евреи}))"));
        assert!(!pda.accepts("({Евреи)}"));
        assert!(!pda.accepts("ёж"));
    }

    #[test]
    fn stack_operations() {
        let mut pda = brackets();
        assert!(pda.is_stack_empty());
        assert_eq!(pda.pop_stack(), "");
        assert_eq!(pda.try_pop_stack(), Err(AutomatonError::EmptyStack));

        pda.push_stack("x");
        pda.push_stack(String::from("y"));
        assert_eq!(pda.stack().to_string(), "[x, y]");
        assert_eq!(pda.pop_stack(), "y");
        assert_eq!(pda.try_pop_stack(), Ok("x".to_string()));
        assert!(pda.is_stack_empty());
    }

    #[test]
    fn feeding_and_resetting() {
        let mut pda = brackets();
        let s0 = pda.state("s0").unwrap();

        assert_eq!(pda.feed('('), Ok(s0));
        assert_eq!(pda.feed('['), Ok(s0));
        assert_eq!(pda.stack().to_string(), "[), ]]");
        assert_eq!(
            pda.feed(')'),
            Err(AutomatonError::StackMismatch { read: ")".into(), popped: "]".into() })
        );
        // the mismatched closer is put back
        assert_eq!(pda.stack().len(), 2);
        assert_eq!(pda.feed(']'), Ok(s0));
        assert!(!pda.current_acceptance().stack_empty);

        pda.reset_current();
        assert!(pda.is_stack_empty());
        assert_eq!(pda.current_state(), Some(s0));
        assert!(pda.current_acceptance().in_terminal);
    }

    #[test]
    fn stepping_ignores_the_stack() {
        let mut pda = brackets();
        assert_eq!(pda.step(')'), pda.state("s0").ok());
        assert!(pda.is_stack_empty());
        assert_eq!(pda.step('x'), None);
    }

    #[test]
    fn recognition_leaves_the_configuration_alone() {
        let mut pda = brackets();
        pda.feed('{').unwrap();
        assert!(pda.accepts("{}"));
        assert_eq!(pda.stack().peek().map(String::as_str), Some("}"));
    }

    #[test]
    fn removing_the_current_state() {
        let mut pda = brackets();
        pda.remove_state("s0").unwrap();
        assert_eq!(pda.current_state(), None);
        assert_eq!(pda.start_state(), None);
        assert!(pda.definition().transitions().is_empty());
        assert_eq!(pda.feed('('), Err(AutomatonError::NoCurrentState));
        assert_eq!(pda.try_accepts(""), Err(AutomatonError::NoStartState));
    }

    #[test]
    fn unrestricted_stack() {
        let mut pda = Pda::with_states_and_policy(2, Unrestricted);
        pda.add_letter("(").unwrap();
        pda.set_transition("s0", "s1", "(").unwrap();
        pda.set_start_state("s0").unwrap();
        pda.set_end_state("s1").unwrap();

        assert!(pda.accepts("("));
        assert!(!pda.accepts(""));
        pda.feed('(').unwrap();
        assert!(pda.is_stack_empty());
    }

    #[test]
    fn policy_without_states() {
        let mut pda = Pda::with_policy(Unrestricted);
        assert_eq!(pda.policy(), &Unrestricted);
        assert_eq!(pda.definition().state_count(), 0);

        pda.add_state("q", true).unwrap();
        pda.set_start_state("q").unwrap();
        pda.push_stack("left over");
        assert!(pda.accepts(""));
        assert!(pda.current_acceptance().in_terminal);
        assert!(!pda.current_acceptance().stack_empty);

        let brackets = Pda::with_policy(BracketMatching::new(vec![("<", ">")]));
        assert_eq!(brackets.policy(), &BracketMatching::new(vec![("<", ">")]));
    }

    #[test]
    fn custom_pairs() {
        let mut pda = Pda::with_states_and_policy(1, BracketMatching::new(vec![("<", ">")]));
        for c in "<>()".chars() {
            pda.add_letter(c.to_string()).unwrap();
            pda.set_transition("s0", "s0", c).unwrap();
        }
        pda.set_start_state("s0").unwrap();
        pda.set_end_state("s0").unwrap();

        assert!(pda.accepts("<<>>"));
        assert!(pda.accepts(")("));
        assert!(!pda.accepts("<"));
    }
}
