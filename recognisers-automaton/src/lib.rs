#![warn(unused_extern_crates)]

//! Finite state and push-down recognisers over named states and letters.
//!
//! ```
//! use recognisers_automaton::{Dfa, Recognisable};
//!
//! let mut dfa = Dfa::with_states(2);
//! dfa.add_letter("0").unwrap();
//! dfa.add_letter("1").unwrap();
//! dfa.set_transition("s0", "s1", '1').unwrap();
//! dfa.set_transition("s1", "s1", '0').unwrap();
//! dfa.set_transition("s1", "s1", '1').unwrap();
//! dfa.set_start_state("s0").unwrap();
//! dfa.set_end_state("s1").unwrap();
//!
//! // binary numerals without leading zeros
//! assert!(dfa.accepts("1001"));
//! assert!(!dfa.accepts("01"));
//! ```

#[macro_use]
extern crate log;

#[macro_use]
pub mod automaton;
pub mod error;
pub mod finite_state_automaton;
pub mod nondeterministic;
pub mod push_down;
pub mod push_down_automaton;
pub mod recognisable;
pub mod registry;
pub mod transition;

pub use crate::automaton::Automaton;
pub use crate::error::{AutomatonError, ErrorKind, Result};
pub use crate::finite_state_automaton::Dfa;
pub use crate::nondeterministic::Nfa;
pub use crate::push_down::PushDown;
pub use crate::push_down_automaton::{Acceptance, BracketMatching, Pda, StackPolicy, Unrestricted};
pub use crate::recognisable::Recognisable;
pub use crate::registry::{AsLetter, AsState, Letter, State};
