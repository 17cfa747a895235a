#![warn(unused_extern_crates)]

pub use recognisers_automaton::*;

pub mod brackets;
pub mod email;
