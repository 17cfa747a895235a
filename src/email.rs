//! A deterministic automaton for e-mail addresses of the shape
//! `name@domain.com` or `name@domain.ru`.
//!
//! The local part starts with a lowercase letter, after which lowercase
//! letters, digits, `_` and `-` may follow; the domain consists of the same
//! characters.

use recognisers_automaton::{Dfa, Recognisable, Result};

const SEPARATORS: [char; 2] = ['_', '-'];

fn letters() -> impl Iterator<Item = char> {
    'a'..='z'
}

fn digits() -> impl Iterator<Item = char> {
    '0'..='9'
}

/// Builds the address automaton with the states `s0`, …, `s8`.
pub fn automaton() -> Result<Dfa> {
    let mut dfa = Dfa::with_states(9);

    for c in letters()
        .chain(digits())
        .chain(vec!['.', '@'])
        .chain(SEPARATORS.iter().cloned())
    {
        dfa.add_letter(c.to_string())?;
    }

    for c in letters() {
        dfa.set_transition("s0", "s1", c)?;
    }
    for c in letters().chain(digits()).chain(SEPARATORS.iter().cloned()) {
        dfa.set_transition("s1", "s1", c)?;
        dfa.set_transition("s2", "s2", c)?;
    }
    dfa.set_transition("s1", "s2", '@')?;
    dfa.set_transition("s2", "s3", '.')?;

    // top-level domains
    for &(from, to, c) in &[
        ("s3", "s4", 'c'),
        ("s4", "s5", 'o'),
        ("s5", "s6", 'm'),
        ("s3", "s7", 'r'),
        ("s7", "s8", 'u'),
    ] {
        dfa.set_transition(from, to, c)?;
    }

    dfa.set_start_state("s0")?;
    dfa.set_end_state("s6")?;
    dfa.set_end_state("s8")?;
    Ok(dfa)
}

/// Whether `address` is a well-formed address. The empty string is not.
///
/// ```
/// assert_eq!(recognisers::email::check("user_1@mail.ru"), Ok(true));
/// assert_eq!(recognisers::email::check("User@mail.ru"), Ok(false));
/// ```
pub fn check(address: &str) -> Result<bool> {
    Ok(automaton()?.accepts(address))
}
