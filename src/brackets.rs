//! A push-down automaton checking that `()`, `[]` and `{}` are balanced in
//! a text.

use std::str::FromStr;

use recognisers_automaton::{Pda, Recognisable, Result};

const BRACKETS: &str = "()[]{}";
const PUNCTUATION: &str = " .,;:!?-\"'«»";

/// The characters a text may consist of besides the brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alphabet {
    /// Printable ASCII, space included.
    Ascii,
    /// Russian letters, digits, space and common punctuation.
    Cyrillic,
}

impl FromStr for Alphabet {
    type Err = ();

    fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(Alphabet::Ascii),
            "cyrillic" => Ok(Alphabet::Cyrillic),
            _ => Err(()),
        }
    }
}

impl Alphabet {
    fn characters(self) -> Vec<char> {
        match self {
            Alphabet::Ascii => (' '..='~').collect(),
            Alphabet::Cyrillic => ('А'..='я')
                .chain(vec!['Ё', 'ё'])
                .chain('0'..='9')
                .chain(PUNCTUATION.chars())
                .chain(BRACKETS.chars())
                .collect(),
        }
    }
}

/// Builds a single-state automaton over `alphabet` in which every character
/// loops on `s0`, so only the bracket structure decides.
pub fn automaton(alphabet: Alphabet) -> Result<Pda> {
    let mut pda = Pda::with_states(1);
    for c in alphabet.characters() {
        pda.add_letter(c.to_string())?;
        pda.set_transition("s0", "s0", c)?;
    }
    pda.set_start_state("s0")?;
    pda.set_end_state("s0")?;
    Ok(pda)
}

/// Whether the brackets in a Russian `text` are balanced.
///
/// ```
/// assert_eq!(recognisers::brackets::check("((({Евреи})))"), Ok(true));
/// assert_eq!(recognisers::brackets::check("({)}"), Ok(false));
/// ```
pub fn check(text: &str) -> Result<bool> {
    Ok(automaton(Alphabet::Cyrillic)?.accepts(text))
}
