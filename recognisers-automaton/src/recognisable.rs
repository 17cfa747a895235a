use crate::error::{AutomatonError, Result};
use crate::registry::Letter;

/// Automata that decide whether a word belongs to their language.
///
/// Every run starts from a fresh configuration built from the start state,
/// so recognising a word never disturbs the automaton's own current
/// configuration.
pub trait Recognisable {
    /// Resolves one input character to the letter of the same name.
    fn symbol(&self, symbol: char) -> Result<Letter>;

    /// Feeds `input` to a fresh run. `Ok(false)` means the run consumed
    /// the whole input but ended outside the language; an error means it
    /// got stuck on the way.
    fn run<I>(&self, input: I) -> Result<bool>
    where
        I: IntoIterator<Item = Result<Letter>>;

    /// Reads `text` one character at a time. Multi-character letters are
    /// only reachable through `try_check_chain`.
    fn try_accepts(&self, text: &str) -> Result<bool> {
        self.run(text.chars().map(|c| self.symbol(c)))
    }

    fn try_check_chain(&self, chain: &[Letter]) -> Result<bool> {
        self.run(chain.iter().cloned().map(Ok))
    }

    /// Whether `text` belongs to the language; every dead end counts as a
    /// rejection.
    fn accepts(&self, text: &str) -> bool {
        collapse(self.try_accepts(text), text)
    }

    fn check_chain(&self, chain: &[Letter]) -> bool {
        collapse(self.try_check_chain(chain), chain)
    }
}

fn collapse<W: ::std::fmt::Debug + ?Sized>(verdict: Result<bool>, word: &W) -> bool {
    match verdict {
        Ok(accepted) => {
            debug!("{:?}: {}", word, if accepted { "accepted" } else { "rejected" });
            accepted
        }
        Err(AutomatonError::NoStartState) => {
            warn!("{:?}: rejected, the automaton has no start state", word);
            false
        }
        Err(e) => {
            debug!("{:?}: rejected ({})", word, e);
            false
        }
    }
}
