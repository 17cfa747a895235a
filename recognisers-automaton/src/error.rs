use thiserror::Error;

/// Reasons for an operation on an automaton to fail or for a run to end in a
/// dead end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomatonError {
    #[error("the name `{0}` is already taken")]
    DuplicateName(String),
    #[error("state does not belong to this automaton")]
    ForeignState,
    #[error("letter does not belong to this automaton")]
    ForeignLetter,
    #[error("no state named `{0}`")]
    UnknownState(String),
    #[error("no letter named `{0}`")]
    UnknownLetter(String),
    #[error("no start state has been set")]
    NoStartState,
    #[error("the run has no current state")]
    NoCurrentState,
    #[error("no transition for the current configuration and letter `{0}`")]
    MissingTransition(String),
    #[error("input symbol `{0}` is not in the alphabet")]
    UnknownSymbol(char),
    #[error("popped `{popped}` while reading `{read}`")]
    StackMismatch { read: String, popped: String },
    #[error("nothing to pop")]
    EmptyStack,
}

/// The closed set of failure categories an automaton distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateName,
    ForeignReference,
    MissingTransition,
    UnknownSymbol,
    EmptyStack,
}

impl AutomatonError {
    pub fn kind(&self) -> ErrorKind {
        use self::AutomatonError::*;
        match *self {
            DuplicateName(_) => ErrorKind::DuplicateName,
            ForeignState | ForeignLetter | UnknownState(_) | UnknownLetter(_) => {
                ErrorKind::ForeignReference
            }
            // a run without a position has nowhere to go
            NoStartState | NoCurrentState | MissingTransition(_) => ErrorKind::MissingTransition,
            UnknownSymbol(_) => ErrorKind::UnknownSymbol,
            // a closer that pops the wrong opener is the same dead end as
            // popping nothing
            StackMismatch { .. } | EmptyStack => ErrorKind::EmptyStack,
        }
    }

    /// Whether the error was caused by the input rather than by the way the
    /// automaton was put together.
    pub fn is_rejection(&self) -> bool {
        match self.kind() {
            ErrorKind::MissingTransition | ErrorKind::UnknownSymbol | ErrorKind::EmptyStack => true,
            ErrorKind::DuplicateName | ErrorKind::ForeignReference => false,
        }
    }
}

pub type Result<T> = ::std::result::Result<T, AutomatonError>;
