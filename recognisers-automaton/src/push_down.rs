use std::fmt;
use std::slice;

/// A last-in-first-out store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushDown<A> {
    elements: Vec<A>,
}

impl<A> Default for PushDown<A> {
    fn default() -> Self {
        PushDown { elements: Vec::new() }
    }
}

impl<A> PushDown<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: A) {
        self.elements.push(element);
    }

    pub fn pop(&mut self) -> Option<A> {
        self.elements.pop()
    }

    pub fn peek(&self) -> Option<&A> {
        self.elements.last()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Iterates from the bottom to the top of the store.
    pub fn iter(&self) -> slice::Iter<A> {
        self.elements.iter()
    }
}

impl<A> From<Vec<A>> for PushDown<A> {
    /// The last element of the vector ends up on top.
    fn from(elements: Vec<A>) -> Self {
        PushDown { elements }
    }
}

impl<A: fmt::Display> fmt::Display for PushDown<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut buffer = "".to_string();

        let mut iter = self.elements.iter().peekable();

        buffer.push_str("[");
        while let Some(element) = iter.next() {
            buffer.push_str(format!("{}", element).as_str());
            if iter.peek().is_some() {
                buffer.push_str(", ");
            }
        }
        buffer.push_str("]");

        write!(f, "{}", buffer)
    }
}
