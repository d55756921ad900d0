//! The recording buffer used by generated reverse-mode code.
//!
//! A forward sweep pushes the intermediate values it computes; the matching
//! reverse sweep pops them back in LIFO order. The buffer itself permits any
//! call sequence; keeping pushes and pops balanced across a sweep pair is the
//! generated code's responsibility, and underflow is treated as broken
//! instrumentation rather than a recoverable error.

/// Tape type used for storing values in reverse-mode AD inside loops.
pub struct Tape<T> {
    values: Vec<T>,
}

impl<T> Tape<T> {
    pub fn new() -> Self {
        Tape { values: Vec::new() }
    }

    /// Add `value` to the end of the tape and hand it back, so a forward
    /// sweep can record inline within an expression.
    pub fn push(&mut self, value: T) -> T
    where
        T: Clone,
    {
        self.values.push(value.clone());
        value
    }

    /// Remove the last value from the tape and return it.
    pub fn pop(&mut self) -> T {
        self.values.pop().expect("pop from an empty tape")
    }

    /// The last value on the tape.
    pub fn last(&self) -> &T {
        self.values.last().expect("last on an empty tape")
    }

    /// Mutable access to the last value, for accumulating into it during the
    /// reverse sweep.
    pub fn last_mut(&mut self) -> &mut T {
        self.values.last_mut().expect("last on an empty tape")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for Tape<T> {
    fn default() -> Self {
        Tape::new()
    }
}
