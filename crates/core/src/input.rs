//! Keyboard handling for the message input.

/// A key relevant to the message input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Return / Enter.
    Enter,
    /// A printable character.
    Char(char),
    /// Anything else.
    Other,
}

/// A key press with the Shift modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    key: Key,
    shift: bool,
}

impl KeyPress {
    /// Creates a key press without modifiers.
    #[inline]
    pub fn new(key: Key) -> Self {
        Self { key, shift: false }
    }

    /// Shorthand for an unmodified Enter.
    #[inline]
    pub fn enter() -> Self {
        Self::new(Key::Enter)
    }

    /// Sets whether Shift is held.
    #[inline]
    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Returns `true` if this press submits the input.
    ///
    /// Only Enter without Shift submits. Shift+Enter is kept for
    /// multi-line input.
    #[inline]
    pub fn submits(&self) -> bool {
        self.key == Key::Enter && !self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_keys() {
        assert!(KeyPress::enter().submits());
        assert!(!KeyPress::enter().with_shift(true).submits());
        assert!(!KeyPress::new(Key::Char('a')).submits());
        assert!(!KeyPress::new(Key::Other).submits());
    }
}
