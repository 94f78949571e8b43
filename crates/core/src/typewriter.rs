//! Character-by-character reveal of a reply.

/// Reveals a text one character at a time.
///
/// The revealed text is always computed from the full text and the number
/// of characters shown, never accumulated, so it is exactly a prefix of the
/// full text no matter how often [`Typewriter::advance`] is called.
///
/// A text of `N` characters goes through `N + 1` states, from nothing
/// shown to everything shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typewriter {
    full_text: String,
    total: usize,
    shown: usize,
    // Byte length of the first `shown` characters.
    shown_bytes: usize,
}

impl Typewriter {
    /// Creates a typewriter with nothing revealed yet.
    pub fn new<S: Into<String>>(full_text: S) -> Self {
        let full_text = full_text.into();
        let total = full_text.chars().count();
        Self {
            full_text,
            total,
            shown: 0,
            shown_bytes: 0,
        }
    }

    /// Returns the text being revealed.
    #[inline]
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// Returns the part revealed so far.
    #[inline]
    pub fn revealed(&self) -> &str {
        &self.full_text[..self.shown_bytes]
    }

    /// Returns how many characters are revealed.
    #[inline]
    pub fn shown_chars(&self) -> usize {
        self.shown
    }

    /// Returns the length of the full text in characters.
    #[inline]
    pub fn total_chars(&self) -> usize {
        self.total
    }

    /// Returns `true` once the whole text is revealed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.shown == self.total
    }

    /// Reveals one more character. Returns `false` if already complete.
    #[inline]
    pub fn advance(&mut self) -> bool {
        let Some(next) = self.full_text[self.shown_bytes..].chars().next() else {
            return false;
        };
        self.shown += 1;
        self.shown_bytes += next.len_utf8();
        true
    }

    /// Consumes the typewriter, returning the full text.
    #[inline]
    pub fn into_text(self) -> String {
        self.full_text
    }
}
