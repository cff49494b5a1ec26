//! The shared token buffer threaded through resolution and parsing.
//!
//! Each stage removes what it consumes with [`Tokens::gobble`], which shifts
//! the tail left by one. Later stages only ever see what earlier stages
//! left behind.

/// Ordered, shrinking list of raw command-line tokens.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Tokens;
///
/// let mut tokens: Tokens = ["app", "sub", "--flag"].into_iter().collect();
/// assert_eq!(tokens.gobble(1).as_deref(), Some("sub"));
/// assert_eq!(tokens.as_slice(), ["app", "--flag"]);
/// assert_eq!(tokens.gobble(5), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    items: Vec<String>,
}

impl Tokens {
    /// Creates a buffer from anything yielding string-like items.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        items.into_iter().collect()
    }

    /// Number of remaining tokens.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` once every token has been consumed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Token at `index`, if still present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    /// Iterates the remaining tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    /// Remaining tokens as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    /// Removes the token at `at`, shifting later tokens left by one.
    ///
    /// Out-of-range positions leave the buffer unchanged.
    pub fn gobble(&mut self, at: usize) -> Option<String> {
        (at < self.items.len()).then(|| self.items.remove(at))
    }

    /// Consumes the buffer, returning the remaining tokens.
    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: Into<String>> FromIterator<S> for Tokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}
