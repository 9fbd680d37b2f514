//! Case-insensitive substring search terms.
//!
//! Storage adapters translate a [`SearchTerm`] into an `ILIKE` pattern; the
//! in-memory predicate [`SearchTerm::matches`] gives fixtures the same
//! semantics. No tokenisation or ranking is applied.

/// A raw search term.
///
/// The empty term matches everything.
///
/// # Examples
/// ```
/// use trio::domain::SearchTerm;
///
/// let term = SearchTerm::new("hop");
/// assert!(term.matches("The Musical Hop"));
/// assert!(!term.matches("Park Square Live Music"));
/// assert!(SearchTerm::new("").matches("anything"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Wrap a term exactly as submitted.
    #[must_use]
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    /// The term as submitted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0.to_lowercase())
    }

    /// `ILIKE` pattern matching the term anywhere, with LIKE metacharacters
    /// escaped using the default backslash escape.
    ///
    /// # Examples
    /// ```
    /// use trio::domain::SearchTerm;
    ///
    /// assert_eq!(SearchTerm::new("50%_off").like_pattern(), r"%50\%\_off%");
    /// ```
    #[must_use]
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.0.len() + 2);
        pattern.push('%');
        for ch in self.0.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("band", "Guns N Petals BAND", true)]
    #[case("BaNd", "the band", true)]
    #[case("", "", true)]
    #[case("", "Matt Quevedo", true)]
    #[case("xyz", "Matt Quevedo", false)]
    #[case("ü", "Über Lounge", true)]
    fn matching_is_case_insensitive(#[case] term: &str, #[case] haystack: &str, #[case] hit: bool) {
        assert_eq!(SearchTerm::new(term).matches(haystack), hit);
    }

    #[rstest]
    #[case("", "%%")]
    #[case("music", "%music%")]
    #[case(r"a\b", r"%a\\b%")]
    fn like_pattern_escapes_metacharacters(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(SearchTerm::new(term).like_pattern(), expected);
    }
}
