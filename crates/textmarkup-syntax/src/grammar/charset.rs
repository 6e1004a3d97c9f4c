use std::ops::RangeInclusive;

/// A set of Unicode scalars matched by a `CharacterSet` rule.
///
/// Built from explicit characters and inclusive ranges, optionally negated.
///
/// ```
/// use textmarkup_syntax::CharacterSet;
///
/// let digits = CharacterSet::range('0', '9');
/// assert!(digits.contains('7'));
/// assert!(!digits.negated().contains('7'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterSet {
    ranges: Vec<RangeInclusive<char>>,
    negated: bool,
}

impl CharacterSet {
    /// The empty set. Matches nothing until extended.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exactly the characters of `chars`.
    pub fn any_of(chars: &str) -> Self {
        Self::new().with_chars(chars)
    }

    /// Everything except the characters of `chars`.
    pub fn none_of(chars: &str) -> Self {
        Self::any_of(chars).negated()
    }

    pub fn range(low: char, high: char) -> Self {
        Self::new().with_range(low, high)
    }

    pub fn with_chars(mut self, chars: &str) -> Self {
        self.ranges.extend(chars.chars().map(|c| c..=c));
        self
    }

    pub fn with_range(mut self, low: char, high: char) -> Self {
        self.ranges.push(low..=high);
        self
    }

    /// The complement of this set.
    pub fn negated(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn contains(&self, c: char) -> bool {
        self.ranges.iter().any(|r| r.contains(&c)) != self.negated
    }
}
