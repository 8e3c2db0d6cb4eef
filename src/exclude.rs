//! Exclusion matching for copy and flush.
//!
//! An exclusion set is an ordered list of literal fragments. Each fragment
//! excludes the relative path equal to it and every path nested under it,
//! so `"cache"` excludes `cache` and `cache/sub/file.txt` but not
//! `cached/file.txt`.
//!
//! # Example
//!
//! ```
//! use tempstore::ExclusionMatcher;
//!
//! let matcher = ExclusionMatcher::new(["cache"])?;
//! assert!(matcher.matches("cache"));
//! assert!(!matcher.matches("cached"));
//! # Ok::<(), tempstore::Error>(())
//! ```

use crate::error::Result;
use regex::Regex;
use std::path::{MAIN_SEPARATOR_STR, Path};

/// A compiled exclusion predicate over paths relative to a traversal root.
///
/// All fragments are folded into one anchored alternation
/// `^(?:f1(?:SEP.*)?|f2(?:SEP.*)?|...)$` where every fragment is escaped
/// so that it only ever matches itself textually.
#[derive(Debug, Clone)]
pub struct ExclusionMatcher {
    pattern: Option<Regex>,
}

impl ExclusionMatcher {
    /// Compile a matcher from the given fragments.
    ///
    /// An empty fragment list produces a matcher that excludes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](crate::Error::Pattern) if the combined
    /// pattern exceeds the regex engine's size limits.
    pub fn new<I, S>(fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let separator = regex::escape(MAIN_SEPARATOR_STR);
        let alternatives: Vec<String> = fragments
            .into_iter()
            .map(|fragment| format!("{}(?:{separator}.*)?", regex::escape(fragment.as_ref())))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self::none());
        }

        // (?s) lets `.*` run across newlines, which are legal in file names
        let pattern = Regex::new(&format!("(?s)^(?:{})$", alternatives.join("|")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// A matcher that excludes nothing.
    pub fn none() -> Self {
        Self { pattern: None }
    }

    /// Whether this matcher can ever match.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Test a relative path rendered as a string.
    pub fn matches(&self, relative: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(relative))
    }

    /// Test a relative path. Non UTF-8 components are matched lossily.
    pub fn matches_path(&self, relative: &Path) -> bool {
        self.pattern.is_some() && self.matches(&relative.to_string_lossy())
    }
}

impl Default for ExclusionMatcher {
    fn default() -> Self {
        Self::none()
    }
}
