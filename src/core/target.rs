//! Target triples and architecture-family matching.
//!
//! A target is kept as the opaque string handed to us by the environment.
//! Every decision downstream is made by matching it against shell-style
//! patterns (`x86*`, `*-pc-windows-msvc`, ...) the same way a `case`
//! statement would: patterns are tried in order and the first hit wins.

use std::fmt;

use glob::Pattern;
use serde::Serialize;

/// The browser runtime target. Its test runner cannot spawn the examples
/// binary, so the examples smoke test is never planned for it.
pub const BROWSER_RUNTIME_TARGET: &str = "wasm32-unknown-unknown";

/// An architecture/OS/ABI triple such as `x86_64-unknown-linux-gnu`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    /// Create a target from its triple string.
    pub fn new(triple: impl Into<String>) -> Self {
        Target(triple.into())
    }

    /// Get the triple as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the target against a single shell-style pattern.
    ///
    /// An invalid pattern never matches.
    pub fn matches(&self, pattern: &str) -> bool {
        match Pattern::new(pattern) {
            Ok(p) => p.matches(&self.0),
            Err(e) => {
                tracing::warn!("ignoring invalid target pattern `{}`: {}", pattern, e);
                false
            }
        }
    }

    /// Check the target against any of the given patterns.
    pub fn matches_any(&self, patterns: &[&str]) -> bool {
        patterns.iter().any(|p| self.matches(p))
    }

    /// Select the first table entry whose patterns match this target.
    ///
    /// Returns `None` when nothing matches; callers treat that as "no extra work".
    pub fn classify<T: Copy>(&self, table: &[(&[&str], T)]) -> Option<T> {
        table
            .iter()
            .find(|(patterns, _)| self.matches_any(patterns))
            .map(|(_, family)| *family)
    }

    /// Whether this is any 32-bit WebAssembly target.
    pub fn is_wasm32(&self) -> bool {
        self.matches("wasm32*")
    }

    /// Whether this is exactly the browser runtime target.
    pub fn is_browser_runtime(&self) -> bool {
        self.0 == BROWSER_RUNTIME_TARGET
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Target::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Fam {
        A,
        B,
    }

    #[test]
    fn test_prefix_and_suffix_patterns() {
        let t = Target::new("x86_64-pc-windows-msvc");
        assert!(t.matches("x86*"));
        assert!(t.matches("*-pc-windows-msvc"));
        assert!(!t.matches("i686-*"));
    }

    #[test]
    fn test_infix_wildcard() {
        let t = Target::new("armv7-unknown-linux-gnueabihf");
        assert!(t.matches("armv7-*eabihf"));
        assert!(!Target::new("armv7-unknown-linux-gnueabi").matches("armv7-*eabihf"));
    }

    #[test]
    fn test_classify_first_match_wins() {
        let table: &[(&[&str], Fam)] = &[(&["x86*"], Fam::A), (&["x86_64*", "i686-*"], Fam::B)];

        assert_eq!(Target::new("x86_64-unknown-linux-gnu").classify(table), Some(Fam::A));
        assert_eq!(Target::new("i686-unknown-linux-gnu").classify(table), Some(Fam::B));
        assert_eq!(Target::new("aarch64-apple-darwin").classify(table), None);
    }

    #[test]
    fn test_browser_runtime_is_exact() {
        assert!(Target::new("wasm32-unknown-unknown").is_browser_runtime());
        assert!(!Target::new("wasm32-wasip1").is_browser_runtime());
        assert!(Target::new("wasm32-wasip1").is_wasm32());
    }
}
