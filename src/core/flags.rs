//! Append-only toolchain flag sets.

use std::fmt;

use serde::Serialize;

/// An ordered sequence of compiler flag tokens.
///
/// Flags are only ever appended. Extending a set produces a new set whose
/// token sequence starts with the original one, so a composed set is always
/// an in-order superset of the flags it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FlagSet {
    tokens: Vec<String>,
}

impl FlagSet {
    /// Create an empty flag set.
    pub fn new() -> Self {
        FlagSet { tokens: Vec::new() }
    }

    /// Parse a whitespace-separated flag string, as found in `RUSTFLAGS`.
    pub fn parse(flags: &str) -> Self {
        let mut set = FlagSet::new();
        set.append_str(flags);
        set
    }

    /// Append every whitespace-separated token of `flags`.
    pub fn append_str(&mut self, flags: &str) {
        self.tokens
            .extend(flags.split_whitespace().map(str::to_string));
    }

    /// Return a new set with `other` appended after this one.
    pub fn extended(&self, other: &FlagSet) -> FlagSet {
        let mut tokens = self.tokens.clone();
        tokens.extend(other.tokens.iter().cloned());
        FlagSet { tokens }
    }

    /// Whether `prefix`'s tokens appear, in order, at the start of this set.
    pub fn starts_with(&self, prefix: &FlagSet) -> bool {
        self.tokens.starts_with(&prefix.tokens)
    }

    /// Whether the set contains the given token.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Get the tokens.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Render as a single space-separated string for the child environment.
    pub fn to_env_string(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_env_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collapses_whitespace() {
        let flags = FlagSet::parse("  -C opt-level=3\t-Z  plt=yes ");
        assert_eq!(flags.tokens(), ["-C", "opt-level=3", "-Z", "plt=yes"]);
        assert_eq!(flags.to_env_string(), "-C opt-level=3 -Z plt=yes");
    }

    #[test]
    fn test_parse_empty() {
        assert!(FlagSet::parse("").is_empty());
        assert!(FlagSet::parse("   ").is_empty());
    }

    #[test]
    fn test_extended_leaves_original_untouched() {
        let base = FlagSet::parse("-D warnings");
        let extra = FlagSet::parse("-C target-feature=+avx");
        let combined = base.extended(&extra);

        assert_eq!(base.len(), 2);
        assert_eq!(combined.len(), 4);
        assert!(combined.starts_with(&base));
        assert!(combined.contains("target-feature=+avx"));
    }
}
