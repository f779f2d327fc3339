use glob::{MatchOptions, Pattern};

/// Pattern used when none (or an empty one) is given
pub const DEFAULT_PATTERN: &str = "*.sql";

/// `*` crosses directory separators and dotfiles are not special
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Decides whether a repository-relative path belongs in a release.
///
/// Patterns are shell-style globs evaluated against the whole path:
/// `*` matches any run of characters including `/`, `?` matches a single
/// character and `[...]` / `[!...]` match character classes.
#[derive(Debug, Clone)]
pub struct FileSelector {
    pattern: String,
    compiled: Option<Pattern>,
}

impl FileSelector {
    /// Build a selector; an empty pattern means [DEFAULT_PATTERN]
    pub fn new(pattern: &str) -> Self {
        let pattern = if pattern.trim().is_empty() {
            DEFAULT_PATTERN
        } else {
            pattern
        };
        // Malformed patterns such as an unterminated `[` match literally
        let compiled = Pattern::new(pattern)
            .or_else(|_| Pattern::new(&Pattern::escape(pattern)))
            .ok();

        FileSelector {
            pattern: pattern.to_string(),
            compiled,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, path: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|p| p.matches_with(path, MATCH_OPTIONS))
    }
}

impl Default for FileSelector {
    fn default() -> Self {
        FileSelector::new(DEFAULT_PATTERN)
    }
}

/// Match a single path against a glob pattern
pub fn matches(path: &str, pattern: &str) -> bool {
    FileSelector::new(pattern).matches(path)
}
