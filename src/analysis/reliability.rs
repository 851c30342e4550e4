use super::Rule;
use crate::pr::diff::AddedLine;

/// `await` with no error handling in sight.
///
/// Only the line itself is inspected for `try`; a surrounding multi-line
/// try block is not seen.
pub struct UnguardedAwait;

impl Rule for UnguardedAwait {
    fn name(&self) -> &'static str {
        "unguarded-await"
    }

    fn comment(&self) -> &'static str {
        "Consider error handling for async operation"
    }

    fn matches(&self, line: &AddedLine<'_>) -> bool {
        line.text.contains("await") && !line.text.contains("try")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::added;

    #[test]
    fn test_detects_bare_await() {
        assert!(UnguardedAwait.matches(&added("src/api.ts", "const res = await fetch(url);")));
    }

    #[test]
    fn test_same_line_try_suppresses() {
        assert!(!UnguardedAwait.matches(&added("src/api.ts", "try { await fetch(url); } catch {}")));
    }

    #[test]
    fn test_multi_line_try_is_not_seen() {
        // The enclosing block lives on another line.
        assert!(UnguardedAwait.matches(&added("src/api.ts", "await fetch(url);")));
    }
}
