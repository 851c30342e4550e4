use super::Rule;
use crate::pr::diff::AddedLine;

/// Password handling that does not mention hashing on the same line.
pub struct PasswordHandling;

impl Rule for PasswordHandling {
    fn name(&self) -> &'static str {
        "password-handling"
    }

    fn comment(&self) -> &'static str {
        "Ensure password handling is secure"
    }

    fn matches(&self, line: &AddedLine<'_>) -> bool {
        line.text.contains("password") && !line.text.contains("hash")
    }
}
