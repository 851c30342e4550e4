use super::Rule;
use crate::pr::diff::AddedLine;

/// Debug output left in the change.
///
/// Lines carrying a `//` comment are skipped, on the assumption the call is
/// deliberate and explained.
pub struct DebugPrint;

impl Rule for DebugPrint {
    fn name(&self) -> &'static str {
        "debug-print"
    }

    fn comment(&self) -> &'static str {
        "Remove console.log before merging"
    }

    fn matches(&self, line: &AddedLine<'_>) -> bool {
        line.text.contains("console.log") && !line.text.contains("//")
    }
}

/// TODO/FIXME markers introduced by the change.
pub struct TodoMarker;

impl Rule for TodoMarker {
    fn name(&self) -> &'static str {
        "todo-marker"
    }

    fn comment(&self) -> &'static str {
        "Address TODO/FIXME comment"
    }

    fn matches(&self, line: &AddedLine<'_>) -> bool {
        line.text.contains("TODO") || line.text.contains("FIXME")
    }
}

/// Explicit `any` annotations in TypeScript sources.
pub struct UntypedAny;

impl Rule for UntypedAny {
    fn name(&self) -> &'static str {
        "untyped-any"
    }

    fn comment(&self) -> &'static str {
        "Avoid \"any\" type, be more specific"
    }

    fn matches(&self, line: &AddedLine<'_>) -> bool {
        line.file.ends_with(".ts") && line.text.contains(": any")
    }
}
