pub mod reliability;
pub mod security;
pub mod style;

use tracing::{debug, instrument};

use crate::pr::diff::{self, AddedLine};
use crate::report::Finding;

/// A textual check run against every added line of a diff.
///
/// Rules are independent: each one that matches a line contributes its own
/// finding, so one line can carry several comments.
pub trait Rule: Send + Sync {
    /// Short identifier used in logs (e.g. "debug-print")
    fn name(&self) -> &'static str;

    /// Review comment attached to a matching line.
    fn comment(&self) -> &'static str;

    /// Whether `line` should get this rule's comment.
    fn matches(&self, line: &AddedLine<'_>) -> bool;
}

/// The built-in rule set, in the order their comments appear per line.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(style::DebugPrint),
        Box::new(style::TodoMarker),
        Box::new(style::UntypedAny),
        Box::new(security::PasswordHandling),
        Box::new(reliability::UnguardedAwait),
    ]
}

/// Run the built-in rules over a unified diff.
pub fn analyze(raw_diff: &str) -> Vec<Finding> {
    analyze_with(raw_diff, &default_rules())
}

/// Run `rules` over every added line of `raw_diff`.
///
/// Findings come out in diff order (file, then line), and for a single
/// line in rule order. No deduplication. Pure: the same input always gives
/// the same output.
#[instrument(skip_all, fields(diff_bytes = raw_diff.len(), rules = rules.len()))]
pub fn analyze_with(raw_diff: &str, rules: &[Box<dyn Rule>]) -> Vec<Finding> {
    let findings: Vec<Finding> = diff::added_lines(raw_diff)
        .iter()
        .flat_map(|line| {
            rules.iter().filter(move |rule| rule.matches(line)).map(move |rule| {
                debug!(rule = rule.name(), file = line.file, line = line.line, "rule matched");
                Finding {
                    file: line.file.to_string(),
                    line: line.line,
                    comment: rule.comment().to_string(),
                }
            })
        })
        .collect();
    debug!(findings = findings.len(), "analysis complete");
    findings
}
