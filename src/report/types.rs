/// A review comment anchored to a line of the new version of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// File path the comment applies to (e.g. "src/auth/login.ts")
    pub file: String,
    /// Line in the new file; 0 when the hunk header was unreadable
    pub line: usize,
    /// Human-readable review comment
    pub comment: String,
}

impl Finding {
    /// `file:line`, or just `file` when the line is unknown.
    pub fn location(&self) -> String {
        if self.line == 0 {
            self.file.clone()
        } else {
            format!("{}:{}", self.file, self.line)
        }
    }
}
