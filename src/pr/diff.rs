use std::sync::OnceLock;

use regex::Regex;

/// A line added by the diff, located in the new version of its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedLine<'a> {
    /// Post-image path of the file the line belongs to
    pub file: &'a str,
    /// Line number in the new file; 0 when the hunk header was unreadable
    pub line: usize,
    /// Line content without the leading `+`, surrounding whitespace trimmed
    pub text: &'a str,
}

/// Position of the scan within the diff.
///
/// `line` is `None` between a file header and its first hunk header, so
/// nothing outside a hunk (binary notices, mode lines) is ever taken as an
/// added line.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor<'a> {
    file: &'a str,
    line: Option<usize>,
}

impl<'a> Cursor<'a> {
    fn step(self, line: &'a str, added: &mut Vec<AddedLine<'a>>) -> Cursor<'a> {
        if let Some(header) = line.strip_prefix("diff --git ") {
            return Cursor {
                file: post_image_path(header),
                line: None,
            };
        }

        if line.starts_with("@@") {
            return Cursor {
                line: Some(hunk_new_start(line)),
                ..self
            };
        }

        if line.starts_with("+++") {
            return self;
        }

        match (line.strip_prefix('+'), self.line) {
            (Some(text), Some(number)) => {
                added.push(AddedLine {
                    file: self.file,
                    line: number,
                    text: text.trim(),
                });
                // Only added lines move the cursor: context and removed
                // lines do not exist in the post-image numbering we report.
                Cursor {
                    line: Some(number + 1),
                    ..self
                }
            }
            _ => self,
        }
    }
}

/// Collect every added line of a unified diff, in diff order.
///
/// Each line after a `@@ -a,b +c,d @@` header is numbered from `c` upwards,
/// counting added lines only. An empty diff, or one without hunk headers,
/// yields nothing.
pub fn added_lines(raw_diff: &str) -> Vec<AddedLine<'_>> {
    let (_, added) = raw_diff
        .lines()
        .fold((Cursor::default(), Vec::new()), |(cursor, mut added), line| {
            let next = cursor.step(line, &mut added);
            (next, added)
        });
    added
}

/// Number of lines in the raw diff text, used for progress reporting.
pub fn line_count(raw_diff: &str) -> usize {
    raw_diff.lines().count()
}

/// Extract the `b/` path from the remainder of a `diff --git a/x b/y` line.
fn post_image_path(header: &str) -> &str {
    match header.rsplit_once(" b/") {
        Some((_, path)) => path.trim(),
        None => header.split_whitespace().nth(1).unwrap_or_default(),
    }
}

/// Starting line of the new-file range in a hunk header. Unreadable headers
/// give 0.
fn hunk_new_start(header: &str) -> usize {
    static NEW_START: OnceLock<Regex> = OnceLock::new();
    let re = NEW_START.get_or_init(|| Regex::new(r"\+(\d+)").expect("hunk header regex compiles"));
    re.captures(header)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_DIFF: &str = r#"diff --git a/src/main.rs b/src/main.rs
index abc1234..def5678 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,5 +1,7 @@
 fn main() {
-    println!("old");
+    println!("new");
+    // Added a comment
 }
"#;

    #[test]
    fn test_added_lines_single_file() {
        let lines = added_lines(SAMPLE_DIFF);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].file, "src/main.rs");
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[0].text, "println!(\"new\");");
        assert_eq!(lines[1].line, 2);
        assert_eq!(lines[1].text, "// Added a comment");
    }

    #[test]
    fn test_context_and_removed_lines_do_not_advance_cursor() {
        let diff = r#"diff --git a/app.ts b/app.ts
--- a/app.ts
+++ b/app.ts
@@ -8,6 +10,6 @@ export function run() {
 const a = 1;
-const b = 2;
+const b = 3;
 const c = 4;
-const d = 5;
+const d = 6;
"#;
        let lines = added_lines(diff);
        let numbers: Vec<usize> = lines.iter().map(|l| l.line).collect();
        assert_eq!(numbers, vec![10, 11]);
    }

    #[test]
    fn test_multiple_files_and_hunks() {
        let diff = r#"diff --git a/a.js b/a.js
--- a/a.js
+++ b/a.js
@@ -1,1 +1,2 @@
+first
@@ -40,1 +41,2 @@
+second
diff --git a/lib/b.js b/lib/b.js
--- a/lib/b.js
+++ b/lib/b.js
@@ -0,0 +1 @@
+third
"#;
        let lines = added_lines(diff);
        let located: Vec<(&str, usize)> = lines.iter().map(|l| (l.file, l.line)).collect();
        assert_eq!(located, vec![("a.js", 1), ("a.js", 41), ("lib/b.js", 1)]);
    }

    #[test]
    fn test_path_with_b_directory_segment() {
        let diff = "diff --git a/lib/x.ts b/lib/x.ts\n@@ -1 +3 @@\n+x\n";
        let lines = added_lines(diff);
        assert_eq!(lines[0].file, "lib/x.ts");
        assert_eq!(lines[0].line, 3);
    }

    #[test]
    fn test_malformed_hunk_header_defaults_to_zero() {
        let diff = "diff --git a/x.js b/x.js\n@@ garbage @@\n+one\n+two\n";
        let lines = added_lines(diff);
        assert_eq!(lines[0].line, 0);
        assert_eq!(lines[1].line, 1);
    }

    #[test]
    fn test_new_file_header_is_not_an_added_line() {
        let diff = r#"diff --git a/new_file.txt b/new_file.txt
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/new_file.txt
@@ -0,0 +1,2 @@
+hello
+world
"#;
        let lines = added_lines(diff);
        let texts: Vec<&str> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["hello", "world"]);
    }

    #[test]
    fn test_binary_notice_without_hunks() {
        let diff = "diff --git a/logo.png b/logo.png\nBinary files a/logo.png and b/logo.png differ\n";
        assert!(added_lines(diff).is_empty());
    }

    #[test]
    fn test_empty_diff() {
        assert!(added_lines("").is_empty());
        assert_eq!(line_count(""), 0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(SAMPLE_DIFF), 10);
    }
}
