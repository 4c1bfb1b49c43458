//! Detection of errors in compiler output.
//!
//! This is a heuristic filter. A line is an error when it contains the
//! word `error` in any letter case, regardless of where it appears. Lines
//! mentioning the word outside a diagnostic are misclassified, and
//! diagnostics that never use the word are dropped.
use crate::constants::ERROR_TOKEN;

/// Single error reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    /// Output line, exactly as the compiler printed it.
    pub message: String,
    /// Line in the source file, if the compiler reported a location.
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let (line, column) = match parse_location(&message) {
            Some((line, column)) => (Some(line), Some(column)),
            None => (None, None),
        };

        Self {
            message,
            line,
            column,
        }
    }
}

/// Picks the error lines out of captured output, in the order they were printed.
pub fn classify<I, S>(lines: I) -> Vec<CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| is_error(line.as_ref()))
        .map(|line| CompileError::new(line.as_ref()))
        .collect()
}

/// Whether a single line of output reports an error.
pub fn is_error(line: &str) -> bool {
    !line.is_empty() && line.to_lowercase().contains(ERROR_TOKEN)
}

/// Extracts the `(line,column)` location mcs prints after the file name,
/// as in `Program.cs(10,5): error CS0103: ...`
fn parse_location(message: &str) -> Option<(u32, u32)> {
    let mut rest = message;

    while let Some(open) = rest.find('(') {
        let after = &rest[open + 1..];

        if let Some(close) = after.find(')') {
            let inner = &after[..close];
            let followed_by_colon = after[close + 1..].starts_with(':');

            if followed_by_colon {
                if let Some((line, column)) = inner.split_once(',') {
                    if let (Ok(line), Ok(column)) =
                        (line.trim().parse::<u32>(), column.trim().parse::<u32>())
                    {
                        return Some((line, column));
                    }
                }
            }
        }

        rest = after;
    }

    None
}
