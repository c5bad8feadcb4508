//! Text normalization applied to each unit before chunking.

/// Trait for text cleaning strategies.
pub trait Cleaner: Send + Sync {
    /// Returns a normalized copy of the input text.
    fn clean(&self, text: &str) -> String;

    /// Returns the cleaner name.
    fn name(&self) -> &'static str;
}

/// Default cleaner used before chunking.
///
/// Performs lightweight normalization only:
/// - line endings (`\r\n`, `\r` become `\n`)
/// - trailing whitespace stripped per line
/// - runs of blank lines collapsed to one
/// - outer whitespace trimmed
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicCleaner;

impl Cleaner for BasicCleaner {
    fn clean(&self, text: &str) -> String {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut out = String::with_capacity(normalized.len());
        let mut pending_blank = false;
        for line in normalized.lines().map(str::trim_end) {
            if line.is_empty() {
                pending_blank = !out.is_empty();
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
                if pending_blank {
                    out.push('\n');
                }
            }
            out.push_str(line);
            pending_blank = false;
        }

        out.trim().to_string()
    }

    fn name(&self) -> &'static str {
        "basic"
    }
}

/// Cleaner that passes text through untouched.
///
/// Useful when chunk offsets must match the raw source exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCleaner;

impl Cleaner for NoopCleaner {
    fn clean(&self, text: &str) -> String {
        text.to_string()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
