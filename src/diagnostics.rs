//! Warning aggregation and diagnostic summaries.

use std::path::{Path, PathBuf};

use crate::handler::Context;

/// Details about a skipped file.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    /// Path to the skipped file.
    pub(crate) path: PathBuf,
    /// Reason the file was skipped.
    pub(crate) reason: String,
}

/// Aggregates warnings and skipped files for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Number of warnings emitted.
    warnings: usize,
    /// Collected skipped file records.
    skipped: Vec<SkippedFile>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, ctx: &mut Context<'_>, message: impl Into<String>) {
        ctx.warn(message.into());
        self.warnings += 1;
    }

    /// Record a skipped file and emit the warning.
    pub(crate) fn warn_skipped(
        &mut self,
        ctx: &mut Context<'_>,
        path: &Path,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        self.warn(ctx, format!("{} - {reason}", path.display()));
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }

    /// Print a summary for skipped files if any were recorded.
    pub(crate) fn print_skipped_summary(&self, ctx: &mut Context<'_>) {
        if self.skipped.is_empty() {
            return;
        }

        let mut summary = format!("Skipped {} file(s):", self.skipped.len());
        for skipped in &self.skipped {
            summary.push_str(&format!("\n  - {}: {}", skipped.path.display(), skipped.reason));
        }
        ctx.warn(summary);
    }

    /// Number of warnings emitted so far.
    pub(crate) fn warning_count(&self) -> usize {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::Diagnostics;
    use crate::testutil::Harness;

    #[test]
    fn summarizes_skipped_files() {
        let harness = Harness::new();
        let (diagnostics, _, err) = harness.with_context("validate", |ctx| {
            let mut diagnostics = Diagnostics::new();
            diagnostics.warn_skipped(ctx, Path::new("notes.txt"), "unknown format");
            diagnostics.print_skipped_summary(ctx);
            diagnostics
        });
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.skipped.len(), 1);
        assert!(err.contains("warning: notes.txt - unknown format"));
        assert!(err.contains("Skipped 1 file(s):"));
    }

    #[test]
    fn silent_without_skips() {
        let harness = Harness::new();
        let ((), _, err) = harness.with_context("validate", |ctx| {
            Diagnostics::new().print_skipped_summary(ctx);
        });
        assert!(err.is_empty());
    }
}
