use crate::error::IngestError;
use crate::types::{BatchOutcome, FieldNotice, RowOutcome};
use std::io::{self, Write};

/// Human-readable, line-oriented run log. Not a machine-parseable format.
pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn start(&mut self, source: &str) -> io::Result<()> {
        writeln!(self.out, "🚀 Importing pantry items from {source}")
    }

    pub fn row(&mut self, outcome: &RowOutcome) -> io::Result<()> {
        match outcome {
            RowOutcome::Created { id, name, .. } => {
                writeln!(self.out, "   ✓ Created: {name} (ID: {id})")
            }
            RowOutcome::Failed { row, name, message } => {
                writeln!(self.out, "   ✗ Error processing row {row} ({name}): {message}")
            }
            RowOutcome::Skipped(skip) => {
                writeln!(self.out, "   ⏭  Skipping row {}: {}", skip.row, skip.reason)
            }
        }
    }

    pub fn notice(&mut self, name: &str, notice: &FieldNotice) -> io::Result<()> {
        writeln!(self.out, "   ⚠️  Row {} ({name}): {notice}", notice.row)
    }

    /// Fatal errors abort the run, so no summary follows this line
    pub fn fatal(&mut self, error: &IngestError) -> io::Result<()> {
        writeln!(self.out, "❌ Fatal error during import: {error}")?;
        self.out.flush()
    }

    pub fn summary(&mut self, outcome: &BatchOutcome) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "📊 Import Summary:")?;
        writeln!(self.out, "   Rows seen: {}", outcome.total_rows)?;
        writeln!(self.out, "   Imported: {}", outcome.success_count)?;
        writeln!(self.out, "   Skipped: {}", outcome.skip_count())?;
        writeln!(self.out, "   Errors: {}", outcome.error_count)?;
        self.out.flush()
    }
}
