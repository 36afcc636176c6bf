use crate::error::{IngestError, Result};
use crate::loader::BatchLoader;
use crate::metrics;
use crate::normalize::{Normalized, RowNormalizer};
use crate::parser::RowReader;
use crate::report::Reporter;
use crate::source::Source;
use crate::storage::Storage;
use crate::types::{BatchOutcome, RowOutcome};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

pub struct Pipeline;

impl Pipeline {
    /// Run the import: read the source, normalize each row and write it to
    /// `storage`, then report.
    ///
    /// `storage` is closed exactly once on every path, including when the
    /// source cannot be read. A close failure after a successful batch is
    /// returned as the run's error.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub async fn run<W: Write>(
        source: Source,
        storage: Arc<dyn Storage>,
        normalizer: RowNormalizer,
        reporter: &mut Reporter<W>,
    ) -> Result<BatchOutcome> {
        let started = Instant::now();
        let result = Self::import(source, storage.clone(), normalizer, reporter).await;
        let released = storage.close().await;
        metrics::run_duration(started.elapsed().as_secs_f64());

        match (result, released) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => {
                Self::report_fatal(reporter, &e);
                Err(e)
            }
            (Err(e), Ok(())) => {
                Self::report_fatal(reporter, &e);
                Err(e)
            }
            (Err(e), Err(close_err)) => {
                Self::report_fatal(reporter, &e);
                warn!("Failed to release storage after fatal error: {}", close_err);
                Err(e)
            }
        }
    }

    /// The one place a fatal run error is logged and shown to the user
    fn report_fatal<W: Write>(reporter: &mut Reporter<W>, e: &IngestError) {
        error!("Fatal error during import: {}", e);
        if let Err(write_err) = reporter.fatal(e) {
            warn!("Failed to write fatal error to report: {}", write_err);
        }
    }

    async fn import<W: Write>(
        source: Source,
        storage: Arc<dyn Storage>,
        normalizer: RowNormalizer,
        reporter: &mut Reporter<W>,
    ) -> Result<BatchOutcome> {
        reporter.start(&source.describe())?;
        let mut rows = RowReader::new(source.open()?);

        let loader = BatchLoader::new(storage, normalizer);
        let outcome = loader.load(rows.by_ref(), reporter).await?;

        if rows.malformed() > 0 {
            warn!("Dropped {} malformed CSV records", rows.malformed());
            metrics::rows::malformed(rows.malformed());
        }

        reporter.summary(&outcome)?;
        Ok(outcome)
    }

    /// Normalize every row and report skips and field notices without
    /// writing anything. The returned outcome counts would-be imports as
    /// successes.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub fn check<W: Write>(
        source: Source,
        normalizer: RowNormalizer,
        reporter: &mut Reporter<W>,
    ) -> Result<BatchOutcome> {
        reporter.start(&source.describe())?;
        let mut outcome = BatchOutcome::default();

        for row in RowReader::new(source.open()?) {
            let row = row?;
            outcome.total_rows += 1;

            match normalizer.normalize(&row) {
                Normalized::Skip(skip) => {
                    reporter.row(&RowOutcome::Skipped(skip.clone()))?;
                    outcome.skipped.push(skip);
                }
                Normalized::Item { item, notices } => {
                    for notice in &notices {
                        reporter.notice(&item.name, notice)?;
                    }
                    outcome.notices.extend(notices);
                    outcome.success_count += 1;
                }
            }
        }

        info!(
            "Checked {} rows ({} importable, {} skipped, {} notices)",
            outcome.total_rows,
            outcome.success_count,
            outcome.skip_count(),
            outcome.notices.len()
        );
        reporter.summary(&outcome)?;
        Ok(outcome)
    }
}
