use crate::error::Result;
use crate::metrics;
use crate::normalize::{Normalized, RowNormalizer};
use crate::report::Reporter;
use crate::storage::Storage;
use crate::types::{BatchOutcome, NormalizedItem, RawRow, RowOutcome};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Writes normalized rows to storage one at a time.
///
/// A failed write is counted and reported, then the next row is processed;
/// only a source read failure or a broken report sink stops the batch.
pub struct BatchLoader {
    storage: Arc<dyn Storage>,
    normalizer: RowNormalizer,
}

impl BatchLoader {
    pub fn new(storage: Arc<dyn Storage>, normalizer: RowNormalizer) -> Self {
        Self {
            storage,
            normalizer,
        }
    }

    #[instrument(skip_all)]
    pub async fn load<I, W>(&self, rows: I, reporter: &mut Reporter<W>) -> Result<BatchOutcome>
    where
        I: IntoIterator<Item = Result<RawRow>>,
        W: Write,
    {
        let mut outcome = BatchOutcome::default();

        for row in rows {
            let row = row?;
            outcome.total_rows += 1;
            metrics::rows::seen();

            let row_outcome = match self.normalizer.normalize(&row) {
                Normalized::Skip(skip) => {
                    info!("Skipping row {}: {}", skip.row, skip.reason);
                    metrics::rows::skipped();
                    outcome.skipped.push(skip.clone());
                    RowOutcome::Skipped(skip)
                }
                Normalized::Item { item, notices } => {
                    for notice in &notices {
                        warn!("Row {} ({}): {}", notice.row, item.name, notice);
                        metrics::rows::field_notice(notice.field);
                        reporter.notice(&item.name, notice)?;
                    }
                    outcome.notices.extend(notices);
                    self.write(row.index, &item, &mut outcome).await
                }
            };

            reporter.row(&row_outcome)?;
        }

        info!(
            "Loaded {} rows ({} imported, {} skipped, {} errors)",
            outcome.total_rows,
            outcome.success_count,
            outcome.skip_count(),
            outcome.error_count
        );
        Ok(outcome)
    }

    async fn write(
        &self,
        row: usize,
        item: &NormalizedItem,
        outcome: &mut BatchOutcome,
    ) -> RowOutcome {
        let started = Instant::now();
        let result = self.storage.create_item(item).await;
        metrics::rows::write_duration(started.elapsed().as_secs_f64());

        match result {
            Ok(stored) => {
                debug!("Created {} (ID: {})", stored.name(), stored.id);
                metrics::rows::imported();
                outcome.success_count += 1;
                outcome.created.push(stored.id);
                RowOutcome::Created {
                    row,
                    id: stored.id,
                    name: stored.item.name,
                }
            }
            Err(e) => {
                error!("Error processing row {} ({}): {}", row, item.name, e);
                metrics::rows::failed();
                outcome.error_count += 1;
                RowOutcome::Failed {
                    row,
                    name: item.name.clone(),
                    message: e.to_string(),
                }
            }
        }
    }
}
