use crate::core::normalizer;
use crate::domain::ports::{DocumentSink, RecordSource};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::{Duration, Instant};

/// Page-walk parameters, resolved once before the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page_size: usize,
    pub num_pages: u64,
    pub init_offset: u64,
}

impl PagePlan {
    pub fn offset_for(&self, page: u64) -> u64 {
        page * self.page_size as u64 + self.init_offset
    }
}

/// Per-run totals, reported once the loop exhausts all pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub pages_processed: u64,
    pub records_fetched: usize,
    pub records_indexed: usize,
    pub records_dropped: usize,
    pub pages_failed: u64,
    pub elapsed: Duration,
}

/// Drives Fetcher → Normalizer → Loader across all pages, strictly
/// sequentially. One page completes before the next begins; there is no
/// cross-page state beyond the loop counter and the report totals.
pub struct PaginationDriver<S: RecordSource, D: DocumentSink> {
    source: S,
    sink: D,
    monitor: SystemMonitor,
}

impl<S: RecordSource, D: DocumentSink> PaginationDriver<S, D> {
    pub fn new(source: S, sink: D) -> Self {
        Self::new_with_monitoring(source, sink, false)
    }

    pub fn new_with_monitoring(source: S, sink: D, monitor_enabled: bool) -> Self {
        Self {
            source,
            sink,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Resolve `(num_pages, init_offset)` once. Explicit values win; the page
    /// count otherwise derives from a source count query.
    pub async fn resolve_plan(
        &self,
        page_size: usize,
        num_pages: Option<u64>,
        init_offset: Option<u64>,
    ) -> Result<PagePlan> {
        let num_pages = match num_pages {
            Some(pages) => pages,
            None => {
                let total = self.source.count().await?;
                total / page_size as u64
            }
        };

        Ok(PagePlan {
            page_size,
            num_pages,
            init_offset: init_offset.unwrap_or(0),
        })
    }

    /// Walk every page in order: fetch, normalize, bulk-load.
    ///
    /// A fetch failure aborts the remaining pages. A load failure only skips
    /// that page's batch; malformed records and failed pages are tallied into
    /// the report instead of stopping the run.
    pub async fn run(&self, plan: &PagePlan) -> Result<RunReport> {
        tracing::info!("Num Pages: {}", plan.num_pages);
        tracing::info!("Init Offset: {}", plan.init_offset);

        let run_start = Instant::now();
        let mut report = RunReport::default();

        for page in 0..plan.num_pages {
            let page_start = Instant::now();
            let offset = plan.offset_for(page);

            let fetch_start = Instant::now();
            let rows = self.source.fetch_page(plan.page_size, offset).await?;
            tracing::info!(
                "Page {}: fetched {} rows at offset {} in {:?}",
                page,
                rows.len(),
                offset,
                fetch_start.elapsed()
            );
            report.records_fetched += rows.len();

            let mut batch = Vec::with_capacity(rows.len());
            for row in &rows {
                match normalizer::normalize(row) {
                    Ok(doc) => batch.push(doc),
                    Err(e) => {
                        report.records_dropped += 1;
                        tracing::trace!("Skipping row: {}", e);
                    }
                }
            }

            tracing::info!("Posting batch of {} documents", batch.len());
            let load_start = Instant::now();
            match self.sink.bulk_index(&batch).await {
                Ok(()) => {
                    report.records_indexed += batch.len();
                    tracing::info!("Page {}: loaded in {:?}", page, load_start.elapsed());
                }
                Err(e) => {
                    report.pages_failed += 1;
                    tracing::warn!("⚠️ Failed to load page {}: {}", page, e);
                }
            }

            report.pages_processed += 1;
            tracing::info!("Page {} completed in {:?}", page, page_start.elapsed());
            self.monitor.log_stats(&format!("page {}", page));
        }

        report.elapsed = run_start.elapsed();
        self.monitor.log_final_stats();
        Ok(report)
    }
}
