//! Multi-source volcano record reconciliation.
//!
//! Sources are processed in priority order. Each phase filters its summaries
//! through a [`ColorPolicy`], drops ids already emitted by an earlier phase,
//! resolves per-volcano details concurrently, and keeps only records with
//! usable coordinates. Output order is phase order, then input order.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;

use futures::stream::{self, StreamExt};

use crate::color::ColorCode;
use crate::volcano::{ReconciledRecord, RecordSource, VolcanoDetail, VolcanoSummary};

/// Per-id detail lookup used to resolve coordinates.
///
/// Each call is independent; a failure only excludes that one volcano.
pub trait DetailFetcher {
    type Error: fmt::Display;

    fn fetch_detail(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<VolcanoDetail, Self::Error>> + Send;
}

/// How a source assigns colors to its summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorPolicy {
    /// Keep only summaries whose explicit color is YELLOW, ORANGE or RED.
    Elevated,
    /// Keep every summary and classify it with [`classify_baseline`].
    Baseline,
}

impl ColorPolicy {
    /// Returns the color to emit, or `None` if the summary is rejected.
    #[must_use]
    pub fn classify(self, summary: &VolcanoSummary) -> Option<ColorCode> {
        match self {
            ColorPolicy::Elevated => summary.color_code.filter(|c| c.is_elevated()),
            ColorPolicy::Baseline => Some(classify_baseline(summary)),
        }
    }
}

/// Color for a monitored-list volcano.
///
/// UNASSIGNED wins when stated explicitly or when the volcano is flagged as
/// not instrumented; otherwise an explicit color is kept and a missing one
/// defaults to GREEN.
#[must_use]
pub fn classify_baseline(summary: &VolcanoSummary) -> ColorCode {
    if summary.color_code == Some(ColorCode::Unassigned) || summary.instrumented == Some(false) {
        return ColorCode::Unassigned;
    }
    summary.color_code.unwrap_or(ColorCode::Green)
}

/// One input list together with its priority rule.
#[derive(Debug, Clone, Copy)]
pub struct SourceList<'a> {
    pub source: RecordSource,
    pub policy: ColorPolicy,
    pub records: &'a [VolcanoSummary],
}

/// Counters for a single reconciliation phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub source: RecordSource,
    /// Summaries rejected before any detail lookup (no id, color policy,
    /// already emitted, or duplicated within the list).
    pub skipped: usize,
    pub candidates: usize,
    pub detail_failures: usize,
    pub missing_coordinates: usize,
    pub emitted: usize,
}

impl PhaseReport {
    fn new(source: RecordSource) -> Self {
        Self {
            source,
            skipped: 0,
            candidates: 0,
            detail_failures: 0,
            missing_coordinates: 0,
            emitted: 0,
        }
    }
}

/// Records produced by a reconciliation run plus per-phase counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub records: Vec<ReconciledRecord>,
    pub phases: Vec<PhaseReport>,
}

/// Merges the elevated list (priority) with the monitored list (baseline).
///
/// `concurrency` bounds in-flight detail lookups per phase; `0` is treated
/// as `1`.
pub async fn reconcile<F>(
    elevated: &[VolcanoSummary],
    monitored: &[VolcanoSummary],
    fetcher: &F,
    concurrency: usize,
) -> Reconciliation
where
    F: DetailFetcher + Sync,
{
    let sources = [
        SourceList {
            source: RecordSource::Elevated,
            policy: ColorPolicy::Elevated,
            records: elevated,
        },
        SourceList {
            source: RecordSource::Monitored,
            policy: ColorPolicy::Baseline,
            records: monitored,
        },
    ];
    reconcile_sources(&sources, fetcher, concurrency).await
}

/// Reconciles any number of sources, earlier sources taking priority.
///
/// An id emitted by one phase is never emitted again by a later one. Ids
/// whose detail lookup failed or lacked coordinates are not considered
/// emitted, so a later source may still supply them.
pub async fn reconcile_sources<F>(
    sources: &[SourceList<'_>],
    fetcher: &F,
    concurrency: usize,
) -> Reconciliation
where
    F: DetailFetcher + Sync,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    let mut phases = Vec::with_capacity(sources.len());

    for list in sources {
        let (emitted, report) = run_phase(list, &seen, fetcher, concurrency).await;
        seen.extend(emitted.iter().map(|r| r.id.clone()));
        records.extend(emitted);
        phases.push(report);
    }

    if records.is_empty() {
        tracing::warn!(
            sources = sources.len(),
            "reconciliation produced no volcano records"
        );
    }

    Reconciliation { records, phases }
}

async fn run_phase<F>(
    list: &SourceList<'_>,
    seen: &HashSet<String>,
    fetcher: &F,
    concurrency: usize,
) -> (Vec<ReconciledRecord>, PhaseReport)
where
    F: DetailFetcher + Sync,
{
    let mut report = PhaseReport::new(list.source);

    // Owned ids and record indices: a stream over borrowed tuples makes the
    // phase future fail the `Send` check.
    let candidates: Vec<(usize, String, ColorCode)> = {
        let mut claimed: HashSet<&str> = HashSet::new();
        list.records
            .iter()
            .enumerate()
            .filter_map(|(index, summary)| {
                let id = summary.id.as_deref()?;
                let color = list.policy.classify(summary)?;
                if seen.contains(id) || !claimed.insert(id) {
                    return None;
                }
                Some((index, id.to_owned(), color))
            })
            .collect()
    };

    report.candidates = candidates.len();
    report.skipped = list.records.len() - candidates.len();

    let resolved: Vec<_> = stream::iter(candidates)
        .map(move |(index, id, color)| resolve_detail(fetcher, index, id, color))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut emitted = Vec::with_capacity(resolved.len());
    for (index, id, color, result) in resolved {
        let summary = &list.records[index];
        let detail = match result {
            Ok(detail) => detail,
            Err(e) => {
                report.detail_failures += 1;
                tracing::warn!(
                    volcano_id = %id,
                    source = %list.source,
                    error = %e,
                    "volcano detail lookup failed; dropping record"
                );
                continue;
            }
        };

        let Some((latitude, longitude)) = detail.coordinates() else {
            report.missing_coordinates += 1;
            tracing::debug!(
                volcano_id = %id,
                source = %list.source,
                "volcano detail has no usable coordinates"
            );
            continue;
        };

        emitted.push(ReconciledRecord {
            id,
            color_code: color,
            latitude,
            longitude,
            source: list.source,
            display: summary.display.clone().or(&detail.display),
        });
    }

    report.emitted = emitted.len();
    tracing::info!(
        source = %list.source,
        candidates = report.candidates,
        skipped = report.skipped,
        detail_failures = report.detail_failures,
        missing_coordinates = report.missing_coordinates,
        emitted = report.emitted,
        "reconciliation phase complete"
    );

    (emitted, report)
}

async fn resolve_detail<F>(
    fetcher: &F,
    index: usize,
    id: String,
    color: ColorCode,
) -> (usize, String, ColorCode, Result<VolcanoDetail, F::Error>)
where
    F: DetailFetcher + Sync,
{
    let result = fetcher.fetch_detail(&id).await;
    (index, id, color, result)
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
