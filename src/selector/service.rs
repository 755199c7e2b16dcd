//! Recording selector - picks the best recording of a performance
//!
//! 1. Read every candidate for the date from the catalog
//! 2. With more than one candidate, optionally fetch remote metadata for each
//!    (concurrently, paced by a shared rate limiter, under one overall timeout)
//! 3. Merge, infer missing attributes, score and rank

use chrono::NaiveDate;
use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;

use crate::archive::{DEFAULT_MIN_INTERVAL, MetadataApi, MetadataError, RateLimiter, RecordingMetadata};
use crate::catalog::{CatalogError, CatalogRecord, ShowCatalog};
use crate::config::SelectionConfig;
use crate::quality::{
    AttributeFlags, RecordingQuality, ScoreBreakdown, ScoringWeights, breakdown, rank_by,
};

use super::inference::to_quality;

/// Configuration for the selector
#[derive(Debug, Clone)]
pub struct SelectorOptions {
    /// Fetch remote metadata when comparing several candidates
    pub enrich: bool,
    /// Overall budget for enrichment; past it every candidate is scored from
    /// catalog data alone
    pub enrichment_timeout: Duration,
    /// Minimum spacing between outbound metadata requests
    pub min_request_interval: Duration,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            enrich: true,
            enrichment_timeout: Duration::from_secs(30),
            min_request_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl From<&SelectionConfig> for SelectorOptions {
    fn from(config: &SelectionConfig) -> Self {
        Self {
            enrich: config.enrich,
            enrichment_timeout: config.enrichment_timeout(),
            min_request_interval: config.min_request_interval(),
        }
    }
}

/// What happened to remote enrichment during one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    /// Not attempted: disabled, or fewer than two candidates
    Skipped,
    /// Every fetch finished (some may have failed individually)
    Completed,
    /// The overall timeout expired
    TimedOut,
}

/// A scored candidate with everything needed to explain the score.
#[derive(Debug, Clone, Serialize)]
pub struct SelectedRecording {
    pub record: CatalogRecord,
    pub quality: RecordingQuality,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub flags: AttributeFlags,
    /// Remote metadata, when it was fetched
    #[serde(skip)]
    pub metadata: Option<RecordingMetadata>,
}

/// Result of ranking the candidates for a date.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub date: NaiveDate,
    /// Candidates found, before any limit
    pub candidates: usize,
    pub enrichment: EnrichmentStatus,
    /// Best first
    pub ranked: Vec<SelectedRecording>,
}

impl SelectionOutcome {
    fn not_found(date: NaiveDate) -> Self {
        Self {
            date,
            candidates: 0,
            enrichment: EnrichmentStatus::Skipped,
            ranked: Vec::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn best(&self) -> Option<&SelectedRecording> {
        self.ranked.first()
    }

    pub fn into_best(self) -> Option<SelectedRecording> {
        self.ranked.into_iter().next()
    }
}

/// A candidate between enrichment and scoring.
struct Candidate {
    record: CatalogRecord,
    quality: RecordingQuality,
    flags: AttributeFlags,
    metadata: Option<RecordingMetadata>,
}

impl Candidate {
    fn new(record: CatalogRecord, metadata: Option<RecordingMetadata>, extra: AttributeFlags) -> Self {
        let (quality, flags) = to_quality(&record, metadata.as_ref());
        Self {
            record,
            quality,
            flags: flags | extra,
            metadata,
        }
    }

    fn into_selected(self, score: f64, weights: &ScoringWeights) -> SelectedRecording {
        SelectedRecording {
            breakdown: breakdown(&self.quality, weights),
            record: self.record,
            quality: self.quality,
            score,
            flags: self.flags,
            metadata: self.metadata,
        }
    }
}

/// Chooses among the recordings of one performance.
pub struct RecordingSelector<C, M> {
    catalog: C,
    metadata: M,
    limiter: RateLimiter,
    options: SelectorOptions,
}

impl<C: ShowCatalog, M: MetadataApi> RecordingSelector<C, M> {
    pub fn new(catalog: C, metadata: M, options: SelectorOptions) -> Self {
        Self {
            limiter: RateLimiter::new(options.min_request_interval),
            catalog,
            metadata,
            options,
        }
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// The best recording for `date`, or `None` when the catalog has none.
    pub async fn select_best(
        &self,
        date: NaiveDate,
        weights: &ScoringWeights,
    ) -> Result<Option<SelectedRecording>, CatalogError> {
        Ok(self.ranked(date, weights, Some(1)).await?.into_best())
    }

    /// Every candidate for `date`, best first, truncated to `limit`.
    pub async fn ranked(
        &self,
        date: NaiveDate,
        weights: &ScoringWeights,
        limit: Option<usize>,
    ) -> Result<SelectionOutcome, CatalogError> {
        let records = self.catalog.recordings_for_date(date).await?;
        let candidates = records.len();
        tracing::info!(%date, candidates, "Selecting recording");

        let (mut ranked, enrichment) = match candidates {
            0 => {
                tracing::info!(%date, "No recordings found");
                return Ok(SelectionOutcome::not_found(date));
            }
            1 => {
                let scored = records
                    .into_iter()
                    .map(|record| self.score_single(record, weights))
                    .collect::<Vec<_>>();
                (scored, EnrichmentStatus::Skipped)
            }
            _ => {
                let (pool, status) = if self.options.enrich {
                    self.enrich(records).await
                } else {
                    let plain = records
                        .into_iter()
                        .map(|r| Candidate::new(r, None, AttributeFlags::empty()))
                        .collect();
                    (plain, EnrichmentStatus::Skipped)
                };
                let ranked = rank_by(pool, weights, |c| &c.quality)
                    .into_iter()
                    .map(|(candidate, score)| candidate.into_selected(score, weights))
                    .collect::<Vec<_>>();
                (ranked, status)
            }
        };

        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        if let Some(best) = ranked.first() {
            tracing::info!(
                %date,
                identifier = %best.record.identifier,
                score = best.score,
                "Selected recording"
            );
        }

        Ok(SelectionOutcome {
            date,
            candidates,
            enrichment,
            ranked,
        })
    }

    /// Score one record from catalog data, with its breakdown.
    pub fn score_single(&self, record: CatalogRecord, weights: &ScoringWeights) -> SelectedRecording {
        let candidate = Candidate::new(record, None, AttributeFlags::empty());
        let score = crate::quality::composite_score(&candidate.quality, weights);
        candidate.into_selected(score, weights)
    }

    /// Fetch metadata for every record concurrently.
    ///
    /// A failed fetch only degrades its own candidate. On timeout all
    /// candidates fall back to catalog data.
    async fn enrich(&self, records: Vec<CatalogRecord>) -> (Vec<Candidate>, EnrichmentStatus) {
        let fetches = records.iter().map(|r| self.fetch(&r.identifier));
        let fetched = tokio::time::timeout(self.options.enrichment_timeout, join_all(fetches)).await;

        match fetched {
            Ok(results) => {
                let candidates = records
                    .into_iter()
                    .zip(results)
                    .map(|(record, result)| match result {
                        Ok(metadata) => Candidate::new(record, Some(metadata), AttributeFlags::empty()),
                        Err(e) => {
                            tracing::warn!(
                                identifier = %record.identifier,
                                error = %e,
                                "Metadata enrichment failed, using catalog data"
                            );
                            Candidate::new(record, None, AttributeFlags::ENRICHMENT_FAILED)
                        }
                    })
                    .collect();
                (candidates, EnrichmentStatus::Completed)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.options.enrichment_timeout.as_secs_f64(),
                    candidates = records.len(),
                    "Metadata enrichment timed out, scoring catalog data only"
                );
                let candidates = records
                    .into_iter()
                    .map(|r| Candidate::new(r, None, AttributeFlags::ENRICHMENT_TIMED_OUT))
                    .collect();
                (candidates, EnrichmentStatus::TimedOut)
            }
        }
    }

    async fn fetch(&self, identifier: &str) -> Result<RecordingMetadata, MetadataError> {
        self.limiter.acquire().await;
        self.metadata.metadata(identifier).await
    }
}
