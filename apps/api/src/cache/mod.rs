#![allow(dead_code)]

//! Session-partitioned result cache.
//!
//! Holds the most recent summary per (session, filename) and the most recent
//! match per (session, filename, job-description hash) so reprocessing the
//! same document skips the model call. Both stores are bounded by capacity
//! and an idle TTL. Puts are last-write-wins; the `*_or_compute` paths
//! coalesce concurrent same-key computations onto a single in-flight future,
//! so a slow recompute is never overwritten by a racing duplicate.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use sha2::{Digest, Sha256};

use crate::models::record::{MatchResult, ResumeSummary};

type SummaryKey = (String, String);
type MatchKey = (String, String, String);

#[derive(Clone)]
pub struct ScreeningCache {
    summaries: Cache<SummaryKey, ResumeSummary>,
    matches: Cache<MatchKey, MatchResult>,
}

/// Cache partition key for a job description: SHA-256 over the trimmed text.
pub fn jd_hash(job_description: &str) -> String {
    hex::encode(Sha256::digest(job_description.trim().as_bytes()))
}

impl ScreeningCache {
    pub fn new(capacity: u64, time_to_idle: Duration) -> Self {
        Self {
            summaries: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(time_to_idle)
                .build(),
            matches: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(time_to_idle)
                .build(),
        }
    }

    pub async fn get_summary(&self, session: &str, filename: &str) -> Option<ResumeSummary> {
        self.summaries
            .get(&(session.to_string(), filename.to_string()))
            .await
    }

    pub async fn put_summary(&self, session: &str, filename: &str, record: ResumeSummary) {
        self.summaries
            .insert((session.to_string(), filename.to_string()), record)
            .await;
    }

    pub async fn get_match(
        &self,
        session: &str,
        filename: &str,
        jd_hash: &str,
    ) -> Option<MatchResult> {
        self.matches
            .get(&(session.to_string(), filename.to_string(), jd_hash.to_string()))
            .await
    }

    pub async fn put_match(
        &self,
        session: &str,
        filename: &str,
        jd_hash: &str,
        result: MatchResult,
    ) {
        self.matches
            .insert(
                (session.to_string(), filename.to_string(), jd_hash.to_string()),
                result,
            )
            .await;
    }

    /// Returns the cached summary when it is complete enough to reuse,
    /// otherwise runs `init` — once per key across concurrent callers — and
    /// caches its result. A cached record without a primary role is treated
    /// as incomplete and recomputed.
    pub async fn summary_or_compute<F>(
        &self,
        session: &str,
        filename: &str,
        init: F,
    ) -> ResumeSummary
    where
        F: Future<Output = ResumeSummary>,
    {
        let key = (session.to_string(), filename.to_string());
        if let Some(existing) = self.summaries.get(&key).await {
            if existing.is_reusable() {
                return existing;
            }
            self.summaries.invalidate(&key).await;
        }
        self.summaries.get_with(key, init).await
    }

    /// Match-result counterpart of `summary_or_compute`: a cached result
    /// with no parsed percentage is recomputed.
    pub async fn match_or_compute<F>(
        &self,
        session: &str,
        filename: &str,
        jd_hash: &str,
        init: F,
    ) -> MatchResult
    where
        F: Future<Output = MatchResult>,
    {
        let key = (session.to_string(), filename.to_string(), jd_hash.to_string());
        if let Some(existing) = self.matches.get(&key).await {
            if existing.is_reusable() {
                return existing;
            }
            self.matches.invalidate(&key).await;
        }
        self.matches.get_with(key, init).await
    }

    /// All summaries cached for one session, sorted by filename (the export
    /// and shortlist surfaces want deterministic row order).
    pub async fn session_summaries(&self, session: &str) -> Vec<ResumeSummary> {
        let mut records: Vec<ResumeSummary> = self
            .summaries
            .iter()
            .filter(|(key, _)| key.0 == session)
            .map(|(_, record)| record)
            .collect();
        records.sort_by(|a, b| a.filename.cmp(&b.filename));
        records
    }
}
