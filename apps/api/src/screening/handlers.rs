//! Axum route handlers for the Screening API.

use std::collections::BTreeMap;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::jd_hash;
use crate::document;
use crate::errors::AppError;
use crate::models::record::{MatchResult, ResumeSummary};
use crate::screening::export::{passes_filter, write_csv, ExportRow};
use crate::screening::pipeline::{
    categorized_results, match_from_response, reclassify_from_match, summary_from_response,
};
use crate::screening::prompts::{JD_GENERATION_PROMPT, MATCH_PROMPT_TEMPLATE, SUMMARY_PROMPT};
use crate::state::AppState;
use crate::taxonomy::Category;

const SESSION_HEADER: &str = "x-session-id";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Summarize,
    Match,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResult {
    #[serde(flatten)]
    pub summary: ResumeSummary,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_result: Option<MatchResult>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub session_id: String,
    pub results: Vec<ScreeningResult>,
    pub categorized_results: BTreeMap<Category, Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_role: String,
}

#[derive(Debug, Serialize)]
pub struct JobDescriptionResponse {
    pub job_description: String,
}

/// Filter body shared by the export and shortlist endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct FilterRequest {
    /// Needed to locate cached match results for the percentage filter.
    pub job_description: Option<String>,
    pub percentage_threshold: Option<f64>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct ShortlistResponse {
    pub message: String,
    pub shortlisted: usize,
    pub filenames: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screening/process
///
/// Multipart form: repeated `resumes` file parts, `action`
/// ("summarize" | "match"), and `job_description` (required for match).
/// Always returns one record per submitted document — upstream failures
/// degrade to placeholder records, never to a failed batch.
pub async fn handle_process(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let session_id = session_id_from(&headers);

    let mut action: Option<String> = None;
    let mut job_description = String::new();
    let mut files: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("action") => {
                action = Some(read_text_field(field).await?);
            }
            Some("job_description") => {
                job_description = read_text_field(field).await?;
            }
            Some("resumes") => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Validation("Resume part missing filename".into()))?;
                let data = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read upload '{filename}': {e}"))
                })?;
                files.push((filename, data));
            }
            _ => {}
        }
    }

    let action = match action.as_deref() {
        Some("summarize") => Action::Summarize,
        Some("match") => Action::Match,
        Some(other) => {
            return Err(AppError::Validation(format!("Unknown action '{other}'")));
        }
        None => return Err(AppError::Validation("Missing 'action' field".into())),
    };
    if files.is_empty() {
        return Err(AppError::Validation("At least one resume file is required".into()));
    }
    if action == Action::Match && job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "A job description is required for percentage match".into(),
        ));
    }

    info!(
        "Processing {} resume(s) for session {session_id} ({action:?})",
        files.len()
    );

    let reference = state.reference_date();
    let mut results = Vec::with_capacity(files.len());
    for (filename, data) in files {
        let text = document::extract_text(&filename, &data);
        let summary = summarize_document(&state, &session_id, &filename, &text, reference).await;

        let match_result = match action {
            Action::Summarize => None,
            Action::Match => {
                let result =
                    match_document(&state, &session_id, &filename, &text, &job_description).await;
                let mut summary = summary.clone();
                if reclassify_from_match(&mut summary, &result) {
                    state
                        .cache
                        .put_summary(&session_id, &filename, summary.clone())
                        .await;
                    results.push(ScreeningResult {
                        summary,
                        match_result: Some(result),
                    });
                    continue;
                }
                Some(result)
            }
        };
        results.push(ScreeningResult {
            summary,
            match_result,
        });
    }

    let categorized = categorized_results(results.iter().map(|r| &r.summary));

    Ok(Json(ProcessResponse {
        session_id,
        results,
        categorized_results: categorized,
    }))
}

/// POST /api/v1/screening/job-description
///
/// Generates a full job description from a bare role name. This is the one
/// surface where a model failure maps to an HTTP error — there is no
/// document record to degrade into.
pub async fn handle_generate_jd(
    State(state): State<AppState>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<Json<JobDescriptionResponse>, AppError> {
    if request.job_role.trim().is_empty() {
        return Err(AppError::Validation("job_role cannot be empty".into()));
    }

    let job_description = state
        .llm
        .invoke(request.job_role.trim(), JD_GENERATION_PROMPT)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    Ok(Json(JobDescriptionResponse { job_description }))
}

/// POST /api/v1/screening/export
///
/// Streams the session's cached results as a CSV download, optionally
/// filtered by percentage threshold and category set.
pub async fn handle_export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<FilterRequest>,
) -> Result<Response, AppError> {
    let (_, rows) = collect_rows(&state, &headers, &request).await?;
    let csv_bytes = write_csv(&rows).map_err(AppError::Internal)?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"screening_results.csv\"",
            ),
        ],
        csv_bytes,
    )
        .into_response())
}

/// POST /api/v1/screening/shortlist
///
/// Applies the same filters as export and reports which candidates made the
/// cut.
pub async fn handle_shortlist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<FilterRequest>,
) -> Result<Json<ShortlistResponse>, AppError> {
    let (total, rows) = collect_rows(&state, &headers, &request).await?;
    let filenames: Vec<String> = rows.iter().map(|r| r.summary.filename.clone()).collect();

    Ok(Json(ShortlistResponse {
        message: format!(
            "Shortlisted {} of {} processed resume(s)",
            filenames.len(),
            total
        ),
        shortlisted: filenames.len(),
        filenames,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn session_id_from(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn require_session(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::Validation(format!("The {SESSION_HEADER} header is required"))
        })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or("field").to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read '{name}': {e}")))
}

/// Computes or reuses the summary record for one document. Model failures
/// become placeholder records; empty document text skips the model call
/// entirely and parses to an all-N/A record.
async fn summarize_document(
    state: &AppState,
    session_id: &str,
    filename: &str,
    text: &str,
    reference: NaiveDate,
) -> ResumeSummary {
    state
        .cache
        .summary_or_compute(session_id, filename, async {
            if text.trim().is_empty() {
                warn!("'{filename}': no extractable text, producing empty record");
                return summary_from_response(filename, "", reference);
            }
            match state.llm.invoke(text, SUMMARY_PROMPT).await {
                Ok(raw) => summary_from_response(filename, &raw, reference),
                Err(e) => {
                    warn!("Summary model call failed for '{filename}': {e}");
                    ResumeSummary::failure(filename, &e.to_string())
                }
            }
        })
        .await
}

/// Computes or reuses the match record for one (document, job description)
/// pair.
async fn match_document(
    state: &AppState,
    session_id: &str,
    filename: &str,
    text: &str,
    job_description: &str,
) -> MatchResult {
    let hash = jd_hash(job_description);
    let prompt = MATCH_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    state
        .cache
        .match_or_compute(session_id, filename, &hash, async {
            if text.trim().is_empty() {
                warn!("'{filename}': no extractable text, producing empty match");
                return match_from_response(filename, "");
            }
            match state.llm.invoke(text, &prompt).await {
                Ok(raw) => match_from_response(filename, &raw),
                Err(e) => {
                    warn!("Match model call failed for '{filename}': {e}");
                    MatchResult::failure(filename, &e.to_string())
                }
            }
        })
        .await
}

/// Pulls the session's cached summaries, pairs each with its match for the
/// requested job description, and applies the filter. Returns the total
/// number of cached records alongside the surviving rows.
async fn collect_rows(
    state: &AppState,
    headers: &HeaderMap,
    request: &FilterRequest,
) -> Result<(usize, Vec<ExportRow>), AppError> {
    let session_id = require_session(headers)?;
    let summaries = state.cache.session_summaries(&session_id).await;
    let total = summaries.len();
    let hash = request.job_description.as_deref().map(jd_hash);

    let mut rows = Vec::new();
    for summary in summaries {
        let match_result = match &hash {
            Some(h) => state.cache.get_match(&session_id, &summary.filename, h).await,
            None => None,
        };
        if passes_filter(
            &summary,
            match_result.as_ref(),
            request.percentage_threshold,
            &request.categories,
        ) {
            rows.push(ExportRow {
                summary,
                match_result,
            });
        }
    }
    Ok((total, rows))
}
