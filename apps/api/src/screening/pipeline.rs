//! Record assembly: raw model text in, typed screening records out.
//!
//! Every function here is pure. Upstream failures never reach these
//! functions — handlers substitute `ResumeSummary::failure` /
//! `MatchResult::failure` before this layer is involved.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::record::{MatchResult, ResumeSummary};
use crate::parsing::experience::total_years;
use crate::parsing::fields::{extract, ExtractionMode};
use crate::parsing::phone::standardize;
use crate::parsing::NOT_AVAILABLE;
use crate::taxonomy::{categorize, infer_from_justification, Category, RECLASSIFY_THRESHOLD};

/// Builds a summary record from a raw summarize-mode model response.
pub fn summary_from_response(filename: &str, raw: &str, reference: NaiveDate) -> ResumeSummary {
    let mut fields = extract(raw, ExtractionMode::Summary);
    let mut take = |name: &str| fields.remove(name).unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let experience = take("experience");
    let skills = take("skills");
    let primary_role = take("primary_role");
    let categories: Vec<Category> = categorize(&primary_role, &skills).into_iter().collect();

    ResumeSummary {
        filename: filename.to_string(),
        name: take("name"),
        email: take("email"),
        phone: standardize(&take("phone")),
        qualification: take("qualification"),
        experience_years: total_years(&experience, reference),
        experience,
        skills,
        professional_evaluation: take("professional_evaluation"),
        personal_evaluation: take("personal_evaluation"),
        primary_role,
        specific_role: NOT_AVAILABLE.to_string(),
        categories,
    }
}

/// Builds a match record from a raw match-mode model response.
pub fn match_from_response(filename: &str, raw: &str) -> MatchResult {
    let mut fields = extract(raw, ExtractionMode::Match);
    let mut take = |name: &str| fields.remove(name).unwrap_or_default();

    let percentage_match = take("percentage_match").parse::<u8>().ok();

    MatchResult {
        filename: filename.to_string(),
        percentage_match,
        justification: take("justification"),
        lacking: take("lacking"),
    }
}

/// Tier-3 reclassification: when a strong match (≥ 70%) produced a record
/// that is still Uncategorized or lacks a primary role, mine the match
/// justification for the actual discipline. Returns true when the summary
/// was changed (callers should refresh the cached copy).
///
/// A conclusive Tier-1/Tier-2 category is never overridden — this pass only
/// fills vacuums.
pub fn reclassify_from_match(summary: &mut ResumeSummary, result: &MatchResult) -> bool {
    let Some(percentage) = result.percentage_match else {
        return false;
    };
    if percentage < RECLASSIFY_THRESHOLD {
        return false;
    }

    let uncategorized = summary
        .categories
        .iter()
        .all(|c| *c == Category::Uncategorized);
    let role_missing =
        summary.primary_role.trim().is_empty() || summary.primary_role == NOT_AVAILABLE;
    if !uncategorized && !role_missing {
        return false;
    }

    let Some(inference) = infer_from_justification(&result.justification) else {
        return false;
    };

    summary.specific_role = inference.specific_role.to_string();
    if role_missing {
        summary.primary_role = inference.specific_role.to_string();
    }
    if uncategorized {
        summary.categories = vec![inference.category];
    }
    true
}

/// Groups result filenames by category for the response payload. A record
/// appears under every category it carries.
pub fn categorized_results<'a, I>(records: I) -> BTreeMap<Category, Vec<String>>
where
    I: IntoIterator<Item = &'a ResumeSummary>,
{
    let mut grouped: BTreeMap<Category, Vec<String>> = BTreeMap::new();
    for record in records {
        for category in &record.categories {
            grouped
                .entry(*category)
                .or_default()
                .push(record.filename.clone());
        }
    }
    grouped
}
