//! Tabular export of screening results.
//!
//! One flat CSV row per document: categories joined into a single delimited
//! cell, multi-line fields (experience, lacking) flattened to one line.
//! The same filter predicate backs both the CSV download and the shortlist
//! endpoint.

use anyhow::Result;

use crate::models::record::{MatchResult, ResumeSummary};
use crate::parsing::NOT_AVAILABLE;
use crate::taxonomy::Category;

const HEADERS: &[&str] = &[
    "filename",
    "name",
    "email",
    "phone",
    "qualification",
    "experience",
    "experience_years",
    "skills",
    "professional_evaluation",
    "personal_evaluation",
    "primary_role",
    "specific_role",
    "categories",
    "percentage_match",
    "justification",
    "lacking",
];

/// One export row: a summary plus the match outcome for the requested job
/// description, when one exists.
pub struct ExportRow {
    pub summary: ResumeSummary,
    pub match_result: Option<MatchResult>,
}

/// Shared filter for export and shortlist: a percentage floor (records
/// without a parsed percentage count as 0) and an any-of category set.
/// An empty category list means no category constraint.
pub fn passes_filter(
    summary: &ResumeSummary,
    match_result: Option<&MatchResult>,
    percentage_threshold: Option<f64>,
    categories: &[Category],
) -> bool {
    if let Some(threshold) = percentage_threshold {
        if threshold > 0.0 {
            let percentage = match_result
                .and_then(|m| m.percentage_match)
                .unwrap_or(0);
            if f64::from(percentage) < threshold {
                return false;
            }
        }
    }
    if !categories.is_empty() && !summary.categories.iter().any(|c| categories.contains(c)) {
        return false;
    }
    true
}

/// Serializes rows to CSV bytes.
pub fn write_csv(rows: &[ExportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        let summary = &row.summary;
        let categories = summary
            .categories
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let percentage = row
            .match_result
            .as_ref()
            .and_then(|m| m.percentage_match)
            .map(|p| format!("{p}%"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let justification = row
            .match_result
            .as_ref()
            .map(|m| m.justification.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let lacking = row
            .match_result
            .as_ref()
            .map(|m| flatten_multiline(&m.lacking))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let experience = flatten_multiline(&summary.experience);
        let years = format!("{:.1}", summary.experience_years);

        writer.write_record([
            summary.filename.as_str(),
            summary.name.as_str(),
            summary.email.as_str(),
            summary.phone.as_str(),
            summary.qualification.as_str(),
            experience.as_str(),
            years.as_str(),
            summary.skills.as_str(),
            summary.professional_evaluation.as_str(),
            summary.personal_evaluation.as_str(),
            summary.primary_role.as_str(),
            summary.specific_role.as_str(),
            categories.as_str(),
            percentage.as_str(),
            justification.as_str(),
            lacking.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(writer.into_inner()?)
}

/// Collapses a multi-line field to a single `; `-delimited line, dropping
/// the normalized bullet prefixes.
fn flatten_multiline(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().trim_start_matches("- ").trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(filename: &str, categories: Vec<Category>) -> ResumeSummary {
        ResumeSummary {
            filename: filename.to_string(),
            name: "Priya Sharma".to_string(),
            email: "priya@example.com".to_string(),
            phone: "+91-7285868035".to_string(),
            qualification: "B.Tech".to_string(),
            experience: "- Acme Corp, Engineer, Jan 2020 - Dec 2021\n- Beta, Senior, Jan 2022 - present"
                .to_string(),
            experience_years: 5.3,
            skills: "python, django".to_string(),
            professional_evaluation: "Strong".to_string(),
            personal_evaluation: "Clear".to_string(),
            primary_role: "Backend Developer".to_string(),
            specific_role: NOT_AVAILABLE.to_string(),
            categories,
        }
    }

    fn match_result(percentage: Option<u8>) -> MatchResult {
        MatchResult {
            filename: "a.pdf".to_string(),
            percentage_match: percentage,
            justification: "Solid stack overlap".to_string(),
            lacking: "- AWS\n- Terraform".to_string(),
        }
    }

    #[test]
    fn test_csv_flattens_multiline_fields() {
        let rows = vec![ExportRow {
            summary: summary("a.pdf", vec![Category::Backend]),
            match_result: Some(match_result(Some(85))),
        }];
        let bytes = write_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("filename,name,email"));
        let row = lines.next().unwrap();
        assert!(row.contains("Acme Corp, Engineer, Jan 2020 - Dec 2021; Beta, Senior, Jan 2022 - present"));
        assert!(row.contains("AWS; Terraform"));
        assert!(row.contains("85%"));
        assert!(!row.contains('\n'));
    }

    #[test]
    fn test_csv_joins_categories() {
        let rows = vec![ExportRow {
            summary: summary("a.pdf", vec![Category::Backend, Category::CloudEngineer]),
            match_result: None,
        }];
        let text = String::from_utf8(write_csv(&rows).unwrap()).unwrap();
        assert!(text.contains("Backend; Cloud Engineer"));
    }

    #[test]
    fn test_csv_without_match_uses_markers() {
        let rows = vec![ExportRow {
            summary: summary("a.pdf", vec![Category::Backend]),
            match_result: None,
        }];
        let text = String::from_utf8(write_csv(&rows).unwrap()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.ends_with("N/A,N/A,N/A"));
    }

    #[test]
    fn test_filter_by_percentage_threshold() {
        let s = summary("a.pdf", vec![Category::Backend]);
        assert!(passes_filter(&s, Some(&match_result(Some(85))), Some(70.0), &[]));
        assert!(!passes_filter(&s, Some(&match_result(Some(60))), Some(70.0), &[]));
        // No match result counts as 0%.
        assert!(!passes_filter(&s, None, Some(70.0), &[]));
        // A zero threshold is no constraint.
        assert!(passes_filter(&s, None, Some(0.0), &[]));
    }

    #[test]
    fn test_filter_by_category() {
        let s = summary("a.pdf", vec![Category::Backend]);
        assert!(passes_filter(&s, None, None, &[Category::Backend, Category::Testing]));
        assert!(!passes_filter(&s, None, None, &[Category::Frontend]));
        assert!(passes_filter(&s, None, None, &[]));
    }
}
