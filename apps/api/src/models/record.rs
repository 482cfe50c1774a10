//! Screening result records.
//!
//! One `ResumeSummary` per document per session, one `MatchResult` per
//! (document, job description) pair. The cache owns the stored values;
//! callers always work on copies.

use serde::{Deserialize, Serialize};

use crate::parsing::NOT_AVAILABLE;
use crate::taxonomy::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub filename: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub qualification: String,
    /// Raw multi-line experience text as extracted.
    pub experience: String,
    /// Merged non-overlapping tenure in fractional years.
    pub experience_years: f64,
    pub skills: String,
    pub professional_evaluation: String,
    pub personal_evaluation: String,
    pub primary_role: String,
    /// Disambiguated role label from the justification recovery pass.
    pub specific_role: String,
    pub categories: Vec<Category>,
}

impl ResumeSummary {
    /// Placeholder record for a document whose upstream processing failed.
    /// The filename is preserved and the failure message lands in the
    /// evaluation slots, so a batch of N documents always yields N records.
    pub fn failure(filename: &str, message: &str) -> Self {
        Self {
            filename: filename.to_string(),
            name: NOT_AVAILABLE.to_string(),
            email: NOT_AVAILABLE.to_string(),
            phone: NOT_AVAILABLE.to_string(),
            qualification: NOT_AVAILABLE.to_string(),
            experience: String::new(),
            experience_years: 0.0,
            skills: NOT_AVAILABLE.to_string(),
            professional_evaluation: message.to_string(),
            personal_evaluation: message.to_string(),
            primary_role: NOT_AVAILABLE.to_string(),
            specific_role: NOT_AVAILABLE.to_string(),
            categories: vec![Category::Uncategorized],
        }
    }

    /// A cached summary may be served again only when it carries a primary
    /// role; anything less is incomplete and must be recomputed.
    pub fn is_reusable(&self) -> bool {
        !self.primary_role.trim().is_empty() && self.primary_role != NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub filename: String,
    pub percentage_match: Option<u8>,
    pub justification: String,
    /// Multi-line list of missing keywords/skills.
    pub lacking: String,
}

impl MatchResult {
    pub fn failure(filename: &str, message: &str) -> Self {
        Self {
            filename: filename.to_string(),
            percentage_match: None,
            justification: message.to_string(),
            lacking: String::new(),
        }
    }

    /// A cached match is reusable only when the percentage actually parsed.
    pub fn is_reusable(&self) -> bool {
        self.percentage_match.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_record_preserves_filename_and_message() {
        let record = ResumeSummary::failure("candidate.pdf", "model invocation failed");
        assert_eq!(record.filename, "candidate.pdf");
        assert_eq!(record.professional_evaluation, "model invocation failed");
        assert_eq!(record.personal_evaluation, "model invocation failed");
        assert_eq!(record.categories, vec![Category::Uncategorized]);
        assert!(!record.is_reusable());
    }

    #[test]
    fn test_summary_reusable_requires_primary_role() {
        let mut record = ResumeSummary::failure("a.pdf", "x");
        assert!(!record.is_reusable());
        record.primary_role = "Backend Developer".to_string();
        assert!(record.is_reusable());
        record.primary_role = "  ".to_string();
        assert!(!record.is_reusable());
    }

    #[test]
    fn test_match_reusable_requires_percentage() {
        let mut result = MatchResult::failure("a.pdf", "timeout");
        assert!(!result.is_reusable());
        result.percentage_match = Some(0);
        assert!(result.is_reusable());
    }
}
