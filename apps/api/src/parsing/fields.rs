//! Field Extractor — locates labeled sections in raw model text and returns
//! a flat mapping of field name → cleaned value.
//!
//! The label synonym lists and value shapes are data (one rule table per
//! extraction mode), not per-field regex blocks. Label matching is
//! case-insensitive and tolerates emphasis wrapping, leading bullets, and an
//! optional colon/hyphen separator. A field whose section is missing or
//! malformed degrades to its empty marker on its own; sibling fields are
//! never affected, and `extract` itself never fails.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsing::normalize::{clean_block, clean_field, strip_emphasis};
use crate::parsing::NOT_AVAILABLE;

/// Which kind of model response is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// A stand-alone resume summary.
    Summary,
    /// A resume-vs-job-description match result.
    Match,
}

/// How a field's value is captured and validated.
#[derive(Debug, Clone, Copy)]
pub enum ValueShape {
    /// Single line of free text.
    Line,
    /// Multi-line capture extending until the next recognized label.
    Block,
    /// Multi-line capture extending until a blank line or the next label.
    BlockUntilBlank,
    /// A single `local@domain` token, or no match.
    Email,
    /// One of a bounded set of digit-grouping patterns, or no match.
    Phone,
    /// An integer 0–100 immediately followed by a percent sign.
    Percent,
}

/// One entry in the extraction rule table.
pub struct FieldRule {
    pub name: &'static str,
    pub labels: &'static [&'static str],
    pub shape: ValueShape,
}

pub const SUMMARY_RULES: &[FieldRule] = &[
    FieldRule {
        name: "name",
        labels: &["candidate name", "full name", "name"],
        shape: ValueShape::Line,
    },
    FieldRule {
        name: "email",
        labels: &["email address", "email id", "e-mail", "mail id", "email"],
        shape: ValueShape::Email,
    },
    FieldRule {
        name: "phone",
        labels: &[
            "phone number",
            "mobile number",
            "contact number",
            "phone",
            "mobile",
            "contact",
            "cell",
            "m no",
            "m. no",
        ],
        shape: ValueShape::Phone,
    },
    FieldRule {
        name: "qualification",
        labels: &["highest qualification", "qualifications", "qualification", "education"],
        shape: ValueShape::Line,
    },
    FieldRule {
        name: "experience",
        labels: &[
            "work experience",
            "professional experience",
            "employment history",
            "experience",
        ],
        shape: ValueShape::Block,
    },
    FieldRule {
        name: "skills",
        labels: &["technical skills", "key skills", "skill set", "skills"],
        shape: ValueShape::Line,
    },
    FieldRule {
        name: "professional_evaluation",
        labels: &["professional evaluation", "professional assessment", "evaluation"],
        shape: ValueShape::Line,
    },
    FieldRule {
        name: "personal_evaluation",
        labels: &["personal evaluation", "personal assessment", "personality"],
        shape: ValueShape::Line,
    },
    FieldRule {
        name: "primary_role",
        labels: &["primary role", "job role", "designation", "role"],
        shape: ValueShape::Line,
    },
];

pub const MATCH_RULES: &[FieldRule] = &[
    FieldRule {
        name: "percentage_match",
        labels: &["percentage match", "match percentage", "match score", "percentage"],
        shape: ValueShape::Percent,
    },
    FieldRule {
        name: "justification",
        labels: &["justification", "reasoning", "final thoughts", "analysis"],
        shape: ValueShape::Line,
    },
    FieldRule {
        name: "lacking",
        labels: &[
            "missing keywords",
            "missing skills",
            "lacking skills",
            "areas lacking",
            "lacking",
            "gaps",
        ],
        shape: ValueShape::BlockUntilBlank,
    },
];

static SUMMARY_MATCHERS: Lazy<Vec<Regex>> =
    Lazy::new(|| SUMMARY_RULES.iter().map(|r| label_regex(r.labels)).collect());
static MATCH_MATCHERS: Lazy<Vec<Regex>> =
    Lazy::new(|| MATCH_RULES.iter().map(|r| label_regex(r.labels)).collect());

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9._%+-]*@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

/// The bounded set of accepted phone shapes: 10 contiguous digits, or the
/// 5-5 / 4-3-3 / 4-4-2 groupings, optionally preceded by a country code in
/// parentheses or with a `+` prefix. Anything else is no match — a random
/// numeric token is never guessed to be a phone number.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\(\s*\+?\d{1,3}\s*\)[\s-]*|\+\d{1,3}[\s-]?)?\b(?:\d{5}[\s-]\d{5}|\d{4}[\s-]\d{3}[\s-]\d{3}|\d{4}[\s-]\d{4}[\s-]\d{2}|\d{10})\b",
    )
    .unwrap()
});

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,3})\s*%").unwrap());

impl ExtractionMode {
    fn rules(self) -> &'static [FieldRule] {
        match self {
            ExtractionMode::Summary => SUMMARY_RULES,
            ExtractionMode::Match => MATCH_RULES,
        }
    }

    fn matchers(self) -> &'static [Regex] {
        match self {
            ExtractionMode::Summary => &SUMMARY_MATCHERS,
            ExtractionMode::Match => &MATCH_MATCHERS,
        }
    }
}

/// Builds the tolerant label matcher for one field's synonym list.
///
/// A line is a label line when it starts (after optional bullets) with one of
/// the synonyms followed by a `:`/`-` separator and the value, or when the
/// line is the bare label and the value continues on the following line.
/// Trailing prose after a bare label does NOT count — that keeps sentences
/// like "Experience in Java since 2015" from masquerading as section labels.
fn label_regex(labels: &[&str]) -> Regex {
    let alts = labels
        .iter()
        .map(|l| regex::escape(l).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)^\s*(?:[-•‣▪>]+\s*)*(?:{alts})\s*(?:[:\-–—]\s*(.*))?$"
    ))
    .unwrap()
}

/// Extracts every field defined for `mode` from `text`.
///
/// The returned map always contains one entry per rule: a cleaned non-empty
/// string, or `"N/A"` for single-value shapes / `""` for block shapes when
/// the field is missing or malformed. Never fails.
pub fn extract(text: &str, mode: ExtractionMode) -> BTreeMap<&'static str, String> {
    // Emphasis is stripped up front so `**Name:** John` and `Name: John`
    // hit the same matcher.
    let lines: Vec<String> = text.lines().map(strip_emphasis).collect();

    let mut fields = BTreeMap::new();
    for (rule, matcher) in mode.rules().iter().zip(mode.matchers().iter()) {
        let value = extract_field(&lines, rule, matcher, mode.matchers());
        let value = match (value, rule.shape) {
            (Some(v), _) => v,
            (None, ValueShape::Block | ValueShape::BlockUntilBlank) => String::new(),
            (None, _) => NOT_AVAILABLE.to_string(),
        };
        fields.insert(rule.name, value);
    }
    fields
}

fn extract_field(
    lines: &[String],
    rule: &FieldRule,
    matcher: &Regex,
    all_matchers: &[Regex],
) -> Option<String> {
    let (idx, inline) = find_label(lines, matcher)?;
    match rule.shape {
        ValueShape::Line => {
            let candidate = inline_or_next(lines, idx, inline, all_matchers)?;
            let cleaned = clean_field(&candidate);
            (cleaned != NOT_AVAILABLE).then_some(cleaned)
        }
        ValueShape::Email => {
            let candidate = inline_or_next(lines, idx, inline, all_matchers)?;
            EMAIL_RE.find(&candidate).map(|m| m.as_str().to_string())
        }
        ValueShape::Phone => {
            let candidate = inline_or_next(lines, idx, inline, all_matchers)?;
            PHONE_RE.find(&candidate).map(|m| m.as_str().to_string())
        }
        ValueShape::Percent => {
            let candidate = inline_or_next(lines, idx, inline, all_matchers)?;
            PERCENT_RE
                .captures_iter(&candidate)
                .filter_map(|c| c[1].parse::<u8>().ok())
                .find(|p| *p <= 100)
                .map(|p| p.to_string())
        }
        ValueShape::Block => {
            let block = collect_block(lines, idx, inline, all_matchers, false);
            (!block.is_empty()).then_some(block)
        }
        ValueShape::BlockUntilBlank => {
            let block = collect_block(lines, idx, inline, all_matchers, true);
            (!block.is_empty()).then_some(block)
        }
    }
}

/// Finds the first line matching the label, returning its index and the
/// inline remainder after the separator, if any.
fn find_label(lines: &[String], matcher: &Regex) -> Option<(usize, Option<String>)> {
    for (i, line) in lines.iter().enumerate() {
        if let Some(caps) = matcher.captures(line) {
            return Some((i, caps.get(1).map(|m| m.as_str().to_string())));
        }
    }
    None
}

/// Resolves a single-value field's candidate text: the inline remainder when
/// present, otherwise the first following non-empty line that is not itself
/// a section label.
fn inline_or_next(
    lines: &[String],
    idx: usize,
    inline: Option<String>,
    all_matchers: &[Regex],
) -> Option<String> {
    if let Some(rest) = inline {
        if !rest.trim().is_empty() {
            return Some(rest);
        }
    }
    for line in &lines[idx + 1..] {
        if line.trim().is_empty() {
            continue;
        }
        if is_label_line(line, all_matchers) {
            return None;
        }
        return Some(line.clone());
    }
    None
}

fn collect_block(
    lines: &[String],
    idx: usize,
    inline: Option<String>,
    all_matchers: &[Regex],
    stop_at_blank: bool,
) -> String {
    let mut collected: Vec<String> = Vec::new();
    if let Some(rest) = inline {
        if !rest.trim().is_empty() {
            collected.push(rest);
        }
    }
    for line in &lines[idx + 1..] {
        if line.trim().is_empty() {
            if stop_at_blank && !collected.is_empty() {
                break;
            }
            continue;
        }
        if is_label_line(line, all_matchers) {
            break;
        }
        collected.push(line.clone());
    }
    clean_block(&collected.join("\n"))
}

fn is_label_line(line: &str, matchers: &[Regex]) -> bool {
    matchers.iter().any(|m| m.is_match(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_RESPONSE: &str = r#"
Here is the summary of the resume:

**Name:** Priya Sharma
**Email:** priya.sharma@example.com
**Phone:** (+91) 72858 68035
**Qualification:** B.Tech, Computer Science
**Experience:**
- Acme Corp, Software Engineer, Jan 2020 - Jun 2021
- Beta Systems, Senior Engineer, Mar 2021 - Dec 2022
**Skills:** Python, Django, PostgreSQL, Docker
**Professional Evaluation:** Strong backend fundamentals with production ownership.
**Personal Evaluation:** Clear communicator, collaborative.
**Primary Role:** Backend Developer
"#;

    const MATCH_RESPONSE: &str = r#"
**Percentage Match:** 85%
**Justification:** Solid overlap on Python and Django; lacks cloud exposure.
**Lacking:**
- AWS
- Terraform

Overall a promising candidate.
"#;

    #[test]
    fn test_summary_extracts_all_fields() {
        let fields = extract(SUMMARY_RESPONSE, ExtractionMode::Summary);
        assert_eq!(fields["name"], "Priya Sharma");
        assert_eq!(fields["email"], "priya.sharma@example.com");
        assert_eq!(fields["phone"], "(+91) 72858 68035");
        assert_eq!(fields["qualification"], "B.Tech, Computer Science");
        assert_eq!(fields["skills"], "Python, Django, PostgreSQL, Docker");
        assert_eq!(
            fields["professional_evaluation"],
            "Strong backend fundamentals with production ownership."
        );
        assert_eq!(fields["personal_evaluation"], "Clear communicator, collaborative.");
        assert_eq!(fields["primary_role"], "Backend Developer");
    }

    #[test]
    fn test_experience_block_stops_at_next_label() {
        let fields = extract(SUMMARY_RESPONSE, ExtractionMode::Summary);
        assert_eq!(
            fields["experience"],
            "- Acme Corp, Software Engineer, Jan 2020 - Jun 2021\n- Beta Systems, Senior Engineer, Mar 2021 - Dec 2022"
        );
    }

    #[test]
    fn test_every_summary_field_present_even_on_empty_input() {
        let fields = extract("", ExtractionMode::Summary);
        assert_eq!(fields.len(), SUMMARY_RULES.len());
        assert_eq!(fields["name"], NOT_AVAILABLE);
        assert_eq!(fields["experience"], "");
    }

    #[test]
    fn test_every_match_field_present_even_on_empty_input() {
        let fields = extract("", ExtractionMode::Match);
        assert_eq!(fields.len(), MATCH_RULES.len());
        assert_eq!(fields["percentage_match"], NOT_AVAILABLE);
        assert_eq!(fields["lacking"], "");
    }

    #[test]
    fn test_label_synonyms_are_recognized() {
        let text = "Candidate Name: Ravi\nMobile Number: 7285868035\nEducation: MCA";
        let fields = extract(text, ExtractionMode::Summary);
        assert_eq!(fields["name"], "Ravi");
        assert_eq!(fields["phone"], "7285868035");
        assert_eq!(fields["qualification"], "MCA");
    }

    #[test]
    fn test_label_matching_is_case_insensitive() {
        let fields = extract("NAME - Anil Kumar", ExtractionMode::Summary);
        assert_eq!(fields["name"], "Anil Kumar");
    }

    #[test]
    fn test_value_on_following_line() {
        let fields = extract("Name:\nSunita Rao\nEmail: s.rao@mail.dev", ExtractionMode::Summary);
        assert_eq!(fields["name"], "Sunita Rao");
        assert_eq!(fields["email"], "s.rao@mail.dev");
    }

    #[test]
    fn test_bare_label_with_trailing_prose_is_not_a_label() {
        // "Experience in Java since 2015" must not open an experience section.
        let fields = extract("Experience in Java since 2015", ExtractionMode::Summary);
        assert_eq!(fields["experience"], "");
    }

    #[test]
    fn test_email_requires_single_token() {
        let fields = extract("Email: not listed on the resume", ExtractionMode::Summary);
        assert_eq!(fields["email"], NOT_AVAILABLE);
    }

    #[test]
    fn test_phone_rejects_unrecognized_digit_shapes() {
        for text in ["Phone: 12345", "Phone: 123456789012345", "Phone: extension 4432"] {
            let fields = extract(text, ExtractionMode::Summary);
            assert_eq!(fields["phone"], NOT_AVAILABLE, "for {text:?}");
        }
    }

    #[test]
    fn test_phone_accepts_grouped_patterns() {
        let cases = [
            ("Phone: 7285868035", "7285868035"),
            ("Phone: 72858 68035", "72858 68035"),
            ("Phone: 7285 868 035", "7285 868 035"),
            ("Phone: 7285-8680-35", "7285-8680-35"),
            ("Phone: +917285868035", "+917285868035"),
        ];
        for (text, expected) in cases {
            let fields = extract(text, ExtractionMode::Summary);
            assert_eq!(fields["phone"], expected, "for {text:?}");
        }
    }

    #[test]
    fn test_percentage_requires_percent_sign() {
        let fields = extract("Percentage Match: 85", ExtractionMode::Match);
        assert_eq!(fields["percentage_match"], NOT_AVAILABLE);

        let fields = extract(MATCH_RESPONSE, ExtractionMode::Match);
        assert_eq!(fields["percentage_match"], "85");
    }

    #[test]
    fn test_percentage_over_100_is_rejected() {
        let fields = extract("Percentage Match: 120%", ExtractionMode::Match);
        assert_eq!(fields["percentage_match"], NOT_AVAILABLE);
    }

    #[test]
    fn test_lacking_stops_at_blank_line() {
        let fields = extract(MATCH_RESPONSE, ExtractionMode::Match);
        assert_eq!(fields["lacking"], "- AWS\n- Terraform");
        assert_eq!(
            fields["justification"],
            "Solid overlap on Python and Django; lacks cloud exposure."
        );
    }

    #[test]
    fn test_one_malformed_section_does_not_blank_the_record() {
        // Phone section holds garbage; every other field still populates.
        let text = "Name: Meena Iyer\nPhone: ??!!--\nSkills: selenium, pytest";
        let fields = extract(text, ExtractionMode::Summary);
        assert_eq!(fields["name"], "Meena Iyer");
        assert_eq!(fields["phone"], NOT_AVAILABLE);
        assert_eq!(fields["skills"], "selenium, pytest");
    }

    #[test]
    fn test_literal_not_available_value_maps_to_sentinel() {
        let fields = extract("Name: N/A", ExtractionMode::Summary);
        assert_eq!(fields["name"], NOT_AVAILABLE);
    }
}
