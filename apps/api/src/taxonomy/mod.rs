//! Job-function taxonomy and the three-tier categorizer.
//!
//! Tier 1: direct role-marker match on the primary role string, first match
//! wins, checked in a fixed priority order (the `Category` declaration
//! order). Tier 2: weighted keyword scoring over role + skills when no
//! marker fires. Tier 3 lives in `infer_from_justification`: a best-effort
//! recovery pass over match-justification text, applied by the screening
//! pipeline only when the primary classification was inconclusive.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parsing::NOT_AVAILABLE;

/// The closed category set. Declaration order is the fixed priority order:
/// Tier 1 checks rules in this order and Tier 2 breaks score ties with it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Category {
    Testing,
    #[serde(rename = "Full Stack")]
    FullStack,
    #[serde(rename = "AI/ML")]
    AiMl,
    Frontend,
    Backend,
    Mobile,
    #[serde(rename = "Cloud Engineer")]
    CloudEngineer,
    DevOps,
    #[serde(rename = "HR")]
    Hr,
    Uncategorized,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Testing => "Testing",
            Category::FullStack => "Full Stack",
            Category::AiMl => "AI/ML",
            Category::Frontend => "Frontend",
            Category::Backend => "Backend",
            Category::Mobile => "Mobile",
            Category::CloudEngineer => "Cloud Engineer",
            Category::DevOps => "DevOps",
            Category::Hr => "HR",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct CategoryRule {
    category: Category,
    /// Tier-1 markers, matched against the primary role string only.
    role_markers: &'static [&'static str],
    /// Tier-2 scoring keywords: +2 when found in the role, +1 in skills.
    keywords: &'static [&'static str],
}

/// Ordered rule table — one entry per category, in priority order.
const RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::Testing,
        role_markers: &[
            "qa",
            "quality assurance",
            "tester",
            "test engineer",
            "testing",
            "sdet",
            "automation engineer",
        ],
        keywords: &[
            "selenium",
            "pytest",
            "junit",
            "testng",
            "cypress",
            "playwright",
            "test automation",
            "manual testing",
            "api testing",
            "qa",
        ],
    },
    CategoryRule {
        category: Category::FullStack,
        role_markers: &["full stack", "full-stack", "fullstack", "mern", "mean stack"],
        keywords: &["mern", "mean", "full stack", "fullstack"],
    },
    CategoryRule {
        category: Category::AiMl,
        role_markers: &[
            "machine learning",
            "ml engineer",
            "data scientist",
            "data science",
            "ai engineer",
            "deep learning",
            "nlp",
        ],
        keywords: &[
            "machine learning",
            "deep learning",
            "tensorflow",
            "pytorch",
            "scikit-learn",
            "nlp",
            "computer vision",
            "pandas",
            "numpy",
            "llm",
            "data science",
        ],
    },
    CategoryRule {
        category: Category::Frontend,
        role_markers: &[
            "frontend",
            "front end",
            "front-end",
            "ui developer",
            "ui engineer",
            "web designer",
        ],
        keywords: &[
            "react",
            "angular",
            "vue",
            "javascript",
            "typescript",
            "html",
            "css",
            "redux",
            "next.js",
            "tailwind",
            "bootstrap",
            "jquery",
        ],
    },
    CategoryRule {
        category: Category::Backend,
        role_markers: &[
            "backend",
            "back end",
            "back-end",
            "python developer",
            "java developer",
            "node developer",
            "node.js developer",
            "php developer",
            "golang developer",
            ".net developer",
        ],
        keywords: &[
            "python",
            "java",
            "node",
            "django",
            "flask",
            "fastapi",
            "spring",
            "spring boot",
            "php",
            "laravel",
            "rails",
            "golang",
            "c#",
            ".net",
            "sql",
            "postgresql",
            "mysql",
            "mongodb",
            "rest api",
            "microservices",
        ],
    },
    CategoryRule {
        category: Category::Mobile,
        role_markers: &[
            "android",
            "ios developer",
            "mobile developer",
            "mobile engineer",
            "flutter",
            "react native",
        ],
        keywords: &[
            "android",
            "ios",
            "swift",
            "kotlin",
            "flutter",
            "react native",
            "dart",
            "xamarin",
        ],
    },
    CategoryRule {
        category: Category::CloudEngineer,
        role_markers: &["cloud engineer", "cloud architect", "aws engineer", "azure engineer"],
        keywords: &["aws", "azure", "gcp", "cloud", "ec2", "s3", "lambda", "cloudformation"],
    },
    CategoryRule {
        category: Category::DevOps,
        role_markers: &["devops", "sre", "site reliability", "platform engineer"],
        keywords: &[
            "docker",
            "kubernetes",
            "jenkins",
            "terraform",
            "ansible",
            "ci/cd",
            "gitlab ci",
            "prometheus",
            "grafana",
            "helm",
        ],
    },
    CategoryRule {
        category: Category::Hr,
        role_markers: &[
            "hr",
            "human resources",
            "recruiter",
            "talent acquisition",
            "people operations",
        ],
        keywords: &[
            "recruitment",
            "onboarding",
            "payroll",
            "talent acquisition",
            "hris",
            "employee engagement",
        ],
    },
];

/// Maps a free-text primary role plus skills list to categories.
/// Always non-empty: at least `{Uncategorized}`.
pub fn categorize(primary_role: &str, skills: &str) -> BTreeSet<Category> {
    let role = normalize_input(primary_role);
    let skills = normalize_input(skills);

    // Tier 1: first marker match wins, in priority order.
    if !role.is_empty() {
        for rule in RULES {
            if rule.role_markers.iter().any(|m| contains_term(&role, m)) {
                return BTreeSet::from([rule.category]);
            }
        }
    }

    // Tier 2: weighted keyword scoring. Iterating in priority order and
    // replacing only on a strictly higher score implements the tie-break.
    let mut best: Option<(u32, Category)> = None;
    for rule in RULES {
        let mut score = 0;
        for keyword in rule.keywords {
            if contains_term(&role, keyword) {
                score += 2;
            }
            if contains_term(&skills, keyword) {
                score += 1;
            }
        }
        if score > best.map_or(0, |(s, _)| s) {
            best = Some((score, rule.category));
        }
    }

    match best {
        Some((_, category)) => BTreeSet::from([category]),
        None => BTreeSet::from([Category::Uncategorized]),
    }
}

/// Tier-3 output: a disambiguated role label and its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleInference {
    pub category: Category,
    pub specific_role: &'static str,
}

struct InferenceRule {
    terms: &'static [&'static str],
    category: Category,
    specific_role: &'static str,
}

/// The smaller Tier-3 disambiguation table, scanned against justification
/// text. First match wins.
const INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        terms: &["testing", "automation", "selenium", "qa"],
        category: Category::Testing,
        specific_role: "QA Engineer",
    },
    InferenceRule {
        terms: &["python", "flask", "fastapi", "django"],
        category: Category::Backend,
        specific_role: "Python Developer",
    },
    InferenceRule {
        terms: &["java", "spring"],
        category: Category::Backend,
        specific_role: "Java Developer",
    },
    InferenceRule {
        terms: &["react", "angular", "vue", "javascript", "css", "frontend"],
        category: Category::Frontend,
        specific_role: "Frontend Developer",
    },
    InferenceRule {
        terms: &["machine learning", "data science", "tensorflow", "pytorch", "nlp"],
        category: Category::AiMl,
        specific_role: "Machine Learning Engineer",
    },
    InferenceRule {
        terms: &["android", "ios", "flutter", "react native"],
        category: Category::Mobile,
        specific_role: "Mobile Developer",
    },
    InferenceRule {
        terms: &["aws", "azure", "gcp", "cloud"],
        category: Category::CloudEngineer,
        specific_role: "Cloud Engineer",
    },
    InferenceRule {
        terms: &["devops", "docker", "kubernetes", "terraform", "ci/cd"],
        category: Category::DevOps,
        specific_role: "DevOps Engineer",
    },
];

/// Minimum percentage match before the justification-driven recovery pass
/// (Tier 3) is allowed to run.
pub const RECLASSIFY_THRESHOLD: u8 = 70;

/// Scans justification text for a disambiguating discipline. The model's
/// free-text justification sometimes names the actual role even when the
/// structured primary-role field was empty; this is best-effort recovery,
/// not authoritative.
pub fn infer_from_justification(justification: &str) -> Option<RoleInference> {
    let text = normalize_input(justification);
    if text.is_empty() {
        return None;
    }
    for rule in INFERENCE_RULES {
        if rule.terms.iter().any(|t| contains_term(&text, t)) {
            return Some(RoleInference {
                category: rule.category,
                specific_role: rule.specific_role,
            });
        }
    }
    None
}

fn normalize_input(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
        return String::new();
    }
    trimmed.to_lowercase()
}

/// Word-boundary containment: `term` must not be embedded in a longer
/// alphanumeric token, so "hr" never fires inside "chrome".
fn contains_term(haystack: &str, term: &str) -> bool {
    let mut search_from = 0;
    while let Some(pos) = haystack[search_from..].find(term) {
        let at = search_from + pos;
        let end = at + term.len();
        let before_ok = haystack[..at]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        search_from = at + 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(category: Category) -> BTreeSet<Category> {
        BTreeSet::from([category])
    }

    #[test]
    fn test_tier1_qa_role_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                categorize("Quality Assurance Engineer", "selenium, pytest"),
                single(Category::Testing)
            );
        }
    }

    #[test]
    fn test_tier1_fires_before_scoring() {
        // Skills scream Frontend, but the role marker decides.
        assert_eq!(
            categorize("QA Engineer", "react, redux, css, javascript"),
            single(Category::Testing)
        );
    }

    #[test]
    fn test_tier1_priority_order_testing_beats_fullstack() {
        assert_eq!(
            categorize("Full Stack QA Engineer", ""),
            single(Category::Testing)
        );
    }

    #[test]
    fn test_tier2_frontend_fallback_from_skills() {
        assert_eq!(categorize("", "react, redux, css"), single(Category::Frontend));
    }

    #[test]
    fn test_tier2_role_keywords_weigh_double() {
        // "python" in the role (+2) outweighs one frontend skill (+1).
        assert_eq!(
            categorize("seasoned python engineer", "css"),
            single(Category::Backend)
        );
    }

    #[test]
    fn test_tier2_tie_resolved_by_priority_order() {
        // One Frontend keyword and one Backend keyword in skills: 1 vs 1,
        // Frontend precedes Backend in the priority order.
        assert_eq!(categorize("", "react, django"), single(Category::Frontend));
    }

    #[test]
    fn test_no_signal_is_uncategorized() {
        assert_eq!(categorize("", ""), single(Category::Uncategorized));
        assert_eq!(
            categorize("ledger clerk", "bookkeeping, filing"),
            single(Category::Uncategorized)
        );
    }

    #[test]
    fn test_not_available_treated_as_empty() {
        assert_eq!(categorize("N/A", "N/A"), single(Category::Uncategorized));
    }

    #[test]
    fn test_hr_marker_requires_word_boundary() {
        // "chrome extensions" must not trip the "hr" marker.
        assert_eq!(
            categorize("chrome extension developer", "chrome"),
            single(Category::Uncategorized)
        );
        assert_eq!(categorize("HR Executive", ""), single(Category::Hr));
    }

    #[test]
    fn test_infer_from_justification_testing_terms() {
        let inference =
            infer_from_justification("Strong automation background with Selenium test suites")
                .unwrap();
        assert_eq!(inference.category, Category::Testing);
        assert_eq!(inference.specific_role, "QA Engineer");
    }

    #[test]
    fn test_infer_from_justification_python_terms() {
        let inference =
            infer_from_justification("Has shipped Flask and FastAPI services in production")
                .unwrap();
        assert_eq!(inference.category, Category::Backend);
        assert_eq!(inference.specific_role, "Python Developer");
    }

    #[test]
    fn test_infer_from_justification_no_signal() {
        assert!(infer_from_justification("A generally strong candidate").is_none());
        assert!(infer_from_justification("").is_none());
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(serde_json::to_string(&Category::FullStack).unwrap(), "\"Full Stack\"");
        assert_eq!(serde_json::to_string(&Category::AiMl).unwrap(), "\"AI/ML\"");
        assert_eq!(serde_json::to_string(&Category::Hr).unwrap(), "\"HR\"");
        let parsed: Category = serde_json::from_str("\"Cloud Engineer\"").unwrap();
        assert_eq!(parsed, Category::CloudEngineer);
    }
}
