//! Experience Interval Aggregator.
//!
//! Parses the "start – end" employment periods embedded in an extracted
//! experience block (mixed formats: "Mon YYYY", "MM/YYYY", bare "YYYY",
//! open-ended "present") and reconciles them into a single total-tenure
//! figure. Overlapping roles at the same employer are merged so they are not
//! double-counted.
//!
//! All arithmetic runs on half-open month indices. An explicit end month
//! counts as worked ("Jan 2020 - Dec 2022" is 36 months); an open end counts
//! the complete months before the reference month ("Jan 2022 - present" at
//! reference Apr 2025 is 39 months). The reference date is a parameter, not
//! wall-clock time, so results are deterministic.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

const DATE_TOKEN: &str = r"(?:[A-Za-z]{3,9}\.?,?\s*\d{4}|\d{1,2}\s*/\s*\d{4}|\d{4})";

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)(?P<start>{DATE_TOKEN})\s*(?:-|–|—|to|until|through)\s*(?P<end>{DATE_TOKEN}|present|current|ongoing|now|till\s*date|date)"
    ))
    .unwrap()
});

static MONTH_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([A-Za-z]{3,9})\.?,?\s*(\d{4})").unwrap());
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})\s*/\s*(\d{4})").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Total non-overlapping tenure in fractional years, rounded to one decimal.
/// Unparseable periods contribute nothing; empty input yields 0.0.
pub fn total_years(experience_text: &str, reference: NaiveDate) -> f64 {
    let months = merged_months(experience_text, reference);
    (f64::from(months) / 12.0 * 10.0).round() / 10.0
}

/// Total non-overlapping tenure in whole months.
pub fn merged_months(experience_text: &str, reference: NaiveDate) -> u32 {
    let mut intervals: Vec<(i32, i32)> = split_periods(experience_text)
        .filter_map(|period| parse_period(period, reference))
        .collect();
    intervals.sort_unstable();

    let mut total = 0;
    let mut current: Option<(i32, i32)> = None;
    for (start, end) in intervals {
        match current {
            Some((cur_start, cur_end)) if start <= cur_end => {
                current = Some((cur_start, cur_end.max(end)));
            }
            Some((cur_start, cur_end)) => {
                total += cur_end - cur_start;
                current = Some((start, end));
            }
            None => current = Some((start, end)),
        }
    }
    if let Some((cur_start, cur_end)) = current {
        total += cur_end - cur_start;
    }
    total.max(0) as u32
}

/// Splits an experience block into period substrings: distinct roles are
/// separated by `|` on a single line, or by line breaks.
fn split_periods(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .flat_map(|line| line.split('|'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses one period substring into a half-open `[start, end)` month-index
/// pair. Falls back to a 12-month placeholder when only a lone year is
/// present; returns None when the period is unparseable or inverted.
fn parse_period(period: &str, reference: NaiveDate) -> Option<(i32, i32)> {
    if let Some(caps) = RANGE_RE.captures(period) {
        let start = month_index(parse_date_token(&caps["start"])?);
        let end_token = &caps["end"];
        let end = match parse_date_token(end_token) {
            // Explicit end months are inclusive.
            Some(ym) => month_index(ym) + 1,
            // Open end: complete months up to the reference month.
            None => month_index((reference.year(), reference.month())),
        };
        if start > end {
            return None;
        }
        return Some((start, end));
    }

    // No range token: a lone 4-digit year is a deliberately lossy 1-year
    // placeholder for malformed input, not an error.
    let year: i32 = YEAR_RE.find(period)?.as_str().parse().ok()?;
    Some((year * 12, (year + 1) * 12))
}

fn month_index((year, month): (i32, u32)) -> i32 {
    year * 12 + month as i32 - 1
}

/// Parses a single date token to (year, month). Bare years resolve to
/// January. Open-end keywords ("present", "till date", ...) return None.
fn parse_date_token(token: &str) -> Option<(i32, u32)> {
    if let Some(caps) = NUMERIC_RE.captures(token) {
        let month: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        if (1..=12).contains(&month) && (1900..=2100).contains(&year) {
            return Some((year, month));
        }
        return None;
    }
    if let Some(caps) = MONTH_YEAR_RE.captures(token) {
        let name = caps[1].to_lowercase();
        let month = MONTHS.iter().position(|m| name.starts_with(m))? as u32 + 1;
        let year: i32 = caps[2].parse().ok()?;
        if (1900..=2100).contains(&year) {
            return Some((year, month));
        }
        return None;
    }
    let year: i32 = token.trim().parse().ok()?;
    (1900..=2100).contains(&year).then_some((year, 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(total_years("", reference()), 0.0);
        assert_eq!(total_years("no dates here at all", reference()), 0.0);
    }

    #[test]
    fn test_overlapping_intervals_merge() {
        // Jan 2020–Jun 2021 and Mar 2021–Dec 2022 merge to Jan 2020–Dec 2022.
        let text = "Acme, Engineer, Jan 2020 - Jun 2021 | Beta, Senior Engineer, Mar 2021 - Dec 2022";
        assert_eq!(merged_months(text, reference()), 36);
        assert_eq!(total_years(text, reference()), 3.0);
    }

    #[test]
    fn test_disjoint_bare_years_are_not_merged() {
        let text = "Acme (2018)\nBeta (2021)";
        assert_eq!(total_years(text, reference()), 2.0);
    }

    #[test]
    fn test_open_ended_present_anchors_to_reference() {
        // Jan 2022 through the month before Apr 2025 = 39 complete months.
        let text = "Gamma, Engineer, Jan 2022 - present";
        assert_eq!(merged_months(text, reference()), 39);
        assert_eq!(total_years(text, reference()), 3.3);
    }

    #[test]
    fn test_order_invariance() {
        let a = "Jan 2020 - Jun 2021 | Mar 2021 - Dec 2022 | Jan 2015 - Dec 2015";
        let b = "Jan 2015 - Dec 2015 | Mar 2021 - Dec 2022 | Jan 2020 - Jun 2021";
        assert_eq!(total_years(a, reference()), total_years(b, reference()));
    }

    #[test]
    fn test_numeric_month_format() {
        // 03/2020 through 02/2021 inclusive = 12 months.
        assert_eq!(merged_months("03/2020 - 02/2021", reference()), 12);
    }

    #[test]
    fn test_till_date_and_ongoing_are_open_ends() {
        assert_eq!(merged_months("Jan 2024 - till date", reference()), 15);
        assert_eq!(merged_months("Jan 2024 - ongoing", reference()), 15);
        assert_eq!(merged_months("Jan 2024 to date", reference()), 15);
    }

    #[test]
    fn test_inverted_range_is_discarded() {
        assert_eq!(total_years("Jan 2023 - Jan 2020", reference()), 0.0);
    }

    #[test]
    fn test_future_start_with_open_end_is_discarded() {
        assert_eq!(total_years("Jan 2026 - present", reference()), 0.0);
    }

    #[test]
    fn test_touching_intervals_merge_without_gap() {
        // Jan 2020–Dec 2020 (ends exclusive at Jan 2021) touches Jan 2021–Dec 2021.
        let text = "Jan 2020 - Dec 2020\nJan 2021 - Dec 2021";
        assert_eq!(merged_months(text, reference()), 24);
    }

    #[test]
    fn test_unparseable_period_is_skipped_not_fatal() {
        let text = "mentoring and code review | Apr 2019 - Mar 2020";
        assert_eq!(merged_months(text, reference()), 12);
    }

    #[test]
    fn test_bare_year_range_parses_to_january() {
        // 2019 - 2021 = Jan 2019 through Jan 2021 inclusive = 25 months.
        assert_eq!(merged_months("2019 - 2021", reference()), 25);
    }

    #[test]
    fn test_full_month_names_and_separator_variants() {
        assert_eq!(merged_months("January 2020 – December 2020", reference()), 12);
        assert_eq!(merged_months("Sept 2020 to Nov 2020", reference()), 3);
    }

    #[test]
    fn test_mixed_pipe_and_newline_separators() {
        let text = "Acme, Jan 2018 - Dec 2018\nBeta, Jan 2020 - Jun 2020 | Gamma, Jul 2020 - Dec 2020";
        assert_eq!(merged_months(text, reference()), 24);
    }
}
