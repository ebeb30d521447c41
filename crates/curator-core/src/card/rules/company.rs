//! Company extraction: scoring, multi-line merge and fallbacks.

use tracing::debug;

use super::classify::{is_all_caps_line, is_company_part, is_url, looks_like_name, looks_like_tagline};
use super::patterns::{DIGITS_3, TRADEMARK};
use super::vocab::{has_company_suffix, has_job_title, COUNTRY_CODE_SET, GENERIC_MAIL_SET};
use crate::card::lines::{CardLines, Field, LineClaims};
use crate::models::config::ScoringWeights;

/// Company score of a single line.
pub fn score_line(line: &str, weights: &ScoringWeights) -> i32 {
    let mut score = 0;

    if has_company_suffix(line) {
        score += weights.suffix;
    }
    if is_all_caps_line(line) {
        score += weights.all_caps;
    }
    if TRADEMARK.is_match(line) {
        score += weights.trademark;
    }
    if looks_like_name(line) {
        score += weights.name_like;
    }
    if looks_like_tagline(line) {
        score += weights.tagline;
    }

    score
}

/// Extract the company name, claiming the lines it came from.
///
/// The best positively scored line is extended over adjacent company
/// fragments. Without one, the first email's domain is tried, then the
/// first plain unclaimed line.
pub fn extract_company(
    lines: &CardLines,
    claims: &mut LineClaims,
    emails: &[String],
    weights: &ScoringWeights,
) -> String {
    let mut best: Option<(usize, i32)> = None;

    for (index, line) in lines.unclaimed(claims) {
        if is_url(line) {
            continue;
        }
        let score = score_line(line, weights);
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }

    if let Some((index, score)) = best {
        debug!(line = index, score, "Company line");
        return merge_fragments(lines, claims, index);
    }

    if let Some(company) = emails.first().and_then(|e| company_from_email(e)) {
        debug!(company = %company, "Company from email domain");
        return company;
    }

    let fallback = lines
        .unclaimed(claims)
        .find(|&(_, line)| {
            !looks_like_name(line)
                && !line.contains('@')
                && !DIGITS_3.is_match(line)
                && !is_url(line)
                && !looks_like_tagline(line)
                && !has_job_title(line)
        })
        .map(|(index, line)| (index, line.to_string()));

    match fallback {
        Some((index, line)) => {
            debug!(line = index, "Company from first plain line");
            claims.claim(index, Field::Company);
            line
        }
        None => String::new(),
    }
}

/// Extend backward, then forward, over adjacent company fragments and claim
/// the whole run. Slogans stop the run even when they carry a suffix word.
fn merge_fragments(lines: &CardLines, claims: &mut LineClaims, index: usize) -> String {
    let extends = |i: usize| {
        !claims.is_claimed(i)
            && lines
                .get(i)
                .is_some_and(|l| {
                    is_company_part(l) && !looks_like_name(l) && !looks_like_tagline(l)
                })
    };

    let mut start = index;
    while start > 0 && extends(start - 1) {
        start -= 1;
    }
    let mut end = index;
    while end + 1 < lines.len() && extends(end + 1) {
        end += 1;
    }

    let company = lines.lines[start..=end].join(" ");
    for i in start..=end {
        claims.claim(i, Field::Company);
    }
    company
}

/// Company name guessed from an email domain.
///
/// Consumer providers give nothing. A leading country-code label is
/// skipped when at least two labels follow it (`ph.clearpack.com`).
pub fn company_from_email(email: &str) -> Option<String> {
    let (_, domain) = email.rsplit_once('@')?;
    let labels: Vec<String> = domain
        .split('.')
        .filter(|l| !l.is_empty())
        .map(str::to_lowercase)
        .collect();
    let first = labels.first()?;

    if GENERIC_MAIL_SET.contains(first.as_str()) {
        return None;
    }

    let label = if COUNTRY_CODE_SET.contains(first.as_str()) && labels.len() >= 3 {
        &labels[1]
    } else {
        first
    };

    let mut chars = label.chars();
    let head = chars.next()?;
    Some(head.to_uppercase().chain(chars).collect())
}
