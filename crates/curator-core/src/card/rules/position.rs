//! Job title extraction.

use tracing::debug;

use super::classify::looks_like_tagline;
use super::vocab::has_job_title;
use crate::card::lines::{CardLines, Field, LineClaims};

/// First unclaimed line carrying a job-title word. Slogans are skipped even
/// when they mention one ("Your Trusted Partner").
pub fn extract_position(lines: &CardLines, claims: &mut LineClaims) -> String {
    let found = lines
        .unclaimed(claims)
        .find(|&(_, line)| !looks_like_tagline(line) && has_job_title(line))
        .map(|(index, line)| (index, line.to_string()));

    match found {
        Some((index, line)) => {
            debug!(line = index, "Position line");
            claims.claim(index, Field::Position);
            line
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_title_line() {
        let lines = CardLines::new("John Doe\nRegional Sales Director\nProject Manager");
        let mut claims = LineClaims::new();

        assert_eq!(extract_position(&lines, &mut claims), "Regional Sales Director");
        assert_eq!(claims.owner(1), Some(Field::Position));
    }

    #[test]
    fn test_skips_tagline_and_claimed() {
        let lines = CardLines::new("Your Trusted Partner\nChief Executive Officer\nSenior Engineer");
        let mut claims = LineClaims::new();
        claims.claim(1, Field::Company);

        assert_eq!(extract_position(&lines, &mut claims), "Senior Engineer");
    }

    #[test]
    fn test_whole_word_only() {
        let lines = CardLines::new("Leadership Forum\nSalesforce Ltd.");
        let mut claims = LineClaims::new();

        assert_eq!(extract_position(&lines, &mut claims), "");
        assert!(claims.is_empty());
    }
}
