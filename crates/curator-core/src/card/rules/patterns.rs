//! Common regex patterns for business card extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Email: local@domain.tld, matched over the whole text blob
    pub static ref EMAIL: Regex = Regex::new(
        r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}"
    ).unwrap();

    // Phone patterns, applied in this order. Separators are horizontal only
    // so a match never runs across a line break.

    // International: +1 (555) 123-4567, +63 917 123 4567, +63 2 8812 3456
    pub static ref PHONE_INTERNATIONAL: Regex = Regex::new(
        r"\+\d{1,3}[ \t.-]?\(?\d{1,4}\)?[ \t.-]?\d{3,4}[ \t.-]?\d{3,4}"
    ).unwrap();

    // Parenthesized area code: (555) 123-4567, 555-123-4567
    pub static ref PHONE_AREA_CODE: Regex = Regex::new(
        r"\(?\d{3}\)?[ \t.-]?\d{3}[ \t.-]?\d{4}"
    ).unwrap();

    // Mobile: 09171234567, 0917 123 4567
    pub static ref PHONE_MOBILE: Regex = Regex::new(
        r"0\d{3}[ \t.-]?\d{3}[ \t.-]?\d{4}"
    ).unwrap();

    // Landline with trunk prefix: (02) 8888-8888
    pub static ref PHONE_LANDLINE: Regex = Regex::new(
        r"\(0\d{1,2}\)[ \t.-]?\d{4}[ \t.-]?\d{4}"
    ).unwrap();

    // Short grouped: 8888-8888
    pub static ref PHONE_SHORT: Regex = Regex::new(
        r"\d{4}[ \t.-]\d{4}"
    ).unwrap();

    // Extension suffix: 812 3456 789 ext. 204
    pub static ref PHONE_EXTENSION: Regex = Regex::new(
        r"(?i)\d{3,4}[ \t.-]?\d{3,4}[ \t.-]?\d{3,4}(?:[ \t]*(?:extension|ext|x)\.?[ \t]*\d{1,5})?"
    ).unwrap();

    // Seven-digit local: 123-4567
    pub static ref PHONE_LOCAL: Regex = Regex::new(
        r"\b\d{3}[ \t.-]\d{4}\b"
    ).unwrap();

    // Label left dangling after a phone is cut out of an address line
    pub static ref PHONE_LABEL_TAIL: Regex = Regex::new(
        r"(?i)[\s,;/|-]*\b(?:tel|telephone|phone|ph|mobile|mob|cell|fax|t|m|f)\b\.?\s*(?:no\.?)?\s*[:.]?\s*$"
    ).unwrap();

    // URL and domain markers
    pub static ref URL: Regex = Regex::new(
        r"(?i)www\.|https?://|\.com\b|\.org\b|\.net\b|\.ph\b|\.sg\b|\.co\.[a-z]{2,}"
    ).unwrap();

    // Trademark / registration / copyright glyphs
    pub static ref TRADEMARK: Regex = Regex::new(
        r"[™®©℠]"
    ).unwrap();

    // Noise characters counted by the name extractor
    pub static ref SPECIAL_CHAR: Regex = Regex::new(
        r"[|@#$%^&*()_+=\[\]{}\\/<>]"
    ).unwrap();

    // Alphabetic ALL-CAPS line (logo or brand text)
    pub static ref ALL_CAPS_LINE: Regex = Regex::new(
        r"^[A-Z\s&]+$"
    ).unwrap();

    // Capitalized word sequences accepted as names as a whole
    pub static ref NAME_SEQUENCE: Regex = Regex::new(
        r"^[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+){0,3}$"
    ).unwrap();

    pub static ref NAME_SEQUENCE_CAPS: Regex = Regex::new(
        r"^[A-Z]+(?:\s+[A-Z]+){0,3}$"
    ).unwrap();

    // Single name words: Proper (with hyphen/apostrophe parts, optional
    // abbreviation period), ALL-CAPS, initials
    pub static ref PROPER_WORD: Regex = Regex::new(
        r"^[A-Z][a-z]*(?:['’-][A-Za-z][a-z]*)*\.?$"
    ).unwrap();

    pub static ref CAPS_WORD: Regex = Regex::new(
        r"^[A-Z]+(?:['’-][A-Z]+)*$"
    ).unwrap();

    pub static ref INITIALS: Regex = Regex::new(
        r"^(?:[A-Z]\.)+$"
    ).unwrap();

    // Address shapes
    pub static ref STREET_NUMBER: Regex = Regex::new(
        r"^\d+\s+[a-zA-Z]"
    ).unwrap();

    pub static ref POSTAL_CODE: Regex = Regex::new(
        r"\b\d{4,5}\b"
    ).unwrap();

    // Separators trimmed off a cleaned address line
    pub static ref EDGE_SEPARATORS: Regex = Regex::new(
        r"^[\s,;/|-]+|[\s,;/|-]+$"
    ).unwrap();

    // Digit runs
    pub static ref DIGITS_3: Regex = Regex::new(r"\d{3,}").unwrap();
    pub static ref DIGITS_4: Regex = Regex::new(r"\d{4,}").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_patterns_stay_on_one_line() {
        assert!(PHONE_SHORT.is_match("8888-1234"));
        assert!(!PHONE_SHORT.is_match("City 1226\n8888"));
    }

    #[test]
    fn test_url_markers() {
        assert!(URL.is_match("www.clearpack.com"));
        assert!(URL.is_match("https://acme.io"));
        assert!(URL.is_match("acme.co.uk"));
        assert!(!URL.is_match("Acme Corp."));
    }

    #[test]
    fn test_phone_label_tail() {
        assert_eq!(PHONE_LABEL_TAIL.replace("Makati City 1226 Tel:", ""), "Makati City 1226");
        assert_eq!(PHONE_LABEL_TAIL.replace("Ayala Avenue", ""), "Ayala Avenue");
    }
}
