//! Lookup tables consulted by the line classifier and field extractors.
//!
//! English-oriented. `COMPANY_SUFFIXES` is shared by company scoring and
//! name rejection.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Words marking a line as naming a business or institution.
///
/// Matched against whole words with surrounding punctuation stripped, so
/// entries carry no trailing period. Words that also commonly open job
/// titles ("systems", "global", "tech", "engineering") are left out.
pub const COMPANY_SUFFIXES: &[&str] = &[
    "inc", "incorporated", "corp", "corporation", "co", "company",
    "ltd", "limited", "llc", "l.l.c", "llp", "plc", "pte", "pty",
    "gmbh", "bhd", "sdn", "opc",
    "group", "holdings", "enterprises", "enterprise", "ventures",
    "solutions", "services", "technologies", "technology",
    "partners", "associates", "international", "industries",
    "consulting", "consultants", "labs", "laboratories", "logistics",
    "trading", "manufacturing", "pharmaceutical", "pharmaceuticals",
    "pharma", "university", "college", "institute", "academy",
    "hospital", "clinic", "foundation", "bank", "insurance", "realty",
    "properties", "construction", "agency", "firm",
];

/// Job-title vocabulary, matched as whole words or phrases.
pub const JOB_TITLES: &[&str] = &[
    // C-level
    "ceo", "cto", "cfo", "coo", "cmo", "cio", "chief",
    // Directors & VPs
    "director", "vp", "vice president", "head of", "president",
    // Managers
    "manager", "supervisor", "lead", "team lead", "coordinator",
    // Technical
    "engineer", "developer", "architect", "analyst", "consultant",
    "programmer", "designer", "specialist", "technician",
    // Business
    "executive", "officer", "associate", "representative", "agent",
    "advisor", "partner", "founder", "co-founder", "owner", "proprietor",
    // Sales & marketing
    "sales", "marketing", "account", "business development",
    // Admin & support
    "assistant", "secretary", "administrator", "receptionist",
    // Academic, medical, legal
    "professor", "doctor", "attorney", "lawyer", "nurse", "physician",
    "dean", "principal",
    // Seniority
    "senior", "junior", "intern", "trainee",
];

/// Address keywords. Full words match on word boundaries; abbreviations
/// only with a trailing period or comma ("St." but not "St").
pub const ADDRESS_WORDS: &[&str] = &[
    "street", "road", "avenue", "boulevard", "drive", "lane", "highway",
    "floor", "suite", "unit", "building", "bldg", "tower", "plaza",
    "center", "centre", "city", "town", "village", "barangay", "brgy",
    "province", "district", "subdivision", "zip", "postal",
];

pub const ADDRESS_ABBREVIATIONS: &[&str] = &[
    "st", "rd", "ave", "blvd", "ln", "flr", "ste", "hwy", "bldg", "brgy",
];

/// Slogan openers, checked at the start of the lowercased line.
pub const TAGLINE_OPENERS: &[&str] = &[
    "your", "we", "where", "the best", "leading", "committed to",
    "making", "creating", "delivering", "providing",
    "bringing", "empowering", "together", "because", "for a better",
    "let us", "let's", "experience the", "quality you", "excellence in",
];

/// Marketing vocabulary; two distinct hits make a tagline.
pub const TAGLINE_WORDS: &[&str] = &[
    "trusted", "partner", "excellence", "excellent", "innovation",
    "innovative", "quality", "commitment", "committed", "dedicated",
    "passion", "future", "tomorrow", "together", "reliable", "leading",
    "leader", "best", "world-class", "premier", "satisfaction", "dream",
    "dreams", "better", "beyond", "integrity", "trust", "sustainable",
    "smarter", "everyday", "life", "lives", "journey",
];

/// Country names (lowercase).
pub const COUNTRIES: &[&str] = &[
    "philippines", "singapore", "malaysia", "indonesia", "thailand",
    "vietnam", "viet nam", "japan", "china", "hong kong", "taiwan",
    "korea", "south korea", "india", "australia", "new zealand", "usa",
    "u.s.a", "united states", "united states of america", "canada",
    "mexico", "brazil", "uk", "united kingdom", "england", "ireland",
    "germany", "france", "spain", "italy", "netherlands", "switzerland",
    "sweden", "norway", "denmark", "uae", "united arab emirates",
    "saudi arabia", "qatar",
];

/// Two-letter country codes that may lead a corporate mail domain
/// (`ph.clearpack.com`).
pub const COUNTRY_CODES: &[&str] = &[
    "ph", "sg", "my", "id", "th", "vn", "jp", "cn", "hk", "tw", "kr",
    "in", "au", "nz", "us", "uk", "ca", "mx", "br", "de", "fr", "es",
    "it", "nl", "ch", "se", "no", "dk", "ae", "sa", "qa", "ie",
];

/// Consumer mail providers; their domains say nothing about the employer.
pub const GENERIC_MAIL_PROVIDERS: &[&str] = &[
    "gmail", "yahoo", "hotmail", "outlook", "icloud", "mail", "aol",
];

/// Words that never open a person's name.
pub const DETERMINERS: &[&str] = &[
    "the", "a", "an", "your", "our", "my", "their", "his", "her", "its",
    "this", "that", "these", "those", "we", "for", "with", "to", "of",
    "in", "at", "by", "and", "from",
];

/// Words that rule a line out as a name.
pub const NON_NAME_WORDS: &[&str] = &[
    "welcome", "thank", "thanks", "contact", "call", "visit", "follow",
    "email", "e-mail", "phone", "mobile", "tel", "fax", "website", "web",
    "office", "address", "headquarters", "branch", "hotline", "free",
    "sale", "new", "best", "quality", "premium", "certified", "official",
    "authorized", "dealer", "distributor", "supplier", "since",
    "established", "hours", "open", "menu", "delivery", "order",
];

/// Professional credentials and generational suffixes accepted inside a
/// name line.
pub const CREDENTIALS: &[&str] = &[
    "phd", "ph.d", "md", "m.d", "mba", "cpa", "rn", "pe", "ece", "ree",
    "esq", "jr", "sr", "ii", "iii", "iv", "msc", "bsc", "dds", "dmd",
    "cfa", "pmp", "ma", "ms",
];

lazy_static! {
    pub static ref COMPANY_SUFFIX_SET: HashSet<&'static str> =
        COMPANY_SUFFIXES.iter().copied().collect();

    pub static ref TAGLINE_WORD_SET: HashSet<&'static str> =
        TAGLINE_WORDS.iter().copied().collect();

    pub static ref COUNTRY_SET: HashSet<&'static str> =
        COUNTRIES.iter().copied().collect();

    pub static ref COUNTRY_CODE_SET: HashSet<&'static str> =
        COUNTRY_CODES.iter().copied().collect();

    pub static ref GENERIC_MAIL_SET: HashSet<&'static str> =
        GENERIC_MAIL_PROVIDERS.iter().copied().collect();

    pub static ref DETERMINER_SET: HashSet<&'static str> =
        DETERMINERS.iter().copied().collect();

    pub static ref NON_NAME_SET: HashSet<&'static str> =
        NON_NAME_WORDS.iter().copied().collect();

    pub static ref CREDENTIAL_SET: HashSet<&'static str> =
        CREDENTIALS.iter().copied().collect();

    pub static ref JOB_TITLE: Regex = word_alternation(JOB_TITLES);

    pub static ref ADDRESS_KEYWORD: Regex = {
        let words = ADDRESS_WORDS.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
        let abbrs = ADDRESS_ABBREVIATIONS.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
        Regex::new(&format!(r"(?i)\b(?:{words})\b|\b(?:{abbrs})[.,]")).unwrap()
    };

    pub static ref TAGLINE_OPENER: Regex = word_alternation_anchored(TAGLINE_OPENERS);

    pub static ref COUNTRY: Regex = word_alternation(COUNTRIES);
}

/// Case-insensitive regex matching any entry as a whole word or phrase.
fn word_alternation(entries: &[&str]) -> Regex {
    let body = entries
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)(?:^|[^\p{{L}}\p{{N}}])(?:{body})(?:$|[^\p{{L}}\p{{N}}])")).unwrap()
}

/// Like [`word_alternation`] but anchored at the start of the text.
fn word_alternation_anchored(entries: &[&str]) -> Regex {
    let body = entries
        .iter()
        .map(|e| regex::escape(e))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)^(?:{body})(?:$|[^\p{{L}}\p{{N}}])")).unwrap()
}

/// Split a line into lowercase words with edge punctuation removed.
///
/// Inner punctuation stays: "L.L.C." becomes "l.l.c", "Co-Founder"
/// becomes "co-founder".
pub fn words_lower(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// True if any word of the line is a company suffix.
pub fn has_company_suffix(line: &str) -> bool {
    words_lower(line)
        .iter()
        .any(|w| COMPANY_SUFFIX_SET.contains(w.as_str()))
}

/// True if the line contains a job-title word or phrase.
pub fn has_job_title(line: &str) -> bool {
    JOB_TITLE.is_match(line)
}

/// True if the line contains an address keyword.
pub fn has_address_keyword(line: &str) -> bool {
    ADDRESS_KEYWORD.is_match(line)
}

/// True if the whole line (edge punctuation ignored) is a country name.
pub fn is_country(line: &str) -> bool {
    let lower = line.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    COUNTRY_SET.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_suffix_whole_word() {
        assert!(has_company_suffix("Clearpack Technology (Phils.) Inc."));
        assert!(has_company_suffix("Northwind L.L.C."));
        assert!(!has_company_suffix("Incredible Foods"));
        assert!(!has_company_suffix("Co-Founder"));
    }

    #[test]
    fn test_job_title_phrases() {
        assert!(has_job_title("Regional Sales Director"));
        assert!(has_job_title("VP, Operations"));
        assert!(has_job_title("Head of Marketing"));
        assert!(has_job_title("Co-Founder & CEO"));
        assert!(!has_job_title("Accounting Firm"));
        assert!(!has_job_title("John Michael Santos"));
    }

    #[test]
    fn test_address_keyword_abbreviations() {
        assert!(has_address_keyword("Ayala Avenue, Makati City"));
        assert!(has_address_keyword("45 Orchard St., Singapore"));
        assert!(!has_address_keyword("Acme Systems Inc."));
        assert!(!has_address_keyword("Master Stylist"));
    }

    #[test]
    fn test_country_line() {
        assert!(is_country("Philippines"));
        assert!(is_country("SINGAPORE."));
        assert!(!is_country("Philippine Branch Office"));
    }

    #[test]
    fn test_words_lower_strips_edges() {
        assert_eq!(words_lower("(Phils.) Inc."), vec!["phils", "inc"]);
    }
}
