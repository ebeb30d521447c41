//! Extraction prompt and response schema for the card analyzer.

use serde_json::{json, Value};

/// Instructions sent ahead of the OCR text.
pub const CARD_PROMPT: &str = r#"You read business cards. Extract the contact details from the card below and answer with one JSON object only, no prose and no markdown.

Fields:
- name: the person's full name. Keep honorifics (Dr., Atty., Engr.) and attach professional credentials after a comma, e.g. "Maria Clara Reyes, CPA". When credentials continue on the next line ("MBA, PhD"), append them to the same name.
- position: the job title. If a department is printed with it, join them with a comma, e.g. "Senior Engineer, Research & Development".
- company: the legal or trading name of the business, including suffixes such as Inc., Corp., Co. or Ltd. Ignore slogans and taglines.
- phone: every phone number exactly as printed. Label fax numbers by appending " (Fax)". Do not label other numbers.
- email: every email address, lowercased.
- address: the postal address as one line, parts separated by ", ". Leave out phone numbers and their labels.

Use an empty string or an empty list when a field is not on the card. Never invent values.

Example card:
CLEARPACK
Clearpack Technology (Phils.) Inc.
John Michael Santos
Regional Sales Director
Unit 1203, 12th Floor, Tower One
Ayala Avenue, Makati City 1226
Philippines
Tel: +63 2 8812 3456
Mobile: +63 917 555 1234
Fax: +63 2 8812 3457
john.santos@ph.clearpack.com
www.clearpack.com

Example answer:
{"name": "John Michael Santos", "position": "Regional Sales Director", "company": "Clearpack Technology (Phils.) Inc.", "phone": ["+63 2 8812 3456", "+63 917 555 1234", "+63 2 8812 3457 (Fax)"], "email": ["john.santos@ph.clearpack.com"], "address": "Unit 1203, 12th Floor, Tower One, Ayala Avenue, Makati City 1226, Philippines"}

Example card:
Engr. Paolo Mendoza, PME
MBA
Operations Manager
Plant Engineering Department
Mendoza Industrial Supply Corp.

Example answer:
{"name": "Engr. Paolo Mendoza, PME, MBA", "position": "Operations Manager, Plant Engineering Department", "company": "Mendoza Industrial Supply Corp.", "phone": [], "email": [], "address": ""}
"#;

/// Prompt text for one card.
pub fn build_prompt(raw_text: &str) -> String {
    format!("{CARD_PROMPT}\nCard text:\n{}\n", raw_text.trim())
}

/// JSON schema the model's answer is constrained to.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "position": { "type": "STRING" },
            "company": { "type": "STRING" },
            "phone": { "type": "ARRAY", "items": { "type": "STRING" } },
            "email": { "type": "ARRAY", "items": { "type": "STRING" } },
            "address": { "type": "STRING" }
        },
        "required": ["name", "position", "company", "phone", "email", "address"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::ParsedCard;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_schema_requires_every_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();

        assert_eq!(required, vec!["name", "position", "company", "phone", "email", "address"]);
        assert_eq!(schema["properties"]["phone"]["type"], "ARRAY");
    }

    #[test]
    fn test_example_answers_are_valid_cards() {
        let answers: Vec<&str> = CARD_PROMPT
            .lines()
            .filter(|line| line.starts_with('{'))
            .collect();
        assert_eq!(answers.len(), 2);

        for answer in answers {
            let card: ParsedCard = serde_json::from_str(answer).unwrap();
            assert!(!card.name.is_empty());
        }
    }

    #[test]
    fn test_build_prompt_appends_text() {
        let prompt = build_prompt("  Jane Roe\nAcme Corp.\n\n");
        assert!(prompt.starts_with(CARD_PROMPT));
        assert!(prompt.ends_with("Card text:\nJane Roe\nAcme Corp.\n"));
    }
}
