//! Output formats for cards and contacts.

use chrono::{DateTime, Local, Utc};

use curator_core::{CardExtraction, Contact, ParsedCard};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
    /// vCard 3.0
    Vcard,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
            OutputFormat::Vcard => "vcf",
        }
    }
}

const CARD_HEADERS: [&str; 7] = ["Name", "Position", "Company", "Phone", "Email", "Address", "Source"];

const CONTACT_HEADERS: [&str; 9] = [
    "Name",
    "Position",
    "Company",
    "Phone",
    "Email",
    "Address",
    "Notes",
    "ScannedAt",
    "UpdatedAt",
];

/// Render one parse result.
pub fn format_extraction(extraction: &CardExtraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(CARD_HEADERS)?;
            let card = &extraction.card;
            let source = match extraction.source {
                curator_core::ParseSource::Ai => "ai",
                curator_core::ParseSource::Rules => "rules",
            };
            wtr.write_record([
                card.name.as_str(),
                card.position.as_str(),
                card.company.as_str(),
                card.phone.join("; ").as_str(),
                card.email.join("; ").as_str(),
                card.address.as_str(),
                source,
            ])?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(card_text(&extraction.card)),
        OutputFormat::Vcard => Ok(vcard(&extraction.card, None)),
    }
}

/// Render a list of saved contacts.
pub fn format_contacts(contacts: &[Contact], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(contacts)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(CONTACT_HEADERS)?;
            for c in contacts {
                wtr.write_record([
                    c.name.as_str(),
                    c.position.as_str(),
                    c.company.as_str(),
                    c.phone.join("; ").as_str(),
                    c.email.join("; ").as_str(),
                    c.address.as_str(),
                    c.notes.as_str(),
                    local_time(c.created_at).as_str(),
                    c.updated_at.map(local_time).unwrap_or_default().as_str(),
                ])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(contacts
            .iter()
            .map(contact_text)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Vcard => Ok(contacts
            .iter()
            .map(|c| vcard(&c.card(), Some(c.notes.as_str())))
            .collect()),
    }
}

fn local_time(t: DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn card_text(card: &ParsedCard) -> String {
    let mut output = String::new();

    let rows = [
        ("Name", card.name.clone()),
        ("Position", card.position.clone()),
        ("Company", card.company.clone()),
        ("Phone", card.phone.join(", ")),
        ("Email", card.email.join(", ")),
        ("Address", card.address.clone()),
    ];

    for (label, value) in rows {
        if !value.is_empty() {
            output.push_str(&format!("{:<9} {}\n", format!("{label}:"), value));
        }
    }

    if output.is_empty() {
        output.push_str("(no fields found)\n");
    }
    output
}

fn contact_text(contact: &Contact) -> String {
    let mut output = format!("[{}] {}\n", contact.id, contact.folder_name());
    output.push_str(&card_text(&contact.card()));
    if !contact.notes.is_empty() {
        output.push_str(&format!("{:<9} {}\n", "Notes:", contact.notes));
    }
    output.push_str(&format!("{:<9} {}\n", "Scanned:", local_time(contact.created_at)));
    output
}

/// Escape a vCard property value.
fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}

fn vcard(card: &ParsedCard, notes: Option<&str>) -> String {
    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

    let bare_name = card.name.split(',').next().unwrap_or("").trim();
    let (given, family) = bare_name.rsplit_once(' ').unwrap_or((bare_name, ""));
    lines.push(format!("N:{};{};;;", escape(family), escape(given)));
    lines.push(format!("FN:{}", escape(&card.name)));

    if !card.company.is_empty() {
        lines.push(format!("ORG:{}", escape(&card.company)));
    }
    if !card.position.is_empty() {
        lines.push(format!("TITLE:{}", escape(&card.position)));
    }
    for phone in &card.phone {
        let kind = if phone.to_lowercase().contains("fax") { "FAX" } else { "WORK" };
        lines.push(format!("TEL;TYPE={}:{}", kind, escape(phone)));
    }
    for email in &card.email {
        lines.push(format!("EMAIL;TYPE=INTERNET:{}", escape(email)));
    }
    if !card.address.is_empty() {
        lines.push(format!("ADR;TYPE=WORK:;;{};;;;", escape(&card.address)));
    }
    if let Some(notes) = notes.filter(|n| !n.is_empty()) {
        lines.push(format!("NOTE:{}", escape(notes)));
    }

    lines.push("END:VCARD".to_string());
    lines.join("\r\n") + "\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::{ContactSource, ParseSource};

    fn card() -> ParsedCard {
        ParsedCard {
            name: "Maria Clara Reyes, CPA".to_string(),
            position: "Finance Manager".to_string(),
            company: "Northwind Trading Co.".to_string(),
            phone: vec!["0917-555-0101".to_string(), "(032) 412-5567 (Fax)".to_string()],
            email: vec!["maria.reyes@northwind.com.ph".to_string()],
            address: "88 Rizal Avenue, Cebu City 6000".to_string(),
        }
    }

    #[test]
    fn test_vcard() {
        let vcf = vcard(&card(), Some("met at expo"));

        assert!(vcf.starts_with("BEGIN:VCARD\r\nVERSION:3.0\r\n"));
        assert!(vcf.contains("N:Reyes;Maria Clara;;;\r\n"));
        assert!(vcf.contains("FN:Maria Clara Reyes\\, CPA\r\n"));
        assert!(vcf.contains("TEL;TYPE=WORK:0917-555-0101\r\n"));
        assert!(vcf.contains("TEL;TYPE=FAX:(032) 412-5567 (Fax)\r\n"));
        assert!(vcf.contains("ADR;TYPE=WORK:;;88 Rizal Avenue\\, Cebu City 6000;;;;\r\n"));
        assert!(vcf.contains("NOTE:met at expo\r\n"));
        assert!(vcf.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn test_card_csv_quotes_and_joins() {
        let extraction = CardExtraction {
            card: card(),
            source: ParseSource::Rules,
            fallback_reason: None,
            processing_time_ms: 1,
        };
        let csv = format_extraction(&extraction, OutputFormat::Csv).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("Name,Position,Company,Phone,Email,Address,Source"));
        assert_eq!(
            lines.next(),
            Some("\"Maria Clara Reyes, CPA\",Finance Manager,Northwind Trading Co.,0917-555-0101; (032) 412-5567 (Fax),maria.reyes@northwind.com.ph,\"88 Rizal Avenue, Cebu City 6000\",rules")
        );
    }

    #[test]
    fn test_contacts_csv_headers() {
        let contact = Contact::from_card(card(), ContactSource::Manual).with_notes("say \"hi\"");
        let csv = format_contacts(&[contact], OutputFormat::Csv).unwrap();

        assert!(csv.starts_with("Name,Position,Company,Phone,Email,Address,Notes,ScannedAt,UpdatedAt\n"));
        assert!(csv.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_text_skips_empty_fields() {
        let text = card_text(&ParsedCard {
            name: "Jane Roe".to_string(),
            ..Default::default()
        });
        assert_eq!(text, "Name:     Jane Roe\n");
        assert_eq!(card_text(&ParsedCard::default()), "(no fields found)\n");
    }
}
