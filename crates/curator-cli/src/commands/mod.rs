//! Subcommands and the setup they share.

pub mod batch;
pub mod config;
pub mod contacts;
pub mod parse;
pub mod scan;

use std::path::Path;
use std::sync::Arc;

use console::style;
use tracing::debug;

use curator_ai::GeminiAnalyzer;
use curator_core::contacts::check_duplicate;
use curator_core::{
    AiMode, CardAnalyzer, CardExtraction, CardImage, Contact, ContactSource, ContactStore, CuratorConfig,
    HybridCardParser, JsonFileStore, MatchType, ParseSource,
};

/// Load the config file given with `-c`, else the default file if present,
/// else built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CuratorConfig> {
    if let Some(path) = path {
        return CuratorConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e));
    }

    let default = config::default_config_path();
    if default.exists() {
        debug!("Using config from {}", default.display());
        return Ok(CuratorConfig::from_file(&default)?);
    }

    Ok(CuratorConfig::default())
}

/// Card parser for the configured (or overridden) AI mode.
///
/// A missing API key is not an error here; prefer mode then falls back to
/// the rules and only mode reports it on the first parse.
pub fn build_parser(config: &CuratorConfig, mode: Option<AiMode>) -> HybridCardParser {
    let mode = mode.unwrap_or(config.ai.mode);

    let analyzer = if mode == AiMode::Off {
        None
    } else {
        match GeminiAnalyzer::from_config(&config.ai) {
            Ok(analyzer) => Some(Arc::new(analyzer) as Arc<dyn CardAnalyzer>),
            Err(e) => {
                debug!("AI analyzer unavailable: {}", e);
                None
            }
        }
    };

    HybridCardParser::from_config(config, analyzer).with_mode(mode)
}

pub fn open_store(config: &CuratorConfig) -> JsonFileStore {
    JsonFileStore::new(&config.store.path)
}

/// Tell the user when the AI path was skipped.
pub fn report_fallback(extraction: &CardExtraction) {
    if let Some(reason) = &extraction.fallback_reason {
        eprintln!(
            "{} AI unavailable, used rule-based parser ({})",
            style("ℹ").blue(),
            reason
        );
    }
}

/// User-supplied details for a contact being saved.
#[derive(Debug, Default, Clone, Copy)]
pub struct SaveOptions<'a> {
    pub notes: Option<&'a str>,
    pub folder: Option<&'a str>,
    /// Save even over an exact duplicate.
    pub force: bool,
}

/// Save a parsed card as a contact unless it exactly matches a saved one.
///
/// Returns the saved contact, or `None` when skipped as a duplicate.
pub fn save_extraction(
    store: &dyn ContactStore,
    extraction: &CardExtraction,
    raw_text: &str,
    confidence: f32,
    image: Option<&CardImage>,
    options: SaveOptions<'_>,
) -> anyhow::Result<Option<Contact>> {
    let existing = store.get_all()?;
    let duplicate = check_duplicate(&extraction.card, &existing);

    if duplicate.is_duplicate {
        let matched = duplicate
            .matched_contact
            .as_ref()
            .map(|c| format!("{} ({})", c.name, short_id(&c.id)))
            .unwrap_or_default();
        eprintln!(
            "{} Possible duplicate of {}: {} [score {}]",
            style("⚠").yellow(),
            matched,
            duplicate.reasons.join(", "),
            duplicate.score
        );

        if duplicate.match_type == MatchType::Exact && !options.force {
            eprintln!("  Not saved. Use --force to save anyway.");
            return Ok(None);
        }
    }

    let source = match extraction.source {
        ParseSource::Ai => ContactSource::Ai,
        ParseSource::Rules => ContactSource::Rules,
    };

    let mut contact = Contact::from_card(extraction.card.clone(), source)
        .with_raw_text(raw_text)
        .with_confidence(confidence);
    if let Some(notes) = options.notes {
        contact = contact.with_notes(notes);
    }
    if let Some(folder) = options.folder {
        contact = contact.with_folder(folder);
    }
    if let Some(image) = image {
        contact = contact.with_image(image);
    }

    store.save(&contact)?;
    Ok(Some(contact))
}

/// First eight characters of an id, enough to tell contacts apart.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
