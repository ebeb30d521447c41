//! Scan command - recognize a card photo and parse it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use curator_ai::CloudVisionOcr;
use curator_core::{AiMode, CardImage, OcrError, TextRecognizer};

use super::parse::write_output;
use super::{
    build_parser, load_config, open_store, report_fallback, save_extraction, short_id,
    SaveOptions,
};
use crate::output::{format_extraction, OutputFormat};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Card image (PNG, JPEG, WebP, ...)
    #[arg(required = true)]
    image: PathBuf,

    /// AI mode (off, prefer, only); defaults to the config value
    #[arg(long)]
    ai: Option<AiMode>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the recognized text before parsing
    #[arg(long)]
    show_text: bool,

    /// Save the result as a contact
    #[arg(long)]
    save: bool,

    /// Notes for the saved contact
    #[arg(long, requires = "save")]
    notes: Option<String>,

    /// Folder for the saved contact
    #[arg(long, requires = "save")]
    folder: Option<String>,

    /// Save even when an identical contact exists
    #[arg(long, requires = "save")]
    force: bool,
}

pub async fn run(args: ScanArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.image.exists() {
        anyhow::bail!("Image not found: {}", args.image.display());
    }

    let image = CardImage::open(&args.image)?;
    debug!("Loaded {} ({} bytes)", image.mime_type(), image.len());

    let ocr = CloudVisionOcr::from_config(&config.ocr)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Recognizing text...");

    let recognized = match ocr.recognize(&image).await {
        Ok(text) => text,
        Err(OcrError::NoTextDetected) => {
            pb.finish_and_clear();
            anyhow::bail!("No text detected in {}", args.image.display());
        }
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    if args.show_text {
        pb.suspend(|| eprintln!("{}\n{}", style("Recognized text:").bold(), recognized.text));
    }

    pb.set_message("Extracting fields...");
    let parser = build_parser(&config, args.ai);
    let extraction = parser.parse(&recognized.text, Some(&image)).await;
    pb.finish_and_clear();

    let extraction = extraction?;
    report_fallback(&extraction);

    let output = format_extraction(&extraction, args.format)?;
    write_output(&output, args.output.as_deref())?;

    eprintln!(
        "{} OCR confidence {:.1}%, {} fields via {:?}",
        style("ℹ").blue(),
        recognized.confidence,
        extraction.card.filled_fields(),
        extraction.source
    );

    if args.save {
        let store = open_store(&config);
        let saved = save_extraction(
            &store,
            &extraction,
            &recognized.text,
            recognized.confidence,
            Some(&image),
            SaveOptions {
                notes: args.notes.as_deref(),
                folder: args.folder.as_deref(),
                force: args.force,
            },
        )?;
        if let Some(contact) = saved {
            eprintln!(
                "{} Saved contact {} to {}",
                style("✓").green(),
                short_id(&contact.id),
                store.path().display()
            );
        }
    }

    Ok(())
}
