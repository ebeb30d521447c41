//! Batch command - parse many card files concurrently.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use curator_ai::CloudVisionOcr;
use curator_core::{AiMode, CardExtraction, CardImage, HybridCardParser, TextRecognizer};

use super::{build_parser, load_config, open_store, save_extraction, SaveOptions};
use crate::output::{format_extraction, OutputFormat};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of card images or text files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-card files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each card
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Cards processed at the same time
    #[arg(short = 'j', long, default_value = "3")]
    jobs: usize,

    /// AI mode (off, prefer, only); defaults to the config value
    #[arg(long)]
    ai: Option<AiMode>,

    /// Save every parsed card as a contact
    #[arg(long)]
    save: bool,

    /// Keep going when a file fails
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one file.
struct FileResult {
    path: PathBuf,
    raw_text: String,
    confidence: f32,
    image: Option<CardImage>,
    extraction: Option<CardExtraction>,
    error: Option<String>,
    processing_time_ms: u64,
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e.to_lowercase().as_str()))
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| has_extension(p, IMAGE_EXTENSIONS) || has_extension(p, TEXT_EXTENSIONS))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let ocr = if files.iter().any(|p| has_extension(p, IMAGE_EXTENSIONS)) {
        Some(CloudVisionOcr::from_config(&config.ocr)?)
    } else {
        None
    };
    let parser = build_parser(&config, args.ai);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    let mut pending = stream::iter(files)
        .map(|path| process_file(path, &parser, ocr.as_ref()))
        .buffer_unordered(args.jobs.max(1));

    while let Some(result) = pending.next().await {
        pb.inc(1);

        if let Some(message) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
        results.push(result);
    }
    drop(pending);
    pb.finish_and_clear();

    results.sort_by(|a, b| a.path.cmp(&b.path));

    let store = args.save.then(|| open_store(&config));
    let mut saved = 0;

    let paths: Vec<&Path> = results.iter().map(|r| r.path.as_path()).collect();
    let names = output_names(&paths, args.format.extension());

    for (result, name) in results.iter().zip(&names) {
        let Some(extraction) = &result.extraction else {
            continue;
        };

        let content = format_extraction(extraction, args.format)?;
        match &args.output_dir {
            Some(output_dir) => {
                let output_path = output_dir.join(name);
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => println!("{}", content.trim_end()),
        }

        if let Some(store) = &store {
            let contact = save_extraction(
                store,
                extraction,
                &result.raw_text,
                result.confidence,
                result.image.as_ref(),
                SaveOptions::default(),
            )?;
            saved += usize::from(contact.is_some());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );
    if store.is_some() {
        eprintln!("   {} saved as contacts", saved);
    }

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file name for each input.
///
/// The file stem is used unless another input shares it (`card.png` and
/// `card.txt`), in which case the full file name is. Names still taken get
/// a numeric suffix.
fn output_names(paths: &[&Path], extension: &str) -> Vec<String> {
    let stem = |p: &Path| p.file_stem().and_then(|s| s.to_str()).unwrap_or("card").to_string();

    let mut stems: HashMap<String, usize> = HashMap::new();
    for path in paths {
        *stems.entry(stem(*path)).or_default() += 1;
    }

    let mut used = HashSet::new();
    paths
        .iter()
        .map(|path| {
            let base = if stems[&stem(*path)] > 1 {
                path.file_name()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| stem(*path))
            } else {
                stem(*path)
            };

            let mut name = format!("{}.{}", base, extension);
            let mut n = 1;
            while !used.insert(name.clone()) {
                n += 1;
                name = format!("{}-{}.{}", base, n, extension);
            }
            name
        })
        .collect()
}

async fn process_file(
    path: PathBuf,
    parser: &HybridCardParser,
    ocr: Option<&CloudVisionOcr>,
) -> FileResult {
    let start = Instant::now();
    let outcome = read_and_parse(&path, parser, ocr).await;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    match outcome {
        Ok(Parsed {
            raw_text,
            confidence,
            image,
            extraction,
        }) => FileResult {
            path,
            raw_text,
            confidence,
            image,
            extraction: Some(extraction),
            error: None,
            processing_time_ms,
        },
        Err(e) => FileResult {
            path,
            raw_text: String::new(),
            confidence: 0.0,
            image: None,
            extraction: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

/// Text, image and fields of one successfully parsed file.
struct Parsed {
    raw_text: String,
    confidence: f32,
    image: Option<CardImage>,
    extraction: CardExtraction,
}

async fn read_and_parse(
    path: &Path,
    parser: &HybridCardParser,
    ocr: Option<&CloudVisionOcr>,
) -> anyhow::Result<Parsed> {
    if has_extension(path, TEXT_EXTENSIONS) {
        let text = fs::read_to_string(path)?;
        if text.trim().is_empty() {
            anyhow::bail!("File is empty");
        }
        let extraction = parser.parse(&text, None).await?;
        return Ok(Parsed {
            raw_text: text,
            confidence: 100.0,
            image: None,
            extraction,
        });
    }

    let ocr = ocr.ok_or_else(|| anyhow::anyhow!("OCR is not configured"))?;
    let image = CardImage::open(path)?;
    let recognized = ocr.recognize(&image).await?;
    let extraction = parser.parse(&recognized.text, Some(&image)).await?;

    Ok(Parsed {
        raw_text: recognized.text,
        confidence: recognized.confidence,
        image: Some(image),
        extraction,
    })
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "source",
        "name",
        "company",
        "email",
        "phone",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.extraction {
            Some(extraction) => {
                let card = &extraction.card;
                let source = format!("{:?}", extraction.source).to_lowercase();
                wtr.write_record([
                    filename,
                    "success",
                    source.as_str(),
                    card.name.as_str(),
                    card.company.as_str(),
                    card.email.join("; ").as_str(),
                    card.phone.join("; ").as_str(),
                    time.as_str(),
                    "",
                ])?;
            }
            None => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    time.as_str(),
                    result.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
