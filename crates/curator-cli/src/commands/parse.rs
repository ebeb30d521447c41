//! Parse command - structure card text that was already recognized.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, info};

use curator_core::{AiMode, RuleBasedParser};

use super::{
    build_parser, load_config, open_store, report_fallback, save_extraction, short_id,
    SaveOptions,
};
use crate::output::{format_extraction, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file to parse ("-" or omitted reads stdin)
    input: Option<PathBuf>,

    /// Card text given directly
    #[arg(short, long, conflicts_with = "input")]
    text: Option<String>,

    /// AI mode (off, prefer, only); defaults to the config value
    #[arg(long)]
    ai: Option<AiMode>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show which field took each line
    #[arg(long)]
    explain: bool,

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

pub async fn run(args: ParseArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_input(&args)?;

    if text.trim().is_empty() {
        anyhow::bail!("No card text given");
    }

    info!("Parsing {} lines of card text", text.lines().count());

    let parser = build_parser(&config, args.ai);
    let extraction = parser.parse(&text, None).await?;
    report_fallback(&extraction);

    if args.explain {
        explain(parser.rules(), &text);
    }

    let output = format_extraction(&extraction, args.format)?;
    write_output(&output, args.output.as_deref())?;

    if args.save {
        let store = open_store(&config);
        let saved = save_extraction(
            &store,
            &extraction,
            &text,
            100.0,
            None,
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

fn read_input(args: &ParseArgs) -> anyhow::Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    match args.input.as_deref() {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            Ok(fs::read_to_string(path)?)
        }
        _ => {
            debug!("Reading card text from stdin");
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Write to a file, or stdout when no path is given.
pub fn write_output(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", output.trim_end()),
    }
    Ok(())
}

/// Print the rule-based line assignments to stderr.
fn explain(rules: &RuleBasedParser, text: &str) {
    let report = rules.parse_report(text);

    eprintln!("{}", style("Line assignments (rule-based):").bold());
    for (index, line) in report.lines.iter().enumerate() {
        let owner = report
            .owner(index)
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".to_string());
        eprintln!("  {:>2}  {:<9} {}", index + 1, owner, line);
    }
    eprintln!("  parsed in {}µs", report.processing_time_us);
}
