//! Contacts command - list, inspect, export and deduplicate saved contacts.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use curator_core::contacts::{find_all_duplicates, DEFAULT_THRESHOLD};
use curator_core::{Contact, ContactStore, JsonFileStore};

use super::parse::write_output;
use super::{load_config, open_store, short_id};
use crate::output::{format_contacts, OutputFormat};

/// Arguments for the contacts command.
#[derive(Args)]
pub struct ContactsArgs {
    #[command(subcommand)]
    command: ContactsCommand,
}

#[derive(Subcommand)]
enum ContactsCommand {
    /// List saved contacts
    List {
        /// Only contacts in this folder
        #[arg(long)]
        folder: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one contact
    Show {
        /// Contact id or a unique prefix of it
        id: String,
    },

    /// Delete one contact
    Delete {
        /// Contact id or a unique prefix of it
        id: String,
    },

    /// Delete every contact
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Export all contacts
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find likely duplicate contacts
    Duplicates {
        /// Minimum match score
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,
    },
}

pub fn run(args: ContactsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config);

    match args.command {
        ContactsCommand::List { folder, json } => list(&store, folder.as_deref(), json),
        ContactsCommand::Show { id } => show(&store, &id),
        ContactsCommand::Delete { id } => delete(&store, &id),
        ContactsCommand::Clear { yes } => clear(&store, yes),
        ContactsCommand::Export { format, output } => {
            let contacts = store.get_all()?;
            write_output(&format_contacts(&contacts, format)?, output.as_deref())
        }
        ContactsCommand::Duplicates { threshold } => duplicates(&store, threshold),
    }
}

/// Resolve a full id or unique id prefix.
fn resolve(store: &JsonFileStore, id: &str) -> anyhow::Result<Contact> {
    if let Some(contact) = store.get(id)? {
        return Ok(contact);
    }

    let mut matches: Vec<Contact> = store
        .get_all()?
        .into_iter()
        .filter(|c| c.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => anyhow::bail!("No contact with id {}", id),
        1 => Ok(matches.remove(0)),
        n => anyhow::bail!("Id prefix {} matches {} contacts", id, n),
    }
}

fn list(store: &JsonFileStore, folder: Option<&str>, json: bool) -> anyhow::Result<()> {
    let contacts: Vec<Contact> = store
        .get_all()?
        .into_iter()
        .filter(|c| folder.is_none_or(|f| c.folder_name().eq_ignore_ascii_case(f)))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&contacts)?);
        return Ok(());
    }

    if contacts.is_empty() {
        println!("{} No contacts saved.", style("ℹ").blue());
        return Ok(());
    }

    for c in &contacts {
        println!(
            "{}  {:<28} {:<28} {}",
            style(short_id(&c.id)).dim(),
            c.name,
            c.company,
            c.email.first().map(String::as_str).unwrap_or("")
        );
    }
    println!();
    println!("{} contacts", contacts.len());

    Ok(())
}

fn show(store: &JsonFileStore, id: &str) -> anyhow::Result<()> {
    let contact = resolve(store, id)?;
    print!("{}", format_contacts(std::slice::from_ref(&contact), OutputFormat::Text)?);

    if !contact.raw_text.is_empty() {
        println!();
        println!("{}", style("Raw text:").bold());
        println!("{}", contact.raw_text.trim_end());
    }
    Ok(())
}

fn delete(store: &JsonFileStore, id: &str) -> anyhow::Result<()> {
    let contact = resolve(store, id)?;
    store.delete(&contact.id)?;
    println!("{} Deleted {} ({})", style("✓").green(), contact.name, short_id(&contact.id));
    Ok(())
}

fn clear(store: &JsonFileStore, yes: bool) -> anyhow::Result<()> {
    let count = store.get_all()?.len();

    if !yes {
        anyhow::bail!("Refusing to delete {} contacts without --yes", count);
    }

    store.clear()?;
    println!("{} Deleted {} contacts", style("✓").green(), count);
    Ok(())
}

fn duplicates(store: &JsonFileStore, threshold: u32) -> anyhow::Result<()> {
    let contacts = store.get_all()?;
    let mut reported = HashSet::new();
    let mut groups = 0;

    for contact in &contacts {
        let matches: Vec<_> = find_all_duplicates(contact, &contacts, threshold)
            .into_iter()
            .filter(|m| reported.insert(pair_key(&contact.id, &m.contact.id)))
            .collect();

        if matches.is_empty() {
            continue;
        }

        groups += 1;
        println!("{} ({})", style(&contact.name).bold(), short_id(&contact.id));
        for m in matches {
            println!(
                "  {:>3}  {} ({}): {}",
                m.score,
                m.contact.name,
                short_id(&m.contact.id),
                m.reasons.join(", ")
            );
        }
    }

    if groups == 0 {
        println!("{} No duplicates found.", style("✓").green());
    }
    Ok(())
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a < b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
