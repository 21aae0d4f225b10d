// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use quote_keeper::{display_label, CategoryFilter, Config, DefaultSession};
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env();

    match args.get(1).map(String::as_str) {
        None | Some("ui") => run_ui_mode(&config)?,
        Some("list") => run_list(&config, args.get(2))?,
        Some("random") => run_random(&config, args.get(2))?,
        Some("add") => run_add(&config, &args[2..])?,
        Some("categories") => run_categories(&config)?,
        Some("export") => run_export(&config, args.get(2))?,
        Some("import") => run_import(&config, args.get(2))?,
        Some("sync") => run_sync(&config, args.get(2).map(String::as_str) == Some("--json"))?,
        Some(other) => {
            print_usage();
            bail!("unknown command: {}", other);
        }
    }

    Ok(())
}

fn print_usage() {
    eprintln!("Usage: quote-keeper [ui | list [category] | random [category] | add <text> <category>");
    eprintln!("                     | categories | export [path] | import <path> | sync [--json]]");
}

fn open_session(config: &Config) -> Result<DefaultSession> {
    DefaultSession::open(config)
        .with_context(|| format!("Failed to open quote database at {:?}", config.db_path))
}

fn run_list(config: &Config, category: Option<&String>) -> Result<()> {
    let session = open_session(config)?;
    let filter = category
        .map(|c| CategoryFilter::parse(c))
        .unwrap_or_default();

    let quotes = quote_keeper::filter_by_category(session.quotes(), &filter);
    println!("📚 {} ({} quotes)", filter.label(), quotes.len());
    for quote in quotes {
        println!("  {}", quote.display());
    }

    Ok(())
}

fn run_random(config: &Config, category: Option<&String>) -> Result<()> {
    let mut session = open_session(config)?;
    if let Some(category) = category {
        session.set_filter(category)?;
    }

    match session.show_random_quote(&mut rand::thread_rng())? {
        Some(quote) => println!("{}", quote.display()),
        None => println!("No quotes available for this category."),
    }

    Ok(())
}

fn run_add(config: &Config, rest: &[String]) -> Result<()> {
    let (text, category) = match rest {
        [text, category, ..] => (text.as_str(), category.as_str()),
        [text] => (text.as_str(), ""),
        [] => ("", ""),
    };

    let mut session = open_session(config)?;
    let quote = session
        .add_quote(text, category, Instant::now())
        .context("Please fill both quote and category.")?;

    println!("✓ Quote added and synced!");
    println!("  {}", quote.display());
    Ok(())
}

fn run_categories(config: &Config) -> Result<()> {
    let session = open_session(config)?;

    println!("🏷️  Categories (current filter: {})", session.filter());
    for category in session.categories() {
        println!("  {:<16} {}", category, display_label(category));
    }

    Ok(())
}

fn run_export(config: &Config, path: Option<&String>) -> Result<()> {
    let path = path.map(PathBuf::from).unwrap_or_else(|| config.export_path.clone());

    let mut session = open_session(config)?;
    let count = session
        .export_to_file(&path, Instant::now())
        .with_context(|| format!("Failed to export to {:?}", path))?;

    println!("✓ Exported {} quotes to {}", count, path.display());
    Ok(())
}

fn run_import(config: &Config, path: Option<&String>) -> Result<()> {
    let Some(path) = path.map(PathBuf::from) else {
        print_usage();
        bail!("import needs a file path");
    };

    let mut session = open_session(config)?;
    let count = session
        .import_from_file(&path, Instant::now())
        .context("Import failed: Invalid file.")?;

    println!("✓ Quotes imported successfully! ({} added, {} total)", count, session.quotes().len());
    Ok(())
}

fn run_sync(config: &Config, json: bool) -> Result<()> {
    let mut session = open_session(config)?;

    if json {
        let report = session.sync_now(Instant::now())?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("🔄 Checking for server updates...");
    let report = session.sync_now(Instant::now())?;
    println!("✓ {}", report.summary());

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    let session = open_session(config)?;
    ui::run_default(session, config.export_path.clone())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a command: quote-keeper list");
    std::process::exit(1);
}
