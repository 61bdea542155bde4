//! Command line front end for the markdown API extractor.

use std::{
    collections::BTreeMap,
    error::Error,
    fs,
    io::{self, IsTerminal},
    path::{Path, PathBuf},
    process,
};

use clap::Parser;
use libmdapi::{DEFAULT_BASE_URL, DEFAULT_PREFIX, Extractor};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Markdown file to extract
    file: PathBuf,

    /// Output the annotated entry forest instead of section records
    #[arg(long, default_value_t = false)]
    entries: bool,

    /// Namespace for `@module` values
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// Base URL for `@see` permalinks
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// JSON file mapping extra type names to documentation URLs
    #[arg(long)]
    types: Option<PathBuf>,

    /// Only read lists with a lead-in phrase or type link as parameter documentation
    #[arg(long, default_value_t = false)]
    strict_lists: bool,

    /// Colorize output
    #[arg(long, default_value = "auto", value_parser = ["auto", "always", "never"], env = "MDAPI_COLOR")]
    color: String,

    /// Emit JSON on a single line
    #[arg(long, default_value_t = false)]
    compact: bool,
}

/// Read the extra type map, a flat JSON object of name to URL.
fn read_types(path: &Path) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read type map {}: {e}", path.display()))?;
    let types: BTreeMap<String, String> = serde_json::from_str(&content)
        .map_err(|e| format!("Invalid type map {}: {e}", path.display()))?;
    Ok(types)
}

/// Extract the requested file and print the result.
fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let should_highlight = match cli.color.as_str() {
        "never" => false,
        "always" => true,
        "auto" => io::stdout().is_terminal(),
        _ => unreachable!(),
    };

    let mut extractor = Extractor::new()
        .with_prefix(cli.prefix.clone())
        .with_base_url(cli.base_url.clone())
        .with_strict_lists(cli.strict_lists)
        .with_highlighting(should_highlight)
        .with_compact(cli.compact);
    if let Some(path) = &cli.types {
        extractor = extractor.with_extra_types(read_types(path)?);
    }

    debug!(
        file = %cli.file.display(),
        prefix = %cli.prefix,
        base_url = %cli.base_url,
        types = extractor.types().len(),
        strict_lists = cli.strict_lists,
        highlight = should_highlight,
        entries = cli.entries,
        "resolved configuration"
    );

    let source = fs::read_to_string(&cli.file)
        .map_err(|e| format!("Failed to read {}: {e}", cli.file.display()))?;
    let api_doc_source = cli.file.to_string_lossy();

    let output = if cli.entries {
        extractor.entries_json(&source, &api_doc_source)?
    } else {
        extractor.to_json(&source, &api_doc_source)?
    };
    println!("{output}");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("{e}");
        process::exit(1);
    }
}
