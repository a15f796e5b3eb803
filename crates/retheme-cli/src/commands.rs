//! Subcommand implementations.

use std::process::ExitCode;

use anyhow::{Context, Result};
use retheme::{
    Document, FileKeyStore, NodeId, StyleRegistry, ThemeKind, path, restore_styles,
    sync_style_keys,
};
use tracing::{debug, info};

use crate::cli::{ApplyArgs, CheckArgs, ReportFormat, SyncArgs};
use crate::config::Config;
use crate::report;

/// Exit status for a fatal error.
pub const EXIT_FATAL: u8 = 1;
/// Exit status when there is nothing to retheme.
pub const EXIT_EMPTY_SELECTION: u8 = 2;
/// Exit status for `--strict` runs that reported errors.
pub const EXIT_STRICT: u8 = 3;

/// `retheme apply`.
pub fn apply(args: &ApplyArgs, config: &Config) -> Result<ExitCode> {
    let mut doc = Document::from_file(&args.document)
        .with_context(|| format!("Failed to load document {}", args.document.display()))?;

    let selection: Vec<NodeId> = if args.select.is_empty() {
        doc.selection.clone()
    } else {
        args.select.iter().map(|id| NodeId::new(id.as_str())).collect()
    };
    if selection.is_empty() {
        eprintln!("Selection is empty");
        return Ok(ExitCode::from(EXIT_EMPTY_SELECTION));
    }

    let store = FileKeyStore::new(&config.store);
    let records = restore_styles(&doc.styles, &store, &doc)
        .with_context(|| format!("Failed to restore styles from {}", store.path().display()))?;
    let registry = StyleRegistry::build(records);

    let outcome = doc.apply_theme(&registry, &selection)?;

    let output = args.output.as_ref().unwrap_or(&args.document);
    doc.to_file(output)
        .with_context(|| format!("Failed to write document {}", output.display()))?;
    info!(document = %output.display(), "Document written");

    let grouped = outcome.diagnostics.report();
    match config.format {
        ReportFormat::Text => {
            print!("{}", report::render_text(&grouped));
            println!(
                "{}",
                report::summary(&grouped, outcome.stats.roots, outcome.stats.replaced)
            );
        }
        ReportFormat::Json => println!("{}", report::render_json(&grouped)?),
    }

    if args.strict && outcome.diagnostics.has_errors() {
        return Ok(ExitCode::from(EXIT_STRICT));
    }
    Ok(ExitCode::SUCCESS)
}

/// `retheme sync`.
pub fn sync(args: &SyncArgs, config: &Config) -> Result<ExitCode> {
    let doc = Document::from_file(&args.document)
        .with_context(|| format!("Failed to load document {}", args.document.display()))?;
    let store = FileKeyStore::new(&config.store);
    let written = sync_style_keys(&doc.styles, &store)
        .with_context(|| format!("Failed to write key store {}", store.path().display()))?;

    println!("Styles updated ({written} keys).");
    Ok(ExitCode::SUCCESS)
}

/// `retheme check`.
pub fn check(args: &CheckArgs) -> ExitCode {
    let mut invalid = 0usize;
    for text in &args.paths {
        if !path::is_valid(text) {
            invalid += 1;
            println!("invalid  {text}");
            continue;
        }
        let expanded = path::expand(text);
        match path::parse(&expanded, true) {
            Ok(parsed) => {
                println!("ok       {text}  =>  {expanded}");
                for token in &parsed.types {
                    if ThemeKind::from_token(token).is_none() {
                        println!("         unknown theme type '{token}'");
                    }
                }
            }
            Err(err) => {
                invalid += 1;
                debug!(error = %err, "Expansion did not produce a full path");
                println!("invalid  {text}  =>  {expanded}");
            }
        }
    }

    if invalid > 0 {
        ExitCode::from(EXIT_FATAL)
    } else {
        ExitCode::SUCCESS
    }
}
