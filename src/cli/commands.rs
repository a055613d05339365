//! Command implementations for the `fmf` CLI
//!
//! Each command returns whether it finished cleanly; hard failures are
//! reported through `anyhow` with context attached.

use crate::cli::args::{Args, CheckArgs, Commands, ConvertArgs, InspectArgs, RewriteArgs};
use crate::config::WriterConfig;
use crate::diagnostics::Diagnostics;
use crate::export::{ExportFormat, export_table};
use crate::models::{Table, Tables};
use crate::reader::{FmfDocument, FmfReader};
use crate::writer::{check_sections, check_table_symbols, has_fmf_extension, write_fmf};
use anyhow::{Context, Result};
use colored::*;
use indexmap::IndexMap;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Run the command selected on the command line
pub fn run(args: Args) -> Result<bool> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let reader = FmfReader::default();
    match &args.command {
        Commands::Inspect(inspect) => run_inspect(&reader, inspect),
        Commands::Check(check) => run_check(&reader, check),
        Commands::Convert(convert) => run_convert(&reader, convert),
        Commands::Rewrite(rewrite) => run_rewrite(&reader, rewrite),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fmf_processor={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn read_document(reader: &FmfReader, path: &Path) -> Result<FmfDocument> {
    reader
        .read_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Tables of a document keyed by symbol
fn tables_by_symbol(document: &FmfDocument) -> IndexMap<String, Table> {
    document
        .tables
        .iter()
        .filter_map(|t| t.symbol.clone().map(|symbol| (symbol, t.clone())))
        .collect()
}

/// Diagnostics of reading plus the checks a writer would run on the same content
fn structural_diagnostics(document: &FmfDocument) -> Diagnostics {
    let mut diagnostics = document.diagnostics.clone();
    let metadata = document.metadata();

    check_sections(&metadata, &mut diagnostics);
    if document.file_info.is_multiple {
        check_table_symbols(&tables_by_symbol(document), &metadata, &mut diagnostics);
    }
    diagnostics
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        match &diagnostic.section {
            Some(section) => println!(
                "  {} {} ({})",
                "warning:".yellow().bold(),
                diagnostic,
                section.dimmed()
            ),
            None => println!("  {} {}", "warning:".yellow().bold(), diagnostic),
        }
    }
}

fn run_inspect(reader: &FmfReader, args: &InspectArgs) -> Result<bool> {
    let document = read_document(reader, &args.path)?;

    if args.json {
        let tables: Vec<_> = document
            .tables
            .iter()
            .map(|table| {
                json!({
                    "name": table.name(),
                    "title": table.title,
                    "rows": table.height(),
                    "columns": table.columns.iter().map(|c| json!({
                        "label": c.label(),
                        "definition": c.definition.raw_spec,
                        "unit": c.unit.symbol(),
                        "kind": c.kind,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        let report = json!({
            "file_info": document.file_info,
            "sections": document.index.section_infos().collect::<Vec<_>>(),
            "metadata": document.metadata(),
            "tables": tables,
            "table_errors": document.table_errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            "diagnostics": document.diagnostics,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
        return Ok(!document.has_table_errors());
    }

    let info = &document.file_info;
    println!("{}", args.path.display().to_string().bright_green().bold());
    println!("  version:   {}", info.version);
    println!("  delimiter: {}", info.delimiter.control_value());
    println!(
        "  encoding:  {}",
        info.encoding.as_deref().unwrap_or("(not declared)")
    );
    println!();

    println!("{}", "Sections:".bold());
    for section in document.index.section_infos() {
        println!(
            "  [{}] line {}, {} lines, {} comments",
            section.name,
            section.start_line + 1,
            section.length,
            section.comment_count
        );
    }
    println!();

    println!("{}", "Tables:".bold());
    for table in &document.tables {
        println!(
            "  {} ({} rows x {} columns)",
            table.name().cyan(),
            table.height(),
            table.width()
        );
        for column in &table.columns {
            println!("    {:<20} {}", column.label(), column.unit);
        }
    }
    for error in &document.table_errors {
        println!("  {} {}", "error:".red().bold(), error);
    }

    if !document.diagnostics.is_empty() {
        println!();
        println!("{}", "Diagnostics:".bold());
        print_diagnostics(&document.diagnostics);
    }

    Ok(!document.has_table_errors())
}

/// Files named on the command line plus `.fmf` files found below directories
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory {}", path.display()))?;
                if entry.file_type().is_file() && has_fmf_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn run_check(reader: &FmfReader, args: &CheckArgs) -> Result<bool> {
    let files = collect_files(&args.paths)?;
    info!("Checking {} file(s)", files.len());

    let mut failed = 0;
    for path in &files {
        let document = match reader.read_path(path) {
            Ok(document) => document,
            Err(e) => {
                println!("{} {}: {}", "FAIL".red().bold(), path.display(), e);
                failed += 1;
                continue;
            }
        };

        let diagnostics = structural_diagnostics(&document);
        if document.has_table_errors() {
            println!("{} {}", "FAIL".red().bold(), path.display());
            failed += 1;
        } else if diagnostics.is_empty() {
            println!("{} {}", "OK".green().bold(), path.display());
        } else {
            println!("{} {}", "WARN".yellow().bold(), path.display());
        }
        print_diagnostics(&diagnostics);
    }

    println!();
    println!("{} file(s) checked, {} failed", files.len(), failed);
    Ok(failed == 0)
}

/// Output path for one exported table
fn export_path(
    input: &Path,
    output_dir: &Path,
    table: &Table,
    multiple: bool,
    format: ExportFormat,
) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    let name = if multiple {
        format!("{}_{}.{}", stem, table.name(), format.extension())
    } else {
        format!("{}.{}", stem, format.extension())
    };
    output_dir.join(name)
}

fn run_convert(reader: &FmfReader, args: &ConvertArgs) -> Result<bool> {
    let document = read_document(reader, &args.input)?;
    let format = ExportFormat::from(args.format);

    std::fs::create_dir_all(&args.output).with_context(|| {
        format!("Failed to create output directory {}", args.output.display())
    })?;

    for table in &document.tables {
        let path = export_path(
            &args.input,
            &args.output,
            table,
            document.file_info.is_multiple,
            format,
        );
        export_table(table, &path, format)
            .with_context(|| format!("Failed to export table {}", table.name()))?;
        println!("{} {}", "wrote".green(), path.display());
    }

    for error in &document.table_errors {
        println!("{} {}", "skipped:".yellow().bold(), error);
    }
    Ok(!document.has_table_errors())
}

fn run_rewrite(reader: &FmfReader, args: &RewriteArgs) -> Result<bool> {
    let document = read_document(reader, &args.input)?;
    if document.has_table_errors() {
        for error in &document.table_errors {
            println!("{} {}", "error:".red().bold(), error);
        }
        anyhow::bail!(
            "{} has tables that cannot be parsed, refusing to rewrite",
            args.input.display()
        );
    }

    let info = &document.file_info;
    let mut config = WriterConfig::default()
        .with_version(info.version.clone())
        .with_comment_char(args.comment.unwrap_or(info.comment_char))
        .with_delimiter(args.delimiter.clone().unwrap_or_else(|| info.delimiter.clone()));
    if let Some(encoding) = args.encoding.clone().or_else(|| info.encoding.clone()) {
        config = config.with_encoding(encoding);
    }
    if let Some(number_format) = args.number_format.clone() {
        config = config.with_number_format(number_format);
    }

    let metadata = document.metadata();
    let tables = document
        .into_tables()
        .unwrap_or_else(|| Tables::Multiple(IndexMap::new()));

    let report = write_fmf(&args.output, &metadata, &tables, &config)
        .with_context(|| format!("Failed to write {}", args.output))?;

    println!("{} {}", "wrote".green(), report.path.display());
    print_diagnostics(&report.diagnostics);
    Ok(report.diagnostics.is_empty())
}
