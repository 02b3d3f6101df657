//! ts-to-arrow CLI - converts TypeScript function declarations to arrow functions

#![deny(warnings)]

// Global invariants enforced:
// - Nothing is read or written before the user confirms (or passes --yes)
// - Deterministic output ordering
// - Exit code 0 on success or cancellation, 1 on any failure

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use ts_to_arrow_core::report::{self, PREVIEW_CHARS};
use ts_to_arrow_core::{
    ConversionKind, ConversionOptions, ConversionStats, Converter, DeclarationEvent, FileOutcome,
    FileReport, RunError, SkipReason,
};

#[derive(Parser)]
#[command(name = "ts-to-arrow")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert TypeScript function declarations to arrow functions")]
#[command(after_help = r#"Examples:
  ts-to-arrow                        # Process src/ directory
  ts-to-arrow -d lib                 # Process lib/ directory
  ts-to-arrow --dry-run              # Preview changes
  ts-to-arrow -d src --dry-run -v    # Dry run with verbose output

Requires a tsconfig.json in the working directory (or --project)."#)]
struct Cli {
    /// Directory to process
    #[arg(short, long, default_value = "src")]
    dir: PathBuf,

    /// Preview changes without saving files
    #[arg(long)]
    dry_run: bool,

    /// Show skipped declarations and full error details
    #[arg(short, long)]
    verbose: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Path to tsconfig.json
    #[arg(short, long, default_value = ts_to_arrow_core::config::DEFAULT_CONFIG_FILE)]
    project: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, cli.verbose);
            ExitCode::FAILURE
        }
    }
}

/// `log` output goes to stderr; `--verbose` raises this tool's crates to debug
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,ts_to_arrow=debug,ts_to_arrow_core=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if !cli.yes && !confirm(&cli.dir)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let options = ConversionOptions {
        directory: cli.dir.clone(),
        project: cli.project.clone(),
        dry_run: cli.dry_run,
    };

    print_options(&options);

    let plan = ts_to_arrow_core::plan(&options)?;
    log::debug!("Using config: {}", plan.project.config_path.display());

    println!(
        "{}",
        format!(
            "Processing {} file(s) in '{}'...\n",
            plan.files.len(),
            cli.dir.display()
        )
        .green()
    );

    let cwd = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .context("failed to resolve the working directory")?;

    let mut converter = Converter::new(&plan);
    for path in &plan.files {
        println!(
            "{}",
            format!("Processing: {}", display_path(path, &cwd)).cyan()
        );
        let file_report = converter.process_file(path)?;
        print_file_report(&file_report, cli.verbose);
    }

    print_summary(&converter.stats(), cli.dry_run);

    Ok(())
}

/// Ask before touching anything; an empty answer means yes, EOF means no
fn confirm(dir: &Path) -> anyhow::Result<bool> {
    print!(
        "{} Convert function declarations to arrow functions in '{}'? {} ",
        "?".green().bold(),
        dir.display(),
        "(Y/n)".dimmed()
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    if read == 0 {
        println!();
        return Ok(false);
    }

    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "" | "y" | "yes"
    )
}

fn print_options(options: &ConversionOptions) {
    println!(
        "{}",
        format!("Processing directory: {}", options.directory.display()).blue()
    );
    println!(
        "{}",
        format!(
            "Dry run mode: {}",
            if options.dry_run { "enabled" } else { "disabled" }
        )
        .blue()
    );
    println!();
}

fn print_file_report(file_report: &FileReport, verbose: bool) {
    for event in &file_report.events {
        match event {
            DeclarationEvent::Converted {
                name,
                kind,
                replacement,
                ..
            } => {
                println!("{}", format!("  {}", conversion_message(*kind, name.as_deref())).green());
                if file_report.outcome == FileOutcome::DryRun {
                    println!(
                        "{}",
                        format!(
                            "  Would replace with: {}",
                            report::truncate_preview(replacement, PREVIEW_CHARS)
                        )
                        .yellow()
                    );
                }
            }
            DeclarationEvent::Skipped {
                reason, snippet, ..
            } => {
                if verbose {
                    println!("{}", format!("  {}", skip_message(*reason, snippet)).dimmed());
                }
            }
        }
    }

    match file_report.outcome {
        FileOutcome::Saved => println!("{}", "  File saved\n".green()),
        FileOutcome::Unchanged => println!("{}", "  No changes made\n".dimmed()),
        FileOutcome::DryRun => println!("{}", "  Dry run - no files saved\n".yellow()),
    }
}

fn conversion_message(kind: ConversionKind, name: Option<&str>) -> String {
    match (kind, name) {
        (ConversionKind::NamedDefaultExport, Some(name)) => {
            format!("Converting named default export '{}' to arrow function", name)
        }
        (ConversionKind::AnonymousDefaultExport, _) | (_, None) => {
            "Converting anonymous default export to inline arrow function".to_string()
        }
        (ConversionKind::RegularExport, Some(name)) => {
            format!("Converting function '{}' to arrow function", name)
        }
    }
}

fn skip_message(reason: SkipReason, snippet: &str) -> String {
    let label = match reason {
        SkipReason::NoBody => "Skipping function (no body)",
        SkipReason::AnonymousNonDefault => "Skipping anonymous function (not default export)",
        SkipReason::Generator => "Skipping generator function",
    };
    format!("{}: {}...", label, snippet)
}

fn print_summary(stats: &ConversionStats, dry_run: bool) {
    println!("\n{}", "Conversion Summary:".bold());
    println!("  {} {}", "Converted functions:".green(), stats.converted);
    println!("  {} {}", "Skipped functions:".yellow(), stats.skipped);
    println!("  {} {}", "Files processed:".blue(), stats.files_processed);

    if dry_run {
        println!("{}", "\nDry run complete - no files were modified".yellow());
    } else {
        println!("{}", "\nConversion complete!".green());
    }
}

/// Paths are shown relative to the working directory when possible
fn display_path(path: &Path, cwd: &Path) -> String {
    path.strip_prefix(cwd)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// One line by default; `--verbose` adds the full context chain and debug detail
fn report_error(err: &anyhow::Error, verbose: bool) {
    match err.downcast_ref::<RunError>() {
        Some(RunError::NoSourceFiles(_)) => eprintln!("{}", err.to_string().red()),
        _ => eprintln!("{} {:#}", "Error:".red().bold(), err),
    }

    if verbose {
        eprintln!("\n{:?}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("\n"));
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES \n"));
        assert!(!is_affirmative("n\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("maybe"));
    }

    #[test]
    fn test_conversion_messages() {
        assert_eq!(
            conversion_message(ConversionKind::RegularExport, Some("add")),
            "Converting function 'add' to arrow function"
        );
        assert_eq!(
            conversion_message(ConversionKind::NamedDefaultExport, Some("load")),
            "Converting named default export 'load' to arrow function"
        );
        assert_eq!(
            conversion_message(ConversionKind::AnonymousDefaultExport, None),
            "Converting anonymous default export to inline arrow function"
        );
    }

    #[test]
    fn test_skip_message() {
        assert_eq!(
            skip_message(SkipReason::NoBody, "function pick(x: string): string;"),
            "Skipping function (no body): function pick(x: string): string;..."
        );
    }

    #[test]
    fn test_display_path_relative_to_cwd() {
        let cwd = Path::new("/work");
        assert_eq!(display_path(Path::new("/work/src/a.ts"), cwd), format!("src{}a.ts", std::path::MAIN_SEPARATOR));
        assert_eq!(display_path(Path::new("/other/a.ts"), cwd), Path::new("/other/a.ts").display().to_string());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ts-to-arrow"]);
        assert_eq!(cli.dir, PathBuf::from("src"));
        assert_eq!(cli.project, PathBuf::from("tsconfig.json"));
        assert!(!cli.dry_run);
        assert!(!cli.verbose);
        assert!(!cli.yes);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["ts-to-arrow", "-d", "lib", "--dry-run", "-v", "-y", "-p", "app/tsconfig.json"]);
        assert_eq!(cli.dir, PathBuf::from("lib"));
        assert_eq!(cli.project, PathBuf::from("app/tsconfig.json"));
        assert!(cli.dry_run);
        assert!(cli.verbose);
        assert!(cli.yes);
    }
}
