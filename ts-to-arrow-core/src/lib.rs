//! ts-to-arrow core library - rewrites TypeScript function declarations as arrow functions

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Only top-level function declarations are rewritten
// - Classification is pure; all I/O lives in `Converter` and `persist`
// - No global mutable state, no threads, no async
// - Deterministic file order and declaration order
// - Bytes outside converted declarations are never changed

pub mod ast;
pub mod classify;
pub mod config;
pub mod discover;
pub mod error;
pub mod parser;
pub mod persist;
pub mod report;
pub mod rewrite;
pub mod span;
pub mod stats;

pub use classify::{
    classify, classify_with, Classification, ClassifyOptions, ConversionKind, ConversionResult,
    SkipReason,
};
pub use config::ResolvedProject;
pub use error::RunError;
pub use report::{DeclarationEvent, FileOutcome, FileReport, RunReport};
pub use stats::{ConversionStats, ConversionTracker};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use swc_common::{sync::Lrc, SourceMap};

/// What to convert and how
#[derive(Debug, Clone)]
pub struct ConversionOptions {
    /// Directory searched recursively for source files
    pub directory: PathBuf,
    /// Path of the project's `tsconfig.json`
    pub project: PathBuf,
    /// Report conversions without writing files
    pub dry_run: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            directory: PathBuf::from("src"),
            project: PathBuf::from(config::DEFAULT_CONFIG_FILE),
            dry_run: false,
        }
    }
}

/// A validated run: project loaded and member files collected
#[derive(Debug)]
pub struct ConversionPlan {
    pub project: ResolvedProject,
    /// Sorted, canonical paths
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Load the project and collect the files to convert
///
/// Fails with a [`RunError`] when the tsconfig or directory is missing or
/// when no source files are found. Nothing is written.
pub fn plan(options: &ConversionOptions) -> Result<ConversionPlan> {
    let project = config::load_project(&options.project)?;

    if !options.directory.is_dir() {
        return Err(RunError::DirectoryNotFound(options.directory.clone()).into());
    }
    let directory = options
        .directory
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", options.directory.display()))?;

    let files = collect_source_files(&directory, &project)?;
    if files.is_empty() {
        return Err(RunError::NoSourceFiles(options.directory.clone()).into());
    }

    log::debug!(
        "Found {} source file(s) under {}",
        files.len(),
        directory.display()
    );

    Ok(ConversionPlan {
        project,
        files,
        dry_run: options.dry_run,
    })
}

/// Processes files one at a time and keeps the run's tally
pub struct Converter<'a> {
    plan: &'a ConversionPlan,
    source_map: Lrc<SourceMap>,
    tracker: ConversionTracker,
}

impl<'a> Converter<'a> {
    pub fn new(plan: &'a ConversionPlan) -> Self {
        Converter {
            plan,
            source_map: Default::default(),
            tracker: ConversionTracker::new(),
        }
    }

    /// Convert one file, writing it back unless this is a dry run
    pub fn process_file(&mut self, path: &Path) -> Result<FileReport> {
        self.tracker.increment_files_processed();

        let src = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let conversion = rewrite::convert_source(
            &src,
            &path.to_string_lossy(),
            &self.source_map,
            self.plan.project.parse_options,
        )?;

        for event in &conversion.events {
            if event.is_converted() {
                self.tracker.increment_converted();
            } else {
                self.tracker.increment_skipped();
            }
        }

        let outcome = match (&conversion.output, self.plan.dry_run) {
            (_, true) => FileOutcome::DryRun,
            (None, false) => FileOutcome::Unchanged,
            (Some(output), false) => {
                persist::atomic_write(path, output)?;
                log::debug!("Wrote {}", path.display());
                FileOutcome::Saved
            }
        };

        Ok(FileReport {
            path: path.to_path_buf(),
            events: conversion.events,
            outcome,
        })
    }

    pub fn stats(&self) -> ConversionStats {
        self.tracker.stats()
    }
}

/// Plan and process a whole run without any console output
///
/// Stops at the first file that fails; files written before it stay written.
pub fn convert(options: &ConversionOptions) -> Result<RunReport> {
    let plan = plan(options)?;
    let mut converter = Converter::new(&plan);

    let files = plan
        .files
        .iter()
        .map(|path| converter.process_file(path))
        .collect::<Result<Vec<_>>>()?;

    Ok(RunReport {
        files,
        stats: converter.stats(),
        dry_run: plan.dry_run,
    })
}

/// Check if a file name has a convertible source extension
///
/// Declaration files (`.d.ts`) never have bodies, so they are not collected.
fn is_supported_source_file(filename: &str, allow_js: bool) -> bool {
    if filename.ends_with(".d.ts") || filename.ends_with(".d.mts") || filename.ends_with(".d.cts") {
        return false;
    }

    let is_ts = filename.ends_with(".ts")
        || filename.ends_with(".tsx")
        || filename.ends_with(".mts")
        || filename.ends_with(".cts");

    let is_js = filename.ends_with(".js")
        || filename.ends_with(".jsx")
        || filename.ends_with(".mjs")
        || filename.ends_with(".cjs");

    is_ts || (allow_js && is_js)
}

/// Returns true for directory names that should not be traversed
fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "node_modules"
}

/// Collect project member source files under `dir`, sorted
fn collect_source_files(dir: &Path, project: &ResolvedProject) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = walkdir::WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_skipped_dir(&entry.file_name().to_string_lossy())
        });

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy();
        if !is_supported_source_file(&filename, project.allow_js) {
            continue;
        }

        if project.contains(entry.path()) {
            files.push(entry.into_path());
        }
    }

    // Sort files for deterministic order
    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_source_file("a.ts", false));
        assert!(is_supported_source_file("a.tsx", false));
        assert!(is_supported_source_file("a.mts", false));
        assert!(is_supported_source_file("a.cts", false));
        assert!(!is_supported_source_file("a.d.ts", false));
        assert!(!is_supported_source_file("a.js", false));
        assert!(is_supported_source_file("a.js", true));
        assert!(is_supported_source_file("a.jsx", true));
        assert!(!is_supported_source_file("a.json", true));
        assert!(!is_supported_source_file("a.rs", true));
    }

    #[test]
    fn test_skipped_dirs() {
        assert!(is_skipped_dir("node_modules"));
        assert!(is_skipped_dir(".git"));
        assert!(!is_skipped_dir("components"));
    }
}
