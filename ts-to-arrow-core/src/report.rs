//! Per-file and per-run results handed back to the caller
//!
//! The core never prints. Everything a front end needs to describe a run is
//! carried by these values.

use crate::classify::{ConversionKind, SkipReason};
use crate::stats::ConversionStats;
use std::path::PathBuf;

/// Characters of the original declaration shown in skip messages
pub const SNIPPET_CHARS: usize = 50;

/// Characters of the replacement shown in dry-run previews
pub const PREVIEW_CHARS: usize = 80;

/// What happened to one top-level function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationEvent {
    Converted {
        name: Option<String>,
        kind: ConversionKind,
        line: u32,
        replacement: String,
    },
    Skipped {
        reason: SkipReason,
        line: u32,
        /// Start of the original declaration text
        snippet: String,
    },
}

impl DeclarationEvent {
    pub fn is_converted(&self) -> bool {
        matches!(self, DeclarationEvent::Converted { .. })
    }
}

/// What happened to the file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one declaration was replaced and the file was written
    Saved,
    /// Nothing to convert, file untouched
    Unchanged,
    /// Preview mode, file untouched regardless of conversions
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub events: Vec<DeclarationEvent>,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn converted_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_converted()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.events.len() - self.converted_count()
    }
}

/// Final value of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    pub stats: ConversionStats,
    pub dry_run: bool,
}

/// Cut `text` to at most `limit` characters, appending `...` when cut
pub fn truncate_preview(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// First `limit` characters of `text`, never cut mid-character
pub fn snippet(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
