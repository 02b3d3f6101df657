//! Fatal run errors
//!
//! Everything else propagates as `anyhow::Error` with context. These variants
//! are the conditions the CLI reports specially, so they stay downcastable.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("project configuration not found: {}", .0.display())]
    ProjectConfigNotFound(PathBuf),

    #[error("directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No TypeScript files found in '{}'.", .0.display())]
    NoSourceFiles(PathBuf),
}
