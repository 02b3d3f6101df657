//! Writing rewritten files back to disk
//!
//! Persistence is per file. A failure part-way through a run leaves files
//! written earlier in place.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Replace the contents of an existing file via temp file + rename
///
/// The original file's permissions are carried over to the new contents.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    let permissions = fs::metadata(path)
        .with_context(|| format!("failed to read metadata: {}", path.display()))?
        .permissions();

    let temp_path = temp_path_for(path);

    let result = write_temp(&temp_path, contents, permissions).and_then(|()| {
        fs::rename(&temp_path, path)
            .with_context(|| format!("failed to rename temp file to: {}", path.display()))
    });

    if result.is_err() {
        // Never leave the temp file in the source tree
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn write_temp(temp_path: &Path, contents: &str, permissions: fs::Permissions) -> Result<()> {
    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write to temp file: {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync temp file: {}", temp_path.display()))?;
    drop(file);

    fs::set_permissions(temp_path, permissions)
        .with_context(|| format!("failed to set permissions on: {}", temp_path.display()))
}

/// `src/a.ts` -> `src/.a.ts.ts-to-arrow.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.ts-to-arrow.tmp", file_name))
}
