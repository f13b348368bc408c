//! Tree transformation: materializes the derived template from the master one.
//!
//! Every file and directory name passes through the [`Rewriter`]; text files
//! have their content rewritten, anything that is not valid UTF-8 is copied
//! byte for byte.

use log::{debug, info};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::rewriter::Rewriter;

/// Counts of what a transformation wrote.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformSummary {
    pub directories: usize,
    pub transformed: usize,
    pub copied: usize,
}

/// Reads a file and decodes it as UTF-8 text.
///
/// Returns `Ok(None)` when the content is not valid UTF-8, which callers
/// treat as a binary file. Line endings are normalized to `\n`.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    let bytes = fs::read(path.as_ref())?;
    Ok(decode_text(bytes))
}

/// Decodes raw bytes as UTF-8 text with normalized line endings.
pub fn decode_text(bytes: Vec<u8>) -> Option<String> {
    let text = String::from_utf8(bytes).ok()?;
    if text.contains('\r') {
        return Some(normalize_newlines(&text).into_owned());
    }
    Some(text)
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Removes `path` entirely if it exists and recreates it empty.
pub fn reset_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        debug!("Removing previous output '{}'", path.display());
        fs::remove_dir_all(path)?;
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Absolute form of `path`, which need not exist yet: the deepest existing
/// ancestor is canonicalized and the missing components are appended.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => break,
        }
    }
    let base = if existing.as_os_str().is_empty() {
        std::env::current_dir()?
    } else {
        fs::canonicalize(existing)?
    };
    Ok(missing.into_iter().rev().fold(base, |acc, name| acc.join(name)))
}

/// Writes the rewritten image of `source` into `destination`.
///
/// The destination is removed and recreated first, so repeated runs over an
/// unchanged source always produce the same tree. I/O failures are returned
/// as-is; a partially written destination is cleaned up by the next run.
///
/// # Errors
/// * `Error::TemplateDoesNotExistsError` if `source` is not a directory
/// * `Error::TemplateError` if `destination` is `source` or either contains
///   the other
/// * `Error::IoError` for any failure while reading or writing
pub fn transform_tree<S: AsRef<Path>, D: AsRef<Path>>(
    rewriter: &Rewriter,
    source: S,
    destination: D,
) -> Result<TransformSummary> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    if !source.is_dir() {
        return Err(Error::TemplateDoesNotExistsError {
            template_dir: source.display().to_string(),
        });
    }

    let source_abs = fs::canonicalize(source)?;
    let destination_abs = resolve_path(destination)?;
    if destination_abs.starts_with(&source_abs) || source_abs.starts_with(&destination_abs) {
        return Err(Error::TemplateError(format!(
            "destination '{}' overlaps source '{}'",
            destination.display(),
            source.display()
        )));
    }

    info!("Source: {}", source.display());
    info!("Destination: {}", destination.display());

    reset_dir(destination)?;
    let mut summary = TransformSummary::default();
    transform_dir(rewriter, source, destination, &mut summary)?;

    debug!(
        "Wrote {} directories, {} transformed files, {} binary files",
        summary.directories, summary.transformed, summary.copied
    );
    Ok(summary)
}

fn transform_dir(
    rewriter: &Rewriter,
    source: &Path,
    destination: &Path,
    summary: &mut TransformSummary,
) -> Result<()> {
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        let new_name = rewrite_name(rewriter, &name);
        let target = destination.join(&new_name);

        if path.is_dir() {
            fs::create_dir_all(&target)?;
            summary.directories += 1;
            transform_dir(rewriter, &path, &target, summary)?;
            continue;
        }

        match read_text(&path)? {
            Some(content) => {
                fs::write(&target, rewriter.rewrite_content(&content))?;
                summary.transformed += 1;
                info!(
                    "  Transformed: {} -> {}",
                    name.to_string_lossy(),
                    new_name.to_string_lossy()
                );
            }
            None => {
                // fs::copy keeps the permission bits; the mtime is carried over here.
                fs::copy(&path, &target)?;
                let modified = entry.metadata()?.modified()?;
                fs::File::open(&target)?.set_modified(modified)?;
                summary.copied += 1;
                info!(
                    "  Copied (binary): {} -> {}",
                    name.to_string_lossy(),
                    new_name.to_string_lossy()
                );
            }
        }
    }
    Ok(())
}

fn rewrite_name(rewriter: &Rewriter, name: &OsStr) -> OsString {
    match name.to_str() {
        Some(name) => OsString::from(rewriter.rewrite_name(name)),
        None => name.to_os_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_newlines("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_decode_text_rejects_invalid_utf8() {
        assert_eq!(decode_text(vec![0x89, b'P', b'N', b'G', 0xff]), None);
        assert_eq!(decode_text(b"x = 1\r\n".to_vec()), Some("x = 1\n".to_string()));
    }
}
