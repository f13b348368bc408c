//! File-system pruning applied to a freshly rendered project.
//!
//! Every operation tolerates paths that are already gone, so the hook can be
//! run again on the same directory.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::Result;

/// Removes a file or a directory tree. Returns whether anything was removed.
pub fn remove_path(path: &Path) -> Result<bool> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(false);
    };
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    debug!("Removed '{}'", path.display());
    Ok(true)
}

/// Moves everything inside `parent/variant` up into `parent`.
pub fn hoist_variant(parent: &Path, variant: &str) -> Result<()> {
    let variant_dir = parent.join(variant);
    if !variant_dir.is_dir() {
        debug!("No '{}' to hoist", variant_dir.display());
        return Ok(());
    }
    for entry in fs::read_dir(&variant_dir)? {
        let entry = entry?;
        let target = parent.join(entry.file_name());
        fs::rename(entry.path(), &target)?;
        debug!("Moved '{}' to '{}'", entry.path().display(), target.display());
    }
    Ok(())
}

/// Removes every subdirectory of `parent` except one named like `parent`
/// itself (e.g. `docs/docs` for mkdocs).
pub fn prune_variant_dirs(parent: &Path) -> Result<()> {
    if !parent.is_dir() {
        return Ok(());
    }
    let keep = parent.file_name();
    for entry in fs::read_dir(parent)? {
        let entry = entry?;
        if entry.path().is_dir() && Some(entry.file_name().as_os_str()) != keep {
            remove_path(&entry.path())?;
        }
    }
    Ok(())
}

/// Keeps only the scaffold for `selected` under `parent`: its contents are
/// hoisted and the sibling scaffolds are removed. `None` removes `parent`.
pub fn select_variant(parent: &Path, selected: Option<&str>) -> Result<()> {
    match selected {
        Some(variant) => {
            hoist_variant(parent, variant)?;
            prune_variant_dirs(parent)
        }
        None => remove_path(parent).map(|_| ()),
    }
}

/// Reduces a Python package to an empty `__init__.py`.
pub fn strip_package(package_dir: &Path) -> Result<()> {
    if !package_dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(package_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else if entry.file_name() == "__init__.py" {
            fs::write(&path, "")?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    debug!("Stripped package '{}'", package_dir.display());
    Ok(())
}

/// Replaces every occurrence of `from` in a text file, if the file exists.
pub fn replace_in_file(path: &Path, from: &str, to: &str) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let content = fs::read_to_string(path)?;
    if content.contains(from) {
        fs::write(path, content.replace(from, to))?;
    }
    Ok(())
}
