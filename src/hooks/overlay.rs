//! Custom config overlay: user-supplied files copied over the generated project.
//!
//! The location may be a local directory, a local `.zip` file, an http(s)
//! URL to a `.zip` file, or a version control URI. Strategies are tried in
//! that order and the first applicable one is used. Downloads, extractions
//! and clones go to a scratch directory removed on every exit path.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use url::Url;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Repository abbreviations understood for VCS overlays.
const VCS_ABBREVIATIONS: [(&str, &str); 3] = [
    ("gh:", "https://github.com/"),
    ("gl:", "https://gitlab.com/"),
    ("bb:", "https://bitbucket.org/"),
];

/// Resolved overlay location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlaySource {
    Directory(PathBuf),
    ZipFile(PathBuf),
    ZipUrl(Url),
    /// Git repository URL (HTTPS, SSH or file)
    Vcs(String),
}

impl fmt::Display for OverlaySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlaySource::Directory(path) => write!(f, "local directory: '{}'", path.display()),
            OverlaySource::ZipFile(path) => write!(f, "local zip: '{}'", path.display()),
            OverlaySource::ZipUrl(url) => write!(f, "remote zip: '{url}'"),
            OverlaySource::Vcs(repo) => write!(f, "git repository: '{repo}'"),
        }
    }
}

fn expand_abbreviation(location: &str) -> String {
    for (prefix, expansion) in VCS_ABBREVIATIONS {
        if let Some(rest) = location.strip_prefix(prefix) {
            return format!("{expansion}{rest}");
        }
    }
    location.to_string()
}

/// Whether `location` looks like something git can clone.
pub fn is_vcs_uri(location: &str) -> bool {
    if location.starts_with("git@") {
        return true;
    }
    match Url::parse(location) {
        Ok(url) => matches!(url.scheme(), "https" | "http" | "git" | "ssh" | "file"),
        Err(_) => false,
    }
}

impl OverlaySource {
    /// Picks the first applicable strategy for `location`.
    ///
    /// Relative local paths are resolved against `base_dir`, the directory
    /// that contains the generated project.
    ///
    /// # Errors
    /// * `Error::OverlaySourceError` if no strategy applies
    pub fn resolve(location: &str, base_dir: &Path) -> Result<Self> {
        let candidate = Path::new(location);
        let local = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            base_dir.join(candidate)
        };

        if local.is_dir() {
            return Ok(Self::Directory(local));
        }
        if local.is_file() && location.ends_with(".zip") {
            return Ok(Self::ZipFile(local));
        }
        if location.starts_with("http") && location.rsplit('.').next() == Some("zip") {
            let url = Url::parse(location)
                .map_err(|_| Error::OverlaySourceError { location: location.to_string() })?;
            return Ok(Self::ZipUrl(url));
        }

        let expanded = expand_abbreviation(location);
        let repo = expanded.strip_prefix("git+").unwrap_or(&expanded);
        if is_vcs_uri(repo) {
            return Ok(Self::Vcs(repo.to_string()));
        }

        Err(Error::OverlaySourceError { location: location.to_string() })
    }
}

fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    archive.extract(dest_dir)?;
    debug!("Extracted {} entries from '{}'", archive.len(), archive_path.display());
    Ok(())
}

fn download(url: &Url, dest: &Path) -> Result<()> {
    debug!("Downloading '{url}'");
    let response = reqwest::blocking::get(url.as_str())?.error_for_status()?;
    fs::write(dest, response.bytes()?)?;
    Ok(())
}

fn clone_repository(repo_url: &str, dest: &Path) -> Result<()> {
    debug!("Cloning repository '{repo_url}'");

    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, _allowed_types| {
        let home = std::env::var("HOME").unwrap_or_default();
        git2::Cred::ssh_key(
            username_from_url.unwrap_or("git"),
            None,
            &Path::new(&home).join(".ssh").join("id_rsa"),
            None,
        )
    });

    let mut fetch_opts = git2::FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);

    let mut builder = git2::build::RepoBuilder::new();
    builder.fetch_options(fetch_opts);
    builder.clone(repo_url, dest)?;
    Ok(())
}

/// Copies `source` over `dest`, merging directories and overwriting files.
/// Version control metadata is not copied.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    let walker = WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");
    for entry in walker {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| Error::TemplateError(e.to_string()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Overlays `location` onto `project_dir`. An empty location does nothing.
pub fn apply_overlay(location: &str, project_dir: &Path) -> Result<()> {
    apply_overlay_in(location, project_dir, std::env::temp_dir())
}

/// [`apply_overlay`] with downloads, extractions and clones placed under
/// `scratch_root`.
pub fn apply_overlay_in<R: AsRef<Path>>(
    location: &str,
    project_dir: &Path,
    scratch_root: R,
) -> Result<()> {
    let location = location.trim();
    if location.is_empty() {
        return Ok(());
    }

    // `.` and `proj/sub/..` have no usable lexical parent.
    let project_abs = fs::canonicalize(project_dir)?;
    let base_dir = project_abs.parent().unwrap_or(&project_abs);
    let source = OverlaySource::resolve(location, base_dir)?;
    info!("Applying custom config from the {source}");

    let scratch = tempfile::Builder::new().prefix("ccds-overlay-").tempdir_in(scratch_root)?;
    let root = match &source {
        OverlaySource::Directory(path) => path.clone(),
        OverlaySource::ZipFile(path) => {
            let extracted = scratch.path().join("extracted");
            extract_zip(path, &extracted)?;
            extracted
        }
        OverlaySource::ZipUrl(url) => {
            let archive = scratch.path().join("overlay.zip");
            download(url, &archive)?;
            let extracted = scratch.path().join("extracted");
            extract_zip(&archive, &extracted)?;
            extracted
        }
        OverlaySource::Vcs(repo) => {
            let checkout = scratch.path().join("checkout");
            clone_repository(repo, &checkout)?;
            checkout
        }
    };

    let copied = copy_tree(&root, project_dir)?;
    debug!("Copied {copied} overlay files into '{}'", project_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_source_display() {
        let source = OverlaySource::Vcs("git@github.com:user/repo".to_string());
        assert_eq!(format!("{source}"), "git repository: 'git@github.com:user/repo'");
    }

    #[test]
    fn test_is_vcs_uri() {
        assert!(is_vcs_uri("https://github.com/user/repo.git"));
        assert!(is_vcs_uri("git@github.com:user/repo.git"));
        assert!(!is_vcs_uri("some/relative/path"));
        assert!(!is_vcs_uri("not a uri"));
    }

    #[test]
    fn test_expand_abbreviation() {
        assert_eq!(expand_abbreviation("gh:user/config"), "https://github.com/user/config");
        assert_eq!(expand_abbreviation("./local"), "./local");
    }
}
