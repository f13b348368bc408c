//! Python version constraint for `[project].requires-python`.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use toml_edit::{value, DocumentMut, Item};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOperator {
    /// `~=`, used for `major.minor` input
    Compatible,
    /// `==`, used for `major.minor.patch` input
    Exact,
}

impl fmt::Display for VersionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionOperator::Compatible => write!(f, "~="),
            VersionOperator::Exact => write!(f, "=="),
        }
    }
}

/// A PEP 440 specifier built from the user's Python version answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecifier {
    pub operator: VersionOperator,
    pub major: String,
    pub minor: String,
    pub patch: String,
}

impl FromStr for VersionSpecifier {
    type Err = Error;

    /// `"3.10"` becomes `~=3.10.0`, `"3.10.1"` becomes `==3.10.1`; anything
    /// else is rejected.
    fn from_str(version: &str) -> Result<Self> {
        let invalid = || Error::PythonVersionError { version: version.to_string() };
        let parts: Vec<&str> = version.trim().split('.').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(invalid());
        }
        let (operator, major, minor, patch) = match parts.as_slice() {
            [major, minor] => (VersionOperator::Compatible, *major, *minor, "0"),
            [major, minor, patch] => (VersionOperator::Exact, *major, *minor, *patch),
            _ => return Err(invalid()),
        };
        Ok(Self {
            operator,
            major: major.to_string(),
            minor: minor.to_string(),
            patch: patch.to_string(),
        })
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}.{}.{}", self.operator, self.major, self.minor, self.patch)
    }
}

/// Resolves a `major.minor` or `major.minor.patch` string to a specifier string.
pub fn resolve_python_version_specifier(version: &str) -> Result<String> {
    Ok(version.parse::<VersionSpecifier>()?.to_string())
}

/// Sets `[project].requires-python` in a pyproject document.
pub fn set_requires_python(content: &str, version: &str) -> Result<String> {
    let specifier = resolve_python_version_specifier(version)?;
    let mut doc: DocumentMut = content.parse()?;
    let project = doc
        .get_mut("project")
        .and_then(Item::as_table_like_mut)
        .ok_or_else(|| Error::ConfigError("pyproject.toml has no [project] table".to_string()))?;
    project.insert("requires-python", value(specifier));
    Ok(doc.to_string())
}

/// Rewrites `requires-python` in the project's `pyproject.toml`.
pub fn write_python_version(project_dir: &Path, version: &str) -> Result<()> {
    let path = project_dir.join("pyproject.toml");
    let content = fs::read_to_string(&path)?;
    fs::write(&path, set_requires_python(&content, version)?)?;
    debug!("Set requires-python from '{version}' in {}", path.display());
    Ok(())
}
