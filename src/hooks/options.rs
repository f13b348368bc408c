use serde::Deserialize;

use crate::answers::AnswerSet;
use crate::error::{Error, Result};

pub const NO_LICENSE: &str = "No license file";

/// The answers the post-generation hook acts on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectOptions {
    pub module_name: String,
    pub python_version_number: String,
    /// Selected storage backend (`none`, `s3`, `azure`, `gcs`).
    pub dataset_storage: String,
    pub environment_manager: String,
    pub dependency_file: String,
    pub pydata_packages: String,
    pub linting_and_formatting: String,
    pub testing_framework: String,
    pub docs: String,
    pub open_source_license: String,
    pub include_code_scaffold: String,
    /// Directory, zip, zip URL or VCS URI overlaid on the project; empty to skip.
    #[serde(default)]
    pub custom_config: String,
}

impl ProjectOptions {
    /// Reads the options out of a resolved answer set.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a required answer is missing or not a string
    pub fn from_answers(answers: &AnswerSet) -> Result<Self> {
        serde_json::from_value(answers.derived_context())
            .map_err(|e| Error::ConfigError(format!("Incomplete answers for post-generation: {e}")))
    }

    pub fn code_scaffold(&self) -> bool {
        self.include_code_scaffold == "Yes"
    }

    pub fn keeps_license(&self) -> bool {
        self.open_source_license != NO_LICENSE
    }
}
