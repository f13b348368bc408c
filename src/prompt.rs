//! Interactive answer prompting.
//! The `Prompter` trait keeps answer resolution testable without a terminal.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input, Select};

/// Asks the user for one value at a time.
pub trait Prompter {
    /// Free text input with a pre-filled default.
    fn text(&self, key: &str, default: &str) -> Result<String>;

    /// Selection among `options`; returns the chosen index.
    fn select(&self, key: &str, options: &[&str], default: usize) -> Result<usize>;

    /// Yes/no question.
    fn confirm(&self, key: &str, default: bool) -> Result<bool>;
}

/// Terminal prompter built on dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn text(&self, key: &str, default: &str) -> Result<String> {
        Input::new()
            .with_prompt(key)
            .default(default.to_string())
            .interact_text()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }

    fn select(&self, key: &str, options: &[&str], default: usize) -> Result<usize> {
        Select::new()
            .with_prompt(key)
            .default(default)
            .items(options)
            .interact()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }

    fn confirm(&self, key: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(key)
            .default(default)
            .interact()
            .map_err(|e| Error::ConfigError(e.to_string()))
    }
}
