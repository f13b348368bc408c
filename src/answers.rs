//! The Answer Set: resolved variable values for one project instantiation.
//!
//! Answers are kept flat (the derived dialect's shape). The master dialect
//! sees them under the `cookiecutter` namespace with the composite storage
//! variable re-nested, see [`AnswerSet::master_context`].

use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{Manifest, Question};
use crate::constants::{COMPOSITE_VARIABLE, MASTER_NAMESPACE};
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;

/// Ordered mapping from variable name to a scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(IndexMap<String, serde_json::Value>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an answer set from a JSON object. `null` yields an empty set.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `value` is neither an object nor null
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::new()),
            serde_json::Value::Object(map) => Ok(Self(map.into_iter().collect())),
            other => Err(Error::ValidationError(format!(
                "answers must be a mapping of variable names to values, got: {other}"
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert<K: Into<String>, V: Into<serde_json::Value>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flat context used to render the derived (copier) dialect.
    pub fn derived_context(&self) -> serde_json::Value {
        serde_json::Value::Object(self.0.clone().into_iter().collect())
    }

    /// Context used to render the master (cookiecutter) dialect.
    ///
    /// All answers sit under `cookiecutter`. The composite storage variable
    /// becomes `{selected: {field: value}}`, built from the flat
    /// `{selected}_{field}` answers, or `{selected: selected}` when the
    /// backend has no fields (the `none` sentinel).
    pub fn master_context(&self) -> serde_json::Value {
        let mut namespace: serde_json::Map<String, serde_json::Value> =
            self.0.clone().into_iter().collect();

        if let Some(selected) = self.get_str(COMPOSITE_VARIABLE) {
            let prefix = format!("{selected}_");
            let fields: serde_json::Map<String, serde_json::Value> = self
                .0
                .iter()
                .filter_map(|(key, value)| {
                    key.strip_prefix(&prefix).map(|field| (field.to_string(), value.clone()))
                })
                .collect();
            let backend = if fields.is_empty() {
                serde_json::Value::String(selected.to_string())
            } else {
                serde_json::Value::Object(fields)
            };
            let mut composite = serde_json::Map::new();
            composite.insert(selected.to_string(), backend);
            namespace.insert(COMPOSITE_VARIABLE.to_string(), serde_json::Value::Object(composite));
        }

        let mut context = serde_json::Map::new();
        context.insert(MASTER_NAMESPACE.to_string(), serde_json::Value::Object(namespace));
        serde_json::Value::Object(context)
    }
}

/// Parses answers given as JSON, falling back to YAML. Empty input is an
/// empty answer set.
pub fn parse_answers(content: &str) -> Result<AnswerSet> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(AnswerSet::new());
    }
    let value: serde_json::Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse answers: {e}")))?,
    };
    AnswerSet::from_value(value)
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<AnswerSet> {
    let path = path.as_ref();
    debug!("Loading answers from {}", path.display());
    parse_answers(&std::fs::read_to_string(path)?)
}

pub fn load_from_stdin() -> Result<AnswerSet> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_answers(&buffer)
}

/// Loads preloaded answers from stdin, a file, both (stdin wins on
/// conflicts) or neither.
pub fn get_answers_from(take_from_stdin: bool, answers_file: Option<&Path>) -> Result<AnswerSet> {
    let mut answers = match answers_file {
        Some(path) => load_from_file(path)?,
        None => AnswerSet::new(),
    };
    if take_from_stdin {
        for (key, value) in load_from_stdin()?.0 {
            answers.0.insert(key, value);
        }
    }
    Ok(answers)
}

fn value_as_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Checks a supplied value against the manifest's declared options.
///
/// # Errors
/// * `Error::ValidationError` when a choice value is not one of the options
pub fn validate_answer(key: &str, question: &Question, value: &serde_json::Value) -> Result<()> {
    if let Some(options) = question.option_names() {
        let given = value_as_string(value);
        if !options.contains(&given.as_str()) {
            return Err(Error::ValidationError(format!(
                "'{given}' is not a valid value for '{key}' (expected one of: {})",
                options.join(", ")
            )));
        }
    }
    Ok(())
}

/// Default value for a question; text defaults are rendered against the
/// answers resolved so far.
pub fn get_default(
    question: &Question,
    answers: &AnswerSet,
    renderer: &dyn TemplateRenderer,
) -> Result<serde_json::Value> {
    Ok(match question {
        Question::Text { default } => {
            serde_json::Value::String(renderer.render(default, &answers.master_context())?)
        }
        Question::Flag { default } => serde_json::Value::Bool(*default),
        Question::Choice { options } => {
            serde_json::Value::String(options.first().cloned().unwrap_or_default())
        }
        Question::Composite { options } => {
            serde_json::Value::String(options.keys().next().cloned().unwrap_or_default())
        }
    })
}

fn ask(
    prompter: &dyn Prompter,
    key: &str,
    question: &Question,
    default: serde_json::Value,
) -> Result<serde_json::Value> {
    match question {
        Question::Text { .. } => {
            Ok(serde_json::Value::String(prompter.text(key, &value_as_string(&default))?))
        }
        Question::Flag { .. } => {
            Ok(serde_json::Value::Bool(prompter.confirm(key, default.as_bool().unwrap_or(false))?))
        }
        Question::Choice { .. } | Question::Composite { .. } => {
            let options = question.option_names().unwrap_or_default();
            let default_name = value_as_string(&default);
            let default_index =
                options.iter().position(|o| *o == default_name).unwrap_or(0);
            let selected = prompter.select(key, &options, default_index)?;
            let name = options.get(selected).ok_or_else(|| {
                Error::ValidationError(format!("invalid selection {selected} for '{key}'"))
            })?;
            Ok(serde_json::Value::String(name.to_string()))
        }
    }
}

/// Resolves a full answer set from the manifest.
///
/// Questions are handled in manifest order. A preloaded answer wins; otherwise
/// the user is prompted unless `use_defaults` is set, in which case the
/// default is taken. Selecting a composite backend also fills the flat
/// `{backend}_{field}` variables of every backend that were not preloaded.
/// Preloaded answers for variables the manifest does not declare are kept.
pub fn resolve_answers(
    manifest: &Manifest,
    preloaded: &AnswerSet,
    prompter: &dyn Prompter,
    renderer: &dyn TemplateRenderer,
    use_defaults: bool,
) -> Result<AnswerSet> {
    let mut answers = AnswerSet::new();

    for (key, question) in &manifest.questions {
        let value = match preloaded.get(key) {
            Some(value) => {
                validate_answer(key, question, value)?;
                value.clone()
            }
            None => {
                let default = get_default(question, &answers, renderer)?;
                if use_defaults {
                    default
                } else {
                    ask(prompter, key, question, default)?
                }
            }
        };

        if let Question::Composite { options } = question {
            let selected = value_as_string(&value);
            for (backend, fields) in options {
                for (field, default) in fields {
                    let flat = format!("{backend}_{field}");
                    let flat_value = match preloaded.get(&flat) {
                        Some(v) => v.clone(),
                        None if *backend == selected && !use_defaults => {
                            serde_json::Value::String(prompter.text(&flat, default)?)
                        }
                        None => serde_json::Value::String(default.clone()),
                    };
                    answers.insert(flat, flat_value);
                }
            }
        }

        answers.insert(key.clone(), value);
    }

    for (key, value) in preloaded.iter() {
        if !answers.contains_key(key) {
            debug!("Keeping answer '{key}' not declared in the manifest");
            answers.insert(key.clone(), value.clone());
        }
    }

    Ok(answers)
}
