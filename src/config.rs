//! Answer manifest handling.
//! The manifest (`ccds.json`) declares every template variable together with
//! its default value or the fixed list of values it may take.

use crate::constants::MANIFEST_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};

/// A single manifest entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    /// Free text; the default may itself be a master-dialect expression.
    Text { default: String },
    /// Yes/no value.
    Flag { default: bool },
    /// One of a fixed list of values; the first is the default.
    Choice { options: Vec<String> },
    /// One of a fixed list of backends, each carrying its own sub-field
    /// defaults (e.g. `{"s3": {"bucket": "bucket-name"}}`).
    Composite { options: IndexMap<String, IndexMap<String, String>> },
}

impl Question {
    /// Names of the allowed values, if the question is a choice.
    pub fn option_names(&self) -> Option<Vec<&str>> {
        match self {
            Question::Choice { options } => Some(options.iter().map(String::as_str).collect()),
            Question::Composite { options } => Some(options.keys().map(String::as_str).collect()),
            _ => None,
        }
    }
}

/// Ordered set of questions read from the manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    pub questions: IndexMap<String, Question>,
}

fn scalar_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_composite_option(
    key: &str,
    option: &serde_json::Map<String, serde_json::Value>,
) -> Result<(String, IndexMap<String, String>)> {
    let (name, value) = option.iter().next().ok_or_else(|| {
        Error::ConfigError(format!("'{key}' contains an empty option"))
    })?;
    let fields = match value {
        serde_json::Value::Object(fields) => {
            fields.iter().map(|(field, v)| (field.clone(), scalar_to_string(v))).collect()
        }
        _ => IndexMap::new(),
    };
    Ok((name.clone(), fields))
}

/// Types one raw manifest value.
///
/// # Errors
/// * `Error::ConfigError` for empty lists, lists mixing strings and objects,
///   multi-key options or nested non-scalar defaults
pub fn parse_question(key: &str, value: &serde_json::Value) -> Result<Question> {
    match value {
        serde_json::Value::Bool(default) => Ok(Question::Flag { default: *default }),
        serde_json::Value::String(_) | serde_json::Value::Number(_) | serde_json::Value::Null => {
            Ok(Question::Text { default: scalar_to_string(value) })
        }
        serde_json::Value::Array(items) if items.is_empty() => {
            Err(Error::ConfigError(format!("'{key}' has an empty list of choices")))
        }
        serde_json::Value::Array(items) => {
            if items.iter().all(serde_json::Value::is_object) {
                let mut options = IndexMap::new();
                for item in items {
                    let option = item.as_object().ok_or_else(|| {
                        Error::ConfigError(format!("'{key}' mixes option kinds"))
                    })?;
                    if option.len() != 1 {
                        return Err(Error::ConfigError(format!(
                            "each option of '{key}' must have exactly one key"
                        )));
                    }
                    let (name, fields) = parse_composite_option(key, option)?;
                    options.insert(name, fields);
                }
                Ok(Question::Composite { options })
            } else if items.iter().all(|item| !item.is_object() && !item.is_array()) {
                Ok(Question::Choice { options: items.iter().map(scalar_to_string).collect() })
            } else {
                Err(Error::ConfigError(format!("'{key}' mixes option kinds")))
            }
        }
        serde_json::Value::Object(_) => Err(Error::ConfigError(format!(
            "'{key}' must be a string, a boolean or a list of choices"
        ))),
    }
}

/// Parses manifest content, trying JSON first and YAML second.
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    let raw: IndexMap<String, serde_json::Value> = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid manifest format: {e}")))?,
    };

    let mut questions = IndexMap::new();
    for (key, value) in raw {
        // Cookiecutter's private settings (`_copy_without_render`, `_extensions`, ...)
        if key.starts_with('_') {
            debug!("Skipping private manifest key '{key}'");
            continue;
        }
        let question = parse_question(&key, &value)?;
        questions.insert(key, question);
    }
    Ok(Manifest { questions })
}

/// Finds the first manifest file in `dir`.
///
/// # Errors
/// * `Error::ConfigError` if none of `ccds.json`, `ccds.yml`, `ccds.yaml` exist
pub fn find_manifest<P: AsRef<Path>>(dir: P) -> Result<PathBuf> {
    for file in MANIFEST_FILES {
        let path = dir.as_ref().join(file);
        if path.is_file() {
            return Ok(path);
        }
    }
    Err(Error::ConfigError(format!(
        "No manifest file found (tried: {})",
        MANIFEST_FILES.join(", ")
    )))
}

/// Loads and types a manifest file.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest> {
    let path = path.as_ref();
    debug!("Loading manifest from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_manifest(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_question_kinds() {
        assert_eq!(
            parse_question("name", &json!("project_name")).unwrap(),
            Question::Text { default: "project_name".to_string() }
        );
        assert_eq!(parse_question("flag", &json!(true)).unwrap(), Question::Flag { default: true });
        assert_eq!(
            parse_question("docs", &json!(["mkdocs", "none"])).unwrap(),
            Question::Choice { options: vec!["mkdocs".to_string(), "none".to_string()] }
        );
    }

    #[test]
    fn test_parse_composite_question() {
        let question = parse_question(
            "dataset_storage",
            &json!([
                {"none": "none"},
                {"s3": {"bucket": "bucket-name", "aws_profile": "default"}}
            ]),
        )
        .unwrap();
        let Question::Composite { options } = question else {
            panic!("Expected composite question");
        };
        assert_eq!(options.keys().collect::<Vec<_>>(), ["none", "s3"]);
        assert!(options["none"].is_empty());
        assert_eq!(options["s3"]["aws_profile"], "default");
    }

    #[test]
    fn test_parse_question_errors() {
        assert!(parse_question("x", &json!([])).is_err());
        assert!(parse_question("x", &json!(["a", {"b": 1}])).is_err());
        assert!(parse_question("x", &json!([{"a": 1, "b": 2}])).is_err());
        assert!(parse_question("x", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_parse_manifest_yaml_and_private_keys() {
        let manifest = parse_manifest("project_name: demo\n_extensions: [x]\ndocs: [mkdocs, none]\n").unwrap();
        assert_eq!(manifest.questions.keys().collect::<Vec<_>>(), ["project_name", "docs"]);
    }
}
