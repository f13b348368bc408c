mod common;

use std::cell::RefCell;

use ccds::answers::{get_answers_from, parse_answers, resolve_answers, AnswerSet};
use ccds::config::{find_manifest, load_manifest, parse_manifest, Question};
use ccds::error::{Error, Result};
use ccds::prompt::Prompter;
use ccds::renderer::MiniJinjaRenderer;
use common::write;
use serde_json::json;
use tempfile::TempDir;

const MANIFEST: &str = r#"{
    "project_name": "project_name",
    "repo_name": "{{ cookiecutter.project_name.lower().replace(' ', '_') }}",
    "module_name": "{{ cookiecutter.project_name.lower().replace(' ', '_').replace('-', '_') }}",
    "python_version_number": "3.10",
    "dataset_storage": [
        {"none": "none"},
        {"azure": {"container": "container-name"}},
        {"s3": {"bucket": "bucket-name", "aws_profile": "default"}},
        {"gcs": {"bucket": "bucket-name"}}
    ],
    "environment_manager": ["virtualenv", "conda", "pipenv", "uv", "none"],
    "docs": ["mkdocs", "none"],
    "include_code_scaffold": ["Yes", "No"],
    "use_git": true,
    "_copy_without_render": ["*.png"]
}"#;

/// Scripted answers; records the keys it was asked about.
#[derive(Default)]
struct ScriptedPrompter {
    text: Vec<(&'static str, &'static str)>,
    select: Vec<(&'static str, usize)>,
    asked: RefCell<Vec<String>>,
}

impl Prompter for ScriptedPrompter {
    fn text(&self, key: &str, default: &str) -> Result<String> {
        self.asked.borrow_mut().push(key.to_string());
        Ok(self
            .text
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| default.to_string()))
    }

    fn select(&self, key: &str, _options: &[&str], default: usize) -> Result<usize> {
        self.asked.borrow_mut().push(key.to_string());
        Ok(self.select.iter().find(|(k, _)| *k == key).map(|(_, i)| *i).unwrap_or(default))
    }

    fn confirm(&self, key: &str, default: bool) -> Result<bool> {
        self.asked.borrow_mut().push(key.to_string());
        Ok(default)
    }
}

#[test]
fn test_manifest_question_kinds() {
    let manifest = parse_manifest(MANIFEST).unwrap();

    let keys: Vec<&str> = manifest.questions.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "project_name",
            "repo_name",
            "module_name",
            "python_version_number",
            "dataset_storage",
            "environment_manager",
            "docs",
            "include_code_scaffold",
            "use_git"
        ]
    );
    assert_eq!(manifest.questions["use_git"], Question::Flag { default: true });
    match &manifest.questions["dataset_storage"] {
        Question::Composite { options } => {
            assert_eq!(options.keys().collect::<Vec<_>>(), ["none", "azure", "s3", "gcs"]);
            assert!(options["none"].is_empty());
            assert_eq!(options["s3"]["aws_profile"], "default");
        }
        other => panic!("Expected composite question, got {other:?}"),
    }
}

#[test]
fn test_yaml_manifest_is_found() {
    let dir = TempDir::new().unwrap();
    write(dir.path().join("ccds.yaml"), "project_name: demo\ndocs:\n  - mkdocs\n  - none\n");

    let path = find_manifest(dir.path()).unwrap();
    assert!(path.ends_with("ccds.yaml"));
    let manifest = load_manifest(path).unwrap();
    assert_eq!(
        manifest.questions["docs"],
        Question::Choice { options: vec!["mkdocs".to_string(), "none".to_string()] }
    );
}

#[test]
fn test_missing_manifest() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(find_manifest(dir.path()), Err(Error::ConfigError(_))));
}

#[test]
fn test_defaults_render_against_earlier_answers() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let preloaded = AnswerSet::from_value(json!({"project_name": "My Data-Project"})).unwrap();

    let answers = resolve_answers(
        &manifest,
        &preloaded,
        &ScriptedPrompter::default(),
        &MiniJinjaRenderer::new(),
        true,
    )
    .unwrap();

    assert_eq!(answers.get_str("repo_name"), Some("my_data-project"));
    assert_eq!(answers.get_str("module_name"), Some("my_data_project"));
    assert_eq!(answers.get_str("dataset_storage"), Some("none"));
    assert_eq!(answers.get_str("s3_bucket"), Some("bucket-name"));
    assert_eq!(answers.get_str("azure_container"), Some("container-name"));
    assert_eq!(answers.get("use_git"), Some(&json!(true)));
}

#[test]
fn test_prompted_composite_asks_selected_fields() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let prompter = ScriptedPrompter {
        text: vec![("project_name", "demo"), ("s3_bucket", "my-bucket")],
        select: vec![("dataset_storage", 2)],
        ..Default::default()
    };

    let answers = resolve_answers(
        &manifest,
        &AnswerSet::new(),
        &prompter,
        &MiniJinjaRenderer::new(),
        false,
    )
    .unwrap();

    assert_eq!(answers.get_str("dataset_storage"), Some("s3"));
    assert_eq!(answers.get_str("s3_bucket"), Some("my-bucket"));
    assert_eq!(answers.get_str("s3_aws_profile"), Some("default"));
    assert_eq!(answers.get_str("gcs_bucket"), Some("bucket-name"));
    let asked = prompter.asked.borrow();
    assert!(asked.contains(&"s3_aws_profile".to_string()));
    assert!(!asked.contains(&"gcs_bucket".to_string()));
    assert_eq!(
        answers.master_context()["cookiecutter"]["dataset_storage"],
        json!({"s3": {"bucket": "my-bucket", "aws_profile": "default"}})
    );
}

#[test]
fn test_invalid_choice_is_rejected() {
    let manifest = parse_manifest(MANIFEST).unwrap();
    let preloaded = AnswerSet::from_value(json!({"docs": "sphinx"})).unwrap();

    let result = resolve_answers(
        &manifest,
        &preloaded,
        &ScriptedPrompter::default(),
        &MiniJinjaRenderer::new(),
        true,
    );

    match result {
        Err(Error::ValidationError(message)) => assert!(message.contains("'sphinx'")),
        other => panic!("Expected ValidationError, got {other:?}"),
    }
}

#[test]
fn test_undeclared_answers_are_kept() {
    let manifest = parse_manifest(r#"{"project_name": "demo"}"#).unwrap();
    let preloaded = parse_answers("custom_config: ./overlay\n").unwrap();

    let answers = resolve_answers(
        &manifest,
        &preloaded,
        &ScriptedPrompter::default(),
        &MiniJinjaRenderer::new(),
        true,
    )
    .unwrap();

    assert_eq!(answers.len(), 2);
    assert_eq!(answers.get_str("custom_config"), Some("./overlay"));
}

#[test]
fn test_answers_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("answers.json");
    write(&path, r#"{"module_name": "demo", "docs": "none"}"#);

    let answers = get_answers_from(false, Some(path.as_path())).unwrap();
    assert_eq!(answers.get_str("module_name"), Some("demo"));
    assert!(get_answers_from(false, None).unwrap().is_empty());
}
