//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const PNG_BYTES: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0xff];

pub fn write<P: AsRef<Path>>(path: P, content: impl AsRef<[u8]>) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A small master template: storage conditionals, a renamed package
/// directory, a binary file and an empty placeholder.
pub fn master_template(root: &Path) {
    write(
        root.join("Makefile"),
        "PROJECT_NAME = {{ cookiecutter.repo_name }}\n\
         {% if cookiecutter.dataset_storage.s3 %}\
         BUCKET = s3://{{ cookiecutter.dataset_storage.s3.bucket }}\n\
         {% elif cookiecutter.dataset_storage.gcs %}\
         BUCKET = gs://{{ cookiecutter.dataset_storage.gcs.bucket }}\n\
         {% endif %}",
    );
    write(
        root.join("{{ cookiecutter.module_name }}/__init__.py"),
        "from {{ cookiecutter.module_name }} import config  # noqa: F401\n",
    );
    write(
        root.join("README.md"),
        "# {{ cookiecutter.project_name }}\n\n{{ cookiecutter.description }}\n",
    );
    write(root.join("reports/figures/logo.png"), PNG_BYTES);
    write(root.join("data/raw/.gitkeep"), "");
}

/// Answers for [`master_template`] plus everything the post-generation
/// steps read.
pub fn answers_json() -> serde_json::Value {
    serde_json::json!({
        "project_name": "Demo Project",
        "repo_name": "demo-project",
        "module_name": "demo_project",
        "description": "A short description.",
        "python_version_number": "3.10",
        "dataset_storage": "s3",
        "s3_bucket": "demo-bucket",
        "s3_aws_profile": "default",
        "azure_container": "container-name",
        "gcs_bucket": "bucket-name",
        "environment_manager": "virtualenv",
        "dependency_file": "requirements.txt",
        "pydata_packages": "basic",
        "linting_and_formatting": "ruff",
        "testing_framework": "pytest",
        "docs": "mkdocs",
        "open_source_license": "MIT",
        "include_code_scaffold": "Yes",
        "custom_config": ""
    })
}

/// The skeleton of a rendered project, before post-generation.
pub fn rendered_project(root: &Path) {
    write(
        root.join("pyproject.toml"),
        "[project]\n\
         name = \"demo_project\"\n\
         version = \"0.0.1\"\n\
         description = \"It\\u0027s a demo\"\n\
         requires-python = \"~=3.10\"\n\
         dependencies = [\"requests\"]\n",
    );
    write(root.join("setup.cfg"), "[flake8]\nmax-line-length = 99\n");
    write(root.join("environment.yml"), "name: demo\n");
    write(root.join("requirements-dev.txt"), "-r requirements.txt\n");
    write(root.join("LICENSE"), "MIT License\n");
    write(root.join("tests/pytest/test_data.py"), "def test_code_is_tested():\n    assert False\n");
    write(root.join("tests/unittest/test_data.py"), "import unittest\n");
    write(root.join("docs/mkdocs/mkdocs.yml"), "site_name: demo\n");
    write(root.join("docs/mkdocs/docs/index.md"), "# demo\n");
    write(root.join("docs/mkdocs/README.md"), "Docs\n");
    write(root.join("docs/sphinx/conf.py"), "project = 'demo'\n");
    write(root.join("demo_project/__init__.py"), "from demo_project import config  # noqa: F401\n");
    write(root.join("demo_project/config.py"), "DATA_DIR = 'data'\n");
    write(root.join("demo_project/modeling/train.py"), "def main():\n    pass\n");
}
