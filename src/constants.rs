//! Common constants used throughout the ccds application.

/// Namespace every variable lives under in the master (cookiecutter) dialect.
pub const MASTER_NAMESPACE: &str = "cookiecutter";

/// The composite variable whose per-backend sub-fields are flattened in the derived dialect.
pub const COMPOSITE_VARIABLE: &str = "dataset_storage";

/// Backends of the composite variable recognized in membership conditionals.
pub const COMPOSITE_BACKENDS: [&str; 4] = ["s3", "azure", "gcs", "none"];

/// Backend value meaning "no storage selected".
pub const COMPOSITE_SENTINEL: &str = "none";

/// The only `backend.field` pairs that are flattened to `{backend}_{field}`.
/// Any other nested access falls through to the generic rules and is not
/// flattened correctly.
pub const COMPOSITE_FIELDS: [(&str, &str); 4] = [
    ("s3", "bucket"),
    ("s3", "aws_profile"),
    ("azure", "container"),
    ("gcs", "bucket"),
];

/// Sub-field compared against a literal in `!=` conditionals, with that literal.
pub const COMPOSITE_COMPARISON: (&str, &str, &str) = ("s3", "aws_profile", "default");

/// Derived-only metadata files never present in a regenerated tree.
pub const DEFAULT_SYNC_IGNORE: [&str; 1] = [".copier-answers.yml.jinja"];

/// Number of differences shown when the sync check fails.
pub const DEFAULT_REPORT_LIMIT: usize = 20;

/// Supported answer manifest file names
pub const MANIFEST_FILES: [&str; 3] = ["ccds.json", "ccds.yml", "ccds.yaml"];

/// File name suffix stripped from rendered derived-dialect templates
pub const DERIVED_TEMPLATE_SUFFIX: &str = ".jinja";

/// Delimiters that must not survive rendering.
pub const TEMPLATE_MARKERS: [&str; 4] = ["{{", "}}", "{%", "%}"];
