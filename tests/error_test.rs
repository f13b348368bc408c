use ccds::error::Error;
use std::io;
use std::path::PathBuf;

#[test]
fn test_io_error_conversion() {
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    assert!(matches!(error, Error::IoError(_)));
    assert_eq!(error.to_string(), "IO error: file not found");
}

#[test]
fn test_error_display() {
    let error = Error::TemplateError("bad template".to_string());
    assert_eq!(error.to_string(), "Template error: bad template");

    let error = Error::ConfigError("missing key".to_string());
    assert_eq!(error.to_string(), "Configuration error: missing key");

    let error = Error::TemplateDoesNotExistsError { template_dir: "/nope".to_string() };
    assert_eq!(error.to_string(), "Template directory does not exist: '/nope'");
}

#[test]
fn test_python_version_error_message() {
    let error = Error::PythonVersionError { version: "3".to_string() };
    assert_eq!(
        error.to_string(),
        "Invalid Python version specifier 3. Please specify version as <major>.<minor> or \
         <major>.<minor>.<patch>, e.g., 3.10, 3.10.1, etc."
    );
}

#[test]
fn test_unresolved_markers_lists_files() {
    let error = Error::UnresolvedMarkersError {
        files: vec![PathBuf::from("README.md"), PathBuf::from("docs/index.md")],
    };
    assert_eq!(
        error.to_string(),
        "Unresolved template markers left in: README.md, docs/index.md"
    );
}

#[test]
fn test_drift_detected_includes_summary() {
    let error = Error::DriftDetected {
        count: 1,
        summary: "Content differs: Makefile".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("(1 differences)"));
    assert!(message.ends_with("Content differs: Makefile"));
}
