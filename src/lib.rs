//! ccds scaffolds data-science projects from a parameterized template and keeps
//! the cookiecutter (master) and copier (derived) renditions of that template
//! in sync.

/// Parsed answers and the rendering contexts built from them
pub mod answers;

/// Command-line interface module for the ccds application
pub mod cli;

/// Answer manifest handling
/// Supports JSON and YAML formats (ccds.json, ccds.yml, ccds.yaml)
pub mod config;

/// Fixed names shared by the rewriter, the verifier and the hook
pub mod constants;

/// Error types and handling for the ccds application
pub mod error;

/// Concrete project generation from either template dialect
pub mod generate;

/// Post-generation processing of a rendered project
pub mod hooks;

/// Glob patterns for files excluded from comparison
pub mod ignore;

pub mod logger;

/// User input and interaction handling
pub mod prompt;

/// MiniJinja rendering of paths, file contents and defaults
pub mod renderer;

/// Master-to-derived template syntax rewriting
pub mod rewriter;

/// Drift detection between the committed derived template and a fresh build
pub mod sync;

/// Whole-tree rewriting of the master template
pub mod transform;
