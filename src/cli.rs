//! Command-line interface implementation for ccds.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{DEFAULT_REPORT_LIMIT, DEFAULT_SYNC_IGNORE};
use crate::generate::Dialect;

/// Command-line arguments structure for ccds.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ccds: data-science project scaffolding with cookiecutter/copier template sync",
    long_about = None
)]
pub struct Args {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Regenerate the derived (copier) template from the master (cookiecutter) template
    Build {
        /// Master template directory, e.g. '{{ cookiecutter.repo_name }}'
        #[arg(value_name = "MASTER")]
        master: PathBuf,

        /// Derived template directory; replaced entirely
        #[arg(value_name = "DERIVED")]
        derived: PathBuf,
    },

    /// Fail if the committed derived template differs from a fresh regeneration
    Check {
        /// Master template directory
        #[arg(value_name = "MASTER")]
        master: PathBuf,

        /// Committed derived template directory
        #[arg(value_name = "DERIVED")]
        derived: PathBuf,

        /// File name pattern present only in the derived template (repeatable)
        #[arg(long = "ignore", value_name = "GLOB", default_values_t = DEFAULT_SYNC_IGNORE.map(String::from))]
        ignore: Vec<String>,

        /// Maximum number of differences to show
        #[arg(long, default_value_t = DEFAULT_REPORT_LIMIT)]
        limit: usize,
    },

    /// Generate a project from either template and run the post-generation steps
    Generate {
        /// Template directory whose contents become the project
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Directory where the generated project will be created
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: PathBuf,

        /// Syntax the template is written in
        #[arg(long, value_enum, default_value_t = Dialect::Master)]
        dialect: Dialect,

        /// Answer manifest (defaults to ccds.json next to the template)
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// JSON or YAML file with preloaded answers
        #[arg(long, value_name = "FILE")]
        answers: Option<PathBuf>,

        /// Read answers as JSON from stdin
        #[arg(short, long)]
        stdin: bool,

        /// Use defaults for every answer not supplied instead of prompting
        #[arg(long)]
        defaults: bool,

        /// Force overwrite of existing output directory
        #[arg(short, long)]
        force: bool,

        /// Do not run the post-generation steps
        #[arg(long)]
        skip_hook: bool,
    },

    /// Run the post-generation steps on an already rendered project
    PostGen {
        /// Rendered project directory
        #[arg(value_name = "PROJECT_DIR")]
        project_dir: PathBuf,

        /// JSON or YAML file with the answers
        #[arg(long, value_name = "FILE")]
        answers: Option<PathBuf>,

        /// Read answers as JSON from stdin
        #[arg(short, long)]
        stdin: bool,
    },
}

/// Parses command line arguments and returns the Args structure.
///
/// # Returns
/// * `Args` - Parsed command line arguments
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if matches!(
                e.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
