//! ccds main application entry point.
//! Handles command-line argument parsing and dispatches each subcommand to
//! the library.

use std::path::{Path, PathBuf};

use ccds::{
    answers::{get_answers_from, resolve_answers},
    cli::{get_args, Args, Command},
    config::{find_manifest, load_manifest},
    error::{default_error_handler, Result},
    generate::{check_no_unresolved_markers, ensure_output_dir, generate_project, Dialect},
    hooks::run_post_gen,
    ignore::build_ignore_set,
    logger::init_logger,
    prompt::DialoguerPrompter,
    renderer::MiniJinjaRenderer,
    rewriter::Rewriter,
    sync::{check_sync, SyncOptions},
    transform::transform_tree,
};

/// Files a rendered project may legitimately keep template syntax in.
const MARKER_CHECK_IGNORE: [&str; 1] = [".copier-answers.yml"];

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Looks for the manifest next to the template directory first, then inside
/// it.
fn locate_manifest(template: &Path, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match template.parent().map(find_manifest) {
        Some(Ok(path)) => Ok(path),
        _ => find_manifest(template),
    }
}

#[allow(clippy::too_many_arguments)]
fn generate(
    template: PathBuf,
    output_dir: PathBuf,
    dialect: Dialect,
    manifest: Option<PathBuf>,
    answers: Option<PathBuf>,
    stdin: bool,
    defaults: bool,
    force: bool,
    skip_hook: bool,
) -> Result<()> {
    let engine = MiniJinjaRenderer::new();
    let prompt = DialoguerPrompter::new();

    let output_root = ensure_output_dir(&output_dir, force)?;
    let manifest = load_manifest(locate_manifest(&template, manifest)?)?;
    let preloaded = get_answers_from(stdin, answers.as_deref())?;
    let answers = resolve_answers(&manifest, &preloaded, &prompt, &engine, defaults)?;
    log::debug!("Answers: {}", answers.derived_context());

    generate_project(&engine, &template, &output_root, &answers, dialect)?;

    if skip_hook {
        log::info!("Skipping post-generation steps");
    } else {
        run_post_gen(&output_root, &answers)?;
    }

    check_no_unresolved_markers(&output_root, &build_ignore_set(&MARKER_CHECK_IGNORE[..])?)?;
    println!("Project generation completed successfully in {}.", output_root.display());
    Ok(())
}

/// Main application logic execution.
///
/// # Arguments
/// * `args` - Parsed command line arguments
///
/// # Returns
/// * `Result<()>` - Success or error status of the selected subcommand
fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Build { master, derived } => {
            let rewriter = Rewriter::new()?;
            let summary = transform_tree(&rewriter, &master, &derived)?;
            println!(
                "Template build completed: {} transformed, {} copied into {}.",
                summary.transformed,
                summary.copied,
                derived.display()
            );
        }
        Command::Check { master, derived, ignore, limit } => {
            let rewriter = Rewriter::new()?;
            let options = SyncOptions::new(&ignore[..], limit)?;
            let report = check_sync(&rewriter, &master, &derived, &options)?;
            println!("Templates are in sync ({} files compared).", report.compared);
        }
        Command::Generate {
            template,
            output_dir,
            dialect,
            manifest,
            answers,
            stdin,
            defaults,
            force,
            skip_hook,
        } => generate(
            template, output_dir, dialect, manifest, answers, stdin, defaults, force, skip_hook,
        )?,
        Command::PostGen { project_dir, answers, stdin } => {
            let answers = get_answers_from(stdin, answers.as_deref())?;
            let dependencies = run_post_gen(&project_dir, &answers)?;
            println!(
                "Post-generation completed in {} ({} packages).",
                project_dir.display(),
                dependencies.packages().len()
            );
        }
    }
    Ok(())
}
