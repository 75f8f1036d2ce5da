use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

use doclink::config::Config;
use doclink::diagnostics;
use doclink::error::Error;
use doclink::grammar;
use doclink::links::{LinkResolver, display_origin};
use doclink::project::Project;
use doclink::resolver;

/// Exit code for a link or reference that did not resolve.
const EXIT_UNRESOLVED: u8 = 2;

/// Exit code for runtime errors (missing files, malformed input).
const EXIT_ERROR: u8 = 3;

#[derive(Parser)]
#[command(name = "doclink", about = "Resolve declaration references in documentation comments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every link in a project and report the broken ones
    Check {
        /// Config file; defaults to `.doclink.toml` next to the project file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Project JSON file
        #[arg(long)]
        project: PathBuf,
    },
    /// Parse a declaration reference and print it as JSON
    Parse {
        /// Reference text, e.g. `lib!Widget#draw:method`
        text: String,
    },
    /// Resolve one declaration reference from a given entity
    Resolve {
        /// Full name of the entity whose comment holds the reference; empty for the project
        #[arg(long, default_value = "")]
        from: String,
        /// Project JSON file
        #[arg(long)]
        project: PathBuf,
        /// Reference text
        reference: String,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { config, project } => cmd_check(&project, config.as_deref()),
        Commands::Parse { text } => return cmd_parse(&text),
        Commands::Resolve { from, project, reference } => cmd_resolve(&project, &from, &reference),
    };

    return match result {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(EXIT_ERROR)
        },
    };
}

/// Install a stderr subscriber filtered by `RUST_LOG`.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
        .with(EnvFilter::from_default_env())
        .init();
}

/// Parse `text` and print the reference as JSON. Exits 1 when the text is
/// not a reference.
fn cmd_parse(text: &str) -> ExitCode {
    let Some((reference, consumed)) = grammar::parse(text) else {
        diagnostics::print_error(&Error::InvalidReference { text: text.to_string() });
        return ExitCode::FAILURE;
    };

    match serde_json::to_string_pretty(&reference) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            diagnostics::print_error(&Error::Json(e));
            return ExitCode::from(EXIT_ERROR);
        },
    }
    if let Some(rest) = text.get(consumed..).filter(|rest| return !rest.is_empty()) {
        eprintln!("note: `{rest}` after the reference was not parsed");
    }
    return ExitCode::SUCCESS;
}

/// Resolve one reference and print the target's full name.
///
/// # Errors
///
/// Returns errors from project loading, an unknown `--from` entity, or
/// reference text that does not parse.
fn cmd_resolve(project_path: &Path, from: &str, text: &str) -> Result<ExitCode, Error> {
    let project = Project::load(project_path)?;
    let origin = project
        .find_by_full_name(from)
        .ok_or_else(|| return Error::EntityNotFound { name: from.to_string() })?;
    let (reference, _) = grammar::parse(text).ok_or_else(|| return Error::InvalidReference { text: text.to_string() })?;

    let Some(target) = resolver::resolve_declaration_reference(&project, origin, &reference) else {
        println!("UNRESOLVED  {reference}");
        return Ok(ExitCode::from(EXIT_UNRESOLVED));
    };

    let name = project.full_name(target);
    if name.is_empty() {
        println!("{}", project.get(target).map_or("", |e| return e.name.as_str()));
    } else {
        println!("{name}");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Resolve every link in the project and print the broken ones.
///
/// # Errors
///
/// Returns errors from project or config loading.
fn cmd_check(project_path: &Path, config_path: Option<&Path>) -> Result<ExitCode, Error> {
    let project = Project::load(project_path)?;
    let config = match config_path {
        Some(path) => Config::load_file(path)?,
        None => Config::load(project_path.parent().unwrap_or_else(|| return Path::new(".")))?,
    };
    tracing::debug!(entities = project.len(), "checking project links");

    let report = LinkResolver::from_config(&project, &config).resolve_project();
    for link in &report.unresolved {
        println!(
            "BROKEN  {}: {{{} {}}}",
            display_origin(&link.origin_name),
            link.tag,
            link.text.trim()
        );
    }

    let broken = report.unresolved.len();
    if broken > 0 {
        println!("{broken} broken, {} resolved", report.resolved);
        if config.invalid_link_warnings {
            diagnostics::print_unresolved(&report.unresolved);
        }
        return Ok(ExitCode::from(EXIT_UNRESOLVED));
    }

    println!("All {} links resolved", report.resolved);
    return Ok(ExitCode::SUCCESS);
}

