use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::debug;

use depsweep::check::{check, CheckError, CheckOptions};
use depsweep::config::{load_config, Config, CONFIG_FILE};
use depsweep::files::{expand_manifests, expand_sources};
use depsweep::inventory::SitePackages;
use depsweep::logging;
use depsweep::report::{render, MatchPolicy, OutputFormat, Reconciler};

const DEFAULT_INTERPRETER: &str = "python3";

#[derive(Parser)]
#[command(name = "depsweep")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Find installed Python dependencies that a project never imports", long_about = None)]
struct Cli {
    /// Source files, directories or glob patterns to scan
    #[arg(short, long, num_args = 1.., default_value = ".")]
    filenames: Vec<String>,

    /// Search directories and `**` globs recursively
    #[arg(short, long, default_value_t = true, action = ArgAction::Set)]
    recursive: bool,

    /// Manifests to cross-check (pyproject.toml, requirements.txt, environment.yml)
    #[arg(short, long, num_args = 0..)]
    depfiles: Option<Vec<String>>,

    /// Site-packages directories to scan instead of asking the interpreter
    #[arg(long, num_args = 1..)]
    site_packages: Vec<PathBuf>,

    /// Interpreter used to discover site-packages directories
    #[arg(long)]
    python: Option<String>,

    /// Packages that should never be reported
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Count `import pkg.sub` as a use of `pkg`
    #[arg(long)]
    match_submodules: bool,

    /// Output format (plain, json)
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Configuration file (defaults to ./depsweep.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            let missing = err
                .downcast_ref::<CheckError>()
                .and_then(CheckError::missing_file);
            match missing {
                Some(path) => {
                    println!("No such file: {}", path.display());
                    println!("CLI interrupted!");
                    Ok(ExitCode::FAILURE)
                }
                None => Err(err),
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_cli_config(cli.config.as_deref())?;

    let sources = expand_sources(cli.filenames.as_slice(), cli.recursive)?;
    let manifests = cli
        .depfiles
        .filter(|specs| !specs.is_empty())
        .map(|specs| expand_manifests(specs.as_slice()))
        .transpose()?;

    let site_dirs = if cli.site_packages.is_empty() {
        config.site_packages.clone()
    } else {
        cli.site_packages
    };
    let source = if site_dirs.is_empty() {
        let interpreter = cli
            .python
            .as_deref()
            .or(config.python.as_deref())
            .unwrap_or(DEFAULT_INTERPRETER);
        SitePackages::discover(interpreter)?
    } else {
        SitePackages::new(site_dirs)
    };
    debug!(dirs = ?source.dirs(), "scanning site-packages");

    let policy = if cli.match_submodules || config.match_submodules {
        MatchPolicy::Submodule
    } else {
        MatchPolicy::Exact
    };
    let reconciler = Reconciler::new()
        .with_policy(policy)
        .ignore(config.ignore.iter().chain(cli.ignore.iter()));

    let options = CheckOptions {
        sources,
        manifests,
        reconciler,
    };
    let report = check(&source, &options)?;

    let format = cli.format.or(config.format).unwrap_or_default();
    let mut stdout = io::stdout().lock();
    render(format, &report, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}

/// An explicit `--config` must exist; the default file is optional.
fn load_cli_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path)?
            .with_context(|| format!("Configuration file not found: {}", path.display())),
        None => Ok(load_config(Path::new(CONFIG_FILE))?.unwrap_or_default()),
    }
}
