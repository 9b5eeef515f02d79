//! STAC CLI - inspect and exercise storage permission trees
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`STAC_*`)
//! 3. Project config (`.stac/config.toml` under `--project`, default cwd)
//! 4. Global config (`~/.stac/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Environment Variables
//!
//! - `STAC_DEBUG`: Enable debug logging (`true`/`false`)
//! - `STAC_TREE_FILE`: Path to the access tree file
//!
//! # Exit Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | allowed / printed |
//! | 1 | access refused, or a config error |
//! | 2 | usage error (clap) |

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use stac_auth::StorageAccessControl;
use stac_runtime::config::{ConfigError, ConfigResolver, LoaderResolver, StacConfig, TreeSource};
use stac_runtime::{build_access_control, MemoryStorage};
use stac_types::ErrorCode;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// STAC CLI - inspect and exercise storage permission trees
#[derive(Parser, Debug)]
#[command(name = "stac")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    project: Option<PathBuf>,

    /// Access tree file, TOML or JSON (overrides config and STAC_TREE_FILE)
    #[arg(long, value_name = "FILE", global = true)]
    tree: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether ID may be opened with all of KINDS
    Check {
        /// Colon-separated storage identifier
        id: String,
        /// Access kind names (BINARY, JSON, TEXT, or configured kinds)
        #[arg(required = true)]
        kinds: Vec<String>,
    },
    /// Print the effective access kinds registered for ID
    Bits {
        /// Colon-separated storage identifier
        id: String,
    },
    /// List known access kinds and their bits
    Kinds,
}

/// CLI-based configuration resolver.
///
/// Resolves file/env config via [`LoaderResolver`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    base: LoaderResolver,
    debug: bool,
    tree: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        let project_root = args.project.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to get current directory, using '.'");
                PathBuf::from(".")
            })
        });

        Self {
            base: LoaderResolver::new(Some(project_root)),
            debug: args.debug,
            tree: args.tree.clone(),
        }
    }

    fn project_root(&self) -> &Path {
        self.base.project_root().unwrap_or(Path::new("."))
    }
}

impl ConfigResolver for CliConfigResolver {
    fn resolve(&self) -> Result<StacConfig, ConfigError> {
        let mut config = self.base.resolve()?;

        // CLI args override (highest priority)
        if self.debug {
            config.debug = true;
        }
        if let Some(ref path) = self.tree {
            config.tree = Some(TreeSource::File(path.clone()));
        }

        Ok(config)
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);

    let config = resolver.resolve().context("Config error")?;

    // Terminal filter: --debug (or config debug) > --verbose > RUST_LOG > "warn"
    let filter = if args.debug || config.debug {
        EnvFilter::new("debug")
    } else if args.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(path = %resolver.project_root().display(), "Project root");

    let control = build_access_control(&config, MemoryStorage::new())
        .context("Failed to build access control")?;

    match args.command {
        Command::Check { id, kinds } => check(&control, &id, &kinds),
        Command::Bits { id } => bits(&control, &id),
        Command::Kinds => {
            print_kinds(&control);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs a full `access` and reports the outcome.
fn check(
    control: &StorageAccessControl<MemoryStorage>,
    id: &str,
    kinds: &[String],
) -> Result<ExitCode> {
    let (requested, unknown) = control.kinds().parse_list(kinds);
    if !unknown.is_empty() {
        bail!("unknown access kind(s): {}", unknown.join(", "));
    }

    match control.access(id, requested) {
        Ok(accessor) => {
            info!(path = %accessor.path(), view = accessor.kind_name(), "Accessor issued");
            println!("allowed");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let label = if e.is_validation() { "denied" } else { "error" };
            println!("{label} [{}]: {e}", e.code());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Prints the effective bits for `id` as kind names.
fn bits(control: &StorageAccessControl<MemoryStorage>, id: &str) -> Result<ExitCode> {
    match control.register_bit(id) {
        Ok(bits) => {
            println!("{}", control.kinds().describe(bits));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("error [{}]: {e}", e.code());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_kinds(control: &StorageAccessControl<MemoryStorage>) {
    for (name, bit) in control.kinds().iter() {
        println!("{name:<12} {:#010x}", bit.bits());
    }
}
