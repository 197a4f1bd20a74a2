//! CLI argument parsing and command dispatch

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use recipe_prepare::defaults;

use crate::commands;

/// Recipe Prepare - Assemble and resolve migration recipes for a project
#[derive(Parser, Debug)]
#[command(name = "recipe-prepare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Project directory that relative paths are resolved against.
    ///
    /// Defaults to the current directory.
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "RECIPE_PREPARE_PROJECT_DIR"
    )]
    project_dir: Option<PathBuf>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,

    /// Print the run summary as JSON on stdout
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge the recipe files matching a project into one recipe file
    Prepare(commands::prepare::PrepareArgs),

    /// Substitute placeholders in a generated recipe file
    Resolve(commands::resolve::ResolveArgs),

    /// Check a merge rule table without merging anything
    Validate(commands::validate::ValidateArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub project_dir: PathBuf,
    pub json: bool,
}

impl Context {
    /// Resolve `path` against the project directory unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let context = Context {
            project_dir: self
                .project_dir
                .unwrap_or_else(defaults::default_project_dir),
            json: self.json,
        };

        match self.command {
            Commands::Prepare(args) => commands::prepare::execute(args, &context),
            Commands::Resolve(args) => commands::resolve::execute(args, &context),
            Commands::Validate(args) => commands::validate::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Log to stderr at `level`, unless `RUST_LOG` says otherwise.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness.
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .target(env_logger::Target::Stderr)
        .try_init();
}
