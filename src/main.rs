//! sailbuild command-line interface
//!
//! Builds the saildb native extension with Bazel and stages it into the
//! Python package tree.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    // Show backtrace if enabled
    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "sailbuild")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and stage the saildb native extension", long_about = None)]
pub(crate) struct Cli {
    /// Project root containing sailbuild.toml and the package sources
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Use this config file instead of searching for one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print debug logging to stderr
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress progress output
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Show a backtrace when a command fails
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the package version declared in __init__.py
    Version {
        /// Package to read (defaults to the configured package name)
        #[arg(long)]
        package: Option<String>,
    },

    /// Print package metadata
    Metadata {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build native extensions and copy them into the package tree
    BuildExt {
        /// Compile with debug information (--compilation_mode=dbg)
        #[arg(long, short = 'g')]
        debug: bool,

        /// Extra linker search directory (repeatable)
        #[arg(long = "library-dir", short = 'L')]
        library_dirs: Vec<PathBuf>,

        /// Staging directory for build tool output
        #[arg(long)]
        build_temp: Option<PathBuf>,

        /// Root of the installable package tree
        #[arg(long)]
        package_root: Option<PathBuf>,

        /// Extension target to build (repeatable, replaces configured targets)
        #[arg(long = "target", short = 't')]
        targets: Vec<String>,

        /// Build tool executable
        #[arg(long)]
        tool: Option<String>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    sailbuild::init_debug(cli.verbose);
    let backtrace = cli.backtrace;

    let result = match cli.command {
        Commands::Version { package } => {
            commands::version::run(&cli.project, cli.config.as_deref(), package.as_deref())
        }
        Commands::Metadata { json } => {
            commands::metadata::run(&cli.project, cli.config.as_deref(), json)
        }
        Commands::BuildExt {
            debug,
            library_dirs,
            build_temp,
            package_root,
            targets,
            tool,
        } => {
            let overrides = sailbuild::CliOverrides {
                debug,
                tool,
                build_temp,
                package_root,
                library_dirs,
                targets,
            };
            commands::build_ext::run(&cli.project, cli.config.as_deref(), &overrides, cli.quiet)
        }
        Commands::Completion { shell } => commands::completion::run(shell),
    };

    if let Err(e) = result {
        display_error(&e, backtrace);
        process::exit(1);
    }
}

mod commands;
