// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use app_controller::Controller;
use parser::Html5Parser;
use store::FsStore;

mod app_config;
mod app_controller;
mod dom;
mod errors;
mod file_utils;
mod latex;
mod parser;
mod snippet;
mod store;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a snippet dump to LaTeX (default command)
    Export(ExportArgs),

    /// Generate shell completions for labtex
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Snippet dump (JSON file) or directory of dumps to export
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for the export job
    #[arg(short, long, default_value = "export")]
    output_dir: PathBuf,

    /// Force overwrite of an existing export
    #[arg(short, long)]
    force_overwrite: bool,

    /// Content store directory holding attached binaries
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Skip the external PDF compile step
    #[arg(long)]
    no_compile: bool,

    /// Skip the archive bundling step
    #[arg(long)]
    no_bundle: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// labtex - lab-notebook snippet export to LaTeX
///
/// Renders rich-text notebook snippets into a compilable LaTeX document,
/// extracts their attached images, and optionally compiles and bundles the
/// result with external tools.
#[derive(Parser, Debug)]
#[command(name = "labtex")]
#[command(version = "0.1.0")]
#[command(about = "Lab-notebook snippet export to LaTeX")]
#[command(long_about = "labtex renders rich-text notebook snippets into a LaTeX document plus
extracted image assets, then optionally runs pdflatex and zips the job
directory.

EXAMPLES:
    labtex notebook.json                       # Export using default config
    labtex -f notebook.json                    # Force overwrite an existing export
    labtex -o /tmp/job notebook.json           # Pick the job directory
    labtex --no-compile notebook.json          # Skip the pdflatex step
    labtex --store-dir ./blobs notebook.json   # Point at the binary store
    labtex ./dumps/                            # Export every dump in a directory
    labtex completions bash > labtex.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config. If no config file exists, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Snippet dump (JSON file) or directory of dumps to export
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for the export job
    #[arg(short, long, default_value = "export")]
    output_dir: PathBuf,

    /// Force overwrite of an existing export
    #[arg(short, long)]
    force_overwrite: bool,

    /// Content store directory holding attached binaries
    #[arg(long)]
    store_dir: Option<PathBuf>,

    /// Skip the external PDF compile step
    #[arg(long)]
    no_compile: bool,

    /// Skip the archive bundling step
    #[arg(long)]
    no_bundle: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and emoji for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "\u{274c} "),
            Level::Warn => ("\x1B[1;33m", "\u{1f6a7} "),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "\u{1f50d} "),
            Level::Trace => ("\x1B[1;35m", "\u{1f4cb} "),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (color, emoji) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "labtex", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Export(args)) => run_export(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let export_args = ExportArgs {
                input_path,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                store_dir: cli.store_dir,
                no_compile: cli.no_compile,
                no_bundle: cli.no_bundle,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_export(export_args).await
        }
    }
}

async fn run_export(options: ExportArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let mut config = load_or_create_config(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(store_dir) = &options.store_dir {
        config.store.root_dir = store_dir.to_string_lossy().to_string();
    }
    if options.no_compile {
        config.export.compile_pdf = false;
    }
    if options.no_bundle {
        config.export.create_bundle = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate()?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Create controller
    let store = Arc::new(FsStore::new(config.store.root_dir.clone()));
    let controller = Controller::new(config, store, Arc::new(Html5Parser::new()))?;

    // Run the controller with the input file(s) and output directory
    if options.input_path.is_file() {
        match controller
            .run(
                options.input_path.clone(),
                options.output_dir.clone(),
                options.force_overwrite,
            )
            .await?
        {
            Some(outcome) => {
                if let Some(pdf) = &outcome.pdf_path {
                    info!("Compiled document: {}", pdf.display());
                }
                if let Some(bundle) = &outcome.bundle_path {
                    info!("Bundle: {}", bundle.display());
                }
            }
            None => info!("Nothing to do."),
        }
        Ok(())
    } else if options.input_path.is_dir() {
        controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await
    } else {
        Err(anyhow!(
            "Input path does not exist: {:?}",
            options.input_path
        ))
    }
}

/// Load the configuration, falling back to the user config directory, and
/// creating a default local file when neither exists
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::from_file(config_path);
    }

    // A per-user config may exist even when the local one does not
    if let Some(user_config) = dirs::config_dir().map(|dir| dir.join("labtex/conf.json")) {
        if user_config.exists() {
            return Config::from_file(user_config);
        }
    }

    warn!(
        "Config file not found at '{}', creating default config.",
        config_path
    );
    let config = Config::default();
    let config_json = serde_json::to_string_pretty(&config)?;
    std::fs::write(config_path, config_json)?;
    Ok(config)
}
