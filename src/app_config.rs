use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Export job settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Content store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export: ExportConfig::default(),
            store: StoreConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .map_err(|e| anyhow!("Failed to open config file {:?}: {}", path.as_ref(), e))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .map_err(|e| anyhow!("Failed to parse config file {:?}: {}", path.as_ref(), e))?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.export.compiler_command.trim().is_empty() {
            return Err(anyhow!("Compiler command must not be empty"));
        }
        if self.export.bundler_command.trim().is_empty() {
            return Err(anyhow!("Bundler command must not be empty"));
        }
        if self.export.compile_timeout_secs == 0 {
            return Err(anyhow!("Compile timeout must be greater than zero"));
        }
        if self.export.brand.trim().is_empty() {
            return Err(anyhow!("Document brand must not be empty"));
        }
        Ok(())
    }
}

/// Export job configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExportConfig {
    // @field: Run the external PDF compiler after assembly
    #[serde(default = "default_true")]
    pub compile_pdf: bool,

    // @field: Zip the job directory after assembly
    #[serde(default = "default_true")]
    pub create_bundle: bool,

    // @field: Compiler executable
    #[serde(default = "default_compiler_command")]
    pub compiler_command: String,

    // @field: Archiver executable
    #[serde(default = "default_bundler_command")]
    pub bundler_command: String,

    // @field: Deadline for the compile step, seconds
    #[serde(default = "default_compile_timeout_secs")]
    pub compile_timeout_secs: u64,

    // @field: Brand shown in the document page header
    #[serde(default = "default_brand")]
    pub brand: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            compile_pdf: true,
            create_bundle: true,
            compiler_command: default_compiler_command(),
            bundler_command: default_bundler_command(),
            compile_timeout_secs: default_compile_timeout_secs(),
            brand: default_brand(),
        }
    }
}

/// Content store configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// Directory holding attached binaries addressed by file id
    #[serde(default = "default_store_root")]
    pub root_dir: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root_dir: default_store_root(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_compiler_command() -> String {
    "pdflatex".to_string()
}

fn default_bundler_command() -> String {
    "zip".to_string()
}

fn default_compile_timeout_secs() -> u64 {
    120 // pdflatex on a large image-heavy document can take a while
}

fn default_brand() -> String {
    "LABTEX".to_string()
}

fn default_store_root() -> String {
    "./files".to_string()
}
