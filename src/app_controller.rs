use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

use crate::app_config::Config;
use crate::errors::{CompileError, ExportError, ExportWarning};
use crate::file_utils::FileManager;
use crate::latex::{write_document, Translator};
use crate::parser::{FragmentParser, Html5Parser};
use crate::snippet::Snippet;
use crate::store::{ContentStore, FsStore};

// @module: Export orchestrator driving jobs end to end

/// Everything a finished export job hands back to the caller
#[derive(Debug)]
pub struct ExportOutcome {
    /// Job identifier, also used in the issues log
    pub job_id: Uuid,

    /// Path of the assembled markup file
    pub tex_path: PathBuf,

    /// Full markup text
    pub latex: String,

    /// Compiled document, when the compile step ran and produced one
    pub pdf_path: Option<PathBuf>,

    /// Zipped job directory, when the bundle step ran and produced one
    pub bundle_path: Option<PathBuf>,

    /// Captured output of the external compiler
    pub compiler_output: Option<String>,

    /// Non-fatal conditions collected across the job
    pub warnings: Vec<ExportWarning>,
}

/// Main application controller for snippet export
pub struct Controller {
    // @field: App configuration
    config: Config,
    store: Arc<dyn ContentStore>,
    parser: Arc<dyn FragmentParser>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a controller with the given configuration and the
    // default filesystem store and HTML parser
    pub fn with_config(config: Config) -> Result<Self> {
        let store = Arc::new(FsStore::new(config.store.root_dir.clone()));
        Self::new(config, store, Arc::new(Html5Parser::new()))
    }

    /// Create a controller with explicit store and parser implementations
    pub fn new(
        config: Config,
        store: Arc<dyn ContentStore>,
        parser: Arc<dyn FragmentParser>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            store,
            parser,
        })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        self.config.validate().is_ok()
    }

    /// Run the main workflow: load a snippet dump and export it into
    /// `output_dir`. Returns `None` when an existing export was left alone.
    pub async fn run(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<Option<ExportOutcome>> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let snippets = Snippet::from_json_file(&input_file)?;
        if snippets.is_empty() {
            warn!("Snippet dump is empty: {:?}", input_file);
        }

        // Check if an export already exists
        let tex_path = output_dir.join("export.tex");
        if tex_path.exists() && !force_overwrite {
            warn!("Skipping job, export already exists (use -f to force overwrite)");
            return Ok(None);
        }

        // Progress over top-level snippets
        let progress_bar = ProgressBar::new(snippets.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} snippets ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result);
        progress_bar.set_message("Exporting");

        let pb = progress_bar.clone();
        let outcome = self
            .export_with_progress(&snippets, &output_dir, move |completed| {
                pb.set_position(completed as u64);
            })
            .await?;
        progress_bar.finish_and_clear();

        info!("Success: {}", outcome.tex_path.display());
        if !outcome.warnings.is_empty() {
            info!(
                "Export completed with {} warning(s), see the issues log in the job directory",
                outcome.warnings.len()
            );
        }
        info!(
            "Export completed in {}.",
            Self::format_duration(start_time.elapsed())
        );

        Ok(Some(outcome))
    }

    /// Run the workflow in folder mode, exporting every snippet dump in a
    /// directory. Dumps that already have an export will be skipped.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let dump_files = FileManager::find_files(&input_dir, "json")?;
        if dump_files.is_empty() {
            return Err(anyhow!(
                "No snippet dumps found in directory: {:?}",
                input_dir
            ));
        }

        let mut success_count = 0;
        let mut error_count = 0;
        let mut skip_count = 0;

        for dump_file in dump_files.iter() {
            let file_name = dump_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            // Each dump exports into a sibling directory named after it
            let stem = dump_file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "export".to_string());
            let output_dir = dump_file
                .parent()
                .unwrap_or(Path::new("."))
                .join(format!("{}-export", stem));

            match self
                .run(dump_file.clone(), output_dir, force_overwrite)
                .await
            {
                Ok(Some(_)) => success_count += 1,
                Ok(None) => skip_count += 1,
                Err(e) => {
                    error!("Error exporting {}: {}", file_name, e);
                    error_count += 1;
                }
            }
        }

        info!(
            "Folder export completed: {} exported, {} skipped, {} errors - Duration: {}",
            success_count,
            skip_count,
            error_count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Export a snippet sequence into `output_dir` without progress reporting
    pub async fn export_snippets(
        &self,
        snippets: &[Snippet],
        output_dir: &Path,
    ) -> Result<ExportOutcome, ExportError> {
        self.export_with_progress(snippets, output_dir, |_| {}).await
    }

    /// Export a snippet sequence into `output_dir`, reporting per-snippet
    /// progress through `on_snippet`.
    ///
    /// Directory and markup-write failures are fatal and discard the job
    /// directory. Compile and bundle failures are soft: they land in the
    /// outcome's warning list.
    pub async fn export_with_progress<F>(
        &self,
        snippets: &[Snippet],
        output_dir: &Path,
        on_snippet: F,
    ) -> Result<ExportOutcome, ExportError>
    where
        F: FnMut(usize),
    {
        let job_id = Uuid::new_v4();
        info!("Starting export job {}", job_id);

        let images_dir = output_dir.join("images");
        std::fs::create_dir_all(&images_dir).map_err(|source| ExportError::Directory {
            path: images_dir.clone(),
            source,
        })?;

        // The guard discards the half-written job directory if the walk
        // errors out or the job future is dropped mid-flight
        let mut guard = JobDirGuard::new(output_dir);

        let translator = Translator::new(self.parser.clone(), self.store.clone(), images_dir);
        let mut warnings = Vec::new();
        let tex_path = output_dir.join("export.tex");

        let latex = write_document(
            &tex_path,
            snippets,
            &translator,
            &self.config.export.brand,
            &mut warnings,
            on_snippet,
        )
        .await?;

        // Markup and assets are on disk; from here on failures are soft
        guard.disarm();

        let mut compiler_output = None;
        let mut pdf_path = None;
        if self.config.export.compile_pdf {
            match self.compile_pdf(output_dir).await {
                Ok((output, Some(pdf))) => {
                    compiler_output = Some(output);
                    pdf_path = Some(pdf);
                }
                Ok((output, None)) => {
                    warn!("compiler finished without producing export.pdf");
                    compiler_output = Some(output);
                    warnings.push(ExportWarning::Compile(CompileError::NoOutput));
                }
                Err(err) => {
                    warn!("compile step failed: {}", err);
                    warnings.push(ExportWarning::Compile(err));
                }
            }
        }

        let mut bundle_path = None;
        if self.config.export.create_bundle {
            match self.create_bundle(output_dir).await {
                Ok(path) => bundle_path = Some(path),
                Err(message) => {
                    warn!("bundle step failed: {}", message);
                    warnings.push(ExportWarning::Bundle(message));
                }
            }
        }

        if !warnings.is_empty() {
            if let Err(e) = self.write_issues_log(&warnings, output_dir, &job_id) {
                warn!("Failed to write issues log: {}", e);
            }
        }

        Ok(ExportOutcome {
            job_id,
            tex_path,
            latex,
            pdf_path,
            bundle_path,
            compiler_output,
            warnings,
        })
    }

    /// Run the external compiler in the job directory.
    ///
    /// Returns the captured tool output and the compiled document, if one
    /// appeared. A non-zero exit alone is not an error; a missing document is
    /// reported by the caller as a soft failure.
    async fn compile_pdf(&self, job_dir: &Path) -> Result<(String, Option<PathBuf>), CompileError> {
        let timeout_secs = self.config.export.compile_timeout_secs;

        let compile_future = Command::new(&self.config.export.compiler_command)
            .args(["-interaction=nonstopmode", "./export.tex"])
            .current_dir(job_dir)
            .output();

        let output = tokio::select! {
            result = compile_future => {
                result.map_err(CompileError::Launch)?
            },
            _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
                return Err(CompileError::Timeout(timeout_secs));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let log = if stdout.trim().is_empty() {
            stderr.to_string()
        } else {
            stdout.to_string()
        };

        let pdf = job_dir.join("export.pdf");
        if pdf.exists() {
            Ok((log, Some(pdf)))
        } else {
            Ok((log, None))
        }
    }

    /// Zip the job directory with the external archiver
    async fn create_bundle(&self, job_dir: &Path) -> Result<PathBuf, String> {
        let output = Command::new(&self.config.export.bundler_command)
            .args(["-r", "all.zip", "."])
            .current_dir(job_dir)
            .output()
            .await
            .map_err(|e| format!("failed to launch bundler: {}", e))?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).to_string());
        }

        let bundle = job_dir.join("all.zip");
        if bundle.exists() {
            Ok(bundle)
        } else {
            Err("bundler produced no archive".to_string())
        }
    }

    /// Write accumulated warnings to the job's issues log
    fn write_issues_log(
        &self,
        warnings: &[ExportWarning],
        job_dir: &Path,
        job_id: &Uuid,
    ) -> Result<()> {
        let mut log_content = String::new();
        log_content.push_str(&format!(
            "Export issues - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log_content.push_str(&format!("Job: {}\n\n", job_id));
        for warning in warnings {
            log_content.push_str(&format!("[WARN] {}\n", warning));
        }
        FileManager::write_to_file(job_dir.join("labtex.issues.log"), &log_content)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Discards a job directory that did not complete; disarmed once the markup
/// and assets are safely on disk
struct JobDirGuard {
    path: PathBuf,
    armed: bool,
}

impl JobDirGuard {
    fn new(path: &Path) -> Self {
        JobDirGuard {
            path: path.to_path_buf(),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for JobDirGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Err(err) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "failed to discard partial job directory {:?}: {}",
                    self.path, err
                );
            }
        }
    }
}
