/*!
 * End-to-end export job tests
 */

use std::sync::Arc;

use labtex::app_config::Config;
use labtex::app_controller::Controller;
use labtex::errors::{CompileError, ExportError, ExportWarning};
use labtex::parser::Html5Parser;
use labtex::snippet::Snippet;

use crate::common;
use crate::common::mock_stores::MockStore;

fn offline_config() -> Config {
    let mut config = Config::default();
    config.export.compile_pdf = false;
    config.export.create_bundle = false;
    config
}

fn controller_with_store(config: Config, store: Arc<MockStore>) -> Controller {
    Controller::new(config, store, Arc::new(Html5Parser::new())).unwrap()
}

/// Test a full job: markup file, extracted asset, ordered blocks, no warnings
#[tokio::test]
async fn test_export_withImageAndComment_shouldProduceMarkupAndAssets() {
    common::init_test_logging();
    let store = Arc::new(MockStore::with_files(&[("f1", b"png-payload")]));
    let controller = controller_with_store(offline_config(), store);
    let temp_dir = common::create_temp_dir().unwrap();
    let job_dir = temp_dir.path().join("job");
    let snippets = Snippet::parse_json(&common::sample_dump_json("f1")).unwrap();

    let outcome = controller.export_snippets(&snippets, &job_dir).await.unwrap();

    assert!(job_dir.join("export.tex").exists());
    assert!(job_dir.join("images/f1.png").exists());
    assert_eq!(
        std::fs::read(job_dir.join("images/f1.png")).unwrap(),
        b"png-payload"
    );
    assert!(outcome.latex.contains("\\section{Scan 12}"));
    assert!(outcome.latex.contains("\\includegraphics[width=0.50\\linewidth]"));
    assert!(outcome.latex.contains("\\colorbox{comment}"));
    assert!(outcome.latex.starts_with("\\documentclass"));
    assert!(outcome.warnings.is_empty());
    assert!(outcome.pdf_path.is_none());
    assert!(outcome.bundle_path.is_none());
    assert!(!job_dir.join("labtex.issues.log").exists());
}

/// Test that one failing asset degrades gracefully and lands in the issues log
#[tokio::test]
async fn test_export_withFailingAsset_shouldWarnAndContinue() {
    let store = Arc::new(MockStore::with_files(&[("f1", b"x")]).failing_for(&["f1"]));
    let controller = controller_with_store(offline_config(), store);
    let temp_dir = common::create_temp_dir().unwrap();
    let job_dir = temp_dir.path().join("job");
    let snippets = Snippet::parse_json(&common::sample_dump_json("f1")).unwrap();

    let outcome = controller.export_snippets(&snippets, &job_dir).await.unwrap();

    assert!(!outcome.latex.contains("\\includegraphics"));
    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(outcome.warnings[0], ExportWarning::Extraction(_)));
    assert!(job_dir.join("export.tex").exists());

    let issues = std::fs::read_to_string(job_dir.join("labtex.issues.log")).unwrap();
    assert!(issues.contains("image skipped"));
}

/// Test that an unknown tag never aborts the job
#[tokio::test]
async fn test_export_withUnknownTag_shouldCompleteWithWarning() {
    let store = Arc::new(MockStore::default());
    let controller = controller_with_store(offline_config(), store);
    let temp_dir = common::create_temp_dir().unwrap();
    let job_dir = temp_dir.path().join("job");
    let snippets =
        Snippet::parse_json(r#"[{"id": "s1", "textcontent": "<custom-widget>zap</custom-widget>"}]"#)
            .unwrap();

    let outcome = controller.export_snippets(&snippets, &job_dir).await.unwrap();

    assert!(outcome.latex.contains("\\begin{verbatim}\r\nzap"));
    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(
        outcome.warnings[0],
        ExportWarning::UnrecognizedTag(ref name) if name == "custom-widget"
    ));
}

/// Test that a blocked directory is fatal before any writes
#[tokio::test]
async fn test_export_withBlockedOutputDir_shouldAbortWithDirectoryError() {
    let store = Arc::new(MockStore::default());
    let controller = controller_with_store(offline_config(), store);
    let temp_dir = common::create_temp_dir().unwrap();
    // A file where the job directory should go
    let job_dir = temp_dir.path().join("job");
    std::fs::write(&job_dir, "in the way").unwrap();

    let result = controller.export_snippets(&[], &job_dir).await;

    assert!(matches!(result, Err(ExportError::Directory { .. })));
    // Nothing was deleted or replaced
    assert!(job_dir.is_file());
}

/// Test that a markup write failure aborts and discards the job directory
#[tokio::test]
async fn test_export_withBlockedMarkupFile_shouldAbortAndDiscardJobDir() {
    let store = Arc::new(MockStore::default());
    let controller = controller_with_store(offline_config(), store);
    let temp_dir = common::create_temp_dir().unwrap();
    let job_dir = temp_dir.path().join("job");
    // A directory squatting on the markup file path makes the create fail
    std::fs::create_dir_all(job_dir.join("export.tex")).unwrap();

    let result = controller.export_snippets(&[], &job_dir).await;

    assert!(matches!(result, Err(ExportError::Stream { .. })));
    assert!(!job_dir.exists());
}

/// Test that a compiler producing no document is a soft failure
#[tokio::test]
#[cfg(unix)]
async fn test_export_withCompilerProducingNoOutput_shouldWarnAndReturnMarkup() {
    let mut config = Config::default();
    // "true" exits cleanly without writing anything
    config.export.compiler_command = "true".to_string();
    config.export.bundler_command = "true".to_string();
    let store = Arc::new(MockStore::default());
    let controller = controller_with_store(config, store);
    let temp_dir = common::create_temp_dir().unwrap();
    let job_dir = temp_dir.path().join("job");
    let snippets = Snippet::parse_json(r#"[{"id": "s1", "textcontent": "<p>t</p>"}]"#).unwrap();

    let outcome = controller.export_snippets(&snippets, &job_dir).await.unwrap();

    assert!(outcome.latex.contains("t\\\\"));
    assert!(outcome.pdf_path.is_none());
    assert!(outcome.bundle_path.is_none());
    assert!(outcome
        .warnings
        .iter()
        .any(|w| matches!(w, ExportWarning::Compile(CompileError::NoOutput))));
    assert!(outcome
        .warnings
        .iter()
        .any(|w| matches!(w, ExportWarning::Bundle(_))));
    // The job directory survives soft failures
    assert!(job_dir.join("export.tex").exists());
}

/// Test that a hanging compiler hits the external timeout
#[tokio::test]
#[cfg(unix)]
async fn test_export_withHangingCompiler_shouldTimeOut() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = common::create_temp_dir().unwrap();
    let slow_compiler = temp_dir.path().join("slow-compiler.sh");
    std::fs::write(&slow_compiler, "#!/bin/sh\nsleep 30\n").unwrap();
    std::fs::set_permissions(&slow_compiler, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = Config::default();
    config.export.compiler_command = slow_compiler.to_string_lossy().to_string();
    config.export.create_bundle = false;
    config.export.compile_timeout_secs = 1;
    let store = Arc::new(MockStore::default());
    let controller = controller_with_store(config, store);
    let job_dir = temp_dir.path().join("job");
    let snippets = Snippet::parse_json(r#"[{"id": "s1", "textcontent": "<p>t</p>"}]"#).unwrap();

    let outcome = controller.export_snippets(&snippets, &job_dir).await.unwrap();

    assert!(outcome
        .warnings
        .iter()
        .any(|w| matches!(w, ExportWarning::Compile(CompileError::Timeout(1)))));
    assert!(job_dir.join("export.tex").exists());
}
