//! Upload pipeline tests: `UploadedFile::move_to` through the default queue

use crate::helpers::*;
use es_http::config::UploadConfig;
use es_http::core::{Error, Result, UploadedFile, UPLOAD_ERR_PARTIAL};
use es_http::factory::{normalize_files, UploadNode};
use es_http::uploading::{
    default_upload_strategy, ErrorCode, ErrorTable, OperationOutcome, StrategyState,
    UploadOptions, UploadStrategy, UploadTarget,
};
use serde_json::json;

/// Test relocation with the default pipeline
#[test]
fn test_default_pipeline_moves_file() {
    let sandbox = UploadSandbox::new();
    let mut file = sandbox.uploaded_file("avatar.png", b"Lorem ipsum dolor sit amet");
    let temp_name = file.temp_name().unwrap().to_path_buf();

    let strategy = file.move_to("avatar.png", Some(sandbox.options())).unwrap();
    assert_succeeded(strategy);
    assert_eq!(strategy.state(), Some(StrategyState::SUCCESS));

    let target = sandbox.upload_dir().join("avatar.png");
    assert_contents(&target, b"Lorem ipsum dolor sit amet");
    assert!(!temp_name.exists());
    assert!(file.is_moved());
}

/// Test default directory and file modes
#[cfg(unix)]
#[test]
fn test_default_permissions() {
    let sandbox = UploadSandbox::new();
    let mut file = sandbox.uploaded_file("report.pdf", b"%PDF-1.7");

    let strategy = file.move_to("report.pdf", Some(sandbox.options())).unwrap();
    assert_succeeded(strategy);
    assert_eq!(mode_of(&sandbox.upload_dir()), 0o700);
    assert_eq!(mode_of(&sandbox.upload_dir().join("report.pdf")), 0o600);
}

/// Test file mode from the upload configuration
#[cfg(unix)]
#[test]
fn test_configured_file_permissions() {
    let sandbox = UploadSandbox::new();
    let config = UploadConfig {
        target_directory: Some(sandbox.upload_dir()),
        file_permissions: 0o640,
        ..UploadConfig::default()
    };
    let mut file = sandbox.uploaded_file("notes.txt", b"notes");

    let strategy = file.move_to("notes.txt", Some(config.to_options())).unwrap();
    assert_succeeded(strategy);
    assert_eq!(mode_of(&sandbox.upload_dir().join("notes.txt")), 0o640);
}

/// Test that the file can only be relocated once
#[test]
fn test_second_move_is_rejected() {
    let sandbox = UploadSandbox::new();
    let mut file = sandbox.uploaded_file("once.txt", b"once");

    assert_succeeded(file.move_to("once.txt", Some(sandbox.options())).unwrap());
    assert!(matches!(
        file.move_to("twice.txt", Some(sandbox.options())),
        Err(Error::AlreadyMoved)
    ));
    assert!(matches!(file.stream(), Err(Error::AlreadyMoved)));
    assert!(!sandbox.upload_dir().join("twice.txt").exists());
}

/// Test that target names cannot leave the upload directory
#[test]
fn test_target_outside_directory_is_rejected() {
    let sandbox = UploadSandbox::new();
    let mut file = sandbox.uploaded_file("escaped.txt", b"escaped");
    let temp_name = file.temp_name().unwrap().to_path_buf();
    let outside = sandbox.root.path().join("escaped.txt");

    assert!(matches!(
        file.move_to(outside.to_str().unwrap(), Some(sandbox.options())),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        file.move_to("../escaped.txt", Some(sandbox.options())),
        Err(Error::InvalidArgument(_))
    ));
    assert!(!outside.exists());
    assert!(temp_name.exists());
    assert!(!file.is_moved());

    assert_succeeded(file.move_to("escaped.txt", Some(sandbox.options())).unwrap());
    assert_contents(&sandbox.upload_dir().join("escaped.txt"), b"escaped");
}

/// Test missing target directory option
#[test]
fn test_missing_target_directory() {
    let sandbox = UploadSandbox::new();
    let mut file = sandbox.uploaded_file("lost.txt", b"lost");
    let temp_name = file.temp_name().unwrap().to_path_buf();

    let strategy = file.move_to("lost.txt", None).unwrap();
    assert_eq!(
        strategy.operation_error(),
        Some(ErrorCode::TARGET_DIR_NOT_SPECIFIED)
    );
    assert_eq!(
        strategy.operation_error_description(),
        Some("The target directory to upload is not specified.")
    );
    let state = strategy.state().unwrap();
    assert!(state.is_failure() && state.is_break());

    // Consumed even though nothing moved
    assert!(file.is_moved());
    assert!(temp_name.exists());
}

/// Test upload reported as partial by the client side
#[test]
fn test_file_with_upload_error() {
    let sandbox = UploadSandbox::new();
    let mut file = UploadedFile::builder()
        .temp_name(sandbox.temp_upload("partial", b"par"))
        .error(UPLOAD_ERR_PARTIAL)
        .build()
        .unwrap();

    let strategy = file.move_to("partial.txt", Some(sandbox.options())).unwrap();
    assert_eq!(
        strategy.operation_error(),
        Some(ErrorCode::UPLOADED_FILE_CONTAINS_ERROR)
    );
    assert!(!sandbox.upload_dir().exists());
}

/// Test temporary file removed before relocation
#[test]
fn test_missing_temporary_file() {
    let sandbox = UploadSandbox::new();
    let mut file = UploadedFile::builder()
        .temp_name(sandbox.root.path().join("vanished"))
        .build()
        .unwrap();

    let strategy = file.move_to("vanished.txt", Some(sandbox.options())).unwrap();
    assert_eq!(
        strategy.operation_error(),
        Some(ErrorCode::MISSING_TEMPORARY_FILE)
    );
    // The directory step ran first
    assert!(sandbox.upload_dir().is_dir());
}

/// Test file without a temporary name
#[test]
fn test_missing_temp_name() {
    let sandbox = UploadSandbox::new();
    let mut file = UploadedFile::builder().client_filename("x").build().unwrap();

    let strategy = file.move_to("x", Some(sandbox.options())).unwrap();
    assert_eq!(
        strategy.operation_error(),
        Some(ErrorCode::UPLOADED_FILE_MISSING_TEMPNAME)
    );
}

/// Test upload directory path occupied by a regular file
#[test]
fn test_target_directory_is_a_file() {
    let sandbox = UploadSandbox::new();
    std::fs::write(sandbox.upload_dir(), b"not a directory").unwrap();
    let mut file = sandbox.uploaded_file("blocked.txt", b"blocked");

    let strategy = file.move_to("blocked.txt", Some(sandbox.options())).unwrap();
    assert_eq!(
        strategy.operation_error(),
        Some(ErrorCode::CREATE_DIRECTORY_FAILED)
    );
}

const EXECUTABLE_REJECTED: ErrorCode = ErrorCode::new("executable-rejected");
const GUARD_ERRORS: ErrorTable = &[(EXECUTABLE_REJECTED, "Executable files are not accepted.")];

/// Strategy refusing client filenames with an `.exe` extension.
#[derive(Debug)]
struct ExecutableGuard {
    options: Option<UploadOptions>,
    outcome: OperationOutcome,
}

impl ExecutableGuard {
    fn new() -> Self {
        Self {
            options: None,
            outcome: OperationOutcome::new(GUARD_ERRORS),
        }
    }
}

impl UploadStrategy for ExecutableGuard {
    fn set_options(&mut self, options: UploadOptions) -> Result<()> {
        self.options = Some(options);
        Ok(())
    }

    fn options(&self) -> Option<&UploadOptions> {
        self.options.as_ref()
    }

    fn invoke(&mut self, file: &UploadedFile, _target: &UploadTarget) -> Result<()> {
        let executable = file
            .client_filename()
            .is_some_and(|name| name.ends_with(".exe"));
        if executable {
            self.outcome.decide_on_failure(EXECUTABLE_REJECTED)
        } else {
            self.outcome.decide_on_success();
            Ok(())
        }
    }

    fn outcome(&self) -> Option<&OperationOutcome> {
        Some(&self.outcome)
    }
}

/// Test custom strategy ahead of the default steps
#[test]
fn test_custom_strategy_breaks_pipeline() {
    let sandbox = UploadSandbox::new();
    let mut queue = default_upload_strategy();
    queue.attach(ExecutableGuard::new(), 300).unwrap();

    let mut file = sandbox.uploaded_file("setup.exe", b"MZ");
    file.set_upload_strategy(queue);

    let strategy = file.move_to("setup.exe", Some(sandbox.options())).unwrap();
    assert_eq!(strategy.operation_error(), Some(EXECUTABLE_REJECTED));
    assert_eq!(
        strategy.operation_error_description(),
        Some("Executable files are not accepted.")
    );
    assert!(!sandbox.upload_dir().exists());
}

/// Test custom strategy letting regular files through
#[test]
fn test_custom_strategy_passes_regular_file() {
    let sandbox = UploadSandbox::new();
    let mut queue = default_upload_strategy();
    queue.attach(ExecutableGuard::new(), 300).unwrap();

    let mut file = sandbox.uploaded_file("photo.jpg", b"JFIF");
    file.set_upload_strategy(queue);

    assert_succeeded(file.move_to("photo.jpg", Some(sandbox.options())).unwrap());
    assert_contents(&sandbox.upload_dir().join("photo.jpg"), b"JFIF");
}

/// Test normalized `$_FILES` data relocated file by file
#[test]
fn test_normalized_files_are_moved() {
    let sandbox = UploadSandbox::new();
    let first = sandbox.temp_upload("phpA", b"first");
    let second = sandbox.temp_upload("phpB", b"second");

    let mut nodes = normalize_files(json!({
        "attachments": {
            "name": ["a.txt", "b.txt"],
            "type": ["text/plain", "text/plain"],
            "tmp_name": [first, second],
            "error": [0, 0],
            "size": [5, 6],
        }
    }))
    .unwrap();

    let (field, node) = nodes.pop().unwrap();
    assert_eq!(field, "attachments");
    let UploadNode::Nested(files) = node else {
        panic!("Expected nested files");
    };

    for (_, mut node) in files {
        let file = node.as_file_mut().unwrap();
        let name = file.client_filename().unwrap().to_string();
        assert_succeeded(file.move_to(name.as_str(), Some(sandbox.options())).unwrap());
    }

    assert_contents(&sandbox.upload_dir().join("a.txt"), b"first");
    assert_contents(&sandbox.upload_dir().join("b.txt"), b"second");
}
