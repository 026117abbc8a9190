//! Integration tests for error handling and edge cases.

use pdfjoiner::config::{Config, Move, OverwriteMode};
use pdfjoiner::error::JoinerError;
use pdfjoiner::utils::collect_paths_for_patterns;
use pdfjoiner::validation::Validator;
use pdfjoiner::{MergeRequest, SourceFile};
use std::path::PathBuf;
use std::sync::Arc;

use crate::common::{StubConverter, executor_with, scratch, write_file, write_pdf};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let dir = scratch();
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let err = executor
        .run(MergeRequest::new(
            vec![SourceFile::new("/nonexistent/file.pdf")],
            &out,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, JoinerError::SourceUnreadable { .. }));
    assert!(err.is_validation_error());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_error_empty_input_list() {
    let dir = scratch();
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let err = executor
        .run(MergeRequest::new(Vec::new(), &out))
        .await
        .unwrap_err();

    assert!(matches!(err, JoinerError::EmptySourceList));
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_destination_checked_before_sources() {
    let dir = scratch();
    let out = dir.path().join("no-such-dir").join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let err = executor
        .run(MergeRequest::new(Vec::new(), &out))
        .await
        .unwrap_err();

    assert!(matches!(err, JoinerError::DestinationUnwritable { .. }));
}

#[tokio::test]
async fn test_error_corrupt_pdf_leaves_no_output() {
    let dir = scratch();
    let good = write_pdf(dir.path(), "good.pdf", 1, 100);
    let bad = write_file(dir.path(), "bad.pdf", b"%PDF-1.4\nthis is not a pdf");
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let err = executor
        .run(MergeRequest::new(
            vec![SourceFile::new(&good), SourceFile::new(&bad)],
            &out,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, JoinerError::MergeFailed { .. }));
    assert!(!out.exists());

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".pdfjoiner-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_error_output_same_as_input() {
    let mut config = Config::new("a.pdf");
    config.sources = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];

    assert!(matches!(
        config.validate(),
        Err(JoinerError::InvalidConfig { .. })
    ));
}

#[test]
fn test_error_zero_move_position() {
    let mut config = Config::new("out.pdf");
    config.moves = vec![Move::up(0)];

    assert!(config.validate().is_err());
}

#[test]
fn test_no_clobber_refuses_existing_output() {
    let dir = scratch();
    let out = write_pdf(dir.path(), "joined.pdf", 1, 100);

    let err = Validator::new()
        .check_overwrite(&out, OverwriteMode::NoClobber)
        .unwrap_err();
    assert!(matches!(err, JoinerError::OutputExists { .. }));

    assert!(
        Validator::new()
            .check_overwrite(&out, OverwriteMode::Prompt)
            .unwrap()
    );
    assert!(
        !Validator::new()
            .check_overwrite(&out, OverwriteMode::Force)
            .unwrap()
    );
}

#[test]
fn test_missing_literal_paths_survive_expansion() {
    let dir = scratch();
    write_pdf(dir.path(), "b.pdf", 1, 100);
    write_pdf(dir.path(), "a.pdf", 1, 100);
    let missing = dir.path().join("typo.pdf");
    let pattern = dir.path().join("*.pdf");

    let paths = collect_paths_for_patterns([
        missing.to_string_lossy().into_owned(),
        pattern.to_string_lossy().into_owned(),
    ])
    .unwrap();

    assert_eq!(
        paths,
        vec![missing, dir.path().join("a.pdf"), dir.path().join("b.pdf")]
    );
}
