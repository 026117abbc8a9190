//! Integration tests for joining Office documents through a converter.

use pdfjoiner::convert::{ConversionDispatcher, OfficeConverter};
use pdfjoiner::error::JoinerError;
use pdfjoiner::merge::LopdfMerger;
use pdfjoiner::{DocumentType, MergeExecutor, MergeRequest, SourceFile};
use std::sync::Arc;

use crate::common::{StubConverter, executor_with, page_widths, scratch, write_file, write_pdf};

#[tokio::test]
async fn test_mixed_sources_keep_list_order() {
    let dir = scratch();
    let temp = scratch();
    let cover = write_pdf(dir.path(), "cover.pdf", 1, 100);
    let report = write_file(dir.path(), "report.docx", b"word");
    let slides = write_file(dir.path(), "slides.pptx", b"powerpoint");
    let appendix = write_pdf(dir.path(), "appendix.pdf", 2, 300);
    let out = dir.path().join("bundle.pdf");

    let converter = Arc::new(StubConverter::new(700));
    let executor = executor_with(converter.clone(), temp.path());

    let result = executor
        .run(MergeRequest::new(
            vec![
                SourceFile::new(&cover),
                SourceFile::new(&report),
                SourceFile::new(&slides),
                SourceFile::new(&appendix),
            ],
            &out,
        ))
        .await
        .unwrap();

    assert_eq!(result.files_merged, 4);
    assert_eq!(result.files_converted, 2);
    assert_eq!(page_widths(&out), vec![100, 700, 700, 300, 300]);
    assert_eq!(
        converter.converted.lock().unwrap().as_slice(),
        &[report, slides]
    );
}

#[tokio::test]
async fn test_temporary_pdfs_are_removed_after_success() {
    let dir = scratch();
    let temp = scratch();
    let deck = write_file(dir.path(), "deck.ppt", b"legacy deck");
    let out = dir.path().join("joined.pdf");

    let converter = Arc::new(StubConverter::new(640));
    let executor = executor_with(converter.clone(), temp.path());
    executor
        .run(MergeRequest::new(vec![SourceFile::new(&deck)], &out))
        .await
        .unwrap();

    let targets = converter.targets.lock().unwrap().clone();
    assert_eq!(targets.len(), 1);
    assert!(targets[0].starts_with(temp.path()));
    assert!(!targets[0].exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_temporary_pdfs_are_removed_after_failure() {
    let dir = scratch();
    let temp = scratch();
    let letter = write_file(dir.path(), "letter.doc", b"legacy letter");
    let broken = write_file(dir.path(), "broken.pdf", b"%PDF-1.4 truncated");
    let out = dir.path().join("joined.pdf");

    let converter = Arc::new(StubConverter::new(640));
    let executor = executor_with(converter.clone(), temp.path());
    let err = executor
        .run(MergeRequest::new(
            vec![SourceFile::new(&letter), SourceFile::new(&broken)],
            &out,
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, JoinerError::MergeFailed { .. }));
    assert_eq!(converter.converted.lock().unwrap().len(), 1);
    assert!(!out.exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_unconvertible_source_rejected_before_converting() {
    let dir = scratch();
    let temp = scratch();
    let letter = write_file(dir.path(), "letter.doc", b"legacy letter");
    let essay = write_file(dir.path(), "essay.odt", b"open document");
    let out = dir.path().join("joined.pdf");

    let converter = Arc::new(StubConverter::new(640));
    let executor = executor_with(converter.clone(), temp.path());
    let err = executor
        .run(MergeRequest::new(
            vec![SourceFile::new(&letter), SourceFile::new(&essay)],
            &out,
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JoinerError::ConversionUnsupported {
            kind: DocumentType::Odt
        }
    ));
    assert!(converter.converted.lock().unwrap().is_empty());
    assert!(!out.exists());
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_office_conversion_needs_windows() {
    let dir = scratch();
    let temp = scratch();
    let report = write_file(dir.path(), "report.docx", b"word");
    let out = dir.path().join("joined.pdf");

    let dispatcher =
        ConversionDispatcher::new(Arc::new(OfficeConverter::new())).with_temp_dir(temp.path());
    let executor = MergeExecutor::new(dispatcher, Arc::new(LopdfMerger::new()));

    let err = executor
        .run(MergeRequest::new(vec![SourceFile::new(&report)], &out))
        .await
        .unwrap_err();

    assert!(matches!(err, JoinerError::ConversionFailed { .. }));
    assert!(!out.exists());
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}
