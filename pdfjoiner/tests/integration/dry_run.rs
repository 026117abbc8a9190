//! Integration tests for dry-run validation.

use pdfjoiner::error::JoinerError;
use pdfjoiner::{DocumentType, MergeRequest, SourceFile};
use std::sync::Arc;

use crate::common::{StubConverter, executor_with, scratch, write_file, write_pdf};

#[tokio::test]
async fn test_dry_run_does_not_create_output() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 2, 100);
    let out = dir.path().join("joined.pdf");

    let converter = Arc::new(StubConverter::new(999));
    let executor = executor_with(converter.clone(), dir.path());
    let plan = executor
        .validate(&MergeRequest::new(vec![SourceFile::new(&a)], &out))
        .await
        .unwrap();

    assert_eq!(plan.destination, out);
    assert!(!out.exists(), "Output file should not be created in dry run");
    assert!(converter.converted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dry_run_reports_conversions_and_sizes() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let deck = write_file(dir.path(), "deck.pptx", &[0u8; 2048]);
    let notes = write_file(dir.path(), "notes.doc", &[0u8; 1024]);
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let plan = executor
        .validate(&MergeRequest::new(
            vec![
                SourceFile::new(&a),
                SourceFile::new(&deck),
                SourceFile::new(&notes),
            ],
            &out,
        ))
        .await
        .unwrap();

    let kinds: Vec<DocumentType> = plan
        .summary
        .sources
        .iter()
        .map(|s| s.document_type)
        .collect();
    assert_eq!(
        kinds,
        vec![DocumentType::Pdf, DocumentType::Pptx, DocumentType::Doc]
    );
    assert_eq!(plan.summary.conversions_needed, 2);

    let pdf_size = std::fs::metadata(&a).unwrap().len();
    assert_eq!(plan.summary.total_size, pdf_size + 3072);
}

#[tokio::test]
async fn test_dry_run_validates_all_inputs() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let missing = dir.path().join("missing.pdf");
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let err = executor
        .validate(&MergeRequest::new(
            vec![SourceFile::new(&a), SourceFile::new(&missing)],
            &out,
        ))
        .await
        .unwrap_err();

    match err {
        JoinerError::SourceUnreadable { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_dry_run_plan_serializes_to_json() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let plan = executor
        .validate(&MergeRequest::new(vec![SourceFile::new(&a)], &out))
        .await
        .unwrap();

    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["conversionsNeeded"], 0);
    assert_eq!(json["sources"][0]["documentType"], "pdf");
    assert!(json["destination"].as_str().unwrap().ends_with("joined.pdf"));
}

#[tokio::test]
async fn test_dry_run_rejects_what_the_join_would_reject() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let notes = write_file(dir.path(), "notes.txt", b"plain text");
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let request = MergeRequest::new(vec![SourceFile::new(&a), SourceFile::new(&notes)], &out);

    let planned = executor.validate(&request).await.unwrap_err();
    let joined = executor.run(request).await.unwrap_err();

    for err in [planned, joined] {
        assert!(matches!(
            err,
            JoinerError::ConversionUnsupported {
                kind: DocumentType::Unknown
            }
        ));
    }
    assert!(!out.exists());
}
