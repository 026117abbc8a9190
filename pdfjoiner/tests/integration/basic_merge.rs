//! Integration tests for joining PDFs end to end.

use pdfjoiner::config::CompressionLevel;
use pdfjoiner::merge::{LopdfMerger, MergeOptions, PdfMerger};
use pdfjoiner::{ExecutorState, MergeRequest, SourceFile};
use rstest::rstest;
use std::sync::Arc;

use crate::common::{StubConverter, executor_with, page_widths, scratch, write_pdf};

#[tokio::test]
async fn test_join_three_pdfs_in_list_order() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 2, 300);
    let b = write_pdf(dir.path(), "b.pdf", 1, 400);
    let c = write_pdf(dir.path(), "c.pdf", 3, 500);
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let report = executor
        .run(MergeRequest::new(
            vec![SourceFile::new(&c), SourceFile::new(&a), SourceFile::new(&b)],
            &out,
        ))
        .await
        .unwrap();

    assert_eq!(report.files_merged, 3);
    assert_eq!(report.total_pages, 6);
    assert_eq!(report.destination, out);
    assert!(report.output_size > 0);
    assert_eq!(
        page_widths(&out),
        vec![500, 500, 500, 300, 300, 400]
    );
    assert_eq!(executor.state(), ExecutorState::Idle);
}

#[tokio::test]
async fn test_join_single_pdf() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "only.pdf", 4, 320);
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    let report = executor
        .run(MergeRequest::new(vec![SourceFile::new(&a)], &out))
        .await
        .unwrap();

    assert_eq!(report.total_pages, 4);
    assert_eq!(page_widths(&out), vec![320; 4]);
}

#[tokio::test]
async fn test_same_file_listed_twice_appears_twice() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 210);
    let b = write_pdf(dir.path(), "b.pdf", 1, 420);
    let out = dir.path().join("joined.pdf");

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    executor
        .run(MergeRequest::new(
            vec![SourceFile::new(&a), SourceFile::new(&b), SourceFile::new(&a)],
            &out,
        ))
        .await
        .unwrap();

    assert_eq!(page_widths(&out), vec![210, 420, 210]);
}

#[tokio::test]
async fn test_existing_destination_is_replaced() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 111);
    let out = write_pdf(dir.path(), "joined.pdf", 5, 999);

    let executor = executor_with(Arc::new(StubConverter::new(999)), dir.path());
    executor
        .run(MergeRequest::new(vec![SourceFile::new(&a)], &out))
        .await
        .unwrap();

    assert_eq!(page_widths(&out), vec![111]);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
fn test_merge_engine_honours_compression(#[case] compression: CompressionLevel) {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 2, 250);
    let b = write_pdf(dir.path(), "b.pdf", 2, 350);
    let out = dir.path().join("joined.pdf");

    let stats = LopdfMerger::new()
        .merge(&[a, b], &out, &MergeOptions { compression })
        .unwrap();

    assert_eq!(stats.files_merged, 2);
    assert_eq!(stats.total_pages, 4);
    assert_eq!(stats.compression, compression);
    assert_eq!(page_widths(&out), vec![250, 250, 350, 350]);
}
