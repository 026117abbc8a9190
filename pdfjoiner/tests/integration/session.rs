//! Integration tests for driving a session the way a front end does.

use pdfjoiner::error::{JoinerError, Result};
use pdfjoiner::viewer::Viewer;
use pdfjoiner::{Direction, ExecutorState, Session};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::common::{StubConverter, executor_with, page_widths, scratch, write_file, write_pdf};

#[derive(Default)]
struct CapturingViewer {
    opened: Mutex<Vec<PathBuf>>,
}

impl Viewer for CapturingViewer {
    fn open(&self, path: &Path) -> Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[tokio::test]
async fn test_edit_list_join_and_view() {
    let dir = scratch();
    let temp = scratch();
    let intro = write_pdf(dir.path(), "intro.pdf", 1, 100);
    let deck = write_file(dir.path(), "deck.pptx", b"slides");
    let outro = write_pdf(dir.path(), "outro.pdf", 1, 300);
    let out = dir.path().join("joined.pdf");
    let viewer = Arc::new(CapturingViewer::default());

    let mut session = Session::new(executor_with(Arc::new(StubConverter::new(200)), temp.path()))
        .with_viewer(viewer.clone());
    session.append([&outro, &intro, &deck]);
    assert!(session.reorder(0, Direction::Down));
    assert!(session.reorder(1, Direction::Down));
    assert_eq!(session.sources().paths(), vec![intro, deck, outro]);

    session.set_destination(&out);
    let report = session.run_merge().await.unwrap();
    assert_eq!(report.files_converted, 1);
    assert_eq!(page_widths(&out), vec![100, 200, 300]);

    session.view_result().unwrap();
    assert_eq!(viewer.opened.lock().unwrap().as_slice(), &[out]);
}

#[tokio::test]
async fn test_background_run_reports_states() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let out = dir.path().join("joined.pdf");

    let mut session = Session::new(executor_with(Arc::new(StubConverter::new(200)), dir.path()));
    session.append([&a]);
    session.set_destination(&out);

    let mut states = session.executor().subscribe();
    let handle = session.spawn_merge().unwrap();

    let mut seen = Vec::new();
    while states.changed().await.is_ok() {
        let state = *states.borrow_and_update();
        seen.push(state);
        if state == ExecutorState::Idle {
            break;
        }
    }

    session.finish_merge(handle).await.unwrap();
    assert_eq!(seen.last(), Some(&ExecutorState::Idle));
    assert!(!seen.contains(&ExecutorState::Failed));
    assert_eq!(session.last_result(), Some(out.as_path()));
}

#[tokio::test]
async fn test_editing_list_during_run_does_not_affect_it() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1, 100);
    let b = write_pdf(dir.path(), "b.pdf", 1, 200);
    let out = dir.path().join("joined.pdf");

    let mut session = Session::new(executor_with(Arc::new(StubConverter::new(200)), dir.path()));
    session.append([&a, &b]);
    session.set_destination(&out);

    let handle = session.spawn_merge().unwrap();
    session.remove(&a);
    session.reorder(0, Direction::Up);

    let report = session.finish_merge(handle).await.unwrap();
    assert_eq!(report.files_merged, 2);
    assert_eq!(page_widths(&out), vec![100, 200]);
    assert_eq!(session.sources().len(), 1);
}

#[tokio::test]
async fn test_view_before_any_join() {
    let session = Session::new(executor_with(
        Arc::new(StubConverter::new(200)),
        std::env::temp_dir().as_path(),
    ))
    .with_viewer(Arc::new(CapturingViewer::default()));

    assert!(matches!(
        session.view_result(),
        Err(JoinerError::ViewerUnavailable { .. })
    ));
}
