#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfjoiner::{Direction, DocumentType, SourceList};

fuzz_target!(|data: &[u8]| {
    let Some((ops, names)) = data.split_first_chunk::<8>() else {
        return;
    };
    let s = String::from_utf8_lossy(names);

    let mut list: SourceList = s.split_whitespace().collect();
    for name in s.split_whitespace() {
        let _ = DocumentType::from_path(name);
    }

    let mut before: Vec<_> = list.paths();
    before.sort();

    for &op in ops {
        let index = usize::from(op >> 1);
        let direction = if op & 1 == 0 {
            Direction::Up
        } else {
            Direction::Down
        };
        let snapshot = list.clone();
        if !list.reorder(index, direction) {
            assert_eq!(list, snapshot);
        }
    }

    // Reordering only permutes the entries.
    let mut after = list.paths();
    after.sort();
    assert_eq!(before, after);

    if let Some(first) = list.get(0).cloned() {
        let removed = list.remove(first.path());
        assert!(removed >= 1);
        assert_eq!(list.remove(first.path()), 0);
    }
});
