//! End-to-end reconciliation scenarios on real directory trees

use super::test_utils::{snapshot, write_file};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use treeprint::reconcile::{diff, ChangeKind, ChangeRecord};
use treeprint::report::{self, Report};
use treeprint::tree::Concurrency;

fn kinds(changes: &[ChangeRecord]) -> Vec<ChangeKind> {
    changes.iter().map(|c| c.kind()).collect()
}

/// Unchanged tree produces an empty report
#[test]
fn test_unchanged_tree_has_no_differences() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "a.txt", "alpha");
    write_file(temp_dir.path(), "sub/b.txt", "beta");

    let before = snapshot(temp_dir.path(), Concurrency::Auto);
    let after = snapshot(temp_dir.path(), Concurrency::Auto);

    assert_eq!(report::format(&diff(&before, &after)), Report::NoDifferences);
}

/// Moving a file between directories is one Moved record
#[test]
fn test_directory_move() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_file(root, "photos/2023/img.jpg", "pixels");

    let before = snapshot(root, Concurrency::Auto);
    fs::create_dir_all(root.join("archive")).unwrap();
    fs::rename(root.join("photos/2023/img.jpg"), root.join("archive/img.jpg")).unwrap();
    let after = snapshot(root, Concurrency::Auto);

    let changes = diff(&before, &after);
    assert_eq!(changes.len(), 1);
    match &changes[0] {
        ChangeRecord::Moved {
            old_path, new_path, ..
        } => {
            assert_eq!(old_path, "photos/2023/img.jpg");
            assert_eq!(new_path, "archive/img.jpg");
        }
        other => panic!("expected Moved, got {:?}", other),
    }
}

/// Renaming in place is one Renamed record
#[test]
fn test_rename_in_place() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_file(root, "notes/draft.md", "text");

    let before = snapshot(root, Concurrency::Auto);
    fs::rename(root.join("notes/draft.md"), root.join("notes/final.md")).unwrap();
    let after = snapshot(root, Concurrency::Auto);

    let changes = diff(&before, &after);
    assert_eq!(kinds(&changes), vec![ChangeKind::Renamed]);
}

/// Mixed edits come out in phase order
#[test]
fn test_mixed_changes_phase_order() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_file(root, "keep.txt", "same");
    write_file(root, "edit.txt", "v1");
    write_file(root, "old/moved.txt", "moving");
    write_file(root, "doomed.txt", "bye");

    let before = snapshot(root, Concurrency::Auto);

    write_file(root, "edit.txt", "v2");
    write_file(root, "fresh.txt", "hello");
    fs::create_dir_all(root.join("new")).unwrap();
    fs::rename(root.join("old/moved.txt"), root.join("new/moved.txt")).unwrap();
    fs::remove_file(root.join("doomed.txt")).unwrap();

    let after = snapshot(root, Concurrency::Auto);
    let changes = diff(&before, &after);

    assert_eq!(
        kinds(&changes),
        vec![
            ChangeKind::Moved,
            ChangeKind::Modified,
            ChangeKind::Added,
            ChangeKind::Removed
        ]
    );
    let summary = report::format(&changes).summary();
    assert_eq!(summary.total(), 4);
    assert_eq!(summary.count(ChangeKind::Modified), 1);
}

/// Each path is claimed at most once per side
#[test]
fn test_content_swap_claims_each_side_once() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_file(root, "a.txt", "one");
    write_file(root, "b.txt", "two");
    let before = snapshot(root, Concurrency::Auto);

    // Swap contents: both digests relocate, so neither path is Modified
    write_file(root, "a.txt", "two");
    write_file(root, "b.txt", "one");
    let after = snapshot(root, Concurrency::Auto);

    let changes = diff(&before, &after);
    assert_eq!(kinds(&changes), vec![ChangeKind::Renamed, ChangeKind::Renamed]);

    let mut old_seen = HashSet::new();
    let mut new_seen = HashSet::new();
    for change in &changes {
        let (old, new) = change.paths();
        if let Some(old) = old {
            assert!(old_seen.insert(old.to_string()), "{} claimed twice", old);
        }
        if let Some(new) = new {
            assert!(new_seen.insert(new.to_string()), "{} claimed twice", new);
        }
    }
}
