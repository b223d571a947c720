use gentree::{File, FileTree, Files, GenError};

fn file(path: &str, data: &str, from: &str) -> File {
    File::new(path, data).from_generator(from)
}

// --- Files::validate ---

#[test]
fn test_validate_unique_existing_files() {
    let files = Files(vec![file("a.rs", "a", "g1"), file("b/c.rs", "c", "g2")]);
    assert!(files.validate().is_ok());
    assert!(Files::new().validate().is_ok());
}

#[test]
fn test_validate_reports_nonexistent_file() {
    let files = Files(vec![file("a.rs", "a", "g1"), File::none()]);
    let err = files.validate().unwrap_err();
    assert_eq!(err.len(), 1);
    assert!(matches!(err.errors()[0], GenError::NonexistentFile));
}

#[test]
fn test_validate_reports_one_conflict_per_path() {
    let files = Files(vec![
        file("x.txt", "1", "first"),
        file("x.txt", "2", "second"),
        file("y.txt", "3", "first"),
    ]);
    let err = files.validate().unwrap_err();
    assert_eq!(err.len(), 1);
    match &err.errors()[0] {
        GenError::DuplicatePath { path, stacks } => {
            assert_eq!(path, "x.txt");
            assert_eq!(stacks, &vec!["first".to_string(), "second".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validate_three_way_conflict_names_all() {
    let files = Files(vec![
        file("x.txt", "1", "a"),
        file("x.txt", "2", "b"),
        file("x.txt", "3", "c"),
    ]);
    let msg = files.validate().unwrap_err().to_string();
    assert!(msg.contains("'a', 'b', 'c'"), "{msg}");
}

// --- FileTree ---

#[test]
fn test_file_to_tree() {
    let tree = file("a.rs", "body", "g").to_tree("owner").unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.get("a.rs").unwrap(), b"body");
    assert_eq!(tree.owner("a.rs").as_deref(), Some("owner"));
}

#[test]
fn test_file_to_tree_rejects_absolute() {
    let err = File::new("/abs/a.rs", "").to_tree("owner").unwrap_err();
    assert!(matches!(err.errors()[0], GenError::AbsolutePath { .. }));
}

#[test]
fn test_merge_disjoint_is_union() {
    let a = FileTree::new();
    a.add("ga", [File::new("a.txt", "a"), File::new("dir/b.txt", "b")])
        .unwrap();
    let b = FileTree::new();
    b.add("gb", [File::new("c.txt", "c")]).unwrap();

    a.merge(&b).unwrap();
    let files = a.to_files();
    let paths: Vec<&str> = files.iter().map(|f| f.relative_path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "c.txt", "dir/b.txt"]);
    assert_eq!(a.owner("c.txt").as_deref(), Some("gb"));
    assert_eq!(b.len(), 1);
}

#[test]
fn test_merge_conflict_leaves_recipient_unchanged() {
    let a = FileTree::new();
    a.add("ga", [File::new("shared.txt", "mine"), File::new("a.txt", "a")])
        .unwrap();
    let b = FileTree::new();
    b.add("gb", [File::new("shared.txt", "theirs"), File::new("b.txt", "b")])
        .unwrap();

    let err = a.merge(&b).unwrap_err();
    assert_eq!(err.len(), 1);
    match &err.errors()[0] {
        GenError::Conflict {
            path,
            owner,
            existing,
        } => {
            assert_eq!(path, "shared.txt");
            assert_eq!(owner, "gb");
            assert_eq!(existing, "ga");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(a.paths(), vec!["a.txt".to_string(), "shared.txt".to_string()]);
    assert_eq!(a.get("shared.txt").unwrap(), b"mine");
}

#[test]
fn test_merge_into_self_conflicts() {
    let a = FileTree::new();
    a.add("ga", [File::new("a.txt", "a")]).unwrap();
    let err = a.merge(&a).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(a.len(), 1);
}

#[test]
fn test_to_files_sorted_with_provenance() {
    let tree = FileTree::new();
    tree.add("g", [file("z.txt", "", "inner"), file("a.txt", "", "inner")])
        .unwrap();
    let files = tree.to_files();
    assert_eq!(files.0[0].relative_path, "a.txt");
    assert_eq!(files.0[1].relative_path, "z.txt");
    assert_eq!(files.0[0].from, vec!["inner".to_string()]);
}
