//! Cross-module invariants of the workspace engine, checked against real
//! temporary trees.

mod common;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use common::write_file;
use proptest::prelude::*;
use workspace_sweeper::core::config::{AnalysisConfig, Config, MIB};
use workspace_sweeper::workspace::classify::{Category, classify};
use workspace_sweeper::workspace::{
    CleanupCategory, CleanupRequest, OrganizeStrategy, analyze, build_tree, cleanup, organize,
};

fn all_files(root: &Path) -> BTreeSet<PathBuf> {
    let mut out = BTreeSet::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        for entry in fs::read_dir(&dir).expect("read_dir") {
            let entry = entry.expect("entry");
            if entry.file_type().expect("file type").is_dir() {
                stack.push(entry.path());
            } else {
                out.insert(entry.path());
            }
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn classify_is_total(name in "\\PC{0,24}") {
        // Must not panic on arbitrary input.
        let _ = classify(Path::new(&name));
    }

    #[test]
    fn classify_ignores_extension_case(stem in "[a-z]{1,8}", ext in "(py|jpg|zip|md|csv|rs)") {
        let lower = classify(Path::new(&format!("{stem}.{ext}")));
        let upper = classify(Path::new(&format!("{stem}.{}", ext.to_uppercase())));
        prop_assert_eq!(lower, upper);
        prop_assert_ne!(lower, Category::Other);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn analysis_invariants_hold(
        files in proptest::collection::vec(
            ("[a-d]{1,2}(/[a-d]{1,2})?", "(txt|py|log|tmp|bin)", 0usize..48, 0u8..4),
            1..24,
        )
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        for (index, (stem, ext, len, seed)) in files.iter().enumerate() {
            let body = vec![*seed; *len];
            write_file(dir.path(), &format!("{stem}_{index}.{ext}"), &body);
        }
        let mut config = AnalysisConfig::default();
        config.large_file_bytes = 16;
        config.top_n = 3;

        let analysis = analyze(dir.path(), &config).expect("analyze");
        prop_assert_eq!(analysis.total_files, files.len());
        prop_assert_eq!(analysis.file_types.values().sum::<usize>(), analysis.total_files);

        prop_assert!(analysis.large_files.len() <= 3);
        prop_assert!(analysis.large_files.iter().all(|f| f.size > 16));
        prop_assert!(analysis.large_files.windows(2).all(|w| w[0].size >= w[1].size));

        prop_assert!(analysis.recent_files.len() <= 3);
        prop_assert!(analysis.recent_files.windows(2).all(|w| w[0].modified >= w[1].modified));

        for paths in analysis.duplicate_files.values() {
            prop_assert!(paths.len() >= 2);
            let first = fs::read(dir.path().join(&paths[0])).expect("read");
            for other in &paths[1..] {
                prop_assert_eq!(&fs::read(dir.path().join(other)).expect("read"), &first);
            }
        }
    }
}

#[test]
fn files_at_dedup_ceiling_never_group() {
    let dir = tempfile::tempdir().expect("tempdir");
    let big = vec![7u8; usize::try_from(10 * MIB).expect("fits")];
    write_file(dir.path(), "big_a.bin", &big);
    write_file(dir.path(), "big_b.bin", &big);
    write_file(dir.path(), "small_a.bin", b"tiny");
    write_file(dir.path(), "small_b.bin", b"tiny");

    let analysis = analyze(dir.path(), &AnalysisConfig::default()).expect("analyze");
    assert_eq!(analysis.duplicate_files.len(), 1);
    let grouped: Vec<_> = analysis.duplicate_files.values().flatten().collect();
    assert!(grouped.iter().all(|p| !p.to_string_lossy().starts_with("big_")));
    // Both large copies still count toward totals and the large-file view.
    assert_eq!(analysis.total_files, 4);
    assert_eq!(analysis.large_files.len(), 2);
}

#[test]
fn excluded_content_never_surfaces() {
    let dir = tempfile::tempdir().expect("tempdir");
    let payload = vec![1u8; usize::try_from(2 * MIB).expect("fits")];
    write_file(dir.path(), "node_modules/pkg/huge.js", &payload);
    write_file(dir.path(), "node_modules/pkg/dup.txt", b"same");
    write_file(dir.path(), "src/dup.txt", b"same");

    let analysis = analyze(dir.path(), &AnalysisConfig::default()).expect("analyze");
    assert_eq!(analysis.total_files, 1);
    assert!(analysis.large_files.is_empty());
    assert!(analysis.duplicate_files.is_empty());

    let tree = build_tree(dir.path(), 3, &AnalysisConfig::default()).expect("tree");
    assert!(tree.find(Path::new("node_modules")).is_none());
    assert!(tree.find(Path::new("src/dup.txt")).is_some());
}

#[test]
fn empty_folder_with_only_excluded_child_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("blank")).expect("mkdir");
    fs::create_dir_all(dir.path().join("wrapper/.git")).expect("mkdir");
    write_file(dir.path(), "wrapper/.git/HEAD", b"ref: main");

    let analysis = analyze(dir.path(), &AnalysisConfig::default()).expect("analyze");
    let empty: BTreeSet<_> = analysis.empty_folders.iter().cloned().collect();
    assert!(empty.contains(Path::new("blank")));
    assert!(empty.contains(Path::new("wrapper")));
    assert_eq!(analysis.total_files, 0);
}

#[test]
fn organize_is_idempotent_over_mixed_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(dir.path(), "a.py", b"a");
    write_file(dir.path(), "deep/nested/b.png", b"b");
    write_file(dir.path(), "c.zip", b"c");
    write_file(dir.path(), "notes", b"d");

    let first = organize(dir.path(), OrganizeStrategy::ByType, &AnalysisConfig::default())
        .expect("first organize");
    assert_eq!(first.moved_files.len(), 4);
    let after_first = all_files(dir.path());

    let second = organize(dir.path(), OrganizeStrategy::ByType, &AnalysisConfig::default())
        .expect("second organize");
    assert!(second.moved_files.is_empty());
    assert!(second.errors.is_empty());
    assert_eq!(all_files(dir.path()), after_first);
}

#[test]
fn cleanup_categories_do_not_leak() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_file(dir.path(), "a/run.log", b"log");
    write_file(dir.path(), "a/edit.bak", b"bak");
    write_file(dir.path(), "b/page.cache", b"cache");
    let config = Config::default();

    let result = cleanup(
        dir.path(),
        &CleanupRequest::new([CleanupCategory::Logs]),
        &config,
    )
    .expect("cleanup");
    assert_eq!(result.deleted_files, vec![PathBuf::from("a/run.log")]);
    assert!(dir.path().join("a/edit.bak").exists());
    assert!(dir.path().join("b/page.cache").exists());

    let result = cleanup(
        dir.path(),
        &CleanupRequest::new([CleanupCategory::Temp]),
        &config,
    )
    .expect("cleanup");
    assert_eq!(result.deleted_files, vec![PathBuf::from("a/edit.bak")]);
    assert!(dir.path().join("b/page.cache").exists());
}

#[cfg(unix)]
#[test]
fn unreadable_root_reports_io_code_from_every_pass() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path().join("sealed");
    write_file(&root, "a.tmp", b"1");
    fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).expect("chmod");

    let analysis = analyze(&root, &AnalysisConfig::default());
    let cleaned = cleanup(
        &root,
        &CleanupRequest::new([CleanupCategory::Temp]),
        &Config::default(),
    );
    let organized = organize(&root, OrganizeStrategy::ByType, &AnalysisConfig::default());
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).expect("chmod back");

    // Privileged runs can read the directory anyway; only check codes when it bit.
    if let Err(err) = analysis {
        assert_eq!(err.code(), "WSW-3002");
    }
    if let Err(err) = cleaned {
        assert_eq!(err.code(), "WSW-3002");
    }
    if let Err(err) = organized {
        assert_eq!(err.code(), "WSW-3002");
    }
}
