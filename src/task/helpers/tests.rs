// moqt-build: MOQT Native Library Build Driver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ensure_dir, find_single, install_file, remove_path};
use crate::task::test_utils::Fixture;

#[tokio::test]
async fn test_ensure_dir() {
    let fixture = Fixture::new();
    let dir = fixture.root().join("a/b/c");

    ensure_dir(&fixture.context(true), &dir, "test dir")
        .await
        .unwrap();
    assert!(!dir.exists());

    ensure_dir(&fixture.context(false), &dir, "test dir")
        .await
        .unwrap();
    assert!(dir.is_dir());
}

#[tokio::test]
async fn test_remove_path_file_and_dir() {
    let fixture = Fixture::new();
    let ctx = fixture.context(false);
    let file = fixture.root().join("file.txt");
    let dir = fixture.root().join("tree/nested");
    std::fs::write(&file, "x").unwrap();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("inner.txt"), "y").unwrap();

    remove_path(&fixture.context(true), &file, "file")
        .await
        .unwrap();
    assert!(file.exists());

    remove_path(&ctx, &file, "file").await.unwrap();
    remove_path(&ctx, &fixture.root().join("tree"), "tree")
        .await
        .unwrap();
    assert!(!file.exists());
    assert!(!fixture.root().join("tree").exists());

    // missing paths are fine
    remove_path(&ctx, &file, "file").await.unwrap();
}

#[tokio::test]
async fn test_install_file_replaces_destination() {
    let fixture = Fixture::new();
    let ctx = fixture.context(false);
    let src = fixture.root().join("libmoqt.a");
    let dst = fixture.root().join("pkg/moqt/lib/libmoqt.a");
    std::fs::write(&src, "new").unwrap();

    // a directory in the way is removed
    std::fs::create_dir_all(dst.join("stale")).unwrap();
    install_file(&ctx, &src, &dst).await.unwrap();
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "new");

    std::fs::write(&src, "newer").unwrap();
    install_file(&ctx, &src, &dst).await.unwrap();
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "newer");
}

#[tokio::test]
async fn test_install_file_copies_directories() {
    let fixture = Fixture::new();
    let src = fixture.root().join("src");
    std::fs::create_dir_all(src.join("sub")).unwrap();
    std::fs::write(src.join("a.h"), "a").unwrap();
    std::fs::write(src.join("sub/b.h"), "b").unwrap();
    let dst = fixture.root().join("out/include");

    install_file(&fixture.context(false), &src, &dst)
        .await
        .unwrap();
    assert_eq!(std::fs::read_to_string(dst.join("a.h")).unwrap(), "a");
    assert_eq!(std::fs::read_to_string(dst.join("sub/b.h")).unwrap(), "b");
}

#[tokio::test]
async fn test_install_file_missing_source() {
    let fixture = Fixture::new();
    let dst = fixture.root().join("out.a");
    let err = install_file(&fixture.context(false), &fixture.root().join("nope.a"), &dst)
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("path not found: "), "{err}");
    assert!(!dst.exists());

    // dry run does not look at the source
    install_file(&fixture.context(true), &fixture.root().join("nope.a"), &dst)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_find_single() {
    let fixture = Fixture::new();
    let external = fixture.root().join("external");
    std::fs::create_dir_all(external.join("abseil-cpp+")).unwrap();
    std::fs::create_dir_all(external.join("boringssl")).unwrap();

    let found = find_single(&external, "abseil-cpp*", "abseil-cpp")
        .await
        .unwrap();
    assert_eq!(found, external.join("abseil-cpp+"));

    std::fs::create_dir_all(external.join("abseil-cpp~1")).unwrap();
    let err = find_single(&external, "abseil-cpp*", "abseil-cpp")
        .await
        .unwrap_err();
    assert!(
        err.to_string().starts_with("abseil-cpp not found (pattern '"),
        "{err}"
    );
    assert!(err.to_string().ends_with("matched 2 entries)"), "{err}");
}

#[tokio::test]
async fn test_find_single_missing_dir() {
    let fixture = Fixture::new();
    let err = find_single(&fixture.root().join("missing"), "abseil-cpp*", "abseil-cpp")
        .await
        .unwrap_err();
    assert!(err.to_string().ends_with("matched 0 entries)"), "{err}");
}
