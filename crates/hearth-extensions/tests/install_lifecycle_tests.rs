//! Installation lifecycle integration tests
//!
//! Drives the manager end-to-end with real wheel fixtures, a fake installer,
//! and a canned index: successful installs register in the store, and every
//! failure mode leaves no trace of the attempted name.

mod common;

use common::*;
use hearth_extensions::{AddRequest, Error};
use tempfile::TempDir;

#[tokio::test]
async fn test_add_from_local_source_registers_extension() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    let installed = mgr
        .add(AddRequest::FromSource {
            source: wheel.to_string_lossy().into_owned(),
            sha256: None,
        })
        .await
        .unwrap();

    assert_eq!(installed.name, "sample-ext");
    assert_eq!(installed.version, "1.0.0");
    assert_eq!(installed.ext_type, "whl");

    assert!(mgr.store().exists("sample-ext"));
    let fetched = mgr.store().get("sample-ext").unwrap();
    assert_eq!(fetched.name, "sample-ext");
    assert_eq!(fetched.version, "1.0.0");

    // Provenance wheel saved inside the install directory
    assert!(mgr
        .store()
        .path_for("sample-ext")
        .join("sample_ext-1.0.0-py3-none-any.whl")
        .is_file());
}

#[tokio::test]
async fn test_add_by_name_resolves_through_index() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );
    let digest = sha256_hex(&wheel);

    let index = FakeIndex::offering("sample-ext", &[(wheel.as_path(), Some(digest))]);
    let mgr = manager(store_root.path(), FakeInstaller::working(), index);

    let installed = mgr
        .add(AddRequest::ByName {
            name: "sample-ext".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(installed.version, "1.0.0");
}

#[tokio::test]
async fn test_add_by_unknown_name_is_no_candidate() {
    let store_root = TempDir::new().unwrap();
    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());

    let err = mgr
        .add(AddRequest::ByName {
            name: "ghost".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoCandidateFound { .. }));
    assert!(!mgr.store().exists("ghost"));
}

#[tokio::test]
async fn test_add_duplicate_name_rejected() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    let request = AddRequest::FromSource {
        source: wheel.to_string_lossy().into_owned(),
        sha256: None,
    };
    mgr.add(request.clone()).await.unwrap();

    let err = mgr.add(request).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_add_with_matching_checksum_succeeds() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );
    let digest = sha256_hex(&wheel);

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    mgr.add(AddRequest::FromSource {
        source: wheel.to_string_lossy().into_owned(),
        sha256: Some(digest),
    })
    .await
    .unwrap();
    assert!(mgr.store().exists("sample-ext"));
}

#[tokio::test]
async fn test_add_with_bad_checksum_leaves_no_directory() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    let err = mgr
        .add(AddRequest::FromSource {
            source: wheel.to_string_lossy().into_owned(),
            sha256: Some("deadbeef".repeat(8)),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ChecksumMismatch { .. }));
    assert!(!mgr.store().exists("sample-ext"));
    assert!(!mgr.store().path_for("sample-ext").exists());
}

#[tokio::test]
async fn test_add_incompatible_extension_leaves_no_directory() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        Some(r#"{"hearth.minCoreVersion": "99.0.0"}"#),
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    let err = mgr
        .add(AddRequest::FromSource {
            source: wheel.to_string_lossy().into_owned(),
            sha256: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::IncompatibleVersion { .. }));
    assert!(!mgr.store().exists("sample-ext"));
}

#[tokio::test]
async fn test_installer_failure_cleans_partial_destination() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::failing(2), FakeIndex::empty());
    let err = mgr
        .add(AddRequest::FromSource {
            source: wheel.to_string_lossy().into_owned(),
            sha256: None,
        })
        .await
        .unwrap_err();

    match err {
        Error::InstallationFailed { status } => assert_eq!(status, 2),
        other => panic!("expected InstallationFailed, got {other:?}"),
    }
    // The fake installer wrote debris; the orchestrator must have removed it
    assert!(!mgr.store().path_for("sample-ext").exists());
    assert!(!mgr.store().exists("sample-ext"));
}

#[tokio::test]
async fn test_registration_failure_cleans_destination() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );

    // The installer unpacks successfully but deletes the wheel, so the
    // provenance copy after installation fails.
    let mgr = manager(
        store_root.path(),
        FakeInstaller::consuming_artifact(),
        FakeIndex::empty(),
    );
    let err = mgr
        .add(AddRequest::FromSource {
            source: wheel.to_string_lossy().into_owned(),
            sha256: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    // The unpacked tree must not stay behind as a registered extension
    assert!(!mgr.store().exists("sample-ext"));
    assert!(!mgr.store().path_for("sample-ext").exists());
}

#[tokio::test]
async fn test_add_missing_local_file() {
    let store_root = TempDir::new().unwrap();
    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());

    let err = mgr
        .add(AddRequest::FromSource {
            source: "/nonexistent/sample_ext-1.0.0-py3-none-any.whl".to_string(),
            sha256: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_remove_installed_extension() {
    let store_root = TempDir::new().unwrap();
    preinstall(
        store_root.path(),
        "sample-ext",
        "sample_ext-1.0.0-py3-none-any.whl",
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    let removed = mgr.remove("sample-ext").await.unwrap();
    assert_eq!(removed.version, "1.0.0");
    assert!(!mgr.store().exists("sample-ext"));
    assert!(!mgr.store().path_for("sample-ext").exists());
}

#[tokio::test]
async fn test_remove_missing_extension_has_no_side_effects() {
    let store_root = TempDir::new().unwrap();
    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());

    let err = mgr.remove("ghost").await.unwrap_err();
    assert!(matches!(err, Error::NotInstalled { .. }));
    assert!(mgr.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_and_show() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        Some(r#"{"hearth.minCoreVersion": "1.0.0", "author": "someone"}"#),
        "v1",
    );

    let mgr = manager(store_root.path(), FakeInstaller::working(), FakeIndex::empty());
    mgr.add(AddRequest::FromSource {
        source: wheel.to_string_lossy().into_owned(),
        sha256: None,
    })
    .await
    .unwrap();

    let list = mgr.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "sample-ext");
    assert_eq!(list[0].version, "1.0.0");
    assert_eq!(list[0].ext_type, "whl");

    let shown = mgr.show("sample-ext").unwrap();
    assert_eq!(
        shown.metadata.get("author").and_then(|v| v.as_str()),
        Some("someone")
    );
}

#[tokio::test]
async fn test_list_available_passes_index_through() {
    let wheels = TempDir::new().unwrap();
    let store_root = TempDir::new().unwrap();
    let wheel = build_wheel(
        wheels.path(),
        "sample_ext-1.0.0-py3-none-any.whl",
        None,
        "v1",
    );

    let index = FakeIndex::offering("sample-ext", &[(wheel.as_path(), None)]);
    let mgr = manager(store_root.path(), FakeInstaller::working(), index);

    let document = mgr.list_available().await.unwrap();
    assert!(document.extensions.contains_key("sample-ext"));
    assert_eq!(document.extensions["sample-ext"].len(), 1);
}
