#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `convert` command.
//!
//! Each test runs a full conversion against a temporary workspace with a fake
//! container packer and inspects the files left on disk.

mod common;

use common::*;
use icon_converter::commands::convert::run_with;
use icon_converter::logging::ProfileStatus;
use icon_converter::profiles::Profile;
use image::GenericImageView as _;

// ---------------------------------------------------------------------------
// Output sets
// ---------------------------------------------------------------------------

/// A 512×512 source converted for browser extensions yields exactly the four
/// manifest icons.
#[test]
fn browser_extension_creates_exactly_four_icons() {
    let ws = WorkspaceBuilder::new().build();
    let log = logger();

    run_with(
        ws.config(&[Profile::BrowserExtension], false),
        &log,
        FakePacker::missing(),
    )
    .unwrap();

    assert_eq!(
        files_under(&ws.profile_dir(Profile::BrowserExtension)),
        vec![
            "icon_128x128.png",
            "icon_16x16.png",
            "icon_32x32.png",
            "icon_48x48.png"
        ]
    );
    assert_eq!(
        std::fs::read_dir(ws.output()).unwrap().count(),
        1,
        "only the selected profile directory is created"
    );
}

/// Every icon's raster is exactly the size its file declares.
#[test]
fn every_icon_has_its_declared_size() {
    let ws = WorkspaceBuilder::new().build();
    let log = logger();

    run_with(ws.config(&Profile::ALL, false), &log, FakePacker::missing()).unwrap();

    for profile in Profile::ALL {
        let layout = profile.layout();
        let dir = ws.profile_dir(profile);
        for (spec, path) in layout.icons.iter().zip(layout.icon_paths(&dir)) {
            let img = image::open(&path).unwrap();
            assert_eq!(
                img.dimensions(),
                (spec.size, spec.size),
                "{}",
                path.display()
            );
        }
    }
}

/// A non-square source is stretched to square icons rather than cropped.
#[test]
fn non_square_source_yields_square_icons() {
    let ws = WorkspaceBuilder::new().with_source(300, 100).build();
    let log = logger();

    run_with(
        ws.config(&[Profile::WindowsApp], false),
        &log,
        FakePacker::missing(),
    )
    .unwrap();

    let icon = ws.profile_dir(Profile::WindowsApp).join("icon_256x256.png");
    assert_eq!(image::open(icon).unwrap().dimensions(), (256, 256));
}

/// Without packers the mac-app profile still succeeds with ten iconset PNGs
/// and no `.icns`.
#[test]
fn mac_app_without_packer_is_degraded_not_failed() {
    let ws = WorkspaceBuilder::new().build();
    let log = logger();

    run_with(ws.config(&[Profile::MacApp], false), &log, FakePacker::missing()).unwrap();

    let mac = ws.profile_dir(Profile::MacApp);
    let files = files_under(&mac);
    assert_eq!(files.len(), 10, "{files:?}");
    assert!(files.iter().all(|f| f.starts_with("AppIcon.iconset/")));
    assert!(mac.join("Contents").join("Resources").is_dir());

    let entries = log.profile_entries();
    assert_eq!(entries[0].status, ProfileStatus::Degraded);
}

/// A packed `.icns` ends up inside the bundle and nowhere else.
#[test]
fn mac_app_with_packer_places_icns_in_bundle() {
    let ws = WorkspaceBuilder::new().build();
    let log = logger();
    let packer = FakePacker::installed();

    run_with(
        ws.config(&[Profile::MacApp], false),
        &log,
        packer.clone(),
    )
    .unwrap();

    let files = files_under(&ws.profile_dir(Profile::MacApp));
    assert!(files.contains(&"Contents/Resources/AppIcon.icns".to_string()));
    assert!(!files.contains(&"AppIcon.icns".to_string()));
    assert_eq!(files.len(), 11);
    assert_eq!(packer.programs(), vec!["iconutil"]);
    assert_eq!(log.profile_entries()[0].status, ProfileStatus::Ok);
}

/// The favicon profile writes seven PNGs and packs `favicon.ico`.
#[test]
fn favicon_with_packer() {
    let ws = WorkspaceBuilder::new().build();
    let log = logger();

    run_with(
        ws.config(&[Profile::Favicon], false),
        &log,
        FakePacker::installed(),
    )
    .unwrap();

    assert_eq!(
        files_under(&ws.profile_dir(Profile::Favicon)),
        vec![
            "apple-touch-icon.png",
            "favicon-16x16.png",
            "favicon-192x192.png",
            "favicon-32x32.png",
            "favicon-48x48.png",
            "favicon-512x512.png",
            "favicon-64x64.png",
            "favicon.ico",
        ]
    );
}

/// An existing `favicon.ico` is kept and the packer never runs.
#[test]
fn existing_favicon_ico_skips_packing() {
    let ws = WorkspaceBuilder::new()
        .with_output_file("favicon/favicon.ico", b"hand-made")
        .build();
    let log = logger();
    let packer = FakePacker::installed();

    run_with(
        ws.config(&[Profile::Favicon], false),
        &log,
        packer.clone(),
    )
    .unwrap();

    let dir = ws.profile_dir(Profile::Favicon);
    assert_eq!(std::fs::read(dir.join("favicon.ico")).unwrap(), b"hand-made");
    assert!(packer.programs().is_empty());
    assert_eq!(files_under(&dir).len(), 8);
}

// ---------------------------------------------------------------------------
// Overwrite semantics
// ---------------------------------------------------------------------------

/// A second run without overwrite fails and leaves every byte untouched.
#[test]
fn second_run_without_overwrite_changes_nothing() {
    let ws = WorkspaceBuilder::new().build();
    let profiles = [Profile::BrowserExtension, Profile::WindowsApp];
    run_with(ws.config(&profiles, false), &logger(), FakePacker::missing()).unwrap();

    let snapshot: Vec<(String, Vec<u8>)> = files_under(&ws.output())
        .into_iter()
        .map(|f| {
            let bytes = std::fs::read(ws.output().join(&f)).unwrap();
            (f, bytes)
        })
        .collect();

    ws.write_source(512, 512, [0, 0, 0, 255]);
    let log = logger();
    let err = run_with(ws.config(&profiles, false), &log, FakePacker::missing()).unwrap_err();

    assert_eq!(err.to_string(), "2 profile(s) failed");
    for entry in log.profile_entries() {
        assert_eq!(entry.status, ProfileStatus::Failed);
        let message = entry.message.unwrap();
        assert!(message.contains("already exists"), "{message}");
        assert!(message.contains("--force"), "{message}");
    }
    for (file, bytes) in snapshot {
        assert_eq!(
            std::fs::read(ws.output().join(&file)).unwrap(),
            bytes,
            "{file} changed"
        );
    }
}

/// With overwrite both runs succeed and the output reflects the newest source.
#[test]
fn overwrite_replaces_with_latest_source() {
    let ws = WorkspaceBuilder::new().build();
    let icon = ws.profile_dir(Profile::BrowserExtension).join("icon_16x16.png");

    ws.write_source(64, 64, [255, 0, 0, 255]);
    run_with(
        ws.config(&[Profile::BrowserExtension], true),
        &logger(),
        FakePacker::missing(),
    )
    .unwrap();
    let first = image::open(&icon).unwrap().to_rgba8();

    ws.write_source(64, 64, [0, 0, 255, 255]);
    run_with(
        ws.config(&[Profile::BrowserExtension], true),
        &logger(),
        FakePacker::missing(),
    )
    .unwrap();
    let second = image::open(&icon).unwrap().to_rgba8();

    assert_eq!(first.get_pixel(8, 8).0, [255, 0, 0, 255]);
    assert_eq!(second.get_pixel(8, 8).0, [0, 0, 255, 255]);
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

/// The run's log file lives under `XDG_CACHE_HOME`, not the real home cache.
#[test]
fn log_file_stays_in_test_cache() {
    let log = logger();
    let path = log.log_path().expect("log path");
    assert!(path.starts_with(cache_home()), "{}", path.display());
    assert!(path.ends_with("icon-converter/integration-test.log"));
}

/// Selecting nothing succeeds and creates no profile directories.
#[test]
fn zero_profiles_is_a_successful_noop() {
    let ws = WorkspaceBuilder::new().build();

    run_with(ws.config(&[], false), &logger(), FakePacker::missing()).unwrap();

    assert!(!ws.output().exists());
}

/// A missing source is reported before anything is created.
#[test]
fn missing_source_fails_without_output() {
    let ws = WorkspaceBuilder::new().build();
    std::fs::remove_file(ws.input()).unwrap();

    let err = run_with(
        ws.config(&[Profile::Favicon], false),
        &logger(),
        FakePacker::missing(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("source.png"));
    assert!(!ws.output().exists());
}

/// A dry run validates everything but writes nothing.
#[test]
fn dry_run_writes_nothing() {
    let ws = WorkspaceBuilder::new().build();
    let log = logger();
    let packer = FakePacker::installed();

    run_with(
        ws.config(&Profile::ALL, false).with_dry_run(true),
        &log,
        packer.clone(),
    )
    .unwrap();

    assert!(!ws.output().exists());
    assert!(packer.programs().is_empty());
    assert_eq!(log.profile_entries().len(), 4);
}
