#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the declared per-profile output layouts.
//!
//! The snapshot is the contract for file names, sizes and directory
//! structure; any change to a layout table must update it deliberately.

use std::collections::HashSet;

use icon_converter::profiles::{PostProcess, Profile, Scale};

/// Render one profile's layout as stable, `/`-separated text.
fn describe(profile: Profile) -> String {
    let layout = profile.layout();
    let base = layout.dir;
    let assets = layout
        .assets_dir
        .map_or_else(|| base.to_string(), |a| format!("{base}/{a}"));

    let mut lines = vec![format!("[{profile}]"), format!("dir {base}")];
    if layout.assets_dir.is_some() {
        lines.push(format!("dir {assets}"));
    }
    for d in layout.bundle_dirs {
        lines.push(format!("dir {base}/{d}"));
    }
    for icon in layout.icons {
        let mut line = format!("icon {assets}/{} {}", icon.filename, icon.size);
        match icon.scale {
            Some(Scale::X1) => line.push_str(" 1x"),
            Some(Scale::X2) => line.push_str(" 2x"),
            None => {}
        }
        if icon.container_input {
            line.push_str(" ico");
        }
        lines.push(line);
    }
    lines.push(match layout.post {
        PostProcess::None => "post none".to_string(),
        PostProcess::Note(note) => format!("post note: {note}"),
        PostProcess::PackIcns { file, into } => {
            format!("post pack-icns {base}/{file} -> {base}/{into}/{file}")
        }
        PostProcess::PackIco { file } => format!("post pack-ico {base}/{file}"),
    });
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Snapshot: every declared layout
// ---------------------------------------------------------------------------

#[test]
fn declared_layout() {
    let text = Profile::ALL
        .iter()
        .map(|p| describe(*p))
        .collect::<Vec<_>>()
        .join("\n\n");
    insta::assert_snapshot!("declared_layout", text);
}

// ---------------------------------------------------------------------------
// Structural invariants
// ---------------------------------------------------------------------------

/// File names are unique within each profile.
#[test]
fn filenames_are_unique_per_profile() {
    for profile in Profile::ALL {
        let mut seen = HashSet::new();
        for icon in profile.layout().icons {
            assert!(
                seen.insert(icon.filename),
                "{profile}: duplicate {}",
                icon.filename
            );
        }
    }
}

/// Every profile writes into its own directory, named after the profile.
#[test]
fn profile_directories_are_distinct() {
    let dirs: HashSet<&str> = Profile::ALL.iter().map(|p| p.layout().dir).collect();
    assert_eq!(dirs.len(), Profile::ALL.len());
    for profile in Profile::ALL {
        assert_eq!(profile.layout().dir, profile.name());
    }
}

/// Every declared icon is PNG.
#[test]
fn every_icon_is_png() {
    for profile in Profile::ALL {
        for icon in profile.layout().icons {
            assert!(icon.filename.ends_with(".png"), "{}", icon.filename);
            assert!(icon.size > 0);
        }
    }
}
