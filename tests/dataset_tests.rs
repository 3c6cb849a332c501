// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tests for capture directory scanning.
//!
//! Run with: cargo test --test dataset_tests

use std::path::PathBuf;

use roboframes::dataset::FrameSet;
use roboframes::FrameError;

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("roboframes_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch(dir: &PathBuf, name: &str) {
    std::fs::write(dir.join(name), b"fixture").unwrap();
}

#[test]
fn test_scan_groups_and_sorts_by_id() {
    let dir = fixture_dir("scan_sort");
    touch(&dir, "frame_003.png");
    touch(&dir, "frame_001.png");
    touch(&dir, "frame_002.png");
    touch(&dir, "lidar_002.pcd");
    touch(&dir, "lidar_001.ply");
    touch(&dir, "poses_001.csv");

    let set = FrameSet::scan(&dir).unwrap();
    assert_eq!(set.len(), 6);
    assert_eq!(set.images().len(), 3);
    assert_eq!(set.point_clouds().len(), 2);
    assert_eq!(set.csv_files().len(), 1);

    let image_ids: Vec<u64> = set.images().iter().map(|f| f.frame_id).collect();
    assert_eq!(image_ids, vec![1, 2, 3]);
    let cloud_ids: Vec<u64> = set.point_clouds().iter().map(|f| f.frame_id).collect();
    assert_eq!(cloud_ids, vec![1, 2]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_scan_skips_non_conforming_files() {
    let dir = fixture_dir("scan_skip");
    touch(&dir, "frame_001.png");
    // No numeric id segment
    touch(&dir, "notes.txt");
    // Unknown extension
    touch(&dir, "frame_002.xyz");
    // Subdirectories are not entered
    std::fs::create_dir_all(dir.join("nested")).unwrap();
    touch(&dir.join("nested"), "frame_003.png");

    let set = FrameSet::scan(&dir).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.images()[0].frame_id, 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_scan_missing_directory() {
    let dir = fixture_dir("scan_missing");
    let err = FrameSet::scan(dir.join("does-not-exist")).unwrap_err();
    assert!(matches!(err, FrameError::ReadError { .. }));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_info_summary() {
    let dir = fixture_dir("scan_info");
    touch(&dir, "frame_001.png");
    touch(&dir, "frame_005.png");
    touch(&dir, "lidar_002.pcd");
    touch(&dir, "poses_004.csv");

    let set = FrameSet::scan(&dir).unwrap();
    let info = set.info();
    assert_eq!(info.image_count, 2);
    assert_eq!(info.point_cloud_count, 1);
    assert_eq!(info.csv_count, 1);
    assert_eq!(
        info.prefixes,
        vec![
            "frame".to_string(),
            "lidar".to_string(),
            "poses".to_string()
        ]
    );
    assert_eq!(info.min_frame_id, Some(1));
    assert_eq!(info.max_frame_id, Some(5));

    let json = info.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["image_count"], 2);

    let _ = std::fs::remove_dir_all(&dir);
}
