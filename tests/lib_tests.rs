use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use webpify::engine::{Cli, map_path, path_relative_to, setup_opts, trim_extension};
use webpify::pipeline::{build_tasks, sniff_kind};
use webpify::report::{account, output_size, space_saved};
use webpify::utils::{human_bytes, resolve_kinds};
use webpify::{
    DirectoryInfo, DispatchOutcome, EnabledKinds, EncodeSettings, EncodeTask, FileRecord,
    ImageKind, TaskFailure,
};

// --- trim_extension ---

#[test]
fn test_trim_extension_simple() {
    assert_eq!(trim_extension("photo.jpg"), "photo");
}

#[test]
fn test_trim_extension_only_last_dot() {
    assert_eq!(trim_extension("archive.tar.gz"), "archive.tar");
}

#[test]
fn test_trim_extension_no_extension() {
    assert_eq!(trim_extension("README"), "README");
}

#[test]
fn test_trim_extension_leading_dot_only() {
    assert_eq!(trim_extension(".hidden"), ".hidden");
}

#[test]
fn test_trim_extension_trailing_dot() {
    assert_eq!(trim_extension("weird."), "weird");
}

// --- map_path ---

#[test]
fn test_map_path_file_in_subdir() {
    let out = map_path(
        Path::new("/in"),
        Path::new("/out"),
        Path::new("/in/a/photo1.jpg"),
        false,
    );
    assert_eq!(out, PathBuf::from("/out/a/photo1.webp"));
}

#[test]
fn test_map_path_file_at_root() {
    let out = map_path(
        Path::new("/in"),
        Path::new("/out"),
        Path::new("/in/cat.png"),
        false,
    );
    assert_eq!(out, PathBuf::from("/out/cat.webp"));
}

#[test]
fn test_map_path_file_without_extension() {
    let out = map_path(
        Path::new("/in"),
        Path::new("/out"),
        Path::new("/in/x/.hidden"),
        false,
    );
    assert_eq!(out, PathBuf::from("/out/x/.hidden.webp"));
}

#[test]
fn test_map_path_directory_keeps_name() {
    let out = map_path(
        Path::new("/in"),
        Path::new("/out"),
        Path::new("/in/a/b.d"),
        true,
    );
    assert_eq!(out, PathBuf::from("/out/a/b.d"));
}

#[test]
fn test_map_path_root_directory_maps_to_output_root() {
    let out = map_path(Path::new("/in"), Path::new("/out"), Path::new("/in"), true);
    assert_eq!(out, PathBuf::from("/out"));
}

#[test]
fn test_map_path_same_roots_changes_only_extension() {
    let root = Path::new("/pics");
    let out = map_path(root, root, Path::new("/pics/2024/img.jpeg"), false);
    assert_eq!(out, PathBuf::from("/pics/2024/img.webp"));
}

#[test]
fn test_map_path_output_stays_under_output_root() {
    let input_root = Path::new("/data/in");
    let output_root = Path::new("/elsewhere/out");
    for p in [
        "/data/in/a.jpg",
        "/data/in/x/y/z.gif",
        "/data/in/deep/er/still/img.png",
        "/data/in/no_ext",
    ] {
        let p = Path::new(p);
        let mapped = map_path(input_root, output_root, p, false);
        assert!(mapped.starts_with(output_root), "{}", mapped.display());
        let rel_dir = path_relative_to(p.parent().unwrap(), input_root).unwrap();
        let mapped_rel_dir = path_relative_to(mapped.parent().unwrap(), output_root).unwrap();
        assert_eq!(rel_dir, mapped_rel_dir);
    }
}

// --- sniff_kind ---

#[test]
fn test_sniff_jpeg() {
    assert_eq!(
        sniff_kind(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F']),
        ImageKind::Jpeg
    );
}

#[test]
fn test_sniff_png() {
    assert_eq!(
        sniff_kind(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        ImageKind::Png
    );
}

#[test]
fn test_sniff_gif87_and_gif89() {
    assert_eq!(sniff_kind(b"GIF87a\x01\x00"), ImageKind::Gif);
    assert_eq!(sniff_kind(b"GIF89a\x01\x00"), ImageKind::Gif);
}

#[test]
fn test_sniff_gif_bad_version_is_unknown() {
    assert_eq!(sniff_kind(b"GIF88a\x01\x00"), ImageKind::Unknown);
}

#[test]
fn test_sniff_truncated_and_empty_are_unknown() {
    assert_eq!(sniff_kind(&[]), ImageKind::Unknown);
    assert_eq!(sniff_kind(&[0xFF, 0xD8]), ImageKind::Unknown);
    assert_eq!(sniff_kind(b"GIF8"), ImageKind::Unknown);
}

#[test]
fn test_sniff_text_is_unknown() {
    assert_eq!(sniff_kind(b"hello, world\n"), ImageKind::Unknown);
}

// --- EnabledKinds / resolve_kinds ---

#[test]
fn test_enabled_kinds_none_set_means_all() {
    assert_eq!(
        EnabledKinds::from_flags(false, false, false),
        EnabledKinds::default()
    );
}

#[test]
fn test_enabled_kinds_unknown_never_allowed() {
    assert!(!EnabledKinds::default().allows(ImageKind::Unknown));
}

#[test]
fn test_enabled_kinds_subset() {
    let kinds = EnabledKinds::from_flags(true, false, false);
    assert!(kinds.allows(ImageKind::Jpeg));
    assert!(!kinds.allows(ImageKind::Png));
    assert!(!kinds.allows(ImageKind::Gif));
}

#[test]
fn test_resolve_kinds_cli_replaces_file_set() {
    let kinds = resolve_kinds((None, Some(true), None), (Some(true), None, None));
    assert_eq!(kinds, EnabledKinds::from_flags(false, true, false));
}

#[test]
fn test_resolve_kinds_file_used_without_cli() {
    let kinds = resolve_kinds((None, None, None), (None, None, Some(true)));
    assert_eq!(kinds, EnabledKinds::from_flags(false, false, true));
}

#[test]
fn test_resolve_kinds_explicit_false_is_not_unset() {
    let from_cli = resolve_kinds((Some(false), None, None), (None, None, None));
    assert!(!from_cli.jpeg);
    assert!(from_cli.png && from_cli.gif);
    let from_file = resolve_kinds((None, None, None), (Some(false), None, None));
    assert_eq!(from_file, from_cli);
}

#[test]
fn test_resolve_kinds_mixed_true_and_false() {
    let kinds = resolve_kinds((Some(false), Some(true), None), (None, None, None));
    assert_eq!(
        kinds,
        EnabledKinds {
            jpeg: false,
            png: true,
            gif: false,
        }
    );
}

#[test]
fn test_resolve_kinds_all_disabled_encodes_nothing() {
    let kinds = resolve_kinds((Some(false), Some(false), Some(false)), (None, None, None));
    assert!(!kinds.allows(ImageKind::Jpeg));
    assert!(!kinds.allows(ImageKind::Png));
    assert!(!kinds.allows(ImageKind::Gif));
}

#[test]
fn test_resolve_kinds_nothing_set() {
    assert_eq!(
        resolve_kinds((None, None, None), (None, None, None)),
        EnabledKinds::default()
    );
}

// --- build_tasks ---

fn record(path: &str, kind: ImageKind, output: Option<&str>) -> FileRecord {
    FileRecord {
        input_path: PathBuf::from(path),
        output_path: output.map(PathBuf::from),
        kind,
        size: 10,
    }
}

#[test]
fn test_build_tasks_skips_disabled_unknown_and_unmapped() {
    let files = vec![
        record("/in/a.jpg", ImageKind::Jpeg, Some("/out/a.webp")),
        record("/in/b.png", ImageKind::Png, Some("/out/b.webp")),
        record("/in/c.txt", ImageKind::Unknown, Some("/out/c.webp")),
        record("/in/d.jpg", ImageKind::Jpeg, None),
        record("/in/e.jpg", ImageKind::Jpeg, Some("/out/e.webp")),
    ];
    let settings = EncodeSettings {
        quality: 55,
        lossless: true,
        kinds: EnabledKinds::from_flags(true, false, false),
        workers: Some(2),
    };
    let tasks = build_tasks(&files, &settings);
    assert_eq!(
        tasks,
        vec![
            EncodeTask {
                input_path: PathBuf::from("/in/a.jpg"),
                output_path: PathBuf::from("/out/a.webp"),
                quality: 55,
                lossless: true,
            },
            EncodeTask {
                input_path: PathBuf::from("/in/e.jpg"),
                output_path: PathBuf::from("/out/e.webp"),
                quality: 55,
                lossless: true,
            },
        ]
    );
}

#[test]
fn test_worker_count_never_zero() {
    let settings = EncodeSettings {
        workers: Some(0),
        ..Default::default()
    };
    assert_eq!(settings.worker_count(), 1);
    assert!(EncodeSettings::default().worker_count() >= 1);
}

// --- accounting ---

#[test]
fn test_output_size_normal() {
    assert_eq!(output_size(0, 500), 500);
    assert_eq!(output_size(200, 500), 500);
}

#[test]
fn test_output_size_shrunk_output_uses_difference() {
    assert_eq!(output_size(900, 500), 400);
}

#[test]
fn test_space_saved_clamped() {
    assert_eq!(space_saved(1000, 400), 600);
    assert_eq!(space_saved(400, 1000), 0);
    assert_eq!(space_saved(0, 0), 0);
}

fn sized(total: u64) -> DirectoryInfo {
    DirectoryInfo {
        total_size: total,
        ..Default::default()
    }
}

#[test]
fn test_account_output_larger_than_input() {
    let outcome = DispatchOutcome {
        eligible: 3,
        started: 3,
        succeeded: 3,
        elapsed: Duration::from_millis(1500),
        ..Default::default()
    };
    let summary = account(&sized(100), &sized(0), &sized(250), &outcome);
    assert_eq!(summary.input_size, 100);
    assert_eq!(summary.output_size, 250);
    assert_eq!(summary.space_saved, 0);
    assert_eq!(summary.elapsed, Duration::from_millis(1500));
    assert_eq!(summary.encoded, 3);
    assert_eq!(summary.failed, 0);
}

#[test]
fn test_account_nothing_dispatched_saves_nothing() {
    let summary = account(&sized(11), &sized(0), &sized(0), &DispatchOutcome::default());
    assert_eq!(summary.input_size, 11);
    assert_eq!(summary.output_size, 0);
    assert_eq!(summary.space_saved, 0);
    assert_eq!(summary.encoded, 0);
}

#[test]
fn test_account_counts_failures() {
    let outcome = DispatchOutcome {
        eligible: 4,
        started: 2,
        succeeded: 1,
        failures: vec![TaskFailure {
            input_path: PathBuf::from("/in/bad.jpg"),
            message: "boom".to_string(),
        }],
        ..Default::default()
    };
    let summary = account(&sized(1000), &sized(0), &sized(300), &outcome);
    assert_eq!(summary.space_saved, 700);
    assert_eq!(summary.failed, 1);
    assert_eq!(outcome.not_started(), 2);
}

#[test]
fn test_into_result_returns_first_failure() {
    let outcome = DispatchOutcome {
        eligible: 2,
        started: 2,
        failures: vec![
            TaskFailure {
                input_path: PathBuf::from("/in/first.jpg"),
                message: "exit status 1".to_string(),
            },
            TaskFailure {
                input_path: PathBuf::from("/in/second.jpg"),
                message: "exit status 2".to_string(),
            },
        ],
        ..Default::default()
    };
    let err = outcome.into_result().unwrap_err().to_string();
    assert!(err.contains("first.jpg"), "{err}");
    assert!(!err.contains("second.jpg"), "{err}");
}

// --- human_bytes ---

#[test]
fn test_human_bytes() {
    assert_eq!(human_bytes(0), "0 B");
    assert_eq!(human_bytes(9), "9 B");
    assert_eq!(human_bytes(340), "340 B");
    assert_eq!(human_bytes(1_200), "1.2 kB");
    assert_eq!(human_bytes(82_854_982), "83 MB");
    assert_eq!(human_bytes(2_500_000_000), "2.5 GB");
}

// --- config merge (defaults < .webpify.toml < CLI) ---

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["webpify", "/in", "/out"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_setup_opts_defaults_without_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let opts = setup_opts(&cli(&[]), dir.path()).unwrap();
    assert_eq!(opts.settings.quality, 80);
    assert!(!opts.settings.lossless);
    assert_eq!(opts.settings.kinds, EnabledKinds::default());
    assert_eq!(opts.settings.workers, None);
    assert_eq!(opts.cwebp, PathBuf::from("cwebp"));
}

#[test]
fn test_setup_opts_file_then_cli() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".webpify.toml"),
        "[settings]\nquality = 60\nlossless = true\njpegs = true\nworkers = 2\ncwebp = \"/opt/bin/cwebp\"\n",
    )
    .unwrap();

    let from_file = setup_opts(&cli(&[]), dir.path()).unwrap();
    assert_eq!(from_file.settings.quality, 60);
    assert!(from_file.settings.lossless);
    assert_eq!(from_file.settings.workers, Some(2));
    assert_eq!(
        from_file.settings.kinds,
        EnabledKinds::from_flags(true, false, false)
    );
    assert_eq!(from_file.cwebp, PathBuf::from("/opt/bin/cwebp"));

    let overridden = setup_opts(
        &cli(&["-q", "70", "--pngs", "--lossless=false", "-j", "5"]),
        dir.path(),
    )
    .unwrap();
    assert_eq!(overridden.settings.quality, 70);
    assert!(!overridden.settings.lossless);
    assert_eq!(overridden.settings.workers, Some(5));
    assert_eq!(
        overridden.settings.kinds,
        EnabledKinds::from_flags(false, true, false)
    );
}

#[test]
fn test_setup_opts_skips_out_of_range_file_quality() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".webpify.toml"),
        "[settings]\nquality = 150\nlossless = true\n",
    )
    .unwrap();
    let opts = setup_opts(&cli(&[]), dir.path()).unwrap();
    assert_eq!(opts.settings.quality, 80);
    assert!(opts.settings.lossless);
}

#[test]
fn test_setup_opts_cli_disabling_one_kind_keeps_it_off() {
    let dir = tempfile::TempDir::new().unwrap();
    let opts = setup_opts(&cli(&["--jpegs", "false"]), dir.path()).unwrap();
    assert!(!opts.settings.kinds.jpeg);
    assert!(opts.settings.kinds.png);
    assert!(opts.settings.kinds.gif);
}

#[test]
fn test_setup_opts_file_disabling_one_kind_keeps_it_off() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join(".webpify.toml"), "[settings]\njpegs = false\n").unwrap();
    let opts = setup_opts(&cli(&[]), dir.path()).unwrap();
    assert_eq!(
        opts.settings.kinds,
        EnabledKinds {
            jpeg: false,
            png: true,
            gif: true,
        }
    );
}

#[test]
fn test_setup_opts_ignores_unparsable_file() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join(".webpify.toml"), "[settings\nquality = ").unwrap();
    let opts = setup_opts(&cli(&["-q", "90"]), dir.path()).unwrap();
    assert_eq!(opts.settings.quality, 90);
}

#[test]
fn test_cli_rejects_quality_above_100() {
    assert!(Cli::try_parse_from(["webpify", "/in", "/out", "-q", "101"]).is_err());
}

#[test]
fn test_cli_requires_both_roots() {
    assert!(Cli::try_parse_from(["webpify", "/in"]).is_err());
}
