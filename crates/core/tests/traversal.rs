use folderstats_core::{FileStatistics, ScanError, ScanMsg, ScanOptions, Scanner, DIRECTORY_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// root/a.txt (2 lines, 20 B), root/b.bin (100 B), root/sub/c.txt (1 line, 10 B)
fn sample_tree() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    write(&root.join("a.txt"), b"abcdefghi\nabcdefghi\n");
    write(&root.join("b.bin"), &[0u8; 100]);
    write(&root.join("sub").join("c.txt"), b"123456789\n");
    (tmp, root)
}

fn scanner(options: ScanOptions) -> Scanner {
    Scanner::new(options, Arc::new(AtomicBool::new(false)))
}

#[test]
fn sample_tree_totals() {
    let (_tmp, root) = sample_tree();
    let report = scanner(ScanOptions::default())
        .scan(&[root.clone()])
        .unwrap();

    assert_eq!(
        report.by_directory[&root.join("sub")],
        FileStatistics::new(1, 10, 2)
    );
    assert_eq!(report.by_directory[&root], FileStatistics::new(3, 130, 6));
    assert_eq!(report.by_extension[".txt"], FileStatistics::new(2, 30, 3));
    assert_eq!(report.by_extension[".bin"], FileStatistics::new(1, 100, 0));
    assert_eq!(
        report.by_extension[DIRECTORY_EXTENSION],
        FileStatistics::new(4, 140, 8)
    );
    assert_eq!(report.by_directory.len(), 2);
    assert_eq!(report.by_extension.len(), 3);
}

#[test]
fn root_totals_match_file_totals() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    let mut expected_size = 0;
    for d in 0..4 {
        for f in 0..6 {
            let content = vec![b'x'; 10 * (d + 1) + f];
            expected_size += content.len() as u64;
            write(&root.join(format!("d{d}/n{f}/file{f}.dat")), &content);
        }
    }

    let report = scanner(ScanOptions::default()).scan(&[root.clone()]).unwrap();
    let total = report.by_directory[&root];
    assert_eq!(total.count, 24);
    assert_eq!(total.size, expected_size);
    assert_eq!(report.file_totals().count, 24);
}

#[test]
fn empty_entries_are_not_recorded() {
    let (_tmp, root) = sample_tree();
    write(&root.join("blank.zzz"), b"");
    fs::create_dir_all(root.join("hollow")).unwrap();

    let report = scanner(ScanOptions::default()).scan(&[root.clone()]).unwrap();
    assert!(!report.by_extension.contains_key(".zzz"));
    assert!(!report.by_directory.contains_key(&root.join("hollow")));
    // the empty file still counts towards its directory
    assert_eq!(report.by_directory[&root].count, 4);
}

#[test]
fn inclusion_filter_hides_other_extensions() {
    let (_tmp, root) = sample_tree();
    write(&root.join("notes.md"), b"# title\nbody\n");
    write(&root.join("sub").join("more.MD"), b"x\n");

    let options = ScanOptions::default().with_include_extensions("txt");
    let report = scanner(options).scan(&[root.clone()]).unwrap();

    assert!(!report.by_extension.contains_key(".md"));
    assert!(!report.by_extension.contains_key(".bin"));
    assert_eq!(report.by_extension[".txt"], FileStatistics::new(2, 30, 3));
    // seed of root is one file (a.txt) now
    assert_eq!(report.by_directory[&root], FileStatistics::new(2, 30, 1 + 2 + 2));
}

#[test]
fn custom_text_extensions_control_line_counting() {
    let (_tmp, root) = sample_tree();
    let options = ScanOptions::default().with_text_extensions("bin");
    let report = scanner(options).scan(&[root.clone()]).unwrap();

    assert_eq!(report.by_extension[".txt"].lines, 0);
    // 100 zero bytes contain no newline: one unterminated line
    assert_eq!(report.by_extension[".bin"].lines, 1);
}

#[test]
fn multiple_roots_are_all_recorded() {
    let (_a, first) = sample_tree();
    let (_b, second) = sample_tree();
    let report = scanner(ScanOptions::default().with_threads(2))
        .scan(&[first.clone(), second.clone()])
        .unwrap();

    assert_eq!(report.by_directory[&first], report.by_directory[&second]);
    assert_eq!(report.by_extension[".txt"], FileStatistics::new(4, 60, 6));
    assert_eq!(report.roots, vec![first, second]);
}

#[test]
fn missing_root_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let err = scanner(ScanOptions::default()).scan(&[missing.clone()]).unwrap_err();
    match err {
        ScanError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn io_error_beats_sibling_cancellation() {
    let (_tmp, root) = sample_tree();
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope");
    let err = scanner(ScanOptions::default())
        .scan(&[root, missing])
        .unwrap_err();
    assert!(matches!(err, ScanError::Io { .. }));
}

#[test]
fn cancelled_before_start() {
    let (_tmp, root) = sample_tree();
    let cancel = Arc::new(AtomicBool::new(true));
    let err = Scanner::new(ScanOptions::default(), cancel)
        .scan(&[root])
        .unwrap_err();
    assert!(err.is_cancelled());
}

fn wide_tree(files_per_dir: usize) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("wide");
    for d in 0..4 {
        for f in 0..files_per_dir {
            write(&root.join(format!("d{d}/f{f}.txt")), b"x\n");
        }
    }
    (tmp, root)
}

#[test]
fn cancellation_during_scan_fails_the_run() {
    let (_tmp, root) = wide_tree(50);
    let cancel = Arc::new(AtomicBool::new(false));
    // zero capacity: workers block on every message until it is received
    let (tx, rx) = crossbeam_channel::bounded(0);
    let scanner = Scanner::new(ScanOptions::default().with_threads(1), cancel.clone())
        .with_progress(tx);

    let handle = std::thread::spawn(move || scanner.scan(&[root]));
    let mut finished = false;
    for msg in rx.iter() {
        match msg {
            ScanMsg::Progress(_) => cancel.store(true, Ordering::SeqCst),
            ScanMsg::Finished(_) => finished = true,
            _ => {}
        }
    }

    let result = handle.join().unwrap();
    assert!(!finished);
    assert!(matches!(result, Err(ScanError::Cancelled)));
}

#[test]
fn partial_results_stay_consistent_after_cancel() {
    let (_tmp, root) = wide_tree(50);
    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = crossbeam_channel::bounded(0);
    let scanner = Scanner::new(ScanOptions::default(), cancel.clone()).with_progress(tx);

    std::thread::scope(|s| {
        let handle = s.spawn(|| scanner.process_dir(&root));
        let mut seen = 0;
        while !handle.is_finished() {
            if rx.recv_timeout(Duration::from_millis(10)).is_ok() {
                seen += 1;
                if seen == 20 {
                    cancel.store(true, Ordering::SeqCst);
                }
            }
        }
        assert!(handle.join().unwrap().is_err());
    });

    let report = scanner.into_report(&[root]);
    if let Some(txt) = report.by_extension.get(".txt") {
        assert_eq!(txt.size, 2 * txt.count);
        assert_eq!(txt.lines, txt.count);
    }
    for stats in report.by_directory.values() {
        assert_eq!(stats.size, 2 * stats.count);
        // seed of 50 files plus one counted line per file
        assert_eq!(stats.lines, 50 + stats.count);
    }
}

#[cfg(unix)]
#[test]
fn symlinks_are_skipped_unless_followed() {
    let (_tmp, root) = sample_tree();
    std::os::unix::fs::symlink(root.join("b.bin"), root.join("link.bin")).unwrap();

    let report = scanner(ScanOptions::default()).scan(&[root.clone()]).unwrap();
    assert_eq!(report.by_extension[".bin"].count, 1);

    let report = scanner(ScanOptions::default().with_follow_links(true))
        .scan(&[root.clone()])
        .unwrap();
    assert_eq!(report.by_extension[".bin"], FileStatistics::new(2, 200, 0));
}

#[cfg(unix)]
#[test]
fn non_utf8_file_names_are_filtered_and_counted_by_extension() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("latin1");
    write(&root.join(OsStr::from_bytes(b"caf\xe9.txt")), b"a\nb\n");

    let options = ScanOptions::default().with_include_extensions("txt");
    let report = scanner(options).scan(&[root.clone()]).unwrap();

    assert_eq!(report.by_extension[".txt"], FileStatistics::new(1, 4, 2));
    assert_eq!(report.by_directory[&root], FileStatistics::new(1, 4, 3));
}
