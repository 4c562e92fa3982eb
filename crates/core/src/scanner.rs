use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{debug, info, trace, warn};

use crate::error::{Result, ScanError};
use crate::model::{file_extension, EntryKind, FileStatistics};
use crate::options::ScanOptions;
use crate::progress::{Progress, ProgressCounters};
use crate::report::Report;
use crate::stats::Statistics;

/// Read buffer for line counting; cancellation is re-checked once per chunk.
const LINE_CHUNK_SIZE: usize = 64 * 1024;

/// Recursion depth follows the directory depth, so workers get more stack
/// than rayon's default.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub enum ScanMsg {
    Progress(Progress),
    DirDone {
        path: PathBuf,
        stats: FileStatistics,
    },
    Finished(Progress),
    Failed(String),
}

/// Recursive directory statistics aggregator.
///
/// Every child directory and every file is a separate unit of work on a
/// rayon pool; each directory joins its children, adds their results to its
/// own seed and records the total. A scanner is meant for a single run.
pub struct Scanner {
    options: ScanOptions,
    cancel: Arc<AtomicBool>,
    // Raised by the first I/O failure so the remaining branches stop early.
    abort: AtomicBool,
    stats: Statistics,
    counters: ProgressCounters,
    progress: Option<Sender<ScanMsg>>,
}

impl Scanner {
    pub fn new(options: ScanOptions, cancel: Arc<AtomicBool>) -> Self {
        Self {
            options,
            cancel,
            abort: AtomicBool::new(false),
            stats: Statistics::new(),
            counters: ProgressCounters::default(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, tx: Sender<ScanMsg>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Processes every root on a dedicated pool and returns the report once
    /// all of them have finished. Nothing is returned on failure.
    pub fn scan(self, roots: &[PathBuf]) -> Result<Report> {
        let threads = self.options.worker_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|i| format!("folderstats-{i}"))
            .build()?;

        info!(roots = roots.len(), threads, "starting scan");
        let outcome = pool.install(|| {
            roots
                .par_iter()
                .map(|root| self.process_dir(root))
                .reduce(|| Ok(FileStatistics::default()), merge)
        });

        match outcome {
            Ok(total) => {
                let progress = self.counters.snapshot();
                info!(
                    files = total.count,
                    bytes = total.size,
                    dirs = progress.dirs,
                    "scan finished"
                );
                self.emit(ScanMsg::Finished(progress));
                Ok(self.into_report(roots))
            }
            Err(err) => {
                warn!(error = %err, "scan failed");
                self.emit(ScanMsg::Failed(err.to_string()));
                Err(err)
            }
        }
    }

    /// Consumes the scanner, handing its accumulated tables to a report.
    pub fn into_report(self, roots: &[PathBuf]) -> Report {
        let (by_directory, by_extension) = self.stats.into_maps();
        Report {
            roots: roots.to_vec(),
            text_extensions: self.options.text_extensions,
            include_extensions: self.options.include_extensions,
            by_directory,
            by_extension,
        }
    }

    /// Recursive total for `path`, recorded under the path and under the
    /// directory sentinel before it is returned.
    pub fn process_dir(&self, path: &Path) -> Result<FileStatistics> {
        self.check_cancelled()?;
        let (dirs, files) = self.list_children(path)?;
        trace!(path = %path.display(), dirs = dirs.len(), files = files.len(), "listed");

        let children = dirs
            .par_iter()
            .map(|dir| self.process_dir(dir))
            .chain(files.par_iter().map(|file| self.process_file(file)))
            .reduce(|| Ok(FileStatistics::default()), merge)?;

        let total = FileStatistics::directory_seed(files.len() as u64) + children;
        self.stats.record(path, EntryKind::Dir, total);

        self.counters.dir_done();
        debug!(path = %path.display(), files = total.count, bytes = total.size, "directory done");
        self.emit(ScanMsg::DirDone {
            path: path.to_path_buf(),
            stats: total,
        });
        Ok(total)
    }

    /// Size and, for text extensions, line count of a single file.
    pub fn process_file(&self, path: &Path) -> Result<FileStatistics> {
        self.check_cancelled()?;
        let size = fs::metadata(path)
            .map_err(|e| self.io_failure(path, e))?
            .len();

        let lines = if self.options.is_text(&file_extension(path)) {
            let file = File::open(path).map_err(|e| self.io_failure(path, e))?;
            self.count_lines(BufReader::with_capacity(LINE_CHUNK_SIZE, file), path)?
        } else {
            0
        };

        let stats = FileStatistics::file(size, lines);
        self.stats.record(path, EntryKind::File, stats);

        let progress = self.counters.file_done(size);
        self.emit(ScanMsg::Progress(progress));
        Ok(stats)
    }

    /// Counts lines ended by `\n`, `\r\n` or a lone `\r`, reading one buffer
    /// chunk at a time. A final line without a terminator counts once.
    fn count_lines<R: BufRead>(&self, mut reader: R, path: &Path) -> Result<u64> {
        let mut lines = 0u64;
        let mut last: Option<u8> = None;
        loop {
            self.check_cancelled()?;
            let buf = reader.fill_buf().map_err(|e| self.io_failure(path, e))?;
            if buf.is_empty() {
                break;
            }
            lines += line_breaks(buf, last == Some(b'\r')) as u64;
            last = buf.last().copied();
            let len = buf.len();
            reader.consume(len);
        }
        if matches!(last, Some(b) if b != b'\n' && b != b'\r') {
            lines += 1;
        }
        Ok(lines)
    }

    /// Immediate child directories and the files that pass the inclusion
    /// filter. Symlinks are skipped unless following links is enabled.
    fn list_children(&self, path: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in fs::read_dir(path).map_err(|e| self.io_failure(path, e))? {
            let entry = entry.map_err(|e| self.io_failure(path, e))?;
            let child = entry.path();
            let mut file_type = entry
                .file_type()
                .map_err(|e| self.io_failure(&child, e))?;

            if file_type.is_symlink() {
                if !self.options.follow_links {
                    trace!(path = %child.display(), "skipping symlink");
                    continue;
                }
                file_type = fs::metadata(&child)
                    .map_err(|e| self.io_failure(&child, e))?
                    .file_type();
            }

            if file_type.is_dir() {
                dirs.push(child);
            } else if file_type.is_file() && self.options.is_included(&file_extension(&child)) {
                files.push(child);
            }
        }
        Ok((dirs, files))
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.load(Ordering::Relaxed) || self.abort.load(Ordering::Relaxed) {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn io_failure(&self, path: &Path, source: std::io::Error) -> ScanError {
        warn!(path = %path.display(), error = %source, "I/O failure, aborting scan");
        self.abort.store(true, Ordering::Relaxed);
        ScanError::io(path, source)
    }

    fn emit(&self, msg: ScanMsg) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(msg);
        }
    }
}

/// Line terminators in `chunk`. `after_cr` is set when the previous chunk
/// ended in `\r`, so a leading `\n` completes that pair instead of a new line.
fn line_breaks(chunk: &[u8], after_cr: bool) -> usize {
    let lf = bytecount::count(chunk, b'\n');
    let cr = bytecount::count(chunk, b'\r');
    if cr == 0 && !after_cr {
        return lf;
    }
    let mut crlf = chunk
        .windows(2)
        .filter(|w| w[0] == b'\r' && w[1] == b'\n')
        .count();
    if after_cr && chunk.first() == Some(&b'\n') {
        crlf += 1;
    }
    lf + cr - crlf
}

fn merge(a: Result<FileStatistics>, b: Result<FileStatistics>) -> Result<FileStatistics> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok(a + b),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
        (Err(a), Err(b)) => Err(a.prefer(b)),
    }
}
