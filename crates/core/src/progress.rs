use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub files: u64,
    pub dirs: u64,
    pub bytes: u64,
}

/// Running totals shared by all workers of one scan.
#[derive(Debug, Default)]
pub struct ProgressCounters {
    files: AtomicU64,
    dirs: AtomicU64,
    bytes: AtomicU64,
}

impl ProgressCounters {
    pub fn file_done(&self, bytes: u64) -> Progress {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes, Ordering::Relaxed);
        self.snapshot()
    }

    pub fn dir_done(&self) -> Progress {
        self.dirs.fetch_add(1, Ordering::Relaxed);
        self.snapshot()
    }

    pub fn snapshot(&self) -> Progress {
        Progress {
            files: self.files.load(Ordering::Relaxed),
            dirs: self.dirs.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
        }
    }
}
