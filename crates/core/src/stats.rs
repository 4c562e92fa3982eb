use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::{extension_key, EntryKind, FileStatistics};

#[derive(Debug, Default)]
struct Tables {
    by_directory: HashMap<PathBuf, FileStatistics>,
    by_extension: HashMap<String, FileStatistics>,
}

/// By-directory and by-extension accumulators of one scan.
///
/// One lock covers both maps so the pair of updates made for a single entry
/// is atomic. The lock is only taken for the merge itself.
#[derive(Debug, Default)]
pub struct Statistics {
    tables: Mutex<Tables>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `stats` into the extension map and, for directories, into the
    /// directory map. Results with zero size are not stored.
    pub fn record(&self, path: &Path, kind: EntryKind, stats: FileStatistics) {
        let ext = extension_key(path, kind);
        let mut tables = self.tables.lock();
        merge_nonzero(&mut tables.by_extension, ext, stats);
        if kind == EntryKind::Dir {
            merge_nonzero(&mut tables.by_directory, path.to_path_buf(), stats);
        }
    }

    pub fn directory(&self, path: &Path) -> Option<FileStatistics> {
        self.tables.lock().by_directory.get(path).copied()
    }

    pub fn extension(&self, ext: &str) -> Option<FileStatistics> {
        self.tables.lock().by_extension.get(ext).copied()
    }

    pub fn into_maps(
        self,
    ) -> (
        HashMap<PathBuf, FileStatistics>,
        HashMap<String, FileStatistics>,
    ) {
        let tables = self.tables.into_inner();
        (tables.by_directory, tables.by_extension)
    }
}

fn merge_nonzero<K>(map: &mut HashMap<K, FileStatistics>, key: K, stats: FileStatistics)
where
    K: std::hash::Hash + Eq,
{
    let combined = stats.combine(map.get(&key));
    if combined.size > 0 {
        map.insert(key, combined);
    }
}
