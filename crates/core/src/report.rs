use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::model::{FileStatistics, DIRECTORY_EXTENSION};

/// Final result of a scan: the two accumulated tables plus the inputs that
/// produced them.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Report {
    pub roots: Vec<PathBuf>,
    pub text_extensions: Vec<String>,
    pub include_extensions: Vec<String>,
    pub by_directory: HashMap<PathBuf, FileStatistics>,
    pub by_extension: HashMap<String, FileStatistics>,
}

/// Descending order by whether lines were counted, then size, then count.
fn rank_key(s: &FileStatistics) -> Reverse<(bool, u64, u64)> {
    Reverse((s.has_lines(), s.size, s.count))
}

impl Report {
    pub fn ranked_directories(&self) -> Vec<(&PathBuf, &FileStatistics)> {
        let mut rows: Vec<_> = self.by_directory.iter().collect();
        rows.sort_by(|(pa, a), (pb, b)| rank_key(a).cmp(&rank_key(b)).then_with(|| pa.cmp(pb)));
        rows
    }

    pub fn ranked_extensions(&self) -> Vec<(&String, &FileStatistics)> {
        let mut rows: Vec<_> = self.by_extension.iter().collect();
        rows.sort_by(|(ea, a), (eb, b)| rank_key(a).cmp(&rank_key(b)).then_with(|| ea.cmp(eb)));
        rows
    }

    /// Totals over real file extensions, leaving out the directory entry.
    pub fn file_totals(&self) -> FileStatistics {
        self.by_extension
            .iter()
            .filter(|(ext, _)| ext.as_str() != DIRECTORY_EXTENSION)
            .map(|(_, s)| s)
            .sum()
    }
}
