use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::Path;

/// Extension key under which directory entries are accumulated.
pub const DIRECTORY_EXTENSION: &str = "(directory)";

/// Count, byte size and line total for a file or a whole subtree.
///
/// For a file `lines` is the number of text lines read. For a directory the
/// value starts from the number of its immediate files and then has every
/// child result added on top, so the column mixes fan-out and text lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct FileStatistics {
    pub count: u64,
    pub size: u64,
    pub lines: u64,
}

impl FileStatistics {
    pub fn new(count: u64, size: u64, lines: u64) -> Self {
        Self { count, size, lines }
    }

    /// Statistics of a single file.
    pub fn file(size: u64, lines: u64) -> Self {
        Self::new(1, size, lines)
    }

    /// Starting value for a directory with `files` immediate file children.
    pub fn directory_seed(files: u64) -> Self {
        Self::new(0, 0, files)
    }

    /// Field-wise sum; an absent value leaves `self` unchanged.
    #[must_use]
    pub fn combine(&self, other: Option<&FileStatistics>) -> FileStatistics {
        match other {
            Some(o) => FileStatistics {
                count: self.count + o.count,
                size: self.size + o.size,
                lines: self.lines + o.lines,
            },
            None => *self,
        }
    }

    pub fn has_lines(&self) -> bool {
        self.lines > 0
    }
}

impl Add for FileStatistics {
    type Output = FileStatistics;

    fn add(self, rhs: FileStatistics) -> FileStatistics {
        self.combine(Some(&rhs))
    }
}

impl AddAssign for FileStatistics {
    fn add_assign(&mut self, rhs: FileStatistics) {
        *self = self.combine(Some(&rhs));
    }
}

impl Sum for FileStatistics {
    fn sum<I: Iterator<Item = FileStatistics>>(iter: I) -> Self {
        iter.fold(FileStatistics::default(), Add::add)
    }
}

impl<'a> Sum<&'a FileStatistics> for FileStatistics {
    fn sum<I: Iterator<Item = &'a FileStatistics>>(iter: I) -> Self {
        iter.fold(FileStatistics::default(), |acc, s| acc.combine(Some(s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Dir,
}

/// Lower-cased suffix of the file name including its dot, or `""` when the
/// name has none. A leading-dot name such as `.gitignore` is all suffix.
pub fn file_extension(path: &Path) -> String {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return String::new();
    };
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Key used in the by-extension map for an entry of the given kind.
pub fn extension_key(path: &Path, kind: EntryKind) -> String {
    match kind {
        EntryKind::Dir => DIRECTORY_EXTENSION.to_string(),
        EntryKind::File => file_extension(path),
    }
}

/// Normalizes a user supplied extension (`"TXT"`, `".md"`, `" rs "`) to the
/// form produced by [`file_extension`]. Empty input yields `None`.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed.to_lowercase()))
    }
}
