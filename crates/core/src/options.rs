use crate::model::normalize_extension;
use serde::{Deserialize, Serialize};

/// Extensions whose lines are counted when the caller supplies none.
pub const DEFAULT_TEXT_EXTENSIONS: &str = "txt,md,template,tpl,\
json,yaml,yml,\
xml,\
html,css,\
js,jsx,ts,\
cs,cshtml,\
py,\
bat,cmd,sh,ps1,psm1,\
tf,tfvar,\
cfg,config,conf,properties,options,secrets";

/// Parses a comma separated extension list into normalized keys, keeping the
/// order they were given in and dropping repeats.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    let mut exts: Vec<String> = Vec::new();
    for ext in list.split(',').filter_map(normalize_extension) {
        if !exts.contains(&ext) {
            exts.push(ext);
        }
    }
    exts
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Extensions eligible for line counting.
    pub text_extensions: Vec<String>,
    /// When non-empty, only files with these extensions are considered.
    pub include_extensions: Vec<String>,
    /// Worker threads; `0` means one per logical CPU.
    pub threads: usize,
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            text_extensions: parse_extension_list(DEFAULT_TEXT_EXTENSIONS),
            include_extensions: Vec::new(),
            threads: 0,
            follow_links: false,
        }
    }
}

impl ScanOptions {
    pub fn with_text_extensions(mut self, list: &str) -> Self {
        self.text_extensions = parse_extension_list(list);
        self
    }

    pub fn with_include_extensions(mut self, list: &str) -> Self {
        self.include_extensions = parse_extension_list(list);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn is_text(&self, ext: &str) -> bool {
        self.text_extensions.iter().any(|e| e == ext)
    }

    pub fn is_included(&self, ext: &str) -> bool {
        self.include_extensions.is_empty() || self.include_extensions.iter().any(|e| e == ext)
    }

    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}
