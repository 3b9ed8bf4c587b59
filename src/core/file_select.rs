use crate::utils::error::{EtlError, Result};
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Finds export files under a directory tree by file-name convention.
pub struct FileSelector {
    pattern: Regex,
}

impl FileSelector {
    /// `pattern` is matched case-insensitively against the base file name only.
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.is_match(name))
    }

    /// Every matching file under `root`, recursively.
    pub fn candidates(&self, root: &Path) -> Result<Vec<ExportFile>> {
        if !root.is_dir() {
            return Err(EtlError::not_found(format!(
                "source directory {} does not exist",
                root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches(entry.path()) {
                continue;
            }

            let modified = entry
                .metadata()
                .map_err(std::io::Error::from)?
                .modified()?;
            files.push(ExportFile {
                path: entry.into_path(),
                modified,
            });
        }

        Ok(files)
    }

    /// Newest matching file. Files sharing the newest timestamp are ordered by path and
    /// the lexicographically greatest wins.
    pub fn select_latest(&self, root: &Path) -> Result<ExportFile> {
        let candidates = self.candidates(root)?;
        tracing::debug!("Found {} candidate export files", candidates.len());

        candidates
            .into_iter()
            .max_by(|a, b| {
                a.modified
                    .cmp(&b.modified)
                    .then_with(|| a.path.cmp(&b.path))
            })
            .ok_or_else(|| {
                EtlError::not_found(format!(
                    "no file under {} matches '{}'",
                    root.display(),
                    self.pattern.as_str()
                ))
            })
    }
}
