use crate::{
    config::WalkConfig,
    error::{Error, Result},
    filter::FileFilter,
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// A regular file found during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path as reached from the walk root
    pub path: PathBuf,

    /// Path relative to the walk root
    pub relative_path: PathBuf,
}

/// Statistics collected during scanning.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScanStats {
    /// Regular files kept
    pub files: usize,

    /// Entries that are not regular files (directories, symlinks, ...)
    pub non_files: usize,

    /// Files dropped by exclude patterns
    pub excluded: usize,

    /// Entries that could not be read
    pub errors: usize,
}

/// Enumerates regular files under a directory.
pub(crate) struct Scanner {
    root_dir: PathBuf,
    recursive: bool,
    file_filter: FileFilter,
}

impl Scanner {
    /// Creates a new scanner from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or an exclude pattern is invalid.
    pub(crate) fn new(config: &WalkConfig) -> Result<Self> {
        if !config.root_dir.is_dir() {
            return Err(Error::directory_not_found(&config.root_dir));
        }

        Ok(Self {
            root_dir: config.root_dir.clone(),
            recursive: config.recursive,
            file_filter: FileFilter::new(&config.exclude)?,
        })
    }

    /// Walks the root directory and returns its regular files sorted by path.
    ///
    /// Symlinks and directories are never returned. Unreadable entries are
    /// logged and skipped.
    pub(crate) fn scan(&self) -> Vec<FileEntry> {
        let mut stats = ScanStats::default();
        let mut files = Vec::new();

        debug!(
            "Scanning {} ({})",
            self.root_dir.display(),
            if self.recursive { "recursive" } else { "top level" }
        );

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&self.root_dir)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false);

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Walk error: {}", e);
                    stats.errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                stats.non_files += 1;
                continue;
            }

            let relative_path = self.relative(entry.path());
            if !self.file_filter.should_process(&relative_path) {
                trace!("Excluded {}", relative_path.display());
                stats.excluded += 1;
                continue;
            }

            stats.files += 1;
            files.push(FileEntry {
                path: entry.into_path(),
                relative_path,
            });
        }

        debug!(
            "Scan complete: {} files, {} other entries, {} excluded, {} errors",
            stats.files, stats.non_files, stats.excluded, stats.errors
        );

        if stats.errors > 0 {
            warn!(
                "Encountered {} errors during scanning (non-fatal)",
                stats.errors
            );
        }

        // Sort for deterministic ordering
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn relative(&self, path: &Path) -> PathBuf {
        pathdiff::diff_paths(path, &self.root_dir).unwrap_or_else(|| path.to_path_buf())
    }
}
