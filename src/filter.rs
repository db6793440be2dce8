//! Glob-based exclusion of files during directory walks.

use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;

#[derive(Debug, Clone)]
pub(crate) struct FileFilter {
    exclude: GlobSet,
}

impl FileFilter {
    /// Compiles the exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first invalid pattern.
    pub(crate) fn new(patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| {
                Error::config(format!("Invalid glob pattern '{pattern}': {e}"))
            })?;
            builder.add(glob);
        }

        let exclude = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build glob set: {e}")))?;

        Ok(Self { exclude })
    }

    /// Decides whether a file, given relative to the walk root, is kept.
    ///
    /// A file is dropped when it or any of its parent directories matches.
    pub(crate) fn should_process(&self, relative: &Path) -> bool {
        if self.exclude.is_empty() {
            return true;
        }

        !relative
            .ancestors()
            .filter(|p| !p.as_os_str().is_empty())
            .any(|p| self.exclude.is_match(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(patterns: &[&str]) -> FileFilter {
        let patterns: Vec<String> = patterns.iter().map(|p| (*p).to_string()).collect();
        FileFilter::new(&patterns).unwrap()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let f = filter(&[]);
        assert!(f.should_process(Path::new("a/b/c.txt")));
    }

    #[test]
    fn test_excludes_by_file_pattern() {
        let f = filter(&["*.tmp"]);
        assert!(!f.should_process(Path::new("scratch.tmp")));
        assert!(f.should_process(Path::new("report.docx")));
    }

    #[test]
    fn test_excludes_by_directory() {
        let f = filter(&["archive"]);
        assert!(!f.should_process(Path::new("archive/old.pdf")));
        assert!(f.should_process(Path::new("current/new.pdf")));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FileFilter::new(&["a[".to_string()]).unwrap_err();
        assert!(err.to_string().contains("a["));
    }
}
