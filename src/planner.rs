//! Destination planning for rename and organize operations.
//!
//! A [`DestinationRule`] maps a source path to its desired destination; the
//! [`Planner`] applies the rule to a batch and resolves naming conflicts by
//! appending `_1`, `_2`, ... to the destination stem.

use crate::config::ExtCase;
use crate::scanner::FileEntry;
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

const NO_EXTENSION_FOLDER: &str = "no_ext";

/// Computes the desired destination for a source file.
pub trait DestinationRule {
    /// Returns the destination before conflict resolution.
    fn destination(&self, source: &Path) -> PathBuf;
}

/// `prefix + stem + suffix + extension`, in the same directory.
#[derive(Debug, Clone, Default)]
pub struct RenameRule {
    /// Text added before the stem
    pub prefix: Option<String>,
    /// Text added after the stem
    pub suffix: Option<String>,
    /// Extension case transform
    pub ext_case: ExtCase,
}

/// Splits a file name into stem and extension.
///
/// A trailing dot (`file.`) is part of the stem, not an empty extension.
fn split_name(path: &Path) -> (&OsStr, Option<&OsStr>) {
    match path.extension().filter(|ext| !ext.is_empty()) {
        Some(extension) => (path.file_stem().unwrap_or_default(), Some(extension)),
        None => (path.file_name().unwrap_or_default(), None),
    }
}

impl DestinationRule for RenameRule {
    fn destination(&self, source: &Path) -> PathBuf {
        let (stem, extension) = split_name(source);
        let mut name = OsString::new();

        if let Some(prefix) = &self.prefix {
            name.push(prefix);
        }
        name.push(stem);
        if let Some(suffix) = &self.suffix {
            name.push(suffix);
        }

        if let Some(extension) = extension {
            name.push(".");
            match self.ext_case {
                ExtCase::Keep => name.push(extension),
                case => name.push(case.apply(&extension.to_string_lossy())),
            }
        }

        source.with_file_name(name)
    }
}

/// `target_root / <lowercased extension or no_ext> / file_name`.
#[derive(Debug, Clone)]
pub struct ExtensionRule {
    /// Root under which extension folders live
    pub target_root: PathBuf,
}

impl ExtensionRule {
    /// Folder name for a file: its lowercased extension, or `no_ext`.
    #[must_use]
    pub fn folder_for(source: &Path) -> String {
        source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| NO_EXTENSION_FOLDER.to_string())
    }
}

impl DestinationRule for ExtensionRule {
    fn destination(&self, source: &Path) -> PathBuf {
        let folder = Self::folder_for(source);
        let file_name = source.file_name().unwrap_or_default();
        self.target_root.join(folder).join(file_name)
    }
}

/// One planned rename or move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    /// File being renamed or moved
    pub source: PathBuf,

    /// Final destination after conflict resolution
    pub destination: PathBuf,

    /// True when a `_N` suffix was added
    pub conflict_adjusted: bool,
}

impl PlanItem {
    /// Returns true when the destination equals the source.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.source == self.destination
    }
}

/// Returns `target` if free, otherwise the first `stem_N.ext` (N = 1, 2, ...)
/// that does not exist on disk.
#[must_use]
pub fn resolve_conflict(target: &Path) -> PathBuf {
    next_free_candidate(target, |candidate| candidate.exists())
}

fn next_free_candidate(target: &Path, is_taken: impl Fn(&Path) -> bool) -> PathBuf {
    if !is_taken(target) {
        return target.to_path_buf();
    }

    let (stem, extension) = split_name(target);

    (1u64..)
        .map(|counter| {
            let mut name = OsString::from(stem);
            name.push(format!("_{counter}"));
            if let Some(extension) = extension {
                name.push(".");
                name.push(extension);
            }
            target.with_file_name(name)
        })
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| target.to_path_buf())
}

/// Plans destinations for a batch of files.
///
/// Destinations claimed by earlier items in the same batch count as taken,
/// so no two items in one plan share a destination.
pub struct Planner<R> {
    rule: R,
    claimed: HashSet<PathBuf>,
}

impl<R: DestinationRule> Planner<R> {
    /// Creates a planner around a destination rule.
    pub fn new(rule: R) -> Self {
        Self {
            rule,
            claimed: HashSet::new(),
        }
    }

    /// Plans every file in order.
    pub fn plan(&mut self, files: &[FileEntry]) -> Vec<PlanItem> {
        files.iter().map(|file| self.plan_one(&file.path)).collect()
    }

    /// Plans a single file against the live filesystem and earlier claims.
    pub fn plan_one(&mut self, source: &Path) -> PlanItem {
        let desired = self.rule.destination(source);

        let desired_taken = self.claimed.contains(&desired)
            || (desired.as_path() != source && desired.exists());

        let destination = if desired_taken {
            let claimed = &self.claimed;
            next_free_candidate(&desired, |candidate| {
                claimed.contains(candidate) || candidate.exists()
            })
        } else {
            desired.clone()
        };
        let conflict_adjusted = destination != desired;

        if conflict_adjusted {
            debug!(
                "Conflict at {}, using {}",
                desired.display(),
                destination.display()
            );
        }

        self.claimed.insert(destination.clone());
        PlanItem {
            source: source.to_path_buf(),
            destination,
            conflict_adjusted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn entry(path: &Path) -> FileEntry {
        FileEntry {
            path: path.to_path_buf(),
            relative_path: PathBuf::from(path.file_name().unwrap()),
        }
    }

    #[test]
    fn test_rename_rule_prefix_keeps_extension_case() {
        let rule = RenameRule {
            prefix: Some("new_".into()),
            ..RenameRule::default()
        };
        assert_eq!(
            rule.destination(Path::new("dir/report.TXT")),
            PathBuf::from("dir/new_report.TXT")
        );
    }

    #[test]
    fn test_rename_rule_suffix_and_case() {
        let rule = RenameRule {
            prefix: Some("p_".into()),
            suffix: Some("_s".into()),
            ext_case: ExtCase::Lower,
        };
        assert_eq!(
            rule.destination(Path::new("a/Photo.JPG")),
            PathBuf::from("a/p_Photo_s.jpg")
        );

        let upper = RenameRule {
            ext_case: ExtCase::Upper,
            ..RenameRule::default()
        };
        assert_eq!(
            upper.destination(Path::new("archive.tar.gz")),
            PathBuf::from("archive.tar.GZ")
        );
    }

    #[test]
    fn test_rename_rule_without_extension() {
        let rule = RenameRule {
            suffix: Some("_v2".into()),
            ext_case: ExtCase::Upper,
            ..RenameRule::default()
        };
        assert_eq!(
            rule.destination(Path::new("README")),
            PathBuf::from("README_v2")
        );
        assert_eq!(
            rule.destination(Path::new(".env")),
            PathBuf::from(".env_v2")
        );
    }

    #[test]
    fn test_trailing_dot_is_part_of_stem() {
        let rule = RenameRule {
            suffix: Some("_v".into()),
            ext_case: ExtCase::Upper,
            ..RenameRule::default()
        };
        assert_eq!(
            rule.destination(Path::new("dir/file.")),
            PathBuf::from("dir/file._v")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_trailing_dot_conflict_candidate() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("file.").write_str("").unwrap();
        assert_eq!(
            resolve_conflict(&temp.path().join("file.")),
            temp.path().join("file._1")
        );
    }

    #[test]
    fn test_extension_rule() {
        let rule = ExtensionRule {
            target_root: PathBuf::from("out"),
        };
        assert_eq!(
            rule.destination(Path::new("src/a.JPG")),
            PathBuf::from("out/jpg/a.JPG")
        );
        assert_eq!(
            rule.destination(Path::new("src/Makefile")),
            PathBuf::from("out/no_ext/Makefile")
        );
        assert_eq!(ExtensionRule::folder_for(Path::new("x.tar.GZ")), "gz");
    }

    #[test]
    fn test_resolve_conflict_picks_lowest_free_suffix() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("").unwrap();
        temp.child("a_1.txt").write_str("").unwrap();
        temp.child("a_3.txt").write_str("").unwrap();

        let resolved = resolve_conflict(&temp.path().join("a.txt"));
        assert_eq!(resolved, temp.path().join("a_2.txt"));
        assert!(!resolved.exists());

        // Same state, same answer.
        assert_eq!(resolve_conflict(&temp.path().join("a.txt")), resolved);

        let free = temp.path().join("b.txt");
        assert_eq!(resolve_conflict(&free), free);
    }

    #[test]
    fn test_noop_rename_plan() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("x.doc").write_str("").unwrap();
        temp.child("y").write_str("").unwrap();

        let files = vec![
            entry(&temp.path().join("x.doc")),
            entry(&temp.path().join("y")),
        ];
        let plan = Planner::new(RenameRule::default()).plan(&files);

        assert!(plan.iter().all(PlanItem::is_noop));
        assert!(plan.iter().all(|item| !item.conflict_adjusted));
    }

    #[test]
    fn test_plan_avoids_existing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("report.txt").write_str("").unwrap();
        temp.child("new_report.txt").write_str("").unwrap();

        let mut planner = Planner::new(RenameRule {
            prefix: Some("new_".into()),
            ..RenameRule::default()
        });
        let item = planner.plan_one(&temp.path().join("report.txt"));

        assert_eq!(item.destination, temp.path().join("new_report_1.txt"));
        assert!(item.conflict_adjusted);
    }

    #[test]
    fn test_plan_avoids_destinations_claimed_in_batch() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("one/a.jpg").write_str("").unwrap();
        temp.child("two/a.jpg").write_str("").unwrap();

        let target = temp.path().join("sorted");
        let files = vec![
            entry(&temp.path().join("one/a.jpg")),
            entry(&temp.path().join("two/a.jpg")),
        ];
        let plan = Planner::new(ExtensionRule {
            target_root: target.clone(),
        })
        .plan(&files);

        assert_eq!(plan[0].destination, target.join("jpg/a.jpg"));
        assert_eq!(plan[1].destination, target.join("jpg/a_1.jpg"));
        assert!(plan[1].conflict_adjusted);
    }

    #[test]
    fn test_organize_in_place_is_noop() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("jpg/a.jpg").write_str("").unwrap();

        let mut planner = Planner::new(ExtensionRule {
            target_root: temp.path().to_path_buf(),
        });
        let item = planner.plan_one(&temp.path().join("jpg/a.jpg"));
        assert!(item.is_noop());
    }
}
