use crate::{
    config::RunMode,
    error::{Error, Result},
    planner::PlanItem,
};
use serde::Serialize;
use std::{fs, io, io::Write, path::Path};
use tracing::{debug, warn};

/// Counts from executing a plan.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionStats {
    /// Items in the plan
    pub planned: usize,

    /// Items whose destination needed a `_N` suffix
    pub conflicts: usize,

    /// Files actually renamed or moved
    pub moved: usize,

    /// Items whose destination equals the source
    pub unchanged: usize,

    /// Sources that disappeared before they could be moved
    pub skipped: usize,
}

/// Prints a plan and, in apply mode, carries it out.
pub(crate) struct Executor {
    mode: RunMode,
}

impl Executor {
    pub(crate) const fn new(mode: RunMode) -> Self {
        Self { mode }
    }

    /// Writes one `[LABEL] source -> destination` line per item to `out`
    /// and performs the operation unless in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns an error on the first failed filesystem operation; items
    /// after it are not attempted.
    pub(crate) fn execute<W: Write>(&self, plan: &[PlanItem], out: &mut W) -> Result<ExecutionStats> {
        let mut stats = ExecutionStats {
            planned: plan.len(),
            conflicts: plan.iter().filter(|item| item.conflict_adjusted).count(),
            ..ExecutionStats::default()
        };

        for item in plan {
            writeln!(
                out,
                "[{}] {} -> {}",
                self.mode.label(),
                item.source.display(),
                item.destination.display()
            )
            .map_err(|e| Error::unexpected(format!("failed to write plan output: {e}")))?;

            if item.is_noop() {
                stats.unchanged += 1;
                continue;
            }

            if self.mode.is_dry_run() {
                continue;
            }

            if !item.source.is_file() {
                warn!(
                    "Source vanished before it could be moved: {}",
                    item.source.display()
                );
                stats.skipped += 1;
                continue;
            }

            if let Some(parent) = item.destination.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            move_file(&item.source, &item.destination)?;
            stats.moved += 1;
        }

        Ok(stats)
    }
}

/// Renames `source` to `destination`, copying across filesystems when a
/// plain rename is impossible.
fn move_file(source: &Path, destination: &Path) -> Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => {
            debug!("Renamed {} -> {}", source.display(), destination.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(
                "Cross-device move {} -> {}",
                source.display(),
                destination.display()
            );
            fs::copy(source, destination).map_err(|e| Error::io(destination, e))?;
            fs::remove_file(source).map_err(|e| Error::io(source, e))
        }
        Err(e) => Err(Error::io(source, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::path::PathBuf;

    fn item(source: PathBuf, destination: PathBuf) -> PlanItem {
        PlanItem {
            source,
            destination,
            conflict_adjusted: false,
        }
    }

    #[test]
    fn test_dry_run_prints_and_changes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();

        let plan = vec![item(temp.path().join("a.txt"), temp.path().join("b/a.txt"))];
        let mut out = Vec::new();
        let stats = Executor::new(RunMode::DryRun)
            .execute(&plan, &mut out)
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("[DRY-RUN] "));
        assert!(printed.contains(" -> "));
        assert_eq!(stats.moved, 0);
        temp.child("a.txt").assert("a");
        assert!(!temp.child("b").exists());
    }

    #[test]
    fn test_apply_moves_and_creates_parents() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();

        let plan = vec![item(
            temp.path().join("a.txt"),
            temp.path().join("deep/er/a.txt"),
        )];
        let mut out = Vec::new();
        let stats = Executor::new(RunMode::Apply)
            .execute(&plan, &mut out)
            .unwrap();

        assert_eq!(stats.moved, 1);
        assert!(String::from_utf8(out).unwrap().starts_with("[APPLY] "));
        assert!(!temp.child("a.txt").exists());
        temp.child("deep/er/a.txt").assert("a");
    }

    #[test]
    fn test_apply_noop_creates_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("a").unwrap();

        let path = temp.path().join("a.txt");
        let plan = vec![item(path.clone(), path)];
        let stats = Executor::new(RunMode::Apply)
            .execute(&plan, &mut Vec::new())
            .unwrap();

        assert_eq!(stats.unchanged, 1);
        assert_eq!(stats.moved, 0);
        temp.child("a.txt").assert("a");
    }

    #[test]
    fn test_apply_skips_vanished_source() {
        let temp = assert_fs::TempDir::new().unwrap();

        let plan = vec![item(
            temp.path().join("gone.txt"),
            temp.path().join("x/gone.txt"),
        )];
        let stats = Executor::new(RunMode::Apply)
            .execute(&plan, &mut Vec::new())
            .unwrap();

        assert_eq!(stats.skipped, 1);
        assert!(!temp.child("x").exists());
    }
}
