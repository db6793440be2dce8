use crate::{
    config::{
        DuplicateReportConfig, FilenameListConfig, OrganizeConfig, OrganizeStrategy,
        RenameConfig, RunMode, WalkConfig,
    },
    dedup::{DuplicateEntry, deduplicate, duplicate_report},
    error::{Error, Result},
    executor::{ExecutionStats, Executor},
    normalize::clean_filenames,
    planner::{DestinationRule, ExtensionRule, PlanItem, Planner, RenameRule},
    scanner::Scanner,
    table::read_table,
    writer::ListWriter,
};
use serde::Serialize;
use std::io::Write;
use tracing::{info, instrument};

/// Which filesystem command a [`FsPipeline`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FsCommand {
    /// `fs rename-basic`
    RenameBasic,
    /// `fs organize-ext`
    OrganizeExt,
}

impl FsCommand {
    const fn empty_message(self) -> &'static str {
        match self {
            Self::RenameBasic => "No files found to rename.",
            Self::OrganizeExt => "No files found to organize.",
        }
    }
}

/// Statistics from a rename or organize run.
#[derive(Debug, Clone, Serialize)]
pub struct FsStats {
    /// Command that produced these statistics
    pub command: FsCommand,

    /// Whether anything was changed on disk
    pub dry_run: bool,

    /// Regular files found
    pub files_found: usize,

    /// Execution counts
    #[serde(flatten)]
    pub execution: ExecutionStats,

    /// The full plan, in execution order
    pub plan: Vec<PlanItem>,
}

impl FsStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        if self.files_found == 0 {
            return;
        }

        let e = &self.execution;
        if self.dry_run {
            println!(
                "Planned {} operation(s): {} unchanged, {} conflict-adjusted. Nothing was changed; pass --apply to execute.",
                e.planned, e.unchanged, e.conflicts
            );
        } else {
            println!(
                "Completed {} operation(s): {} moved, {} unchanged, {} skipped, {} conflict-adjusted.",
                e.planned, e.moved, e.unchanged, e.skipped, e.conflicts
            );
        }
    }
}

/// Walk → plan → execute, shared by the rename and organize commands.
pub struct FsPipeline<R> {
    command: FsCommand,
    walk: WalkConfig,
    mode: RunMode,
    rule: R,
}

/// Pipeline behind `fs rename-basic`.
pub type RenamePipeline = FsPipeline<RenameRule>;

/// Pipeline behind `fs organize-ext`.
pub type OrganizePipeline = FsPipeline<ExtensionRule>;

impl FsPipeline<RenameRule> {
    /// Creates the `rename-basic` pipeline.
    #[must_use]
    pub fn rename(config: RenameConfig) -> Self {
        Self {
            command: FsCommand::RenameBasic,
            walk: config.walk,
            mode: config.mode,
            rule: RenameRule {
                prefix: config.prefix,
                suffix: config.suffix,
                ext_case: config.ext_case,
            },
        }
    }
}

impl FsPipeline<ExtensionRule> {
    /// Creates the `organize-ext` pipeline.
    #[must_use]
    pub fn organize(config: OrganizeConfig) -> Self {
        let rule = match config.strategy {
            OrganizeStrategy::Extension => ExtensionRule {
                target_root: config.target_root,
            },
        };

        Self {
            command: FsCommand::OrganizeExt,
            walk: config.walk,
            mode: config.mode,
            rule,
        }
    }
}

impl<R: DestinationRule> FsPipeline<R> {
    /// Executes the pipeline, writing plan lines to `out`.
    ///
    /// # Process
    ///
    /// 1. **Scan**: enumerate regular files under the directory
    /// 2. **Plan**: compute every destination, resolving conflicts
    /// 3. **Execute**: print each item and, in apply mode, move it
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or a move fails.
    #[instrument(skip(self, out), fields(root_dir = %self.walk.root_dir.display(), mode = self.mode.label()))]
    pub fn run<W: Write>(self, out: &mut W) -> Result<FsStats> {
        let scanner = Scanner::new(&self.walk)?;
        let files = scanner.scan();
        info!("Found {} files", files.len());

        let mut stats = FsStats {
            command: self.command,
            dry_run: self.mode.is_dry_run(),
            files_found: files.len(),
            execution: ExecutionStats::default(),
            plan: Vec::new(),
        };

        if files.is_empty() {
            writeln!(out, "{}", self.command.empty_message())
                .map_err(|e| Error::unexpected(e.to_string()))?;
            return Ok(stats);
        }

        let plan = Planner::new(self.rule).plan(&files);
        info!("Planned {} operations", plan.len());

        stats.execution = Executor::new(self.mode).execute(&plan, out)?;
        stats.plan = plan;

        info!(
            "Finished: {} moved, {} unchanged, {} skipped",
            stats.execution.moved, stats.execution.unchanged, stats.execution.skipped
        );
        Ok(stats)
    }
}

/// Statistics from `excel-to-filenames`.
#[derive(Debug, Clone, Serialize)]
pub struct FilenameListStats {
    /// Data rows in the input
    pub total_rows: usize,

    /// Filenames left after cleaning
    pub cleaned_count: usize,

    /// Filenames written
    pub deduped_count: usize,

    /// Entries removed by deduplication
    pub duplicates_removed: usize,

    /// Whether deduplication ran
    pub unique: bool,

    /// Output file
    pub output_path: String,
}

impl FilenameListStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("Filename list generated successfully.");
        println!("Total rows: {}", self.total_rows);
        println!("Valid filenames after cleaning: {}", self.cleaned_count);
        if self.unique {
            println!(
                "After deduplication: {} (removed {})",
                self.deduped_count, self.duplicates_removed
            );
        }
        println!("Output saved to: {}", self.output_path);
    }
}

/// Read → select → clean → dedup → write.
pub struct FilenameListPipeline {
    config: FilenameListConfig,
}

impl FilenameListPipeline {
    /// Creates the pipeline.
    #[must_use]
    pub const fn new(config: FilenameListConfig) -> Self {
        Self { config }
    }

    /// Executes the pipeline and writes the output file.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the column does not
    /// resolve, or the output cannot be written.
    #[instrument(skip(self), fields(input = %self.config.input.display(), column = %self.config.column))]
    pub fn run(&self) -> Result<FilenameListStats> {
        let config = &self.config;

        let table = read_table(&config.input)?;
        let values = config.column.extract(&table)?;
        let cleaned = clean_filenames(values, config.clean);

        let (list, removed) = if config.unique {
            deduplicate(&cleaned, config.keep_order)
        } else {
            (cleaned.clone(), 0)
        };

        ListWriter::new(config.encoding).write_lines(&config.output, &list)?;
        info!("Wrote {} filenames to {}", list.len(), config.output.display());

        Ok(FilenameListStats {
            total_rows: table.row_count(),
            cleaned_count: cleaned.len(),
            deduped_count: list.len(),
            duplicates_removed: removed,
            unique: config.unique,
            output_path: config.output.display().to_string(),
        })
    }
}

/// Statistics from `dedup-filename-column`.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReportStats {
    /// Data rows in the input
    pub total_rows: usize,

    /// Filenames left after cleaning
    pub cleaned_count: usize,

    /// Distinct filenames
    pub unique_count: usize,

    /// Filenames that occur more than once
    pub duplicate_name_count: usize,

    /// Occurrences beyond the first, summed over all duplicated names
    pub duplicate_occurrences: usize,

    /// Entries removed by order-preserving deduplication
    pub duplicates_removed: usize,

    /// The duplicated names with their counts
    pub duplicates: Vec<DuplicateEntry>,

    /// Unique list output file
    pub unique_output_path: String,

    /// Duplicate report output file
    pub duplicates_output_path: String,
}

impl DuplicateReportStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("Duplicate analysis completed.");
        println!("Total rows: {}", self.total_rows);
        println!("Valid filenames after cleaning: {}", self.cleaned_count);
        println!("Unique filenames: {}", self.unique_count);
        println!("Duplicate names: {}", self.duplicate_name_count);
        println!(
            "Duplicate occurrences (beyond first): {}",
            self.duplicate_occurrences
        );
        println!("Unique list saved to: {}", self.unique_output_path);
        println!("Duplicates report saved to: {}", self.duplicates_output_path);
    }
}

/// Read → select → clean → unique list + duplicate counts → two files.
pub struct DuplicateReportPipeline {
    config: DuplicateReportConfig,
}

impl DuplicateReportPipeline {
    /// Creates the pipeline.
    #[must_use]
    pub const fn new(config: DuplicateReportConfig) -> Self {
        Self { config }
    }

    /// Executes the pipeline and writes both output files.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read, the column does not
    /// resolve, or an output cannot be written.
    #[instrument(skip(self), fields(input = %self.config.input.display(), column = %self.config.column))]
    pub fn run(&self) -> Result<DuplicateReportStats> {
        let config = &self.config;

        let table = read_table(&config.input)?;
        let values = config.column.extract(&table)?;
        let cleaned = clean_filenames(values, config.clean);

        let (unique, removed) = deduplicate(&cleaned, true);
        let duplicates = duplicate_report(&cleaned);

        let writer = ListWriter::new(config.encoding);
        writer.write_lines(&config.unique_output, &unique)?;
        writer.write_lines(
            &config.duplicates_output,
            duplicates.iter().map(ToString::to_string),
        )?;
        info!(
            "Found {} duplicated names among {} filenames",
            duplicates.len(),
            cleaned.len()
        );

        Ok(DuplicateReportStats {
            total_rows: table.row_count(),
            cleaned_count: cleaned.len(),
            unique_count: unique.len(),
            duplicate_name_count: duplicates.len(),
            duplicate_occurrences: duplicates.iter().map(|d| d.count - 1).sum(),
            duplicates_removed: removed,
            duplicates,
            unique_output_path: config.unique_output.display().to_string(),
            duplicates_output_path: config.duplicates_output.display().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    const NAMES_CSV: &str = "id,name\n1,x.txt\n2,x.txt\n3, y.txt \n4,\n";

    #[test]
    fn test_filename_list_defaults() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("names.csv").write_str(NAMES_CSV).unwrap();
        let output = temp.child("list.txt");

        let config = FilenameListConfig::builder()
            .input(temp.path().join("names.csv"))
            .column("name")
            .output(output.path())
            .build()
            .unwrap();
        let stats = FilenameListPipeline::new(config).run().unwrap();

        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.cleaned_count, 3);
        assert_eq!(stats.deduped_count, 2);
        assert_eq!(stats.duplicates_removed, 1);
        output.assert("x.txt\ny.txt");
    }

    #[test]
    fn test_filename_list_without_unique() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("names.csv").write_str(NAMES_CSV).unwrap();
        let output = temp.child("list.txt");

        let config = FilenameListConfig::builder()
            .input(temp.path().join("names.csv"))
            .column("1")
            .output(output.path())
            .unique(false)
            .build()
            .unwrap();
        let stats = FilenameListPipeline::new(config).run().unwrap();

        assert_eq!(stats.duplicates_removed, 0);
        output.assert("x.txt\nx.txt\ny.txt");
    }

    #[test]
    fn test_filename_list_sorted() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("names.csv")
            .write_str("name\nc.txt\na.txt\nc.txt\nb.txt\n")
            .unwrap();
        let output = temp.child("list.txt");

        let config = FilenameListConfig::builder()
            .input(temp.path().join("names.csv"))
            .column("name")
            .output(output.path())
            .keep_order(false)
            .build()
            .unwrap();
        FilenameListPipeline::new(config).run().unwrap();

        output.assert("a.txt\nb.txt\nc.txt");
    }

    #[test]
    fn test_bad_column_writes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("names.csv").write_str(NAMES_CSV).unwrap();
        let output = temp.child("list.txt");

        let config = FilenameListConfig::builder()
            .input(temp.path().join("names.csv"))
            .column("5")
            .output(output.path())
            .build()
            .unwrap();
        let err = FilenameListPipeline::new(config).run().unwrap_err();

        assert!(matches!(err, Error::ColumnOutOfRange { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_duplicate_report() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("names.csv").write_str(NAMES_CSV).unwrap();
        let unique = temp.child("unique.txt");
        let duplicates = temp.child("dups.txt");

        let config = DuplicateReportConfig::builder()
            .input(temp.path().join("names.csv"))
            .column("name")
            .unique_output(unique.path())
            .duplicates_output(duplicates.path())
            .build()
            .unwrap();
        let stats = DuplicateReportPipeline::new(config).run().unwrap();

        unique.assert("x.txt\ny.txt");
        duplicates.assert("x.txt,2");
        assert_eq!(stats.unique_count, 2);
        assert_eq!(stats.duplicate_name_count, 1);
        assert_eq!(stats.duplicate_occurrences, stats.duplicates_removed);
    }

    #[test]
    fn test_organize_dry_run_scenario() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.JPG").write_str("a").unwrap();
        temp.child("b.jpg").write_str("b").unwrap();

        let config = OrganizeConfig::builder()
            .root_dir(temp.path())
            .dry_run(true)
            .build()
            .unwrap();
        let mut out = Vec::new();
        let stats = FsPipeline::organize(config).run(&mut out).unwrap();

        let destinations: Vec<_> = stats.plan.iter().map(|i| i.destination.clone()).collect();
        assert_eq!(
            destinations,
            vec![
                temp.path().join("jpg").join("a.JPG"),
                temp.path().join("jpg").join("b.jpg"),
            ]
        );
        assert!(!temp.child("jpg").exists());
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn test_rename_apply() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("report.TXT").write_str("r").unwrap();
        temp.child("new_report.TXT").write_str("existing").unwrap();

        let config = RenameConfig::builder()
            .root_dir(temp.path())
            .prefix("new_")
            .apply(true)
            .build()
            .unwrap();
        let stats = FsPipeline::rename(config).run(&mut Vec::new()).unwrap();

        // new_report.TXT itself becomes new_new_report.TXT; report.TXT must not clobber it.
        assert_eq!(stats.execution.moved, 2);
        temp.child("new_new_report.TXT").assert("existing");
        temp.child("new_report_1.TXT").assert("r");
    }

    #[test]
    fn test_empty_directory_message() {
        let temp = assert_fs::TempDir::new().unwrap();

        let config = RenameConfig::builder().root_dir(temp.path()).build().unwrap();
        let mut out = Vec::new();
        let stats = FsPipeline::rename(config).run(&mut out).unwrap();

        assert_eq!(stats.files_found, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "No files found to rename.\n");
    }
}
