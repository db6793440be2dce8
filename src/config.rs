use crate::column::ColumnSelector;
use crate::error::{Error, Result};
use crate::normalize::CleanOptions;
use crate::writer::OutputEncoding;
use std::path::PathBuf;

const DEFAULT_FILENAME_LIST_OUTPUT: &str = "filename_list.txt";
const DEFAULT_UNIQUE_OUTPUT: &str = "unique_filenames.txt";
const DEFAULT_DUPLICATES_OUTPUT: &str = "duplicate_filenames.txt";
const DEFAULT_ENCODING: &str = "utf-8";

/// Whether filesystem commands only print their plan or carry it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Print planned operations, change nothing
    DryRun,
    /// Perform the planned operations
    Apply,
}

impl RunMode {
    /// Resolves the `--dry-run` / `--apply` pair.
    ///
    /// Dry-run is the default and wins when both flags are given.
    #[must_use]
    pub const fn from_flags(dry_run: bool, apply: bool) -> Self {
        if apply && !dry_run {
            Self::Apply
        } else {
            Self::DryRun
        }
    }

    /// Label printed in front of every planned operation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DryRun => "DRY-RUN",
            Self::Apply => "APPLY",
        }
    }

    /// Returns true when nothing may be changed on disk.
    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

/// Case transform applied to extensions when renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtCase {
    /// Leave the extension as it is
    #[default]
    Keep,
    /// Lowercase the extension
    Lower,
    /// Uppercase the extension
    Upper,
}

impl ExtCase {
    /// Resolves the `--lower-ext` / `--upper-ext` pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingFlags`] when both are set.
    pub fn from_flags(lower: bool, upper: bool) -> Result<Self> {
        match (lower, upper) {
            (true, true) => Err(Error::ConflictingFlags {
                first: "--lower-ext",
                second: "--upper-ext",
            }),
            (true, false) => Ok(Self::Lower),
            (false, true) => Ok(Self::Upper),
            (false, false) => Ok(Self::Keep),
        }
    }

    /// Applies the transform to an extension.
    #[must_use]
    pub fn apply(self, extension: &str) -> String {
        match self {
            Self::Keep => extension.to_string(),
            Self::Lower => extension.to_lowercase(),
            Self::Upper => extension.to_uppercase(),
        }
    }
}

/// How `organize-ext` groups files into folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrganizeStrategy {
    /// One folder per lowercased extension
    #[default]
    Extension,
}

/// Which files a filesystem command visits.
#[derive(Debug, Clone)]
pub struct WalkConfig {
    /// Base directory to enumerate
    pub root_dir: PathBuf,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Glob patterns, relative to `root_dir`, of files to skip
    pub exclude: Vec<String>,
}

impl WalkConfig {
    fn validate(&self) -> Result<()> {
        if !self.root_dir.is_dir() {
            return Err(Error::directory_not_found(&self.root_dir));
        }
        crate::filter::FileFilter::new(&self.exclude)?;
        Ok(())
    }
}

/// Configuration for `fs rename-basic`.
///
/// Use [`RenameConfig::builder()`] to construct one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct RenameConfig {
    /// Files to visit
    pub walk: WalkConfig,

    /// Text added before the file stem
    pub prefix: Option<String>,

    /// Text added after the file stem
    pub suffix: Option<String>,

    /// Extension case transform
    pub ext_case: ExtCase,

    /// Dry-run or apply
    pub mode: RunMode,
}

impl RenameConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use office_toolbox::RenameConfig;
    ///
    /// let config = RenameConfig::builder()
    ///     .root_dir("./scans")
    ///     .prefix("2024_")
    ///     .lower_ext(true)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> RenameConfigBuilder {
        RenameConfigBuilder::default()
    }
}

/// Builder for creating a [`RenameConfig`].
#[derive(Debug, Default)]
pub struct RenameConfigBuilder {
    root_dir: Option<PathBuf>,
    recursive: bool,
    exclude: Vec<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    lower_ext: bool,
    upper_ext: bool,
    dry_run: bool,
    apply: bool,
}

impl RenameConfigBuilder {
    /// Sets the directory to process.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Enables recursive traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    /// Sets glob patterns of files to skip.
    #[must_use]
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Sets the prefix added before each stem.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the suffix added after each stem.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Requests lowercase extensions.
    #[must_use]
    pub fn lower_ext(mut self, enabled: bool) -> Self {
        self.lower_ext = enabled;
        self
    }

    /// Requests uppercase extensions.
    #[must_use]
    pub fn upper_ext(mut self, enabled: bool) -> Self {
        self.upper_ext = enabled;
        self
    }

    /// Forces dry-run mode.
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Requests that the renames are carried out.
    #[must_use]
    pub fn apply(mut self, enabled: bool) -> Self {
        self.apply = enabled;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Both extension case flags are set
    /// - The directory is missing or not a directory
    /// - An exclude pattern is not a valid glob
    pub fn build(self) -> Result<RenameConfig> {
        let ext_case = ExtCase::from_flags(self.lower_ext, self.upper_ext)?;

        let walk = WalkConfig {
            root_dir: self
                .root_dir
                .ok_or_else(|| Error::config("directory is required"))?,
            recursive: self.recursive,
            exclude: self.exclude,
        };
        walk.validate()?;

        Ok(RenameConfig {
            walk,
            prefix: self.prefix.filter(|p| !p.is_empty()),
            suffix: self.suffix.filter(|s| !s.is_empty()),
            ext_case,
            mode: RunMode::from_flags(self.dry_run, self.apply),
        })
    }
}

/// Configuration for `fs organize-ext`.
///
/// Use [`OrganizeConfig::builder()`] to construct one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OrganizeConfig {
    /// Files to visit
    pub walk: WalkConfig,

    /// Root under which extension folders are created
    pub target_root: PathBuf,

    /// Grouping strategy
    pub strategy: OrganizeStrategy,

    /// Dry-run or apply
    pub mode: RunMode,
}

impl OrganizeConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> OrganizeConfigBuilder {
        OrganizeConfigBuilder::default()
    }
}

/// Builder for creating an [`OrganizeConfig`].
#[derive(Debug, Default)]
pub struct OrganizeConfigBuilder {
    root_dir: Option<PathBuf>,
    recursive: bool,
    exclude: Vec<String>,
    target_root: Option<PathBuf>,
    strategy: OrganizeStrategy,
    dry_run: bool,
    apply: bool,
}

impl OrganizeConfigBuilder {
    /// Sets the directory to organize.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Enables recursive traversal.
    #[must_use]
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    /// Sets glob patterns of files to skip.
    #[must_use]
    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Sets the target root. Defaults to the source directory.
    #[must_use]
    pub fn target_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_root = Some(path.into());
        self
    }

    /// Sets the grouping strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: OrganizeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Forces dry-run mode.
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Requests that the moves are carried out.
    #[must_use]
    pub fn apply(mut self, enabled: bool) -> Self {
        self.apply = enabled;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing or an exclude pattern
    /// is not a valid glob.
    pub fn build(self) -> Result<OrganizeConfig> {
        let root_dir = self
            .root_dir
            .ok_or_else(|| Error::config("directory is required"))?;

        let walk = WalkConfig {
            root_dir: root_dir.clone(),
            recursive: self.recursive,
            exclude: self.exclude,
        };
        walk.validate()?;

        Ok(OrganizeConfig {
            walk,
            target_root: self.target_root.unwrap_or(root_dir),
            strategy: self.strategy,
            mode: RunMode::from_flags(self.dry_run, self.apply),
        })
    }
}

/// Configuration for `list excel-to-filenames`.
///
/// Use [`FilenameListConfig::builder()`] to construct one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FilenameListConfig {
    /// CSV/text or spreadsheet input
    pub input: PathBuf,

    /// Column to extract
    pub column: ColumnSelector,

    /// Output text file
    pub output: PathBuf,

    /// Output encoding
    pub encoding: OutputEncoding,

    /// Trimming and empty-value policy
    pub clean: CleanOptions,

    /// Remove duplicates
    pub unique: bool,

    /// Keep first-occurrence order when removing duplicates
    pub keep_order: bool,
}

impl FilenameListConfig {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use office_toolbox::FilenameListConfig;
    ///
    /// let config = FilenameListConfig::builder()
    ///     .input("names.xlsx")
    ///     .column("filename")
    ///     .build()
    ///     .expect("valid configuration");
    /// assert!(config.unique);
    /// ```
    #[must_use]
    pub fn builder() -> FilenameListConfigBuilder {
        FilenameListConfigBuilder::default()
    }
}

/// Builder for creating a [`FilenameListConfig`].
#[derive(Debug, Default)]
pub struct FilenameListConfigBuilder {
    input: Option<PathBuf>,
    column: Option<String>,
    output: Option<PathBuf>,
    encoding: Option<String>,
    strip_spaces: Option<bool>,
    drop_empty: Option<bool>,
    unique: Option<bool>,
    keep_order: Option<bool>,
}

impl FilenameListConfigBuilder {
    /// Sets the input file.
    #[must_use]
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Sets the column selector (name or zero-based index).
    #[must_use]
    pub fn column(mut self, selector: impl Into<String>) -> Self {
        self.column = Some(selector.into());
        self
    }

    /// Sets the output path.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the output encoding label.
    #[must_use]
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Enables or disables whitespace trimming.
    #[must_use]
    pub fn strip_spaces(mut self, enabled: bool) -> Self {
        self.strip_spaces = Some(enabled);
        self
    }

    /// Enables or disables dropping empty values.
    #[must_use]
    pub fn drop_empty(mut self, enabled: bool) -> Self {
        self.drop_empty = Some(enabled);
        self
    }

    /// Enables or disables deduplication.
    #[must_use]
    pub fn unique(mut self, enabled: bool) -> Self {
        self.unique = Some(enabled);
        self
    }

    /// Chooses between first-occurrence order and sorted output.
    #[must_use]
    pub fn keep_order(mut self, enabled: bool) -> Self {
        self.keep_order = Some(enabled);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or column is missing or the encoding
    /// label is unknown.
    pub fn build(self) -> Result<FilenameListConfig> {
        Ok(FilenameListConfig {
            input: self
                .input
                .ok_or_else(|| Error::config("input file is required"))?,
            column: ColumnSelector::parse(
                &self
                    .column
                    .ok_or_else(|| Error::config("column is required"))?,
            ),
            output: self
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FILENAME_LIST_OUTPUT)),
            encoding: OutputEncoding::for_label(
                self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING),
            )?,
            clean: CleanOptions {
                strip_spaces: self.strip_spaces.unwrap_or(true),
                drop_empty: self.drop_empty.unwrap_or(true),
            },
            unique: self.unique.unwrap_or(true),
            keep_order: self.keep_order.unwrap_or(true),
        })
    }
}

/// Configuration for `list dedup-filename-column`.
///
/// Use [`DuplicateReportConfig::builder()`] to construct one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DuplicateReportConfig {
    /// CSV/text or spreadsheet input
    pub input: PathBuf,

    /// Column to analyze
    pub column: ColumnSelector,

    /// Where the unique list is written
    pub unique_output: PathBuf,

    /// Where the `name,count` report is written
    pub duplicates_output: PathBuf,

    /// Output encoding
    pub encoding: OutputEncoding,

    /// Trimming and empty-value policy
    pub clean: CleanOptions,
}

impl DuplicateReportConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> DuplicateReportConfigBuilder {
        DuplicateReportConfigBuilder::default()
    }
}

/// Builder for creating a [`DuplicateReportConfig`].
#[derive(Debug, Default)]
pub struct DuplicateReportConfigBuilder {
    input: Option<PathBuf>,
    column: Option<String>,
    unique_output: Option<PathBuf>,
    duplicates_output: Option<PathBuf>,
    encoding: Option<String>,
    strip_spaces: Option<bool>,
    drop_empty: Option<bool>,
}

impl DuplicateReportConfigBuilder {
    /// Sets the input file.
    #[must_use]
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Sets the column selector (name or zero-based index).
    #[must_use]
    pub fn column(mut self, selector: impl Into<String>) -> Self {
        self.column = Some(selector.into());
        self
    }

    /// Sets the unique list output path.
    #[must_use]
    pub fn unique_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.unique_output = Some(path.into());
        self
    }

    /// Sets the duplicate report output path.
    #[must_use]
    pub fn duplicates_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.duplicates_output = Some(path.into());
        self
    }

    /// Sets the output encoding label.
    #[must_use]
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Enables or disables whitespace trimming.
    #[must_use]
    pub fn strip_spaces(mut self, enabled: bool) -> Self {
        self.strip_spaces = Some(enabled);
        self
    }

    /// Enables or disables dropping empty values.
    #[must_use]
    pub fn drop_empty(mut self, enabled: bool) -> Self {
        self.drop_empty = Some(enabled);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or column is missing or the encoding
    /// label is unknown.
    pub fn build(self) -> Result<DuplicateReportConfig> {
        Ok(DuplicateReportConfig {
            input: self
                .input
                .ok_or_else(|| Error::config("input file is required"))?,
            column: ColumnSelector::parse(
                &self
                    .column
                    .ok_or_else(|| Error::config("column is required"))?,
            ),
            unique_output: self
                .unique_output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UNIQUE_OUTPUT)),
            duplicates_output: self
                .duplicates_output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DUPLICATES_OUTPUT)),
            encoding: OutputEncoding::for_label(
                self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING),
            )?,
            clean: CleanOptions {
                strip_spaces: self.strip_spaces.unwrap_or(true),
                drop_empty: self.drop_empty.unwrap_or(true),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_resolution() {
        assert_eq!(RunMode::from_flags(false, false), RunMode::DryRun);
        assert_eq!(RunMode::from_flags(true, false), RunMode::DryRun);
        assert_eq!(RunMode::from_flags(false, true), RunMode::Apply);
        assert_eq!(RunMode::from_flags(true, true), RunMode::DryRun);
        assert_eq!(RunMode::Apply.label(), "APPLY");
    }

    #[test]
    fn test_ext_case() {
        assert_eq!(ExtCase::from_flags(false, false).unwrap(), ExtCase::Keep);
        assert_eq!(ExtCase::from_flags(true, false).unwrap(), ExtCase::Lower);
        assert_eq!(ExtCase::Upper.apply("jpg"), "JPG");
        assert!(matches!(
            ExtCase::from_flags(true, true),
            Err(Error::ConflictingFlags { .. })
        ));
    }

    #[test]
    fn test_rename_conflicting_flags_checked_first() {
        let err = RenameConfig::builder()
            .root_dir("/definitely/not/here")
            .lower_ext(true)
            .upper_ext(true)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ConflictingFlags { .. }));
    }

    #[test]
    fn test_rename_missing_directory() {
        let err = RenameConfig::builder()
            .root_dir("/definitely/not/here")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_directory_must_be_a_directory() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let err = OrganizeConfig::builder().root_dir(&file).build().unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_organize_target_defaults_to_source() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = OrganizeConfig::builder()
            .root_dir(temp.path())
            .build()
            .unwrap();
        assert_eq!(config.target_root, temp.path());
        assert_eq!(config.mode, RunMode::DryRun);
    }

    #[test]
    fn test_invalid_exclude_glob() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = RenameConfig::builder()
            .root_dir(temp.path())
            .exclude(vec!["[".to_string()])
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_filename_list_defaults() {
        let config = FilenameListConfig::builder()
            .input("in.csv")
            .column("0")
            .build()
            .unwrap();
        assert_eq!(config.column, ColumnSelector::ByIndex(0));
        assert_eq!(config.output, PathBuf::from("filename_list.txt"));
        assert_eq!(config.clean, CleanOptions::default());
        assert!(config.unique && config.keep_order);
    }

    #[test]
    fn test_duplicate_report_unknown_encoding() {
        let err = DuplicateReportConfig::builder()
            .input("in.csv")
            .column("name")
            .encoding("klingon")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_column_is_required() {
        let err = FilenameListConfig::builder()
            .input("in.csv")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
