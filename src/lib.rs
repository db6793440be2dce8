//! # office-toolbox
//!
//! Batch utilities for everyday office file chores.
//!
//! ## Features
//!
//! - Batch renaming with prefix/suffix and extension case control
//! - Organizing files into per-extension folders
//! - Dry-run by default, with collision-free `_N` destinations
//! - Filename list export from CSV or Excel columns
//! - Duplicate filename analysis with unique list and count report
//!
//! ## Quick Start
//!
//! ```no_run
//! use office_toolbox::{FilenameListConfig, FilenameListPipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = FilenameListConfig::builder()
//!     .input("contracts.xlsx")
//!     .column("filename")
//!     .output("filenames.txt")
//!     .build()?;
//!
//! let stats = FilenameListPipeline::new(config).run()?;
//! stats.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Filesystem commands share one pipeline:
//! 1. **Scanner**: Enumerates regular files, optionally recursively
//! 2. **Planner**: Computes destinations and resolves conflicts
//! 3. **Executor**: Prints the plan and, in apply mode, performs it
//!
//! List commands read a [`Table`], select one column, clean it, and write
//! plain-text lists in the requested encoding.

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod column;
mod config;
mod dedup;
mod error;
mod executor;
mod filter;
mod normalize;
mod pipeline;
mod planner;
mod scanner;
mod table;
mod writer;

pub mod catalog;

pub use column::ColumnSelector;
pub use config::{
    DuplicateReportConfig, DuplicateReportConfigBuilder, ExtCase, FilenameListConfig,
    FilenameListConfigBuilder, OrganizeConfig, OrganizeConfigBuilder, OrganizeStrategy,
    RenameConfig, RenameConfigBuilder, RunMode, WalkConfig,
};
pub use dedup::{DuplicateEntry, deduplicate, duplicate_report};
pub use error::{Error, Result};
pub use executor::ExecutionStats;
pub use normalize::{CleanOptions, clean_filenames};
pub use pipeline::{
    DuplicateReportPipeline, DuplicateReportStats, FilenameListPipeline, FilenameListStats,
    FsCommand, FsPipeline, FsStats, OrganizePipeline, RenamePipeline,
};
pub use planner::{DestinationRule, ExtensionRule, PlanItem, Planner, RenameRule, resolve_conflict};
pub use scanner::FileEntry;
pub use table::{Cell, Table, TableFormat, read_table};
pub use writer::OutputEncoding;
