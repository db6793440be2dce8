use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use office_toolbox::{
    DuplicateReportConfig, DuplicateReportPipeline, FilenameListConfig, FilenameListPipeline,
    FsPipeline, OrganizeConfig, OrganizeStrategy, RenameConfig, catalog,
};
use serde::Serialize;
use std::{io, path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "office-toolbox",
    version,
    author,
    about = "Batch utilities for office file chores",
    long_about = "Batch utilities for office file chores.\n\n\
    Filesystem commands print their plan and change nothing unless --apply is given.\n\n\
    USAGE EXAMPLES:\n  \
      # Preview adding a prefix to every file in a folder\n  \
      office-toolbox fs rename-basic --dir ./scans --prefix 2024_\n\n  \
      # Sort a download folder into per-extension folders\n  \
      office-toolbox fs organize-ext --dir ./downloads --recursive --apply\n\n  \
      # Export the 'filename' column of a workbook as a text list\n  \
      office-toolbox list excel-to-filenames --input list.xlsx --column filename"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print run statistics as JSON instead of the text summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Category>,
}

#[derive(Subcommand, Debug)]
enum Category {
    /// File system tools
    Fs {
        #[command(subcommand)]
        action: FsAction,
    },
    /// Excel/List tools
    List {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Reporting and reconciliation tools (coming soon)
    Report,
    /// Text cleanup tools (coming soon)
    Text,
}

#[derive(Subcommand, Debug)]
enum FsAction {
    /// Batch rename files with prefix/suffix and extension case
    RenameBasic {
        #[command(flatten)]
        walk: WalkArgs,

        /// Text added before each file stem
        #[arg(long)]
        prefix: Option<String>,

        /// Text added after each file stem
        #[arg(long)]
        suffix: Option<String>,

        /// Lowercase extensions
        #[arg(long)]
        lower_ext: bool,

        /// Uppercase extensions
        #[arg(long)]
        upper_ext: bool,
    },
    /// Move files into extension-named folders
    OrganizeExt {
        #[command(flatten)]
        walk: WalkArgs,

        /// Grouping strategy
        #[arg(long, value_enum, default_value = "ext")]
        mode: CliStrategy,

        /// Root for the extension folders (defaults to --dir)
        #[arg(long, value_name = "PATH")]
        target_root: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct WalkArgs {
    /// Directory to process
    #[arg(short, long, value_name = "PATH")]
    dir: PathBuf,

    /// Include files in subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Skip files matching this glob, relative to --dir (repeatable)
    #[arg(long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Only print the plan (default; wins over --apply)
    #[arg(long)]
    dry_run: bool,

    /// Carry out the plan
    #[arg(long)]
    apply: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliStrategy {
    /// One folder per lowercased extension
    Ext,
}

impl From<CliStrategy> for OrganizeStrategy {
    fn from(s: CliStrategy) -> Self {
        match s {
            CliStrategy::Ext => Self::Extension,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ListAction {
    /// Export a cleaned filename list from a CSV/Excel column
    ExcelToFilenames {
        #[command(flatten)]
        source: SourceArgs,

        /// Output text file
        #[arg(short, long, default_value = "filename_list.txt", value_name = "PATH")]
        output: PathBuf,

        /// Remove duplicate filenames (default)
        #[arg(long, overrides_with = "no_unique")]
        unique: bool,

        /// Keep duplicate filenames
        #[arg(long, overrides_with = "unique")]
        no_unique: bool,

        /// Keep first-occurrence order when deduplicating (default)
        #[arg(long, overrides_with = "no_keep_order")]
        keep_order: bool,

        /// Sort the deduplicated list instead
        #[arg(long, overrides_with = "keep_order")]
        no_keep_order: bool,
    },
    /// Report duplicate filenames in a CSV/Excel column
    DedupFilenameColumn {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file for the unique list
        #[arg(short, long, default_value = "unique_filenames.txt", value_name = "PATH")]
        unique_output: PathBuf,

        /// Output file for the `name,count` duplicate report
        #[arg(short, long, default_value = "duplicate_filenames.txt", value_name = "PATH")]
        duplicates_output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// CSV, TXT, XLSX, XLSM or XLS file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Column name, or zero-based column index
    #[arg(short, long)]
    column: String,

    /// Output encoding label (utf-8, gbk, shift_jis, utf-16le, ...)
    #[arg(long, default_value = "utf-8")]
    encoding: String,

    /// Trim surrounding whitespace (default)
    #[arg(long, overrides_with = "no_strip_spaces")]
    strip_spaces: bool,

    /// Keep surrounding whitespace
    #[arg(long, overrides_with = "strip_spaces")]
    no_strip_spaces: bool,

    /// Drop empty values (default)
    #[arg(long, overrides_with = "no_drop_empty")]
    drop_empty: bool,

    /// Keep empty values
    #[arg(long, overrides_with = "drop_empty")]
    no_drop_empty: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let json = cli.json;

    match cli.command {
        None => {
            print!("{}", catalog::welcome(env!("CARGO_PKG_VERSION")));
            println!();
            Cli::command().print_help()?;
            Ok(())
        }
        Some(Category::Fs { action }) => run_fs(action, json),
        Some(Category::List { action }) => run_list(action, json),
        Some(Category::Report) => print_placeholder("report"),
        Some(Category::Text) => print_placeholder("text"),
    }
}

fn run_fs(action: FsAction, json: bool) -> anyhow::Result<()> {
    // Plan lines would corrupt JSON output.
    let mut out: Box<dyn io::Write> = if json {
        Box::new(io::sink())
    } else {
        Box::new(io::stdout().lock())
    };

    let stats = match action {
        FsAction::RenameBasic {
            walk,
            prefix,
            suffix,
            lower_ext,
            upper_ext,
        } => {
            let mut builder = RenameConfig::builder()
                .root_dir(walk.dir)
                .recursive(walk.recursive)
                .exclude(walk.exclude)
                .lower_ext(lower_ext)
                .upper_ext(upper_ext)
                .dry_run(walk.dry_run)
                .apply(walk.apply);

            if let Some(prefix) = prefix {
                builder = builder.prefix(prefix);
            }
            if let Some(suffix) = suffix {
                builder = builder.suffix(suffix);
            }

            FsPipeline::rename(builder.build()?).run(&mut out)?
        }
        FsAction::OrganizeExt {
            walk,
            mode,
            target_root,
        } => {
            let mut builder = OrganizeConfig::builder()
                .root_dir(walk.dir)
                .recursive(walk.recursive)
                .exclude(walk.exclude)
                .strategy(mode.into())
                .dry_run(walk.dry_run)
                .apply(walk.apply);

            if let Some(target_root) = target_root {
                builder = builder.target_root(target_root);
            }

            FsPipeline::organize(builder.build()?).run(&mut out)?
        }
    };
    drop(out);

    report(&stats, json, |s| s.print_summary())
}

fn run_list(action: ListAction, json: bool) -> anyhow::Result<()> {
    match action {
        ListAction::ExcelToFilenames {
            source,
            output,
            unique,
            no_unique,
            keep_order,
            no_keep_order,
        } => {
            let config = FilenameListConfig::builder()
                .input(source.input)
                .column(source.column)
                .output(output)
                .encoding(source.encoding)
                .strip_spaces(paired(source.strip_spaces, source.no_strip_spaces))
                .drop_empty(paired(source.drop_empty, source.no_drop_empty))
                .unique(paired(unique, no_unique))
                .keep_order(paired(keep_order, no_keep_order))
                .build()?;

            let stats = FilenameListPipeline::new(config).run()?;
            report(&stats, json, |s| s.print_summary())
        }
        ListAction::DedupFilenameColumn {
            source,
            unique_output,
            duplicates_output,
        } => {
            let config = DuplicateReportConfig::builder()
                .input(source.input)
                .column(source.column)
                .unique_output(unique_output)
                .duplicates_output(duplicates_output)
                .encoding(source.encoding)
                .strip_spaces(paired(source.strip_spaces, source.no_strip_spaces))
                .drop_empty(paired(source.drop_empty, source.no_drop_empty))
                .build()?;

            let stats = DuplicateReportPipeline::new(config).run()?;
            report(&stats, json, |s| s.print_summary())
        }
    }
}

/// Resolves a `--x` / `--no-x` pair whose default is on.
const fn paired(on: bool, off: bool) -> bool {
    on || !off
}

fn report<T: Serialize>(stats: &T, json: bool, summary: impl FnOnce(&T)) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(stats)?);
    } else {
        summary(stats);
    }
    Ok(())
}

fn print_placeholder(name: &str) -> anyhow::Result<()> {
    let category = catalog::category(name).with_context(|| format!("unknown category {name}"))?;
    println!("{}", category.placeholder());
    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "office_toolbox=warn",
        1 => "office_toolbox=info",
        2 => "office_toolbox=debug",
        _ => "office_toolbox=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false),
        )
        .init();
}
