//! The fixed table of tool categories and the commands they offer.

use std::fmt::Write;

/// A runnable command inside a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandDescriptor {
    /// Subcommand name as typed on the command line
    pub name: &'static str,
    /// One-line summary
    pub summary: &'static str,
}

/// A tool category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDescriptor {
    /// Subcommand name as typed on the command line
    pub name: &'static str,
    /// Display title
    pub title: &'static str,
    /// Short description shown in listings
    pub description: &'static str,
    /// Longer text shown for planned categories
    pub details: &'static str,
    /// Available commands; empty for planned categories
    pub commands: &'static [CommandDescriptor],
}

impl CategoryDescriptor {
    /// Returns true if the category has no commands yet.
    #[must_use]
    pub const fn is_planned(&self) -> bool {
        self.commands.is_empty()
    }

    /// Message printed when a planned category is invoked.
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("[{}] {}", self.title, self.details)
    }
}

/// Every category, in display order.
pub static CATEGORIES: &[CategoryDescriptor] = &[
    CategoryDescriptor {
        name: "fs",
        title: "fs_tools",
        description: "File system tools",
        details: "Batch renaming and reorganizing of files in a directory.",
        commands: &[
            CommandDescriptor {
                name: "rename-basic",
                summary: "Batch rename files with prefix/suffix and extension case",
            },
            CommandDescriptor {
                name: "organize-ext",
                summary: "Move files into extension-named folders",
            },
        ],
    },
    CategoryDescriptor {
        name: "list",
        title: "list_tools",
        description: "Excel/List tools",
        details: "Filename list extraction and duplicate analysis for CSV/Excel columns.",
        commands: &[
            CommandDescriptor {
                name: "excel-to-filenames",
                summary: "Export a cleaned filename list from a CSV/Excel column",
            },
            CommandDescriptor {
                name: "dedup-filename-column",
                summary: "Report duplicate filenames in a CSV/Excel column",
            },
        ],
    },
    CategoryDescriptor {
        name: "report",
        title: "report_tools",
        description: "Reporting and reconciliation tools (coming soon)",
        details: "Reporting and reconciliation tools, such as difference checks, are planned.",
        commands: &[],
    },
    CategoryDescriptor {
        name: "text",
        title: "text_tools",
        description: "Text cleanup tools (coming soon)",
        details: "Text normalization and cleanup scripts are planned.",
        commands: &[],
    },
];

/// Looks up a category by its command-line name.
#[must_use]
pub fn category(name: &str) -> Option<&'static CategoryDescriptor> {
    CATEGORIES.iter().find(|c| c.name == name)
}

/// Banner shown when the binary runs without a command.
#[must_use]
pub fn welcome(version: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "OnePass Office Toolbox");
    let _ = writeln!(text, "Version: {version}");
    let _ = writeln!(text);
    let _ = writeln!(text, "Available tool categories:");
    for category in CATEGORIES {
        let _ = writeln!(text, "- {} - {}", category.title, category.description);
        for command in category.commands {
            let _ = writeln!(
                text,
                "    {} {}: {}",
                category.name, command.name, command.summary
            );
        }
    }
    text
}
