use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the toolbox commands.
///
/// Every variant maps to exit code 1 in the binary. The message is printed
/// as a single line, so keep `#[error]` strings free of newlines.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Input file does not exist.
    #[error("input file not found: {}", path.display())]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Target directory is missing or not a directory.
    #[error("directory not found - {}", path.display())]
    DirectoryNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Input file extension is not a known table format.
    #[error("Unsupported file extension: {extension}")]
    UnsupportedFormat {
        /// Lowercased extension including the leading dot (may be empty)
        extension: String,
    },

    /// Column name is not present in the header row.
    #[error("Column '{name}' not found in table columns.")]
    ColumnNotFound {
        /// Requested column name
        name: String,
    },

    /// Column index falls outside `[0, column_count)`.
    #[error("Column index {index} is out of range for {column_count} columns.")]
    ColumnOutOfRange {
        /// Requested index
        index: i64,
        /// Number of columns in the table
        column_count: usize,
    },

    /// Two flags were given that cannot be combined.
    #[error("{first} and {second} cannot be used together.")]
    ConflictingFlags {
        /// First flag as typed on the command line
        first: &'static str,
        /// Second flag as typed on the command line
        second: &'static str,
    },

    /// Output encoding label is unknown.
    #[error("Unsupported encoding: {label}")]
    UnsupportedEncoding {
        /// Label supplied by the user
        label: String,
    },

    /// Text cannot be represented in the requested output encoding.
    #[error("Cannot encode output '{}' as {encoding}", path.display())]
    Encoding {
        /// Output path being written
        path: PathBuf,
        /// Canonical encoding name
        encoding: String,
    },

    /// Input table could not be parsed.
    #[error("Failed to read table '{}': {message}", path.display())]
    Table {
        /// Input path
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{}': {message}", path.display())]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Anything not covered above.
    #[error("Unexpected error: {message}")]
    Unexpected {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a table parsing error.
    #[must_use]
    pub fn table(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Table {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a file-not-found error.
    #[must_use]
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates a directory-not-found error.
    #[must_use]
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    /// Creates an unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Returns true if the error came from resolving a column selector.
    #[must_use]
    pub const fn is_column_error(&self) -> bool {
        matches!(
            self,
            Self::ColumnNotFound { .. } | Self::ColumnOutOfRange { .. }
        )
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}
