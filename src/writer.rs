use crate::error::{Error, Result};
use encoding_rs::{Encoding, REPLACEMENT, UTF_8, UTF_16BE, UTF_16LE};
use std::{
    fmt,
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Character encoding used for output text files.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OutputEncoding(&'static Encoding);

impl OutputEncoding {
    /// Looks up an encoding by label (`utf-8`, `gbk`, `shift_jis`, `utf-16le`, ...).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for unknown labels.
    pub fn for_label(label: &str) -> Result<Self> {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) if encoding != REPLACEMENT => Ok(Self(encoding)),
            _ => Err(Error::UnsupportedEncoding {
                label: label.to_string(),
            }),
        }
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Encodes `text`, failing on characters the encoding cannot represent.
    fn encode(self, text: &str, path: &Path) -> Result<Vec<u8>> {
        let encoding = self.0;

        if encoding == UTF_8 {
            return Ok(text.as_bytes().to_vec());
        }
        if encoding == UTF_16LE {
            return Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect());
        }
        if encoding == UTF_16BE {
            return Ok(text.encode_utf16().flat_map(u16::to_be_bytes).collect());
        }

        let (bytes, _, had_errors) = encoding.encode(text);
        if had_errors {
            return Err(Error::Encoding {
                path: path.to_path_buf(),
                encoding: encoding.name().to_string(),
            });
        }
        Ok(bytes.into_owned())
    }
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self(UTF_8)
    }
}

impl fmt::Debug for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OutputEncoding").field(&self.name()).finish()
    }
}

/// Writes newline-separated lists to text files with atomic replacement.
pub(crate) struct ListWriter {
    encoding: OutputEncoding,
}

impl ListWriter {
    pub(crate) const fn new(encoding: OutputEncoding) -> Self {
        Self { encoding }
    }

    /// Writes `lines` joined by `\n` (no trailing newline) to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be encoded or the file cannot be
    /// written.
    pub(crate) fn write_lines<I, S>(&self, path: &Path, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let content = lines
            .into_iter()
            .map(|line| line.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = self.encoding.encode(&content, path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        write_file_atomic(path, &bytes)?;

        debug!(
            "Wrote {} bytes ({}) to {}",
            bytes.len(),
            self.encoding.name(),
            path.display()
        );
        Ok(())
    }
}

/// Writes a file atomically.
///
/// # Process
///
/// 1. Writes content to a temporary sibling file
/// 2. Syncs the temporary file to disk
/// 3. Renames the temporary file over the target path
fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_sibling(path);
    let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(path, e)
    })
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
