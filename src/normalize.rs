//! Turns raw cell values into cleaned filename strings.

use crate::table::Cell;

/// Options controlling [`clean_filenames`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanOptions {
    /// Trim surrounding whitespace
    pub strip_spaces: bool,

    /// Drop missing values and values that are empty after trimming
    pub drop_empty: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            strip_spaces: true,
            drop_empty: true,
        }
    }
}

/// Converts raw cells to cleaned filenames, preserving row order.
///
/// Missing cells are skipped when `drop_empty` is set and become `""`
/// otherwise. Present cells are stringified, optionally trimmed, and skipped
/// if the result is empty and `drop_empty` is set.
#[must_use]
pub fn clean_filenames<'a, I>(values: I, options: CleanOptions) -> Vec<String>
where
    I: IntoIterator<Item = &'a Cell>,
{
    values
        .into_iter()
        .filter_map(|cell| {
            if cell.is_missing() {
                return (!options.drop_empty).then(String::new);
            }

            let text = cell.to_string();
            let text = if options.strip_spaces {
                text.trim().to_string()
            } else {
                text
            };

            if options.drop_empty && text.is_empty() {
                None
            } else {
                Some(text)
            }
        })
        .collect()
}
