use crate::error::{Error, Result};
use crate::table::{Cell, Table};
use std::fmt;

/// Identifies a table column either by header name or zero-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Literal header name
    ByName(String),
    /// Zero-based column position; negative values never resolve
    ByIndex(i64),
}

impl ColumnSelector {
    /// Parses user input: a string that is entirely an integer is an index,
    /// anything else is a column name.
    ///
    /// # Examples
    ///
    /// ```
    /// use office_toolbox::ColumnSelector;
    ///
    /// assert_eq!(ColumnSelector::parse("2"), ColumnSelector::ByIndex(2));
    /// assert_eq!(
    ///     ColumnSelector::parse("file name"),
    ///     ColumnSelector::ByName("file name".to_string())
    /// );
    /// ```
    #[must_use]
    pub fn parse(input: &str) -> Self {
        input
            .trim()
            .parse::<i64>()
            .map_or_else(|_| Self::ByName(input.to_string()), Self::ByIndex)
    }

    /// Resolves the selector to a column position in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnOutOfRange`] when the index is outside
    /// `[0, column_count)` and [`Error::ColumnNotFound`] when the name is
    /// absent from the header.
    pub fn resolve(&self, table: &Table) -> Result<usize> {
        let column_count = table.column_count();
        match self {
            Self::ByIndex(index) => usize::try_from(*index)
                .ok()
                .filter(|i| *i < column_count)
                .ok_or(Error::ColumnOutOfRange {
                    index: *index,
                    column_count,
                }),
            Self::ByName(name) => table
                .columns()
                .iter()
                .position(|column| column == name)
                .ok_or_else(|| Error::ColumnNotFound { name: name.clone() }),
        }
    }

    /// Resolves the selector and returns the column's cells.
    ///
    /// # Errors
    ///
    /// See [`ColumnSelector::resolve`].
    pub fn extract<'t>(&self, table: &'t Table) -> Result<Vec<&'t Cell>> {
        let index = self.resolve(table)?;
        Ok(table.column_values(index).collect())
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "'{name}'"),
            Self::ByIndex(index) => write!(f, "#{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(
            vec!["id".into(), "filename".into(), "7".into()],
            vec![vec![
                Cell::Int(1),
                Cell::Text("a.txt".into()),
                Cell::Empty,
            ]],
        )
    }

    #[test]
    fn test_parse_index_and_name() {
        assert_eq!(ColumnSelector::parse("0"), ColumnSelector::ByIndex(0));
        assert_eq!(ColumnSelector::parse("-1"), ColumnSelector::ByIndex(-1));
        assert_eq!(
            ColumnSelector::parse("filename"),
            ColumnSelector::ByName("filename".into())
        );
        assert_eq!(
            ColumnSelector::parse("1a"),
            ColumnSelector::ByName("1a".into())
        );
    }

    #[test]
    fn test_resolve_by_index() {
        let table = sample_table();
        assert_eq!(ColumnSelector::ByIndex(1).resolve(&table).unwrap(), 1);

        let err = ColumnSelector::ByIndex(3).resolve(&table).unwrap_err();
        assert!(matches!(
            err,
            Error::ColumnOutOfRange {
                index: 3,
                column_count: 3
            }
        ));

        let err = ColumnSelector::ByIndex(-1).resolve(&table).unwrap_err();
        assert!(matches!(err, Error::ColumnOutOfRange { index: -1, .. }));
    }

    #[test]
    fn test_resolve_by_name() {
        let table = sample_table();
        assert_eq!(
            ColumnSelector::ByName("filename".into())
                .resolve(&table)
                .unwrap(),
            1
        );

        let err = ColumnSelector::ByName("missing".into())
            .resolve(&table)
            .unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound { .. }));
    }

    #[test]
    fn test_numeric_header_needs_index() {
        // "7" parses as an index, so the header literally named "7" is unreachable by name.
        let table = sample_table();
        let err = ColumnSelector::parse("7").resolve(&table).unwrap_err();
        assert!(err.is_column_error());
    }

    #[test]
    fn test_extract_values() {
        let table = sample_table();
        let values = ColumnSelector::ByName("filename".into())
            .extract(&table)
            .unwrap();
        assert_eq!(values, vec![&Cell::Text("a.txt".into())]);
    }
}
