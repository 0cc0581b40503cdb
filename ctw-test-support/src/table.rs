//! Parser for the semicolon-delimited meta-variable tables.

use thiserror::Error;

/// Number of columns in every table row.
pub const COLUMN_COUNT: usize = 7;

/// A parsed table: the header names and one row of values per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    /// Header column names.
    pub header: Vec<String>,
    /// Record rows in file order.
    pub rows: Vec<[u32; COLUMN_COUNT]>,
}

/// Reasons a table could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The input contained no header line.
    #[error("table is empty")]
    Empty,
    /// A row had the wrong number of fields.
    #[error("line {line} has {fields} fields, expected {COLUMN_COUNT}")]
    FieldCount {
        /// One-based line number.
        line: usize,
        /// Fields found on the line.
        fields: usize,
    },
    /// A field was not a non-negative integer.
    #[error("line {line} field {column} is not a count: {value:?}")]
    NotACount {
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
        /// Raw field text.
        value: String,
    },
}

/// Parses `text` into its header and integer rows.
///
/// # Errors
/// Returns a [`TableError`] describing the first malformed line.
///
/// # Examples
/// ```
/// use ctw_test_support::table::parse_table;
///
/// let table = parse_table("a;b;c;d;e;f;g\n1;2;3;4;5;6;7\n").expect("table is valid");
/// assert_eq!(table.header.len(), 7);
/// assert_eq!(table.rows, vec![[1, 2, 3, 4, 5, 6, 7]]);
/// ```
pub fn parse_table(text: &str) -> Result<ParsedTable, TableError> {
    let mut lines = text.lines();
    let header_line = lines.next().ok_or(TableError::Empty)?;
    let header: Vec<String> = header_line.split(';').map(str::to_owned).collect();
    if header.len() != COLUMN_COUNT {
        return Err(TableError::FieldCount {
            line: 1,
            fields: header.len(),
        });
    }
    let rows = lines
        .enumerate()
        .map(|(offset, line)| parse_row(offset + 2, line))
        .collect::<Result<_, _>>()?;
    Ok(ParsedTable { header, rows })
}

fn parse_row(line_number: usize, line: &str) -> Result<[u32; COLUMN_COUNT], TableError> {
    let fields: Vec<&str> = line.split(';').collect();
    let mut row = [0; COLUMN_COUNT];
    if fields.len() != COLUMN_COUNT {
        return Err(TableError::FieldCount {
            line: line_number,
            fields: fields.len(),
        });
    }
    for (column, (slot, field)) in row.iter_mut().zip(&fields).enumerate() {
        *slot = field.parse().map_err(|_| TableError::NotACount {
            line: line_number,
            column: column + 1,
            value: (*field).to_owned(),
        })?;
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    const HEADER: &str = "a;b;c;d;e;f;g";

    #[rstest]
    #[case("", TableError::Empty)]
    #[case("a;b", TableError::FieldCount { line: 1, fields: 2 })]
    #[case("a;b;c;d;e;f;g\n1;2;3", TableError::FieldCount { line: 2, fields: 3 })]
    #[case(
        "a;b;c;d;e;f;g\n1;2;3;4;5;6;7\n1;2;-3;4;5;6;7",
        TableError::NotACount { line: 3, column: 3, value: "-3".to_owned() },
    )]
    fn rejects_malformed_tables(#[case] text: &str, #[case] expected: TableError) {
        assert_eq!(parse_table(text), Err(expected));
    }

    #[test]
    fn header_only_table_has_no_rows() {
        let table = parse_table(HEADER).expect("header is valid");
        assert!(table.rows.is_empty());
    }
}
