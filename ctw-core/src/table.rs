//! Semicolon-delimited table output.

use std::io::{self, Write};

use crate::record::{COLUMNS, MetaVariableRecord};

/// Column separator of the output table.
pub const SEPARATOR: &str = ";";

/// Writes the header and one row per record to `writer`.
///
/// # Errors
/// Propagates any error reported by `writer`.
///
/// # Examples
/// ```
/// use ctw_core::{MetaVariableRecord, write_table};
///
/// let record = MetaVariableRecord {
///     two_sided_cables: 2,
///     one_sided_cables: 1,
///     side_cables: 0,
///     housings: 2,
///     housing_types: 1,
///     free_central_cavities: 10,
///     free_normal_cavities: 4,
/// };
/// let mut out = Vec::new();
/// write_table(&[record], &mut out).expect("writing to a vector succeeds");
/// let text = String::from_utf8(out).expect("table is UTF-8");
/// assert_eq!(text.lines().nth(1), Some("2;1;0;2;1;10;4"));
/// ```
pub fn write_table<W: Write>(records: &[MetaVariableRecord], mut writer: W) -> io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(SEPARATOR))?;
    for record in records {
        let [first, rest @ ..] = record.to_row();
        write!(writer, "{first}")?;
        for value in rest {
            write!(writer, "{SEPARATOR}{value}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}
