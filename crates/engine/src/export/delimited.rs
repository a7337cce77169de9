use csv::WriterBuilder;

use super::{ReportView, tables::all_tables};
use crate::ExportError;

/// Sections separated by a blank line: title row, header row, data rows.
///
/// Each section gets its own writer so the separator is a bare line
/// terminator; a csv record with no fields would be written as `""`.
pub(super) fn render(view: &ReportView<'_>, delimiter: u8) -> Result<Vec<u8>, ExportError> {
    let mut builder = WriterBuilder::new();
    builder.flexible(true).delimiter(delimiter);

    let mut out = Vec::new();
    for (index, table) in all_tables(view).iter().enumerate() {
        if index > 0 {
            out.push(b'\n');
        }
        let mut writer = builder.from_writer(&mut out);
        writer.write_record([table.title])?;
        writer.write_record(table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| cell.render(false)))?;
        }
        writer.flush()?;
    }
    Ok(out)
}
