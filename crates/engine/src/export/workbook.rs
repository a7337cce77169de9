use rust_xlsxwriter::{Format, Workbook, Worksheet};

use super::{
    ReportView,
    tables::{Cell, Table, all_tables},
};
use crate::ExportError;

const AMOUNT_FORMAT: &str = "#,##0";
const PERCENT_FORMAT: &str = "0\"%\"";
const MIN_COLUMN_WIDTH: f64 = 10.0;
const MAX_COLUMN_WIDTH: f64 = 48.0;

/// One sheet per table, header on the first row.
pub(super) fn render(view: &ReportView<'_>) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    for table in all_tables(view) {
        let worksheet = workbook.add_worksheet();
        write_table(worksheet, &table)?;
    }
    Ok(workbook.save_to_buffer()?)
}

fn write_table(worksheet: &mut Worksheet, table: &Table) -> Result<(), ExportError> {
    let header = Format::new().set_bold();
    let amount = Format::new().set_num_format(AMOUNT_FORMAT);
    let percent = Format::new().set_num_format(PERCENT_FORMAT);

    worksheet.set_name(table.title)?;

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for (col, title) in table.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column(col)?, *title, &header)?;
    }

    for (index, cells) in table.rows.iter().enumerate() {
        let row = u32::try_from(index + 1).map_err(|_| ExportError::TooManyRows(index + 1))?;
        for (col, cell) in cells.iter().enumerate() {
            let col_index = column(col)?;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col_index, text)?;
                }
                Cell::Amount(money) => {
                    let value = money
                        .to_exact_f64()
                        .ok_or(ExportError::AmountOutOfRange(*money))?;
                    worksheet.write_number_with_format(row, col_index, value, &amount)?;
                }
                Cell::Count(count) => {
                    worksheet.write_number(row, col_index, *count as f64)?;
                }
                Cell::Percent(ratio) => {
                    worksheet.write_number_with_format(row, col_index, *ratio as f64, &percent)?;
                }
            }
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.render(false).chars().count());
            }
        }
    }

    for (col, width) in widths.into_iter().enumerate() {
        let width = (width as f64 + 2.0).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(column(col)?, width)?;
    }
    Ok(())
}

fn column(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::Document(format!("column {index} out of range")))
}
