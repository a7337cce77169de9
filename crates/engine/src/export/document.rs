//! Printable letterhead document rendered as self-contained HTML.

use std::fmt::Write;

use super::{
    ExportOptions, ReportView, long_date,
    tables::{Cell, SUMMARY_TITLE, Table, all_tables},
};
use crate::ExportError;

const TITLE: &str = "Laporan Keuangan";
const EMPTY_TABLE: &str = "Tidak ada data.";

const STYLE: &str = "\
@page { size: A4; margin: 18mm 15mm; }
body { font-family: 'Times New Roman', serif; font-size: 11pt; color: #000; }
header { text-align: center; border-bottom: 3px double #000; padding-bottom: 6px; }
header h1 { font-size: 16pt; margin: 0; text-transform: uppercase; }
header p { margin: 2px 0; }
h2 { font-size: 13pt; text-align: center; margin: 14px 0 2px; }
h3 { font-size: 11pt; margin: 16px 0 4px; }
.meta { text-align: center; margin: 0 0 10px; }
table { width: 100%; border-collapse: collapse; page-break-inside: auto; }
tr { page-break-inside: avoid; }
th, td { border: 1px solid #000; padding: 3px 5px; }
th { background: #eee; }
td.num { text-align: right; white-space: nowrap; }
.signature { margin-top: 36px; width: 40%; margin-left: auto; text-align: center; }
.signature .name { margin-top: 60px; font-weight: bold; text-decoration: underline; }
";

pub(super) fn render(view: &ReportView<'_>, options: &ExportOptions) -> Result<String, ExportError> {
    let letterhead = &options.letterhead;
    let printed = long_date(options.export_date);
    let mut out = String::new();

    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"id\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(
        out,
        "<title>{TITLE} {}</title>",
        escape_html(&view.period.label())
    )?;
    writeln!(out, "<style>\n{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;

    writeln!(out, "<header>")?;
    writeln!(out, "<h1>{}</h1>", escape_html(&letterhead.name))?;
    if !letterhead.address.trim().is_empty() {
        writeln!(out, "<p>{}</p>", escape_html(&letterhead.address))?;
    }
    writeln!(out, "</header>")?;

    writeln!(out, "<h2>{TITLE}</h2>")?;
    writeln!(
        out,
        "<p class=\"meta\">Periode: {} &middot; Dicetak: {}</p>",
        escape_html(&view.period.label()),
        escape_html(&printed)
    )?;

    for table in all_tables(view) {
        write_table(&mut out, &table)?;
    }

    writeln!(out, "<div class=\"signature\">")?;
    writeln!(out, "<p>{}</p>", escape_html(&printed))?;
    writeln!(out, "<p>Bendahara,</p>")?;
    writeln!(
        out,
        "<p class=\"name\">{}</p>",
        escape_html(&letterhead.treasurer)
    )?;
    writeln!(out, "</div>")?;

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}

fn write_table(out: &mut String, table: &Table) -> Result<(), ExportError> {
    let heading = if table.title == SUMMARY_TITLE {
        table.title.to_string()
    } else {
        format!("{} ({})", table.title, table.rows.len())
    };
    writeln!(out, "<section>")?;
    writeln!(out, "<h3>{}</h3>", escape_html(&heading))?;

    if table.rows.is_empty() {
        writeln!(out, "<p>{EMPTY_TABLE}</p>")?;
        writeln!(out, "</section>")?;
        return Ok(());
    }

    writeln!(out, "<table>")?;
    write!(out, "<thead><tr>")?;
    for title in table.headers {
        write!(out, "<th>{}</th>", escape_html(title))?;
    }
    writeln!(out, "</tr></thead>")?;

    writeln!(out, "<tbody>")?;
    for row in &table.rows {
        write!(out, "<tr>")?;
        for cell in row {
            let class = match cell {
                Cell::Amount(_) | Cell::Count(_) | Cell::Percent(_) => " class=\"num\"",
                Cell::Text(_) => "",
            };
            write!(out, "<td{class}>{}</td>", escape_html(&cell.render(true)))?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "</tbody>")?;
    writeln!(out, "</table>")?;
    writeln!(out, "</section>")?;
    Ok(())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{Letterhead, Period, Summary};

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>Ahmad & \"Sons\"</b>"),
            "&lt;b&gt;Ahmad &amp; &quot;Sons&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn document_carries_letterhead_and_signature() {
        let period = Period::month("2025-06").unwrap();
        let summary = Summary::empty(period.clone());
        let view = ReportView::new(&period, &summary, &[], &[], &[]);
        let options = ExportOptions::new(
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            Letterhead {
                name: "PP Al-Hikmah".to_string(),
                address: "Jl. Pesantren No. 1".to_string(),
                treasurer: "Ustadz Hasan".to_string(),
            },
        );

        let html = render(&view, &options).unwrap();
        assert!(html.contains("@page"));
        assert!(html.contains("<h1>PP Al-Hikmah</h1>"));
        assert!(html.contains("Periode: Juni 2025"));
        assert!(html.contains("Dicetak: 1 Juli 2025"));
        assert!(html.contains("<td class=\"num\">Rp 0</td>"));
        assert!(html.contains(EMPTY_TABLE));
        assert!(html.contains("<p class=\"name\">Ustadz Hasan</p>"));
    }
}
