//! Tabular layout shared by every exporter.

use chrono::NaiveDateTime;

use super::ReportView;
use crate::{Money, SourceKind, records::resolved_month};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Cell {
    Text(String),
    Amount(Money),
    Count(usize),
    /// Whole percent.
    Percent(i64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn optional(value: Option<&str>) -> Self {
        Self::Text(value.unwrap_or("-").to_string())
    }

    fn timestamp(value: Option<NaiveDateTime>) -> Self {
        Self::Text(
            value
                .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        )
    }

    /// Text form used by the delimited and document exporters. `currency`
    /// selects `Rp 1.110.000` over `1.110.000`.
    pub(crate) fn render(&self, currency: bool) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Amount(money) if currency => money.to_string(),
            Self::Amount(money) => money.grouped(),
            Self::Count(count) => count.to_string(),
            Self::Percent(percent) => format!("{percent}%"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Table {
    pub title: &'static str,
    pub headers: &'static [&'static str],
    pub rows: Vec<Vec<Cell>>,
}

pub(crate) const SUMMARY_TITLE: &str = "Ringkasan";
const SUMMARY_HEADERS: &[&str] = &["Keterangan", "Nilai"];

const DONATION_HEADERS: &[&str] = &["ID", "Donatur", "Nominal", "Waktu Catat", "Periode"];

const DUE_HEADERS: &[&str] = &[
    "ID",
    "ID Santri",
    "Periode",
    "Nominal",
    "Status",
    "Waktu Bayar",
];

const EXPENDITURE_HEADERS: &[&str] = &[
    "ID",
    "Judul",
    "Deskripsi",
    "Nominal",
    "Kategori",
    "Sumber Dana",
    "Tanggal",
    "Asal Tanggal",
    "Periode",
    "Keterangan",
];

pub(crate) fn summary_table(view: &ReportView<'_>) -> Table {
    let summary = view.summary;
    let row = |label: &str, value: Cell| vec![Cell::text(label), value];

    Table {
        title: SUMMARY_TITLE,
        headers: SUMMARY_HEADERS,
        rows: vec![
            row("Periode", Cell::text(view.period.label())),
            row("Total Donasi", Cell::Amount(summary.total_donation)),
            row("Total Syahriah (Lunas)", Cell::Amount(summary.total_dues)),
            row("Total Pemasukan", Cell::Amount(summary.total_income)),
            row("Total Pengeluaran", Cell::Amount(summary.total_expense)),
            row("Saldo", Cell::Amount(summary.balance)),
            row("Rasio Kesehatan", Cell::Percent(summary.health_ratio)),
            row("Tunggakan", Cell::Count(summary.arrears)),
            row("Nominal Tunggakan", Cell::Amount(summary.arrears_amount)),
        ],
    }
}

pub(crate) fn donation_table(view: &ReportView<'_>) -> Table {
    Table {
        title: SourceKind::Donation.label(),
        headers: DONATION_HEADERS,
        rows: view
            .donations
            .iter()
            .map(|donation| {
                vec![
                    Cell::text(&donation.id),
                    Cell::text(donation.donor_label()),
                    Cell::Amount(donation.amount),
                    Cell::timestamp(donation.recorded_at),
                    Cell::optional(resolved_month(donation.date()).as_deref()),
                ]
            })
            .collect(),
    }
}

pub(crate) fn due_table(view: &ReportView<'_>) -> Table {
    Table {
        title: SourceKind::Due.label(),
        headers: DUE_HEADERS,
        rows: view
            .dues
            .iter()
            .map(|due| {
                vec![
                    Cell::text(&due.id),
                    Cell::optional(due.student_id.as_deref()),
                    Cell::optional(due.period.as_deref()),
                    Cell::Amount(due.amount),
                    Cell::text(due.status.label()),
                    Cell::timestamp(due.paid_at),
                ]
            })
            .collect(),
    }
}

pub(crate) fn expenditure_table(view: &ReportView<'_>) -> Table {
    Table {
        title: SourceKind::Expenditure.label(),
        headers: EXPENDITURE_HEADERS,
        rows: view
            .expenditures
            .iter()
            .map(|item| {
                vec![
                    Cell::text(&item.id),
                    Cell::text(&item.title),
                    Cell::optional(item.description.as_deref()),
                    Cell::Amount(item.amount),
                    Cell::text(item.category.label()),
                    Cell::text(item.funding_source.label()),
                    Cell::text(
                        item.date()
                            .map(|date| date.format(DATE_FORMAT).to_string())
                            .unwrap_or_else(|| "-".to_string()),
                    ),
                    Cell::text(item.date_origin.label()),
                    Cell::optional(resolved_month(item.date()).as_deref()),
                    Cell::optional(item.notes.as_deref()),
                ]
            })
            .collect(),
    }
}

/// Summary first, then one table per source.
pub(crate) fn all_tables(view: &ReportView<'_>) -> [Table; 4] {
    [
        summary_table(view),
        donation_table(view),
        due_table(view),
        expenditure_table(view),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Period, Summary};

    #[test]
    fn summary_rows_follow_the_summary() {
        let period = Period::All;
        let summary = Summary::empty(Period::All);
        let view = ReportView::new(&period, &summary, &[], &[], &[]);
        let table = summary_table(&view);

        assert_eq!(table.rows.len(), 9);
        assert_eq!(table.rows[0][1], Cell::Text("Semua Periode".to_string()));
        assert_eq!(table.rows[3][1], Cell::Amount(Money::ZERO));
        assert!(
            table
                .rows
                .iter()
                .all(|row| row.len() == table.headers.len())
        );
    }

    #[test]
    fn render_amounts() {
        let cell = Cell::Amount(Money::new(1_110_000));
        assert_eq!(cell.render(true), "Rp 1.110.000");
        assert_eq!(cell.render(false), "1.110.000");
        assert_eq!(Cell::Percent(55).render(false), "55%");
    }
}
