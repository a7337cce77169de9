use std::{io::Cursor, sync::Arc};

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;
use engine::{
    DateOrigin, Donation, Due, DueStatus, ExpenseCategory, Expenditure, ExportError, ExportFormat,
    ExportOptions, FinancialReportState, FundingSource, Letterhead, Money, Period, Sources,
    export, export_delimited_text, export_document, export_workbook,
};

fn at(day: u32) -> Option<chrono::NaiveDateTime> {
    NaiveDate::from_ymd_opt(2025, 6, day).and_then(|date| date.and_hms_opt(8, 0, 0))
}

fn state() -> FinancialReportState {
    let sources = Sources::from_records(
        vec![
            Donation {
                id: "1".to_string(),
                donor_name: Some("Bapak Ahmad".to_string()),
                amount: Money::new(1_000_000),
                recorded_at: at(10),
            },
            Donation {
                id: "2".to_string(),
                donor_name: None,
                amount: Money::new(250_000),
                recorded_at: NaiveDate::from_ymd_opt(2025, 5, 2)
                    .and_then(|date| date.and_hms_opt(8, 0, 0)),
            },
        ],
        vec![
            Due {
                id: "1".to_string(),
                student_id: Some("S-01".to_string()),
                period: Some("2025-06".to_string()),
                amount: Money::new(110_000),
                status: DueStatus::Paid,
                paid_at: at(3),
            },
            Due {
                id: "2".to_string(),
                student_id: Some("S-02".to_string()),
                period: Some("2025-06".to_string()),
                amount: Money::new(110_000),
                status: DueStatus::Unpaid,
                paid_at: None,
            },
        ],
        vec![Expenditure {
            id: "1".to_string(),
            title: "Listrik, air & internet".to_string(),
            description: Some("Tagihan \"Juni\"".to_string()),
            amount: Money::new(500_000),
            category: ExpenseCategory::Operational,
            funding_source: FundingSource::Dues,
            spent_at: at(15),
            date_origin: DateOrigin::Recorded,
            notes: None,
        }],
    );
    FinancialReportState::new(Arc::new(sources), Period::month("2025-06").unwrap())
}

fn donations_of(amounts: &[i64]) -> FinancialReportState {
    let donations = amounts
        .iter()
        .enumerate()
        .map(|(index, rupiah)| Donation {
            id: (index + 1).to_string(),
            donor_name: Some("Yayasan".to_string()),
            amount: Money::new(*rupiah),
            recorded_at: at(1),
        })
        .collect();
    let sources = Sources::from_records(donations, Vec::new(), Vec::new());
    FinancialReportState::new(Arc::new(sources), Period::All)
}

fn options() -> ExportOptions {
    ExportOptions::new(
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        Letterhead {
            name: "PP Al-Hikmah".to_string(),
            address: "Jl. Pesantren No. 1".to_string(),
            treasurer: "Ustadz Hasan".to_string(),
        },
    )
}

/// Value column of the summary row labelled `label`.
fn summary_cell(rows: &[Vec<String>], label: &str) -> String {
    rows.iter()
        .find(|row| row.first().map(String::as_str) == Some(label))
        .and_then(|row| row.get(1).cloned())
        .unwrap_or_else(|| panic!("missing summary row {label}"))
}

fn workbook_rows(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

fn workbook_amount(rows: &[Vec<Data>], label: &str) -> i64 {
    let row = rows
        .iter()
        .find(|row| matches!(row.first(), Some(Data::String(text)) if text == label))
        .unwrap_or_else(|| panic!("missing workbook row {label}"));
    match row.get(1) {
        Some(Data::Float(value)) => *value as i64,
        Some(Data::Int(value)) => *value,
        other => panic!("unexpected cell {other:?}"),
    }
}

fn csv_rows(bytes: &[u8]) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn three_artifacts_report_the_same_totals() {
    let state = state();
    let summary = state.summary().clone();
    assert_eq!(summary.total_income, Money::new(1_110_000));
    assert_eq!(summary.total_expense, Money::new(500_000));
    assert_eq!(summary.balance, Money::new(610_000));

    let view = state.view();
    let workbook = export_workbook(&view, &options()).unwrap();
    let delimited = export_delimited_text(&view, &options()).unwrap();
    let document = export_document(&view, &options()).unwrap();

    let sheet = workbook_rows(workbook.bytes, "Ringkasan");
    assert_eq!(
        workbook_amount(&sheet, "Total Pemasukan"),
        summary.total_income.rupiah()
    );
    assert_eq!(
        workbook_amount(&sheet, "Total Pengeluaran"),
        summary.total_expense.rupiah()
    );
    assert_eq!(workbook_amount(&sheet, "Saldo"), summary.balance.rupiah());

    let rows = csv_rows(&delimited.bytes);
    assert_eq!(summary_cell(&rows, "Total Pemasukan"), "1.110.000");
    assert_eq!(summary_cell(&rows, "Total Pengeluaran"), "500.000");
    assert_eq!(summary_cell(&rows, "Saldo"), "610.000");

    let html = String::from_utf8(document.bytes).unwrap();
    assert!(html.contains("<td>Total Pemasukan</td><td class=\"num\">Rp 1.110.000</td>"));
    assert!(html.contains("<td>Total Pengeluaran</td><td class=\"num\">Rp 500.000</td>"));
    assert!(html.contains("<td>Saldo</td><td class=\"num\">Rp 610.000</td>"));
}

#[test]
fn workbook_has_one_sheet_per_source() {
    let state = state();
    let artifact = export(&state.view(), ExportFormat::Workbook, &options()).unwrap();
    let workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(artifact.bytes.clone())).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Ringkasan", "Donasi", "Syahriah", "Pemakaian"]
    );

    let dues = workbook_rows(artifact.bytes, "Syahriah");
    assert_eq!(dues.len(), 3);
    assert_eq!(dues[0][0], Data::String("ID".to_string()));
    assert_eq!(dues[2][4], Data::String("Belum Lunas".to_string()));
    assert_eq!(dues[2][5], Data::String("-".to_string()));
}

#[test]
fn exports_only_carry_the_selected_period() {
    let state = state();
    let artifact = export_delimited_text(&state.view(), &options()).unwrap();
    let rows = csv_rows(&artifact.bytes);

    let donors: Vec<&str> = rows
        .iter()
        .filter(|row| row.len() == 5 && row[0] != "ID")
        .map(|row| row[1].as_str())
        .collect();
    assert_eq!(donors, vec!["Bapak Ahmad"]);
}

#[test]
fn delimited_text_quotes_free_text() {
    let state = state();
    let artifact = export_delimited_text(&state.view(), &options()).unwrap();
    let rows = csv_rows(&artifact.bytes);
    let expenditure = rows
        .iter()
        .find(|row| row.get(1).map(String::as_str) == Some("Listrik, air & internet"))
        .unwrap();
    assert_eq!(expenditure[2], "Tagihan \"Juni\"");
    assert_eq!(expenditure[3], "500.000");
    assert_eq!(expenditure[8], "2025-06");
}

#[test]
fn file_names_embed_period_and_date() {
    let state = state();
    let names: Vec<String> = ExportFormat::ALL
        .into_iter()
        .map(|format| export(&state.view(), format, &options()).unwrap().file_name)
        .collect();
    assert_eq!(
        names,
        vec![
            "laporan-keuangan_2025-06_2025-07-01.xlsx",
            "laporan-keuangan_2025-06_2025-07-01.csv",
            "laporan-keuangan_2025-06_2025-07-01.html",
        ]
    );
}

#[test]
fn document_escapes_record_text() {
    let state = state();
    let artifact = export_document(&state.view(), &options()).unwrap();
    let html = String::from_utf8(artifact.bytes).unwrap();
    assert!(html.contains("Listrik, air &amp; internet"));
    assert!(html.contains("Tagihan &quot;Juni&quot;"));
    assert!(!html.contains("Anonim"));
}

#[test]
fn artifact_is_written_to_disk() {
    let dir = std::env::temp_dir().join(format!("bendahara-export-{}", std::process::id()));
    let state = state();
    let artifact = export_document(&state.view(), &options()).unwrap();

    let path = artifact.write_to(&dir).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), artifact.bytes);
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn totals_at_the_record_ceiling_agree_across_artifacts() {
    let ceiling = Money::MAX_RECORD.rupiah();
    let state = donations_of(&[ceiling, ceiling, ceiling]);
    let total = state.summary().total_income;
    assert_eq!(total, Money::new(2_999_999_999_997));

    let view = state.view();
    let sheet = workbook_rows(export_workbook(&view, &options()).unwrap().bytes, "Ringkasan");
    assert_eq!(workbook_amount(&sheet, "Total Pemasukan"), total.rupiah());

    let rows = csv_rows(&export_delimited_text(&view, &options()).unwrap().bytes);
    assert_eq!(summary_cell(&rows, "Total Pemasukan"), "2.999.999.999.997");

    let html = String::from_utf8(export_document(&view, &options()).unwrap().bytes).unwrap();
    assert!(html.contains("<td>Total Pemasukan</td><td class=\"num\">Rp 2.999.999.999.997</td>"));
}

#[test]
fn workbook_refuses_amounts_a_cell_would_round() {
    let state = donations_of(&[(1 << 53) + 1]);
    let err = export_workbook(&state.view(), &options()).unwrap_err();
    assert!(matches!(
        err,
        ExportError::AmountOutOfRange(amount) if amount == Money::new((1 << 53) + 1)
    ));
}
