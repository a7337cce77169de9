//! Plain-text rendering of reports for the terminal.

use std::fmt::Write;

use engine::{MonthlyFlow, Period, Summary};

const LABEL_WIDTH: usize = 24;

/// Amount with a compact hint when it is large enough to abbreviate.
fn amount(money: engine::Money) -> String {
    let full = money.to_string();
    let short = money.abbreviated();
    if short == full {
        full
    } else {
        format!("{full} ({short})")
    }
}

#[must_use]
pub fn periods(periods: &[Period]) -> String {
    let mut out = String::new();
    for period in periods {
        let _ = writeln!(out, "{:<10} {}", period.to_string(), period.label());
    }
    out
}

#[must_use]
pub fn summary(summary: &Summary, issues: usize) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        let _ = writeln!(out, "{label:<LABEL_WIDTH$}{value}");
    };

    line("Periode", summary.period.label());
    line("Total Donasi", amount(summary.total_donation));
    line("Total Syahriah (Lunas)", amount(summary.total_dues));
    line("Total Pemasukan", amount(summary.total_income));
    line("Total Pengeluaran", amount(summary.total_expense));
    line("Saldo", amount(summary.balance));
    line("Rasio Kesehatan", format!("{}%", summary.health_ratio));
    line(
        "Tunggakan",
        format!("{} ({})", summary.arrears, summary.arrears_amount),
    );
    line(
        "Donasi",
        format!(
            "{} ({} anonim)",
            summary.donation_count, summary.anonymous_donation_count
        ),
    );
    for total in &summary.expense_by_category {
        line(
            &format!("  {}", total.category.label()),
            total.amount.to_string(),
        );
    }
    for total in &summary.expense_by_funding_source {
        line(
            &format!("  Dana {}", total.funding_source.label()),
            total.amount.to_string(),
        );
    }
    if issues > 0 {
        line("Data tidak lengkap", format!("{issues} catatan"));
    }
    out
}

#[must_use]
pub fn monthly(flows: &[MonthlyFlow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10}{:>18}{:>18}{:>18}",
        "Bulan", "Pemasukan", "Pengeluaran", "Selisih"
    );
    for flow in flows {
        let _ = writeln!(
            out,
            "{:<10}{:>18}{:>18}{:>18}",
            flow.month,
            flow.income.to_string(),
            flow.expense.to_string(),
            flow.net.to_string()
        );
    }
    out
}
