//! Period-scoped totals computed from the normalized collections.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    Donation, Due, ExpenseCategory, Expenditure, FundingSource, Money, Period, PeriodFilter,
    Sources,
    period::PeriodKey,
    records::resolved_month,
};

/// Expense total of one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub amount: Money,
    pub count: usize,
}

/// Expense total of one funding source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FundingTotal {
    pub funding_source: FundingSource,
    pub amount: Money,
    pub count: usize,
}

/// Aggregate figures of one reporting period.
///
/// `total_income`, `total_expense` and `balance` are the figures every export
/// reproduces. The breakdowns are informational and never feed back into them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub period: Period,
    pub total_donation: Money,
    /// Paid dues only.
    pub total_dues: Money,
    pub total_income: Money,
    pub total_expense: Money,
    pub balance: Money,
    /// `round(100 * balance / total_income)`, `0` without income.
    pub health_ratio: i64,
    /// Number of unpaid dues.
    pub arrears: usize,
    pub arrears_amount: Money,
    pub donation_count: usize,
    pub anonymous_donation_count: usize,
    pub paid_dues_count: usize,
    pub expenditure_count: usize,
    pub expense_by_category: Vec<CategoryTotal>,
    pub expense_by_funding_source: Vec<FundingTotal>,
}

impl Summary {
    /// Summary of nothing for `period`.
    #[must_use]
    pub fn empty(period: Period) -> Self {
        summarize(period, &[], &[], &[])
    }
}

/// Filters the three collections by `period` and summarizes them.
#[must_use]
pub fn compute_summary(
    donations: &[Donation],
    dues: &[Due],
    expenditures: &[Expenditure],
    period: &Period,
) -> Summary {
    let filter = PeriodFilter::new(period.clone());
    let donations: Vec<&Donation> = donations.iter().filter(|r| filter.matches(*r)).collect();
    let dues: Vec<&Due> = dues.iter().filter(|r| filter.matches(*r)).collect();
    let expenditures: Vec<&Expenditure> =
        expenditures.iter().filter(|r| filter.matches(*r)).collect();

    summarize_refs(period.clone(), &donations, &dues, &expenditures)
}

/// Summarizes collections that are already filtered to `period`.
#[must_use]
pub fn summarize(
    period: Period,
    donations: &[Donation],
    dues: &[Due],
    expenditures: &[Expenditure],
) -> Summary {
    let donations: Vec<&Donation> = donations.iter().collect();
    let dues: Vec<&Due> = dues.iter().collect();
    let expenditures: Vec<&Expenditure> = expenditures.iter().collect();
    summarize_refs(period, &donations, &dues, &expenditures)
}

fn summarize_refs(
    period: Period,
    donations: &[&Donation],
    dues: &[&Due],
    expenditures: &[&Expenditure],
) -> Summary {
    let total_donation: Money = donations.iter().map(|d| d.amount).sum();

    let (paid, unpaid): (Vec<&Due>, Vec<&Due>) = dues.iter().partition(|due| due.is_paid());
    let total_dues: Money = paid.iter().map(|due| due.amount).sum();
    let arrears_amount: Money = unpaid.iter().map(|due| due.amount).sum();

    let total_income = total_donation + total_dues;
    let total_expense: Money = expenditures.iter().map(|e| e.amount).sum();
    let balance = total_income - total_expense;

    let expense_by_category = ExpenseCategory::ALL
        .into_iter()
        .map(|category| {
            let matching = expenditures.iter().filter(|e| e.category == category);
            CategoryTotal {
                category,
                amount: matching.clone().map(|e| e.amount).sum(),
                count: matching.count(),
            }
        })
        .collect();

    let expense_by_funding_source = FundingSource::ALL
        .into_iter()
        .map(|funding_source| {
            let matching = expenditures
                .iter()
                .filter(|e| e.funding_source == funding_source);
            FundingTotal {
                funding_source,
                amount: matching.clone().map(|e| e.amount).sum(),
                count: matching.count(),
            }
        })
        .collect();

    Summary {
        period,
        total_donation,
        total_dues,
        total_income,
        total_expense,
        balance,
        health_ratio: health_ratio(balance, total_income),
        arrears: unpaid.len(),
        arrears_amount,
        donation_count: donations.len(),
        anonymous_donation_count: donations.iter().filter(|d| d.is_anonymous()).count(),
        paid_dues_count: paid.len(),
        expenditure_count: expenditures.len(),
        expense_by_category,
        expense_by_funding_source,
    }
}

/// `round(100 * balance / income)` with halves rounded toward positive
/// infinity, in exact integer arithmetic. `0` when `income` is not positive.
#[must_use]
pub fn health_ratio(balance: Money, income: Money) -> i64 {
    let income = i128::from(income.rupiah());
    if income <= 0 {
        return 0;
    }
    let balance = i128::from(balance.rupiah());
    let ratio = (200 * balance + income).div_euclid(2 * income);
    i64::try_from(ratio).unwrap_or(if ratio.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Income and expense of one calendar month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyFlow {
    /// `YYYY-MM`.
    pub month: String,
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

/// Month-by-month income (donations and paid dues) and expense over the whole
/// snapshot, oldest month first.
///
/// Dues are placed on their period key when it is a well-formed `YYYY-MM`;
/// records without a resolvable month are left out.
#[must_use]
pub fn monthly_flows(sources: &Sources) -> Vec<MonthlyFlow> {
    let mut months: BTreeMap<String, (Money, Money)> = BTreeMap::new();

    for donation in &sources.donations {
        if let Some(month) = resolved_month(donation.date()) {
            months.entry(month).or_default().0 += donation.amount;
        }
    }
    for due in sources.dues.iter().filter(|due| due.is_paid()) {
        let month = due
            .period
            .as_deref()
            .and_then(|raw| PeriodKey::new(raw).ok())
            .filter(PeriodKey::is_well_formed);
        if let Some(month) = month {
            months.entry(month.to_string()).or_default().0 += due.amount;
        }
    }
    for expenditure in &sources.expenditures {
        if let Some(month) = resolved_month(expenditure.date()) {
            months.entry(month).or_default().1 += expenditure.amount;
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expense))| MonthlyFlow {
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}
