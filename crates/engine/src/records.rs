//! Normalized, typed records of the three ledger sources.
//!
//! Records are built once by [`Sources::normalize`](crate::Sources::normalize)
//! and never mutated afterwards.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{
    Money,
    period::{PeriodAnchor, PeriodScoped, month_key},
};

/// Label shown for donations without a donor name.
pub const ANONYMOUS_DONOR: &str = "Anonim";

/// The three independent collections the engine reconciles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Donation,
    Due,
    Expenditure,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::Donation, Self::Due, Self::Expenditure];

    /// Section and sheet title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Donation => "Donasi",
            Self::Due => "Syahriah",
            Self::Expenditure => "Pemakaian",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Donation => "donations",
            Self::Due => "dues",
            Self::Expenditure => "expenditures",
        })
    }
}

/// One-time voluntary contribution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Donation {
    pub id: String,
    /// `None` for anonymous donors.
    pub donor_name: Option<String>,
    pub amount: Money,
    pub recorded_at: Option<NaiveDateTime>,
}

impl Donation {
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.donor_name.is_none()
    }

    #[must_use]
    pub fn donor_label(&self) -> &str {
        self.donor_name.as_deref().unwrap_or(ANONYMOUS_DONOR)
    }

    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.recorded_at.map(|ts| ts.date())
    }
}

impl PeriodScoped for Donation {
    fn anchor(&self) -> PeriodAnchor<'_> {
        PeriodAnchor::Date(self.date())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Paid,
    Unpaid,
}

impl DueStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Lunas",
            Self::Unpaid => "Belum Lunas",
        }
    }
}

/// Monthly fee owed for one student.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Due {
    pub id: String,
    pub student_id: Option<String>,
    /// Period text exactly as stored by the ledger.
    pub period: Option<String>,
    pub amount: Money,
    pub status: DueStatus,
    /// Only ever set on paid dues.
    pub paid_at: Option<NaiveDateTime>,
}

impl Due {
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == DueStatus::Paid
    }
}

impl PeriodScoped for Due {
    fn anchor(&self) -> PeriodAnchor<'_> {
        PeriodAnchor::Key(self.period.as_deref())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Operational,
    Investment,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 3] = [Self::Operational, Self::Investment, Self::Other];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Operational => "Operasional",
            Self::Investment => "Investasi",
            Self::Other => "Lainnya",
        }
    }
}

/// Nominal source of the money spent. Informational only: it never filters
/// the top-line expense total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    Dues,
    Donation,
    Mixed,
}

impl FundingSource {
    pub const ALL: [FundingSource; 3] = [Self::Dues, Self::Donation, Self::Mixed];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dues => "Syahriah",
            Self::Donation => "Donasi",
            Self::Mixed => "Campuran",
        }
    }
}

/// Which field the resolved expenditure date came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrigin {
    /// `expenditure_date`.
    Recorded,
    /// `created_at`, used when no expenditure date was recorded.
    CreatedFallback,
    Missing,
}

impl DateOrigin {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recorded => "Tanggal pemakaian",
            Self::CreatedFallback => "Tanggal input",
            Self::Missing => "-",
        }
    }
}

/// Outgoing use of funds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Expenditure {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: Money,
    pub category: ExpenseCategory,
    pub funding_source: FundingSource,
    /// Resolved date: expenditure date, else creation timestamp.
    pub spent_at: Option<NaiveDateTime>,
    pub date_origin: DateOrigin,
    pub notes: Option<String>,
}

impl Expenditure {
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.spent_at.map(|ts| ts.date())
    }
}

impl PeriodScoped for Expenditure {
    fn anchor(&self) -> PeriodAnchor<'_> {
        PeriodAnchor::Date(self.date())
    }
}

/// Resolved `YYYY-MM` of a dated record, used for display columns.
pub(crate) fn resolved_month(date: Option<NaiveDate>) -> Option<String> {
    date.map(month_key)
}
