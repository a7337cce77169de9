//! Reporting periods and the per-source period predicate.
//!
//! A [`Period`] is either the `all` sentinel or a year-month key. Dues carry
//! their key as text and are matched by **exact** string comparison; donations
//! and expenditures are matched on the `YYYY-MM` of their resolved date.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

use crate::{Due, EngineError, ResultEngine};

const ALL_TOKENS: [&str; 2] = ["all", "semua"];

const MONTH_NAMES: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Indonesian month name, `month` in `1..=12`.
pub(crate) fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// `YYYY-MM` key of a calendar date.
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// A year-month key exactly as it is written on due records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    /// Wraps a key without normalizing it. Blank keys are rejected.
    pub fn new(key: impl Into<String>) -> ResultEngine<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(EngineError::InvalidPeriod(key));
        }
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `(year, month)` when the key has the canonical `YYYY-MM` shape.
    #[must_use]
    pub fn year_month(&self) -> Option<(i32, u32)> {
        let (year, month) = self.0.split_once('-')?;
        if year.len() != 4 || month.len() != 2 {
            return None;
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some((year, month))
    }

    /// A malformed key can still match dues exactly, but never a dated record.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.year_month().is_some()
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        month_key(date) == self.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reporting period selected by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Period {
    /// No period filter.
    #[default]
    All,
    Month(PeriodKey),
}

impl Period {
    pub fn month(key: impl Into<String>) -> ResultEngine<Self> {
        PeriodKey::new(key).map(Self::Month)
    }

    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    #[must_use]
    pub fn key(&self) -> Option<&PeriodKey> {
        match self {
            Self::All => None,
            Self::Month(key) => Some(key),
        }
    }

    /// Human label used on documents: `Juni 2025`, `Semua Periode`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::All => "Semua Periode".to_string(),
            Self::Month(key) => match key.year_month() {
                Some((year, month)) => match month_name(month) {
                    Some(name) => format!("{name} {year}"),
                    None => key.to_string(),
                },
                None => key.to_string(),
            },
        }
    }

    /// Filename-safe token: `2025-06`, `semua`.
    #[must_use]
    pub fn file_token(&self) -> String {
        match self {
            Self::All => "semua".to_string(),
            Self::Month(key) => key
                .as_str()
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Month(key) => f.write_str(key.as_str()),
        }
    }
}

impl FromStr for Period {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidPeriod(s.to_string()));
        }
        if ALL_TOKENS
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
        {
            return Ok(Self::All);
        }
        Self::month(trimmed)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What a record is matched on when a concrete period is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodAnchor<'a> {
    /// Raw period text, compared exactly.
    Key(Option<&'a str>),
    /// Resolved calendar date, compared on its `YYYY-MM`.
    Date(Option<NaiveDate>),
}

/// Records that can be scoped to a reporting period.
pub trait PeriodScoped {
    fn anchor(&self) -> PeriodAnchor<'_>;
}

/// Predicate selecting the records of one [`Period`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    period: Period,
}

impl PeriodFilter {
    #[must_use]
    pub fn new(period: Period) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn period(&self) -> &Period {
        &self.period
    }

    /// Records without a usable anchor never match a concrete period.
    pub fn matches<R: PeriodScoped + ?Sized>(&self, record: &R) -> bool {
        let Period::Month(key) = &self.period else {
            return true;
        };
        match record.anchor() {
            PeriodAnchor::Key(Some(raw)) => raw == key.as_str(),
            PeriodAnchor::Date(Some(date)) => key.matches_date(date),
            PeriodAnchor::Key(None) | PeriodAnchor::Date(None) => false,
        }
    }

    /// Copies the matching records, keeping their order.
    pub fn apply<R: PeriodScoped + Clone>(&self, records: &[R]) -> Vec<R> {
        records
            .iter()
            .filter(|record| self.matches(*record))
            .cloned()
            .collect()
    }
}

/// Selectable periods: `all` first, then every distinct due period, newest
/// first.
#[must_use]
pub fn list_periods(dues: &[Due]) -> Vec<Period> {
    let keys: BTreeSet<&str> = dues
        .iter()
        .filter_map(|due| due.period.as_deref())
        .filter(|key| !key.trim().is_empty())
        .collect();

    std::iter::once(Period::All)
        .chain(
            keys.into_iter()
                .rev()
                .map(|key| Period::Month(PeriodKey(key.to_string()))),
        )
        .collect()
}
