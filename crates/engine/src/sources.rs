//! Normalization of the three raw ledger collections.
//!
//! Each source is normalized independently. A dirty field never aborts the
//! collection: the field falls back to a documented default (zero amount,
//! unresolved date, unpaid status, `Other` category) and the defect is kept as
//! a [`ParseIssue`].

use api_types::{donation::DonationView, due::DueView, expenditure::ExpenditureView};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    DateOrigin, Donation, Due, DueStatus, ExpenseCategory, Expenditure, FundingSource, Money,
    ParseError, SourceKind,
    util::{folded, id_text, is_anonymous_placeholder, non_blank, parse_amount, parse_timestamp},
};

/// A dirty field found while normalizing one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseIssue {
    pub source: SourceKind,
    pub record_id: String,
    #[serde(serialize_with = "serialize_problem")]
    pub problem: ParseError,
}

fn serialize_problem<S: serde::Serializer>(
    problem: &ParseError,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(problem)
}

/// The three collections exactly as fetched.
#[derive(Clone, Debug, Default)]
pub struct RawSources {
    pub donations: Vec<DonationView>,
    pub dues: Vec<DueView>,
    pub expenditures: Vec<ExpenditureView>,
}

/// Immutable snapshot of the three normalized collections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sources {
    pub donations: Vec<Donation>,
    pub dues: Vec<Due>,
    pub expenditures: Vec<Expenditure>,
    pub issues: Vec<ParseIssue>,
}

impl Sources {
    /// Builds a snapshot from already-normalized records.
    #[must_use]
    pub fn from_records(
        donations: Vec<Donation>,
        dues: Vec<Due>,
        expenditures: Vec<Expenditure>,
    ) -> Self {
        Self {
            donations,
            dues,
            expenditures,
            issues: Vec::new(),
        }
    }

    /// Normalizes the raw collections, keeping every record.
    #[must_use]
    pub fn normalize(raw: RawSources) -> Self {
        let mut issues = Vec::new();

        let donations: Vec<Donation> = raw
            .donations
            .into_iter()
            .map(|view| normalize_donation(view, &mut issues))
            .collect();
        let dues: Vec<Due> = raw
            .dues
            .into_iter()
            .map(|view| normalize_due(view, &mut issues))
            .collect();
        let expenditures: Vec<Expenditure> = raw
            .expenditures
            .into_iter()
            .map(|view| normalize_expenditure(view, &mut issues))
            .collect();

        for issue in &issues {
            tracing::warn!(
                "dirty {} record \"{}\": {}",
                issue.source,
                issue.record_id,
                issue.problem
            );
        }
        tracing::debug!(
            "normalized {} donations, {} dues, {} expenditures ({} issues)",
            donations.len(),
            dues.len(),
            expenditures.len(),
            issues.len()
        );

        Self {
            donations,
            dues,
            expenditures,
            issues,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.donations.is_empty() && self.dues.is_empty() && self.expenditures.is_empty()
    }

    /// Issues raised by one source.
    pub fn issues_for(&self, source: SourceKind) -> impl Iterator<Item = &ParseIssue> {
        self.issues.iter().filter(move |issue| issue.source == source)
    }
}

/// Collects the issues of a single record.
struct IssueSink<'a> {
    source: SourceKind,
    record_id: &'a str,
    issues: &'a mut Vec<ParseIssue>,
}

impl<'a> IssueSink<'a> {
    fn new(source: SourceKind, record_id: &'a str, issues: &'a mut Vec<ParseIssue>) -> Self {
        Self {
            source,
            record_id,
            issues,
        }
    }

    fn note(&mut self, problem: ParseError) {
        self.issues.push(ParseIssue {
            source: self.source,
            record_id: self.record_id.to_string(),
            problem,
        });
    }

    fn amount(&mut self, value: Option<&serde_json::Value>) -> Money {
        parse_amount(value).unwrap_or_else(|problem| {
            self.note(problem);
            Money::ZERO
        })
    }

    /// `None` when absent; an unparseable value is noted and dropped.
    fn optional_timestamp(&mut self, raw: Option<&str>) -> Option<NaiveDateTime> {
        let raw = raw.filter(|raw| !raw.trim().is_empty())?;
        match parse_timestamp(raw) {
            Ok(timestamp) => Some(timestamp),
            Err(problem) => {
                self.note(problem);
                None
            }
        }
    }
}

fn normalize_donation(view: DonationView, issues: &mut Vec<ParseIssue>) -> Donation {
    let id = id_text(view.id.as_ref());
    let mut sink = IssueSink::new(SourceKind::Donation, &id, issues);

    let amount = sink.amount(view.amount.as_ref());
    let recorded_at = sink.optional_timestamp(view.recorded_at.as_deref());
    if view.recorded_at.as_deref().is_none_or(|raw| raw.trim().is_empty()) {
        sink.note(ParseError::MissingDate);
    }
    let donor_name = non_blank(view.donor_name).filter(|name| !is_anonymous_placeholder(name));

    Donation {
        id,
        donor_name,
        amount,
        recorded_at,
    }
}

fn normalize_due(view: DueView, issues: &mut Vec<ParseIssue>) -> Due {
    let id = id_text(view.id.as_ref());
    let mut sink = IssueSink::new(SourceKind::Due, &id, issues);

    let amount = sink.amount(view.amount.as_ref());

    let period = view.period.filter(|period| !period.trim().is_empty());
    if period.is_none() {
        sink.note(ParseError::MissingPeriod);
    }

    let status = match view.status.as_deref().map(folded).as_deref() {
        Some("paid" | "lunas") => DueStatus::Paid,
        Some("unpaid" | "belum" | "belum lunas" | "belum_lunas") => DueStatus::Unpaid,
        None | Some("") => {
            sink.note(ParseError::MissingStatus);
            DueStatus::Unpaid
        }
        Some(other) => {
            sink.note(ParseError::UnknownStatus(other.to_string()));
            DueStatus::Unpaid
        }
    };

    let paid_at = match status {
        DueStatus::Paid => sink.optional_timestamp(view.paid_at.as_deref()),
        DueStatus::Unpaid => None,
    };

    Due {
        id,
        student_id: Some(id_text(view.student_id.as_ref())).filter(|id| !id.is_empty()),
        period,
        amount,
        status,
        paid_at,
    }
}

fn normalize_expenditure(view: ExpenditureView, issues: &mut Vec<ParseIssue>) -> Expenditure {
    let id = id_text(view.id.as_ref());
    let mut sink = IssueSink::new(SourceKind::Expenditure, &id, issues);

    let amount = sink.amount(view.amount.as_ref());

    let category = match view.category.as_deref().map(folded).as_deref() {
        Some("operational" | "operasional") => ExpenseCategory::Operational,
        Some("investment" | "investasi") => ExpenseCategory::Investment,
        Some("other" | "lainnya") => ExpenseCategory::Other,
        None | Some("") => {
            sink.note(ParseError::MissingCategory);
            ExpenseCategory::Other
        }
        Some(other) => {
            sink.note(ParseError::UnknownCategory(other.to_string()));
            ExpenseCategory::Other
        }
    };

    let funding_source = match view.funding_source.as_deref().map(folded).as_deref() {
        Some("dues" | "syahriah") => FundingSource::Dues,
        Some("donation" | "donasi") => FundingSource::Donation,
        Some("mixed" | "campuran") => FundingSource::Mixed,
        None | Some("") => infer_funding_source(
            view.dues_portion.as_ref(),
            view.donation_portion.as_ref(),
        )
        .unwrap_or_else(|| {
            sink.note(ParseError::MissingFundingSource);
            FundingSource::Mixed
        }),
        Some(other) => {
            sink.note(ParseError::UnknownFundingSource(other.to_string()));
            FundingSource::Mixed
        }
    };

    let recorded = sink.optional_timestamp(view.expenditure_date.as_deref());
    let (spent_at, date_origin) = match recorded {
        Some(timestamp) => (Some(timestamp), DateOrigin::Recorded),
        None => match sink.optional_timestamp(view.created_at.as_deref()) {
            Some(timestamp) => (Some(timestamp), DateOrigin::CreatedFallback),
            None => {
                sink.note(ParseError::MissingDate);
                (None, DateOrigin::Missing)
            }
        },
    };

    Expenditure {
        id,
        title: non_blank(view.title).unwrap_or_default(),
        description: non_blank(view.description),
        amount,
        category,
        funding_source,
        spent_at,
        date_origin,
        notes: non_blank(view.notes),
    }
}

/// Infers the funding source from the split portions the ledger records.
fn infer_funding_source(
    dues_portion: Option<&serde_json::Value>,
    donation_portion: Option<&serde_json::Value>,
) -> Option<FundingSource> {
    let positive = |value: Option<&serde_json::Value>| {
        parse_amount(value).is_ok_and(|money| money.rupiah() > 0)
    };
    match (positive(dues_portion), positive(donation_portion)) {
        (true, true) => Some(FundingSource::Mixed),
        (true, false) => Some(FundingSource::Dues),
        (false, true) => Some(FundingSource::Donation),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn donation(amount: Option<serde_json::Value>, recorded_at: Option<&str>) -> DonationView {
        DonationView {
            id: Some(json!("d-1")),
            donor_name: Some("Anonim".to_string()),
            amount,
            recorded_at: recorded_at.map(str::to_string),
        }
    }

    fn due(status: Option<&str>, period: Option<&str>) -> DueView {
        DueView {
            id: Some(json!("s-1")),
            student_id: Some(json!("santri-1")),
            period: period.map(str::to_string),
            amount: Some(json!(110000)),
            status: status.map(str::to_string),
            paid_at: Some("2025-06-03T10:00:00+07:00".to_string()),
        }
    }

    fn expenditure() -> ExpenditureView {
        ExpenditureView {
            id: Some(json!("p-1")),
            title: Some("Listrik".to_string()),
            amount: Some(json!(200000)),
            category: Some("operasional".to_string()),
            created_at: Some("2025-06-15T10:00:00+07:00".to_string()),
            ..ExpenditureView::default()
        }
    }

    fn normalize(raw: RawSources) -> Sources {
        Sources::normalize(raw)
    }

    #[test]
    fn missing_amount_becomes_zero_and_is_reported() {
        let sources = normalize(RawSources {
            donations: vec![
                donation(None, Some("2025-06-10T08:00:00+07:00")),
                donation(Some(json!(1000000)), Some("2025-06-11T08:00:00+07:00")),
            ],
            ..RawSources::default()
        });

        assert_eq!(sources.donations.len(), 2);
        assert_eq!(sources.donations[0].amount, Money::ZERO);
        assert_eq!(sources.donations[1].amount, Money::new(1_000_000));
        assert_eq!(
            sources.issues,
            vec![ParseIssue {
                source: SourceKind::Donation,
                record_id: "d-1".to_string(),
                problem: ParseError::MissingAmount,
            }]
        );
    }

    #[test]
    fn placeholder_donor_is_anonymous() {
        let sources = normalize(RawSources {
            donations: vec![donation(Some(json!(5)), Some("2025-06-10"))],
            ..RawSources::default()
        });
        assert!(sources.donations[0].is_anonymous());
    }

    #[test]
    fn donation_without_date_is_kept_undated() {
        let sources = normalize(RawSources {
            donations: vec![donation(Some(json!(5)), None)],
            ..RawSources::default()
        });
        assert_eq!(sources.donations[0].recorded_at, None);
        assert_eq!(sources.issues[0].problem, ParseError::MissingDate);
    }

    #[test]
    fn due_status_accepts_both_vocabularies() {
        let sources = normalize(RawSources {
            dues: vec![
                due(Some("lunas"), Some("2025-06")),
                due(Some("PAID"), Some("2025-06")),
                due(Some("belum"), Some("2025-06")),
            ],
            ..RawSources::default()
        });
        let statuses: Vec<DueStatus> = sources.dues.iter().map(|due| due.status).collect();
        assert_eq!(
            statuses,
            vec![DueStatus::Paid, DueStatus::Paid, DueStatus::Unpaid]
        );
        assert!(sources.issues.is_empty());
    }

    #[test]
    fn unpaid_due_drops_paid_at() {
        let sources = normalize(RawSources {
            dues: vec![due(Some("belum"), Some("2025-06"))],
            ..RawSources::default()
        });
        assert_eq!(sources.dues[0].paid_at, None);
    }

    #[test]
    fn due_period_is_kept_verbatim() {
        let sources = normalize(RawSources {
            dues: vec![due(Some("lunas"), Some("2025/06"))],
            ..RawSources::default()
        });
        assert_eq!(sources.dues[0].period.as_deref(), Some("2025/06"));
    }

    #[test]
    fn unknown_status_counts_as_unpaid() {
        let sources = normalize(RawSources {
            dues: vec![due(Some("cicil"), Some("2025-06")), due(None, None)],
            ..RawSources::default()
        });
        assert!(sources.dues.iter().all(|due| !due.is_paid()));
        let problems: Vec<&ParseError> =
            sources.issues.iter().map(|issue| &issue.problem).collect();
        assert_eq!(
            problems,
            vec![
                &ParseError::UnknownStatus("cicil".to_string()),
                &ParseError::MissingPeriod,
                &ParseError::MissingStatus,
            ]
        );
    }

    #[test]
    fn expenditure_date_falls_back_to_creation() {
        let sources = normalize(RawSources {
            expenditures: vec![expenditure()],
            ..RawSources::default()
        });
        let item = &sources.expenditures[0];
        assert_eq!(item.date_origin, DateOrigin::CreatedFallback);
        assert_eq!(
            item.date(),
            chrono::NaiveDate::from_ymd_opt(2025, 6, 15)
        );
    }

    #[test]
    fn recorded_expenditure_date_wins() {
        let mut view = expenditure();
        view.expenditure_date = Some("2025-05-31".to_string());
        let sources = normalize(RawSources {
            expenditures: vec![view],
            ..RawSources::default()
        });
        let item = &sources.expenditures[0];
        assert_eq!(item.date_origin, DateOrigin::Recorded);
        assert_eq!(item.date(), chrono::NaiveDate::from_ymd_opt(2025, 5, 31));
    }

    #[test]
    fn funding_source_is_inferred_from_portions() {
        let mut mixed = expenditure();
        mixed.dues_portion = Some(json!(100000));
        mixed.donation_portion = Some(json!(100000));
        let mut dues_only = expenditure();
        dues_only.dues_portion = Some(json!(200000));
        dues_only.donation_portion = Some(json!(0));
        let unknown = expenditure();

        let sources = normalize(RawSources {
            expenditures: vec![mixed, dues_only, unknown],
            ..RawSources::default()
        });
        let funding: Vec<FundingSource> = sources
            .expenditures
            .iter()
            .map(|item| item.funding_source)
            .collect();
        assert_eq!(
            funding,
            vec![
                FundingSource::Mixed,
                FundingSource::Dues,
                FundingSource::Mixed
            ]
        );
        assert_eq!(sources.issues.len(), 1);
        assert_eq!(sources.issues[0].problem, ParseError::MissingFundingSource);
    }

    #[test]
    fn explicit_funding_source_is_used() {
        let mut view = expenditure();
        view.funding_source = Some("Donasi".to_string());
        view.dues_portion = Some(json!(200000));
        let sources = normalize(RawSources {
            expenditures: vec![view],
            ..RawSources::default()
        });
        assert_eq!(
            sources.expenditures[0].funding_source,
            FundingSource::Donation
        );
    }
}
