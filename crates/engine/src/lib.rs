//! Reconciliation and reporting core of the treasury.
//!
//! The engine turns three independently fetched ledger collections (donations,
//! monthly dues and expenditures) into one period-scoped [`Summary`] and
//! renders exactly that summary into the export artifacts. It performs no
//! network I/O: callers fetch the raw collections and hand them to
//! [`Sources::normalize`].

pub use error::{EngineError, ExportError, ParseError};
pub use export::{
    Artifact, ExportFormat, ExportOptions, Letterhead, ReportView, export, export_delimited_text,
    export_document, export_workbook, file_name,
};
pub use money::Money;
pub use period::{Period, PeriodAnchor, PeriodFilter, PeriodKey, PeriodScoped, list_periods, month_key};
pub use records::{
    ANONYMOUS_DONOR, DateOrigin, Donation, Due, DueStatus, ExpenseCategory, Expenditure,
    FundingSource, SourceKind,
};
pub use sources::{ParseIssue, RawSources, Sources};
pub use state::{AggregationState, FinancialReportState, Phase};
pub use summary::{
    CategoryTotal, FundingTotal, MonthlyFlow, Summary, compute_summary, health_ratio,
    monthly_flows, summarize,
};

mod error;
mod export;
mod money;
mod period;
mod records;
mod sources;
mod state;
mod summary;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
