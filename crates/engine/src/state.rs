//! Report state and the aggregation cycle.
//!
//! ```text
//! idle ──start_loading──▶ loading ──resolve(Ok)──▶ ready
//!                            │                      │
//!                            └──resolve(Err)──▶ failed
//! ready ──select_period──▶ ready   (synchronous, no fetch)
//! ```

use std::sync::Arc;

use crate::{
    Donation, Due, EngineError, Expenditure, Period, PeriodFilter, ReportView, ResultEngine,
    Sources, Summary, list_periods, summarize,
};

/// Immutable result of one aggregation: the snapshot, the selected period,
/// the filtered collections and their summary.
///
/// A period change builds a new value; views borrowed from an older value
/// are never affected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinancialReportState {
    sources: Arc<Sources>,
    period: Period,
    donations: Vec<Donation>,
    dues: Vec<Due>,
    expenditures: Vec<Expenditure>,
    summary: Summary,
}

impl FinancialReportState {
    #[must_use]
    pub fn new(sources: Arc<Sources>, period: Period) -> Self {
        let filter = PeriodFilter::new(period.clone());
        let donations = filter.apply(&sources.donations);
        let dues = filter.apply(&sources.dues);
        let expenditures = filter.apply(&sources.expenditures);
        let summary = summarize(period.clone(), &donations, &dues, &expenditures);

        Self {
            sources,
            period,
            donations,
            dues,
            expenditures,
            summary,
        }
    }

    /// Re-aggregates the same snapshot for another period.
    #[must_use]
    pub fn with_period(&self, period: Period) -> Self {
        Self::new(Arc::clone(&self.sources), period)
    }

    #[must_use]
    pub fn period(&self) -> &Period {
        &self.period
    }

    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    #[must_use]
    pub fn sources(&self) -> &Arc<Sources> {
        &self.sources
    }

    #[must_use]
    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    #[must_use]
    pub fn dues(&self) -> &[Due] {
        &self.dues
    }

    #[must_use]
    pub fn expenditures(&self) -> &[Expenditure] {
        &self.expenditures
    }

    /// Periods selectable over the whole snapshot.
    #[must_use]
    pub fn periods(&self) -> Vec<Period> {
        list_periods(&self.sources.dues)
    }

    /// The exact data shown on screen, handed to the exporters.
    #[must_use]
    pub fn view(&self) -> ReportView<'_> {
        ReportView::new(
            &self.period,
            &self.summary,
            &self.donations,
            &self.dues,
            &self.expenditures,
        )
    }
}

/// Name of an [`AggregationState`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// One aggregation cycle. `E` is the fetch error of the caller's transport.
#[derive(Debug, Default)]
pub enum AggregationState<E> {
    #[default]
    Idle,
    Loading,
    Ready(FinancialReportState),
    Failed(E),
}

impl<E> AggregationState<E> {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Loading => Phase::Loading,
            Self::Ready(_) => Phase::Ready,
            Self::Failed(_) => Phase::Failed,
        }
    }

    /// Enters `loading` for a (re)fetch. A fetch started from `loading`
    /// supersedes the pending one.
    pub fn start_loading(&mut self) {
        *self = Self::Loading;
    }

    /// Completes a fetch started with [`start_loading`](Self::start_loading).
    pub fn resolve(&mut self, fetched: Result<Arc<Sources>, E>, period: Period) -> ResultEngine<()> {
        if !matches!(self, Self::Loading) {
            return Err(self.invalid("resolve a fetch"));
        }
        *self = match fetched {
            Ok(sources) => Self::Ready(FinancialReportState::new(sources, period)),
            Err(err) => Self::Failed(err),
        };
        Ok(())
    }

    /// Re-aggregates the current snapshot for `period` without fetching.
    pub fn select_period(&mut self, period: Period) -> ResultEngine<()> {
        let Self::Ready(current) = &*self else {
            return Err(self.invalid("select a period"));
        };
        let sources = Arc::clone(current.sources());
        *self = Self::Ready(FinancialReportState::new(sources, period));
        Ok(())
    }

    #[must_use]
    pub fn ready(&self) -> Option<&FinancialReportState> {
        match self {
            Self::Ready(state) => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn invalid(&self, action: &'static str) -> EngineError {
        EngineError::InvalidTransition {
            phase: self.phase().as_str(),
            action,
        }
    }
}
