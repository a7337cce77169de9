use std::sync::Arc;

use engine::{AggregationState, EngineError, FinancialReportState, Period, PeriodKey, Sources};

use crate::{
    client::{Client, FetchError},
    error::{AppError, Result},
};

/// Drives one aggregation cycle against the ledger.
///
/// Only [`refresh`](Self::refresh) talks to the network; a period change
/// re-aggregates the snapshot already held.
#[derive(Debug)]
pub struct ReportSession {
    client: Client,
    period: Period,
    state: AggregationState<Arc<FetchError>>,
}

impl ReportSession {
    #[must_use]
    pub fn new(client: Client, period: Period) -> Self {
        warn_if_malformed(&period);
        Self {
            client,
            period,
            state: AggregationState::default(),
        }
    }

    #[must_use]
    pub fn period(&self) -> &Period {
        &self.period
    }

    #[must_use]
    pub fn state(&self) -> &AggregationState<Arc<FetchError>> {
        &self.state
    }

    /// Fetches all three sources again and re-aggregates.
    pub async fn refresh(&mut self) -> Result<&FinancialReportState> {
        self.state.start_loading();

        let fetched = match self.client.fetch_sources().await {
            Ok(raw) => {
                let sources = Sources::normalize(raw);
                if !sources.issues.is_empty() {
                    tracing::warn!("{} dirty records kept with defaults", sources.issues.len());
                }
                Ok(Arc::new(sources))
            }
            Err(err) => {
                tracing::error!("failed to aggregate ledger sources: {err}");
                Err(Arc::new(err))
            }
        };
        self.state.resolve(fetched, self.period.clone())?;
        self.current()
    }

    /// Selects another period over the current snapshot. No request is sent.
    pub fn select_period(&mut self, period: Period) -> Result<&FinancialReportState> {
        warn_if_malformed(&period);
        self.state.select_period(period.clone())?;
        self.period = period;
        self.current()
    }

    /// The ready state, or the error that ended the last cycle.
    pub fn current(&self) -> Result<&FinancialReportState> {
        match &self.state {
            AggregationState::Ready(state) => Ok(state),
            AggregationState::Failed(err) => Err(AppError::Fetch(Arc::clone(err))),
            other => Err(AppError::Engine(EngineError::InvalidTransition {
                phase: other.phase().as_str(),
                action: "read the report",
            })),
        }
    }
}

/// A key outside `YYYY-MM` still matches dues by exact text but never a
/// dated donation or expenditure.
fn malformed_key(period: &Period) -> Option<&PeriodKey> {
    period.key().filter(|key| !key.is_well_formed())
}

fn warn_if_malformed(period: &Period) {
    if let Some(key) = malformed_key(period) {
        tracing::warn!("period {key} is not YYYY-MM; only dues with that exact key will match");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_concrete_malformed_keys_are_flagged() {
        assert_eq!(malformed_key(&Period::All), None);
        assert_eq!(malformed_key(&Period::month("2025-06").unwrap()), None);

        let slash = Period::month("2025/06").unwrap();
        assert_eq!(malformed_key(&slash).map(PeriodKey::as_str), Some("2025/06"));
        assert!(malformed_key(&Period::month("2025-13").unwrap()).is_some());
    }
}
