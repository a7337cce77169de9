use api_types::{
    donation::DonationView,
    due::DueView,
    expenditure::ExpenditureView,
    list::{ListQuery, ListResponse},
};
use engine::{RawSources, SourceKind};
use reqwest::Url;
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
};

/// Upper bound on pages walked for one source.
const MAX_PAGES: u32 = 10_000;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("server error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("undecodable response: {0}")]
    Decode(String),
}

/// A source could not be fetched. Fatal to the aggregation attempt.
#[derive(Debug, Error)]
#[error("failed to fetch {kind}: {error}")]
pub struct FetchError {
    pub kind: SourceKind,
    #[source]
    pub error: ClientError,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(alias = "message")]
    error: String,
}

/// Read-only client of the ledger list endpoints.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
    page_size: u32,
}

impl Client {
    pub fn new(base_url: &str, token: Option<String>, page_size: u32) -> Result<Self> {
        // `join` drops the last path segment unless the base ends with '/'.
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base)
            .map_err(|err| AppError::InvalidConfig(format!("invalid base_url: {err}")))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
            token,
            page_size: page_size.max(1),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.base_url, config.token.clone(), config.page_size)
    }

    /// Relative path of a source's list endpoint.
    #[must_use]
    pub const fn endpoint(kind: SourceKind) -> &'static str {
        match kind {
            SourceKind::Donation => "api/admin/donasi",
            SourceKind::Due => "api/admin/syahriah",
            SourceKind::Expenditure => "api/admin/pemakaian",
        }
    }

    /// Fetches the three sources concurrently. The first failure wins and no
    /// partial result is returned.
    pub async fn fetch_sources(&self) -> std::result::Result<RawSources, FetchError> {
        let (donations, dues, expenditures) = tokio::try_join!(
            self.list_all::<DonationView>(SourceKind::Donation),
            self.list_all::<DueView>(SourceKind::Due),
            self.list_all::<ExpenditureView>(SourceKind::Expenditure),
        )?;
        Ok(RawSources {
            donations,
            dues,
            expenditures,
        })
    }

    /// Walks every page of one source.
    pub async fn list_all<T: DeserializeOwned>(
        &self,
        kind: SourceKind,
    ) -> std::result::Result<Vec<T>, FetchError> {
        let fail = |error| FetchError { kind, error };
        tracing::info!("fetching {kind}");

        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let response: ListResponse<T> = self
                .list_page(Self::endpoint(kind), page)
                .await
                .map_err(fail)?;
            tracing::debug!("{kind} page {page}: {} records", response.data.len());

            let more = response.has_more_after(page) && !response.data.is_empty();
            items.extend(response.data);
            if !more {
                break;
            }
            if page >= MAX_PAGES {
                return Err(fail(ClientError::Server(format!(
                    "more than {MAX_PAGES} pages"
                ))));
            }
            page += 1;
        }

        tracing::info!("fetched {} {kind}", items.len());
        Ok(items)
    }

    async fn list_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> std::result::Result<ListResponse<T>, ClientError> {
        let endpoint = self
            .base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))?;

        let mut request = self.http.get(endpoint).query(&ListQuery {
            page,
            limit: self.page_size,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let res = request.send().await.map_err(ClientError::Transport)?;

        if res.status().is_success() {
            return res.json::<ListResponse<T>>().await.map_err(|err| {
                if err.is_decode() {
                    ClientError::Decode(err.to_string())
                } else {
                    ClientError::Transport(err)
                }
            });
        }

        let status = res.status();
        let body = res
            .json::<ErrorResponse>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| format!("status {status}"));

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            _ => ClientError::Server(body),
        };
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_its_path() {
        let client = Client::new("http://ledger.local/backend", None, 50).unwrap();
        assert_eq!(
            client.base_url.join(Client::endpoint(SourceKind::Due)).unwrap().as_str(),
            "http://ledger.local/backend/api/admin/syahriah"
        );
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        assert!(matches!(
            Client::new("not a url", None, 50),
            Err(AppError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fetch_error_names_the_source() {
        let err = FetchError {
            kind: SourceKind::Expenditure,
            error: ClientError::Unauthorized,
        };
        assert_eq!(err.to_string(), "failed to fetch expenditures: unauthorized");
    }
}
