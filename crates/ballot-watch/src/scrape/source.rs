use super::request::{FlatQuery, SessionQuery};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Transport-level failure talking to the availability service.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http client could not be built: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
}

/// Where availability pages come from.
///
/// The driver only needs one session and one page per query, so tests can
/// substitute canned pages for the live service.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Establishes whatever session state the service needs before queries.
    async fn open_session(&mut self) -> Result<(), FetchError>;
    async fn fetch_page(&mut self, query: &FlatQuery<'_>) -> Result<String, FetchError>;
}

/// Live source backed by a cookie-keeping HTTP client.
#[derive(Debug)]
pub struct HttpPageSource {
    client: Client,
    url: String,
    session: SessionQuery,
}

impl HttpPageSource {
    pub fn new(
        url: impl Into<String>,
        session: SessionQuery,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            url: url.into(),
            session,
        })
    }

    async fn get_text<Q: serde::Serialize + ?Sized>(&self, query: &Q) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: self.url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.url)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status,
            });
        }

        response.text().await.map_err(transport)
    }
}

impl PageSource for HttpPageSource {
    async fn open_session(&mut self) -> Result<(), FetchError> {
        debug!(url = %self.url, "opening upstream session");
        self.get_text(&self.session).await.map(|_| ())
    }

    async fn fetch_page(&mut self, query: &FlatQuery<'_>) -> Result<String, FetchError> {
        self.get_text(query).await
    }
}
