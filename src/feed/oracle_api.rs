use super::types::*;
use super::{parse_envelope, FetchError, MatchFeed};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

const TODAY_MATCHES_PATH: &str = "/api/today-matches";
const LEAGUES_PATH: &str = "/api/leagues";

/// Client for the OracleNet prediction backend.
pub struct OracleApi {
    client: Client,
    base_url: String,
}

impl OracleApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_envelope<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let resp = self.client.get(&url).send().await?;
        let http_error = resp.error_for_status_ref().err();
        let body = resp.text().await?;

        match http_error {
            None => parse_envelope(&body),
            // An error envelope on a non-2xx response still names the backend failure.
            Some(e) => match parse_envelope::<T>(&body) {
                Err(app @ FetchError::Application { .. }) => Err(app),
                _ => {
                    tracing::debug!(%url, status = e.status().map_or(0, |s| s.as_u16()), "HTTP error status");
                    Err(FetchError::Transport(e))
                }
            },
        }
    }
}

#[async_trait]
impl MatchFeed for OracleApi {
    async fn fetch_matches(&mut self) -> Result<Vec<Match>, FetchError> {
        self.get_envelope(TODAY_MATCHES_PATH).await
    }

    async fn fetch_leagues(&mut self) -> Result<Vec<League>, FetchError> {
        self.get_envelope(LEAGUES_PATH).await
    }
}
