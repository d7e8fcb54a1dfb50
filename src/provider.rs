//! Weather provider client
//!
//! One HTTPS GET per fetch against a Dark Sky style endpoint
//! (`{base_url}/forecast/{token}/{lat},{lon}`). No retries: a failed
//! fetch is reported to the caller as is.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

use crate::SkyvoiceError;
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::{Coordinate, Forecast};

/// Source of truth for forecasts
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch(&self, coordinate: &Coordinate) -> Result<Forecast, ProviderError>;
}

/// HTTP client for the forecast API
pub struct DarkSkyClient {
    client: Client,
    token: String,
    base_url: String,
}

impl DarkSkyClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a client from the provider configuration
    pub fn new(config: &ProviderConfig) -> crate::Result<Self> {
        let token = config.token.clone().unwrap_or_default();
        Self::with_base_url(token, &config.base_url, config.timeout())
    }

    pub fn with_base_url(
        token: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(SkyvoiceError::config("provider token cannot be empty"));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("skyvoice/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SkyvoiceError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn forecast_url(&self, coordinate: &Coordinate) -> String {
        format!("{}/forecast/{}/{}", self.base_url, self.token, coordinate)
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyClient {
    #[instrument(name = "fetch_forecast", skip(self), fields(latitude = %coordinate.latitude, longitude = %coordinate.longitude))]
    async fn fetch(&self, coordinate: &Coordinate) -> Result<Forecast, ProviderError> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(self.forecast_url(coordinate))
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            // an unreadable error body must not hide the status
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await.map_err(ProviderError::Transport)?;

        let forecast: Forecast = serde_json::from_str(&body).map_err(ProviderError::Decode)?;

        let elapsed = start_time.elapsed();
        debug!(
            days = forecast.daily_points().len(),
            "fetched forecast in {:.3}s",
            elapsed.as_secs_f64()
        );
        if elapsed.as_secs() >= 3 {
            warn!("Slow provider response detected: {:.3}s", elapsed.as_secs_f64());
        }

        Ok(forecast)
    }
}
