//! Write-through forecast service
//!
//! Reads prefer the cache. A miss falls back to the provider and the
//! result is written back in the background: the caller never waits for
//! the write and never sees its outcome. Store failures are logged and
//! otherwise ignored, so the store going down only costs latency.

use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, error, info, info_span};

use crate::cache::ForecastCache;
use crate::error::ForecastError;
use crate::models::{Coordinate, Forecast};
use crate::provider::ForecastProvider;

/// Cache in front of a forecast provider
pub struct WriteThrough {
    cache: Arc<ForecastCache>,
    provider: Arc<dyn ForecastProvider>,
    background: TaskTracker,
}

impl WriteThrough {
    pub fn new(cache: Arc<ForecastCache>, provider: Arc<dyn ForecastProvider>) -> Self {
        Self {
            cache,
            provider,
            background: TaskTracker::new(),
        }
    }

    /// Forecast for `coordinate`, from the cache when present.
    ///
    /// Only provider failures are returned. Concurrent misses for the
    /// same coordinate each call the provider.
    #[tracing::instrument(name = "get_forecast", skip(self), fields(latitude = %coordinate.latitude, longitude = %coordinate.longitude))]
    pub async fn get_forecast(&self, coordinate: &Coordinate) -> Result<Forecast, ForecastError> {
        match self.cache.get(coordinate).await {
            Ok(Some(cached)) => {
                info!("cache hit");
                return Ok(cached);
            }
            Ok(None) => info!("cache miss"),
            Err(e) => error!(error = %e, "failed to get cached forecast"),
        }

        let forecast = self
            .provider
            .fetch(coordinate)
            .await
            .map_err(|source| ForecastError::Provider {
                coordinate: coordinate.cache_key(),
                source,
            })?;

        self.spawn_cache_write(coordinate.clone(), forecast.clone());
        Ok(forecast)
    }

    /// Waits until every background cache write started so far has finished.
    ///
    /// Takes `&mut self`: the tracker is closed for the duration of the
    /// wait, so no lookup or second flush may run alongside it.
    pub async fn flush(&mut self) {
        self.background.close();
        self.background.wait().await;
        self.background.reopen();
    }

    /// Number of background cache writes still running
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.background.len()
    }

    // Runs on its own task so dropping the caller's future cannot cancel it.
    fn spawn_cache_write(&self, coordinate: Coordinate, forecast: Forecast) {
        let cache = Arc::clone(&self.cache);
        let span = info_span!(
            "put_forecast",
            latitude = %coordinate.latitude,
            longitude = %coordinate.longitude
        );
        self.background.spawn(
            async move {
                if let Err(e) = cache.put(&coordinate, &forecast).await {
                    error!(error = %e, "failed to put cache");
                }
            }
            .instrument(span),
        );
    }
}
