//! The weather skill: from a resolved query to a spoken answer

use tracing::{error, warn};

use crate::models::{Location, PollenForecast, WeatherRequest};
use crate::speech::{self, COULD_NOT_RETRIEVE, UNSUPPORTED};
use crate::write_through::WriteThrough;

/// Answers weather queries using cached or freshly fetched forecasts
pub struct WeatherSkill {
    forecasts: WriteThrough,
}

impl WeatherSkill {
    pub fn new(forecasts: WriteThrough) -> Self {
        Self { forecasts }
    }

    /// The forecast service backing this skill, e.g. to flush it before exit
    pub fn forecasts_mut(&mut self) -> &mut WriteThrough {
        &mut self.forecasts
    }

    /// Spoken answer for `request` at `location`. Never fails: a provider
    /// failure becomes "could not retrieve", a query no speaker handles
    /// becomes "unsupported" without fetching anything.
    #[tracing::instrument(name = "answer", skip_all, fields(condition = %request.condition))]
    pub async fn answer(
        &self,
        location: &Location,
        pollen: Option<&PollenForecast>,
        request: &WeatherRequest,
    ) -> String {
        let Some(speaker) = speech::select(request) else {
            warn!("no speaker for condition");
            return UNSUPPORTED.to_string();
        };

        match self.forecasts.get_forecast(&location.coordinate).await {
            Ok(forecast) => speaker.speak(location, &forecast, pollen, request),
            Err(e) => {
                error!(error = %e, "failed to get forecast");
                COULD_NOT_RETRIEVE.to_string()
            }
        }
    }
}
