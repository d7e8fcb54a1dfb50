//! Answers "what's the low" / "what's the high" over a day range
//!
//! Picks the coldest low or the hottest high among the days asked for.
//! Ties go to the earliest day.

use tracing::error;

use super::{NO_DATA, PROBLEM, day_window, humanize_day, local_date, points_in_window, round_temperature};
use crate::models::{Condition, Forecast, Location, PollenForecast, WeatherRequest};

pub fn can_speak(request: &WeatherRequest) -> bool {
    matches!(request.condition, Condition::Low | Condition::High)
}

pub fn speak(
    _location: &Location,
    forecast: &Forecast,
    _pollen: Option<&PollenForecast>,
    request: &WeatherRequest,
) -> String {
    if !can_speak(request) {
        error!(condition = %request.condition, "tried to speak low/high without asking for low/high");
        return PROBLEM.to_string();
    }

    let (begin, end) = day_window(request);
    let mut points = points_in_window(forecast, begin, end);
    if points.is_empty() {
        return NO_DATA.to_string();
    }

    // sort_by is stable, so equal temperatures keep chronological order
    let (point, temperature) = match request.condition {
        Condition::Low => {
            points.sort_by(|a, b| a.temperature_low.total_cmp(&b.temperature_low));
            (points[0], points[0].temperature_low)
        }
        Condition::High => {
            points.sort_by(|a, b| b.temperature_high.total_cmp(&a.temperature_high));
            (points[0], points[0].temperature_high)
        }
        _ => {
            error!(condition = %request.condition, "tried to speak low/high without asking for low/high");
            return PROBLEM.to_string();
        }
    };

    let day = humanize_day(local_date(point, request.timezone()), request.today());
    format!(
        "{} is the {} {}",
        round_temperature(temperature),
        request.condition,
        day
    )
}
