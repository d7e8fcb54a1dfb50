//! Answers "what's the weather" with the provider's day summary

use tracing::error;

use super::{NO_DATA, PROBLEM, day_window, humanize_day, local_date, points_in_window};
use crate::models::{Condition, Forecast, Location, PollenForecast, WeatherRequest};

pub fn can_speak(request: &WeatherRequest) -> bool {
    request.condition == Condition::Summary
}

/// Summary of the first day in range that has one
pub fn speak(
    _location: &Location,
    forecast: &Forecast,
    _pollen: Option<&PollenForecast>,
    request: &WeatherRequest,
) -> String {
    if !can_speak(request) {
        error!(condition = %request.condition, "tried to speak summary without asking for it");
        return PROBLEM.to_string();
    }

    let (begin, end) = day_window(request);
    let Some((point, summary)) = points_in_window(forecast, begin, end)
        .into_iter()
        .find_map(|p| p.summary.as_deref().map(|s| (p, s)))
    else {
        return NO_DATA.to_string();
    };

    let day = humanize_day(local_date(point, request.timezone()), request.today());
    format!("{}: {}", capitalize(&day), summary)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_speaks_first_summary_in_range() {
        let mut first = point(2024, 1, 2, 1.0, 2.0);
        let mut second = point(2024, 1, 3, 1.0, 2.0);
        first.summary = Some("Light rain in the morning.".to_string());
        second.summary = Some("Clear throughout the day.".to_string());
        let data = forecast(vec![first, second]);
        let req = request(Condition::Summary, day(2024, 1, 2), day(2024, 1, 3), day(2024, 1, 1));

        assert_eq!(
            speak(&location(), &data, None, &req),
            "Tomorrow: Light rain in the morning."
        );
    }

    #[test]
    fn test_days_without_summary_are_no_data() {
        let data = forecast(vec![point(2024, 1, 1, 1.0, 2.0)]);
        let today = day(2024, 1, 1);
        let req = request(Condition::Summary, today, today, today);

        assert_eq!(speak(&location(), &data, None, &req), NO_DATA);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("on Friday"), "On Friday");
        assert_eq!(capitalize(""), "");
    }
}
