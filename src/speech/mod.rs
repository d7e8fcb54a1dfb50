//! Speech selection
//!
//! Turns a forecast and a parsed query into one short spoken sentence.
//! Speakers form a closed set; the first one that can answer the query
//! wins. Speakers never fail: empty or impossible answers are expressed
//! with the sentinel strings below.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::{DataPoint, Forecast, Location, PollenForecast, WeatherRequest};

pub mod low_high;
pub mod pollen;
pub mod summary;

/// Answer when the query window holds no forecast data
pub const NO_DATA: &str = "I don't have weather data for that time";
/// Answer when a speaker is reached with a query it cannot handle
pub const PROBLEM: &str = "a problem occurred";
/// Answer when no speaker handles the query at all
pub const UNSUPPORTED: &str = "I don't know how to answer that yet";
/// Answer when the forecast could not be fetched
pub const COULD_NOT_RETRIEVE: &str = "I could not retrieve the forecast";

/// The available speakers, in dispatch order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    LowHigh,
    Summary,
    Pollen,
}

impl Speaker {
    pub const ALL: [Speaker; 3] = [Speaker::LowHigh, Speaker::Summary, Speaker::Pollen];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Speaker::LowHigh => "LowHigh",
            Speaker::Summary => "Summary",
            Speaker::Pollen => "Pollen",
        }
    }

    #[must_use]
    pub fn can_speak(&self, request: &WeatherRequest) -> bool {
        match self {
            Speaker::LowHigh => low_high::can_speak(request),
            Speaker::Summary => summary::can_speak(request),
            Speaker::Pollen => pollen::can_speak(request),
        }
    }

    #[must_use]
    pub fn speak(
        &self,
        location: &Location,
        forecast: &Forecast,
        pollen_forecast: Option<&PollenForecast>,
        request: &WeatherRequest,
    ) -> String {
        match self {
            Speaker::LowHigh => low_high::speak(location, forecast, pollen_forecast, request),
            Speaker::Summary => summary::speak(location, forecast, pollen_forecast, request),
            Speaker::Pollen => pollen::speak(location, forecast, pollen_forecast, request),
        }
    }
}

/// First speaker able to answer `request`
#[must_use]
pub fn select(request: &WeatherRequest) -> Option<Speaker> {
    Speaker::ALL.into_iter().find(|s| s.can_speak(request))
}

/// Spoken answer for `request`
#[must_use]
pub fn respond(
    location: &Location,
    forecast: &Forecast,
    pollen_forecast: Option<&PollenForecast>,
    request: &WeatherRequest,
) -> String {
    match select(request) {
        Some(speaker) => {
            tracing::debug!(speaker = speaker.name(), "speaking");
            speaker.speak(location, forecast, pollen_forecast, request)
        }
        None => {
            warn!(condition = %request.condition, "no speaker for condition");
            UNSUPPORTED.to_string()
        }
    }
}

fn start_of_day(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        // midnight skipped by a DST jump
        .unwrap_or_else(|| tz.from_utc_datetime(&midnight))
}

/// Bounds for the query's days: one nanosecond before the first day
/// starts, and the last nanosecond of the final day. Points strictly
/// between them belong to the query.
#[must_use]
pub fn day_window(request: &WeatherRequest) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = request.timezone();
    let one_ns = TimeDelta::nanoseconds(1);

    let begin = start_of_day(tz, request.start.date_naive()) - one_ns;
    let end = request
        .end
        .date_naive()
        .checked_add_days(Days::new(1))
        .map(|next| start_of_day(tz, next) - one_ns)
        .unwrap_or(request.end);
    (begin, end)
}

/// Daily points strictly inside `(begin, end)`, in forecast order
#[must_use]
pub fn points_in_window<'a>(
    forecast: &'a Forecast,
    begin: DateTime<Tz>,
    end: DateTime<Tz>,
) -> Vec<&'a DataPoint> {
    let begin = begin.with_timezone(&Utc);
    let end = end.with_timezone(&Utc);
    forecast
        .daily_points()
        .iter()
        .filter(|dp| {
            let t = dp.timestamp();
            t > begin && t < end
        })
        .collect()
}

/// Local calendar date of a data point
#[must_use]
pub fn local_date(point: &DataPoint, tz: Tz) -> NaiveDate {
    point.timestamp().with_timezone(&tz).date_naive()
}

/// How a day is said relative to `today`: "today", "tomorrow",
/// "on Friday" within the coming week, "on March 3" beyond it.
#[must_use]
pub fn humanize_day(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        2..=6 => format!("on {}", date.format("%A")),
        _ => format!("on {}", date.format("%B %-d")),
    }
}

/// Temperature rounded to a whole number, ties to even ("2.5" says 2).
/// Negative values rounding to zero are spoken as "0".
#[must_use]
pub fn round_temperature(value: f64) -> String {
    // adding 0.0 turns -0 into 0
    let rounded = value.round_ties_even() + 0.0;
    format!("{rounded:.0}")
}

/// "a", "a and b", "a, b and c"
pub(crate) fn join_spoken(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::Condition;
    use rstest::rstest;

    #[test]
    fn test_select_first_matching_speaker() {
        let today = day(2024, 1, 1);
        let low = request(Condition::Low, today, today, today);
        let high = request(Condition::High, today, today, today);
        let summary = request(Condition::Summary, today, today, today);
        let pollen = request(Condition::Pollen, today, today, today);

        assert_eq!(select(&low), Some(Speaker::LowHigh));
        assert_eq!(select(&high), Some(Speaker::LowHigh));
        assert_eq!(select(&summary), Some(Speaker::Summary));
        assert_eq!(select(&pollen), Some(Speaker::Pollen));
    }

    #[test]
    fn test_respond_uses_selected_speaker() {
        let data = forecast(vec![point(2024, 1, 1, 10.0, 20.0)]);
        let today = day(2024, 1, 1);
        let req = request(Condition::High, today, today, today);

        assert_eq!(respond(&location(), &data, None, &req), "20 is the high today");
    }

    #[test]
    fn test_day_window_covers_whole_days() {
        let req = request(Condition::Low, day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 1));
        let (begin, end) = day_window(&req);

        assert_eq!(begin.to_rfc3339(), "2023-12-31T23:59:59.999999999-05:00");
        assert_eq!(end.to_rfc3339(), "2024-01-02T23:59:59.999999999-05:00");
    }

    #[test]
    fn test_points_in_window_include_start_midnight() {
        let data = forecast(vec![
            point(2023, 12, 31, 1.0, 2.0),
            point(2024, 1, 1, 3.0, 4.0),
            point(2024, 1, 2, 5.0, 6.0),
            point(2024, 1, 3, 7.0, 8.0),
        ]);
        let req = request(Condition::Low, day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 1));
        let (begin, end) = day_window(&req);

        let lows: Vec<f64> = points_in_window(&data, begin, end)
            .iter()
            .map(|p| p.temperature_low)
            .collect();
        assert_eq!(lows, vec![3.0, 5.0]);
    }

    #[rstest]
    #[case((2024, 1, 1), "today")]
    #[case((2024, 1, 2), "tomorrow")]
    #[case((2023, 12, 31), "yesterday")]
    #[case((2024, 1, 5), "on Friday")]
    #[case((2024, 1, 8), "on January 8")]
    fn test_humanize_day(#[case] date: (i32, u32, u32), #[case] expected: &str) {
        let (y, m, d) = date;
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(humanize_day(date, today), expected);
    }

    #[rstest]
    #[case(4.6, "5")]
    #[case(4.4, "4")]
    #[case(0.5, "0")]
    #[case(1.5, "2")]
    #[case(2.5, "2")]
    #[case(-2.5, "-2")]
    #[case(-0.4, "0")]
    #[case(-7.5, "-8")]
    fn test_round_temperature(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(round_temperature(value), expected);
    }

    #[test]
    fn test_join_spoken() {
        let items = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_spoken(&items(&["grass"])), "grass");
        assert_eq!(join_spoken(&items(&["grass", "oak"])), "grass and oak");
        assert_eq!(join_spoken(&items(&["grass", "oak", "birch"])), "grass, oak and birch");
    }
}
