//! Answers allergy questions from the auxiliary pollen forecast

use tracing::{error, warn};

use super::{NO_DATA, PROBLEM, humanize_day, join_spoken};
use crate::models::{Condition, Forecast, Location, PollenForecast, WeatherRequest};

pub fn can_speak(request: &WeatherRequest) -> bool {
    request.condition == Condition::Pollen
}

pub fn speak(
    location: &Location,
    _forecast: &Forecast,
    pollen: Option<&PollenForecast>,
    request: &WeatherRequest,
) -> String {
    if !can_speak(request) {
        error!(condition = %request.condition, "tried to speak pollen without asking for pollen");
        return PROBLEM.to_string();
    }

    let Some(pollen) = pollen else {
        warn!(coordinate = %location.coordinate, "no pollen forecast for location");
        return NO_DATA.to_string();
    };

    let first = request.start.date_naive();
    let last = request.end.date_naive();
    let Some(period) = pollen
        .periods
        .iter()
        .find(|p| p.date >= first && p.date <= last)
    else {
        return NO_DATA.to_string();
    };

    let mut answer = format!(
        "the pollen index is {:.1}, which is {} {}",
        period.index,
        period.level(),
        humanize_day(period.date, request.today())
    );
    match period.triggers.len() {
        0 => {}
        1 => answer.push_str(&format!(". The top allergen is {}.", period.triggers[0])),
        _ => answer.push_str(&format!(
            ". The top allergens are {}.",
            join_spoken(&period.triggers)
        )),
    }
    answer
}
