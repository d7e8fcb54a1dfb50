//! Auxiliary pollen forecast handed to speakers next to the weather forecast

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pollen outlook for a location, one period per day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PollenForecast {
    pub periods: Vec<PollenPeriod>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollenPeriod {
    pub date: NaiveDate,
    /// Pollen index on the 0-12 scale
    pub index: f64,
    /// Dominant allergens, most significant first
    #[serde(default)]
    pub triggers: Vec<String>,
}

impl PollenForecast {
    /// Reads a pollen outlook from a JSON file:
    /// `{"periods": [{"date": "2024-05-01", "index": 8.3, "triggers": ["grass"]}]}`
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pollen forecast {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse pollen forecast {}", path.display()))
    }
}

impl PollenPeriod {
    /// Spoken level for the index
    #[must_use]
    pub fn level(&self) -> &'static str {
        match self.index {
            i if i < 2.5 => "low",
            i if i < 4.9 => "low to medium",
            i if i < 7.3 => "medium",
            i if i < 9.7 => "medium to high",
            _ => "high",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn period(index: f64) -> PollenPeriod {
        PollenPeriod {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            index,
            triggers: vec![],
        }
    }

    #[rstest]
    #[case(0.0, "low")]
    #[case(3.1, "low to medium")]
    #[case(7.2, "medium")]
    #[case(9.0, "medium to high")]
    #[case(11.8, "high")]
    fn test_levels(#[case] index: f64, #[case] expected: &str) {
        assert_eq!(period(index).level(), expected);
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"{"periods": [
                {"date": "2024-05-01", "index": 8.3, "triggers": ["ragweed", "grass"]},
                {"date": "2024-05-02", "index": 1.2}
            ]}"#,
        )
        .unwrap();

        let forecast = PollenForecast::load(file.path()).unwrap();

        assert_eq!(forecast.periods.len(), 2);
        assert_eq!(forecast.periods[0].level(), "medium to high");
        assert_eq!(forecast.periods[0].triggers, vec!["ragweed", "grass"]);
        assert!(forecast.periods[1].triggers.is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        std::io::Write::write_all(&mut file, b"{\"periods\": 3}").unwrap();

        let err = PollenForecast::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse pollen forecast"));
    }
}
