use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Parser;

use skyvoice::{
    Condition, Coordinate, DarkSkyClient, ForecastCache, Location, PollenForecast, SkyvoiceConfig,
    WeatherRequest, WeatherSkill, WriteThrough, cache, logging,
};

/// Spoken weather answers for a coordinate
#[derive(Debug, Parser)]
#[command(name = "skyvoice", version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, env = "SKYVOICE_CONFIG")]
    config: Option<PathBuf>,

    /// Latitude, used verbatim as part of the cache key
    #[arg(allow_hyphen_values = true)]
    latitude: String,

    /// Longitude, used verbatim as part of the cache key
    #[arg(allow_hyphen_values = true)]
    longitude: String,

    /// What to ask: low, high, summary or pollen
    #[arg(long, short)]
    condition: Condition,

    /// First day of the query (defaults to today)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the query (defaults to the first day)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Pollen outlook (JSON) for answering pollen questions
    #[arg(long)]
    pollen: Option<PathBuf>,

    /// IANA timezone of the location
    #[arg(long, default_value = "UTC", value_parser = parse_timezone)]
    timezone: Tz,
}

fn parse_timezone(name: &str) -> std::result::Result<Tz, String> {
    name.parse::<Tz>()
        .map_err(|e| format!("unknown timezone '{name}': {e}"))
}

fn local_noon(tz: Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("invalid date {date}"))?;
    tz.from_local_datetime(&noon)
        .earliest()
        .ok_or_else(|| anyhow!("{date} 12:00 does not exist in {tz}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = SkyvoiceConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging)?;

    let store = cache::open_store(&config.cache).with_context(|| "Failed to open forecast store")?;
    let mut forecast_cache = ForecastCache::new(store);
    forecast_cache.set_ttl(config.cache.ttl());

    let provider = DarkSkyClient::new(&config.provider)?;
    let mut skill = WeatherSkill::new(WriteThrough::new(
        Arc::new(forecast_cache),
        Arc::new(provider),
    ));

    let today = Utc::now().with_timezone(&cli.timezone).date_naive();
    let from = cli.from.unwrap_or(today);
    let to = cli.to.unwrap_or(from);
    let request = WeatherRequest::new(
        cli.condition,
        local_noon(cli.timezone, from)?,
        local_noon(cli.timezone, to)?,
    );
    let location = Location::new(Coordinate::new(cli.latitude, cli.longitude), cli.timezone);
    let pollen = cli
        .pollen
        .as_deref()
        .map(PollenForecast::load)
        .transpose()?;

    let answer = skill.answer(&location, pollen.as_ref(), &request).await;
    println!("{answer}");

    // let the background cache write land before the process exits
    skill.forecasts_mut().flush().await;
    Ok(())
}
