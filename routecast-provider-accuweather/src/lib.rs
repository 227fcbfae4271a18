//! Provider implementation for the AccuWeather data service API.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use routecast_core::{
    model::{Coordinates, DailyForecast, LocationKey, PeriodForecast, ProviderId, ProviderMeta},
    plugin::ProviderPlugin,
    ports::{ForecastPort, LocationPort, PortError},
};

/// Public AccuWeather endpoint.
pub const DEFAULT_BASE_URL: &str = "http://dataservice.accuweather.com";
/// Language tag sent with every request.
pub const DEFAULT_LANGUAGE: &str = "ru-ru";

/// Connection settings shared by both ports.
#[derive(Debug, Clone)]
pub struct AccuWeatherSettings {
    /// Static API credential.
    pub api_key: String,
    /// Scheme and host without a trailing slash.
    pub base_url: String,
    /// Language tag for location names and phrases.
    pub language: String,
}

impl AccuWeatherSettings {
    /// Settings for the public endpoint with the given key.
    #[must_use]
    pub fn new<K: Into<String>>(api_key: K) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }

    fn get(&self, client: &Client, path: &str) -> RequestBuilder {
        debug!(%path, "accuweather request");
        client.get(self.url(path)).query(&[
            ("apikey", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ])
    }
}

/// Entry of /locations/v1/cities/autocomplete
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AutocompleteEntry {
    key: Option<String>,
    // LocalizedName, Country, AdministrativeArea are ignored
}

/// Response from /locations/v1/{key}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LocationDetails {
    geo_position: Option<GeoPosition>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GeoPosition {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Response from /forecasts/v1/daily/5day/{key}
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DailyForecastResponse {
    daily_forecasts: Option<Vec<DailyEntry>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DailyEntry {
    date: Option<DateTime<FixedOffset>>,
    day: Option<PeriodEntry>,
    night: Option<PeriodEntry>,
}

/// `Day` / `Night` object, only present with `details=true`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PeriodEntry {
    wet_bulb_globe_temperature: Option<Summary<Measurement>>,
    relative_humidity: Option<Summary<f64>>,
    wind: Option<Wind>,
    precipitation_probability: Option<f64>,
    long_phrase: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Summary<T> {
    average: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Measurement {
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Wind {
    speed: Option<Measurement>,
}

/// Name and coordinate lookups against AccuWeather.
pub struct AccuWeatherLocationPort {
    client: Client,
    settings: Arc<AccuWeatherSettings>,
}

impl AccuWeatherLocationPort {
    /// Create a new location port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, settings: Arc<AccuWeatherSettings>) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl LocationPort for AccuWeatherLocationPort {
    async fn resolve(&self, name: &str) -> Result<LocationKey, PortError> {
        let req = self
            .settings
            .get(&self.client, "/locations/v1/cities/autocomplete")
            .query(&[("q", name)]);

        let candidates = fetch_json::<Vec<AutocompleteEntry>>(req).await?;

        let first = candidates.into_iter().next().ok_or(PortError::NotFound)?;
        let key = first.key.ok_or_else(|| malformed("Key"))?;

        Ok(LocationKey(key))
    }

    async fn coordinates(&self, key: &LocationKey) -> Result<Coordinates, PortError> {
        let req = self
            .settings
            .get(&self.client, &format!("/locations/v1/{key}"));

        let details = fetch_json::<LocationDetails>(req).await?;

        let position = details.geo_position.ok_or_else(|| malformed("GeoPosition"))?;

        Ok(Coordinates {
            latitude: position
                .latitude
                .ok_or_else(|| malformed("GeoPosition.Latitude"))?,
            longitude: position
                .longitude
                .ok_or_else(|| malformed("GeoPosition.Longitude"))?,
        })
    }
}

/// Five-day daily forecasts from AccuWeather, metric units with details.
pub struct AccuWeatherForecastPort {
    client: Client,
    settings: Arc<AccuWeatherSettings>,
}

impl AccuWeatherForecastPort {
    /// Create a new forecast port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, settings: Arc<AccuWeatherSettings>) -> Self {
        Self { client, settings }
    }
}

#[async_trait]
impl ForecastPort for AccuWeatherForecastPort {
    async fn daily_forecast(&self, key: &LocationKey) -> Result<Vec<DailyForecast>, PortError> {
        let req = self
            .settings
            .get(&self.client, &format!("/forecasts/v1/daily/5day/{key}"))
            .query(&[("details", "true"), ("metric", "true")]);

        let response = fetch_json::<DailyForecastResponse>(req).await?;

        response
            .daily_forecasts
            .ok_or_else(|| malformed("DailyForecasts"))?
            .into_iter()
            .map(map_daily_entry)
            .collect()
    }
}

/// Build the plugin bundle for the AccuWeather provider.
#[must_use]
pub fn plugin(client: Client, settings: AccuWeatherSettings) -> ProviderPlugin {
    let settings = Arc::new(settings);
    let location_port = Arc::new(AccuWeatherLocationPort::new(
        client.clone(),
        Arc::clone(&settings),
    ));
    let forecast_port = Arc::new(AccuWeatherForecastPort::new(client, settings));

    ProviderPlugin::new(provider_meta(), location_port, forecast_port)
}

fn provider_meta() -> ProviderMeta {
    ProviderMeta {
        id: ProviderId(String::from("accuweather")),
        name: String::from("AccuWeather"),
    }
}

fn map_daily_entry(entry: DailyEntry) -> Result<DailyForecast, PortError> {
    Ok(DailyForecast {
        date: entry.date.map(|date| date.date_naive()),
        day: map_period(entry.day.ok_or_else(|| malformed("Day"))?)?,
        night: map_period(entry.night.ok_or_else(|| malformed("Night"))?)?,
    })
}

fn map_period(period: PeriodEntry) -> Result<PeriodForecast, PortError> {
    Ok(PeriodForecast {
        temperature: period
            .wet_bulb_globe_temperature
            .and_then(|summary| summary.average)
            .and_then(|average| average.value)
            .ok_or_else(|| malformed("WetBulbGlobeTemperature.Average.Value"))?,
        humidity: period
            .relative_humidity
            .and_then(|summary| summary.average)
            .ok_or_else(|| malformed("RelativeHumidity.Average"))?,
        wind_speed: period
            .wind
            .and_then(|wind| wind.speed)
            .and_then(|speed| speed.value)
            .ok_or_else(|| malformed("Wind.Speed.Value"))?,
        precipitation_probability: period
            .precipitation_probability
            .ok_or_else(|| malformed("PrecipitationProbability"))?,
        description: period.long_phrase.ok_or_else(|| malformed("LongPhrase"))?,
    })
}

fn malformed(field: &str) -> PortError {
    PortError::Malformed(format!("missing field {field}"))
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let response = req.send().await.map_err(PortError::from)?;

    let status = response.status();
    if !status.is_success() {
        return Err(PortError::Provider {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(PortError::from)?;
    serde_json::from_slice(&body).map_err(|err| PortError::Malformed(err.to_string()))
}
