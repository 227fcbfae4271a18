//! Integration tests for the AccuWeather ports using wiremock.
//!
//! Each test runs the ports against a mock server serving fixed AccuWeather payloads.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Client;
use routecast_core::{
    DayCount, LocationKey, PortError, Route, RouteForecastService, SkipReason, TimeOfDay,
};
use routecast_provider_accuweather::{AccuWeatherSettings, plugin};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn settings(server: &MockServer) -> AccuWeatherSettings {
    AccuWeatherSettings {
        base_url: server.uri(),
        ..AccuWeatherSettings::new(API_KEY)
    }
}

fn period(temperature: f64, humidity: f64, wind: f64, precipitation: f64, phrase: &str) -> serde_json::Value {
    serde_json::json!({
        "WetBulbGlobeTemperature": {
            "Minimum": {"Value": temperature - 2.0, "Unit": "C"},
            "Maximum": {"Value": temperature + 2.0, "Unit": "C"},
            "Average": {"Value": temperature, "Unit": "C"}
        },
        "RelativeHumidity": {"Minimum": humidity - 10.0, "Maximum": humidity + 10.0, "Average": humidity},
        "Wind": {"Speed": {"Value": wind, "Unit": "km/h"}, "Direction": {"Degrees": 180}},
        "PrecipitationProbability": precipitation,
        "LongPhrase": phrase
    })
}

/// Forecast payload with `days` entries and no `Date` fields.
fn forecast_payload(days: u32) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = (0..days)
        .map(|index| {
            let offset = f64::from(index);
            serde_json::json!({
                "Day": period(20.0 + offset, 50.0, 10.0 + offset, 10.0, "Sunny"),
                "Night": period(10.0 + offset, 80.0, 3.0, 60.0 + offset, "Showers")
            })
        })
        .collect();

    serde_json::json!({
        "Headline": {"Text": "Pleasant this week"},
        "DailyForecasts": entries
    })
}

async fn mount_place(server: &MockServer, name: &str, key: &str, days: u32) {
    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/autocomplete"))
        .and(query_param("q", name))
        .and(query_param("apikey", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"Version": 1, "Key": key, "Type": "City", "LocalizedName": name}
        ])))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/locations/v1/{key}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": key,
            "GeoPosition": {"Latitude": 55.752, "Longitude": 37.616}
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/forecasts/v1/daily/5day/{key}")))
        .and(query_param("details", "true"))
        .and(query_param("metric", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(days)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_returns_first_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/autocomplete"))
        .and(query_param("language", "ru-ru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"Key": "294021", "LocalizedName": "Москва"},
            {"Key": "1-294021_1_AL", "LocalizedName": "Москва (область)"}
        ])))
        .mount(&mock_server)
        .await;

    let plugin = plugin(Client::new(), settings(&mock_server));
    let key = plugin.location_port.resolve("Москва").await.unwrap();

    assert_eq!(key, LocationKey(String::from("294021")));
}

#[tokio::test]
async fn test_resolve_empty_list_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/autocomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let plugin = plugin(Client::new(), settings(&mock_server));
    let result = plugin.location_port.resolve("Zzzqx").await;

    assert!(matches!(result, Err(PortError::NotFound)));
}

#[tokio::test]
async fn test_error_status_is_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/autocomplete"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "Code": "Unauthorized",
            "Message": "Api Authorization failed"
        })))
        .mount(&mock_server)
        .await;

    let plugin = plugin(Client::new(), settings(&mock_server));
    let result = plugin.location_port.resolve("Moscow").await;

    assert!(matches!(result, Err(PortError::Provider { status: 401 })));
}

#[tokio::test]
async fn test_coordinates_without_geo_position_are_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/294021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "294021"
        })))
        .mount(&mock_server)
        .await;

    let plugin = plugin(Client::new(), settings(&mock_server));
    let result = plugin
        .location_port
        .coordinates(&LocationKey(String::from("294021")))
        .await;

    assert!(matches!(result, Err(PortError::Malformed(_))));
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/294021"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let plugin = plugin(Client::new(), settings(&mock_server));
    let result = plugin
        .forecast_port
        .daily_forecast(&LocationKey(String::from("294021")))
        .await;

    assert!(matches!(result, Err(PortError::Malformed(_))));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let unreachable = AccuWeatherSettings {
        base_url: String::from("http://127.0.0.1:9"),
        ..AccuWeatherSettings::new(API_KEY)
    };

    let plugin = plugin(Client::new(), unreachable);
    let result = plugin.location_port.resolve("Moscow").await;

    assert!(matches!(result, Err(PortError::Network(_))));
}

#[tokio::test]
async fn test_daily_forecast_maps_day_and_night() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/294021"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(5)))
        .mount(&mock_server)
        .await;

    let plugin = plugin(Client::new(), settings(&mock_server));
    let forecasts = plugin
        .forecast_port
        .daily_forecast(&LocationKey(String::from("294021")))
        .await
        .unwrap();

    assert_eq!(forecasts.len(), 5);
    assert_eq!(forecasts[0].date, None);
    assert_eq!(forecasts[1].day.temperature, 21.0);
    assert_eq!(forecasts[1].night.temperature, 11.0);
    assert_eq!(forecasts[4].day.wind_speed, 14.0);
    assert_eq!(forecasts[4].night.precipitation_probability, 64.0);
    assert_eq!(forecasts[2].day.description, "Sunny");
    assert_eq!(forecasts[2].night.description, "Showers");
}

#[tokio::test]
async fn test_route_round_trip_through_service() {
    let mock_server = MockServer::start().await;
    mount_place(&mock_server, "Moscow", "294021", 5).await;
    mount_place(&mock_server, "Omsk", "296363", 2).await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/autocomplete"))
        .and(query_param("q", "Zzzqx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let service = RouteForecastService::new(Arc::new(plugin(Client::new(), settings(&mock_server))));
    let route = Route::new(
        Some("Moscow"),
        Some("Omsk"),
        vec![String::from("Zzzqx"), String::from("Moscow")],
    );
    let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let days = DayCount::new(3).unwrap();

    let dataset = service
        .aggregate_from(&route, days, TimeOfDay::Night, today)
        .await;

    // Moscow: 3 requested days; Omsk only delivers 2.
    assert_eq!(dataset.rows.len(), 5);
    assert_eq!(dataset.locations(), vec!["Moscow", "Omsk"]);

    let moscow_last = &dataset.rows[2];
    assert_eq!(moscow_last.location, "Moscow");
    assert_eq!(moscow_last.date, NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
    assert_eq!(moscow_last.temperature, 12.0);
    assert_eq!(moscow_last.humidity, 80.0);
    assert_eq!(moscow_last.wind_speed, 3.0);
    assert_eq!(moscow_last.precipitation_probability, 62.0);
    assert_eq!(moscow_last.description, "Showers");
    assert!(moscow_last.coordinates.is_some());

    let reasons: Vec<&SkipReason> = dataset.skipped.iter().map(|skip| &skip.reason).collect();
    assert_eq!(
        reasons,
        vec![
            &SkipReason::Unresolved,
            &SkipReason::Truncated {
                requested: 3,
                available: 2,
            },
        ]
    );
}

#[tokio::test]
async fn test_route_skips_points_without_forecast() {
    let mock_server = MockServer::start().await;
    mount_place(&mock_server, "Moscow", "294021", 5).await;
    mount_place(&mock_server, "Kazan", "295954", 0).await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/cities/autocomplete"))
        .and(query_param("q", "Tver"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"Version": 1, "Key": "295381", "Type": "City", "LocalizedName": "Tver"}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/locations/v1/295381"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Key": "295381",
            "GeoPosition": {"Latitude": 56.86, "Longitude": 35.9}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecasts/v1/daily/5day/295381"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = RouteForecastService::new(Arc::new(plugin(Client::new(), settings(&mock_server))));
    let route = Route::new(Some("Tver"), Some("Moscow"), vec![String::from("Kazan")]);
    let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

    let dataset = service
        .aggregate_from(&route, DayCount::new(2).unwrap(), TimeOfDay::Day, today)
        .await;

    assert_eq!(dataset.locations(), vec!["Moscow"]);
    assert_eq!(dataset.rows.len(), 2);

    let skipped: Vec<(&str, &SkipReason)> = dataset
        .skipped
        .iter()
        .map(|skip| (skip.name.as_str(), &skip.reason))
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("Tver", &SkipReason::NoForecast),
            ("Kazan", &SkipReason::NoForecast),
        ]
    );
}
