use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    model::{Coordinates, ForecastSnapshot},
    provider::{ProviderId, require_api_key, truncate_body, unix_to_utc},
};

use super::WeatherProvider;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: Option<String>,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Maps an OpenWeather icon id (`01d`, `10n`, ...) onto a summary code.
fn summary_for_icon(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2).unwrap_or_default() {
        "01" if night => "clear-night",
        "01" => "clear-day",
        "02" | "03" if night => "partly-cloudy-night",
        "02" | "03" => "partly-cloudy-day",
        "04" => "cloudy",
        "09" | "10" | "11" => "rain",
        "13" => "snow",
        "50" => "fog",
        _ => "unknown",
    }
}

fn parse_current(body: &str) -> Result<ForecastSnapshot> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let observed_at = unix_to_utc(parsed.dt).unwrap_or_else(Utc::now);

    let summary = parsed
        .weather
        .first()
        .map(|w| summary_for_icon(&w.icon))
        .unwrap_or("unknown");

    Ok(ForecastSnapshot {
        summary: summary.to_string(),
        apparent_temperature: parsed.main.feels_like,
        observed_at,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_conditions(&self, coords: &Coordinates) -> Result<ForecastSnapshot> {
        let api_key = require_api_key(self.api_key.as_deref(), ProviderId::OpenWeather)?;

        let res = self
            .http
            .get(CURRENT_URL)
            .query(&[
                ("lat", coords.latitude.to_string()),
                ("lon", coords.longitude.to_string()),
                ("appid", api_key.to_string()),
                ("units", "imperial".to_string()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_current(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_map_to_summary_codes() {
        assert_eq!(summary_for_icon("01d"), "clear-day");
        assert_eq!(summary_for_icon("01n"), "clear-night");
        assert_eq!(summary_for_icon("03n"), "partly-cloudy-night");
        assert_eq!(summary_for_icon("02d"), "partly-cloudy-day");
        assert_eq!(summary_for_icon("04d"), "cloudy");
        assert_eq!(summary_for_icon("11d"), "rain");
        assert_eq!(summary_for_icon("13n"), "snow");
        assert_eq!(summary_for_icon("50d"), "fog");
        assert_eq!(summary_for_icon("x"), "unknown");
    }

    #[test]
    fn parses_current_response() {
        let body = r#"{
            "name": "Boston",
            "dt": 1700000000,
            "main": {"temp": 40.1, "feels_like": 35.6, "humidity": 70},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "wind": {"speed": 3.1}
        }"#;

        let snapshot = parse_current(body).unwrap();

        assert_eq!(snapshot.summary, "rain");
        assert_eq!(snapshot.apparent_temperature, 35.6);
        assert_eq!(snapshot.observed_at.timestamp(), 1700000000);
    }

    #[test]
    fn empty_weather_list_is_unknown() {
        let body = r#"{"dt": 1700000000, "main": {"feels_like": 50.0}, "weather": []}"#;
        assert_eq!(parse_current(body).unwrap().summary, "unknown");
    }
}
