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

pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net/forecast";

/// Dark Sky (formerly forecast.io) current conditions, in US units.
#[derive(Debug, Clone)]
pub struct DarkSkyProvider {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl DarkSkyProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    fn forecast_url(&self, api_key: &str, coords: &Coordinates) -> String {
        format!(
            "{}/{}/{},{}",
            self.base_url.trim_end_matches('/'),
            api_key,
            coords.latitude,
            coords.longitude
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DsCurrently {
    time: i64,
    icon: String,
    apparent_temperature: f64,
}

#[derive(Debug, Deserialize)]
struct DsResponse {
    currently: DsCurrently,
}

fn parse_forecast(body: &str) -> Result<ForecastSnapshot> {
    let parsed: DsResponse =
        serde_json::from_str(body).context("Failed to parse Dark Sky forecast JSON")?;

    let observed_at = unix_to_utc(parsed.currently.time).unwrap_or_else(Utc::now);

    Ok(ForecastSnapshot {
        summary: parsed.currently.icon,
        apparent_temperature: parsed.currently.apparent_temperature,
        observed_at,
    })
}

#[async_trait]
impl WeatherProvider for DarkSkyProvider {
    async fn current_conditions(&self, coords: &Coordinates) -> Result<ForecastSnapshot> {
        let api_key = require_api_key(self.api_key.as_deref(), ProviderId::DarkSky)?;

        let res = self
            .http
            .get(self.forecast_url(api_key, coords))
            .query(&[("exclude", "minutely,hourly,daily,alerts,flags")])
            .send()
            .await
            .context("Failed to send request to Dark Sky (forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Dark Sky forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Dark Sky forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_forecast(&body)
    }
}
