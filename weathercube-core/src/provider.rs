use crate::{
    Config, Coordinates, ForecastSnapshot,
    provider::{darksky::DarkSkyProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{convert::TryFrom, fmt::Debug};

pub mod darksky;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderId {
    #[default]
    DarkSky,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::DarkSky => "darksky",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::DarkSky, ProviderId::OpenWeather]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "darksky" | "forecastio" | "forecast.io" => Ok(ProviderId::DarkSky),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: darksky, openweather."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, coords: &Coordinates) -> anyhow::Result<ForecastSnapshot>;
}

/// Construct the configured provider.
///
/// A missing API key is not an error here; the provider reports it on its
/// first fetch.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.provider_id()?;
    let api_key = config.api_key.clone();

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::DarkSky => Box::new(DarkSkyProvider::new(api_key)),
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key)),
    };

    Ok(boxed)
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

pub(crate) fn require_api_key(api_key: Option<&str>, id: ProviderId) -> anyhow::Result<&str> {
    api_key.filter(|k| !k.is_empty()).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
             Hint: set FORECAST_IO_KEY or run `weathercube configure`."
        )
    })
}
