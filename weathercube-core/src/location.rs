use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{model::Coordinates, provider::truncate_body};

pub const DEFAULT_GEOIP_URL: &str = "https://freegeoip.app/json/";

/// Looks up the coordinates of this host.
#[async_trait]
pub trait GeoLocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates>;
}

/// Geolocation by public IP through a freegeoip-style JSON endpoint.
#[derive(Debug, Clone)]
pub struct FreeGeoIpLocator {
    url: String,
    http: Client,
}

impl FreeGeoIpLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for FreeGeoIpLocator {
    fn default() -> Self {
        Self::new(DEFAULT_GEOIP_URL)
    }
}

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    latitude: f64,
    longitude: f64,
}

fn parse_location(body: &str) -> Result<Coordinates> {
    let parsed: GeoIpResponse =
        serde_json::from_str(body).context("Failed to parse geolocation JSON")?;

    Ok(Coordinates {
        latitude: parsed.latitude,
        longitude: parsed.longitude,
    })
}

#[async_trait]
impl GeoLocator for FreeGeoIpLocator {
    async fn locate(&self) -> Result<Coordinates> {
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("Failed to send geolocation request to {}", self.url))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read geolocation response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Geolocation request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        parse_location(&body)
    }
}

/// Coordinates for the process, resolved at most once.
///
/// A configured override always wins and the locator is never consulted.
/// Otherwise the first successful lookup is kept for the process lifetime.
#[derive(Debug)]
pub struct LocationResolver {
    fixed: Option<Coordinates>,
    locator: Box<dyn GeoLocator>,
    resolved: Option<Coordinates>,
}

impl LocationResolver {
    pub fn new(fixed: Option<Coordinates>, locator: Box<dyn GeoLocator>) -> Self {
        Self {
            fixed,
            locator,
            resolved: None,
        }
    }

    pub fn resolved(&self) -> Option<Coordinates> {
        self.fixed.or(self.resolved)
    }

    pub async fn resolve(&mut self) -> Result<Coordinates> {
        if let Some(coords) = self.resolved() {
            return Ok(coords);
        }

        log::info!("Fetching coordinates...");
        let coords = self
            .locator
            .locate()
            .await
            .context("Failed to resolve coordinates")?;
        log::info!("Located at {coords}");

        self.resolved = Some(coords);
        Ok(coords)
    }
}
