use anyhow::{Context, Result};
use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    model::{Coordinates, ForecastSnapshot},
    provider::WeatherProvider,
};

/// A snapshot this old (by its own `observed_at`) is refetched.
pub const STALE_AFTER_MINUTES: i64 = 10;

/// Last known current conditions, refreshed when stale.
#[derive(Debug)]
pub struct ForecastCache {
    provider: Box<dyn WeatherProvider>,
    snapshot: Option<ForecastSnapshot>,
}

impl ForecastCache {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            snapshot: None,
        }
    }

    pub fn snapshot(&self) -> Option<&ForecastSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        match &self.snapshot {
            Some(s) => now - s.observed_at >= TimeDelta::minutes(STALE_AFTER_MINUTES),
            None => true,
        }
    }

    pub async fn current_conditions(&mut self, coords: &Coordinates) -> Result<ForecastSnapshot> {
        self.current_conditions_at(coords, Utc::now()).await
    }

    /// Same as [`Self::current_conditions`] with an explicit clock.
    pub async fn current_conditions_at(
        &mut self,
        coords: &Coordinates,
        now: DateTime<Utc>,
    ) -> Result<ForecastSnapshot> {
        if let Some(snapshot) = self.snapshot.as_ref().filter(|_| !self.is_stale(now)) {
            log::debug!("Reusing forecast observed at {}", snapshot.observed_at);
            return Ok(snapshot.clone());
        }

        log::info!("Fetching forecast for {coords}...");
        let fresh = self
            .provider
            .current_conditions(coords)
            .await
            .context("Failed to fetch forecast")?;

        self.snapshot = Some(fresh.clone());
        Ok(fresh)
    }
}
