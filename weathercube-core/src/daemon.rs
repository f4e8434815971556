//! The update loop: locate, forecast, colorize, send.

use std::{future::Future, time::Duration};

use tokio::time::{self, MissedTickBehavior};

use crate::{
    Config,
    color::colors_for,
    device::{DeviceClient, DeviceError},
    forecast::ForecastCache,
    location::{FreeGeoIpLocator, LocationResolver},
    model::{ColorPalette, Coordinates, ForecastSnapshot},
    provider::provider_from_config,
};

pub const UPDATE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, thiserror::Error)]
pub enum TickError {
    #[error("location lookup failed: {0:#}")]
    Location(anyhow::Error),

    #[error("forecast fetch failed: {0:#}")]
    Forecast(anyhow::Error),

    #[error("sending colors failed: {0}")]
    Device(#[from] DeviceError),
}

/// What one successful tick did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub coordinates: Coordinates,
    pub snapshot: ForecastSnapshot,
    pub palette: ColorPalette,
}

#[derive(Debug)]
pub struct Daemon {
    location: LocationResolver,
    forecast: ForecastCache,
    device: DeviceClient,
}

impl Daemon {
    pub fn new(location: LocationResolver, forecast: ForecastCache, device: DeviceClient) -> Self {
        Self {
            location,
            forecast,
            device,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let location = LocationResolver::new(
            config.coordinates_override(),
            Box::new(FreeGeoIpLocator::new(config.geoip_url())),
        );
        let forecast = ForecastCache::new(provider_from_config(config)?);

        Ok(Self::new(location, forecast, config.device_client()))
    }

    pub async fn tick(&mut self) -> Result<TickReport, TickError> {
        let coordinates = self.location.resolve().await.map_err(TickError::Location)?;

        let snapshot = self
            .forecast
            .current_conditions(&coordinates)
            .await
            .map_err(TickError::Forecast)?;
        log::info!(
            "The weather is {}, {}°F",
            snapshot.summary,
            snapshot.apparent_temperature
        );

        let palette = colors_for(&snapshot.summary, snapshot.apparent_temperature);
        self.device.send_colors(&palette).await?;
        log::info!("Colors sent to {}: {palette}", self.device.addr());

        Ok(TickReport {
            coordinates,
            snapshot,
            palette,
        })
    }

    /// Runs one tick now and then one every [`UPDATE_INTERVAL`] until
    /// `shutdown` resolves. Failed ticks are logged and skipped.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.run_every(UPDATE_INTERVAL, shutdown).await
    }

    pub async fn run_every<F>(&mut self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = interval.tick() => self.logged_tick().await,
            }
        }

        log::info!("Update loop stopped");
    }

    async fn logged_tick(&mut self) {
        match self.tick().await {
            Ok(_) => {}
            Err(TickError::Device(DeviceError::Rejected)) => {
                log::warn!("Cube reported failure for the last color update");
            }
            Err(e) => log::error!("Update failed: {e}"),
        }
    }
}
