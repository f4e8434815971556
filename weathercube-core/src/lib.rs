//! Core library for the `weathercube` daemon.
//!
//! This crate defines:
//! - Configuration handling
//! - Location and weather lookups behind async traits
//! - The weather-to-color mapping
//! - The LED cube line-protocol client and the update loop
//!
//! It is used by `weathercube-cli`, but the pieces can be driven on their own.

pub mod color;
pub mod config;
pub mod daemon;
pub mod device;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;

#[cfg(test)]
mod testing;

pub use color::colors_for;
pub use config::Config;
pub use daemon::{Daemon, TickError, TickReport};
pub use device::{DeviceClient, DeviceError};
pub use forecast::ForecastCache;
pub use location::{GeoLocator, LocationResolver};
pub use model::{ColorPalette, Coordinates, ForecastSnapshot, HexColor};
pub use provider::{ProviderId, WeatherProvider};
