use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Select, Text};
use weathercube_core::{Config, Daemon, ProviderId, colors_for, device, provider};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathercube", version, about = "Shows the current weather on an LED cube")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Settings that take precedence over the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    /// Weather provider API key.
    #[arg(long, env = "FORECAST_IO_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Weather provider: "darksky" or "openweather".
    #[arg(long, env = "WEATHERCUBE_PROVIDER", global = true)]
    pub provider: Option<String>,

    /// Fixed latitude; needs --longitude too.
    #[arg(long, env = "LATITUDE", allow_hyphen_values = true, global = true)]
    pub latitude: Option<f64>,

    /// Fixed longitude; needs --latitude too.
    #[arg(long, env = "LONGITUDE", allow_hyphen_values = true, global = true)]
    pub longitude: Option<f64>,

    #[arg(long, env = "WEATHERCUBE_DEVICE_HOST", global = true)]
    pub device_host: Option<String>,

    #[arg(long, env = "WEATHERCUBE_DEVICE_PORT", global = true)]
    pub device_port: Option<u16>,
}

impl From<Overrides> for Config {
    fn from(o: Overrides) -> Self {
        Config {
            provider: o.provider,
            api_key: o.api_key,
            latitude: o.latitude,
            longitude: o.longitude,
            device_host: o.device_host,
            device_port: o.device_port,
            geoip_url: None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Update the cube now and every 15 minutes (default).
    Run,

    /// Update the cube once and exit.
    Once,

    /// Print the palette for a summary code and temperature (°F).
    Colors {
        /// Summary code, e.g. "clear-day" or "rain".
        summary: String,

        #[arg(allow_hyphen_values = true)]
        temperature: f64,
    },

    /// Interactively write the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { overrides, command } = self;

        match command.unwrap_or(Command::Run) {
            Command::Run => run_daemon(&daemon_config(overrides)?).await,
            Command::Once => {
                let mut daemon = Daemon::from_config(&daemon_config(overrides)?)?;
                daemon.tick().await?;
                Ok(())
            }
            Command::Colors {
                summary,
                temperature,
            } => {
                println!("{}", colors_for(&summary, temperature));
                Ok(())
            }
            Command::Configure => configure(),
        }
    }
}

/// The config file with command line and environment layered on top.
fn daemon_config(overrides: Overrides) -> anyhow::Result<Config> {
    let config = Config::load()?.merge(overrides.into());
    if config.missing_api_key() {
        log::warn!("No weather API key set; forecast fetches will fail");
    }
    Ok(config)
}

async fn run_daemon(config: &Config) -> anyhow::Result<()> {
    log::info!("Starting weathercube...");

    let mut daemon = Daemon::from_config(config)?;
    daemon
        .run(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => log::info!("Received Ctrl+C, shutting down..."),
                Err(e) => log::error!("Failed to listen for Ctrl+C: {e}"),
            }
        })
        .await;

    log::info!("Stopped");
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;

    let provider = Select::new("Weather provider:", ProviderId::all().to_vec())
        .with_starting_cursor(current.provider_id().unwrap_or_default() as usize)
        .prompt()
        .context("Provider selection aborted")?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("API key prompt aborted")?;
    let api_key = if api_key.is_empty() {
        current.api_key.clone()
    } else {
        Some(api_key)
    };

    let fixed = Confirm::new("Use a fixed location instead of IP geolocation?")
        .with_default(current.coordinates_override().is_some())
        .prompt()?;
    let (latitude, longitude) = if fixed {
        let lat = CustomType::<f64>::new("Latitude:").prompt()?;
        let lon = CustomType::<f64>::new("Longitude:").prompt()?;
        (Some(lat), Some(lon))
    } else {
        (None, None)
    };

    let host = current.device_host.as_deref().unwrap_or(device::DEFAULT_HOST);
    let device_host = Text::new("Cube host:").with_default(host).prompt()?;
    let device_port = CustomType::<u16>::new("Cube port:")
        .with_default(current.device_port.unwrap_or(device::DEFAULT_PORT))
        .prompt()?;

    let config = Config {
        provider: Some(provider.as_str().to_string()),
        api_key,
        latitude,
        longitude,
        device_host: Some(device_host),
        device_port: Some(device_port),
        geoip_url: current.geoip_url,
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    if let Err(e) = provider::provider_from_config(&config) {
        log::warn!("Saved config has a problem: {e:#}");
    }

    Ok(())
}
