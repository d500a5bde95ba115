//! ethutild: main entry point
//!
//! Maps Ethernet utilisation onto the NAS front-panel LEDs.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  I2cBus         SysfsCounters   IniConfigFile   LogEventSink   │
//! │  (BusTransport) (CounterSource) (ConfigPort)    (EventSink)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  MonitorService: Sampler · Classifier · StateApplier   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  LedController (frame codec, dwell timing, write-ack)          │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use ethutild::adapters::config_file::{IniConfigFile, write_example};
use ethutild::adapters::i2c_bus::I2cBus;
use ethutild::adapters::i2c_locator::SysfsBusLocator;
use ethutild::adapters::log_sink::LogEventSink;
use ethutild::adapters::sysfs_net::SysfsCounters;
use ethutild::adapters::time::StdDelay;
use ethutild::app::ports::{BusLocator, ConfigPort, LedPort};
use ethutild::app::service::{CancelToken, MonitorService, run_demo, shutdown};
use ethutild::drivers::led_controller::{LedController, PANEL_LEDS};
use ethutild::error::Error;
use ethutild::protocol::LED_CHIP_ADDR;
use ethutild::sensors::bandwidth::BandwidthSampler;
use ethutild::state::{LedStateManager, VisualState};

#[derive(Parser, Debug)]
#[command(
    name = "ethutild",
    version,
    about = "NAS front-panel LED daemon for Ethernet utilisation"
)]
struct Cli {
    /// Cycle the LEDs through every utilisation state once per second.
    #[arg(short, long, conflicts_with = "status")]
    test: bool,

    /// Print the controller's view of the panel LEDs and exit.
    #[arg(short, long)]
    status: bool,

    /// Configuration file (default: ./ethutild.conf, then /etc/ethutild.conf).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Write a commented example configuration to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_example_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.write_example_config {
        write_example(path)
            .with_context(|| format!("failed to write example config to {}", path.display()))?;
        println!("Example configuration written to {}", path.display());
        return Ok(());
    }

    // ── 1. Configuration + logging ────────────────────────────
    let config_port = match &cli.config {
        Some(path) => IniConfigFile::at(path),
        None => IniConfigFile::new(),
    };
    let config = config_port.load().context("failed to load configuration")?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    env_logger::Builder::new()
        .filter_level(config.log_filter())
        .parse_default_env()
        .init();

    info!(
        "ethutild v{} starting (interface: {}, capacity: {} Mbps, brightness: {}, thresholds: {}/{}/{}%)",
        env!("CARGO_PKG_VERSION"),
        config.interface,
        config.capacity_mbps,
        config.brightness,
        config.thresholds.low,
        config.thresholds.medium,
        config.thresholds.high
    );

    // ── 2. Bus + LED controller ───────────────────────────────
    let bus_path = SysfsBusLocator::default()
        .locate()
        .map_err(Error::from)
        .context("no LED controller bus (is i2c-dev loaded?)")?;
    let i2c = linux_embedded_hal::I2cdev::new(&bus_path)
        .with_context(|| format!("failed to open {} (are you root?)", bus_path.display()))?;
    let mut leds = LedController::new(I2cBus::new(i2c, LED_CHIP_ADDR), StdDelay);
    info!("LED controller initialized on {}", bus_path.display());

    if cli.status {
        for id in PANEL_LEDS {
            match leds.get_status(id) {
                Ok(s) => println!(
                    "{:<7} mode={:?} brightness={} color={} t_on={}ms t_off={}ms",
                    id.name(),
                    s.mode,
                    s.brightness,
                    s.color,
                    s.t_on,
                    s.t_off
                ),
                Err(e) => println!("{:<7} unavailable: {}", id.name(), e),
            }
        }
        return Ok(());
    }

    // ── 3. Signals ────────────────────────────────────────────
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        info!("Received termination signal, shutting down");
        handler_token.cancel();
    })
    .context("failed to install signal handler")?;

    // ── 4. Initial state: power white, utilisation LEDs off ───
    let capacity = config.capacity()?;
    let mut manager = LedStateManager::new(config.thresholds, config.brightness, StdDelay);
    if let Err(e) = manager.set_state(VisualState::Off, &mut leds) {
        warn!("Failed to set initial LED state: {}", e);
    }

    // ── 5. Run until cancelled or fatal ───────────────────────
    let mut sleeper = StdDelay;
    let outcome = if cli.test {
        run_demo(
            &cancel,
            &mut manager,
            &mut leds,
            &mut sleeper,
            config.poll_interval_ms,
        )
    } else {
        let sampler = BandwidthSampler::new(SysfsCounters::new(config.interface.clone()), capacity);
        let mut service = MonitorService::new(sampler, manager, &config);
        let mut sink = LogEventSink::new();
        service
            .start(&mut sink)
            .inspect_err(|_| {
                warn!(
                    "Failed to initialize bandwidth monitor for interface {}; check that it exists and is up",
                    config.interface
                );
            })
            .and_then(|()| service.run(&cancel, &mut leds, &mut sink, &mut sleeper))
    };

    // ── 6. Shutdown ───────────────────────────────────────────
    shutdown(&mut leds);
    info!("LED Control Service stopped");

    outcome.context("ethutild stopped on error")
}
