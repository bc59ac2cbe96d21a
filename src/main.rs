// src/main.rs
//! NMEA Monitor - decode GGA/GSV sentences from a GPS receiver

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use nmea_monitor::{config::MonitorConfig, monitor, NmeaMonitor};
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "nmea-monitor", version, about = "Decode NMEA GGA/GSV sentences from a GPS receiver")]
struct Cli {
    /// Serial port the receiver is attached to (e.g. /dev/ttyUSB0, COM4)
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Replay sentences from a capture file instead of a serial port
    #[arg(short, long, conflicts_with = "port")]
    file: Option<PathBuf>,

    /// Delay after each line read, in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Print one JSON object per decoded sentence
    #[arg(long)]
    json: bool,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Persist the effective settings as the new defaults
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut MonitorConfig) {
        if let Some(path) = &self.file {
            config.update_file(path.clone());
        } else if self.port.is_some() || self.baud.is_some() {
            let port = self
                .port
                .clone()
                .or_else(|| config.serial_port.clone())
                .unwrap_or_else(|| MonitorConfig::platform_default().serial_port.unwrap_or_default());
            let baudrate = self.baud.or(config.serial_baudrate).unwrap_or(9600);
            config.update_serial(port, baudrate);
        }
        if let Some(interval) = self.interval_ms {
            config.interval_ms = interval;
        }
        if self.json {
            config.output = "json".to_string();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.list_ports {
        monitor::list_serial_ports()?;
        return Ok(());
    }

    let mut config = MonitorConfig::load().unwrap_or_else(|e| {
        error!("{}; using defaults", e);
        MonitorConfig::default()
    });
    cli.apply(&mut config);

    if cli.save_config {
        config.save().context("saving configuration")?;
        info!("Configuration saved to {}", MonitorConfig::get_config_path()?.display());
    }

    let source = config.to_source()?;
    let mut nmea_monitor = NmeaMonitor::new(Duration::from_millis(config.interval_ms));

    // Set up Ctrl+C handler
    let stop = nmea_monitor.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Stopping NMEA monitor.");
            stop.stop();
        }
    });

    let json = config.json_output();
    let stats = nmea_monitor
        .run(&source, |reading| {
            if json {
                match serde_json::to_string(reading) {
                    Ok(line) => println!("{}", line),
                    Err(e) => error!("Failed to serialize reading: {}", e),
                }
            } else {
                println!(
                    "[{}] {}",
                    reading.received_at.format("%Y-%m-%d %H:%M:%S"),
                    reading.record
                );
            }
        })
        .await?;

    info!(
        "{} lines: {} fixes, {} sky views, {} skipped, {} errors",
        stats.lines, stats.fixes, stats.sky_views, stats.not_applicable, stats.errors
    );

    Ok(())
}
