// src/monitor.rs
//! Line-by-line NMEA monitoring over a serial port or a capture file

use crate::{
    error::{GpsError, Result},
    gps::{nmea, Decoded},
};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::Notify,
};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

/// Where NMEA lines are read from
#[derive(Debug, Clone, PartialEq)]
pub enum NmeaSource {
    Serial { port: String, baudrate: u32 },
    File { path: PathBuf },
}

/// A decoded sentence together with the moment it was read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    pub received_at: DateTime<Utc>,
    pub record: Decoded,
}

/// Running totals for one monitoring session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonitorStats {
    pub lines: u64,
    pub fixes: u64,
    pub sky_views: u64,
    pub not_applicable: u64,
    pub errors: u64,
}

/// Cloneable handle that stops a monitor from another task.
///
/// Stopping wakes a read or interval sleep that is still pending, so a silent
/// port does not keep the monitor alive.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl StopHandle {
    fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
        // notify_one keeps a permit if the monitor is not waiting yet
        self.wake.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

/// Reads lines from a source, decodes each one and hands records to a callback
pub struct NmeaMonitor {
    stop: StopHandle,
    interval: Duration,
    stats: MonitorStats,
}

impl NmeaMonitor {
    /// Create a monitor that waits `interval` after every line it reads
    pub fn new(interval: Duration) -> Self {
        Self {
            stop: StopHandle::new(),
            interval,
            stats: MonitorStats::default(),
        }
    }

    /// Handle for stopping the monitor from another task
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Stop the monitor
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Check if the monitor is running
    pub fn is_running(&self) -> bool {
        self.stop.is_running()
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats
    }

    /// Open the source and monitor it until EOF, a read error or `stop()`
    pub async fn run<F>(&mut self, source: &NmeaSource, on_reading: F) -> Result<MonitorStats>
    where
        F: FnMut(&Reading),
    {
        match source {
            NmeaSource::Serial { port, baudrate } => {
                let serial = open_serial(port, *baudrate)?;
                self.run_reader(BufReader::new(serial), on_reading).await
            }
            NmeaSource::File { path } => {
                info!("Replaying NMEA capture {}", path.display());
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    GpsError::Connection(format!("Failed to open {}: {}", path.display(), e))
                })?;
                self.run_reader(BufReader::new(file), on_reading).await
            }
        }
    }

    /// Monitor any buffered reader; the reader is dropped on every exit path.
    ///
    /// A pending read or interval sleep is abandoned as soon as `stop()` is
    /// called.
    pub async fn run_reader<R, F>(&mut self, mut reader: R, mut on_reading: F) -> Result<MonitorStats>
    where
        R: AsyncBufRead + Unpin,
        F: FnMut(&Reading),
    {
        let mut buf = Vec::new();

        while self.is_running() {
            buf.clear();
            let read = tokio::select! {
                read = reader.read_until(b'\n', &mut buf) => read,
                _ = self.stop.wake.notified() => {
                    debug!("Monitor stopped while waiting for input");
                    break;
                }
            };
            match read {
                Ok(0) => {
                    debug!("End of input");
                    break;
                }
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    if let Some(reading) = self.handle_line(line.trim()) {
                        on_reading(&reading);
                    }
                }
                Err(e) => {
                    error!("Error reading NMEA input: {}", e);
                    return Err(GpsError::Io(e));
                }
            }

            if !self.interval.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = self.stop.wake.notified() => break,
                }
            }
        }

        Ok(self.stats)
    }

    /// Decode one trimmed line and update the session totals
    pub fn handle_line(&mut self, line: &str) -> Option<Reading> {
        if line.is_empty() {
            return None;
        }
        self.stats.lines += 1;

        match nmea::parse(line) {
            Ok(Decoded::NotApplicable) => {
                self.stats.not_applicable += 1;
                debug!("Skipping unsupported sentence: {}", line);
                None
            }
            Ok(record) => {
                match &record {
                    Decoded::Fix(_) => self.stats.fixes += 1,
                    Decoded::SkyView(_) => self.stats.sky_views += 1,
                    Decoded::NotApplicable => {}
                }
                debug!("Decoded {}", record);
                Some(Reading {
                    received_at: Utc::now(),
                    record,
                })
            }
            Err(e) => {
                self.stats.errors += 1;
                warn!("Dropping sentence {:?}: {}", line, e);
                None
            }
        }
    }
}

impl Default for NmeaMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Open a GPS device via serial port
pub fn open_serial(port: &str, baudrate: u32) -> Result<SerialStream> {
    info!("Connecting to GPS on {} at {} baud...", port, baudrate);

    let serial = tokio_serial::new(port, baudrate)
        .timeout(Duration::from_millis(1000))
        .open_native_async()
        .map_err(|e| GpsError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

    info!("Connected to GPS on {}", port);
    Ok(serial)
}

/// List available serial ports
pub fn list_serial_ports() -> Result<()> {
    let ports = tokio_serial::available_ports()?;

    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        println!("Available serial ports:");
        for port in ports {
            println!("  {} - {:?}", port.port_name, port.port_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CAPTURE: &str = "\
$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r
$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A\r
\r
$GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00*74\r
$GPGGA,123519,4807.038,N\r
$GPGSV,3,3,11,22,42,067,42,24,14,311,43,27,05,244,00,,,,*4D\r
";

    #[tokio::test]
    async fn test_run_reader_collects_records() {
        let mut monitor = NmeaMonitor::new(Duration::ZERO);
        let mut readings = Vec::new();

        let stats = monitor
            .run_reader(BufReader::new(CAPTURE.as_bytes()), |r| readings.push(r.clone()))
            .await
            .unwrap();

        assert_eq!(
            stats,
            MonitorStats { lines: 5, fixes: 1, sky_views: 2, not_applicable: 1, errors: 1 }
        );
        assert_eq!(readings.len(), 3);
        assert!(matches!(&readings[0].record, Decoded::Fix(fix) if fix.satellite_count == 8));
        match &readings[2].record {
            Decoded::SkyView(sky) => assert_eq!(sky.satellite_systems.gps, vec![22, 24, 27]),
            other => panic!("expected sky view, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stopped_monitor_reads_nothing() {
        let mut monitor = NmeaMonitor::new(Duration::ZERO);
        monitor.stop();
        assert!(!monitor.is_running());

        let mut count = 0;
        let stats = monitor
            .run_reader(BufReader::new(CAPTURE.as_bytes()), |_| count += 1)
            .await
            .unwrap();

        assert_eq!(count, 0);
        assert_eq!(stats, MonitorStats::default());
    }

    #[tokio::test]
    async fn test_stop_interrupts_silent_input() {
        // Writer stays open, so the read never sees data or EOF
        let (_writer, silent) = tokio::io::duplex(64);
        let mut monitor = NmeaMonitor::new(Duration::ZERO);
        let handle = monitor.stop_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.stop();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(2),
            monitor.run_reader(BufReader::new(silent), |_| {}),
        )
        .await
        .expect("monitor kept waiting after stop");

        assert_eq!(result.unwrap(), MonitorStats::default());
        assert!(!monitor.is_running());
    }

    #[tokio::test]
    async fn test_stop_interrupts_interval_sleep() {
        let mut monitor = NmeaMonitor::new(Duration::from_secs(3600));
        let handle = monitor.stop_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.stop();
        });

        let stats = tokio::time::timeout(
            Duration::from_secs(2),
            monitor.run_reader(BufReader::new(CAPTURE.as_bytes()), |_| {}),
        )
        .await
        .expect("monitor kept sleeping after stop")
        .unwrap();

        assert_eq!(stats.lines, 1);
        assert_eq!(stats.fixes, 1);
    }

    #[tokio::test]
    async fn test_non_ascii_bytes_do_not_abort() {
        let mut input = b"\xff\xfe$GPGSV,1,1,01,07,40,083,46\n".to_vec();
        input.extend_from_slice(b"$GPGSV,1,1,01,07,40,083,46\n");
        let mut monitor = NmeaMonitor::new(Duration::ZERO);

        let stats = monitor
            .run_reader(BufReader::new(input.as_slice()), |_| {})
            .await
            .unwrap();

        assert_eq!(stats.lines, 2);
        assert_eq!(stats.not_applicable, 1);
        assert_eq!(stats.sky_views, 1);
    }

    #[tokio::test]
    async fn test_file_source() {
        let path = std::env::temp_dir().join(format!("nmea-monitor-capture-{}.nmea", std::process::id()));
        std::fs::File::create(&path)
            .and_then(|mut f| f.write_all(CAPTURE.as_bytes()))
            .unwrap();

        let mut monitor = NmeaMonitor::new(Duration::ZERO);
        let stats = monitor
            .run(&NmeaSource::File { path: path.clone() }, |_| {})
            .await;
        std::fs::remove_file(&path).ok();

        assert_eq!(stats.unwrap().fixes, 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_connection_error() {
        let mut monitor = NmeaMonitor::new(Duration::ZERO);
        let result = monitor
            .run(&NmeaSource::File { path: PathBuf::from("/nonexistent/capture.nmea") }, |_| {})
            .await;

        assert!(matches!(result, Err(GpsError::Connection(_))));
    }

    #[test]
    fn test_reading_json() {
        let mut monitor = NmeaMonitor::default();
        let reading = monitor
            .handle_line("$GPGGA,,4807.038,N,01131.000,E,1,,0.9,545.4,M,,")
            .unwrap();
        let json = serde_json::to_value(&reading).unwrap();

        assert!(json["received_at"].is_string());
        assert_eq!(json["record"]["type"], "GGA");
        assert_eq!(json["record"]["utc_time"], "unavailable");
    }
}
