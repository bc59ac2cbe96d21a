// src/lib.rs
//! NMEA Monitor Library
//!
//! Decodes GGA position fixes and GSV satellites-in-view sentences from an
//! NMEA 0183 stream, grouping visible satellites by constellation.

pub mod config;
pub mod error;
pub mod gps;
pub mod monitor;

// Re-export main types for convenience
pub use error::{GpsError, NmeaError, Result};
pub use gps::{classify, parse, Constellation, Decoded, DecodedFix, DecodedSkyView, SatelliteSystems, UtcTime};
pub use monitor::{MonitorStats, NmeaMonitor, NmeaSource, Reading, StopHandle};
