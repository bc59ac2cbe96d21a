// src/error.rs
//! Error types for the NMEA monitor

use std::fmt;

pub type Result<T> = std::result::Result<T, GpsError>;

/// Hard failure decoding a single NMEA sentence.
///
/// Only ever fatal to the sentence that produced it; the monitor logs it and
/// keeps reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NmeaError {
    /// The sentence ends before the last field its type requires.
    Truncated {
        sentence: &'static str,
        required: usize,
        found: usize,
    },
    /// A numeric field is present but cannot be read as a number.
    InvalidField {
        sentence: &'static str,
        field: &'static str,
        value: String,
    },
}

impl fmt::Display for NmeaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NmeaError::Truncated { sentence, required, found } => write!(
                f,
                "{} sentence truncated: expected at least {} fields, found {}",
                sentence, required, found
            ),
            NmeaError::InvalidField { sentence, field, value } => {
                write!(f, "{} field '{}' is not a valid number: {:?}", sentence, field, value)
            }
        }
    }
}

impl std::error::Error for NmeaError {}

#[derive(Debug)]
pub enum GpsError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Nmea(NmeaError),
    Connection(String),
    Config(String),
}

impl fmt::Display for GpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpsError::Io(e) => write!(f, "IO error: {}", e),
            GpsError::Serial(e) => write!(f, "Serial error: {}", e),
            GpsError::Json(e) => write!(f, "JSON error: {}", e),
            GpsError::Nmea(e) => write!(f, "NMEA error: {}", e),
            GpsError::Connection(msg) => write!(f, "Connection error: {}", msg),
            GpsError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for GpsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpsError::Io(e) => Some(e),
            GpsError::Serial(e) => Some(e),
            GpsError::Json(e) => Some(e),
            GpsError::Nmea(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GpsError {
    fn from(error: std::io::Error) -> Self {
        GpsError::Io(error)
    }
}

impl From<tokio_serial::Error> for GpsError {
    fn from(error: tokio_serial::Error) -> Self {
        GpsError::Serial(error)
    }
}

impl From<serde_json::Error> for GpsError {
    fn from(error: serde_json::Error) -> Self {
        GpsError::Json(error)
    }
}

impl From<NmeaError> for GpsError {
    fn from(error: NmeaError) -> Self {
        GpsError::Nmea(error)
    }
}
