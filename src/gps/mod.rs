// src/gps/mod.rs
//! NMEA decoding and satellite classification

pub mod constellation;
pub mod data;
pub mod nmea;

pub use constellation::{classify, Constellation};
pub use data::{Decoded, DecodedFix, DecodedSkyView, SatelliteSystems, UtcTime};
pub use nmea::parse;
