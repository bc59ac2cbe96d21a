// src/gps/data.rs
//! Decoded NMEA records

use super::constellation::Constellation;
use serde::{Serialize, Serializer};
use std::fmt;

/// Time of day from the fixed-width HHMMSS field of a GGA sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtcTime {
    Available { hours: u8, minutes: u8, seconds: u8 },
    Unavailable,
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UtcTime::Available { hours, minutes, seconds } => {
                write!(f, "{:02}:{:02}:{:02} UTC", hours, minutes, seconds)
            }
            UtcTime::Unavailable => f.write_str("unavailable"),
        }
    }
}

impl Serialize for UtcTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Position fix decoded from a GGA sentence.
///
/// Coordinates and altitude are kept as the receiver sent them, value and
/// hemisphere (or unit) joined by a single space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedFix {
    pub utc_time: UtcTime,
    pub latitude: String,
    pub longitude: String,
    pub satellite_count: u32,
    pub altitude: String,
}

impl fmt::Display for DecodedFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GGA time={} lat={} lon={} sats={} alt={}",
            self.utc_time, self.latitude, self.longitude, self.satellite_count, self.altitude
        )
    }
}

/// PRNs seen in one GSV sentence, one list per constellation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SatelliteSystems {
    #[serde(rename = "GPS")]
    pub gps: Vec<i64>,
    #[serde(rename = "GLONASS")]
    pub glonass: Vec<i64>,
    #[serde(rename = "Galileo")]
    pub galileo: Vec<i64>,
    #[serde(rename = "BeiDou")]
    pub beidou: Vec<i64>,
    #[serde(rename = "QZSS")]
    pub qzss: Vec<i64>,
    #[serde(rename = "SBAS")]
    pub sbas: Vec<i64>,
}

impl SatelliteSystems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, constellation: Constellation) -> &[i64] {
        match constellation {
            Constellation::Gps => &self.gps,
            Constellation::Glonass => &self.glonass,
            Constellation::Galileo => &self.galileo,
            Constellation::BeiDou => &self.beidou,
            Constellation::Qzss => &self.qzss,
            Constellation::Sbas => &self.sbas,
        }
    }

    fn get_mut(&mut self, constellation: Constellation) -> &mut Vec<i64> {
        match constellation {
            Constellation::Gps => &mut self.gps,
            Constellation::Glonass => &mut self.glonass,
            Constellation::Galileo => &mut self.galileo,
            Constellation::BeiDou => &mut self.beidou,
            Constellation::Qzss => &mut self.qzss,
            Constellation::Sbas => &mut self.sbas,
        }
    }

    /// Append a PRN to its constellation, keeping encounter order
    pub fn push(&mut self, constellation: Constellation, prn: i64) {
        self.get_mut(constellation).push(prn);
    }

    /// Iterate over every constellation with its PRNs, in classification order
    pub fn iter(&self) -> impl Iterator<Item = (Constellation, &[i64])> {
        Constellation::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Total number of classified satellites
    pub fn len(&self) -> usize {
        self.iter().map(|(_, prns)| prns.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Satellites-in-view summary decoded from a GSV sentence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedSkyView {
    pub satellites_in_view: u32,
    pub satellite_systems: SatelliteSystems,
}

impl fmt::Display for DecodedSkyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GSV in_view={}", self.satellites_in_view)?;
        for (constellation, prns) in self.satellite_systems.iter() {
            if !prns.is_empty() {
                write!(f, " {}={:?}", constellation, prns)?;
            }
        }
        Ok(())
    }
}

/// Outcome of decoding one line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Decoded {
    #[serde(rename = "GGA")]
    Fix(DecodedFix),
    #[serde(rename = "GSV")]
    SkyView(DecodedSkyView),
    /// The sentence type has no decoder.
    NotApplicable,
}

impl Decoded {
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Decoded::NotApplicable)
    }
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Fix(fix) => fmt::Display::fmt(fix, f),
            Decoded::SkyView(sky) => fmt::Display::fmt(sky, f),
            Decoded::NotApplicable => f.write_str("not applicable"),
        }
    }
}
