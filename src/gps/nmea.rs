// src/gps/nmea.rs
//! NMEA sentence parsing

use super::{
    constellation::classify,
    data::{Decoded, DecodedFix, DecodedSkyView, SatelliteSystems, UtcTime},
};
use crate::error::NmeaError;

/// GGA needs everything up to the altitude unit (field 10)
const GGA_MIN_FIELDS: usize = 11;
/// GSV needs everything up to satellites-in-view (field 3)
const GSV_MIN_FIELDS: usize = 4;
/// PRN, elevation, azimuth, SNR
const GSV_GROUP_LEN: usize = 4;

/// Sentence types this parser knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentenceType {
    Gga,
    Gsv,
}

impl SentenceType {
    /// Match the leading token of a sentence, e.g. `$GPGGA`.
    ///
    /// The whole token must match, so `$GPGGA1` or `$GNGGA` are not decoded.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "$GPGGA" => Some(SentenceType::Gga),
            "$GPGSV" => Some(SentenceType::Gsv),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SentenceType::Gga => "GGA",
            SentenceType::Gsv => "GSV",
        }
    }
}

/// One line split into its comma-separated fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSentence<'a> {
    fields: Vec<&'a str>,
}

impl<'a> RawSentence<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            fields: line.split(',').collect(),
        }
    }

    /// Sentence identifier, field 0
    pub fn token(&self) -> &'a str {
        self.fields[0]
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, sentence: SentenceType, required: usize) -> Result<(), NmeaError> {
        if self.fields.len() < required {
            return Err(NmeaError::Truncated {
                sentence: sentence.name(),
                required,
                found: self.fields.len(),
            });
        }
        Ok(())
    }
}

/// Parse a single NMEA sentence.
///
/// Unsupported sentence types come back as [`Decoded::NotApplicable`]; only a
/// truncated sentence or an unreadable numeric field is an error.
pub fn parse(line: &str) -> Result<Decoded, NmeaError> {
    let sentence = RawSentence::new(line);

    match SentenceType::from_token(sentence.token()) {
        Some(SentenceType::Gga) => parse_gga(&sentence).map(Decoded::Fix),
        Some(SentenceType::Gsv) => parse_gsv(&sentence).map(Decoded::SkyView),
        None => Ok(Decoded::NotApplicable),
    }
}

/// Parse GGA (Global Positioning System Fix Data) sentence
fn parse_gga(sentence: &RawSentence<'_>) -> Result<DecodedFix, NmeaError> {
    sentence.require(SentenceType::Gga, GGA_MIN_FIELDS)?;
    let parts = sentence.fields();

    let satellite_count = if parts[7].is_empty() {
        0
    } else {
        parts[7].parse::<u32>().map_err(|_| NmeaError::InvalidField {
            sentence: "GGA",
            field: "satellite_count",
            value: parts[7].to_string(),
        })?
    };

    Ok(DecodedFix {
        utc_time: parse_utc_time(parts[1])?,
        latitude: format!("{} {}", parts[2], parts[3]),
        longitude: format!("{} {}", parts[4], parts[5]),
        satellite_count,
        altitude: format!("{} {}", parts[9], parts[10]),
    })
}

/// Parse GSV (Satellites in View) sentence
fn parse_gsv(sentence: &RawSentence<'_>) -> Result<DecodedSkyView, NmeaError> {
    sentence.require(SentenceType::Gsv, GSV_MIN_FIELDS)?;
    let parts = sentence.fields();

    let satellites_in_view = parts[3].parse::<u32>().map_err(|_| NmeaError::InvalidField {
        sentence: "GSV",
        field: "satellites_in_view",
        value: parts[3].to_string(),
    })?;

    let mut satellite_systems = SatelliteSystems::new();
    for group in parts[GSV_MIN_FIELDS..].chunks(GSV_GROUP_LEN) {
        // Trailing groups are often padded with empty fields
        let Ok(prn) = group[0].parse::<i64>() else {
            continue;
        };
        if let Some(constellation) = classify(prn) {
            satellite_systems.push(constellation, prn);
        }
    }

    Ok(DecodedSkyView {
        satellites_in_view,
        satellite_systems,
    })
}

/// Read the fixed-width HHMMSS prefix of a UTC time field
fn parse_utc_time(field: &str) -> Result<UtcTime, NmeaError> {
    let bytes = field.as_bytes();
    if bytes.len() < 6 {
        return Ok(UtcTime::Unavailable);
    }

    let digits = &bytes[..6];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(NmeaError::InvalidField {
            sentence: "GGA",
            field: "utc_time",
            value: field.to_string(),
        });
    }

    let two_digits = |start: usize| (digits[start] - b'0') * 10 + (digits[start + 1] - b'0');
    Ok(UtcTime::Available {
        hours: two_digits(0),
        minutes: two_digits(2),
        seconds: two_digits(4),
    })
}
