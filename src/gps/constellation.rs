// src/gps/constellation.rs
//! Satellite constellation classification by PRN

use serde::Serialize;
use std::{fmt, ops::RangeInclusive};

/// Satellite navigation systems recognised by PRN range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Constellation {
    #[serde(rename = "GPS")]
    Gps,
    #[serde(rename = "GLONASS")]
    Glonass,
    Galileo,
    BeiDou,
    #[serde(rename = "QZSS")]
    Qzss,
    #[serde(rename = "SBAS")]
    Sbas,
}

impl Constellation {
    /// All constellations, in classification priority order.
    pub const ALL: [Constellation; 6] = [
        Constellation::Gps,
        Constellation::Glonass,
        Constellation::Galileo,
        Constellation::BeiDou,
        Constellation::Qzss,
        Constellation::Sbas,
    ];

    /// Inclusive PRN range owned by this constellation
    pub fn range(&self) -> RangeInclusive<i64> {
        match self {
            Constellation::Gps => 1..=32,
            Constellation::Glonass => 65..=96,
            Constellation::Galileo => 301..=336,
            Constellation::BeiDou => 201..=235,
            Constellation::Qzss => 193..=202,
            Constellation::Sbas => 120..=158,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Constellation::Gps => "GPS",
            Constellation::Glonass => "GLONASS",
            Constellation::Galileo => "Galileo",
            Constellation::BeiDou => "BeiDou",
            Constellation::Qzss => "QZSS",
            Constellation::Sbas => "SBAS",
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Determine which constellation a PRN belongs to.
///
/// Ranges are tested in [`Constellation::ALL`] order, so where two ranges
/// share a PRN (201 and 202 fall in both BeiDou and QZSS) the earlier one
/// wins. Anything outside every range, negatives included, yields `None`.
pub fn classify(prn: i64) -> Option<Constellation> {
    Constellation::ALL
        .into_iter()
        .find(|constellation| constellation.range().contains(&prn))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_boundaries() {
        assert_eq!(classify(0), None);
        assert_eq!(classify(1), Some(Constellation::Gps));
        assert_eq!(classify(32), Some(Constellation::Gps));
        assert_eq!(classify(33), None);
        assert_eq!(classify(64), None);
        assert_eq!(classify(65), Some(Constellation::Glonass));
        assert_eq!(classify(96), Some(Constellation::Glonass));
        assert_eq!(classify(119), None);
        assert_eq!(classify(120), Some(Constellation::Sbas));
        assert_eq!(classify(158), Some(Constellation::Sbas));
        assert_eq!(classify(193), Some(Constellation::Qzss));
        assert_eq!(classify(235), Some(Constellation::BeiDou));
        assert_eq!(classify(301), Some(Constellation::Galileo));
        assert_eq!(classify(336), Some(Constellation::Galileo));
        assert_eq!(classify(337), None);
    }

    #[test]
    fn test_beidou_takes_shared_prns() {
        assert_eq!(classify(200), Some(Constellation::Qzss));
        assert_eq!(classify(201), Some(Constellation::BeiDou));
        assert_eq!(classify(202), Some(Constellation::BeiDou));
        assert_eq!(classify(203), Some(Constellation::BeiDou));
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert_eq!(classify(-1), None);
        assert_eq!(classify(-32), None);
        assert_eq!(classify(i64::MIN), None);
        assert_eq!(classify(i64::MAX), None);
    }

    #[test]
    fn test_every_prn_against_range_table() {
        let table: [(i64, i64, Constellation); 6] = [
            (1, 32, Constellation::Gps),
            (65, 96, Constellation::Glonass),
            (301, 336, Constellation::Galileo),
            (201, 235, Constellation::BeiDou),
            (193, 200, Constellation::Qzss),
            (120, 158, Constellation::Sbas),
        ];

        for prn in -10..=400 {
            let owners: Vec<Constellation> = table
                .iter()
                .filter(|(lo, hi, _)| (*lo..=*hi).contains(&prn))
                .map(|(_, _, c)| *c)
                .collect();
            assert!(owners.len() <= 1, "prn {} listed twice", prn);
            assert_eq!(classify(prn), owners.first().copied(), "prn {}", prn);
        }
    }

    #[test]
    fn test_names() {
        let names: Vec<String> = Constellation::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, ["GPS", "GLONASS", "Galileo", "BeiDou", "QZSS", "SBAS"]);
        assert_eq!(serde_json::to_string(&Constellation::Qzss).unwrap(), "\"QZSS\"");
    }
}
