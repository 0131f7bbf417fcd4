// ============================================================================
// ZONE CLASSIFIER
// ============================================================================
//
// Ordered advisory bands over a value axis. A value falls in zero or one band;
// anything outside every band is Neutral. Band arcs on the dial face are
// derived through the scale mapper so the colored wedges always agree with
// the pointer position.

use crate::error::ConfigError;
use crate::scale::Scale;

/// Advisory classification of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTag {
    /// Outside every configured band.
    Neutral,
    Normal,
    Caution,
    Warning,
}

/// A half-open value interval `[low, high)` carrying an advisory tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBand {
    pub low: f64,
    pub high: f64,
    pub tag: ZoneTag,
}

impl ZoneBand {
    pub const fn new(low: f64, high: f64, tag: ZoneTag) -> Self {
        Self { low, high, tag }
    }
}

/// A validated, ordered, non-overlapping set of zone bands.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneSet {
    bands: Vec<ZoneBand>,
}

impl ZoneSet {
    pub fn new(bands: Vec<ZoneBand>) -> Result<Self, ConfigError> {
        for (index, band) in bands.iter().enumerate() {
            if band.low.is_nan() || band.high.is_nan() || band.low >= band.high {
                return Err(ConfigError::DegenerateBand { index });
            }
            if index > 0 && bands[index - 1].high > band.low {
                return Err(ConfigError::OverlappingBands { index });
            }
        }
        Ok(Self { bands })
    }

    /// Default airspeed bands: green 60-150, yellow 150-200, red above.
    /// Speeds below 60 stay Neutral (white).
    pub fn airspeed() -> Self {
        Self {
            bands: vec![
                ZoneBand::new(60.0, 150.0, ZoneTag::Normal),
                ZoneBand::new(150.0, 200.0, ZoneTag::Caution),
                ZoneBand::new(200.0, f64::INFINITY, ZoneTag::Warning),
            ],
        }
    }

    /// Tag of the unique band containing the value, or Neutral.
    pub fn classify(&self, value: f64) -> ZoneTag {
        self.bands
            .iter()
            .find(|band| value >= band.low && value < band.high)
            .map(|band| band.tag)
            .unwrap_or(ZoneTag::Neutral)
    }

    /// Dial arc a band occupies, via the scale mapper. Unbounded bands clamp
    /// to the end of the scale.
    pub fn band_arc(band: &ZoneBand, scale: &Scale) -> (f64, f64) {
        (scale.map(band.low), scale.map(band.high))
    }

    pub fn bands(&self) -> &[ZoneBand] {
        &self.bands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_total_at_boundaries() {
        let zones = ZoneSet::airspeed();
        for (value, expected) in [
            (59.999, ZoneTag::Neutral),
            (60.0, ZoneTag::Normal),
            (149.999, ZoneTag::Normal),
            (150.0, ZoneTag::Caution),
            (199.999, ZoneTag::Caution),
            (200.0, ZoneTag::Warning),
        ] {
            assert_eq!(zones.classify(value), expected, "at {value}");
        }
    }

    #[test]
    fn bands_never_double_match() {
        let zones = ZoneSet::airspeed();
        for value in [0.0, 60.0, 150.0, 200.0, 1e6] {
            let matches = zones
                .bands()
                .iter()
                .filter(|b| value >= b.low && value < b.high)
                .count();
            assert!(matches <= 1, "value {value} matched {matches} bands");
        }
    }

    #[test]
    fn band_arc_tracks_scale() {
        let scale = Scale::airspeed();
        let zones = ZoneSet::airspeed();
        let (start, end) = ZoneSet::band_arc(&zones.bands()[0], &scale);
        assert_eq!(start, scale.map(60.0));
        assert_eq!(end, scale.map(150.0));
        // The unbounded warning band clamps to the top of the dial.
        let (_, end) = ZoneSet::band_arc(&zones.bands()[2], &scale);
        assert_eq!(end, 120.0);
    }

    #[test]
    fn rejects_overlapping_bands() {
        let err = ZoneSet::new(vec![
            ZoneBand::new(0.0, 100.0, ZoneTag::Normal),
            ZoneBand::new(90.0, 200.0, ZoneTag::Caution),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::OverlappingBands { index: 1 });
    }

    #[test]
    fn rejects_reversed_band() {
        let err = ZoneSet::new(vec![ZoneBand::new(10.0, 5.0, ZoneTag::Normal)]).unwrap_err();
        assert_eq!(err, ConfigError::DegenerateBand { index: 0 });
    }

    #[test]
    fn empty_set_is_all_neutral() {
        let zones = ZoneSet::new(vec![]).unwrap();
        assert_eq!(zones.classify(123.0), ZoneTag::Neutral);
    }
}
