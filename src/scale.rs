// ============================================================================
// SCALE MAPPER
// ============================================================================
//
// Piecewise-linear value-to-angle mapping for dial faces. A scale is an
// ordered run of segments, contiguous and monotonic in value, all sweeping
// the same angular direction. Angles are in dial degrees: 0 at the top of the
// face, clockwise positive.

use crate::error::ConfigError;

/// One linear piece of a value-to-angle mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSegment {
    pub value_range: (f64, f64),
    pub angle_range: (f64, f64),
}

impl ScaleSegment {
    pub const fn new(value_range: (f64, f64), angle_range: (f64, f64)) -> Self {
        Self {
            value_range,
            angle_range,
        }
    }

    fn slope(&self) -> f64 {
        (self.angle_range.1 - self.angle_range.0) / (self.value_range.1 - self.value_range.0)
    }
}

/// A validated piecewise-linear dial scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    segments: Vec<ScaleSegment>,
}

impl Scale {
    pub fn new(segments: Vec<ScaleSegment>) -> Result<Self, ConfigError> {
        if segments.is_empty() {
            return Err(ConfigError::EmptyScale);
        }
        for (index, seg) in segments.iter().enumerate() {
            let (v0, v1) = seg.value_range;
            if !(v0.is_finite() && v1.is_finite() && v0 < v1) {
                return Err(ConfigError::DegenerateSegment { index });
            }
            if !(seg.angle_range.0.is_finite() && seg.angle_range.1.is_finite()) {
                return Err(ConfigError::DegenerateSegment { index });
            }
        }
        let direction = segments[0].slope().signum();
        for index in 0..segments.len() {
            if index > 0 {
                let prev = &segments[index - 1];
                let cur = &segments[index];
                if prev.value_range.1 != cur.value_range.0
                    || prev.angle_range.1 != cur.angle_range.0
                {
                    return Err(ConfigError::DiscontiguousSegments { index });
                }
            }
            if segments[index].slope().signum() != direction {
                return Err(ConfigError::NonMonotonicSegments { index });
            }
        }
        Ok(Self { segments })
    }

    /// A single-segment linear scale.
    pub fn linear(value_range: (f64, f64), angle_range: (f64, f64)) -> Result<Self, ConfigError> {
        Self::new(vec![ScaleSegment::new(value_range, angle_range)])
    }

    /// Identity scale for the full-circle compass card.
    pub fn heading() -> Self {
        Self {
            segments: vec![ScaleSegment::new((0.0, 360.0), (0.0, 360.0))],
        }
    }

    /// Symmetric 1:1 arc for the drift pointer.
    pub fn drift() -> Self {
        Self {
            segments: vec![ScaleSegment::new((-120.0, 120.0), (-120.0, 120.0))],
        }
    }

    /// Two-slope airspeed scale: 30 degrees over the first 40 km/h, then 240
    /// degrees over the remaining 200.
    pub fn airspeed() -> Self {
        Self {
            segments: vec![
                ScaleSegment::new((0.0, 40.0), (-150.0, -120.0)),
                ScaleSegment::new((40.0, 240.0), (-120.0, 120.0)),
            ],
        }
    }

    /// Maps a value to a dial angle in degrees. Out-of-domain values clamp to
    /// the nearest scale boundary so the pointer never leaves the face.
    pub fn map(&self, value: f64) -> f64 {
        let (lo, hi) = self.domain();
        let v = value.clamp(lo, hi);
        // The clamp above guarantees some segment contains v; the last one
        // owns its upper boundary.
        for seg in &self.segments {
            if v <= seg.value_range.1 {
                return seg.angle_range.0 + (v - seg.value_range.0) * seg.slope();
            }
        }
        let last = &self.segments[self.segments.len() - 1];
        last.angle_range.1
    }

    /// Nominal value domain: lowest to highest mapped value.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.segments[0].value_range.0,
            self.segments[self.segments.len() - 1].value_range.1,
        )
    }

    pub fn segments(&self) -> &[ScaleSegment] {
        &self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airspeed_low_slope() {
        let scale = Scale::airspeed();
        assert_eq!(scale.map(0.0), -150.0);
        assert_eq!(scale.map(20.0), -150.0 + 20.0 * (30.0 / 40.0));
    }

    #[test]
    fn airspeed_high_slope() {
        let scale = Scale::airspeed();
        assert_eq!(scale.map(240.0), 120.0);
        assert_eq!(scale.map(140.0), -120.0 + 100.0 * (240.0 / 200.0));
    }

    #[test]
    fn airspeed_continuous_at_breakpoint() {
        // Both slope formulas must agree at the knee value.
        let low = -150.0 + 40.0 * (30.0 / 40.0);
        let high = -120.0 + (40.0 - 40.0) * (240.0 / 200.0);
        assert_eq!(low, high);
        assert_eq!(Scale::airspeed().map(40.0), -120.0);
    }

    #[test]
    fn out_of_domain_clamps() {
        let scale = Scale::airspeed();
        assert_eq!(scale.map(-5.0), scale.map(0.0));
        assert_eq!(scale.map(300.0), scale.map(240.0));
    }

    #[test]
    fn heading_is_identity() {
        let scale = Scale::heading();
        for h in 0..360 {
            assert_eq!(scale.map(h as f64), h as f64);
        }
    }

    #[test]
    fn map_is_monotonic() {
        let scale = Scale::airspeed();
        let mut prev = scale.map(0.0);
        let mut v = 0.5;
        while v <= 240.0 {
            let cur = scale.map(v);
            assert!(cur >= prev, "map not monotonic at {v}");
            prev = cur;
            v += 0.5;
        }
    }

    #[test]
    fn rejects_gap_between_segments() {
        let err = Scale::new(vec![
            ScaleSegment::new((0.0, 40.0), (-150.0, -120.0)),
            ScaleSegment::new((50.0, 240.0), (-120.0, 120.0)),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::DiscontiguousSegments { index: 1 });
    }

    #[test]
    fn rejects_direction_change() {
        let err = Scale::new(vec![
            ScaleSegment::new((0.0, 40.0), (-150.0, -120.0)),
            ScaleSegment::new((40.0, 240.0), (-120.0, -140.0)),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::NonMonotonicSegments { index: 1 });
    }

    #[test]
    fn rejects_reversed_value_range() {
        let err = Scale::linear((10.0, 0.0), (0.0, 90.0)).unwrap_err();
        assert_eq!(err, ConfigError::DegenerateSegment { index: 0 });
    }

    #[test]
    fn rejects_empty_scale() {
        assert_eq!(Scale::new(vec![]).unwrap_err(), ConfigError::EmptyScale);
    }
}
