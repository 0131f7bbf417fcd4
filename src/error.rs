use thiserror::Error;

use crate::instrument::InstrumentKind;

/// Raised at instrument creation. Fatal: the configuration must be fixed
/// before retrying.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scale has no segments")]
    EmptyScale,
    #[error("scale segment {index} has an empty or reversed value range")]
    DegenerateSegment { index: usize },
    #[error("scale segments have a gap or overlap before segment {index}")]
    DiscontiguousSegments { index: usize },
    #[error("scale segments change angular direction at segment {index}")]
    NonMonotonicSegments { index: usize },
    #[error("zone band {index} has an empty or reversed value range")]
    DegenerateBand { index: usize },
    #[error("zone bands overlap or are out of order at band {index}")]
    OverlappingBands { index: usize },
    #[error("dial radius must be positive and finite, got {0}")]
    BadDialRadius(f64),
    #[error("pitch range must be positive and finite, got {0}")]
    BadPitchRange(f64),
    #[error("tick interval must be positive and finite, got {0}")]
    BadTickInterval(f64),
}

/// Raised per update call. Recoverable: the caller should skip the frame and
/// keep the last valid state.
#[derive(Debug, Error, PartialEq)]
pub enum UpdateError {
    #[error("non-finite reading: {0}")]
    NonFiniteReading(f64),
    #[error("{kind} instrument cannot accept a {got} reading")]
    ReadingMismatch {
        kind: InstrumentKind,
        got: &'static str,
    },
}
