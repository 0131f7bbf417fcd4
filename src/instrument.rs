// ============================================================================
// INSTRUMENT STATE
// ============================================================================
//
// One configurable instrument per indicator kind. An instrument owns its
// validated scale, optional zone bands, and static scene template; `update`
// is a pure function of the reading plus that static configuration and
// yields a RenderCommand for the surface. No hidden accumulation: the same
// reading always produces the identical command.

use std::fmt;

use crate::config::InstrumentConfig;
use crate::error::{ConfigError, UpdateError};
use crate::geometry::{self, Drawable, GroupId, SceneRoles};
use crate::scale::Scale;
use crate::scene::{RenderCommand, RenderOp};
use crate::transform::{horizon_transform, pointer_transform, Transform2D};
use crate::zone::{ZoneSet, ZoneTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    Attitude,
    Heading,
    Drift,
    Speed,
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InstrumentKind::Attitude => "attitude",
            InstrumentKind::Heading => "heading",
            InstrumentKind::Drift => "drift",
            InstrumentKind::Speed => "speed",
        };
        f.write_str(name)
    }
}

/// One frame's worth of input for an instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Attitude { pitch: f64, roll: f64 },
    Heading(f64),
    Drift(f64),
    Speed(f64),
}

impl Reading {
    pub fn neutral(kind: InstrumentKind) -> Self {
        match kind {
            InstrumentKind::Attitude => Reading::Attitude {
                pitch: 0.0,
                roll: 0.0,
            },
            InstrumentKind::Heading => Reading::Heading(0.0),
            InstrumentKind::Drift => Reading::Drift(0.0),
            InstrumentKind::Speed => Reading::Speed(0.0),
        }
    }

    fn kind(&self) -> InstrumentKind {
        match self {
            Reading::Attitude { .. } => InstrumentKind::Attitude,
            Reading::Heading(_) => InstrumentKind::Heading,
            Reading::Drift(_) => InstrumentKind::Drift,
            Reading::Speed(_) => InstrumentKind::Speed,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Reading::Attitude { .. } => "attitude",
            Reading::Heading(_) => "heading",
            Reading::Drift(_) => "drift",
            Reading::Speed(_) => "speed",
        }
    }

    fn scalars(&self) -> [f64; 2] {
        match *self {
            Reading::Attitude { pitch, roll } => [pitch, roll],
            Reading::Heading(v) | Reading::Drift(v) | Reading::Speed(v) => [v, v],
        }
    }
}

/// A single dial instrument: static configuration plus last-applied state.
#[derive(Debug, Clone)]
pub struct Instrument {
    kind: InstrumentKind,
    config: InstrumentConfig,
    scale: Scale,
    zones: Option<ZoneSet>,
    template: Vec<Drawable>,
    roles: SceneRoles,
    reading: Reading,
    transform: Transform2D,
    zone: ZoneTag,
    display: Option<String>,
}

impl Instrument {
    /// Validates the configuration and builds the static scene. Starts in the
    /// neutral state (all readings zero).
    pub fn new(kind: InstrumentKind, config: InstrumentConfig) -> Result<Self, ConfigError> {
        if !(config.dial_radius.is_finite() && config.dial_radius > 0.0) {
            return Err(ConfigError::BadDialRadius(config.dial_radius));
        }
        if !(config.pitch_range_degrees.is_finite() && config.pitch_range_degrees > 0.0) {
            return Err(ConfigError::BadPitchRange(config.pitch_range_degrees));
        }
        // The tick loops in the scene builders step by this interval; a
        // non-positive value would never advance them.
        if !(config.tick_interval_degrees.is_finite() && config.tick_interval_degrees > 0.0) {
            return Err(ConfigError::BadTickInterval(config.tick_interval_degrees));
        }

        let scale = match config.scale.clone() {
            Some(scale) => scale,
            None => match kind {
                InstrumentKind::Attitude | InstrumentKind::Heading => Scale::heading(),
                InstrumentKind::Drift => Scale::drift(),
                InstrumentKind::Speed => Scale::airspeed(),
            },
        };
        let zones = config.zone_bands.clone().or(match kind {
            InstrumentKind::Speed => Some(ZoneSet::airspeed()),
            _ => None,
        });

        let (template, roles) = match kind {
            InstrumentKind::Attitude => geometry::attitude_scene(&config),
            InstrumentKind::Heading => geometry::heading_scene(&config, &scale),
            InstrumentKind::Drift => geometry::drift_scene(&config, &scale),
            InstrumentKind::Speed => {
                let zone_set = zones.as_ref().cloned().unwrap_or(ZoneSet::airspeed());
                geometry::speed_scene(&config, &scale, &zone_set)
            }
        };

        let mut instrument = Self {
            kind,
            config,
            scale,
            zones,
            template,
            roles,
            reading: Reading::neutral(kind),
            transform: Transform2D::IDENTITY,
            zone: ZoneTag::Neutral,
            display: None,
        };
        // Bring the cached state in line with the neutral reading. The
        // neutral reading is always finite, so this cannot fail.
        let _ = instrument.update(Reading::neutral(kind));
        Ok(instrument)
    }

    /// Recomputes transforms, zone, and display text for a reading. Pure and
    /// idempotent; non-finite or mismatched readings are rejected and the
    /// previous state is kept.
    pub fn update(&mut self, reading: Reading) -> Result<RenderCommand, UpdateError> {
        if reading.kind() != self.kind {
            return Err(UpdateError::ReadingMismatch {
                kind: self.kind,
                got: reading.name(),
            });
        }
        for value in reading.scalars() {
            if !value.is_finite() {
                return Err(UpdateError::NonFiniteReading(value));
            }
        }

        let mut ops = Vec::new();
        match reading {
            Reading::Attitude { pitch, roll } => {
                let transform = horizon_transform(pitch, roll, self.config.dial_radius);
                ops.push(RenderOp::SetGroupTransform {
                    group: GroupId::Horizon,
                    transform,
                });
                // The bank pointer shows roll relative to the fixed aircraft
                // symbol: rotation only, no pitch translation.
                ops.push(RenderOp::SetGroupTransform {
                    group: GroupId::RollPointer,
                    transform: pointer_transform(roll),
                });
                self.transform = transform;
                self.zone = ZoneTag::Neutral;
                self.display = None;
            }
            Reading::Heading(heading) => {
                let transform = pointer_transform(heading);
                ops.push(RenderOp::SetGroupTransform {
                    group: GroupId::Card,
                    transform,
                });
                // Counter-rotate every label so the glyphs stay upright
                // relative to the rotated card.
                for &(angle, id) in &self.roles.card_labels {
                    ops.push(RenderOp::SetRotation {
                        id,
                        rotation_deg: -angle - heading,
                    });
                }
                let display = format!("{:03}°", (heading.abs().trunc() as i64) % 360);
                if let Some(id) = self.roles.value_text {
                    ops.push(RenderOp::SetText {
                        id,
                        text: display.clone(),
                        color: ZoneTag::Neutral.color(),
                    });
                }
                self.transform = transform;
                self.zone = ZoneTag::Neutral;
                self.display = Some(display);
            }
            Reading::Drift(drift) => {
                let transform = pointer_transform(self.scale.map(drift));
                ops.push(RenderOp::SetGroupTransform {
                    group: GroupId::Pointer,
                    transform,
                });
                let display = format!("Drift: {drift:+.0}°");
                if let Some(id) = self.roles.value_text {
                    ops.push(RenderOp::SetText {
                        id,
                        text: display.clone(),
                        color: ZoneTag::Neutral.color(),
                    });
                }
                self.transform = transform;
                self.zone = ZoneTag::Neutral;
                self.display = Some(display);
            }
            Reading::Speed(speed) => {
                let transform = pointer_transform(self.scale.map(speed));
                ops.push(RenderOp::SetGroupTransform {
                    group: GroupId::Pointer,
                    transform,
                });
                let zone = self
                    .zones
                    .as_ref()
                    .map(|zones| zones.classify(speed))
                    .unwrap_or(ZoneTag::Neutral);
                let display = format!("Speed: {speed:.1} km/h");
                if let Some(id) = self.roles.value_text {
                    ops.push(RenderOp::SetText {
                        id,
                        text: display.clone(),
                        color: zone.color(),
                    });
                }
                self.transform = transform;
                self.zone = zone;
                self.display = Some(display);
            }
        }

        self.reading = reading;
        Ok(RenderCommand::new(ops))
    }

    /// Static drawables for the rendering surface to retain.
    pub fn scene_template(&self) -> &[Drawable] {
        &self.template
    }

    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    pub fn dial_radius(&self) -> f64 {
        self.config.dial_radius
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn zones(&self) -> Option<&ZoneSet> {
        self.zones.as_ref()
    }

    pub fn last_reading(&self) -> Reading {
        self.reading
    }

    pub fn last_transform(&self) -> Transform2D {
        self.transform
    }

    pub fn current_zone(&self) -> ZoneTag {
        self.zone
    }

    pub fn display_string(&self) -> Option<&str> {
        self.display.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::geometry::PrimitiveId;
    use crate::transform::{pitch_offset, Point};

    fn instrument(kind: InstrumentKind) -> Instrument {
        Instrument::new(kind, InstrumentConfig::default()).unwrap()
    }

    #[test]
    fn rejects_mismatched_reading() {
        let mut speed = instrument(InstrumentKind::Speed);
        let err = speed.update(Reading::Heading(10.0)).unwrap_err();
        assert_eq!(
            err,
            UpdateError::ReadingMismatch {
                kind: InstrumentKind::Speed,
                got: "heading"
            }
        );
    }

    #[test]
    fn rejects_non_finite_reading_and_keeps_state() {
        let mut speed = instrument(InstrumentKind::Speed);
        speed.update(Reading::Speed(120.0)).unwrap();
        let before = speed.last_transform();
        assert!(speed.update(Reading::Speed(f64::NAN)).is_err());
        assert!(speed
            .update(Reading::Speed(f64::INFINITY))
            .is_err());
        assert_eq!(speed.last_transform(), before);
        assert_eq!(speed.last_reading(), Reading::Speed(120.0));
    }

    #[test]
    fn update_is_idempotent() {
        let mut attitude = instrument(InstrumentKind::Attitude);
        let reading = Reading::Attitude {
            pitch: 7.25,
            roll: -33.5,
        };
        let first = attitude.update(reading).unwrap();
        let transform = attitude.last_transform();
        let second = attitude.update(reading).unwrap();
        assert_eq!(first, second);
        assert_eq!(attitude.last_transform(), transform);
    }

    #[test]
    fn attitude_update_end_to_end() {
        let mut attitude = instrument(InstrumentKind::Attitude);
        let cmd = attitude
            .update(Reading::Attitude {
                pitch: 10.0,
                roll: 20.0,
            })
            .unwrap();

        let horizon = attitude.last_transform();
        assert!((horizon.rotation_component_deg() - (-20.0)).abs() < 1e-12);
        let center = horizon.apply(Point::new(0.0, 0.0));
        let offset = pitch_offset(10.0, 1.0);
        let expected = pointer_transform(20.0).apply(Point::new(0.0, -offset));
        assert!((center.x - expected.x).abs() < 1e-12);
        assert!((center.y - expected.y).abs() < 1e-12);

        // Roll pointer rotates without translating.
        let pointer = cmd.ops.iter().find_map(|op| match op {
            RenderOp::SetGroupTransform {
                group: GroupId::RollPointer,
                transform,
            } => Some(*transform),
            _ => None,
        });
        let pointer = pointer.expect("missing roll pointer op");
        assert_eq!(pointer.translation_component(), (0.0, 0.0));
        assert!((pointer.rotation_component_deg() - (-20.0)).abs() < 1e-12);
    }

    #[test]
    fn heading_display_and_label_rotation() {
        let mut heading = instrument(InstrumentKind::Heading);
        let cmd = heading.update(Reading::Heading(45.0)).unwrap();
        assert_eq!(heading.display_string(), Some("045°"));

        let rotations: Vec<(PrimitiveId, f64)> = cmd
            .ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::SetRotation { id, rotation_deg } => Some((*id, *rotation_deg)),
                _ => None,
            })
            .collect();
        assert_eq!(rotations.len(), 12);
        // Every label counter-rotates by -angle - heading, in card order.
        for ((_, rotation), angle) in rotations
            .iter()
            .zip((0..12).map(|i| i as f64 * 30.0))
        {
            assert!((rotation - (-angle - 45.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn heading_display_wraps_and_pads() {
        let mut heading = instrument(InstrumentKind::Heading);
        heading.update(Reading::Heading(0.0)).unwrap();
        assert_eq!(heading.display_string(), Some("000°"));
        heading.update(Reading::Heading(365.0)).unwrap();
        assert_eq!(heading.display_string(), Some("005°"));
        heading.update(Reading::Heading(-45.0)).unwrap();
        assert_eq!(heading.display_string(), Some("045°"));
    }

    #[test]
    fn drift_display_is_signed() {
        let mut drift = instrument(InstrumentKind::Drift);
        drift.update(Reading::Drift(12.0)).unwrap();
        assert_eq!(drift.display_string(), Some("Drift: +12°"));
        drift.update(Reading::Drift(-8.0)).unwrap();
        assert_eq!(drift.display_string(), Some("Drift: -8°"));
    }

    #[test]
    fn speed_update_maps_and_classifies() {
        let mut speed = instrument(InstrumentKind::Speed);
        let cmd = speed.update(Reading::Speed(123.4)).unwrap();
        assert_eq!(speed.display_string(), Some("Speed: 123.4 km/h"));
        assert_eq!(speed.current_zone(), ZoneTag::Normal);

        let expected_angle = Scale::airspeed().map(123.4);
        assert!(
            (speed.last_transform().rotation_component_deg() - (-expected_angle)).abs() < 1e-9
        );

        let text_color = cmd.ops.iter().find_map(|op| match op {
            RenderOp::SetText { color, .. } => Some(*color),
            _ => None,
        });
        assert_eq!(text_color, Some(Color::LIME));
    }

    #[test]
    fn speed_readout_color_tracks_zone() {
        let mut speed = instrument(InstrumentKind::Speed);
        for (value, zone) in [
            (30.0, ZoneTag::Neutral),
            (100.0, ZoneTag::Normal),
            (175.0, ZoneTag::Caution),
            (220.0, ZoneTag::Warning),
        ] {
            speed.update(Reading::Speed(value)).unwrap();
            assert_eq!(speed.current_zone(), zone, "at {value}");
        }
    }

    #[test]
    fn overspeed_pointer_stays_on_dial() {
        let mut speed = instrument(InstrumentKind::Speed);
        speed.update(Reading::Speed(400.0)).unwrap();
        assert!(
            (speed.last_transform().rotation_component_deg() - (-120.0)).abs() < 1e-9
        );
    }

    #[test]
    fn rejects_bad_dial_radius() {
        let config = InstrumentConfig::builder().dial_radius(0.0).build();
        let err = Instrument::new(InstrumentKind::Speed, config).unwrap_err();
        assert_eq!(err, ConfigError::BadDialRadius(0.0));
    }

    #[test]
    fn rejects_non_positive_tick_interval() {
        // A non-advancing interval must fail validation instead of letting
        // the scene tick loops spin forever.
        for bad in [0.0, -10.0] {
            let config = InstrumentConfig::builder().tick_interval_degrees(bad).build();
            let err = Instrument::new(InstrumentKind::Heading, config).unwrap_err();
            assert_eq!(err, ConfigError::BadTickInterval(bad));
        }
        let config = InstrumentConfig::builder()
            .tick_interval_degrees(f64::NAN)
            .build();
        assert!(Instrument::new(InstrumentKind::Drift, config).is_err());
    }
}
