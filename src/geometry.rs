// ============================================================================
// STATIC DIAL GEOMETRY
// ============================================================================
//
// Builds the retained scene for each instrument kind: one flat list of
// drawables with stable ids, partitioned into transform groups. The rendering
// surface keeps these for the lifetime of the instrument and only ever
// mutates them through RenderCommands, never recreates them.
//
// All coordinates are dial units: center at the origin, y up, dial radius
// from the instrument config (1.0 by default). Dial angles are 0 at the top
// of the face, clockwise positive, so a tick at angle `a` sits at
// (sin a, cos a).

use crate::config::{Color, InstrumentConfig};
use crate::scale::Scale;
use crate::transform::Point;
use crate::zone::ZoneSet;

/// Stable identity of one drawable, dense within an instrument's scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveId(pub u16);

/// Transform group a drawable belongs to. Static drawables never move;
/// the other groups receive a fresh transform each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupId {
    Static,
    /// Sky, ground, horizon line, and pitch ladder of the attitude ball.
    Horizon,
    /// Bank-angle marker orbiting the attitude rim.
    RollPointer,
    /// Rotating compass card: ticks and labels.
    Card,
    /// Rim pointer of the drift and speed dials.
    Pointer,
}

impl GroupId {
    pub const COUNT: usize = 5;

    pub const fn index(self) -> usize {
        match self {
            GroupId::Static => 0,
            GroupId::Horizon => 1,
            GroupId::RollPointer => 2,
            GroupId::Card => 3,
            GroupId::Pointer => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line {
        p0: Point,
        p1: Point,
        width: f32,
    },
    Polyline {
        points: Vec<Point>,
        width: f32,
    },
    /// Axis-aligned in local space; filled. May rotate with its group.
    Rect {
        origin: Point,
        w: f64,
        h: f64,
    },
    CircleOutline {
        radius: f64,
        width: f32,
    },
    /// Annulus sector between two dial angles.
    Wedge {
        r_inner: f64,
        r_outer: f64,
        start_deg: f64,
        end_deg: f64,
    },
    /// Equilateral triangle marker, orientation 0 pointing up.
    Marker {
        at: Point,
        radius: f64,
        orientation_deg: f64,
    },
    Text {
        at: Point,
        text: String,
        size: f32,
        /// Counterclockwise screen rotation in degrees.
        rotation_deg: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    pub alpha: f32,
}

impl Style {
    pub const fn solid(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub const fn faded(color: Color, alpha: f32) -> Self {
        Self { color, alpha }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: PrimitiveId,
    pub group: GroupId,
    /// Clipped drawables are masked to the dial face circle.
    pub clipped: bool,
    pub shape: Shape,
    pub style: Style,
}

/// Ids the instrument needs to address in RenderCommands after creation.
#[derive(Debug, Clone, Default)]
pub struct SceneRoles {
    /// Readout text primitive, when the instrument has one.
    pub value_text: Option<PrimitiveId>,
    /// Compass card labels with the card angle each sits at.
    pub card_labels: Vec<(f64, PrimitiveId)>,
}

/// Bezel and clip circle sit slightly outside the unit dial so rim ticks and
/// the roll arc stay visible.
pub const CLIP_RADIUS_FACTOR: f64 = 1.08;

struct SceneBuilder {
    drawables: Vec<Drawable>,
}

impl SceneBuilder {
    fn new() -> Self {
        Self {
            drawables: Vec::new(),
        }
    }

    fn push(&mut self, group: GroupId, clipped: bool, shape: Shape, style: Style) -> PrimitiveId {
        let id = PrimitiveId(self.drawables.len() as u16);
        self.drawables.push(Drawable {
            id,
            group,
            clipped,
            shape,
            style,
        });
        id
    }

    fn line(&mut self, group: GroupId, p0: (f64, f64), p1: (f64, f64), width: f32, color: Color) {
        self.push(
            group,
            true,
            Shape::Line {
                p0: Point::new(p0.0, p0.1),
                p1: Point::new(p1.0, p1.1),
                width,
            },
            Style::solid(color),
        );
    }

    fn text(
        &mut self,
        group: GroupId,
        at: (f64, f64),
        text: String,
        size: f32,
        rotation_deg: f64,
        color: Color,
    ) -> PrimitiveId {
        self.push(
            group,
            true,
            Shape::Text {
                at: Point::new(at.0, at.1),
                text,
                size,
                rotation_deg,
            },
            Style::solid(color),
        )
    }

    fn black_face(&mut self) {
        self.push(
            GroupId::Static,
            true,
            Shape::Rect {
                origin: Point::new(-1.2, -1.2),
                w: 2.4,
                h: 2.4,
            },
            Style::solid(Color::BLACK),
        );
    }

    fn bezel(&mut self, clip_radius: f64) {
        self.push(
            GroupId::Static,
            false,
            Shape::CircleOutline {
                radius: clip_radius,
                width: 2.0,
            },
            Style::solid(Color::GRAY),
        );
    }

    fn finish(self) -> Vec<Drawable> {
        self.drawables
    }
}

fn near_multiple(value: f64, base: f64) -> bool {
    let rem = value.rem_euclid(base);
    rem.abs() < 1e-9 || (base - rem).abs() < 1e-9
}

/// Sky, ground, horizon, pitch ladder, roll arc, rim pointer, and the fixed
/// aircraft symbol.
pub fn attitude_scene(config: &InstrumentConfig) -> (Vec<Drawable>, SceneRoles) {
    let r = config.dial_radius;
    let clip = CLIP_RADIUS_FACTOR * r;
    let mut scene = SceneBuilder::new();

    // Horizon group: everything that shifts with pitch and rotates with roll.
    scene.push(
        GroupId::Horizon,
        true,
        Shape::Rect {
            origin: Point::new(-2.0 * r, 0.0),
            w: 4.0 * r,
            h: 2.0 * r,
        },
        Style::solid(Color::SKY_BLUE),
    );
    scene.push(
        GroupId::Horizon,
        true,
        Shape::Rect {
            origin: Point::new(-2.0 * r, -2.0 * r),
            w: 4.0 * r,
            h: 2.0 * r,
        },
        Style::solid(Color::SADDLE_BROWN),
    );
    scene.line(
        GroupId::Horizon,
        (-2.0 * r, 0.0),
        (2.0 * r, 0.0),
        1.0,
        Color::WHITE,
    );

    // Pitch ladder: rungs every 10 degrees with alternating half-widths,
    // displaced by the tangent projection onto the dial.
    let pitch_top = config.pitch_range_degrees as i32;
    let mut rung_half_width = 0.3;
    for p in (0..=pitch_top).step_by(10) {
        rung_half_width = if rung_half_width == 0.3 { 0.5 } else { 0.3 };
        if p == 0 {
            continue;
        }
        let y = (p as f64).to_radians().tan() * r;
        for sign in [1.0, -1.0] {
            scene.line(
                GroupId::Horizon,
                (-rung_half_width, sign * y),
                (rung_half_width, sign * y),
                1.0,
                Color::WHITE,
            );
        }
        if p % 20 != 0 {
            for (x, sign) in [
                (-rung_half_width - 0.05, 1.0),
                (rung_half_width + 0.05, 1.0),
                (-rung_half_width - 0.05, -1.0),
                (rung_half_width + 0.05, -1.0),
            ] {
                scene.text(
                    GroupId::Horizon,
                    (x, sign * y),
                    format!("{p}"),
                    12.0,
                    0.0,
                    Color::WHITE,
                );
            }
        }
    }

    // Fixed roll arc along the top rim, marks every 15 degrees.
    for angle in (-60i32..=60).step_by(15) {
        let rad = (angle as f64).to_radians();
        let (x, y) = (rad.sin() * r, rad.cos() * r);
        if angle % 30 != 0 && angle != 0 {
            scene.line(
                GroupId::Static,
                (x * 0.95, y * 0.95 - 0.15),
                (x, y - 0.15),
                1.0,
                Color::BLACK,
            );
            let a = angle as f64;
            scene.text(
                GroupId::Static,
                (x * 0.95 + a * 0.0022, y - a.abs() * 0.001 - 0.05),
                format!("{}", angle.abs()),
                12.0,
                -a,
                Color::BLACK,
            );
        } else {
            scene.line(
                GroupId::Static,
                (x * 0.9, y * 0.9 - 0.1),
                (x, y - 0.1),
                1.0,
                Color::BLACK,
            );
        }
    }

    // Bank pointer: fixed-size triangle orbiting the rim with roll only.
    scene.push(
        GroupId::RollPointer,
        true,
        Shape::Marker {
            at: Point::new(0.0, r),
            radius: 0.04,
            orientation_deg: 180.0,
        },
        Style::solid(Color::RED),
    );

    // Central aircraft symbol, never transformed.
    scene.push(
        GroupId::Static,
        true,
        Shape::Polyline {
            points: vec![
                Point::new(-0.2, -0.05),
                Point::new(0.0, 0.0),
                Point::new(0.2, -0.05),
            ],
            width: 2.0,
        },
        Style::solid(Color::YELLOW),
    );
    scene.line(GroupId::Static, (-0.85, 0.0), (-0.6, 0.0), 2.0, Color::YELLOW);
    scene.line(GroupId::Static, (0.85, 0.0), (0.6, 0.0), 2.0, Color::YELLOW);

    scene.bezel(clip);
    (scene.finish(), SceneRoles::default())
}

/// Rotating compass card, fixed crosshair, lubber arrow, and heading readout.
pub fn heading_scene(config: &InstrumentConfig, scale: &Scale) -> (Vec<Drawable>, SceneRoles) {
    let r = config.dial_radius;
    let clip = CLIP_RADIUS_FACTOR * r;
    let interval = config.tick_interval_degrees;
    let mut scene = SceneBuilder::new();
    let mut roles = SceneRoles::default();

    scene.black_face();

    let mut value = 0.0;
    while value < 360.0 {
        let angle = scale.map(value);
        let rad = angle.to_radians();
        let major = near_multiple(angle, 3.0 * interval);
        let outer = r - 0.07 + if major { 0.04 } else { 0.0 };
        scene.line(
            GroupId::Card,
            (rad.sin() * (r - 0.14), rad.cos() * (r - 0.14)),
            (rad.sin() * outer, rad.cos() * outer),
            1.0,
            Color::WHITE,
        );
        if major {
            let label = match angle.round() as i64 {
                0 => "N".to_string(),
                90 => "E".to_string(),
                180 => "S".to_string(),
                270 => "W".to_string(),
                other => format!("{}", other / 10),
            };
            // Base rotation keeps the glyphs radial on an unrotated card;
            // each update counter-rotates by the current heading on top.
            let id = scene.text(
                GroupId::Card,
                (rad.sin() * 1.05 * r, rad.cos() * 1.05 * r),
                label,
                14.0,
                -angle,
                Color::WHITE,
            );
            roles.card_labels.push((angle, id));
        }
        value += interval;
    }

    // Fixed crosshair and forward arrow.
    scene.line(GroupId::Static, (0.0, -0.8), (0.0, 0.8), 1.0, Color::WHITE);
    scene.line(GroupId::Static, (-0.8, 0.0), (0.8, 0.0), 1.0, Color::WHITE);
    scene.push(
        GroupId::Static,
        true,
        Shape::Polyline {
            points: vec![
                Point::new(-0.05, 0.7),
                Point::new(0.0, 0.8),
                Point::new(0.05, 0.7),
            ],
            width: 1.0,
        },
        Style::solid(Color::WHITE),
    );
    scene.push(
        GroupId::Static,
        true,
        Shape::Polyline {
            points: vec![
                Point::new(0.3, 0.18),
                Point::new(0.4, 0.28),
                Point::new(0.5, 0.18),
            ],
            width: 2.0,
        },
        Style::solid(Color::RED),
    );

    roles.value_text = Some(scene.text(
        GroupId::Static,
        (0.43, 0.4),
        "000°".to_string(),
        14.0,
        0.0,
        Color::WHITE,
    ));

    scene.bezel(clip);
    (scene.finish(), roles)
}

/// Symmetric drift arc with a rim pointer and signed readout.
pub fn drift_scene(config: &InstrumentConfig, scale: &Scale) -> (Vec<Drawable>, SceneRoles) {
    let r = config.dial_radius;
    let clip = CLIP_RADIUS_FACTOR * r;
    let interval = config.tick_interval_degrees;
    let (domain_lo, domain_hi) = scale.domain();
    let mut scene = SceneBuilder::new();
    let mut roles = SceneRoles::default();

    scene.black_face();

    let mut value = domain_lo;
    while value <= domain_hi + 1e-9 {
        let angle = scale.map(value);
        let rad = angle.to_radians();
        let major = near_multiple(angle, 3.0 * interval);
        let inner = r - if major { 0.05 } else { 0.0 };
        scene.line(
            GroupId::Static,
            (rad.sin() * inner, rad.cos() * inner),
            (rad.sin() * (r + 0.1), rad.cos() * (r + 0.1)),
            1.0,
            Color::WHITE,
        );
        if major {
            // Drift dial graduations read a third of the card angle.
            scene.text(
                GroupId::Static,
                (rad.sin() * 0.8, rad.cos() * 0.8),
                format!("{}", (angle / 3.0).round() as i64),
                14.0,
                0.0,
                Color::WHITE,
            );
        }
        value += interval;
    }

    scene.push(
        GroupId::Pointer,
        true,
        Shape::Marker {
            at: Point::new(0.0, r - 0.2),
            radius: 0.07,
            orientation_deg: 0.0,
        },
        Style::solid(Color::RED),
    );

    roles.value_text = Some(scene.text(
        GroupId::Static,
        (0.0, 0.0),
        "Drift: +0°".to_string(),
        14.0,
        0.0,
        Color::WHITE,
    ));

    scene.bezel(clip);
    (scene.finish(), roles)
}

/// Two-slope airspeed dial: zone wedges, non-uniform ticks, rim pointer,
/// and readout.
pub fn speed_scene(
    config: &InstrumentConfig,
    scale: &Scale,
    zones: &ZoneSet,
) -> (Vec<Drawable>, SceneRoles) {
    let r = config.dial_radius;
    let clip = CLIP_RADIUS_FACTOR * r;
    let (domain_lo, domain_hi) = scale.domain();
    let mut scene = SceneBuilder::new();
    let mut roles = SceneRoles::default();

    scene.black_face();

    // Advisory wedges first so ticks draw over them. Arcs come from the zone
    // classifier so they stay consistent with the pointer mapping.
    for band in zones.bands() {
        let (start, end) = ZoneSet::band_arc(band, scale);
        scene.push(
            GroupId::Static,
            true,
            Shape::Wedge {
                r_inner: r + 0.02,
                r_outer: r + 0.12,
                start_deg: start,
                end_deg: end,
            },
            Style::faded(band.tag.wedge_color(), 0.7),
        );
    }

    let mut speed = domain_lo;
    while speed <= domain_hi + 1e-9 {
        let angle = scale.map(speed);
        let rad = angle.to_radians();
        let minor = !near_multiple(speed, 20.0);
        let inner = r + if minor { 0.03 } else { 0.0 };
        let at_redline = near_multiple(speed, 200.0) && speed > 0.0;
        scene.line(
            GroupId::Static,
            (rad.sin() * inner, rad.cos() * inner),
            (rad.sin() * (r + 0.13), rad.cos() * (r + 0.13)),
            1.0,
            if at_redline { Color::RED } else { Color::WHITE },
        );
        if !minor {
            scene.text(
                GroupId::Static,
                (rad.sin() * 0.85, rad.cos() * 0.85),
                format!("{}", speed.round() as i64),
                12.0,
                0.0,
                Color::WHITE,
            );
        }
        speed += 5.0;
    }

    scene.push(
        GroupId::Pointer,
        true,
        Shape::Marker {
            at: Point::new(0.0, r - 0.2),
            radius: 0.07,
            orientation_deg: 0.0,
        },
        Style::solid(Color::RED),
    );

    roles.value_text = Some(scene.text(
        GroupId::Static,
        (0.0, 0.0),
        "Speed: 0.0 km/h".to_string(),
        12.0,
        0.0,
        Color::WHITE,
    ));

    scene.bezel(clip);
    (scene.finish(), roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_dense_and_ordered() {
        let (drawables, _) = speed_scene(
            &InstrumentConfig::default(),
            &Scale::airspeed(),
            &ZoneSet::airspeed(),
        );
        for (i, d) in drawables.iter().enumerate() {
            assert_eq!(d.id.0 as usize, i);
        }
    }

    #[test]
    fn heading_card_has_twelve_labels() {
        let (_, roles) = heading_scene(&InstrumentConfig::default(), &Scale::heading());
        assert_eq!(roles.card_labels.len(), 12);
        let angles: Vec<f64> = roles.card_labels.iter().map(|(a, _)| *a).collect();
        assert!(angles.contains(&0.0) && angles.contains(&90.0) && angles.contains(&330.0));
    }

    #[test]
    fn speed_scene_carries_zone_wedges() {
        let zones = ZoneSet::airspeed();
        let (drawables, _) = speed_scene(&InstrumentConfig::default(), &Scale::airspeed(), &zones);
        let wedges: Vec<_> = drawables
            .iter()
            .filter_map(|d| match &d.shape {
                Shape::Wedge {
                    start_deg, end_deg, ..
                } => Some((*start_deg, *end_deg)),
                _ => None,
            })
            .collect();
        assert_eq!(wedges.len(), zones.bands().len());
        // Green wedge spans exactly the mapped band.
        let scale = Scale::airspeed();
        assert_eq!(wedges[0], (scale.map(60.0), scale.map(150.0)));
    }

    #[test]
    fn roll_arc_labels_are_unsigned_and_counter_rotated() {
        let (drawables, _) = attitude_scene(&InstrumentConfig::default());
        let labels: Vec<(String, f64)> = drawables
            .iter()
            .filter_map(|d| match &d.shape {
                Shape::Text {
                    text, rotation_deg, ..
                } if d.group == GroupId::Static => Some((text.clone(), *rotation_deg)),
                _ => None,
            })
            .collect();
        // 15 and 45 degree marks on both sides, magnitude text, rotation
        // following the signed bank angle.
        assert!(labels.contains(&("45".to_string(), -45.0)));
        assert!(labels.contains(&("45".to_string(), 45.0)));
        assert!(labels.contains(&("15".to_string(), -15.0)));
        assert!(labels.iter().all(|(text, _)| !text.starts_with('-')));
    }

    #[test]
    fn attitude_pitch_rungs_use_tangent_projection() {
        let (drawables, _) = attitude_scene(&InstrumentConfig::default());
        let expected_y = 30.0_f64.to_radians().tan();
        let found = drawables.iter().any(|d| {
            matches!(
                &d.shape,
                Shape::Line { p0, .. }
                    if d.group == GroupId::Horizon && (p0.y - expected_y).abs() < 1e-12
            )
        });
        assert!(found, "missing 30 degree pitch rung");
    }
}
