// ============================================================================
// COMPOSITE TRANSFORM BUILDER
// ============================================================================
//
// Immutable 2D affine transforms in dial space (origin at the dial center,
// y up). Composition order is fixed for the attitude instrument: translation
// happens in untransformed dial space, then rotation about the center. Pitch
// shifts the horizon before roll rotates the whole horizon group; roll-only
// elements use rotation alone.
//
// Sign convention: instruments are clockwise-positive (compass/roll sense)
// while standard 2D rotation is counterclockwise-positive, so every physical
// angle is negated exactly once, here.

/// A point in dial coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Immutable 2D affine transform.
///
/// `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Transform2D {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        }
    }

    /// Counterclockwise rotation about the origin, in degrees.
    pub fn rotation_deg(theta: f64) -> Self {
        let (sin, cos) = theta.to_radians().sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    /// Returns the transform that applies `self` first, then `next`.
    pub fn then(self, next: Self) -> Self {
        Self {
            a: next.a * self.a + next.c * self.b,
            b: next.b * self.a + next.d * self.b,
            c: next.a * self.c + next.c * self.d,
            d: next.b * self.c + next.d * self.d,
            tx: next.a * self.tx + next.c * self.ty + next.tx,
            ty: next.b * self.tx + next.d * self.ty + next.ty,
        }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.tx,
            y: self.b * p.x + self.d * p.y + self.ty,
        }
    }

    /// The rotation component, in degrees. Valid for the rotate-and-translate
    /// transforms this crate builds.
    pub fn rotation_component_deg(&self) -> f64 {
        self.b.atan2(self.a).to_degrees()
    }

    pub fn translation_component(&self) -> (f64, f64) {
        (self.tx, self.ty)
    }
}

/// Vertical horizon displacement for a pitch angle: tangent projection onto a
/// dial of the given radius.
pub fn pitch_offset(pitch_deg: f64, dial_radius: f64) -> f64 {
    pitch_deg.to_radians().tan() * dial_radius
}

/// Transform for the horizon/pitch-ladder group of the attitude instrument:
/// translate down by the pitch offset, then rotate by the negated roll angle.
pub fn horizon_transform(pitch_deg: f64, roll_deg: f64, dial_radius: f64) -> Transform2D {
    Transform2D::translation(0.0, -pitch_offset(pitch_deg, dial_radius))
        .then(Transform2D::rotation_deg(-roll_deg))
}

/// Transform for rotation-only elements: the roll pointer, the compass card,
/// and the drift/speed pointers. Negates the physical angle.
pub fn pointer_transform(angle_deg: f64) -> Transform2D {
    Transform2D::rotation_deg(-angle_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }

    #[test]
    fn translate_then_rotate_order() {
        // Rotating 90 deg CCW after translating (0, -1) must land the origin
        // at (1, 0), not (0, -1) rotated into the translation.
        let t = Transform2D::translation(0.0, -1.0).then(Transform2D::rotation_deg(90.0));
        let p = t.apply(Point::new(0.0, 0.0));
        assert_close(p.x, 1.0);
        assert_close(p.y, 0.0);
    }

    #[test]
    fn rotation_negates_physical_angle() {
        let t = pointer_transform(30.0);
        assert_close(t.rotation_component_deg(), -30.0);
    }

    #[test]
    fn pitch_offset_is_tangent_projection() {
        assert_close(pitch_offset(10.0, 1.0), 10.0_f64.to_radians().tan());
        assert_close(pitch_offset(45.0, 2.0), 2.0);
        assert_close(pitch_offset(0.0, 1.0), 0.0);
    }

    #[test]
    fn horizon_transform_components() {
        let t = horizon_transform(10.0, 20.0, 1.0);
        assert_close(t.rotation_component_deg(), -20.0);
        // The translation is rotated along with the group, so recover it by
        // applying the transform to the center.
        let offset = pitch_offset(10.0, 1.0);
        let center = t.apply(Point::new(0.0, 0.0));
        let expected = Transform2D::rotation_deg(-20.0).apply(Point::new(0.0, -offset));
        assert_close(center.x, expected.x);
        assert_close(center.y, expected.y);
    }

    #[test]
    fn horizon_transform_without_roll_is_pure_shift() {
        let t = horizon_transform(10.0, 0.0, 1.0);
        assert_eq!(
            t.translation_component(),
            (0.0, -10.0_f64.to_radians().tan())
        );
        assert_close(t.rotation_component_deg(), 0.0);
    }

    #[test]
    fn transforms_are_value_types() {
        // Identical inputs must produce bit-identical transforms.
        assert_eq!(horizon_transform(7.5, -12.0, 1.0), horizon_transform(7.5, -12.0, 1.0));
    }
}
