// ============================================================================
// SOFTWARE RASTERIZER
// ============================================================================
//
// Draws a retained Scene into an RGBA framebuffer. The engine never calls
// into this module; it is the rendering-surface side of the RenderCommand
// boundary. All shapes arrive in dial units and are projected through a
// Viewport; group transforms are applied before projection, and clipped
// drawables are masked to the dial face circle.

use rusttype::{point, Font, PositionedGlyph, Scale as FontScale};

use crate::config::Color;
use crate::geometry::{Shape, CLIP_RADIUS_FACTOR};
use crate::scene::Scene;
use crate::transform::Point;

/// Maps dial units into a square region of the framebuffer.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub cx: f64,
    pub cy: f64,
    pub units_to_px: f64,
    /// Face clip radius in dial units.
    pub clip_radius: f64,
}

impl Viewport {
    /// A viewport centered in a rectangle, sized so the clipped dial face
    /// fits with a small margin.
    pub fn fit(left: f64, top: f64, width: f64, height: f64, dial_radius: f64) -> Self {
        let clip_radius = CLIP_RADIUS_FACTOR * dial_radius;
        let units_to_px = (width.min(height) / 2.0 - 6.0) / clip_radius;
        Self {
            cx: left + width / 2.0,
            cy: top + height / 2.0,
            units_to_px,
            clip_radius,
        }
    }

    fn project(&self, p: Point) -> (f64, f64) {
        (
            self.cx + p.x * self.units_to_px,
            self.cy - p.y * self.units_to_px,
        )
    }

    fn clip_px(&self) -> Clip {
        Clip {
            cx: self.cx,
            cy: self.cy,
            r: self.clip_radius * self.units_to_px,
        }
    }
}

/// Circular pixel mask.
#[derive(Debug, Clone, Copy)]
struct Clip {
    cx: f64,
    cy: f64,
    r: f64,
}

impl Clip {
    fn contains(&self, x: i32, y: i32) -> bool {
        let dx = x as f64 - self.cx;
        let dy = y as f64 - self.cy;
        dx * dx + dy * dy <= self.r * self.r
    }
}

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    // Scan bounds are clamped in f64 before any integer cast so coordinates
    // far off screen (the steep end of the pitch ladder, for one) never
    // overflow integer arithmetic.
    fn clamp_x(&self, lo: f64, hi: f64) -> (i32, i32) {
        (
            lo.max(0.0) as i32,
            hi.min(self.width as f64 - 1.0) as i32,
        )
    }

    fn clamp_y(&self, lo: f64, hi: f64) -> (i32, i32) {
        (
            lo.max(0.0) as i32,
            hi.min(self.height as f64 - 1.0) as i32,
        )
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32, clip: Option<Clip>) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return;
            }
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for ch in 0..3 {
            let dst = self.frame[idx + ch] as f32;
            self.frame[idx + ch] = (src[ch] * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    fn thick_line(
        &mut self,
        (x0, y0): (f64, f64),
        (x1, y1): (f64, f64),
        thickness: f32,
        color: Color,
        alpha: f32,
        clip: Option<Clip>,
    ) {
        let pad = thickness.ceil() as f64 + 1.0;
        let (min_x, max_x) = self.clamp_x(x0.min(x1).floor() - pad, x0.max(x1).ceil() + pad);
        let (min_y, max_y) = self.clamp_y(y0.min(y1).floor() - pad, y0.max(y1).ceil() + pad);
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = (dx * dx + dy * dy).max(1e-12);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 - x0;
                let py = y as f64 - y0;
                let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
                let lx = x0 + t * dx;
                let ly = y0 + t * dy;
                let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
                let aa = (1.0 - (dist - thickness as f64 / 2.0).clamp(0.0, 1.0)) as f32;
                if aa > 0.01 {
                    self.blend(x, y, color, aa * alpha, clip);
                }
            }
        }
    }

    /// Fills a convex polygon with anti-aliased edges. Vertex winding may be
    /// either direction.
    fn fill_convex_polygon(
        &mut self,
        pts: &[(f64, f64)],
        color: Color,
        alpha: f32,
        clip: Option<Clip>,
    ) {
        if pts.len() < 3 {
            return;
        }
        // Signed area decides the winding so edge distances are positive
        // inside regardless of vertex order.
        let mut area = 0.0;
        for i in 0..pts.len() {
            let (x0, y0) = pts[i];
            let (x1, y1) = pts[(i + 1) % pts.len()];
            area += x0 * y1 - x1 * y0;
        }
        let orient = if area >= 0.0 { 1.0 } else { -1.0 };

        let lo_x = pts.iter().map(|p| p.0).fold(f64::INFINITY, f64::min).floor() - 1.0;
        let hi_x = pts
            .iter()
            .map(|p| p.0)
            .fold(f64::NEG_INFINITY, f64::max)
            .ceil()
            + 1.0;
        let lo_y = pts.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).floor() - 1.0;
        let hi_y = pts
            .iter()
            .map(|p| p.1)
            .fold(f64::NEG_INFINITY, f64::max)
            .ceil()
            + 1.0;
        let (min_x, max_x) = self.clamp_x(lo_x, hi_x);
        let (min_y, max_y) = self.clamp_y(lo_y, hi_y);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let mut inside = f64::INFINITY;
                for i in 0..pts.len() {
                    let (x0, y0) = pts[i];
                    let (x1, y1) = pts[(i + 1) % pts.len()];
                    let ex = x1 - x0;
                    let ey = y1 - y0;
                    let len = (ex * ex + ey * ey).sqrt().max(1e-12);
                    let d = orient * (ex * (y as f64 - y0) - ey * (x as f64 - x0)) / len;
                    inside = inside.min(d);
                }
                let aa = (inside + 0.5).clamp(0.0, 1.0) as f32;
                if aa > 0.01 {
                    self.blend(x, y, color, aa * alpha, clip);
                }
            }
        }
    }

    fn circle_outline(
        &mut self,
        (cx, cy): (f64, f64),
        radius: f64,
        width: f32,
        color: Color,
        alpha: f32,
    ) {
        let outer = radius + width as f64 / 2.0;
        let inner = radius - width as f64 / 2.0;
        let (min_x, max_x) = self.clamp_x((cx - outer).floor() - 1.0, (cx + outer).ceil() + 1.0);
        let (min_y, max_y) = self.clamp_y((cy - outer).floor() - 1.0, (cy + outer).ceil() + 1.0);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
                let aa = if dist > outer {
                    1.0 - (dist - outer).min(1.0)
                } else if dist < inner {
                    1.0 - (inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32 * alpha, None);
                }
            }
        }
    }

    /// Annulus sector between two dial angles (degrees, 0 at the top,
    /// clockwise positive). Angles must not wrap past the bottom of the dial.
    #[allow(clippy::too_many_arguments)]
    fn wedge(
        &mut self,
        center: (f64, f64),
        r_inner: f64,
        r_outer: f64,
        start_deg: f64,
        end_deg: f64,
        color: Color,
        alpha: f32,
        clip: Option<Clip>,
    ) {
        let (cx, cy) = center;
        let (min_x, max_x) = self.clamp_x((cx - r_outer).floor() - 1.0, (cx + r_outer).ceil() + 1.0);
        let (min_y, max_y) = self.clamp_y((cy - r_outer).floor() - 1.0, (cy + r_outer).ceil() + 1.0);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                // Dial-space direction of this pixel: x east, y north.
                let ex = x as f64 - cx;
                let ny = cy - y as f64;
                let dist = (ex * ex + ny * ny).sqrt();
                let angle = ex.atan2(ny).to_degrees();
                if angle < start_deg || angle > end_deg {
                    continue;
                }
                let aa = if dist > r_outer {
                    1.0 - (dist - r_outer).min(1.0)
                } else if dist < r_inner {
                    1.0 - (r_inner - dist).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.blend(x, y, color, aa as f32 * alpha, clip);
                }
            }
        }
    }

    fn text_centered(
        &mut self,
        (cx, cy): (f64, f64),
        text: &str,
        font: &Font,
        size: f32,
        color: Color,
        alpha: f32,
        clip: Option<Clip>,
    ) {
        let scale = FontScale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> =
            font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
        let Some((min_x, max_x, min_y, max_y)) = glyph_bounds(&glyphs) else {
            return;
        };
        let offset_x = cx - ((max_x - min_x) / 2) as f64;
        let offset_y = cy - ((max_y - min_y) / 2) as f64;
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = (offset_x + (gx as i32 + bb.min.x - min_x) as f64) as i32;
                    let py = (offset_y + (gy as i32 + bb.min.y - min_y) as f64) as i32;
                    self.blend(px, py, color, v * alpha, clip);
                });
            }
        }
    }

    /// Draws text rotated about its own center. `rotation_deg` is
    /// counterclockwise on screen, matching label rotation semantics.
    #[allow(clippy::too_many_arguments)]
    fn text_rotated(
        &mut self,
        (cx, cy): (f64, f64),
        text: &str,
        font: &Font,
        size: f32,
        rotation_deg: f64,
        color: Color,
        alpha: f32,
        clip: Option<Clip>,
    ) {
        let scale = FontScale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let glyphs: Vec<PositionedGlyph> =
            font.layout(text, scale, point(0.0, v_metrics.ascent)).collect();
        let Some((min_x, max_x, min_y, max_y)) = glyph_bounds(&glyphs) else {
            return;
        };
        let text_cx = (min_x + max_x) as f64 / 2.0;
        let text_cy = (min_y + max_y) as f64 / 2.0;
        // Screen y grows downward, so a CCW visual rotation is a negative
        // mathematical angle here.
        let (sin, cos) = (-rotation_deg.to_radians()).sin_cos();
        for glyph in &glyphs {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v <= 0.001 {
                        return;
                    }
                    let lx = gx as f64 + bb.min.x as f64 - text_cx;
                    let ly = gy as f64 + bb.min.y as f64 - text_cy;
                    let fx = cx + lx * cos - ly * sin;
                    let fy = cy + lx * sin + ly * cos;
                    self.splat(fx, fy, color, v * alpha, clip);
                });
            }
        }
    }

    /// Bilinear sub-pixel splat used by rotated glyph rendering.
    fn splat(&mut self, x: f64, y: f64, color: Color, alpha: f32, clip: Option<Clip>) {
        if !(x.is_finite() && y.is_finite())
            || x < -2.0
            || y < -2.0
            || x > self.width as f64 + 2.0
            || y > self.height as f64 + 2.0
        {
            return;
        }
        let xf = x.floor();
        let yf = y.floor();
        let fx = x - xf;
        let fy = y - yf;
        let samples = [
            (xf as i32, yf as i32, (1.0 - fx) * (1.0 - fy)),
            (xf as i32 + 1, yf as i32, fx * (1.0 - fy)),
            (xf as i32, yf as i32 + 1, (1.0 - fx) * fy),
            (xf as i32 + 1, yf as i32 + 1, fx * fy),
        ];
        for (px, py, weight) in samples {
            let a = alpha * weight as f32;
            if a > 0.001 {
                self.blend(px, py, color, a, clip);
            }
        }
    }
}

fn glyph_bounds(glyphs: &[PositionedGlyph]) -> Option<(i32, i32, i32, i32)> {
    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for bb in glyphs.iter().filter_map(|g| g.pixel_bounding_box()) {
        bounds = Some(match bounds {
            None => (bb.min.x, bb.max.x, bb.min.y, bb.max.y),
            Some((min_x, max_x, min_y, max_y)) => (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            ),
        });
    }
    bounds
}

/// Marker triangle vertices in dial units, before the group transform.
fn marker_vertices(at: Point, radius: f64, orientation_deg: f64) -> [Point; 3] {
    let mut vertices = [Point::new(0.0, 0.0); 3];
    for (k, vertex) in vertices.iter_mut().enumerate() {
        let theta = (orientation_deg + 90.0 + k as f64 * 120.0).to_radians();
        *vertex = Point::new(at.x + radius * theta.cos(), at.y + radius * theta.sin());
    }
    vertices
}

/// Rasterizes every drawable of a scene through the viewport. Text is skipped
/// when no font is available.
pub fn render_scene(canvas: &mut Canvas, scene: &Scene, viewport: &Viewport, font: Option<&Font>) {
    for drawable in scene.drawables() {
        let transform = scene.group_transform(drawable.group);
        let clip = drawable.clipped.then(|| viewport.clip_px());
        let color = drawable.style.color;
        let alpha = drawable.style.alpha;
        let project = |p: Point| viewport.project(transform.apply(p));

        match &drawable.shape {
            Shape::Line { p0, p1, width } => {
                canvas.thick_line(project(*p0), project(*p1), *width, color, alpha, clip);
            }
            Shape::Polyline { points, width } => {
                for pair in points.windows(2) {
                    canvas.thick_line(project(pair[0]), project(pair[1]), *width, color, alpha, clip);
                }
            }
            Shape::Rect { origin, w, h } => {
                let corners = [
                    *origin,
                    Point::new(origin.x + w, origin.y),
                    Point::new(origin.x + w, origin.y + h),
                    Point::new(origin.x, origin.y + h),
                ];
                let pts: Vec<(f64, f64)> = corners.iter().map(|p| project(*p)).collect();
                canvas.fill_convex_polygon(&pts, color, alpha, clip);
            }
            Shape::CircleOutline { radius, width } => {
                let center = project(Point::new(0.0, 0.0));
                canvas.circle_outline(center, radius * viewport.units_to_px, *width, color, alpha);
            }
            Shape::Wedge {
                r_inner,
                r_outer,
                start_deg,
                end_deg,
            } => {
                let center = project(Point::new(0.0, 0.0));
                canvas.wedge(
                    center,
                    r_inner * viewport.units_to_px,
                    r_outer * viewport.units_to_px,
                    *start_deg,
                    *end_deg,
                    color,
                    alpha,
                    clip,
                );
            }
            Shape::Marker {
                at,
                radius,
                orientation_deg,
            } => {
                let pts: Vec<(f64, f64)> = marker_vertices(*at, *radius, *orientation_deg)
                    .iter()
                    .map(|p| project(*p))
                    .collect();
                canvas.fill_convex_polygon(&pts, color, alpha, clip);
            }
            Shape::Text {
                at,
                text,
                size,
                rotation_deg,
            } => {
                let Some(font) = font else { continue };
                let pos = project(*at);
                // The group transform moves the anchor; the label's own
                // rotation is absolute on screen, as with the compass card.
                if rotation_deg.abs() < 1e-9 {
                    canvas.text_centered(pos, text, font, *size, color, alpha, clip);
                } else {
                    canvas.text_rotated(pos, text, font, *size, *rotation_deg, color, alpha, clip);
                }
            }
        }
    }
}
