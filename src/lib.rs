// ============================================================================
// CRATE ROOT
// ============================================================================
//
// Circular flight instruments: an attitude indicator, a rotating-card heading
// indicator, a drift pointer, and an airspeed dial with advisory zones. The
// engine side (scale, zone, transform, instrument) is pure and emits
// RenderCommands; the surface side (scene, render, panel) retains geometry and
// rasterizes it into a pixel framebuffer.

pub mod config;
pub mod error;
pub mod geometry;
pub mod instrument;
pub mod panel;
pub mod render;
pub mod scale;
pub mod scene;
pub mod transform;
pub mod zone;

pub use config::{Color, InstrumentConfig, PanelConfig};
pub use error::{ConfigError, UpdateError};
pub use geometry::{Drawable, GroupId, PrimitiveId, Shape, Style};
pub use instrument::{Instrument, InstrumentKind, Reading};
pub use panel::{Panel, PanelCommand};
pub use render::{render_scene, Canvas, Viewport};
pub use scale::{Scale, ScaleSegment};
pub use scene::{RenderCommand, RenderOp, Scene};
pub use transform::{Point, Transform2D};
pub use zone::{ZoneBand, ZoneSet, ZoneTag};
