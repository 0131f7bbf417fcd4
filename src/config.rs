// ============================================================================
// COLOR & CONFIGURATION
// ============================================================================

use bon::Builder;

use crate::scale::Scale;
use crate::zone::{ZoneSet, ZoneTag};

/// Color representation for instrument elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const GRAY: Self = Self::new(0x80, 0x80, 0x80);
    pub const RED: Self = Self::new(0xff, 0x00, 0x00);
    pub const YELLOW: Self = Self::new(0xff, 0xff, 0x00);
    pub const LIME: Self = Self::new(0x00, 0xff, 0x00);
    pub const GREEN: Self = Self::new(0x00, 0x80, 0x00);
    pub const SKY_BLUE: Self = Self::new(0x87, 0xce, 0xeb);
    pub const SADDLE_BROWN: Self = Self::new(0x8b, 0x45, 0x13);
}

impl ZoneTag {
    /// Advisory color used for readout text.
    pub const fn color(self) -> Color {
        match self {
            ZoneTag::Neutral => Color::WHITE,
            ZoneTag::Normal => Color::LIME,
            ZoneTag::Caution => Color::YELLOW,
            ZoneTag::Warning => Color::RED,
        }
    }

    /// Muted color used for the band wedge on the dial face.
    pub const fn wedge_color(self) -> Color {
        match self {
            ZoneTag::Normal => Color::GREEN,
            other => other.color(),
        }
    }
}

/// Per-instrument configuration. Every option has a kind-appropriate default;
/// `scale` and `zone_bands` fall back to the canonical presets for the
/// instrument kind when unset.
#[derive(Debug, Clone, Builder)]
pub struct InstrumentConfig {
    #[builder(default = 1.0)]
    pub dial_radius: f64,
    /// Value-to-angle mapping. Defaults to the kind's canonical scale.
    pub scale: Option<Scale>,
    /// Advisory bands. Defaults to the airspeed bands on the speed
    /// instrument, none elsewhere.
    pub zone_bands: Option<ZoneSet>,
    /// Pitch ladder extent for the attitude instrument.
    #[builder(default = 90.0)]
    pub pitch_range_degrees: f64,
    /// Tick spacing on the heading card and drift arc.
    #[builder(default = 10.0)]
    pub tick_interval_degrees: f64,
}

impl Default for InstrumentConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Configuration for the four-instrument panel window.
#[derive(Debug, Clone, Builder)]
pub struct PanelConfig {
    #[builder(default = "Flight Instruments".to_string())]
    pub title: String,
    #[builder(default = 640)]
    pub window_width: usize,
    #[builder(default = 640)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    /// Per-frame reading interpolation factor; 1.0 disables smoothing.
    #[builder(default = 0.1)]
    pub smoothing: f64,
    #[builder(default = Color::new(0x10, 0x10, 0x10))]
    pub background_color: Color,
    /// TTF/OTF bytes for dial text. Labels are skipped when absent.
    pub font_data: Option<Vec<u8>>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
