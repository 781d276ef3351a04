//! Colors for scene elements

pub const BACKGROUND: &str = "#0f172a";
pub const LANE_START: &str = "#131c2e";
pub const TRACK_ACCENT: &str = "#334155";
pub const FINISH_LINE: &str = "#ef4444";
pub const MARKER_TEXT: &str = "#94a3b8";
pub const MARKER_LINE: &str = "rgba(71, 85, 105, 0.3)";
pub const PANEL_FILL: &str = "rgba(15, 23, 42, 0.95)";
pub const PANEL_SHADOW: &str = "rgba(0, 0, 0, 0.6)";
pub const READOUT_TEXT: &str = "#f8fafc";
pub const WHITE: &str = "#ffffff";

/// Alpha of the glow around each racer
pub const GLOW_ALPHA: f32 = 1.0 / 3.0;

/// Append an alpha byte to a `#rrggbb` color
pub fn with_alpha(hex: &str, opacity: f32) -> String {
    let byte = (opacity.clamp(0.0, 1.0) * 255.0).floor() as u8;
    format!("{}{:02x}", hex, byte)
}

/// Far end of a lane, warmer as friction and drag grow
pub fn lane_tint(friction: f32, drag: f32) -> String {
    let intensity = (friction + drag) * 0.5;
    let red = (30.0 + intensity * 120.0).round() as u8;
    format!("rgba({}, 25, 35, 0.4)", red)
}
