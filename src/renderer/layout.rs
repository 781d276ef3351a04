//! Responsive track layout, recomputed from the canvas size every frame

use glam::Vec2;

use crate::consts::LANE_COUNT;

/// Below this height the layout tightens margins and glyphs
const COMPACT_HEIGHT: f32 = 450.0;
/// Readout boxes need at least this much height
const READOUT_MIN_HEIGHT: f32 = 400.0;
/// Distance markers span the track in this many intervals
const MARKER_INTERVALS: u32 = 5;

/// Pixel geometry of the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub size: Vec2,
    pub margin: f32,
    pub lane_height: f32,
    pub track_width: f32,
    pub pixels_per_meter: f32,
    pub compact: bool,
}

impl Layout {
    pub fn compute(width: f32, height: f32, max_distance: f32) -> Self {
        let compact = height < COMPACT_HEIGHT;
        let margin = if compact { 30.0 } else { 80.0 };
        let lane_height = ((height - margin * 2.0) / LANE_COUNT as f32).max(0.0);
        let track_width = (width - margin * 2.0).max(0.0);
        let pixels_per_meter = track_width / max_distance.max(f32::EPSILON);

        Self {
            size: Vec2::new(width, height),
            margin,
            lane_height,
            track_width,
            pixels_per_meter,
            compact,
        }
    }

    pub fn lane_top(&self, lane: usize) -> f32 {
        self.margin + lane as f32 * self.lane_height
    }

    pub fn lane_center(&self, lane: usize) -> f32 {
        self.lane_top(lane) + self.lane_height / 2.0
    }

    /// Canvas x for a track position in meters
    pub fn x_for(&self, position: f32) -> f32 {
        self.margin + position * self.pixels_per_meter
    }

    pub fn finish_x(&self) -> f32 {
        self.margin + self.track_width
    }

    pub fn body_radius(&self) -> f32 {
        if self.compact { 20.0 } else { 30.0 }
    }

    pub fn trail_width(&self) -> f32 {
        if self.compact { 10.0 } else { 15.0 }
    }

    pub fn show_readout(&self) -> bool {
        self.size.y >= READOUT_MIN_HEIGHT
    }

    /// Evenly spaced markers: (meters, canvas x), both ends included
    pub fn markers(&self, max_distance: f32) -> impl Iterator<Item = (f32, f32)> + '_ {
        (0..=MARKER_INTERVALS).map(move |i| {
            let meters = max_distance * i as f32 / MARKER_INTERVALS as f32;
            (meters, self.x_for(meters))
        })
    }

    /// Baseline of marker labels
    pub fn marker_label_y(&self) -> f32 {
        self.margin - if self.compact { 10.0 } else { 20.0 }
    }

    /// Vertical extent of marker guide lines
    pub fn marker_span(&self) -> (f32, f32) {
        let top = self.margin - if self.compact { 8.0 } else { 15.0 };
        (top, self.size.y - self.margin + 10.0)
    }

    pub fn marker_font(&self) -> &'static str {
        if self.compact {
            "bold 10px \"Inter\", sans-serif"
        } else {
            "bold 12px \"Inter\", sans-serif"
        }
    }

    pub fn glyph_font(&self) -> &'static str {
        if self.compact {
            "bold 16px sans-serif"
        } else {
            "bold 24px sans-serif"
        }
    }

    /// Baseline nudge so a glyph sits visually centered
    pub fn glyph_offset(&self) -> f32 {
        if self.compact { 6.0 } else { 9.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_layout() {
        let l = Layout::compute(1280.0, 720.0, 300.0);
        assert!(!l.compact);
        assert_eq!(l.margin, 80.0);
        assert!((l.lane_height - 186.666_67).abs() < 1e-3);
        assert_eq!(l.track_width, 1120.0);
        assert_eq!(l.x_for(0.0), 80.0);
        assert!((l.x_for(300.0) - l.finish_x()).abs() < 1e-3);
        assert_eq!(l.body_radius(), 30.0);
        assert!(l.show_readout());
    }

    #[test]
    fn test_compact_layout() {
        let l = Layout::compute(800.0, 420.0, 100.0);
        assert!(l.compact);
        assert_eq!(l.margin, 30.0);
        assert_eq!(l.body_radius(), 20.0);
        assert!(l.show_readout());

        let tiny = Layout::compute(800.0, 300.0, 100.0);
        assert!(!tiny.show_readout());
    }

    #[test]
    fn test_markers_cover_track() {
        let l = Layout::compute(1000.0, 600.0, 250.0);
        let markers: Vec<_> = l.markers(250.0).collect();
        assert_eq!(markers.len(), 6);
        assert_eq!(markers[0], (0.0, l.margin));
        assert_eq!(markers[5].0, 250.0);
        assert!((markers[5].1 - l.finish_x()).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_sizes_do_not_go_negative() {
        let l = Layout::compute(0.0, 0.0, 300.0);
        assert_eq!(l.track_width, 0.0);
        assert_eq!(l.lane_height, 0.0);
        assert!(l.pixels_per_meter.is_finite());
    }
}
