//! Full-frame scene: lanes, markers, trails, readouts and racers
//!
//! Redrawn every display frame whatever the race status. Holds no state.

use glam::Vec2;

use super::layout::Layout;
use super::palette;
use super::{Painter, Rect, Stroke, TextAlign};
use crate::consts::LANE_COUNT;
use crate::sim::{ObjectState, Race};

const READOUT_SIZE: Vec2 = Vec2::new(100.0, 52.0);
const READOUT_FONT: &str = "bold 11px \"JetBrains Mono\", monospace";
/// Gap between a readout box and the racer below it
const READOUT_GAP: f32 = 12.0;
/// Inset of the sprite inside the body disc
const SPRITE_INSET: f32 = 4.0;

/// What the renderer needs from the race
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub objects: &'a [ObjectState],
    pub max_distance: f32,
    /// Global friction, tints the lanes
    pub friction: f32,
    /// Global drag, tints the lanes
    pub drag: f32,
}

impl<'a> FrameView<'a> {
    pub fn from_race(race: &'a Race) -> Self {
        let global = race.params().global();
        Self {
            objects: race.objects(),
            max_distance: global.max_distance,
            friction: global.friction,
            drag: global.air_resistance,
        }
    }
}

/// Redraw the whole frame for a `width` x `height` surface
pub fn draw_frame<P: Painter>(painter: &mut P, view: &FrameView<'_>, width: f32, height: f32) {
    let layout = Layout::compute(width, height, view.max_distance);

    painter.clear(layout.size, palette::BACKGROUND);
    draw_lanes(painter, &layout, view);
    draw_markers(painter, &layout, view.max_distance);

    for (lane, object) in view.objects.iter().enumerate().take(LANE_COUNT) {
        draw_object(painter, &layout, lane, object);
    }
}

fn draw_lanes<P: Painter>(painter: &mut P, layout: &Layout, view: &FrameView<'_>) {
    let tint = palette::lane_tint(view.friction, view.drag);
    let left = layout.margin;
    let right = layout.finish_x();

    for lane in 0..LANE_COUNT {
        let top = layout.lane_top(lane);
        let bottom = top + layout.lane_height;

        painter.fill_rect_gradient(
            Rect::new(left, top, layout.track_width, layout.lane_height),
            palette::LANE_START,
            &tint,
        );
        painter.line(
            Vec2::new(left, bottom),
            Vec2::new(right, bottom),
            Stroke::solid(palette::TRACK_ACCENT, 1.0),
        );
        painter.line(
            Vec2::new(right, top),
            Vec2::new(right, bottom),
            Stroke {
                dash: Some([8.0, 4.0]),
                ..Stroke::solid(palette::FINISH_LINE, 3.0)
            },
        );
    }
}

fn draw_markers<P: Painter>(painter: &mut P, layout: &Layout, max_distance: f32) {
    let label_y = layout.marker_label_y();
    let (top, bottom) = layout.marker_span();

    for (meters, x) in layout.markers(max_distance) {
        painter.text(
            &format!("{}m", meters.round()),
            Vec2::new(x, label_y),
            layout.marker_font(),
            palette::MARKER_TEXT,
            TextAlign::Center,
        );
        painter.line(
            Vec2::new(x, top),
            Vec2::new(x, bottom),
            Stroke::solid(palette::MARKER_LINE, 1.0),
        );
    }
}

fn draw_object<P: Painter>(painter: &mut P, layout: &Layout, lane: usize, object: &ObjectState) {
    let y = layout.lane_center(lane);
    let center = Vec2::new(layout.x_for(object.position()), y);
    let radius = layout.body_radius();
    let color = object.character.color;

    // Trail, oldest to newest
    let samples = object.trail.samples();
    for (a, b) in samples.iter().zip(samples.iter().skip(1)) {
        let stroke_color = palette::with_alpha(color, a.opacity);
        painter.line(
            Vec2::new(layout.x_for(a.position), y),
            Vec2::new(layout.x_for(b.position), y),
            Stroke {
                round_cap: true,
                ..Stroke::solid(&stroke_color, layout.trail_width() * a.opacity)
            },
        );
    }

    if layout.show_readout() {
        draw_readout(painter, center, radius, object);
    }

    painter.glow(
        center,
        radius * 0.7,
        radius * 1.6,
        &palette::with_alpha(color, palette::GLOW_ALPHA),
    );
    painter.disc(center, radius, color);

    let inner = radius - SPRITE_INSET;
    if !painter.sprite(object.id(), center, inner) {
        painter.text(
            &object.character.initial().to_string(),
            center + Vec2::new(0.0, layout.glyph_offset()),
            layout.glyph_font(),
            palette::WHITE,
            TextAlign::Center,
        );
    }
    painter.ring(center, inner, palette::WHITE, 3.0);
}

fn draw_readout<P: Painter>(painter: &mut P, center: Vec2, radius: f32, object: &ObjectState) {
    let origin = Vec2::new(
        center.x - READOUT_SIZE.x / 2.0,
        center.y - radius - READOUT_SIZE.y - READOUT_GAP,
    );
    painter.panel(
        Rect {
            origin,
            size: READOUT_SIZE,
        },
        8.0,
        palette::PANEL_FILL,
        object.character.color,
    );

    let lines = [
        format!("v: {:.1} m/s", object.velocity()),
        format!("m: {} kg", object.params.mass),
        format!("μ: {:.2}", object.params.friction),
    ];
    for (i, line) in lines.iter().enumerate() {
        painter.text(
            line,
            origin + Vec2::new(10.0, 18.0 + 13.0 * i as f32),
            READOUT_FONT,
            palette::READOUT_TEXT,
            TextAlign::Left,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::ROSTER;
    use crate::sim::{MotionParameters, TrailSettings};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Gradient,
        Line { width: f32, dashed: bool },
        Text(String),
        Panel,
        Glow,
        Disc,
        Ring,
        Sprite(String),
    }

    /// Records calls; reports sprites as loaded only for `loaded` keys
    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        loaded: Vec<&'static str>,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t) => Some(t.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
            self.ops.iter().filter(|op| pred(op)).count()
        }
    }

    impl Painter for Recorder {
        fn clear(&mut self, _size: Vec2, _color: &str) {
            self.ops.push(Op::Clear);
        }
        fn fill_rect_gradient(&mut self, _rect: Rect, _from: &str, _to: &str) {
            self.ops.push(Op::Gradient);
        }
        fn line(&mut self, _from: Vec2, _to: Vec2, stroke: Stroke<'_>) {
            self.ops.push(Op::Line {
                width: stroke.width,
                dashed: stroke.dash.is_some(),
            });
        }
        fn text(&mut self, text: &str, _at: Vec2, _font: &str, _color: &str, _align: TextAlign) {
            self.ops.push(Op::Text(text.to_string()));
        }
        fn panel(&mut self, _rect: Rect, _corner_radius: f32, _fill: &str, _border: &str) {
            self.ops.push(Op::Panel);
        }
        fn glow(&mut self, _center: Vec2, _inner: f32, _outer: f32, _color: &str) {
            self.ops.push(Op::Glow);
        }
        fn disc(&mut self, _center: Vec2, _radius: f32, _fill: &str) {
            self.ops.push(Op::Disc);
        }
        fn ring(&mut self, _center: Vec2, _radius: f32, _color: &str, _width: f32) {
            self.ops.push(Op::Ring);
        }
        fn sprite(&mut self, key: &str, _center: Vec2, _radius: f32) -> bool {
            self.ops.push(Op::Sprite(key.to_string()));
            self.loaded.iter().any(|k| *k == key)
        }
    }

    fn race() -> Race {
        Race::new(&ROSTER, MotionParameters::default(), TrailSettings::default())
    }

    #[test]
    fn test_idle_frame() {
        let r = race();
        let mut p = Recorder::default();
        draw_frame(&mut p, &FrameView::from_race(&r), 1280.0, 720.0);

        assert_eq!(p.ops[0], Op::Clear);
        assert_eq!(p.count(|op| *op == Op::Gradient), 3);
        assert_eq!(p.count(|op| matches!(op, Op::Line { dashed: true, .. })), 3);
        assert_eq!(p.count(|op| *op == Op::Disc), 3);
        assert_eq!(p.count(|op| *op == Op::Ring), 3);
        assert_eq!(p.count(|op| *op == Op::Panel), 3);

        let texts = p.texts();
        for label in ["0m", "60m", "120m", "180m", "240m", "300m"] {
            assert!(texts.contains(&label), "missing {label}");
        }
        assert!(texts.contains(&"v: 10.0 m/s"));
        assert!(texts.contains(&"m: 5 kg"));
        assert!(texts.contains(&"μ: 0.10"));
    }

    #[test]
    fn test_fallback_letter_when_sprite_missing() {
        let r = race();
        let mut p = Recorder {
            loaded: vec!["bubbles"],
            ..Default::default()
        };
        draw_frame(&mut p, &FrameView::from_race(&r), 1280.0, 720.0);

        let letters = p.texts().iter().filter(|t| **t == "B").count();
        // Blossom and Buttercup fall back, Bubbles has its sprite
        assert_eq!(letters, 2);
        assert!(p.ops.contains(&Op::Sprite("bubbles".into())));
    }

    #[test]
    fn test_readout_hidden_on_short_canvas() {
        let r = race();
        let mut p = Recorder::default();
        draw_frame(&mut p, &FrameView::from_race(&r), 800.0, 350.0);
        assert_eq!(p.count(|op| *op == Op::Panel), 0);
        assert!(!p.texts().iter().any(|t| t.starts_with("v: ")));
    }

    #[test]
    fn test_trail_segments_drawn() {
        let mut r = race();
        r.start();
        for _ in 0..10 {
            r.tick();
        }
        let mut p = Recorder::default();
        draw_frame(&mut p, &FrameView::from_race(&r), 1280.0, 720.0);

        // 3 lane borders + 3 finish lines + 6 markers, plus 9 segments per racer
        let lines = p.count(|op| matches!(op, Op::Line { .. }));
        assert_eq!(lines, 3 + 3 + 6 + 3 * 9);
        let trail_widths: Vec<f32> = p
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Line { width, .. } if *width > 3.0 => Some(*width),
                _ => None,
            })
            .collect();
        assert!(trail_widths.iter().all(|w| *w <= 15.0));
    }
}
