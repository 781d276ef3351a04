//! 2D rendering module
//!
//! The scene is drawn through the `Painter` trait. On WASM it is backed by a
//! `CanvasRenderingContext2d`; tests record the calls instead.

pub mod layout;
pub mod palette;
pub mod scene;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasPainter, SpriteCache};

pub use layout::Layout;
pub use scene::{FrameView, draw_frame};

use glam::Vec2;

/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }
}

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// Line style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f32,
    /// Dash and gap lengths
    pub dash: Option<[f32; 2]>,
    pub round_cap: bool,
}

impl<'a> Stroke<'a> {
    pub fn solid(color: &'a str, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
            round_cap: false,
        }
    }
}

/// Immediate-mode drawing surface
pub trait Painter {
    /// Fill the whole surface
    fn clear(&mut self, size: Vec2, color: &str);

    /// Fill a rectangle with a left-to-right gradient
    fn fill_rect_gradient(&mut self, rect: Rect, from: &str, to: &str);

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke<'_>);

    fn text(&mut self, text: &str, at: Vec2, font: &str, color: &str, align: TextAlign);

    /// Rounded, shadowed box with a colored border
    fn panel(&mut self, rect: Rect, corner_radius: f32, fill: &str, border: &str);

    /// Radial glow fading from `color` at `inner` to transparent at `outer`
    fn glow(&mut self, center: Vec2, inner: f32, outer: f32, color: &str);

    fn disc(&mut self, center: Vec2, radius: f32, fill: &str);

    fn ring(&mut self, center: Vec2, radius: f32, color: &str, width: f32);

    /// Draw a cached image clipped to a circle. Returns false if it is not loaded.
    fn sprite(&mut self, key: &str, center: Vec2, radius: f32) -> bool;
}
