//! Browser painter on top of `CanvasRenderingContext2d`
//!
//! Canvas calls that return `Result` are ignored on failure: a bad call costs
//! one primitive for one frame, never the frame itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Painter, Rect, Stroke, TextAlign};
use crate::roster::Character;

/// Character images keyed by racer id, loaded once
#[derive(Clone, Default)]
pub struct SpriteCache {
    loaded: Rc<RefCell<HashMap<String, HtmlImageElement>>>,
}

impl SpriteCache {
    /// Start loading every character image
    pub fn preload(characters: &[Character]) -> Self {
        let cache = Self::default();
        for character in characters {
            if let Err(e) = cache.load(character.id, character.image) {
                log::warn!("Could not request sprite {}: {:?}", character.image, e);
            }
        }
        cache
    }

    fn load(&self, id: &'static str, src: &'static str) -> Result<(), JsValue> {
        let img = HtmlImageElement::new()?;

        let onload = {
            let loaded = self.loaded.clone();
            let img = img.clone();
            Closure::<dyn FnMut()>::new(move || {
                log::debug!("Sprite ready: {}", id);
                loaded.borrow_mut().insert(id.to_string(), img.clone());
            })
        };
        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let onerror = Closure::<dyn FnMut()>::new(move || {
            log::warn!("Sprite failed to load: {} (drawing initial instead)", src);
        });
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        img.set_src(src);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<HtmlImageElement> {
        self.loaded
            .borrow()
            .get(id)
            .filter(|img| img.complete() && img.natural_width() != 0)
            .cloned()
    }
}

/// `Painter` for an HTML canvas
pub struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sprites: SpriteCache,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement, sprites: SpriteCache) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        Ok(Self {
            canvas,
            ctx,
            sprites,
        })
    }

    /// Match the backing store to the container size; returns the size in pixels
    pub fn fit_to_parent(&self) -> (f32, f32) {
        if let Some(parent) = self.canvas.parent_element() {
            let w = parent.client_width().max(0) as u32;
            let h = parent.client_height().max(0) as u32;
            if self.canvas.width() != w || self.canvas.height() != h {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
            }
        }
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }

    fn rounded_rect_path(&self, rect: Rect, r: f32) {
        let (x, y) = (rect.origin.x as f64, rect.origin.y as f64);
        let (w, h) = (rect.size.x as f64, rect.size.y as f64);
        let r = (r as f64).min(w / 2.0).min(h / 2.0);
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + r, y);
        let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = ctx.arc_to(x, y + h, x, y, r);
        let _ = ctx.arc_to(x, y, x + w, y, r);
        ctx.close_path();
    }
}

impl Painter for CanvasPainter {
    fn clear(&mut self, size: Vec2, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_rect_gradient(&mut self, rect: Rect, from: &str, to: &str) {
        let (x, y) = (rect.origin.x as f64, rect.origin.y as f64);
        let (w, h) = (rect.size.x as f64, rect.size.y as f64);
        let gradient = self.ctx.create_linear_gradient(x, 0.0, x + w, 0.0);
        let _ = gradient.add_color_stop(0.0, from);
        let _ = gradient.add_color_stop(1.0, to);
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn line(&mut self, from: Vec2, to: Vec2, stroke: Stroke<'_>) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(stroke.color);
        ctx.set_line_width(stroke.width as f64);
        ctx.set_line_cap(if stroke.round_cap { "round" } else { "butt" });
        if let Some([dash, gap]) = stroke.dash {
            let pattern = js_sys::Array::of2(&(dash as f64).into(), &(gap as f64).into());
            let _ = ctx.set_line_dash(&pattern);
        }

        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.stroke();

        if stroke.dash.is_some() {
            let _ = ctx.set_line_dash(&js_sys::Array::new());
        }
    }

    fn text(&mut self, text: &str, at: Vec2, font: &str, color: &str, align: TextAlign) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }

    fn panel(&mut self, rect: Rect, corner_radius: f32, fill: &str, border: &str) {
        let ctx = &self.ctx;
        ctx.set_shadow_blur(15.0);
        ctx.set_shadow_color(super::palette::PANEL_SHADOW);
        ctx.set_fill_style_str(fill);
        ctx.set_stroke_style_str(border);
        ctx.set_line_width(2.0);
        self.rounded_rect_path(rect, corner_radius);
        ctx.fill();
        ctx.stroke();
        ctx.set_shadow_blur(0.0);
    }

    fn glow(&mut self, center: Vec2, inner: f32, outer: f32, color: &str) {
        let (x, y) = (center.x as f64, center.y as f64);
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(x, y, inner as f64, x, y, outer as f64)
        else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, color);
        let _ = gradient.add_color_stop(1.0, "transparent");
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(center, outer);
        self.ctx.fill();
    }

    fn disc(&mut self, center: Vec2, radius: f32, fill: &str) {
        self.ctx.set_fill_style_str(fill);
        self.circle_path(center, radius);
        self.ctx.fill();
    }

    fn ring(&mut self, center: Vec2, radius: f32, color: &str, width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width as f64);
        self.circle_path(center, radius);
        self.ctx.stroke();
    }

    fn sprite(&mut self, key: &str, center: Vec2, radius: f32) -> bool {
        let Some(img) = self.sprites.get(key) else {
            return false;
        };
        let d = (radius * 2.0) as f64;
        self.ctx.save();
        self.circle_path(center, radius);
        self.ctx.clip();
        let drawn = self
            .ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                &img,
                (center.x - radius) as f64,
                (center.y - radius) as f64,
                d,
                d,
            )
            .is_ok();
        self.ctx.restore();
        drawn
    }
}
