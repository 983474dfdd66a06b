//! [`Surface`] over a `<canvas>` 2D context.

use std::f64::consts::TAU;

use glam::{UVec2, Vec2};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement};

use crate::surface::Surface;
use crate::visuals::Rgba;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` if the element is not a canvas or has no 2D context.
    pub fn from_element(element: Element) -> Option<Self> {
        let canvas = element.dyn_into::<HtmlCanvasElement>().ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, backing: UVec2, css: UVec2) {
        self.canvas.set_width(backing.x);
        self.canvas.set_height(backing.y);
        let style = self.canvas.style();
        let applied = style
            .set_property("width", &format!("{}px", css.x))
            .and_then(|_| style.set_property("height", &format!("{}px", css.y)));
        if let Err(e) = applied {
            log::warn!("failed to size backdrop canvas: {:?}", e);
        }
    }

    fn set_transform(&mut self, scale: f32) {
        let s = scale as f64;
        if let Err(e) = self.ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
            log::warn!("failed to set canvas transform: {:?}", e);
        }
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        // Only fails for a negative radius.
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }
}
