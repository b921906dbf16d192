//! Canvas 2D backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Align, Color, Surface};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};

const FONT_FAMILY: &str = "'Segoe UI', Arial, sans-serif";

/// Draws onto a `<canvas>`, scaled so game units map to CSS pixels
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Size the backing store for the device pixel ratio and grab a 2D context
    pub fn new(canvas: &HtmlCanvasElement, dpr: f64) -> Option<Self> {
        canvas.set_width((CANVAS_WIDTH as f64 * dpr) as u32);
        canvas.set_height((CANVAS_HEIGHT as f64 * dpr) as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()??
            .dyn_into()
            .ok()?;
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok()?;
        Some(Self { ctx })
    }

    fn set_fill(&self, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Color) {
        self.set_fill(color);
        self.ctx
            .fill_rect(0.0, 0.0, CANVAS_WIDTH as f64, CANVAS_HEIGHT as f64);
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.set_fill(color);
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            0.0,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, radius: f32, color: Color) {
        self.set_fill(color);
        let (x, y) = (pos.x as f64, pos.y as f64);
        let (w, h) = (size.x as f64, size.y as f64);
        let r = (radius as f64).min(w / 2.0).min(h / 2.0).max(0.0);

        // Rounded rect from four corner arcs
        self.ctx.begin_path();
        self.ctx.move_to(x + r, y);
        let _ = self.ctx.arc_to(x + w, y, x + w, y + h, r);
        let _ = self.ctx.arc_to(x + w, y + h, x, y + h, r);
        let _ = self.ctx.arc_to(x, y + h, x, y, r);
        let _ = self.ctx.arc_to(x, y, x + w, y, r);
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        self.set_fill(color);
        self.ctx.begin_path();
        self.ctx.move_to(a.x as f64, a.y as f64);
        self.ctx.line_to(b.x as f64, b.y as f64);
        self.ctx.line_to(c.x as f64, c.y as f64);
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: Align, color: Color) {
        self.set_fill(color);
        self.ctx.set_font(&format!("{}px {}", size, FONT_FAMILY));
        self.ctx.set_text_align(match align {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        });
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}
