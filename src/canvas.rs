use glam::Vec2;
use linkfx_core::{BlendMode, Color, LineCap, Surface, SurfaceError, SurfaceResult};
use wasm_bindgen::JsValue;
use web_sys as web;

/// [`Surface`] over the host's 2D context for the duration of one link draw.
pub struct CanvasSurface<'a> {
    ctx: &'a web::CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a web::CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

fn js_err(e: JsValue) -> SurfaceError {
    SurfaceError::Canvas(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

impl Surface for CanvasSurface<'_> {
    fn save(&mut self) {
        self.ctx.save();
    }
    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x as f64, p.y as f64);
    }
    fn line_to(&mut self, p: Vec2) {
        self.ctx.line_to(p.x as f64, p.y as f64);
    }
    fn quadratic_curve_to(&mut self, ctrl: Vec2, p: Vec2) {
        self.ctx
            .quadratic_curve_to(ctrl.x as f64, ctrl.y as f64, p.x as f64, p.y as f64);
    }
    fn bezier_curve_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        self.ctx.bezier_curve_to(
            c1.x as f64,
            c1.y as f64,
            c2.x as f64,
            c2.y as f64,
            p.x as f64,
            p.y as f64,
        );
    }
    fn arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32) -> SurfaceResult<()> {
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                start as f64,
                end as f64,
            )
            .map_err(js_err)
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
    }
    fn set_fill_color(&mut self, color: &Color) {
        self.ctx.set_fill_style_str(&color.to_css());
    }
    fn set_stroke_gradient(
        &mut self,
        from: Vec2,
        to: Vec2,
        stops: &[(f32, Color)],
    ) -> SurfaceResult<()> {
        let gradient =
            self.ctx
                .create_linear_gradient(from.x as f64, from.y as f64, to.x as f64, to.y as f64);
        for (offset, color) in stops {
            gradient
                .add_color_stop(offset.clamp(0.0, 1.0), &color.to_css())
                .map_err(js_err)?;
        }
        self.ctx.set_stroke_style_canvas_gradient(&gradient);
        Ok(())
    }
    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }
    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_css());
    }
    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }
    fn set_blend_mode(&mut self, mode: BlendMode) -> SurfaceResult<()> {
        self.ctx
            .set_global_composite_operation(mode.as_css())
            .map_err(js_err)
    }
    fn set_line_dash(&mut self, segments: &[f32]) -> SurfaceResult<()> {
        let dash: js_sys::Array = segments
            .iter()
            .map(|v| JsValue::from_f64(*v as f64))
            .collect();
        self.ctx.set_line_dash(&dash).map_err(js_err)
    }
    fn set_line_dash_offset(&mut self, offset: f32) {
        self.ctx.set_line_dash_offset(offset as f64);
    }
    fn set_shadow(&mut self, blur: f32, color: &Color) {
        self.ctx.set_shadow_blur(blur.max(0.0) as f64);
        self.ctx.set_shadow_color(&color.to_css());
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }
    fn fill_text(&mut self, text: &str, at: Vec2) -> SurfaceResult<()> {
        self.ctx
            .fill_text(text, at.x as f64, at.y as f64)
            .map_err(js_err)
    }
}
