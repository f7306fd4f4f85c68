//! Canvas surface: mounting, viewport fitting, and translating a
//! [`FramePlan`] into 2d-context calls.

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{
    window, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, ImageData,
};

use crate::color::Channel;
use crate::config::OverlayConfig;
use crate::error::MountError;
use crate::frame::{FramePlan, Viewport};

/// The overlay's owned drawing surface: a fixed-position, pointer-transparent
/// canvas stacked above the page, blended additively with its content.
pub struct Surface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Surface {
    /// Create, style and mount the overlay canvas on `body`, sized to the
    /// viewport at device-pixel resolution.
    pub fn mount(document: &Document, body: &HtmlElement) -> Result<Self, MountError> {
        let canvas = document
            .create_element("canvas")
            .map_err(|e| MountError::CanvasCreation(format!("{e:?}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MountError::CanvasCreation("not a canvas element".into()))?;

        let style = canvas.style();
        for (prop, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100vw"),
            ("height", "100vh"),
            ("pointer-events", "none"),
            ("z-index", "9999"),
            ("mix-blend-mode", "lighten"),
        ] {
            style
                .set_property(prop, value)
                .map_err(|e| MountError::CanvasCreation(format!("{e:?}")))?;
        }

        let ctx = canvas
            .get_context("2d")
            .map_err(|_| MountError::ContextUnavailable)?
            .ok_or(MountError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MountError::ContextUnavailable)?;

        let mut surface = Self {
            canvas,
            ctx,
            width: 0.0,
            height: 0.0,
        };
        surface.fit();

        body.append_child(&surface.canvas)
            .map_err(|e| MountError::CanvasCreation(format!("{e:?}")))?;
        Ok(surface)
    }

    /// Re-fit the canvas to `viewport × devicePixelRatio` and rescale the
    /// context so one drawing unit is one CSS pixel. Called at mount and on
    /// every window resize.
    pub fn fit(&mut self) {
        let Some(win) = window() else { return };
        let dpr = win.device_pixel_ratio().max(1.0);
        let w = win
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(self.width);
        let h = win
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(self.height);

        self.canvas.set_width((w * dpr) as u32);
        self.canvas.set_height((h * dpr) as u32);
        // resizing resets the context transform, so set it rather than scale
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        self.width = w;
        self.height = h;
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.height,
        }
    }

    /// Detach the canvas from the page. The surface must not be drawn to
    /// afterwards.
    pub fn detach(&self) {
        self.canvas.remove();
    }

    /// Execute one planned frame against the 2d context.
    pub fn draw(&self, plan: &FramePlan, config: &OverlayConfig) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, self.width, self.height);

        let alpha = 0.1 * config.intensity;
        for bar in &plan.bars {
            ctx.set_fill_style_str(&config.colors.glitch_r.rgba(alpha));
            ctx.fill_rect(bar.offset, bar.y, self.width, bar.height);
            ctx.set_fill_style_str(&config.colors.glitch_g.rgba(alpha));
            ctx.fill_rect(bar.offset + 2.0, bar.y, self.width, bar.height);
            ctx.set_fill_style_str(&config.colors.glitch_b.rgba(alpha));
            ctx.fill_rect(bar.offset - 2.0, bar.y, self.width, bar.height);
        }

        for patch in &plan.noise {
            let image = ImageData::new_with_u8_clamped_array_and_sh(
                Clamped(&patch.pixels),
                patch.width,
                patch.height,
            )?;
            ctx.put_image_data(&image, patch.x, patch.y)?;
        }

        self.draw_scanlines(plan.scanline_y, config)?;

        for blob in &plan.blobs {
            let gradient =
                ctx.create_radial_gradient(blob.x, blob.y, 0.0, blob.x, blob.y, blob.radius)?;
            let aberration = config.colors.aberration;
            gradient.add_color_stop(
                0.0,
                &aberration.channel_rgba(Channel::R, 0.05 * config.intensity),
            )?;
            gradient.add_color_stop(
                0.3,
                &aberration.channel_rgba(Channel::G, 0.03 * config.intensity),
            )?;
            gradient.add_color_stop(
                0.6,
                &aberration.channel_rgba(Channel::B, 0.02 * config.intensity),
            )?;
            gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)")?;
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill_rect(
                blob.x - blob.radius,
                blob.y - blob.radius,
                blob.radius * 2.0,
                blob.radius * 2.0,
            );
        }

        Ok(())
    }

    /// One moving bright band plus faint static lines every 4 px.
    fn draw_scanlines(&self, scanline_y: f64, config: &OverlayConfig) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let color = config.colors.scanline;

        let gradient = ctx.create_linear_gradient(0.0, scanline_y, 0.0, scanline_y + 100.0);
        gradient.add_color_stop(0.0, &color.rgba(0.0))?;
        gradient.add_color_stop(0.5, &color.rgba(0.1))?;
        gradient.add_color_stop(1.0, &color.rgba(0.0))?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, scanline_y, self.width, 2.0);

        ctx.set_fill_style_str(&color.rgba(0.02));
        let mut y = 0.0;
        while y < self.height {
            ctx.fill_rect(0.0, y, self.width, 1.0);
            y += 4.0;
        }
        Ok(())
    }
}
