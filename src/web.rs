//! Browser backend: a [`Surface`] drawing into a 2D canvas context.
//!
//! Only compiled with the `web` feature. Pixels go through `putImageData`,
//! which replaces destination pixels outright (no compositing), so a single
//! 1x1 put is an atomic cell write on both the opaque base canvas and the
//! transparent overlay canvas.
//!
//! No `#[wasm_bindgen]` exports live here; a downstream wasm crate owns the
//! canvas elements and the JS glue and hands them to [`CanvasSurface::new`].

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::error::GridError;
use crate::grid::{Cell, Rgba};
use crate::raster::Surface;

fn js_err(e: JsValue) -> GridError {
    GridError::Surface(format!("{e:?}"))
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire a 2D context on `canvas`.
    ///
    /// Pass `alpha = false` for the base layer; the overlay needs `true` so
    /// cleared pixels show the base through.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Surface`] when the browser refuses the context.
    pub fn new(canvas: HtmlCanvasElement, alpha: bool) -> Result<Self, GridError> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &JsValue::from_str("alpha"), &JsValue::from_bool(alpha)).map_err(js_err)?;

        let ctx = canvas
            .get_context_with_context_options("2d", &options)
            .map_err(js_err)?
            .ok_or_else(|| GridError::Surface("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Surface("context is not a CanvasRenderingContext2d".to_owned()))?;

        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn put_pixel(&mut self, cell: Cell, color: Rgba) -> Result<(), GridError> {
        let bytes = color.bytes();
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&bytes[..]), 1, 1).map_err(js_err)?;
        self.ctx
            .put_image_data(&image, f64::from(cell.x), f64::from(cell.y))
            .map_err(js_err)
    }

    fn put_image(&mut self, size: u32, data: &[u8]) -> Result<(), GridError> {
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(data), size, size).map_err(js_err)?;
        self.ctx.put_image_data(&image, 0.0, 0.0).map_err(js_err)
    }

    fn clear(&mut self) -> Result<(), GridError> {
        let width = f64::from(self.canvas.width());
        let height = f64::from(self.canvas.height());
        self.ctx.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }
}
