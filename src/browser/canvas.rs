//! 2D canvas and text measurement over the DOM.

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement};

use super::cast;
use crate::collectors::canvas::DrawOp;
use crate::environment::{Canvas2d, TextProbe};
use crate::error::Unavailable;

pub(super) struct DomCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl DomCanvas {
    /// Use the page canvas with `preview_id` when there is one, otherwise a
    /// detached element. Resizing also resets any earlier drawing.
    pub(super) fn open(
        document: &Document,
        preview_id: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, Unavailable> {
        let element = match document.get_element_by_id(preview_id) {
            Some(el) => el,
            None => document
                .create_element("canvas")
                .map_err(|e| Unavailable::from_js("createElement(canvas)", &e))?,
        };
        let canvas: HtmlCanvasElement = cast(element, "canvas element")?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx = canvas
            .get_context("2d")
            .map_err(|e| Unavailable::from_js("getContext(2d)", &e))?
            .ok_or_else(|| Unavailable::not_supported("2d context"))?;
        let ctx = cast(ctx, "2d context")?;

        Ok(Self { canvas, ctx })
    }

    fn set_style(&self, name: &str, value: &str) -> Result<(), Unavailable> {
        Reflect::set(&self.ctx, &JsValue::from_str(name), &JsValue::from_str(value))
            .map(|_| ())
            .map_err(|e| Unavailable::from_js(name, &e))
    }
}

impl Canvas2d for DomCanvas {
    fn draw(&mut self, op: &DrawOp) -> Result<(), Unavailable> {
        let ctx = &self.ctx;
        match op {
            DrawOp::FillStyle(style) => self.set_style("fillStyle", style)?,
            DrawOp::StrokeStyle(style) => self.set_style("strokeStyle", style)?,
            DrawOp::Font(font) => ctx.set_font(font),
            DrawOp::TextBaseline(baseline) => ctx.set_text_baseline(baseline),
            DrawOp::FillRect { x, y, w, h } => ctx.fill_rect(*x, *y, *w, *h),
            DrawOp::FillText { text, x, y } => ctx
                .fill_text(text, *x, *y)
                .map_err(|e| Unavailable::from_js("fillText", &e))?,
            DrawOp::BeginPath => ctx.begin_path(),
            DrawOp::MoveTo { x, y } => ctx.move_to(*x, *y),
            DrawOp::BezierCurveTo { cp1x, cp1y, cp2x, cp2y, x, y } => {
                ctx.bezier_curve_to(*cp1x, *cp1y, *cp2x, *cp2y, *x, *y)
            }
            DrawOp::Arc { x, y, radius, start, end } => ctx
                .arc(*x, *y, *radius, *start, *end)
                .map_err(|e| Unavailable::from_js("arc", &e))?,
            DrawOp::Stroke => ctx.stroke(),
            DrawOp::Fill => ctx.fill(),
        }
        Ok(())
    }

    fn to_data_url(&self) -> Result<String, Unavailable> {
        // Tainted canvases and privacy modes throw here.
        self.canvas
            .to_data_url()
            .map_err(|e| Unavailable::denied(format!("toDataURL: {:?}", e)))
    }
}

/// Off-screen `<span>` appended to `<body>` for width measurement.
pub(super) struct SpanProbe {
    span: HtmlElement,
}

impl SpanProbe {
    pub(super) fn attach(
        document: &Document,
        sample: &str,
        font_size: &str,
    ) -> Result<Self, Unavailable> {
        let body = document
            .body()
            .ok_or_else(|| Unavailable::not_supported("document.body"))?;
        let span: HtmlElement = cast(
            document
                .create_element("span")
                .map_err(|e| Unavailable::from_js("createElement(span)", &e))?,
            "span",
        )?;

        let style = span.style();
        for (name, value) in [
            ("position", "absolute"),
            ("left", "-9999px"),
            ("font-size", font_size),
            ("line-height", "normal"),
        ] {
            style
                .set_property(name, value)
                .map_err(|e| Unavailable::from_js(name, &e))?;
        }
        span.set_text_content(Some(sample));

        body.append_child(&span)
            .map_err(|e| Unavailable::from_js("appendChild", &e))?;
        Ok(Self { span })
    }
}

impl TextProbe for SpanProbe {
    fn width_with_family(&mut self, family: &str) -> Result<f64, Unavailable> {
        self.span
            .style()
            .set_property("font-family", family)
            .map_err(|e| Unavailable::from_js("font-family", &e))?;
        Ok(f64::from(self.span.offset_width()))
    }
}

impl Drop for SpanProbe {
    fn drop(&mut self) {
        self.span.remove();
    }
}
