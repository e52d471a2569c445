//! WebGL contexts on throwaway canvases.

use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlCanvasElement, WebGl2RenderingContext, WebGlRenderingContext};

use super::cast;
use crate::environment::{GlContext, WebGlVersion};
use crate::error::Unavailable;

pub(super) enum DomGl {
    V1(WebGlRenderingContext),
    V2(WebGl2RenderingContext),
}

/// A fresh canvas per call; the WebGL1 lookup also tries the legacy
/// `experimental-webgl` name.
pub(super) fn context(
    document: &Document,
    version: WebGlVersion,
) -> Result<Option<DomGl>, Unavailable> {
    let canvas: HtmlCanvasElement = cast(
        document
            .create_element("canvas")
            .map_err(|e| Unavailable::from_js("createElement(canvas)", &e))?,
        "canvas element",
    )?;

    match version {
        WebGlVersion::WebGl1 => {
            let ctx = match lookup(&canvas, "webgl")? {
                Some(ctx) => Some(ctx),
                None => lookup(&canvas, "experimental-webgl")?,
            };
            ctx.map(|c| cast(c, "webgl context").map(DomGl::V1))
                .transpose()
        }
        WebGlVersion::WebGl2 => lookup(&canvas, "webgl2")?
            .map(|c| cast(c, "webgl2 context").map(DomGl::V2))
            .transpose(),
    }
}

fn lookup(canvas: &HtmlCanvasElement, kind: &str) -> Result<Option<js_sys::Object>, Unavailable> {
    canvas
        .get_context(kind)
        .map_err(|e| Unavailable::from_js(kind, &e))
}

fn parameter_string(value: JsValue) -> Option<String> {
    if value.is_null() || value.is_undefined() {
        None
    } else {
        Some(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl GlContext for DomGl {
    fn has_extension(&self, name: &str) -> Result<bool, Unavailable> {
        let ext = match self {
            DomGl::V1(gl) => gl.get_extension(name),
            DomGl::V2(gl) => gl.get_extension(name),
        };
        ext.map(|e| e.is_some())
            .map_err(|e| Unavailable::from_js("getExtension", &e))
    }

    fn parameter(&self, pname: u32) -> Result<Option<String>, Unavailable> {
        let value = match self {
            DomGl::V1(gl) => gl.get_parameter(pname),
            DomGl::V2(gl) => gl.get_parameter(pname),
        };
        value
            .map(parameter_string)
            .map_err(|e| Unavailable::from_js("getParameter", &e))
    }
}
