//! WebGL availability and GPU identification.

use serde::Serialize;

use crate::environment::{Environment, GlContext, WebGlVersion};
use crate::error::Unavailable;

pub const DEBUG_RENDERER_INFO: &str = "WEBGL_debug_renderer_info";

// getParameter() enums
pub const VENDOR: u32 = 0x1F00;
pub const RENDERER: u32 = 0x1F01;
pub const VERSION: u32 = 0x1F02;
pub const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
pub const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebglInfo {
    pub webgl: bool,
    pub webgl2: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

pub fn collect<E: Environment + ?Sized>(env: &E) -> WebglInfo {
    let gl = context(env, WebGlVersion::WebGl1);
    let gl2 = context(env, WebGlVersion::WebGl2);

    let mut info = WebglInfo {
        webgl: gl.is_some(),
        webgl2: gl2.is_some(),
        ..WebglInfo::default()
    };

    // Parameters come from the WebGL1 context when both exist.
    if let Some(ctx) = gl.as_deref().or(gl2.as_deref()) {
        if let Err(reason) = read_parameters(ctx, &mut info) {
            log::debug!("webgl parameters incomplete: {}", reason);
        }
    }

    info
}

fn context<E: Environment + ?Sized>(env: &E, version: WebGlVersion) -> Option<Box<dyn GlContext>> {
    match env.webgl_context(version) {
        Ok(ctx) => ctx,
        Err(reason) => {
            log::debug!("{:?} context unavailable: {}", version, reason);
            None
        }
    }
}

/// Fill vendor, renderer and version in that order. Values read before a
/// failure are kept.
fn read_parameters(ctx: &dyn GlContext, info: &mut WebglInfo) -> Result<(), Unavailable> {
    let (vendor, renderer) = if ctx.has_extension(DEBUG_RENDERER_INFO)? {
        (UNMASKED_VENDOR_WEBGL, UNMASKED_RENDERER_WEBGL)
    } else {
        (VENDOR, RENDERER)
    };

    info.vendor = ctx.parameter(vendor)?;
    info.renderer = ctx.parameter(renderer)?;
    info.version = ctx.parameter(VERSION)?;
    Ok(())
}
