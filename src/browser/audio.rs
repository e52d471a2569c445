//! Offline audio rendering.

use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioBuffer, OfflineAudioContext, OscillatorType};

use super::{cast, window};
use crate::config::AudioGraph;
use crate::error::Unavailable;

/// Render `graph` and return channel 0.
pub(super) async fn render(graph: &AudioGraph) -> Result<Vec<f32>, Unavailable> {
    let global: JsValue = window()?.into();
    let present = Reflect::get(&global, &JsValue::from_str("OfflineAudioContext"))
        .map(|ctor| !ctor.is_undefined())
        .unwrap_or(false);
    if !present {
        return Err(Unavailable::not_supported("OfflineAudioContext"));
    }

    let ctx = OfflineAudioContext::new_with_number_of_channels_and_length_and_sample_rate(
        graph.channels,
        graph.length,
        graph.sample_rate,
    )
    .map_err(|e| Unavailable::from_js("OfflineAudioContext", &e))?;

    let oscillator = ctx
        .create_oscillator()
        .map_err(|e| Unavailable::from_js("createOscillator", &e))?;
    oscillator.set_type(OscillatorType::Triangle);
    oscillator.frequency().set_value(graph.frequency);

    let compressor = ctx
        .create_dynamics_compressor()
        .map_err(|e| Unavailable::from_js("createDynamicsCompressor", &e))?;
    compressor.threshold().set_value(graph.threshold);
    compressor.knee().set_value(graph.knee);
    compressor.ratio().set_value(graph.ratio);
    compressor.attack().set_value(graph.attack);
    compressor.release().set_value(graph.release);

    oscillator
        .connect_with_audio_node(&compressor)
        .map_err(|e| Unavailable::from_js("connect oscillator", &e))?;
    compressor
        .connect_with_audio_node(&ctx.destination())
        .map_err(|e| Unavailable::from_js("connect compressor", &e))?;
    oscillator
        .start_with_when(0.0)
        .map_err(|e| Unavailable::from_js("start", &e))?;

    let promise = ctx
        .start_rendering()
        .map_err(|e| Unavailable::from_js("startRendering", &e))?;
    let rendered = JsFuture::from(promise)
        .await
        .map_err(|e| Unavailable::from_js("startRendering rejected", &e))?;

    let buffer: AudioBuffer = cast(rendered, "rendered buffer")?;
    buffer
        .get_channel_data(0)
        .map_err(|e| Unavailable::from_js("getChannelData", &e))
}
