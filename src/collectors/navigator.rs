//! User-agent, locale and hardware signals from the navigator.

use serde::Serialize;

use crate::environment::{Environment, NavigatorSnapshot};
use crate::error::Unavailable;
use crate::record::{JsNumber, Reading};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAgentInfo {
    pub user_agent: Reading<String>,
    pub platform: Reading<String>,
    pub product: Reading<String>,
    pub vendor: Reading<String>,
    pub language: Reading<String>,
    pub languages: Reading<Vec<String>>,
    pub timezone: Reading<String>,
    pub cookie_enabled: Reading<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareInfo {
    pub cores: Reading<u32>,
    pub device_memory: Reading<JsNumber>,
    pub touch_points: u32,
    pub online: Reading<bool>,
    pub do_not_track: Reading<String>,
}

pub fn collect_user_agent<E: Environment + ?Sized>(env: &E) -> UserAgentInfo {
    let nav = env.navigator();

    let timezone = match env.timezone() {
        Ok(tz) if !tz.is_empty() => Reading::Value(tz),
        Ok(_) => Reading::Unavailable(Unavailable::not_supported("timeZone")),
        Err(reason) => Reading::Unavailable(reason),
    };

    UserAgentInfo {
        user_agent: read(&nav, "userAgent", |n| n.user_agent.clone()),
        platform: read(&nav, "platform", |n| n.platform.clone()),
        product: read(&nav, "product", |n| n.product.clone()),
        vendor: read(&nav, "vendor", |n| non_empty(&n.vendor)),
        language: read(&nav, "language", |n| n.language.clone()),
        languages: read(&nav, "languages", |n| n.languages.clone()),
        timezone,
        cookie_enabled: read(&nav, "cookieEnabled", |n| n.cookie_enabled),
    }
}

pub fn collect_hardware<E: Environment + ?Sized>(env: &E) -> HardwareInfo {
    let nav = env.navigator();

    HardwareInfo {
        cores: read(&nav, "hardwareConcurrency", |n| {
            positive(n.hardware_concurrency).map(|c| c as u32)
        }),
        device_memory: read(&nav, "deviceMemory", |n| positive(n.device_memory).map(JsNumber)),
        touch_points: read(&nav, "maxTouchPoints", |n| {
            positive(n.max_touch_points).map(|t| t as u32)
        })
        .or_default_value(0),
        online: read(&nav, "onLine", |n| n.on_line),
        do_not_track: read(&nav, "doNotTrack", |n| non_empty(&n.do_not_track)),
    }
}

/// Project one property out of the snapshot; absence is "not supported".
fn read<T>(
    nav: &Result<NavigatorSnapshot, Unavailable>,
    property: &str,
    get: impl FnOnce(&NavigatorSnapshot) -> Option<T>,
) -> Reading<T> {
    match nav {
        Ok(snapshot) => match get(snapshot) {
            Some(value) => Reading::Value(value),
            None => {
                log::debug!("navigator.{} unavailable", property);
                Reading::Unavailable(Unavailable::not_supported(format!("navigator.{}", property)))
            }
        },
        Err(reason) => Reading::Unavailable(reason.clone()),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.is_empty()).cloned()
}

// Zero and NaN count as missing, like the page's `||` fallbacks.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
