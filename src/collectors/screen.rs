//! Screen geometry.

use serde::Serialize;

use crate::environment::{Environment, ScreenSnapshot};
use crate::error::Unavailable;
use crate::record::{JsNumber, Reading};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub width: Reading<JsNumber>,
    pub height: Reading<JsNumber>,
    pub avail_width: Reading<JsNumber>,
    pub avail_height: Reading<JsNumber>,
    pub color_depth: Reading<JsNumber>,
    pub pixel_ratio: JsNumber,
}

pub fn collect<E: Environment + ?Sized>(env: &E) -> ScreenInfo {
    let screen = env.screen();

    let field = |name: &str, get: fn(&ScreenSnapshot) -> Option<f64>| -> Reading<JsNumber> {
        match &screen {
            Ok(s) => match get(s) {
                Some(v) => Reading::Value(JsNumber(v)),
                None => Reading::Unavailable(Unavailable::not_supported(format!("screen.{}", name))),
            },
            Err(reason) => Reading::Unavailable(reason.clone()),
        }
    };

    let pixel_ratio = screen
        .as_ref()
        .ok()
        .and_then(|s| s.device_pixel_ratio)
        .filter(|r| *r > 0.0)
        .unwrap_or(1.0);

    ScreenInfo {
        width: field("width", |s| s.width),
        height: field("height", |s| s.height),
        avail_width: field("availWidth", |s| s.avail_width),
        avail_height: field("availHeight", |s| s.avail_height),
        color_depth: field("colorDepth", |s| s.color_depth),
        pixel_ratio: JsNumber(pixel_ratio),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::fake::FakeEnvironment;
    use serde_json::json;

    #[test]
    fn test_screen_record() {
        let env = FakeEnvironment::new();
        let json = serde_json::to_value(collect(&env)).unwrap();
        assert_eq!(
            json,
            json!({
                "width": 1920,
                "height": 1080,
                "availWidth": 1920,
                "availHeight": 1040,
                "colorDepth": 24,
                "pixelRatio": 1
            })
        );
    }

    #[test]
    fn test_pixel_ratio_defaults_to_one() {
        let mut env = FakeEnvironment::new();
        env.screen = Err(Unavailable::not_supported("screen"));
        let info = collect(&env);
        assert_eq!(info.pixel_ratio, JsNumber(1.0));
        assert!(!info.width.is_available());
    }

    #[test]
    fn test_fractional_pixel_ratio() {
        let mut env = FakeEnvironment::new();
        if let Ok(s) = env.screen.as_mut() {
            s.device_pixel_ratio = Some(1.5);
        }
        let json = serde_json::to_value(collect(&env)).unwrap();
        assert_eq!(json["pixelRatio"], json!(1.5));
    }
}
