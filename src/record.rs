//! The environment record and typed signal readings.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::PLACEHOLDER;
use crate::error::{Result, Unavailable};

/// A signal value, or the reason it could not be read.
///
/// Serializes as the bare value, or as [`PLACEHOLDER`] when unavailable,
/// so the record stays flat while callers can still inspect why.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    Value(T),
    Unavailable(Unavailable),
}

impl<T> Reading<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Reading::Value(v) => Some(v),
            Reading::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&Unavailable> {
        match self {
            Reading::Value(_) => None,
            Reading::Unavailable(reason) => Some(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Reading::Value(_))
    }

    /// Keep the value if present; otherwise fall back to `default`.
    pub fn or_default_value(self, default: T) -> T {
        match self {
            Reading::Value(v) => v,
            Reading::Unavailable(_) => default,
        }
    }
}

impl<T> From<std::result::Result<T, Unavailable>> for Reading<T> {
    fn from(result: std::result::Result<T, Unavailable>) -> Self {
        match result {
            Ok(v) => Reading::Value(v),
            Err(reason) => Reading::Unavailable(reason),
        }
    }
}

impl<T: Serialize> Serialize for Reading<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Reading::Value(v) => v.serialize(serializer),
            Reading::Unavailable(_) => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

/// A platform number, serialized the way the page's JSON would print it:
/// integral values without a fractional part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsNumber(pub f64);

impl Serialize for JsNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let n = self.0;
        if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
            serializer.serialize_i64(n as i64)
        } else {
            serializer.serialize_f64(n)
        }
    }
}

/// Top-level sections of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    UserAgentInfo,
    HardwareInfo,
    ScreenInfo,
    FeatureFlags,
    WebglInfo,
    CanvasHash,
    AudioSignal,
    FontList,
    Timestamp,
}

impl Category {
    /// Assembly order of a collection pass.
    pub const ALL: [Category; 9] = [
        Category::UserAgentInfo,
        Category::HardwareInfo,
        Category::ScreenInfo,
        Category::FeatureFlags,
        Category::WebglInfo,
        Category::CanvasHash,
        Category::AudioSignal,
        Category::FontList,
        Category::Timestamp,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::UserAgentInfo => "userAgentInfo",
            Category::HardwareInfo => "hardwareInfo",
            Category::ScreenInfo => "screenInfo",
            Category::FeatureFlags => "featureFlags",
            Category::WebglInfo => "webglInfo",
            Category::CanvasHash => "canvasHash",
            Category::AudioSignal => "audioSignal",
            Category::FontList => "fontList",
            Category::Timestamp => "timestamp",
        }
    }
}

/// Ordered mapping of category key to category data.
///
/// Keeps insertion order; the canonical form sorts only the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentRecord {
    sections: Map<String, Value>,
}

impl EnvironmentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a section. Replacing keeps the original position.
    pub fn insert<T: Serialize>(&mut self, category: Category, data: &T) -> Result<()> {
        let value = serde_json::to_value(data)?;
        self.sections.insert(category.key().to_string(), value);
        Ok(())
    }

    pub fn get(&self, category: Category) -> Option<&Value> {
        self.sections.get(category.key())
    }

    /// Section keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn sections(&self) -> &Map<String, Value> {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        present: Reading<u32>,
        missing: Reading<u32>,
    }

    #[test]
    fn test_reading_serializes_placeholder() {
        let sample = Sample {
            present: Reading::Value(8),
            missing: Reading::Unavailable(Unavailable::not_supported("deviceMemory")),
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"present":8,"missing":"—"}"#);
    }

    #[test]
    fn test_reading_keeps_reason() {
        let reading: Reading<bool> = Err(Unavailable::denied("storage")).into();
        assert!(!reading.is_available());
        assert_eq!(reading.reason(), Some(&Unavailable::denied("storage")));
        assert!(!reading.or_default_value(false));
    }

    #[test]
    fn test_js_number_integral() {
        assert_eq!(serde_json::to_string(&JsNumber(1.0)).unwrap(), "1");
        assert_eq!(serde_json::to_string(&JsNumber(1.25)).unwrap(), "1.25");
        assert_eq!(serde_json::to_string(&JsNumber(-24.0)).unwrap(), "-24");
    }

    #[test]
    fn test_record_keeps_insertion_order() {
        let mut record = EnvironmentRecord::new();
        record.insert(Category::Timestamp, &"t").unwrap();
        record.insert(Category::AudioSignal, &"1.5").unwrap();
        record.insert(Category::CanvasHash, &"abc").unwrap();

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, vec!["timestamp", "audioSignal", "canvasHash"]);
        assert_eq!(record.get(Category::AudioSignal), Some(&Value::from("1.5")));
    }

    #[test]
    fn test_category_keys_unique() {
        let mut keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Category::ALL.len());
    }
}
