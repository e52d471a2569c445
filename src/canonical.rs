//! Canonical serialization of the environment record.
//!
//! ## Determinism Guarantees
//!
//! - Top-level keys are sorted lexicographically (byte order)
//! - Nested objects keep their construction order; they are not re-sorted
//! - Output is JSON with 2-space indentation, which is also the export format
//!
//! Identical record contents always produce byte-identical output.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::record::EnvironmentRecord;

/// Serialize `record` into its canonical string.
pub fn canonicalize(record: &EnvironmentRecord) -> Result<String> {
    let mut entries: Vec<(&String, &Value)> = record.sections().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let sorted: Map<String, Value> = entries
        .into_iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(serde_json::to_string_pretty(&Value::Object(sorted))?)
}
