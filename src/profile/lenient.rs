//! Lenient numeric fields.
//!
//! Profile documents come from older tooling that sometimes wrote strings,
//! `null` or `NaN` into numeric slots. Those values load as `None` so the
//! reward code can reset them to a known default instead of doing
//! arithmetic on garbage.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

// Bounds of the `f64` range that converts to `i64` without clamping.
const I64_MIN: f64 = i64::MIN as f64;
const I64_MAX: f64 = i64::MAX as f64;

pub fn int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse))
}

fn parse(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= I64_MIN && *f < I64_MAX)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
