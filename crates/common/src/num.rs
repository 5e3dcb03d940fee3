use serde::{Serialize, Serializer};
use std::fmt;

/// Largest integer a JavaScript number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A JSON number that prints like the engine's tooling prints numbers.
///
/// Integral values serialize without a fractional part (`3`, not `3.0`);
/// everything else uses the shortest round-trip form. `Display` produces
/// the same text, so keys built from a number agree with its JSON value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Num(pub f64);

impl Num {
    fn as_integer(self) -> Option<i64> {
        let v = self.0;
        (v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER).then_some(v as i64)
    }
}

impl Serialize for Num {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(i) => serializer.serialize_i64(i),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<f64> for Num {
    fn from(v: f64) -> Self {
        Self(v)
    }
}

impl From<usize> for Num {
    fn from(v: usize) -> Self {
        Self(v as f64)
    }
}

impl From<i64> for Num {
    fn from(v: i64) -> Self {
        Self(v as f64)
    }
}
