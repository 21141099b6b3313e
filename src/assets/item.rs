use std::fmt;

/// Identifier of a game asset (clothing piece, weapon skin, pet, title, avatar).
///
/// Ids are kept as decimal strings. Upstream payloads mix JSON numbers and strings, so
/// construction normalizes both and treats `0` / empty as "no item".
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct ItemRef(String);

impl ItemRef {
    /// Normalize a textual id. Returns `None` for blank or zero ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim();
        if s.is_empty() || s.chars().all(|c| c == '0') {
            return None;
        }
        Some(Self(s.to_owned()))
    }

    /// Normalize a numeric id. Only non-negative integers are accepted.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => Self::parse(&integral_number(n)?.to_string()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-negative integer from a JSON number or a decimal string.
pub(crate) fn json_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => integral_number(n),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integral_number(n: &serde_json::Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    // Some payloads encode integers as floats (`203000001.0`).
    let f = n.as_f64()?;
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < 9.0e15).then_some(f as u64)
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
