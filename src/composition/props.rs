use serde_json::{Map, Value};

use crate::foundation::math::{lenient_float, lenient_int};

/// Read-only view of one configuration map with forgiving typed getters.
///
/// Values behave like a config language's strings: numbers and booleans read as their text,
/// integers are the leading integer of a string, and anything unreadable is 0 or empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct Props<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Props<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self {
            map: value.as_object(),
        }
    }

    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.and_then(|m| m.get(key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.raw(key).is_some_and(|v| !v.is_null())
    }

    /// Scalar value as text; maps, arrays and null read as `None`.
    pub fn str(&self, key: &str) -> Option<String> {
        match self.raw(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
            _ => None,
        }
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.str(key)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Leading integer; missing and garbage read as 0.
    pub fn int(&self, key: &str) -> i64 {
        self.int_or(key, 0)
    }

    /// Leading integer, or `default` when the key is missing or blank.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.raw(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(default),
            Some(Value::Bool(b)) => i64::from(*b),
            Some(Value::String(s)) if !s.trim().is_empty() => lenient_int(s),
            _ => default,
        }
    }

    pub fn float_or(&self, key: &str, default: f64) -> f64 {
        match self.raw(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
            Some(Value::String(s)) if !s.trim().is_empty() => lenient_float(s),
            _ => default,
        }
    }

    /// Truthiness: non-zero numbers, `true`, and any non-empty map.
    pub fn flag(&self, key: &str) -> bool {
        match self.raw(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Object(m)) => !m.is_empty(),
            Some(Value::Number(_) | Value::String(_)) => self.int(key) != 0,
            _ => false,
        }
    }

    /// Nested map under `"key."` or `"key"`; an empty view when neither is a map.
    pub fn child(&self, key: &str) -> Props<'a> {
        let dotted = format!("{key}.");
        let map = [dotted.as_str(), key]
            .into_iter()
            .find_map(|k| self.raw(k).and_then(Value::as_object));
        Self { map }
    }

    /// Whether a nested map exists under `key` (see [`Props::child`]).
    pub fn has_child(&self, key: &str) -> bool {
        self.child(key).map.is_some_and(|m| !m.is_empty())
    }

    /// Entries whose key is an integer, ascending. Keys ending in `.` are ignored.
    pub fn numbered(&self) -> Vec<(i64, &'a Value)> {
        let mut out: Vec<(i64, &'a Value)> = self
            .map
            .into_iter()
            .flat_map(|m| m.iter())
            .filter_map(|(k, v)| k.trim().parse::<i64>().ok().map(|n| (n, v)))
            .collect();
        out.sort_by_key(|(n, _)| *n);
        out
    }
}
