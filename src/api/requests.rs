//! API request structures

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::state::Intent;

/// Body of POST /timers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTimerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hours: TimeField,
    #[serde(default)]
    pub minutes: TimeField,
    #[serde(default)]
    pub seconds: TimeField,
}

impl CreateTimerRequest {
    pub fn into_intent(self) -> Intent {
        Intent::CreateTimer {
            name: self.name,
            hours: self.hours.0,
            minutes: self.minutes.0,
            seconds: self.seconds.0,
        }
    }
}

/// A time field as typed into a form: numbers or text, parsed leniently.
///
/// Anything without a leading integer reads as 0. Sign is kept; the core
/// clamps negatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeField(pub i64);

impl<'de> Deserialize<'de> for TimeField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(TimeField(parse_time_value(&value)))
    }
}

fn parse_time_value(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_leading_int(s),
        _ => 0,
    }
}

/// Leading optional sign and digits of `s`, ignoring the rest
pub fn parse_leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return 0;
    }

    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_integers() {
        assert_eq!(parse_leading_int("42"), 42);
        assert_eq!(parse_leading_int("  7 "), 7);
        assert_eq!(parse_leading_int("12abc"), 12);
        assert_eq!(parse_leading_int("1.9"), 1);
        assert_eq!(parse_leading_int("-3"), -3);
        assert_eq!(parse_leading_int("+5"), 5);
        assert_eq!(parse_leading_int(""), 0);
        assert_eq!(parse_leading_int("abc"), 0);
        assert_eq!(parse_leading_int("-"), 0);
        assert_eq!(parse_leading_int("99999999999999999999999"), i64::MAX);
    }

    #[test]
    fn create_request_accepts_numbers_and_text() {
        let request: CreateTimerRequest = serde_json::from_str(
            r#"{"name": "Tea", "hours": "", "minutes": "1", "seconds": 30.7}"#,
        )
        .unwrap();

        assert_eq!(
            request.into_intent(),
            Intent::CreateTimer {
                name: "Tea".to_string(),
                hours: 0,
                minutes: 1,
                seconds: 30,
            }
        );
    }

    #[test]
    fn missing_and_odd_fields_read_as_zero() {
        let request: CreateTimerRequest =
            serde_json::from_str(r#"{"hours": null, "minutes": true}"#).unwrap();
        assert_eq!(request.name, "");
        assert_eq!(request.hours, TimeField(0));
        assert_eq!(request.minutes, TimeField(0));
        assert_eq!(request.seconds, TimeField(0));
    }
}
