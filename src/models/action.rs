//! Structured outcome of classifying operator input.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").expect("static regex")
});

/// Tagged action value. `Reply` is the guaranteed fallback for free text;
/// `Unrecognized` absorbs any tag or shape this build does not understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionValue {
    Reply {
        #[serde(default)]
        message: String,
    },
    #[serde(alias = "log_event")]
    RecordEvent {
        #[serde(default)]
        event: Option<String>,
        #[serde(default)]
        note: Option<String>,
        #[serde(default)]
        extra: Option<Value>,
    },
    StartTimer {
        #[serde(default, deserialize_with = "lenient_seconds")]
        seconds: Option<i64>,
        #[serde(default)]
        label: Option<String>,
    },
    #[serde(other)]
    Unrecognized,
}

impl ActionValue {
    pub fn reply(message: impl Into<String>) -> Self {
        ActionValue::Reply {
            message: message.into(),
        }
    }

    /// Interpret raw classifier output.
    ///
    /// - JSON (bare or inside a fenced block) decodes to its variant;
    /// - a JSON object that fits no variant is `Unrecognized`;
    /// - anything else is treated as a plain reply.
    pub fn from_response(content: &str) -> Self {
        let trimmed = content.trim();

        let candidate = if trimmed.starts_with('{') {
            Some(trimmed)
        } else {
            FENCED_JSON
                .captures(trimmed)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str())
        };

        let Some(json) = candidate else {
            return Self::reply(content);
        };

        match serde_json::from_str::<Value>(json) {
            Ok(v @ Value::Object(_)) => {
                serde_json::from_value(v).unwrap_or(ActionValue::Unrecognized)
            }
            Ok(_) => ActionValue::Unrecognized,
            Err(_) => Self::reply(content),
        }
    }

    /// Wire tag, for logs.
    pub fn tag(&self) -> &'static str {
        match self {
            ActionValue::Reply { .. } => "reply",
            ActionValue::RecordEvent { .. } => "record_event",
            ActionValue::StartTimer { .. } => "start_timer",
            ActionValue::Unrecognized => "unrecognized",
        }
    }
}

/// Accept `180`, `180.0` or `"180"` for the timer duration. Huge values
/// saturate and are clamped by the timer engine; NaN and infinities count
/// as absent.
fn lenient_seconds<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(de)?;
    let secs = match v {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(round_secs)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().and_then(round_secs),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "invalid seconds value: {other}"
            )));
        }
    };
    Ok(secs)
}

fn round_secs(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_becomes_reply() {
        let a = ActionValue::from_response("Start CPR and attach the AED.");
        assert_eq!(a, ActionValue::reply("Start CPR and attach the AED."));
    }

    #[test]
    fn start_timer_json() {
        let a = ActionValue::from_response(r#"{"action":"start_timer","seconds":180,"label":"CPR"}"#);
        assert_eq!(
            a,
            ActionValue::StartTimer {
                seconds: Some(180),
                label: Some("CPR".into())
            }
        );
    }

    #[test]
    fn start_timer_without_fields() {
        let a = ActionValue::from_response(r#"{"action":"start_timer"}"#);
        assert_eq!(
            a,
            ActionValue::StartTimer {
                seconds: None,
                label: None
            }
        );
    }

    #[test]
    fn seconds_accepts_float_and_string() {
        let a = ActionValue::from_response(r#"{"action":"start_timer","seconds":"120"}"#);
        assert!(matches!(a, ActionValue::StartTimer { seconds: Some(120), .. }));
        let b = ActionValue::from_response(r#"{"action":"start_timer","seconds":90.0}"#);
        assert!(matches!(b, ActionValue::StartTimer { seconds: Some(90), .. }));
    }

    #[test]
    fn seconds_out_of_range() {
        let big = ActionValue::from_response(r#"{"action":"start_timer","seconds":1e30}"#);
        assert!(matches!(big, ActionValue::StartTimer { seconds: Some(i64::MAX), .. }));
        let text = ActionValue::from_response(r#"{"action":"start_timer","seconds":"1e30"}"#);
        assert!(matches!(text, ActionValue::StartTimer { seconds: Some(i64::MAX), .. }));
        let neg = ActionValue::from_response(r#"{"action":"start_timer","seconds":-1e30}"#);
        assert!(matches!(neg, ActionValue::StartTimer { seconds: Some(i64::MIN), .. }));
        let inf = ActionValue::from_response(r#"{"action":"start_timer","seconds":"inf"}"#);
        assert!(matches!(inf, ActionValue::StartTimer { seconds: None, .. }));
    }

    #[test]
    fn log_event_alias_and_extra() {
        let a = ActionValue::from_response(
            r#"{"action":"log_event","event":"Epinephrine 1mg IV-push","extra":{"dose":"1mg"}}"#,
        );
        assert_eq!(
            a,
            ActionValue::RecordEvent {
                event: Some("Epinephrine 1mg IV-push".into()),
                note: None,
                extra: Some(json!({"dose": "1mg"})),
            }
        );
    }

    #[test]
    fn fenced_block_is_unwrapped() {
        let raw = "Sure:\n```json\n{\"action\":\"record_event\",\"event\":\"OHCA\"}\n```";
        assert!(matches!(
            ActionValue::from_response(raw),
            ActionValue::RecordEvent { event: Some(ref e), .. } if e == "OHCA"
        ));
    }

    #[test]
    fn unknown_or_missing_tag_is_unrecognized() {
        assert_eq!(
            ActionValue::from_response(r#"{"action":"dance"}"#),
            ActionValue::Unrecognized
        );
        assert_eq!(
            ActionValue::from_response(r#"{"event":"x"}"#),
            ActionValue::Unrecognized
        );
        assert_eq!(
            ActionValue::from_response(r#"{"action":"start_timer","seconds":[1]}"#),
            ActionValue::Unrecognized
        );
    }

    #[test]
    fn broken_json_falls_back_to_reply() {
        let raw = "{not json";
        assert_eq!(ActionValue::from_response(raw), ActionValue::reply(raw));
    }
}
