//! Reply payloads returned to the transport layer.

use serde::{Deserialize, Serialize};

/// A suggested quick-reply. `value` is sent back verbatim as the next turn
/// when the user taps the button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub value: String,
}

impl Button {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One turn's reply: response text (may embed simple inline markup) and an
/// optional ordered list of quick-replies. A missing `buttons` field means
/// "no quick replies".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
}

impl Reply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            buttons: None,
        }
    }

    pub fn with_buttons(response: impl Into<String>, buttons: Vec<Button>) -> Self {
        Self {
            response: response.into(),
            buttons: Some(buttons),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_are_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&Reply::text("hello")).unwrap();
        assert_eq!(json, r#"{"response":"hello"}"#);
    }

    #[test]
    fn test_buttons_serialize_in_order() {
        let reply = Reply::with_buttons(
            "pick one",
            vec![Button::new("A", "a"), Button::new("B", "b")],
        );
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains(r#""buttons":[{"label":"A","value":"a"},{"label":"B","value":"b"}]"#));
    }
}
