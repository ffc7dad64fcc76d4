use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownLabel {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub message: String,
}

/// JSON body returned by the calculation service when it rejects a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceErrorBody {
    #[serde(default, alias = "validationMessages")]
    pub messages: Vec<ServiceMessage>,
}

impl ServiceErrorBody {
    /// Parses the body, falling back to a single message holding the raw text.
    pub fn from_body(raw: &str) -> Self {
        match serde_json::from_str::<ServiceErrorBody>(raw) {
            Ok(body) if !body.messages.is_empty() => body,
            _ => Self {
                messages: vec![ServiceMessage {
                    kind: None,
                    message: raw.trim().to_string(),
                }],
            },
        }
    }

    pub fn summary(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.message.as_str())
            .filter(|m| !m.is_empty())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
