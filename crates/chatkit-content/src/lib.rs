//! Chat-message content model.
//!
//! A chat message carries one of a closed set of content kinds. The text
//! pipeline ([`chatkit-richtext`]) accepts the text-renderable kinds — plain
//! text, function calls, and function results — and rejects everything else
//! with [`ContentError::UnsupportedKind`].
//!
//! Each text-renderable kind has a fixed canonical rendering used as the
//! input string for markup conversion:
//!
//! - plain text is used as-is
//! - a function call renders as `name(arg: value, ...)`, followed by
//!   ` => [Result: value]` when a result is already attached
//! - a function result renders as `[Result: value]`
//!
//! [`chatkit-richtext`]: https://docs.rs/chatkit-richtext

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content carried by a single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageContent {
    /// Plain message text (may contain Markdown and inline markup).
    Text {
        /// The raw message text.
        text: String,
    },
    /// A function/tool invocation issued by a chat participant.
    FunctionCall(FunctionCall),
    /// The result of a previously issued function call.
    FunctionResult(FunctionResult),
    /// Binary media the text pipeline cannot render.
    Attachment(Attachment),
}

impl MessageContent {
    /// Plain-text content from anything stringy.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Stable name of this content kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::FunctionCall(_) => "function_call",
            Self::FunctionResult(_) => "function_result",
            Self::Attachment(_) => "attachment",
        }
    }

    /// Canonical text rendering of this content, the input string for
    /// markup conversion.
    ///
    /// Fails fast with [`ContentError::UnsupportedKind`] for kinds outside
    /// the text-renderable set — a programming error, not a data error.
    pub fn render_text(&self) -> Result<String, ContentError> {
        match self {
            Self::Text { text } => Ok(text.clone()),
            Self::FunctionCall(call) => Ok(call.render()),
            Self::FunctionResult(result) => Ok(result.render()),
            Self::Attachment(_) => Err(ContentError::UnsupportedKind { kind: self.kind() }),
        }
    }
}

/// A function/tool invocation with ordered arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Function name.
    pub name: String,
    /// Arguments in call order.
    #[serde(default)]
    pub arguments: Vec<(String, Value)>,
    /// Result value, when the call has already completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl FunctionCall {
    /// Render as `name(arg: value, ...)`, with a result marker when a
    /// result is present.
    #[must_use]
    pub fn render(&self) -> String {
        let args = self
            .arguments
            .iter()
            .map(|(name, value)| format!("{name}: {}", render_value(value)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut out = format!("{}({args})", self.name);
        if let Some(result) = &self.result {
            out.push_str(&format!(" => [Result: {}]", render_value(result)));
        }
        out
    }
}

/// The result of a completed function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResult {
    /// Identifier of the call this result answers.
    pub call_id: String,
    /// Result value; `None` renders as an empty marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FunctionResult {
    /// Render as `[Result: value]` (empty value marker when absent).
    #[must_use]
    pub fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("[Result: {}]", render_value(value)),
            None => "[Result: ]".to_owned(),
        }
    }
}

/// Media content the text pipeline cannot render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// MIME type, e.g. `image/png`.
    pub media_type: String,
    /// Location of the attachment payload.
    pub uri: String,
}

/// Content-kind errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ContentError {
    /// Content kind outside the text-renderable set.
    #[error(
        "unsupported content kind `{kind}` (supported: text, function_call, function_result)"
    )]
    UnsupportedKind {
        /// The offending kind name.
        kind: &'static str,
    },
}

/// Render a JSON value for display: strings bare, everything else as
/// compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_renders_as_is() {
        let content = MessageContent::text("Hello, **world**!");
        assert_eq!(content.render_text().unwrap(), "Hello, **world**!");
    }

    #[test]
    fn test_function_call_renders_name_and_arguments() {
        let content = MessageContent::FunctionCall(FunctionCall {
            name: "get_weather".to_owned(),
            arguments: vec![
                ("city".to_owned(), json!("Paris")),
                ("days".to_owned(), json!(3)),
            ],
            result: None,
        });
        assert_eq!(
            content.render_text().unwrap(),
            "get_weather(city: Paris, days: 3)"
        );
    }

    #[test]
    fn test_function_call_with_result_appends_marker() {
        let content = MessageContent::FunctionCall(FunctionCall {
            name: "add".to_owned(),
            arguments: vec![("a".to_owned(), json!(1)), ("b".to_owned(), json!(2))],
            result: Some(json!(3)),
        });
        assert_eq!(content.render_text().unwrap(), "add(a: 1, b: 2) => [Result: 3]");
    }

    #[test]
    fn test_function_call_without_arguments() {
        let content = MessageContent::FunctionCall(FunctionCall {
            name: "ping".to_owned(),
            arguments: Vec::new(),
            result: None,
        });
        assert_eq!(content.render_text().unwrap(), "ping()");
    }

    #[test]
    fn test_function_result_renders_value() {
        let content = MessageContent::FunctionResult(FunctionResult {
            call_id: "call-1".to_owned(),
            value: Some(json!({"ok": true})),
        });
        assert_eq!(content.render_text().unwrap(), r#"[Result: {"ok":true}]"#);
    }

    #[test]
    fn test_function_result_without_value_is_empty_marker() {
        let content = MessageContent::FunctionResult(FunctionResult {
            call_id: "call-2".to_owned(),
            value: None,
        });
        assert_eq!(content.render_text().unwrap(), "[Result: ]");
    }

    #[test]
    fn test_attachment_is_unsupported() {
        let content = MessageContent::Attachment(Attachment {
            media_type: "image/png".to_owned(),
            uri: "attachment://1".to_owned(),
        });
        let err = content.render_text().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported content kind `attachment` (supported: text, function_call, function_result)"
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MessageContent::text("x").kind(), "text");
        assert_eq!(
            MessageContent::FunctionResult(FunctionResult {
                call_id: String::new(),
                value: None,
            })
            .kind(),
            "function_result"
        );
    }
}
