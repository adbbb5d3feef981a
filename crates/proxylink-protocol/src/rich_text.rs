//! Formatted chat text, carried as one JSON field.
//!
//! The shape follows the chat-component JSON the proxy and game servers
//! already understand: a `text` leaf with optional styling and nested
//! `extra` children. Unset attributes are omitted so they inherit from
//! the parent on the receiving side.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// What happens when a player clicks a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    OpenUrl,
    RunCommand,
    SuggestCommand,
    CopyToClipboard,
}

/// A click handler attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value: String,
}

/// A formatted-text component.
///
/// ```rust
/// use proxylink_protocol::RichText;
///
/// let text = RichText::plain("Server restarting in ")
///     .color("red")
///     .append(RichText::plain("5s").bold());
///
/// assert_eq!(text.to_plain(), "Server restarting in 5s");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichText {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_event: Option<ClickEvent>,
    /// Plain text shown on hover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<RichText>,
}

impl RichText {
    /// An unstyled component.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underlined = Some(true);
        self
    }

    pub fn on_click(mut self, action: ClickAction, value: impl Into<String>) -> Self {
        self.click_event = Some(ClickEvent {
            action,
            value: value.into(),
        });
        self
    }

    pub fn hover(mut self, text: impl Into<String>) -> Self {
        self.hover_text = Some(text.into());
        self
    }

    /// Appends a child component.
    pub fn append(mut self, child: RichText) -> Self {
        self.extra.push(child);
        self
    }

    /// Flattens the component tree into its unstyled text.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out);
        out
    }

    fn push_plain(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.extra {
            child.push_plain(out);
        }
    }

    /// Serializes the component to its JSON text form.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses a component from its JSON text form.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Json`] if the text isn't a component.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_json_plain_omits_unset_attributes() {
        let json = RichText::plain("hi").to_json().unwrap();
        assert_eq!(json, r#"{"text":"hi"}"#);
    }

    #[test]
    fn test_to_json_uses_camel_case_keys() {
        let text = RichText::plain("vote")
            .on_click(ClickAction::RunCommand, "/vote")
            .hover("Click to vote");
        let json: serde_json::Value =
            serde_json::from_str(&text.to_json().unwrap()).unwrap();

        assert_eq!(json["clickEvent"]["action"], "run_command");
        assert_eq!(json["clickEvent"]["value"], "/vote");
        assert_eq!(json["hoverText"], "Click to vote");
    }

    #[test]
    fn test_from_json_nested_extra() {
        let text = RichText::from_json(
            r#"{"text":"a","color":"gold","extra":[{"text":"b","bold":true}]}"#,
        )
        .unwrap();

        assert_eq!(text.color.as_deref(), Some("gold"));
        assert_eq!(text.extra.len(), 1);
        assert_eq!(text.extra[0].bold, Some(true));
        assert_eq!(text.to_plain(), "ab");
    }

    #[test]
    fn test_from_json_garbage_returns_error() {
        assert!(RichText::from_json("not json").is_err());
    }
}
