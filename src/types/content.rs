use serde::{Deserialize, Serialize};

/// The author of a [`Content`] entry on the wire.
///
/// Gemini calls prior assistant turns `model`; there is no `assistant` role.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// Text written by the person chatting.
    User,

    /// Text previously generated by the model.
    Model,
}

/// One piece of a content entry.  Only text parts are produced by this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// The text of this part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Set on parts that carry model reasoning rather than answer text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
        }
    }
}

/// A role-tagged list of parts: one turn of a conversation on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Who produced this turn.  Absent on some response candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,

    /// The parts of this turn.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a content entry holding a single text part.
    pub fn new(role: ContentRole, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            parts: vec![Part::text(text)],
        }
    }

    /// Create a user content entry.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ContentRole::User, text)
    }

    /// Create a model content entry.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ContentRole::Model, text)
    }

    /// Concatenated answer text of all non-thought parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn model_role_serializes_as_model() {
        let content = Content::model("Hello!");
        assert_eq!(
            to_value(&content).unwrap(),
            json!({
                "role": "model",
                "parts": [{"text": "Hello!"}]
            })
        );
    }

    #[test]
    fn text_skips_thought_parts() {
        let content: Content = serde_json::from_value(json!({
            "role": "model",
            "parts": [
                {"text": "thinking...", "thought": true},
                {"text": "Hel"},
                {"text": "lo"}
            ]
        }))
        .unwrap();
        assert_eq!(content.text(), "Hello");
    }

    #[test]
    fn missing_role_and_parts_deserialize() {
        let content: Content = serde_json::from_value(json!({})).unwrap();
        assert!(content.role.is_none());
        assert!(content.parts.is_empty());
        assert_eq!(content.text(), "");
    }
}
