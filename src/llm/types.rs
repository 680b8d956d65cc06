//! Chat message and completion types
//!
//! Models the OpenAI Chat Completions shapes, but every provider field is
//! copied into these types at the client boundary so the rest of the crate
//! never touches provider-native responses.

use serde::{Deserialize, Serialize};

/// Message role in a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in the conversation sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,

    /// Optional participant name; affects token accounting when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }

    /// Attach a participant name to this message
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Compose the optional system message
///
/// Missing system text yields no message at all.
pub fn compose_system(system: Option<&str>) -> Vec<ChatMessage> {
    system.map(ChatMessage::system).into_iter().collect()
}

/// Compose few-shot example pairs as alternating user/assistant messages
pub fn compose_examples(examples: &[(String, String)]) -> Vec<ChatMessage> {
    examples
        .iter()
        .flat_map(|(user, assistant)| [ChatMessage::user(user), ChatMessage::assistant(assistant)])
        .collect()
}

/// Compose the trailing live user message
pub fn compose_user(user: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(user)]
}

/// Compose the full ordered conversation: system, examples, then the live query
///
/// Total function with no failure modes; input ordering is preserved exactly.
pub fn compose_messages(system: Option<&str>, examples: &[(String, String)], user: &str) -> Vec<ChatMessage> {
    let mut messages = compose_system(system);
    messages.extend(compose_examples(examples));
    messages.extend(compose_user(user));
    messages
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// The message inside a completion choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    pub role: Role,
    pub content: Option<String>,

    /// Present only when the provider supplied tool calls, never synthesized
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// One completion choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChoiceMessage,
    pub finish_reason: Option<String>,
}

/// Normalized completion result
///
/// Produced once per backend call, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: TokenUsage,

    /// Backend fingerprint, included only when the provider supplies it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_fingerprint: Option<String>,
}

impl ChatCompletion {
    /// Content of the top choice, if the model produced any
    pub fn top_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_messages_ordering() {
        let examples = vec![
            ("ex user 1".to_string(), "ex assistant 1".to_string()),
            ("ex user 2".to_string(), "ex assistant 2".to_string()),
        ];

        let messages = compose_messages(Some("sys"), &examples, "query");

        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::User, Role::Assistant, Role::User]
        );
        assert_eq!(messages[0].content, "sys");
        assert_eq!(messages[1].content, "ex user 1");
        assert_eq!(messages[4].content, "ex assistant 2");
        assert_eq!(messages[5].content, "query");
    }

    #[test]
    fn test_compose_without_system() {
        let messages = compose_messages(None, &[], "query");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
    }

    #[test]
    fn test_compose_round_trip() {
        // Flattening the composed conversation back recovers the inputs
        let examples = vec![("q1".to_string(), "a1".to_string())];
        let messages = compose_messages(Some("sys"), &examples, "live");

        let system: Vec<&ChatMessage> = messages.iter().filter(|m| m.role == Role::System).collect();
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].content, "sys");

        let pairs: Vec<(&str, &str)> = messages[1..messages.len() - 1]
            .chunks(2)
            .map(|pair| (pair[0].content.as_str(), pair[1].content.as_str()))
            .collect();
        assert_eq!(pairs, vec![("q1", "a1")]);

        assert_eq!(messages.last().map(|m| m.content.as_str()), Some("live"));
    }

    #[test]
    fn test_message_name_serialization() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("name").is_none());

        let msg = ChatMessage::user("hi").with_name("example_user");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["name"], "example_user");
    }

    #[test]
    fn test_top_content() {
        let completion = ChatCompletion {
            id: "cmpl-1".to_string(),
            model: "gpt-4o".to_string(),
            choices: vec![Choice {
                index: 0,
                message: ChoiceMessage {
                    role: Role::Assistant,
                    content: Some("the plan".to_string()),
                    tool_calls: None,
                },
                finish_reason: Some("stop".to_string()),
            }],
            usage: TokenUsage::default(),
            system_fingerprint: None,
        };

        assert_eq!(completion.top_content(), Some("the plan"));
    }
}
