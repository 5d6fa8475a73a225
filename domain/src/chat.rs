use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::selection::Selection;

/// Shown as the assistant's turn when a chat request fails.
pub const CHAT_APOLOGY: &str = "申し訳ございません。エラーが発生しました。もう一度お試しください。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Wire form of a prior chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only conversation for one visit to the chat step.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Starts with the concierge greeting addressed to `selection`.
    pub fn new(selection: &Selection) -> Self {
        let names = selection.names("・");
        let greeting = if selection.age_disclosed() {
            format!(
                "こんにちは！{}歳のあなたの美肌コンシェルジュです。{}についてのお悩みですね。どのようなことでもお気軽にご相談ください。",
                selection.age(),
                names
            )
        } else {
            format!(
                "こんにちは！あなたの美肌コンシェルジュです。{}についてのお悩みですね。どのようなことでもお気軽にご相談ください。",
                names
            )
        };
        Self {
            messages: vec![ChatMessage::new(Role::Assistant, greeting)],
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(Role::User, text)
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) -> &ChatMessage {
        self.push(Role::Assistant, text)
    }

    fn push(&mut self, role: Role, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, text));
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Turns to send as `history`, i.e. everything said so far.
    pub fn history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .map(|m| ChatTurn {
                role: m.role,
                content: m.text.clone(),
            })
            .collect()
    }
}
