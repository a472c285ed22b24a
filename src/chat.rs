//! Chat transcript state.

use crate::error::{Error, Result};
use crate::remote::chat::ChatReply;
use chrono::{DateTime, Local};

pub const MAX_MESSAGE_CHARS: usize = 2000;
pub const GREETING: &str = "Hello! How can I help you with your invoices today?";

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "What is the total value of the invoices?",
    "Which invoice has the highest value?",
    "Which supplier has the most invoices?",
    "How many invoices were issued this quarter?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "User",
            Sender::Bot => "Fiscal AI",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub is_error: bool,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Local::now(),
            is_error: false,
        }
    }
}

#[derive(Debug)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(Sender::Bot, GREETING)],
            awaiting_reply: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    /// Anything beyond the greeting.
    pub fn has_exchange(&self) -> bool {
        self.messages.len() > 1
    }

    /// Record a user message and mark a reply as pending. Returns the text
    /// to send.
    pub fn begin_send(&mut self, input: &str) -> Result<String> {
        if self.awaiting_reply {
            return Err(Error::InvalidInput("a message is already being sent".to_string()));
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("message is empty".to_string()));
        }
        if input.chars().count() > MAX_MESSAGE_CHARS {
            return Err(Error::InvalidInput(format!(
                "message exceeds {} characters",
                MAX_MESSAGE_CHARS
            )));
        }

        self.messages.push(ChatMessage::new(Sender::User, text));
        self.awaiting_reply = true;
        Ok(text.to_string())
    }

    pub fn receive(&mut self, reply: ChatReply) {
        let mut message = ChatMessage::new(Sender::Bot, reply.text);
        message.is_error = reply.is_error;
        self.messages.push(message);
        self.awaiting_reply = false;
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_greeting() {
        let chat = Conversation::new();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].sender, Sender::Bot);
        assert_eq!(chat.messages()[0].text, GREETING);
        assert!(!chat.has_exchange());
    }

    #[test]
    fn one_request_at_a_time() {
        let mut chat = Conversation::new();
        assert_eq!(chat.begin_send("  total?  ").unwrap(), "total?");
        assert!(chat.is_awaiting_reply());
        assert!(chat.begin_send("again").is_err());

        chat.receive(ChatReply {
            text: "R$ 10".to_string(),
            is_error: false,
        });
        assert!(!chat.is_awaiting_reply());
        assert_eq!(chat.messages().len(), 3);
        assert!(chat.begin_send("again").is_ok());
    }

    #[test]
    fn rejects_blank_and_oversized() {
        let mut chat = Conversation::new();
        assert!(chat.begin_send("   ").is_err());
        assert!(chat.begin_send(&"a".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
        assert!(chat.begin_send(&"a".repeat(MAX_MESSAGE_CHARS)).is_ok());
        assert_eq!(chat.messages().len(), 2);
    }

    #[test]
    fn error_reply_is_flagged_and_clear_resets() {
        let mut chat = Conversation::new();
        chat.begin_send("hi").unwrap();
        chat.receive(ChatReply {
            text: "failed".to_string(),
            is_error: true,
        });
        assert!(chat.messages()[2].is_error);

        chat.clear();
        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages()[0].text, GREETING);
    }
}
