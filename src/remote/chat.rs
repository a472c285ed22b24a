//! Chat webhook client.

use super::fetch_json;
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub const NO_OUTPUT_REPLY: &str = "Sorry, I couldn't process your message.";
pub const FAILURE_REPLY: &str = "Sorry, an error occurred while processing your message.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    action: &'static str,
    session_id: &'a str,
    chat_input: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChatResponse {
    output: Option<String>,
}

/// A bot reply and whether it stands in for a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub is_error: bool,
}

#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
    session_id: String,
}

impl ChatClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            session_id: session_id.into(),
        }
    }

    /// The raw `output` field, `None` when the webhook left it out.
    pub async fn try_send(&self, message: &str) -> Result<Option<String>> {
        let request = self.http.post(&self.url).json(&ChatRequest {
            action: "sendMessage",
            session_id: &self.session_id,
            chat_input: message,
        });
        let response: ChatResponse = fetch_json(request).await?;
        Ok(response.output)
    }

    pub async fn send(&self, message: &str) -> ChatReply {
        match self
            .try_send(message)
            .await
            .map(|output| output.filter(|text| !text.is_empty()))
        {
            Ok(Some(text)) => ChatReply {
                text,
                is_error: false,
            },
            Ok(None) => ChatReply {
                text: NO_OUTPUT_REPLY.to_string(),
                is_error: false,
            },
            Err(e) => {
                tracing::warn!("Error sending chat message: {}", e);
                ChatReply {
                    text: FAILURE_REPLY.to_string(),
                    is_error: true,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve_once, UNREACHABLE_URL};

    #[tokio::test]
    async fn sends_session_and_input() {
        let (base, server) = serve_once(200, r#"{"output":"Total: R$ 10,00"}"#).await;
        let reply = ChatClient::new(reqwest::Client::new(), base, "s-1")
            .send("What is the total?")
            .await;
        assert_eq!(reply.text, "Total: R$ 10,00");
        assert!(!reply.is_error);

        let request = server.await.unwrap();
        assert!(request.contains(
            r#"{"action":"sendMessage","sessionId":"s-1","chatInput":"What is the total?"}"#
        ));
    }

    #[tokio::test]
    async fn missing_output_gets_placeholder() {
        let (base, _server) = serve_once(200, "{}").await;
        let reply = ChatClient::new(reqwest::Client::new(), base, "s").send("hi").await;
        assert_eq!(reply.text, NO_OUTPUT_REPLY);
        assert!(!reply.is_error);
    }

    #[tokio::test]
    async fn empty_output_gets_placeholder() {
        let (base, _server) = serve_once(200, r#"{"output":""}"#).await;
        let reply = ChatClient::new(reqwest::Client::new(), base, "s").send("hi").await;
        assert_eq!(reply.text, NO_OUTPUT_REPLY);
        assert!(!reply.is_error);
    }

    #[tokio::test]
    async fn failure_is_flagged() {
        let reply = ChatClient::new(reqwest::Client::new(), UNREACHABLE_URL, "s")
            .send("hi")
            .await;
        assert_eq!(reply.text, FAILURE_REPLY);
        assert!(reply.is_error);

        let (base, _server) = serve_once(500, "").await;
        let reply = ChatClient::new(reqwest::Client::new(), base, "s").send("hi").await;
        assert!(reply.is_error);
    }
}
