//! Chat transcript.

use serde::Serialize;

use techsphere_core::Product;

use super::{AssistantClient, GREETING};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

/// A chat transcript, seeded with the assistant's greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage {
                role: ChatRole::Model,
                text: GREETING.to_string(),
            }],
        }
    }

    /// Messages in the order they were exchanged.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `input` and append the exchange.
    ///
    /// Blank input is ignored and returns `None`. Otherwise returns the reply.
    pub async fn send(
        &mut self,
        client: &AssistantClient,
        input: &str,
        products: &[Product],
    ) -> Option<&ChatMessage> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: input.to_string(),
        });
        let reply = client.ask(input, products).await;
        self.messages.push(ChatMessage {
            role: ChatRole::Model,
            text: reply,
        });
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::assistant::UNAVAILABLE_REPLY;
    use crate::config::AssistantConfig;

    fn offline_client() -> AssistantClient {
        AssistantClient::new(&AssistantConfig {
            api_key: None,
            model: "gemini-test".to_string(),
            api_base: Url::parse("http://127.0.0.1:9").expect("valid url"),
        })
    }

    #[test]
    fn test_new_session_starts_with_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, ChatRole::Model);
        assert_eq!(session.messages()[0].text, GREETING);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = ChatSession::new();
        assert!(session.send(&offline_client(), "   ", &[]).await.is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_send_appends_exchange() {
        let mut session = ChatSession::new();
        let reply = session
            .send(&offline_client(), " Tem notebook? ", &[])
            .await
            .cloned();

        assert_eq!(
            reply,
            Some(ChatMessage {
                role: ChatRole::Model,
                text: UNAVAILABLE_REPLY.to_string(),
            })
        );
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].text, "Tem notebook?");
    }
}
