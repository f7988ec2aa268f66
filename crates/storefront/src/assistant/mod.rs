//! Shopping assistant backed by the Gemini `generateContent` API.
//!
//! The assistant is advisory: [`AssistantClient::ask`] always returns a
//! displayable reply, substituting a fixed apology when the model is
//! unreachable or answers with nothing.

mod client;
mod session;

pub use client::AssistantClient;
pub use session::{ChatMessage, ChatRole, ChatSession};

use thiserror::Error;

use techsphere_core::Product;

/// Instruction sent with every request.
pub const SYSTEM_INSTRUCTION: &str = "Você é o TechSphere AI. Seja extremamente conciso e técnico. \
Responda em pt-BR. Use no máximo 2 frases. \
Sempre informe se o produto está indisponível caso o estoque seja 0. \
Não use saudações longas. Vá direto ao ponto.";

/// First message of every chat session.
pub const GREETING: &str = "Olá! Sou o assistente da TechSphere. Como posso ajudar você hoje com seu novo setup tecnológico?";

/// Reply when the model produced no text.
pub const EMPTY_REPLY: &str = "Estou com dificuldades técnicas, tente novamente em instantes.";

/// Reply when the model could not be reached.
pub const UNAVAILABLE_REPLY: &str = "Erro na conexão com o assistente. Verifique sua rede.";

/// Errors calling the language model.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API answered with an error status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// API key rejected.
    #[error("API key rejected")]
    Unauthorized,

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No API key configured.
    #[error("assistant API key not configured")]
    NotConfigured,
}

/// Compact catalog summary sent as model context.
///
/// One `name: R$price [Estoque:stock]` entry per product, joined with `"; "`.
#[must_use]
pub fn product_context(products: &[Product]) -> String {
    products
        .iter()
        .map(|p| {
            format!(
                "{}: R${} [Estoque:{}]",
                p.name,
                p.price.amount().normalize(),
                p.stock
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
