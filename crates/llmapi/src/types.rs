use crate::utils;
use anyhow::Result;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub enum LLMMessageType {
    TEXT(String),
    IMAGE { data_b64: String, mime_type: String },
}
impl LLMMessageType {
    pub fn text(text: impl Into<String>) -> Self {
        LLMMessageType::TEXT(text.into())
    }
    pub fn image_b64(data_b64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        LLMMessageType::IMAGE {
            data_b64: data_b64.into(),
            mime_type: mime_type.into(),
        }
    }
    pub fn data_url(&self) -> Option<String> {
        match self {
            LLMMessageType::IMAGE {
                data_b64,
                mime_type,
            } => Some(format!("data:{mime_type};base64,{data_b64}")),
            LLMMessageType::TEXT(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LLMUserType {
    Human,
    AI,
    System,
}
impl LLMUserType {
    pub fn from_str(role_str: &str) -> Option<Self> {
        match role_str.trim().to_lowercase().as_str() {
            "user" | "human" => Some(LLMUserType::Human),
            "model" | "ai" | "assistant" => Some(LLMUserType::AI),
            "system" | "developer" => Some(LLMUserType::System),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct LLMMessage {
    pub id: String,
    pub role: LLMUserType,
    pub content: Vec<LLMMessageType>,
    pub created_at: i64,
}

impl LLMMessage {
    pub fn new(id: Option<String>, role: &str, content: Vec<LLMMessageType>) -> Self {
        let id = id.unwrap_or_else(|| utils::current_timestamp_millis().to_string());
        Self {
            id,
            role: LLMUserType::from_str(role).unwrap_or(LLMUserType::Human),
            content,
            created_at: utils::current_timestamp_millis() as i64,
        }
    }

    /// Concatenation of every text part, in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|part| match part {
                LLMMessageType::TEXT(text) => Some(text.as_str()),
                LLMMessageType::IMAGE { .. } => None,
            })
            .collect()
    }
}

#[derive(Clone)]
pub struct LLMClient {
    pub(crate) api_key: String,
    pub(crate) endpoint: String,
    pub(crate) default_model: String,
}

impl LLMClient {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            default_model: default_model.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

pub type ChatFuture = Pin<Box<dyn Future<Output = Result<LLMMessage>> + Send + 'static>>;

pub type ChatFn = Arc<dyn Fn(Vec<LLMMessage>) -> ChatFuture + Send + Sync>;

/// Wraps an async closure into a shareable [`ChatFn`].
pub fn chat_fn<F, Fut>(f: F) -> ChatFn
where
    F: Fn(Vec<LLMMessage>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<LLMMessage>> + Send + 'static,
{
    Arc::new(move |messages: Vec<LLMMessage>| -> ChatFuture { Box::pin(f(messages)) })
}
