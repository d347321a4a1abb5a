use serde::{Deserialize, Serialize};
use serde_json::Value;

// inbound: what the browser sends and gets back

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

// outbound: OpenAI-compatible chat completions

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub frequency_penalty: f64,
    pub presence_penalty: f64
}

// kept as raw json: any 2xx body that parses, whatever its shape, still
// yields an answer (empty when choices/message/content is missing or mistyped)
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct ChatResponse {
    body: Value
}

impl ChatResponse {

    pub fn first_answer(&self) -> String {

        self.body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()

    }

    pub fn total_tokens(&self) -> Option<u64> {

        self.body
            .pointer("/usage/total_tokens")
            .and_then(Value::as_u64)

    }

}
