use crate::config::RelayConfig;
use crate::models::{ChatRequest, Message};

// fixed generation parameters, identical for every call
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f64 = 0.0;
pub const TOP_P: f64 = 1.0;
pub const FREQUENCY_PENALTY: f64 = 0.0;
pub const PRESENCE_PENALTY: f64 = 0.6;

pub const SYSTEM_PROMPT: &str = "당신은 대한민국 복지 정책 전문 챗봇입니다.
- 정책 검색 결과만 말하세요.
- 불확실한 정보는 \"죄송합니다, 확인 중입니다.\"라고 답변하세요.
- 사용자 눈높이에 맞춰 간단명료하게 설명하세요.";

pub fn build_chat_request(config: &RelayConfig, prompt: &str) -> ChatRequest {

    let mut messages = Vec::with_capacity(2);

    if config.system_prompt_enabled {
        messages.push(Message::system(SYSTEM_PROMPT));
    }

    // the caller's prompt goes through untouched, no trimming
    messages.push(Message::user(prompt));

    ChatRequest {
        model: config.model.clone(),
        messages,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        top_p: TOP_P,
        frequency_penalty: FREQUENCY_PENALTY,
        presence_penalty: PRESENCE_PENALTY
    }

}
