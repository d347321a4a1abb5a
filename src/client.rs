use std::time::Duration;
use reqwest::Client;
use crate::error::RelayError;
use crate::models::{ChatRequest, ChatResponse};

// one POST, no retry. a non-2xx status comes back as Upstream with the raw body
pub async fn call_completion(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    timeout: Duration,
    request: &ChatRequest
) -> Result<ChatResponse, RelayError> {

    let response = client
        .post(endpoint)
        .timeout(timeout)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await?;

    let status = response.status();

    if !status.is_success() {
        // raw bytes rather than text(): the body's declared charset is ignored,
        // only bytes that aren't valid utf-8 get replaced
        let bytes = response.bytes().await?;
        let body = String::from_utf8_lossy(&bytes).into_owned();
        return Err(RelayError::Upstream { status: status.as_u16(), body });
    }

    let bytes = response.bytes().await?;
    let chat_response: ChatResponse = serde_json::from_slice(&bytes)?;

    Ok(chat_response)

}
