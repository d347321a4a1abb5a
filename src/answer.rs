use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use crate::client::call_completion;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::prompt::build_chat_request;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub text: String,
    // original legal wording behind the simplified text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyCard>,
    #[serde(skip)]
    pub tokens_used: Option<u64>,
}

// where a policy can be read in full and applied for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyCard {
    pub title: String,
    pub description: String,
    pub url: String,
}

#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn answer(&self, prompt: &str) -> Result<Answer, RelayError>;

    // recorded in the request ledger
    fn model(&self) -> &str;
}

pub struct PromptRelay {
    http_client: Client,
    config: Arc<RelayConfig>,
}

impl PromptRelay {

    pub fn new(http_client: Client, config: Arc<RelayConfig>) -> Self {

        PromptRelay { http_client, config }

    }

}

#[async_trait]
impl AnswerService for PromptRelay {

    async fn answer(&self, prompt: &str) -> Result<Answer, RelayError> {

        let request = build_chat_request(&self.config, prompt);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let response = call_completion(
            &self.http_client,
            &self.config.completions_url(),
            api_key,
            self.config.upstream_timeout,
            &request
        )
        .await?;

        Ok(Answer {
            text: response.first_answer(),
            source_text: None,
            category: None,
            policy: None,
            tokens_used: response.total_tokens(),
        })

    }

    fn model(&self) -> &str {

        &self.config.model

    }

}

struct SampleEntry {
    text: &'static str,
    source_text: &'static str,
    category: &'static str,
    policy_title: &'static str,
    policy_description: &'static str,
    policy_url: &'static str,
}

static SAMPLE_ENTRIES: [SampleEntry; 3] = [
    SampleEntry {
        text: "장애인 연금은 경제적으로 어려움을 겪는 장애인의 생활 안정을 돕기 위한 제도입니다. 소득과 재산 기준을 충족하는 경우 매월 일정 금액을 지원받을 수 있어요.",
        source_text: "장애인연금법에 따라, 장애로 인하여 생활이 어려운 중증장애인의 생활안정 지원을 목적으로 하며, 근로능력의 상실 또는 현저한 감소로 인하여 줄어든 소득을 보전하기 위하여 매월 일정액의 연금을 지급하는 사회보장제도이다.",
        category: "연금",
        policy_title: "장애인 연금 지원",
        policy_description: "장애인에게 매달 일정 금액을 지원하여 생활 안정에 도움을 줍니다.",
        policy_url: "https://www.bokjiro.go.kr/disability-pension",
    },
    SampleEntry {
        text: "장애인 고용 지원은 장애인이 직업을 갖고 사회의 일원으로 참여할 수 있도록 돕습니다. 직업 훈련, 취업 알선, 그리고 사업주에게는 고용 장려금 등을 지원해요.",
        source_text: "장애인고용촉진 및 직업재활법에 의거하여, 국가는 장애인의 고용촉진 및 직업재활을 위하여 필요한 지원시책을 종합적으로 추진해야 한다. 주요 사업으로는 직업능력개발훈련, 취업알선, 고용장려금 지급 등이 있다.",
        category: "고용",
        policy_title: "장애인 고용 지원",
        policy_description: "직업 훈련 및 고용 알선, 인센티브 제공으로 일자리 찾기를 지원합니다.",
        policy_url: "https://www.bokjiro.go.kr/disability-employment",
    },
    SampleEntry {
        text: "장애인 복지 서비스에는 다양한 지원이 포함됩니다. 예를 들어, 활동 지원 서비스를 통해 일상생활이나 사회활동에 도움을 받을 수 있고, 의료비 지원이나 보조기기 지원 등도 받을 수 있어요.",
        source_text: "장애인복지법은 장애인의 인간다운 삶과 권리보장을 위한 국가와 지방자치단체 등의 책임을 명백히 하고, 장애발생 예방과 장애인의 의료·교육·직업재활·생활환경개선 등에 관한 사업을 정하여 장애인복지대책을 종합적으로 추진함을 목적으로 한다. 활동지원급여, 의료비 지원, 보조기기 교부 등이 이에 해당된다.",
        category: "복지",
        policy_title: "장애인 복지 서비스",
        policy_description: "의료·상담·재활 서비스 등을 제공하여 삶의 질을 향상시킵니다.",
        policy_url: "https://www.bokjiro.go.kr/disability-services",
    },
];

// offline backend: canned welfare answers after a fixed delay
pub struct SampleAnswers {
    delay: Duration,
    next: AtomicUsize,
}

impl SampleAnswers {

    pub fn new(delay: Duration) -> Self {

        SampleAnswers { delay, next: AtomicUsize::new(0) }

    }

}

#[async_trait]
impl AnswerService for SampleAnswers {

    async fn answer(&self, _prompt: &str) -> Result<Answer, RelayError> {

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let index = self.next.fetch_add(1, Ordering::Relaxed) % SAMPLE_ENTRIES.len();
        let entry = &SAMPLE_ENTRIES[index];

        Ok(Answer {
            text: entry.text.to_string(),
            source_text: Some(entry.source_text.to_string()),
            category: Some(entry.category.to_string()),
            policy: Some(PolicyCard {
                title: entry.policy_title.to_string(),
                description: entry.policy_description.to_string(),
                url: entry.policy_url.to_string(),
            }),
            tokens_used: None,
        })

    }

    fn model(&self) -> &str {

        "sample"

    }

}
