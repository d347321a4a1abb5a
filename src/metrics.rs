use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;
use crate::error::RelayError;

#[derive(Debug, Default)]
pub struct Metrics {
    pub total_requests: AtomicU64,
    pub answered: AtomicU64,
    pub empty_answers: AtomicU64,
    pub upstream_rejections: AtomicU64,
    pub transport_failures: AtomicU64,
    pub invalid_requests: AtomicU64,
    pub tokens_used: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {

        Self::default()

    }

    pub fn record_answer(&self, answer_is_empty: bool, tokens_used: Option<u64>) {

        self.answered.fetch_add(1, Ordering::Relaxed);
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if answer_is_empty {
            self.empty_answers.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(tokens) = tokens_used {
            self.tokens_used.fetch_add(tokens, Ordering::Relaxed);
        }

    }

    pub fn record_error(&self, error: &RelayError) {

        self.total_requests.fetch_add(1, Ordering::Relaxed);
        let counter = match error {
            RelayError::InvalidRequest(_) => &self.invalid_requests,
            RelayError::Upstream { .. } => &self.upstream_rejections,
            // an undecodable success body is still a broken hop to the provider
            RelayError::Transport(_) | RelayError::Decode(_) => &self.transport_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);

    }

    pub fn snapshot(&self) -> MetricsSnapshot {

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            answered: self.answered.load(Ordering::Relaxed),
            empty_answers: self.empty_answers.load(Ordering::Relaxed),
            upstream_rejections: self.upstream_rejections.load(Ordering::Relaxed),
            transport_failures: self.transport_failures.load(Ordering::Relaxed),
            invalid_requests: self.invalid_requests.load(Ordering::Relaxed),
            tokens_used: self.tokens_used.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub answered: u64,
    pub empty_answers: u64,
    pub upstream_rejections: u64,
    pub transport_failures: u64,
    pub invalid_requests: u64,
    pub tokens_used: u64,
}

impl MetricsSnapshot {
    pub fn success_rate(&self) -> f64 {

        if self.total_requests == 0 {
            return 0.0;
        }
        (self.answered as f64 / self.total_requests as f64) * 100.0

    }
}
