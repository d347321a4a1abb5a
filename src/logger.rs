use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::Utc;
use sha2::{Digest, Sha256};
use uuid::Uuid;

// one line per relayed request. the prompt is never written, only a
// short sha256 fingerprint of it
#[derive(Debug, Clone)]
pub struct RequestLog {
    path: PathBuf,
}

pub struct LedgerEntry<'a> {
    pub request_id: Uuid,
    pub outcome: &'a str,
    pub model: &'a str,
    pub status: u16,
    pub latency_ms: u128,
    pub prompt: &'a str,
}

impl RequestLog {

    pub fn new(path: impl Into<PathBuf>) -> Self {

        RequestLog { path: path.into() }

    }

    pub fn path(&self) -> &Path {

        &self.path

    }

    pub fn record(&self, entry: &LedgerEntry<'_>) {

        let line = format_entry(entry);

        match OpenOptions::new().create(true).append(true).open(&self.path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(line.as_bytes()) {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to append to request log");
                }
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to open request log");
            }
        }

    }

}

pub fn prompt_fingerprint(prompt: &str) -> String {

    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let hash_hex = format!("{:x}", hasher.finalize());

    hash_hex[..16].to_string()

}

fn format_entry(entry: &LedgerEntry<'_>) -> String {

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");

    format!(
        "{} | {:13} | {:20} | {:3} | {:6} ms | {} | {}\n",
        timestamp,
        entry.outcome,
        entry.model,
        entry.status,
        entry.latency_ms,
        entry.request_id,
        prompt_fingerprint(entry.prompt)
    )

}
