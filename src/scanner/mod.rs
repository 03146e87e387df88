pub mod pause;
pub mod requester;
pub mod throttle;
pub mod worker;

pub use pause::Pauser;
pub use requester::{Requester, Response};
pub use throttle::Throttler;
pub use worker::{run_worker_pool, WorkerConfig};

use std::time::Duration;

/// A single unit of work for the worker pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WorkItem {
    /// HTTP method. Empty defaults to GET.
    pub method: String,
    /// Relative path to probe, without leading slash.
    pub path: String,
    /// Host header override for vhost fuzzing. Empty means none.
    pub host: String,
}

impl WorkItem {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            host: String::new(),
        }
    }

    pub fn with_host(method: impl Into<String>, path: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            host: host.into(),
        }
    }
}

/// The outcome of a single path probe.
///
/// When `error` is set, only `method`, `host`, `path`, and `error` carry
/// meaning; the fingerprint fields are zeroed.
#[derive(Clone, Debug, Default)]
pub struct ScanResult {
    pub method: String,
    pub host: String,
    pub path: String,
    pub url: String,
    pub status_code: u16,
    pub content_length: u64,
    /// Raw body, retained only while a downstream consumer needs it.
    pub body: Option<Vec<u8>>,
    pub body_hash: [u8; 16],
    pub word_count: usize,
    pub line_count: usize,
    pub redirect_url: String,
    pub duration: Duration,
    pub error: Option<String>,
    pub filtered: bool,
    pub filter_reason: String,
}

impl ScanResult {
    pub fn from_response(item: &WorkItem, resp: Response, keep_body: bool) -> Self {
        Self {
            method: item.method.clone(),
            host: item.host.clone(),
            path: item.path.clone(),
            url: resp.url,
            status_code: resp.status_code,
            content_length: resp.content_length,
            body: if keep_body { Some(resp.body) } else { None },
            body_hash: resp.body_hash,
            word_count: resp.word_count,
            line_count: resp.line_count,
            redirect_url: resp.redirect_url,
            duration: resp.duration,
            error: None,
            filtered: false,
            filter_reason: String::new(),
        }
    }

    pub fn from_error(item: &WorkItem, err: String) -> Self {
        Self {
            method: item.method.clone(),
            host: item.host.clone(),
            path: item.path.clone(),
            error: Some(err),
            ..Default::default()
        }
    }
}
