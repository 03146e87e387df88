use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect;
use sha2::{Digest, Sha256};
use tokio::time::Instant;

use crate::config::Options;

const DEFAULT_USER_AGENT: &str = "dirfuzz/1.0";

/// Parsed data from a single HTTP probe. The body is always fully consumed
/// so that length, hash, word and line counts reflect the observed bytes.
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: u16,
    pub content_length: u64,
    pub body: Vec<u8>,
    pub body_hash: [u8; 16],
    pub word_count: usize,
    pub line_count: usize,
    pub url: String,
    pub redirect_url: String,
    pub duration: Duration,
}

/// Wraps a reqwest client for directory fuzzing against one base URL.
#[derive(Clone, Debug)]
pub struct Requester {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl Requester {
    pub fn new(opts: &Options) -> Result<Self, String> {
        let base = url::Url::parse(&opts.url).map_err(|e| format!("invalid URL '{}': {e}", opts.url))?;
        let mut base_url = base.to_string();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        let mut headers = HeaderMap::new();
        let ua = if opts.user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT
        } else {
            opts.user_agent.as_str()
        };
        headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_str(ua).map_err(|e| format!("invalid user-agent: {e}"))?,
        );
        for (key, value) in opts.headers.iter() {
            let name = HeaderName::from_str(key.trim()).map_err(|e| format!("invalid header '{key}': {e}"))?;
            let value = HeaderValue::from_str(value.trim()).map_err(|e| format!("invalid header '{key}': {e}"))?;
            headers.insert(name, value);
        }

        let redirect_policy = if opts.follow_redirects {
            redirect::Policy::limited(10)
        } else {
            redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .redirect(redirect_policy)
            .timeout(opts.timeout)
            .danger_accept_invalid_hostnames(true)
            .danger_accept_invalid_certs(true)
            .pool_max_idle_per_host(opts.threads.max(1));

        if let Some(proxy) = opts.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            let proxy = reqwest::Proxy::all(proxy).map_err(|e| format!("invalid proxy URL '{proxy}': {e}"))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url,
            headers,
        })
    }

    /// Sends one probe for the given path and returns the parsed response.
    /// An empty method defaults to GET. A non-empty host overrides the
    /// outgoing Host header without changing the connection target.
    pub async fn probe(&self, method: &str, path: &str, host: &str) -> Result<Response, String> {
        let method = if method.is_empty() { "GET" } else { method };
        let method =
            reqwest::Method::from_bytes(method.as_bytes()).map_err(|_| format!("invalid method '{method}'"))?;

        let target_url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut request = self
            .client
            .request(method, &target_url)
            .headers(self.headers.clone());
        if !host.is_empty() {
            let value = HeaderValue::from_str(host).map_err(|e| format!("invalid host '{host}': {e}"))?;
            request = request.header(reqwest::header::HOST, value);
        }

        let start = Instant::now();
        let resp = request.send().await.map_err(|e| e.to_string())?;

        let status_code = resp.status().as_u16();
        let redirect_url = if (300..400).contains(&status_code) {
            resp.headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        } else {
            String::new()
        };

        let body = resp
            .bytes()
            .await
            .map_err(|e| format!("reading response body for {path}: {e}"))?
            .to_vec();
        let duration = start.elapsed();

        let (word_count, line_count) = count_words_and_lines(&body);

        Ok(Response {
            status_code,
            content_length: body.len() as u64,
            body_hash: hash_body(&body),
            word_count,
            line_count,
            body,
            url: target_url,
            redirect_url,
            duration,
        })
    }
}

/// Digests the body to a 16-byte fingerprint (SHA-256 prefix).
pub fn hash_body(body: &[u8]) -> [u8; 16] {
    let digest = Sha256::digest(body);
    let mut out = [0u8; 16];
    out.copy_from_slice(&digest[..16]);
    out
}

/// Word count over whitespace-separated tokens and line count as
/// `count('\n') + 1`, with 0 lines for an empty body.
pub fn count_words_and_lines(body: &[u8]) -> (usize, usize) {
    if body.is_empty() {
        return (0, 0);
    }
    let text = String::from_utf8_lossy(body);
    let words = text.split_whitespace().count();
    let lines = text.matches('\n').count() + 1;
    (words, lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_counts_zero() {
        assert_eq!(count_words_and_lines(b""), (0, 0));
    }

    #[test]
    fn single_line_counts_one() {
        assert_eq!(count_words_and_lines(b"hello world"), (2, 1));
    }

    #[test]
    fn trailing_newline_adds_a_line() {
        assert_eq!(count_words_and_lines(b"one two\nthree\n"), (3, 3));
    }

    #[test]
    fn hash_is_stable_and_body_sensitive() {
        let a = hash_body(b"page one");
        let b = hash_body(b"page one");
        let c = hash_body(b"page two");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
