use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReqParseError {
    #[error("reading request file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request file is empty")]
    Empty,

    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),

    #[error("request file missing Host header")]
    MissingHost,

    #[error("invalid URL in request line: {0}")]
    InvalidUrl(String),
}

/// Data extracted from a raw HTTP request export (e.g. from Burp).
#[derive(Clone, Debug)]
pub struct ParsedRequest {
    pub method: String,
    /// Base URL (scheme + host only; the scanner appends its own paths).
    pub url: String,
    pub headers: HashMap<String, String>,
}

pub fn parse_file(path: &str) -> Result<ParsedRequest, ReqParseError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReqParseError::Read {
        path: path.to_string(),
        source,
    })?;
    parse(&raw)
}

/// Parses a raw HTTP request: request line, headers until the first blank
/// line, then reconstructs a base URL from the Host header. Scheme
/// inference: HTTP/1.x with a Host ending in `:80` means http, everything
/// else https.
pub fn parse(raw: &str) -> Result<ParsedRequest, ReqParseError> {
    let mut lines = raw.lines();

    let request_line = lines.next().ok_or(ReqParseError::Empty)?.trim();
    if request_line.is_empty() {
        return Err(ReqParseError::Empty);
    }
    let mut parts = request_line.splitn(3, ' ');
    let method = parts
        .next()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ReqParseError::InvalidRequestLine(request_line.to_string()))?
        .to_string();
    let request_path = parts
        .next()
        .ok_or_else(|| ReqParseError::InvalidRequestLine(request_line.to_string()))?
        .to_string();
    let proto = parts.next().unwrap_or_default().to_ascii_uppercase();

    let mut headers = HashMap::new();
    for line in lines {
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    // Proxied exports sometimes carry a full URL in the request line; use
    // its scheme and host directly.
    if request_path.starts_with("http://") || request_path.starts_with("https://") {
        let parsed = url::Url::parse(&request_path).map_err(|e| ReqParseError::InvalidUrl(e.to_string()))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| ReqParseError::InvalidUrl(request_path.clone()))?;
        let url = match parsed.port() {
            Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
            None => format!("{}://{}", parsed.scheme(), host),
        };
        return Ok(ParsedRequest { method, url, headers });
    }

    let host = headers.get("Host").cloned().ok_or(ReqParseError::MissingHost)?;

    let mut scheme = "https";
    if proto.starts_with("HTTP/1") && host.ends_with(":80") {
        scheme = "http";
    }

    Ok(ParsedRequest {
        method,
        url: format!("{scheme}://{host}"),
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_method_url_and_headers() {
        let raw = "GET /app/login HTTP/1.1\nHost: example.com\nCookie: session=abc\nUser-Agent: test\n\nbody ignored";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.method, "GET");
        assert_eq!(parsed.url, "https://example.com");
        assert_eq!(parsed.headers["Cookie"], "session=abc");
        assert_eq!(parsed.headers["User-Agent"], "test");
    }

    #[test]
    fn http1_with_port_80_is_plain_http() {
        let raw = "POST / HTTP/1.1\nHost: example.com:80\n\n";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.url, "http://example.com:80");
    }

    #[test]
    fn http2_is_always_https() {
        let raw = "GET / HTTP/2\nHost: example.com:80\n\n";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.url, "https://example.com:80");
    }

    #[test]
    fn full_url_request_line_strips_path() {
        let raw = "GET http://proxy.example.com:8080/some/path HTTP/1.1\nHost: ignored\n\n";
        let parsed = parse(raw).unwrap();
        assert_eq!(parsed.url, "http://proxy.example.com:8080");
    }

    #[test]
    fn missing_host_is_an_error() {
        let raw = "GET / HTTP/1.1\nAccept: */*\n\n";
        assert!(matches!(parse(raw), Err(ReqParseError::MissingHost)));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse(""), Err(ReqParseError::Empty)));
        assert!(matches!(parse("\n"), Err(ReqParseError::Empty)));
    }
}
