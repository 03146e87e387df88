use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static LINK_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"(?i)src\s*=\s*["']([^"']+)["']"#).unwrap(),
        Regex::new(r#"(?i)action\s*=\s*["']([^"']+)["']"#).unwrap(),
    ]
});

/// Scans an HTML body for href/src/action references and returns the
/// de-duplicated same-origin relative paths, in discovery order. The body
/// is treated as opaque bytes; there is no HTML parser state.
pub fn extract_paths(body: &[u8], base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };

    let content = String::from_utf8_lossy(body);
    let mut seen = std::collections::HashSet::new();
    let mut paths = Vec::new();

    for pattern in LINK_PATTERNS.iter() {
        for capture in pattern.captures_iter(&content) {
            let raw = capture[1].trim();

            let lower = raw.to_ascii_lowercase();
            if raw.starts_with('#')
                || lower.starts_with("javascript:")
                || lower.starts_with("mailto:")
                || lower.starts_with("data:")
            {
                continue;
            }

            let Ok(resolved) = base.join(raw) else {
                continue;
            };
            if let Some(host) = resolved.host_str() {
                if base.host_str() != Some(host) {
                    continue;
                }
            }

            let path = resolved.path().trim_end_matches('/');
            let path = path.strip_prefix('/').unwrap_or(path);
            if path.is_empty() {
                continue;
            }

            if seen.insert(path.to_string()) {
                paths.push(path.to_string());
            }
        }
    }

    paths
}
