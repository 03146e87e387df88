use crate::scanner::ScanResult;

fn body_contains(result: &ScanResult, needle: &str) -> bool {
    match result.body.as_deref() {
        Some(body) => String::from_utf8_lossy(body).contains(needle),
        None => false,
    }
}

/// Passes only results whose body contains the needle.
pub struct BodyMatchFilter {
    needle: String,
}

impl BodyMatchFilter {
    pub fn new(needle: impl Into<String>) -> Self {
        Self { needle: needle.into() }
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        !body_contains(result, &self.needle)
    }
}

/// Hides results whose body contains the needle.
pub struct BodyExcludeFilter {
    needle: String,
}

impl BodyExcludeFilter {
    pub fn new(needle: impl Into<String>) -> Self {
        Self { needle: needle.into() }
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        body_contains(result, &self.needle)
    }
}
