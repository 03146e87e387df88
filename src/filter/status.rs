use std::collections::HashSet;

use crate::scanner::ScanResult;

/// Includes or excludes results by HTTP status code. A non-empty include
/// set passes only those codes; otherwise a non-empty exclude set hides
/// them.
pub struct StatusFilter {
    include: HashSet<u16>,
    exclude: HashSet<u16>,
}

impl StatusFilter {
    pub fn new(include: Vec<u16>, exclude: Vec<u16>) -> Self {
        Self {
            include: include.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
        }
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        if !self.include.is_empty() {
            return !self.include.contains(&result.status_code);
        }
        if !self.exclude.is_empty() {
            return self.exclude.contains(&result.status_code);
        }
        false
    }
}
