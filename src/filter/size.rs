use std::collections::HashSet;

use crate::scanner::ScanResult;

/// Hides results whose body size matches one of the excluded values.
pub struct SizeFilter {
    sizes: HashSet<u64>,
}

impl SizeFilter {
    pub fn new(exclude_sizes: Vec<u64>) -> Self {
        Self {
            sizes: exclude_sizes.into_iter().collect(),
        }
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        self.sizes.contains(&result.content_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_size_is_filtered() {
        let f = SizeFilter::new(vec![1234, 0]);
        let hit = ScanResult {
            content_length: 1234,
            ..Default::default()
        };
        let miss = ScanResult {
            content_length: 1235,
            ..Default::default()
        };
        assert!(f.should_filter(&hit));
        assert!(!f.should_filter(&miss));
    }
}
