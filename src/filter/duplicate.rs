use std::collections::HashMap;
use std::sync::Mutex;

use crate::scanner::ScanResult;

/// Identifies a response shape exactly: status code plus body digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct ExactKey {
    status_code: u16,
    body_hash: [u8; 16],
}

/// Groups responses structurally: status, line count, and bucketed word
/// count. Catch-all pages that embed the requested path hash uniquely but
/// keep this shape stable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
struct FuzzyKey {
    status_code: u16,
    line_count: usize,
    word_bucket: usize,
}

struct DuplicateCounts {
    exact: HashMap<ExactKey, usize>,
    fuzzy: HashMap<FuzzyKey, usize>,
}

/// Second line of defense after the smart filter: suppresses excess repeats
/// of the same response shape, catching catch-all subtrees whose soft-404
/// page differs from what calibration saw. The first `threshold` exact
/// repeats pass (`max(5, 3 × threshold)` for fuzzy matches), then the rest
/// are hidden.
pub struct DuplicateFilter {
    threshold: usize,
    fuzzy_threshold: usize,
    counts: Mutex<DuplicateCounts>,
}

impl DuplicateFilter {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            fuzzy_threshold: (threshold * 3).max(5),
            counts: Mutex::new(DuplicateCounts {
                exact: HashMap::new(),
                fuzzy: HashMap::new(),
            }),
        }
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        let exact = ExactKey {
            status_code: result.status_code,
            body_hash: result.body_hash,
        };
        let fuzzy = FuzzyKey {
            status_code: result.status_code,
            line_count: result.line_count,
            word_bucket: result.word_count / 5,
        };

        let mut counts = self.counts.lock().unwrap();
        let exact_count = {
            let entry = counts.exact.entry(exact).or_insert(0);
            *entry += 1;
            *entry
        };
        let fuzzy_count = {
            let entry = counts.fuzzy.entry(fuzzy).or_insert(0);
            *entry += 1;
            *entry
        };

        exact_count > self.threshold || fuzzy_count > self.fuzzy_threshold
    }
}
