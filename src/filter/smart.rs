use rand::RngCore;
use thiserror::Error;

use crate::scanner::{Requester, ScanResult};

const PROBE_COUNT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MatchMode {
    /// All calibration bodies were byte-identical.
    HashExact,
    /// Bodies varied but lengths converged.
    FuzzyLength,
}

#[derive(Clone, Debug)]
struct Baseline {
    status_code: u16,
    content_length: u64,
    body_hash: [u8; 16],
    word_count: usize,
    line_count: usize,
    mode: MatchMode,
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("only {succeeded}/{total} calibration probes succeeded, need at least 2")]
    NotEnoughProbes { succeeded: usize, total: usize },

    #[error("calibration could not establish any baselines")]
    NoBaselines,
}

struct ProbeOutcome {
    status_code: u16,
    content_length: u64,
    body_hash: [u8; 16],
    word_count: usize,
    line_count: usize,
}

/// Detects custom not-found pages (soft-404s) that come back with success
/// codes. Calibration probes random non-existent paths before the scan and
/// learns what "not found" looks like; classification then rejects results
/// matching that shape. Baselines are immutable after calibration, so
/// concurrent classification needs no locking.
#[derive(Debug)]
pub struct SmartFilter {
    baselines: Vec<Baseline>,
    /// Byte tolerance for fuzzy length matching.
    threshold: u64,
}

impl SmartFilter {
    /// Calibrates against random probe paths under `base_path` ("" for the
    /// root scope, "dir/sub" for a recursed directory). Fails unless at
    /// least two probes succeed and one status group converges.
    pub async fn calibrate(req: &Requester, base_path: &str, threshold: u64) -> Result<Self, CalibrationError> {
        let mut outcomes = Vec::new();
        for _ in 0..PROBE_COUNT {
            let mut probe = random_probe_path();
            if !base_path.is_empty() {
                probe = format!("{}/{}", base_path.trim_end_matches('/'), probe);
            }
            if let Ok(resp) = req.probe("GET", &probe, "").await {
                outcomes.push(ProbeOutcome {
                    status_code: resp.status_code,
                    content_length: resp.content_length,
                    body_hash: resp.body_hash,
                    word_count: resp.word_count,
                    line_count: resp.line_count,
                });
            }
        }
        Self::from_probes(outcomes, PROBE_COUNT, threshold)
    }

    /// Calibrates for vhost fuzzing by probing `/` with random subdomain
    /// Host headers.
    pub async fn calibrate_vhost(req: &Requester, threshold: u64) -> Result<Self, CalibrationError> {
        let mut outcomes = Vec::new();
        for _ in 0..PROBE_COUNT {
            let host = random_probe_host();
            if let Ok(resp) = req.probe("GET", "/", &host).await {
                outcomes.push(ProbeOutcome {
                    status_code: resp.status_code,
                    content_length: resp.content_length,
                    body_hash: resp.body_hash,
                    word_count: resp.word_count,
                    line_count: resp.line_count,
                });
            }
        }
        Self::from_probes(outcomes, PROBE_COUNT, threshold)
    }

    fn from_probes(
        outcomes: Vec<ProbeOutcome>,
        probe_count: usize,
        threshold: u64,
    ) -> Result<Self, CalibrationError> {
        if outcomes.len() < 2 {
            return Err(CalibrationError::NotEnoughProbes {
                succeeded: outcomes.len(),
                total: probe_count,
            });
        }

        let mut groups: Vec<(u16, Vec<&ProbeOutcome>)> = Vec::new();
        for outcome in &outcomes {
            match groups.iter_mut().find(|(code, _)| *code == outcome.status_code) {
                Some((_, group)) => group.push(outcome),
                None => groups.push((outcome.status_code, vec![outcome])),
            }
        }

        let mut baselines = Vec::new();
        for (status_code, group) in groups {
            if group.len() < 2 {
                continue;
            }

            if group.iter().all(|o| o.body_hash == group[0].body_hash) {
                baselines.push(Baseline {
                    status_code,
                    content_length: group[0].content_length,
                    body_hash: group[0].body_hash,
                    word_count: group[0].word_count,
                    line_count: group[0].line_count,
                    mode: MatchMode::HashExact,
                });
                continue;
            }

            let median_len = median(group.iter().map(|o| o.content_length).collect());
            let median_words = median(group.iter().map(|o| o.word_count).collect());
            let median_lines = median(group.iter().map(|o| o.line_count).collect());

            let converges = group
                .iter()
                .all(|o| o.content_length.abs_diff(median_len) <= threshold);
            if converges {
                baselines.push(Baseline {
                    status_code,
                    content_length: median_len,
                    body_hash: [0; 16],
                    word_count: median_words,
                    line_count: median_lines,
                    mode: MatchMode::FuzzyLength,
                });
            }
        }

        if baselines.is_empty() {
            return Err(CalibrationError::NoBaselines);
        }

        Ok(Self { baselines, threshold })
    }

    pub fn should_filter(&self, result: &ScanResult) -> bool {
        // An empty 200 body is a catch-all, never real content.
        if result.status_code == 200 && result.content_length == 0 {
            return true;
        }

        for baseline in &self.baselines {
            if result.status_code != baseline.status_code {
                continue;
            }

            return match baseline.mode {
                MatchMode::HashExact => result.body_hash == baseline.body_hash,
                MatchMode::FuzzyLength => {
                    // 2-of-3 scoring: soft-404s that embed the requested
                    // path drift in byte length while words and lines hold;
                    // timestamped pages drift a few bytes while the rest
                    // holds.
                    let length_ok = result.content_length.abs_diff(baseline.content_length) <= self.threshold;
                    let word_tolerance = (baseline.word_count / 20).max(5);
                    let word_ok = result.word_count.abs_diff(baseline.word_count) <= word_tolerance;
                    let line_tolerance = (baseline.line_count / 10).max(2);
                    let line_ok = result.line_count.abs_diff(baseline.line_count) <= line_tolerance;

                    [length_ok, word_ok, line_ok].iter().filter(|ok| **ok).count() >= 2
                }
            };
        }
        false
    }
}

fn median<T: Ord + Copy>(mut values: Vec<T>) -> T {
    values.sort_unstable();
    values[values.len() / 2]
}

fn random_probe_path() -> String {
    let mut buf = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut buf);
    format!("dirfuzz_probe_{}", hex_encode(&buf))
}

fn random_probe_host() -> String {
    let mut buf = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut buf);
    format!("dirfuzz-{}.probe.invalid", hex_encode(&buf))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
