use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime configuration for one scan, after CLI flags and the optional
/// config file have been merged.
#[derive(Clone, Debug)]
pub struct Options {
    // Target
    pub url: String,
    pub urls_file: Option<String>,
    pub cidr: Option<String>,
    pub ports: String,
    pub request_file: Option<String>,

    // Wordlist
    pub wordlist_path: String,
    pub extensions: Vec<String>,
    pub force_extensions: bool,

    // HTTP
    pub methods: Vec<String>,
    pub headers: HashMap<String, String>,
    pub user_agent: String,
    pub proxy: Option<String>,
    pub follow_redirects: bool,
    pub timeout: Duration,

    // Concurrency
    pub threads: usize,
    pub delay: Duration,
    pub adaptive_throttle: bool,
    /// Abort the target when the projected remaining time exceeds this.
    /// Zero disables the check.
    pub max_eta: Duration,

    // Classification
    pub smart_filter: bool,
    pub smart_filter_threshold: u64,
    pub smart_filter_per_dir: bool,
    /// Allowed repeats of one response shape before suppression. Zero
    /// disables duplicate detection.
    pub duplicate_threshold: usize,
    pub include_status: Vec<u16>,
    pub exclude_status: Vec<u16>,
    pub exclude_size: Vec<u64>,
    pub match_body: String,
    pub exclude_body: String,

    // Discovery
    pub recursive: bool,
    pub max_depth: usize,
    pub crawl: bool,
    pub crawl_depth: usize,
    pub vhost: bool,
    pub vhost_wordlist: String,

    // Output
    pub output_file: String,
    pub output_format: String,
    pub sort_by: String,
    pub tree: bool,
    pub quiet: bool,
    pub no_color: bool,

    pub resume_file: String,
    pub on_result: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: String::new(),
            urls_file: None,
            cidr: None,
            ports: String::new(),
            request_file: None,
            wordlist_path: String::new(),
            extensions: Vec::new(),
            force_extensions: false,
            methods: vec!["GET".to_string()],
            headers: HashMap::new(),
            user_agent: String::new(),
            proxy: None,
            follow_redirects: false,
            timeout: Duration::from_secs(10),
            threads: 25,
            delay: Duration::ZERO,
            adaptive_throttle: false,
            max_eta: Duration::from_secs(3600),
            smart_filter: true,
            smart_filter_threshold: 50,
            smart_filter_per_dir: true,
            duplicate_threshold: 3,
            include_status: Vec::new(),
            exclude_status: Vec::new(),
            exclude_size: Vec::new(),
            match_body: String::new(),
            exclude_body: String::new(),
            recursive: false,
            max_depth: 3,
            crawl: false,
            crawl_depth: 2,
            vhost: false,
            vhost_wordlist: String::new(),
            output_file: String::new(),
            output_format: "text".to_string(),
            sort_by: String::new(),
            tree: false,
            quiet: false,
            no_color: false,
            resume_file: String::new(),
            on_result: String::new(),
        }
    }
}

impl Options {
    /// Options for a single target with everything else at defaults.
    pub fn for_target(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            quiet: true,
            ..Default::default()
        }
    }
}

/// Optional YAML config file. Every field maps to a CLI flag; explicit
/// flags win over file values.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub urls_file: Option<String>,
    pub cidr: Option<String>,
    pub ports: Option<String>,
    pub wordlist: Option<String>,
    pub extensions: Option<String>,
    pub force_extensions: Option<bool>,
    pub methods: Option<String>,
    pub headers: Option<Vec<String>>,
    pub user_agent: Option<String>,
    pub proxy: Option<String>,
    pub follow_redirects: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub threads: Option<usize>,
    pub delay_ms: Option<u64>,
    pub adaptive_throttle: Option<bool>,
    pub max_eta_seconds: Option<u64>,
    pub smart_filter: Option<bool>,
    pub smart_filter_threshold: Option<u64>,
    pub smart_filter_per_dir: Option<bool>,
    pub duplicate_threshold: Option<usize>,
    pub include_status: Option<String>,
    pub exclude_status: Option<String>,
    pub exclude_size: Option<String>,
    pub match_body: Option<String>,
    pub exclude_body: Option<String>,
    pub recursive: Option<bool>,
    pub max_depth: Option<usize>,
    pub crawl: Option<bool>,
    pub crawl_depth: Option<usize>,
    pub vhost: Option<bool>,
    pub vhost_wordlist: Option<String>,
    pub output: Option<String>,
    pub format: Option<String>,
    pub sort: Option<String>,
    pub tree: Option<bool>,
    pub quiet: Option<bool>,
    pub no_color: Option<bool>,
    pub resume_file: Option<String>,
    pub on_result: Option<String>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &PathBuf) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_parses_yaml() {
        let cfg: ConfigFile = serde_yaml::from_str(
            "threads: 50\nsmart_filter: false\nexclude_status: \"404,500\"\nheaders:\n  - \"X-Api-Key: abc\"\n",
        )
        .unwrap();
        assert_eq!(cfg.threads, Some(50));
        assert_eq!(cfg.smart_filter, Some(false));
        assert_eq!(cfg.exclude_status.as_deref(), Some("404,500"));
        assert_eq!(cfg.headers.as_deref(), Some(&["X-Api-Key: abc".to_string()][..]));
    }

    #[test]
    fn absolute_paths_pass_through_tilde_expansion() {
        assert_eq!(expand_tilde_string("/abs/path/list.txt"), "/abs/path/list.txt");
    }

    #[test]
    fn tilde_expands_against_home() {
        if let Some(home) = home_dir() {
            let expanded = expand_tilde("~/lists/raft.txt");
            assert_eq!(expanded, home.join("lists/raft.txt"));
        }
    }
}
