use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dirfuzz",
    version,
    about = "Fast web path brute-forcer with smart 404 detection",
    long_about = "dirfuzz is a web path/file brute-forcing tool designed for penetration\n\
                  testing and bug bounty hunting. It features automatic detection and\n\
                  filtering of custom 404 pages (soft-404s) that return HTTP 200.\n\n\
                  Examples:\n  \
                  dirfuzz -u https://example.com\n  \
                  dirfuzz -u https://example.com -e php,html -t 50\n  \
                  dirfuzz -u https://example.com -x 403,500 -o results.json --format json\n  \
                  dirfuzz -l urls.txt -w wordlist.txt\n  \
                  dirfuzz --cidr 192.168.1.0/24 --ports 80,443,8080\n  \
                  dirfuzz -u https://example.com --resume-file scan.state\n  \
                  dirfuzz -u https://example.com --on-result \"notify-send {url}\""
)]
pub struct CliArgs {
    #[arg(short = 'u', long, value_name = "URL", help_heading = "Target", help = "Target URL.")]
    pub url: Option<String>,

    #[arg(
        short = 'l',
        long = "urls-file",
        value_name = "FILE",
        help_heading = "Target",
        help = "File with one URL per line."
    )]
    pub urls_file: Option<String>,

    #[arg(
        short = 'r',
        long = "request-file",
        value_name = "FILE",
        help_heading = "Target",
        help = "Raw HTTP request file (e.g. Burp Suite export)."
    )]
    pub request_file: Option<String>,

    #[arg(
        long,
        value_name = "CIDR",
        help_heading = "Target",
        help = "CIDR range to scan (e.g. 192.168.1.0/24)."
    )]
    pub cidr: Option<String>,

    #[arg(
        long,
        value_name = "PORTS",
        help_heading = "Target",
        help = "Ports for CIDR targets (comma-separated, e.g. 80,443,8080)."
    )]
    pub ports: Option<String>,

    #[arg(
        short = 'w',
        long,
        value_name = "FILE",
        help_heading = "Target",
        help = "Custom wordlist path (default: built-in)."
    )]
    pub wordlist: Option<String>,

    #[arg(
        short = 'e',
        long,
        value_name = "EXTS",
        help_heading = "Target",
        help = "File extensions to test (e.g. php,html,js)."
    )]
    pub extensions: Option<String>,

    #[arg(
        short = 'f',
        long = "force-extensions",
        help_heading = "Target",
        help = "Append extensions to every wordlist entry."
    )]
    pub force_extensions: bool,

    #[arg(long, help_heading = "Discovery", help = "Enable recursive scanning.")]
    pub recursive: bool,

    #[arg(
        short = 'R',
        long = "max-depth",
        value_name = "N",
        default_value_t = 3,
        help_heading = "Discovery",
        help = "Maximum recursion depth."
    )]
    pub max_depth: usize,

    #[arg(long, help_heading = "Discovery", help = "Crawl discovered pages for additional paths.")]
    pub crawl: bool,

    #[arg(
        long = "crawl-depth",
        value_name = "N",
        default_value_t = 2,
        help_heading = "Discovery",
        help = "Maximum crawl depth (link-following hops)."
    )]
    pub crawl_depth: usize,

    #[arg(long, help_heading = "Discovery", help = "Enable virtual host fuzzing mode.")]
    pub vhost: bool,

    #[arg(
        long = "vhost-wordlist",
        value_name = "FILE",
        help_heading = "Discovery",
        help = "Wordlist of hostnames for vhost fuzzing (default: built-in)."
    )]
    pub vhost_wordlist: Option<String>,

    #[arg(
        short = 'i',
        long = "include-status",
        value_name = "CODES",
        help_heading = "Matchers",
        help = "Only show these status codes (comma-separated)."
    )]
    pub include_status: Option<String>,

    #[arg(
        long = "match-body",
        value_name = "STRING",
        help_heading = "Matchers",
        help = "Only show responses containing this string."
    )]
    pub match_body: Option<String>,

    #[arg(
        short = 'x',
        long = "exclude-status",
        value_name = "CODES",
        help_heading = "Filters",
        help = "Hide these status codes (comma-separated)."
    )]
    pub exclude_status: Option<String>,

    #[arg(
        long = "exclude-size",
        value_name = "SIZES",
        help_heading = "Filters",
        help = "Hide responses of these sizes (comma-separated)."
    )]
    pub exclude_size: Option<String>,

    #[arg(
        long = "exclude-body",
        value_name = "STRING",
        help_heading = "Filters",
        help = "Hide responses containing this string."
    )]
    pub exclude_body: Option<String>,

    #[arg(
        long = "smart-filter",
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_name = "BOOL",
        help_heading = "Filters",
        help = "Enable smart 404 detection."
    )]
    pub smart_filter: bool,

    #[arg(
        long = "smart-filter-threshold",
        value_name = "BYTES",
        default_value_t = 50,
        help_heading = "Filters",
        help = "Size tolerance in bytes for smart filter."
    )]
    pub smart_filter_threshold: u64,

    #[arg(
        long = "smart-filter-per-dir",
        help_heading = "Filters",
        help = "Re-calibrate smart filter per subdirectory (always on during recursion)."
    )]
    pub smart_filter_per_dir: bool,

    #[arg(
        long = "duplicate-threshold",
        value_name = "N",
        default_value_t = 3,
        help_heading = "Filters",
        help = "Allowed repeats of one response shape before suppression (0 disables)."
    )]
    pub duplicate_threshold: usize,

    #[arg(
        short = 't',
        long,
        value_name = "N",
        default_value_t = 25,
        help_heading = "Rate-limit",
        help = "Number of concurrent threads."
    )]
    pub threads: usize,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 10,
        help_heading = "Rate-limit",
        help = "HTTP request timeout in seconds."
    )]
    pub timeout: u64,

    #[arg(
        long,
        value_name = "MS",
        default_value_t = 0,
        help_heading = "Rate-limit",
        help = "Delay between requests per thread, in milliseconds."
    )]
    pub delay: u64,

    #[arg(
        long = "adaptive-throttle",
        help_heading = "Rate-limit",
        help = "Auto back-off on 429/rate limits."
    )]
    pub adaptive_throttle: bool,

    #[arg(
        long = "max-eta",
        value_name = "SECONDS",
        default_value_t = 3600,
        help_heading = "Rate-limit",
        help = "Skip target if ETA exceeds this many seconds (0 to disable)."
    )]
    pub max_eta: u64,

    #[arg(
        short = 'H',
        long = "header",
        value_name = "HEADER",
        action = ArgAction::Append,
        help_heading = "HTTP",
        help = "Custom headers (Key: Value, repeatable)."
    )]
    pub headers: Vec<String>,

    #[arg(
        long = "user-agent",
        value_name = "UA",
        help_heading = "HTTP",
        help = "Custom User-Agent string."
    )]
    pub user_agent: Option<String>,

    #[arg(long, value_name = "URL", help_heading = "HTTP", help = "HTTP/HTTPS proxy URL.")]
    pub proxy: Option<String>,

    #[arg(long = "follow-redirects", help_heading = "HTTP", help = "Follow HTTP redirects.")]
    pub follow_redirects: bool,

    #[arg(
        long,
        value_name = "METHODS",
        help_heading = "HTTP",
        help = "HTTP methods to try per path (e.g. GET,POST,PUT)."
    )]
    pub methods: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help_heading = "Output",
        help = "Output file path (default: stdout)."
    )]
    pub output: Option<String>,

    #[arg(
        long,
        value_name = "FORMAT",
        default_value = "text",
        help_heading = "Output",
        help = "Output format: text, json, csv."
    )]
    pub format: String,

    #[arg(
        long,
        value_name = "KEY",
        help_heading = "Output",
        help = "Sort results: status, path, size (buffers until scan completes)."
    )]
    pub sort: Option<String>,

    #[arg(long, help_heading = "Output", help = "Print directory tree summary after scan.")]
    pub tree: bool,

    #[arg(short = 'q', long, help_heading = "Output", help = "Minimal output.")]
    pub quiet: bool,

    #[arg(long = "no-color", help_heading = "Output", help = "Disable colored output.")]
    pub no_color: bool,

    #[arg(
        long = "on-result",
        value_name = "CMD",
        help_heading = "Output",
        help = "Shell command to run for each result (receives JSON on stdin)."
    )]
    pub on_result: Option<String>,

    #[arg(
        long = "resume-file",
        value_name = "FILE",
        help_heading = "Configuration",
        help = "File to save/load scan progress for resume."
    )]
    pub resume_file: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help_heading = "Configuration",
        help = "YAML config file; explicit flags take precedence."
    )]
    pub config: Option<String>,
}
