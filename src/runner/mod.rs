use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use colored::Colorize;
use itertools::iproduct;
use log::{debug, warn};
use thiserror::Error;
use tokio::io::AsyncBufReadExt;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::config::Options;
use crate::crawl;
use crate::filter::{
    BodyExcludeFilter, BodyMatchFilter, Chain, DuplicateFilter, ScanFilter, SizeFilter, SmartFilter, StatusFilter,
};
use crate::hook::HookRunner;
use crate::netutil;
use crate::output::{self, Progress, Stats, Writer};
use crate::resume::ResumeState;
use crate::scanner::{run_worker_pool, Pauser, Requester, ScanResult, Throttler, WorkItem, WorkerConfig};
use crate::wordlist;

/// Directory names excluded from recursion (static assets); they still
/// count as directories for the tree summary.
const STATIC_ASSET_DIRS: &[&str] = &["css", "images", "img", "fonts", "assets", "media", ".hg"];

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no targets specified (-u, -l, --cidr, or --request-file)")]
    NoTargets,

    #[error("reading URLs file {path}: {source}")]
    UrlsFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("expanding CIDR: {0}")]
    Cidr(#[from] crate::netutil::CidrError),

    #[error("parsing request file: {0}")]
    RequestFile(#[from] crate::reqparse::ReqParseError),

    #[error("loading wordlist: {0}")]
    Wordlist(#[from] crate::wordlist::WordlistError),

    #[error("loading resume file: {0}")]
    Resume(#[from] crate::resume::ResumeError),

    #[error("{0}")]
    Setup(String),

    #[error("writing output: {source}")]
    Output {
        #[source]
        source: std::io::Error,
    },
}

impl RunnerError {
    /// Global failures abort the whole multi-target run; the rest abort
    /// only the current target.
    fn is_global(&self) -> bool {
        matches!(self, Self::Resume(_) | Self::Setup(_))
    }
}

/// The scan orchestrator. Resolves targets, then drives the full pipeline
/// for each: calibrate, scan, recurse, crawl.
pub struct Runner {
    opts: Options,
}

impl Runner {
    pub fn new(opts: Options) -> Result<Self, RunnerError> {
        if opts.url.is_empty() && opts.urls_file.is_none() && opts.cidr.is_none() && opts.request_file.is_none() {
            return Err(RunnerError::NoTargets);
        }
        if let Some(proxy) = opts.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            reqwest::Proxy::all(proxy).map_err(|e| RunnerError::Setup(format!("invalid proxy URL '{proxy}': {e}")))?;
        }
        Ok(Self { opts })
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub async fn run(&self) -> Result<(), RunnerError> {
        let mut opts = self.opts.clone();

        if let Some(request_file) = opts.request_file.clone() {
            apply_request_file(&mut opts, &request_file)?;
        }

        let targets = resolve_targets(&opts)?;

        for (idx, target) in targets.iter().enumerate() {
            if targets.len() > 1 && !opts.quiet {
                eprintln!("\n[*] Target {}/{}: {}", idx + 1, targets.len(), target);
            }
            let mut target_opts = opts.clone();
            target_opts.url = target.clone();
            if let Err(e) = scan_target(&target_opts).await {
                if e.is_global() {
                    return Err(e);
                }
                eprintln!("[!] Error scanning {target}: {e}");
            }
        }
        Ok(())
    }
}

/// Merges a raw request export into the options: target URL (unless one was
/// given), headers, and User-Agent. Hop-by-hop and encoding headers are
/// skipped; explicit `-H` flags win.
fn apply_request_file(opts: &mut Options, path: &str) -> Result<(), RunnerError> {
    let parsed = crate::reqparse::parse_file(path)?;
    if opts.url.is_empty() {
        opts.url = parsed.url.clone();
    }
    for (key, value) in parsed.headers {
        let lower = key.to_lowercase();
        if lower == "host" || lower == "content-length" || lower == "accept-encoding" {
            continue;
        }
        if lower == "user-agent" {
            if opts.user_agent.is_empty() {
                opts.user_agent = value;
            }
            continue;
        }
        opts.headers.entry(key).or_insert(value);
    }
    if !opts.quiet {
        eprintln!("[+] Loaded request from {path} -> {}", opts.url);
    }
    Ok(())
}

/// Builds the target list from -u, -l, and --cidr.
fn resolve_targets(opts: &Options) -> Result<Vec<String>, RunnerError> {
    let mut targets = Vec::new();

    if !opts.url.is_empty() {
        targets.push(normalize_target(&opts.url));
    }

    if let Some(path) = opts.urls_file.as_deref().filter(|p| !p.trim().is_empty()) {
        let contents = std::fs::read_to_string(path).map_err(|source| RunnerError::UrlsFile {
            path: path.to_string(),
            source,
        })?;
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            targets.push(normalize_target(line));
        }
    }

    if let Some(cidr) = opts.cidr.as_deref().filter(|c| !c.trim().is_empty()) {
        let scheme = if opts.url.starts_with("http://") { "http" } else { "https" };
        targets.extend(netutil::expand_targets(cidr, &opts.ports, scheme)?);
    }

    if targets.is_empty() {
        return Err(RunnerError::NoTargets);
    }
    Ok(targets)
}

fn normalize_target(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn resolve_methods(opts: &Options) -> Vec<String> {
    let mut seen = HashSet::new();
    let methods: Vec<String> = opts
        .methods
        .iter()
        .map(|m| m.trim().to_uppercase())
        .filter(|m| !m.is_empty() && seen.insert(m.clone()))
        .collect();
    if methods.is_empty() {
        vec!["GET".to_string()]
    } else {
        methods
    }
}

fn expand_items(paths: &[String], methods: &[String]) -> Vec<WorkItem> {
    iproduct!(paths.iter(), methods.iter())
        .map(|(path, method)| WorkItem::new(method.clone(), path.clone()))
        .collect()
}

/// Paths seen in this run, keyed case-insensitively so a path is enqueued
/// at most once across the wordlist, recursion prefixes, and crawl
/// discoveries. Directory keys carry a trailing slash.
struct ScannedSet {
    seen: Mutex<HashSet<String>>,
}

impl ScannedSet {
    fn new() -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
        }
    }

    /// Records a path; returns false when it was already known.
    fn insert_path(&self, path: &str) -> bool {
        self.seen.lock().unwrap().insert(path.to_lowercase())
    }

    fn insert_dir(&self, dir: &str) -> bool {
        let key = format!("{}/", dir.trim_end_matches('/').to_lowercase());
        self.seen.lock().unwrap().insert(key)
    }
}

fn looks_like_directory(result: &ScanResult) -> bool {
    if result.path.ends_with('/') {
        return true;
    }
    if (300..400).contains(&result.status_code) {
        let want = format!("{}/", result.path);
        if result.redirect_url.ends_with(&want) || result.redirect_url.ends_with('/') {
            return true;
        }
    }
    if (200..300).contains(&result.status_code) {
        let last_segment = result.path.rsplit('/').next().unwrap_or(&result.path);
        return !last_segment.contains('.');
    }
    false
}

fn is_static_asset_dir(dir: &str) -> bool {
    let last_segment = dir
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(dir)
        .to_lowercase();
    STATIC_ASSET_DIRS.contains(&last_segment.as_str())
}

/// Parent directory prefixes of a crawled path, shallowest first, capped at
/// `max_depth` segments. `/js/asset/login.js` yields `js` and `js/asset`.
fn extract_parent_dirs(path: &str, max_depth: usize) -> Vec<String> {
    let trimmed = path.trim_matches('/');
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        return Vec::new();
    }

    let mut dirs = Vec::new();
    let mut prefix = String::new();
    for segment in &segments[..segments.len() - 1] {
        if dirs.len() >= max_depth {
            break;
        }
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        dirs.push(prefix.clone());
    }
    dirs
}

#[derive(Clone, Copy)]
enum Scope {
    /// Root pass; checks the ETA abort once enough items completed.
    Root { eta_after: u64 },
    /// One recursed directory; collects next-level directory candidates.
    Recursion,
    /// One crawl pass; collects newly discovered links.
    Crawl,
}

#[derive(Default)]
struct ScopeOutcome {
    dirs: Vec<String>,
    crawled: Vec<String>,
    aborted: bool,
}

/// Mutable per-target state threaded through the root, recursion, and
/// crawl pipelines.
struct TargetScan<'a> {
    opts: &'a Options,
    requester: Arc<Requester>,
    out: Box<dyn Writer>,
    progress: Arc<Progress>,
    stats: Stats,
    resume: Option<Arc<ResumeState>>,
    scanned: ScannedSet,
    hook: Option<HookRunner>,
    throttler: Arc<Throttler>,
    pauser: Option<Arc<Pauser>>,
    cancel_tx: watch::Sender<bool>,
    cancel_rx: watch::Receiver<bool>,
    keep_body: bool,
    methods: Vec<String>,
    base_paths: Vec<String>,
    /// Every directory candidate, for the `--tree` summary.
    tree_dirs: Vec<String>,
}

impl TargetScan<'_> {
    fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            threads: self.opts.threads,
            throttler: self.throttler.clone(),
            pauser: self.pauser.clone(),
            keep_body: self.keep_body,
        }
    }

    fn launch(&self, items: Vec<WorkItem>) -> mpsc::Receiver<ScanResult> {
        run_worker_pool(self.cancel_rx.clone(), self.requester.clone(), items, self.worker_config())
    }

    /// Drains one result stream through the filter chain: write, hook,
    /// link extraction, directory classification, resume bookkeeping.
    async fn consume(
        &mut self,
        chain: &Chain,
        mut results: mpsc::Receiver<ScanResult>,
        scope: Scope,
    ) -> Result<ScopeOutcome, RunnerError> {
        let mut outcome = ScopeOutcome::default();

        while let Some(mut result) = results.recv().await {
            if outcome.aborted {
                continue;
            }
            self.progress.increment();

            if let Some(resume) = self.resume.as_ref() {
                resume.mark_completed(&result.path);
            }

            if let Scope::Root { eta_after } = scope {
                if !self.opts.max_eta.is_zero()
                    && self.progress.completed() >= eta_after
                    && self.progress.eta() > self.opts.max_eta
                {
                    eprintln!(
                        "[!] Projected remaining time {}s exceeds max ETA {}s, skipping target",
                        self.progress.eta().as_secs(),
                        self.opts.max_eta.as_secs()
                    );
                    let _ = self.cancel_tx.send(true);
                    outcome.aborted = true;
                    continue;
                }
            }

            if let Some(err) = result.error.as_deref() {
                debug!("request {} failed: {err}", result.path);
                self.stats.error_count += 1;
                self.progress.increment_errors();
                continue;
            }

            let (filtered, reason) = chain.apply(&result);
            if filtered {
                result.filtered = true;
                result.filter_reason = reason.to_string();
                self.stats.filtered_count += 1;
                self.progress.increment_filtered();
                continue;
            }

            // Extract links before the body is released.
            if matches!(scope, Scope::Root { .. } | Scope::Crawl) && self.opts.crawl {
                if let Some(body) = result.body.as_deref() {
                    for path in crawl::extract_paths(body, &self.opts.url) {
                        if self.scanned.insert_path(&path) {
                            outcome.crawled.push(path);
                        }
                    }
                }
            }
            result.body = None;

            self.progress.increment_found();
            let progress = self.progress.clone();
            let write = progress.suspend(|| self.out.write_result(&result));
            write.map_err(|source| RunnerError::Output { source })?;

            if let Some(hook) = self.hook.as_ref() {
                hook.run(&result).await;
            }

            if matches!(scope, Scope::Root { .. } | Scope::Recursion)
                && self.opts.recursive
                && !self.opts.vhost
                && looks_like_directory(&result)
            {
                self.tree_dirs.push(result.path.clone());
                if !is_static_asset_dir(&result.path) {
                    outcome.dirs.push(result.path.clone());
                }
            } else if looks_like_directory(&result) {
                self.tree_dirs.push(result.path.clone());
            }
        }

        if let Some(resume) = self.resume.as_ref() {
            if let Err(e) = resume.save() {
                warn!("resume save failed: {e}");
            }
        }

        Ok(outcome)
    }

    /// Breadth-first recursion into discovered directories, re-entering the
    /// pipeline with a recalibrated smart filter per directory.
    async fn run_recursive(&mut self, parent_chain: &Chain, dirs: Vec<String>) -> Result<(), RunnerError> {
        let mut current = dirs;
        let mut depth = 1;

        while depth <= self.opts.max_depth && !current.is_empty() {
            let mut next_dirs = Vec::new();

            for dir in current {
                if *self.cancel_rx.borrow() {
                    return Ok(());
                }

                let dir = dir.trim_end_matches('/').to_lowercase();
                if dir.is_empty() || !self.scanned.insert_dir(&dir) {
                    continue;
                }

                // One probe into the directory; when it matches the parent
                // scope's not-found baseline the whole subtree is a
                // catch-all.
                if let Some(parent_smart) = parent_chain.smart() {
                    let probe_item = WorkItem::new("GET", format!("{dir}/"));
                    if let Ok(resp) = self.requester.probe("GET", &format!("{dir}/"), "").await {
                        let probe_result = ScanResult::from_response(&probe_item, resp, false);
                        if parent_smart.should_filter(&probe_result) {
                            if !self.opts.quiet {
                                self.progress
                                    .println(&format!("[-] Skipping /{dir}/ (matches not-found baseline)"));
                            }
                            continue;
                        }
                    }
                }

                let new_paths: Vec<String> = self
                    .base_paths
                    .iter()
                    .map(|p| format!("{}/{}", dir, p.trim_start_matches('/')))
                    .filter(|p| self.scanned.insert_path(p))
                    .collect();
                if new_paths.is_empty() {
                    continue;
                }

                if !self.opts.quiet {
                    self.progress.println(&format!(
                        "[*] Recursing into /{dir}/ (depth {depth}/{}, {} paths)",
                        self.opts.max_depth,
                        new_paths.len()
                    ));
                }

                let mut chain = parent_chain.rebuild_for_scope();
                if self.opts.smart_filter {
                    match SmartFilter::calibrate(&self.requester, &dir, self.opts.smart_filter_threshold).await {
                        Ok(sf) => chain.add(ScanFilter::Smart(sf)),
                        Err(e) => debug!("smart filter disabled for /{dir}/: {e}"),
                    }
                }
                if self.opts.duplicate_threshold > 0 {
                    chain.add(ScanFilter::Duplicate(DuplicateFilter::new(self.opts.duplicate_threshold)));
                }

                let items = expand_items(&new_paths, &self.methods);
                self.progress.add_total(items.len());
                self.stats.total_requests += items.len();

                let results = self.launch(items);
                let outcome = self.consume(&chain, results, Scope::Recursion).await?;
                next_dirs.extend(outcome.dirs);
            }

            current = next_dirs;
            depth += 1;
        }

        Ok(())
    }

    /// Up to `crawl_depth` link-following passes over newly discovered
    /// paths. Parent directories inferred from every crawled path are
    /// pushed to `inferred_dirs` for the recursion queue.
    async fn run_crawl_passes(
        &mut self,
        chain: &Chain,
        new_paths: Vec<String>,
        inferred_dirs: &mut Vec<String>,
    ) -> Result<(), RunnerError> {
        let mut current = new_paths;
        let mut depth = 1;

        while depth <= self.opts.crawl_depth && !current.is_empty() {
            if *self.cancel_rx.borrow() {
                return Ok(());
            }

            current.sort();
            for path in &current {
                for dir in extract_parent_dirs(path, self.opts.max_depth) {
                    inferred_dirs.push(dir);
                }
            }

            if !self.opts.quiet {
                self.progress.println(&format!(
                    "[*] Crawl pass {depth}/{}: {} new paths discovered",
                    self.opts.crawl_depth,
                    current.len()
                ));
            }

            let items = expand_items(&current, &self.methods);
            self.progress.add_total(items.len());
            self.stats.total_requests += items.len();

            let results = self.launch(items);
            let outcome = self.consume(chain, results, Scope::Crawl).await?;

            current = outcome.crawled;
            depth += 1;
        }

        Ok(())
    }
}

async fn scan_target(opts: &Options) -> Result<(), RunnerError> {
    let mut paths = wordlist::load(&opts.wordlist_path, &opts.extensions, opts.force_extensions)?;

    let requester = Arc::new(Requester::new(opts).map_err(RunnerError::Setup)?);

    let keep_body = !opts.match_body.is_empty() || !opts.exclude_body.is_empty() || opts.crawl;

    // Chain order: status, size, smart-404, duplicate, body-match,
    // body-exclude. First match wins.
    let mut chain = Chain::new();
    if !opts.include_status.is_empty() || !opts.exclude_status.is_empty() {
        chain.add(ScanFilter::Status(StatusFilter::new(
            opts.include_status.clone(),
            opts.exclude_status.clone(),
        )));
    }
    if !opts.exclude_size.is_empty() {
        chain.add(ScanFilter::Size(SizeFilter::new(opts.exclude_size.clone())));
    }

    if opts.smart_filter {
        if !opts.quiet {
            eprintln!("[*] Calibrating smart filter against {} ...", opts.url);
        }
        let calibrated = if opts.vhost {
            SmartFilter::calibrate_vhost(&requester, opts.smart_filter_threshold).await
        } else {
            SmartFilter::calibrate(&requester, "", opts.smart_filter_threshold).await
        };
        match calibrated {
            Ok(sf) => {
                chain.add(ScanFilter::Smart(sf));
                if !opts.quiet {
                    eprintln!("[+] Smart filter ready");
                }
            }
            Err(e) => eprintln!("[!] Smart filter disabled: {e}"),
        }
    }

    if opts.duplicate_threshold > 0 {
        chain.add(ScanFilter::Duplicate(DuplicateFilter::new(opts.duplicate_threshold)));
    }
    if !opts.match_body.is_empty() {
        chain.add(ScanFilter::BodyMatch(BodyMatchFilter::new(opts.match_body.clone())));
    }
    if !opts.exclude_body.is_empty() {
        chain.add(ScanFilter::BodyExclude(BodyExcludeFilter::new(opts.exclude_body.clone())));
    }

    let resume = if opts.resume_file.is_empty() {
        None
    } else {
        match ResumeState::load(&opts.resume_file)? {
            Some(existing) if existing.url() == opts.url => {
                let before = paths.len();
                paths = existing.filter_remaining(paths);
                if !opts.quiet {
                    eprintln!("[+] Resuming: skipping {} already completed paths", before - paths.len());
                }
                Some(Arc::new(existing))
            }
            _ => Some(Arc::new(ResumeState::new(
                opts.resume_file.clone(),
                opts.url.clone(),
                paths.len(),
            ))),
        }
    };

    if paths.is_empty() && !opts.vhost {
        if !opts.quiet {
            eprintln!("[+] All paths already completed");
        }
        return Ok(());
    }

    let mut out = output::create_writer(opts).map_err(|source| RunnerError::Output { source })?;
    out.write_header().map_err(|source| RunnerError::Output { source })?;

    let methods = resolve_methods(opts);
    let scanned = ScannedSet::new();

    let items = if opts.vhost {
        let hostnames = wordlist::load_simple(&opts.vhost_wordlist)?;
        iproduct!(hostnames.iter(), methods.iter())
            .map(|(host, method)| WorkItem::with_host(method.clone(), "/", host.clone()))
            .collect::<Vec<_>>()
    } else {
        for path in &paths {
            scanned.insert_path(path);
        }
        expand_items(&paths, &methods)
    };

    if !opts.quiet {
        print_banner(opts, paths.len());
    }

    let pauser = spawn_pause_listener(opts.quiet);
    let throttler = Arc::new(Throttler::new(opts.delay, opts.adaptive_throttle));
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let progress = Arc::new(Progress::new(items.len(), opts.quiet, pauser.clone()));

    // First SIGINT: flush resume state and stop the pipeline.
    let signal_task = {
        let resume = resume.clone();
        let cancel_tx = cancel_tx.clone();
        let resume_file = opts.resume_file.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                if let Some(state) = resume.as_ref() {
                    let _ = state.save();
                    eprintln!("\n[*] Progress saved to {resume_file} — resume with --resume-file");
                }
                let _ = cancel_tx.send(true);
            }
        })
    };

    let total_items = items.len();
    let mut scan = TargetScan {
        opts,
        requester,
        out,
        progress,
        stats: Stats {
            total_requests: total_items,
            ..Default::default()
        },
        resume,
        scanned,
        hook: if opts.on_result.is_empty() {
            None
        } else {
            Some(HookRunner::new(opts.on_result.clone()))
        },
        throttler,
        pauser,
        cancel_tx,
        cancel_rx,
        keep_body,
        methods,
        base_paths: paths,
        tree_dirs: Vec::new(),
    };

    let start = Instant::now();
    let eta_after = (total_items / 20).max(100) as u64;
    let results = scan.launch(items);
    let root = scan.consume(&chain, results, Scope::Root { eta_after }).await?;

    if !root.aborted {
        if scan.opts.recursive && !scan.opts.vhost && !root.dirs.is_empty() {
            scan.run_recursive(&chain, root.dirs).await?;
        }

        if scan.opts.crawl && !root.crawled.is_empty() {
            let mut inferred_dirs = Vec::new();
            scan.run_crawl_passes(&chain, root.crawled, &mut inferred_dirs).await?;
            if scan.opts.recursive && !scan.opts.vhost && !inferred_dirs.is_empty() {
                scan.run_recursive(&chain, inferred_dirs).await?;
            }
        }
    }

    signal_task.abort();
    scan.progress.finish();

    scan.stats.duration = start.elapsed();
    if scan.stats.duration.as_secs_f64() > 0.0 {
        scan.stats.requests_per_sec = scan.stats.total_requests as f64 / scan.stats.duration.as_secs_f64();
    }

    if !root.aborted {
        if let Some(resume) = scan.resume.as_ref() {
            let _ = resume.remove();
        }
    }

    scan.out
        .write_footer(&scan.stats)
        .map_err(|source| RunnerError::Output { source })?;

    if scan.opts.tree && !scan.tree_dirs.is_empty() {
        let mut stderr = std::io::stderr();
        let _ = output::tree::print_tree(&mut stderr, &scan.tree_dirs);
    }

    Ok(())
}

/// When stdin is a terminal, Enter toggles pause/resume. Returns the gate
/// shared with the worker pool, or None when the scan is non-interactive.
fn spawn_pause_listener(quiet: bool) -> Option<Arc<Pauser>> {
    use std::io::IsTerminal;

    if quiet || !std::io::stdin().is_terminal() {
        return None;
    }

    let pauser = Arc::new(Pauser::new());
    let listener = pauser.clone();
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(_)) = lines.next_line().await {
            if listener.toggle() {
                eprintln!("[*] Scan PAUSED — press Enter to resume");
            } else {
                eprintln!("[*] Scan RESUMED");
            }
        }
    });
    Some(pauser)
}

fn print_banner(opts: &Options, path_count: usize) {
    const ART: &str = r#"
     ___  _      ______
    / _ \(_)____/ ____/_  __________
   / // / / __/ /_/ / / / /_  /_  /
  / ___/ / / / __/ / /_/ / / /_/ /_
 /_/  /_/_/ /_/   \__,_/ /___/___/
"#;

    if opts.no_color {
        eprintln!("{ART}");
    } else {
        eprintln!("{}", ART.cyan());
    }
    eprintln!("    Web Path Brute-Forcer with Smart 404 Detection");
    eprintln!("  ──────────────────────────────────────");
    eprintln!("  Target:       {}", opts.url);
    eprintln!("  Threads:      {}", opts.threads);
    eprintln!("  Wordlist:     {path_count} paths");
    if !opts.extensions.is_empty() {
        eprintln!("  Extensions:   {}", opts.extensions.join(", "));
    }
    if opts.methods.len() > 1 || opts.methods.first().map(String::as_str) != Some("GET") {
        eprintln!("  Methods:      {}", opts.methods.join(", "));
    }
    if opts.vhost {
        eprintln!("  Mode:         Virtual Host Fuzzing");
    }
    let smart = if opts.smart_filter { "ON" } else { "OFF" };
    if opts.no_color {
        eprintln!("  Smart filter: {smart}");
    } else if opts.smart_filter {
        eprintln!("  Smart filter: {}", smart.green());
    } else {
        eprintln!("  Smart filter: {}", smart.red());
    }
    eprintln!("  ──────────────────────────────────────\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_result(path: &str, status_code: u16, redirect_url: &str) -> ScanResult {
        ScanResult {
            path: path.into(),
            status_code,
            redirect_url: redirect_url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn directory_detection_table() {
        assert!(looks_like_directory(&dir_result("admin/", 200, "")));
        assert!(looks_like_directory(&dir_result("admin", 301, "http://example.com/admin/")));
        assert!(looks_like_directory(&dir_result("api/users", 200, "")));
        assert!(looks_like_directory(&dir_result("config", 200, "")));
        assert!(!looks_like_directory(&dir_result("css/style.css", 200, "")));
        assert!(!looks_like_directory(&dir_result("admin", 404, "")));
        assert!(!looks_like_directory(&dir_result("old", 302, "http://example.com/new")));
    }

    #[test]
    fn static_asset_dirs_are_recognized() {
        assert!(is_static_asset_dir("images"));
        assert!(is_static_asset_dir("static/CSS"));
        assert!(is_static_asset_dir("app/assets/"));
        assert!(is_static_asset_dir(".hg"));
        assert!(!is_static_asset_dir("admin"));
        assert!(!is_static_asset_dir("media-kit"));
    }

    #[test]
    fn parent_dir_extraction_table() {
        assert_eq!(extract_parent_dirs("/js/asset/login.js", 3), vec!["js", "js/asset"]);
        assert_eq!(extract_parent_dirs("robots.txt", 3), Vec::<String>::new());
        assert_eq!(extract_parent_dirs("/", 3), Vec::<String>::new());
        assert_eq!(extract_parent_dirs("", 3), Vec::<String>::new());
        assert_eq!(extract_parent_dirs("/a/b/c/d/e/file.txt", 2), vec!["a", "a/b"]);
        assert_eq!(extract_parent_dirs("/api/users", 5), vec!["api"]);
    }

    #[test]
    fn item_expansion_is_a_full_cross_product() {
        let paths = vec!["admin".to_string(), "login".to_string()];
        let methods = vec!["GET".to_string(), "POST".to_string(), "PUT".to_string()];
        let items = expand_items(&paths, &methods);
        assert_eq!(items.len(), 6);

        let unique: HashSet<&WorkItem> = items.iter().collect();
        assert_eq!(unique.len(), items.len());
    }

    #[test]
    fn methods_default_to_get_and_uppercase() {
        let mut opts = Options::for_target("http://example.com");
        opts.methods = vec![];
        assert_eq!(resolve_methods(&opts), vec!["GET"]);

        opts.methods = vec!["get".into(), "Post".into(), "GET".into()];
        assert_eq!(resolve_methods(&opts), vec!["GET", "POST"]);
    }

    #[test]
    fn scanned_set_is_case_insensitive_and_separates_dirs() {
        let set = ScannedSet::new();
        assert!(set.insert_path("Admin"));
        assert!(!set.insert_path("admin"));
        assert!(set.insert_dir("Admin"));
        assert!(!set.insert_dir("admin/"));
    }

    #[test]
    fn targets_require_at_least_one_source() {
        let opts = Options::default();
        assert!(matches!(Runner::new(opts), Err(RunnerError::NoTargets)));
    }

    #[test]
    fn bare_hostnames_get_a_scheme() {
        assert_eq!(normalize_target("example.com"), "http://example.com");
        assert_eq!(normalize_target("https://example.com"), "https://example.com");
    }
}
