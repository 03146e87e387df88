use std::time::Duration;

use clap::Parser;

use crate::cli::args::CliArgs;
use crate::cli::validation::{self, parse_string_csv, parse_u16_csv, parse_u64_csv};
use crate::config::{self, ConfigFile, Options};
use crate::runner::Runner;

/// Merges CLI flags over the optional config file into runtime options.
/// Explicit flags always win; the file fills in the rest.
fn build_options(args: CliArgs, cfg: ConfigFile) -> Result<Options, String> {
    validation::validate(&args)?;

    let mut opts = Options::default();

    opts.url = args.url.or(cfg.url).unwrap_or_default();
    opts.urls_file = args.urls_file.or(cfg.urls_file);
    opts.cidr = args.cidr.or(cfg.cidr);
    opts.ports = args.ports.or(cfg.ports).unwrap_or_default();
    opts.request_file = args.request_file;

    opts.wordlist_path = args
        .wordlist
        .or(cfg.wordlist)
        .map(|p| config::expand_tilde_string(&p))
        .unwrap_or_default();
    let extensions_raw = args.extensions.or(cfg.extensions).unwrap_or_default();
    opts.extensions = parse_string_csv(&extensions_raw);
    opts.force_extensions = args.force_extensions || cfg.force_extensions.unwrap_or(false);

    let methods_raw = args.methods.or(cfg.methods).unwrap_or_default();
    if !methods_raw.trim().is_empty() {
        opts.methods = parse_string_csv(&methods_raw);
    }

    let mut header_lines = args.headers;
    if header_lines.is_empty() {
        header_lines = cfg.headers.unwrap_or_default();
    }
    for line in header_lines {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| format!("invalid header format {line:?}, expected 'Key: Value'"))?;
        opts.headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    opts.user_agent = args.user_agent.or(cfg.user_agent).unwrap_or_default();
    opts.proxy = args.proxy.or(cfg.proxy);
    opts.follow_redirects = args.follow_redirects || cfg.follow_redirects.unwrap_or(false);
    opts.timeout = Duration::from_secs(pick(args.timeout, 10, cfg.timeout_seconds));

    opts.threads = pick(args.threads, 25, cfg.threads);
    opts.delay = Duration::from_millis(pick(args.delay, 0, cfg.delay_ms));
    opts.adaptive_throttle = args.adaptive_throttle || cfg.adaptive_throttle.unwrap_or(false);
    opts.max_eta = Duration::from_secs(pick(args.max_eta, 3600, cfg.max_eta_seconds));

    opts.smart_filter = if !args.smart_filter {
        false
    } else {
        cfg.smart_filter.unwrap_or(true)
    };
    opts.smart_filter_threshold = pick(args.smart_filter_threshold, 50, cfg.smart_filter_threshold);
    opts.smart_filter_per_dir = args.smart_filter_per_dir || cfg.smart_filter_per_dir.unwrap_or(true);
    opts.duplicate_threshold = pick(args.duplicate_threshold, 3, cfg.duplicate_threshold);

    let include_raw = args.include_status.or(cfg.include_status).unwrap_or_default();
    opts.include_status = parse_u16_csv(&include_raw)?;
    let exclude_raw = args.exclude_status.or(cfg.exclude_status).unwrap_or_default();
    opts.exclude_status = parse_u16_csv(&exclude_raw)?;
    let sizes_raw = args.exclude_size.or(cfg.exclude_size).unwrap_or_default();
    opts.exclude_size = parse_u64_csv(&sizes_raw)?;
    opts.match_body = args.match_body.or(cfg.match_body).unwrap_or_default();
    opts.exclude_body = args.exclude_body.or(cfg.exclude_body).unwrap_or_default();

    opts.recursive = args.recursive || cfg.recursive.unwrap_or(false);
    opts.max_depth = pick(args.max_depth, 3, cfg.max_depth);
    opts.crawl = args.crawl || cfg.crawl.unwrap_or(false);
    opts.crawl_depth = pick(args.crawl_depth, 2, cfg.crawl_depth);
    opts.vhost = args.vhost || cfg.vhost.unwrap_or(false);
    opts.vhost_wordlist = args
        .vhost_wordlist
        .or(cfg.vhost_wordlist)
        .map(|p| config::expand_tilde_string(&p))
        .unwrap_or_default();

    opts.output_file = args.output.or(cfg.output).unwrap_or_default();
    opts.output_format = if args.format != "text" {
        args.format
    } else {
        cfg.format.unwrap_or(args.format)
    };
    opts.sort_by = args.sort.or(cfg.sort).unwrap_or_default();
    opts.tree = args.tree || cfg.tree.unwrap_or(false);
    opts.quiet = args.quiet || cfg.quiet.unwrap_or(false);
    opts.no_color = args.no_color || cfg.no_color.unwrap_or(false);

    opts.resume_file = args
        .resume_file
        .or(cfg.resume_file)
        .map(|p| config::expand_tilde_string(&p))
        .unwrap_or_default();
    opts.on_result = args.on_result.or(cfg.on_result).unwrap_or_default();

    Ok(opts)
}

/// CLI value when it differs from its default, else the config file value,
/// else the default.
fn pick<T: Copy + PartialEq>(cli: T, default: T, file: Option<T>) -> T {
    if cli != default {
        cli
    } else {
        file.unwrap_or(default)
    }
}

pub fn run_cli() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = CliArgs::parse();

    let cfg = match args.config.clone() {
        Some(path) => config::load_config(&config::expand_tilde(&path))?,
        None => ConfigFile::default(),
    };

    let opts = build_options(args, cfg)?;
    if opts.no_color {
        colored::control::set_override(false);
    }

    let runner = Runner::new(opts).map_err(|e| e.to_string())?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    rt.block_on(runner.run()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["dirfuzz", "-u", "http://example.com"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn cli_flags_override_config_file() {
        let args = parse(&["-t", "100"]);
        let cfg = ConfigFile {
            threads: Some(50),
            ..Default::default()
        };
        let opts = build_options(args, cfg).unwrap();
        assert_eq!(opts.threads, 100);
    }

    #[test]
    fn config_file_fills_defaults() {
        let args = parse(&[]);
        let cfg = ConfigFile {
            threads: Some(50),
            exclude_status: Some("404,500".to_string()),
            smart_filter: Some(false),
            ..Default::default()
        };
        let opts = build_options(args, cfg).unwrap();
        assert_eq!(opts.threads, 50);
        assert_eq!(opts.exclude_status, vec![404, 500]);
        assert!(!opts.smart_filter);
    }

    #[test]
    fn headers_are_parsed_into_the_map() {
        let args = parse(&["-H", "X-Api-Key: secret", "-H", "Cookie: a=b"]);
        let opts = build_options(args, ConfigFile::default()).unwrap();
        assert_eq!(opts.headers["X-Api-Key"], "secret");
        assert_eq!(opts.headers["Cookie"], "a=b");
    }

    #[test]
    fn durations_come_from_seconds_and_millis() {
        let args = parse(&["--timeout", "5", "--delay", "250", "--max-eta", "0"]);
        let opts = build_options(args, ConfigFile::default()).unwrap();
        assert_eq!(opts.timeout, Duration::from_secs(5));
        assert_eq!(opts.delay, Duration::from_millis(250));
        assert!(opts.max_eta.is_zero());
    }

    #[test]
    fn extensions_and_methods_split_on_commas() {
        let args = parse(&["-e", "php, html", "--methods", "get,post"]);
        let opts = build_options(args, ConfigFile::default()).unwrap();
        assert_eq!(opts.extensions, vec!["php", "html"]);
        assert_eq!(opts.methods, vec!["get", "post"]);
    }
}
