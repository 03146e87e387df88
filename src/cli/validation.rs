use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if args.url.is_none() && args.urls_file.is_none() && args.cidr.is_none() && args.request_file.is_none() {
        return Err("target required: use -u, -l, --cidr, or --request-file".to_string());
    }
    if args.include_status.is_some() && args.exclude_status.is_some() {
        return Err("--include-status and --exclude-status are mutually exclusive".to_string());
    }
    if args.vhost && args.recursive {
        return Err("--vhost and --recursive are mutually exclusive".to_string());
    }
    if let Some(sort) = args.sort.as_deref() {
        if !matches!(sort, "status" | "path" | "size") {
            return Err("--sort must be one of: status, path, size".to_string());
        }
    }
    if !matches!(args.format.as_str(), "text" | "json" | "csv") {
        return Err("--format must be one of: text, json, csv".to_string());
    }
    if args.max_depth == 0 {
        return Err("invalid --max-depth, expected positive integer".to_string());
    }
    if args.crawl_depth == 0 {
        return Err("invalid --crawl-depth, expected positive integer".to_string());
    }
    if args.threads == 0 {
        return Err("invalid --threads, expected positive integer".to_string());
    }
    for raw in [args.include_status.as_deref(), args.exclude_status.as_deref()]
        .into_iter()
        .flatten()
    {
        parse_u16_csv(raw).map_err(|e| format!("invalid status list '{raw}': {e}"))?;
    }
    if let Some(raw) = args.exclude_size.as_deref() {
        parse_u64_csv(raw).map_err(|e| format!("invalid --exclude-size '{raw}': {e}"))?;
    }
    for header in &args.headers {
        if !header.contains(':') {
            return Err(format!("invalid header format {header:?}, expected 'Key: Value'"));
        }
    }
    Ok(())
}

pub fn parse_u16_csv(raw: &str) -> Result<Vec<u16>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u16>().map_err(|_| format!("invalid value '{s}'")))
        .collect()
}

pub fn parse_u64_csv(raw: &str) -> Result<Vec<u64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().map_err(|_| format!("invalid value '{s}'")))
        .collect()
}

pub fn parse_string_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
