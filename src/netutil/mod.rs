use std::net::IpAddr;

use ipnet::IpNet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CidrError {
    #[error("invalid CIDR or IP: {0}")]
    Invalid(String),
}

/// Expands a CIDR range (or a bare IP) and a comma-separated port list into
/// base URLs `scheme://host[:port]`. Network and broadcast addresses are
/// skipped for ranges wider than /31. Default ports for the scheme are
/// omitted from the URL.
pub fn expand_targets(cidr: &str, ports: &str, scheme: &str) -> Result<Vec<String>, CidrError> {
    let net: IpNet = match cidr.parse() {
        Ok(net) => net,
        Err(_) => {
            let ip: IpAddr = cidr.parse().map_err(|_| CidrError::Invalid(cidr.to_string()))?;
            IpNet::from(ip)
        }
    };

    let ports = parse_ports(ports, scheme);

    let mut urls = Vec::new();
    // hosts() excludes network/broadcast addresses for wide IPv4 ranges.
    for addr in net.hosts() {
        push_urls(&mut urls, scheme, addr, &ports);
    }

    Ok(urls)
}

fn push_urls(urls: &mut Vec<String>, scheme: &str, addr: IpAddr, ports: &[String]) {
    for port in ports {
        let default = (scheme == "http" && port == "80") || (scheme == "https" && port == "443");
        if default {
            urls.push(format!("{scheme}://{addr}"));
        } else {
            urls.push(format!("{scheme}://{addr}:{port}"));
        }
    }
}

fn parse_ports(ports: &str, scheme: &str) -> Vec<String> {
    let parsed: Vec<String> = ports
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();
    if parsed.is_empty() {
        let default = if scheme == "https" { "443" } else { "80" };
        return vec![default.to_string()];
    }
    parsed
}
