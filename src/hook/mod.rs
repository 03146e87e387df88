use std::process::Stdio;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::scanner::ScanResult;

const HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// JSON payload written to the hook command's stdin.
#[derive(Serialize)]
struct HookPayload<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    host: &'a str,
    url: &'a str,
    path: &'a str,
    status: u16,
    size: u64,
    #[serde(skip_serializing_if = "str::is_empty")]
    redirect: &'a str,
    words: usize,
    lines: usize,
}

/// Runs a shell command for each result that survives the filter chain.
/// Hook failures are logged and never halt the scan.
pub struct HookRunner {
    cmd: String,
}

impl HookRunner {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub async fn run(&self, result: &ScanResult) {
        let payload = HookPayload {
            method: &result.method,
            host: &result.host,
            url: &result.url,
            path: &result.path,
            status: result.status_code,
            size: result.content_length,
            redirect: &result.redirect_url,
            words: result.word_count,
            lines: result.line_count,
        };
        let data = match serde_json::to_vec(&payload) {
            Ok(data) => data,
            Err(e) => {
                warn!("hook payload serialization failed: {e}");
                return;
            }
        };

        let expanded = expand_placeholders(&self.cmd, result);
        let (shell, flag) = shell_command();

        let mut child = match Command::new(shell)
            .arg(flag)
            .arg(&expanded)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!("hook spawn failed: {e}");
                return;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&data).await {
                warn!("hook stdin write failed: {e}");
            }
        }

        match tokio::time::timeout(HOOK_TIMEOUT, child.wait_with_output()).await {
            Ok(Ok(output)) => {
                if !output.stdout.is_empty() {
                    info!("hook: {}", String::from_utf8_lossy(&output.stdout).trim_end());
                }
                if !output.status.success() {
                    warn!("hook exited with {}", output.status);
                }
            }
            Ok(Err(e)) => warn!("hook wait failed: {e}"),
            Err(_) => warn!("hook timed out after {HOOK_TIMEOUT:?}"),
        }
    }
}

fn expand_placeholders(cmd: &str, result: &ScanResult) -> String {
    cmd.replace("{url}", &result.url)
        .replace("{path}", &result.path)
        .replace("{status}", &result.status_code.to_string())
        .replace("{size}", &result.content_length.to_string())
        .replace("{method}", &result.method)
        .replace("{host}", &result.host)
}

#[cfg(target_os = "windows")]
fn shell_command() -> (&'static str, &'static str) {
    ("cmd", "/C")
}

#[cfg(not(target_os = "windows"))]
fn shell_command() -> (&'static str, &'static str) {
    ("sh", "-c")
}
