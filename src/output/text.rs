use std::io::Write;

use colored::Colorize;

use super::{open_sink, Stats, Writer};
use crate::scanner::ScanResult;

/// One line per accepted result:
/// `<status> <size> [<method>] [<host>] <url> [-> <redirect>]`.
pub struct TextWriter {
    sink: Box<dyn Write + Send>,
    colored: bool,
    quiet: bool,
}

impl TextWriter {
    pub fn create(output_file: &str, no_color: bool, quiet: bool) -> std::io::Result<Self> {
        // Never color when writing to a file.
        let colored = !no_color && output_file.is_empty();
        Ok(Self {
            sink: open_sink(output_file)?,
            colored,
            quiet,
        })
    }

    fn status_cell(&self, status_code: u16) -> String {
        let cell = format!("{status_code:3}");
        if !self.colored {
            return cell;
        }
        match status_code {
            200..=299 => cell.green().to_string(),
            300..=399 => cell.cyan().to_string(),
            400..=499 => cell.yellow().to_string(),
            500..=599 => cell.red().to_string(),
            _ => cell,
        }
    }
}

impl Writer for TextWriter {
    fn write_header(&mut self) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let header = "Code      Size  URL";
        if self.colored {
            writeln!(self.sink, "{}", header.dimmed())
        } else {
            writeln!(self.sink, "{header}")
        }
    }

    fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()> {
        let mut prefix = String::new();
        if !result.method.is_empty() && result.method != "GET" {
            prefix.push_str(&format!("[{}] ", result.method));
        }
        if !result.host.is_empty() {
            prefix.push_str(&format!("[{}] ", result.host));
        }

        let redirect = if result.redirect_url.is_empty() {
            String::new()
        } else {
            format!(" -> {}", result.redirect_url)
        };

        writeln!(
            self.sink,
            "{}  {:8}  {}{}{}",
            self.status_cell(result.status_code),
            result.content_length,
            prefix,
            result.url,
            redirect,
        )
    }

    fn write_footer(&mut self, stats: &Stats) -> std::io::Result<()> {
        self.sink.flush()?;
        if self.quiet {
            return Ok(());
        }
        eprintln!(
            "\nCompleted: {} requests | Filtered: {} | Errors: {} | Duration: {:.1}s | {:.1} req/s",
            stats.total_requests,
            stats.filtered_count,
            stats.error_count,
            stats.duration.as_secs_f64(),
            stats.requests_per_sec,
        );
        Ok(())
    }
}
