pub mod csv;
pub mod json;
pub mod progress;
pub mod sorted;
pub mod text;
pub mod tree;

pub use csv::CsvWriter;
pub use json::JsonWriter;
pub use progress::Progress;
pub use sorted::SortedWriter;
pub use text::TextWriter;

use std::time::Duration;

use crate::config::Options;
use crate::scanner::ScanResult;

/// Aggregate scan statistics for the footer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub total_requests: usize,
    pub filtered_count: usize,
    pub error_count: usize,
    pub duration: Duration,
    pub requests_per_sec: f64,
}

/// Implemented by each output format. Writers are driven only by the
/// controller task, so they need no internal locking.
pub trait Writer: Send {
    fn write_header(&mut self) -> std::io::Result<()>;
    fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()>;
    fn write_footer(&mut self, stats: &Stats) -> std::io::Result<()>;
}

/// Builds the writer stack for the configured format, wrapping it in a
/// sorting buffer when a sort key is set.
pub fn create_writer(opts: &Options) -> std::io::Result<Box<dyn Writer>> {
    let inner: Box<dyn Writer> = match opts.output_format.as_str() {
        "json" => Box::new(JsonWriter::create(&opts.output_file)?),
        "csv" => Box::new(CsvWriter::create(&opts.output_file)?),
        _ => Box::new(TextWriter::create(&opts.output_file, opts.no_color, opts.quiet)?),
    };
    if opts.sort_by.is_empty() {
        Ok(inner)
    } else {
        Ok(Box::new(SortedWriter::new(inner, &opts.sort_by)))
    }
}

pub(crate) fn open_sink(output_file: &str) -> std::io::Result<Box<dyn std::io::Write + Send>> {
    if output_file.is_empty() {
        Ok(Box::new(std::io::stdout()))
    } else {
        Ok(Box::new(std::fs::File::create(output_file)?))
    }
}
