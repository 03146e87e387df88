use std::io::Write;

use super::{open_sink, Stats, Writer};
use crate::scanner::ScanResult;

/// RFC 4180 style quoting for fields containing separators or quotes.
fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub struct CsvWriter {
    sink: Box<dyn Write + Send>,
}

impl CsvWriter {
    pub fn create(output_file: &str) -> std::io::Result<Self> {
        Ok(Self {
            sink: open_sink(output_file)?,
        })
    }
}

impl Writer for CsvWriter {
    fn write_header(&mut self) -> std::io::Result<()> {
        writeln!(self.sink, "url,path,status,size,redirect")
    }

    fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()> {
        writeln!(
            self.sink,
            "{},{},{},{},{}",
            escape_csv(&result.url),
            escape_csv(&result.path),
            result.status_code,
            result.content_length,
            escape_csv(&result.redirect_url),
        )
    }

    fn write_footer(&mut self, _stats: &Stats) -> std::io::Result<()> {
        self.sink.flush()
    }
}
