use super::{Stats, Writer};
use crate::scanner::ScanResult;

/// Buffers every result and replays them sorted by the configured key when
/// the footer is written. Wraps any other writer.
pub struct SortedWriter {
    inner: Box<dyn Writer>,
    sort_by: String,
    results: Vec<ScanResult>,
}

impl SortedWriter {
    pub fn new(inner: Box<dyn Writer>, sort_by: &str) -> Self {
        Self {
            inner,
            sort_by: sort_by.to_string(),
            results: Vec::new(),
        }
    }
}

impl Writer for SortedWriter {
    fn write_header(&mut self) -> std::io::Result<()> {
        self.inner.write_header()
    }

    fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn write_footer(&mut self, stats: &Stats) -> std::io::Result<()> {
        match self.sort_by.as_str() {
            "status" => self.results.sort_by_key(|r| r.status_code),
            "size" => self.results.sort_by_key(|r| r.content_length),
            "path" => self.results.sort_by(|a, b| a.path.cmp(&b.path)),
            _ => {}
        }
        for result in &self.results {
            self.inner.write_result(result)?;
        }
        self.inner.write_footer(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingWriter {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl Writer for RecordingWriter {
        fn write_header(&mut self) -> std::io::Result<()> {
            Ok(())
        }
        fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()> {
            self.lines.lock().unwrap().push(result.path.clone());
            Ok(())
        }
        fn write_footer(&mut self, _stats: &Stats) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn result(path: &str, status_code: u16) -> ScanResult {
        ScanResult {
            path: path.into(),
            status_code,
            ..Default::default()
        }
    }

    #[test]
    fn replays_sorted_by_status_on_footer() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut writer = SortedWriter::new(
            Box::new(RecordingWriter { lines: lines.clone() }),
            "status",
        );

        writer.write_result(&result("c", 500)).unwrap();
        writer.write_result(&result("a", 200)).unwrap();
        writer.write_result(&result("b", 301)).unwrap();
        assert!(lines.lock().unwrap().is_empty());

        writer.write_footer(&Stats::default()).unwrap();
        assert_eq!(*lines.lock().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn replays_sorted_by_path() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut writer = SortedWriter::new(Box::new(RecordingWriter { lines: lines.clone() }), "path");

        writer.write_result(&result("zeta", 200)).unwrap();
        writer.write_result(&result("alpha", 200)).unwrap();
        writer.write_footer(&Stats::default()).unwrap();
        assert_eq!(*lines.lock().unwrap(), vec!["alpha", "zeta"]);
    }
}
