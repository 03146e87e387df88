use std::io::Write;

use serde::Serialize;

use super::{open_sink, Stats, Writer};
use crate::scanner::ScanResult;

#[derive(Serialize)]
struct JsonEntry {
    method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    host: String,
    url: String,
    path: String,
    status: u16,
    size: u64,
    #[serde(skip_serializing_if = "String::is_empty")]
    redirect: String,
}

/// Buffers results and writes one JSON array at the end of the scan.
pub struct JsonWriter {
    sink: Box<dyn Write + Send>,
    entries: Vec<JsonEntry>,
}

impl JsonWriter {
    pub fn create(output_file: &str) -> std::io::Result<Self> {
        Ok(Self {
            sink: open_sink(output_file)?,
            entries: Vec::new(),
        })
    }
}

impl Writer for JsonWriter {
    fn write_header(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    fn write_result(&mut self, result: &ScanResult) -> std::io::Result<()> {
        self.entries.push(JsonEntry {
            method: result.method.clone(),
            host: result.host.clone(),
            url: result.url.clone(),
            path: result.path.clone(),
            status: result.status_code,
            size: result.content_length,
            redirect: result.redirect_url.clone(),
        });
        Ok(())
    }

    fn write_footer(&mut self, _stats: &Stats) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, &self.entries)?;
        writeln!(self.sink)?;
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_an_array_with_optional_fields_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut writer = JsonWriter::create(path.to_str().unwrap()).unwrap();

        writer
            .write_result(&ScanResult {
                method: "GET".into(),
                path: "admin".into(),
                url: "http://example.com/admin".into(),
                status_code: 200,
                content_length: 100,
                ..Default::default()
            })
            .unwrap();
        writer
            .write_result(&ScanResult {
                method: "GET".into(),
                host: "dev.example.com".into(),
                path: "/".into(),
                url: "http://example.com/".into(),
                status_code: 302,
                redirect_url: "http://example.com/login".into(),
                ..Default::default()
            })
            .unwrap();
        writer.write_footer(&Stats::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].get("host").is_none());
        assert!(entries[0].get("redirect").is_none());
        assert_eq!(entries[1]["host"], "dev.example.com");
        assert_eq!(entries[1]["redirect"], "http://example.com/login");
    }
}
