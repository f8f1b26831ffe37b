//! Key-value emission of computed results (e.g. the CI step-output file)

use crate::error::{BumpError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for `key=value` results
pub trait KeyValueSink {
    fn emit(&mut self, key: &str, value: &str) -> Result<()>;
}

fn check_line(key: &str, value: &str) -> Result<()> {
    if key.is_empty() || key.contains(['=', '\n', '\r']) {
        return Err(BumpError::output(format!("Invalid output key '{}'", key)));
    }

    if value.contains(['\n', '\r']) {
        return Err(BumpError::output(format!(
            "Output value for '{}' must be a single line",
            key
        )));
    }

    Ok(())
}

/// Appends `key=value` lines to a file, creating it when missing
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueSink for FileSink {
    fn emit(&mut self, key: &str, value: &str) -> Result<()> {
        check_line(key, value)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                BumpError::output(format!("Cannot open {}: {}", self.path.display(), e))
            })?;

        writeln!(file, "{}={}", key, value)?;
        file.sync_all()?;

        Ok(())
    }
}

/// Writes `key=value` lines to any writer (stdout, a buffer)
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        WriterSink::new(std::io::stdout())
    }
}

impl<W: Write> KeyValueSink for WriterSink<W> {
    fn emit(&mut self, key: &str, value: &str) -> Result<()> {
        check_line(key, value)?;
        writeln!(self.writer, "{}={}", key, value)?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<S: KeyValueSink + ?Sized> KeyValueSink for Box<S> {
    fn emit(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).emit(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new());
        sink.emit("version", "v1.2.3-rc1").unwrap();
        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "version=v1.2.3-rc1\n"
        );
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        fs::write(&path, "previous=1\n").unwrap();

        let mut sink = FileSink::new(&path);
        sink.emit("version", "v0.0.1-rc1_pre1").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "previous=1\nversion=v0.0.1-rc1_pre1\n"
        );
    }

    #[test]
    fn test_file_sink_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("new-output");

        FileSink::new(&path).emit("version", "v1.0.0").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "version=v1.0.0\n");
    }

    #[test]
    fn test_file_sink_missing_directory() {
        let mut sink = FileSink::new("/nonexistent/dir/output");
        let err = sink.emit("version", "v1.0.0").unwrap_err();
        assert!(matches!(err, BumpError::Output(_)));
    }

    #[test]
    fn test_rejects_multiline_values() {
        let mut sink = WriterSink::new(Vec::new());
        assert!(sink.emit("version", "v1\nv2").is_err());
        assert!(sink.emit("a=b", "v1").is_err());
        assert!(sink.emit("", "v1").is_err());
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<dyn KeyValueSink> = Box::new(WriterSink::new(Vec::new()));
        sink.emit("version", "v2.0.0").unwrap();
    }
}
