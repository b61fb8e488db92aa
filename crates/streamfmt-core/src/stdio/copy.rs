//! Composed copy between two file handles.

use std::path::Path;

use super::file::OpenMode;
use super::stream::TextStream;
use crate::error::StreamError;

/// Unit of transfer for [`copy_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyGranularity {
    /// Read a line, write it back followed by `\n`.
    #[default]
    Line,
    /// Read and write one byte at a time; the result is byte-identical.
    Char,
}

/// Totals from a finished copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyReport {
    /// Lines written (newline bytes, for a char copy).
    pub lines: u64,
    /// Bytes written to the destination.
    pub bytes: u64,
}

/// Copy `src` into `dst`, truncating `dst`.
///
/// Both handles are closed before returning, including when the
/// destination fails to open after the source did.
pub fn copy_file(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    granularity: CopyGranularity,
) -> Result<CopyReport, StreamError> {
    let mut input = TextStream::try_open(src, OpenMode::read())?;
    let mut output = match TextStream::try_open(dst, OpenMode::write()) {
        Ok(output) => output,
        Err(e) => {
            input.close()?;
            return Err(e);
        }
    };

    let copied = match granularity {
        CopyGranularity::Line => copy_lines(&mut input, &mut output),
        CopyGranularity::Char => copy_chars(&mut input, &mut output),
    };
    let closed_in = input.close();
    let closed_out = output.close();
    let report = copied?;
    closed_in?;
    closed_out?;
    Ok(report)
}

fn copy_lines(input: &mut TextStream, output: &mut TextStream) -> Result<CopyReport, StreamError> {
    let mut report = CopyReport::default();
    loop {
        let line = match input.read_line_bytes() {
            Ok(line) => line,
            Err(e) if e.is_end_of_input() => return Ok(report),
            Err(e) => return Err(e),
        };
        for &b in &line {
            output.put(b)?;
        }
        output.put(b'\n')?;
        report.lines += 1;
        report.bytes += line.len() as u64 + 1;
    }
}

fn copy_chars(input: &mut TextStream, output: &mut TextStream) -> Result<CopyReport, StreamError> {
    let mut report = CopyReport::default();
    loop {
        let byte = match input.read_char() {
            Ok(b) => b,
            Err(e) if e.is_end_of_input() => return Ok(report),
            Err(e) => return Err(e),
        };
        output.put(byte)?;
        report.bytes += 1;
        if byte == b'\n' {
            report.lines += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!(
            "streamfmt-copy-{tag}-{}-{nanos}.txt",
            std::process::id()
        ))
    }

    #[test]
    fn missing_source_is_resource_unavailable() {
        let src = temp_path("missing-src");
        let dst = temp_path("missing-dst");
        let err = copy_file(&src, &dst, CopyGranularity::Line).unwrap_err();
        assert!(err.is_open_failure());
        assert!(!dst.exists());
    }

    #[test]
    fn line_copy_adds_final_newline() {
        let src = temp_path("line-src");
        let dst = temp_path("line-dst");
        std::fs::write(&src, "one\ntwo").unwrap();
        let report = copy_file(&src, &dst, CopyGranularity::Line).unwrap();
        assert_eq!(report, CopyReport { lines: 2, bytes: 8 });
        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "one\ntwo\n");
        let _ = std::fs::remove_file(&src);
        let _ = std::fs::remove_file(&dst);
    }

    #[test]
    fn char_copy_counts_bytes() {
        let src = temp_path("char-src");
        let dst = temp_path("char-dst");
        std::fs::write(&src, "a b\n\tc").unwrap();
        let report = copy_file(&src, &dst, CopyGranularity::Char).unwrap();
        assert_eq!(report, CopyReport { lines: 1, bytes: 6 });
        let _ = std::fs::remove_file(&src);
        let _ = std::fs::remove_file(&dst);
    }
}
