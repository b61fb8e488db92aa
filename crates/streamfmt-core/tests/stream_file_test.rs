//! File-backed stream behavior: open failures, dispositions, buffering,
//! end-of-input, and copy fidelity.

use std::fs;
use std::path::PathBuf;

use streamfmt_core::StreamError;
use streamfmt_core::stdio::{
    AccessMode, BUFSIZ, BufMode, CopyGranularity, Disposition, HandleState, Manip, OpenMode, TextStream,
    copy_file,
};

fn temp_path(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "streamfmt-{tag}-{}-{nanos}.txt",
        std::process::id()
    ))
}

struct Cleanup(Vec<PathBuf>);

impl Drop for Cleanup {
    fn drop(&mut self) {
        for p in &self.0 {
            let _ = fs::remove_file(p);
        }
    }
}

fn read_lines(path: &PathBuf) -> Vec<String> {
    let mut s = TextStream::try_open(path, OpenMode::read()).unwrap();
    s.lines().map(Result::unwrap).collect()
}

#[test]
fn missing_file_leaves_handle_not_good() {
    let path = temp_path("missing");
    let mut s = TextStream::new();
    let err = s.open(&path, OpenMode::read()).unwrap_err();
    assert!(matches!(err, StreamError::ResourceUnavailable { .. }));
    assert_eq!(s.state(), HandleState::Unopened);
    assert!(!s.good());
    assert!(!s.ok());

    assert!(s.read_line().is_err());
    assert!(s.read_char().is_err());
    assert!(s.read_token::<i32>().is_err());
    assert!(!s.ok());
}

#[test]
fn opened_constructor_reports_through_flags() {
    let path = temp_path("opened-missing");
    let s = TextStream::opened(&path, OpenMode::read());
    assert!(!s.is_open());
    assert!(s.fail());
}

#[test]
fn n_line_file_drains_exactly_n_lines() {
    let path = temp_path("drain");
    let _cleanup = Cleanup(vec![path.clone()]);
    for n in [0usize, 1, 3, 10_000] {
        let text: String = (0..n).map(|i| format!("row {i}\n")).collect();
        fs::write(&path, &text).unwrap();

        let mut s = TextStream::try_open(&path, OpenMode::read()).unwrap();
        let mut count = 0;
        loop {
            match s.read_line() {
                Ok(line) => {
                    assert_eq!(line, format!("row {count}"));
                    count += 1;
                }
                Err(e) => {
                    assert!(e.is_end_of_input(), "unexpected error {e}");
                    break;
                }
            }
        }
        assert_eq!(count, n);
        assert!(s.eof());
        s.close().unwrap();
    }
}

#[test]
fn buffered_writes_absent_until_close() {
    let path = temp_path("hazard");
    let _cleanup = Cleanup(vec![path.clone()]);

    let mut s = TextStream::try_open(&path, OpenMode::write()).unwrap();
    s.write(100)
        .and_then(|s| s.put(b'\n'))
        .and_then(|s| s.write(1234.5))
        .and_then(|s| s.put(b'\n'))
        .unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    s.close().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "100\n1234.5\n");
    assert_eq!(s.state(), HandleState::Closed);
    s.close().unwrap();
}

#[test]
fn drop_flushes_pending_output() {
    let path = temp_path("drop");
    let _cleanup = Cleanup(vec![path.clone()]);
    {
        let mut s = TextStream::try_open(&path, OpenMode::write()).unwrap();
        s.write_str("kept").unwrap();
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), "kept");
}

#[test]
fn end_line_flushes_immediately() {
    let path = temp_path("endl");
    let _cleanup = Cleanup(vec![path.clone()]);
    let mut s = TextStream::try_open(&path, OpenMode::write()).unwrap();
    s.write("Larry").and_then(|s| s.end_line()).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "Larry\n");
}

#[test]
fn line_buffering_spills_on_newline() {
    let path = temp_path("linebuf");
    let _cleanup = Cleanup(vec![path.clone()]);
    let mut s = TextStream::try_open(&path, OpenMode::write()).unwrap();
    assert!(s.set_buffering(BufMode::Line, 64));
    s.write_str("one\ntw").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "one\n");
    s.close().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntw");
}

#[test]
fn truncate_and_append_dispositions() {
    let path = temp_path("disposition");
    let _cleanup = Cleanup(vec![path.clone()]);
    fs::write(&path, "old\n").unwrap();

    let mut s = TextStream::try_open(&path, OpenMode::append()).unwrap();
    s.write_str("new\n").unwrap();
    s.close().unwrap();
    assert_eq!(read_lines(&path), ["old", "new"]);

    let mut s = TextStream::try_open(&path, OpenMode::write()).unwrap();
    s.write_str("only\n").unwrap();
    s.close().unwrap();
    assert_eq!(read_lines(&path), ["only"]);
}

#[test]
fn open_existing_requires_file() {
    let path = temp_path("existing");
    let mode = OpenMode::new(AccessMode::Write, Disposition::OpenExisting);
    assert!(TextStream::try_open(&path, mode).unwrap_err().is_open_failure());
    assert!(!path.exists());
}

#[test]
fn read_write_handle_switches_direction() {
    let path = temp_path("readwrite");
    let _cleanup = Cleanup(vec![path.clone()]);
    fs::write(&path, "abc\ndef\n").unwrap();

    let mode = OpenMode::new(AccessMode::ReadWrite, Disposition::CreateIfMissing);
    let mut s = TextStream::try_open(&path, mode).unwrap();
    assert_eq!(s.read_line().unwrap(), "abc");
    s.write_str("XYZ").unwrap();
    s.close().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "abc\nXYZ\n");
}

#[test]
fn token_records_round_trip_through_file() {
    let path = temp_path("records");
    let _cleanup = Cleanup(vec![path.clone()]);

    let mut out = TextStream::try_open(&path, OpenMode::write()).unwrap();
    out.manip(Manip::Fixed).manip(Manip::SetPrecision(2));
    out.write(100)
        .and_then(|s| s.end_line())
        .and_then(|s| s.write(1234.5))
        .and_then(|s| s.end_line())
        .and_then(|s| s.write("Larry"))
        .and_then(|s| s.end_line())
        .unwrap();
    out.close().unwrap();

    let mut input = TextStream::try_open(&path, OpenMode::read()).unwrap();
    assert_eq!(input.read_token::<i32>().unwrap(), 100);
    assert_eq!(input.read_token::<f64>().unwrap(), 1234.5);
    assert_eq!(input.read_token::<String>().unwrap(), "Larry");
    assert!(input.read_token::<String>().unwrap_err().is_end_of_input());
}

#[test]
fn line_copy_preserves_line_sequence() {
    let src = temp_path("copy-line-src");
    let dst = temp_path("copy-line-dst");
    let _cleanup = Cleanup(vec![src.clone(), dst.clone()]);
    fs::write(&src, "alpha\n\n  beta gamma\ndelta\n").unwrap();

    let report = copy_file(&src, &dst, CopyGranularity::Line).unwrap();
    assert_eq!(report.lines, 4);
    assert_eq!(read_lines(&src), read_lines(&dst));
}

#[test]
fn char_copy_is_byte_identical() {
    let src = temp_path("copy-char-src");
    let dst = temp_path("copy-char-dst");
    let _cleanup = Cleanup(vec![src.clone(), dst.clone()]);
    let payload: Vec<u8> = (0u8..=255).cycle().take(20_000).collect();
    fs::write(&src, &payload).unwrap();

    let report = copy_file(&src, &dst, CopyGranularity::Char).unwrap();
    assert_eq!(report.bytes, payload.len() as u64);
    assert_eq!(fs::read(&dst).unwrap(), payload);
}

#[test]
fn copy_truncates_existing_destination() {
    let src = temp_path("copy-trunc-src");
    let dst = temp_path("copy-trunc-dst");
    let _cleanup = Cleanup(vec![src.clone(), dst.clone()]);
    fs::write(&src, "short\n").unwrap();
    fs::write(&dst, "a much longer previous body\n").unwrap();

    copy_file(&src, &dst, CopyGranularity::Char).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "short\n");
}

#[test]
fn full_buffer_spills_once_capacity_is_exceeded() {
    let path = temp_path("spill");
    let _cleanup = Cleanup(vec![path.clone()]);
    let record = format!("{}\n", "x".repeat(99));

    let mut s = TextStream::try_open(&path, OpenMode::write()).unwrap();
    for _ in 0..100 {
        s.write_str(&record).unwrap();
    }
    // 81 records fit in the buffer; the 82nd pushes all 82 to the file.
    let spilled = fs::metadata(&path).unwrap().len();
    assert_eq!(spilled, 8200);
    assert!(spilled > BUFSIZ as u64);
    s.close().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 10_000);
    assert_eq!(read_lines(&path).len(), 100);
}

#[test]
fn line_copy_spans_several_buffers() {
    let src = temp_path("copy-big-src");
    let dst = temp_path("copy-big-dst");
    let _cleanup = Cleanup(vec![src.clone(), dst.clone()]);
    let body: String = (0..1000).map(|i| format!("line {i:05} of the copy\n")).collect();
    assert!(body.len() > 2 * BUFSIZ);
    fs::write(&src, &body).unwrap();

    let report = copy_file(&src, &dst, CopyGranularity::Line).unwrap();
    assert_eq!(report.lines, 1000);
    assert_eq!(report.bytes, body.len() as u64);
    assert_eq!(fs::read_to_string(&dst).unwrap(), body);
}

#[test]
fn char_copy_of_several_buffers() {
    let src = temp_path("copy-char-big-src");
    let dst = temp_path("copy-char-big-dst");
    let _cleanup = Cleanup(vec![src.clone(), dst.clone()]);
    let payload: Vec<u8> = (0..30_000u32).map(|i| b"abc\n"[(i % 4) as usize]).collect();
    fs::write(&src, &payload).unwrap();

    let report = copy_file(&src, &dst, CopyGranularity::Char).unwrap();
    assert_eq!(report.bytes, 30_000);
    assert_eq!(report.lines, 7_500);
    assert_eq!(fs::read(&dst).unwrap(), payload);
}

#[test]
fn write_after_read_past_a_refill_lands_at_read_position() {
    let path = temp_path("refill-switch");
    let _cleanup = Cleanup(vec![path.clone()]);
    let original: Vec<u8> = (0..20_000u32).map(|i| b'a' + (i % 26) as u8).collect();
    fs::write(&path, &original).unwrap();

    let mode = OpenMode::new(AccessMode::ReadWrite, Disposition::OpenExisting);
    let mut s = TextStream::try_open(&path, mode).unwrap();
    for expected in &original[..10_000] {
        assert_eq!(s.read_char().unwrap(), *expected);
    }
    s.write_str("XYZ").unwrap();
    s.close().unwrap();

    let mut expected = original.clone();
    expected[10_000..10_003].copy_from_slice(b"XYZ");
    assert_eq!(fs::read(&path).unwrap(), expected);
}
