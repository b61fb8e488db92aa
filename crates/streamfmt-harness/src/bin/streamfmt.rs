//! CLI entrypoint for streamfmt.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use streamfmt_core::StreamError;
use streamfmt_core::stdio::{CopyGranularity, OpenMode, TextStream, copy_file, validate_integer};
use streamfmt_core::types::{demo_array_layouts, size_report, write_array_report, write_size_report};
use streamfmt_harness::fixtures::fixture_paths;
use streamfmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, now_utc, run_id, sha256_file,
};
use streamfmt_harness::{
    ConformanceReport, FixtureSet, HarnessConfig, HarnessError, TestRunner, VerificationSummary,
};

/// Text stream formatting and file I/O tools.
#[derive(Debug, Parser)]
#[command(name = "streamfmt")]
#[command(about = "Text stream formatting and file I/O tools")]
struct Cli {
    /// Minimum log level (overrides STREAMFMT_LOG_LEVEL).
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Append JSONL logs to this file (overrides STREAMFMT_LOG_PATH).
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Report the size of each primitive type.
    Sizes {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
        /// Also report the demo array layouts.
        #[arg(long)]
        arrays: bool,
    },
    /// Print the formatting walkthrough.
    Tour,
    /// Print a file line by line.
    Cat {
        path: PathBuf,
        /// Copy raw bytes instead of lines.
        #[arg(long)]
        chars: bool,
    },
    /// Copy a file, truncating the destination.
    Copy {
        src: PathBuf,
        dst: PathBuf,
        /// Copy byte by byte instead of line by line.
        #[arg(long)]
        chars: bool,
        /// Compare SHA-256 digests of source and destination afterwards.
        #[arg(long)]
        verify: bool,
    },
    /// Write an int, a double, and a name, one per line.
    Write {
        path: PathBuf,
        /// Append instead of truncating.
        #[arg(long)]
        append: bool,
        #[arg(allow_negative_numbers = true)]
        num: i32,
        #[arg(allow_negative_numbers = true)]
        total: f64,
        name: String,
    },
    /// Read `int double name` records and echo them.
    Tokens { path: PathBuf },
    /// Check whether the input is exactly one integer.
    Validate {
        /// Value to check; read from stdin when omitted.
        #[arg(allow_hyphen_values = true)]
        input: Option<String>,
    },
    /// Ask for a name and greet it.
    Greet,
    /// Read from and write to in-memory streams.
    StringStream,
    /// Run format conformance fixtures.
    Verify {
        /// Directory containing fixture JSON files (overrides STREAMFMT_FIXTURE_DIR).
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Output report path (markdown; a JSON copy is written alongside).
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Sizes { .. } => "sizes",
            Self::Tour => "tour",
            Self::Cat { .. } => "cat",
            Self::Copy { .. } => "copy",
            Self::Write { .. } => "write",
            Self::Tokens { .. } => "tokens",
            Self::Validate { .. } => "validate",
            Self::Greet => "greet",
            Self::StringStream => "string-stream",
            Self::Verify { .. } => "verify",
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config =
        HarnessConfig::from_env().with_overrides(cli.log_level.as_deref(), cli.log_path.clone());
    let mut log = config.emitter(&run_id())?;

    let name = cli.command.name();
    log.emit_entry(LogEntry::new("", LogLevel::Debug, "command_start").with_command(name))?;
    let started = Instant::now();
    let result = run(cli.command, &config, &mut log);
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match &result {
        Ok(code) => {
            let outcome = if *code == 0 {
                Outcome::Pass
            } else {
                Outcome::Fail
            };
            log.emit_entry(
                LogEntry::new("", LogLevel::Debug, "command_end")
                    .with_command(name)
                    .with_outcome(outcome)
                    .with_duration_ms(elapsed),
            )?;
        }
        Err(err) => {
            log.emit_entry(
                LogEntry::new("", LogLevel::Error, "command_failed")
                    .with_command(name)
                    .with_outcome(Outcome::Error)
                    .with_exit_code(1)
                    .with_duration_ms(elapsed)
                    .with_details(serde_json::json!({ "error": err.to_string() })),
            )?;
        }
    }
    log.flush()?;
    Ok(ExitCode::from(result?))
}

fn run(
    command: Command,
    config: &HarnessConfig,
    log: &mut LogEmitter,
) -> Result<u8, HarnessError> {
    match command {
        Command::Sizes { json, arrays } => sizes(json, arrays),
        Command::Tour => {
            print!("{}", streamfmt_harness::tour::tour_text()?);
            Ok(0)
        }
        Command::Cat { path, chars } => cat(&path, chars, log),
        Command::Copy {
            src,
            dst,
            chars,
            verify,
        } => copy(&src, &dst, chars, verify, log),
        Command::Write {
            path,
            append,
            num,
            total,
            name,
        } => write_records(&path, append, num, total, &name, log),
        Command::Tokens { path } => tokens(&path, log),
        Command::Validate { input } => validate(input),
        Command::Greet => greet(),
        Command::StringStream => string_stream(),
        Command::Verify { fixture, report } => {
            let dir = fixture.unwrap_or_else(|| config.fixture_dir.clone());
            verify(&dir, report.as_deref(), log)
        }
    }
}

/// Report an open failure the way the classic programs do and exit 1.
fn open_failure(
    message: &str,
    path: &Path,
    err: &StreamError,
    log: &mut LogEmitter,
) -> Result<u8, HarnessError> {
    eprintln!("{message}");
    log.emit_entry(
        LogEntry::new("", LogLevel::Error, "open_failed")
            .with_path(path)
            .with_outcome(Outcome::Error)
            .with_exit_code(1)
            .with_details(serde_json::json!({ "error": err.to_string() })),
    )?;
    Ok(1)
}

fn sizes(json: bool, arrays: bool) -> Result<u8, HarnessError> {
    let mut out = io::stdout().lock();
    if json {
        let types: Vec<serde_json::Value> = size_report()
            .iter()
            .map(|t| serde_json::json!({ "type": t.kind.c_name(), "bytes": t.bytes }))
            .collect();
        let mut doc = serde_json::json!({ "types": types });
        if arrays {
            doc["arrays"] = demo_array_layouts()
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "name": a.name,
                        "element": a.element.c_name(),
                        "len": a.len,
                        "bytes": a.size_bytes(),
                    })
                })
                .collect();
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&doc)?)?;
    } else {
        write_size_report(&mut out)?;
        if arrays {
            write_array_report(&mut out, &demo_array_layouts())?;
        }
    }
    Ok(0)
}

fn cat(path: &Path, chars: bool, log: &mut LogEmitter) -> Result<u8, HarnessError> {
    let mut input = match TextStream::try_open(path, OpenMode::read()) {
        Ok(input) => input,
        Err(err) => return open_failure("File open error", path, &err, log),
    };
    let mut out = io::stdout().lock();
    if chars {
        loop {
            match input.read_char() {
                Ok(c) => out.write_all(&[c])?,
                Err(e) if e.is_end_of_input() => break,
                Err(e) => return Err(e.into()),
            }
        }
    } else {
        for line in input.lines() {
            writeln!(out, "{}", line?)?;
        }
    }
    input.close()?;
    Ok(0)
}

fn copy(
    src: &Path,
    dst: &Path,
    chars: bool,
    verify: bool,
    log: &mut LogEmitter,
) -> Result<u8, HarnessError> {
    let granularity = if chars {
        CopyGranularity::Char
    } else {
        CopyGranularity::Line
    };
    let report = match copy_file(src, dst, granularity) {
        Ok(report) => report,
        Err(err) if err.is_open_failure() => {
            let failed_src = matches!(
                &err,
                StreamError::ResourceUnavailable { path, .. } if path.as_path() == src
            );
            let message = if failed_src {
                "File open error"
            } else {
                "File create error"
            };
            let failed = if failed_src { src } else { dst };
            return open_failure(message, failed, &err, log);
        }
        Err(err) => return Err(err.into()),
    };
    println!("copied {} lines, {} bytes", report.lines, report.bytes);

    let mut entry = LogEntry::new("", LogLevel::Info, "copy_complete")
        .with_command("copy")
        .with_path(dst)
        .with_counts(report.lines, report.bytes);
    if verify {
        let src_digest = sha256_file(src)?;
        let mut index = ArtifactIndex::new("copy");
        let dst_digest = index.add_file(dst, "copy")?.sha256.clone();
        entry = entry.with_artifacts(vec![format!("{}#sha256={dst_digest}", dst.display())]);
        if src_digest != dst_digest {
            log.emit_entry(entry.with_outcome(Outcome::Fail))?;
            return Err(HarnessError::DigestMismatch {
                src: src_digest,
                dst: dst_digest,
            });
        }
        println!("sha256 {dst_digest}");
        entry = entry.with_outcome(Outcome::Pass);
    }
    log.emit_entry(entry)?;
    Ok(0)
}

fn write_records(
    path: &Path,
    append: bool,
    num: i32,
    total: f64,
    name: &str,
    log: &mut LogEmitter,
) -> Result<u8, HarnessError> {
    let mode = if append {
        OpenMode::append()
    } else {
        OpenMode::write()
    };
    let mut out = match TextStream::try_open(path, mode) {
        Ok(out) => out,
        Err(err) => return open_failure("File open error", path, &err, log),
    };
    out.write(num)?
        .put(b'\n')?
        .write(total)?
        .put(b'\n')?
        .write(name)?
        .end_line()?;
    out.close()?;
    Ok(0)
}

fn tokens(path: &Path, log: &mut LogEmitter) -> Result<u8, HarnessError> {
    let mut input = match TextStream::try_open(path, OpenMode::read()) {
        Ok(input) => input,
        Err(err) => return open_failure("File open error", path, &err, log),
    };
    let mut echo = TextStream::memory();
    loop {
        let num: i32 = match input.read_token() {
            Ok(num) => num,
            Err(e) if e.is_end_of_input() => break,
            Err(e) => return Err(e.into()),
        };
        let total: f64 = input.read_token()?;
        let name: String = input.read_token()?;
        echo.write(num)?
            .write_str(" ")?
            .write(total)?
            .write_str(" ")?
            .write(&name)?
            .put(b'\n')?;
    }
    input.close()?;
    print!("{}", echo.contents().unwrap_or_default());
    Ok(0)
}

fn validate(input: Option<String>) -> Result<u8, HarnessError> {
    let line = match input {
        Some(line) => line,
        None => prompt("Enter an integer: ")?,
    };
    if validate_integer(&line) {
        println!("An integer was entered");
    } else {
        println!("An integer was NOT entered");
    }
    Ok(0)
}

fn greet() -> Result<u8, HarnessError> {
    let name = prompt("Enter your name: ")?;
    println!("Your name is {name}!");
    Ok(0)
}

/// Print `message`, then read one line from stdin without its line ending.
fn prompt(message: &str) -> io::Result<String> {
    let mut out = io::stdout().lock();
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}

fn string_stream() -> Result<u8, HarnessError> {
    let mut iss = TextStream::from_string("Moe 100 1234.5");
    let name: String = iss.read_token()?;
    let num: i32 = iss.read_token()?;
    let total: f64 = iss.read_token()?;
    println!("name: {name}, num: {num}, total: {total}");

    let mut oss = TextStream::memory();
    oss.write(&name)?
        .write_str(" ")?
        .write(num)?
        .write_str(" ")?
        .write(total)?;
    println!("{}", oss.contents().unwrap_or_default());
    Ok(0)
}

fn verify(
    fixture: &Path,
    report: Option<&Path>,
    log: &mut LogEmitter,
) -> Result<u8, HarnessError> {
    eprintln!("Verifying against fixtures in {}", fixture.display());
    let mut fixture_sets = Vec::new();
    for path in fixture_paths(fixture)? {
        match FixtureSet::from_file(&path) {
            Ok(set) => fixture_sets.push(set),
            Err(err) => {
                eprintln!("Skipping {}: {}", path.display(), err);
                log.emit_entry(
                    LogEntry::new("", LogLevel::Warn, "fixture_skipped")
                        .with_path(&path)
                        .with_outcome(Outcome::Skip)
                        .with_details(serde_json::json!({ "error": err.to_string() })),
                )?;
            }
        }
    }
    if fixture_sets.is_empty() {
        return Err(HarnessError::NoFixtures(fixture.to_path_buf()));
    }

    let runner = TestRunner::new("fixture-verify");
    let results = fixture_sets.iter().flat_map(|set| runner.run(set)).collect();
    let summary = VerificationSummary::from_results(results);
    for failure in summary.failures() {
        log.emit_entry(
            LogEntry::new("", LogLevel::Warn, "case_failed")
                .with_outcome(Outcome::Fail)
                .with_details(serde_json::json!({
                    "case": failure.case_name,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })),
        )?;
    }

    let report_doc = ConformanceReport {
        title: String::from("streamfmt Format Conformance Report"),
        campaign: runner.campaign.clone(),
        timestamp: now_utc(),
        summary,
    };
    eprintln!(
        "Verification complete: total={}, passed={}, failed={}",
        report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
    );

    if let Some(report_path) = report {
        eprintln!("Writing report to {}", report_path.display());
        std::fs::write(report_path, report_doc.to_markdown())?;
        std::fs::write(report_path.with_extension("json"), report_doc.to_json()?)?;
    }

    if !report_doc.summary.all_passed() {
        return Err(HarnessError::VerificationFailed {
            failed: report_doc.summary.failed,
            total: report_doc.summary.total,
        });
    }
    Ok(0)
}
