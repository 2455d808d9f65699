//! Driving a source to completion.
//!
//! - [`Driver`] - Owns one source, pulls its chunks and forwards lines to a sink
//! - [`LineSink`] - Where lines go, injected per run
//! - [`drive_mapped`] - The same contract for memory-mapped files
//!
//! A driver walks `Idle -> Open -> Streaming -> Draining -> Closed`. `Closed`
//! is terminal and drops the source on every path, errors included.
//!
//! # Example
//!
//! ```no_run
//! use linesrs::{Driver, FileSource, LineConfig};
//!
//! let mut driver = Driver::new(LineConfig::default());
//! driver.open(|| FileSource::open("messages.txt"))?;
//!
//! let report = driver.run(&mut |line: linesrs::Line| println!("read: {line}"))?;
//! println!("{} lines", report.lines);
//! # Ok::<(), linesrs::LineError>(())
//! ```

use std::path::Path;

use crate::accumulator::LineAccumulator;
use crate::config::{DecodeErrorAction, LineConfig};
use crate::error::LineError;
use crate::line::Line;
use crate::mapped::{Mapped, MappedSource};
use crate::source::ChunkSource;

/// Lifecycle of a [`Driver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverState {
    /// No source yet.
    Idle,
    /// Source acquired, nothing read.
    Open,
    /// Pulling chunks and emitting lines.
    Streaming,
    /// End-of-stream seen, flushing the tail.
    Draining,
    /// Terminal. The source has been released.
    Closed,
}

/// How a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamStatus {
    /// The stream carried at least one byte and was read to the end.
    Completed,
    /// The stream carried no bytes at all.
    Empty,
}

/// Summary of one completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverReport {
    /// Lines delivered to the sink.
    pub lines: u64,
    /// Lines dropped under [`DecodeErrorAction::Skip`].
    pub skipped: u64,
    /// Bytes pulled from the source.
    pub bytes: u64,
    /// How the stream ended.
    pub status: StreamStatus,
}

impl DriverReport {
    fn new() -> Self {
        Self {
            lines: 0,
            skipped: 0,
            bytes: 0,
            status: StreamStatus::Empty,
        }
    }
}

/// Consumer of lines, one at a time, in stream order.
pub trait LineSink {
    /// Receives the next line.
    fn accept(&mut self, line: Line);
}

impl<F: FnMut(Line)> LineSink for F {
    fn accept(&mut self, line: Line) {
        self(line)
    }
}

/// Pulls chunks from one source and forwards every line to a sink.
///
/// There are no retries: the first read error or non-skipped decode error
/// stops the driver for good. Lines already delivered stand.
#[derive(Debug)]
pub struct Driver<S> {
    state: DriverState,
    source: Option<S>,
    config: LineConfig,
}

impl<S: ChunkSource> Driver<S> {
    /// Creates an idle driver.
    pub fn new(config: LineConfig) -> Self {
        Self {
            state: DriverState::Idle,
            source: None,
            config,
        }
    }

    /// Creates a driver around an already-acquired source.
    pub fn with_source(source: S, config: LineConfig) -> Self {
        Self {
            state: DriverState::Open,
            source: Some(source),
            config,
        }
    }

    /// Acquires the source.
    ///
    /// A failing `open` moves the driver straight to `Closed`.
    ///
    /// # Errors
    ///
    /// Whatever `open` returns, typically [`LineError::NotFound`], or
    /// [`LineError::InvalidState`] if the driver is not idle.
    pub fn open<F>(&mut self, open: F) -> Result<(), LineError>
    where
        F: FnOnce() -> Result<S, LineError>,
    {
        if self.state != DriverState::Idle {
            return Err(LineError::InvalidState {
                message: "open on a driver that is not idle",
            });
        }

        match open() {
            Ok(source) => {
                self.source = Some(source);
                self.state = DriverState::Open;
                Ok(())
            }
            Err(e) => {
                log::error!("failed to open source: {e}");
                self.close();
                Err(e)
            }
        }
    }

    /// Reads the source to the end, forwarding each line to `sink`.
    ///
    /// The driver is `Closed` afterwards whether or not this succeeds.
    ///
    /// # Errors
    ///
    /// [`LineError::Io`] on a failed read, [`LineError::Decode`] under
    /// [`DecodeErrorAction::Abort`], [`LineError::LineTooLong`] when the
    /// configured limit is hit, [`LineError::InvalidState`] unless the driver
    /// is `Open`, [`LineError::InvalidConfig`] before any read when the
    /// configuration does not validate.
    pub fn run<K: LineSink + ?Sized>(&mut self, sink: &mut K) -> Result<DriverReport, LineError> {
        if self.state != DriverState::Open {
            return Err(LineError::InvalidState {
                message: "run needs an open driver",
            });
        }

        let result = self.stream(sink);
        if let Err(e) = &result {
            log::error!("stream stopped in {:?}: {e}", self.state);
        }
        self.close();
        result
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Returns the configuration used by this driver.
    pub fn config(&self) -> &LineConfig {
        &self.config
    }

    fn stream<K: LineSink + ?Sized>(&mut self, sink: &mut K) -> Result<DriverReport, LineError> {
        let Some(source) = self.source.as_mut() else {
            return Err(LineError::InvalidState {
                message: "run without a source",
            });
        };

        self.config.validate()?;
        let action = self.config.decode_error_action();
        let read_size = self.config.read_size();
        let mut acc = LineAccumulator::new(self.config);
        let mut report = DriverReport::new();

        self.state = DriverState::Streaming;
        loop {
            let chunk = source.read_chunk(read_size)?;
            if chunk.is_empty() {
                break;
            }

            report.bytes += chunk.len() as u64;
            for item in acc.ingest(&chunk) {
                deliver(item, action, sink, &mut report)?;
            }
        }

        self.state = DriverState::Draining;
        if let Some(item) = acc.finalize() {
            deliver(item, action, sink, &mut report)?;
        }

        if report.bytes > 0 {
            report.status = StreamStatus::Completed;
        }
        log::debug!(
            "stream drained: {} lines, {} skipped, {} bytes",
            report.lines,
            report.skipped,
            report.bytes
        );
        Ok(report)
    }

    fn close(&mut self) {
        self.source = None;
        self.state = DriverState::Closed;
    }
}

/// Scans a memory-mapped file and forwards every line to `sink`.
///
/// A zero-length file is not mapped and reports [`StreamStatus::Empty`].
/// Decode errors follow `config`'s [`DecodeErrorAction`] exactly like
/// [`Driver::run`]. `max_line_len` is not applied: the whole file is
/// already mapped, so no line can grow a buffer. The mapping is released
/// before returning.
///
/// # Example
///
/// ```no_run
/// use linesrs::{LineConfig, StreamStatus, drive_mapped};
///
/// let mut lines = Vec::new();
/// let report = drive_mapped("messages.txt", LineConfig::default(), &mut |l: linesrs::Line| lines.push(l))?;
/// if report.status == StreamStatus::Empty {
///     println!("empty file");
/// }
/// # Ok::<(), linesrs::LineError>(())
/// ```
pub fn drive_mapped<K: LineSink + ?Sized>(
    path: impl AsRef<Path>,
    config: LineConfig,
    sink: &mut K,
) -> Result<DriverReport, LineError> {
    let mut report = DriverReport::new();
    let source = match MappedSource::open(path)? {
        Mapped::Empty => return Ok(report),
        Mapped::Region(source) => source,
    };

    report.bytes = source.len() as u64;
    report.status = StreamStatus::Completed;

    let action = config.decode_error_action();
    for item in source.lines(config.decode_policy()) {
        deliver(item, action, sink, &mut report)?;
    }

    Ok(report)
}

fn deliver<K: LineSink + ?Sized>(
    item: Result<Line, LineError>,
    action: DecodeErrorAction,
    sink: &mut K,
    report: &mut DriverReport,
) -> Result<(), LineError> {
    match item {
        Ok(line) => {
            sink.accept(line);
            report.lines += 1;
            Ok(())
        }
        Err(e) if e.is_recoverable() && action == DecodeErrorAction::Skip => {
            log::warn!("skipping line: {e}");
            report.skipped += 1;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Replays scripted reads and records when it is dropped.
    struct Scripted {
        reads: Vec<Result<&'static [u8], ()>>,
        dropped: Rc<Cell<bool>>,
    }

    impl Scripted {
        fn new(reads: Vec<Result<&'static [u8], ()>>) -> (Self, Rc<Cell<bool>>) {
            let dropped = Rc::new(Cell::new(false));
            let source = Self {
                reads,
                dropped: Rc::clone(&dropped),
            };
            (source, dropped)
        }
    }

    impl ChunkSource for Scripted {
        fn read_chunk(&mut self, _max_len: usize) -> Result<Bytes, LineError> {
            if self.reads.is_empty() {
                return Ok(Bytes::new());
            }
            match self.reads.remove(0) {
                Ok(chunk) => Ok(Bytes::from_static(chunk)),
                Err(()) => Err(std::io::Error::other("connection reset").into()),
            }
        }
    }

    impl Drop for Scripted {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[test]
    fn test_full_lifecycle() {
        let (source, dropped) = Scripted::new(vec![Ok(&b"a\r\nb"[..]), Ok(&b"\nc"[..])]);
        let mut driver = Driver::new(LineConfig::default());
        assert_eq!(driver.state(), DriverState::Idle);

        driver.open(|| Ok(source)).unwrap();
        assert_eq!(driver.state(), DriverState::Open);

        let mut lines = Vec::new();
        let report = driver.run(&mut |l: Line| lines.push(l.text)).unwrap();

        assert_eq!(lines, ["a", "b", "c"]);
        assert_eq!(report.lines, 3);
        assert_eq!(report.bytes, 6);
        assert_eq!(report.status, StreamStatus::Completed);
        assert_eq!(driver.state(), DriverState::Closed);
        assert!(dropped.get());
    }

    #[test]
    fn test_open_failure_closes() {
        let mut driver: Driver<Scripted> = Driver::new(LineConfig::default());
        let err = driver
            .open(|| {
                Err(LineError::NotFound {
                    target: "messages.txt".into(),
                })
            })
            .unwrap_err();

        assert!(matches!(err, LineError::NotFound { .. }));
        assert_eq!(driver.state(), DriverState::Closed);
        assert!(driver.run(&mut |_: Line| {}).is_err());
    }

    #[test]
    fn test_read_error_keeps_emitted_lines_and_releases_source() {
        let (source, dropped) = Scripted::new(vec![Ok(&b"one\ntw"[..]), Err(())]);
        let mut driver = Driver::with_source(source, LineConfig::default());

        let mut lines = Vec::new();
        let err = driver.run(&mut |l: Line| lines.push(l.text)).unwrap_err();

        assert!(matches!(err, LineError::Io(_)));
        assert_eq!(lines, ["one"]);
        assert_eq!(driver.state(), DriverState::Closed);
        assert!(dropped.get());
    }

    #[test]
    fn test_decode_error_aborts_by_default() {
        let (source, _) = Scripted::new(vec![Ok(&b"ok\n\xff\nlater\n"[..])]);
        let mut driver = Driver::with_source(source, LineConfig::default());

        let mut lines = Vec::new();
        let err = driver.run(&mut |l: Line| lines.push(l.text)).unwrap_err();

        assert!(matches!(err, LineError::Decode { line: 2, .. }));
        assert_eq!(lines, ["ok"]);
    }

    #[test]
    fn test_decode_error_skip_continues() {
        let (source, _) = Scripted::new(vec![Ok(&b"ok\n\xff\nlater"[..])]);
        let config = LineConfig::default().with_decode_error_action(DecodeErrorAction::Skip);
        let mut driver = Driver::with_source(source, config);

        let mut lines = Vec::new();
        let report = driver.run(&mut |l: Line| lines.push(l.text)).unwrap();

        assert_eq!(lines, ["ok", "later"]);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.lines, 2);
    }

    #[test]
    fn test_line_too_long_is_terminal() {
        let (source, _) = Scripted::new(vec![Ok(&b"short\nwaytoolong"[..]), Ok(&b"\n"[..])]);
        let config = LineConfig::default()
            .with_max_line_len(Some(6))
            .with_decode_error_action(DecodeErrorAction::Skip);
        let mut driver = Driver::with_source(source, config);

        let mut lines = Vec::new();
        let err = driver.run(&mut |l: Line| lines.push(l.text)).unwrap_err();

        assert!(matches!(err, LineError::LineTooLong { max: 6, .. }));
        assert_eq!(lines, ["short"]);
    }

    #[test]
    fn test_empty_stream() {
        let (source, _) = Scripted::new(vec![]);
        let mut driver = Driver::with_source(source, LineConfig::default());

        let mut seen = 0;
        let report = driver.run(&mut |_: Line| seen += 1).unwrap();
        assert_eq!(seen, 0);
        assert_eq!(report.lines, 0);
        assert_eq!(report.status, StreamStatus::Empty);
    }

    #[test]
    fn test_run_twice_is_rejected() {
        let (source, _) = Scripted::new(vec![Ok(&b"x\n"[..])]);
        let mut driver = Driver::with_source(source, LineConfig::default());

        driver.run(&mut |_: Line| {}).unwrap();
        assert!(matches!(
            driver.run(&mut |_: Line| {}),
            Err(LineError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_invalid_config_fails_before_reading() {
        let (source, dropped) = Scripted::new(vec![Ok(&b"x\n"[..])]);
        let mut driver = Driver::with_source(source, LineConfig::default().with_read_size(0));

        let mut seen = 0;
        let err = driver.run(&mut |_: Line| seen += 1).unwrap_err();

        assert!(matches!(err, LineError::InvalidConfig { .. }));
        assert_eq!(seen, 0);
        assert_eq!(driver.state(), DriverState::Closed);
        assert!(dropped.get());
    }

    #[test]
    fn test_drive_mapped_aborts_on_decode_error() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"ok\n\xff\nlater\n").unwrap();

        let mut lines = Vec::new();
        let err = drive_mapped(file.path(), LineConfig::default(), &mut |l: Line| {
            lines.push(l.text)
        })
        .unwrap_err();

        assert!(matches!(err, LineError::Decode { line: 2, offset: 3, .. }));
        assert_eq!(lines, ["ok"]);
    }

    #[test]
    fn test_drive_mapped_ignores_max_line_len() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"a much longer line\n").unwrap();

        let mut lines = Vec::new();
        let config = LineConfig::default().with_max_line_len(Some(4));
        let report = drive_mapped(file.path(), config, &mut |l: Line| lines.push(l.text)).unwrap();

        assert_eq!(lines, ["a much longer line"]);
        assert_eq!(report.lines, 1);
    }
}
