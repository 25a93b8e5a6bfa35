//! A process-wide logger that records every message for later assertions.
//!
//! Only one logger can be installed per test binary, so tests using this
//! module should be `#[serial]` and must not call `menagerie::init_logging`.

use std::sync::{Mutex, Once};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One captured log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
}

static RECORDS: Mutex<Vec<CapturedRecord>> = Mutex::new(Vec::new());
static INSTALL: Once = Once::new();

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let captured = CapturedRecord {
            level: record.level(),
            target: record.target().to_owned(),
            message: record.args().to_string(),
        };
        if let Ok(mut records) = RECORDS.lock() {
            records.push(captured);
        }
    }

    fn flush(&self) {}
}

/// Installs the capturing logger once and clears anything captured so far.
pub fn install() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    take();
}

/// Removes and returns every record captured since the last call.
pub fn take() -> Vec<CapturedRecord> {
    RECORDS
        .lock()
        .map(|mut records| std::mem::take(&mut *records))
        .unwrap_or_default()
}

/// Captured records at `level` whose target starts with `target`.
pub fn matching(records: &[CapturedRecord], level: Level, target: &str) -> usize {
    records
        .iter()
        .filter(|record| record.level == level && record.target.starts_with(target))
        .count()
}
