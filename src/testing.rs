//! Shared fixtures for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use crate::command::Command;
use crate::error::MigrationError;
use crate::executor::{DdlExecutor, DdlOptions, LogEntry};

/// Records every command it is handed instead of talking to a database.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub commands: Vec<Command>,
    pub options: Vec<DdlOptions>,
    pub in_transaction: bool,
    /// Fail the n-th call (zero based).
    pub fail_at: Option<usize>,
    /// Returned from every successful call.
    pub logs: Vec<LogEntry>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactional() -> Self {
        Self {
            in_transaction: true,
            ..Self::default()
        }
    }
}

impl DdlExecutor for Recorder {
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError> {
        if self.fail_at == Some(self.commands.len()) {
            return Err(MigrationError::Executor("relation already exists".to_string()));
        }
        self.commands.push(command.clone());
        self.options.push(options.clone());
        Ok(self.logs.clone())
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut out) = self.0.lock() {
            out.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a subscriber that collects all `tracing` output as text.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = capture
        .0
        .lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    (result, output)
}
