//! The database side of a run: anything that can apply a command.

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "mysql")]
mod mysql;

use std::time::Duration;

use crate::backend::Backend;
use crate::command::Command;
use crate::error::MigrationError;
use crate::log::LogLevel;

/// Per-call execution options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DdlOptions {
    /// `None` waits for the database indefinitely.
    pub timeout: Option<Duration>,
    pub log_sql: bool,
    pub prefix: Option<String>,
}

/// A message the executor wants surfaced in the run's log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub metadata: Vec<(String, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            metadata: Vec::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

pub trait DdlExecutor {
    /// Apply one command, blocking until the database acknowledges it.
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError>;

    /// Whether a transaction is currently open on this connection.
    fn in_transaction(&self) -> bool;
}

/// Renders commands through a [`Backend`] and hands each SQL statement to a
/// closure.
pub struct SqlExecutor<B, F> {
    backend: B,
    run: F,
    in_transaction: bool,
}

impl<B, F> SqlExecutor<B, F>
where
    B: Backend,
    F: FnMut(&str) -> Result<(), String>,
{
    pub fn new(backend: B, run: F) -> Self {
        Self {
            backend,
            run,
            in_transaction: false,
        }
    }

    /// Report the connection as inside a transaction, enabling the hook phases.
    pub fn with_transaction(mut self, in_transaction: bool) -> Self {
        self.in_transaction = in_transaction;
        self
    }
}

impl<B, F> DdlExecutor for SqlExecutor<B, F>
where
    B: Backend,
    F: FnMut(&str) -> Result<(), String>,
{
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError> {
        let run = &mut self.run;
        render_and_run(&self.backend, command, options, |sql| {
            run(sql).map_err(MigrationError::Executor)
        })
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

/// Render `command` for `backend` and run each statement in order.
///
/// Stops at the first failing statement; earlier statements stay applied.
pub(crate) fn render_and_run<B, R>(
    backend: &B,
    command: &Command,
    options: &DdlOptions,
    mut run: R,
) -> Result<Vec<LogEntry>, MigrationError>
where
    B: Backend + ?Sized,
    R: FnMut(&str) -> Result<(), MigrationError>,
{
    let mut logs = Vec::new();
    for sql in backend.command_sql(command)? {
        run(&sql)?;
        if options.log_sql {
            logs.push(LogEntry::new(LogLevel::Debug, sql).with("backend", backend.name()));
        }
    }
    Ok(logs)
}
