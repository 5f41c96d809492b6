use std::fmt;

use crate::command::{ChangeOp, Composite, Entry, Table};
use crate::config::{MigrationConfig, RepoConfig};
use crate::log::LogLevel;

/// Whether the body's commands are applied as written or undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Which body a migration runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Up,
    Down,
    Change,
}

/// The logical step the migrator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Up,
    Down,
}

impl Intent {
    /// Forward runs carry out whatever body was picked; a backward run only
    /// happens when undoing a `change` body.
    pub fn derive(direction: Direction, operation: Operation) -> Self {
        match (direction, operation) {
            (Direction::Forward, Operation::Down) | (Direction::Backward, _) => Intent::Down,
            (Direction::Forward, _) => Intent::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => f.write_str("forward"),
            Direction::Backward => f.write_str("backward"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Up => f.write_str("up"),
            Operation::Down => f.write_str("down"),
            Operation::Change => f.write_str("change"),
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Up => f.write_str("up"),
            Intent::Down => f.write_str("down"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub log_sql: bool,
}

/// A composite command that has been opened but not yet closed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OpenCommand {
    pub action: Composite,
    pub table: Table,
}

impl OpenCommand {
    pub fn describe(&self) -> String {
        format!("{} table {}", self.action.as_str(), self.table.name)
    }
}

/// Mutable state of one migration run.
///
/// Owned by exactly one run and never shared. `pending` is only non-empty
/// while `active` is set.
#[derive(Debug)]
pub struct Context {
    pub(crate) migration: String,
    pub(crate) version: i64,
    pub(crate) direction: Direction,
    pub(crate) operation: Operation,
    pub(crate) intent: Intent,
    pub(crate) active: Option<OpenCommand>,
    pub(crate) pending: Vec<ChangeOp>,
    pub(crate) queue: Vec<Entry>,
    pub(crate) log: LogConfig,
    pub(crate) prefix: Option<String>,
    pub(crate) migration_config: MigrationConfig,
    pub(crate) repo_config: RepoConfig,
}

impl Context {
    pub fn new(
        migration: impl Into<String>,
        version: i64,
        direction: Direction,
        operation: Operation,
        repo_config: &RepoConfig,
        migration_config: MigrationConfig,
    ) -> Self {
        Self {
            migration: migration.into(),
            version,
            direction,
            operation,
            intent: Intent::derive(direction, operation),
            active: None,
            pending: Vec::new(),
            queue: Vec::new(),
            log: LogConfig {
                level: repo_config.log,
                log_sql: repo_config.log_sql,
            },
            prefix: repo_config.prefix.clone(),
            migration_config,
            repo_config: repo_config.clone(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn intent(&self) -> Intent {
        self.intent
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn migration(&self) -> &str {
        &self.migration
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn log_config(&self) -> LogConfig {
        self.log
    }

    /// Commands queued since the last flush, in authoring order.
    pub fn queued(&self) -> &[Entry] {
        &self.queue
    }

    pub fn has_open_command(&self) -> bool {
        self.active.is_some()
    }

    /// Take everything queued so far, leaving the queue empty.
    pub(crate) fn take_queue(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.queue)
    }

    pub(crate) fn discard_open_command(&mut self) {
        self.active = None;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_derivation() {
        assert_eq!(Intent::derive(Direction::Forward, Operation::Up), Intent::Up);
        assert_eq!(Intent::derive(Direction::Forward, Operation::Down), Intent::Down);
        assert_eq!(Intent::derive(Direction::Forward, Operation::Change), Intent::Up);
        assert_eq!(Intent::derive(Direction::Backward, Operation::Change), Intent::Down);
    }

    #[test]
    fn context_takes_settings_from_repo_config() {
        let repo = RepoConfig::new()
            .prefix("public")
            .log(LogLevel::Debug)
            .log_sql(true);
        let ctx = Context::new(
            "create_users",
            20240101,
            Direction::Backward,
            Operation::Change,
            &repo,
            MigrationConfig::default(),
        );

        assert_eq!(ctx.prefix(), Some("public"));
        assert_eq!(ctx.intent(), Intent::Down);
        assert_eq!(
            ctx.log_config(),
            LogConfig {
                level: LogLevel::Debug,
                log_sql: true,
            }
        );
        assert!(ctx.queued().is_empty());
        assert!(!ctx.has_open_command());
    }

    #[test]
    fn take_queue_leaves_it_empty() {
        let mut ctx = Context::new(
            "m",
            1,
            Direction::Forward,
            Operation::Up,
            &RepoConfig::default(),
            MigrationConfig::default(),
        );
        ctx.queue
            .push(Entry::Single(crate::command::Command::sql("SELECT 1")));

        assert_eq!(ctx.take_queue().len(), 1);
        assert!(ctx.queued().is_empty());
    }
}
