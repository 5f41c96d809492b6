use thiserror::Error;

/// Every way a migration run can fail.
///
/// All of these are fatal to the run. Advisory diagnostics never surface here.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A composite command was opened, or a complete command submitted,
    /// while another composite command was still open.
    #[error("cannot execute nested commands: `{attempted}` issued while `{open}` is still open")]
    NestedCommand { open: String, attempted: String },

    /// A column change was added with no composite command open.
    #[error("cannot add `{op}` outside of a create or alter table command")]
    NoOpenCommand { op: String },

    #[error(
        "cannot reverse migration command: {command}. \
         You will need to explicitly define up and down in your migration"
    )]
    Irreversible { command: String },

    #[error("invalid constraint {name}: {reason}")]
    InvalidConstraint { name: String, reason: &'static str },

    #[error("the prefix `{target}` does not match the migrator prefix `{expected}`")]
    PrefixMismatch { target: String, expected: String },

    #[error("migration {migration} does not define `{operation}`")]
    MissingOperation { migration: String, operation: String },

    #[error("{backend} does not support {what}")]
    Unsupported { backend: &'static str, what: String },

    #[error("DDL execution failed: {0}")]
    Executor(String),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Postgres(#[from] postgres::Error),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MySql(#[from] mysql::Error),
}

impl MigrationError {
    pub(crate) fn unsupported(backend: &'static str, what: impl Into<String>) -> Self {
        MigrationError::Unsupported {
            backend,
            what: what.into(),
        }
    }
}
