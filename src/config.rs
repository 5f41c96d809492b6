use crate::log::LogLevel;

/// How the surrounding migrator serializes concurrent migration runs.
///
/// Only consulted for the concurrently-built index advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStrategy {
    #[default]
    TableLock,
    AdvisoryLock,
}

/// Repository-level settings shared by every run against one database.
#[derive(Debug, Clone, Default)]
pub struct RepoConfig {
    pub prefix: Option<String>,
    pub log: LogLevel,
    pub log_sql: bool,
    pub migration_lock: LockStrategy,
}

impl RepoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema prefix applied to every target that does not name its own.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn log(mut self, level: LogLevel) -> Self {
        self.log = level;
        self
    }

    /// Ask the executor to log the SQL it runs.
    pub fn log_sql(mut self, log_sql: bool) -> Self {
        self.log_sql = log_sql;
        self
    }

    pub fn migration_lock(mut self, strategy: LockStrategy) -> Self {
        self.migration_lock = strategy;
        self
    }
}

/// Static per-migration flags. These never change control flow in the
/// runner; they only silence diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationConfig {
    pub disable_ddl_transaction: bool,
    pub disable_migration_lock: bool,
}

impl MigrationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disable_ddl_transaction(mut self, disable: bool) -> Self {
        self.disable_ddl_transaction = disable;
        self
    }

    pub fn disable_migration_lock(mut self, disable: bool) -> Self {
        self.disable_migration_lock = disable;
        self
    }

    /// Whether building an index concurrently is safe under `strategy`.
    ///
    /// The DDL transaction must be off, and the migration lock must either be
    /// off or be an advisory lock that does not hold a table lock.
    pub fn allows_concurrent_index(&self, strategy: LockStrategy) -> bool {
        self.disable_ddl_transaction
            && (self.disable_migration_lock || strategy == LockStrategy::AdvisoryLock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_config_builder() {
        let config = RepoConfig::new()
            .prefix("public")
            .log(LogLevel::Debug)
            .log_sql(true)
            .migration_lock(LockStrategy::AdvisoryLock);

        assert_eq!(config.prefix.as_deref(), Some("public"));
        assert_eq!(config.log, LogLevel::Debug);
        assert!(config.log_sql);
        assert_eq!(config.migration_lock, LockStrategy::AdvisoryLock);
    }

    #[test]
    fn repo_config_defaults() {
        let config = RepoConfig::default();
        assert!(config.prefix.is_none());
        assert_eq!(config.log, LogLevel::Info);
        assert!(!config.log_sql);
        assert_eq!(config.migration_lock, LockStrategy::TableLock);
    }

    #[test]
    fn concurrent_index_requires_ddl_transaction_disabled() {
        let config = MigrationConfig::new().disable_migration_lock(true);
        assert!(!config.allows_concurrent_index(LockStrategy::AdvisoryLock));
    }

    #[test]
    fn concurrent_index_under_table_lock_requires_lock_disabled() {
        let config = MigrationConfig::new().disable_ddl_transaction(true);
        assert!(!config.allows_concurrent_index(LockStrategy::TableLock));
        assert!(config.allows_concurrent_index(LockStrategy::AdvisoryLock));

        let config = config.disable_migration_lock(true);
        assert!(config.allows_concurrent_index(LockStrategy::TableLock));
    }
}
