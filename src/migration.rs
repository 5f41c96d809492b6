use crate::config::MigrationConfig;
use crate::context::Operation;
use crate::error::MigrationError;
use crate::runner::Runner;

/// Lifecycle points that only run while the executor has a transaction open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    AfterBegin,
    BeforeCommit,
}

/// One versioned migration as seen by the runner.
pub trait MigrationSource {
    fn version(&self) -> i64;

    fn name(&self) -> &str;

    /// Flags consulted for diagnostics only.
    fn config(&self) -> MigrationConfig {
        MigrationConfig::default()
    }

    fn defines(&self, operation: Operation) -> bool;

    fn run(&self, operation: Operation, runner: &mut Runner<'_>) -> Result<(), MigrationError>;

    fn defines_hook(&self, _hook: Hook) -> bool {
        false
    }

    fn run_hook(&self, _hook: Hook, _runner: &mut Runner<'_>) -> Result<(), MigrationError> {
        Ok(())
    }
}

type Body = Box<dyn Fn(&mut Runner<'_>) -> Result<(), MigrationError> + Send + Sync>;

/// A migration assembled from closures.
///
/// Define `change` for bodies that can be undone automatically, or `up` and
/// `down` to write both directions by hand.
pub struct Migration {
    pub version: i64,
    pub name: String,
    config: MigrationConfig,
    up: Option<Body>,
    down: Option<Body>,
    change: Option<Body>,
    after_begin: Option<Body>,
    before_commit: Option<Body>,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .field("config", &self.config)
            .field("up", &self.up.is_some())
            .field("down", &self.down.is_some())
            .field("change", &self.change.is_some())
            .field("after_begin", &self.after_begin.is_some())
            .field("before_commit", &self.before_commit.is_some())
            .finish()
    }
}

impl Migration {
    pub fn new(version: i64, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            config: MigrationConfig::default(),
            up: None,
            down: None,
            change: None,
            after_begin: None,
            before_commit: None,
        }
    }

    pub fn config(mut self, config: MigrationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn up<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Runner<'_>) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        self.up = Some(Box::new(body));
        self
    }

    pub fn down<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Runner<'_>) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        self.down = Some(Box::new(body));
        self
    }

    /// A body that runs forward to migrate up and backward to migrate down.
    pub fn change<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Runner<'_>) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        self.change = Some(Box::new(body));
        self
    }

    pub fn after_begin<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Runner<'_>) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        self.after_begin = Some(Box::new(body));
        self
    }

    pub fn before_commit<F>(mut self, body: F) -> Self
    where
        F: Fn(&mut Runner<'_>) -> Result<(), MigrationError> + Send + Sync + 'static,
    {
        self.before_commit = Some(Box::new(body));
        self
    }

    fn body(&self, operation: Operation) -> Option<&Body> {
        match operation {
            Operation::Up => self.up.as_ref(),
            Operation::Down => self.down.as_ref(),
            Operation::Change => self.change.as_ref(),
        }
    }

    fn hook(&self, hook: Hook) -> Option<&Body> {
        match hook {
            Hook::AfterBegin => self.after_begin.as_ref(),
            Hook::BeforeCommit => self.before_commit.as_ref(),
        }
    }
}

impl MigrationSource for Migration {
    fn version(&self) -> i64 {
        self.version
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> MigrationConfig {
        self.config
    }

    fn defines(&self, operation: Operation) -> bool {
        self.body(operation).is_some()
    }

    fn run(&self, operation: Operation, runner: &mut Runner<'_>) -> Result<(), MigrationError> {
        let body = self
            .body(operation)
            .ok_or_else(|| MigrationError::MissingOperation {
                migration: self.name.clone(),
                operation: operation.to_string(),
            })?;
        body(runner)
    }

    fn defines_hook(&self, hook: Hook) -> bool {
        self.hook(hook).is_some()
    }

    fn run_hook(&self, hook: Hook, runner: &mut Runner<'_>) -> Result<(), MigrationError> {
        match self.hook(hook) {
            Some(body) => body(runner),
            None => Ok(()),
        }
    }
}
