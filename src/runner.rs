use std::time::Instant;

use crate::command::{Command, Entry, Literal};
use crate::config::RepoConfig;
use crate::context::{Context, Direction, Intent, Operation};
use crate::error::MigrationError;
use crate::executor::{DdlExecutor, DdlOptions};
use crate::log;
use crate::migration::{Hook, MigrationSource};
use crate::render::describe;
use crate::reverse::reverse;

/// Handle a migration body uses to queue and flush commands.
///
/// Owns the run's [`Context`] and borrows the executor for the length of
/// the run.
pub struct Runner<'e> {
    pub(crate) ctx: Context,
    executor: &'e mut dyn DdlExecutor,
}

impl<'e> Runner<'e> {
    pub fn new(ctx: Context, executor: &'e mut dyn DdlExecutor) -> Self {
        Self { ctx, executor }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn direction(&self) -> Direction {
        self.ctx.direction
    }

    pub fn operation(&self) -> Operation {
        self.ctx.operation
    }

    pub fn intent(&self) -> Intent {
        self.ctx.intent
    }

    pub fn prefix(&self) -> Option<&str> {
        self.ctx.prefix()
    }

    /// Execute everything queued since the last flush.
    ///
    /// Forward runs apply commands in authoring order; backward runs apply
    /// their inverses last-queued first. The first failure stops the drain
    /// and whatever already ran stays applied.
    pub fn flush(&mut self) -> Result<(), MigrationError> {
        let queue = self.ctx.take_queue();
        match self.ctx.direction {
            Direction::Forward => {
                for entry in queue {
                    let command = self.resolve(entry)?;
                    self.dispatch(command)?;
                }
            }
            Direction::Backward => {
                for entry in queue.into_iter().rev() {
                    let command = self.resolve(entry)?;
                    self.dispatch(command)?;
                }
            }
        }
        Ok(())
    }

    /// Pick the command to run for this direction.
    fn resolve(&self, entry: Entry) -> Result<Command, MigrationError> {
        match (entry, self.ctx.direction) {
            (Entry::Reversible { up, .. }, Direction::Forward) => Ok(up),
            (Entry::Reversible { down, .. }, Direction::Backward) => Ok(down),
            (Entry::Single(command), Direction::Forward) => Ok(command),
            (Entry::Single(command), Direction::Backward) => match reverse(&command) {
                Some(inverse) => Ok(inverse),
                None => Err(MigrationError::Irreversible {
                    command: describe(&command)?,
                }),
            },
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<(), MigrationError> {
        let level = self.ctx.log.level;
        log::emit(level, &describe(&command)?);

        if let Command::Execute(Literal::Callback(callback)) = &command {
            return callback.call().map_err(MigrationError::Executor);
        }

        let options = DdlOptions {
            timeout: None,
            log_sql: self.ctx.log.log_sql,
            prefix: self.ctx.prefix.clone(),
        };
        let entries = self.executor.execute_ddl(&command, &options)?;
        if level.is_enabled() {
            for entry in entries {
                log::emit_with(entry.level, &entry.message, &entry.metadata);
            }
        }
        Ok(())
    }

    /// Run the chosen operation, wrapped in the source's transaction hooks
    /// when the executor has a transaction open.
    fn run_phases(&mut self, source: &dyn MigrationSource) -> Result<(), MigrationError> {
        let operation = self.ctx.operation;
        if self.executor.in_transaction() {
            self.run_hook(source, Hook::AfterBegin)?;
            self.flush()?;
            source.run(operation, self)?;
            self.flush()?;
            self.run_hook(source, Hook::BeforeCommit)?;
            self.flush()
        } else {
            source.run(operation, self)?;
            self.flush()
        }
    }

    fn run_hook(&mut self, source: &dyn MigrationSource, hook: Hook) -> Result<(), MigrationError> {
        if source.defines_hook(hook) {
            tracing::trace!(target: "ddl_runner", ?hook, migration = source.name(), "running hook");
            source.run_hook(hook, self)?;
        }
        Ok(())
    }
}

/// Decide which operation carries out `intent`, and in which direction.
///
/// `up` and `down` take precedence over `change`; undoing through `change`
/// runs it backward.
pub fn plan(
    source: &dyn MigrationSource,
    intent: Intent,
) -> Result<(Direction, Operation), MigrationError> {
    let chosen = match intent {
        Intent::Up if source.defines(Operation::Up) => (Direction::Forward, Operation::Up),
        Intent::Down if source.defines(Operation::Down) => (Direction::Forward, Operation::Down),
        Intent::Up if source.defines(Operation::Change) => (Direction::Forward, Operation::Change),
        Intent::Down if source.defines(Operation::Change) => {
            (Direction::Backward, Operation::Change)
        }
        _ => {
            return Err(MigrationError::MissingOperation {
                migration: source.name().to_string(),
                operation: format!("{} or change", intent),
            })
        }
    };
    Ok(chosen)
}

/// Run one migration for `intent` against `executor`.
pub fn run(
    source: &dyn MigrationSource,
    executor: &mut dyn DdlExecutor,
    config: &RepoConfig,
    intent: Intent,
) -> Result<(), MigrationError> {
    let (direction, operation) = plan(source, intent)?;
    let version = source.version();
    let level = config.log;

    log::emit(
        level,
        &format!(
            "== Running {} {}.{} {}",
            version,
            source.name(),
            operation,
            direction
        ),
    );
    let started = Instant::now();

    let ctx = Context::new(
        source.name(),
        version,
        direction,
        operation,
        config,
        source.config(),
    );
    let mut runner = Runner::new(ctx, executor);
    runner.run_phases(source)?;

    log::emit(
        level,
        &format!(
            "== Migrated {} in {:.1}s",
            version,
            started.elapsed().as_secs_f64()
        ),
    );
    Ok(())
}
