//! Building commands from inside a migration body.
//!
//! At most one composite command (create or alter table) may be open at a
//! time; every other command is submitted whole.

use std::mem;

use crate::command::{
    Callback, ChangeOp, Command, Composite, Constraint, DropMode, Entry, Index, Literal, Table,
    Target,
};
use crate::config::LockStrategy;
use crate::context::OpenCommand;
use crate::error::MigrationError;
use crate::field::{ColumnOptions, ColumnType};
use crate::render::describe;
use crate::runner::Runner;

impl<'e> Runner<'e> {
    /// Queue a complete command or reversible pair.
    ///
    /// Fails if a composite command is still open; that command is discarded.
    pub fn submit(&mut self, entry: impl Into<Entry>) -> Result<(), MigrationError> {
        let mut entry = entry.into();

        if let Some(open) = self.ctx.active.take() {
            self.ctx.pending.clear();
            return Err(MigrationError::NestedCommand {
                open: open.describe(),
                attempted: label(&entry),
            });
        }

        match &mut entry {
            Entry::Single(command) => self.resolve_prefixes(command)?,
            Entry::Reversible { up, down } => {
                self.resolve_prefixes(up)?;
                self.resolve_prefixes(down)?;
            }
        }

        match &entry {
            Entry::Single(command) => self.warn_concurrent_index(command),
            Entry::Reversible { up, down } => {
                self.warn_concurrent_index(up);
                self.warn_concurrent_index(down);
            }
        }

        self.ctx.queue.push(entry);
        Ok(())
    }

    /// Open a create or alter table command.
    ///
    /// If one is already open the new table takes its place as the open
    /// command and the call fails; the run must not continue after that.
    pub fn begin_composite(&mut self, action: Composite, table: Table) -> Result<(), MigrationError> {
        let mut table = table;
        let prefixed = self.resolve_prefix(&mut table);

        let opened = OpenCommand { action, table };
        let attempted = opened.describe();
        if let Some(previous) = self.ctx.active.replace(opened) {
            self.ctx.pending.clear();
            return Err(MigrationError::NestedCommand {
                open: previous.describe(),
                attempted,
            });
        }
        if let Err(err) = prefixed {
            self.ctx.discard_open_command();
            return Err(err);
        }
        Ok(())
    }

    /// Append a column change to the open command.
    pub fn add_op(&mut self, op: ChangeOp) -> Result<(), MigrationError> {
        if self.ctx.active.is_none() {
            return Err(MigrationError::NoOpenCommand { op: op.describe() });
        }
        self.ctx.pending.push(op);
        Ok(())
    }

    /// Close the open command and queue it with its changes in the order
    /// they were added.
    pub fn end_composite(&mut self) -> Result<(), MigrationError> {
        let Some(OpenCommand { action, table }) = self.ctx.active.take() else {
            return Err(MigrationError::NoOpenCommand {
                op: "end of command".to_string(),
            });
        };
        let ops = mem::take(&mut self.ctx.pending);

        let command = match action {
            Composite::Create => Command::CreateTable {
                table,
                if_not_exists: false,
                columns: ops,
            },
            Composite::CreateIfNotExists => Command::CreateTable {
                table,
                if_not_exists: true,
                columns: ops,
            },
            Composite::Alter => Command::AlterTable {
                table,
                changes: ops,
            },
        };
        self.ctx.queue.push(Entry::Single(command));
        Ok(())
    }

    /// Create `table`, with an `id bigserial primary key` column first unless
    /// the table opts out.
    pub fn create<F>(&mut self, table: Table, body: F) -> Result<(), MigrationError>
    where
        F: FnOnce(&mut Self) -> Result<(), MigrationError>,
    {
        self.composite(Composite::Create, table, body)
    }

    pub fn create_if_not_exists<F>(&mut self, table: Table, body: F) -> Result<(), MigrationError>
    where
        F: FnOnce(&mut Self) -> Result<(), MigrationError>,
    {
        self.composite(Composite::CreateIfNotExists, table, body)
    }

    pub fn alter<F>(&mut self, table: Table, body: F) -> Result<(), MigrationError>
    where
        F: FnOnce(&mut Self) -> Result<(), MigrationError>,
    {
        self.composite(Composite::Alter, table, body)
    }

    fn composite<F>(&mut self, action: Composite, table: Table, body: F) -> Result<(), MigrationError>
    where
        F: FnOnce(&mut Self) -> Result<(), MigrationError>,
    {
        let primary_key = action != Composite::Alter && table.primary_key;
        self.begin_composite(action, table)?;
        if primary_key {
            self.add_op(ChangeOp::add(
                "id",
                ColumnType::BigSerial,
                ColumnOptions::new().primary_key(),
            ))?;
        }
        body(self)?;
        self.end_composite()
    }

    pub fn add(
        &mut self,
        column: impl Into<String>,
        ty: ColumnType,
        opts: ColumnOptions,
    ) -> Result<(), MigrationError> {
        self.add_op(ChangeOp::add(column, ty, opts))
    }

    pub fn add_if_not_exists(
        &mut self,
        column: impl Into<String>,
        ty: ColumnType,
        opts: ColumnOptions,
    ) -> Result<(), MigrationError> {
        self.add_op(ChangeOp::add_if_not_exists(column, ty, opts))
    }

    /// Remove a column. Recording its type and options lets the change be
    /// undone.
    pub fn remove(
        &mut self,
        column: impl Into<String>,
        ty: ColumnType,
        opts: ColumnOptions,
    ) -> Result<(), MigrationError> {
        self.add_op(ChangeOp::remove(column, ty, opts))
    }

    pub fn remove_column(&mut self, column: impl Into<String>) -> Result<(), MigrationError> {
        self.add_op(ChangeOp::remove_column(column))
    }

    pub fn remove_if_exists(
        &mut self,
        column: impl Into<String>,
        ty: ColumnType,
    ) -> Result<(), MigrationError> {
        self.add_op(ChangeOp::remove_if_exists(column, ty))
    }

    /// Change a column's type or options. Set `from` on `opts` to make the
    /// change reversible.
    pub fn modify(
        &mut self,
        column: impl Into<String>,
        ty: ColumnType,
        opts: ColumnOptions,
    ) -> Result<(), MigrationError> {
        self.add_op(ChangeOp::modify(column, ty, opts))
    }

    pub fn drop_table(&mut self, table: Table, mode: DropMode) -> Result<(), MigrationError> {
        self.submit(Command::DropTable {
            table,
            if_exists: false,
            mode,
        })
    }

    pub fn drop_table_if_exists(&mut self, table: Table, mode: DropMode) -> Result<(), MigrationError> {
        self.submit(Command::DropTable {
            table,
            if_exists: true,
            mode,
        })
    }

    pub fn rename_table(&mut self, from: Table, to: Table) -> Result<(), MigrationError> {
        self.submit(Command::RenameTable { from, to })
    }

    pub fn rename_column(
        &mut self,
        table: Table,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<(), MigrationError> {
        self.submit(Command::RenameColumn {
            table,
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn create_index(&mut self, index: Index) -> Result<(), MigrationError> {
        self.submit(Command::CreateIndex {
            index,
            if_not_exists: false,
        })
    }

    pub fn create_index_if_not_exists(&mut self, index: Index) -> Result<(), MigrationError> {
        self.submit(Command::CreateIndex {
            index,
            if_not_exists: true,
        })
    }

    pub fn drop_index(&mut self, index: Index, mode: DropMode) -> Result<(), MigrationError> {
        self.submit(Command::DropIndex {
            index,
            if_exists: false,
            mode,
        })
    }

    pub fn drop_index_if_exists(&mut self, index: Index, mode: DropMode) -> Result<(), MigrationError> {
        self.submit(Command::DropIndex {
            index,
            if_exists: true,
            mode,
        })
    }

    pub fn rename_index(&mut self, index: Index, to: impl Into<String>) -> Result<(), MigrationError> {
        self.submit(Command::RenameIndex {
            index,
            to: to.into(),
        })
    }

    pub fn create_constraint(&mut self, constraint: Constraint) -> Result<(), MigrationError> {
        self.submit(Command::CreateConstraint {
            constraint,
            if_not_exists: false,
        })
    }

    pub fn create_constraint_if_not_exists(
        &mut self,
        constraint: Constraint,
    ) -> Result<(), MigrationError> {
        self.submit(Command::CreateConstraint {
            constraint,
            if_not_exists: true,
        })
    }

    pub fn drop_constraint(&mut self, constraint: Constraint, mode: DropMode) -> Result<(), MigrationError> {
        self.submit(Command::DropConstraint {
            constraint,
            if_exists: false,
            mode,
        })
    }

    pub fn drop_constraint_if_exists(
        &mut self,
        constraint: Constraint,
        mode: DropMode,
    ) -> Result<(), MigrationError> {
        self.submit(Command::DropConstraint {
            constraint,
            if_exists: true,
            mode,
        })
    }

    /// Queue raw SQL. It cannot be undone automatically.
    pub fn execute(&mut self, sql: impl Into<String>) -> Result<(), MigrationError> {
        self.submit(Command::sql(sql))
    }

    /// Queue a function to run in order with the DDL around it.
    pub fn execute_callback<F>(&mut self, label: impl Into<String>, action: F) -> Result<(), MigrationError>
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        self.submit(Command::Execute(Literal::Callback(Callback::new(label, action))))
    }

    /// Queue `up` for forward runs and `down` for backward ones.
    pub fn execute_reversible(&mut self, up: Command, down: Command) -> Result<(), MigrationError> {
        self.submit(Entry::Reversible { up, down })
    }

    fn resolve_prefixes(&self, command: &mut Command) -> Result<(), MigrationError> {
        for target in command.targets_mut() {
            self.resolve_prefix(target)?;
        }
        Ok(())
    }

    /// Fill in the run's prefix on a target that names none, and reject one
    /// that names a different prefix.
    fn resolve_prefix(&self, target: &mut dyn Target) -> Result<(), MigrationError> {
        let Some(expected) = self.ctx.prefix.as_deref() else {
            return Ok(());
        };
        match target.prefix() {
            None => {
                *target.prefix_mut() = Some(expected.to_string());
                Ok(())
            }
            Some(prefix) if prefix == expected => Ok(()),
            Some(prefix) => Err(MigrationError::PrefixMismatch {
                target: prefix.to_string(),
                expected: expected.to_string(),
            }),
        }
    }

    fn warn_concurrent_index(&self, command: &Command) {
        let Some(index) = command.concurrent_index() else {
            return;
        };
        let lock = self.ctx.repo_config.migration_lock;
        let config = self.ctx.migration_config;
        if config.allows_concurrent_index(lock) {
            return;
        }

        let missing = if config.disable_ddl_transaction {
            "disable_migration_lock"
        } else if config.disable_migration_lock || lock == LockStrategy::AdvisoryLock {
            "disable_ddl_transaction"
        } else {
            "disable_ddl_transaction and disable_migration_lock"
        };
        tracing::warn!(
            target: "ddl_runner",
            migration = %self.ctx.migration,
            version = self.ctx.version,
            index = %index.name,
            table = %index.table,
            "migration {} has set index `{}` on table `{}` to concurrently but did not set {}",
            self.ctx.migration,
            index.name,
            index.table,
            missing
        );
    }
}

/// Short description of an entry for nesting errors.
fn label(entry: &Entry) -> String {
    let command = match entry {
        Entry::Single(command) => command,
        Entry::Reversible { up, .. } => up,
    };
    describe(command).unwrap_or_else(|_| format!("{:?}", command))
}
