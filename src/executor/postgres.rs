use postgres::{Client, Transaction};

use crate::backend::Postgres;
use crate::command::Command;
use crate::error::MigrationError;
use crate::executor::{render_and_run, DdlExecutor, DdlOptions, LogEntry};

impl DdlExecutor for Client {
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError> {
        render_and_run(&Postgres, command, options, |sql| {
            self.batch_execute(sql)?;
            Ok(())
        })
    }

    fn in_transaction(&self) -> bool {
        false
    }
}

impl DdlExecutor for Transaction<'_> {
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError> {
        render_and_run(&Postgres, command, options, |sql| {
            self.batch_execute(sql)?;
            Ok(())
        })
    }

    fn in_transaction(&self) -> bool {
        true
    }
}
