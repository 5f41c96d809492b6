use rusqlite::Connection;

use crate::backend::Sqlite;
use crate::command::Command;
use crate::error::MigrationError;
use crate::executor::{render_and_run, DdlExecutor, DdlOptions, LogEntry};

impl DdlExecutor for Connection {
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError> {
        render_and_run(&Sqlite, command, options, |sql| {
            self.execute_batch(sql)?;
            Ok(())
        })
    }

    fn in_transaction(&self) -> bool {
        !self.is_autocommit()
    }
}
