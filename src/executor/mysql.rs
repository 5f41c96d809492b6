use mysql::prelude::Queryable;
use mysql::Conn;

use crate::backend::MySql;
use crate::command::Command;
use crate::error::MigrationError;
use crate::executor::{render_and_run, DdlExecutor, DdlOptions, LogEntry};

impl DdlExecutor for Conn {
    fn execute_ddl(
        &mut self,
        command: &Command,
        options: &DdlOptions,
    ) -> Result<Vec<LogEntry>, MigrationError> {
        render_and_run(&MySql, command, options, |sql| {
            self.query_drop(sql)?;
            Ok(())
        })
    }

    // MySQL commits implicitly around every DDL statement.
    fn in_transaction(&self) -> bool {
        false
    }
}
