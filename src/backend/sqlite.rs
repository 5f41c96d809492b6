use sea_query::{
    IndexCreateStatement, SqliteQueryBuilder, TableAlterStatement, TableCreateStatement,
    TableDropStatement, TableRenameStatement,
};

use crate::backend::Backend;
use crate::command::{Constraint, DropMode, Index};
use crate::error::MigrationError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Backend for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn supports_alter_column(&self) -> bool {
        false
    }

    fn supports_drop_cascade(&self) -> bool {
        false
    }

    fn build_table_create(&self, stmt: TableCreateStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_table_drop(&self, stmt: TableDropStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_table_rename(&self, stmt: TableRenameStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_table_alter(&self, stmt: TableAlterStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn build_index_create(&self, stmt: IndexCreateStatement) -> String {
        stmt.to_string(SqliteQueryBuilder)
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn drop_index_sql(
        &self,
        index: &Index,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError> {
        if mode == DropMode::Cascade {
            return Err(MigrationError::unsupported(self.name(), "drop index cascade"));
        }
        if index.concurrently {
            return Err(MigrationError::unsupported(
                self.name(),
                "dropping indexes concurrently",
            ));
        }
        Ok(format!(
            "DROP INDEX {}{}",
            if if_exists { "IF EXISTS " } else { "" },
            self.quote_table(index.prefix.as_deref(), &index.name)
        ))
    }

    fn rename_index_sql(&self, _index: &Index, _to: &str) -> Result<String, MigrationError> {
        Err(MigrationError::unsupported(self.name(), "renaming indexes"))
    }

    fn add_constraint_sql(
        &self,
        _constraint: &Constraint,
        _if_not_exists: bool,
    ) -> Result<String, MigrationError> {
        Err(MigrationError::unsupported(
            self.name(),
            "adding constraints to existing tables",
        ))
    }

    fn drop_constraint_sql(
        &self,
        _constraint: &Constraint,
        _if_exists: bool,
        _mode: DropMode,
    ) -> Result<String, MigrationError> {
        Err(MigrationError::unsupported(
            self.name(),
            "dropping constraints from existing tables",
        ))
    }
}
