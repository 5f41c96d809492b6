use sea_query::{
    IndexCreateStatement, MysqlQueryBuilder, TableAlterStatement, TableCreateStatement,
    TableDropStatement, TableRenameStatement,
};

use crate::backend::Backend;
use crate::command::{Constraint, DropMode, Index};
use crate::error::MigrationError;

#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Backend for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn supports_alter_column(&self) -> bool {
        true
    }

    fn supports_drop_cascade(&self) -> bool {
        // Accepted and ignored by MySQL.
        true
    }

    fn build_table_create(&self, stmt: TableCreateStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_table_drop(&self, stmt: TableDropStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_table_rename(&self, stmt: TableRenameStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_table_alter(&self, stmt: TableAlterStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn build_index_create(&self, stmt: IndexCreateStatement) -> String {
        stmt.to_string(MysqlQueryBuilder)
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn drop_index_sql(
        &self,
        index: &Index,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError> {
        if if_exists {
            return Err(MigrationError::unsupported(self.name(), "drop index if exists"));
        }
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
            "DROP INDEX {} ON {}",
            self.quote_identifier(&index.name),
            self.quote_table(index.prefix.as_deref(), &index.table)
        ))
    }

    fn rename_index_sql(&self, index: &Index, to: &str) -> Result<String, MigrationError> {
        Ok(format!(
            "ALTER TABLE {} RENAME INDEX {} TO {}",
            self.quote_table(index.prefix.as_deref(), &index.table),
            self.quote_identifier(&index.name),
            self.quote_identifier(to)
        ))
    }

    fn drop_constraint_sql(
        &self,
        constraint: &Constraint,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError> {
        if if_exists || mode == DropMode::Cascade {
            return Err(MigrationError::unsupported(
                self.name(),
                "drop constraint if exists or cascade",
            ));
        }
        Ok(format!(
            "ALTER TABLE {} DROP CHECK {}",
            self.quote_table(constraint.prefix.as_deref(), &constraint.table),
            self.quote_identifier(&constraint.name)
        ))
    }
}
