use sea_query::{
    IndexCreateStatement, PostgresQueryBuilder, TableAlterStatement, TableCreateStatement,
    TableDropStatement, TableRenameStatement,
};

use crate::backend::{index_create_statement, Backend};
use crate::command::{Constraint, DropMode, Index, Table};
use crate::error::MigrationError;
use crate::render::constraint_kind;

#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Backend for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn supports_alter_column(&self) -> bool {
        true
    }

    fn supports_drop_cascade(&self) -> bool {
        true
    }

    fn build_table_create(&self, stmt: TableCreateStatement) -> String {
        stmt.to_string(PostgresQueryBuilder)
    }

    fn build_table_drop(&self, stmt: TableDropStatement) -> String {
        stmt.to_string(PostgresQueryBuilder)
    }

    fn build_table_rename(&self, stmt: TableRenameStatement) -> String {
        stmt.to_string(PostgresQueryBuilder)
    }

    fn build_table_alter(&self, stmt: TableAlterStatement) -> String {
        stmt.to_string(PostgresQueryBuilder)
    }

    fn build_index_create(&self, stmt: IndexCreateStatement) -> String {
        stmt.to_string(PostgresQueryBuilder)
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn drop_column_if_exists_sql(
        &self,
        table: &Table,
        column: &str,
    ) -> Result<String, MigrationError> {
        Ok(format!(
            "ALTER TABLE {} DROP COLUMN IF EXISTS {}",
            self.quote_table(table.prefix.as_deref(), &table.name),
            self.quote_identifier(column)
        ))
    }

    fn create_index_sql(&self, index: &Index, if_not_exists: bool) -> Result<String, MigrationError> {
        let sql = self.build_index_create(index_create_statement(index, if_not_exists));
        if index.concurrently {
            // sea-query has no CONCURRENTLY; it goes right after INDEX.
            Ok(sql.replacen(" INDEX ", " INDEX CONCURRENTLY ", 1))
        } else {
            Ok(sql)
        }
    }

    fn drop_index_sql(
        &self,
        index: &Index,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError> {
        let mut sql = String::from("DROP INDEX ");
        if index.concurrently {
            sql.push_str("CONCURRENTLY ");
        }
        if if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote_table(index.prefix.as_deref(), &index.name));
        if mode == DropMode::Cascade {
            sql.push_str(" CASCADE");
        }
        Ok(sql)
    }

    fn rename_index_sql(&self, index: &Index, to: &str) -> Result<String, MigrationError> {
        Ok(format!(
            "ALTER INDEX {} RENAME TO {}",
            self.quote_table(index.prefix.as_deref(), &index.name),
            self.quote_identifier(to)
        ))
    }

    fn add_constraint_sql(
        &self,
        constraint: &Constraint,
        if_not_exists: bool,
    ) -> Result<String, MigrationError> {
        let kind = constraint_kind(constraint)?;
        if if_not_exists {
            return Err(MigrationError::unsupported(
                self.name(),
                "creating constraints if not exists",
            ));
        }
        let body = match kind {
            "check" => format!("CHECK ({})", constraint.check.as_deref().unwrap_or_default()),
            _ => format!(
                "EXCLUDE USING {}",
                constraint.exclude.as_deref().unwrap_or_default()
            ),
        };
        Ok(format!(
            "ALTER TABLE {} ADD CONSTRAINT {} {}",
            self.quote_table(constraint.prefix.as_deref(), &constraint.table),
            self.quote_identifier(&constraint.name),
            body
        ))
    }

    fn drop_constraint_sql(
        &self,
        constraint: &Constraint,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError> {
        let mut sql = format!(
            "ALTER TABLE {} DROP CONSTRAINT ",
            self.quote_table(constraint.prefix.as_deref(), &constraint.table)
        );
        if if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote_identifier(&constraint.name));
        if mode == DropMode::Cascade {
            sql.push_str(" CASCADE");
        }
        Ok(sql)
    }
}
