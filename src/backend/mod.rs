mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use sea_query::{
    Alias, ColumnDef, ForeignKey as SeaForeignKey, ForeignKeyAction, Index as SeaIndex,
    IndexCreateStatement, IntoTableRef, Table as SeaTable, TableAlterStatement,
    TableCreateStatement, TableDropStatement, TableRef, TableRenameStatement,
};

use crate::command::{ChangeOp, Command, Constraint, DropMode, Index, Literal, Table};
use crate::error::MigrationError;
use crate::field::{ColumnOptions, ColumnType, ReferentialAction};
use crate::render::constraint_kind;

/// Renders commands to SQL for one database dialect.
///
/// Table DDL goes through sea-query; index and constraint DDL that sea-query
/// cannot express is written by hand per dialect.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;
    fn supports_alter_column(&self) -> bool;
    fn supports_drop_cascade(&self) -> bool;

    fn build_table_create(&self, stmt: TableCreateStatement) -> String;
    fn build_table_drop(&self, stmt: TableDropStatement) -> String;
    fn build_table_rename(&self, stmt: TableRenameStatement) -> String;
    fn build_table_alter(&self, stmt: TableAlterStatement) -> String;
    fn build_index_create(&self, stmt: IndexCreateStatement) -> String;

    fn quote_identifier(&self, name: &str) -> String;

    fn quote_table(&self, prefix: Option<&str>, name: &str) -> String {
        match prefix {
            Some(prefix) => format!(
                "{}.{}",
                self.quote_identifier(prefix),
                self.quote_identifier(name)
            ),
            None => self.quote_identifier(name),
        }
    }

    /// SQL statements for one command, in execution order.
    fn command_sql(&self, command: &Command) -> Result<Vec<String>, MigrationError> {
        match command {
            Command::CreateTable {
                table,
                if_not_exists,
                columns,
            } => self.create_table_sql(table, *if_not_exists, columns),
            Command::AlterTable { table, changes } => changes
                .iter()
                .map(|op| self.alter_table_sql(table, op))
                .collect(),
            Command::DropTable {
                table,
                if_exists,
                mode,
            } => Ok(vec![self.drop_table_sql(table, *if_exists, *mode)?]),
            Command::RenameTable { from, to } => Ok(vec![self.rename_table_sql(from, to)]),
            Command::RenameColumn { table, from, to } => {
                Ok(vec![self.rename_column_sql(table, from, to)])
            }
            Command::CreateIndex {
                index,
                if_not_exists,
            } => Ok(vec![self.create_index_sql(index, *if_not_exists)?]),
            Command::DropIndex {
                index,
                if_exists,
                mode,
            } => Ok(vec![self.drop_index_sql(index, *if_exists, *mode)?]),
            Command::RenameIndex { index, to } => Ok(vec![self.rename_index_sql(index, to)?]),
            Command::CreateConstraint {
                constraint,
                if_not_exists,
            } => Ok(vec![self.add_constraint_sql(constraint, *if_not_exists)?]),
            Command::DropConstraint {
                constraint,
                if_exists,
                mode,
            } => Ok(vec![self.drop_constraint_sql(constraint, *if_exists, *mode)?]),
            Command::Execute(Literal::Sql(sql)) => Ok(vec![sql.clone()]),
            Command::Execute(Literal::Callback(_)) => Err(MigrationError::unsupported(
                self.name(),
                "rendering callbacks as SQL",
            )),
        }
    }

    fn create_table_sql(
        &self,
        table: &Table,
        if_not_exists: bool,
        columns: &[ChangeOp],
    ) -> Result<Vec<String>, MigrationError> {
        let mut stmt = SeaTable::create();
        stmt.table(table_ref(table.prefix.as_deref(), &table.name));

        if if_not_exists {
            stmt.if_not_exists();
        }

        for op in columns {
            match op {
                ChangeOp::Add { column, ty, opts } | ChangeOp::AddIfNotExists { column, ty, opts } => {
                    stmt.col(column_def(column, ty, opts));

                    if let Some(ref fk) = opts.references {
                        stmt.foreign_key(
                            SeaForeignKey::create()
                                .from_col(Alias::new(column))
                                .to_tbl(table_ref(table.prefix.as_deref(), &fk.table))
                                .to_col(Alias::new(&fk.column))
                                .on_delete(referential_action_to_sea(&fk.on_delete))
                                .on_update(referential_action_to_sea(&fk.on_update)),
                        );
                    }
                }
                other => {
                    return Err(MigrationError::unsupported(
                        self.name(),
                        format!("`{}` inside create table", other.describe()),
                    ))
                }
            }
        }

        Ok(vec![self.build_table_create(stmt)])
    }

    fn alter_table_sql(&self, table: &Table, op: &ChangeOp) -> Result<String, MigrationError> {
        let mut stmt = SeaTable::alter();
        stmt.table(table_ref(table.prefix.as_deref(), &table.name));

        match op {
            ChangeOp::Add { column, ty, opts } => {
                stmt.add_column(added_column_def(self, table, column, ty, opts));
            }
            ChangeOp::AddIfNotExists { column, ty, opts } => {
                stmt.add_column_if_not_exists(added_column_def(self, table, column, ty, opts));
            }
            ChangeOp::Remove { column, .. } | ChangeOp::RemoveColumn { column } => {
                stmt.drop_column(Alias::new(column));
            }
            ChangeOp::RemoveIfExists { column, .. } => {
                return self.drop_column_if_exists_sql(table, column);
            }
            ChangeOp::Modify { column, ty, opts } => {
                if !self.supports_alter_column() {
                    return Err(MigrationError::unsupported(
                        self.name(),
                        format!("modifying column {}", column),
                    ));
                }
                let mut col = ColumnDef::new(Alias::new(column));
                apply_column_type(&mut col, ty);
                if let Some(null) = opts.null {
                    if null {
                        col.null();
                    } else {
                        col.not_null();
                    }
                }
                if let Some(ref default) = opts.default {
                    col.default(sea_query::Expr::cust(default));
                }
                stmt.modify_column(col);
            }
        }

        Ok(self.build_table_alter(stmt))
    }

    fn drop_column_if_exists_sql(
        &self,
        _table: &Table,
        column: &str,
    ) -> Result<String, MigrationError> {
        Err(MigrationError::unsupported(
            self.name(),
            format!("dropping column {} if it exists", column),
        ))
    }

    fn drop_table_sql(
        &self,
        table: &Table,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError> {
        let mut stmt = SeaTable::drop();
        stmt.table(table_ref(table.prefix.as_deref(), &table.name));

        if if_exists {
            stmt.if_exists();
        }

        if mode == DropMode::Cascade {
            if !self.supports_drop_cascade() {
                return Err(MigrationError::unsupported(self.name(), "drop table cascade"));
            }
            stmt.cascade();
        }

        Ok(self.build_table_drop(stmt))
    }

    fn rename_table_sql(&self, from: &Table, to: &Table) -> String {
        let stmt = SeaTable::rename()
            .table(
                table_ref(from.prefix.as_deref(), &from.name),
                table_ref(to.prefix.as_deref(), &to.name),
            )
            .to_owned();
        self.build_table_rename(stmt)
    }

    fn rename_column_sql(&self, table: &Table, from: &str, to: &str) -> String {
        let stmt = SeaTable::alter()
            .table(table_ref(table.prefix.as_deref(), &table.name))
            .rename_column(Alias::new(from), Alias::new(to))
            .to_owned();
        self.build_table_alter(stmt)
    }

    fn create_index_sql(&self, index: &Index, if_not_exists: bool) -> Result<String, MigrationError> {
        if index.concurrently {
            return Err(MigrationError::unsupported(
                self.name(),
                "building indexes concurrently",
            ));
        }
        Ok(self.build_index_create(index_create_statement(index, if_not_exists)))
    }

    fn drop_index_sql(
        &self,
        index: &Index,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError>;

    fn rename_index_sql(&self, index: &Index, to: &str) -> Result<String, MigrationError>;

    fn add_constraint_sql(
        &self,
        constraint: &Constraint,
        if_not_exists: bool,
    ) -> Result<String, MigrationError> {
        constraint_kind(constraint)?;
        if if_not_exists {
            return Err(MigrationError::unsupported(
                self.name(),
                "creating constraints if not exists",
            ));
        }
        match (&constraint.check, &constraint.exclude) {
            (Some(expression), _) => Ok(format!(
                "ALTER TABLE {} ADD CONSTRAINT {} CHECK ({})",
                self.quote_table(constraint.prefix.as_deref(), &constraint.table),
                self.quote_identifier(&constraint.name),
                expression
            )),
            _ => Err(MigrationError::unsupported(self.name(), "exclusion constraints")),
        }
    }

    fn drop_constraint_sql(
        &self,
        constraint: &Constraint,
        if_exists: bool,
        mode: DropMode,
    ) -> Result<String, MigrationError>;
}

pub(crate) fn table_ref(prefix: Option<&str>, name: &str) -> TableRef {
    match prefix {
        Some(prefix) => (Alias::new(prefix), Alias::new(name)).into_table_ref(),
        None => Alias::new(name).into_table_ref(),
    }
}

pub(crate) fn index_create_statement(index: &Index, if_not_exists: bool) -> IndexCreateStatement {
    let mut stmt = SeaIndex::create();
    stmt.name(&index.name)
        .table(table_ref(index.prefix.as_deref(), &index.table));

    if index.unique {
        stmt.unique();
    }

    if if_not_exists {
        stmt.if_not_exists();
    }

    for column in &index.columns {
        stmt.col(Alias::new(column));
    }

    stmt.to_owned()
}

/// Foreign keys on added columns render inline; the referenced table shares
/// the altered table's prefix.
fn added_column_def<B: Backend + ?Sized>(
    backend: &B,
    table: &Table,
    column: &str,
    ty: &ColumnType,
    opts: &ColumnOptions,
) -> ColumnDef {
    let mut col = column_def(column, ty, opts);
    if let Some(ref fk) = opts.references {
        col.extra(format!(
            "REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
            backend.quote_table(table.prefix.as_deref(), &fk.table),
            backend.quote_identifier(&fk.column),
            fk.on_delete.as_sql(),
            fk.on_update.as_sql()
        ));
    }
    col
}

fn column_def(name: &str, ty: &ColumnType, opts: &ColumnOptions) -> ColumnDef {
    let mut col = ColumnDef::new(Alias::new(name));

    apply_column_type(&mut col, ty);

    if opts.primary_key {
        col.primary_key();
        if ty.is_serial() {
            col.auto_increment();
        }
    }

    if opts.null == Some(false) && !opts.primary_key {
        col.not_null();
    }

    if opts.unique && !opts.primary_key {
        col.unique_key();
    }

    if let Some(ref default) = opts.default {
        col.default(sea_query::Expr::cust(default));
    }

    col
}

fn apply_column_type(col: &mut ColumnDef, ty: &ColumnType) {
    match ty {
        ColumnType::Serial | ColumnType::Integer => {
            col.integer();
        }
        ColumnType::BigSerial | ColumnType::BigInt => {
            col.big_integer();
        }
        ColumnType::SmallInt => {
            col.small_integer();
        }
        ColumnType::Text => {
            col.text();
        }
        ColumnType::VarChar(len) => {
            col.string_len(*len as u32);
        }
        ColumnType::Boolean => {
            col.boolean();
        }
        ColumnType::Timestamp => {
            col.timestamp();
        }
        ColumnType::TimestampTz => {
            col.timestamp_with_time_zone();
        }
        ColumnType::Date => {
            col.date();
        }
        ColumnType::Time => {
            col.time();
        }
        ColumnType::Uuid => {
            col.uuid();
        }
        ColumnType::Json => {
            col.json();
        }
        ColumnType::JsonB => {
            col.json_binary();
        }
        ColumnType::Binary => {
            col.binary();
        }
        ColumnType::Real => {
            col.float();
        }
        ColumnType::DoublePrecision => {
            col.double();
        }
        ColumnType::Decimal { precision, scale } => {
            col.decimal_len(*precision as u32, *scale as u32);
        }
        ColumnType::Custom(name) => {
            col.custom(Alias::new(name));
        }
    }
}

fn referential_action_to_sea(action: &ReferentialAction) -> ForeignKeyAction {
    match action {
        ReferentialAction::NoAction => ForeignKeyAction::NoAction,
        ReferentialAction::Restrict => ForeignKeyAction::Restrict,
        ReferentialAction::Cascade => ForeignKeyAction::Cascade,
        ReferentialAction::SetNull => ForeignKeyAction::SetNull,
        ReferentialAction::SetDefault => ForeignKeyAction::SetDefault,
    }
}
