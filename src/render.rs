//! One-line human-readable descriptions of commands, used in run logs and
//! error messages.

use crate::command::{Command, Constraint, DropMode, Literal};
use crate::error::MigrationError;

pub fn describe(command: &Command) -> Result<String, MigrationError> {
    let line = match command {
        Command::CreateTable {
            table,
            if_not_exists,
            ..
        } => format!(
            "create table {}{}",
            if_not_exists_clause(*if_not_exists),
            qualified(table.prefix.as_deref(), &table.name)
        ),
        Command::AlterTable { table, .. } => {
            format!("alter table {}", qualified(table.prefix.as_deref(), &table.name))
        }
        Command::DropTable {
            table,
            if_exists,
            mode,
        } => format!(
            "drop table {}{}{}",
            if_exists_clause(*if_exists),
            qualified(table.prefix.as_deref(), &table.name),
            mode_clause(*mode)
        ),
        Command::RenameTable { from, to } => format!(
            "rename table {} to {}",
            qualified(from.prefix.as_deref(), &from.name),
            qualified(to.prefix.as_deref(), &to.name)
        ),
        Command::RenameColumn { table, from, to } => format!(
            "rename column {} to {} on table {}",
            from,
            to,
            qualified(table.prefix.as_deref(), &table.name)
        ),
        Command::CreateIndex {
            index,
            if_not_exists,
        } => format!(
            "create index {}{}",
            if_not_exists_clause(*if_not_exists),
            qualified(index.prefix.as_deref(), &index.name)
        ),
        Command::DropIndex {
            index,
            if_exists,
            mode,
        } => format!(
            "drop index {}{}{}",
            if_exists_clause(*if_exists),
            qualified(index.prefix.as_deref(), &index.name),
            mode_clause(*mode)
        ),
        Command::RenameIndex { index, to } => {
            format!("rename index {} to {}", index.name, to)
        }
        Command::CreateConstraint {
            constraint,
            if_not_exists,
        } => format!(
            "create {} constraint {}{} on table {}",
            constraint_kind(constraint)?,
            if_not_exists_clause(*if_not_exists),
            constraint.name,
            qualified(constraint.prefix.as_deref(), &constraint.table)
        ),
        Command::DropConstraint {
            constraint,
            if_exists,
            mode,
        } => format!(
            "drop constraint {}{} from table {}{}",
            if_exists_clause(*if_exists),
            constraint.name,
            qualified(constraint.prefix.as_deref(), &constraint.table),
            mode_clause(*mode)
        ),
        Command::Execute(Literal::Sql(sql)) => format!("execute {:?}", sql),
        Command::Execute(Literal::Callback(callback)) => format!("execute {:?}", callback),
    };
    Ok(line)
}

/// `check` or `exclude`; a constraint must carry exactly one of them.
pub(crate) fn constraint_kind(constraint: &Constraint) -> Result<&'static str, MigrationError> {
    match (&constraint.check, &constraint.exclude) {
        (Some(_), None) => Ok("check"),
        (None, Some(_)) => Ok("exclude"),
        (None, None) => Err(MigrationError::InvalidConstraint {
            name: constraint.name.clone(),
            reason: "a constraint must have either a check or exclude option",
        }),
        (Some(_), Some(_)) => Err(MigrationError::InvalidConstraint {
            name: constraint.name.clone(),
            reason: "a constraint must not have both check and exclude options",
        }),
    }
}

fn qualified(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}.{}", prefix, name),
        None => name.to_string(),
    }
}

fn if_exists_clause(if_exists: bool) -> &'static str {
    if if_exists {
        "if exists "
    } else {
        ""
    }
}

fn if_not_exists_clause(if_not_exists: bool) -> &'static str {
    if if_not_exists {
        "if not exists "
    } else {
        ""
    }
}

fn mode_clause(mode: DropMode) -> &'static str {
    match mode {
        DropMode::Restrict => "",
        DropMode::Cascade => " cascade",
    }
}
