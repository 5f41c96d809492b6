//! Semantic inverses of forward commands.
//!
//! A backward run without a hand-written `down` replays the forward body and
//! undoes each command through [`reverse`]. Anything without a well-defined
//! inverse yields `None` and the run fails.

use crate::command::{ChangeOp, Command, DropMode};
use crate::field::{ColumnOptions, ModifyFrom};

pub fn reverse(command: &Command) -> Option<Command> {
    match command {
        Command::CreateIndex {
            index,
            if_not_exists,
        } => Some(Command::DropIndex {
            index: index.clone(),
            if_exists: *if_not_exists,
            mode: DropMode::Restrict,
        }),
        Command::DropIndex {
            index, if_exists, ..
        } => Some(Command::CreateIndex {
            index: index.clone(),
            if_not_exists: *if_exists,
        }),
        Command::RenameIndex { index, to } => {
            let mut renamed = index.clone();
            renamed.name = to.clone();
            Some(Command::RenameIndex {
                index: renamed,
                to: index.name.clone(),
            })
        }
        Command::CreateTable {
            table,
            if_not_exists,
            ..
        } => Some(Command::DropTable {
            table: table.clone(),
            if_exists: *if_not_exists,
            mode: DropMode::Restrict,
        }),
        Command::RenameTable { from, to } => Some(Command::RenameTable {
            from: to.clone(),
            to: from.clone(),
        }),
        Command::RenameColumn { table, from, to } => Some(Command::RenameColumn {
            table: table.clone(),
            from: to.clone(),
            to: from.clone(),
        }),
        Command::AlterTable { table, changes } => {
            reverse_ops(changes).map(|changes| Command::AlterTable {
                table: table.clone(),
                changes,
            })
        }
        Command::CreateConstraint {
            constraint,
            if_not_exists,
        } => Some(Command::DropConstraint {
            constraint: constraint.clone(),
            if_exists: *if_not_exists,
            mode: DropMode::Restrict,
        }),
        Command::DropTable { .. } | Command::DropConstraint { .. } | Command::Execute(_) => None,
    }
}

/// Reverse each column change in place, keeping list order.
///
/// Column changes are independent of one another, so undoing them top to
/// bottom is as correct as the forward order was. Options dropped by an add or
/// remove are not restored.
pub fn reverse_ops(ops: &[ChangeOp]) -> Option<Vec<ChangeOp>> {
    ops.iter().map(reverse_op).collect()
}

fn reverse_op(op: &ChangeOp) -> Option<ChangeOp> {
    match op {
        ChangeOp::Add { column, ty, .. } => Some(ChangeOp::Remove {
            column: column.clone(),
            ty: ty.clone(),
            opts: ColumnOptions::default(),
        }),
        ChangeOp::Remove { column, ty, .. } => Some(ChangeOp::Add {
            column: column.clone(),
            ty: ty.clone(),
            opts: ColumnOptions::default(),
        }),
        ChangeOp::Modify { column, ty, opts } => match opts.from.as_ref()? {
            ModifyFrom::Type(previous) => {
                let mut reversed = opts.clone();
                reversed.from = Some(ModifyFrom::Type(ty.clone()));
                Some(ChangeOp::Modify {
                    column: column.clone(),
                    ty: previous.clone(),
                    opts: reversed,
                })
            }
            ModifyFrom::TypeWithOptions(previous, previous_opts) => {
                let mut reversed = (**previous_opts).clone();
                reversed.from = Some(ModifyFrom::TypeWithOptions(
                    ty.clone(),
                    Box::new(opts.without_from()),
                ));
                Some(ChangeOp::Modify {
                    column: column.clone(),
                    ty: previous.clone(),
                    opts: reversed,
                })
            }
        },
        ChangeOp::AddIfNotExists { .. }
        | ChangeOp::RemoveColumn { .. }
        | ChangeOp::RemoveIfExists { .. } => None,
    }
}
