use crate::field::{ColumnOptions, ColumnType};

/// One column change inside a create or alter table command.
///
/// Order within a list is the order applied to the database.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    Add {
        column: String,
        ty: ColumnType,
        opts: ColumnOptions,
    },
    AddIfNotExists {
        column: String,
        ty: ColumnType,
        opts: ColumnOptions,
    },
    Remove {
        column: String,
        ty: ColumnType,
        opts: ColumnOptions,
    },
    /// Remove without recording the column's type. Cannot be undone.
    RemoveColumn { column: String },
    RemoveIfExists { column: String, ty: ColumnType },
    Modify {
        column: String,
        ty: ColumnType,
        opts: ColumnOptions,
    },
}

impl ChangeOp {
    pub fn add(column: impl Into<String>, ty: ColumnType, opts: ColumnOptions) -> Self {
        ChangeOp::Add {
            column: column.into(),
            ty,
            opts,
        }
    }

    pub fn add_if_not_exists(
        column: impl Into<String>,
        ty: ColumnType,
        opts: ColumnOptions,
    ) -> Self {
        ChangeOp::AddIfNotExists {
            column: column.into(),
            ty,
            opts,
        }
    }

    pub fn remove(column: impl Into<String>, ty: ColumnType, opts: ColumnOptions) -> Self {
        ChangeOp::Remove {
            column: column.into(),
            ty,
            opts,
        }
    }

    pub fn remove_column(column: impl Into<String>) -> Self {
        ChangeOp::RemoveColumn {
            column: column.into(),
        }
    }

    pub fn remove_if_exists(column: impl Into<String>, ty: ColumnType) -> Self {
        ChangeOp::RemoveIfExists {
            column: column.into(),
            ty,
        }
    }

    pub fn modify(column: impl Into<String>, ty: ColumnType, opts: ColumnOptions) -> Self {
        ChangeOp::Modify {
            column: column.into(),
            ty,
            opts,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            ChangeOp::Add { column, .. }
            | ChangeOp::AddIfNotExists { column, .. }
            | ChangeOp::Remove { column, .. }
            | ChangeOp::RemoveColumn { column }
            | ChangeOp::RemoveIfExists { column, .. }
            | ChangeOp::Modify { column, .. } => column,
        }
    }

    pub fn describe(&self) -> String {
        let verb = match self {
            ChangeOp::Add { .. } => "add",
            ChangeOp::AddIfNotExists { .. } => "add_if_not_exists",
            ChangeOp::Remove { .. } | ChangeOp::RemoveColumn { .. } => "remove",
            ChangeOp::RemoveIfExists { .. } => "remove_if_exists",
            ChangeOp::Modify { .. } => "modify",
        };
        format!("{} {}", verb, self.column())
    }
}
