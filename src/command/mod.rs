mod change;
mod target;

pub use change::ChangeOp;
pub use target::{Constraint, Index, Table, Target};

use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropMode {
    #[default]
    Restrict,
    Cascade,
}

/// The actions that open a composite command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    Create,
    CreateIfNotExists,
    Alter,
}

impl Composite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Composite::Create => "create",
            Composite::CreateIfNotExists => "create_if_not_exists",
            Composite::Alter => "alter",
        }
    }
}

/// A zero-argument side effect queued alongside DDL.
#[derive(Clone)]
pub struct Callback {
    pub label: String,
    action: Arc<dyn Fn() -> Result<(), String> + Send + Sync>,
}

impl Callback {
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            action: Arc::new(action),
        }
    }

    pub fn call(&self) -> Result<(), String> {
        (self.action)()
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#Function<{}>", self.label)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.action, &other.action)
    }
}

/// A pre-rendered instruction. Never reversible on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Sql(String),
    Callback(Callback),
}

/// A complete structural command, ready to queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTable {
        table: Table,
        if_not_exists: bool,
        columns: Vec<ChangeOp>,
    },
    AlterTable {
        table: Table,
        changes: Vec<ChangeOp>,
    },
    DropTable {
        table: Table,
        if_exists: bool,
        mode: DropMode,
    },
    RenameTable {
        from: Table,
        to: Table,
    },
    RenameColumn {
        table: Table,
        from: String,
        to: String,
    },
    CreateIndex {
        index: Index,
        if_not_exists: bool,
    },
    DropIndex {
        index: Index,
        if_exists: bool,
        mode: DropMode,
    },
    RenameIndex {
        index: Index,
        to: String,
    },
    CreateConstraint {
        constraint: Constraint,
        if_not_exists: bool,
    },
    DropConstraint {
        constraint: Constraint,
        if_exists: bool,
        mode: DropMode,
    },
    Execute(Literal),
}

impl Command {
    pub fn sql(sql: impl Into<String>) -> Self {
        Command::Execute(Literal::Sql(sql.into()))
    }

    pub fn callback<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Result<(), String> + Send + Sync + 'static,
    {
        Command::Execute(Literal::Callback(Callback::new(label, action)))
    }

    /// The index this command builds or drops concurrently, if any.
    pub fn concurrent_index(&self) -> Option<&Index> {
        match self {
            Command::CreateIndex { index, .. } | Command::DropIndex { index, .. }
                if index.concurrently =>
            {
                Some(index)
            }
            _ => None,
        }
    }

    /// Every target this command names, so prefixes can be resolved in one place.
    pub(crate) fn targets_mut(&mut self) -> Vec<&mut dyn Target> {
        match self {
            Command::CreateTable { table, .. }
            | Command::AlterTable { table, .. }
            | Command::DropTable { table, .. }
            | Command::RenameColumn { table, .. } => vec![table as &mut dyn Target],
            Command::RenameTable { from, to } => vec![from as &mut dyn Target, to],
            Command::CreateIndex { index, .. }
            | Command::DropIndex { index, .. }
            | Command::RenameIndex { index, .. } => vec![index as &mut dyn Target],
            Command::CreateConstraint { constraint, .. }
            | Command::DropConstraint { constraint, .. } => vec![constraint as &mut dyn Target],
            Command::Execute(_) => Vec::new(),
        }
    }
}

/// One queued unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Single(Command),
    /// Both directions supplied by the author; never passed through reversal.
    Reversible { up: Command, down: Command },
}

impl From<Command> for Entry {
    fn from(command: Command) -> Self {
        Entry::Single(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_index_only_for_concurrent_index_commands() {
        let plain = Command::CreateIndex {
            index: Index::new("users", ["email"]),
            if_not_exists: false,
        };
        assert!(plain.concurrent_index().is_none());

        let concurrent = Command::DropIndex {
            index: Index::new("users", ["email"]).concurrently(),
            if_exists: false,
            mode: DropMode::Restrict,
        };
        assert_eq!(
            concurrent.concurrent_index().map(|i| i.name.as_str()),
            Some("users_email_index")
        );

        assert!(Command::sql("SELECT 1").concurrent_index().is_none());
    }

    #[test]
    fn callback_runs_and_compares_by_identity() {
        let cb = Callback::new("seed", || Ok(()));
        let same = cb.clone();
        let other = Callback::new("seed", || Ok(()));

        assert_eq!(cb.call(), Ok(()));
        assert_eq!(cb, same);
        assert_ne!(cb, other);
        assert_eq!(format!("{:?}", cb), "#Function<seed>");
    }

    #[test]
    fn rename_table_exposes_both_targets() {
        let mut cmd = Command::RenameTable {
            from: Table::new("a"),
            to: Table::new("b"),
        };
        assert_eq!(cmd.targets_mut().len(), 2);
        assert!(Command::sql("x").targets_mut().is_empty());
    }
}
