pub mod backend;
mod builder;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod executor;
pub mod field;
pub mod log;
pub mod migration;
pub mod render;
pub mod reverse;
pub mod runner;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::backend::{Backend, MySql, Postgres, Sqlite};
    pub use crate::command::{
        Callback, ChangeOp, Command, Composite, Constraint, DropMode, Entry, Index, Literal,
        Table, Target,
    };
    pub use crate::config::{LockStrategy, MigrationConfig, RepoConfig};
    pub use crate::context::{Context, Direction, Intent, Operation};
    pub use crate::error::MigrationError;
    pub use crate::executor::{DdlExecutor, DdlOptions, LogEntry, SqlExecutor};
    pub use crate::field::{
        ColumnOptions, ColumnType, ForeignKey, ModifyFrom, ReferentialAction,
    };
    pub use crate::log::LogLevel;
    pub use crate::migration::{Hook, Migration, MigrationSource};
    pub use crate::reverse::{reverse, reverse_ops};
    pub use crate::runner::{plan, run, Runner};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    fn create_posts() -> Migration {
        Migration::new(20240102000000, "create_posts").change(|m| {
            m.create(Table::new("posts"), |t| {
                t.add(
                    "user_id",
                    ColumnType::BigInt,
                    ColumnOptions::new()
                        .not_null()
                        .references("users", "id")
                        .on_delete(ReferentialAction::Cascade),
                )?;
                t.add("title", ColumnType::Text, ColumnOptions::new().not_null())
            })?;
            m.create_index(Index::new("posts", ["user_id"]))?;
            m.alter(Table::new("users"), |t| {
                t.add("posts_count", ColumnType::Integer, ColumnOptions::new().default_value("0"))
            })
        })
    }

    #[test]
    fn full_migration_workflow() {
        let mut executed = Vec::new();
        let mut executor = SqlExecutor::new(Postgres, |sql: &str| {
            executed.push(sql.to_string());
            Ok(())
        });

        run(
            &create_posts(),
            &mut executor,
            &RepoConfig::default(),
            Intent::Up,
        )
        .unwrap();
        drop(executor);

        assert_eq!(executed.len(), 3);
        assert!(executed[0].contains("CREATE TABLE \"posts\""));
        assert!(executed[0].contains("\"id\" bigserial"));
        assert!(executed[0].contains("ON DELETE CASCADE"));
        assert!(executed[1].contains("CREATE INDEX \"posts_user_id_index\""));
        assert!(executed[2].contains("ADD COLUMN \"posts_count\""));
    }

    #[test]
    fn migration_rollback() {
        let mut executed = Vec::new();
        let mut executor = SqlExecutor::new(Postgres, |sql: &str| {
            executed.push(sql.to_string());
            Ok(())
        });

        run(
            &create_posts(),
            &mut executor,
            &RepoConfig::new().prefix("public"),
            Intent::Down,
        )
        .unwrap();
        drop(executor);

        assert_eq!(
            executed,
            vec![
                "ALTER TABLE \"public\".\"users\" DROP COLUMN \"posts_count\"",
                "DROP INDEX \"public\".\"posts_user_id_index\"",
                "DROP TABLE \"public\".\"posts\"",
            ]
        );
    }
}
