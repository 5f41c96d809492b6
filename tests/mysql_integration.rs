//! MySQL integration tests
//!
//! These tests require a running MySQL instance. They are ignored by default.
//! To run them:
//!
//! ```sh
//! # Set environment variables (optional, defaults shown)
//! export MYSQL_HOST=localhost
//! export MYSQL_USER=root
//! export MYSQL_PASSWORD=root
//! export MYSQL_DB=ddl_runner_test
//!
//! # Run the ignored tests
//! cargo test --features mysql --test mysql_integration -- --ignored
//! ```
#![cfg(feature = "mysql")]

use std::env;

use ddl_runner::prelude::*;
use mysql::prelude::*;
use mysql::{Conn, Opts};

fn get_test_conn() -> Option<Conn> {
    let host = env::var("MYSQL_HOST").unwrap_or_else(|_| "localhost".to_string());
    let user = env::var("MYSQL_USER").unwrap_or_else(|_| "root".to_string());
    let password = env::var("MYSQL_PASSWORD").unwrap_or_else(|_| "root".to_string());
    let dbname = env::var("MYSQL_DB").unwrap_or_else(|_| "ddl_runner_test".to_string());

    let url = format!("mysql://{}:{}@{}/{}", user, password, host, dbname);
    let opts = Opts::from_url(&url).ok()?;
    Conn::new(opts).ok()
}

fn cleanup_tables(conn: &mut Conn) {
    let _ = conn.query_drop("DROP TABLE IF EXISTS posts");
    let _ = conn.query_drop("DROP TABLE IF EXISTS users");
}

fn table_exists(conn: &mut Conn, name: &str) -> bool {
    let count: Option<i64> = conn
        .exec_first(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = ?",
            (name,),
        )
        .unwrap_or(None);
    count.unwrap_or(0) > 0
}

fn create_users() -> Migration {
    Migration::new(20240101000000, "create_users").change(|m| {
        m.create(Table::new("users"), |t| {
            t.add("email", ColumnType::VarChar(255), ColumnOptions::new().not_null())?;
            t.add("name", ColumnType::VarChar(100), ColumnOptions::new())
        })?;
        m.create_index(Index::new("users", ["email"]).unique())
    })
}

fn widen_name() -> Migration {
    Migration::new(20240102000000, "widen_name").change(|m| {
        m.alter(Table::new("users"), |t| {
            t.modify(
                "name",
                ColumnType::VarChar(255),
                ColumnOptions::new().from_type(ColumnType::VarChar(100)),
            )?;
            t.add("age", ColumnType::Integer, ColumnOptions::new())
        })
    })
}

#[test]
#[ignore = "requires mysql connection"]
fn migrate_up_and_down() {
    let Some(mut conn) = get_test_conn() else {
        eprintln!("Skipping test: could not connect to MySQL");
        return;
    };
    cleanup_tables(&mut conn);
    let config = RepoConfig::new().log(LogLevel::Off);

    run(&create_users(), &mut conn, &config, Intent::Up).unwrap();
    run(&widen_name(), &mut conn, &config, Intent::Up).unwrap();
    assert!(table_exists(&mut conn, "users"));

    conn.exec_drop(
        "INSERT INTO users (email, name, age) VALUES (?, ?, ?)",
        ("a@example.com", "a".repeat(200), 30),
    )
    .unwrap();
    conn.query_drop("DELETE FROM users").unwrap();

    run(&widen_name(), &mut conn, &config, Intent::Down).unwrap();
    run(&create_users(), &mut conn, &config, Intent::Down).unwrap();
    assert!(!table_exists(&mut conn, "users"));
}
