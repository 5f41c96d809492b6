//! PostgreSQL integration tests
//!
//! These tests require a running PostgreSQL instance. They are ignored by default.
//! To run them:
//!
//! ```sh
//! # Set environment variables (optional, defaults shown)
//! export POSTGRES_HOST=localhost
//! export POSTGRES_USER=postgres
//! export POSTGRES_PASSWORD=postgres
//! export POSTGRES_DB=ddl_runner_test
//!
//! # Run the ignored tests
//! cargo test --features postgres --test postgres_integration -- --ignored
//! ```
#![cfg(feature = "postgres")]

use std::env;

use ddl_runner::prelude::*;
use postgres::{Client, NoTls};

fn get_test_client() -> Option<Client> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let user = env::var("POSTGRES_USER").unwrap_or_else(|_| "postgres".to_string());
    let password = env::var("POSTGRES_PASSWORD").unwrap_or_else(|_| "postgres".to_string());
    let dbname = env::var("POSTGRES_DB").unwrap_or_else(|_| "ddl_runner_test".to_string());

    let config = format!(
        "host={} user={} password={} dbname={}",
        host, user, password, dbname
    );

    Client::connect(&config, NoTls).ok()
}

fn cleanup_tables(client: &mut Client) {
    let _ = client.batch_execute("DROP TABLE IF EXISTS posts CASCADE");
    let _ = client.batch_execute("DROP TABLE IF EXISTS users CASCADE");
}

fn table_exists(client: &mut Client, name: &str) -> bool {
    client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
            &[&name],
        )
        .map(|row| row.get(0))
        .unwrap_or(false)
}

fn create_users() -> Migration {
    Migration::new(20240101000000, "create_users").change(|m| {
        m.create(Table::new("users"), |t| {
            t.add("email", ColumnType::Text, ColumnOptions::new().not_null())?;
            t.add("name", ColumnType::VarChar(100), ColumnOptions::new())
        })?;
        m.create_index(Index::new("users", ["email"]).unique())?;
        m.create_constraint(Constraint::check(
            "users",
            "email_not_blank",
            "length(email) > 0",
        ))
    })
}

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
        m.alter(Table::new("users"), |t| {
            t.modify(
                "name",
                ColumnType::Text,
                ColumnOptions::new().from_type(ColumnType::VarChar(100)),
            )
        })
    })
}

#[test]
#[ignore = "requires postgres connection"]
fn migrate_up_and_down_in_a_transaction() {
    let Some(mut client) = get_test_client() else {
        eprintln!("Skipping test: could not connect to PostgreSQL");
        return;
    };
    cleanup_tables(&mut client);
    let config = RepoConfig::new().prefix("public");

    for migration in [create_users(), create_posts()] {
        let mut tx = client.transaction().unwrap();
        run(&migration, &mut tx, &config, Intent::Up).unwrap();
        tx.commit().unwrap();
    }
    assert!(table_exists(&mut client, "users"));
    assert!(table_exists(&mut client, "posts"));

    for migration in [create_posts(), create_users()] {
        let mut tx = client.transaction().unwrap();
        run(&migration, &mut tx, &config, Intent::Down).unwrap();
        tx.commit().unwrap();
    }
    assert!(!table_exists(&mut client, "posts"));
    assert!(!table_exists(&mut client, "users"));
}

#[test]
#[ignore = "requires postgres connection"]
fn can_insert_data_after_migration() {
    let Some(mut client) = get_test_client() else {
        eprintln!("Skipping test: could not connect to PostgreSQL");
        return;
    };
    cleanup_tables(&mut client);
    let config = RepoConfig::new().log(LogLevel::Off);

    run(&create_users(), &mut client, &config, Intent::Up).unwrap();
    run(&create_posts(), &mut client, &config, Intent::Up).unwrap();

    client
        .execute("INSERT INTO users (email) VALUES ($1)", &[&"a@example.com"])
        .unwrap();
    client
        .execute(
            "INSERT INTO posts (user_id, title) VALUES ((SELECT id FROM users), $1)",
            &[&"hello"],
        )
        .unwrap();

    let blank = client.execute("INSERT INTO users (email) VALUES ('')", &[]);
    assert!(blank.is_err());

    cleanup_tables(&mut client);
}

#[test]
#[ignore = "requires postgres connection"]
fn concurrent_index_outside_transaction() {
    let Some(mut client) = get_test_client() else {
        eprintln!("Skipping test: could not connect to PostgreSQL");
        return;
    };
    cleanup_tables(&mut client);
    let config = RepoConfig::new().log(LogLevel::Off);
    run(&create_users(), &mut client, &config, Intent::Up).unwrap();

    let index = Migration::new(20240103000000, "index_names")
        .config(
            MigrationConfig::new()
                .disable_ddl_transaction(true)
                .disable_migration_lock(true),
        )
        .change(|m| m.create_index(Index::new("users", ["name"]).concurrently()));

    run(&index, &mut client, &config, Intent::Up).unwrap();
    run(&index, &mut client, &config, Intent::Down).unwrap();

    cleanup_tables(&mut client);
}
