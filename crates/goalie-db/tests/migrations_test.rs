//! Integration tests for database migrations and connection pooling.

use goalie_db::config::DbConfig;
use goalie_db::pool;

#[tokio::test]
async fn migrations_create_expected_tables() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("goalie.db");
    let config = DbConfig::new(format!("sqlite://{}", path.display()));

    let db_pool = pool::create_pool(&config)
        .await
        .expect("create_pool should create the file");
    pool::run_migrations(&db_pool)
        .await
        .expect("migrations should succeed");

    assert!(path.exists(), "database file should exist after connect");

    let counts = pool::table_counts(&db_pool).await.unwrap();
    let names: Vec<&str> = counts.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["goals", "tasks"]);
    assert!(counts.iter().all(|(_, c)| *c == 0));

    db_pool.close().await;
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("twice.db");
    let config = DbConfig::new(format!("sqlite://{}", path.display()));

    let db_pool = pool::create_pool(&config).await.unwrap();
    pool::run_migrations(&db_pool).await.unwrap();
    pool::run_migrations(&db_pool)
        .await
        .expect("second run should be a no-op");

    db_pool.close().await;
}

#[tokio::test]
async fn ping_succeeds_on_fresh_database() {
    let db_pool = goalie_test_utils::create_test_db().await;
    pool::ping(&db_pool).await.expect("ping should succeed");
    db_pool.close().await;
}
