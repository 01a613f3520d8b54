use todo_api_server::MIGRATOR;
use todo_api_server::test_support::{TestDatabase, TestDatabaseError};

#[tokio::test]
async fn migrations_apply_and_revert_cleanly() {
    let test_db = match TestDatabase::new().await {
        Ok(db) => db,
        Err(TestDatabaseError::Container(err)) => {
            eprintln!("skipping migration revert test: container runtime unavailable ({err})");
            return;
        }
        Err(err) => panic!("failed to provision test database: {err:?}"),
    };

    let pool = test_db.pool_clone();

    MIGRATOR.run(&pool).await.expect("migrations run");

    MIGRATOR.undo(&pool, 0).await.expect("migrations revert");

    let todo_list_tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'public' AND table_name = 'todo_lists'",
    )
    .fetch_one(&pool)
    .await
    .expect("lookup succeeded");

    assert_eq!(
        todo_list_tables, 0,
        "todo_lists should be dropped after revert"
    );

    MIGRATOR.run(&pool).await.expect("migrations rerun");

    let todo_list_tables_after: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'public' AND table_name = 'todo_lists'",
    )
    .fetch_one(&pool)
    .await
    .expect("lookup succeeded");

    assert_eq!(todo_list_tables_after, 1);

    test_db.close().await.expect("failed to drop test database");
}
