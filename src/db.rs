use rocket_db_pools::{Database, sqlx};

#[derive(Database)]
#[database("todo_db")]
pub struct TodoDb(sqlx::PgPool);
