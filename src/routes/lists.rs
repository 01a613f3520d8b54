use rocket::serde::json::Json;
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::Deserialize;

use crate::db::TodoDb;
use crate::error::ApiError;
use crate::models::{DataResponse, Page, TodoList};
use crate::routes::helpers::{parse_list_id, text_is_valid};
use crate::routes::params::{PageParams, total_pages};
use crate::session::SessionUser;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListRequest {
    pub name: Option<String>,
}

/// Create a todo list
#[openapi(tag = "Todo Lists")]
#[post("/list", data = "<payload>")]
pub async fn create_list(
    session: SessionUser,
    mut db: Connection<TodoDb>,
    payload: Option<Json<ListRequest>>,
) -> Result<Json<DataResponse<TodoList>>, ApiError> {
    let name = payload
        .and_then(|payload| payload.into_inner().name)
        .unwrap_or_default();
    if !text_is_valid(&name) {
        return Err(ApiError::BadRequest("Invalid name format detected".to_string()));
    }

    let list = sqlx::query_as::<_, TodoList>(
        r#"
        INSERT INTO todo_lists (name, created_by)
        VALUES ($1, $2)
        RETURNING id, name, created_on_date, last_updated_date, created_by
        "#,
    )
    .bind(&name)
    .bind(session.0.id)
    .fetch_one(&mut **db)
    .await?;

    log::info!("user {} created list {}", session.0.id, list.id);

    Ok(Json(DataResponse::new(list)))
}

/// Get a page of the user's todo lists
#[openapi(tag = "Todo Lists")]
#[get("/list?<params..>")]
pub async fn get_lists(
    session: SessionUser,
    mut db: Connection<TodoDb>,
    params: PageParams,
) -> Result<Json<DataResponse<Page<TodoList>>>, ApiError> {
    let (page, per_page) = params.parse()?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todo_lists WHERE created_by = $1")
        .bind(session.0.id)
        .fetch_one(&mut **db)
        .await?;

    let lists: Vec<TodoList> = sqlx::query_as(
        r#"
        SELECT id, name, created_on_date, last_updated_date, created_by
        FROM todo_lists
        WHERE created_by = $1
        ORDER BY id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(session.0.id)
    .bind(per_page)
    .bind((page - 1) * per_page)
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(DataResponse::new(Page {
        page,
        per_page,
        total_pages: total_pages(total, per_page),
        data: lists,
    })))
}

/// Rename a todo list
#[openapi(tag = "Todo Lists")]
#[put("/list/<id>", data = "<payload>")]
pub async fn update_list(
    session: SessionUser,
    mut db: Connection<TodoDb>,
    id: &str,
    payload: Option<Json<ListRequest>>,
) -> Result<Json<DataResponse<TodoList>>, ApiError> {
    let list_id = parse_list_id(id)?;

    let name = payload
        .and_then(|payload| payload.into_inner().name)
        .unwrap_or_default();
    if !text_is_valid(&name) {
        return Err(ApiError::BadRequest("Name cannot be blank".to_string()));
    }

    let list = sqlx::query_as::<_, TodoList>(
        r#"
        UPDATE todo_lists SET name = $1, last_updated_date = now()
        WHERE id = $2 AND created_by = $3
        RETURNING id, name, created_on_date, last_updated_date, created_by
        "#,
    )
    .bind(&name)
    .bind(list_id)
    .bind(session.0.id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound("list not found".to_string()))?;

    Ok(Json(DataResponse::new(list)))
}

/// Delete a todo list
#[openapi(tag = "Todo Lists")]
#[delete("/list/<id>")]
pub async fn delete_list(
    session: SessionUser,
    mut db: Connection<TodoDb>,
    id: &str,
) -> Result<Json<DataResponse<String>>, ApiError> {
    let list_id = parse_list_id(id)?;

    let result = sqlx::query("DELETE FROM todo_lists WHERE id = $1 AND created_by = $2")
        .bind(list_id)
        .bind(session.0.id)
        .execute(&mut **db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("List not found".to_string()));
    }

    log::info!("user {} removed list {}", session.0.id, list_id);

    Ok(Json(DataResponse::new(
        "Successfully removed list".to_string(),
    )))
}
