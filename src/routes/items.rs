use rocket::State;
use rocket::serde::json::Json;
use rocket_db_pools::{Connection, sqlx};
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::Deserialize;

use crate::db::TodoDb;
use crate::error::ApiError;
use crate::models::{DataResponse, ListItem};
use crate::routes::helpers::{parse_item_id, parse_list_id, text_is_valid};
use crate::session::SessionUser;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ItemRequest {
    pub description: Option<String>,
}

/// Add an item to a list
#[openapi(tag = "List Items")]
#[post("/list/<list_id>/item", data = "<payload>")]
pub async fn create_item(
    session: SessionUser,
    pool: &State<sqlx::PgPool>,
    list_id: &str,
    payload: Option<Json<ItemRequest>>,
) -> Result<Json<DataResponse<ListItem>>, ApiError> {
    let list_id = parse_list_id(list_id)?;

    let description = payload
        .and_then(|payload| payload.into_inner().description)
        .unwrap_or_default();
    if !text_is_valid(&description) {
        return Err(ApiError::BadRequest("Description cannot be null".to_string()));
    }

    // Creating an item also counts as updating its list.
    let mut tx = pool.begin().await?;

    let item = sqlx::query_as::<_, ListItem>(
        r#"
        INSERT INTO list_items (list_id, description)
        VALUES ($1, $2)
        RETURNING id, list_id, description, created_on_date
        "#,
    )
    .bind(list_id)
    .bind(&description)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE todo_lists SET last_updated_date = now() WHERE id = $1")
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    log::info!("user {} added item {} to list {}", session.0.id, item.id, list_id);

    Ok(Json(DataResponse::new(item)))
}

/// Get every item on a list
#[openapi(tag = "List Items")]
#[get("/list/<list_id>/item")]
pub async fn get_items(
    _session: SessionUser,
    mut db: Connection<TodoDb>,
    list_id: &str,
) -> Result<Json<DataResponse<Vec<ListItem>>>, ApiError> {
    let list_id = parse_list_id(list_id)?;

    let items: Vec<ListItem> = sqlx::query_as(
        r#"
        SELECT id, list_id, description, created_on_date
        FROM list_items
        WHERE list_id = $1
        ORDER BY created_on_date ASC
        "#,
    )
    .bind(list_id)
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(DataResponse::new(items)))
}

/// Rewrite an item's description
#[openapi(tag = "List Items")]
#[put("/list/<list_id>/item/<item_id>", data = "<payload>")]
pub async fn update_item(
    _session: SessionUser,
    mut db: Connection<TodoDb>,
    list_id: &str,
    item_id: &str,
    payload: Option<Json<ItemRequest>>,
) -> Result<Json<DataResponse<ListItem>>, ApiError> {
    let list_id = parse_list_id(list_id)?;
    let item_id = parse_item_id(item_id)?;

    let description = payload
        .and_then(|payload| payload.into_inner().description)
        .unwrap_or_default();
    if !text_is_valid(&description) {
        return Err(ApiError::BadRequest("Invalid format for description".to_string()));
    }

    let item = sqlx::query_as::<_, ListItem>(
        r#"
        UPDATE list_items SET description = $1
        WHERE id = $2 AND list_id = $3
        RETURNING id, list_id, description, created_on_date
        "#,
    )
    .bind(&description)
    .bind(item_id)
    .bind(list_id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    Ok(Json(DataResponse::new(item)))
}

/// Remove an item from a list
#[openapi(tag = "List Items")]
#[delete("/list/<list_id>/item/<item_id>")]
pub async fn delete_item(
    session: SessionUser,
    mut db: Connection<TodoDb>,
    list_id: &str,
    item_id: &str,
) -> Result<Json<DataResponse<String>>, ApiError> {
    let list_id = parse_list_id(list_id)?;
    let item_id = parse_item_id(item_id)?;

    let result = sqlx::query("DELETE FROM list_items WHERE id = $1 AND list_id = $2")
        .bind(item_id)
        .bind(list_id)
        .execute(&mut **db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Item does not exist".to_string()));
    }

    log::info!("user {} removed item {} from list {}", session.0.id, item_id, list_id);

    Ok(Json(DataResponse::new(
        "Successfully removed item".to_string(),
    )))
}
