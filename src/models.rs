use chrono::{DateTime, Utc};
use rocket_db_pools::sqlx::FromRow;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ===== User Models =====

/// Public user profile.
///
/// This struct is serialized verbatim into the session token payload, so it
/// must never grow a credential field. Password hashes live only in the
/// `user_credentials` table and are read straight into locals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_on_date: DateTime<Utc>,
}

// ===== Todo List Models =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    pub id: i32,
    pub name: String,
    pub created_on_date: DateTime<Utc>,
    pub last_updated_date: DateTime<Utc>,
    pub created_by: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: i32,
    pub list_id: i32,
    pub description: String,
    pub created_on_date: DateTime<Utc>,
}

// ===== Response Envelopes =====

/// Every response body has the shape `{"data": ...}`, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub data: Vec<T>,
}
