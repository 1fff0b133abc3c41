use actix_web::web::{Data, Json, Path, Query};
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, query_scalar, FromRow, PgPool};

use crate::core::models::user::Role;
use crate::error::Error;
use crate::request::Pagination;
use crate::response::{List, UpdateResponse};

#[derive(Debug, Serialize, FromRow)]
pub struct UserItem {
    id: i32,
    nickname: String,
    email: String,
    role: Role,
}

pub async fn list(Query(pagination): Query<Pagination>, db: Data<PgPool>) -> Result<Json<List<UserItem>>, Error> {
    let offset = pagination.offset()?;
    let total: i64 = query_scalar("SELECT COUNT(*) FROM users").fetch_one(db.get_ref()).await?;
    let users: Vec<UserItem> = query_as(
        "
    SELECT id, nickname, email, role
    FROM users
    ORDER BY id
    LIMIT $1
    OFFSET $2",
    )
    .bind(pagination.size)
    .bind(offset)
    .fetch_all(db.get_ref())
    .await?;
    Ok(Json(List::new(users, total)))
}

#[derive(Debug, Deserialize)]
pub struct RoleUpdate {
    role: Role,
}

pub async fn set_role(user_id: Path<(i32,)>, Json(RoleUpdate { role }): Json<RoleUpdate>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    let updated = query("UPDATE users SET role = $1 WHERE id = $2")
        .bind(role)
        .bind(user_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    if updated == 0 {
        return Err(Error::NotFound("user"));
    }
    Ok(Json(UpdateResponse::new(updated)))
}
