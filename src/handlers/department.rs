use actix_web::web::{Data, Json, Path};
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, FromRow, PgPool};

use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, List};

/// Canonical department list. Submission-time department strings are free
/// text and are never checked against it.
#[derive(Debug, Serialize, FromRow)]
pub struct Department {
    id: i32,
    name: String,
}

pub async fn list(db: Data<PgPool>) -> Result<Json<List<Department>>, Error> {
    let departments: Vec<Department> = query_as("SELECT * FROM departments ORDER BY name")
        .fetch_all(db.get_ref())
        .await?;
    let total = departments.len() as i64;
    Ok(Json(List::new(departments, total)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentCreation {
    name: String,
}

pub async fn create(Json(DepartmentCreation { name }): Json<DepartmentCreation>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    if name.is_empty() {
        return Err(Error::Validation("name is required".into()));
    }
    let (id,): (i32,) = query_as("INSERT INTO departments (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(db.get_ref())
        .await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn delete_department(department_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = query("DELETE FROM departments WHERE id = $1")
        .bind(department_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}
