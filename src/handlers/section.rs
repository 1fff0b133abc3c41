use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar, PgPool};

use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, UpdateResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct SectionCreation {
    title: String,
    order_index: i32,
}

pub async fn create(survey_id: Path<(i32,)>, Json(body): Json<SectionCreation>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    if body.title.is_empty() {
        return Err(Error::Validation("title is required".into()));
    }
    let survey_id = survey_id.into_inner().0;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM surveys WHERE id = $1)")
        .bind(survey_id)
        .fetch_one(db.get_ref())
        .await?;
    if !exists {
        return Err(Error::NotFound("survey"));
    }
    let (id,): (i32,) = query_as("INSERT INTO sections (survey_id, title, order_index) VALUES ($1, $2, $3) RETURNING id")
        .bind(survey_id)
        .bind(body.title)
        .bind(body.order_index)
        .fetch_one(db.get_ref())
        .await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(section_id: Path<(i32,)>, Json(body): Json<SectionCreation>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    if body.title.is_empty() {
        return Err(Error::Validation("title is required".into()));
    }
    let updated = query("UPDATE sections SET title = $1, order_index = $2 WHERE id = $3")
        .bind(body.title)
        .bind(body.order_index)
        .bind(section_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}

pub async fn delete_section(section_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = query("DELETE FROM sections WHERE id = $1")
        .bind(section_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}
