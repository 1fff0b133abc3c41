use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use sqlx::{query, query_as, query_scalar, PgPool, QueryBuilder};

use crate::core::models::question::QuestionType;
use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, UpdateResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionCreation {
    question_text: String,
    question_type: QuestionType,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    has_other_option: bool,
    order_index: i32,
    /// Options only matter for select/radio/checkbox questions; position in
    /// the list becomes the option order_index.
    #[serde(default)]
    options: Vec<String>,
}

pub async fn create(section_id: Path<(i32,)>, Json(body): Json<QuestionCreation>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    if body.question_text.is_empty() {
        return Err(Error::Validation("question_text is required".into()));
    }
    let section_id = section_id.into_inner().0;
    let mut tx = db.begin().await?;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM sections WHERE id = $1)")
        .bind(section_id)
        .fetch_one(&mut tx)
        .await?;
    if !exists {
        return Err(Error::NotFound("section"));
    }
    let (id,): (i32,) = query_as(
        "
    INSERT INTO questions (section_id, question_text, question_type, is_required, has_other_option, order_index)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id",
    )
    .bind(section_id)
    .bind(body.question_text)
    .bind(body.question_type)
    .bind(body.is_required)
    .bind(body.has_other_option)
    .bind(body.order_index)
    .fetch_one(&mut tx)
    .await?;
    if !body.options.is_empty() {
        QueryBuilder::new("INSERT INTO question_options (question_id, option_text, order_index) ")
            .push_values(body.options.into_iter().enumerate(), |mut b, (i, text)| {
                b.push_bind(id);
                b.push_bind(text);
                b.push_bind(i as i32);
            })
            .build()
            .execute(&mut tx)
            .await?;
    }
    tx.commit().await?;
    Ok(Json(CreateResponse { id }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionUpdate {
    question_text: String,
    question_type: QuestionType,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    has_other_option: bool,
    order_index: i32,
}

pub async fn update(question_id: Path<(i32,)>, Json(body): Json<QuestionUpdate>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    if body.question_text.is_empty() {
        return Err(Error::Validation("question_text is required".into()));
    }
    let updated = query(
        "
    UPDATE questions
    SET question_text = $1, question_type = $2, is_required = $3, has_other_option = $4, order_index = $5
    WHERE id = $6",
    )
    .bind(body.question_text)
    .bind(body.question_type)
    .bind(body.is_required)
    .bind(body.has_other_option)
    .bind(body.order_index)
    .bind(question_id.into_inner().0)
    .execute(db.get_ref())
    .await?
    .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}

pub async fn delete_question(question_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = query("DELETE FROM questions WHERE id = $1")
        .bind(question_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}
