use actix_web::http::StatusCode;
use actix_web::web::{Data, Json, Path};
use actix_web::HttpResponse;
use serde::Deserialize;
use serde_json::Value;
use sqlx::{query, query_as, query_scalar, PgPool};

use crate::context::UserInfo;
use crate::core::models::audit::{AuditAnswer, AuditQuestion};
use crate::core::models::question::QuestionType;
use crate::core::services::audit;
use crate::database::postgres::PgStore;
use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, List, UpdateResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuestionCreation {
    question_text: String,
    question_type: QuestionType,
    order_index: i32,
}

pub async fn create_question(survey_id: Path<(i32,)>, Json(body): Json<AuditQuestionCreation>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    if body.question_text.is_empty() {
        return Err(Error::Validation("question_text is required".into()));
    }
    let survey_id = survey_id.into_inner().0;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM surveys WHERE id = $1)")
        .bind(survey_id)
        .fetch_one(db.get_ref())
        .await?;
    if !exists {
        return Err(Error::NotFound("survey"));
    }
    let (id,): (i32,) = query_as(
        "
    INSERT INTO audit_questions (survey_id, question_text, question_type, order_index)
    VALUES ($1, $2, $3, $4)
    RETURNING id",
    )
    .bind(survey_id)
    .bind(body.question_text)
    .bind(body.question_type)
    .bind(body.order_index)
    .fetch_one(db.get_ref())
    .await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn questions(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<List<AuditQuestion>>, Error> {
    let questions: Vec<AuditQuestion> = query_as("SELECT * FROM audit_questions WHERE survey_id = $1 ORDER BY order_index")
        .bind(survey_id.into_inner().0)
        .fetch_all(db.get_ref())
        .await?;
    let total = questions.len() as i64;
    Ok(Json(List::new(questions, total)))
}

pub async fn update_question(question_id: Path<(i32,)>, Json(body): Json<AuditQuestionCreation>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    if body.question_text.is_empty() {
        return Err(Error::Validation("question_text is required".into()));
    }
    let updated = query("UPDATE audit_questions SET question_text = $1, question_type = $2, order_index = $3 WHERE id = $4")
        .bind(body.question_text)
        .bind(body.question_type)
        .bind(body.order_index)
        .bind(question_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}

pub async fn delete_question(question_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = query("DELETE FROM audit_questions WHERE id = $1")
        .bind(question_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}

#[derive(Debug, Deserialize)]
pub struct AuditSubmit {
    answers: Option<Value>,
}

/// Reviewer refill: replaces the caller's previous audit answers for the
/// survey with the submitted set.
pub async fn submit_responses(
    user_info: UserInfo,
    survey_id: Path<(i32,)>,
    Json(AuditSubmit { answers }): Json<AuditSubmit>,
    store: Data<PgStore>,
) -> Result<HttpResponse, Error> {
    audit::submit(store.get_ref(), survey_id.into_inner().0, user_info.id, answers).await?;
    Ok(HttpResponse::build(StatusCode::OK).finish())
}

pub async fn responses(user_info: UserInfo, survey_id: Path<(i32,)>, store: Data<PgStore>) -> Result<Json<List<AuditAnswer>>, Error> {
    let answers = audit::reviewer_answers(store.get_ref(), survey_id.into_inner().0, user_info.id).await?;
    let total = answers.len() as i64;
    Ok(Json(List::new(answers, total)))
}
