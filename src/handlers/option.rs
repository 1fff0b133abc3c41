use actix_web::web::{Data, Json, Path};
use serde::Deserialize;
use sqlx::{query, query_scalar, PgPool, QueryBuilder};

use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, UpdateResponse};

/// Appends options to a question, continuing its order_index sequence.
pub async fn add_options(question_id: Path<(i32,)>, Json(options): Json<Vec<String>>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    if options.is_empty() || options.iter().any(String::is_empty) {
        return Err(Error::Validation("option_text is required".into()));
    }
    let question_id = question_id.into_inner().0;
    let mut tx = db.begin().await?;
    let exists: bool = query_scalar("SELECT EXISTS(SELECT id FROM questions WHERE id = $1)")
        .bind(question_id)
        .fetch_one(&mut tx)
        .await?;
    if !exists {
        return Err(Error::NotFound("question"));
    }
    let next_index: i32 = query_scalar("SELECT COALESCE(MAX(order_index) + 1, 0) FROM question_options WHERE question_id = $1")
        .bind(question_id)
        .fetch_one(&mut tx)
        .await?;
    QueryBuilder::new("INSERT INTO question_options (question_id, option_text, order_index) ")
        .push_values(options.into_iter().enumerate(), |mut b, (i, text)| {
            b.push_bind(question_id);
            b.push_bind(text);
            b.push_bind(next_index + i as i32);
        })
        .build()
        .execute(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(Json(CreateResponse { id: question_id }))
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionUpdate {
    option_text: String,
    order_index: i32,
}

pub async fn update(option_id: Path<(i32,)>, Json(body): Json<OptionUpdate>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    if body.option_text.is_empty() {
        return Err(Error::Validation("option_text is required".into()));
    }
    let updated = query("UPDATE question_options SET option_text = $1, order_index = $2 WHERE id = $3")
        .bind(body.option_text)
        .bind(body.order_index)
        .bind(option_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}

pub async fn delete_option(option_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = query("DELETE FROM question_options WHERE id = $1")
        .bind(option_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}
