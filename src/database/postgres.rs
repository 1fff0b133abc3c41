use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{query, query_as, FromRow, PgPool, QueryBuilder};

use crate::core::models::audit::AuditAnswer;
use crate::core::models::question::Question;
use crate::core::models::submission::{Answer, AnswerValue, EmployeeInfo, NewAnswer, ResponseKind, Submission};
use crate::core::models::survey::Survey;
use crate::core::ports::{AuditStore, SubmissionStore, SurveyStore};
use crate::error::Error;

/// Postgres-backed store behind the service seams. Owns a pool handle;
/// cloning is cheap.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Sparse-column encoding of one tagged answer value. Only the column
/// matching `kind` is populated.
struct SparseValue {
    kind: ResponseKind,
    text: Option<String>,
    number: Option<f64>,
    array: Option<Json<Vec<Value>>>,
    object: Option<Json<Map<String, Value>>>,
}

impl From<AnswerValue> for SparseValue {
    fn from(value: AnswerValue) -> Self {
        let kind = value.kind();
        let mut sparse = SparseValue {
            kind,
            text: None,
            number: None,
            array: None,
            object: None,
        };
        match value {
            AnswerValue::Text(s) => sparse.text = Some(s),
            AnswerValue::Number(n) => sparse.number = Some(n),
            AnswerValue::Array(items) => sparse.array = Some(Json(items)),
            AnswerValue::Object(fields) => sparse.object = Some(Json(fields)),
        }
        sparse
    }
}

#[derive(FromRow)]
struct AnswerRow {
    id: i32,
    response_id: i32,
    question_id: i32,
    response_type: ResponseKind,
    text_response: Option<String>,
    number_response: Option<f64>,
    array_response: Option<Json<Vec<Value>>>,
    object_response: Option<Json<Map<String, Value>>>,
}

impl TryFrom<AnswerRow> for Answer {
    type Error = Error;
    fn try_from(row: AnswerRow) -> Result<Self, Error> {
        let value = AnswerValue::from_columns(
            row.response_type,
            row.text_response,
            row.number_response,
            row.array_response.map(|j| j.0),
            row.object_response.map(|j| j.0),
        )?;
        Ok(Answer {
            id: row.id,
            response_id: row.response_id,
            question_id: row.question_id,
            value,
        })
    }
}

#[derive(FromRow)]
struct AuditAnswerRow {
    id: i32,
    survey_id: i32,
    question_id: i32,
    reviewer_id: i32,
    response_type: ResponseKind,
    text_response: Option<String>,
    number_response: Option<f64>,
    array_response: Option<Json<Vec<Value>>>,
    object_response: Option<Json<Map<String, Value>>>,
}

impl TryFrom<AuditAnswerRow> for AuditAnswer {
    type Error = Error;
    fn try_from(row: AuditAnswerRow) -> Result<Self, Error> {
        let value = AnswerValue::from_columns(
            row.response_type,
            row.text_response,
            row.number_response,
            row.array_response.map(|j| j.0),
            row.object_response.map(|j| j.0),
        )?;
        Ok(AuditAnswer {
            id: row.id,
            survey_id: row.survey_id,
            question_id: row.question_id,
            reviewer_id: row.reviewer_id,
            value,
        })
    }
}

impl SurveyStore for PgStore {
    async fn survey(&self, id: i32) -> Result<Option<Survey>, Error> {
        let survey = query_as("SELECT * FROM surveys WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(survey)
    }

    async fn survey_questions(&self, survey_id: i32) -> Result<Vec<Question>, Error> {
        let questions = query_as(
            "
        SELECT q.*
        FROM sections AS s
        JOIN questions AS q ON s.id = q.section_id
        WHERE s.survey_id = $1
        ORDER BY s.order_index, q.order_index",
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }
}

impl SubmissionStore for PgStore {
    async fn create_submission(
        &self,
        survey_id: i32,
        employee: EmployeeInfo,
        completion_time_minutes: Option<i32>,
        answers: Vec<NewAnswer>,
    ) -> Result<i32, Error> {
        let mut tx = self.pool.begin().await?;
        let (id,): (i32,) = query_as(
            "
        INSERT INTO survey_responses (survey_id, employee_name, designation, department, supervisor, reports_to, completion_time_minutes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id",
        )
        .bind(survey_id)
        .bind(employee.name)
        .bind(employee.designation)
        .bind(employee.department)
        .bind(employee.supervisor)
        .bind(employee.reports_to)
        .bind(completion_time_minutes)
        .fetch_one(&mut tx)
        .await?;
        if !answers.is_empty() {
            QueryBuilder::new(
                "INSERT INTO question_responses (response_id, question_id, response_type, text_response, number_response, array_response, object_response) ",
            )
            .push_values(answers.into_iter(), |mut b, a| {
                let sparse = SparseValue::from(a.value);
                b.push_bind(id);
                b.push_bind(a.question_id);
                b.push_bind(sparse.kind);
                b.push_bind(sparse.text);
                b.push_bind(sparse.number);
                b.push_bind(sparse.array);
                b.push_bind(sparse.object);
            })
            .build()
            .execute(&mut tx)
            .await?;
        }
        tx.commit().await?;
        Ok(id)
    }

    async fn survey_submissions(&self, survey_id: i32) -> Result<Vec<Submission>, Error> {
        let submissions = query_as("SELECT * FROM survey_responses WHERE survey_id = $1 ORDER BY id")
            .bind(survey_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(submissions)
    }

    async fn survey_answers(&self, survey_id: i32) -> Result<Vec<Answer>, Error> {
        let rows: Vec<AnswerRow> = query_as(
            "
        SELECT qr.*
        FROM survey_responses AS sr
        JOIN question_responses AS qr ON sr.id = qr.response_id
        WHERE sr.survey_id = $1
        ORDER BY qr.id",
        )
        .bind(survey_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Answer::try_from).collect()
    }
}

impl AuditStore for PgStore {
    async fn replace_audit_answers(&self, survey_id: i32, reviewer_id: i32, answers: Vec<NewAnswer>) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;
        query("DELETE FROM audit_responses WHERE survey_id = $1 AND reviewer_id = $2")
            .bind(survey_id)
            .bind(reviewer_id)
            .execute(&mut tx)
            .await?;
        if !answers.is_empty() {
            QueryBuilder::new(
                "INSERT INTO audit_responses (survey_id, question_id, reviewer_id, response_type, text_response, number_response, array_response, object_response) ",
            )
            .push_values(answers.into_iter(), |mut b, a| {
                let sparse = SparseValue::from(a.value);
                b.push_bind(survey_id);
                b.push_bind(a.question_id);
                b.push_bind(reviewer_id);
                b.push_bind(sparse.kind);
                b.push_bind(sparse.text);
                b.push_bind(sparse.number);
                b.push_bind(sparse.array);
                b.push_bind(sparse.object);
            })
            .build()
            .execute(&mut tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn reviewer_audit_answers(&self, survey_id: i32, reviewer_id: i32) -> Result<Vec<AuditAnswer>, Error> {
        let rows: Vec<AuditAnswerRow> = query_as(
            "
        SELECT id, survey_id, question_id, reviewer_id, response_type, text_response, number_response, array_response, object_response
        FROM audit_responses
        WHERE survey_id = $1 AND reviewer_id = $2
        ORDER BY question_id",
        )
        .bind(survey_id)
        .bind(reviewer_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(AuditAnswer::try_from).collect()
    }
}
