use serde::Serialize;
use sqlx::FromRow;

use crate::core::models::question::QuestionType;
use crate::core::models::submission::AnswerValue;

/// Administrator-only review question, owned by the survey directly.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuditQuestion {
    pub id: i32,
    pub survey_id: i32,
    pub question_text: String,
    pub question_type: QuestionType,
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditAnswer {
    pub id: i32,
    pub survey_id: i32,
    pub question_id: i32,
    pub reviewer_id: i32,
    pub value: AnswerValue,
}
