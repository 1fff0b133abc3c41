use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(sqlx::Type)]
#[sqlx(type_name = "question_type")]
#[sqlx(rename_all = "snake_case")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Select,
    Radio,
    Checkbox,
    Rating,
    YesNo,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Question {
    pub id: i32,
    pub section_id: i32,
    pub question_text: String,
    pub question_type: QuestionType,
    pub is_required: bool,
    pub has_other_option: bool,
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QuestionOption {
    pub id: i32,
    pub question_id: i32,
    pub option_text: String,
    pub order_index: i32,
}
