use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::models::question::QuestionType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentCount {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnalytics {
    pub question_id: i32,
    pub question_text: String,
    pub question_type: QuestionType,
    pub response_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<[i64; 5]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yes_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub survey_id: i32,
    pub total_responses: i64,
    pub department_breakdown: Vec<DepartmentCount>,
    pub question_analytics: Vec<QuestionAnalytics>,
    /// Informational only; never feeds any computed statistic.
    pub generated_at: DateTime<Utc>,
}
