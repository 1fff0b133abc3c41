use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

use crate::error::Error;

/// Discriminator stored alongside each answer row.
#[derive(sqlx::Type)]
#[sqlx(type_name = "response_kind")]
#[sqlx(rename_all = "snake_case")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Text,
    Number,
    Array,
    Object,
}

/// One respondent's value for one question. The store keeps this as a
/// discriminator plus four sparse columns; inside the service it is a real
/// tagged variant so aggregation never branches on storage layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Number(f64),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl AnswerValue {
    /// Classifies a raw submitted value. The order of the checks is part of
    /// the wire contract: numbers before arrays, arrays before objects,
    /// everything else coerced to text. Null and the empty string mean
    /// "no answer" and yield `None`.
    pub fn classify(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) => n.as_f64().map(Self::Number),
            Value::Array(items) => Some(Self::Array(items)),
            Value::Object(fields) => Some(Self::Object(fields)),
            Value::String(s) => Some(Self::Text(s)),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
        }
    }

    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::Text(_) => ResponseKind::Text,
            Self::Number(_) => ResponseKind::Number,
            Self::Array(_) => ResponseKind::Array,
            Self::Object(_) => ResponseKind::Object,
        }
    }

    /// Rebuilds the variant from the sparse-column shape. Fails when the
    /// populated column does not match the declared kind.
    pub fn from_columns(
        kind: ResponseKind,
        text: Option<String>,
        number: Option<f64>,
        array: Option<Vec<Value>>,
        object: Option<Map<String, Value>>,
    ) -> Result<Self, Error> {
        match kind {
            ResponseKind::Text => text.map(Self::Text),
            ResponseKind::Number => number.map(Self::Number),
            ResponseKind::Array => array.map(Self::Array),
            ResponseKind::Object => object.map(Self::Object),
        }
        .ok_or_else(|| Error::Internal("answer value column does not match its declared kind".into()))
    }

    /// Normalized numeric accessor: the number variant, or the `main` field
    /// of an object-kind answer. Both representations occur in stored data.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Object(fields) => match fields.get("main") {
                Some(Value::Number(n)) => n.as_f64(),
                Some(Value::String(s)) => s.trim().parse().ok(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Normalized text accessor: the text variant, or the `main` field of an
    /// object-kind answer.
    pub fn main_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            Self::Object(fields) => fields.get("main").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Respondent identity captured at submission time. Every field is free text;
/// nothing is checked against the canonical department list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeInfo {
    pub name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub supervisor: Option<String>,
    pub reports_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Submission {
    pub id: i32,
    pub survey_id: i32,
    pub employee_name: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub supervisor: Option<String>,
    pub reports_to: Option<String>,
    pub completion_time_minutes: Option<i32>,
    pub submitted_at: DateTime<Utc>,
}

/// A classified answer waiting to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnswer {
    pub question_id: i32,
    pub value: AnswerValue,
}

/// A stored answer read back from the response store.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub id: i32,
    pub response_id: i32,
    pub question_id: i32,
    pub value: AnswerValue,
}
