use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Survey {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Survey {
    /// Whether the survey accepts submissions on the given day. Both window
    /// bounds are inclusive; an unset bound does not constrain.
    pub fn accepts_on(&self, day: NaiveDate) -> bool {
        if let Some(start) = self.start_date {
            if day < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if day > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Section {
    pub id: i32,
    pub survey_id: i32,
    pub title: String,
    pub order_index: i32,
}
