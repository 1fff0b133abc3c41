use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;

use crate::core::models::submission::{AnswerValue, EmployeeInfo, NewAnswer};
use crate::core::ports::SubmissionStore;
use crate::error::Error;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub employee: Option<EmployeeInfo>,
    /// Raw question-id -> value mapping. Deserialized loosely so a malformed
    /// shape is reported as a validation error rather than a 400 from the
    /// JSON layer.
    pub answers: Option<Value>,
    pub completion_time_minutes: Option<i32>,
}

/// Turns the raw answers mapping into classified rows. Keys must be question
/// ids; entries whose value classifies to nothing (null, empty string) are
/// dropped, required or not.
pub fn classify_answers(raw: Option<Value>) -> Result<Vec<NewAnswer>, Error> {
    let fields = match raw {
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(Error::Validation("answers must be a question-id to value mapping".into())),
        None => return Err(Error::Validation("answers are required".into())),
    };
    let mut answers = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        let question_id: i32 = key
            .parse()
            .map_err(|_| Error::Validation(format!("invalid question id: {}", key)))?;
        if let Some(value) = AnswerValue::classify(value) {
            answers.push(NewAnswer { question_id, value });
        }
    }
    answers.sort_by_key(|a| a.question_id);
    Ok(answers)
}

/// Validates the survey and the request, classifies every answer, and writes
/// one submission row plus one answer row per non-empty entry. All checks run
/// before any write.
pub async fn submit<S>(store: &S, survey_id: i32, req: SubmitRequest) -> Result<i32, Error>
where
    S: SubmissionStore,
{
    let survey = store.survey(survey_id).await?.ok_or(Error::NotFound("survey"))?;
    if !survey.is_active {
        return Err(Error::Validation("survey is not active".into()));
    }
    if !survey.is_published {
        return Err(Error::Validation("survey is not published".into()));
    }
    if !survey.accepts_on(Utc::now().date_naive()) {
        return Err(Error::Validation("survey is outside its response window".into()));
    }
    let employee = req
        .employee
        .ok_or_else(|| Error::Validation("employee info is required".into()))?;
    let answers = classify_answers(req.answers)?;
    store.create_submission(survey_id, employee, req.completion_time_minutes, answers).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::services::testing::{closed_survey, not_yet_open_survey, open_survey, MemStore};
    use serde_json::json;

    fn request(answers: Value) -> SubmitRequest {
        SubmitRequest {
            employee: Some(EmployeeInfo {
                department: Some("Engineering".into()),
                ..Default::default()
            }),
            answers: Some(answers),
            completion_time_minutes: Some(7),
        }
    }

    #[tokio::test]
    async fn writes_one_answer_row_per_non_empty_entry() {
        let store = MemStore::with_survey(open_survey(1));
        let id = submit(&store, 1, request(json!({"1": 4, "2": "", "3": null, "4": "great"})))
            .await
            .unwrap();
        assert_eq!(id, 1);
        let answers = store.answers.lock().unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].question_id, 1);
        assert_eq!(answers[0].value, AnswerValue::Number(4.0));
        assert_eq!(answers[1].question_id, 4);
        assert_eq!(answers[1].value, AnswerValue::Text("great".into()));
    }

    #[tokio::test]
    async fn numbers_round_trip_through_the_store() {
        let store = MemStore::with_survey(open_survey(1));
        submit(&store, 1, request(json!({"9": 3.75}))).await.unwrap();
        let stored = store.survey_answers(1).await.unwrap();
        assert_eq!(stored[0].value, AnswerValue::Number(3.75));
    }

    #[tokio::test]
    async fn array_order_is_preserved() {
        let store = MemStore::with_survey(open_survey(1));
        submit(&store, 1, request(json!({"2": ["slack", "email", "in person"]})))
            .await
            .unwrap();
        let stored = store.survey_answers(1).await.unwrap();
        assert_eq!(
            stored[0].value,
            AnswerValue::Array(vec![json!("slack"), json!("email"), json!("in person")])
        );
    }

    #[tokio::test]
    async fn unknown_survey_is_not_found() {
        let store = MemStore::default();
        let err = submit(&store, 42, request(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn closed_survey_is_rejected_without_writes() {
        let store = MemStore::with_survey(closed_survey(1));
        let err = submit(&store, 1, request(json!({"1": 5}))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.submissions.lock().unwrap().is_empty());
        assert!(store.answers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn survey_before_start_date_is_rejected() {
        let store = MemStore::with_survey(not_yet_open_survey(1));
        let err = submit(&store, 1, request(json!({"1": 5}))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn inactive_or_unpublished_survey_is_rejected() {
        let mut inactive = open_survey(1);
        inactive.is_active = false;
        let store = MemStore::with_survey(inactive);
        assert!(matches!(submit(&store, 1, request(json!({}))).await, Err(Error::Validation(_))));

        let mut unpublished = open_survey(1);
        unpublished.is_published = false;
        let store = MemStore::with_survey(unpublished);
        assert!(matches!(submit(&store, 1, request(json!({}))).await, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn answers_must_be_a_mapping() {
        let store = MemStore::with_survey(open_survey(1));
        let err = submit(&store, 1, request(json!([1, 2, 3]))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_employee_info_is_rejected() {
        let store = MemStore::with_survey(open_survey(1));
        let req = SubmitRequest {
            employee: None,
            answers: Some(json!({})),
            completion_time_minutes: None,
        };
        let err = submit(&store, 1, req).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn non_numeric_question_id_is_rejected() {
        let err = classify_answers(Some(json!({"abc": 1}))).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
