use serde_json::Value;

use crate::core::models::audit::AuditAnswer;
use crate::core::ports::AuditStore;
use crate::core::services::submission::classify_answers;
use crate::error::Error;

/// Administrator review flow. Re-submission replaces the reviewer's previous
/// answers wholesale; the store does the delete+insert pair in one
/// transaction. No activity/window checks apply here.
pub async fn submit<S>(store: &S, survey_id: i32, reviewer_id: i32, answers: Option<Value>) -> Result<(), Error>
where
    S: AuditStore,
{
    store.survey(survey_id).await?.ok_or(Error::NotFound("survey"))?;
    let answers = classify_answers(answers)?;
    store.replace_audit_answers(survey_id, reviewer_id, answers).await
}

pub async fn reviewer_answers<S>(store: &S, survey_id: i32, reviewer_id: i32) -> Result<Vec<AuditAnswer>, Error>
where
    S: AuditStore,
{
    store.survey(survey_id).await?.ok_or(Error::NotFound("survey"))?;
    store.reviewer_audit_answers(survey_id, reviewer_id).await
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::submission::AnswerValue;
    use crate::core::services::testing::{open_survey, MemStore};
    use serde_json::json;

    #[tokio::test]
    async fn refill_replaces_previous_answers() {
        let store = MemStore::with_survey(open_survey(1));
        submit(&store, 1, 10, Some(json!({"1": "initial", "2": 3}))).await.unwrap();
        submit(&store, 1, 10, Some(json!({"1": "revised"}))).await.unwrap();
        let answers = reviewer_answers(&store, 1, 10).await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question_id, 1);
        assert_eq!(answers[0].value, AnswerValue::Text("revised".into()));
    }

    #[tokio::test]
    async fn reviewers_do_not_share_answers() {
        let store = MemStore::with_survey(open_survey(1));
        submit(&store, 1, 10, Some(json!({"1": "mine"}))).await.unwrap();
        submit(&store, 1, 11, Some(json!({"1": "theirs"}))).await.unwrap();
        let mine = reviewer_answers(&store, 1, 10).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].value, AnswerValue::Text("mine".into()));
    }

    #[tokio::test]
    async fn absent_survey_is_not_found() {
        let store = MemStore::default();
        let err = submit(&store, 9, 10, Some(json!({}))).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_answers_are_rejected() {
        let store = MemStore::with_survey(open_survey(1));
        let err = submit(&store, 1, 10, Some(json!("not a map"))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(store.audit_answers.lock().unwrap().is_empty());
    }
}
