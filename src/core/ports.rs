//! Store-access seams for the submission and analytics services. The Postgres
//! implementation lives in `database::postgres`; tests run against an
//! in-memory fake implementing the same traits.

use crate::core::models::audit::AuditAnswer;
use crate::core::models::question::Question;
use crate::core::models::submission::{Answer, EmployeeInfo, NewAnswer, Submission};
use crate::core::models::survey::Survey;
use crate::error::Error;

#[allow(async_fn_in_trait)]
pub trait SurveyStore {
    async fn survey(&self, id: i32) -> Result<Option<Survey>, Error>;
    /// Questions of a survey across all sections, ordered by section
    /// order_index then question order_index.
    async fn survey_questions(&self, survey_id: i32) -> Result<Vec<Question>, Error>;
}

#[allow(async_fn_in_trait)]
pub trait SubmissionStore: SurveyStore {
    /// Writes the submission row and its answer rows in one transaction and
    /// returns the generated submission id.
    async fn create_submission(
        &self,
        survey_id: i32,
        employee: EmployeeInfo,
        completion_time_minutes: Option<i32>,
        answers: Vec<NewAnswer>,
    ) -> Result<i32, Error>;
    async fn survey_submissions(&self, survey_id: i32) -> Result<Vec<Submission>, Error>;
    async fn survey_answers(&self, survey_id: i32) -> Result<Vec<Answer>, Error>;
}

#[allow(async_fn_in_trait)]
pub trait AuditStore: SurveyStore {
    /// Refill semantics: deletes the reviewer's previous audit answers for
    /// the survey, then inserts the new set, in one transaction.
    async fn replace_audit_answers(&self, survey_id: i32, reviewer_id: i32, answers: Vec<NewAnswer>) -> Result<(), Error>;
    async fn reviewer_audit_answers(&self, survey_id: i32, reviewer_id: i32) -> Result<Vec<AuditAnswer>, Error>;
}
