use actix_web::web::{Data, Json, Path};
use itertools::Itertools;
use serde::Serialize;

use crate::core::models::submission::{Answer, Submission};
use crate::core::ports::{SubmissionStore, SurveyStore};
use crate::core::services::submission::{self, SubmitRequest};
use crate::database::postgres::PgStore;
use crate::error::Error;
use crate::response::{CreateResponse, List};

/// Public submission endpoint.
pub async fn submit(survey_id: Path<(i32,)>, Json(req): Json<SubmitRequest>, store: Data<PgStore>) -> Result<Json<CreateResponse>, Error> {
    let id = submission::submit(store.get_ref(), survey_id.into_inner().0, req).await?;
    Ok(Json(CreateResponse { id }))
}

#[derive(Debug, Serialize)]
pub struct SubmissionDetail {
    #[serde(flatten)]
    submission: Submission,
    answers: Vec<Answer>,
}

/// All submissions of a survey with their answers, for the admin dashboard.
pub async fn list(survey_id: Path<(i32,)>, store: Data<PgStore>) -> Result<Json<List<SubmissionDetail>>, Error> {
    let survey_id = survey_id.into_inner().0;
    store.survey(survey_id).await?.ok_or(Error::NotFound("survey"))?;
    let submissions = store.survey_submissions(survey_id).await?;
    let answers = store.survey_answers(survey_id).await?;
    let mut by_submission = answers.into_iter().map(|a| (a.response_id, a)).into_group_map();
    let total = submissions.len() as i64;
    let list = submissions
        .into_iter()
        .map(|submission| {
            let answers = by_submission.remove(&submission.id).unwrap_or_default();
            SubmissionDetail { submission, answers }
        })
        .collect();
    Ok(Json(List::new(list, total)))
}
