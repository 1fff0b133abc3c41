use actix_web::web::{Data, Json, Path, Query};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sqlx::{query, query_as, PgPool};

use crate::core::models::question::{Question, QuestionOption};
use crate::core::models::survey::{Section, Survey};
use crate::error::Error;
use crate::response::{CreateResponse, DeleteResponse, List, UpdateResponse};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    active_only: Option<bool>,
}

pub async fn list(Query(ListParams { active_only }): Query<ListParams>, db: Data<PgPool>) -> Result<Json<List<Survey>>, Error> {
    let surveys: Vec<Survey> = query_as("SELECT * FROM surveys WHERE $1 = FALSE OR is_active = TRUE ORDER BY id")
        .bind(active_only.unwrap_or(false))
        .fetch_all(db.get_ref())
        .await?;
    let total = surveys.len() as i64;
    Ok(Json(List::new(surveys, total)))
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    question: Question,
    options: Vec<QuestionOption>,
}

#[derive(Debug, Serialize)]
pub struct SectionDetail {
    #[serde(flatten)]
    section: Section,
    questions: Vec<QuestionDetail>,
}

#[derive(Debug, Serialize)]
pub struct SurveyDetail {
    #[serde(flatten)]
    survey: Survey,
    sections: Vec<SectionDetail>,
}

/// Nests questions under their sections and options under their questions,
/// sorting every level ascending by order_index.
fn nest(survey: Survey, mut sections: Vec<Section>, mut questions: Vec<Question>, mut options: Vec<QuestionOption>) -> SurveyDetail {
    sections.sort_by_key(|s| s.order_index);
    questions.sort_by_key(|q| q.order_index);
    options.sort_by_key(|o| o.order_index);
    let mut options_by_question = options.into_iter().map(|o| (o.question_id, o)).into_group_map();
    let mut questions_by_section = questions.into_iter().map(|q| (q.section_id, q)).into_group_map();
    let sections = sections
        .into_iter()
        .map(|section| {
            let questions = questions_by_section
                .remove(&section.id)
                .unwrap_or_default()
                .into_iter()
                .map(|question| {
                    let options = options_by_question.remove(&question.id).unwrap_or_default();
                    QuestionDetail { question, options }
                })
                .collect();
            SectionDetail { section, questions }
        })
        .collect();
    SurveyDetail { survey, sections }
}

/// Survey with its sections, questions and options nested.
pub async fn detail(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<SurveyDetail>, Error> {
    let survey_id = survey_id.into_inner().0;
    let survey: Survey = query_as("SELECT * FROM surveys WHERE id = $1")
        .bind(survey_id)
        .fetch_optional(db.get_ref())
        .await?
        .ok_or(Error::NotFound("survey"))?;
    let sections: Vec<Section> = query_as("SELECT * FROM sections WHERE survey_id = $1")
        .bind(survey_id)
        .fetch_all(db.get_ref())
        .await?;
    let questions: Vec<Question> = query_as(
        "
    SELECT q.*
    FROM sections AS s
    JOIN questions AS q ON s.id = q.section_id
    WHERE s.survey_id = $1",
    )
    .bind(survey_id)
    .fetch_all(db.get_ref())
    .await?;
    let options: Vec<QuestionOption> = query_as(
        "
    SELECT o.*
    FROM sections AS s
    JOIN questions AS q ON s.id = q.section_id
    JOIN question_options AS o ON q.id = o.question_id
    WHERE s.survey_id = $1",
    )
    .bind(survey_id)
    .fetch_all(db.get_ref())
    .await?;
    Ok(Json(nest(survey, sections, questions, options)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyCreation {
    title: String,
    description: Option<String>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    is_published: bool,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

pub async fn create(Json(body): Json<SurveyCreation>, db: Data<PgPool>) -> Result<Json<CreateResponse>, Error> {
    if body.title.is_empty() {
        return Err(Error::Validation("title is required".into()));
    }
    let (id,): (i32,) = query_as(
        "
    INSERT INTO surveys (title, description, is_active, is_published, start_date, end_date)
    VALUES ($1, $2, $3, $4, $5, $6)
    RETURNING id",
    )
    .bind(body.title)
    .bind(body.description)
    .bind(body.is_active)
    .bind(body.is_published)
    .bind(body.start_date)
    .bind(body.end_date)
    .fetch_one(db.get_ref())
    .await?;
    Ok(Json(CreateResponse { id }))
}

pub async fn update(survey_id: Path<(i32,)>, Json(body): Json<SurveyCreation>, db: Data<PgPool>) -> Result<Json<UpdateResponse>, Error> {
    if body.title.is_empty() {
        return Err(Error::Validation("title is required".into()));
    }
    let updated = query(
        "
    UPDATE surveys
    SET title = $1, description = $2, is_active = $3, is_published = $4, start_date = $5, end_date = $6
    WHERE id = $7",
    )
    .bind(body.title)
    .bind(body.description)
    .bind(body.is_active)
    .bind(body.is_published)
    .bind(body.start_date)
    .bind(body.end_date)
    .bind(survey_id.into_inner().0)
    .execute(db.get_ref())
    .await?
    .rows_affected();
    Ok(Json(UpdateResponse::new(updated)))
}

pub async fn delete_survey(survey_id: Path<(i32,)>, db: Data<PgPool>) -> Result<Json<DeleteResponse>, Error> {
    let deleted = query("DELETE FROM surveys WHERE id = $1")
        .bind(survey_id.into_inner().0)
        .execute(db.get_ref())
        .await?
        .rows_affected();
    Ok(Json(DeleteResponse::new(deleted)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::question::QuestionType;
    use crate::core::services::testing::open_survey;

    fn section(id: i32, order_index: i32) -> Section {
        Section {
            id,
            survey_id: 1,
            title: format!("section {}", id),
            order_index,
        }
    }

    fn question(id: i32, section_id: i32, order_index: i32) -> Question {
        Question {
            id,
            section_id,
            question_text: format!("question {}", id),
            question_type: QuestionType::Radio,
            is_required: false,
            has_other_option: false,
            order_index,
        }
    }

    fn option(id: i32, question_id: i32, order_index: i32) -> QuestionOption {
        QuestionOption {
            id,
            question_id,
            option_text: format!("option {}", id),
            order_index,
        }
    }

    #[test]
    fn nest_sorts_every_level_by_order_index() {
        let sections = vec![section(20, 2), section(10, 1)];
        let questions = vec![question(102, 10, 2), question(101, 10, 1), question(201, 20, 1)];
        let options = vec![option(3, 101, 3), option(1, 101, 1), option(2, 101, 2)];
        let detail = nest(open_survey(1), sections, questions, options);

        let section_ids: Vec<i32> = detail.sections.iter().map(|s| s.section.id).collect();
        assert_eq!(section_ids, vec![10, 20]);

        let first = &detail.sections[0];
        let question_ids: Vec<i32> = first.questions.iter().map(|q| q.question.id).collect();
        assert_eq!(question_ids, vec![101, 102]);

        let option_ids: Vec<i32> = first.questions[0].options.iter().map(|o| o.id).collect();
        assert_eq!(option_ids, vec![1, 2, 3]);
    }

    #[test]
    fn nest_keeps_empty_sections_and_optionless_questions() {
        let sections = vec![section(10, 1), section(20, 2)];
        let questions = vec![question(101, 10, 1)];
        let detail = nest(open_survey(1), sections, questions, vec![]);

        assert_eq!(detail.sections[0].questions.len(), 1);
        assert!(detail.sections[0].questions[0].options.is_empty());
        assert!(detail.sections[1].questions.is_empty());
    }
}
