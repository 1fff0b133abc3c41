use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::core::models::analytics::{AnalyticsReport, DepartmentCount, QuestionAnalytics};
use crate::core::models::question::{Question, QuestionType};
use crate::core::models::submission::{Answer, AnswerValue, Submission};
use crate::core::ports::SubmissionStore;
use crate::error::Error;

/// Builds the full analytics report for a survey.
pub async fn survey_analytics<S>(store: &S, survey_id: i32) -> Result<AnalyticsReport, Error>
where
    S: SubmissionStore,
{
    store.survey(survey_id).await?.ok_or(Error::NotFound("survey"))?;
    let questions = store.survey_questions(survey_id).await?;
    let submissions = store.survey_submissions(survey_id).await?;
    let answers = store.survey_answers(survey_id).await?;
    Ok(aggregate(survey_id, &questions, &submissions, &answers, Utc::now()))
}

/// Pure aggregation over already-fetched rows; deterministic for fixed input.
pub fn aggregate(
    survey_id: i32,
    questions: &[Question],
    submissions: &[Submission],
    answers: &[Answer],
    generated_at: DateTime<Utc>,
) -> AnalyticsReport {
    let by_question = answers.iter().map(|a| (a.question_id, &a.value)).into_group_map();
    let question_analytics = questions
        .iter()
        .map(|q| {
            let values = by_question.get(&q.id).map(Vec::as_slice).unwrap_or_default();
            summarize(q, values)
        })
        .collect();
    AnalyticsReport {
        survey_id,
        total_responses: submissions.len() as i64,
        department_breakdown: department_breakdown(submissions),
        question_analytics,
        generated_at,
    }
}

/// Groups submissions by the department string exactly as recorded: no case
/// folding, no whitespace trimming. Submissions without a department are left
/// out of the breakdown (they still count toward the total).
fn department_breakdown(submissions: &[Submission]) -> Vec<DepartmentCount> {
    let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
    for submission in submissions {
        if let Some(department) = submission.department.as_deref() {
            *counts.entry(department).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, count)| DepartmentCount { name: name.into(), count })
        .collect()
}

fn summarize(question: &Question, values: &[&AnswerValue]) -> QuestionAnalytics {
    let mut summary = QuestionAnalytics {
        question_id: question.id,
        question_text: question.question_text.clone(),
        question_type: question.question_type,
        response_count: values.len() as i64,
        avg_rating: None,
        distribution: None,
        yes_count: None,
        no_count: None,
    };
    match question.question_type {
        QuestionType::Rating => {
            let ratings: Vec<f64> = values.iter().filter_map(|v| v.numeric()).collect();
            if !ratings.is_empty() {
                summary.avg_rating = Some(ratings.iter().sum::<f64>() / ratings.len() as f64);
            }
            let mut buckets = [0i64; 5];
            for rating in &ratings {
                for (i, bucket) in buckets.iter_mut().enumerate() {
                    if *rating == (i + 1) as f64 {
                        *bucket += 1;
                    }
                }
            }
            summary.distribution = Some(buckets);
        }
        QuestionType::YesNo => {
            summary.yes_count = Some(values.iter().filter(|v| v.main_text() == Some("yes")).count() as i64);
            summary.no_count = Some(values.iter().filter(|v| v.main_text() == Some("no")).count() as i64);
        }
        _ => {}
    }
    summary
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::models::submission::{AnswerValue, EmployeeInfo, NewAnswer};
    use crate::core::services::testing::{open_survey, question, MemStore};
    use serde_json::json;

    async fn seed_answers(store: &MemStore, department: &str, answers: Vec<(i32, AnswerValue)>) {
        let employee = EmployeeInfo {
            department: Some(department.into()),
            ..Default::default()
        };
        let answers = answers
            .into_iter()
            .map(|(question_id, value)| NewAnswer { question_id, value })
            .collect();
        store.create_submission(1, employee, None, answers).await.unwrap();
    }

    #[tokio::test]
    async fn zero_responses_yield_empty_report() {
        let mut store = MemStore::with_survey(open_survey(1));
        store.questions = vec![question(1, QuestionType::Rating)];
        let report = survey_analytics(&store, 1).await.unwrap();
        assert_eq!(report.total_responses, 0);
        assert!(report.department_breakdown.is_empty());
        let rating = &report.question_analytics[0];
        assert_eq!(rating.response_count, 0);
        assert_eq!(rating.avg_rating, None);
        assert_eq!(rating.distribution, Some([0, 0, 0, 0, 0]));
    }

    #[tokio::test]
    async fn rating_mean_and_distribution() {
        let mut store = MemStore::with_survey(open_survey(1));
        store.questions = vec![question(1, QuestionType::Rating)];
        for rating in [5.0, 4.0, 3.0, 5.0, 5.0] {
            seed_answers(&store, "Engineering", vec![(1, AnswerValue::Number(rating))]).await;
        }
        let report = survey_analytics(&store, 1).await.unwrap();
        let rating = &report.question_analytics[0];
        assert_eq!(rating.response_count, 5);
        assert_eq!(rating.avg_rating, Some(4.4));
        assert_eq!(rating.distribution, Some([0, 0, 1, 1, 3]));
    }

    #[tokio::test]
    async fn rating_accepts_object_main_representation() {
        let mut store = MemStore::with_survey(open_survey(1));
        store.questions = vec![question(1, QuestionType::Rating)];
        seed_answers(&store, "Ops", vec![(1, AnswerValue::Number(4.0))]).await;
        let wrapped = AnswerValue::classify(json!({"main": 2})).unwrap();
        seed_answers(&store, "Ops", vec![(1, wrapped)]).await;
        let report = survey_analytics(&store, 1).await.unwrap();
        let rating = &report.question_analytics[0];
        assert_eq!(rating.avg_rating, Some(3.0));
        assert_eq!(rating.distribution, Some([0, 1, 0, 1, 0]));
    }

    #[tokio::test]
    async fn yes_no_counts_text_and_object_answers() {
        let mut store = MemStore::with_survey(open_survey(1));
        store.questions = vec![question(1, QuestionType::YesNo)];
        for text in ["yes", "yes", "no"] {
            seed_answers(&store, "HR", vec![(1, AnswerValue::Text(text.into()))]).await;
        }
        let wrapped = AnswerValue::classify(json!({"main": "yes"})).unwrap();
        seed_answers(&store, "HR", vec![(1, wrapped)]).await;
        // Neither "yes" nor "no": silently excluded from both counts.
        seed_answers(&store, "HR", vec![(1, AnswerValue::Text("Yes".into()))]).await;
        let report = survey_analytics(&store, 1).await.unwrap();
        let yes_no = &report.question_analytics[0];
        assert_eq!(yes_no.yes_count, Some(3));
        assert_eq!(yes_no.no_count, Some(1));
        assert_eq!(yes_no.response_count, 5);
    }

    #[tokio::test]
    async fn other_question_types_report_count_only() {
        let mut store = MemStore::with_survey(open_survey(1));
        store.questions = vec![question(1, QuestionType::Checkbox)];
        seed_answers(&store, "HR", vec![(1, AnswerValue::Array(vec![json!("a"), json!("b")]))]).await;
        let report = survey_analytics(&store, 1).await.unwrap();
        let checkbox = &report.question_analytics[0];
        assert_eq!(checkbox.response_count, 1);
        assert_eq!(checkbox.avg_rating, None);
        assert_eq!(checkbox.distribution, None);
        assert_eq!(checkbox.yes_count, None);
        assert_eq!(checkbox.no_count, None);
    }

    #[tokio::test]
    async fn department_grouping_is_case_sensitive() {
        let store = MemStore::with_survey(open_survey(1));
        seed_answers(&store, "Engineering", vec![]).await;
        seed_answers(&store, "engineering", vec![]).await;
        let report = survey_analytics(&store, 1).await.unwrap();
        assert_eq!(report.total_responses, 2);
        assert_eq!(
            report.department_breakdown,
            vec![
                DepartmentCount {
                    name: "Engineering".into(),
                    count: 1
                },
                DepartmentCount {
                    name: "engineering".into(),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn absent_survey_is_not_found() {
        let store = MemStore::default();
        let err = survey_analytics(&store, 7).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
