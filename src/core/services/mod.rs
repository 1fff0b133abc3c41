pub mod analytics;
pub mod audit;
pub mod submission;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use chrono::{Duration, Utc};

    use crate::core::models::audit::AuditAnswer;
    use crate::core::models::question::{Question, QuestionType};
    use crate::core::models::submission::{Answer, EmployeeInfo, NewAnswer, Submission};
    use crate::core::models::survey::Survey;
    use crate::core::ports::{AuditStore, SubmissionStore, SurveyStore};
    use crate::error::Error;

    /// In-memory stand-in for the Postgres store so the services run without
    /// a database.
    #[derive(Default)]
    pub struct MemStore {
        pub surveys: Vec<Survey>,
        pub questions: Vec<Question>,
        pub submissions: Mutex<Vec<Submission>>,
        pub answers: Mutex<Vec<Answer>>,
        pub audit_answers: Mutex<Vec<AuditAnswer>>,
    }

    impl MemStore {
        pub fn with_survey(survey: Survey) -> Self {
            Self {
                surveys: vec![survey],
                ..Default::default()
            }
        }
    }

    impl SurveyStore for MemStore {
        async fn survey(&self, id: i32) -> Result<Option<Survey>, Error> {
            Ok(self.surveys.iter().find(|s| s.id == id).cloned())
        }

        async fn survey_questions(&self, _survey_id: i32) -> Result<Vec<Question>, Error> {
            Ok(self.questions.clone())
        }
    }

    impl SubmissionStore for MemStore {
        async fn create_submission(
            &self,
            survey_id: i32,
            employee: EmployeeInfo,
            completion_time_minutes: Option<i32>,
            answers: Vec<NewAnswer>,
        ) -> Result<i32, Error> {
            let mut submissions = self.submissions.lock().unwrap();
            let id = submissions.len() as i32 + 1;
            submissions.push(Submission {
                id,
                survey_id,
                employee_name: employee.name,
                designation: employee.designation,
                department: employee.department,
                supervisor: employee.supervisor,
                reports_to: employee.reports_to,
                completion_time_minutes,
                submitted_at: Utc::now(),
            });
            let mut stored = self.answers.lock().unwrap();
            for answer in answers {
                let answer_id = stored.len() as i32 + 1;
                stored.push(Answer {
                    id: answer_id,
                    response_id: id,
                    question_id: answer.question_id,
                    value: answer.value,
                });
            }
            Ok(id)
        }

        async fn survey_submissions(&self, survey_id: i32) -> Result<Vec<Submission>, Error> {
            Ok(self
                .submissions
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.survey_id == survey_id)
                .cloned()
                .collect())
        }

        async fn survey_answers(&self, _survey_id: i32) -> Result<Vec<Answer>, Error> {
            Ok(self.answers.lock().unwrap().clone())
        }
    }

    impl AuditStore for MemStore {
        async fn replace_audit_answers(&self, survey_id: i32, reviewer_id: i32, answers: Vec<NewAnswer>) -> Result<(), Error> {
            let mut stored = self.audit_answers.lock().unwrap();
            stored.retain(|a| !(a.survey_id == survey_id && a.reviewer_id == reviewer_id));
            for answer in answers {
                let id = stored.len() as i32 + 1;
                stored.push(AuditAnswer {
                    id,
                    survey_id,
                    question_id: answer.question_id,
                    reviewer_id,
                    value: answer.value,
                });
            }
            Ok(())
        }

        async fn reviewer_audit_answers(&self, survey_id: i32, reviewer_id: i32) -> Result<Vec<AuditAnswer>, Error> {
            Ok(self
                .audit_answers
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.survey_id == survey_id && a.reviewer_id == reviewer_id)
                .cloned()
                .collect())
        }
    }

    pub fn open_survey(id: i32) -> Survey {
        Survey {
            id,
            title: "engagement pulse".into(),
            description: None,
            is_active: true,
            is_published: true,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn closed_survey(id: i32) -> Survey {
        let yesterday = Utc::now().date_naive() - Duration::days(1);
        Survey {
            end_date: Some(yesterday),
            ..open_survey(id)
        }
    }

    pub fn not_yet_open_survey(id: i32) -> Survey {
        let next_month = Utc::now().date_naive() + Duration::days(30);
        Survey {
            start_date: Some(next_month),
            ..open_survey(id)
        }
    }

    pub fn question(id: i32, question_type: QuestionType) -> Question {
        Question {
            id,
            section_id: 1,
            question_text: format!("question {}", id),
            question_type,
            is_required: false,
            has_other_option: false,
            order_index: id,
        }
    }
}
