use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::QuizQuestion;

/// One submission for one question within one attempt. Never updated after insert.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptAnswer {
    pub id: String,
    pub attempt_id: String,
    pub question_id: String,
    pub selected_index: i32,
    pub correct: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub answered_at: DateTime<Utc>,
}

impl AttemptAnswer {
    /// Grades `selected_index` against the question once, at write time.
    pub fn evaluate(attempt_id: &str, question: &QuizQuestion, selected_index: i32) -> Self {
        AttemptAnswer {
            id: Uuid::new_v4().to_string(),
            attempt_id: attempt_id.to_string(),
            question_id: question.id.clone(),
            selected_index,
            correct: question.is_correct(selected_index),
            answered_at: Utc::now(),
        }
    }
}
