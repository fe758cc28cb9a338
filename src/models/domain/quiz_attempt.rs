use std::collections::HashSet;

use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::QuizQuestion;

/// A user's traversal of one quiz.
///
/// `finished`, `total_questions` and `score` are caches. The answers stored for
/// the attempt are the source of truth and the service refreshes these fields
/// from them whenever it touches the attempt.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub current_position: i32,
    pub total_questions: i64,
    pub score: i64,
    pub finished: bool,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn new(user_id: &str, quiz_id: &str, total_questions: i64) -> Self {
        let now = Utc::now();
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            current_position: 0,
            total_questions,
            score: 0,
            finished: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Back to the first question with nothing answered. Keeps id and total.
    pub fn reset(&mut self) {
        self.current_position = 0;
        self.score = 0;
        self.finished = false;
        self.touch();
    }
}

pub fn is_finished(total_questions: i64, answered_count: i64) -> bool {
    total_questions > 0 && answered_count >= total_questions
}

/// Lowest position without a recorded answer, scanning in position order.
pub fn next_unanswered_position(
    questions: &[QuizQuestion],
    answered_question_ids: &HashSet<&str>,
) -> Option<i32> {
    questions
        .iter()
        .find(|q| !answered_question_ids.contains(q.id.as_str()))
        .map(|q| q.position)
}
