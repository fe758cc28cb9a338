use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const OPTION_COUNT: usize = 4;

/// A single-choice question. `position` is 0-based and dense within its quiz.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: String,
    pub position: i32,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: i32,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn new(
        quiz_id: &str,
        position: i32,
        prompt: &str,
        options: [&str; OPTION_COUNT],
        correct_index: i32,
        explanation: &str,
    ) -> Self {
        QuizQuestion {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            position,
            prompt: prompt.to_string(),
            options: options.map(str::to_string),
            correct_index,
            explanation: explanation.to_string(),
        }
    }

    pub fn is_correct(&self, selected_index: i32) -> bool {
        selected_index == self.correct_index
    }

    pub fn options_vec(&self) -> Vec<String> {
        self.options.to_vec()
    }
}

/// Finds the question at `position` in a position-ordered slice.
pub fn question_at(questions: &[QuizQuestion], position: i32) -> Option<&QuizQuestion> {
    questions.iter().find(|q| q.position == position)
}
