use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartAttemptRequest {
    #[validate(required(message = "quiz_id is required"), length(min = 1))]
    pub quiz_id: Option<String>,
}

impl StartAttemptRequest {
    pub fn into_quiz_id(self) -> AppResult<String> {
        self.validate()?;
        self.quiz_id
            .ok_or_else(|| AppError::ValidationError("quiz_id is required".to_string()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnswerRequest {
    #[validate(required(message = "question_id is required"), length(min = 1))]
    pub question_id: Option<String>,

    #[validate(
        required(message = "selected_index is required"),
        range(min = 0, max = 3)
    )]
    pub selected_index: Option<i32>,
}

impl AnswerRequest {
    /// Validates and splits into `(question_id, selected_index)`.
    pub fn into_parts(self) -> AppResult<(String, i32)> {
        self.validate()?;
        match (self.question_id, self.selected_index) {
            (Some(question_id), Some(selected_index)) => Ok((question_id, selected_index)),
            _ => Err(AppError::ValidationError(
                "question_id and selected_index are required".to_string(),
            )),
        }
    }
}
