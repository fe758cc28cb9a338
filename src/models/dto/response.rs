use serde::Serialize;

use crate::models::domain::Quiz;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptStartedDto {
    pub attempt_id: String,
    pub quiz_title: String,
    pub total_questions: i64,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptMetaDto {
    pub attempt_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub total_questions: i64,
    pub answered_questions: i64,
    pub correct_answers: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewItemDto {
    pub position: i32,
    pub answered: bool,
    pub correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptOverviewDto {
    pub attempt_id: String,
    pub total_questions: i64,
    pub answered_questions: i64,
    pub items: Vec<OverviewItemDto>,
}

/// A question as shown while playing. The evaluation fields are only set
/// once the question has been answered in this attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentQuestionDto {
    pub question_id: String,
    pub position: i32,
    pub question: String,
    pub options: Vec<String>,
    pub answered: bool,
    pub selected_index: Option<i32>,
    pub correct_index: Option<i32>,
    pub correct: Option<bool>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerResultDto {
    pub correct: bool,
    pub correct_index: i32,
    pub explanation: String,
    pub score: i64,
    pub finished: bool,
    pub next_position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptResultDto {
    pub attempt_id: String,
    pub quiz_id: String,
    pub quiz_title: String,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub wrong_answers: i64,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewQuestionDto {
    pub question_id: String,
    pub position: i32,
    pub question: String,
    pub options: Vec<String>,
    pub selected_index: i32,
    pub correct_index: i32,
    pub correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumableQuizDto {
    pub quiz_id: String,
    pub attempt_id: String,
    pub quiz_title: String,
    pub total_questions: i64,
    pub answered_questions: i64,
    pub correct_count: i64,
    pub wrong_count: i64,
    pub score: i64,
    pub finished: bool,
    pub progress_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizListItemDto {
    pub id: String,
    pub title: String,
    pub published: bool,
}

impl From<&Quiz> for QuizListItemDto {
    fn from(quiz: &Quiz) -> Self {
        QuizListItemDto {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            published: quiz.published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatsDto {
    pub finished_quizzes: i64,
    pub points: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_list_item_from_quiz() {
        let quiz = Quiz::new("Ownership", true);
        let item = QuizListItemDto::from(&quiz);

        assert_eq!(item.id, quiz.id);
        assert_eq!(item.title, "Ownership");
        assert!(item.published);
    }

    #[test]
    fn unanswered_question_serializes_null_evaluation() {
        let dto = CurrentQuestionDto {
            question_id: "q-1".to_string(),
            position: 0,
            question: "Pick one".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answered: false,
            selected_index: None,
            correct_index: None,
            correct: None,
            explanation: None,
        };

        let json = serde_json::to_value(&dto).expect("dto should serialize");
        assert_eq!(json["answered"], false);
        assert!(json["selected_index"].is_null());
        assert!(json["correct_index"].is_null());
        assert!(json["explanation"].is_null());
    }
}
