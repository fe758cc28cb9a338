#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{AttemptAnswer, Quiz, QuizAttempt, QuizQuestion};

    pub const USER_ID: &str = "user-1";
    pub const OTHER_USER_ID: &str = "user-2";

    /// A published quiz.
    pub fn sample_quiz() -> Quiz {
        Quiz::new("Rust basics", true)
    }

    /// One question per entry of `correct_indices`, at dense positions 0..N.
    pub fn sample_questions(quiz_id: &str, correct_indices: &[i32]) -> Vec<QuizQuestion> {
        correct_indices
            .iter()
            .enumerate()
            .map(|(position, correct_index)| {
                QuizQuestion::new(
                    quiz_id,
                    position as i32,
                    &format!("Question {}", position + 1),
                    ["alpha", "beta", "gamma", "delta"],
                    *correct_index,
                    &format!("Explanation {}", position + 1),
                )
            })
            .collect()
    }

    pub fn sample_attempt() -> QuizAttempt {
        QuizAttempt::new(USER_ID, "quiz-1", 3)
    }

    pub fn answer_for(attempt_id: &str, question: &QuizQuestion, selected: i32) -> AttemptAnswer {
        AttemptAnswer::evaluate(attempt_id, question, selected)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_sample_questions_are_dense() {
        let questions = sample_questions("quiz-1", &[1, 0, 2]);
        let positions: Vec<i32> = questions.iter().map(|q| q.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert!(questions.iter().all(|q| q.quiz_id == "quiz-1"));
    }

    #[test]
    fn test_answer_for_grades_selection() {
        let questions = sample_questions("quiz-1", &[2]);
        assert!(answer_for("attempt-1", &questions[0], 2).correct);
        assert!(!answer_for("attempt-1", &questions[0], 1).correct);
    }
}
