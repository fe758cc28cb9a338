//! Pure builders turning quiz, attempt and answer data into response DTOs.

use std::collections::HashMap;

use crate::models::{
    domain::{quiz_attempt::is_finished, AttemptAnswer, QuizAttempt, QuizQuestion},
    dto::response::{
        AttemptMetaDto, AttemptOverviewDto, AttemptResultDto, CurrentQuestionDto,
        OverviewItemDto, ResumableQuizDto, ReviewQuestionDto,
    },
};

/// Live counters for one attempt, read from the answer store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerCounts {
    pub total: i64,
    pub answered: i64,
    pub correct: i64,
}

impl AnswerCounts {
    /// Answered clamped to the total, for display.
    pub fn answered_clamped(&self) -> i64 {
        self.answered.min(self.total).max(0)
    }

    /// Counted from every stored answer, even past a stale total.
    pub fn wrong(&self) -> i64 {
        (self.answered - self.correct).max(0)
    }

    pub fn finished(&self) -> bool {
        is_finished(self.total, self.answered)
    }

    pub fn progress_percent(&self) -> i64 {
        if self.total <= 0 {
            return 0;
        }
        (self.answered_clamped() as f64 * 100.0 / self.total as f64).round() as i64
    }
}

pub fn meta(attempt: &QuizAttempt, quiz_title: &str, counts: AnswerCounts) -> AttemptMetaDto {
    AttemptMetaDto {
        attempt_id: attempt.id.clone(),
        quiz_id: attempt.quiz_id.clone(),
        quiz_title: quiz_title.to_string(),
        total_questions: counts.total,
        answered_questions: counts.answered_clamped(),
        correct_answers: counts.correct,
    }
}

pub fn overview(
    attempt_id: &str,
    questions: &[QuizQuestion],
    answers: &[AttemptAnswer],
) -> AttemptOverviewDto {
    let by_question: HashMap<&str, &AttemptAnswer> = answers
        .iter()
        .map(|a| (a.question_id.as_str(), a))
        .collect();

    let items: Vec<OverviewItemDto> = questions
        .iter()
        .map(|q| {
            let answer = by_question.get(q.id.as_str());
            OverviewItemDto {
                position: q.position,
                answered: answer.is_some(),
                correct: answer.map(|a| a.correct),
            }
        })
        .collect();

    let answered = items.iter().filter(|item| item.answered).count();

    AttemptOverviewDto {
        attempt_id: attempt_id.to_string(),
        total_questions: questions.len() as i64,
        answered_questions: answered as i64,
        items,
    }
}

pub fn current_question(
    question: &QuizQuestion,
    answer: Option<&AttemptAnswer>,
) -> CurrentQuestionDto {
    CurrentQuestionDto {
        question_id: question.id.clone(),
        position: question.position,
        question: question.prompt.clone(),
        options: question.options_vec(),
        answered: answer.is_some(),
        selected_index: answer.map(|a| a.selected_index),
        correct_index: answer.map(|_| question.correct_index),
        correct: answer.map(|a| a.correct),
        explanation: answer.map(|_| question.explanation.clone()),
    }
}

pub fn result(attempt: &QuizAttempt, quiz_title: &str, counts: AnswerCounts) -> AttemptResultDto {
    AttemptResultDto {
        attempt_id: attempt.id.clone(),
        quiz_id: attempt.quiz_id.clone(),
        quiz_title: quiz_title.to_string(),
        total_questions: counts.total,
        correct_answers: counts.correct,
        wrong_answers: counts.wrong(),
        score: counts.correct,
    }
}

pub fn review(question: &QuizQuestion, answer: &AttemptAnswer) -> ReviewQuestionDto {
    ReviewQuestionDto {
        question_id: question.id.clone(),
        position: question.position,
        question: question.prompt.clone(),
        options: question.options_vec(),
        selected_index: answer.selected_index,
        correct_index: question.correct_index,
        correct: answer.correct,
        explanation: question.explanation.clone(),
    }
}

pub fn resumable(attempt: &QuizAttempt, quiz_title: &str, counts: AnswerCounts) -> ResumableQuizDto {
    ResumableQuizDto {
        quiz_id: attempt.quiz_id.clone(),
        attempt_id: attempt.id.clone(),
        quiz_title: quiz_title.to_string(),
        total_questions: counts.total,
        answered_questions: counts.answered_clamped(),
        correct_count: counts.correct,
        wrong_count: counts.wrong(),
        score: counts.correct,
        finished: counts.finished(),
        progress_percent: counts.progress_percent(),
    }
}
